use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TEXT_PAGE: &str = "\
销售日报
集团合计销售【2024年05月01日】（万元）
1,234.5
本月集团合计销售（万元）
23,456
本年集团合计销售（万元）
123,456.7
各业态销售【2024年05月01日】（单位：万元）
超市 120.5
百货 80
各门店销售【2024年05月01日】（单位：万元）
华东旗舰店
8,901
";

const HTML_PAGE: &str = r#"<html><body>
<h1>销售日报</h1>
<div>集团合计销售【2024年05月01日】（万元）</div><div>1,234.5</div>
<div>本月集团合计销售（万元）</div><div>23,456</div>
<div>本年集团合计销售（万元）</div><div>123,456.7</div>
<script>
var data = {"buData": [{"业态": "超市", "销售": 120.5}],
            "shopData": [{"门店名称": "华东旗舰店", "门店": "S001", "销售": 8901}]};
</script>
</body></html>"#;

fn salesrep(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("salesrep").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

fn write_page(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn init_config(dir: &TempDir) -> std::path::PathBuf {
    let config = dir.path().join("config.json");
    salesrep(&config).args(["config", "init"]).assert().success();
    config
}

#[test]
fn extract_text_page_as_csv() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);
    let page = write_page(&dir, "page.txt", TEXT_PAGE);

    salesrep(&config)
        .args(["extract", "--format", "csv"])
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("report_date,period,entity_type,entity_name"))
        .stdout(predicate::str::contains("2024-05-01,daily,group,集团合计,1234.5"))
        .stdout(predicate::str::contains("2024-05-01,daily,store,华东旗舰店,8901"));
}

#[test]
fn extract_html_page_writes_output_set() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);
    let page = write_page(&dir, "page.html", HTML_PAGE);
    let out = dir.path().join("out");

    salesrep(&config)
        .arg("extract")
        .arg(&page)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total rows: 5"));

    let day = out.join("2024").join("05").join("01");
    for name in [
        "sales.csv",
        "sales_group.csv",
        "sales_business_type.csv",
        "sales_store.csv",
        "report.md",
        "bu_daily_top10.svg",
        "store_yearly_top10.svg",
    ] {
        assert!(day.join(name).exists(), "missing {name}");
    }

    let stores = fs::read_to_string(day.join("sales_store.csv")).unwrap();
    assert!(stores.contains("华东旗舰店,S001,,8901"));
}

#[test]
fn extract_uses_report_date_override() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);
    let page = write_page(
        &dir,
        "page.txt",
        &TEXT_PAGE.replace("2024年05月01日】（万元）", "2024年02月30日】（万元）"),
    );

    salesrep(&config)
        .arg("extract")
        .arg(&page)
        .args(["--report-date", "2024-04-30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"report_date\": \"2024-04-30\""));
}

#[test]
fn extract_without_group_labels_fails() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);
    let page = write_page(&dir, "page.txt", "各业态销售【2024年05月01日】（单位：万元）\n超市 1\n");

    salesrep(&config)
        .arg("extract")
        .arg(&page)
        .assert()
        .failure()
        .stderr(predicate::str::contains("label not found"));
}

#[test]
fn extract_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);

    salesrep(&config)
        .args(["extract", "no-such-page.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);

    salesrep(&config)
        .args(["config", "set", "output.top_n", "5"])
        .assert()
        .success();

    salesrep(&config)
        .args(["config", "get", "output.top_n"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));

    salesrep(&config)
        .args(["config", "get", "output.nope"])
        .assert()
        .failure();
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);

    salesrep(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    salesrep(&config)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}
