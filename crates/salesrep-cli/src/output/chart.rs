//! Horizontal bar charts rendered as standalone SVG.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const WIDTH: u32 = 900;
const BAR_HEIGHT: u32 = 24;
const MARGIN_LEFT: u32 = 180;
const MARGIN_RIGHT: u32 = 40;
const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 40;
const GAP: u32 = 10;
const BAR_FILL: &str = "#155dfc";

const STYLE: &str = "text{font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, \
                     'Helvetica Neue', Arial; font-size: 12px;} \
                     .title{font-size:16px;font-weight:bold}";

/// A titled list of labelled bars, longest bar scaled to the plot width.
#[derive(Debug, Clone, Default)]
pub struct BarChart {
    pub title: String,
    pub bars: Vec<(String, f64)>,
}

impl BarChart {
    pub fn new(title: impl Into<String>, bars: Vec<(String, f64)>) -> Self {
        Self {
            title: title.into(),
            bars,
        }
    }

    fn height(&self) -> u32 {
        let n = self.bars.len() as u32;
        let plot = if n > 0 { n * (BAR_HEIGHT + GAP) - GAP } else { 0 };
        MARGIN_TOP + plot + MARGIN_BOTTOM
    }

    fn scale(&self) -> f64 {
        let max = self.bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
        if max > 0.0 {
            f64::from(WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / max
        } else {
            1.0
        }
    }

    /// Render the chart as an SVG document.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let width = WIDTH.to_string();
        let height = self.height().to_string();
        writer.write_event(Event::Start(BytesStart::new("svg").with_attributes([
            ("xmlns", "http://www.w3.org/2000/svg"),
            ("width", width.as_str()),
            ("height", height.as_str()),
        ])))?;

        writer
            .create_element("style")
            .write_text_content(BytesText::new(STYLE))?;

        if !self.title.is_empty() {
            writer
                .create_element("text")
                .with_attributes([("class", "title"), ("x", MARGIN_LEFT.to_string().as_str()), ("y", "30")])
                .write_text_content(BytesText::new(&self.title))?;
        }

        let scale = self.scale();
        let mut y = MARGIN_TOP;
        for (name, value) in &self.bars {
            let bar_width = (value.max(0.0) * scale) as u32;
            let baseline = (y + BAR_HEIGHT - 6).to_string();

            writer
                .create_element("rect")
                .with_attributes([
                    ("x", MARGIN_LEFT.to_string().as_str()),
                    ("y", y.to_string().as_str()),
                    ("width", bar_width.to_string().as_str()),
                    ("height", BAR_HEIGHT.to_string().as_str()),
                    ("fill", BAR_FILL),
                ])
                .write_empty()?;

            writer
                .create_element("text")
                .with_attributes([
                    ("x", (MARGIN_LEFT - 8).to_string().as_str()),
                    ("y", baseline.as_str()),
                    ("text-anchor", "end"),
                ])
                .write_text_content(BytesText::new(name))?;

            writer
                .create_element("text")
                .with_attributes([
                    ("x", (MARGIN_LEFT + bar_width + 6).to_string().as_str()),
                    ("y", baseline.as_str()),
                ])
                .write_text_content(BytesText::new(&format!("{value:.0}")))?;

            y += BAR_HEIGHT + GAP;
        }

        writer.write_event(Event::End(BytesEnd::new("svg")))?;

        Ok(String::from_utf8(writer.into_inner().into_inner())?)
    }

    /// Render and write the chart to `path`.
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        fs::write(path, self.render()?)?;
        Ok(())
    }
}
