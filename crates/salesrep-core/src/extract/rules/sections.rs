//! Section header location and block slicing for the rendered page.

use regex::Regex;

use crate::models::record::{EntityType, Period};

/// One extractable section of the rendered page.
#[derive(Debug, Clone)]
pub struct SectionSpec {
    /// Stable key, e.g. `bt_daily`.
    pub key: &'static str,
    /// Header line pattern.
    pub pattern: Regex,
    /// Entity kind listed in the section.
    pub entity_type: EntityType,
    /// Aggregation window of the listed figures.
    pub period: Period,
}

impl SectionSpec {
    /// Build the spec for an entity type and period.
    ///
    /// Returns `None` for the group entity, whose totals are looked up by
    /// their own labels.
    pub fn new(key: &'static str, entity_type: EntityType, period: Period) -> Option<Self> {
        let pattern = Regex::new(&header_pattern(entity_type, period)?).ok()?;
        Some(Self {
            key,
            pattern,
            entity_type,
            period,
        })
    }

    /// The six business type and store sections, in page order.
    pub fn defaults() -> Vec<SectionSpec> {
        [
            ("bt_daily", EntityType::BusinessType, Period::Daily),
            ("bt_month", EntityType::BusinessType, Period::Monthly),
            ("bt_year", EntityType::BusinessType, Period::Yearly),
            ("store_daily", EntityType::Store, Period::Daily),
            ("store_month", EntityType::Store, Period::Monthly),
            ("store_year", EntityType::Store, Period::Yearly),
        ]
        .into_iter()
        .filter_map(|(key, entity_type, period)| SectionSpec::new(key, entity_type, period))
        .collect()
    }

    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// Header pattern for a section, e.g. `本月各门店销售（单位：万元）`.
fn header_pattern(entity_type: EntityType, period: Period) -> Option<String> {
    let entity = match entity_type {
        EntityType::BusinessType => "业态",
        EntityType::Store => "门店",
        EntityType::Group => return None,
    };

    let pattern = match period {
        Period::Daily => format!(r"各{entity}销售【\d{{4}}年\d{{2}}月\d{{2}}日】（?单位：万元）?"),
        Period::Monthly => format!(r"本月各{entity}销售（?单位：万元）?"),
        Period::Yearly => format!(r"本年各{entity}销售（?单位：万元）?"),
    };
    Some(pattern)
}

/// Lines belonging to one located section.
#[derive(Debug, Clone)]
pub struct SectionBlock<'a, 's> {
    pub spec: &'s SectionSpec,
    pub lines: Vec<&'a str>,
}

/// Indices of every line matching any spec, in document order.
pub fn locate_headers<'s>(lines: &[&str], specs: &'s [SectionSpec]) -> Vec<(usize, &'s SectionSpec)> {
    let mut found = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        for spec in specs {
            if spec.matches(line) {
                found.push((i, spec));
            }
        }
    }

    found
}

/// Split lines into one block per located header.
///
/// Each block runs from the line after its header up to the next located
/// header or the end of input. No headers yields no blocks.
pub fn slice_blocks<'a, 's>(lines: &[&'a str], specs: &'s [SectionSpec]) -> Vec<SectionBlock<'a, 's>> {
    let headers = locate_headers(lines, specs);

    headers
        .iter()
        .enumerate()
        .map(|(n, &(start, spec))| {
            let end = headers.get(n + 1).map(|&(next, _)| next).unwrap_or(lines.len());
            let block = lines[(start + 1).min(end)..end]
                .iter()
                .copied()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            SectionBlock { spec, lines: block }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_lines() -> Vec<&'static str> {
        vec![
            "销售日报",
            "各业态销售【2024年05月01日】（单位：万元）",
            "超市 120.5",
            "百货 80",
            "本月各业态销售（单位：万元）",
            "超市",
            "3,400",
            "各门店销售【2024年05月01日】（单位：万元）",
            "华东店：8,901",
            "本年各门店销售单位：万元",
            "华东店 98,765.4万元",
        ]
    }

    #[test]
    fn test_defaults_have_no_group_section() {
        let specs = SectionSpec::defaults();
        assert_eq!(specs.len(), 6);
        assert!(specs.iter().all(|s| s.entity_type != EntityType::Group));
        assert!(SectionSpec::new("group", EntityType::Group, Period::Daily).is_none());
    }

    #[test]
    fn test_locate_headers() {
        let specs = SectionSpec::defaults();
        let headers = locate_headers(&sample_lines(), &specs);
        let found: Vec<(usize, &str)> = headers.iter().map(|(i, s)| (*i, s.key)).collect();

        assert_eq!(
            found,
            vec![(1, "bt_daily"), (4, "bt_month"), (7, "store_daily"), (9, "store_year")]
        );
    }

    #[test]
    fn test_slice_blocks_cover_lines_after_first_header() {
        let specs = SectionSpec::defaults();
        let lines = sample_lines();
        let blocks = slice_blocks(&lines, &specs);

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].lines, vec!["超市 120.5", "百货 80"]);
        assert_eq!(blocks[1].lines, vec!["超市", "3,400"]);
        assert_eq!(blocks[3].spec.period, Period::Yearly);

        let header_indices: Vec<usize> = locate_headers(&lines, &specs).iter().map(|(i, _)| *i).collect();
        let expected: Vec<&str> = lines
            .iter()
            .enumerate()
            .skip(header_indices[0] + 1)
            .filter(|(i, _)| !header_indices.contains(i))
            .map(|(_, l)| *l)
            .collect();
        let covered: Vec<&str> = blocks.iter().flat_map(|b| b.lines.iter().copied()).collect();
        assert_eq!(covered, expected);
    }

    #[test]
    fn test_no_headers_no_blocks() {
        let specs = SectionSpec::defaults();
        assert!(slice_blocks(&["超市 120.5", "百货 80"], &specs).is_empty());
    }

    #[test]
    fn test_adjacent_headers_give_empty_block() {
        let specs = SectionSpec::defaults();
        let lines = ["本月各业态销售（单位：万元）", "本年各业态销售（单位：万元）", "超市 1"];
        let blocks = slice_blocks(&lines, &specs);

        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].lines.is_empty());
        assert_eq!(blocks[1].lines, vec!["超市 1"]);
    }
}
