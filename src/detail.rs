/*!
 * Human-readable item details
 *
 * Renders an item as the ordered lines of the details view, decoding the
 * lookup-encoded attributes (skill, element, slots, flags, jobs) along the
 * way. Values that do not parse as hex are shown raw.
 */

use std::fmt;

use serde::Serialize;

use crate::tables::{self, Element, Rgb};
use crate::types::Item;
use crate::utils::parse_hex;

/// A colored span within a detail line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accent {
    /// Byte offset of the span
    pub start: usize,
    /// Byte length of the span
    pub len: usize,
    /// Span color
    pub color: Rgb,
}

/// One line of the details view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailLine {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<Accent>,
}

impl DetailLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            accent: None,
        }
    }

    /// The text before, inside and after the accent span
    pub fn split_accent(&self) -> Option<(&str, &str, &str, Rgb)> {
        let accent = self.accent?;
        let end = accent.start + accent.len;
        Some((
            self.text.get(..accent.start)?,
            self.text.get(accent.start..end)?,
            self.text.get(end..)?,
            accent.color,
        ))
    }
}

impl fmt::Display for DetailLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Render the full details view of an item
pub fn render(item: &Item) -> Vec<DetailLine> {
    let mut lines = vec![
        DetailLine::plain(format!("Name: {}", item.display_name())),
        DetailLine::plain(format!("ID: {}", item.id)),
        DetailLine::plain(format!("Description: {}", item.description)),
        DetailLine::plain(""),
        DetailLine::plain("--- Attributes ---"),
    ];

    for (key, value) in &item.attributes {
        if key == "description" {
            continue;
        }
        lines.extend(render_attribute(key, value));
    }

    lines
}

/// Render a single attribute as one or more lines
pub fn render_attribute(key: &str, value: &str) -> Vec<DetailLine> {
    let decoded = parse_hex(value).and_then(|code| match key {
        "skill" => render_lookup(key, value, tables::skill_name(code)),
        "element" => Element::from_code(code).map(|element| render_element(value, element)),
        "slots" => render_lookup(key, value, tables::slot_name(code)),
        "flags" => Some(render_flags(value, code)),
        "jobs" => Some(render_jobs(value, code)),
        _ => None,
    });

    decoded.unwrap_or_else(|| vec![DetailLine::plain(format!("{}: {}", key, value))])
}

fn render_lookup(key: &str, value: &str, name: Option<&str>) -> Option<Vec<DetailLine>> {
    let line = match name {
        Some(name) => format!("{}: {} ({})", key, value, name),
        None => format!("{}: {}", key, value),
    };
    Some(vec![DetailLine::plain(line)])
}

fn render_element(value: &str, element: Element) -> Vec<DetailLine> {
    let name = element.to_string();
    let prefix = format!("element: {} (", value);
    let accent = Accent {
        start: prefix.len(),
        len: name.len(),
        color: element.color(),
    };

    vec![DetailLine {
        text: format!("{}{})", prefix, name),
        accent: Some(accent),
    }]
}

fn render_flags(value: &str, flags: i32) -> Vec<DetailLine> {
    let mut lines = vec![
        DetailLine::plain(format!("flags: {} (Decimal: {})", value, flags)),
        DetailLine::plain("  -- Flags Detail --"),
    ];
    lines.extend(
        tables::set_flags(flags)
            .into_iter()
            .map(|name| DetailLine::plain(format!("  * {}", name))),
    );
    lines
}

fn render_jobs(value: &str, mask: i32) -> Vec<DetailLine> {
    let jobs = tables::enabled_jobs(mask);
    let lsb = tables::combined_lsb(&jobs);

    vec![
        DetailLine::plain(format!("jobs: {} (Combined Hex Value: {})", value, mask)),
        DetailLine::plain(format!("  -- Enabled Jobs: {}", jobs.join("/"))),
        DetailLine::plain(format!("  -- Combined LSB Bitmask: {}", lsb)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::item;

    fn texts(lines: &[DetailLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_header_and_order() {
        let item = item(&[
            ("id", "16385"),
            ("name", "Cesti"),
            ("description", "DMG:+1"),
            ("stack-size", "1"),
        ]);

        let lines = render(&item);
        assert_eq!(
            texts(&lines),
            vec![
                "Name: Cesti",
                "ID: 16385",
                "Description: DMG:+1",
                "",
                "--- Attributes ---",
                "id: 16385",
                "name: Cesti",
                "stack-size: 1",
            ]
        );
    }

    #[test]
    fn test_header_uses_log_name_and_defaults() {
        let lines = render(&item(&[("log-name-singular", "pair of cesti")]));
        assert_eq!(lines[0].text, "Name: pair of cesti");
        assert_eq!(lines[1].text, "ID: N/A");
        assert_eq!(lines[2].text, "Description: No description.");

        let lines = render(&item(&[("name", "Cesti")]));
        assert_eq!(lines[0].text, "Name: Cesti");
    }

    #[test]
    fn test_skill() {
        assert_eq!(
            texts(&render_attribute("skill", "0003")),
            vec!["skill: 0003 (SKILL: Sword)"]
        );
        assert_eq!(texts(&render_attribute("skill", "00D")), vec!["skill: 00D"]);
        assert_eq!(texts(&render_attribute("skill", "sword")), vec!["skill: sword"]);
    }

    #[test]
    fn test_element_accent() {
        let lines = render_attribute("element", "04");
        assert_eq!(texts(&lines), vec!["element: 04 (Lightning)"]);

        let (before, name, after, color) = lines[0].split_accent().unwrap();
        assert_eq!(before, "element: 04 (");
        assert_eq!(name, "Lightning");
        assert_eq!(after, ")");
        assert_eq!(color, Element::Lightning.color());

        let unknown = render_attribute("element", "0F");
        assert_eq!(texts(&unknown), vec!["element: 0F"]);
        assert!(unknown[0].accent.is_none());
        assert_eq!(texts(&render_attribute("element", "")), vec!["element: "]);
    }

    #[test]
    fn test_slots() {
        assert_eq!(
            texts(&render_attribute("slots", "0010")),
            vec!["slots: 0010 (Head)"]
        );
        assert_eq!(texts(&render_attribute("slots", "0003")), vec!["slots: 0003"]);
    }

    #[test]
    fn test_flags() {
        assert_eq!(
            texts(&render_attribute("flags", "9000")),
            vec![
                "flags: 9000 (Decimal: 36864)",
                "  -- Flags Detail --",
                "  * NOT SELABLE",
                "  * RARE",
            ]
        );
        assert_eq!(
            texts(&render_attribute("flags", "0")),
            vec!["flags: 0 (Decimal: 0)", "  -- Flags Detail --"]
        );
        assert_eq!(texts(&render_attribute("flags", "")), vec!["flags: "]);
    }

    #[test]
    fn test_jobs() {
        assert_eq!(
            texts(&render_attribute("jobs", "00001")),
            vec![
                "jobs: 00001 (Combined Hex Value: 1)",
                "  -- Enabled Jobs: WAR",
                "  -- Combined LSB Bitmask: 1",
            ]
        );
        assert_eq!(
            texts(&render_attribute("jobs", "00300")),
            vec![
                "jobs: 00300 (Combined Hex Value: 768)",
                "  -- Enabled Jobs: BST/BRD",
                "  -- Combined LSB Bitmask: 768",
            ]
        );
        assert_eq!(texts(&render_attribute("jobs", "all")), vec!["jobs: all"]);
    }

    #[test]
    fn test_description_not_repeated() {
        let lines = render(&item(&[("description", "Furnishing: Dresser")]));
        let count = lines
            .iter()
            .filter(|l| l.text.contains("Furnishing: Dresser"))
            .count();
        assert_eq!(count, 1);
    }
}
