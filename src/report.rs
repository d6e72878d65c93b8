/*!
 * Reporting functionality for itemview
 *
 * Renders load summaries, item listings and item details either as console
 * tables (via the tabled library) or as JSON.
 */

use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::detail::{self, DetailLine};
use crate::error::Result;
use crate::sql;
use crate::types::{Attributes, Item};
use crate::utils::format_file_size;

/// Summary of a load pass
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// Loaded file path
    pub source: String,
    /// When the load finished (RFC 3339)
    pub loaded_at: String,
    /// Time taken to load
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
    /// Size of the export in bytes
    pub bytes_read: u64,
    /// Item records found, placeholders included
    pub items_found: usize,
    /// Items shown to the user
    pub usable_items: usize,
    /// Items with a decoded icon
    pub icons_decoded: usize,
    /// Icons that failed to decode
    pub icon_failures: usize,
}

fn serialize_duration<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Item details as reported to the user
#[derive(Debug, Clone, Serialize)]
pub struct ItemDetails<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub display_name: &'a str,
    pub description: &'a str,
    pub attributes: &'a Attributes,
    /// Icon dimensions, if an icon was decoded
    pub icon: Option<(u32, u32)>,
    pub lines: Vec<DetailLine>,
    pub sql: String,
}

impl<'a> ItemDetails<'a> {
    /// Collect the full details of an item
    pub fn new(item: &'a Item) -> Self {
        Self {
            id: &item.id,
            name: &item.name,
            display_name: item.display_name(),
            description: &item.description,
            attributes: &item.attributes,
            icon: item.icon.as_ref().map(|icon| (icon.width(), icon.height())),
            lines: detail::render(item),
            sql: sql::insert_statement(item),
        }
    }
}

/// Format of the report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Console table output
    #[default]
    ConsoleTable,
    /// Pretty-printed JSON
    Json,
}

/// Report generator
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    fn styled(mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    /// Generate the load summary
    pub fn load_summary(&self, report: &LoadReport) -> Result<String> {
        match self.format {
            ReportFormat::ConsoleTable => Ok(self.summary_table(report)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        }
    }

    // Create a summary table using the tabled crate
    fn summary_table(&self, report: &LoadReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "Source",
                value: report.source.clone(),
            },
            SummaryRow {
                key: "File Size",
                value: format_file_size(report.bytes_read),
            },
            SummaryRow {
                key: "Load Time",
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "Item Records",
                value: self.format_number(report.items_found),
            },
            SummaryRow {
                key: "Usable Items",
                value: self.format_number(report.usable_items),
            },
            SummaryRow {
                key: "Icons",
                value: self.format_number(report.icons_decoded),
            },
        ];

        if report.icon_failures > 0 {
            rows.push(SummaryRow {
                key: "Broken Icons",
                value: self.format_number(report.icon_failures),
            });
        }

        Self::styled(Table::new(rows))
    }

    /// Generate an item listing
    pub fn item_list(&self, items: &[&Item]) -> Result<String> {
        match self.format {
            ReportFormat::ConsoleTable => Ok(self.list_table(items)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        }
    }

    fn list_table(&self, items: &[&Item]) -> String {
        #[derive(Tabled)]
        struct ItemRow<'a> {
            #[tabled(rename = "ID")]
            id: &'a str,

            #[tabled(rename = "Name")]
            name: &'a str,

            #[tabled(rename = "Log Name")]
            log_name: &'a str,

            #[tabled(rename = "Icon")]
            icon: &'static str,
        }

        let rows = items.iter().map(|item| ItemRow {
            id: &item.id,
            name: &item.name,
            log_name: item.attribute("log-name-singular").unwrap_or(""),
            icon: if item.icon.is_some() { "yes" } else { "-" },
        });

        Self::styled(Table::new(rows))
    }

    /// Generate item details as plain lines or JSON
    pub fn item_details(&self, item: &Item) -> Result<String> {
        let details = ItemDetails::new(item);
        match self.format {
            ReportFormat::ConsoleTable => Ok(details
                .lines
                .iter()
                .map(DetailLine::to_string)
                .collect::<Vec<_>>()
                .join("\n")),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(&details)?),
        }
    }
}
