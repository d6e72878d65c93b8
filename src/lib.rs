/*!
 * itemview - Browse and export FFXI item XML dumps
 *
 * This library loads item records from XML exports, decodes their
 * lookup-encoded attributes into readable details and produces
 * `item_basic` SQL INSERT statements.
 */

pub mod clipboard;
pub mod config;
pub mod detail;
pub mod error;
pub mod icon;
pub mod loader;
pub mod report;
pub mod sql;
pub mod tables;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use config::{Action, Config};
pub use error::{ItemViewError, Result};
pub use icon::Icon;
pub use loader::{LoadStatistics, Loader};
pub use report::{ItemDetails, LoadReport, ReportFormat, Reporter};
pub use sql::{insert_statement, SqlWriter};
pub use types::{Catalog, Item};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
