/*!
 * `item_basic` SQL export
 */

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;
use crate::error;
use crate::tables::{flag_value, NOT_SELLABLE_FLAG};
use crate::types::Item;
use crate::utils::{contains_ignore_case, parse_hex, sql_identifier};

/// Default file name for a full export
pub const DEFAULT_EXPORT_FILE: &str = "item_basic_export.sql";

/// Build the `item_basic` INSERT statement for an item
pub fn insert_statement(item: &Item) -> String {
    let name = sql_identifier(item.display_name());
    let shortname = sql_identifier(item.attribute("name").unwrap_or(item.name.as_str()));
    let stack_size = item.attribute("stack-size").unwrap_or("1");

    let flags = item.attribute("flags").and_then(parse_hex).unwrap_or(0);
    let not_sellable = flag_value(NOT_SELLABLE_FLAG).unwrap_or(0);
    let no_sale = u8::from(flags & not_sellable != 0);

    let export_term = if contains_ignore_case(&item.description, "Furnishing") {
        "@FURNISHINGS"
    } else {
        "@NONE"
    };

    format!(
        "INSERT INTO `item_basic` VALUES ({},0,'{}','{}',{},{},'{}',{},0);",
        item.id, name, shortname, stack_size, flags, export_term, no_sale
    )
}

/// SQL writer for a full export
pub struct SqlWriter {
    /// Destination file
    output_file: PathBuf,
}

impl SqlWriter {
    /// Create a new SQL writer
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
        }
    }

    /// Destination file
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Write one statement per usable item, returning the number written.
    ///
    /// Rows go to a sibling `.partial` file that replaces the destination
    /// only once every row is written. On failure the partial file is
    /// removed and the destination is left as it was.
    pub fn write<'a, I>(&self, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let partial = self.partial_path();
        debug!("writing SQL export to {}", partial.display());

        match self.write_rows(&partial, items) {
            Ok(count) => {
                fs::rename(&partial, &self.output_file).map_err(|e| {
                    let _ = fs::remove_file(&partial);
                    error!(Export, "{}: {}", self.output_file.display(), e)
                })?;
                Ok(count)
            }
            Err(e) => {
                let _ = fs::remove_file(&partial);
                Err(error!(Export, "{}: {}", self.output_file.display(), e))
            }
        }
    }

    fn write_rows<'a, I>(&self, path: &Path, items: I) -> std::io::Result<usize>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        let mut count = 0;

        for item in items.into_iter().filter(|item| !item.is_placeholder()) {
            writeln!(writer, "{}", insert_statement(item))?;
            count += 1;
        }

        writer.flush()?;
        Ok(count)
    }

    fn partial_path(&self) -> PathBuf {
        let mut name = self
            .output_file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_EXPORT_FILE.into());
        name.push(".partial");
        self.output_file.with_file_name(name)
    }
}
