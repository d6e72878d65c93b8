/*!
 * Command-line interface for itemview
 */

use std::io::{self, IsTerminal};
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};

use chrono::Local;
use clap::{CommandFactory, Parser};
use crossterm::style::{style, Color, Stylize};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};

use itemview::clipboard::copy_to_clipboard;
use itemview::config::{Action, Args, Config};
use itemview::detail::{self, DetailLine};
use itemview::report::{LoadReport, ReportFormat, Reporter};
use itemview::sql::{insert_statement, SqlWriter};
use itemview::types::{Catalog, Item};
use itemview::{error, ItemViewError, Loader, Result};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Parse command line arguments
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // Create and validate configuration
    let config = Config::from_args(args)?;
    config.validate()?;

    if let Action::Completions(shell) = config.action {
        clap_complete::generate(shell, &mut Args::command(), "itemview", &mut io::stdout());
        return Ok(());
    }

    let input = config
        .input_file
        .as_deref()
        .ok_or_else(|| error!(Config, "no input file given"))?;
    let reporter = Reporter::new(config.format);
    let (catalog, load_report) = load_catalog(input)?;

    match config.action {
        Action::List { query } => {
            let query = query.unwrap_or_default();
            let items = catalog.search(&query);
            println!("{}", reporter.item_list(&items)?);

            if config.format == ReportFormat::ConsoleTable {
                if query.trim().is_empty() {
                    println!("Successfully loaded {} usable items.", items.len());
                } else {
                    println!("Found {} items matching '{}'.", items.len(), query.trim());
                }
                println!("\n{}", reporter.load_summary(&load_report)?);
            }
        }
        Action::Show {
            key,
            save_icon,
            color,
        } => {
            let item = find_item(&catalog, &key)?;
            let colored = color
                && config.format == ReportFormat::ConsoleTable
                && io::stdout().is_terminal();

            if colored {
                for line in detail::render(item) {
                    println!("{}", colorize(&line));
                }
            } else {
                println!("{}", reporter.item_details(item)?);
            }

            if let Some(path) = save_icon {
                save_item_icon(item, &path)?;
            }
        }
        Action::Sql { key, clip } => {
            let item = find_item(&catalog, &key)?;
            let statement = insert_statement(item);
            println!("{}", statement);

            if clip {
                copy_to_clipboard(&statement)?;
                eprintln!("SQL statement copied to clipboard");
            }
        }
        Action::Export { output_file } => {
            let writer = SqlWriter::new(output_file);
            let written = writer.write(catalog.usable())?;
            debug!("export finished, {} rows", written);
            println!(
                "Successfully exported {} items to: {}",
                written,
                writer.output_file().display()
            );
        }
        Action::Completions(_) => {}
    }

    Ok(())
}

/// Load the export behind a spinner and summarize the pass
fn load_catalog(input: &Path) -> Result<(Catalog, LoadReport)> {
    let progress = ProgressBar::new_spinner();
    if let Ok(spinner) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos} items")
    {
        progress.set_style(spinner);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("Loading");

    let loader = Loader::new(progress.clone());
    let start_time = Instant::now();
    let result = loader.load(input);
    progress.finish_and_clear();
    let catalog = result?;

    let stats = loader.get_statistics();
    let report = LoadReport {
        source: input.display().to_string(),
        loaded_at: Local::now().to_rfc3339(),
        duration: start_time.elapsed(),
        bytes_read: stats.bytes_read,
        items_found: stats.items_found,
        usable_items: catalog.usable_count(),
        icons_decoded: stats.icons_decoded,
        icon_failures: stats.icon_failures,
    };
    debug!(
        "loaded {} ({} usable items) in {:?}",
        report.source, report.usable_items, report.duration
    );

    Ok((catalog, report))
}

fn find_item<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a Item> {
    catalog
        .find(key)
        .ok_or_else(|| ItemViewError::ItemNotFound(key.to_string()))
}

/// Render a detail line, painting its accent span in the accent color
fn colorize(line: &DetailLine) -> String {
    match line.split_accent() {
        Some((before, accent, after, rgb)) => {
            let color = Color::Rgb {
                r: rgb.r,
                g: rgb.g,
                b: rgb.b,
            };
            format!("{}{}{}", before, style(accent).with(color), after)
        }
        None => line.text.clone(),
    }
}

fn save_item_icon(item: &Item, path: &Path) -> Result<()> {
    match &item.icon {
        Some(icon) => {
            icon.save(path)?;
            eprintln!("Icon written to {}", path.display());
        }
        None => warn!("item {} has no icon to save", item.id),
    }
    Ok(())
}
