//! Display utilities for statuses, batch results and container headers.

use std::path::Path;

use bytesize::ByteSize;
use chrono::DateTime;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, Table};
use console::style;

use crate::config::{CURRENT_VERSION, HEADER_SIZE, TAG_SIZE};
use crate::container::Container;
use crate::types::{FileOutcome, Status};

/// Prints the status line for a password check.
pub fn show_status(status: Status) {
    let line = match status {
        Status::Checking => style(status.to_string()).cyan(),
        Status::Correct => style(status.to_string()).green().bold(),
        Status::Incorrect => style(status.to_string()).yellow().bold(),
        Status::Error => style(status.to_string()).red().bold(),
    };
    println!("{line}");
}

pub fn show_saved(name: &str, path: &Path) {
    println!("{} {} {}", style("✓").green(), style(name).bold(), style(format!("-> {}", path.display())).dim());
}

/// Reports a file that could not be unlocked.
///
/// The cause is deliberately not shown: a missing file, a damaged one and
/// a wrong password must look the same.
pub fn show_unavailable(name: &str) {
    println!("{} {} {}", style("✗").red(), style(name).bold(), style("could not be unlocked").red());
}

/// Prints one line per batch entry followed by a count.
pub fn show_outcomes(outcomes: &[FileOutcome]) {
    println!();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Written(path) => println!("{} {}", style("✓").green(), path.display()),
            FileOutcome::Skipped(path) => println!("{} {} {}", style("-").yellow(), path.display(), style("(skipped)").dim()),
            FileOutcome::Failed(path, reason) => println!("{} {} {}", style("✗").red(), path.display(), style(reason).red()),
        }
    }

    let written = outcomes.iter().filter(|outcome| outcome.is_written()).count();
    println!();
    println!("{}", style(format!("{written} of {} file(s) encrypted", outcomes.len())).bold());
}

/// Builds the header table for `inspect`.
pub fn inspect_table(container: &Container<'_>, total: usize) -> Table {
    let metadata = container.metadata();
    let written = metadata
        .timestamp()
        .map(|ts| DateTime::from_timestamp_millis(ts).map_or_else(|| ts.to_string(), |dt| dt.to_rfc3339()))
        .unwrap_or_else(|| "-".to_owned());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![Cell::new("Field"), Cell::new("Value")]);
    table.add_row(vec![Cell::new("Version"), Cell::new(CURRENT_VERSION)]);
    table.add_row(vec![Cell::new("Salt"), Cell::new(hex::encode(container.salt()))]);
    table.add_row(vec![Cell::new("Nonce"), Cell::new(hex::encode(container.nonce()))]);
    table.add_row(vec![Cell::new("Name"), Cell::new(metadata.name().unwrap_or("-"))]);
    table.add_row(vec![Cell::new("MIME"), Cell::new(metadata.mime())]);
    table.add_row(vec![Cell::new("Written"), Cell::new(written)]);
    table.add_row(vec![Cell::new("Metadata"), Cell::new(ByteSize::b(container.metadata_bytes().len() as u64))]);
    table.add_row(vec![Cell::new("Payload"), Cell::new(ByteSize::b(container.ciphertext().len().saturating_sub(TAG_SIZE) as u64))]);
    table.add_row(vec![Cell::new("Total"), Cell::new(format!("{} ({} header)", ByteSize::b(total as u64), HEADER_SIZE))]);
    table
}

pub fn show_inspect(path: &Path, container: &Container<'_>, total: usize) {
    println!("{}", style(path.display()).bold());
    println!("{}", inspect_table(container, total));
}
