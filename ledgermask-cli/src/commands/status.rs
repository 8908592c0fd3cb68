//! Status command - summarize the records behind a properties file

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;
use crate::output;
use ledgermask_core::adapters::csv_store::CsvRecordStore;
use ledgermask_core::config::PersisterProperties;
use ledgermask_core::services::StatusService;

pub fn run(prod: Option<PathBuf>, json: bool) -> Result<()> {
    let path = match prod {
        Some(path) => path,
        None => get_context()?.config.prod_properties,
    };

    let props = PersisterProperties::load(&path)?;
    let store = CsvRecordStore::from_properties(&props);
    let status = StatusService::new(Arc::new(store)).get_status()?;

    if json {
        return output::print_json(&status);
    }

    println!("{}", "Record Status".bold());
    println!("{}", path.display().to_string().dimmed());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Owners", &status.total_owners.to_string()]);
    table.add_row(vec!["Checking accounts", &status.checking_accounts.to_string()]);
    table.add_row(vec!["Savings accounts", &status.savings_accounts.to_string()]);
    if status.unrecognized_accounts > 0 {
        table.add_row(vec!["Unrecognized accounts", &status.unrecognized_accounts.to_string()]);
    }
    table.add_row(vec!["Total balance", &status.total_balance.to_string()]);
    table.add_row(vec!["Register entries", &status.total_register_entries.to_string()]);

    println!("{}", table);

    if let (Some(earliest), Some(latest)) = (&status.date_range.earliest, &status.date_range.latest) {
        println!();
        println!("Date range: {} to {}", earliest, latest);
    }

    Ok(())
}
