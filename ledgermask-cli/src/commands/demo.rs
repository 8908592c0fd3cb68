//! Demo command - create a sample workspace

use std::path::Path;

use anyhow::{Context, Result};

use crate::output;
use ledgermask_core::services::DemoService;

pub fn run(dir: &Path, owners: usize, json: bool) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let layout = DemoService::new(dir)
        .create(owners, today)
        .with_context(|| format!("Failed to create demo workspace in {}", dir.display()))?;

    if json {
        return output::print_json(&layout);
    }

    output::success(&format!(
        "Created {} owners, {} accounts, {} register entries",
        layout.counts.owners, layout.counts.accounts, layout.counts.register_entries
    ));
    println!("  Production properties:  {}", layout.prod_properties.display());
    println!("  Integration properties: {}", layout.integ_properties.display());
    println!();
    output::info(&format!(
        "Try: ledgermask run --prod {} --integ {}",
        layout.prod_properties.display(),
        layout.integ_properties.display()
    ));

    Ok(())
}
