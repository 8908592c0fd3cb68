//! Run command - obfuscate production records and publish them

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;
use ledgermask_core::services::RunReport;
use ledgermask_core::{EventSink, LogEvent, RunService};

/// Overrides for the configured run
pub struct RunArgs {
    pub prod: Option<PathBuf>,
    pub integ: Option<PathBuf>,
    pub seed: Option<u64>,
    pub strict: bool,
    pub dry_run: bool,
    pub json: bool,
}

pub fn run(args: RunArgs) -> Result<()> {
    let ctx = get_context()?;

    let mut config = ctx.config.clone();
    if let Some(prod) = args.prod {
        config.prod_properties = prod;
    }
    if let Some(integ) = args.integ {
        config.integ_properties = integ;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.strict_counts |= args.strict;

    let sink = ctx.run_sink(args.dry_run);
    sink.record(LogEvent::new("command_run").with_command("run"));

    let report = RunService::new(config, sink).run(args.dry_run)?;

    if args.json {
        return output::print_json(&report);
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    println!("{}", "Record Counts".bold());

    let mut table = output::create_table(&["Collection", "Production", "Obfuscated"]);
    table.add_row(vec![
        "Owners".to_string(),
        report.input.owners.to_string(),
        report.output.owners.to_string(),
    ]);
    table.add_row(vec![
        "Accounts".to_string(),
        report.input.accounts.to_string(),
        report.output.accounts.to_string(),
    ]);
    table.add_row(vec![
        "Register entries".to_string(),
        report.input.register_entries.to_string(),
        report.output.register_entries.to_string(),
    ]);
    println!("{}", table);

    let summary = &report.summary;
    println!(
        "Obfuscated: {} checking, {} savings, total balance {}",
        summary.checking_accounts, summary.savings_accounts, summary.total_balance
    );
    if let (Some(earliest), Some(latest)) = (&summary.date_range.earliest, &summary.date_range.latest) {
        println!("Register dates: {} to {}", earliest, latest);
    }

    if !report.skipped.is_empty() {
        println!();
        println!("{}", "Skipped Records".bold());
        for skipped in &report.skipped {
            println!("  {} {}: {}", skipped.kind, skipped.id, skipped.reason);
        }
    }

    for warning in &report.warnings {
        output::warning(&format!("Warning: {}", warning));
    }

    println!();
    if report.dry_run {
        output::info("Dry run: nothing was written.");
        return;
    }

    if let Some(switch) = &report.switch {
        println!(
            "Integration properties: {} (suffix {:?} -> \"_prod\")",
            switch.path.display(),
            switch.previous_suffix
        );
        if let Some(backup) = &switch.backup {
            println!("  Original saved as {}", backup.display());
        }
    }

    if let Some(saved) = &report.saved {
        for target in &saved.targets {
            println!("  wrote {}", target.dimmed());
        }
        if saved.unwritable > 0 {
            output::warning(&format!("{} accounts could not be written", saved.unwritable));
        }
    }

    output::success("Obfuscated records published.");
}
