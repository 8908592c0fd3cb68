//! Integ command - point the integration properties file at obfuscated records

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Confirm;

use super::{get_logger, log_event};
use crate::output;
use ledgermask_core::services::PersisterConfigService;
use ledgermask_core::LogEvent;

#[derive(Subcommand)]
pub enum IntegCommands {
    /// Set persisted.suffix=_prod, keeping a backup of the file
    Switch {
        /// Integration properties file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Put the backed-up properties file back
    Restore {
        /// Integration properties file
        file: PathBuf,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Show whether the file points at obfuscated records
    Status {
        /// Integration properties file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: IntegCommands) -> Result<()> {
    let logger = get_logger();

    match command {
        IntegCommands::Switch { file, json } => {
            let outcome = PersisterConfigService::new(&file).switch_to_prod()?;
            log_event(&logger, LogEvent::new("integ_switched").with_command("integ switch"));

            if json {
                return output::print_json(&outcome);
            }

            output::success(&format!("Switched {} to _prod records", file.display()));
            if let Some(backup) = outcome.backup {
                println!("  Original saved as {}", backup.display());
            }
        }
        IntegCommands::Restore { file, force } => {
            let service = PersisterConfigService::new(&file);

            if !force
                && !Confirm::new()
                    .with_prompt(format!(
                        "Overwrite {} with {}?",
                        file.display(),
                        service.backup_path().display()
                    ))
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }

            service.restore()?;
            log_event(&logger, LogEvent::new("integ_restored").with_command("integ restore"));
            output::success(&format!("Restored {}", file.display()));
        }
        IntegCommands::Status { file, json } => {
            let service = PersisterConfigService::new(&file);
            let switched = service.is_switched()?;
            let backup = service.backup_path();
            let has_backup = backup.exists();

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "path": file.to_string_lossy(),
                        "switched": switched,
                        "backup": has_backup.then(|| backup.to_string_lossy().to_string()),
                    })
                );
                return Ok(());
            }

            if switched {
                output::warning(&format!("{} points at obfuscated _prod records", file.display()));
            } else {
                output::info(&format!("{} points at its own records", file.display()));
            }
            if has_backup {
                println!("  Backup: {}", backup.display());
            }
        }
    }

    Ok(())
}
