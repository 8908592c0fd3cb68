//! Run service - load, obfuscate, verify, publish
//!
//! One run:
//! 1. loads the production records named by the prod properties file
//! 2. obfuscates them
//! 3. checks record counts (owners must never shrink)
//! 4. points the integration properties file at the `_prod` records
//! 5. writes the obfuscated records next to the integration records
//!
//! Nothing is written when step 3 or 4 fails. When step 5 fails, a
//! properties file switched by this run is restored.

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::csv_store::CsvRecordStore;
use crate::adapters::jitter::{SeededJitter, ThreadJitter};
use crate::config::{Config, PersisterProperties, PROD_SUFFIX};
use crate::domain::result::{Error, Result};
use crate::domain::RecordCounts;
use crate::ports::{EventSink, JitterSource, LogEvent, RecordStore, SaveSummary};
use crate::services::obfuscation::{ObfuscationService, SkippedRecord};
use crate::services::persister::{PersisterConfigService, SwitchOutcome};
use crate::services::status::{summarize, SnapshotSummary};

/// What a run did
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: RecordCounts,
    pub output: RecordCounts,
    pub skipped: Vec<SkippedRecord>,
    /// Non-fatal count differences
    pub warnings: Vec<String>,
    /// Summary of the obfuscated snapshot
    pub summary: SnapshotSummary,
    pub switch: Option<SwitchOutcome>,
    pub saved: Option<SaveSummary>,
    pub dry_run: bool,
}

/// Compare collection sizes before and after obfuscation
///
/// Fewer owners is always fatal. Fewer accounts or register entries is a
/// warning, or fatal when `strict` is set.
pub fn verify_counts(input: RecordCounts, output: RecordCounts, strict: bool) -> Result<Vec<String>> {
    if output.owners != input.owners {
        return Err(Error::CountMismatch {
            collection: "owners",
            expected: input.owners,
            actual: output.owners,
        });
    }

    let mut warnings = Vec::new();
    let others = [
        ("accounts", input.accounts, output.accounts),
        ("register entries", input.register_entries, output.register_entries),
    ];
    for (collection, expected, actual) in others {
        if expected == actual {
            continue;
        }
        if strict || actual > expected {
            return Err(Error::CountMismatch {
                collection,
                expected,
                actual,
            });
        }
        warnings.push(format!(
            "{} {} dropped ({} of {} kept)",
            expected - actual,
            collection,
            actual,
            expected
        ));
    }

    Ok(warnings)
}

/// Orchestrates one obfuscation run
pub struct RunService {
    config: Config,
    obfuscation: ObfuscationService,
    sink: Arc<dyn EventSink>,
}

impl RunService {
    /// Jitter comes from `config.seed` when set, fresh randomness otherwise
    pub fn new(config: Config, sink: Arc<dyn EventSink>) -> Self {
        let jitter: Arc<dyn JitterSource> = match config.seed {
            Some(seed) => Arc::new(SeededJitter::new(seed)),
            None => Arc::new(ThreadJitter),
        };
        Self::with_jitter(config, jitter, sink)
    }

    pub fn with_jitter(config: Config, jitter: Arc<dyn JitterSource>, sink: Arc<dyn EventSink>) -> Self {
        let obfuscation = ObfuscationService::new(jitter, Arc::clone(&sink));
        Self {
            config,
            obfuscation,
            sink,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run against the CSV stores named by the configured properties files
    pub fn run(&self, dry_run: bool) -> Result<RunReport> {
        self.tracked(dry_run, || {
            let prod_props = PersisterProperties::load(&self.config.prod_properties)?;
            let integ_props = PersisterProperties::load(&self.config.integ_properties)?;

            let source = CsvRecordStore::from_properties(&prod_props);
            let target = CsvRecordStore::from_properties(&integ_props).with_suffix(PROD_SUFFIX);

            self.execute_inner(&source, &target, dry_run)
        })
    }

    /// Run against explicit stores
    pub fn execute(
        &self,
        source: &dyn RecordStore,
        target: &dyn RecordStore,
        dry_run: bool,
    ) -> Result<RunReport> {
        self.tracked(dry_run, || self.execute_inner(source, target, dry_run))
    }

    /// Bracket a run with started/completed/failed events
    fn tracked(&self, dry_run: bool, run: impl FnOnce() -> Result<RunReport>) -> Result<RunReport> {
        self.sink.record(LogEvent::new("run_started"));

        let result = run();
        match &result {
            Ok(report) => {
                tracing::info!(
                    owners = report.output.owners,
                    accounts = report.output.accounts,
                    register_entries = report.output.register_entries,
                    dry_run,
                    "run completed"
                );
                self.sink.record(LogEvent::new("run_completed"));
            }
            Err(e) => {
                tracing::error!(error = %e, "run failed");
                self.sink.record(LogEvent::new("run_failed").with_error(e.to_string()));
            }
        }
        result
    }

    fn execute_inner(
        &self,
        source: &dyn RecordStore,
        target: &dyn RecordStore,
        dry_run: bool,
    ) -> Result<RunReport> {
        tracing::info!("loading production records");
        let original = source.load()?;
        let input = original.counts();

        tracing::info!("obfuscating records");
        let outcome = self.obfuscation.obfuscate_with_report(&original);
        let output = outcome.snapshot.counts();

        tracing::info!(
            owners = input.owners,
            accounts = input.accounts,
            register_entries = input.register_entries,
            "original record counts"
        );
        tracing::info!(
            owners = output.owners,
            accounts = output.accounts,
            register_entries = output.register_entries,
            "obfuscated record counts"
        );

        let warnings = verify_counts(input, output, self.config.strict_counts)?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
            self.sink.record(LogEvent::warn("records_dropped").with_error_details(warning.clone()));
        }

        let mut report = RunReport {
            input,
            output,
            skipped: outcome.skipped,
            warnings,
            summary: summarize(&outcome.snapshot),
            switch: None,
            saved: None,
            dry_run,
        };
        if dry_run {
            return Ok(report);
        }

        tracing::info!("saving obfuscated records");
        let persister = PersisterConfigService::new(&self.config.integ_properties);
        let switch = persister.switch_to_prod()?;
        match target.save(&outcome.snapshot) {
            Ok(saved) => report.saved = Some(saved),
            Err(e) => {
                // Undo the switch only when this run created the backup
                if switch.backup.is_some() {
                    match persister.restore() {
                        Ok(()) => tracing::warn!("save failed, integration properties restored"),
                        Err(restore_err) => tracing::error!(
                            error = %restore_err,
                            "save failed and integration properties could not be restored"
                        ),
                    }
                }
                return Err(e);
            }
        }
        report.switch = Some(switch);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(owners: usize, accounts: usize, register_entries: usize) -> RecordCounts {
        RecordCounts {
            owners,
            accounts,
            register_entries,
        }
    }

    #[test]
    fn test_equal_counts_pass() {
        let warnings = verify_counts(counts(2, 3, 4), counts(2, 3, 4), true).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_owner_shrink_is_fatal() {
        let err = verify_counts(counts(2, 3, 4), counts(1, 3, 4), false).unwrap_err();
        assert!(matches!(
            err,
            Error::CountMismatch {
                collection: "owners",
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_account_shrink_warns_unless_strict() {
        let warnings = verify_counts(counts(2, 3, 4), counts(2, 2, 4), false).unwrap();
        assert_eq!(warnings, vec!["1 accounts dropped (2 of 3 kept)".to_string()]);

        let err = verify_counts(counts(2, 3, 4), counts(2, 2, 4), true).unwrap_err();
        assert!(err.is_count_mismatch());
    }

    #[test]
    fn test_growth_is_always_fatal() {
        assert!(verify_counts(counts(1, 1, 1), counts(1, 1, 2), false).is_err());
    }
}
