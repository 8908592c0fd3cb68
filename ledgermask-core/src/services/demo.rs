//! Demo service - lays out a sample workspace for a trial run
//!
//! ```text
//! <dir>/prod/persister_prod.properties      persisted.dir=records
//! <dir>/prod/records/{owners,checking,savings,register}.csv
//! <dir>/integ/persister_integ.properties    persisted.dir=records, persisted.suffix=_integ
//! <dir>/integ/records/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::adapters::csv_store::CsvRecordStore;
use crate::adapters::demo::generate_demo_snapshot;
use crate::config::{Config, PersisterProperties, PERSISTED_DIR_KEY, PERSISTED_SUFFIX_KEY};
use crate::domain::result::Result;
use crate::domain::RecordCounts;
use crate::ports::RecordStore;

const RECORDS_DIR: &str = "records";
const INTEG_SUFFIX: &str = "_integ";

/// Where a demo workspace was written
#[derive(Debug, Clone, Serialize)]
pub struct DemoLayout {
    pub prod_properties: PathBuf,
    pub integ_properties: PathBuf,
    pub counts: RecordCounts,
}

impl DemoLayout {
    /// Run configuration pointing at this workspace
    pub fn config(&self) -> Config {
        Config {
            prod_properties: self.prod_properties.clone(),
            integ_properties: self.integ_properties.clone(),
            ..Config::default()
        }
    }
}

/// Demo service for creating sample workspaces
pub struct DemoService {
    dir: PathBuf,
}

impl DemoService {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Write sample production records and both properties files
    ///
    /// Existing files in the layout are overwritten.
    pub fn create(&self, owners: usize, end: NaiveDate) -> Result<DemoLayout> {
        let prod_dir = self.dir.join("prod");
        let integ_dir = self.dir.join("integ");
        fs::create_dir_all(integ_dir.join(RECORDS_DIR))?;
        fs::create_dir_all(prod_dir.join(RECORDS_DIR))?;

        let prod_properties = prod_dir.join("persister_prod.properties");
        let mut prod = PersisterProperties::parse(&prod_properties, "");
        prod.set(PERSISTED_DIR_KEY, RECORDS_DIR);
        prod.set(PERSISTED_SUFFIX_KEY, "");
        fs::write(&prod_properties, prod.render("Production record files"))?;

        let integ_properties = integ_dir.join("persister_integ.properties");
        let mut integ = PersisterProperties::parse(&integ_properties, "");
        integ.set(PERSISTED_DIR_KEY, RECORDS_DIR);
        integ.set(PERSISTED_SUFFIX_KEY, INTEG_SUFFIX);
        fs::write(&integ_properties, integ.render("Integration test record files"))?;

        let snapshot = generate_demo_snapshot(owners, end);
        CsvRecordStore::from_properties(&prod).save(&snapshot)?;

        Ok(DemoLayout {
            prod_properties,
            integ_properties,
            counts: snapshot.counts(),
        })
    }
}
