//! Persister config service - points the integration suite at obfuscated data
//!
//! The integration test suite reads a `.properties` file to find its record
//! files. Switching rewrites `persisted.suffix` to `_prod` so the suite picks
//! up the `*_prod.csv` files a run writes. The untouched file is kept next to
//! it as `<name>.orig` until `restore` puts it back.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;

use crate::config::{PersisterProperties, PERSISTED_SUFFIX_KEY, PROD_SUFFIX};
use crate::domain::result::{Error, Result};

const BACKUP_EXTENSION: &str = "orig";

/// What a switch changed
#[derive(Debug, Clone, Serialize)]
pub struct SwitchOutcome {
    pub path: PathBuf,
    pub previous_suffix: String,
    /// Set when this switch created the backup
    pub backup: Option<PathBuf>,
}

/// Switches one integration properties file between its own records and
/// the obfuscated production records
pub struct PersisterConfigService {
    path: PathBuf,
}

impl PersisterConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the unmodified file is kept while switched
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(BACKUP_EXTENSION);
        self.path.with_file_name(name)
    }

    /// Open the properties file for update; it must exist and be writable
    fn open_writable(&self) -> Result<File> {
        if !self.path.is_file() {
            return Err(Error::config(format!(
                "Properties file must exist and be writable: {}",
                self.path.display()
            )));
        }

        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| match e.kind() {
                ErrorKind::PermissionDenied => Error::config(format!(
                    "Properties file must exist and be writable: {}",
                    self.path.display()
                )),
                _ => Error::Io(e),
            })
    }

    /// Set `persisted.suffix=_prod`, keeping a backup of the original
    pub fn switch_to_prod(&self) -> Result<SwitchOutcome> {
        let mut file = self.open_writable()?;
        file.lock_exclusive()?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;

        let mut props = PersisterProperties::parse(&self.path, &content);
        let previous_suffix = props.persisted_suffix();

        let backup_path = self.backup_path();
        let backup = if backup_path.exists() {
            None
        } else {
            fs::write(&backup_path, &content)?;
            Some(backup_path)
        };

        props.set(PERSISTED_SUFFIX_KEY, PROD_SUFFIX);
        let header = format!(
            "Note: Don't check in changes to this file!!\n\
             Modified by ledgermask\n\
             to reset run 'ledgermask integ restore {}'",
            self.path.display()
        );

        file.seek(SeekFrom::Start(0))?;
        file.set_len(0)?;
        file.write_all(props.render(&header).as_bytes())?;
        file.flush()?;
        file.unlock()?;

        tracing::info!(path = %self.path.display(), "updated integration properties file");

        Ok(SwitchOutcome {
            path: self.path.clone(),
            previous_suffix,
            backup,
        })
    }

    /// Put the original file back
    pub fn restore(&self) -> Result<()> {
        let backup_path = self.backup_path();
        if !backup_path.exists() {
            return Err(Error::not_found(format!(
                "No backup to restore: {}",
                backup_path.display()
            )));
        }

        fs::rename(&backup_path, &self.path)?;
        tracing::info!(path = %self.path.display(), "restored integration properties file");
        Ok(())
    }

    /// Whether the file currently points at the obfuscated records
    pub fn is_switched(&self) -> Result<bool> {
        let props = PersisterProperties::load(&self.path)?;
        Ok(props.persisted_suffix() == PROD_SUFFIX)
    }
}
