//! Configuration management
//!
//! Two kinds of configuration are involved in a run:
//!
//! - `Config`: ledgermask's own settings, read from `settings.json` in the
//!   ledgermask directory:
//!   ```json
//!   {
//!     "prodProperties": "src/main/resources/persister_prod.properties",
//!     "integProperties": "src/test/resources/persister_integ.properties",
//!     "strictCounts": false,
//!     "seed": null
//!   }
//!   ```
//! - `PersisterProperties`: the `.properties` files shared with the
//!   downstream test suite, which say where record files live.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

pub const DEFAULT_PROD_PROPERTIES: &str = "persister_prod.properties";
pub const DEFAULT_INTEG_PROPERTIES: &str = "src/test/resources/persister_integ.properties";

/// Key naming the directory that holds the record files
pub const PERSISTED_DIR_KEY: &str = "persisted.dir";
/// Key naming the file-name suffix of the record files
pub const PERSISTED_SUFFIX_KEY: &str = "persisted.suffix";
/// Suffix the integration suite is pointed at after a run
pub const PROD_SUFFIX: &str = "_prod";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    prod_properties: Option<PathBuf>,
    #[serde(default)]
    integ_properties: Option<PathBuf>,
    #[serde(default)]
    strict_counts: bool,
    #[serde(default)]
    seed: Option<u64>,
}

/// Settings for one obfuscation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Properties file describing the production records to read
    pub prod_properties: PathBuf,
    /// Properties file the integration suite reads; rewritten by a run
    pub integ_properties: PathBuf,
    /// Treat any account or register entry loss as fatal, not just owners
    pub strict_counts: bool,
    /// Fixed jitter seed for repeatable output
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prod_properties: PathBuf::from(DEFAULT_PROD_PROPERTIES),
            integ_properties: PathBuf::from(DEFAULT_INTEG_PROPERTIES),
            strict_counts: false,
            seed: None,
        }
    }
}

impl Config {
    /// Load config from the ledgermask directory
    ///
    /// Strict counting can also be forced with LEDGERMASK_STRICT_COUNTS
    /// (for CI).
    pub fn load(ledgermask_dir: &Path) -> Result<Self> {
        let settings_path = ledgermask_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content)?
        } else {
            SettingsFile::default()
        };

        let strict_counts = match std::env::var("LEDGERMASK_STRICT_COUNTS").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.strict_counts,
        };

        let defaults = Self::default();
        Ok(Self {
            prod_properties: raw.prod_properties.unwrap_or(defaults.prod_properties),
            integ_properties: raw.integ_properties.unwrap_or(defaults.integ_properties),
            strict_counts,
            seed: raw.seed,
        })
    }

    /// Save config to the ledgermask directory
    pub fn save(&self, ledgermask_dir: &Path) -> Result<()> {
        let settings = SettingsFile {
            prod_properties: Some(self.prod_properties.clone()),
            integ_properties: Some(self.integ_properties.clone()),
            strict_counts: self.strict_counts,
            seed: self.seed,
        };

        std::fs::create_dir_all(ledgermask_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(ledgermask_dir.join("settings.json"), content)?;
        Ok(())
    }
}

/// A `.properties` file, keys kept in file order
///
/// Supports `key=value`, `key: value` and `key value` lines; `#` and `!`
/// start comment lines. Comments are not preserved on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersisterProperties {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl PersisterProperties {
    /// Read a properties file; a missing file is a configuration error
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::config(format!(
                "Properties file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(path, &content))
    }

    /// Parse properties text as if it had been read from `path`
    pub fn parse(path: &Path, content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
            .map(split_property)
            .collect();

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a key, replacing it in place or appending it
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Record directory; relative values resolve against the file's directory
    pub fn persisted_dir(&self) -> PathBuf {
        let dir = PathBuf::from(self.get(PERSISTED_DIR_KEY).unwrap_or("."));
        if dir.is_absolute() {
            return dir;
        }
        match self.path.parent() {
            Some(parent) => parent.join(dir),
            None => dir,
        }
    }

    pub fn persisted_suffix(&self) -> String {
        self.get(PERSISTED_SUFFIX_KEY).unwrap_or_default().to_string()
    }

    /// Render as properties text under a `#`-prefixed header
    pub fn render(&self, header: &str) -> String {
        let mut out = String::new();
        for line in header.lines() {
            out.push('#');
            out.push_str(line);
            out.push('\n');
        }
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

fn split_property(line: &str) -> (String, String) {
    match line.find(['=', ':', ' ', '\t']) {
        Some(idx) => {
            let key = line[..idx].trim_end();
            let rest = line[idx..].trim_start();
            let value = rest
                .strip_prefix(['=', ':'])
                .unwrap_or(rest)
                .trim_start();
            (key.to_string(), value.to_string())
        }
        None => (line.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_properties_forms() {
        let props = PersisterProperties::parse(
            Path::new("/conf/persister.properties"),
            "# comment\n! other comment\n\npersisted.dir = data\npersisted.suffix:_integ\nflag\nname value with spaces\n",
        );

        assert_eq!(props.get("persisted.dir"), Some("data"));
        assert_eq!(props.get("persisted.suffix"), Some("_integ"));
        assert_eq!(props.get("flag"), Some(""));
        assert_eq!(props.get("name"), Some("value with spaces"));
        assert_eq!(props.get("missing"), None);
    }

    #[test]
    fn test_persisted_dir_resolves_against_file() {
        let props = PersisterProperties::parse(
            Path::new("/conf/persister.properties"),
            "persisted.dir=records\n",
        );
        assert_eq!(props.persisted_dir(), PathBuf::from("/conf/records"));

        let absolute = PersisterProperties::parse(
            Path::new("/conf/persister.properties"),
            "persisted.dir=/var/records\n",
        );
        assert_eq!(absolute.persisted_dir(), PathBuf::from("/var/records"));
    }

    #[test]
    fn test_defaults_when_keys_absent() {
        let props = PersisterProperties::parse(Path::new("/conf/p.properties"), "");
        assert_eq!(props.persisted_dir(), PathBuf::from("/conf/."));
        assert_eq!(props.persisted_suffix(), "");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut props = PersisterProperties::parse(
            Path::new("p.properties"),
            "persisted.dir=data\npersisted.suffix=\nother=1\n",
        );
        props.set(PERSISTED_SUFFIX_KEY, PROD_SUFFIX);
        props.set("added", "2");

        assert_eq!(
            props.render("header"),
            "#header\npersisted.dir=data\npersisted.suffix=_prod\nother=1\nadded=2\n"
        );
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = tempdir().unwrap();
        let err = PersisterProperties::load(&dir.path().join("nope.properties")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempdir().unwrap();
        let config = Config {
            prod_properties: PathBuf::from("prod.properties"),
            integ_properties: PathBuf::from("integ.properties"),
            strict_counts: true,
            seed: Some(42),
        };
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.prod_properties, config.prod_properties);
        assert_eq!(loaded.integ_properties, config.integ_properties);
        assert_eq!(loaded.seed, Some(42));
    }

    #[test]
    fn test_config_defaults_without_settings() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.prod_properties, PathBuf::from(DEFAULT_PROD_PROPERTIES));
        assert_eq!(config.seed, None);
    }
}
