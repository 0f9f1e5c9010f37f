use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::store::schema::{EXPORT_VERSION, ExportData};
use crate::store::{KvStore, StoreError};

/// One pretty-printed JSON file per key under the data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sightwords")
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    fn write_synced(path: &Path, contents: &str) -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    }

    /// Replace every record with the export's contents.
    ///
    /// All records are first staged to `.tmp` files; if any staging write fails
    /// the staged files are removed and the live records are left untouched.
    /// Each original is then moved to `.bak` before its staged file takes its
    /// place. A failed rename restores every record committed so far.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.sightwords_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.sightwords_export_version,
                EXPORT_VERSION
            );
        }

        let records = data.records()?;
        let mut staged: Vec<PathBuf> = Vec::new();
        for (key, json) in &records {
            let tmp_path = self.file_path(key).with_extension("json.tmp");
            if let Err(e) = Self::write_synced(&tmp_path, json) {
                for tmp in &staged {
                    let _ = fs::remove_file(tmp);
                }
                let _ = fs::remove_file(&tmp_path);
                bail!("Import failed during staging: {e}");
            }
            staged.push(tmp_path);
        }

        let mut committed: Vec<Committed> = Vec::new();
        for (i, (key, _)) in records.iter().enumerate() {
            let entry = Committed {
                final_path: self.file_path(key),
                bak_path: self.file_path(key).with_extension("json.bak"),
                had_original: self.file_path(key).exists(),
            };

            if entry.had_original && let Err(e) = fs::rename(&entry.final_path, &entry.bak_path) {
                Self::roll_back(&committed, &staged[i..]);
                bail!("Import failed during commit of {key} (backup): {e}");
            }
            if let Err(e) = fs::rename(&staged[i], &entry.final_path) {
                committed.push(entry);
                Self::roll_back(&committed, &staged[i + 1..]);
                bail!("Import failed during commit of {key}: {e}");
            }
            committed.push(entry);
        }

        for entry in &committed {
            if entry.had_original {
                let _ = fs::remove_file(&entry.bak_path);
            }
        }
        tracing::info!(dir = %self.base_dir.display(), words = data.words.len(), "import complete");
        Ok(())
    }

    /// Best effort: put back each backed-up original, remove records that did
    /// not exist before, and drop leftover staged files.
    fn roll_back(committed: &[Committed], unstaged: &[PathBuf]) {
        for entry in committed {
            if entry.had_original {
                if entry.bak_path.exists() {
                    let _ = fs::rename(&entry.bak_path, &entry.final_path);
                }
            } else {
                let _ = fs::remove_file(&entry.final_path);
            }
        }
        for tmp in unstaged {
            let _ = fs::remove_file(tmp);
        }
        tracing::warn!(records = committed.len(), "import rolled back");
    }
}

struct Committed {
    final_path: PathBuf,
    bak_path: PathBuf,
    had_original: bool,
}

impl KvStore for JsonStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.file_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StoreError::Io {
                key: key.to_string(),
                source,
            })
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        Self::write_synced(&tmp_path, value).map_err(io_err)?;
        fs::rename(&tmp_path, &path).map_err(io_err)
    }
}
