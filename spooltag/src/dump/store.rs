// spooltag-rs/spooltag/src/dump/store.rs

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::constants::{DEFAULT_DUMP_DIR, DEFAULT_DUMP_EXTENSION, DEFAULT_MAX_SAVED_TAGS};
use crate::dump::TagDump;
use crate::tagger::TaggerConfig;
use crate::{Error, Result};

/// Directory of saved tag dumps, one file per UID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpStore {
    dir: PathBuf,
    extension: String,
    max_saved: usize,
}

impl Default for DumpStore {
    fn default() -> Self {
        Self::new(DEFAULT_DUMP_DIR)
    }
}

impl DumpStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_DUMP_EXTENSION.to_string(),
            max_saved: DEFAULT_MAX_SAVED_TAGS,
        }
    }

    pub fn from_config(config: &TaggerConfig) -> Self {
        Self {
            dir: config.dump_dir.clone(),
            extension: config.dump_extension.clone(),
            max_saved: config.max_saved_tags,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a dump is saved under.
    pub fn path_for(&self, dump: &TagDump) -> PathBuf {
        self.dir
            .join(format!("{}{}", dump.file_stem(), self.extension))
    }

    /// Path of a saved file name, as returned by `list`. Names containing a
    /// path separator are rejected.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(Error::DumpFormat(format!("bad dump name {:?}", name)));
        }
        Ok(self.dir.join(name))
    }

    /// Write `dump`, replacing any earlier dump of the same UID.
    pub fn save(&self, dump: &TagDump) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(dump);
        fs::write(&path, dump.to_text())?;
        info!("saved tag {} to {:?}", dump.uid, path);
        Ok(path)
    }

    /// Saved file names, sorted, at most `max_saved_tags` of them. A missing
    /// directory lists as empty.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no dump directory at {:?}", self.dir);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.len() > self.extension.len() && name.ends_with(&self.extension) {
                names.push(name);
            }
        }
        names.sort();
        if names.len() > self.max_saved {
            warn!(
                "{} saved tags, listing the first {}",
                names.len(),
                self.max_saved
            );
            names.truncate(self.max_saved);
        }
        Ok(names)
    }

    pub fn load(&self, name: &str) -> Result<TagDump> {
        let text = fs::read_to_string(self.resolve(name)?)?;
        TagDump::parse(&text)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        fs::remove_file(self.resolve(name)?)?;
        info!("deleted tag {}", name);
        Ok(())
    }
}
