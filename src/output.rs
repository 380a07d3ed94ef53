use crate::error::OutputError;
use crate::models::slots::DateSlotMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// ext ids end up as file names, keep them to a single plain path component
static EXT_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("ext id pattern compiles"));

#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        OutputWriter { dir: dir.into() }
    }

    pub fn path_for(&self, ext_id: &str) -> Result<PathBuf, OutputError> {
        if !EXT_ID_PATTERN.is_match(ext_id) {
            return Err(OutputError::InvalidExtId(ext_id.to_string()));
        }
        Ok(self.dir.join(format!("{ext_id}.json")))
    }

    pub fn write(&self, ext_id: &str, slots: &DateSlotMap) -> Result<PathBuf, OutputError> {
        let target = self.path_for(ext_id)?;
        fs::create_dir_all(&self.dir)?;

        let mut file = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut file, slots)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&target)?;

        Ok(target)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
