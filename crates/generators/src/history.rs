//! Append-only JSON log of completed runs.
//!
//! The log is a single JSON array. Each entry records what is needed to
//! reproduce the image: generator name, the fully resolved parameters, and
//! the seed.

use std::io::Write;
use std::path::Path;

use art_forge_core::error::GenError;
use art_forge_core::Recipe;
use chrono::Local;
use log::warn;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Local time the run finished, RFC 3339.
    pub timestamp: String,
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl RunRecord {
    pub fn now(recipe: Recipe, output: Option<String>) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            recipe,
            output,
        }
    }
}

/// Reads every record. A missing file is an empty history.
pub fn load(path: &Path) -> Result<Vec<RunRecord>, GenError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(GenError::Io(e.to_string())),
    };
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&text)
        .map_err(|e| GenError::Decode(format!("{}: {e}", path.display())))
}

/// Appends one record and rewrites the file atomically.
pub fn append(path: &Path, record: RunRecord) -> Result<(), GenError> {
    record.recipe.validate()?;
    let mut records = load(path)?;
    records.push(record);
    let json = serde_json::to_string_pretty(&records).map_err(|e| GenError::Io(e.to_string()))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| GenError::Io(e.to_string()))?;
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| GenError::Io(e.to_string()))?;
    tmp.write_all(json.as_bytes())
        .and_then(|()| tmp.write_all(b"\n"))
        .map_err(|e| GenError::Io(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| GenError::Io(e.error.to_string()))?;
    Ok(())
}

/// [`append`], logging instead of failing. A broken history file never
/// costs the user a rendered image.
pub fn append_or_warn(path: &Path, record: RunRecord) {
    if let Err(e) = append(path, record) {
        warn!("could not update run history {}: {e}", path.display());
    }
}
