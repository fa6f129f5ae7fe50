//! JSON files on disk. Each collection is written whole and replaces whatever
//! was there before.

use std::fs;
use std::path::Path;

use eyre::{Result, WrapErr};
use log::debug;
use serde::{de::DeserializeOwned, Serialize};

/// Writes `records` as a pretty-printed JSON array, replacing `path`.
/// The data goes to a sibling temp file first so readers never see half a file.
pub fn save_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("creating {}", parent.display()))?;
        }
    }

    let serialized = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serialized).wrap_err_with(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).wrap_err_with(|| format!("replacing {}", path.display()))?;

    debug!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads a JSON array from `path`. A missing file is an empty collection.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        debug!("{} missing, treating as empty", path.display());
        return Ok(Vec::new());
    }
    let contents =
        fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&contents).wrap_err_with(|| format!("parsing {}", path.display()))
}
