//! JSON snapshot persistence
//!
//! The whole state serializes to one document. Saves go through a sibling
//! temp file and an atomic rename so a crash mid-write leaves the previous
//! snapshot intact.

use std::fs;
use std::path::Path;

use crate::error::StoreError;
use crate::state::State;

pub(crate) fn load(path: &Path) -> Result<Option<State>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    let state = serde_json::from_str(&data)?;
    Ok(Some(state))
}

pub(crate) fn save(path: &Path, state: &State) -> Result<(), StoreError> {
    let data = serde_json::to_vec_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
