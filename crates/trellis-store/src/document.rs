use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::atomic::write_atomic;
use crate::error::{StoreError, StoreResult};

/// Read and parse a JSON document.
///
/// A missing file is a normal state and yields `Ok(None)`; an unreadable or
/// unparseable file is an error. Callers that treat a corrupt file as
/// recoverable (e.g. index rebuild) match on [`StoreError::Serialization`].
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let value =
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(Some(value))
}

/// Serialize `value` as pretty-printed JSON and persist it atomically.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let bytes =
        serde_json::to_vec_pretty(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
    write_atomic(path, &bytes)
}
