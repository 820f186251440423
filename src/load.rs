//! JSON interchange for [`Interface`].
//!
//! Errors carry the JSON path of the node that failed to deserialize.
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::LoadError;
use crate::model::Interface;

fn with_path<'de, D, T>(de: D) -> Result<T, LoadError>
where
    D: serde::Deserializer<'de, Error = serde_json::Error>,
    T: DeserializeOwned,
{
    serde_path_to_error::deserialize(de).map_err(|err| LoadError::Json {
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

pub fn from_str(src: &str) -> Result<Interface, LoadError> {
    let mut de = serde_json::Deserializer::from_str(src);
    let iface = with_path(&mut de)?;
    de.end().map_err(|source| LoadError::Json { path: ".".into(), source })?;
    Ok(iface)
}

pub fn from_slice(bytes: &[u8]) -> Result<Interface, LoadError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let iface = with_path(&mut de)?;
    de.end().map_err(|source| LoadError::Json { path: ".".into(), source })?;
    Ok(iface)
}

/// Deserialize an already-parsed document, e.g. one selected by pointer or jq.
pub fn from_value(value: Value) -> Result<Interface, LoadError> {
    with_path(value)
}

pub fn from_path(path: &Path) -> Result<Interface, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "loading interface");
    from_slice(&bytes)
}

/// Read any JSON document (not necessarily an interface).
pub fn read_value(path: &Path) -> Result<Value, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Json { path: ".".into(), source })
}

/// Apply an RFC 6901 pointer (`/data/interface`); the empty pointer selects the root.
pub fn select_pointer(mut value: Value, pointer: &str) -> Result<Value, LoadError> {
    value
        .pointer_mut(pointer)
        .map(Value::take)
        .ok_or_else(|| LoadError::PointerNotFound(pointer.to_owned()))
}

pub fn to_string_pretty(iface: &Interface) -> serde_json::Result<String> {
    serde_json::to_string_pretty(iface)
}

pub fn to_string(iface: &Interface) -> serde_json::Result<String> {
    serde_json::to_string(iface)
}
