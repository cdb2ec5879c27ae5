//! Building command result payloads
//!
//! An empty collection produces no results at all rather than an empty
//! structure, so callers can tell "nothing found" from a populated payload.

use cloudcmd_domain::{CloudCmdError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// `{ "<key>": [items...] }`, or `None` when `items` is empty
///
/// # Errors
/// `Internal` if an item fails to serialize.
pub fn collection_result<T: Serialize>(key: &str, items: &[T]) -> Result<Option<Value>> {
    if items.is_empty() {
        return Ok(None);
    }
    wrap(key, items)
}

/// `{ "<key>": item }`, or `None` when there is no item
///
/// # Errors
/// `Internal` if the item fails to serialize.
pub fn item_result<T: Serialize>(key: &str, item: Option<&T>) -> Result<Option<Value>> {
    item.map_or(Ok(None), |item| wrap(key, item))
}

fn wrap<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Option<Value>> {
    let value = serde_json::to_value(value)
        .map_err(|e| CloudCmdError::Internal(format!("Failed to serialize results: {e}")))?;
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Ok(Some(Value::Object(map)))
}
