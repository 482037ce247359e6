//! Deserialization helpers for the document model

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` the same as a missing field
pub fn deserialize_or_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    let opt: Option<T> = Deserialize::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
