//! Core domain types
//!
//! These types mirror what the Mage API returns. The adapter never persists
//! them; every read re-fetches from the service. All fields decode leniently
//! so that a sparse response still produces a usable value; an explicit `null`
//! is treated like a missing field.

pub mod block;
pub mod pipeline;
pub mod run;
pub mod search;

use serde::{Deserialize, Deserializer};

/// Decode `null` as the field's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
