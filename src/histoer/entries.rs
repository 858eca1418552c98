//! Serde adapter writing a hash map as a sequence of `[key, value]` pairs.
//!
//! JSON object keys must be strings; registry and 2D bin keys are composite
//! values, so maps holding them go through `#[serde(with = "entries")]`.

use fnv::FnvHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::Hash;

pub fn serialize<S, K, V>(map: &FnvHashMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    K: Serialize,
    V: Serialize,
{
    serializer.collect_seq(map.iter())
}

pub fn deserialize<'de, D, K, V>(deserializer: D) -> Result<FnvHashMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    let pairs = Vec::<(K, V)>::deserialize(deserializer)?;
    Ok(pairs.into_iter().collect())
}
