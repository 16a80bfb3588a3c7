use serde::{Deserialize, Deserializer};

/// Distinguishes an explicit `null` from an absent field: with
/// `#[serde(default, deserialize_with = "present")]` on an `Option<Option<T>>`,
/// absent gives `None` and `null` gives `Some(None)`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
