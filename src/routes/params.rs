use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, de};

/// Query strings and HTML forms send `field=` for "nothing selected"; treat a
/// blank value like a missing one and parse anything else with `FromStr`.
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}
