// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `serde(with = "rfc3339")` adapter between `SystemTime` and RFC3339 text.
//!
//! Every timestamp in this crate's entities is a `SystemTime` internally
//! but an RFC3339 string at the wire/storage boundary (§3 Data model).
//! `chrono` already carries the formatting logic the storage crate needs
//! elsewhere, so this module is a thin wrapper rather than a second
//! date-time implementation.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::SystemTime;

pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let dt: DateTime<Utc> = (*time).into();
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
        .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let dt = DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom)?;
    Ok(dt.with_timezone(&Utc).into())
}

pub mod option {
    use super::*;

    pub fn serialize<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => {
                let dt: DateTime<Utc> = (*t).into();
                Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true)).serialize(serializer)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SystemTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s {
            Some(s) => {
                let dt = DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom)?;
                Ok(Some(dt.with_timezone(&Utc).into()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "rfc3339_tests.rs"]
mod tests;
