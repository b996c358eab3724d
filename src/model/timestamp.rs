//! Serde adapter for optional timestamps in the persisted state file.
//!
//! The state schema has no nulls for times: an unset time is written as the
//! zero instant, and the zero instant reads back as unset.

use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, macros::datetime};

pub const ZERO_TIME: OffsetDateTime = datetime!(0001-01-01 00:00:00 UTC);

pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let ts = value.unwrap_or(ZERO_TIME);
    let text = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    let Some(text) = text else {
        return Ok(None);
    };
    let ts = OffsetDateTime::parse(&text, &Rfc3339).map_err(serde::de::Error::custom)?;
    if ts == ZERO_TIME { Ok(None) } else { Ok(Some(ts)) }
}
