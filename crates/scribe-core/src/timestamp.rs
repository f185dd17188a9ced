//! Wire format for timestamps in view-models: RFC 3339, millisecond
//! precision, `Z` suffix (e.g. `2026-10-18T09:30:00.000Z`).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
  S: Serializer,
{
  serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}
