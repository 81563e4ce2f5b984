//! Serializes `OffsetDateTime` as milliseconds since the Unix epoch,
//! which is how production dates and date filters travel on the wire.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};
use time::OffsetDateTime;

use crate::errors::ShipError;

const NANOS_PER_MILLI: i128 = 1_000_000;

/// -9999-01-01T00:00:00.000Z
pub const MIN_MILLIS: i64 = -377_705_116_800_000;

/// 9999-12-31T23:59:59.999Z
pub const MAX_MILLIS: i64 = 253_402_300_799_999;

/// Converts epoch milliseconds into a UTC date and time. `time` panics
/// outside [`MIN_MILLIS`, `MAX_MILLIS`], so those are rejected first.
pub fn to_datetime(millis: i64) -> Result<OffsetDateTime, ShipError> {
    if !(MIN_MILLIS..=MAX_MILLIS).contains(&millis) {
        return Err(ShipError::DateOutOfRange(millis));
    }

    Ok(OffsetDateTime::from_unix_timestamp_nanos(
        i128::from(millis) * NANOS_PER_MILLI,
    ))
}

/// Converts a date and time into epoch milliseconds.
pub fn from_datetime(datetime: &OffsetDateTime) -> i64 {
    (datetime.unix_timestamp_nanos() / NANOS_PER_MILLI) as i64
}

pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where S: Serializer {
    serializer.serialize_i64(from_datetime(datetime))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where D: Deserializer<'de> {
    let millis: i64 = Deserialize::deserialize(deserializer)?;
    to_datetime(millis).map_err(D::Error::custom)
}

pub mod option {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use time::OffsetDateTime;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where D: Deserializer<'de> {
        let millis: Option<i64> = Deserialize::deserialize(deserializer)?;

        millis
            .map(super::to_datetime)
            .transpose()
            .map_err(D::Error::custom)
    }
}
