use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::errors::ShipError;
use crate::millis;
use crate::rating;

/// An ID in the database.
pub type ShipId = i64;

/// The closed set of ship categories.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    Transport,
    Military,
    Merchant,
}

impl ShipType {
    pub fn as_str(self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = ShipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRANSPORT" => Ok(ShipType::Transport),
            "MILITARY" => Ok(ShipType::Military),
            "MERCHANT" => Ok(ShipType::Merchant),
            _ => Err(ShipError::UnknownShipType(s.to_owned())),
        }
    }
}

/// A single ship in the database.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Ship {
    /// The ID assigned by storage.
    pub id: ShipId,

    /// Everything else about the ship.
    #[serde(flatten)]
    pub record: ShipRecord,
}

impl Ship {
    pub fn new(id: ShipId, record: ShipRecord) -> Self {
        Ship { id, record }
    }
}

/// The stored attributes of a ship, without its ID.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipRecord {
    /// The name, 1 to 50 characters.
    pub name: String,

    /// The home planet, at most 50 characters.
    pub planet: String,

    /// The category it falls into.
    pub ship_type: ShipType,

    /// When it was built. Only the year matters.
    #[serde(with = "millis")]
    pub prod_date: OffsetDateTime,

    /// Whether it has had a previous owner.
    pub is_used: bool,

    /// Fraction of light speed, 0.01 to 0.99.
    pub speed: f64,

    /// Number of crew, 1 to 9999.
    pub crew_size: i32,

    /// Derived from `prod_date`, `speed` and `is_used`.
    pub rating: f64,
}

impl ShipRecord {
    /// Recomputes `rating` from the current production date, speed and
    /// usage.
    pub fn refresh_rating(&mut self) -> Result<(), ShipError> {
        self.rating = rating::compute(self.prod_date.year(), self.speed, self.is_used)?;

        Ok(())
    }
}

/// A partial set of ship attributes. Absent fields mean "leave
/// unchanged" on update and "missing" on creation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShipPatch {
    pub name: Option<String>,

    pub planet: Option<String>,

    pub ship_type: Option<ShipType>,

    #[serde(default, deserialize_with = "millis::option::deserialize")]
    pub prod_date: Option<OffsetDateTime>,

    pub is_used: Option<bool>,

    pub speed: Option<f64>,

    pub crew_size: Option<i32>,
}

impl ShipPatch {
    /// Writes every present field over the matching field of `record`.
    /// The rating is left alone.
    pub fn apply_to(self, record: &mut ShipRecord) {
        overlay(&mut record.name, self.name);
        overlay(&mut record.planet, self.planet);
        overlay(&mut record.ship_type, self.ship_type);
        overlay(&mut record.prod_date, self.prod_date);
        overlay(&mut record.is_used, self.is_used);
        overlay(&mut record.speed, self.speed);
        overlay(&mut record.crew_size, self.crew_size);
    }

    /// Builds a complete record, defaulting `is_used` to `false` and
    /// computing the rating. Fails if a required field is absent.
    pub fn into_record(self) -> Result<ShipRecord, ShipError> {
        let mut record = ShipRecord {
            name: required(self.name, "name")?,
            planet: required(self.planet, "planet")?,
            ship_type: required(self.ship_type, "shipType")?,
            prod_date: required(self.prod_date, "prodDate")?,
            is_used: self.is_used.unwrap_or(false),
            speed: required(self.speed, "speed")?,
            crew_size: required(self.crew_size, "crewSize")?,
            rating: 0.0,
        };

        record.refresh_rating()?;

        Ok(record)
    }
}

fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ShipError> {
    value.ok_or_else(|| ShipError::Validation(format!("Field {} is missing. ", field)))
}
