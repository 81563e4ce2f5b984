//! Composable search predicates over ships.
//!
//! Each filter dimension becomes one [`Predicate`]; an absent parameter
//! becomes [`Predicate::Any`]. A [`ShipFilter`] is the conjunction of
//! its predicates and is what storage is asked to apply.

use std::convert::TryFrom;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::errors::ShipError;
use crate::millis;
use crate::ship::{Ship, ShipType};

/// An inclusive range that may be open on either side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd> Bounds<T> {
    /// Returns `None` when neither end is given.
    pub fn new(min: Option<T>, max: Option<T>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            None
        } else {
            Some(Bounds { min, max })
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.min.as_ref().map_or(true, |min| min <= value)
            && self.max.as_ref().map_or(true, |max| value <= max)
    }
}

/// A condition on a single field.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Matches every ship.
    Any,
    /// Case-sensitive substring of the name.
    NameContains(String),
    /// Case-sensitive substring of the planet.
    PlanetContains(String),
    ShipType(ShipType),
    ProdDate(Bounds<OffsetDateTime>),
    IsUsed(bool),
    Speed(Bounds<f64>),
    CrewSize(Bounds<i32>),
    Rating(Bounds<f64>),
}

impl Predicate {
    pub fn matches(&self, ship: &Ship) -> bool {
        let record = &ship.record;

        match self {
            Predicate::Any => true,
            Predicate::NameContains(s) => record.name.contains(s.as_str()),
            Predicate::PlanetContains(s) => record.planet.contains(s.as_str()),
            Predicate::ShipType(t) => record.ship_type == *t,
            Predicate::ProdDate(b) => b.contains(&record.prod_date),
            Predicate::IsUsed(u) => record.is_used == *u,
            Predicate::Speed(b) => b.contains(&record.speed),
            Predicate::CrewSize(b) => b.contains(&record.crew_size),
            Predicate::Rating(b) => b.contains(&record.rating),
        }
    }
}

pub fn by_name(name: Option<String>) -> Predicate {
    name.map_or(Predicate::Any, Predicate::NameContains)
}

pub fn by_planet(planet: Option<String>) -> Predicate {
    planet.map_or(Predicate::Any, Predicate::PlanetContains)
}

pub fn by_ship_type(ship_type: Option<ShipType>) -> Predicate {
    ship_type.map_or(Predicate::Any, Predicate::ShipType)
}

/// `after` and `before` are epoch milliseconds, both inclusive. Fails if
/// either is outside the range of representable dates.
pub fn by_prod_date(after: Option<i64>, before: Option<i64>) -> Result<Predicate, ShipError> {
    let after = after.map(millis::to_datetime).transpose()?;
    let before = before.map(millis::to_datetime).transpose()?;

    Ok(Bounds::new(after, before).map_or(Predicate::Any, Predicate::ProdDate))
}

pub fn by_is_used(is_used: Option<bool>) -> Predicate {
    is_used.map_or(Predicate::Any, Predicate::IsUsed)
}

pub fn by_speed(min: Option<f64>, max: Option<f64>) -> Predicate {
    Bounds::new(min, max).map_or(Predicate::Any, Predicate::Speed)
}

pub fn by_crew_size(min: Option<i32>, max: Option<i32>) -> Predicate {
    Bounds::new(min, max).map_or(Predicate::Any, Predicate::CrewSize)
}

pub fn by_rating(min: Option<f64>, max: Option<f64>) -> Predicate {
    Bounds::new(min, max).map_or(Predicate::Any, Predicate::Rating)
}

/// The conjunction of zero or more predicates. An empty filter matches
/// every ship.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShipFilter {
    predicates: Vec<Predicate>,
}

impl ShipFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `predicate` to the conjunction. `Any` is dropped since it
    /// can't narrow anything.
    pub fn and(mut self, predicate: Predicate) -> Self {
        if predicate != Predicate::Any {
            self.predicates.push(predicate);
        }

        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, ship: &Ship) -> bool {
        self.predicates.iter().all(|p| p.matches(ship))
    }
}

/// The optional filter parameters a caller can supply.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParameters {
    pub name: Option<String>,
    pub planet: Option<String>,
    pub ship_type: Option<ShipType>,
    pub after: Option<i64>,
    pub before: Option<i64>,
    pub is_used: Option<bool>,
    pub min_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub min_crew_size: Option<i32>,
    pub max_crew_size: Option<i32>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
}

impl TryFrom<FilterParameters> for ShipFilter {
    type Error = ShipError;

    fn try_from(p: FilterParameters) -> Result<Self, Self::Error> {
        Ok(ShipFilter::new()
            .and(by_name(p.name))
            .and(by_planet(p.planet))
            .and(by_ship_type(p.ship_type))
            .and(by_prod_date(p.after, p.before)?)
            .and(by_is_used(p.is_used))
            .and(by_speed(p.min_speed, p.max_speed))
            .and(by_crew_size(p.min_crew_size, p.max_crew_size))
            .and(by_rating(p.min_rating, p.max_rating)))
    }
}

/// The field ships are listed by, always ascending.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrder {
    Id,
    Speed,
    Date,
    Rating,
}

impl Default for ShipOrder {
    fn default() -> Self {
        ShipOrder::Id
    }
}

impl ShipOrder {
    pub fn column(self) -> &'static str {
        match self {
            ShipOrder::Id => "id",
            ShipOrder::Speed => "speed",
            ShipOrder::Date => "prod_date",
            ShipOrder::Rating => "rating",
        }
    }
}

/// One page of an ordered listing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Page {
    /// Zero-based.
    pub number: u32,
    pub size: u32,
    pub order: ShipOrder,
}

impl Page {
    pub fn new(number: u32, size: u32, order: ShipOrder) -> Result<Self, ShipError> {
        if size == 0 {
            return Err(ShipError::InvalidPageSize);
        }

        Ok(Page {
            number,
            size,
            order,
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }
}
