//! Field and record checks for incoming ships.
//!
//! Every check returns an empty string when the value is acceptable and
//! a sentence ending in `". "` otherwise, so that the problems with a
//! whole record can be reported by concatenating the individual results.

use time::OffsetDateTime;

use crate::ship::{ShipPatch, ShipType};

pub const MAX_TEXT_LENGTH: usize = 50;
pub const MIN_PRODUCTION_YEAR: i32 = 2800;
pub const MAX_PRODUCTION_YEAR: i32 = 3019;
pub const MIN_SPEED: f64 = 0.01;
pub const MAX_SPEED: f64 = 0.99;
pub const MIN_CREW_SIZE: i32 = 1;
pub const MAX_CREW_SIZE: i32 = 9999;

pub const NAME_INVALID: &str = "Name is too long or empty. ";
pub const PLANET_INVALID: &str = "Planet name is too long or empty. ";
pub const PRODUCTION_DATE_MISSING: &str = "Production date is missing. ";
pub const PRODUCTION_YEAR_INVALID: &str = "Year of production should be between 2800 and 3019. ";
pub const SPEED_INVALID: &str = "Speed should be between 0.01 and 0.99. ";
pub const CREW_SIZE_INVALID: &str = "Crew size should be between 1 and 9999. ";
pub const IS_USED_MISSING: &str = "Used flag is missing. ";
pub const SHIP_TYPE_MISSING: &str = "Ship type is missing. ";

pub const UPDATED_NAME_INVALID: &str = "Name should be not empty and shorter than 50 symbols. ";
pub const UPDATED_PLANET_INVALID: &str = "Planet should be not empty and shorter than 50 symbols. ";
pub const UPDATED_PRODUCTION_YEAR_INVALID: &str =
    "Prod year should be less than 3019 and greater than 2800. ";

pub fn validate_name(name: Option<&str>) -> &'static str {
    match name {
        Some(name) if name_fits(name) => "",
        _ => NAME_INVALID,
    }
}

/// An empty planet passes; only a missing or overlong one fails.
pub fn validate_planet(planet: Option<&str>) -> &'static str {
    match planet {
        Some(planet) if planet_fits(planet) => "",
        _ => PLANET_INVALID,
    }
}

pub fn validate_production_date(date: Option<&OffsetDateTime>) -> &'static str {
    match date {
        None => PRODUCTION_DATE_MISSING,
        Some(date) if year_fits(date) => "",
        Some(_) => PRODUCTION_YEAR_INVALID,
    }
}

pub fn validate_speed(speed: Option<f64>) -> &'static str {
    match speed {
        Some(speed) if speed_fits(speed) => "",
        _ => SPEED_INVALID,
    }
}

pub fn validate_crew_size(crew_size: Option<i32>) -> &'static str {
    match crew_size {
        Some(crew_size) if crew_size_fits(crew_size) => "",
        _ => CREW_SIZE_INVALID,
    }
}

pub fn validate_is_used(is_used: Option<bool>) -> &'static str {
    match is_used {
        Some(_) => "",
        None => IS_USED_MISSING,
    }
}

pub fn validate_ship_type(ship_type: Option<ShipType>) -> &'static str {
    match ship_type {
        Some(_) => "",
        None => SHIP_TYPE_MISSING,
    }
}

/// Checks a would-be new ship. Every field except `is_used` is
/// mandatory. Returns an empty string if the ship is acceptable.
pub fn validate_for_create(patch: &ShipPatch) -> String {
    [
        validate_name(patch.name.as_deref()),
        validate_planet(patch.planet.as_deref()),
        validate_production_date(patch.prod_date.as_ref()),
        validate_speed(patch.speed),
        validate_crew_size(patch.crew_size),
        validate_ship_type(patch.ship_type),
    ]
    .concat()
}

/// Checks only the fields present in `patch`. Returns an empty string if
/// the patch is acceptable.
pub fn validate_for_update(patch: &ShipPatch) -> String {
    let mut problems = String::new();

    if matches!(&patch.name, Some(name) if !name_fits(name)) {
        problems.push_str(UPDATED_NAME_INVALID);
    }

    if matches!(&patch.planet, Some(planet) if !planet_fits(planet)) {
        problems.push_str(UPDATED_PLANET_INVALID);
    }

    if matches!(&patch.prod_date, Some(date) if !year_fits(date)) {
        problems.push_str(UPDATED_PRODUCTION_YEAR_INVALID);
    }

    if matches!(patch.crew_size, Some(crew_size) if !crew_size_fits(crew_size)) {
        problems.push_str(CREW_SIZE_INVALID);
    }

    if matches!(patch.speed, Some(speed) if !speed_fits(speed)) {
        problems.push_str(SPEED_INVALID);
    }

    problems
}

fn name_fits(name: &str) -> bool {
    !name.is_empty() && name.chars().count() <= MAX_TEXT_LENGTH
}

fn planet_fits(planet: &str) -> bool {
    planet.chars().count() <= MAX_TEXT_LENGTH
}

fn year_fits(date: &OffsetDateTime) -> bool {
    (MIN_PRODUCTION_YEAR..=MAX_PRODUCTION_YEAR).contains(&date.year())
}

fn speed_fits(speed: f64) -> bool {
    (MIN_SPEED..=MAX_SPEED).contains(&speed)
}

fn crew_size_fits(crew_size: i32) -> bool {
    (MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew_size)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::ship::tests::{eagle, year};

    #[test]
    fn complete_ship_is_valid() {
        assert_eq!(validate_for_create(&eagle()), "");
    }

    #[test]
    fn missing_fields_are_all_reported_in_order() {
        let message = validate_for_create(&ShipPatch::default());

        assert_eq!(
            message,
            [
                NAME_INVALID,
                PLANET_INVALID,
                PRODUCTION_DATE_MISSING,
                SPEED_INVALID,
                CREW_SIZE_INVALID,
                SHIP_TYPE_MISSING,
            ]
            .concat()
        );
    }

    #[test]
    fn missing_name_is_reported() {
        let patch = ShipPatch {
            name: None,
            ..eagle()
        };

        assert!(validate_for_create(&patch).contains(NAME_INVALID));
    }

    #[test]
    fn name_length_boundaries() {
        assert_eq!(validate_name(Some("")), NAME_INVALID);
        assert_eq!(validate_name(Some("x")), "");
        assert_eq!(validate_name(Some(&"x".repeat(50))), "");
        assert_eq!(validate_name(Some(&"x".repeat(51))), NAME_INVALID);
        assert_eq!(validate_name(Some(&"é".repeat(50))), "");
        assert_eq!(validate_name(None), NAME_INVALID);
    }

    #[test]
    fn empty_planet_passes_but_missing_fails() {
        assert_eq!(validate_planet(Some("")), "");
        assert_eq!(validate_planet(None), PLANET_INVALID);
        assert_eq!(validate_planet(Some(&"p".repeat(51))), PLANET_INVALID);
    }

    #[test]
    fn production_year_boundaries() {
        assert_eq!(validate_production_date(Some(&year(2800))), "");
        assert_eq!(validate_production_date(Some(&year(3019))), "");
        assert_eq!(validate_production_date(Some(&year(2799))), PRODUCTION_YEAR_INVALID);
        assert_eq!(validate_production_date(Some(&year(3020))), PRODUCTION_YEAR_INVALID);
        assert_eq!(validate_production_date(None), PRODUCTION_DATE_MISSING);
    }

    #[test]
    fn speed_boundaries() {
        assert_eq!(validate_speed(Some(0.01)), "");
        assert_eq!(validate_speed(Some(0.99)), "");
        assert_eq!(validate_speed(Some(0.0)), SPEED_INVALID);
        assert_eq!(validate_speed(Some(1.0)), SPEED_INVALID);
        assert_eq!(validate_speed(None), SPEED_INVALID);
    }

    #[test]
    fn crew_size_boundaries() {
        assert_eq!(validate_crew_size(Some(1)), "");
        assert_eq!(validate_crew_size(Some(9999)), "");
        assert_eq!(validate_crew_size(Some(0)), CREW_SIZE_INVALID);
        assert_eq!(validate_crew_size(Some(10000)), CREW_SIZE_INVALID);
        assert_eq!(validate_crew_size(None), CREW_SIZE_INVALID);
    }

    #[test]
    fn is_used_only_fails_when_missing() {
        assert_eq!(validate_is_used(Some(true)), "");
        assert_eq!(validate_is_used(Some(false)), "");
        assert_eq!(validate_is_used(None), IS_USED_MISSING);
    }

    #[test]
    fn empty_patch_is_a_valid_update() {
        assert_eq!(validate_for_update(&ShipPatch::default()), "");
    }

    #[test]
    fn update_reports_problems_in_order() {
        let patch = ShipPatch {
            name: Some(String::new()),
            planet: Some("p".repeat(51)),
            crew_size: Some(0),
            speed: Some(1.0),
            ..ShipPatch::default()
        };

        assert_eq!(
            validate_for_update(&patch),
            [
                UPDATED_NAME_INVALID,
                UPDATED_PLANET_INVALID,
                CREW_SIZE_INVALID,
                SPEED_INVALID,
            ]
            .concat()
        );
        assert!(!validate_for_update(&patch).contains(NAME_INVALID));
    }

    #[test]
    fn update_wording_for_text_fields() {
        let patch = ShipPatch {
            planet: Some("p".repeat(51)),
            ..ShipPatch::default()
        };

        assert_eq!(
            validate_for_update(&patch),
            "Planet should be not empty and shorter than 50 symbols. "
        );

        let empty_planet = ShipPatch {
            planet: Some(String::new()),
            ..ShipPatch::default()
        };
        assert_eq!(validate_for_update(&empty_planet), "");
    }

    #[test]
    fn update_skips_absent_fields_and_allows_empty_planet() {
        let patch = ShipPatch {
            planet: Some(String::new()),
            prod_date: Some(year(3019)),
            ..ShipPatch::default()
        };

        assert_eq!(validate_for_update(&patch), "");

        let patch = ShipPatch {
            prod_date: Some(year(2700)),
            ..ShipPatch::default()
        };

        assert_eq!(validate_for_update(&patch), UPDATED_PRODUCTION_YEAR_INVALID);
    }

    proptest! {
        #[test]
        fn crew_sizes_in_range_pass(crew_size in 1..=9999i32) {
            prop_assert_eq!(validate_crew_size(Some(crew_size)), "");
        }

        #[test]
        fn crew_sizes_out_of_range_fail(
            crew_size in prop_oneof![i32::MIN..1i32, 10000..=i32::MAX]
        ) {
            prop_assert_eq!(validate_crew_size(Some(crew_size)), CREW_SIZE_INVALID);
        }
    }
}
