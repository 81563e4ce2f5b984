//! The derived ship rating.

use crate::errors::ShipError;

/// The year the rating formula treats as the present.
pub const CURRENT_YEAR: i32 = 3019;

/// Rates a ship produced in `production_year` against [`CURRENT_YEAR`].
///
/// ```
/// use shipyard::rating::compute;
/// assert_eq!(compute(3000, 0.5, false).unwrap(), 2.0);
/// ```
pub fn compute(production_year: i32, speed: f64, is_used: bool) -> Result<f64, ShipError> {
    compute_at(CURRENT_YEAR, production_year, speed, is_used)
}

/// Rates a ship as of `current_year`. The result is rounded half-up to
/// two decimal places.
pub fn compute_at(
    current_year: i32,
    production_year: i32,
    speed: f64,
    is_used: bool,
) -> Result<f64, ShipError> {
    let age = current_year - production_year + 1;

    if age <= 0 {
        return Err(ShipError::DegenerateRating { production_year });
    }

    let factor = if is_used { 0.5 } else { 1.0 };
    let rating = 80.0 * speed * factor / f64::from(age);

    Ok(round_to_hundredths(rating))
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn current_year_has_denominator_one() {
        assert_eq!(compute(3019, 0.99, false).unwrap(), 79.2);
        assert_eq!(compute(3019, 0.5, true).unwrap(), 20.0);
    }

    #[test]
    fn matches_worked_examples() {
        assert_eq!(compute(3000, 0.5, false).unwrap(), 2.0);
        assert_eq!(compute(3000, 0.9, false).unwrap(), 3.6);
        assert_eq!(compute(2800, 0.01, true).unwrap(), 0.0);
    }

    #[test]
    fn rounds_half_up() {
        // 80 * 0.33 / 8 = 3.3
        assert_eq!(compute(3012, 0.33, false).unwrap(), 3.3);
        // 80 * 0.01 / 32 = 0.025
        assert_eq!(compute(2988, 0.01, false).unwrap(), 0.03);
    }

    #[test]
    fn future_years_are_degenerate() {
        match compute(3020, 0.5, false) {
            Err(ShipError::DegenerateRating { production_year }) => {
                assert_eq!(production_year, 3020)
            }
            other => panic!("expected degenerate rating, got {:?}", other),
        }

        assert!(compute(3100, 0.5, false).is_err());
        assert!(compute_at(2900, 2900, 0.5, false).is_ok());
    }

    proptest! {
        #[test]
        fn faster_ships_never_rate_lower(
            year in 2800..=3019i32,
            a in 1..=99u32,
            b in 1..=99u32,
            used in any::<bool>()
        ) {
            let (slow, fast) = if a <= b { (a, b) } else { (b, a) };
            let slow = compute(year, f64::from(slow) / 100.0, used).unwrap();
            let fast = compute(year, f64::from(fast) / 100.0, used).unwrap();

            prop_assert!(slow <= fast, "{} <= {}", slow, fast);
        }

        #[test]
        fn newer_ships_never_rate_lower(
            a in 2800..=3019i32,
            b in 2800..=3019i32,
            speed in 1..=99u32,
            used in any::<bool>()
        ) {
            let (older, newer) = if a <= b { (a, b) } else { (b, a) };
            let speed = f64::from(speed) / 100.0;
            let older = compute(older, speed, used).unwrap();
            let newer = compute(newer, speed, used).unwrap();

            prop_assert!(older <= newer, "{} <= {}", older, newer);
        }

        #[test]
        fn used_ships_never_rate_higher(year in 2800..=3019i32, speed in 1..=99u32) {
            let speed = f64::from(speed) / 100.0;

            let used = compute(year, speed, true).unwrap();
            let new = compute(year, speed, false).unwrap();

            prop_assert!(used <= new);
        }
    }
}
