//! # Classical City Rights
//!
//! A city holds classical city rights when it actually is a city, is not
//! banned from the register, and received its rights on the Brabant model.
//! The Brabant model is dated, roughly, from 1100 up to 1600.

use chrono::NaiveDate;

/// Decides whether a grant counts as a classical (Brabant-model) grant.
///
/// A missing grant date never qualifies.
pub fn has_classical_city_rights(
    is_city: Option<bool>,
    banned: Option<bool>,
    grant_date: Option<NaiveDate>,
) -> bool {
    if is_city != Some(true) || banned == Some(true) {
        return false;
    }
    match grant_date {
        Some(date) => within_classical_period(date),
        None => false,
    }
}

/// Exclusive bounds: after 1099-12-31 and before 1600-01-01.
fn within_classical_period(date: NaiveDate) -> bool {
    match (
        NaiveDate::from_ymd_opt(1099, 12, 31),
        NaiveDate::from_ymd_opt(1600, 1, 1),
    ) {
        (Some(after), Some(before)) => date > after && date < before,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::City;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn city(name: &str, is_city: bool, grant_date: Option<NaiveDate>) -> City {
        City {
            is_city: Some(is_city),
            grant_date,
            ..City::new(name)
        }
    }

    #[test]
    fn test_register_scenarios() {
        assert!(!city("Wijchen", false, date(1599, 12, 31)).has_classical_city_rights());
        assert!(city("Haarlem", true, date(1245, 11, 23)).has_classical_city_rights());
        assert!(!city("Assen", true, date(1809, 3, 13)).has_classical_city_rights());
    }

    #[test]
    fn test_window_boundaries() {
        let ok = Some(true);
        let clean = Some(false);
        assert!(!has_classical_city_rights(ok, clean, date(1099, 12, 31)));
        assert!(has_classical_city_rights(ok, clean, date(1100, 1, 1)));
        assert!(has_classical_city_rights(ok, clean, date(1599, 12, 31)));
        assert!(!has_classical_city_rights(ok, clean, date(1600, 1, 1)));
    }

    #[test]
    fn test_not_a_city_never_qualifies() {
        for banned in [None, Some(false), Some(true)] {
            for grant in [None, date(1100, 1, 1), date(1350, 6, 1), date(1700, 1, 1)] {
                assert!(!has_classical_city_rights(Some(false), banned, grant));
                assert!(!has_classical_city_rights(None, banned, grant));
            }
        }
    }

    #[test]
    fn test_banned_never_qualifies() {
        for is_city in [None, Some(false), Some(true)] {
            assert!(!has_classical_city_rights(is_city, Some(true), date(1350, 6, 1)));
        }
    }

    #[test]
    fn test_null_banned_counts_as_not_banned() {
        assert!(has_classical_city_rights(Some(true), None, date(1350, 6, 1)));
    }

    #[test]
    fn test_missing_grant_date_is_ineligible() {
        assert!(!has_classical_city_rights(Some(true), Some(false), None));
        assert!(!city("Onbekend", true, None).has_classical_city_rights());
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let haarlem = city("Haarlem", true, date(1245, 11, 23));
        assert_eq!(
            haarlem.has_classical_city_rights(),
            haarlem.has_classical_city_rights()
        );
    }
}
