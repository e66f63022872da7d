//! Military points: one strength score, `(attack + defense) / 200`.

use crate::data::battle::UnitTable;
use crate::report::totals::{aggregate, StatTotals};

pub const MP_DIVISOR: f64 = 200.0;

pub fn military_points(attack: f64, defense: f64) -> f64 {
    (attack + defense) / MP_DIVISOR
}

/// Zero for absent or empty totals.
pub fn military_points_from_totals(totals: Option<&StatTotals>) -> f64 {
    match totals {
        Some(totals) if !totals.is_empty() => military_points(totals.attack(), totals.defense()),
        _ => 0.0,
    }
}

/// MP of a raw unit-type table; zero when the table is absent.
pub fn military_points_from_units(units: Option<&UnitTable>) -> f64 {
    let totals = units.map(|table| aggregate(table.values()));
    military_points_from_totals(totals.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::totals::StatRecord;

    #[test]
    fn divides_sum_by_two_hundred() {
        assert_eq!(military_points(100.0, 100.0), 1.0);
        assert_eq!(military_points(50.0, 50.0), 0.5);
        assert_eq!(military_points(0.0, 0.0), 0.0);
    }

    #[test]
    fn absent_or_empty_totals_are_zero() {
        assert_eq!(military_points_from_totals(None), 0.0);
        assert_eq!(military_points_from_totals(Some(&StatTotals::new())), 0.0);
        assert_eq!(military_points_from_units(None), 0.0);
    }

    #[test]
    fn unit_table_is_folded_before_scoring() {
        let mut table = UnitTable::new();
        table.insert("fighter".to_string(), StatRecord::new(300.0, 100.0, 4.0));
        table.insert("cruiser".to_string(), StatRecord::new(500.0, 300.0, 1.0));
        assert_eq!(military_points_from_units(Some(&table)), 6.0);
    }
}
