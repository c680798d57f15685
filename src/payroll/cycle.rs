use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Which day of the reference month closes the cycle. Both variants exist in
/// the field; the choice is configuration, not code (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleBoundary {
    EndsOnFourth,
    EndsOnFifth,
}

impl CycleBoundary {
    pub fn from_end_day(day: u32) -> Option<Self> {
        match day {
            4 => Some(CycleBoundary::EndsOnFourth),
            5 => Some(CycleBoundary::EndsOnFifth),
            _ => None,
        }
    }

    fn end_day(self) -> u32 {
        match self {
            CycleBoundary::EndsOnFourth => 4,
            CycleBoundary::EndsOnFifth => 5,
        }
    }
}

/// Inclusive date window over which attendance is reconciled into pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PayCycle {
    #[schema(example = "2024-01-05", value_type = String, format = "date")]
    pub start: NaiveDate,

    #[schema(example = "2024-02-04", value_type = String, format = "date")]
    pub end: NaiveDate,
}

impl PayCycle {
    /// Derives the window for a reference (month, year), where the reference
    /// names the month the cycle ends in: the 5th of the previous month
    /// through the 4th or 5th of the reference month. A January reference
    /// rolls the start back to December of the prior year.
    pub fn for_reference(month: u32, year: i32, boundary: CycleBoundary) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }

        let (start_year, start_month) = if month == 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        };

        let start = NaiveDate::from_ymd_opt(start_year, start_month, 5)?;
        let end = NaiveDate::from_ymd_opt(year, month, boundary.end_day())?;

        Some(PayCycle { start, end })
    }

    /// Number of calendar days in the inclusive window.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reference_names_the_closing_month() {
        let cycle = PayCycle::for_reference(2, 2024, CycleBoundary::EndsOnFourth).unwrap();
        assert_eq!(cycle.start, date(2024, 1, 5));
        assert_eq!(cycle.end, date(2024, 2, 4));
        assert_eq!(cycle.num_days(), 31);
    }

    #[test]
    fn january_rolls_back_to_december() {
        let cycle = PayCycle::for_reference(1, 2024, CycleBoundary::EndsOnFourth).unwrap();
        assert_eq!(cycle.start, date(2023, 12, 5));
        assert_eq!(cycle.end, date(2024, 1, 4));
    }

    #[test]
    fn fifth_boundary_extends_the_window_by_one_day() {
        let fourth = PayCycle::for_reference(2, 2024, CycleBoundary::EndsOnFourth).unwrap();
        let fifth = PayCycle::for_reference(2, 2024, CycleBoundary::EndsOnFifth).unwrap();
        assert_eq!(fifth.start, fourth.start);
        assert_eq!(fifth.end, date(2024, 2, 5));
        assert_eq!(fifth.num_days(), fourth.num_days() + 1);
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        assert!(PayCycle::for_reference(0, 2024, CycleBoundary::EndsOnFourth).is_none());
        assert!(PayCycle::for_reference(13, 2024, CycleBoundary::EndsOnFourth).is_none());
    }

    #[test]
    fn end_day_matches_boundary() {
        assert_eq!(CycleBoundary::from_end_day(4), Some(CycleBoundary::EndsOnFourth));
        assert_eq!(CycleBoundary::from_end_day(5), Some(CycleBoundary::EndsOnFifth));
        assert_eq!(CycleBoundary::from_end_day(6), None);
    }
}
