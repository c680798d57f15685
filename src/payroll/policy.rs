use chrono::NaiveTime;

use super::cycle::CycleBoundary;
use crate::model::attendance::AttendanceStatus;

/// How Sundays are credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeeklyOffRule {
    /// Every Sunday in the cycle is a paid day off, provided the employee has
    /// at least one attendance record anywhere in the cycle.
    PaidWhenActiveInCycle,
    /// Sundays carry no credit unless actually worked.
    Unpaid,
}

/// The knobs that varied across revisions of this portal, pinned down as one
/// explicit object instead of hardcoded variants.
#[derive(Debug, Clone, Copy)]
pub struct PayrollPolicy {
    pub weekly_off: WeeklyOffRule,
    /// Punching in after this time records a Half Day. `None` disables the
    /// classification entirely (every punch records Present).
    pub half_day_cutoff: Option<NaiveTime>,
    pub cycle_boundary: CycleBoundary,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        PayrollPolicy {
            weekly_off: WeeklyOffRule::PaidWhenActiveInCycle,
            half_day_cutoff: NaiveTime::from_hms_opt(10, 30, 0),
            cycle_boundary: CycleBoundary::EndsOnFourth,
        }
    }
}

impl PayrollPolicy {
    /// Status written to the store at punch time.
    pub fn classify_punch(&self, time_in: NaiveTime) -> AttendanceStatus {
        match self.half_day_cutoff {
            Some(cutoff) if time_in > cutoff => AttendanceStatus::HalfDay,
            _ => AttendanceStatus::Present,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn punch_before_cutoff_is_present() {
        let policy = PayrollPolicy::default();
        assert_eq!(policy.classify_punch(time(9, 0)), AttendanceStatus::Present);
    }

    #[test]
    fn punch_exactly_at_cutoff_is_present() {
        let policy = PayrollPolicy::default();
        assert_eq!(policy.classify_punch(time(10, 30)), AttendanceStatus::Present);
    }

    #[test]
    fn punch_after_cutoff_is_half_day() {
        let policy = PayrollPolicy::default();
        assert_eq!(policy.classify_punch(time(10, 31)), AttendanceStatus::HalfDay);
        assert_eq!(policy.classify_punch(time(15, 0)), AttendanceStatus::HalfDay);
    }

    #[test]
    fn disabled_cutoff_always_records_present() {
        let policy = PayrollPolicy {
            half_day_cutoff: None,
            ..PayrollPolicy::default()
        };
        assert_eq!(policy.classify_punch(time(23, 59)), AttendanceStatus::Present);
    }
}
