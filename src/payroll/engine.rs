use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;
use utoipa::ToSchema;

use super::cycle::PayCycle;
use super::policy::{PayrollPolicy, WeeklyOffRule};
use crate::model::attendance::AttendanceStatus;

pub const WEEKLY_OFF_LABEL: &str = "Weekly Off";

/// Fixed month divisor. The portal always pays `salary / 30` per credited
/// day, regardless of how many days the cycle or month actually has.
const MONTH_DIVISOR: f64 = 30.0;

/// What the engine needs from one stored punch.
#[derive(Debug, Clone)]
pub struct DayRecord {
    pub status: AttendanceStatus,
    pub time_in: NaiveTime,
    pub address: Option<String>,
}

/// One row of the derived ledger: never persisted, produced fresh per run.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyLedgerEntry {
    #[schema(example = "2024-01-07", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Sunday")]
    pub day: String,

    #[schema(example = "Weekly Off")]
    pub status: String,

    #[schema(example = 1.0)]
    pub credit: f64,

    #[schema(example = "09:12:40", value_type = String, nullable = true)]
    pub time_in: Option<NaiveTime>,

    #[schema(example = "Ring Road, Surat, Gujarat, India", nullable = true)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayrollStatement {
    #[schema(example = "2024-01-05", value_type = String, format = "date")]
    pub cycle_start: NaiveDate,

    #[schema(example = "2024-02-04", value_type = String, format = "date")]
    pub cycle_end: NaiveDate,

    #[schema(example = 7.0)]
    pub payable_days: f64,

    #[schema(example = 7000.0)]
    pub total_pay: f64,

    pub ledger: Vec<DailyLedgerEntry>,
}

/// Walks every calendar day of the cycle and classifies it against the sparse
/// record map, producing the per-day ledger and the payable total.
///
/// A cycle with no attendance at all short-circuits to zero: weekly-off
/// credit is never fabricated for someone who never worked in the window.
/// Pure read-side computation; identical inputs yield identical output.
pub fn reconcile(
    base_salary: f64,
    cycle: &PayCycle,
    records: &BTreeMap<NaiveDate, DayRecord>,
    policy: &PayrollPolicy,
) -> PayrollStatement {
    let has_worked = !records.is_empty();
    if !has_worked {
        return PayrollStatement {
            cycle_start: cycle.start,
            cycle_end: cycle.end,
            payable_days: 0.0,
            total_pay: 0.0,
            ledger: Vec::new(),
        };
    }

    let mut ledger = Vec::with_capacity(usize::try_from(cycle.num_days()).unwrap_or(0));
    let mut payable_days = 0.0_f64;

    let mut date = cycle.start;
    while date <= cycle.end {
        let record = records.get(&date);
        let status = record.map(|r| r.status).unwrap_or(AttendanceStatus::Absent);

        let mut credit = match status {
            AttendanceStatus::Present => 1.0,
            AttendanceStatus::HalfDay => 0.5,
            AttendanceStatus::Absent => 0.0,
        };
        let mut label = status.to_string();

        // Weekly-off override: cycle-wide, not per-week. Any attendance in
        // the cycle pays every Sunday in it.
        if date.weekday() == Weekday::Sun {
            match policy.weekly_off {
                WeeklyOffRule::PaidWhenActiveInCycle => {
                    credit = 1.0;
                    if record.is_none() {
                        label = WEEKLY_OFF_LABEL.to_string();
                    }
                }
                WeeklyOffRule::Unpaid => {
                    if record.is_none() {
                        label = WEEKLY_OFF_LABEL.to_string();
                    }
                }
            }
        }

        payable_days += credit;
        ledger.push(DailyLedgerEntry {
            date,
            day: date.format("%A").to_string(),
            status: label,
            credit,
            time_in: record.map(|r| r.time_in),
            location: record.and_then(|r| r.address.clone()),
        });

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    let total_pay = base_salary / MONTH_DIVISOR * payable_days;

    PayrollStatement {
        cycle_start: cycle.start,
        cycle_end: cycle.end,
        payable_days,
        total_pay,
        ledger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::cycle::CycleBoundary;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn punch(status: AttendanceStatus) -> DayRecord {
        DayRecord {
            status,
            time_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            address: None,
        }
    }

    fn january_cycle() -> PayCycle {
        // 2024-01-05 ..= 2024-02-04, the canonical scenario window
        PayCycle::for_reference(2, 2024, CycleBoundary::EndsOnFourth).unwrap()
    }

    #[test]
    fn zero_attendance_short_circuits_to_zero() {
        let statement = reconcile(
            20_000.0,
            &january_cycle(),
            &BTreeMap::new(),
            &PayrollPolicy::default(),
        );

        assert_eq!(statement.payable_days, 0.0);
        assert_eq!(statement.total_pay, 0.0);
        assert!(statement.ledger.is_empty());
    }

    #[test]
    fn canonical_scenario_pays_sundays_plus_worked_days() {
        let cycle = january_cycle();
        let mut records = BTreeMap::new();
        records.insert(date(2024, 1, 5), punch(AttendanceStatus::Present));
        records.insert(date(2024, 1, 12), punch(AttendanceStatus::Present));

        let statement = reconcile(30_000.0, &cycle, &records, &PayrollPolicy::default());

        // Sundays in the window: Jan 7, 14, 21, 28 and Feb 4.
        let sundays: Vec<_> = statement
            .ledger
            .iter()
            .filter(|e| e.day == "Sunday")
            .collect();
        assert_eq!(sundays.len(), 5);
        for entry in &sundays {
            assert_eq!(entry.credit, 1.0);
            assert_eq!(entry.status, WEEKLY_OFF_LABEL);
        }

        assert_eq!(statement.payable_days, 7.0);
        assert_eq!(statement.total_pay, 30_000.0 / 30.0 * 7.0);
        assert_eq!(statement.ledger.len(), 31);
    }

    #[test]
    fn ledger_covers_the_inclusive_range_without_gaps() {
        let cycle = january_cycle();
        let mut records = BTreeMap::new();
        records.insert(date(2024, 1, 20), punch(AttendanceStatus::Present));

        let statement = reconcile(10_000.0, &cycle, &records, &PayrollPolicy::default());

        assert_eq!(statement.ledger.len() as i64, cycle.num_days());
        assert_eq!(statement.ledger[0].date, cycle.start);
        assert_eq!(statement.ledger.last().unwrap().date, cycle.end);
        for pair in statement.ledger.windows(2) {
            assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
        }
    }

    #[test]
    fn half_day_contributes_half_a_credit() {
        let cycle = january_cycle();
        let mut records = BTreeMap::new();
        // 2024-01-10 is a Wednesday
        records.insert(date(2024, 1, 10), punch(AttendanceStatus::HalfDay));

        let statement = reconcile(30_000.0, &cycle, &records, &PayrollPolicy::default());

        let entry = statement
            .ledger
            .iter()
            .find(|e| e.date == date(2024, 1, 10))
            .unwrap();
        assert_eq!(entry.credit, 0.5);
        assert_eq!(entry.status, "Half Day");
        // 5 Sundays + 0.5
        assert_eq!(statement.payable_days, 5.5);
    }

    #[test]
    fn unmarked_weekdays_are_absent_with_no_credit() {
        let cycle = january_cycle();
        let mut records = BTreeMap::new();
        records.insert(date(2024, 1, 5), punch(AttendanceStatus::Present));

        let statement = reconcile(30_000.0, &cycle, &records, &PayrollPolicy::default());

        // 2024-01-08 is a Monday with no record
        let entry = statement
            .ledger
            .iter()
            .find(|e| e.date == date(2024, 1, 8))
            .unwrap();
        assert_eq!(entry.credit, 0.0);
        assert_eq!(entry.status, "Absent");
        assert!(entry.time_in.is_none());
    }

    #[test]
    fn sunday_half_day_is_forced_to_full_credit() {
        let cycle = january_cycle();
        let mut records = BTreeMap::new();
        // 2024-01-07 is a Sunday
        records.insert(date(2024, 1, 7), punch(AttendanceStatus::HalfDay));

        let statement = reconcile(30_000.0, &cycle, &records, &PayrollPolicy::default());

        let entry = statement
            .ledger
            .iter()
            .find(|e| e.date == date(2024, 1, 7))
            .unwrap();
        assert_eq!(entry.credit, 1.0);
        // a real punch keeps its own label
        assert_eq!(entry.status, "Half Day");
    }

    #[test]
    fn unpaid_weekly_off_rule_leaves_sundays_uncredited() {
        let cycle = january_cycle();
        let mut records = BTreeMap::new();
        records.insert(date(2024, 1, 5), punch(AttendanceStatus::Present));

        let policy = PayrollPolicy {
            weekly_off: WeeklyOffRule::Unpaid,
            ..PayrollPolicy::default()
        };
        let statement = reconcile(30_000.0, &cycle, &records, &policy);

        assert_eq!(statement.payable_days, 1.0);
        let sunday = statement
            .ledger
            .iter()
            .find(|e| e.date == date(2024, 1, 7))
            .unwrap();
        assert_eq!(sunday.credit, 0.0);
        assert_eq!(sunday.status, WEEKLY_OFF_LABEL);
    }

    #[test]
    fn total_is_exactly_salary_over_thirty_times_payable() {
        let cycle = january_cycle();
        let mut records = BTreeMap::new();
        records.insert(date(2024, 1, 5), punch(AttendanceStatus::Present));
        records.insert(date(2024, 1, 10), punch(AttendanceStatus::HalfDay));

        for salary in [0.0, 15_000.0, 33_333.0] {
            let statement = reconcile(salary, &cycle, &records, &PayrollPolicy::default());
            assert_eq!(
                statement.total_pay,
                salary / 30.0 * statement.payable_days
            );
        }
    }

    #[test]
    fn inverted_range_yields_an_empty_ledger_without_error() {
        let cycle = PayCycle {
            start: date(2024, 2, 4),
            end: date(2024, 1, 5),
        };
        let mut records = BTreeMap::new();
        records.insert(date(2024, 1, 10), punch(AttendanceStatus::Present));

        let statement = reconcile(30_000.0, &cycle, &records, &PayrollPolicy::default());

        assert!(statement.ledger.is_empty());
        assert_eq!(statement.payable_days, 0.0);
        assert_eq!(statement.total_pay, 0.0);
    }

    #[test]
    fn reconciliation_is_idempotent() {
        let cycle = january_cycle();
        let mut records = BTreeMap::new();
        records.insert(date(2024, 1, 5), punch(AttendanceStatus::Present));

        let first = reconcile(30_000.0, &cycle, &records, &PayrollPolicy::default());
        let second = reconcile(30_000.0, &cycle, &records, &PayrollPolicy::default());
        assert_eq!(first, second);
    }
}
