use super::engine::PayrollStatement;

pub const SHEET_HEADER: &str = "Date,Day,Status,Credit,Time In,Location";

/// Renders the ledger as the downloadable payroll sheet: one row per calendar
/// day of the cycle, in the column order consumers of the export expect.
pub fn render_sheet(statement: &PayrollStatement) -> String {
    let mut out = String::from(SHEET_HEADER);
    out.push('\n');

    for entry in &statement.ledger {
        let time_in = entry
            .time_in
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        let location = entry.location.as_deref().unwrap_or("");

        out.push_str(&format!(
            "{},{},{},{:.1},{},{}\n",
            entry.date.format("%Y-%m-%d"),
            csv_field(&entry.day),
            csv_field(&entry.status),
            entry.credit,
            time_in,
            csv_field(location),
        ));
    }

    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use crate::payroll::cycle::{CycleBoundary, PayCycle};
    use crate::payroll::engine::{DayRecord, reconcile};
    use crate::payroll::policy::PayrollPolicy;

    fn statement() -> PayrollStatement {
        let cycle = PayCycle::for_reference(2, 2024, CycleBoundary::EndsOnFourth).unwrap();
        let mut records = BTreeMap::new();
        records.insert(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            DayRecord {
                status: AttendanceStatus::Present,
                time_in: NaiveTime::from_hms_opt(9, 12, 40).unwrap(),
                address: Some("Ring Road, Surat, Gujarat, India".to_string()),
            },
        );
        reconcile(30_000.0, &cycle, &records, &PayrollPolicy::default())
    }

    #[test]
    fn sheet_has_a_header_and_one_row_per_day() {
        let statement = statement();
        let sheet = render_sheet(&statement);
        let lines: Vec<_> = sheet.lines().collect();

        assert_eq!(lines[0], SHEET_HEADER);
        assert_eq!(lines.len(), statement.ledger.len() + 1);
    }

    #[test]
    fn punched_day_row_carries_time_and_quoted_location() {
        let sheet = render_sheet(&statement());
        let row = sheet
            .lines()
            .find(|l| l.starts_with("2024-01-05"))
            .unwrap();

        assert_eq!(
            row,
            "2024-01-05,Friday,Present,1.0,09:12:40,\"Ring Road, Surat, Gujarat, India\""
        );
    }

    #[test]
    fn absent_day_row_has_empty_trailing_columns() {
        let sheet = render_sheet(&statement());
        // 2024-01-08 is an unmarked Monday
        let row = sheet
            .lines()
            .find(|l| l.starts_with("2024-01-08"))
            .unwrap();

        assert_eq!(row, "2024-01-08,Monday,Absent,0.0,,");
    }
}
