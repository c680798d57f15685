pub mod cycle;
pub mod engine;
pub mod policy;
pub mod report;

pub use cycle::{CycleBoundary, PayCycle};
pub use engine::{DailyLedgerEntry, DayRecord, PayrollStatement, reconcile};
pub use policy::{PayrollPolicy, WeeklyOffRule};
