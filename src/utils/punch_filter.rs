use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use chrono::NaiveDate;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Sized for a day of punches across the whole staff.
const FILTER_CAPACITY: usize = 10_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static PUNCH_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
fn key(employee_id: u64, date: NaiveDate) -> String {
    format!("{}:{}", employee_id, date)
}

/// Check whether a punch for (employee, date) might already exist. False
/// positives possible; the store's unique key stays authoritative.
pub fn might_exist(employee_id: u64, date: NaiveDate) -> bool {
    PUNCH_FILTER
        .read()
        .expect("punch filter poisoned")
        .contains(&key(employee_id, date))
}

/// Record a successful punch in the filter
pub fn insert(employee_id: u64, date: NaiveDate) {
    PUNCH_FILTER
        .write()
        .expect("punch filter poisoned")
        .add(&key(employee_id, date));
}

/// Drop a punch key, e.g. when an employee is deleted mid-day
pub fn remove(employee_id: u64, date: NaiveDate) {
    PUNCH_FILTER
        .write()
        .expect("punch filter poisoned")
        .remove(&key(employee_id, date));
}

/// Warm up the filter from the given day's punches using streaming + batching
pub async fn warmup_punch_filter(
    pool: &MySqlPool,
    date: NaiveDate,
    batch_size: usize,
) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (u64,)>("SELECT employee_id FROM attendance WHERE date = ?")
        .bind(date)
        .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (employee_id,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(key(employee_id, date));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    log::info!("Punch filter warmup complete: {} punches for {}", total, date);
    Ok(())
}

fn insert_batch(keys: &[String]) {
    let mut filter = PUNCH_FILTER.write().expect("punch filter poisoned");

    for key in keys {
        filter.add(key);
    }
}
