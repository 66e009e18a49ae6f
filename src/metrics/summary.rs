use serde::Serialize;

/// Decimal places used for percentages on the dashboards.
pub const RATE_DECIMALS: u32 = 1;

/// Matching count against collection size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total: usize,
    pub rate: f64,
}

pub fn summarize<R, P>(records: &[R], predicate: P) -> Summary
where
    P: Fn(&R) -> bool,
{
    summarize_with(records, predicate, RATE_DECIMALS)
}

pub fn summarize_with<R, P>(records: &[R], predicate: P, decimals: u32) -> Summary
where
    P: Fn(&R) -> bool,
{
    let count = records.iter().filter(|record| predicate(record)).count();
    let total = records.len();
    Summary {
        count,
        total,
        rate: rate(count, total, decimals),
    }
}

/// `matching / total * 100`, rounded, and `0` when `total` is zero.
pub fn rate(matching: usize, total: usize, decimals: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let value = matching as f64 / total as f64 * 100.0;
    round_to(value.clamp(0.0, 100.0), decimals)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals.min(12) as i32);
    (value * factor).round() / factor
}

/// Sums a numeric field. Missing or non-finite values count as zero.
pub fn sum_by<R, F>(records: &[R], field: F) -> f64
where
    F: Fn(&R) -> Option<f64>,
{
    records
        .iter()
        .filter_map(&field)
        .filter(|value| value.is_finite())
        .sum()
}

pub fn sum_by_where<R, F, P>(records: &[R], field: F, predicate: P) -> f64
where
    F: Fn(&R) -> Option<f64>,
    P: Fn(&R) -> bool,
{
    records
        .iter()
        .filter(|record| predicate(record))
        .filter_map(&field)
        .filter(|value| value.is_finite())
        .sum()
}
