use serde::Serialize;

use super::DashboardOptions;
use crate::metrics::{
    at_midnight, bucket_by_time_window, count_by, group_by, join_rate_per_group, sum_by_where,
    summarize_with, AmountTally, Bucket, CountBucket, GroupRate, Summary, WindowBucket,
    WindowSpec,
};
use crate::models::{Payment, PaymentStatus, Student};
use crate::snapshot::Snapshot;

/// Fee collection view for accountants and the CFO.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceDashboard {
    /// Paid records against all financial records
    pub payments: Summary,
    pub collected: f64,
    /// Pending plus overdue
    pub outstanding: f64,
    pub overdue: f64,
    pub by_status: Vec<CountBucket>,
    pub by_category: Vec<Bucket<AmountTally>>,
    /// Paid amounts per calendar month, oldest first
    pub monthly_collections: Vec<WindowBucket<AmountTally>>,
    /// Share of each stream's students with at least one paid record
    pub payment_rate_by_stream: Vec<GroupRate>,
}

pub fn build(snapshot: &Snapshot, options: &DashboardOptions) -> FinanceDashboard {
    let payments = &snapshot.payments;
    let amount = |p: &Payment| p.amount;

    let monthly_collections: Vec<WindowBucket<AmountTally>> = bucket_by_time_window(
        payments,
        |p: &Payment| if p.is_paid() { at_midnight(p.date) } else { None },
        WindowSpec::LastMonths(options.trend_months),
        options.today,
    );

    let by_category: Vec<Bucket<AmountTally>> =
        group_by(payments, |p: &Payment| p.category.clone());

    FinanceDashboard {
        payments: summarize_with(payments, Payment::is_paid, options.rate_decimals),
        collected: options.amount(sum_by_where(payments, amount, Payment::is_paid)),
        outstanding: options.amount(sum_by_where(payments, amount, Payment::is_outstanding)),
        overdue: options.amount(sum_by_where(payments, amount, |p| {
            p.status == Some(PaymentStatus::Overdue)
        })),
        by_status: count_by(payments, |p| p.status.map(|s| s.as_str().to_string())),
        by_category: by_category
            .into_iter()
            .map(|b| Bucket {
                name: b.name,
                tally: b.tally.rounded(options.amount_decimals),
            })
            .collect(),
        monthly_collections: monthly_collections
            .into_iter()
            .map(|b| WindowBucket {
                label: b.label,
                tally: b.tally.rounded(options.amount_decimals),
            })
            .collect(),
        payment_rate_by_stream: join_rate_per_group(
            &snapshot.students,
            payments,
            Student::stream_name,
            Student::key,
            |p: &Payment| p.student_id.clone(),
            Payment::is_paid,
            options.rate_decimals,
        ),
    }
}
