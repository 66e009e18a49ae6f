use std::collections::HashSet;

use serde::Serialize;

use super::DashboardOptions;
use crate::metrics::{
    at_midnight, bucket_by_time_window, count_by, group_by, join_rate_per_group, sum_by_where,
    summarize_with, AmountTally, Bucket, CountBucket, GroupRate, Summary, WindowBucket,
    WindowSpec,
};
use crate::models::{Sponsorship, SponsorshipStatus, Student};
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SponsorshipDashboard {
    /// Students with an active sponsorship against all students
    pub coverage: Summary,
    pub committed: f64,
    pub pending: f64,
    pub by_status: Vec<CountBucket>,
    /// Sponsorships by start month, oldest first
    pub new_per_month: Vec<WindowBucket<AmountTally>>,
    pub coverage_by_class: Vec<GroupRate>,
    /// Active commitments per sponsor, largest first
    pub by_sponsor: Vec<Bucket<AmountTally>>,
}

pub fn build(snapshot: &Snapshot, options: &DashboardOptions) -> SponsorshipDashboard {
    let sponsorships = &snapshot.sponsorships;
    let amount = |s: &Sponsorship| s.amount;

    let sponsored: HashSet<&str> = sponsorships
        .iter()
        .filter(|s| s.is_active())
        .filter_map(|s| s.student_id.as_deref())
        .collect();

    let mut by_sponsor: Vec<Bucket<AmountTally>> = group_by(sponsorships, |s: &Sponsorship| {
        if s.is_active() {
            s.sponsor_name.clone()
        } else {
            None
        }
    });
    by_sponsor.sort_by(|a, b| b.tally.amount.total_cmp(&a.tally.amount));

    let new_per_month: Vec<WindowBucket<AmountTally>> = bucket_by_time_window(
        sponsorships,
        |s: &Sponsorship| at_midnight(s.start_date),
        WindowSpec::LastMonths(options.trend_months),
        options.today,
    );

    SponsorshipDashboard {
        coverage: summarize_with(
            &snapshot.students,
            |s| sponsored.contains(s.id.as_str()),
            options.rate_decimals,
        ),
        committed: options.amount(sum_by_where(sponsorships, amount, Sponsorship::is_active)),
        pending: options.amount(sum_by_where(sponsorships, amount, |s| {
            s.status == Some(SponsorshipStatus::Pending)
        })),
        by_status: count_by(sponsorships, |s| s.status.map(|st| st.as_str().to_string())),
        new_per_month: new_per_month
            .into_iter()
            .map(|b| WindowBucket {
                label: b.label,
                tally: b.tally.rounded(options.amount_decimals),
            })
            .collect(),
        coverage_by_class: join_rate_per_group(
            &snapshot.students,
            sponsorships,
            Student::class_name,
            Student::key,
            |s: &Sponsorship| s.student_id.clone(),
            Sponsorship::is_active,
            options.rate_decimals,
        ),
        by_sponsor: by_sponsor
            .into_iter()
            .map(|b| Bucket {
                name: b.name,
                tally: b.tally.rounded(options.amount_decimals),
            })
            .collect(),
    }
}
