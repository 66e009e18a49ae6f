use serde::Serialize;

use super::DashboardOptions;
use crate::metrics::{count_by, sum_by_where, summarize_with, CountBucket, Summary};
use crate::models::{AttendanceRecord, Payment, Student, StudentStatus};
use crate::snapshot::Snapshot;

/// School-wide view for administrators, superusers, overseers and the
/// operations manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewDashboard {
    pub students: usize,
    pub active_students: Summary,
    pub by_class: Vec<CountBucket>,
    pub by_stream: Vec<CountBucket>,
    pub by_gender: Vec<CountBucket>,
    pub attendance_rate: f64,
    pub payment_rate: f64,
    /// Tier from attendance rate (primary) and payment rate (secondary)
    pub performance: String,
    pub revenue_collected: f64,
    pub outstanding: f64,
    pub active_staff: usize,
    pub active_sponsorships: usize,
}

pub fn build(snapshot: &Snapshot, options: &DashboardOptions) -> OverviewDashboard {
    let decimals = options.rate_decimals;
    let attendance = summarize_with(&snapshot.attendance, AttendanceRecord::is_present, decimals);
    let payments = summarize_with(&snapshot.payments, Payment::is_paid, decimals);
    let amount = |p: &Payment| p.amount;

    OverviewDashboard {
        students: snapshot.students.len(),
        active_students: summarize_with(
            &snapshot.students,
            |s| s.status == Some(StudentStatus::Active),
            decimals,
        ),
        by_class: count_by(&snapshot.students, Student::class_name),
        by_stream: count_by(&snapshot.students, Student::stream_name),
        by_gender: count_by(&snapshot.students, |s: &Student| s.gender.clone()),
        attendance_rate: attendance.rate,
        payment_rate: payments.rate,
        performance: options
            .tiers
            .classify(attendance.rate, payments.rate)
            .to_string(),
        revenue_collected: options.amount(sum_by_where(
            &snapshot.payments,
            amount,
            Payment::is_paid,
        )),
        outstanding: options.amount(sum_by_where(
            &snapshot.payments,
            amount,
            Payment::is_outstanding,
        )),
        active_staff: snapshot.staff.iter().filter(|m| m.is_active()).count(),
        active_sponsorships: snapshot.sponsorships.iter().filter(|s| s.is_active()).count(),
    }
}
