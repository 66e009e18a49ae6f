use serde::Serialize;

use super::DashboardOptions;
use crate::metrics::{
    at_midnight, bucket_by_time_window, count_by, group_by, sum_by_where, summarize_with,
    AmountTally, Bucket, Count, CountBucket, Summary, WindowBucket, WindowSpec,
};
use crate::models::StaffMember;
use crate::snapshot::Snapshot;

/// Months covered by the hiring trend.
const HIRING_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffDashboard {
    pub headcount: usize,
    pub active: Summary,
    pub by_department: Vec<CountBucket>,
    /// Salaries of active staff
    pub monthly_payroll: f64,
    pub payroll_by_department: Vec<Bucket<AmountTally>>,
    pub hires: Vec<WindowBucket<Count>>,
}

pub fn build(snapshot: &Snapshot, options: &DashboardOptions) -> StaffDashboard {
    let staff = &snapshot.staff;

    let payroll_by_department: Vec<Bucket<AmountTally>> = group_by(staff, |m: &StaffMember| {
        if m.is_active() {
            m.department.clone()
        } else {
            None
        }
    });

    StaffDashboard {
        headcount: staff.len(),
        active: summarize_with(staff, StaffMember::is_active, options.rate_decimals),
        by_department: count_by(staff, |m: &StaffMember| m.department.clone()),
        monthly_payroll: options.amount(sum_by_where(
            staff,
            |m: &StaffMember| m.salary,
            StaffMember::is_active,
        )),
        payroll_by_department: payroll_by_department
            .into_iter()
            .map(|b| Bucket {
                name: b.name,
                tally: b.tally.rounded(options.amount_decimals),
            })
            .collect(),
        hires: bucket_by_time_window(
            staff,
            |m: &StaffMember| at_midnight(m.hired_on),
            WindowSpec::LastMonths(HIRING_MONTHS),
            options.today,
        ),
    }
}
