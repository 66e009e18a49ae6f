use std::collections::HashMap;

use serde::Serialize;

use super::DashboardOptions;
use crate::metrics::{sum_by_where, summarize_with, Summary};
use crate::models::{AttendanceRecord, Payment};
use crate::snapshot::Snapshot;

/// Where one student stands on attendance and fees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentStanding {
    pub student_id: String,
    pub name: String,
    pub class: Option<String>,
    pub attendance: Summary,
    pub payments: Summary,
    /// Pending plus overdue amounts
    pub balance: f64,
    pub tier: String,
}

/// A parent's view: one standing per student in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyDashboard {
    pub students: Vec<StudentStanding>,
}

pub fn build(snapshot: &Snapshot, options: &DashboardOptions) -> FamilyDashboard {
    let attendance = index_by_student(&snapshot.attendance, |r| r.student_id.as_deref());
    let payments = index_by_student(&snapshot.payments, |p| p.student_id.as_deref());

    let students = snapshot
        .students
        .iter()
        .map(|student| {
            let marks: &[&AttendanceRecord] = attendance
                .get(student.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let fees: &[&Payment] = payments
                .get(student.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();

            let present = summarize_with(marks, |r| r.is_present(), options.rate_decimals);
            let paid = summarize_with(fees, |p| p.is_paid(), options.rate_decimals);
            StudentStanding {
                student_id: student.id.clone(),
                name: student.display_name().to_string(),
                class: student.class_name(),
                attendance: present,
                payments: paid,
                balance: options.amount(sum_by_where(
                    fees,
                    |p| p.amount,
                    |p| p.is_outstanding(),
                )),
                tier: options
                    .tiers
                    .classify(present.rate, paid.rate)
                    .to_string(),
            }
        })
        .collect();

    FamilyDashboard { students }
}

fn index_by_student<'a, R, K>(records: &'a [R], key: K) -> HashMap<&'a str, Vec<&'a R>>
where
    K: Fn(&'a R) -> Option<&'a str>,
{
    let mut index: HashMap<&str, Vec<&R>> = HashMap::new();
    for record in records {
        if let Some(id) = key(record) {
            index.entry(id).or_default().push(record);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed_snapshot;
    use chrono::NaiveDate;

    #[test]
    fn one_standing_per_child() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let snapshot = seed_snapshot(today).for_student("stu-001");
        let dashboard = build(&snapshot, &DashboardOptions::new(today));

        assert_eq!(dashboard.students.len(), 1);
        let avery = &dashboard.students[0];
        assert_eq!(avery.name, "Avery Lee");
        assert_eq!(avery.class.as_deref(), Some("P4"));
        assert_eq!(avery.attendance.total, 5);
        assert_eq!(avery.attendance.count, 3);
        assert_eq!(avery.payments.rate, 100.0);
        assert_eq!(avery.balance, 0.0);
        assert_eq!(avery.tier, "Needs Attention");
    }

    #[test]
    fn student_without_records_is_zeroed_not_dropped() {
        let snapshot = Snapshot {
            students: vec![crate::models::Student {
                id: "new".to_string(),
                ..Default::default()
            }],
            ..Snapshot::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let dashboard = build(&snapshot, &DashboardOptions::new(today));

        let standing = &dashboard.students[0];
        assert_eq!(standing.name, "new");
        assert_eq!(standing.attendance, Summary::default());
        assert_eq!(standing.tier, "Needs Attention");
    }
}
