use std::collections::HashSet;

use serde::Serialize;

use super::DashboardOptions;
use crate::metrics::{
    bucket_by_time_window, count_by, rank_by_count, sum_by, Count, CountBucket, WindowBucket,
    WindowSpec,
};
use crate::models::ClinicVisit;
use crate::snapshot::Snapshot;

/// Nurse's view of clinic traffic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicDashboard {
    pub visits: usize,
    pub visits_today: usize,
    pub students_seen: usize,
    pub total_cost: f64,
    pub trend: Vec<WindowBucket<Count>>,
    pub by_hour: Vec<WindowBucket<Count>>,
    /// Most common reasons first
    pub by_reason: Vec<CountBucket>,
}

pub fn build(snapshot: &Snapshot, options: &DashboardOptions) -> ClinicDashboard {
    let visits = &snapshot.clinic_visits;
    let students_seen: HashSet<&str> = visits
        .iter()
        .filter_map(|v| v.student_id.as_deref())
        .collect();

    ClinicDashboard {
        visits: visits.len(),
        visits_today: visits
            .iter()
            .filter(|v| v.visited_at.is_some_and(|at| at.date() == options.today))
            .count(),
        students_seen: students_seen.len(),
        total_cost: options.amount(sum_by(visits, |v: &ClinicVisit| v.cost)),
        trend: bucket_by_time_window(
            visits,
            |v: &ClinicVisit| v.visited_at,
            WindowSpec::LastDays(options.trend_days),
            options.today,
        ),
        by_hour: bucket_by_time_window(
            visits,
            |v: &ClinicVisit| v.visited_at,
            WindowSpec::HourOfDay,
            options.today,
        ),
        by_reason: rank_by_count(count_by(visits, |v: &ClinicVisit| {
            v.reason.as_deref().map(str::to_lowercase)
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn visit(student: Option<&str>, reason: &str, cost: Option<f64>, at: &str) -> ClinicVisit {
        ClinicVisit {
            id: format!("{reason}-{at}"),
            student_id: student.map(str::to_string),
            reason: Some(reason.to_string()),
            cost,
            visited_at: chrono::NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M").ok(),
        }
    }

    #[test]
    fn counts_visits_by_day_hour_and_reason() {
        let snapshot = Snapshot {
            clinic_visits: vec![
                visit(Some("s1"), "Fever", Some(10.0), "2026-10-16 09:10"),
                visit(Some("s1"), "fever", None, "2026-10-14 09:40"),
                visit(Some("s2"), "injury", Some(25.0), "2026-10-16 13:05"),
                visit(None, "headache", Some(2.5), "2026-09-01 08:00"),
            ],
            ..Snapshot::default()
        };
        let options = DashboardOptions {
            amount_decimals: 1,
            ..DashboardOptions::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
        };
        let dashboard = build(&snapshot, &options);

        assert_eq!(dashboard.visits, 4);
        assert_eq!(dashboard.visits_today, 2);
        assert_eq!(dashboard.students_seen, 2);
        assert_eq!(dashboard.total_cost, 37.5);
        assert_eq!(dashboard.trend.iter().map(|b| b.tally.count).sum::<usize>(), 3);
        assert_eq!(dashboard.trend[6].tally.count, 2);
        assert_eq!(dashboard.by_hour[9].tally.count, 2);
        assert_eq!(dashboard.by_hour[8].tally.count, 1);
        assert_eq!(dashboard.by_reason[0].name, "fever");
        assert_eq!(dashboard.by_reason[0].count, 2);
    }
}
