use std::collections::HashMap;

use serde::Serialize;

use super::DashboardOptions;
use crate::metrics::{
    at_midnight, bucket_by_time_window, group_by, join_rate_per_group, summarize_with,
    AttendanceTally, Bucket, GroupRate, Summary, Tally, WindowBucket, WindowSpec,
};
use crate::models::{AttendanceRecord, AttendanceStatus, Student};
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceDashboard {
    pub today: AttendanceTally,
    /// Present records over all attendance records
    pub present: Summary,
    pub late: Summary,
    pub trend: Vec<WindowBucket<AttendanceTally>>,
    /// Attendance records grouped by their student's class
    pub by_class: Vec<Bucket<AttendanceTally>>,
    /// Share of each stream's students with any present record
    pub rate_by_stream: Vec<GroupRate>,
}

pub fn build(snapshot: &Snapshot, options: &DashboardOptions) -> AttendanceDashboard {
    let records = &snapshot.attendance;

    let mut today = AttendanceTally::default();
    for record in records.iter().filter(|r| r.date == Some(options.today)) {
        today.add(record);
    }

    let class_of: HashMap<&str, String> = snapshot
        .students
        .iter()
        .filter_map(|s| Some((s.id.as_str(), s.class_name()?)))
        .collect();

    AttendanceDashboard {
        today,
        present: summarize_with(records, AttendanceRecord::is_present, options.rate_decimals),
        late: summarize_with(
            records,
            |r| r.status == Some(AttendanceStatus::Late),
            options.rate_decimals,
        ),
        trend: bucket_by_time_window(
            records,
            |r: &AttendanceRecord| at_midnight(r.date),
            WindowSpec::LastDays(options.trend_days),
            options.today,
        ),
        by_class: group_by(records, |r: &AttendanceRecord| {
            r.student_id
                .as_deref()
                .and_then(|id| class_of.get(id))
                .cloned()
        }),
        rate_by_stream: join_rate_per_group(
            &snapshot.students,
            records,
            Student::stream_name,
            Student::key,
            |r: &AttendanceRecord| r.student_id.clone(),
            AttendanceRecord::is_present,
            options.rate_decimals,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn student(id: &str, class: &str, stream: &str) -> Student {
        Student {
            id: id.to_string(),
            class: Some(class.to_string()),
            stream: Some(stream.to_string()),
            ..Student::default()
        }
    }

    fn mark(student_id: &str, status: AttendanceStatus, date: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: format!("{student_id}-{date}"),
            student_id: Some(student_id.to_string()),
            status: Some(status),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        }
    }

    #[test]
    fn builds_today_trend_and_class_breakdown() {
        let snapshot = Snapshot {
            students: vec![
                student("s1", "P1", "East"),
                student("s2", "P1", "West"),
                student("s3", "P2", "East"),
            ],
            attendance: vec![
                mark("s1", AttendanceStatus::Present, "2026-10-16"),
                mark("s2", AttendanceStatus::Late, "2026-10-16"),
                mark("s3", AttendanceStatus::Absent, "2026-10-16"),
                mark("s3", AttendanceStatus::Absent, "2026-10-15"),
                mark("ghost", AttendanceStatus::Present, "2026-10-15"),
            ],
            ..Snapshot::default()
        };
        let options = DashboardOptions::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        let dashboard = build(&snapshot, &options);

        assert_eq!(
            dashboard.today,
            AttendanceTally {
                present: 1,
                absent: 1,
                late: 1
            }
        );
        assert_eq!(dashboard.present.count, 2);
        assert_eq!(dashboard.present.total, 5);
        assert_eq!(dashboard.present.rate, 40.0);
        assert_eq!(dashboard.late.rate, 20.0);

        assert_eq!(dashboard.trend.len(), 7);
        assert_eq!(dashboard.trend[5].tally.total(), 2);
        assert_eq!(dashboard.trend[6].tally.total(), 3);

        let classes: Vec<(&str, usize)> = dashboard
            .by_class
            .iter()
            .map(|b| (b.name.as_str(), b.tally.total()))
            .collect();
        assert_eq!(classes, vec![("P1", 2), ("P2", 2)]);

        let streams: Vec<(&str, f64)> = dashboard
            .rate_by_stream
            .iter()
            .map(|g| (g.name.as_str(), g.rate))
            .collect();
        assert_eq!(
            streams,
            vec![("P1 East", 100.0), ("P1 West", 0.0), ("P2 East", 0.0)]
        );
    }
}
