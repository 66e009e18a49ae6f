//! Plain-text rendering of a dashboard for the terminal.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::dashboard::{
    AttendanceDashboard, ClinicDashboard, Dashboard, FamilyDashboard, FinanceDashboard,
    MessagingDashboard, OverviewDashboard, SponsorshipDashboard, StaffDashboard,
};
use crate::metrics::{Count, CountBucket, GroupRate, Summary, WindowBucket};

pub fn render_text(dashboard: &Dashboard, today: NaiveDate) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {} Dashboard", dashboard.title());
    let _ = writeln!(output, "As of {today}");

    match dashboard {
        Dashboard::Finance(d) => finance(&mut output, d),
        Dashboard::Attendance(d) => attendance(&mut output, d),
        Dashboard::Overview(d) => overview(&mut output, d),
        Dashboard::Clinic(d) => clinic(&mut output, d),
        Dashboard::Sponsorship(d) => sponsorship(&mut output, d),
        Dashboard::Messaging(d) => messaging(&mut output, d),
        Dashboard::Staff(d) => staff(&mut output, d),
        Dashboard::Family(d) => family(&mut output, d),
    }

    output
}

fn finance(output: &mut String, d: &FinanceDashboard) {
    section(output, "Collections");
    let _ = writeln!(output, "- Paid records: {}", summary(&d.payments));
    let _ = writeln!(output, "- Collected: {:.2}", d.collected);
    let _ = writeln!(output, "- Outstanding: {:.2} (overdue {:.2})", d.outstanding, d.overdue);
    counts(output, "By Status", &d.by_status);

    section(output, "By Category");
    if d.by_category.is_empty() {
        let _ = writeln!(output, "No financial records.");
    }
    for bucket in &d.by_category {
        let _ = writeln!(
            output,
            "- {}: {:.2} across {} records",
            bucket.name, bucket.tally.amount, bucket.tally.count
        );
    }

    section(output, "Monthly Collections");
    series(output, &d.monthly_collections, |t| format!("{:.2}", t.amount));
    rates(output, "Payment Rate by Stream", &d.payment_rate_by_stream);
}

fn attendance(output: &mut String, d: &AttendanceDashboard) {
    section(output, "Today");
    let _ = writeln!(
        output,
        "- Present {}, absent {}, late {}",
        d.today.present, d.today.absent, d.today.late
    );
    let _ = writeln!(output, "- Present overall: {}", summary(&d.present));
    let _ = writeln!(output, "- Late overall: {}", summary(&d.late));

    section(output, "Trend");
    series(output, &d.trend, |t| {
        format!("present {}, absent {}, late {}", t.present, t.absent, t.late)
    });

    section(output, "By Class");
    if d.by_class.is_empty() {
        let _ = writeln!(output, "No attendance recorded.");
    }
    for bucket in &d.by_class {
        let _ = writeln!(
            output,
            "- {}: present {}, absent {}, late {}",
            bucket.name, bucket.tally.present, bucket.tally.absent, bucket.tally.late
        );
    }
    rates(output, "Attendance Rate by Stream", &d.rate_by_stream);
}

fn overview(output: &mut String, d: &OverviewDashboard) {
    section(output, "School");
    let _ = writeln!(output, "- Students: {} ({} active)", d.students, d.active_students.count);
    let _ = writeln!(output, "- Attendance rate: {:.1}%", d.attendance_rate);
    let _ = writeln!(output, "- Payment rate: {:.1}%", d.payment_rate);
    let _ = writeln!(output, "- Performance: {}", d.performance);
    let _ = writeln!(output, "- Revenue collected: {:.2}", d.revenue_collected);
    let _ = writeln!(output, "- Outstanding: {:.2}", d.outstanding);
    let _ = writeln!(output, "- Active staff: {}", d.active_staff);
    let _ = writeln!(output, "- Active sponsorships: {}", d.active_sponsorships);
    counts(output, "Students by Class", &d.by_class);
    counts(output, "Students by Stream", &d.by_stream);
    counts(output, "Students by Gender", &d.by_gender);
}

fn clinic(output: &mut String, d: &ClinicDashboard) {
    section(output, "Visits");
    let _ = writeln!(output, "- Total: {} ({} today)", d.visits, d.visits_today);
    let _ = writeln!(output, "- Students seen: {}", d.students_seen);
    let _ = writeln!(output, "- Total cost: {:.2}", d.total_cost);

    section(output, "Trend");
    series(output, &d.trend, |t| t.count.to_string());
    section(output, "Busiest Hours");
    series(output, &busiest(&d.by_hour), |t| t.count.to_string());
    counts(output, "By Reason", &d.by_reason);
}

fn sponsorship(output: &mut String, d: &SponsorshipDashboard) {
    section(output, "Coverage");
    let _ = writeln!(output, "- Sponsored students: {}", summary(&d.coverage));
    let _ = writeln!(output, "- Committed: {:.2}", d.committed);
    let _ = writeln!(output, "- Pending: {:.2}", d.pending);
    counts(output, "By Status", &d.by_status);

    section(output, "New Sponsorships");
    series(output, &d.new_per_month, |t| format!("{} ({:.2})", t.count, t.amount));

    section(output, "Sponsors");
    if d.by_sponsor.is_empty() {
        let _ = writeln!(output, "No active sponsors.");
    }
    for bucket in &d.by_sponsor {
        let _ = writeln!(
            output,
            "- {}: {:.2} across {} sponsorships",
            bucket.name, bucket.tally.amount, bucket.tally.count
        );
    }
    rates(output, "Coverage by Class", &d.coverage_by_class);
}

fn messaging(output: &mut String, d: &MessagingDashboard) {
    section(output, "Inbox");
    let _ = writeln!(output, "- Messages: {}", d.messages);
    let _ = writeln!(output, "- Unread: {}", summary(&d.unread));
    counts(output, "By Category", &d.by_category);
    section(output, "Trend");
    series(output, &d.trend, |t| t.count.to_string());
    section(output, "By Weekday");
    series(output, &d.by_weekday, |t| t.count.to_string());
    section(output, "Busiest Hours");
    series(output, &busiest(&d.by_hour), |t| t.count.to_string());
}

fn staff(output: &mut String, d: &StaffDashboard) {
    section(output, "Staff");
    let _ = writeln!(output, "- Headcount: {}", d.headcount);
    let _ = writeln!(output, "- Active: {}", summary(&d.active));
    let _ = writeln!(output, "- Monthly payroll: {:.2}", d.monthly_payroll);
    counts(output, "By Department", &d.by_department);

    section(output, "Payroll by Department");
    if d.payroll_by_department.is_empty() {
        let _ = writeln!(output, "No active staff.");
    }
    for bucket in &d.payroll_by_department {
        let _ = writeln!(
            output,
            "- {}: {:.2} across {} staff",
            bucket.name, bucket.tally.amount, bucket.tally.count
        );
    }

    section(output, "Hires");
    series(output, &d.hires, |t| t.count.to_string());
}

fn family(output: &mut String, d: &FamilyDashboard) {
    section(output, "Students");
    if d.students.is_empty() {
        let _ = writeln!(output, "No students linked to this account.");
    }
    for standing in &d.students {
        let _ = writeln!(
            output,
            "- {} ({}): attendance {:.1}%, fees paid {:.1}%, balance {:.2}, {}",
            standing.name,
            standing.class.as_deref().unwrap_or("unassigned"),
            standing.attendance.rate,
            standing.payments.rate,
            standing.balance,
            standing.tier
        );
    }
}

fn section(output: &mut String, title: &str) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## {title}");
}

fn summary(value: &Summary) -> String {
    format!("{} of {} ({:.1}%)", value.count, value.total, value.rate)
}

fn counts(output: &mut String, title: &str, buckets: &[CountBucket]) {
    section(output, title);
    if buckets.is_empty() {
        let _ = writeln!(output, "Nothing recorded.");
    }
    for bucket in buckets {
        let _ = writeln!(output, "- {}: {}", bucket.name, bucket.count);
    }
}

fn rates(output: &mut String, title: &str, groups: &[GroupRate]) {
    section(output, title);
    if groups.is_empty() {
        let _ = writeln!(output, "Nothing recorded.");
    }
    for group in groups {
        let _ = writeln!(
            output,
            "- {}: {:.1}% ({} of {})",
            group.name, group.rate, group.matched, group.total
        );
    }
}

/// Hours with at least one event.
fn busiest(hours: &[WindowBucket<Count>]) -> Vec<WindowBucket<Count>> {
    hours.iter().filter(|b| b.tally.count > 0).cloned().collect()
}

fn series<T, F>(output: &mut String, buckets: &[WindowBucket<T>], value: F)
where
    F: Fn(&T) -> String,
{
    if buckets.is_empty() {
        let _ = writeln!(output, "Nothing recorded.");
    }
    for bucket in buckets {
        let _ = writeln!(output, "- {}: {}", bucket.label, value(&bucket.tally));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{build, DashboardOptions, Role};
    use crate::db::seed_snapshot;
    use crate::snapshot::Snapshot;

    #[test]
    fn renders_finance_sections() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let dashboard = build(Role::Cfo, &seed_snapshot(today), &DashboardOptions::new(today));
        let text = render_text(&dashboard, today);

        assert!(text.starts_with("# Finance Dashboard\nAs of 2026-10-16\n"));
        assert!(text.contains("- Paid records: 4 of 6 (66.7%)"));
        assert!(text.contains("- Collected: 1430.00"));
        assert!(text.contains("## Payment Rate by Stream"));
        assert!(text.contains("- Oct: "));
    }

    #[test]
    fn staff_and_inbox_show_payroll_and_busy_hours() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let snapshot = seed_snapshot(today);
        let options = DashboardOptions::new(today);

        let staff = render_text(&build(Role::Hr, &snapshot, &options), today);
        assert!(staff.contains("## Payroll by Department"));
        assert!(staff.contains("- teaching: 1200.00 across 1 staff"));

        let inbox = render_text(&build(Role::Secretary, &snapshot, &options), today);
        assert!(inbox.contains("## Busiest Hours"));
        assert!(inbox.contains("- 08:00: 1"));
        assert!(!inbox.contains("- 09:00:"));

        let sponsors = render_text(&build(Role::Sponsor, &snapshot, &options), today);
        assert!(sponsors.contains("- Harbor Foundation: 900.00 across 1 sponsorships"));
    }

    #[test]
    fn empty_snapshot_renders_zeroes_not_errors() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let options = DashboardOptions::new(today);
        for role in Role::ALL {
            let text = render_text(&build(role, &Snapshot::default(), &options), today);
            assert!(!text.contains("NaN"), "{role}: {text}");
        }

        let text = render_text(&build(Role::Teacher, &Snapshot::default(), &options), today);
        assert!(text.contains("- Present overall: 0 of 0 (0.0%)"));
        assert!(text.contains("- Sat: present 0, absent 0, late 0"));
    }
}
