use std::fs;

use chrono::NaiveDate;
use tempfile::TempDir;

use groupscholar_dashboard_metrics::dashboard::{build, Dashboard, DashboardOptions, Role};
use groupscholar_dashboard_metrics::logging;
use groupscholar_dashboard_metrics::models::{PaymentStatus, StudentStatus};
use groupscholar_dashboard_metrics::report::render_text;
use groupscholar_dashboard_metrics::snapshot::Snapshot;
use groupscholar_dashboard_metrics::Error;

const FIXTURE: &str = r#"{
  "students": [
    {"id": "s1", "name": "Amina Odhiambo", "class": "P1", "stream": "East", "gender": "female", "status": "active"},
    {"id": "s2", "name": "Brian Mwangi", "class": "P1", "stream": "West", "gender": "male", "status": "Active"},
    {"id": "s3", "name": "Cynthia Njeri", "class": "P2", "stream": "East", "gender": "female", "status": "inactive"}
  ],
  "financialRecords": [
    {"id": "f1", "studentId": "s1", "status": "Paid", "amount": 100, "category": "tuition", "date": "2026-10-01"},
    {"id": "f2", "studentId": "s2", "status": "pending", "amount": "80", "category": "tuition", "date": "2026-09-10"},
    {"id": "f3", "studentId": "s3", "status": "overdue", "amount": 20, "category": "meals", "date": "2026-08-05"},
    {"id": "f4", "studentId": "s1", "status": "paid", "amount": "n/a", "category": "meals", "date": "not a date"}
  ],
  "attendance": [
    {"id": "a1", "studentId": "s1", "status": "present", "date": "2026-10-16"},
    {"id": "a2", "studentId": "s2", "status": "late", "date": "2026-10-16"},
    {"id": "a3", "studentId": "s3", "status": "absent", "date": "2026-10-15"},
    {"id": "a4", "studentId": "s1", "status": "PRESENT", "date": "2026-10-14T07:45:00Z"},
    {"id": "a5", "studentId": "ghost", "status": "present", "date": "2026-10-16"}
  ]
}"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn options() -> DashboardOptions {
    DashboardOptions::new(today())
}

fn fixture() -> Snapshot {
    serde_json::from_str(FIXTURE).unwrap()
}

#[test]
fn finance_dashboard_from_json_snapshot() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.json");
    fs::write(&path, FIXTURE).unwrap();

    let snapshot = Snapshot::from_json_path(&path).unwrap();
    assert_eq!(snapshot.payments.len(), 4);
    assert_eq!(snapshot.payments[1].amount, Some(80.0));
    assert_eq!(snapshot.payments[3].amount, None);
    assert_eq!(snapshot.payments[3].date, None);

    let Dashboard::Finance(finance) = build(Role::Accountant, &snapshot, &options()) else {
        panic!("accountants land on the finance dashboard");
    };

    assert_eq!(finance.payments.count, 2);
    assert_eq!(finance.payments.total, 4);
    assert_eq!(finance.payments.rate, 50.0);
    assert_eq!(finance.collected, 100.0);
    assert_eq!(finance.outstanding, 100.0);
    assert_eq!(finance.overdue, 20.0);

    let statuses: Vec<(&str, usize)> = finance
        .by_status
        .iter()
        .map(|b| (b.name.as_str(), b.count))
        .collect();
    assert_eq!(statuses, vec![("paid", 2), ("pending", 1), ("overdue", 1)]);

    assert_eq!(finance.by_category[0].name, "tuition");
    assert_eq!(finance.by_category[0].tally.amount, 180.0);
    assert_eq!(finance.by_category[1].name, "meals");
    assert_eq!(finance.by_category[1].tally.amount, 20.0);

    assert_eq!(finance.monthly_collections.len(), 6);
    let october = &finance.monthly_collections[5];
    assert_eq!(october.label, "Oct");
    assert_eq!(october.tally.amount, 100.0);

    let streams: Vec<(&str, usize, usize)> = finance
        .payment_rate_by_stream
        .iter()
        .map(|g| (g.name.as_str(), g.matched, g.total))
        .collect();
    assert_eq!(streams, vec![("P1 East", 1, 1), ("P1 West", 0, 1), ("P2 East", 0, 1)]);
}

#[test]
fn teacher_dashboard_tracks_today_and_trend() {
    logging::init_test();
    let snapshot = fixture();
    let Dashboard::Attendance(attendance) = build(Role::Teacher, &snapshot, &options()) else {
        panic!("teachers land on the attendance dashboard");
    };

    assert_eq!(
        (attendance.today.present, attendance.today.absent, attendance.today.late),
        (2, 0, 1)
    );
    assert_eq!(attendance.present.count, 3);
    assert_eq!(attendance.present.total, 5);
    assert_eq!(attendance.present.rate, 60.0);

    let labels: Vec<&str> = attendance.trend.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"]);
    assert_eq!(attendance.trend[6].tally.present, 2);
    assert_eq!(attendance.trend[5].tally.absent, 1);
    assert_eq!(attendance.trend[4].tally.present, 1);

    // The record for an unknown student has no class to land in.
    assert_eq!(attendance.by_class.len(), 2);
    assert_eq!(attendance.by_class[0].name, "P1");
    assert_eq!(attendance.by_class[0].tally.present, 2);
    assert_eq!(attendance.by_class[0].tally.late, 1);
    assert_eq!(attendance.by_class[1].name, "P2");
    assert_eq!(attendance.by_class[1].tally.absent, 1);
}

#[test]
fn admin_overview_counts_students() {
    let snapshot = fixture();
    let Dashboard::Overview(overview) = build(Role::Admin, &snapshot, &options()) else {
        panic!("admins land on the overview dashboard");
    };

    assert_eq!(overview.students, 3);
    assert_eq!(overview.active_students.count, 2);
    assert_eq!(overview.by_class[0].name, "P1");
    assert_eq!(overview.by_class[0].count, 2);
    assert_eq!(overview.by_gender[0].name, "female");
    assert_eq!(overview.by_gender[0].count, 2);
    assert_eq!(overview.attendance_rate, 60.0);
    assert_eq!(overview.payment_rate, 50.0);
}

#[test]
fn parent_view_is_scoped_to_one_student() {
    let snapshot = fixture().for_student("s1");
    let Dashboard::Family(family) = build(Role::Parent, &snapshot, &options()) else {
        panic!("parents land on the family dashboard");
    };

    assert_eq!(family.students.len(), 1);
    let amina = &family.students[0];
    assert_eq!(amina.name, "Amina Odhiambo");
    assert_eq!(amina.attendance.rate, 100.0);
    assert_eq!(amina.payments.rate, 100.0);
    assert_eq!(amina.tier, "Excellent");
}

#[test]
fn csv_directory_loads_like_json() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("students.csv"),
        "id,name,class,stream,gender,status\n\
         s1,Amina Odhiambo,P1,East,female,active\n\
         s2,Brian Mwangi,P1,West,male,graduated\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("payments.csv"),
        "id,studentId,status,amount,category,date\n\
         f1,s1,paid,100,tuition,2026-10-01\n\
         f2,s2,Overdue,45.5,tuition,2026-09-10\n\
         f3,s2,refunded,abc,tuition,2026-09-11\n",
    )
    .unwrap();

    let snapshot = Snapshot::from_csv_dir(dir.path()).unwrap();
    assert_eq!(snapshot.students.len(), 2);
    assert_eq!(snapshot.students[1].status, Some(StudentStatus::Graduated));
    assert_eq!(snapshot.payments[1].status, Some(PaymentStatus::Overdue));
    assert_eq!(snapshot.payments[1].amount, Some(45.5));
    assert_eq!(snapshot.payments[2].status, Some(PaymentStatus::Other));
    assert_eq!(snapshot.payments[2].amount, None);
    assert!(snapshot.attendance.is_empty());
    assert!(snapshot.staff.is_empty());

    let Dashboard::Finance(finance) = build(Role::Cfo, &snapshot, &options()) else {
        panic!("the CFO lands on the finance dashboard");
    };
    assert_eq!(finance.payments.rate, 33.3);
    assert_eq!(finance.collected, 100.0);
    assert_eq!(finance.overdue, 46.0);
}

#[test]
fn csv_text_cells_are_kept_verbatim() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("students.csv"),
        "id,name,class,stream,gender,status\n\
         0042,Nan,P3,North,,active\n\
         0043,True,P3,North,male,active\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("payments.csv"),
        "id,studentId,status,amount,category,date\n\
         007,0042,paid,1e2,true,2026-10-02\n",
    )
    .unwrap();

    let snapshot = Snapshot::from_csv_dir(dir.path()).unwrap();
    assert_eq!(snapshot.students[0].id, "0042");
    assert_eq!(snapshot.students[0].name.as_deref(), Some("Nan"));
    assert_eq!(snapshot.students[0].gender, None);
    assert_eq!(snapshot.students[1].name.as_deref(), Some("True"));
    assert_eq!(snapshot.payments[0].id, "007");
    assert_eq!(snapshot.payments[0].student_id.as_deref(), Some("0042"));
    assert_eq!(snapshot.payments[0].category.as_deref(), Some("true"));
    assert_eq!(snapshot.payments[0].amount, Some(100.0));

    let scoped = snapshot.for_student("0042");
    let Dashboard::Family(family) = build(Role::Parent, &scoped, &options()) else {
        panic!("parents land on the family dashboard");
    };
    assert_eq!(family.students.len(), 1);
    assert_eq!(family.students[0].name, "Nan");
    assert_eq!(family.students[0].payments.count, 1);
}

#[test]
fn csv_source_must_be_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("students.csv");
    fs::write(&file, "id\n").unwrap();

    assert!(matches!(
        Snapshot::from_csv_dir(&file),
        Err(Error::Config(_))
    ));
}

#[test]
fn malformed_json_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(Snapshot::from_json_path(&path), Err(Error::Json(_))));
}

#[test]
fn every_role_renders_from_the_fixture() {
    let snapshot = fixture();
    let options = DashboardOptions::new(today());
    for role in Role::ALL {
        let dashboard = build(role, &snapshot, &options);
        let text = render_text(&dashboard, options.today);
        assert!(text.starts_with(&format!("# {} Dashboard", dashboard.title())));
        assert!(!text.contains("NaN"), "{role}: {text}");

        let json = serde_json::to_value(&dashboard).unwrap();
        assert!(json.get("dashboard").is_some(), "{role}: {json}");
    }
}
