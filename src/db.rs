use chrono::{Duration, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    AttendanceRecord, AttendanceStatus, ClinicVisit, Message, MessageStatus, Payment,
    PaymentStatus, Sponsorship, SponsorshipStatus, StaffMember, StaffStatus, Student,
    StudentStatus,
};
use crate::snapshot::Snapshot;

pub async fn init_db(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> Result<usize> {
    let snapshot = seed_snapshot(Utc::now().date_naive());
    store_snapshot(pool, &snapshot).await
}

/// A small school with a week of attendance and a term of payments,
/// dated relative to `today`.
pub fn seed_snapshot(today: NaiveDate) -> Snapshot {
    let days_ago = |n: i64| today - Duration::days(n);
    let students = vec![
        ("stu-001", "Avery Lee", "P4", "East", "F"),
        ("stu-002", "Jules Moreno", "P4", "East", "M"),
        ("stu-003", "Kiara Patel", "P4", "West", "F"),
        ("stu-004", "Tomas Okafor", "P5", "East", "M"),
        ("stu-005", "Mina Sato", "P5", "West", "F"),
    ];

    let mut snapshot = Snapshot {
        students: students
            .iter()
            .map(|(id, name, class, stream, gender)| Student {
                id: id.to_string(),
                name: Some(name.to_string()),
                class: Some(class.to_string()),
                stream: Some(stream.to_string()),
                gender: Some(gender.to_string()),
                status: Some(StudentStatus::Active),
            })
            .collect(),
        ..Snapshot::default()
    };

    let payments = [
        ("seed-pay-001", "stu-001", PaymentStatus::Paid, 450.0, "tuition", 40),
        ("seed-pay-002", "stu-002", PaymentStatus::Paid, 450.0, "tuition", 35),
        ("seed-pay-003", "stu-003", PaymentStatus::Pending, 450.0, "tuition", 20),
        ("seed-pay-004", "stu-004", PaymentStatus::Overdue, 450.0, "tuition", 70),
        ("seed-pay-005", "stu-001", PaymentStatus::Paid, 80.0, "transport", 5),
        ("seed-pay-006", "stu-005", PaymentStatus::Paid, 450.0, "tuition", 2),
    ];
    snapshot.payments = payments
        .iter()
        .map(|(id, student_id, status, amount, category, ago)| Payment {
            id: id.to_string(),
            student_id: Some(student_id.to_string()),
            status: Some(*status),
            amount: Some(*amount),
            category: Some(category.to_string()),
            date: Some(days_ago(*ago)),
        })
        .collect();

    let statuses = [
        AttendanceStatus::Present,
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
    ];
    for ago in 0..5i64 {
        for (index, (student_id, ..)) in students.iter().enumerate() {
            let status = statuses[(index + ago as usize) % statuses.len()];
            snapshot.attendance.push(AttendanceRecord {
                id: format!("seed-att-{ago}-{student_id}"),
                student_id: Some(student_id.to_string()),
                status: Some(status),
                date: Some(days_ago(ago)),
            });
        }
    }

    snapshot.sponsorships = vec![
        Sponsorship {
            id: "seed-spn-001".to_string(),
            student_id: Some("stu-003".to_string()),
            sponsor_name: Some("Harbor Foundation".to_string()),
            status: Some(SponsorshipStatus::Active),
            amount: Some(900.0),
            start_date: Some(days_ago(60)),
        },
        Sponsorship {
            id: "seed-spn-002".to_string(),
            student_id: Some("stu-004".to_string()),
            sponsor_name: Some("Northside Rotary".to_string()),
            status: Some(SponsorshipStatus::Pending),
            amount: Some(450.0),
            start_date: Some(days_ago(3)),
        },
    ];

    snapshot.clinic_visits = [
        ("seed-vis-001", "stu-002", "headache", 5.0, 1, 10),
        ("seed-vis-002", "stu-005", "injury", 20.0, 3, 13),
        ("seed-vis-003", "stu-002", "fever", 12.0, 6, 9),
    ]
    .iter()
    .map(|(id, student_id, reason, cost, ago, hour)| ClinicVisit {
        id: id.to_string(),
        student_id: Some(student_id.to_string()),
        reason: Some(reason.to_string()),
        cost: Some(*cost),
        visited_at: days_ago(*ago).and_hms_opt(*hour, 0, 0),
    })
    .collect();

    snapshot.messages = [
        ("seed-msg-001", "Parent of Avery Lee", "fees", MessageStatus::Unread, 0, 8),
        ("seed-msg-002", "Transport office", "transport", MessageStatus::Read, 2, 15),
        ("seed-msg-003", "Parent of Mina Sato", "health", MessageStatus::Unread, 4, 11),
    ]
    .iter()
    .map(|(id, sender, category, status, ago, hour)| Message {
        id: id.to_string(),
        sender: Some(sender.to_string()),
        category: Some(category.to_string()),
        status: Some(*status),
        sent_at: days_ago(*ago).and_hms_opt(*hour, 30, 0),
    })
    .collect();

    snapshot.staff = [
        ("seed-stf-001", "Grace Mwangi", "teaching", StaffStatus::Active, 1200.0, 400),
        ("seed-stf-002", "Daniel Otieno", "teaching", StaffStatus::OnLeave, 1150.0, 900),
        ("seed-stf-003", "Ruth Achieng", "health", StaffStatus::Active, 950.0, 120),
        ("seed-stf-004", "Peter Kamau", "finance", StaffStatus::Active, 1300.0, 45),
    ]
    .iter()
    .map(|(id, name, department, status, salary, ago)| StaffMember {
        id: id.to_string(),
        name: Some(name.to_string()),
        department: Some(department.to_string()),
        status: Some(*status),
        salary: Some(*salary),
        hired_on: Some(days_ago(*ago)),
    })
    .collect();

    snapshot
}

/// Upserts every record of `snapshot` in one transaction. Records without
/// an id get a generated one. Returns the number of rows written.
pub async fn store_snapshot(pool: &PgPool, snapshot: &Snapshot) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut written = 0usize;

    for student in &snapshot.students {
        written += upsert_student(&mut tx, student).await?;
    }
    for payment in &snapshot.payments {
        written += upsert_payment(&mut tx, payment).await?;
    }
    for record in &snapshot.attendance {
        written += upsert_attendance(&mut tx, record).await?;
    }
    for sponsorship in &snapshot.sponsorships {
        written += upsert_sponsorship(&mut tx, sponsorship).await?;
    }
    for visit in &snapshot.clinic_visits {
        written += upsert_clinic_visit(&mut tx, visit).await?;
    }
    for message in &snapshot.messages {
        written += upsert_message(&mut tx, message).await?;
    }
    for member in &snapshot.staff {
        written += upsert_staff(&mut tx, member).await?;
    }

    tx.commit().await?;
    tracing::info!(written, "Stored snapshot");
    Ok(written)
}

fn record_id(id: &str) -> String {
    if id.trim().is_empty() {
        format!("import-{}", Uuid::new_v4())
    } else {
        id.to_string()
    }
}

async fn upsert_student(tx: &mut Transaction<'_, Postgres>, student: &Student) -> Result<usize> {
    let result = sqlx::query(
        r#"
        INSERT INTO school_dashboard.students (id, name, class, stream, gender, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name, class = EXCLUDED.class, stream = EXCLUDED.stream,
            gender = EXCLUDED.gender, status = EXCLUDED.status
        "#,
    )
    .bind(record_id(&student.id))
    .bind(&student.name)
    .bind(&student.class)
    .bind(&student.stream)
    .bind(&student.gender)
    .bind(student.status.map(|s| s.as_str()))
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() as usize)
}

async fn upsert_payment(tx: &mut Transaction<'_, Postgres>, payment: &Payment) -> Result<usize> {
    let result = sqlx::query(
        r#"
        INSERT INTO school_dashboard.payments (id, student_id, status, amount, category, paid_on)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE
        SET student_id = EXCLUDED.student_id, status = EXCLUDED.status, amount = EXCLUDED.amount,
            category = EXCLUDED.category, paid_on = EXCLUDED.paid_on
        "#,
    )
    .bind(record_id(&payment.id))
    .bind(&payment.student_id)
    .bind(payment.status.map(|s| s.as_str()))
    .bind(payment.amount)
    .bind(&payment.category)
    .bind(payment.date)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() as usize)
}

async fn upsert_attendance(
    tx: &mut Transaction<'_, Postgres>,
    record: &AttendanceRecord,
) -> Result<usize> {
    let result = sqlx::query(
        r#"
        INSERT INTO school_dashboard.attendance (id, student_id, status, attended_on)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE
        SET student_id = EXCLUDED.student_id, status = EXCLUDED.status,
            attended_on = EXCLUDED.attended_on
        "#,
    )
    .bind(record_id(&record.id))
    .bind(&record.student_id)
    .bind(record.status.map(|s| s.as_str()))
    .bind(record.date)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() as usize)
}

async fn upsert_sponsorship(
    tx: &mut Transaction<'_, Postgres>,
    sponsorship: &Sponsorship,
) -> Result<usize> {
    let result = sqlx::query(
        r#"
        INSERT INTO school_dashboard.sponsorships
        (id, student_id, sponsor_name, status, amount, start_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE
        SET student_id = EXCLUDED.student_id, sponsor_name = EXCLUDED.sponsor_name,
            status = EXCLUDED.status, amount = EXCLUDED.amount, start_date = EXCLUDED.start_date
        "#,
    )
    .bind(record_id(&sponsorship.id))
    .bind(&sponsorship.student_id)
    .bind(&sponsorship.sponsor_name)
    .bind(sponsorship.status.map(|s| s.as_str()))
    .bind(sponsorship.amount)
    .bind(sponsorship.start_date)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() as usize)
}

async fn upsert_clinic_visit(
    tx: &mut Transaction<'_, Postgres>,
    visit: &ClinicVisit,
) -> Result<usize> {
    let result = sqlx::query(
        r#"
        INSERT INTO school_dashboard.clinic_visits (id, student_id, reason, cost, visited_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO UPDATE
        SET student_id = EXCLUDED.student_id, reason = EXCLUDED.reason, cost = EXCLUDED.cost,
            visited_at = EXCLUDED.visited_at
        "#,
    )
    .bind(record_id(&visit.id))
    .bind(&visit.student_id)
    .bind(&visit.reason)
    .bind(visit.cost)
    .bind(visit.visited_at)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() as usize)
}

async fn upsert_message(tx: &mut Transaction<'_, Postgres>, message: &Message) -> Result<usize> {
    let result = sqlx::query(
        r#"
        INSERT INTO school_dashboard.messages (id, sender, category, status, sent_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO UPDATE
        SET sender = EXCLUDED.sender, category = EXCLUDED.category, status = EXCLUDED.status,
            sent_at = EXCLUDED.sent_at
        "#,
    )
    .bind(record_id(&message.id))
    .bind(&message.sender)
    .bind(&message.category)
    .bind(message.status.map(|s| s.as_str()))
    .bind(message.sent_at)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() as usize)
}

async fn upsert_staff(tx: &mut Transaction<'_, Postgres>, member: &StaffMember) -> Result<usize> {
    let result = sqlx::query(
        r#"
        INSERT INTO school_dashboard.staff (id, name, department, status, salary, hired_on)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name, department = EXCLUDED.department, status = EXCLUDED.status,
            salary = EXCLUDED.salary, hired_on = EXCLUDED.hired_on
        "#,
    )
    .bind(record_id(&member.id))
    .bind(&member.name)
    .bind(&member.department)
    .bind(member.status.map(|s| s.as_str()))
    .bind(member.salary)
    .bind(member.hired_on)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() as usize)
}

/// Reads every collection into a snapshot.
pub async fn fetch_snapshot(pool: &PgPool) -> Result<Snapshot> {
    let mut snapshot = Snapshot::default();

    for row in sqlx::query(
        "SELECT id, name, class, stream, gender, status FROM school_dashboard.students ORDER BY id",
    )
    .fetch_all(pool)
    .await?
    {
        snapshot.students.push(Student {
            id: row.get("id"),
            name: row.get("name"),
            class: row.get("class"),
            stream: row.get("stream"),
            gender: row.get("gender"),
            status: status_column(&row, "status"),
        });
    }

    for row in sqlx::query(
        "SELECT id, student_id, status, amount, category, paid_on \
         FROM school_dashboard.payments ORDER BY paid_on, id",
    )
    .fetch_all(pool)
    .await?
    {
        snapshot.payments.push(Payment {
            id: row.get("id"),
            student_id: row.get("student_id"),
            status: status_column(&row, "status"),
            amount: row.get("amount"),
            category: row.get("category"),
            date: row.get("paid_on"),
        });
    }

    for row in sqlx::query(
        "SELECT id, student_id, status, attended_on \
         FROM school_dashboard.attendance ORDER BY attended_on, id",
    )
    .fetch_all(pool)
    .await?
    {
        snapshot.attendance.push(AttendanceRecord {
            id: row.get("id"),
            student_id: row.get("student_id"),
            status: status_column(&row, "status"),
            date: row.get("attended_on"),
        });
    }

    for row in sqlx::query(
        "SELECT id, student_id, sponsor_name, status, amount, start_date \
         FROM school_dashboard.sponsorships ORDER BY start_date, id",
    )
    .fetch_all(pool)
    .await?
    {
        snapshot.sponsorships.push(Sponsorship {
            id: row.get("id"),
            student_id: row.get("student_id"),
            sponsor_name: row.get("sponsor_name"),
            status: status_column(&row, "status"),
            amount: row.get("amount"),
            start_date: row.get("start_date"),
        });
    }

    for row in sqlx::query(
        "SELECT id, student_id, reason, cost, visited_at \
         FROM school_dashboard.clinic_visits ORDER BY visited_at, id",
    )
    .fetch_all(pool)
    .await?
    {
        snapshot.clinic_visits.push(ClinicVisit {
            id: row.get("id"),
            student_id: row.get("student_id"),
            reason: row.get("reason"),
            cost: row.get("cost"),
            visited_at: row.get("visited_at"),
        });
    }

    for row in sqlx::query(
        "SELECT id, sender, category, status, sent_at \
         FROM school_dashboard.messages ORDER BY sent_at, id",
    )
    .fetch_all(pool)
    .await?
    {
        snapshot.messages.push(Message {
            id: row.get("id"),
            sender: row.get("sender"),
            category: row.get("category"),
            status: status_column(&row, "status"),
            sent_at: row.get("sent_at"),
        });
    }

    for row in sqlx::query(
        "SELECT id, name, department, status, salary, hired_on \
         FROM school_dashboard.staff ORDER BY id",
    )
    .fetch_all(pool)
    .await?
    {
        snapshot.staff.push(StaffMember {
            id: row.get("id"),
            name: row.get("name"),
            department: row.get("department"),
            status: status_column(&row, "status"),
            salary: row.get("salary"),
            hired_on: row.get("hired_on"),
        });
    }

    tracing::info!(records = snapshot.record_count(), "Fetched snapshot from Postgres");
    Ok(snapshot)
}

fn status_column<S>(row: &sqlx::postgres::PgRow, column: &str) -> Option<S>
where
    S: for<'a> From<&'a str>,
{
    row.get::<Option<String>, _>(column).as_deref().map(S::from)
}
