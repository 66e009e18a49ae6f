//! Per-role dashboards composed from the metrics module.
//!
//! Every builder takes the current snapshot explicitly and returns a
//! serializable view model; none of them fail.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::metrics::{round_to, TierScale};
use crate::snapshot::Snapshot;

pub mod attendance;
pub mod clinic;
pub mod family;
pub mod finance;
pub mod messaging;
pub mod overview;
pub mod sponsorship;
pub mod staff;

pub use attendance::AttendanceDashboard;
pub use clinic::ClinicDashboard;
pub use family::{FamilyDashboard, StudentStanding};
pub use finance::FinanceDashboard;
pub use messaging::MessagingDashboard;
pub use overview::OverviewDashboard;
pub use sponsorship::SponsorshipDashboard;
pub use staff::StaffDashboard;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    /// Anchor for "today" and for every trailing window
    pub today: NaiveDate,
    pub rate_decimals: u32,
    pub amount_decimals: u32,
    pub trend_days: u32,
    pub trend_months: u32,
    pub tiers: TierScale,
}

impl DashboardOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            rate_decimals: 1,
            amount_decimals: 0,
            trend_days: 7,
            trend_months: 6,
            tiers: TierScale::default(),
        }
    }

    pub fn from_config(config: &Config, today: Option<NaiveDate>) -> Self {
        Self {
            today: today.unwrap_or_else(|| Utc::now().date_naive()),
            rate_decimals: config.metrics.rate_decimals,
            amount_decimals: config.metrics.amount_decimals,
            trend_days: config.metrics.trend_days,
            trend_months: config.metrics.trend_months,
            tiers: config.tiers.clone(),
        }
    }

    pub(crate) fn amount(&self, value: f64) -> f64 {
        round_to(value, self.amount_decimals)
    }
}

/// Every role that has a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Accountant,
    Cfo,
    Coordinator,
    Hr,
    Nurse,
    OperationsManager,
    Overseer,
    Parent,
    Secretary,
    Sponsor,
    SuperTeacher,
    Superuser,
    Teacher,
}

impl Role {
    pub const ALL: [Role; 14] = [
        Role::Admin,
        Role::Accountant,
        Role::Cfo,
        Role::Coordinator,
        Role::Hr,
        Role::Nurse,
        Role::OperationsManager,
        Role::Overseer,
        Role::Parent,
        Role::Secretary,
        Role::Sponsor,
        Role::SuperTeacher,
        Role::Superuser,
        Role::Teacher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Accountant => "accountant",
            Role::Cfo => "cfo",
            Role::Coordinator => "coordinator",
            Role::Hr => "hr",
            Role::Nurse => "nurse",
            Role::OperationsManager => "operations-manager",
            Role::Overseer => "overseer",
            Role::Parent => "parent",
            Role::Secretary => "secretary",
            Role::Sponsor => "sponsor",
            Role::SuperTeacher => "super-teacher",
            Role::Superuser => "superuser",
            Role::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "opm" => return Ok(Role::OperationsManager),
            "user" => return Ok(Role::Teacher),
            _ => {}
        }
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| format!("unknown role: {value}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "dashboard", rename_all = "snake_case")]
pub enum Dashboard {
    Finance(FinanceDashboard),
    Attendance(AttendanceDashboard),
    Overview(OverviewDashboard),
    Clinic(ClinicDashboard),
    Sponsorship(SponsorshipDashboard),
    Messaging(MessagingDashboard),
    Staff(StaffDashboard),
    Family(FamilyDashboard),
}

impl Dashboard {
    pub fn title(&self) -> &'static str {
        match self {
            Dashboard::Finance(_) => "Finance",
            Dashboard::Attendance(_) => "Attendance",
            Dashboard::Overview(_) => "School Overview",
            Dashboard::Clinic(_) => "Clinic",
            Dashboard::Sponsorship(_) => "Sponsorships",
            Dashboard::Messaging(_) => "Messages",
            Dashboard::Staff(_) => "Staff",
            Dashboard::Family(_) => "My Children",
        }
    }
}

/// Builds the dashboard a role lands on.
pub fn build(role: Role, snapshot: &Snapshot, options: &DashboardOptions) -> Dashboard {
    let dashboard = match role {
        Role::Accountant | Role::Cfo => Dashboard::Finance(finance::build(snapshot, options)),
        Role::Teacher | Role::SuperTeacher | Role::Coordinator => {
            Dashboard::Attendance(attendance::build(snapshot, options))
        }
        Role::Admin | Role::Superuser | Role::Overseer | Role::OperationsManager => {
            Dashboard::Overview(overview::build(snapshot, options))
        }
        Role::Nurse => Dashboard::Clinic(clinic::build(snapshot, options)),
        Role::Sponsor => Dashboard::Sponsorship(sponsorship::build(snapshot, options)),
        Role::Secretary => Dashboard::Messaging(messaging::build(snapshot, options)),
        Role::Hr => Dashboard::Staff(staff::build(snapshot, options)),
        Role::Parent => Dashboard::Family(family::build(snapshot, options)),
    };
    tracing::debug!(
        role = %role,
        dashboard = dashboard.title(),
        records = snapshot.record_count(),
        "Built dashboard"
    );
    dashboard
}
