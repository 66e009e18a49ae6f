use serde::Serialize;

use super::summary::round_to;
use crate::models::{
    AttendanceRecord, AttendanceStatus, ClinicVisit, Payment, Sponsorship, StaffMember,
};

/// A per-bucket sub-aggregate. Buckets start from `Default` and absorb
/// records one at a time.
pub trait Tally<R>: Default {
    fn add(&mut self, record: &R);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Count {
    pub count: usize,
}

impl<R> Tally<R> for Count {
    fn add(&mut self, _record: &R) {
        self.count += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AttendanceTally {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
}

impl AttendanceTally {
    pub fn total(&self) -> usize {
        self.present + self.absent + self.late
    }
}

impl Tally<AttendanceRecord> for AttendanceTally {
    fn add(&mut self, record: &AttendanceRecord) {
        match record.status {
            Some(AttendanceStatus::Present) => self.present += 1,
            Some(AttendanceStatus::Absent) => self.absent += 1,
            Some(AttendanceStatus::Late) => self.late += 1,
            _ => {}
        }
    }
}

/// Record count plus summed currency amount.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AmountTally {
    pub count: usize,
    pub amount: f64,
}

impl AmountTally {
    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            count: self.count,
            amount: round_to(self.amount, decimals),
        }
    }

    fn push(&mut self, value: Option<f64>) {
        self.count += 1;
        self.amount += value.filter(|v| v.is_finite()).unwrap_or(0.0);
    }
}

impl Tally<Payment> for AmountTally {
    fn add(&mut self, record: &Payment) {
        self.push(record.amount);
    }
}

impl Tally<Sponsorship> for AmountTally {
    fn add(&mut self, record: &Sponsorship) {
        self.push(record.amount);
    }
}

impl Tally<ClinicVisit> for AmountTally {
    fn add(&mut self, record: &ClinicVisit) {
        self.push(record.cost);
    }
}

impl Tally<StaffMember> for AmountTally {
    fn add(&mut self, record: &StaffMember) {
        self.push(record.salary);
    }
}
