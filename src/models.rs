use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub(crate) mod lenient;

/// Declares a small status vocabulary. Parsing is case-insensitive and
/// anything unrecognised lands in `Other`.
macro_rules! status_vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Other,
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other => "other",
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                let value = value.trim();
                $(
                    if value.eq_ignore_ascii_case($text) {
                        return $name::$variant;
                    }
                )+
                $name::Other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Ok(lenient::text(deserializer)?
                    .as_deref()
                    .map($name::from)
                    .unwrap_or($name::Other))
            }
        }
    };
}

status_vocabulary!(
    /// Enrolment state of a student.
    StudentStatus {
        Active => "active",
        Inactive => "inactive",
        Graduated => "graduated",
    }
);

status_vocabulary!(
    PaymentStatus {
        Paid => "paid",
        Pending => "pending",
        Overdue => "overdue",
    }
);

status_vocabulary!(
    AttendanceStatus {
        Present => "present",
        Absent => "absent",
        Late => "late",
    }
);

status_vocabulary!(
    SponsorshipStatus {
        Active => "active",
        Pending => "pending",
        Ended => "ended",
    }
);

status_vocabulary!(
    MessageStatus {
        Read => "read",
        Unread => "unread",
    }
);

status_vocabulary!(
    StaffStatus {
        Active => "active",
        OnLeave => "on_leave",
        Inactive => "inactive",
    }
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub stream: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub gender: Option<String>,
    #[serde(default)]
    pub status: Option<StudentStatus>,
}

impl Student {
    /// Join key for child records; a blank id joins nothing.
    pub fn key(&self) -> Option<String> {
        non_blank(Some(self.id.as_str()))
    }

    pub fn class_name(&self) -> Option<String> {
        non_blank(self.class.as_deref())
    }

    /// `"{class} {stream}"`, only when both parts are present.
    pub fn stream_name(&self) -> Option<String> {
        let class = non_blank(self.class.as_deref())?;
        let stream = non_blank(self.stream.as_deref())?;
        Some(format!("{class} {stream}"))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// A financial record: fee payment or invoice line for one student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub student_id: Option<String>,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
}

impl Payment {
    pub fn is_paid(&self) -> bool {
        self.status == Some(PaymentStatus::Paid)
    }

    pub fn is_outstanding(&self) -> bool {
        matches!(
            self.status,
            Some(PaymentStatus::Pending) | Some(PaymentStatus::Overdue)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub student_id: Option<String>,
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
}

impl AttendanceRecord {
    pub fn is_present(&self) -> bool {
        self.status == Some(AttendanceStatus::Present)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsorship {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sponsor_name: Option<String>,
    #[serde(default)]
    pub status: Option<SponsorshipStatus>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub start_date: Option<NaiveDate>,
}

impl Sponsorship {
    pub fn is_active(&self) -> bool {
        self.status == Some(SponsorshipStatus::Active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicVisit {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub visited_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sender: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<MessageStatus>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub sent_at: Option<NaiveDateTime>,
}

impl Message {
    pub fn is_unread(&self) -> bool {
        self.status == Some(MessageStatus::Unread)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub department: Option<String>,
    #[serde(default)]
    pub status: Option<StaffStatus>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub hired_on: Option<NaiveDate>,
}

impl StaffMember {
    pub fn is_active(&self) -> bool {
        self.status == Some(StaffStatus::Active)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
