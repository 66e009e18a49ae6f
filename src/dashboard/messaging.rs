use serde::Serialize;

use super::DashboardOptions;
use crate::metrics::{
    bucket_by_time_window, count_by, summarize_with, Count, CountBucket, Summary, WindowBucket,
    WindowSpec,
};
use crate::models::Message;
use crate::snapshot::Snapshot;

/// Secretary's inbox overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagingDashboard {
    pub messages: usize,
    pub unread: Summary,
    pub by_category: Vec<CountBucket>,
    pub trend: Vec<WindowBucket<Count>>,
    pub by_weekday: Vec<WindowBucket<Count>>,
    pub by_hour: Vec<WindowBucket<Count>>,
}

pub fn build(snapshot: &Snapshot, options: &DashboardOptions) -> MessagingDashboard {
    let messages = &snapshot.messages;
    let sent_at = |m: &Message| m.sent_at;

    MessagingDashboard {
        messages: messages.len(),
        unread: summarize_with(messages, Message::is_unread, options.rate_decimals),
        by_category: count_by(messages, |m: &Message| m.category.clone()),
        trend: bucket_by_time_window(
            messages,
            sent_at,
            WindowSpec::LastDays(options.trend_days),
            options.today,
        ),
        by_weekday: bucket_by_time_window(messages, sent_at, WindowSpec::DayOfWeek, options.today),
        by_hour: bucket_by_time_window(messages, sent_at, WindowSpec::HourOfDay, options.today),
    }
}
