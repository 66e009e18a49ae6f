//! Pure aggregation over in-memory record collections.
//!
//! Nothing here does I/O, mutates its inputs, or fails: empty input yields
//! zero-valued output and every call allocates fresh results.

mod group;
mod join;
mod summary;
mod tally;
mod tier;
mod window;

pub use group::{count_by, group_by, rank_by_count, Bucket, CountBucket};
pub use join::{join_rate_per_group, GroupRate};
pub use summary::{
    rate, round_to, sum_by, sum_by_where, summarize, summarize_with, Summary, RATE_DECIMALS,
};
pub use tally::{AmountTally, AttendanceTally, Count, Tally};
pub use tier::{classify_tier, TierRule, TierScale};
pub use window::{
    at_midnight, bucket_by_time_window, bucket_by_time_window_now, WindowBucket, WindowSpec,
};
