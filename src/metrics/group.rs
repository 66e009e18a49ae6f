use std::collections::HashMap;

use serde::Serialize;

use super::tally::Tally;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountBucket {
    pub name: String,
    pub count: usize,
}

/// A named bucket carrying a sub-aggregate instead of raw records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket<T> {
    pub name: String,
    #[serde(flatten)]
    pub tally: T,
}

/// Counts records per key in first-seen order. Records without a key are
/// left out.
pub fn count_by<R, K>(records: &[R], key: K) -> Vec<CountBucket>
where
    K: Fn(&R) -> Option<String>,
{
    group_by::<R, super::Count, K>(records, key)
        .into_iter()
        .map(|bucket| CountBucket {
            name: bucket.name,
            count: bucket.tally.count,
        })
        .collect()
}

/// Folds records into one tally per key, in first-seen order.
pub fn group_by<R, T, K>(records: &[R], key: K) -> Vec<Bucket<T>>
where
    T: Tally<R>,
    K: Fn(&R) -> Option<String>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Bucket<T>> = Vec::new();

    for record in records {
        let Some(name) = key(record) else {
            continue;
        };
        let index = match positions.get(&name) {
            Some(index) => *index,
            None => {
                positions.insert(name.clone(), buckets.len());
                buckets.push(Bucket {
                    name,
                    tally: T::default(),
                });
                buckets.len() - 1
            }
        };
        buckets[index].tally.add(record);
    }

    buckets
}

/// Sorts buckets by descending count, keeping first-seen order for ties.
pub fn rank_by_count(mut buckets: Vec<CountBucket>) -> Vec<CountBucket> {
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::AttendanceTally;
    use crate::models::{AttendanceRecord, AttendanceStatus};

    struct Pupil {
        class: Option<&'static str>,
    }

    #[test]
    fn class_distribution_keeps_first_seen_order() {
        let students = vec![
            Pupil { class: Some("P1") },
            Pupil { class: Some("P1") },
            Pupil { class: Some("P2") },
        ];
        let buckets = count_by(&students, |s| s.class.map(str::to_string));
        assert_eq!(
            buckets,
            vec![
                CountBucket {
                    name: "P1".to_string(),
                    count: 2
                },
                CountBucket {
                    name: "P2".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn records_without_keys_are_skipped_not_bucketed() {
        let students = vec![
            Pupil { class: Some("P3") },
            Pupil { class: None },
            Pupil { class: Some("P1") },
            Pupil { class: Some("P3") },
        ];
        let buckets = count_by(&students, |s| s.class.map(str::to_string));
        let keyed = students.iter().filter(|s| s.class.is_some()).count();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), keyed);
        assert!(buckets.iter().all(|b| b.name != "undefined"));
        assert_eq!(buckets[0].name, "P3");
    }

    #[test]
    fn grouping_with_attendance_sub_aggregates() {
        let record = |day: &str, status| AttendanceRecord {
            date: chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d").ok(),
            status: Some(status),
            ..AttendanceRecord::default()
        };
        let records = vec![
            record("2026-10-14", AttendanceStatus::Present),
            record("2026-10-15", AttendanceStatus::Absent),
            record("2026-10-14", AttendanceStatus::Late),
            record("2026-10-14", AttendanceStatus::Present),
        ];

        let buckets: Vec<Bucket<AttendanceTally>> =
            group_by(&records, |r| r.date.map(|d| d.to_string()));

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].name, "2026-10-14");
        assert_eq!(
            buckets[0].tally,
            AttendanceTally {
                present: 2,
                absent: 0,
                late: 1
            }
        );
        assert_eq!(buckets[1].tally.absent, 1);
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let ranked = rank_by_count(vec![
            CountBucket {
                name: "b".to_string(),
                count: 1,
            },
            CountBucket {
                name: "a".to_string(),
                count: 3,
            },
            CountBucket {
                name: "c".to_string(),
                count: 1,
            },
        ]);
        let names: Vec<&str> = ranked.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
