use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

use super::summary::rate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRate {
    pub name: String,
    pub matched: usize,
    pub total: usize,
    pub rate: f64,
}

/// Per parent group, the share of parents with at least one child record
/// satisfying `child_predicate`.
///
/// A parent counts once no matter how many of its children match, so this
/// is a coverage rate, not a per-child-record rate. Groups come out in
/// first-seen order; parents without a group key are skipped.
pub fn join_rate_per_group<P, C, J, G, PK, CK, F>(
    parents: &[P],
    children: &[C],
    group_key: G,
    parent_key: PK,
    child_key: CK,
    child_predicate: F,
    decimals: u32,
) -> Vec<GroupRate>
where
    J: Eq + Hash,
    G: Fn(&P) -> Option<String>,
    PK: Fn(&P) -> Option<J>,
    CK: Fn(&C) -> Option<J>,
    F: Fn(&C) -> bool,
{
    let matched_keys: HashSet<J> = children
        .iter()
        .filter(|child| child_predicate(child))
        .filter_map(&child_key)
        .collect();

    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupRate> = Vec::new();

    for parent in parents {
        let Some(name) = group_key(parent) else {
            continue;
        };
        let index = *positions.entry(name.clone()).or_insert_with(|| {
            groups.push(GroupRate {
                name,
                matched: 0,
                total: 0,
                rate: 0.0,
            });
            groups.len() - 1
        });

        let group = &mut groups[index];
        group.total += 1;
        if parent_key(parent).is_some_and(|key| matched_keys.contains(&key)) {
            group.matched += 1;
        }
    }

    for group in &mut groups {
        group.rate = rate(group.matched, group.total, decimals);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceRecord, AttendanceStatus, Student};

    fn student(id: &str, class: &str, stream: &str) -> Student {
        Student {
            id: id.to_string(),
            class: Some(class.to_string()),
            stream: Some(stream.to_string()),
            ..Student::default()
        }
    }

    fn mark(student_id: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            student_id: Some(student_id.to_string()),
            status: Some(status),
            ..AttendanceRecord::default()
        }
    }

    fn per_stream(students: &[Student], records: &[AttendanceRecord]) -> Vec<GroupRate> {
        join_rate_per_group(
            students,
            records,
            Student::stream_name,
            |s| Some(s.id.clone()),
            |r| r.student_id.clone(),
            AttendanceRecord::is_present,
            1,
        )
    }

    #[test]
    fn any_present_record_counts_the_student() {
        let students = vec![
            student("s1", "P1", "East"),
            student("s2", "P1", "East"),
            student("s3", "P1", "West"),
        ];
        let records = vec![
            mark("s1", AttendanceStatus::Absent),
            mark("s1", AttendanceStatus::Absent),
            mark("s1", AttendanceStatus::Present),
            mark("s2", AttendanceStatus::Absent),
            mark("s3", AttendanceStatus::Present),
        ];

        let rates = per_stream(&students, &records);
        assert_eq!(
            rates,
            vec![
                GroupRate {
                    name: "P1 East".to_string(),
                    matched: 1,
                    total: 2,
                    rate: 50.0
                },
                GroupRate {
                    name: "P1 West".to_string(),
                    matched: 1,
                    total: 1,
                    rate: 100.0
                },
            ]
        );
    }

    #[test]
    fn students_without_stream_are_skipped() {
        let mut orphan = student("s9", "P2", "North");
        orphan.stream = None;
        let students = vec![orphan, student("s1", "P2", "North")];
        let rates = per_stream(&students, &[]);

        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].total, 1);
        assert_eq!(rates[0].rate, 0.0);
    }

    #[test]
    fn children_without_join_key_never_match() {
        let students = vec![student("s1", "P3", "South")];
        let records = vec![AttendanceRecord {
            student_id: None,
            status: Some(AttendanceStatus::Present),
            ..AttendanceRecord::default()
        }];
        assert_eq!(per_stream(&students, &records)[0].matched, 0);
    }
}
