//! Attendance analytics.
//!
//! All functions here are pure: they take a class list and the sessions held
//! for it and aggregate them. Percentages are whole numbers rounded half up.

use chrono::NaiveDate;
use serde::Serialize;

use crate::attendance::Session;
use crate::roster::ClassStudent;

/// Topic shown for sessions recorded without one.
pub const NO_TOPIC: &str = "No Topic";

/// Attendance totals for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentStats {
    /// Registration number.
    pub reg_no: String,
    /// Student name.
    pub name: String,
    /// Sessions attended.
    pub present: usize,
    /// Sessions held.
    pub total: usize,
    /// `present / total` as a percentage.
    pub percent: u8,
}

/// Attendance totals for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    /// Day the session was held.
    pub date: NaiveDate,
    /// Students marked present.
    pub present: usize,
    /// Students marked at all.
    pub total: usize,
    /// `present / total` as a percentage.
    pub percent: u8,
    /// Session topic.
    pub topic: String,
}

/// Number of students within a percentage band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Band label, e.g. `80-89%`.
    pub range: &'static str,
    /// Lowest percentage in the band.
    pub min_percent: u8,
    /// Students in the band.
    pub count: usize,
}

/// Band labels and their lower bounds, highest first.
const BANDS: &[(&str, u8)] = &[
    ("90-100%", 90),
    ("80-89%", 80),
    ("70-79%", 70),
    ("60-69%", 60),
    ("<60%", 0),
];

/// Rounded percentage of `part` in `whole`; 0 when `whole` is 0.
#[must_use]
pub fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let rounded = (part.min(whole) * 200 + whole) / (whole * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Keep sessions whose date falls within an inclusive range.
#[must_use]
pub fn filter_by_range(
    sessions: &[Session],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<Session> {
    sessions
        .iter()
        .filter(|s| from.map_or(true, |from| s.date >= from))
        .filter(|s| to.map_or(true, |to| s.date <= to))
        .cloned()
        .collect()
}

/// Per-student attendance over the given sessions, ordered by registration
/// number.
///
/// Every session counts towards every student's total; a student with no
/// mark in a session counts as absent for it.
#[must_use]
pub fn student_stats(students: &[ClassStudent], sessions: &[Session]) -> Vec<StudentStats> {
    let total = sessions.len();
    let mut stats: Vec<StudentStats> = students
        .iter()
        .map(|student| {
            let present = sessions
                .iter()
                .filter(|s| s.status(&student.reg_no).is_some_and(|m| m.is_present()))
                .count();
            StudentStats {
                reg_no: student.reg_no.clone(),
                name: student.name.clone(),
                present,
                total,
                percent: percent(present, total),
            }
        })
        .collect();
    stats.sort_by(|a, b| a.reg_no.cmp(&b.reg_no));
    stats
}

/// Per-session attendance, in the order given.
#[must_use]
pub fn daily_stats(sessions: &[Session]) -> Vec<DailyStats> {
    sessions
        .iter()
        .map(|s| {
            let present = s.present_count();
            let total = s.total();
            DailyStats {
                date: s.date,
                present,
                total,
                percent: percent(present, total),
                topic: s.topic.clone().unwrap_or_else(|| NO_TOPIC.to_string()),
            }
        })
        .collect()
}

/// Attendance across all sessions: total present over total marked.
#[must_use]
pub fn overall_percent(daily: &[DailyStats]) -> u8 {
    let (present, total) = daily
        .iter()
        .fold((0, 0), |(p, t), d| (p + d.present, t + d.total));
    percent(present, total)
}

/// Count students per percentage band, highest band first.
#[must_use]
pub fn distribution(stats: &[StudentStats]) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = BANDS
        .iter()
        .map(|(range, min_percent)| Bucket {
            range: *range,
            min_percent: *min_percent,
            count: 0,
        })
        .collect();

    for student in stats {
        if let Some(bucket) = buckets.iter_mut().find(|b| student.percent >= b.min_percent) {
            bucket.count += 1;
        }
    }
    buckets
}

/// Students strictly below `threshold` percent.
#[must_use]
pub fn low_attendance(stats: &[StudentStats], threshold: u8) -> Vec<&StudentStats> {
    stats.iter().filter(|s| s.percent < threshold).collect()
}
