//! Attendance reports.
//!
//! A [`Report`] is built once from a class list and its sessions and can
//! then be rendered as CSV, as a plain-text table, or serialized as JSON.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

use crate::analytics::{self, Bucket, DailyStats, StudentStats};
use crate::attendance::{ClassKey, Session};
use crate::roster::ClassStudent;

/// Title printed at the top of every report.
pub const REPORT_TITLE: &str = "ALIET Attendance Report";

/// Column headers of the student table.
pub const CSV_HEADERS: &[&str] = &[
    "S.No",
    "Reg No",
    "Name",
    "Classes Attended",
    "Total Classes",
    "Percentage",
];

/// Attendance report for one class over a date range.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Class the report covers.
    pub class: ClassKey,
    /// First day included, if bounded.
    pub from: Option<NaiveDate>,
    /// Last day included, if bounded.
    pub to: Option<NaiveDate>,
    /// When the report was generated.
    pub generated_at: DateTime<Local>,
    /// Per-student totals, ordered by registration number.
    pub students: Vec<StudentStats>,
    /// Per-session totals, in date order.
    pub daily: Vec<DailyStats>,
    /// Attendance across all sessions.
    pub overall_percent: u8,
    /// Students per percentage band.
    pub distribution: Vec<Bucket>,
    /// Threshold used for `low_attendance`.
    pub low_attendance_threshold: u8,
    /// Registration numbers of students below the threshold.
    pub low_attendance: Vec<String>,
}

impl Report {
    /// Build a report from a class list and the sessions held for it.
    ///
    /// Sessions outside `from..=to` are ignored.
    #[must_use]
    pub fn build(
        class: ClassKey,
        students: &[ClassStudent],
        sessions: &[Session],
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        low_attendance_threshold: u8,
    ) -> Self {
        let sessions = analytics::filter_by_range(sessions, from, to);
        let stats = analytics::student_stats(students, &sessions);
        let daily = analytics::daily_stats(&sessions);
        let low_attendance = analytics::low_attendance(&stats, low_attendance_threshold)
            .into_iter()
            .map(|s| s.reg_no.clone())
            .collect();

        Self {
            class,
            from,
            to,
            generated_at: Local::now(),
            overall_percent: analytics::overall_percent(&daily),
            distribution: analytics::distribution(&stats),
            students: stats,
            daily,
            low_attendance_threshold,
            low_attendance,
        }
    }

    /// Suggested file name for the report, without extension.
    #[must_use]
    pub fn file_stem(&self) -> String {
        let bound = |date: Option<NaiveDate>, fallback: Option<&DailyStats>| {
            date.or_else(|| fallback.map(|d| d.date))
                .map_or_else(|| "all".to_string(), |d| d.to_string())
        };
        format!(
            "Attendance_Report_{}_{}Year_{}_to_{}",
            self.class.branch,
            self.class.year,
            bound(self.from, self.daily.first()),
            bound(self.to, self.daily.last()),
        )
    }

    /// Render the student table as CSV.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = CSV_HEADERS.join(",");
        out.push('\n');
        for (i, s) in self.students.iter().enumerate() {
            let row = [
                (i + 1).to_string(),
                s.reg_no.clone(),
                s.name.clone(),
                s.present.to_string(),
                s.total.to_string(),
                format!("{}%", s.percent),
            ];
            let escaped: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
            out.push_str(&escaped.join(","));
            out.push('\n');
        }
        out
    }

    /// Render the report as an aligned plain-text table with a summary.
    #[must_use]
    pub fn to_table(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        self.write_table(&mut out).map(|()| out).unwrap_or_default()
    }

    /// Write the plain-text table and summary to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write_table(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(out, "{REPORT_TITLE}")?;
        writeln!(
            out,
            "Branch: {} | Year: {} | Section: {}",
            self.class.branch, self.class.year, self.class.section
        )?;
        writeln!(
            out,
            "Date Range: {} to {}",
            display_date(self.from),
            display_date(self.to)
        )?;
        writeln!(
            out,
            "Downloaded: {}",
            self.generated_at.format("%d-%m-%Y %H:%M:%S")
        )?;
        writeln!(out)?;

        let name_width = self
            .students
            .iter()
            .map(|s| s.name.chars().count())
            .chain(std::iter::once(4))
            .max()
            .unwrap_or(4);

        writeln!(
            out,
            "{:>4}  {:<12}  {:<name_width$}  {:>7}  {:>5}  {:>4}",
            "S.No", "Reg No", "Name", "Present", "Total", "%"
        )?;
        for (i, s) in self.students.iter().enumerate() {
            writeln!(
                out,
                "{:>4}  {:<12}  {:<name_width$}  {:>7}  {:>5}  {:>3}%",
                i + 1,
                s.reg_no,
                s.name,
                s.present,
                s.total,
                s.percent
            )?;
        }
        writeln!(out)?;

        writeln!(
            out,
            "Sessions: {}  Overall: {}%",
            self.daily.len(),
            self.overall_percent
        )?;
        let distribution: Vec<String> = self
            .distribution
            .iter()
            .map(|b| format!("{} {}", b.range, b.count))
            .collect();
        writeln!(out, "Distribution: {}", distribution.join(", "))?;
        let low = if self.low_attendance.is_empty() {
            "none".to_string()
        } else {
            self.low_attendance.join(", ")
        };
        writeln!(
            out,
            "Low attendance (< {}%): {low}",
            self.low_attendance_threshold
        )
    }
}

/// Format a date as `dd-mm-yyyy`, or `-` when unbounded.
fn display_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%d-%m-%Y").to_string())
}

/// Quote a CSV field if it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
