//! Attendance session types.
//!
//! A session is one class meeting: a date, the class it was held for, an
//! optional topic, and a present/absent mark per registration number.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::regno::branch;
use crate::roster::ClassStudent;

/// Date format used for session dates on the command line and in storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Attendance mark for one student in one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Attended.
    Present,
    /// Did not attend.
    Absent,
}

impl Status {
    /// Whether the mark counts towards attendance.
    #[must_use]
    pub fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "Present"),
            Self::Absent => write!(f, "Absent"),
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" | "p" => Ok(Self::Present),
            "absent" | "a" => Ok(Self::Absent),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

/// Branch, year of study and section identifying a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassKey {
    /// Short branch name, e.g. `EEE`.
    pub branch: String,
    /// Year of study.
    pub year: u8,
    /// Section letter.
    pub section: String,
}

impl ClassKey {
    /// Create a class key, normalising branch and section to upper case.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch is not in the branch table.
    pub fn new(branch: &str, year: u8, section: &str) -> Result<Self> {
        let branch = branch.trim().to_uppercase();
        if branch::by_name(&branch).is_none() {
            return Err(Error::UnknownBranch(branch));
        }
        Ok(Self {
            branch,
            year,
            section: section.trim().to_uppercase(),
        })
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} year {} section {}",
            self.branch, self.year, self.section
        )
    }
}

/// One class meeting and its attendance marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identifier assigned by the storage layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Day the class was held.
    pub date: NaiveDate,
    /// Class the session belongs to.
    pub class: ClassKey,
    /// What was covered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Mark per registration number.
    pub records: BTreeMap<String, Status>,
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new(date: NaiveDate, class: ClassKey, topic: Option<String>) -> Self {
        Self {
            id: None,
            date,
            class,
            topic: topic.filter(|t| !t.trim().is_empty()),
            records: BTreeMap::new(),
        }
    }

    /// Mark one student, replacing any earlier mark.
    pub fn mark(&mut self, reg_no: impl Into<String>, status: Status) {
        self.records.insert(reg_no.into(), status);
    }

    /// Mark every student of a class list.
    pub fn mark_all(&mut self, students: &[ClassStudent], status: Status) {
        for student in students {
            self.mark(student.reg_no.clone(), status);
        }
    }

    /// Mark of one student, if recorded.
    #[must_use]
    pub fn status(&self, reg_no: &str) -> Option<Status> {
        self.records.get(reg_no).copied()
    }

    /// Number of students marked present.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.records.values().filter(|s| s.is_present()).count()
    }

    /// Number of students marked at all.
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// Check that the session can be saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the session has no marks or an empty section.
    pub fn validate(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(Error::invalid_session(format!(
                "no students marked for {} on {}",
                self.class, self.date
            )));
        }
        if self.class.section.is_empty() {
            return Err(Error::invalid_session("section must not be empty"));
        }
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns an error if the input is not a valid calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|source| Error::InvalidDate {
        input: input.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regno::EntryType;

    fn class() -> ClassKey {
        ClassKey::new("eee", 2, "a").unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 4).unwrap()
    }

    fn student(reg_no: &str) -> ClassStudent {
        ClassStudent {
            reg_no: reg_no.to_string(),
            name: "TEST".to_string(),
            branch: "EEE".to_string(),
            year: 2,
            entry_type: Some(EntryType::Regular),
        }
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Present".parse::<Status>().unwrap(), Status::Present);
        assert_eq!("present".parse::<Status>().unwrap(), Status::Present);
        assert_eq!(" ABSENT ".parse::<Status>().unwrap(), Status::Absent);
        assert_eq!("a".parse::<Status>().unwrap(), Status::Absent);
        assert!(matches!(
            "late".parse::<Status>(),
            Err(Error::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Present.to_string(), "Present");
        assert_eq!(Status::Absent.to_string(), "Absent");
    }

    #[test]
    fn test_class_key_normalizes() {
        let key = class();
        assert_eq!(key.branch, "EEE");
        assert_eq!(key.section, "A");
        assert_eq!(key.to_string(), "EEE year 2 section A");
    }

    #[test]
    fn test_class_key_rejects_unknown_branch() {
        assert!(matches!(
            ClassKey::new("BIO", 1, "A"),
            Err(Error::UnknownBranch(_))
        ));
    }

    #[test]
    fn test_session_marking() {
        let mut session = Session::new(date(), class(), Some("Circuits".to_string()));
        let students = [student("24HP1A0201"), student("24HP1A0202")];

        session.mark_all(&students, Status::Present);
        session.mark("24HP1A0202", Status::Absent);

        assert_eq!(session.total(), 2);
        assert_eq!(session.present_count(), 1);
        assert_eq!(session.status("24HP1A0202"), Some(Status::Absent));
        assert_eq!(session.status("24HP1A0299"), None);
    }

    #[test]
    fn test_session_blank_topic_dropped() {
        let session = Session::new(date(), class(), Some("  ".to_string()));
        assert!(session.topic.is_none());
    }

    #[test]
    fn test_session_validate() {
        let mut session = Session::new(date(), class(), None);
        assert!(session.validate().is_err());

        session.mark("24HP1A0201", Status::Present);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-08-04").unwrap(), date());
        assert!(matches!(
            parse_date("04-08-2025"),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_session_serialization() {
        let mut session = Session::new(date(), class(), None);
        session.mark("24HP1A0201", Status::Present);

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"date\":\"2025-08-04\""));
        assert!(json.contains("\"24HP1A0201\":\"Present\""));
        assert!(!json.contains("topic"));
    }
}
