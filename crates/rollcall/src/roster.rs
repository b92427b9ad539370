//! Student rosters.
//!
//! A roster is a JSON object mapping registration numbers to student names:
//!
//! ```json
//! { "24HP1A0201": "A. STUDENT", "24HP5A0204": "B. STUDENT" }
//! ```
//!
//! Branch and year are never stored; they are decoded from the registration
//! number whenever a class list is built.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::regno::{EntryType, RegNoDecoder, COLLEGE_CODE};

/// Minimum length of a registration number accepted into a roster.
pub const MIN_REG_NO_LEN: usize = 10;

/// Registration numbers and names, ordered by registration number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    students: BTreeMap<String, String>,
    rejected: usize,
}

/// A student in a class list, with fields decoded from the registration number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassStudent {
    /// Registration number.
    pub reg_no: String,
    /// Student name.
    pub name: String,
    /// Short branch name.
    pub branch: String,
    /// Current year of study.
    pub year: u8,
    /// How the student entered the programme.
    pub entry_type: Option<EntryType>,
}

/// Regular and lateral-entry head counts of a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Composition {
    /// Students admitted into the first year.
    pub regular: usize,
    /// Students admitted through lateral entry.
    pub lateral: usize,
}

impl Roster {
    /// Build a roster from raw `(registration number, name)` pairs.
    ///
    /// Registration numbers are trimmed and upper-cased. Entries whose number
    /// does not contain the institution code, is shorter than
    /// [`MIN_REG_NO_LEN`], or whose name is blank are dropped and counted.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut roster = Self::default();
        for (reg_no, name) in entries {
            let reg_no = reg_no.as_ref().trim().to_uppercase();
            let name = name.as_ref().trim();
            if !is_plausible_reg_no(&reg_no) || name.is_empty() {
                debug!(reg_no = %reg_no, "skipping roster entry");
                roster.rejected += 1;
                continue;
            }
            roster.students.insert(reg_no, name.to_string());
        }
        if roster.rejected > 0 {
            warn!(rejected = roster.rejected, "dropped malformed roster entries");
        }
        roster
    }

    /// Load a roster from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object
    /// of strings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::roster_load(path, e.to_string()))?;
        let raw: BTreeMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| Error::roster_load(path, e.to_string()))?;

        let roster = Self::from_entries(raw);
        info!(
            path = %path.display(),
            students = roster.len(),
            "loaded roster"
        );
        Ok(roster)
    }

    /// Number of students.
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the roster has no students.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Number of entries dropped while building the roster.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Look up a student's name.
    #[must_use]
    pub fn name(&self, reg_no: &str) -> Option<&str> {
        self.students.get(reg_no).map(String::as_str)
    }

    /// Iterate over `(registration number, name)` in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.students.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Students of one branch and year of study, ordered by registration
    /// number.
    ///
    /// Students whose registration number does not decode to a branch are
    /// never part of any class.
    #[must_use]
    pub fn class(&self, decoder: &RegNoDecoder, branch: &str, year: u8) -> Vec<ClassStudent> {
        let students: Vec<ClassStudent> = self
            .iter()
            .filter_map(|(reg_no, name)| {
                let decoded = decoder.decode(reg_no);
                let student_branch = decoded.branch()?.to_string();
                let student_year = decoded.calculated_year?;
                (student_branch == branch && student_year == year).then(|| ClassStudent {
                    reg_no: reg_no.to_string(),
                    name: name.to_string(),
                    branch: student_branch,
                    year: student_year,
                    entry_type: decoded.entry_type,
                })
            })
            .collect();

        let composition = composition(&students);
        debug!(
            branch,
            year,
            total = students.len(),
            regular = composition.regular,
            lateral = composition.lateral,
            "built class list"
        );
        students
    }
}

/// Count regular and lateral-entry students in a class list.
#[must_use]
pub fn composition(students: &[ClassStudent]) -> Composition {
    students
        .iter()
        .fold(Composition::default(), |mut acc, s| {
            match s.entry_type {
                Some(EntryType::Regular) => acc.regular += 1,
                Some(EntryType::LateralEntry) => acc.lateral += 1,
                None => {}
            }
            acc
        })
}

fn is_plausible_reg_no(reg_no: &str) -> bool {
    reg_no.contains(COLLEGE_CODE) && reg_no.chars().count() >= MIN_REG_NO_LEN
}
