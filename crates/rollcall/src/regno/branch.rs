//! Branch table for registration numbers.
//!
//! This module holds the closed set of academic branches the college issues
//! registration numbers for, keyed by the two-character branch code found at
//! positions 6 and 7 of a registration number.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An academic branch and the department it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchInfo {
    /// Short branch name, e.g. `CSE`.
    pub branch: Cow<'static, str>,
    /// Full department name.
    pub department: Cow<'static, str>,
}

impl BranchInfo {
    /// Create a branch entry from static strings.
    #[must_use]
    pub const fn new(branch: &'static str, department: &'static str) -> Self {
        Self {
            branch: Cow::Borrowed(branch),
            department: Cow::Borrowed(department),
        }
    }

    /// Create a branch entry that is not part of the branch table.
    #[must_use]
    pub fn ad_hoc(branch: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            branch: Cow::Owned(branch.into()),
            department: Cow::Owned(department.into()),
        }
    }
}

impl fmt::Display for BranchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.branch, self.department)
    }
}

/// Branch code to branch mapping, in code order.
pub static BRANCHES: &[(&str, BranchInfo)] = &[
    ("01", BranchInfo::new("CIVIL", "Civil Engineering")),
    (
        "02",
        BranchInfo::new("EEE", "Electrical and Electronics Engineering"),
    ),
    ("03", BranchInfo::new("MECH", "Mechanical Engineering")),
    (
        "04",
        BranchInfo::new("ECE", "Electronics and Communication Engineering"),
    ),
    ("05", BranchInfo::new("CSE", "Computer Science and Engineering")),
    ("12", BranchInfo::new("IT", "Information Technology")),
    (
        "42",
        BranchInfo::new("CSM", "Computer Science and Engineering (AI & ML)"),
    ),
    (
        "44",
        BranchInfo::new("CSD", "Computer Science and Engineering (Data Science)"),
    ),
];

/// Leading characters a branch code may start with.
pub const VALID_BRANCH_LEADING_DIGITS: &[char] = &['0', '1', '4'];

/// Look up a branch by its two-character code.
#[must_use]
pub fn by_code(code: &str) -> Option<&'static BranchInfo> {
    BRANCHES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, info)| info)
}

/// Look up a branch by its short name (e.g. `EEE`).
#[must_use]
pub fn by_name(name: &str) -> Option<&'static BranchInfo> {
    BRANCHES
        .iter()
        .map(|(_, info)| info)
        .find(|info| info.branch == name)
}

/// Find the code assigned to a branch short name.
#[must_use]
pub fn code_for(name: &str) -> Option<&'static str> {
    BRANCHES
        .iter()
        .find(|(_, info)| info.branch == name)
        .map(|(code, _)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_code_known() {
        let info = by_code("05").unwrap();
        assert_eq!(info.branch, "CSE");
        assert_eq!(info.department, "Computer Science and Engineering");
    }

    #[test]
    fn test_by_code_unknown() {
        assert!(by_code("99").is_none());
        assert!(by_code("5").is_none());
        assert!(by_code("").is_none());
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("IT").unwrap().department, "Information Technology");
        assert!(by_name("it").is_none());
        assert!(by_name("BIO").is_none());
    }

    #[test]
    fn test_code_for() {
        assert_eq!(code_for("EEE"), Some("02"));
        assert_eq!(code_for("CSD"), Some("44"));
        assert_eq!(code_for("NOPE"), None);
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, (code, _)) in BRANCHES.iter().enumerate() {
            assert!(BRANCHES[i + 1..].iter().all(|(other, _)| other != code));
        }
    }

    #[test]
    fn test_codes_start_with_valid_digit() {
        for (code, _) in BRANCHES {
            let first = code.chars().next().unwrap();
            assert!(VALID_BRANCH_LEADING_DIGITS.contains(&first), "{code}");
        }
    }

    #[test]
    fn test_ad_hoc_branch() {
        let info = BranchInfo::ad_hoc("AERO", "AERO");
        assert_eq!(info.branch, "AERO");
        assert!(matches!(info.branch, Cow::Owned(_)));
    }

    #[test]
    fn test_branch_display() {
        let info = by_code("01").unwrap();
        assert_eq!(info.to_string(), "CIVIL (Civil Engineering)");
    }

    #[test]
    fn test_branch_serialization() {
        let json = serde_json::to_string(by_code("42").unwrap()).unwrap();
        assert!(json.contains("\"branch\":\"CSM\""));
        let back: BranchInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, by_code("42").unwrap());
    }
}
