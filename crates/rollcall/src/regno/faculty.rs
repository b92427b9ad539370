//! Faculty and employee identifier decoding.
//!
//! Two identifier shapes are recognised, checked in this order:
//!
//! - `FAC-<DEPT>-<NUM>`, e.g. `FAC-CSE-001`
//! - `ALIET-<YY>-<BRANCH CODE>`, e.g. `ALIET-26-05`

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::branch::{self, BranchInfo};

static FAC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^FAC-([^-]*)").expect("valid faculty pattern"));

static ALIET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ALIET-[^-]*-([^-]*)").expect("valid employee pattern"));

/// Shortest department code accepted outside the branch table.
const MIN_DEPT_LEN: usize = 2;

/// Longest department code accepted outside the branch table.
const MAX_DEPT_LEN: usize = 5;

/// Recover the branch a faculty member belongs to from their identifier.
///
/// A `FAC-` department that is not in the branch table is still accepted
/// when it is 2 to 5 characters long; the returned entry then uses the
/// code as both branch and department name. Returns `None` when neither
/// pattern yields a branch.
#[must_use]
pub fn decode_faculty_id(input: &str) -> Option<BranchInfo> {
    let cleaned = input.trim().to_uppercase();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = FAC_PATTERN.captures(&cleaned) {
        let dept = &caps[1];
        if let Some(info) = branch::by_name(dept) {
            return Some(info.clone());
        }
        if (MIN_DEPT_LEN..=MAX_DEPT_LEN).contains(&dept.chars().count()) {
            debug!(dept, "faculty department not in branch table");
            return Some(BranchInfo::ad_hoc(dept, dept));
        }
    }

    if let Some(caps) = ALIET_PATTERN.captures(&cleaned) {
        if let Some(info) = branch::by_code(&caps[1]) {
            return Some(info.clone());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fac_known_department() {
        let info = decode_faculty_id("FAC-CSE-001").unwrap();
        assert_eq!(info.branch, "CSE");
        assert_eq!(info.department, "Computer Science and Engineering");
    }

    #[test]
    fn test_fac_is_case_insensitive() {
        let info = decode_faculty_id("  fac-eee-12 ").unwrap();
        assert_eq!(info.branch, "EEE");
    }

    #[test]
    fn test_fac_unknown_department_is_kept() {
        let info = decode_faculty_id("FAC-AERO-7").unwrap();
        assert_eq!(info.branch, "AERO");
        assert_eq!(info.department, "AERO");
    }

    #[test]
    fn test_fac_department_length_bounds() {
        assert!(decode_faculty_id("FAC-X-1").is_none());
        assert!(decode_faculty_id("FAC--1").is_none());
        assert!(decode_faculty_id("FAC-").is_none());
        assert!(decode_faculty_id("FAC-PHYSICS-1").is_none());
        assert_eq!(decode_faculty_id("FAC-MATHS").unwrap().branch, "MATHS");
    }

    #[test]
    fn test_aliet_known_code() {
        let info = decode_faculty_id("ALIET-26-05").unwrap();
        assert_eq!(info.branch, "CSE");

        let info = decode_faculty_id("aliet-19-42-003").unwrap();
        assert_eq!(info.branch, "CSM");
    }

    #[test]
    fn test_aliet_unknown_or_missing_code() {
        assert!(decode_faculty_id("ALIET-26-99").is_none());
        assert!(decode_faculty_id("ALIET-26").is_none());
        assert!(decode_faculty_id("ALIET-26-").is_none());
    }

    #[test]
    fn test_unrecognised_ids() {
        assert!(decode_faculty_id("").is_none());
        assert!(decode_faculty_id("   ").is_none());
        assert!(decode_faculty_id("EMP-CSE-001").is_none());
        assert!(decode_faculty_id("24HP1A0205").is_none());
    }

    #[test]
    fn test_fac_checked_before_aliet() {
        let info = decode_faculty_id("FAC-ALIET-26-05").unwrap();
        assert_eq!(info.branch, "ALIET");
    }
}
