//! Registration-number decoding.
//!
//! A registration number is a fixed-width token such as `24HP1A0205`:
//!
//! | positions | field            | example |
//! |-----------|------------------|---------|
//! | `[0, 2)`  | join year        | `24`    |
//! | `[2, 4)`  | institution code | `HP`    |
//! | `[4, 6)`  | entry code       | `1A`    |
//! | `[6, 8)`  | branch code      | `02`    |
//! | `[8, ..)` | roll serial      | `05`    |
//!
//! Decoding is incremental: a partially typed number yields whatever fields
//! its length allows, and the first structural failure stops decoding with a
//! [`Warning`]. The decoder never fails. Both join-year characters must be
//! ASCII digits, so inputs such as `2AHP...` or `-1HP...` are rejected with
//! [`Warning::InvalidYearFormat`] rather than read as a one-digit year.
//!
//! # Example
//!
//! ```
//! use rollcall::regno::{decode, EntryType};
//!
//! let decoded = decode("24hp5a0502");
//! assert_eq!(decoded.entry_type, Some(EntryType::LateralEntry));
//! assert_eq!(decoded.calculated_year, Some(3));
//! assert_eq!(decoded.branch_info.unwrap().branch, "CSE");
//! ```

pub mod branch;
mod faculty;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

pub use branch::{BranchInfo, BRANCHES};
pub use faculty::decode_faculty_id;

/// Institution code expected at positions 2 and 3.
pub const COLLEGE_CODE: &str = "HP";

/// Entry code for students admitted directly into the first year.
pub const REGULAR_ENTRY_CODE: &str = "1A";

/// Entry code for diploma holders admitted into the second year.
pub const LATERAL_ENTRY_CODE: &str = "5A";

/// Two-digit year whose cohort is in its first year in the current cycle.
pub const DEFAULT_ANCHOR_YEAR: u8 = 25;

/// Lowest year of study.
pub const MIN_YEAR: u8 = 1;

/// Highest year of study.
pub const MAX_YEAR: u8 = 4;

/// How a student entered the programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Direct first-year admission (`1A`).
    Regular,
    /// Lateral entry after a diploma (`5A`), one year ahead.
    LateralEntry,
}

impl EntryType {
    /// Map an entry code to an entry type.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            REGULAR_ENTRY_CODE => Some(Self::Regular),
            LATERAL_ENTRY_CODE => Some(Self::LateralEntry),
            _ => None,
        }
    }

    /// Years added on top of the join-year computation.
    #[must_use]
    pub fn year_offset(self) -> i32 {
        match self {
            Self::Regular => 0,
            Self::LateralEntry => 1,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "Regular"),
            Self::LateralEntry => write!(f, "Lateral Entry"),
        }
    }
}

/// Structural problem found while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    /// The first two characters are not digits.
    InvalidYearFormat,
    /// The institution code is not [`COLLEGE_CODE`].
    InvalidCollegeCode,
    /// The entry code is neither regular nor lateral.
    InvalidEntryCode,
    /// The branch code starts with a character no branch uses.
    NoBranchFound,
    /// The branch code is well-formed but not in the branch table.
    UnknownBranchCode,
}

impl Warning {
    /// Message suitable for showing next to the input field.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidYearFormat => "Invalid Year Format",
            Self::InvalidCollegeCode => "Invalid College Code",
            Self::InvalidEntryCode => "Invalid Entry Code",
            Self::NoBranchFound => "No Branch Found",
            Self::UnknownBranchCode => "Unknown Branch Code",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Fields recovered from a registration number.
///
/// Each field is set only when the input is long enough to contain it and
/// every earlier check passed:
///
/// - 2+ characters: `calculated_year`
/// - 6+ characters: `entry_type`
/// - 8+ characters: `branch_info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoding {
    /// Branch encoded at positions 6 and 7.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_info: Option<BranchInfo>,
    /// Why decoding stopped, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<Warning>,
    /// Entry type from the entry code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<EntryType>,
    /// Current year of study, always within `1..=4`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculated_year: Option<u8>,
}

impl Decoding {
    /// True when every field decoded without a warning.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.warning.is_none()
            && self.branch_info.is_some()
            && self.entry_type.is_some()
            && self.calculated_year.is_some()
    }

    /// Short branch name, if a branch was found.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch_info.as_ref().map(|info| info.branch.as_ref())
    }
}

/// Registration-number decoder bound to an anchor year.
///
/// The anchor year is the two-digit year whose cohort counts as first year,
/// so `year = anchor - join_year + 1`, shifted by one for lateral entry and
/// clamped to `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegNoDecoder {
    anchor_year: u8,
}

impl Default for RegNoDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_ANCHOR_YEAR)
    }
}

impl RegNoDecoder {
    /// Create a decoder for the given two-digit anchor year.
    #[must_use]
    pub const fn new(anchor_year: u8) -> Self {
        Self { anchor_year }
    }

    /// The anchor year in use.
    #[must_use]
    pub const fn anchor_year(&self) -> u8 {
        self.anchor_year
    }

    /// Decode a registration number.
    ///
    /// Input is trimmed and upper-cased first. Decoding stops at the first
    /// failed check, leaving later fields unset.
    #[must_use]
    pub fn decode(&self, input: &str) -> Decoding {
        let cleaned: Vec<char> = input.trim().to_uppercase().chars().collect();
        let mut result = Decoding::default();

        if cleaned.len() < 2 {
            return result;
        }

        let Some(join_year) = parse_two_digits(&cleaned[0..2]) else {
            result.warning = Some(Warning::InvalidYearFormat);
            return finish(result, input);
        };
        let mut raw_year = i32::from(self.anchor_year) - i32::from(join_year) + 1;
        result.calculated_year = Some(clamp_year(raw_year));

        if cleaned.len() < 4 {
            return finish(result, input);
        }
        if field(&cleaned, 2, 4) != COLLEGE_CODE {
            result.warning = Some(Warning::InvalidCollegeCode);
            return finish(result, input);
        }

        if cleaned.len() < 6 {
            return finish(result, input);
        }
        let Some(entry_type) = EntryType::from_code(&field(&cleaned, 4, 6)) else {
            result.warning = Some(Warning::InvalidEntryCode);
            return finish(result, input);
        };
        raw_year += entry_type.year_offset();
        result.entry_type = Some(entry_type);
        result.calculated_year = Some(clamp_year(raw_year));

        if cleaned.len() < 7 {
            return finish(result, input);
        }
        if !branch::VALID_BRANCH_LEADING_DIGITS.contains(&cleaned[6]) {
            result.warning = Some(Warning::NoBranchFound);
            return finish(result, input);
        }

        if cleaned.len() < 8 {
            return finish(result, input);
        }
        match branch::by_code(&field(&cleaned, 6, 8)) {
            Some(info) => {
                result.branch_info = Some(info.clone());
                result.warning = None;
            }
            None => result.warning = Some(Warning::UnknownBranchCode),
        }

        finish(result, input)
    }
}

/// Decode a registration number with the default anchor year.
#[must_use]
pub fn decode(input: &str) -> Decoding {
    RegNoDecoder::default().decode(input)
}

/// Clamp a raw year computation into the valid year-of-study range.
fn clamp_year(raw: i32) -> u8 {
    let clamped = raw.clamp(i32::from(MIN_YEAR), i32::from(MAX_YEAR));
    u8::try_from(clamped).unwrap_or(MIN_YEAR)
}

fn parse_two_digits(chars: &[char]) -> Option<u8> {
    let tens = chars.first()?.to_digit(10)?;
    let ones = chars.get(1)?.to_digit(10)?;
    u8::try_from(tens * 10 + ones).ok()
}

fn field(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end].iter().collect()
}

fn finish(result: Decoding, input: &str) -> Decoding {
    trace!(
        input,
        warning = ?result.warning,
        year = ?result.calculated_year,
        "decoded registration number"
    );
    result
}
