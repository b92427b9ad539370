//! `rollcall` - Registration-number decoding and attendance bookkeeping
//!
//! This library decodes student registration numbers and faculty identifiers
//! into branch, entry type and year of study, and records, stores and reports
//! class attendance built on top of those decoded fields.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod attendance;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod regno;
pub mod report;
pub mod roster;
pub mod storage;

pub use attendance::{ClassKey, Session, Status};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use regno::{decode, decode_faculty_id, BranchInfo, Decoding, EntryType, RegNoDecoder, Warning};
pub use report::Report;
pub use roster::{ClassStudent, Roster};
pub use storage::{Storage, StorageStats};
