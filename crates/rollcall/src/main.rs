//! `rollcall` - CLI for registration-number decoding and attendance
//!
//! This binary decodes registration numbers and faculty identifiers, records
//! class attendance against a roster, and produces attendance reports.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, warn};

use rollcall::analytics;
use rollcall::attendance::parse_date;
use rollcall::cli::{
    ClassArgs, Cli, Command, ConfigCommand, DecodeCommand, FacultyCommand, MarkCommand,
    OutputFormat, ReportCommand, ReportFormat, RosterCommand, SessionsCommand,
};
use rollcall::roster::composition;
use rollcall::{
    decode_faculty_id, init_logging, ClassKey, ClassStudent, Config, Decoding, Report, Roster,
    Session, Status, Storage,
};

/// Exit status for failures caused by bad input (unknown branch, bad date).
const EXIT_INPUT_ERROR: u8 = 2;

/// Exit status for environment failures (database, roster file, config).
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Map an error to a process exit status.
fn exit_status(err: &anyhow::Error) -> u8 {
    if err
        .downcast_ref::<rollcall::Error>()
        .is_some_and(rollcall::Error::is_input_error)
    {
        EXIT_INPUT_ERROR
    } else {
        EXIT_FAILURE
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    // Execute the command
    match cli.command {
        Command::Decode(cmd) => handle_decode(&config, &cmd),
        Command::Faculty(cmd) => handle_faculty(&cmd),
        Command::Roster(cmd) => handle_roster(&config, &cmd),
        Command::Mark(cmd) => handle_mark(&config, cmd),
        Command::Sessions(cmd) => handle_sessions(&config, &cmd),
        Command::Report(cmd) => handle_report(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

#[derive(Debug, Serialize)]
struct DecodedEntry<'a> {
    reg_no: &'a str,
    #[serde(flatten)]
    decoding: &'a Decoding,
}

fn handle_decode(config: &Config, cmd: &DecodeCommand) -> anyhow::Result<()> {
    let decoder = config.decoder();
    let decoded: Vec<(&str, Decoding)> = cmd
        .reg_nos
        .iter()
        .map(|reg_no| (reg_no.as_str(), decoder.decode(reg_no)))
        .collect();

    if cmd.json {
        let entries: Vec<DecodedEntry> = decoded
            .iter()
            .map(|(reg_no, decoding)| DecodedEntry {
                reg_no: *reg_no,
                decoding,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (reg_no, decoding) in &decoded {
        println!("{reg_no}");
        match &decoding.branch_info {
            Some(info) => println!("  Branch:   {info}"),
            None => println!("  Branch:   -"),
        }
        match decoding.entry_type {
            Some(entry) => println!("  Entry:    {entry}"),
            None => println!("  Entry:    -"),
        }
        match decoding.calculated_year {
            Some(year) => println!("  Year:     {year}"),
            None => println!("  Year:     -"),
        }
        if let Some(warning) = decoding.warning {
            println!("  Warning:  {warning}");
        }
    }
    Ok(())
}

fn handle_faculty(cmd: &FacultyCommand) -> anyhow::Result<()> {
    let info = decode_faculty_id(&cmd.id);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    match info {
        Some(info) => {
            println!("{}", cmd.id);
            println!("  Branch:      {}", info.branch);
            println!("  Department:  {}", info.department);
            Ok(())
        }
        None => bail!("unrecognised faculty identifier: {}", cmd.id),
    }
}

fn handle_roster(config: &Config, cmd: &RosterCommand) -> anyhow::Result<()> {
    let class = class_key(config, &cmd.class)?;
    let students = load_class(config, cmd.file.clone(), &class)?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&students)?),
        OutputFormat::Plain => {
            for student in &students {
                println!("{}\t{}", student.reg_no, student.name);
            }
        }
        OutputFormat::Table => {
            if students.is_empty() {
                println!("No students found for {class}.");
                return Ok(());
            }
            println!("{:<12}  {:<13}  Name", "Reg No", "Entry");
            println!("{}", "-".repeat(48));
            for student in &students {
                let entry = student
                    .entry_type
                    .map_or_else(|| "-".to_string(), |e| e.to_string());
                println!("{:<12}  {:<13}  {}", student.reg_no, entry, student.name);
            }
            let counts = composition(&students);
            println!();
            println!(
                "{} students ({} regular, {} lateral entry)",
                students.len(),
                counts.regular,
                counts.lateral
            );
        }
    }
    Ok(())
}

fn handle_mark(config: &Config, cmd: MarkCommand) -> anyhow::Result<()> {
    let class = class_key(config, &cmd.class)?;
    let students = load_class(config, cmd.roster, &class)?;
    if students.is_empty() {
        bail!("no students found for {class}");
    }

    let date = parse_optional_date(cmd.date.as_deref())?.unwrap_or_else(|| Local::now().date_naive());

    let mut session = Session::new(date, class, cmd.topic);
    session.mark_all(&students, Status::Present);
    for reg_no in &cmd.absent {
        let reg_no = reg_no.trim().to_uppercase();
        if reg_no.is_empty() {
            continue;
        }
        if students.iter().any(|s| s.reg_no == reg_no) {
            session.mark(reg_no, Status::Absent);
        } else {
            warn!(reg_no = %reg_no, class = %session.class, "not in class, ignoring");
        }
    }

    let mut storage = open_storage(config)?;
    let id = storage
        .save_session(&session)
        .context("failed to save session")?;

    println!(
        "Saved session {id} for {} on {}: {}/{} present ({}%)",
        session.class,
        session.date,
        session.present_count(),
        session.total(),
        analytics::percent(session.present_count(), session.total())
    );
    Ok(())
}

fn handle_sessions(config: &Config, cmd: &SessionsCommand) -> anyhow::Result<()> {
    let class = class_key(config, &cmd.class)?;
    let from = parse_optional_date(cmd.from.as_deref())?;
    let to = parse_optional_date(cmd.to.as_deref())?;

    let storage = open_storage(config)?;
    let sessions = storage.list_sessions(&class, from, to)?;
    debug!(count = sessions.len(), "loaded sessions");

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sessions)?),
        OutputFormat::Plain => {
            for day in analytics::daily_stats(&sessions) {
                println!("{}\t{}/{}\t{}", day.date, day.present, day.total, day.topic);
            }
        }
        OutputFormat::Table => {
            if sessions.is_empty() {
                println!("No sessions recorded for {class}.");
                return Ok(());
            }
            println!(
                "{:>6}  {:<10}  {:>7}  {:>5}  {:>4}  Topic",
                "ID", "Date", "Present", "Total", "%"
            );
            println!("{}", "-".repeat(60));
            for (session, day) in sessions.iter().zip(analytics::daily_stats(&sessions)) {
                println!(
                    "{:>6}  {:<10}  {:>7}  {:>5}  {:>3}%  {}",
                    session.id.unwrap_or_default(),
                    day.date,
                    day.present,
                    day.total,
                    day.percent,
                    day.topic
                );
            }
        }
    }
    Ok(())
}

fn handle_report(config: &Config, cmd: &ReportCommand) -> anyhow::Result<()> {
    let class = class_key(config, &cmd.class)?;
    let from = parse_optional_date(cmd.from.as_deref())?;
    let to = parse_optional_date(cmd.to.as_deref())?;
    let students = load_class(config, cmd.roster.clone(), &class)?;

    let storage = open_storage(config)?;
    let sessions = storage.list_sessions(&class, from, to)?;

    let report = Report::build(
        class,
        &students,
        &sessions,
        from,
        to,
        config.analytics.low_attendance_threshold,
    );

    let content = match cmd.format {
        ReportFormat::Csv => report.to_csv(),
        ReportFormat::Table => report.to_table(),
        ReportFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
    };

    match &cmd.output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(format!("{}.{}", report.file_stem(), cmd.format.extension()))
            } else {
                path.clone()
            };
            std::fs::write(&path, content)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Decoder]");
                println!("  Anchor year:          {}", config.decoder.anchor_year);
                println!();
                println!("[Storage]");
                println!("  Database path:        {}", config.database_path().display());
                println!();
                println!("[Roster]");
                println!("  Roster path:          {}", config.roster_path().display());
                println!();
                println!("[Analytics]");
                println!(
                    "  Low attendance below: {}%",
                    config.analytics.low_attendance_threshold
                );
                println!(
                    "  Default section:      {}",
                    config.analytics.default_section
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn class_key(config: &Config, args: &ClassArgs) -> anyhow::Result<ClassKey> {
    let section = args
        .section
        .as_deref()
        .unwrap_or(&config.analytics.default_section);
    Ok(ClassKey::new(&args.branch, args.year, section)?)
}

fn load_class(
    config: &Config,
    roster_path: Option<PathBuf>,
    class: &ClassKey,
) -> anyhow::Result<Vec<ClassStudent>> {
    let path = roster_path.unwrap_or_else(|| config.roster_path());
    let roster = Roster::load(&path)
        .with_context(|| format!("failed to load roster {}", path.display()))?;
    Ok(roster.class(&config.decoder(), &class.branch, class.year))
}

fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    let path = config.database_path();
    Storage::open(&path).with_context(|| format!("failed to open database {}", path.display()))
}

fn parse_optional_date(input: Option<&str>) -> anyhow::Result<Option<NaiveDate>> {
    Ok(input.map(parse_date).transpose()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_input_error() {
        let err = anyhow::Error::from(rollcall::Error::UnknownBranch("BIO".to_string()));
        assert_eq!(exit_status(&err), EXIT_INPUT_ERROR);
    }

    #[test]
    fn test_exit_status_through_context() {
        let err = anyhow::Error::from(parse_date("2025-13-01").unwrap_err())
            .context("failed to parse --from");
        assert_eq!(exit_status(&err), EXIT_INPUT_ERROR);
    }

    #[test]
    fn test_exit_status_environment_error() {
        let err = anyhow::Error::from(rollcall::Error::roster_load(
            "/nonexistent/students.json",
            "not found",
        ));
        assert_eq!(exit_status(&err), EXIT_FAILURE);

        let err = anyhow::anyhow!("no students found");
        assert_eq!(exit_status(&err), EXIT_FAILURE);
    }
}
