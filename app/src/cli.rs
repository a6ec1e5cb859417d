//! Command-line interface
//!
//! Parses commands with clap and renders results as text or JSON. Command
//! execution returns the rendered output so it can be tested without a
//! terminal.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use treadmill_calc_shared::validation::{clamp_incline, clamp_speed, clamp_time, clamp_weight};
use treadmill_calc_shared::{
    compute_metrics, format_table_date, CalorieAccounting, GoalSpec, LogSummary, WeightDeficitRecord,
    ACCURACY_NOTE,
};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::services::{GoalService, SessionReport, SessionService, SetField, SolveOutcome, WeightLogService};
use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "treadmill-calc", version)]
#[command(about = "Treadmill workout calculator: ACSM calorie estimates, goal solver and weight log")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Override the data directory from the configuration
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate VO2, METs, calories and distance for one set
    Calc {
        /// Speed in km/h
        #[arg(long)]
        speed: f64,
        /// Incline in percent
        #[arg(long, default_value_t = 0.0)]
        incline: f64,
        /// Duration in minutes
        #[arg(long)]
        minutes: f64,
        /// Body weight in kg (defaults to the session weight)
        #[arg(long)]
        weight: Option<f64>,
        /// Clamp inputs to the supported ranges first
        #[arg(long)]
        clamp: bool,
    },
    /// Find speed/incline options that meet a calorie goal
    Solve {
        #[command(subcommand)]
        goal: SolveCommand,
    },
    /// Edit and review the stored workout session
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Daily weight and calorie deficit log
    Log {
        #[command(subcommand)]
        command: LogCommand,
    },
    /// Inspect or create configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SolveCommand {
    /// Burn a number of calories within a duration
    Total {
        #[arg(long)]
        calories: f64,
        #[arg(long)]
        minutes: f64,
        /// Body weight in kg (defaults to the session weight)
        #[arg(long)]
        weight: Option<f64>,
        /// Count resting metabolism too
        #[arg(long)]
        gross: bool,
    },
    /// Burn calories at a sustained per-minute rate
    Rate {
        #[arg(long)]
        per_minute: f64,
        /// Body weight in kg (defaults to the session weight)
        #[arg(long)]
        weight: Option<f64>,
        /// Count resting metabolism too
        #[arg(long)]
        gross: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Show sets, per-set metrics and totals
    Show,
    /// Set the body weight in kg
    Weight { kg: f64 },
    /// Append a default set
    Add,
    /// Remove a set by number (starting at 1)
    Remove { set: usize },
    /// Change one field of a set
    Set {
        /// Set number, starting at 1
        set: usize,
        #[arg(value_enum)]
        field: SetField,
        /// New value; out-of-range values are clamped
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Back to the default weight and a single default set
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// Record weight and deficit for a day (replaces that day's entry)
    Add {
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        weight: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        deficit: f64,
    },
    /// Show the entry for a date
    Show { date: NaiveDate },
    /// Delete the entry for a date
    Remove { date: NaiveDate },
    /// All entries, newest first
    List,
    /// Chart series, oldest first
    Chart,
    /// Totals and averages over the whole log
    Summary,
    /// Export as a text table, or as CSV with --csv
    Export {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the default configuration as TOML
    Init {
        #[arg(long, default_value = "config/development.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Execution
// ============================================================================

/// Run a parsed command and return the rendered output
pub fn execute(cli: &Cli, state: &AppState) -> AppResult<String> {
    let format = cli.format;
    match &cli.command {
        Command::Calc {
            speed,
            incline,
            minutes,
            weight,
            clamp,
        } => {
            let weight = match weight {
                Some(w) => *w,
                None => SessionService::load(state)?.weight_kg,
            };
            let (speed, incline, minutes, weight) = if *clamp {
                (clamp_speed(*speed), clamp_incline(*incline), clamp_time(*minutes), clamp_weight(weight))
            } else {
                (*speed, *incline, *minutes, weight)
            };
            render_calc(format, speed, incline, minutes, weight)
        }
        Command::Solve { goal } => {
            let (goal, weight) = goal_from(goal);
            let weight = match weight {
                Some(w) => w,
                None => SessionService::load(state)?.weight_kg,
            };
            let outcome = GoalService::solve(&goal, weight)?;
            render_solve(format, &goal, weight, &outcome)
        }
        Command::Session { command } => run_session(format, command, state),
        Command::Log { command } => run_log(format, command, state),
        Command::Config { command } => run_config(format, command, state.config()),
    }
}

fn goal_from(command: &SolveCommand) -> (GoalSpec, Option<f64>) {
    let accounting = |gross: bool| {
        if gross {
            CalorieAccounting::Gross
        } else {
            CalorieAccounting::Net
        }
    };
    match *command {
        SolveCommand::Total {
            calories,
            minutes,
            weight,
            gross,
        } => (
            GoalSpec::ByTotal {
                target_calories: calories,
                duration_minutes: minutes,
                accounting: accounting(gross),
            },
            weight,
        ),
        SolveCommand::Rate {
            per_minute,
            weight,
            gross,
        } => (
            GoalSpec::ByRate {
                target_calories_per_minute: per_minute,
                accounting: accounting(gross),
            },
            weight,
        ),
    }
}

/// Convert a 1-based set number to an index
fn set_index(number: usize) -> AppResult<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| AppError::InvalidInput("set numbers start at 1".to_string()))
}

fn run_session(format: OutputFormat, command: &SessionCommand, state: &AppState) -> AppResult<String> {
    let record = match command {
        SessionCommand::Show => SessionService::load(state)?,
        SessionCommand::Weight { kg } => SessionService::set_weight(state, *kg)?,
        SessionCommand::Add => SessionService::add_set(state)?,
        SessionCommand::Remove { set } => SessionService::remove_set(state, set_index(*set)?)?,
        SessionCommand::Set { set, field, value } => {
            SessionService::update_set(state, set_index(*set)?, *field, *value)?
        }
        SessionCommand::Reset => SessionService::reset(state)?,
    };
    let report = SessionService::report(&record);
    match format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Text => Ok(session_text(&report)),
    }
}

fn run_log(format: OutputFormat, command: &LogCommand, state: &AppState) -> AppResult<String> {
    match command {
        LogCommand::Add { date, weight, deficit } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let record = WeightLogService::log_entry(state, date, *weight, *deficit)?;
            render_record(format, &record, "Logged")
        }
        LogCommand::Show { date } => {
            let record = WeightLogService::entry(state, *date)?;
            render_record(format, &record, "Entry")
        }
        LogCommand::Remove { date } => {
            let record = WeightLogService::remove_entry(state, *date)?;
            render_record(format, &record, "Removed")
        }
        LogCommand::List => render_records(format, &WeightLogService::list(state)?),
        LogCommand::Chart => render_records(format, &WeightLogService::chart(state)?),
        LogCommand::Summary => {
            let summary = WeightLogService::summary(state)?;
            match format {
                OutputFormat::Json => to_json(&summary),
                OutputFormat::Text => Ok(summary.as_ref().map_or_else(|| "No entries yet".to_string(), summary_text)),
            }
        }
        LogCommand::Export { csv: Some(path) } => {
            let count = WeightLogService::export_csv(state, path)?;
            match format {
                OutputFormat::Json => to_json(&json!({ "path": path, "entries": count })),
                OutputFormat::Text => Ok(format!("Exported {count} entries to {}", path.display())),
            }
        }
        LogCommand::Export { csv: None } => {
            let table = WeightLogService::export_table(state)?;
            match format {
                OutputFormat::Json => to_json(&json!({ "table": table })),
                OutputFormat::Text => Ok(table.unwrap_or_else(|| "No entries yet".to_string())),
            }
        }
    }
}

fn run_config(format: OutputFormat, command: &ConfigCommand, config: &AppConfig) -> AppResult<String> {
    match command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => to_json(config),
            OutputFormat::Text => Ok(config.to_toml()?),
        },
        ConfigCommand::Init { path, force } => {
            if path.exists() && !force {
                return Err(AppError::InvalidInput(format!(
                    "{} already exists, pass --force to overwrite",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, AppConfig::default().to_toml()?)?;
            Ok(format!("Wrote default configuration to {}", path.display()))
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn render_calc(format: OutputFormat, speed: f64, incline: f64, minutes: f64, weight: f64) -> AppResult<String> {
    let metrics = compute_metrics(speed, incline, minutes, weight).rounded();
    match format {
        OutputFormat::Json => to_json(&json!({
            "speed_kmh": speed,
            "incline_percent": incline,
            "time_minutes": minutes,
            "weight_kg": weight,
            "metrics": metrics,
            "note": ACCURACY_NOTE,
        })),
        OutputFormat::Text => {
            let lines = [
                format!("{speed} km/h at {incline}% for {minutes} min, {weight} kg"),
                format!("  VO2               {} ml/kg/min", metrics.vo2),
                format!("  METs              {}", metrics.mets),
                format!("  Calories (net)    {} kcal", metrics.calories_net),
                format!("  Calories (gross)  {} kcal", metrics.calories_gross),
                format!(
                    "  Per minute        {} net / {} gross kcal",
                    metrics.calories_per_minute_net, metrics.calories_per_minute_gross
                ),
                format!("  Distance          {} km", metrics.distance_km),
                String::new(),
                ACCURACY_NOTE.to_string(),
            ];
            Ok(lines.join("\n"))
        }
    }
}

fn render_solve(format: OutputFormat, goal: &GoalSpec, weight: f64, outcome: &SolveOutcome) -> AppResult<String> {
    if format == OutputFormat::Json {
        return to_json(&json!({ "goal": goal, "weight_kg": weight, "result": outcome }));
    }

    let accounting = match goal.accounting() {
        CalorieAccounting::Net => "net",
        CalorieAccounting::Gross => "gross",
    };
    let heading = match *goal {
        GoalSpec::ByTotal {
            target_calories,
            duration_minutes,
            ..
        } => format!("{target_calories} kcal {accounting} in {duration_minutes} min at {weight} kg"),
        GoalSpec::ByRate {
            target_calories_per_minute,
            ..
        } => format!("{target_calories_per_minute} kcal/min {accounting} at {weight} kg"),
    };

    let options = match outcome {
        SolveOutcome::NoFeasibleOptions => {
            return Ok(format!(
                "{heading}\nNo speed between 1 and 20 km/h reaches this goal on any incline"
            ))
        }
        SolveOutcome::Options(options) => options,
    };

    let mut lines = vec![
        heading,
        format!(
            "{:>7}  {:>10}  {:>5}  {:<13}  {:>8}  {:>10}  (over {} min)",
            "Incline", "Speed", "METs", "Intensity", "kcal net", "kcal gross", goal.report_minutes()
        ),
    ];
    for c in options {
        lines.push(format!(
            "{:>6}%  {:>5.1} km/h  {:>5.2}  {:<13}  {:>8.1}  {:>10.1}",
            c.incline_percent,
            c.speed_kmh,
            c.mets,
            c.intensity_label(),
            c.calories_net,
            c.calories_gross
        ));
    }
    Ok(lines.join("\n"))
}

fn session_text(report: &SessionReport) -> String {
    let mut lines = vec![format!("Body weight: {} kg", report.weight_kg)];
    if report.effective_weight_kg != report.weight_kg {
        lines.push(format!("  (calculating with {} kg)", report.effective_weight_kg));
    }
    for (i, row) in report.sets.iter().enumerate() {
        lines.push(format!(
            "Set {}: {} km/h, {}%, {}:{:02}  ->  {} kcal net, {} kcal gross, {} km, {} METs",
            i + 1,
            row.set.speed_kmh,
            row.set.incline_percent,
            row.set.time_minutes,
            row.set.time_seconds,
            row.metrics.calories_net,
            row.metrics.calories_gross,
            row.metrics.distance_km,
            row.metrics.mets
        ));
    }
    lines.push(format!(
        "Total: {} kcal net, {} kcal gross, {} km over {} set(s)",
        report.totals.calories_net, report.totals.calories_gross, report.totals.distance_km, report.totals.set_count
    ));
    lines.join("\n")
}

fn record_line(r: &WeightDeficitRecord) -> String {
    format!("{}  {} kg  {} kcal deficit", format_table_date(r.date), r.weight_kg, r.deficit_kcal)
}

fn render_record(format: OutputFormat, record: &WeightDeficitRecord, verb: &str) -> AppResult<String> {
    match format {
        OutputFormat::Json => to_json(record),
        OutputFormat::Text => Ok(format!("{verb}: {}", record_line(record))),
    }
}

fn render_records(format: OutputFormat, records: &[WeightDeficitRecord]) -> AppResult<String> {
    match format {
        OutputFormat::Json => to_json(records),
        OutputFormat::Text if records.is_empty() => Ok("No entries yet".to_string()),
        OutputFormat::Text => Ok(records.iter().map(record_line).collect::<Vec<_>>().join("\n")),
    }
}

fn summary_text(s: &LogSummary) -> String {
    let mut lines = vec![
        format!(
            "{} entries over {} days ({} to {})",
            s.entries_count,
            s.total_days,
            format_table_date(s.first_date),
            format_table_date(s.last_date)
        ),
        format!(
            "Weight: {} kg -> {} kg ({:.1} kg lost)",
            s.start_weight_kg, s.current_weight_kg, s.weight_change_kg
        ),
        format!(
            "Deficit: {:.0} kcal total, {:.0} kcal/day average",
            s.total_deficit_kcal, s.average_deficit_kcal
        ),
    ];
    if let Some(avg) = s.moving_average_kg {
        lines.push(format!("7-entry average weight: {avg:.1} kg"));
    }
    lines.join("\n")
}
