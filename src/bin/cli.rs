use chrono::Datelike;
use clap::{Parser, Subcommand};
use holiday_tool::persistence::{self, PersistenceError};
use holiday_tool::{
    assemble, us_federal_holidays, AppConfig, AssembleOptions, CalendarEvent, HolidayDefinition,
    HolidayRule, ResolvedHoliday,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "holiday-tool", about = "Generate a custom US holidays iCal file")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the JSON config file
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the iCal file for a year range
    Generate {
        /// Start year (default: current year)
        #[arg(long)]
        year: Option<i32>,
        /// End year (default: start year + configured range - 1)
        #[arg(long)]
        end_year: Option<i32>,
        /// Preview without writing the iCal file
        #[arg(long)]
        dry_run: bool,
        /// Path to the holidays JSON store
        #[arg(long)]
        holidays_file: Option<PathBuf>,
        /// Output .ics path
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also export resolved name,date rows as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Add a fixed-date holiday to the store
    AddHoliday {
        name: String,
        month: u32,
        day: u32,
        /// Apply the weekend observance shift (Sat -> Fri, Sun -> Mon)
        #[arg(long)]
        observed: bool,
        #[arg(long)]
        holidays_file: Option<PathBuf>,
    },
    /// Remove a holiday from the store by name
    RemoveHoliday {
        name: String,
        #[arg(long)]
        holidays_file: Option<PathBuf>,
    },
    /// Show the stored holiday definitions
    List {
        #[arg(long)]
        holidays_file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = match AppConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            log::error!("failed to load config {}: {err}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Generate {
            year,
            end_year,
            dry_run,
            holidays_file,
            output,
            csv,
        } => cmd_generate(&config, year, end_year, dry_run, holidays_file, output, csv),
        Command::AddHoliday {
            name,
            month,
            day,
            observed,
            holidays_file,
        } => cmd_add_holiday(&config, name, month, day, observed, holidays_file),
        Command::RemoveHoliday {
            name,
            holidays_file,
        } => cmd_remove_holiday(&config, &name, holidays_file),
        Command::List { holidays_file } => cmd_list(&config, holidays_file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn load_definitions(path: &PathBuf) -> Result<Vec<HolidayDefinition>, PersistenceError> {
    if path.exists() {
        persistence::load_holidays_from_json(path)
    } else {
        log::warn!(
            "{} not found; using the standard US federal holiday list",
            path.display()
        );
        Ok(us_federal_holidays())
    }
}

fn cmd_generate(
    config: &AppConfig,
    year: Option<i32>,
    end_year: Option<i32>,
    dry_run: bool,
    holidays_file: Option<PathBuf>,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_year = year.unwrap_or_else(|| chrono::Local::now().year());
    let end_year = end_year.unwrap_or(start_year + config.default_year_range - 1);
    let holidays_file = holidays_file.unwrap_or_else(|| config.holidays_file.clone());
    let output = output.unwrap_or_else(|| config.output_file.clone());

    let defs = load_definitions(&holidays_file)?;
    let mut cache = persistence::load_cache_from_json(&config.cache_file);
    log::debug!("loaded cache with {} entries", cache.len());

    log::info!("generating holidays for years {start_year} to {end_year}");
    let assembly = assemble(
        &defs,
        start_year,
        end_year,
        &AssembleOptions::default(),
        Some(&mut cache),
    )?;

    if let Err(err) = persistence::save_cache_to_json(&config.cache_file, &cache) {
        log::warn!("failed to save cache: {err}");
    }

    for warning in &assembly.warnings {
        println!("warning: {warning}");
    }
    println!("{}", render_events_table(&assembly.events));

    if let Some(csv_path) = &csv {
        let resolved: Vec<ResolvedHoliday> = assembly
            .events
            .iter()
            .map(|event| ResolvedHoliday {
                name: event.name.clone(),
                date: event.date,
            })
            .collect();
        persistence::export_resolved_to_csv(csv_path, &resolved)?;
        log::info!("resolved holidays exported to {}", csv_path.display());
    }

    if dry_run {
        log::info!("dry run complete, iCal file not written");
        return Ok(());
    }

    if assembly.events.is_empty() {
        return Err("no resolvable holidays; refusing to write an empty calendar".into());
    }

    let document = holiday_tool::ical::write_calendar(&assembly.events);
    std::fs::write(&output, document)?;
    log::info!("calendar saved as '{}'", output.display());
    Ok(())
}

fn cmd_add_holiday(
    config: &AppConfig,
    name: String,
    month: u32,
    day: u32,
    observed: bool,
    holidays_file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let holidays_file = holidays_file.unwrap_or_else(|| config.holidays_file.clone());
    let mut def = HolidayDefinition::new(name.clone(), HolidayRule::FixedDate { month, day });
    def.observed = observed;
    persistence::add_holiday(&holidays_file, def)?;
    // The definition changed, so any cached dates under this name are stale.
    persistence::invalidate_cache_for(&config.cache_file, &name)?;
    log::info!("added holiday: {name} on {month:02}-{day:02}");
    Ok(())
}

fn cmd_remove_holiday(
    config: &AppConfig,
    name: &str,
    holidays_file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let holidays_file = holidays_file.unwrap_or_else(|| config.holidays_file.clone());
    if persistence::remove_holiday(&holidays_file, name)? {
        persistence::invalidate_cache_for(&config.cache_file, name)?;
        log::info!("removed holiday: {name}");
    } else {
        log::warn!("holiday '{name}' not found in the store");
    }
    Ok(())
}

fn cmd_list(
    config: &AppConfig,
    holidays_file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let holidays_file = holidays_file.unwrap_or_else(|| config.holidays_file.clone());
    let defs = load_definitions(&holidays_file)?;
    println!("{}", render_definitions_table(&defs));
    Ok(())
}

fn render_events_table(events: &[CalendarEvent]) -> String {
    let mut rows = Vec::with_capacity(events.len());
    for event in events {
        let date = event.date.format("%Y-%m-%d").to_string();
        let note = if event.annual { "annual" } else { "" };
        rows.push([event.name.clone(), date, note.to_string()]);
    }
    render_table(&["name", "date", ""], &rows)
}

fn render_definitions_table(defs: &[HolidayDefinition]) -> String {
    let mut rows = Vec::with_capacity(defs.len());
    for def in defs {
        let rule = match def.rule {
            HolidayRule::FixedDate { month, day } => format!("fixed {month:02}-{day:02}"),
            HolidayRule::NthWeekday { month, weekday, nth } => {
                format!("{nth}th {weekday} of month {month}")
            }
            HolidayRule::LastWeekday { month, weekday } => {
                format!("last {weekday} of month {month}")
            }
            HolidayRule::Easter => "easter".to_string(),
        };
        let observed = if def.observed { "observed" } else { "" };
        rows.push([def.name.clone(), rule, observed.to_string()]);
    }
    render_table(&["name", "rule", ""], &rows)
}

fn render_table<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push('|');
    for (i, header) in headers.iter().enumerate() {
        out.push(' ');
        out.push_str(header);
        out.push_str(&" ".repeat(widths[i] - header.len()));
        out.push_str(" |");
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push('|');
        for (i, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            out.push_str(&" ".repeat(widths[i] - cell.len()));
            out.push_str(" |");
        }
        out.push('\n');
    }
    out.push_str(&sep);
    out
}
