//! CLI frontend for the Almagest in-world calendar and almanac engine.

mod commands;
mod session;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "almagest",
    about = "Almagest — in-world calendar, clock, and sky for tabletop sessions",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new session directory with a starter calendar
    Init {
        /// Name of the session directory to create
        name: String,
    },

    /// Show the current date, time, latitude, and sky at a glance
    Show {
        /// Session directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Show or change the current date
    Date {
        /// New date as "<day> [<month> [<year>]]"; omit to show the date
        #[arg(num_args = 0..=3)]
        date: Vec<String>,

        /// Move the date by a signed number of days instead
        #[arg(long, allow_hyphen_values = true, conflicts_with = "date")]
        adjust: Option<i64>,

        /// Session directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Show or change the current time
    Time {
        /// New time as "HH:MM"; omit to show the time
        time: Option<String>,

        /// Move the clock by a signed number of hours
        #[arg(long, default_value_t = 0, allow_hyphen_values = true, conflicts_with = "time")]
        adjust_hours: i64,

        /// Move the clock by a signed number of minutes
        #[arg(long, default_value_t = 0, allow_hyphen_values = true, conflicts_with = "time")]
        adjust_minutes: i64,

        /// Session directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Show or set the latitude used for solar event times
    Latitude {
        /// New latitude in degrees, -90 to 90 (negative is south)
        #[arg(allow_negative_numbers = true)]
        value: Option<f64>,

        /// Session directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Show a calendar overview for a year
    Calendar {
        /// Year to show (default: the current year)
        #[arg(allow_negative_numbers = true)]
        year: Option<i64>,

        /// Session directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Show moon phases on a date
    Moons {
        /// Date as "<day> <month> [<year>]" (default: the current date)
        #[arg(num_args = 0..=3)]
        date: Vec<String>,

        /// Session directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Show dawn, sunrise, sunset, and dusk on a date
    Sun {
        /// Date as "<day> <month> [<year>]" (default: the current date)
        #[arg(num_args = 0..=3)]
        date: Vec<String>,

        /// Session directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { name } => commands::init::run(&name),
        Commands::Show { dir } => commands::show::run(&dir),
        Commands::Date { date, adjust, dir } => commands::date::run(&dir, &date, adjust),
        Commands::Time {
            time,
            adjust_hours,
            adjust_minutes,
            dir,
        } => commands::time::run(&dir, time.as_deref(), adjust_hours, adjust_minutes),
        Commands::Latitude { value, dir } => commands::latitude::run(&dir, value),
        Commands::Calendar { year, dir } => commands::calendar::run(&dir, year),
        Commands::Moons { date, dir } => commands::moons::run(&dir, &date),
        Commands::Sun { date, dir } => commands::sun::run(&dir, &date),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
