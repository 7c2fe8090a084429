mod config;
mod export_cmd;
mod plan_cmds;
mod reschedule_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use planora_core::ExamType;
use planora_core::export::ExportFormat;
use planora_core::ingest::SourceInput;
use planora_core::reschedule::DoneMarker;

#[derive(Parser)]
#[command(
    name = "planora",
    version,
    about = "Turn a syllabus into a day-by-day study plan"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the syllabus comes from. A topic list wins over a file, which wins
/// over pasted text.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Manual topic list, one topic per line
    #[arg(long)]
    topics: Option<String>,
    /// Syllabus file (PDF or plain text)
    #[arg(long)]
    file: Option<PathBuf>,
    /// Pasted syllabus text
    #[arg(long)]
    text: Option<String>,
}

impl SourceArgs {
    pub fn input(&self) -> SourceInput {
        SourceInput {
            topics_text: self.topics.clone(),
            file: self.file.clone(),
            syllabus_text: self.text.clone(),
        }
    }
}

/// Where and how to write a rendered plan.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format: json, text, ics, or pdf
    #[arg(long, default_value_t = ExportFormat::Json)]
    format: ExportFormat,
    /// Calendar date of day 1 for ics output (defaults to today)
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a planora config file with default plan settings
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Show the topics extracted from a syllabus
    Topics {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Generate a study plan from a syllabus
    Plan {
        #[command(flatten)]
        source: SourceArgs,
        /// Number of days in the plan
        #[arg(long)]
        plan_length: Option<u32>,
        /// Study hours available per day
        #[arg(long)]
        hours_per_day: Option<f64>,
        /// Exam type: final or regular_test
        #[arg(long)]
        exam_type: Option<ExamType>,
        /// Share of time reserved for review (0.0 to 0.3)
        #[arg(long)]
        review_fraction: Option<f64>,
        /// Exam date (YYYY-MM-DD), recorded in the plan
        #[arg(long)]
        exam_date: Option<NaiveDate>,
        /// Course label recorded in the plan
        #[arg(long)]
        course_type: Option<String>,
        /// Give harder topics a larger share of the time
        #[arg(long)]
        weight_by_difficulty: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Render a saved plan in another format
    Export {
        /// Path to a plan JSON file
        plan: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Re-plan unfinished topics over the days left before the exam
    Reschedule {
        /// Path to a plan JSON file
        plan: PathBuf,
        /// Finished allocation as DAY:INDEX (repeatable, e.g. --done 1:1)
        #[arg(long = "done")]
        done: Vec<DoneMarker>,
        /// Date to count remaining days from (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Execute the `planora init` command: write config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile::default();
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  defaults.plan_length = {}", cfg.defaults.plan_length);
    println!("  defaults.hours_per_day = {}", cfg.defaults.hours_per_day);
    println!("  defaults.exam_type = {}", cfg.defaults.exam_type);
    println!("  defaults.course_type = {}", cfg.defaults.course_type);

    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { force } => cmd_init(force),
        Commands::Topics { source } => plan_cmds::run_topics(&source),
        Commands::Plan {
            source,
            plan_length,
            hours_per_day,
            exam_type,
            review_fraction,
            exam_date,
            course_type,
            weight_by_difficulty,
            output,
        } => {
            let overrides = config::PlanOverrides {
                plan_length,
                hours_per_day,
                exam_type,
                review_day_fraction: review_fraction,
                course_type,
            };
            let settings = plan_cmds::PlanSettings {
                overrides,
                exam_date,
                weight_by_difficulty,
            };
            plan_cmds::run_plan(&source, &settings, &output)
        }
        Commands::Export { plan, output } => export_cmd::run_export(&plan, &output),
        Commands::Reschedule {
            plan,
            done,
            today,
            output,
        } => reschedule_cmd::run_reschedule(&plan, &done, today, output.as_deref()),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "planora", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
