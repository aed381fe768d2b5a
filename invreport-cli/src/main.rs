use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use invreport_core::RELATIVE_MONTHS;
use invreport_ingest::{read_extract, RecordParser};
use invreport_report::{output_file_name, save_csv, Logo, ReportAssembler, XlsxRenderer};
use log::{debug, info};
use std::path::{Path, PathBuf};

mod config;
mod state;

use config::Config;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("INVREPORT_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "invreport",
    version,
    long_version = LONG_VERSION,
    about = "Inventory extract to fiscal-month spreadsheet report"
)]
struct Cli {
    /// Config file (default: invreport.toml next to the executable)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the extract and write the XLSX report
    Run {
        /// Extract file (default: input.raw_file / RAW_FILE)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Sheet name and file prefix (default: report.name / NAME)
        #[arg(long)]
        name: Option<String>,

        /// Report date as M/D/YYYY or MM/DD/YY (default: most recent Sunday)
        #[arg(long)]
        report_date: Option<String>,

        /// Output directory (default: report.output_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also export the report table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show how the report date resolves against the fiscal calendar
    Calendar {
        #[arg(long)]
        report_date: Option<String>,
    },

    /// Print parsed extract records as JSON lines
    Parse {
        #[arg(long)]
        input: Option<PathBuf>,

        /// Max records to print (default: all)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default invreport.toml (never overwrites)
    Init,
    /// Print the effective config after .env / environment overrides
    Show,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base = state::app_dir()?;
    match state::load_dotenv(&base)? {
        Some(p) => info!("loaded .env from {}", p.display()),
        None => debug!("no .env in {}", base.display()),
    }

    let config_path = cli
        .config
        .unwrap_or_else(|| config::default_config_path(&base));
    let mut cfg = config::load_config(&config_path)?;
    cfg.apply_env();

    match cli.command {
        Command::Run {
            input,
            name,
            report_date,
            out_dir,
            csv,
        } => {
            let input = input.unwrap_or_else(|| state::resolve(&base, &cfg.input.raw_file));
            let name = name.unwrap_or_else(|| cfg.report.name.clone());
            let out_dir = out_dir.unwrap_or_else(|| state::resolve(&base, &cfg.report.output_dir));
            run_report(
                &cfg,
                &base,
                &input,
                &name,
                report_date.as_deref(),
                &out_dir,
                csv.as_deref(),
            )?;
        }

        Command::Calendar { report_date } => {
            show_calendar(&cfg, report_date.as_deref())?;
        }

        Command::Parse { input, limit } => {
            let input = input.unwrap_or_else(|| state::resolve(&base, &cfg.input.raw_file));
            let parser = RecordParser::new(cfg.format_descriptor()?);
            let records = read_extract(&input, &parser)?;
            for record in records.iter().take(limit.unwrap_or(usize::MAX)) {
                println!("{}", serde_json::to_string(record)?);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&config_path)?,
            ConfigCommand::Show => {
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn run_report(
    cfg: &Config,
    base: &Path,
    input: &Path,
    name: &str,
    report_date: Option<&str>,
    out_dir: &Path,
    csv: Option<&Path>,
) -> Result<()> {
    // Descriptor problems are fatal before any line is read
    let parser = RecordParser::new(cfg.format_descriptor()?);
    let calendar = cfg.calendar(report_date)?;
    info!("report date {}", calendar.report_date_str());

    if !input.exists() {
        bail!("Data file not found: {} (pass --input <path>)", input.display());
    }
    let records = read_extract(input, &parser)
        .with_context(|| format!("parsing {}", input.display()))?;
    info!("parsed {} records from {}", records.len(), input.display());

    let report = ReportAssembler::new(&calendar)
        .assemble(&records)
        .context("resolving fiscal periods for the report header")?;

    let logos: Vec<Logo> = cfg
        .report
        .logos
        .iter()
        .map(|l| Logo {
            path: state::resolve(base, &l.path),
            ..l.clone()
        })
        .collect();

    let path = out_dir.join(output_file_name(name, &report.report_date));
    XlsxRenderer::new(name).logos(logos).save(&report, &path)?;
    println!("Wrote {} items to {}", report.rows.len(), path.display());

    if let Some(csv_path) = csv {
        save_csv(&report, csv_path)?;
        println!("Wrote {}", csv_path.display());
    }

    Ok(())
}

fn show_calendar(cfg: &Config, report_date: Option<&str>) -> Result<()> {
    let calendar = cfg.calendar(report_date)?;

    println!("Report date:                     {}", calendar.report_date_str());
    println!("First day of fiscal month:       {}", calendar.current_period()?);
    println!("First day of next fiscal month:  {}", calendar.next_period()?);

    let months = calendar.relative_months(RELATIVE_MONTHS)?;
    let labels: Vec<String> = months
        .iter()
        .rev()
        .map(|(offset, label)| format!("{offset}: {label}"))
        .collect();
    println!("Prior fiscal months:             {}", labels.join(", "));

    Ok(())
}
