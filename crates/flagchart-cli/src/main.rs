//! flagchart CLI - Milestone timeline layout
//!
//! Reads a workbook of task and milestone records (as JSON) and writes the
//! chart specification a plotting frontend needs to draw the timeline.

mod output;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flagchart_core::{ChartConfig, ChartRenderer, FontStyle, Workbook};
use flagchart_layout::{analyze, schema, RenderOutcome, Session};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use output::JsonRenderer;

#[derive(Parser)]
#[command(name = "flagchart")]
#[command(author, version, about = "Milestone timeline layout engine", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a workbook and emit the chart specification as JSON
    Render {
        /// Workbook JSON file with `tasks` and `milestones` sheets
        #[arg(value_name = "WORKBOOK")]
        file: PathBuf,

        /// TOML file with chart parameters
        #[arg(short, long, env = "FLAGCHART_CONFIG")]
        config: Option<PathBuf>,

        #[command(flatten)]
        params: ChartParams,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// List milestone labels, one per line
    Labels {
        #[arg(value_name = "WORKBOOK")]
        file: PathBuf,
    },

    /// Validate a workbook and summarize its contents
    Check {
        #[arg(value_name = "WORKBOOK")]
        file: PathBuf,
    },
}

/// Command-line overrides for chart parameters
#[derive(clap::Args, Debug, Default)]
struct ChartParams {
    /// Figure height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Figure width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Days to shift flag markers right of their poles
    #[arg(long, allow_hyphen_values = true)]
    tick_offset: Option<i64>,

    /// Fraction of the figure where the milestone lane starts
    #[arg(long)]
    split: Option<f64>,

    /// Task bar width
    #[arg(long)]
    arrow: Option<f64>,

    /// Font family: Arial, Courier New or Times New Roman
    #[arg(long)]
    font: Option<FontStyle>,

    #[arg(long)]
    font_size: Option<u32>,

    /// Label of the flag to move
    #[arg(long)]
    flag: Option<String>,

    /// New height for the selected flag
    #[arg(long, requires = "flag", allow_hyphen_values = true)]
    flag_position: Option<f64>,
}

impl ChartParams {
    fn apply(self, mut config: ChartConfig) -> ChartConfig {
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(days) = self.tick_offset {
            config.tick_offset_days = days;
        }
        if let Some(split) = self.split {
            config.split_ratio = split;
        }
        if let Some(arrow) = self.arrow {
            config.arrow_width = arrow;
        }
        if let Some(font) = self.font {
            config.font_style = font;
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if self.flag.is_some() {
            config.selected_flag_label = self.flag;
            config.selected_flag_position = self.flag_position;
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render {
            file,
            config,
            params,
            output,
            compact,
        } => {
            let config = params.apply(load_config(config.as_deref())?);
            // Fail on bad parameters before reading the workbook
            config.validate()?;
            let session = Session::new();
            session.load(read_workbook(&file)?);

            let spec = match session.render(&config)? {
                RenderOutcome::Rendered(spec) => spec,
                RenderOutcome::NoInputYet => anyhow::bail!("no workbook loaded"),
            };
            let json = JsonRenderer::new().compact(compact).render(&spec)?;
            match output {
                Some(path) => {
                    fs::write(&path, json + "\n")
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "wrote chart specification");
                }
                None => println!("{}", json),
            }
        }
        Commands::Labels { file } => {
            let session = Session::new();
            session.load(read_workbook(&file)?);
            for label in session.milestone_labels()? {
                println!("{}", label);
            }
        }
        Commands::Check { file } => {
            let workbook = read_workbook(&file)?;
            schema::validate(&workbook.tasks, &workbook.milestones)?;
            let tasks = schema::parse_tasks(&workbook.tasks)?;
            let milestones = schema::parse_milestones(&workbook.milestones)?;
            let range = analyze(&tasks)?;

            println!("{}: OK", file.display());
            println!("  tasks:      {}", tasks.len());
            println!("  milestones: {}", milestones.len());
            println!(
                "  span:       {} to {} ({} months)",
                range.min_start, range.max_finish, range.span_months
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    let Some(path) = path else {
        return Ok(ChartConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ChartConfig = toml::from_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), "loaded chart config");
    Ok(config)
}

/// Read a workbook, naming it after its file if it carries no name
fn read_workbook(path: &Path) -> Result<Workbook> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read workbook {}", path.display()))?;
    let mut workbook: Workbook = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a workbook", path.display()))?;
    if workbook.name.is_none() {
        workbook.name = path.file_name().map(|name| name.to_string_lossy().into_owned());
    }
    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_override_config() {
        let params = ChartParams {
            height: Some(400),
            tick_offset: Some(-4),
            font: Some(FontStyle::TimesNewRoman),
            flag: Some("Go live".into()),
            flag_position: Some(1.5),
            ..ChartParams::default()
        };
        let config = params.apply(ChartConfig::default().width(1200));
        assert_eq!(config.height, 400);
        assert_eq!(config.width, 1200);
        assert_eq!(config.tick_offset_days, -4);
        assert_eq!(config.font_style, FontStyle::TimesNewRoman);
        assert_eq!(config.selected_flag_label.as_deref(), Some("Go live"));
        assert_eq!(config.selected_flag_position, Some(1.5));
    }

    #[test]
    fn empty_params_keep_config() {
        let base = ChartConfig::default().select_flag("Kickoff", 0.9);
        assert_eq!(ChartParams::default().apply(base.clone()), base);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
