use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use synthetic_focus_group::utils::logging;
use synthetic_focus_group::{App, Config, ExportOptions, RosterOptions};

#[derive(Parser)]
#[command(name = "synthetic-focus-group")]
#[command(about = "Simulate a marketing focus group with synthetic personas", long_about = None)]
struct Cli {
    /// TOML config file (env vars still override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct RosterArgs {
    /// Extra persona file (.json / .toml) or folder, repeatable
    #[arg(long = "persona", value_name = "PATH")]
    persona: Vec<PathBuf>,

    /// Skip the built-in personas
    #[arg(long)]
    no_defaults: bool,
}

impl From<RosterArgs> for RosterOptions {
    fn from(args: RosterArgs) -> Self {
        RosterOptions {
            persona_files: args.persona,
            no_defaults: args.no_defaults,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the local simulation backend
    Serve,
    /// Run a focus group on a campaign pitch
    Simulate {
        /// Pitch text file (defaults to the built-in card pitch)
        #[arg(long)]
        pitch_file: Option<PathBuf>,
        #[command(flatten)]
        roster: RosterArgs,
        /// Save a Word report
        #[arg(long)]
        export: bool,
        /// Save the raw JSON report to this path
        #[arg(long, value_name = "FILE")]
        json_out: Option<PathBuf>,
    },
    /// Compare two ad creatives
    Compare {
        #[arg(long)]
        image_a: PathBuf,
        #[arg(long)]
        image_b: PathBuf,
        #[command(flatten)]
        roster: RosterArgs,
        #[arg(long)]
        export: bool,
        #[arg(long, value_name = "FILE")]
        json_out: Option<PathBuf>,
    },
    /// List the active personas
    Personas {
        #[command(flatten)]
        roster: RosterArgs,
    },
}

async fn run(cli: Cli) -> Result<()> {
    // 加载配置
    let config = Config::load(cli.config.as_deref())?;
    logging::init(cli.verbose || config.verbose_logging);

    let app = App::new(config);
    match cli.command {
        Commands::Serve => app.serve().await?,
        Commands::Simulate {
            pitch_file,
            roster,
            export,
            json_out,
        } => {
            let text = app
                .simulate(
                    pitch_file.as_deref(),
                    &roster.into(),
                    &ExportOptions {
                        docx: export,
                        json_out,
                    },
                )
                .await?;
            println!("{}", text);
        }
        Commands::Compare {
            image_a,
            image_b,
            roster,
            export,
            json_out,
        } => {
            let text = app
                .compare(
                    &image_a,
                    &image_b,
                    &roster.into(),
                    &ExportOptions {
                        docx: export,
                        json_out,
                    },
                )
                .await?;
            println!("{}", text);
        }
        Commands::Personas { roster } => {
            println!("{}", app.list_personas(&roster.into()).await?);
        }
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
