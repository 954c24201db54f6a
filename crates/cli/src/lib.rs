pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use octopilot_core::config::{ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};

use crate::commands::render::Report;

#[derive(Debug, Parser)]
#[command(
    name = "octopilot",
    about = "Octopilot deployment dashboard CLI",
    long_about = "Render Octopus Deploy dashboard snapshots as Markdown tables and inspect the effective configuration.",
    after_help = "Examples:\n  octopilot space --request space.json\n  octopilot runbook --request runs.json --now 2024-05-01T12:00:00Z\n  octopilot --config deploy.toml --space-name Platform projects --request space.json\n  octopilot config"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Settings that win over the config file and `OCTOPILOT_*` variables.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    #[arg(long, global = true, help = "Config file to load; it must exist")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Octopus server URL used in deployment links")]
    pub octopus_url: Option<String>,
    #[arg(long, global = true, help = "Space id used in deployment links, e.g. Spaces-1")]
    pub space_id: Option<String>,
    #[arg(long, global = true, help = "Space name shown in report titles")]
    pub space_name: Option<String>,
    #[arg(long, global = true, help = "Log level: trace|debug|info|warn|error")]
    pub log_level: Option<String>,
    #[arg(long, global = true, help = "Log format: compact|pretty|json")]
    pub log_format: Option<LogFormat>,
}

impl GlobalArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                octopus_url: self.octopus_url.clone(),
                space_id: self.space_id.clone(),
                space_name: self.space_name.clone(),
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Render every project group of the space with its latest deployments")]
    Space(RenderArgs),
    #[command(about = "Render the release progression of one project")]
    Project(RenderArgs),
    #[command(about = "Render the latest deployment per tenant and environment of one project")]
    Tenants(RenderArgs),
    #[command(about = "Render the run history of one runbook")]
    Runbook(RenderArgs),
    #[command(about = "List the project names of the space as a short reply")]
    Projects(RequestArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[arg(long, help = "JSON file holding the dashboard snapshot and optional enrichment")]
    request: PathBuf,
    #[arg(long, help = "RFC 3339 instant ages are measured from (defaults to the current time)")]
    now: Option<String>,
}

#[derive(Debug, Args)]
struct RequestArgs {
    #[arg(long, help = "JSON file holding the dashboard snapshot")]
    request: PathBuf,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let load = cli.global.load_options();

    let result = match cli.command {
        Command::Space(args) => render(Report::Space, load, &args),
        Command::Project(args) => render(Report::Project, load, &args),
        Command::Tenants(args) => render(Report::Tenants, load, &args),
        Command::Runbook(args) => render(Report::Runbook, load, &args),
        Command::Projects(args) => {
            commands::render::run(Report::Projects, load, &args.request, None)
        }
        Command::Config => commands::config::run(load),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn render(report: Report, load: LoadOptions, args: &RenderArgs) -> commands::CommandResult {
    commands::render::run(report, load, &args.request, args.now.as_deref())
}

/// Installs the global subscriber. Output goes to stderr so stdout carries only
/// the rendered Markdown or the JSON outcome.
pub fn init_logging(logging: &LoggingConfig) {
    use tracing::Level;

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    // A second call in the same process keeps the first subscriber.
    let _ = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
