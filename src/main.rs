mod history_cmd;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use shrc::config;
use shrc::config::types::ShrcConfig;
use shrc::init;
use shrc::mkcd;
use shrc::navigate;
use shrc::output;
use shrc::paths;
use shrc::shell::Shell;
use shrc::summary;

#[derive(Parser)]
#[command(
    name = "shrc",
    version,
    about = "Interactive shell companion: eternal history, dot-run cd, mkcd and directory summaries"
)]
struct Cli {
    /// Show config resolution and other details on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Extra configuration file layered over the user config
    #[arg(long, global = true, env = "SHRC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the shell integration snippet (eval it from your rc file)
    Init {
        /// Shell dialect to generate
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Append one command to the eternal history file
    Log {
        /// Process id of the shell (default: parent process)
        #[arg(long)]
        pid: Option<u32>,
        /// The command is a raw `history 1` line; strip its number prefix
        #[arg(long)]
        history_line: bool,
        /// Command text
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// Print the shell-quoted arguments for `builtin cd` (dot-runs expanded)
    CdArgs {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Create a directory ([MODE] DIR) and print the path to enter
    Mkcd {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print a one-screen summary of a directory
    Summary {
        /// Directory to summarise (default: current directory)
        dir: Option<PathBuf>,
    },
    /// Browse the eternal history file
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Inspect or create configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Show the most recent commands, oldest first
    List {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search command text, newest first
    Search {
        /// Substring to look for
        query: String,
        /// Maximum number of results
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
        /// Only commands run from the current directory
        #[arg(long)]
        here: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective merged configuration
    Show {
        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// List configuration layers and whether each exists
    Path,
    /// Write a commented starter file to the user config location
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn load_config(cli: &Cli, verbose: bool) -> anyhow::Result<ShrcConfig> {
    config::load(cli.config.as_deref(), verbose)
}

fn cmd_init(shell: Shell, cfg: &ShrcConfig) -> anyhow::Result<i32> {
    let exe = std::env::current_exe()?;
    print!("{}", init::render(shell, cfg, &exe));
    Ok(0)
}

fn cmd_cd_args(args: &[String], verbose: bool) -> i32 {
    if verbose {
        eprintln!("[shrc] cd plan: {:?}", navigate::plan(args));
    }
    println!("{}", navigate::render_cd_args(args));
    0
}

fn cmd_mkcd(args: &[String], cfg: &ShrcConfig) -> i32 {
    let request = match mkcd::parse_args(args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("[shrc] mkcd: {e:#}");
            return 2;
        }
    };
    let fallback = mkcd::fallback_location(cfg.navigator.mkcd_fallback.as_deref());
    let outcome = mkcd::make_dir(&request, &fallback);
    match &outcome {
        mkcd::MkcdOutcome::Existing(dir) => {
            eprintln!("[shrc] mkcd: {} already exists", dir.display());
        }
        mkcd::MkcdOutcome::Created(_) => {}
        mkcd::MkcdOutcome::Fallback { target, error } => {
            eprintln!("[shrc] mkcd: {error:#}");
            eprintln!("[shrc] mkcd: going to {} instead", target.display());
        }
    }
    println!("{}", outcome.target().display());
    i32::from(!outcome.is_success())
}

fn cmd_summary(dir: Option<&Path>, cfg: &ShrcConfig, verbose: bool) -> anyhow::Result<i32> {
    summary::run(dir, &cfg.summary, verbose)?;
    Ok(0)
}

fn cmd_config_show(cfg: &ShrcConfig, json: bool) -> anyhow::Result<i32> {
    if json {
        output::print_json(cfg);
    } else {
        print!("{}", toml::to_string_pretty(cfg)?);
    }
    Ok(0)
}

fn cmd_config_path(explicit: Option<&Path>) -> i32 {
    let layers = config::layer_paths(explicit);
    if layers.is_empty() {
        eprintln!("[shrc] no configuration layers (cannot determine config directory)");
        return 1;
    }
    for (kind, path) in layers {
        let state = if path.exists() { "exists" } else { "missing" };
        println!("{}\t{}\t{state}", kind.label(), path.display());
    }
    0
}

fn cmd_config_init(force: bool) -> anyhow::Result<i32> {
    let path = paths::user_config_file()
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
    if path.exists() && !force {
        eprintln!(
            "[shrc] {} already exists (use --force to overwrite)",
            path.display()
        );
        return Ok(1);
    }
    shrc::fs::write_config_file(&path, config::STARTER_CONFIG)?;
    eprintln!("[shrc] wrote {}", path.display());
    Ok(0)
}

fn or_report(result: anyhow::Result<i32>) -> i32 {
    result.unwrap_or_else(|e| {
        eprintln!("[shrc] error: {e:#}");
        1
    })
}

/// Load config, or report the failure and exit 1.
fn with_config(cli: &Cli, verbose: bool, run: impl FnOnce(&ShrcConfig) -> i32) -> i32 {
    match load_config(cli, verbose) {
        Ok(cfg) => run(&cfg),
        Err(e) => {
            eprintln!("[shrc] error: {e:#}");
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose || output::env_verbose();

    let exit_code = match &cli.command {
        Commands::CdArgs { args } => cmd_cd_args(args, verbose),
        Commands::Log {
            pid,
            history_line,
            command,
        } => {
            // A broken config must not stop history from being written.
            let cfg = load_config(&cli, verbose).unwrap_or_else(|e| {
                eprintln!("[shrc] config error, using defaults: {e:#}");
                ShrcConfig::default()
            });
            history_cmd::cmd_log(&cfg, *pid, *history_line, command, verbose)
        }
        Commands::Init { shell } => with_config(&cli, verbose, |cfg| or_report(cmd_init(*shell, cfg))),
        Commands::Mkcd { args } => with_config(&cli, verbose, |cfg| cmd_mkcd(args, cfg)),
        Commands::Summary { dir } => with_config(&cli, verbose, |cfg| {
            or_report(cmd_summary(dir.as_deref(), cfg, verbose))
        }),
        Commands::History { action } => with_config(&cli, verbose, |cfg| match action {
            HistoryAction::List { limit, json } => {
                history_cmd::cmd_history_list(cfg, *limit, *json)
            }
            HistoryAction::Search {
                query,
                limit,
                here,
                json,
            } => history_cmd::cmd_history_search(cfg, query, *limit, *here, *json),
        }),
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                with_config(&cli, verbose, |cfg| or_report(cmd_config_show(cfg, *json)))
            }
            ConfigAction::Path => cmd_config_path(cli.config.as_deref()),
            ConfigAction::Init { force } => or_report(cmd_config_init(*force)),
        },
    };
    std::process::exit(exit_code);
}
