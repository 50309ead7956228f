//! Watchboard CLI - live dashboard for build and watch workers

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::{Stream, StreamExt};

use watchboard::config::{BuildConfig, ServeConfig};
use watchboard::dashboard::{Dashboard, Painter, SessionMode};
use watchboard::error::{BoardError, FixSuggestion};
use watchboard::event::{spawn_ndjson_reader, EventBus};
use watchboard::install::{CommandInstaller, NoopInstaller, PackageInstaller};
use watchboard::{logging, BoardConfig};

#[derive(Parser)]
#[command(name = "watchboard")]
#[command(about = "Watchboard - live dashboard for build and watch workers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard for a board file
    Run {
        /// Path to the board YAML file
        config: PathBuf,

        /// Newline-delimited JSON event source ('-' for stdin)
        #[arg(short, long, default_value = "-")]
        events: String,

        /// Serve mode on this port (overrides the board file)
        #[arg(long, conflicts_with = "dest")]
        port: Option<u16>,

        /// Build mode into this directory (overrides the board file)
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Do not clear the screen between frames
        #[arg(long)]
        no_clear: bool,

        /// Terminal to read install answers from when events arrive on stdin
        #[arg(long, default_value = "/dev/tty")]
        tty: PathBuf,

        /// Write logs to a file instead of stderr
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Validate a board file
    Validate {
        /// Path to the board YAML file
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            events,
            port,
            dest,
            no_clear,
            tty,
            log_file,
        } => {
            let overrides = ModeOverride { port, dest };
            let options = RunOptions {
                events,
                tty,
                no_clear,
            };
            match logging::init(log_file.as_deref()) {
                Ok(()) => run_board(&config, options, overrides).await,
                Err(e) => Err(e),
            }
        }
        Commands::Validate { config } => validate_board(&config).map(|()| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(suggestion) = e.fix_suggestion() {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
            std::process::exit(1);
        }
    }
}

struct ModeOverride {
    port: Option<u16>,
    dest: Option<PathBuf>,
}

impl ModeOverride {
    fn apply(self, config: &mut BoardConfig) {
        if let Some(port) = self.port {
            let serve = config.serve.get_or_insert(ServeConfig {
                port,
                ips: Vec::new(),
                start_time_ms: 0,
            });
            serve.port = port;
            config.build = None;
        }
        if let Some(dest) = self.dest {
            config.build = Some(BuildConfig { dest });
            config.serve = None;
        }
    }
}

struct RunOptions {
    events: String,
    tty: PathBuf,
    no_clear: bool,
}

/// Lines typed at the install prompt.
type InputLines = Pin<Box<dyn Stream<Item = String>>>;

fn lines_of<R>(reader: R) -> InputLines
where
    R: AsyncRead + Unpin + 'static,
{
    Box::pin(LinesStream::new(BufReader::new(reader).lines()).filter_map(|line| line.ok()))
}

/// Prompt input for a serve session. Stdin, unless it already carries the
/// events; then the controlling terminal.
async fn prompt_input(events_from_stdin: bool, tty: &Path) -> Option<InputLines> {
    if !events_from_stdin {
        return Some(lines_of(tokio::io::stdin()));
    }
    match tokio::fs::File::open(tty).await {
        Ok(file) => Some(lines_of(file)),
        Err(e) => {
            tracing::warn!(
                tty = %tty.display(),
                error = %e,
                "events arrive on stdin and no terminal is available, install prompt disabled"
            );
            None
        }
    }
}

async fn run_board(
    path: &Path,
    options: RunOptions,
    overrides: ModeOverride,
) -> Result<i32, BoardError> {
    let events = options.events.as_str();
    let mut config = BoardConfig::load(path)?;
    overrides.apply(&mut config);
    config.validate()?;

    let session = config.session_info();
    let (bus, rx) = EventBus::new().split();

    let events_from_stdin = events == "-";
    if events_from_stdin {
        spawn_ndjson_reader(tokio::io::stdin(), bus.clone());
    } else {
        let file = tokio::fs::File::open(events)
            .await
            .map_err(|source| BoardError::EventSource {
                path: PathBuf::from(events),
                source,
            })?;
        spawn_ndjson_reader(file, bus.clone());
    }

    let command_installer = config
        .installer
        .as_ref()
        .map(|installer| Arc::new(CommandInstaller::new(installer, &bus)));
    let installer: Arc<dyn PackageInstaller> = match &command_installer {
        Some(installer) => installer.clone(),
        None => Arc::new(NoopInstaller::new()),
    };
    // Only the reader keeps the bus open from here on.
    drop(bus);

    let stdout = std::io::stdout();
    let painter = if options.no_clear {
        Painter::plain(stdout)
    } else {
        Painter::new(stdout)
    };
    let mut dashboard = Dashboard::new(config.workers, session, painter);

    let input = if dashboard.session().mode.is_serve() {
        prompt_input(events_from_stdin, &options.tty).await
    } else {
        None
    };
    let outcome = match input {
        Some(input) => {
            dashboard = dashboard.with_installer(installer);
            dashboard.run(rx, input).await?
        }
        None => dashboard.run(rx, tokio_stream::empty()).await?,
    };

    tracing::info!(?outcome, frames = dashboard.frames(), "dashboard stopped");
    if let Some(installer) = command_installer {
        installer.wait().await;
    }
    Ok(outcome.exit_code())
}

fn validate_board(path: &Path) -> Result<(), BoardError> {
    let config = BoardConfig::load(path)?;
    let session = config.session_info();

    println!("{} Board '{}' is valid", "✓".green(), path.display());
    println!("  Title: {}", session.title);
    let mode = match &session.mode {
        SessionMode::Serve(serve) => format!("serve (port {})", serve.port),
        SessionMode::Build(build) => format!("build (dest {})", build.dest),
        SessionMode::Headless => "none".to_string(),
    };
    println!("  Mode: {}", mode);
    println!("  Workers: {}", config.workers.len());
    for worker in &config.workers {
        let kind = if worker.watch { "watch" } else { "once" };
        println!("    - {} ({})", worker.id, kind);
    }
    println!(
        "  Installer: {}",
        config
            .installer
            .as_ref()
            .map(|i| i.install.join(" "))
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(())
}
