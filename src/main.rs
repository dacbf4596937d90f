//! Main entry point for inkname

use std::{
    io::{self, Stdout},
    panic,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::task::JoinHandle;

use inkname::{
    clipboard::{copy_signature, SystemClipboard},
    config::{Config, StylePreferences},
    document::Document,
    export::ImageExporter,
    fonts::FontBook,
    input::handle_event,
    logging::{init_logging, LogTarget},
    persistence::{
        DisabledSink, IdentityProvider, PersistenceClient, SessionIdentity, SignatureRecord,
        SignatureSink, UserId,
    },
    state::{AppState, Services},
    style::{GeneratedSignature, StyleState},
    terminal_capabilities::detect_color_support,
    ui,
    worker::{spawn_workers, WorkerHandle},
};

/// Target frame time for 60 FPS
const FRAME_TIME_MS: u64 = 16;

const LOG_FILE: &str = "inkname.log";

/// How long in-flight saves may run once the user is done
const SAVE_GRACE: Duration = Duration::from_secs(3);

/// inkname - Terminal signature studio
#[derive(Parser, Debug)]
#[command(name = "inkname")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Runs the interactive studio when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a signature and write it as a PNG
    Export(ExportArgs),

    /// Generate a signature and copy it to the clipboard
    Copy(StyleArgs),

    /// List the signatures saved for a user
    History {
        /// Defaults to the signed-in user
        #[arg(long)]
        user_id: Option<i64>,
    },
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Name to sign
    #[arg(short, long)]
    name: String,

    /// CSS font family list, e.g. "Pacifico, cursive"
    #[arg(short, long)]
    font: Option<String>,

    /// CSS color, e.g. "#1e90ff" or "navy"
    #[arg(short, long)]
    color: Option<String>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    style: StyleArgs,

    /// Directory to write into; defaults to the download directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: {:#}; using defaults", e);
        Config::default()
    });

    match cli.command {
        None => run_tui(config),
        Some(command) => {
            if let Err(e) = init_logging(&config.logging, LogTarget::Stderr) {
                eprintln!("Warning: {:#}", e);
            }
            match command {
                Commands::Export(args) => run_export(&config, args),
                Commands::Copy(args) => run_copy(&config, args),
                Commands::History { user_id } => run_history(&config, user_id),
            }
        }
    }
}

fn run_tui(config: Config) -> Result<()> {
    let log_path = Config::config_dir().join(LOG_FILE);
    if let Err(e) = init_logging(&config.logging, LogTarget::File(log_path)) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
        original_hook(panic_info);
    }));

    let color_support = detect_color_support();

    let exporter = ImageExporter::new(FontBook::system(), config.export.download_dir());
    let workers = spawn_workers(exporter).context("Failed to start render workers")?;

    let client = connect_backend(&config).map(Arc::new);
    let sink: Arc<dyn SignatureSink> = match &client {
        Some(client) => Arc::clone(client) as Arc<dyn SignatureSink>,
        None => Arc::new(DisabledSink),
    };

    let services = Services {
        sink,
        identity: Arc::new(SessionIdentity::from_session(&config.session)),
        clipboard: Box::new(SystemClipboard::new()),
        worker_tx: workers.request_tx.clone(),
    };
    let mut app_state = AppState::new(config, color_support, services);

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app_state, &workers);
    cleanup_terminal(terminal)?;

    // Remember the last used style for the next session
    let style = StylePreferences {
        default_font: app_state.style.font().to_string(),
        default_color: app_state.style.color().to_string(),
    };
    if let Err(e) = Config::remember_style(style) {
        warn!("Last used style not saved: {:#}", e);
        eprintln!("Warning: Failed to save config: {:#}", e);
    }

    drop(app_state);
    workers.shutdown();

    if let Some(client) = client {
        match Arc::try_unwrap(client) {
            Ok(client) => client.shutdown(SAVE_GRACE),
            Err(_) => warn!("Persistence client still shared at exit"),
        }
    }

    result
}

/// Set up the terminal for TUI rendering
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn cleanup_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main event loop - handles input, processes worker messages, renders UI
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app_state: &mut AppState,
    workers: &WorkerHandle,
) -> Result<()> {
    let frame_duration = Duration::from_millis(FRAME_TIME_MS);

    loop {
        let frame_start = Instant::now();

        terminal.draw(|frame| ui::render(frame, app_state))?;

        let timeout = frame_duration.saturating_sub(frame_start.elapsed());
        if event::poll(timeout)? {
            handle_event(event::read()?, app_state)?;
        }

        // Process worker responses (non-blocking)
        while let Ok(response) = workers.response_rx.try_recv() {
            app_state.handle_worker_response(response);
        }

        if app_state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Build the backend client, or `None` when persistence is off or broken
fn connect_backend(config: &Config) -> Option<PersistenceClient> {
    if !config.persistence.enabled {
        info!("Signature persistence disabled in config");
        return None;
    }
    match PersistenceClient::new(&config.persistence) {
        Ok(client) => Some(client),
        Err(e) => {
            error!("Persistence unavailable: {}", e);
            None
        }
    }
}

/// Validate the name and fire the style save, as the studio does on generate
fn generate_headless(
    config: &Config,
    args: &StyleArgs,
) -> Result<(GeneratedSignature, Option<PendingSave>)> {
    let style = StyleState::new(
        args.font
            .clone()
            .unwrap_or_else(|| config.style.default_font.clone()),
        args.color
            .clone()
            .unwrap_or_else(|| config.style.default_color.clone()),
    );
    let signature = GeneratedSignature::from_input(&args.name, &style)?;

    let identity = SessionIdentity::from_session(&config.session);
    let pending = match identity.current_user_id() {
        None => {
            warn!("No signed-in user; signature style not saved");
            None
        }
        Some(user_id) => connect_backend(config).map(|client| {
            let handle = client.spawn_save(SignatureRecord::new(user_id, &style));
            PendingSave { client, handle }
        }),
    };

    Ok((signature, pending))
}

/// A detached save that should get a chance to finish before exit
struct PendingSave {
    client: PersistenceClient,
    handle: JoinHandle<()>,
}

impl PendingSave {
    fn settle(self) {
        self.client.wait(self.handle, SAVE_GRACE);
        self.client.shutdown(Duration::ZERO);
    }
}

fn run_export(config: &Config, args: ExportArgs) -> Result<()> {
    let (signature, pending) = generate_headless(config, &args.style)?;

    let directory = args
        .output
        .unwrap_or_else(|| config.export.download_dir());
    let exporter = ImageExporter::new(FontBook::system(), directory);

    let start = Instant::now();
    let result = exporter.export(Some(&signature));
    if let Some(pending) = pending {
        pending.settle();
    }

    match result? {
        Some(path) => println!(
            "Saved {} ({}ms)",
            path.display(),
            start.elapsed().as_millis()
        ),
        None => bail!("Nothing to export"),
    }
    Ok(())
}

fn run_copy(config: &Config, args: StyleArgs) -> Result<()> {
    let (signature, pending) = generate_headless(config, &args)?;

    let mut document = Document::new();
    let mut clipboard = SystemClipboard::new();
    let result = copy_signature(&mut document, &mut clipboard, Some(&signature));
    if let Some(pending) = pending {
        pending.settle();
    }

    match result {
        Ok(Some(method)) => {
            info!("Signature copied via {:?}", method);
            println!("Signature copied to clipboard!");
            Ok(())
        }
        Ok(None) => bail!("Nothing to copy"),
        Err(e) => Err(e).context("Failed to copy signature"),
    }
}

fn run_history(config: &Config, user_id: Option<i64>) -> Result<()> {
    let user_id = match user_id.map(UserId) {
        Some(id) => id,
        None => SessionIdentity::from_session(&config.session)
            .current_user_id()
            .context("No user id: pass --user-id or set INKNAME_USER_ID")?,
    };

    let client = PersistenceClient::new(&config.persistence)?;
    let saved = client.fetch_history(user_id)?;
    client.shutdown(Duration::ZERO);

    if saved.is_empty() {
        println!("No saved signatures for user {}", user_id.0);
        return Ok(());
    }
    for signature in saved {
        println!(
            "{:>6}  {}  {}  {}",
            signature.id, signature.created_at, signature.color, signature.font_style
        );
    }
    Ok(())
}
