use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ghostwrite::app::App;
use ghostwrite::config::{self, Config};
use ghostwrite::error::GhostwriteError;
use ghostwrite::suggest::{PhrasebookProvider, SuggestionProvider, provider_from_config};

/// Terminal editor with inline ghost-text suggestions
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Terminal editor with inline ghost-text suggestions"
)]
struct Args {
    /// Text file to open (starts with an empty document if not provided)
    input: Option<PathBuf>,

    /// Caret stability required before fetching, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Use the built-in phrasebook instead of the configured provider
    #[arg(long)]
    offline: bool,

    /// Print the document to stdout on exit
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    // Writes to /tmp/ghostwrite-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    init_debug_log();

    color_eyre::install()?;

    // Load config early to avoid defaults during app initialization
    let config_result = config::load_config();

    let args = Args::parse();

    // Read before entering raw mode so errors print normally
    let text = match &args.input {
        Some(path) => read_input(path)?,
        None => String::new(),
    };

    let mut config = config_result.config;
    if let Some(debounce_ms) = args.debounce_ms {
        config.suggest.debounce_ms = debounce_ms;
    }

    let mut app = App::new(&text, &config);
    if let Some(warning) = config_result.warning {
        app.show_warning(warning);
    }

    let (provider, warning) = select_provider(&config, args.offline);
    if let Some(warning) = warning {
        app.show_warning(warning);
    }
    app.connect(provider);

    let terminal = init_terminal()?;
    let result = run(terminal, app);

    restore_terminal()?;
    let app = result?;

    // Output after terminal restore to prevent corruption
    if args.print {
        print!("{}", app.content());
    }

    #[cfg(debug_assertions)]
    log::debug!("=== GHOSTWRITE DEBUG SESSION ENDED ===");

    Ok(())
}

#[cfg(debug_assertions)]
fn init_debug_log() {
    use std::io::Write;

    let Ok(log_file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("/tmp/ghostwrite-debug.log")
    else {
        return;
    };

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format(|buf, record| {
            use std::time::SystemTime;
            let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
            writeln!(
                buf,
                "[{}] [{}] {}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();

    log::debug!("=== GHOSTWRITE DEBUG SESSION STARTED ===");
}

fn read_input(path: &Path) -> Result<String, GhostwriteError> {
    std::fs::read_to_string(path).map_err(|source| GhostwriteError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Pick the configured provider, falling back to the offline phrasebook
///
/// A warning is returned only when a provider was requested but could not be built.
fn select_provider(
    config: &Config,
    offline: bool,
) -> (Arc<dyn SuggestionProvider>, Option<String>) {
    if offline {
        return (Arc::new(PhrasebookProvider::default()), None);
    }

    match provider_from_config(&config.ai) {
        Ok(provider) => (provider, None),
        Err(e) => {
            log::debug!("Falling back to phrasebook: {}", e);
            let warning = config
                .ai
                .enabled
                .then(|| format!("{} Using offline phrasebook.", e));
            (Arc::new(PhrasebookProvider::default()), warning)
        }
    }
}

/// Initialize terminal with raw mode, alternate screen, bracketed paste and focus reporting
fn init_terminal() -> Result<DefaultTerminal> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = execute!(
            stdout(),
            DisableFocusChange,
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
        hook(info);
    }));

    enable_raw_mode()?;

    // If any subsequent operations fail, ensure raw mode is disabled
    if let Err(e) = execute!(
        stdout(),
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableFocusChange
    ) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }

    match ratatui::Terminal::new(ratatui::backend::CrosstermBackend::new(stdout())) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = restore_terminal();
            Err(e.into())
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<()> {
    let _ = execute!(
        stdout(),
        DisableFocusChange,
        DisableBracketedPaste,
        LeaveAlternateScreen
    );
    disable_raw_mode()?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, mut app: App) -> Result<App> {
    loop {
        if app.should_render() {
            terminal.draw(|frame| app.render(frame))?;
            app.clear_dirty();
        }

        app.handle_events()?;

        if app.should_quit() {
            break;
        }
    }

    Ok(app)
}
