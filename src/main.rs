//! Holocron - browse the Star Wars API from your terminal
//!
//! A terminal UI application that lists people, films, planets, species,
//! starships and vehicles, with search and a detail view per item.

use std::io::{self, Write};
use std::panic;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use holocron::app::App;
use holocron::cli::{Cli, StartupConfig};
use holocron::directory::load_items;
use holocron::listing::ListView;
use holocron::swapi::SwapiClient;
use holocron::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Loads the configured collection and prints it, one summary per line
async fn run_print(config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cache = config.cache_manager();
    let client = SwapiClient::new();
    let items = load_items(&client, cache.as_ref(), &config.api_base, config.endpoint).await?;

    let mut view = ListView::new(config.endpoint);
    view.set_items(items);
    view.apply_filter(&config.query);

    let mut stdout = io::stdout().lock();
    for line in view.plain_lines() {
        writeln!(stdout, "{}", ui::text::sanitize(&line))?;
    }
    Ok(())
}

/// Runs the interactive terminal UI until the user quits
async fn run_tui(config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    app.load_current();

    // Main event loop
    let result = loop {
        app.drain_messages();
        app.tick(Instant::now());

        match terminal.draw(|f| ui::draw(f, &app)) {
            Ok(completed) => app.set_viewport(completed.area),
            Err(e) => break Err(e),
        }

        // Poll for keyboard events with a short timeout so background results show up promptly
        match event::poll(Duration::from_millis(50)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Ok(_) => {}
                Err(e) => break Err(e),
            },
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        // Check if we should quit
        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(result?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let _log_guard = config.log_path().and_then(|path| match logging::init(&path) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    });
    info!(endpoint = %config.endpoint, api_base = %config.api_base, "Starting holocron");

    if config.clear_cache {
        if let Some(cache) = config.cache_manager() {
            match cache.clear() {
                Ok(count) => info!(count, "Cleared cache"),
                Err(e) => warn!(error = %e, "Could not clear cache"),
            }
        }
    }

    let result = if config.print_only {
        run_print(&config).await
    } else {
        run_tui(&config).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
