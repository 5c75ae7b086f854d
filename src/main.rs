//! helpdesk-tui - a terminal client for the helpdesk ticketing service.
//!
//! Customers open tickets and follow them, agents work the queue, and admins
//! assign tickets and manage users, all from the terminal.

mod api;
mod app;
mod cli;
mod config;
mod error;
mod events;
mod logging;
mod routing;
mod session;
mod store;
mod tasks;
mod ui;

use std::io::{self, Stdout};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

use crate::api::HelpdeskClient;
use crate::app::App;
use crate::cli::{Cli, Command};
use crate::config::{Config, SessionStorage};
use crate::error::AppError;
use crate::events::EventHandler;
use crate::session::{FileSessionStore, KeyringSessionStore, SessionContext, SessionStore};
use crate::tasks::{create_task_channel, TaskResult, TaskSpawner};

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.debug) {
        eprintln!("Warning: logging is disabled: {e:#}");
    }

    let result = run(cli);
    if let Err(e) = &result {
        error!("Exiting with error: {e:#}");
        if let Some(dir) = logging::log_directory() {
            eprintln!("Logs are in {}", dir.display());
        }
    }
    logging::shutdown();
    result
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    match cli.command {
        Some(Command::ConfigPath) => {
            println!("{}", config_path.display());
            return Ok(());
        }
        Some(Command::InitConfig) => {
            if config_path.exists() {
                println!("Config already exists at {}", config_path.display());
            } else {
                match &cli.config {
                    Some(path) => Config::default().save_to(path)?,
                    None => Config::default().save()?,
                }
                println!("Wrote {}", config_path.display());
            }
            return Ok(());
        }
        _ => {}
    }

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = loaded.with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(server) = cli.server {
        config.settings.base_url = server;
        config.settings.validate()?;
    }

    let session = SessionContext::initialize(session_store(config.settings.session_storage)?);

    match cli.command {
        Some(Command::Logout) => {
            let mut session = session;
            if !session.is_authenticated() {
                println!("Not signed in");
                return Ok(());
            }
            session.logout()?;
            println!("Signed out");
            Ok(())
        }
        Some(Command::Whoami) => {
            match session.user() {
                Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
                None => println!("Not signed in"),
            }
            Ok(())
        }
        Some(Command::ConfigPath | Command::InitConfig) => Ok(()),
        None => {
            let client = HelpdeskClient::new(
                &config.settings.base_url,
                session.token_handle(),
                config.settings.request_timeout(),
            )?;
            info!(base_url = client.base_url(), "Starting terminal client");

            let mut app = App::new(session);
            app.open_path(cli.open.as_deref().unwrap_or("/dashboard"));

            let (rx, spawner) = create_task_channel();
            let events = EventHandler::with_tick_rate(config.settings.tick_rate());

            install_panic_hook();
            let mut terminal = setup_terminal()?;
            let result = event_loop(&mut terminal, &mut app, &client, rx, &spawner, &events);
            restore_terminal(&mut terminal)?;
            result
        }
    }
}

fn session_store(kind: SessionStorage) -> Result<Box<dyn SessionStore>, AppError> {
    Ok(match kind {
        SessionStorage::File => Box::new(FileSessionStore::new()?),
        SessionStorage::Keyring => Box::new(KeyringSessionStore::new()),
    })
}

/// Draw, wait for one event, then fold in any finished background work.
fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    client: &HelpdeskClient,
    mut rx: UnboundedReceiver<TaskResult>,
    spawner: &TaskSpawner,
    events: &EventHandler,
) -> anyhow::Result<()> {
    loop {
        let generation = app.session_generation();
        for operation in app.take_operations() {
            spawner.spawn(client, generation, operation);
        }

        terminal.draw(|frame| app.view(frame))?;

        let event = events
            .next()
            .map_err(|e| AppError::terminal(e.to_string()))?;
        app.update(event);

        while let Ok(result) = rx.try_recv() {
            app.handle_task_result(result);
        }

        if app.should_quit() {
            info!("Quit requested");
            return Ok(());
        }
    }
}

fn setup_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leave raw mode before the default hook prints the panic message.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}
