//! `simplenote` terminal front end.
//!
//! # Responsibility
//! - Run one notepad event per invocation against the SQLite store.
//! - Refuse to start when persistent storage cannot be opened.

mod cli;
mod render;

use cli::{Cli, Command};
use log::error;
use simplenote_core::{
    default_log_level, init_logging, open_note_store, Confirmation, NotepadConfig,
    NoteStore, NotepadSession, NotepadView, SqliteKvStore,
};
use std::error::Error;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::parse();
    start_logging(&cli);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::from(2);
        }
    };

    if cli.command == Command::Config {
        return match print_config(&cli, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        };
    }

    let store = match open_note_store(&cli.db, &config) {
        Ok(store) => store,
        Err(err) => {
            error!("event=cli_start module=cli status=error error_code=storage_unavailable error={err}");
            eprintln!("Sorry, persistent storage is not available: {err}");
            return ExitCode::from(2);
        }
    };

    match run(&cli, &config, store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging(cli: &Cli) {
    let Some(log_dir) = cli.log_dir.as_ref() else {
        return;
    };
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let absolute = std::path::absolute(log_dir).unwrap_or_else(|_| log_dir.clone());
    if let Err(err) = init_logging(level, &absolute.to_string_lossy()) {
        eprintln!("logging disabled: {err}");
    }
}

fn build_config(cli: &Cli) -> Result<NotepadConfig, String> {
    let mut config = NotepadConfig::default();
    config.apply_overrides(cli.prefix.as_deref(), cli.quota_chars.as_deref())?;
    Ok(config)
}

fn print_config(cli: &Cli, config: &NotepadConfig) -> Result<(), Box<dyn Error>> {
    let rendered = serde_json::json!({
        "db": cli.db,
        "store": config,
    });
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

fn run(
    cli: &Cli,
    config: &NotepadConfig,
    store: NoteStore<SqliteKvStore>,
) -> Result<(), Box<dyn Error>> {
    let (mut session, view) = NotepadSession::open(store)?;

    match &cli.command {
        Command::List => print_sidebar(cli, &view)?,
        Command::Show => print_note(cli, &view)?,
        Command::Add => print_note(cli, &session.add()?)?,
        Command::Edit { text } => {
            let text = match text {
                Some(text) => text.clone(),
                None => read_stdin()?,
            };
            let outcome = session.edit(&text)?;
            if let Some(warning) = &outcome.warning {
                eprintln!("{}", render::warning(warning));
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", render::sidebar(&outcome.view));
            }
        }
        Command::Select { id } => print_note(cli, &session.select(id)?)?,
        Command::Delete => print_sidebar(cli, &session.delete()?)?,
        Command::DeleteAll { yes } => {
            let confirmation = if *yes || confirm("Really delete all notes?")? {
                Confirmation::Confirmed
            } else {
                Confirmation::Declined
            };
            print_sidebar(cli, &session.delete_all(confirmation)?)?;
        }
        Command::Config => print_config(cli, config)?,
    }

    Ok(())
}

fn print_sidebar(cli: &Cli, view: &NotepadView) -> Result<(), Box<dyn Error>> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view.sidebar)?);
    } else {
        println!("{}", render::sidebar(view));
    }
    Ok(())
}

fn print_note(cli: &Cli, view: &NotepadView) -> Result<(), Box<dyn Error>> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        println!("{}", view.editor_text);
    }
    Ok(())
}

fn read_stdin() -> io::Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn confirm(question: &str) -> io::Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
