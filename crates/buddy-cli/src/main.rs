use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use buddy_cli::commands::{
    avail, classmates, confirm, course, profile, propose, sessions, suggest,
};
use buddy_cli::{AvailAction, Cli, Commands, Config, CourseAction, ProfileAction};

/// Load config from the default locations plus an optional explicit file.
fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = io::stdout();
    match &cli.command {
        Some(Commands::Profile { action }) => {
            let config = load_config(&cli)?;
            match action {
                ProfileAction::Create {
                    username,
                    full_name,
                } => profile::create(&mut stdout, &config, username, full_name)?,
                ProfileAction::Show { username } => {
                    profile::show(&mut stdout, &config, username)?;
                }
            }
        }
        Some(Commands::Course { action }) => {
            let config = load_config(&cli)?;
            match action {
                CourseAction::Add { username, course } => {
                    course::add(&mut stdout, &config, username, course)?;
                }
                CourseAction::Remove { username, course } => {
                    course::remove(&mut stdout, &config, username, course)?;
                }
                CourseAction::List { username } => {
                    course::list(&mut stdout, &config, username)?;
                }
            }
        }
        Some(Commands::Avail { action }) => {
            let config = load_config(&cli)?;
            match action {
                AvailAction::Add {
                    username,
                    day,
                    start,
                    end,
                } => avail::add(&mut stdout, &config, username, day, start, end)?,
                AvailAction::Remove { id } => avail::remove(&mut stdout, &config, *id)?,
                AvailAction::List { username } => avail::list(&mut stdout, &config, username)?,
            }
        }
        Some(Commands::Classmates { username, course }) => {
            let config = load_config(&cli)?;
            classmates::run(&mut stdout, &config, username, course)?;
        }
        Some(Commands::Suggest { username, json }) => {
            let config = load_config(&cli)?;
            suggest::run(&mut stdout, &config, username, *json)?;
        }
        Some(Commands::Propose {
            initiator,
            invitee,
            course,
            day,
            start,
            end,
        }) => {
            let config = load_config(&cli)?;
            propose::run(&mut stdout, &config, initiator, invitee, course, day, start, end)?;
        }
        Some(Commands::Confirm {
            session_id,
            username,
        }) => {
            let config = load_config(&cli)?;
            confirm::run(&mut stdout, &config, *session_id, username)?;
        }
        Some(Commands::Sessions {
            username,
            proposed,
            json,
        }) => {
            let config = load_config(&cli)?;
            sessions::run(&mut stdout, &config, username, *proposed, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
