// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mariage command-line client
//!
//! Drives the session core against a running backend. The access token is
//! persisted in a file between invocations; the refresh cookie lives only
//! for the duration of one process.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mariage_client::{
    config::Config,
    format::{format_couple_names, format_wedding_date},
    models::{NewWedding, WeddingId},
    routes::{Navigation, Route, Screen},
    services::{accept_from_link, LinkOutcome, WeddingSelection},
    store::FileTokenStore,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mariage", version, about = "Wedding planning session client")]
struct Cli {
    /// Backend base URL (overrides MARIAGE_API_URL)
    #[arg(long, env = "MARIAGE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Confirm a new account with the emailed code
    VerifyEmail {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Accept the terms of use
        #[arg(long)]
        consent: bool,
    },
    /// End the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List accessible weddings
    Weddings,
    /// Accept an invitation by token
    AcceptInvitation {
        #[arg(long)]
        token: String,
    },
    /// Create a wedding and select it
    CreateWedding {
        #[arg(long)]
        bride: String,
        #[arg(long)]
        groom: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_base_url(url);
    }
    tracing::debug!(api = %config.api_base_url, "Starting client");

    let tokens = Arc::new(FileTokenStore::new(config.token_file.clone()));
    let state = AppState::new(config, tokens).context("Failed to initialize client")?;

    run(&state, cli.command).await
}

async fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            state.auth.login(&email, &password).await?;
            show(state.router.render().await?);
        }
        Command::VerifyEmail { email, code } => {
            state.auth.verify_email(&email, &code).await?;
            show(state.router.render().await?);
        }
        Command::Register {
            name,
            email,
            password,
            consent,
        } => {
            state.auth.register(&name, &email, &password, consent).await?;
            println!("Account created. Check {} for a verification code.", email);
        }
        Command::Logout => {
            state.auth.logout().await;
            println!("Logged out.");
        }
        Command::Whoami => match state.auth.display_name().await? {
            Some(name) => println!("Signed in as {}", name),
            None => println!("Not signed in."),
        },
        Command::Weddings => {
            show(state.router.visit(Navigation::push(Route::SelectWedding)).await?);
        }
        Command::AcceptInvitation { token } => {
            let screen = state
                .router
                .visit(Navigation::push(Route::AcceptInvitation {
                    token: Some(token.clone()),
                }))
                .await?;
            let Some(weddings) = screen.weddings else {
                println!("Please log in first.");
                return Ok(());
            };

            match accept_from_link(&state.api, &weddings, Some(&token)).await {
                LinkOutcome::Accepted { message, wedding_id } => {
                    println!("{}", message);
                    if let Some(id) = wedding_id {
                        describe_selected(&weddings, &id);
                    }
                }
                LinkOutcome::Failed { message } => anyhow::bail!(message),
            }
        }
        Command::CreateWedding { bride, groom, date } => {
            let screen = state
                .router
                .visit(Navigation::push(Route::CreateWedding))
                .await?;
            let Some(weddings) = screen.weddings else {
                println!("Please log in first.");
                return Ok(());
            };

            let wedding = NewWedding {
                bride_name: bride,
                groom_name: groom,
                wedding_date: date,
                ..Default::default()
            };
            match weddings.create(&wedding).await? {
                Some(created) => println!(
                    "Created {}",
                    format_couple_names(&created.bride_name, &created.groom_name)
                ),
                None => println!("Wedding created."),
            }
        }
    }

    Ok(())
}

fn show(screen: Screen) {
    match screen.route() {
        Route::Login => println!("Please log in."),
        Route::PendingInvitations => {
            println!("You have pending invitations:");
            for invitation in screen.invitations().unwrap_or_default() {
                println!(
                    "  {} ({}, {}) token={}",
                    format_couple_names(&invitation.bride_name, &invitation.groom_name),
                    invitation.relationship,
                    invitation.permission_level.label(),
                    invitation.invitation_token
                );
            }
        }
        Route::SelectWedding => {
            let weddings = screen
                .weddings
                .as_ref()
                .map(|weddings| weddings.weddings())
                .unwrap_or_default();
            if weddings.is_empty() {
                println!("No weddings yet.");
            }
            for wedding in weddings {
                println!(
                    "  [{}] {} - {} ({})",
                    wedding.wedding_id,
                    format_couple_names(&wedding.bride_name, &wedding.groom_name),
                    format_wedding_date(wedding.wedding_date.as_deref()),
                    wedding.permission_level.label()
                );
            }
        }
        other => println!("{}", other.path()),
    }
}

fn describe_selected(weddings: &WeddingSelection, id: &WeddingId) {
    if let Some(wedding) = weddings.select_by_id(id) {
        println!(
            "Joined {} ({})",
            format_couple_names(&wedding.bride_name, &wedding.groom_name),
            wedding.permission_level.label()
        );
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mariage_client=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
