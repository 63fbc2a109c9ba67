// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CV Portal client
//!
//! Drives the portal pages from the terminal: each subcommand loads one page,
//! feeds it the user's action and renders the result to stdout.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cv_portal::config::{ClientConfig, LogFormat};
use cv_portal::models::{Role, SelectedFile, PDF_MIME};
use cv_portal::pages::{
    self, AuthEvent, AuthPage, Credentials, DashboardPage, PageEvent, PageExit, PageKind,
    ProfilePage, Session,
};
use cv_portal::services::BackendClient;
use cv_portal::ui::ConsoleView;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CV Portal - AI-assisted CV profiles for job seekers and recruiters
#[derive(Parser)]
#[command(name = "cv-portal", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CV_PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
        /// jobseeker or recruiter
        #[arg(long, default_value = "jobseeker")]
        role: Role,
    },

    /// Sign in and open the dashboard
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CV_PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the dashboard, optionally uploading a CV for analysis
    Dashboard {
        /// CV to analyze (PDF)
        #[arg(long)]
        cv: Option<PathBuf>,
    },

    /// Show the profile built from the last analyzed CV
    Profile,

    /// Sign out
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.log_format);

    match run(cli, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run one page. Returns false if the page could not start.
async fn run(cli: Cli, config: ClientConfig) -> Result<bool> {
    let backend = BackendClient::from_config(&config);
    let mut view = ConsoleView::stdout();

    let kind = match &cli.command {
        Commands::Register { .. } | Commands::Login { .. } => PageKind::Auth,
        Commands::Dashboard { .. } | Commands::Logout => PageKind::Dashboard,
        Commands::Profile => PageKind::Profile,
    };

    let connect_config = config.clone();
    let Some(session) = pages::start(kind, &mut view, backend, move |remote| {
        pages::connect_firebase(remote, connect_config)
    })
    .await
    else {
        return Ok(false);
    };

    match cli.command {
        Commands::Register {
            email,
            password,
            role,
        } => {
            let mut page = AuthPage::new(session, view);
            page.handle(AuthEvent::ToggleMode).await;
            page.handle(AuthEvent::SelectRole(role)).await;
            page.handle(AuthEvent::Submit(Credentials::new(email, password)))
                .await;
        }
        Commands::Login { email, password } => {
            let mut page = AuthPage::new(session.clone(), view);
            let exit = page
                .handle(AuthEvent::Submit(Credentials::new(email, password)))
                .await;
            if exit == Some(PageExit::Navigated(cv_portal::ui::Route::Dashboard)) {
                run_dashboard(session, Vec::new()).await;
            }
        }
        Commands::Dashboard { cv } => {
            let events = match cv {
                Some(path) => vec![PageEvent::CvSelected(vec![read_selected_file(&path)?])],
                None => Vec::new(),
            };
            run_dashboard(session, events).await;
        }
        Commands::Profile => {
            let (_, events) = mpsc::channel(1);
            let exit = ProfilePage::new(session, ConsoleView::stdout())
                .run(events)
                .await;
            tracing::debug!(?exit, "Profile page finished");
        }
        Commands::Logout => run_dashboard(session, vec![PageEvent::Logout]).await,
    }

    Ok(true)
}

/// Run the dashboard with `events` queued, until they are consumed.
async fn run_dashboard(session: Session, events: Vec<PageEvent>) {
    let (tx, rx) = mpsc::channel(events.len().max(1));
    for event in events {
        if tx.send(event).await.is_err() {
            break;
        }
    }
    drop(tx);

    let exit = DashboardPage::new(session, ConsoleView::stdout())
        .run(rx)
        .await;
    tracing::debug!(?exit, "Dashboard finished");
}

/// Read a file the way a file input would present it.
fn read_selected_file(path: &Path) -> Result<SelectedFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(SelectedFile {
        mime: mime_for(path).to_string(),
        name,
        bytes,
    })
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => PDF_MIME,
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Initialize structured logging on stderr.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cv_portal=debug,info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
