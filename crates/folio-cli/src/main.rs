//! folio - command-line client for the portfolio admin session.
//!
//! Signs an admin in against the portfolio backend, keeps the access token
//! and refresh cookie between runs, and can hold a session open with
//! periodic renewal.

mod cli;
mod format;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use folio_core::api::ApiClient;
use folio_core::auth::{FileTokenStore, SessionManager, SessionState};
use folio_core::{Config, TokenStoreKind};
use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command};
use format::{age_display, format_date, mask_token, truncate_string};

/// Log file name prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "folio.log";

/// Environment variable read before prompting for a password
const PASSWORD_ENV: &str = "FOLIO_PASSWORD";

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the stderr level. A
/// daily log file in the cache directory always records at debug level.
fn init_tracing(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_filter(filter);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("folio_core=debug,folio=debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    let log_dir = config.cache_dir().ok();
    let _guard = init_tracing(cli.verbose, log_dir.as_deref());
    info!("folio starting");

    if let Some(ref url) = cli.api_url {
        config.api_url = Some(url.clone());
    }
    if let Some(store) = cli.store {
        config.token_store = store.into();
    }

    let (api, session) = build_session(&config)?;
    info!(api_url = %api.base_url(), store = ?config.token_store, "Session configured");

    match cli.command {
        Command::Login { email } => login(&mut config, &session, email).await,
        Command::Logout => logout(&session).await,
        Command::Status => status(&config, &session).await,
        Command::Refresh => refresh(&session).await,
        Command::Watch => watch(&session).await,
        Command::Get { path } => get(&api, &session, &path).await,
    }
}

fn build_session(config: &Config) -> Result<(ApiClient, SessionManager)> {
    let api = ApiClient::with_cookie_jar(&config.api_base_url(), config.cookie_jar()?)
        .context("Failed to create API client")?;
    let session = SessionManager::new(
        Arc::new(api.clone()),
        config.token_store()?,
        config.session_config(),
    );
    Ok((api, session))
}

fn prompt_email(default: Option<&str>) -> Result<String> {
    match default {
        Some(email) => print!("Email [{}]: ", email),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    Ok(if input.is_empty() {
        default.unwrap_or_default().to_string()
    } else {
        input.to_string()
    })
}

fn prompt_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    let password = rpassword::prompt_password("Password: ")?;
    Ok(password)
}

async fn login(config: &mut Config, session: &SessionManager, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_email(config.last_email.as_deref())?,
    };
    let password = prompt_password()?;

    // A new login replaces whatever was stored; no need to restore it first
    let admin = session.login(&email, &password).await?;

    config.last_email = Some(admin.email.clone());
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Signed in as {} <{}> ({})", admin.name, admin.email, admin.role.display_name());
    Ok(())
}

async fn logout(session: &SessionManager) -> Result<()> {
    let restored = session.initialize().await;
    session.logout().await;
    if restored.is_authenticated() {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

async fn status(config: &Config, session: &SessionManager) -> Result<()> {
    let state = session.initialize().await;
    print_state(&state);

    if let Some(token) = session.access_token() {
        println!("Token:      {}", mask_token(&token));
    }
    if config.token_store == TokenStoreKind::File {
        let store = FileTokenStore::new(config.cache_dir()?);
        if let Ok(Some(record)) = store.load_record() {
            println!("Saved:      {}", age_display(&record.saved_at, Utc::now()));
        }
    }
    Ok(())
}

async fn refresh(session: &SessionManager) -> Result<()> {
    // The refresh cookie alone is enough; no stored access token needed
    let admin = session.refresh_token().await?;
    println!("Session renewed for {}", admin.email);
    if let Some(token) = session.access_token() {
        println!("Token: {}", mask_token(&token));
    }
    Ok(())
}

async fn watch(session: &SessionManager) -> Result<()> {
    let state = session.initialize().await;
    if !state.is_authenticated() {
        anyhow::bail!("Not signed in. Run `folio login` first.");
    }
    print_state(&state);

    // Subscribing after the restore so only later changes are reported
    let mut updates = session.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                println!("[{}] {}", Utc::now().format("%H:%M:%S"), state.phase.display_name());
                if !state.is_authenticated() && !state.loading {
                    println!("Session ended");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, leaving session in place");
                break;
            }
        }
    }
    Ok(())
}

async fn get(api: &ApiClient, session: &SessionManager, path: &str) -> Result<()> {
    session.initialize().await;
    let token = session.access_token();
    if token.is_none() {
        warn!("Not signed in, sending request without a bearer token");
    }

    let body: Value = api
        .request::<Value, ()>(Method::GET, path, token.as_deref(), None)
        .await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn print_state(state: &SessionState) {
    println!("Status:     {}", state.phase.display_name());
    if let Some(ref admin) = state.admin {
        println!("Admin:      {} <{}>", truncate_string(&admin.name, 40), admin.email);
        println!("Role:       {}", admin.role.display_name());
        println!("Last login: {}", format_date(admin.last_login.as_ref()));
    }
    if let Some(ref error) = state.error {
        println!("Error:      {}", error);
    }
}
