//! Command execution.

use std::future::Future;
use std::path::{Path, PathBuf};

use aerofs_api::{AppConfig, AuthClient, Client, UploadOptions, UploadProgress, UploadReport, UploadSession};
use anyhow::Context;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::{Cli, Command};

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, cancelling");
            signal.cancel();
        }
    });

    match cli.command {
        Command::Upload {
            file_id,
            path,
            etags,
            chunk_size,
        } => {
            let client = connect(&config, &cancel)?;
            let session = client.open_upload(&file_id, &etags).await?;
            println!("upload-id: {}", session.upload_id);

            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            let report = with_progress(chunk_size.unwrap_or(config.chunk_size), |options| {
                client.upload_file(&session, file, options)
            })
            .await
            .with_context(|| resume_hint(&session))?;
            print_report(&report);
        }
        Command::Resume {
            file_id,
            upload_id,
            path,
            etags,
            chunk_size,
        } => {
            let client = connect(&config, &cancel)?;
            let session = UploadSession::new(file_id, upload_id, etags);
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            let report = with_progress(chunk_size.unwrap_or(config.chunk_size), |options| {
                client.resume_upload(&session, file, options)
            })
            .await
            .with_context(|| resume_hint(&session))?;
            print_report(&report);
        }
        Command::File { file_id } => {
            let client = connect(&config, &cancel)?;
            let file = client.get_file_metadata(&file_id, &["path"]).await?;
            print_json(&file.value)?;
        }
        Command::User { email } => {
            let client = connect(&config, &cancel)?;
            let user = client.get_user(&email).await?;
            print_json(&user.value)?;
        }
        Command::AuthorizeUrl {
            redirect_uri,
            state,
            scopes,
            app_config,
        } => {
            let app = load_app(app_config.as_deref(), &config)?;
            let scopes: Vec<&str> = scopes.iter().map(String::as_str).collect();
            let auth = AuthClient::new(app, &redirect_uri, &state, &scopes)?;
            println!("{}", auth.authorization_url()?);
        }
        Command::Token {
            code,
            redirect_uri,
            app_config,
            save,
        } => {
            let app = load_app(app_config.as_deref(), &config)?;
            let host = app.hostname.clone();
            let auth = AuthClient::new(app, &redirect_uri, "", &[])?;
            let token = auth.exchange_code(&code).await?;
            println!("{}", token.access_token);

            if save {
                let updated = Config {
                    host,
                    token: token.access_token,
                    ..config
                };
                let path = updated.save(cli.config.as_deref())?;
                info!(path = %path.display(), "token saved");
            }
        }
    }
    Ok(())
}

fn connect(config: &Config, cancel: &CancellationToken) -> anyhow::Result<Client> {
    let client = Client::new(config.client_config()?)?;
    Ok(client.with_cancellation(cancel.clone()))
}

fn load_app(flag: Option<&Path>, config: &Config) -> anyhow::Result<AppConfig> {
    let path: PathBuf = flag
        .map(Path::to_path_buf)
        .or_else(|| config.app_config.clone())
        .context("no appconfig.json given (use --app-config or set app_config)")?;
    AppConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}

/// Runs an upload drive while logging its progress updates.
async fn with_progress<F, Fut>(chunk_size: usize, drive: F) -> Result<UploadReport, aerofs_api::Error>
where
    F: FnOnce(UploadOptions) -> Fut,
    Fut: Future<Output = Result<UploadReport, aerofs_api::Error>>,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<UploadProgress>();
    let logger = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            info!(upload_id = %update.upload_id, state = %update.state, "progress");
        }
    });

    let result = drive(UploadOptions::default().chunk_size(chunk_size).progress(tx)).await;
    let _ = logger.await;
    result
}

fn resume_hint(session: &UploadSession) -> String {
    format!(
        "upload interrupted; continue with `aerofs resume {} {} <path>`",
        session.file_id, session.upload_id
    )
}

fn print_report(report: &UploadReport) {
    println!(
        "{} ({} bytes, {} requests, resumed from {})",
        report.state, report.bytes_sent, report.requests, report.resumed_from
    );
    if let Some(etag) = &report.etag {
        println!("etag: {etag}");
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
