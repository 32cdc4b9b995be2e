//! Subcommand handlers.

use crate::cli::{Cli, Commands, CryptoArgs, KeygenArgs, LogsArgs, SmokeArgs};
use crate::clipboard::CommandClipboard;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use securelog_client::keys::generate;
use securelog_client::{
    ApiClient, Clipboard, ClipboardError, ClientConfig, CryptoForm, CryptoGateway, FormAction,
    HttpLogSource, KeyHandoff, KeyScheme, LogEntry, LogView, LogViewSnapshot, Navigation,
    Operation, PollingScheduler, PrivateKeyDisclosure, RequestOutcome,
};
use std::cell::RefCell;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use zeroize::Zeroizing;

const DATA_PREVIEW_CHARS: usize = 48;

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = ClientConfig::from_env().context("loading configuration")?;
    if let Some(base) = cli.api_base.as_deref() {
        config = config.with_base_url(base)?;
    }
    debug!(base_url = %config.base_url, "Using service");

    match cli.command {
        Commands::Keygen(args) => keygen(&args).await,
        Commands::Encrypt(args) => crypto(&config, Operation::Encrypt, args).await,
        Commands::Decrypt(args) => crypto(&config, Operation::Decrypt, args).await,
        Commands::Logs(args) => logs(&config, &args).await,
        Commands::Smoke(args) => smoke(&config, &args).await,
    }
}

async fn keygen(args: &KeygenArgs) -> Result<ExitCode> {
    let scheme: KeyScheme = args.scheme.into();
    // RSA generation and the clipboard process both block.
    let handoff = tokio::task::spawn_blocking(move || {
        generate(scheme).map(|material| material.hand_off(&CommandClipboard::from_env()))
    })
    .await
    .context("key generation task")??;
    print_handoff(&handoff);
    Ok(ExitCode::SUCCESS)
}

fn print_handoff(handoff: &KeyHandoff) {
    print!("{}", handoff.form_key);
    if !handoff.form_key.ends_with('\n') {
        println!();
    }
    match &handoff.disclosure {
        None => {}
        Some(PrivateKeyDisclosure::Clipboard) => {
            eprintln!("Private key copied to clipboard. It is not stored anywhere else.");
        }
        Some(PrivateKeyDisclosure::OnScreen(private)) => {
            eprintln!("!! Clipboard unavailable. Save this private key now; it will not be shown again:");
            eprint!("{}", private.expose_secret());
        }
    }
}

async fn crypto(config: &ClientConfig, operation: Operation, args: CryptoArgs) -> Result<ExitCode> {
    let key = match (&args.key, &args.key_file) {
        (Some(key), _) => Zeroizing::new(key.clone()),
        (None, Some(path)) => Zeroizing::new(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading key file {}", path.display()))?,
        ),
        (None, None) => anyhow::bail!("--key or --key-file is required"),
    };

    let gateway = CryptoGateway::new(ApiClient::new(config)?);
    let mut form = CryptoForm::new(operation);
    // PEM keys keep their trailing newline; plain keys are trimmed.
    let key_text = if key.contains("-----BEGIN") {
        key.to_string()
    } else {
        key.trim().to_string()
    };
    form.apply(FormAction::EditKey(key_text));
    form.apply(FormAction::EditData(args.data));

    let Some(outcome) = form.submit_with(&gateway).await else {
        eprintln!("Key and data are required");
        return Ok(ExitCode::FAILURE);
    };
    Ok(report(&outcome))
}

fn report(outcome: &RequestOutcome) -> ExitCode {
    match outcome {
        RequestOutcome::Success { payload } => {
            println!("{payload}");
            ExitCode::SUCCESS
        }
        RequestOutcome::Failure { message } => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn logs(config: &ClientConfig, args: &LogsArgs) -> Result<ExitCode> {
    let source = Arc::new(HttpLogSource::new(ApiClient::new(config)?));
    let view = Arc::new(LogView::new(source, config));

    for _ in 0..args.page {
        if view.next_page().await? != Navigation::Moved {
            break;
        }
    }

    if !args.watch {
        let (page, _) = tokio::join!(view.refresh_page(), view.refresh_total());
        page?;
        render(&view.snapshot().await);
        return Ok(ExitCode::SUCCESS);
    }

    watch(view, config).await?;
    Ok(ExitCode::SUCCESS)
}

async fn watch(view: Arc<LogView<HttpLogSource>>, config: &ClientConfig) -> Result<()> {
    let scheduler = PollingScheduler::start(Arc::clone(&view), config.poll_interval);
    let mut updates = view.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("Commands: n = next page, p = previous page, r = refresh, q = quit");

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                render(&snapshot);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "n" => report_navigation(view.next_page().await),
                    "p" => report_navigation(view.previous_page().await),
                    "r" => scheduler.refresh_now(),
                    "q" => break,
                    "" => {}
                    other => eprintln!("Unknown command {other:?}"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    scheduler.stop().await;
    info!("Log watch ended");
    Ok(())
}

fn report_navigation(result: securelog_client::ClientResult<Navigation>) {
    match result {
        Ok(Navigation::NoMorePages) => eprintln!("No more pages."),
        Ok(Navigation::AtFirstPage) => eprintln!("Already on the first page."),
        Ok(Navigation::Busy) => eprintln!("Still loading."),
        // Moves and failures show up in the next render.
        Ok(Navigation::Moved) | Err(_) => {}
    }
}

fn render(snapshot: &LogViewSnapshot) {
    let total = if snapshot.total.computing && snapshot.total.value.is_none() {
        "counting...".to_string()
    } else {
        snapshot.total.label()
    };
    println!(
        "Page {} | {} rows | total {}{}",
        snapshot.page.page_index + 1,
        snapshot.page.entries.len(),
        total,
        if snapshot.page.loading { " | loading" } else { "" },
    );
    if let Some(banner) = &snapshot.banner {
        eprintln!("! {banner}");
    }
    for entry in &snapshot.page.entries {
        println!("{}", format_entry(entry));
    }
}

fn format_entry(entry: &LogEntry) -> String {
    let when = entry
        .recorded_at()
        .map_or_else(|| entry.timestamp.to_string(), |t| t.to_rfc3339());
    let data = entry.data.as_deref().unwrap_or("-");
    let preview: String = data.chars().take(DATA_PREVIEW_CHARS).collect();
    let ellipsis = if data.chars().count() > DATA_PREVIEW_CHARS { "…" } else { "" };
    format!(
        "{:<38} {:<25} {:<15} {:<8} {preview}{ellipsis}",
        entry.id.as_str(),
        when,
        entry.ip.as_deref().unwrap_or("-"),
        entry.action.as_deref().unwrap_or("-"),
    )
}

/// Keeps the private key in memory instead of handing it to the operator.
struct CapturingClipboard(RefCell<Option<SecretString>>);

impl Clipboard for CapturingClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.0.borrow_mut() = Some(SecretString::from(text.to_string()));
        Ok(())
    }
}

/// Smoke test exit codes.
mod smoke_exit {
    pub const ENCRYPT_FAILED: u8 = 2;
    pub const DECRYPT_FAILED: u8 = 3;
    pub const MISMATCH: u8 = 5;
    pub const LOGS_FAILED: u8 = 6;
}

async fn smoke(config: &ClientConfig, args: &SmokeArgs) -> Result<ExitCode> {
    let api = ApiClient::new(config)?;
    println!("Starting smoke test against {}", api.base_url());

    let scheme: KeyScheme = args.scheme.into();
    let (handoff, private) = tokio::task::spawn_blocking(move || {
        let captured = CapturingClipboard(RefCell::new(None));
        generate(scheme).map(|material| {
            let handoff = material.hand_off(&captured);
            (handoff, captured.0.into_inner())
        })
    })
    .await
    .context("key generation task")??;
    let decrypt_key = private.unwrap_or_else(|| SecretString::from(handoff.form_key.clone()));
    println!("Generated {scheme:?} key locally");

    let plaintext = format!("smoke-test-{}", chrono::Utc::now().timestamp());
    let gateway = CryptoGateway::new(api.clone());

    let ciphertext = match gateway.encrypt(&handoff.form_key, &plaintext).await {
        RequestOutcome::Success { payload } => payload,
        RequestOutcome::Failure { message } => {
            eprintln!("ENCRYPT failed: {message}");
            return Ok(ExitCode::from(smoke_exit::ENCRYPT_FAILED));
        }
    };
    println!("Encrypted: {ciphertext}");

    let decrypted = match gateway.decrypt(decrypt_key.expose_secret(), &ciphertext).await {
        RequestOutcome::Success { payload } => payload,
        RequestOutcome::Failure { message } => {
            eprintln!("DECRYPT failed: {message}");
            return Ok(ExitCode::from(smoke_exit::DECRYPT_FAILED));
        }
    };
    println!("Decrypted: {decrypted}");
    if decrypted != plaintext {
        eprintln!("ROUNDTRIP MISMATCH: expected {plaintext:?}, got {decrypted:?}");
        return Ok(ExitCode::from(smoke_exit::MISMATCH));
    }

    let view = LogView::new(Arc::new(HttpLogSource::new(api)), config);
    if let Err(e) = view.refresh().await {
        eprintln!("LOGS failed: {e}");
        return Ok(ExitCode::from(smoke_exit::LOGS_FAILED));
    }
    render(&view.snapshot().await);

    println!("SMOKE TEST PASS");
    Ok(ExitCode::SUCCESS)
}
