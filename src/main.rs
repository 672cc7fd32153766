//! Process entry point: wire the real collaborators and run the pipeline once.
//!
//! Exit status is 0 on completion, including runs with partial failures and
//! runs where delivery failed; only configuration errors abort before any
//! network activity and exit non-zero.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use newsbrief::api::OpenAiAssistant;
use newsbrief::cli::Cli;
use newsbrief::config::{env_secret, Config};
use newsbrief::fetch::HttpFetcher;
use newsbrief::notify::MailgunNotifier;
use newsbrief::{CallBudget, Extractor, Notifier, Pipeline, Schedule, Summarizer, render_digest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsbrief starting up");

    let args = Cli::parse();

    // Configuration problems are the only fatal errors; everything after
    // this block degrades to partial success.
    let config = Config::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let sources = config.enabled_sources();
    info!(
        enabled = sources.len(),
        configured = config.sources.len(),
        config = %args.config.display(),
        "Loaded configuration"
    );

    let notifier: Option<MailgunNotifier> = if args.no_deliver {
        None
    } else {
        let mail = config
            .mail
            .as_ref()
            .ok_or_else(|| anyhow!("[mail] section is required unless --no-deliver is set"))?;
        let mailgun_key = env_secret("MAILGUN_API_KEY")?;
        Some(MailgunNotifier::new(mail, mailgun_key).context("building mail client")?)
    };

    let openai_key = env_secret("OPENAI_API_KEY")?;
    let assistant = Arc::new(
        OpenAiAssistant::new(&config.api, openai_key).context("building capability client")?,
    );
    let fetcher = Arc::new(HttpFetcher::new().context("building HTTP client")?);
    let budget = Arc::new(CallBudget::per_minute(
        NonZeroU32::new(config.limits.max_calls_per_minute)
            .ok_or_else(|| anyhow!("limits.max_calls_per_minute must be positive"))?,
    ));

    let extractor = Extractor::new(fetcher.clone(), assistant.clone(), budget.clone());
    let summarizer = Summarizer::new(fetcher, assistant, budget);

    let cancel = CancellationToken::new();
    if let Some(secs) = args.timeout_secs {
        let timer = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            timer.cancel();
        });
        info!(timeout_secs = secs, "Run deadline armed");
    }

    let schedule = if args.sequential {
        Schedule::Sequential
    } else {
        Schedule::Concurrent {
            workers: args.concurrency.unwrap_or(config.limits.concurrency),
        }
    };

    let pipeline = Pipeline::new(extractor, summarizer, cancel);
    let digest = pipeline.run(&sources, schedule).await;
    info!(items = digest.len(), "Digest assembled");

    let document = render_digest(&digest);

    match notifier {
        Some(notifier) => {
            // The digest is this run's output either way; a failed delivery
            // is reported, not retried, and does not change the exit status.
            if let Err(e) = notifier.deliver(&document).await {
                error!(error = %e, "Delivery failed; digest was still rendered");
            }
        }
        None => {
            println!("{document}");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        items = digest.len(),
        "Execution complete"
    );

    Ok(())
}
