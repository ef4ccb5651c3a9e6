use clap::Parser;
use slotwatch::config::env::EnvConfig;
use slotwatch::config::toml_config::FileConfig;
use slotwatch::core::{report, Notifier};
use slotwatch::utils::{logger, validation::Validate};
use slotwatch::{
    CliConfig, ConsulateSweep, HttpPageFetcher, JsonStateFile, MailjetNotifier, MonitorConfig,
    MonitorEngine,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting slotwatch");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let file = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("❌ Failed to load config file {}: {}", path, e);
                eprintln!("❌ {}", e);
                std::process::exit(2);
            }
        },
        None => FileConfig::default(),
    };
    let env = match EnvConfig::from_env() {
        Ok(env) => env,
        Err(e) => {
            tracing::error!("❌ Bad environment variable: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    };
    let config = MonitorConfig::resolve(&cli, env, file);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(2);
    }

    let notifier = config.mailjet.as_ref().map(|mj| {
        MailjetNotifier::new(
            mj.public_key.clone(),
            mj.private_key.clone(),
            mj.from_email.clone(),
            mj.recipient_email.clone(),
        )
        .with_sender_name(config.sender_name.clone())
    });

    if cli.test {
        let Some(notifier) = notifier else {
            eprintln!(
                "❌ Mailjet is not fully configured; set MJ_APIKEY_PUBLIC, MJ_APIKEY_PRIVATE, FROM_EMAIL and RECIPIENT_EMAIL"
            );
            std::process::exit(2);
        };
        let url = config.urls.first().cloned().unwrap_or_default();
        let (subject, body) = report::render_test_alert(&url);
        match notifier.send(&subject, &body).await {
            Ok(()) => {
                tracing::info!("✅ Test email sent");
                println!("✅ Test email sent to the configured recipient");
            }
            Err(e) => {
                tracing::error!("❌ Test email failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let fetcher = HttpPageFetcher::new(
        Duration::from_secs(config.timeout_seconds),
        &config.user_agent,
    )?;
    let store = JsonStateFile::new(config.state_file.clone());
    let interval = Duration::from_secs(config.interval_minutes * 60);
    let interval_minutes = config.interval_minutes;
    let watch = cli.watch;

    let sweep = ConsulateSweep::new(fetcher, store, notifier, config);
    let engine = MonitorEngine::new(sweep);

    if watch {
        tracing::info!("🔍 Watch mode, interval {} minutes", interval_minutes);
        engine.run_watch(interval).await?;
        return Ok(());
    }

    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Sweep complete: {} pages checked, {} changes, alert sent: {}",
                summary.urls_checked,
                summary.changes,
                summary.alert_sent
            );
        }
        Err(e) => {
            tracing::error!("❌ Sweep failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
