//! Application startup and the front desk loop

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use crate::app::cli::args::Args;
use crate::app::cli::config::{Config, ConfigError};
use crate::app::console::{execute, parse_command, Reply};
use crate::app::observer::{run_observer, subscribe_observer};
use crate::core::error_handling::{log_error_with_context, operator_message};
use crate::core::logging::init_logging;
use crate::core::styles::{clap_styles, StyleRole};
use crate::core::version::banner;
use crate::messaging::{HttpSmsSender, MessagingError, NoopSender, NotificationSender};
use crate::notifications::api::{
    get_notification_service_arc, Event, SharedNotificationManager, SystemEvent, SystemEventType,
};
use crate::serving::api::QueueService;
use crate::store::MemoryEntryStore;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),

    #[error("Client messaging unavailable: {0}")]
    Messaging(#[from] MessagingError),

    #[error("Console input failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize application startup
pub fn startup() {
    let terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());
    let args = parse_args(terminal);
    let use_color = terminal && !args.no_color && std::env::var_os("NO_COLOR").is_none();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(args, use_color)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn parse_args(use_color: bool) -> Args {
    use clap::{CommandFactory, FromArgMatches};

    let matches = Args::command()
        .styles(clap_styles(use_color))
        .get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Configuration file merged with command line overrides, validated
pub async fn load_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = Config::load(args.config_file.as_deref()).await?;
    config.apply_args(args);
    config.validate()?;
    Ok(config)
}

/// Queue service over an in-memory store, messaging chosen from config
pub fn build_service(
    config: &Config,
    broadcaster: SharedNotificationManager,
) -> Result<QueueService, StartupError> {
    let tracking = config.tracking_links();
    let settings = config.queue_settings().map_err(ConfigError::from)?;
    let sender: Arc<dyn NotificationSender> = match config.sms_settings() {
        Some(sms) => Arc::new(HttpSmsSender::new(sms, tracking.clone())?),
        None => Arc::new(NoopSender),
    };

    log::info!(
        "Queue settings: {} min per client, {} booked per walk-in, messages via {}",
        settings.service_minutes,
        settings.slot_policy.booked_per_walk_in(),
        sender.channel_name()
    );

    Ok(
        QueueService::new(Arc::new(MemoryEntryStore::new()), broadcaster)
            .with_sender(sender)
            .with_tracking(tracking)
            .with_settings(settings),
    )
}

async fn publish_system(
    broadcaster: &SharedNotificationManager,
    event_type: SystemEventType,
    message: String,
) {
    let event = Event::System(SystemEvent::with_message(event_type, message));
    if let Err(e) = broadcaster.lock().await.publish(event).await {
        log::warn!("Failed to publish {:?} event: {}", event_type, e);
    }
}

async fn run(args: Args, use_color: bool) -> Result<(), StartupError> {
    let config = load_config(&args).await?;
    init_logging(
        config.logging.level.as_deref(),
        config.logging.format.as_deref(),
        config.logging.file.as_deref(),
        use_color,
    )
    .map_err(|e| StartupError::Logging(e.to_string()))?;
    log::info!("{} starting", banner());

    let broadcaster = get_notification_service_arc();
    let service = build_service(&config, Arc::clone(&broadcaster))?;

    let events = subscribe_observer(&broadcaster).await;
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let observer = tokio::spawn(run_observer(events, shutdown_rx, use_color));

    publish_system(
        &broadcaster,
        SystemEventType::Startup,
        format!("{} ready; type 'help' for commands", banner()),
    )
    .await;

    let result = console_loop(&service, use_color).await;

    publish_system(
        &broadcaster,
        SystemEventType::Shutdown,
        "Front desk closing".to_string(),
    )
    .await;
    let _ = shutdown_tx.send(());
    if let Err(e) = observer.await {
        log::warn!("Queue display task ended abnormally: {}", e);
    }
    log::info!("Front desk closed");

    result
}

async fn console_loop(service: &QueueService, use_color: bool) -> Result<(), StartupError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted");
                return Ok(());
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    log::debug!("End of console input");
                    return Ok(());
                };
                match handle_line(service, &line, use_color).await {
                    Reply::Quit => return Ok(()),
                    Reply::Text(text) if text.is_empty() => {}
                    Reply::Text(text) => println!("{text}"),
                }
            }
        }
    }
}

/// Parse and run one console line; failures become printable text
pub async fn handle_line(service: &QueueService, line: &str, use_color: bool) -> Reply {
    let command = match parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Reply::Text(String::new()),
        Err(e) => return Reply::Text(StyleRole::Error.paint(&e.to_string(), use_color)),
    };

    match execute(service, command, use_color).await {
        Ok(reply) => reply,
        Err(e) => {
            log_error_with_context(&e, "Front desk command");
            Reply::Text(StyleRole::Error.paint(&operator_message(&e, "Command"), use_color))
        }
    }
}
