mod cli;
use calendar_util::storage::config::Config;
use cli::{CliMode, USAGE, load_config, parse_cli_mode, run_categories, run_contrast};

fn main() -> anyhow::Result<()> {
    setup_logging();

    let args = match parse_cli_mode() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{USAGE}");
            return Ok(());
        }
    };

    if args.mode == CliMode::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = load_config(args.config.as_ref())?;

    let result = match &args.mode {
        CliMode::Contrast { colors, blue } => run_contrast(&config, colors, *blue),
        CliMode::Categories => run_categories(&config),
        CliMode::Help => Ok(()),
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
    }
    result
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "calendar-util.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("calendar-util started");
}
