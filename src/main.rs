use swarmmaster::{
    config::TOKEN_ENV,
    logger::{log_config_info, LoggerConfig},
    SwarmConfig, SwarmLogger, SwarmRunner,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    swarmmaster::logger::init_with_config(LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = SwarmConfig::from_env();
    let logger = SwarmLogger::default();

    log_config_info(&config);
    for (setting, default, current) in config.overrides() {
        logger.log_config_change(setting, Some(&default), Some(&current));
    }
    match &config.token {
        Some(_) => logger.log_config_change(TOKEN_ENV, None, Some("configured")),
        None => log::warn!("⚠️  HF_TOKEN not set; every deploy will be rejected"),
    }

    run(SwarmRunner::new(config, logger)).await
}

#[cfg(feature = "server")]
async fn run(runner: SwarmRunner) -> Result<(), Box<dyn std::error::Error>> {
    let server = swarmmaster::ServerConfig::from_env();
    swarmmaster::logger::log_startup_info(
        "SwarmMaster",
        env!("CARGO_PKG_VERSION"),
        &format!("{}:{}", server.host, server.port),
    );

    swarmmaster::server::serve(runner, server).await?;
    Ok(())
}

/// Runs the task given on the command line and prints the answer as it grows.
#[cfg(not(feature = "server"))]
async fn run(runner: SwarmRunner) -> Result<(), Box<dyn std::error::Error>> {
    use futures::StreamExt;
    use std::io::Write;
    use swarmmaster::{swarm::is_failure_line, SwarmRequest};

    let task = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let config = runner.config();
    let request = SwarmRequest::new(task, config.model.clone())
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);

    let mut lines = runner.run(request);
    let mut previous = String::new();
    let mut failed = false;
    let mut stdout = std::io::stdout();

    while let Some(line) = lines.next().await {
        if is_failure_line(&line) {
            failed = true;
            writeln!(stdout, "\n{}", line)?;
            continue;
        }
        match line.strip_prefix(previous.as_str()) {
            Some(rest) if !previous.is_empty() => write!(stdout, "{}", rest)?,
            _ => write!(stdout, "{}", line)?,
        }
        stdout.flush()?;
        previous = line;
    }
    writeln!(stdout)?;

    if failed {
        return Err("swarm run failed".into());
    }
    Ok(())
}
