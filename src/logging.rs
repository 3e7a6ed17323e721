use crate::config::{Config, LOG_ENV};
use std::fs;
use std::io;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Output goes to stderr, and also to the
/// configured log file, because stdout carries the protocol.
pub fn init(config: &Config) -> io::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    let installed = match &config.log_file {
        Some(path) => {
            let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_writer(io::stderr.and(Mutex::new(file)))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };

    // A second init (tests, embedding) keeps the first subscriber.
    if let Err(e) = installed {
        tracing::debug!(error = %e, "subscriber already installed");
    }
    Ok(())
}
