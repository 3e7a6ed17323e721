mod protocol;
mod server;

use crate::config::Config;
use crate::error::Result;
use std::io;
use tracing::info;

pub use protocol::{Message, MessageContent};
pub use server::{Server, MAX_CONTENT_LENGTH};

/// Serve the editor protocol on stdin/stdout until the host disconnects.
pub fn run_adapter_mode(config: &Config) -> Result<()> {
    info!(keyword = %config.keyword, "protocol server starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut server = Server::new(stdin.lock(), stdout.lock(), config);
    server.run()?;

    info!("protocol server exiting");
    Ok(())
}
