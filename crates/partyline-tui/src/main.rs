//! Partyline terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Join the default room on a local dev server
//! partyline
//!
//! # Join a named room on a deployed host, logging to a file
//! partyline --host my-app.user.partykit.dev --room lobby --log-file partyline.log
//! ```

#![allow(clippy::disallowed_types, reason = "log file writer is shared synchronously")]

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use partyline_app::{App, DEFAULT_PRESENCE_LOG_LIMIT, ReconcilerConfig, Runtime};
use partyline_client::TransportConfig;
use partyline_proto::{DEFAULT_HOST, DEFAULT_ROOM, Endpoint, UnmatchedPolicy};
use partyline_tui::TerminalDriver;
use tracing_subscriber::EnvFilter;

/// Partyline terminal client
#[derive(Parser, Debug)]
#[command(name = "partyline")]
#[command(about = "Terminal client for real-time chat rooms")]
#[command(version)]
struct Args {
    /// Room server host, optionally with a ws:// or wss:// scheme
    #[arg(long, env = "PARTYSOCKET_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Room to join
    #[arg(short, long, env = "PARTYLINE_ROOM", default_value = DEFAULT_ROOM)]
    room: String,

    /// Named party serving the room (default party when omitted)
    #[arg(long)]
    party: Option<String>,

    /// Name to join as (random guest name when omitted)
    #[arg(short, long)]
    name: Option<String>,

    /// Drop structured frames of unknown shape instead of logging them
    #[arg(long)]
    drop_unmatched: bool,

    /// Do not maintain the roster from presence events
    #[arg(long)]
    no_roster: bool,

    /// Keep at most this many server messages
    #[arg(long)]
    server_log_limit: Option<usize>,

    /// Keep at most this many presence events
    #[arg(long, default_value_t = DEFAULT_PRESENCE_LOG_LIMIT)]
    presence_log_limit: usize,

    /// Handshake timeout in seconds
    #[arg(long, default_value_t = 10)]
    connect_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this file (logs are discarded otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn endpoint(&self) -> Endpoint {
        let name = self.name.clone().unwrap_or_else(guest_name);
        let endpoint = Endpoint::new(self.host.as_str(), self.room.as_str(), name);
        match &self.party {
            Some(party) => endpoint.with_party(party.as_str()),
            None => endpoint,
        }
    }

    fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            unmatched: if self.drop_unmatched {
                UnmatchedPolicy::Drop
            } else {
                UnmatchedPolicy::SystemMessage
            },
            track_roster: !self.no_roster,
            server_log_limit: self.server_log_limit,
            presence_log_limit: Some(self.presence_log_limit),
        }
    }

    fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout),
            ..TransportConfig::default()
        }
    }
}

fn guest_name() -> String {
    format!("guest-{:04x}", rand::random::<u16>())
}

/// Install the log subscriber. The terminal belongs to the UI, so logs go to
/// a file or nowhere.
fn init_logging(args: &Args) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false);

    match &args.log_file {
        Some(path) => builder.with_writer(Mutex::new(File::create(path)?)).init(),
        None => builder.with_writer(io::sink).init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let endpoint = args.endpoint();
    tracing::info!(%endpoint, identity = endpoint.identity(), "partyline starting");

    let app = App::new(endpoint, &args.reconciler_config());
    let driver = TerminalDriver::new(args.transport_config())?;

    Runtime::new(driver, app).run().await?;

    tracing::info!("partyline exiting");
    Ok(())
}
