//! Race several endpoints and report the first one that connects.
//!
//! cargo run --example race -- 127.0.0.1:1 127.0.0.1:8080 [::1]:8080
use std::collections::HashMap;
use std::os::fd::{AsRawFd, RawFd};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use clap::Parser;
use env_logger::Env;
use rust_race_connect::{start_connect, ConnectOutcome, Poller, ResolvedAddr, SocketConfig};
use socket2::Socket;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Endpoints to race, as host:port
    #[arg(required = true)]
    addrs: Vec<String>,
    /// Give up after this many milliseconds
    #[arg(short, long, default_value_t = 3000)]
    timeout: u64,
}

fn main() -> anyhow::Result<()> {
    let Args { addrs, timeout } = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut poller = Poller::new()?;
    let mut racing: HashMap<RawFd, (ResolvedAddr, Socket)> = HashMap::new();
    for text in &addrs {
        let attempt = match start_connect(text, &SocketConfig::ABORT_ON_CLOSE) {
            Ok(attempt) => attempt,
            Err(e) => {
                log::warn!("{text}: {e}");
                continue;
            }
        };
        if attempt.outcome == ConnectOutcome::Connected {
            log::info!("winner {} (immediate)", attempt.addr);
            return Ok(());
        }
        poller
            .register(&attempt.socket)
            .with_context(|| format!("register {text}"))?;
        racing.insert(attempt.socket.as_raw_fd(), (attempt.addr, attempt.socket));
    }

    let deadline = Instant::now() + Duration::from_millis(timeout);
    while !racing.is_empty() {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            break;
        }
        for event in poller.wait(Some(left))? {
            let Some((addr, socket)) = racing.remove(&event.fd()) else {
                continue;
            };
            match event.error() {
                None => {
                    log::info!("winner {addr} via {:?}", socket.local_addr()?.as_socket());
                    // dropping `racing` aborts the losers
                    return Ok(());
                }
                Some(e) => log::warn!("{addr}: {e}"),
            }
        }
    }
    Err(anyhow!("no endpoint connected among {addrs:?}"))
}
