//! # rust-race-connect - Non-blocking TCP connect engine
//!
//! `rust-race-connect` starts many outbound TCP connection attempts at once
//! without parking a thread per attempt. Every attempt runs on a
//! non-blocking socket, and one Linux `epoll` instance reports which of them
//! finished and how. It is the building block for race dialers (try several
//! addresses, keep the first that connects) and for pool warmers.
//!
//! ## Architecture
//!
//! - [`addr`] - resolve `host:port` text into a family-tagged address
//! - [`socket`] - create non-blocking, close-on-exec TCP sockets
//! - [`connect`] - start a connect and classify the immediate result
//! - [`poller`] - register pending sockets and wait for their completions
//! - [`error`] - the error type shared by all of the above
//!
//! Picking a winner, cancelling losers and retrying are left to the caller.
//! Cancelling an attempt means dropping its socket; sockets created with
//! [`SocketConfig::ABORT_ON_CLOSE`] reset the peer instead of lingering.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_race_connect::{connect, create_socket, resolve, ConnectOutcome, Poller, SocketConfig};
//! use std::time::Duration;
//!
//! # fn main() -> rust_race_connect::Result<()> {
//! let addr = resolve("127.0.0.1:8080")?;
//! let socket = create_socket(addr.family(), &SocketConfig::ABORT_ON_CLOSE)?;
//!
//! if connect(&socket, &addr)? == ConnectOutcome::InProgress {
//!     let mut poller = Poller::new()?;
//!     poller.register(&socket)?;
//!     'wait: loop {
//!         for event in poller.wait(Some(Duration::from_millis(100)))? {
//!             event.into_result()?;
//!             break 'wait;
//!         }
//!     }
//! }
//! let stream: std::net::TcpStream = socket.into();
//! # drop(stream);
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! A [`Poller`] is meant to be driven by one loop. [`Poller::wait`] takes
//! `&mut self`; callers sharing a poller across threads must serialize
//! access themselves.

#[cfg(not(unix))]
compile_error!("rust-race-connect only supports unix targets");

pub mod addr;
pub mod connect;
pub mod error;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod poller;
pub mod socket;

pub use addr::{resolve, Family, ResolvedAddr};
pub use connect::{
    connect, connect_with_quirks, start_connect, Attempt, ConnectOutcome, PlatformQuirks,
};
pub use error::{Error, Result};
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use poller::{Poller, ReadinessEvent, MAX_EVENTS};
pub use socket::{create_abortive_socket, create_socket, SocketConfig};
