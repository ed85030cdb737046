use std::io;

use socket2::Socket;

use crate::addr::{resolve, ResolvedAddr};
use crate::error::{Error, Result};
use crate::socket::{create_socket, SocketConfig};

/// Immediate result of a non-blocking connect.
///
/// A failed attempt is the `Err` side of the surrounding `Result`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ConnectOutcome {
    /// The connection is established, no poller round trip needed.
    Connected,
    /// The handshake is still running; register the socket with a
    /// [`Poller`](crate::Poller) and wait for its readiness event.
    InProgress,
}

impl ConnectOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectOutcome::Connected)
    }
}

/// Connect behaviours that differ between operating systems.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct PlatformQuirks {
    /// Solaris reports `EINVAL` when the peer already accepted and closed
    /// the connection; the socket is usable and the next read sees EOF.
    pub einval_means_connected: bool,
}

impl PlatformQuirks {
    pub const NATIVE: PlatformQuirks = PlatformQuirks {
        einval_means_connected: cfg!(any(target_os = "solaris", target_os = "illumos")),
    };
}

/// Start a non-blocking connect of `socket` to `addr`.
pub fn connect(socket: &Socket, addr: &ResolvedAddr) -> Result<ConnectOutcome> {
    connect_with_quirks(socket, addr, PlatformQuirks::NATIVE)
}

pub fn connect_with_quirks(
    socket: &Socket,
    addr: &ResolvedAddr,
    quirks: PlatformQuirks,
) -> Result<ConnectOutcome> {
    let rs = classify(socket.connect(&addr.to_sock_addr()), quirks);
    if let Err(e) = &rs {
        log::debug!("connect {addr},{e:?}");
    }
    rs
}

fn classify(rs: io::Result<()>, quirks: PlatformQuirks) -> Result<ConnectOutcome> {
    let e = match rs {
        Ok(()) => return Ok(ConnectOutcome::Connected),
        Err(e) => e,
    };
    match e.raw_os_error() {
        Some(libc::EALREADY | libc::EINPROGRESS | libc::EINTR) => Ok(ConnectOutcome::InProgress),
        Some(libc::EISCONN) => Ok(ConnectOutcome::Connected),
        Some(libc::EINVAL) if quirks.einval_means_connected => Ok(ConnectOutcome::Connected),
        Some(code) => Err(Error::Connect { code }),
        None => Err(Error::Io(e)),
    }
}

/// One connection attempt: the socket, where it is headed, and how the
/// initial connect call went.
#[derive(Debug)]
pub struct Attempt {
    pub socket: Socket,
    pub addr: ResolvedAddr,
    pub outcome: ConnectOutcome,
}

/// Resolve `text`, create a socket for its family and start connecting.
///
/// The socket is dropped if the connect call fails outright.
pub fn start_connect(text: &str, config: &SocketConfig) -> Result<Attempt> {
    let addr = resolve(text)?;
    let socket = create_socket(addr.family(), config)?;
    let outcome = connect(&socket, &addr)?;
    Ok(Attempt {
        socket,
        addr,
        outcome,
    })
}
