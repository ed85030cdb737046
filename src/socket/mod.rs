use std::io;
use std::time::Duration;

use socket2::{Protocol, Socket, Type};

use crate::addr::Family;
use crate::error::{Error, Result};

pub use config::SocketConfig;

pub mod config;

/// Create a non-blocking, close-on-exec TCP socket for `family`.
///
/// The socket is closed before returning if any option cannot be applied.
pub fn create_socket(family: Family, config: &SocketConfig) -> Result<Socket> {
    // socket2 sets close-on-exec atomically on creation
    let socket = Socket::new(family.into(), Type::STREAM, Some(Protocol::TCP))
        .map_err(Error::SocketSetup)?;
    if let Err(e) = set_sock_opts(&socket, config) {
        log::debug!("create_socket {family:?},{e:?}");
        drop(socket);
        return Err(Error::SocketSetup(e));
    }
    Ok(socket)
}

/// Shorthand for [`create_socket`] with only the linger behaviour chosen.
pub fn create_abortive_socket(family: Family, abort_on_close: bool) -> Result<Socket> {
    create_socket(
        family,
        &SocketConfig::default().set_abort_on_close(abort_on_close),
    )
}

fn set_sock_opts(socket: &Socket, config: &SocketConfig) -> io::Result<()> {
    socket.set_nonblocking(true)?;
    #[cfg(any(target_os = "linux", target_os = "android"))]
    socket.set_quickack(config.quick_ack)?;
    if config.abort_on_close {
        socket.set_linger(Some(Duration::ZERO))?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{create_abortive_socket, create_socket, SocketConfig};
    use crate::addr::Family;
    use std::io::{ErrorKind, Read};
    use std::net::TcpListener;
    use std::os::fd::{AsRawFd, RawFd};
    use std::time::Duration;

    pub(crate) fn fd_flags(fd: RawFd) -> (bool, bool) {
        let status = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        let descriptor = unsafe { libc::fcntl(fd, libc::F_GETFD) };
        assert!(status >= 0 && descriptor >= 0);
        (
            status & libc::O_NONBLOCK != 0,
            descriptor & libc::FD_CLOEXEC != 0,
        )
    }

    #[test]
    fn non_blocking_and_cloexec() {
        for family in [Family::Ipv4, Family::Ipv6] {
            let socket = match create_socket(family, &SocketConfig::default()) {
                Ok(socket) => socket,
                // hosts without IPv6 support
                Err(e) if family == Family::Ipv6 => {
                    log::warn!("skip ipv6 {e:?}");
                    continue;
                }
                Err(e) => panic!("{e:?}"),
            };
            assert_eq!(fd_flags(socket.as_raw_fd()), (true, true));
            assert_eq!(socket.linger().unwrap(), None);
        }
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn quick_ack_follows_config() {
        let on = create_socket(Family::Ipv4, &SocketConfig::default()).unwrap();
        assert!(on.quickack().unwrap());
        let off =
            create_socket(Family::Ipv4, &SocketConfig::default().set_quick_ack(false)).unwrap();
        assert!(!off.quickack().unwrap());
    }

    #[test]
    fn abort_on_close_sets_zero_linger() {
        let socket = create_abortive_socket(Family::Ipv4, true).unwrap();
        assert_eq!(socket.linger().unwrap(), Some(Duration::ZERO));
        assert_eq!(fd_flags(socket.as_raw_fd()), (true, true));
    }

    fn peer_read_after_close(config: SocketConfig) -> std::io::Result<usize> {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let socket = create_socket(Family::Ipv4, &config).unwrap();
        socket.set_nonblocking(false).unwrap();
        socket.connect(&addr.into()).unwrap();
        let (mut peer, _) = listener.accept().unwrap();
        drop(socket);
        peer.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut buf = [0u8; 16];
        peer.read(&mut buf)
    }

    #[test]
    fn abort_on_close_resets_peer() {
        let rs = peer_read_after_close(SocketConfig::ABORT_ON_CLOSE);
        assert_eq!(rs.unwrap_err().kind(), ErrorKind::ConnectionReset);
    }

    #[test]
    fn graceful_close_is_eof() {
        let rs = peer_read_after_close(SocketConfig::GRACEFUL);
        assert_eq!(rs.unwrap(), 0);
    }
}
