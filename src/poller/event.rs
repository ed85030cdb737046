use std::io;
use std::os::fd::{BorrowedFd, RawFd};

use socket2::SockRef;

use crate::error::{Error, Result};

/// Readiness of one registered socket, with its connect result attached.
#[derive(Debug)]
pub struct ReadinessEvent {
    fd: RawFd,
    error: Option<Error>,
}

impl ReadinessEvent {
    pub fn fd(&self) -> RawFd {
        self.fd
    }
    /// `None` when the connect completed successfully.
    ///
    /// [`Error::Connect`] means the attempt failed; [`Error::Syscall`] means
    /// the outcome could not be read from the socket.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }
    pub fn is_connected(&self) -> bool {
        self.error.is_none()
    }
    pub fn into_result(self) -> Result<RawFd> {
        match self.error {
            None => Ok(self.fd),
            Some(e) => Err(e),
        }
    }
}

/// Build the event for a ready `fd` from its pending `SO_ERROR`.
pub(crate) fn translate(fd: RawFd) -> ReadinessEvent {
    let error = match pending_error(fd) {
        Ok(None) => None,
        Ok(Some(e)) => Some(match e.raw_os_error() {
            Some(code) => Error::Connect { code },
            None => Error::Io(e),
        }),
        Err(e) => Some(Error::syscall("getsockopt", e)),
    };
    ReadinessEvent { fd, error }
}

fn pending_error(fd: RawFd) -> io::Result<Option<io::Error>> {
    // `fd` came out of the poller's registration set and is still open
    let fd = unsafe { BorrowedFd::borrow_raw(fd) };
    SockRef::from(&fd).take_error()
}
