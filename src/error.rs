use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("resolve {addr}: {source}")]
    Resolve {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("unsupported address family: {0}")]
    UnsupportedFamily(String),
    #[error("socket setup: {0}")]
    SocketSetup(#[source] io::Error),
    /// A named OS call failed, e.g. `epoll_wait` or `getsockopt`.
    #[error("{call}: {source}")]
    Syscall {
        call: String,
        #[source]
        source: io::Error,
    },
    /// A connect attempt failed; `code` is the errno reported by the kernel.
    #[error("connect error: {}", connect_cause(.code))]
    Connect { code: i32 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn syscall<S: Into<String>>(call: S, source: io::Error) -> Self {
        Error::Syscall {
            call: call.into(),
            source,
        }
    }
    /// The OS error number behind this error, when there is one.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::Connect { code } => Some(*code),
            Error::Resolve { source, .. }
            | Error::SocketSetup(source)
            | Error::Syscall { source, .. }
            | Error::Io(source) => source.raw_os_error(),
            Error::UnsupportedFamily(_) => None,
        }
    }
}

fn connect_cause(code: &i32) -> io::Error {
    io::Error::from_raw_os_error(*code)
}

pub type Result<T, E = Error> = ::std::result::Result<T, E>;
