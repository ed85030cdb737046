//! Linux `epoll` readiness multiplexer for pending connects.
//!
//! Sockets are registered once with read, write and edge-triggered interest,
//! so each connect completion produces exactly one event. [`Poller::wait`]
//! reads the pending socket error of every ready descriptor before returning,
//! which turns a readiness notification into a final connect result.

use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};
use std::time::Duration;

use libc::{
    c_int, epoll_create1, epoll_ctl, epoll_event, epoll_wait, EPOLLET, EPOLLIN, EPOLLOUT,
    EPOLL_CLOEXEC, EPOLL_CTL_ADD, EPOLL_CTL_DEL,
};

use crate::error::{Error, Result};

pub use event::ReadinessEvent;

pub mod event;

/// Default number of events collected by one [`Poller::wait`] call.
pub const MAX_EVENTS: usize = 32;

pub struct Poller {
    epoll: OwnedFd,
    /// Reusable buffer; its capacity is the batch size of one wait.
    events: Vec<epoll_event>,
}

impl Poller {
    pub fn new() -> Result<Poller> {
        Poller::with_capacity(MAX_EVENTS)
    }
    /// Create a poller returning at most `capacity` events per wait.
    ///
    /// Ready descriptors beyond the capacity are reported by later calls.
    pub fn with_capacity(capacity: usize) -> Result<Poller> {
        let fd = unsafe { epoll_create1(EPOLL_CLOEXEC) };
        if fd < 0 {
            return Err(Error::syscall("epoll_create1", io::Error::last_os_error()));
        }
        let epoll = unsafe { OwnedFd::from_raw_fd(fd) };
        let capacity = capacity.clamp(1, c_int::MAX as usize);
        Ok(Self {
            epoll,
            events: Vec::with_capacity(capacity),
        })
    }
    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }

    /// Watch `socket` for connect completion.
    ///
    /// A descriptor may be registered only once per poller; a second call
    /// fails with `EEXIST`.
    pub fn register<S: AsRawFd + ?Sized>(&self, socket: &S) -> Result<()> {
        let fd = socket.as_raw_fd();
        let mut event = epoll_event {
            events: (EPOLLIN | EPOLLOUT | EPOLLET) as u32,
            u64: fd as u64,
        };
        let rc = unsafe { epoll_ctl(self.epoll.as_raw_fd(), EPOLL_CTL_ADD, fd, &mut event) };
        if rc < 0 {
            let e = io::Error::last_os_error();
            log::debug!("register {fd},{e:?}");
            return Err(Error::syscall(
                format!("epoll_ctl({}, ADD, {fd}, ...)", self.epoll.as_raw_fd()),
                e,
            ));
        }
        Ok(())
    }

    /// Stop watching `socket` without closing it.
    ///
    /// Dropping the socket removes it from the poller as well.
    pub fn deregister<S: AsRawFd + ?Sized>(&self, socket: &S) -> Result<()> {
        let fd = socket.as_raw_fd();
        let rc = unsafe {
            epoll_ctl(
                self.epoll.as_raw_fd(),
                EPOLL_CTL_DEL,
                fd,
                std::ptr::null_mut(),
            )
        };
        if rc < 0 {
            return Err(Error::syscall(
                format!("epoll_ctl({}, DEL, {fd}, ...)", self.epoll.as_raw_fd()),
                io::Error::last_os_error(),
            ));
        }
        Ok(())
    }

    /// Block until registered sockets become ready or `timeout` elapses.
    ///
    /// `None` waits indefinitely. The timeout is truncated to whole
    /// milliseconds. An interrupted wait returns an empty batch; call again.
    pub fn wait(&mut self, timeout: Option<Duration>) -> Result<Vec<ReadinessEvent>> {
        let timeout_ms = timeout
            .map(|t| t.as_millis().min(c_int::MAX as u128) as c_int)
            .unwrap_or(-1);
        self.events.clear();
        let n = unsafe {
            epoll_wait(
                self.epoll.as_raw_fd(),
                self.events.as_mut_ptr(),
                self.events.capacity() as c_int,
                timeout_ms,
            )
        };
        if n < 0 {
            let e = io::Error::last_os_error();
            if e.kind() == io::ErrorKind::Interrupted {
                return Ok(Vec::new());
            }
            log::debug!("epoll_wait {e:?}");
            return Err(Error::syscall("epoll_wait", e));
        }
        unsafe {
            self.events.set_len(n as usize);
        }

        let events = self
            .events
            .iter()
            .map(|ev| {
                let event = event::translate(ev.u64 as RawFd);
                log::trace!("ready {},{:?}", event.fd(), event.error());
                event
            })
            .collect();
        Ok(events)
    }
}

impl AsRawFd for Poller {
    fn as_raw_fd(&self) -> RawFd {
        self.epoll.as_raw_fd()
    }
}

impl AsFd for Poller {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.epoll.as_fd()
    }
}
