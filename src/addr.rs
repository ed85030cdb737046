use std::fmt;
use std::net::{SocketAddr, SocketAddrV4, ToSocketAddrs};

use socket2::{Domain, SockAddr};

use crate::error::{Error, Result};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Family {
    Ipv4,
    Ipv6,
}

impl From<Family> for Domain {
    fn from(family: Family) -> Self {
        match family {
            Family::Ipv4 => Domain::IPV4,
            Family::Ipv6 => Domain::IPV6,
        }
    }
}

/// A resolved endpoint, tagged with the address family its socket must use.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolvedAddr {
    family: Family,
    addr: SocketAddr,
}

impl ResolvedAddr {
    /// Tags `addr` with its family. IPv4-mapped IPv6 addresses are
    /// normalized to plain IPv4 so they are dialed over an `AF_INET` socket.
    pub fn new(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(_) => Self {
                family: Family::Ipv4,
                addr,
            },
            SocketAddr::V6(v6) => match v6.ip().to_ipv4_mapped() {
                Some(ip) => Self {
                    family: Family::Ipv4,
                    addr: SocketAddr::V4(SocketAddrV4::new(ip, v6.port())),
                },
                None => Self {
                    family: Family::Ipv6,
                    addr,
                },
            },
        }
    }
    pub fn family(&self) -> Family {
        self.family
    }
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
    pub fn to_sock_addr(&self) -> SockAddr {
        SockAddr::from(self.addr)
    }
}

impl From<SocketAddr> for ResolvedAddr {
    fn from(addr: SocketAddr) -> Self {
        ResolvedAddr::new(addr)
    }
}

impl TryFrom<SockAddr> for ResolvedAddr {
    type Error = Error;

    fn try_from(addr: SockAddr) -> Result<Self> {
        match addr.as_socket() {
            Some(addr) => Ok(ResolvedAddr::new(addr)),
            None => Err(Error::UnsupportedFamily(format!(
                "family {}",
                addr.family()
            ))),
        }
    }
}

impl fmt::Display for ResolvedAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.addr.fmt(f)
    }
}

/// Resolve a textual `host:port` endpoint.
///
/// The first address with an IPv4 representation is preferred, otherwise the
/// first IPv6 address is used.
pub fn resolve(text: &str) -> Result<ResolvedAddr> {
    let resolve_err = |source| Error::Resolve {
        addr: text.to_string(),
        source,
    };
    let addrs: Vec<ResolvedAddr> = text
        .to_socket_addrs()
        .map_err(resolve_err)?
        .map(ResolvedAddr::new)
        .collect();
    addrs
        .iter()
        .find(|addr| addr.family() == Family::Ipv4)
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            resolve_err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no addresses resolved",
            ))
        })
}
