use std::fmt;
use std::net::{IpAddr, SocketAddr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::net::addr::InetAddress;
use crate::net::family::AddressFamily;

/// An IP address paired with a port.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IpEndpoint {
    pub address: InetAddress,
    pub port: u16,
}

impl IpEndpoint {
    pub fn new(address: InetAddress, port: u16) -> IpEndpoint {
        IpEndpoint { address, port }
    }

    pub fn family(&self) -> AddressFamily {
        self.address.family()
    }

    /// Converts to a standard socket address, keeping the IPv6 scope index.
    pub fn to_socket_addr(&self) -> Option<SocketAddr> {
        match self.address.to_ip_addr()? {
            IpAddr::V4(v4) => Some(SocketAddr::from((v4, self.port))),
            IpAddr::V6(v6) => Some(SocketAddr::V6(std::net::SocketAddrV6::new(
                v6,
                self.port,
                0,
                self.address.scope_index(),
            ))),
        }
    }
}

impl From<SocketAddr> for IpEndpoint {
    fn from(addr: SocketAddr) -> Self {
        let address = match addr {
            SocketAddr::V4(v4) => InetAddress::from(*v4.ip()),
            SocketAddr::V6(v6) => InetAddress::from_octets_v6(v6.ip().octets(), v6.scope_id()),
        };
        IpEndpoint::new(address, addr.port())
    }
}

impl fmt::Display for IpEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family() {
            AddressFamily::Ipv6 => write!(f, "[{}]:{}", self.address, self.port),
            _ => write!(f, "{}:{}", self.address, self.port),
        }
    }
}
