use std::fmt;
use std::net::IpAddr;

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::net::addr::InetAddress;

/// One address bound to an interface.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterfaceAddress {
    pub unicast: InetAddress,
    pub netmask: Option<InetAddress>,
    /// Set only for broadcast-capable IPv4 interfaces
    pub broadcast: Option<InetAddress>,
}

impl InterfaceAddress {
    pub fn new(unicast: InetAddress) -> InterfaceAddress {
        InterfaceAddress {
            unicast,
            netmask: None,
            broadcast: None,
        }
    }

    pub fn with_netmask(mut self, netmask: InetAddress) -> InterfaceAddress {
        self.netmask = Some(netmask);
        self
    }

    pub fn with_broadcast(mut self, broadcast: InetAddress) -> InterfaceAddress {
        self.broadcast = Some(broadcast);
        self
    }

    /// Returns the unicast address and netmask as an [`IpNet`].
    ///
    /// `None` without a netmask, with a non-contiguous mask, or when the
    /// mask and the address are of different families.
    pub fn network(&self) -> Option<IpNet> {
        let mask = self.netmask?.to_ip_addr()?;
        match (self.unicast.to_ip_addr()?, mask) {
            (IpAddr::V4(ip), IpAddr::V4(mask)) => Ipv4Net::with_netmask(ip, mask).ok().map(IpNet::V4),
            (IpAddr::V6(ip), IpAddr::V6(mask)) => Ipv6Net::with_netmask(ip, mask).ok().map(IpNet::V6),
            _ => None,
        }
    }
}

impl fmt::Display for InterfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.network() {
            Some(net) => write!(f, "{}/{}", self.unicast, net.prefix_len())?,
            None => write!(f, "{}", self.unicast)?,
        }
        if let Some(brd) = &self.broadcast {
            write!(f, " brd {}", brd)?;
        }
        Ok(())
    }
}

/// Structure of Network Interface information
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkInterface {
    pub name: String,
    /// Same as `name` on Unix
    pub display_name: String,
    pub index: u32,
    /// Addresses in OS enumeration order. Never empty.
    pub addresses: Vec<InterfaceAddress>,
}

impl NetworkInterface {
    pub(crate) fn new(name: String, index: u32, first: InterfaceAddress) -> NetworkInterface {
        NetworkInterface {
            display_name: name.clone(),
            name,
            index,
            addresses: vec![first],
        }
    }

    /// Check if `address` is one of the unicast addresses of this interface
    pub fn has_address(&self, address: &InetAddress) -> bool {
        self.addresses.iter().any(|a| a.unicast == *address)
    }

    /// Check if any unicast address of this interface is a loopback address
    pub fn is_loopback(&self) -> bool {
        self.addresses.iter().any(|a| a.unicast.is_loopback())
    }

    pub fn unicast_addresses(&self) -> impl Iterator<Item = &InetAddress> {
        self.addresses.iter().map(|a| &a.unicast)
    }
}

impl fmt::Display for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (index {}): ", self.name, self.index)?;
        for (i, addr) in self.addresses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", addr)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(text: &str) -> InetAddress {
        InetAddress::parse(text).unwrap()
    }

    #[test]
    fn test_network_from_netmask() {
        let ia = InterfaceAddress::new(addr("192.168.1.20")).with_netmask(addr("255.255.255.0"));
        let net = ia.network().unwrap();
        assert_eq!(net.to_string(), "192.168.1.20/24");
        assert_eq!(net.trunc().to_string(), "192.168.1.0/24");
    }

    #[test]
    fn test_network_requires_matching_mask() {
        assert!(InterfaceAddress::new(addr("10.0.0.1")).network().is_none());
        let mixed = InterfaceAddress::new(addr("10.0.0.1")).with_netmask(addr("ffff::"));
        assert!(mixed.network().is_none());
        let holes = InterfaceAddress::new(addr("10.0.0.1")).with_netmask(addr("255.0.255.0"));
        assert!(holes.network().is_none());
    }

    #[test]
    fn test_display() {
        let lo = InterfaceAddress::new(addr("127.0.0.1")).with_netmask(addr("255.0.0.0"));
        let mut iface = NetworkInterface::new("lo".to_string(), 1, lo);
        iface.addresses.push(
            InterfaceAddress::new(addr("10.0.0.2"))
                .with_netmask(addr("255.255.255.0"))
                .with_broadcast(addr("10.0.0.255")),
        );
        assert_eq!(
            iface.to_string(),
            "lo (index 1): 127.0.0.1/8, 10.0.0.2/24 brd 10.0.0.255"
        );
    }

    #[test]
    fn test_helpers() {
        let iface = NetworkInterface::new(
            "eth0".to_string(),
            2,
            InterfaceAddress::new(addr("10.0.0.2")),
        );
        assert_eq!(iface.display_name, "eth0");
        assert!(iface.has_address(&addr("10.0.0.2")));
        assert!(!iface.has_address(&addr("10.0.0.3")));
        assert!(!iface.is_loopback());
        assert_eq!(iface.unicast_addresses().count(), 1);
    }
}
