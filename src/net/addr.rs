use std::ffi::CString;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::net::family::AddressFamily;
use crate::sys::{self, Pton};

/// Size of the canonical address buffer
pub const MAX_ADDR_SIZE: usize = 16;
/// Size of an IPv4 address
pub const INADDRSZ: usize = 4;
/// Starting offset of an IPv4 address inside the canonical buffer
pub const IPV4_OFFSET: usize = MAX_ADDR_SIZE - INADDRSZ;

const NOT_VALID: &str = "IP address is not valid.";

/// An Internet Protocol (IP) address, IPv4 or IPv6.
///
/// Both families share one 16-byte network-order buffer. An IPv4 address
/// occupies the last four bytes and the first twelve are zero; an IPv6
/// address occupies all sixteen.
///
/// Equality compares the buffer, the family and the scope index, so
/// `10.9.8.7` and the IPv4-compatible `::10.9.8.7` are different values.
#[derive(Clone, Copy, Debug)]
pub struct InetAddress {
    bytes: [u8; MAX_ADDR_SIZE],
    family: AddressFamily,
    scope_index: u32,
    ipv4_compatible: bool,
}

impl Default for InetAddress {
    /// An undefined address with `AddressFamily::Unspecified`.
    fn default() -> Self {
        InetAddress {
            bytes: [0; MAX_ADDR_SIZE],
            family: AddressFamily::Unspecified,
            scope_index: 0,
            ipv4_compatible: true,
        }
    }
}

impl InetAddress {
    /// Parses the textual form of an IP address.
    ///
    /// A colon selects IPv6, anything else is tried as IPv4. The conversion
    /// itself is done by the platform's `inet_pton`.
    pub fn parse(text: &str) -> Result<InetAddress> {
        InetAddress::parse_with_scope(text, 0)
    }

    /// Parses the textual form of an IP address, attaching `scope_index`
    /// if the result is IPv6. The scope index refers to a local interface.
    pub fn parse_with_scope(text: &str, scope_index: u32) -> Result<InetAddress> {
        let c_text = CString::new(text).map_err(|_| Error::invalid_address(text, NOT_VALID))?;
        if !text.contains(':') {
            match sys::inet_pton_v4(&c_text) {
                Ok(Pton::Parsed(octets)) => Ok(InetAddress::from_octets_v4(octets)),
                Ok(Pton::Invalid) => Err(Error::invalid_address(text, NOT_VALID)),
                Err(e) => Err(Error::invalid_address(text, e.to_string())),
            }
        } else {
            match sys::inet_pton_v6(&c_text) {
                Ok(Pton::Parsed(octets)) => Ok(InetAddress::from_octets_v6(octets, scope_index)),
                Ok(Pton::Invalid) => Err(Error::invalid_address(text, NOT_VALID)),
                Err(e) => Err(Error::invalid_address(text, e.to_string())),
            }
        }
    }

    /// Creates an IPv4 address from its network-order octets.
    pub const fn from_octets_v4(octets: [u8; 4]) -> InetAddress {
        let mut bytes = [0u8; MAX_ADDR_SIZE];
        bytes[IPV4_OFFSET] = octets[0];
        bytes[IPV4_OFFSET + 1] = octets[1];
        bytes[IPV4_OFFSET + 2] = octets[2];
        bytes[IPV4_OFFSET + 3] = octets[3];
        InetAddress {
            bytes,
            family: AddressFamily::Ipv4,
            scope_index: 0,
            ipv4_compatible: true,
        }
    }

    /// Creates an IPv6 address from its network-order octets and scope index.
    pub const fn from_octets_v6(octets: [u8; 16], scope_index: u32) -> InetAddress {
        InetAddress {
            bytes: octets,
            family: AddressFamily::Ipv6,
            scope_index,
            ipv4_compatible: is_v4_compat(&octets),
        }
    }

    /// Creates an address from an unchecked raw buffer in network order.
    ///
    /// Four bytes give an IPv4 address (the scope index is dropped), sixteen
    /// bytes an IPv6 address. Any other length is out of range.
    pub fn from_raw(raw: &[u8], scope_index: u32) -> Result<InetAddress> {
        if let Ok(octets) = <[u8; 4]>::try_from(raw) {
            return Ok(InetAddress::from_octets_v4(octets));
        }
        if let Ok(octets) = <[u8; 16]>::try_from(raw) {
            return Ok(InetAddress::from_octets_v6(octets, scope_index));
        }
        Err(Error::OutOfRange { len: raw.len() })
    }

    /// Creates an IPv4 address from a raw `in_addr`.
    pub fn from_in_addr(raw: &libc::in_addr) -> InetAddress {
        InetAddress::from_octets_v4(raw.s_addr.to_ne_bytes())
    }

    /// Creates an IPv6 address from a raw `in6_addr`.
    pub fn from_in6_addr(raw: &libc::in6_addr, scope_index: u32) -> InetAddress {
        InetAddress::from_octets_v6(raw.s6_addr, scope_index)
    }

    /// Returns the first non-loopback address bound to a local interface.
    ///
    /// Interfaces are enumerated with [`Registry::system`](crate::interface::Registry::system).
    pub fn local_host() -> Result<InetAddress> {
        crate::interface::Registry::system().local_host()
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// Scope index of an IPv6 address; 0 for IPv4.
    pub fn scope_index(&self) -> u32 {
        self.scope_index
    }

    /// `true` for IPv4 addresses and for IPv4-compatible IPv6 addresses (`::a.b.c.d`).
    pub fn is_ipv4_compatible(&self) -> bool {
        self.ipv4_compatible
    }

    pub fn is_ipv4(&self) -> bool {
        self.family == AddressFamily::Ipv4
    }

    pub fn is_ipv6(&self) -> bool {
        self.family == AddressFamily::Ipv6
    }

    /// The whole canonical buffer, zero-filled where unused.
    pub fn as_bytes(&self) -> &[u8; MAX_ADDR_SIZE] {
        &self.bytes
    }

    /// The meaningful octets: 4 for IPv4, 16 for IPv6, none for an unspecified address.
    pub fn octets(&self) -> &[u8] {
        match self.family {
            AddressFamily::Ipv4 => &self.bytes[IPV4_OFFSET..],
            AddressFamily::Ipv6 => &self.bytes[..],
            AddressFamily::Unspecified => &[],
        }
    }

    fn v4(&self) -> [u8; 4] {
        [
            self.bytes[IPV4_OFFSET],
            self.bytes[IPV4_OFFSET + 1],
            self.bytes[IPV4_OFFSET + 2],
            self.bytes[IPV4_OFFSET + 3],
        ]
    }

    /// Raw IPv4 address in `in_addr` form (last four bytes of the buffer).
    pub fn to_in_addr(&self) -> libc::in_addr {
        sys::in_addr_from_octets(self.v4())
    }

    /// Raw IPv6 address in `in6_addr` form.
    pub fn to_in6_addr(&self) -> libc::in6_addr {
        sys::in6_addr_from_octets(self.bytes)
    }

    /// Converts to a standard library address. Unspecified addresses have no counterpart.
    pub fn to_ip_addr(&self) -> Option<IpAddr> {
        match self.family {
            AddressFamily::Ipv4 => Some(IpAddr::V4(Ipv4Addr::from(self.v4()))),
            AddressFamily::Ipv6 => Some(IpAddr::V6(Ipv6Addr::from(self.bytes))),
            AddressFamily::Unspecified => None,
        }
    }

    /// Checks if this is a wildcard address.
    pub fn is_any_local(&self) -> bool {
        match self.family {
            AddressFamily::Ipv4 => self.v4() == [0, 0, 0, 0],
            AddressFamily::Ipv6 => self.bytes.iter().all(|b| *b == 0),
            AddressFamily::Unspecified => false,
        }
    }

    pub fn is_loopback(&self) -> bool {
        match self.family {
            AddressFamily::Ipv4 => self.bytes[IPV4_OFFSET] == 127,
            AddressFamily::Ipv6 => {
                self.bytes[..15].iter().all(|b| *b == 0) && self.bytes[15] == 0x01
            }
            AddressFamily::Unspecified => false,
        }
    }

    pub fn is_multicast(&self) -> bool {
        match self.family {
            AddressFamily::Ipv4 => (self.bytes[IPV4_OFFSET] & 0xf0) == 0xe0,
            AddressFamily::Ipv6 => self.bytes[0] == 0xff,
            AddressFamily::Unspecified => false,
        }
    }

    /// Checks if this is a link-local unicast address.
    pub fn is_link_local(&self) -> bool {
        match self.family {
            AddressFamily::Ipv4 => {
                let o = self.v4();
                o[0] == 169 && o[1] == 254
            }
            AddressFamily::Ipv6 => self.bytes[0] == 0xfe && (self.bytes[1] & 0xc0) == 0x80,
            AddressFamily::Unspecified => false,
        }
    }

    /// Checks if this is a site-local unicast address.
    ///
    /// For IPv4 this is `10/8`, `172.16/16` and `192.168/16`. Only the first
    /// `/16` of the `172.16/12` block is matched.
    pub fn is_site_local(&self) -> bool {
        match self.family {
            AddressFamily::Ipv4 => {
                let o = self.v4();
                o[0] == 10 || (o[0] == 172 && o[1] == 16) || (o[0] == 192 && o[1] == 168)
            }
            AddressFamily::Ipv6 => self.bytes[0] == 0xfe && (self.bytes[1] & 0xc0) == 0xc0,
            AddressFamily::Unspecified => false,
        }
    }

    /// Checks if this is a multicast address of global scope.
    pub fn is_multicast_global(&self) -> bool {
        match self.family {
            AddressFamily::Ipv4 => {
                let o = self.v4();
                (224..=238).contains(&o[0]) && !(o[0] == 224 && o[1] == 0 && o[2] == 0)
            }
            AddressFamily::Ipv6 => self.v6_multicast_scope() == Some(0x0e),
            AddressFamily::Unspecified => false,
        }
    }

    /// Checks if this is a node-local multicast address. Never true for IPv4.
    pub fn is_multicast_node_local(&self) -> bool {
        self.v6_multicast_scope() == Some(0x01)
    }

    pub fn is_multicast_link_local(&self) -> bool {
        match self.family {
            AddressFamily::Ipv4 => {
                let o = self.v4();
                o[0] == 224 && o[1] == 0 && o[2] == 0
            }
            AddressFamily::Ipv6 => self.v6_multicast_scope() == Some(0x02),
            AddressFamily::Unspecified => false,
        }
    }

    pub fn is_multicast_site_local(&self) -> bool {
        match self.family {
            AddressFamily::Ipv4 => {
                let o = self.v4();
                o[0] == 239 && o[1] == 255
            }
            AddressFamily::Ipv6 => self.v6_multicast_scope() == Some(0x05),
            AddressFamily::Unspecified => false,
        }
    }

    pub fn is_multicast_org_local(&self) -> bool {
        match self.family {
            AddressFamily::Ipv4 => {
                let o = self.v4();
                o[0] == 239 && (192..=195).contains(&o[1])
            }
            AddressFamily::Ipv6 => self.v6_multicast_scope() == Some(0x08),
            AddressFamily::Unspecified => false,
        }
    }

    /// Scope nibble of an IPv6 multicast address.
    fn v6_multicast_scope(&self) -> Option<u8> {
        if self.family == AddressFamily::Ipv6 && self.bytes[0] == 0xff {
            Some(self.bytes[1] & 0x0f)
        } else {
            None
        }
    }

    /// Returns the address in textual presentation.
    ///
    /// IPv6 addresses with a scope index get a `%<index>` suffix. An
    /// unspecified address renders as an empty string.
    pub fn host_address(&self) -> String {
        match self.family {
            AddressFamily::Ipv4 => sys::inet_ntop_v4(&self.v4()).unwrap_or_default(),
            AddressFamily::Ipv6 => match sys::inet_ntop_v6(&self.bytes) {
                Some(text) if self.scope_index != 0 => format!("{}%{}", text, self.scope_index),
                Some(text) => text,
                None => String::new(),
            },
            AddressFamily::Unspecified => String::new(),
        }
    }
}

/// `IN6_IS_ADDR_V4COMPAT`: first 96 bits zero and the last 32 bits above 1.
const fn is_v4_compat(octets: &[u8; 16]) -> bool {
    let mut i = 0;
    while i < IPV4_OFFSET {
        if octets[i] != 0 {
            return false;
        }
        i += 1;
    }
    let tail = u32::from_be_bytes([octets[12], octets[13], octets[14], octets[15]]);
    tail > 1
}

impl PartialEq for InetAddress {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
            && self.family == other.family
            && self.scope_index == other.scope_index
    }
}

impl Eq for InetAddress {}

// Must agree with `PartialEq`: the compatibility flag is derived from the bytes.
impl Hash for InetAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
        self.family.hash(state);
        self.scope_index.hash(state);
    }
}

impl fmt::Display for InetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host_address())
    }
}

impl FromStr for InetAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InetAddress::parse(s)
    }
}

impl From<Ipv4Addr> for InetAddress {
    fn from(addr: Ipv4Addr) -> Self {
        InetAddress::from_octets_v4(addr.octets())
    }
}

impl From<Ipv6Addr> for InetAddress {
    fn from(addr: Ipv6Addr) -> Self {
        InetAddress::from_octets_v6(addr.octets(), 0)
    }
}

impl From<IpAddr> for InetAddress {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

#[cfg(feature = "serde")]
impl InetAddress {
    /// Inverse of `host_address`: accepts the `%<index>` suffix and the empty
    /// rendering of an unspecified address.
    fn from_presentation(text: &str) -> Result<InetAddress> {
        if text.is_empty() {
            return Ok(InetAddress::default());
        }
        match text.split_once('%') {
            Some((host, scope)) if host.contains(':') => {
                let scope_index = scope
                    .parse::<u32>()
                    .map_err(|_| Error::invalid_address(text, "invalid scope index"))?;
                InetAddress::parse_with_scope(host, scope_index)
            }
            Some(_) => Err(Error::invalid_address(text, NOT_VALID)),
            None => InetAddress::parse(text),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for InetAddress {
    /// Serializes the textual form, or `(octets, scope_index)` for binary formats.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            (self.octets(), self.scope_index).serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for InetAddress {
    /// Deserializes through the same validation as parsing, so the canonical
    /// layout always holds.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            InetAddress::from_presentation(&text).map_err(de::Error::custom)
        } else {
            let (octets, scope_index) = <(Vec<u8>, u32)>::deserialize(deserializer)?;
            if octets.is_empty() {
                return Ok(InetAddress::default());
            }
            InetAddress::from_raw(&octets, scope_index).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(text: &str) -> InetAddress {
        InetAddress::parse(text).unwrap()
    }

    #[test]
    fn test_parse_family() {
        assert_eq!(v4("10.1.0.1").family(), AddressFamily::Ipv4);
        let addr = InetAddress::parse("1080:0:0:0:8:800:200C:417A").unwrap();
        assert_eq!(addr.family(), AddressFamily::Ipv6);
        let raw = InetAddress::parse("1080::8:800:200c:417a").unwrap();
        assert_eq!(addr, raw);
    }

    #[test]
    fn test_parse_rejects_malformed_ipv4() {
        for text in [
            "10.1.0.1.x",
            "...",
            "z.x.c.v",
            "zxcv",
            "333.333.333.333",
            "255.255.255.256",
            "",
        ] {
            match InetAddress::parse(text) {
                Err(Error::InvalidAddress { input, .. }) => assert_eq!(input, text),
                other => panic!("{:?} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_parse_rejects_malformed_ipv6() {
        for text in [
            "1080:0:0:0:8:800:200c:417a:ggg",
            ":::::::::::",
            "ghyi:f:56:0rtt:8h:8zz:zzzc:417a",
            "g:g:g:g:g:g:g:g",
            "1080:0:0:0:8:800:200c:417z",
        ] {
            assert!(matches!(
                InetAddress::parse(text),
                Err(Error::InvalidAddress { .. })
            ));
        }
    }

    #[test]
    fn test_parse_rejects_interior_nul() {
        assert!(InetAddress::parse("10.0.0.1\0").is_err());
    }

    #[test]
    fn test_render_roundtrip() {
        for text in ["202.8.42.178", "0.0.0.0", "255.255.255.255", "127.0.0.1"] {
            assert_eq!(v4(text).to_string(), text);
        }
        assert_eq!(InetAddress::parse("ff01::43").unwrap().to_string(), "ff01::43");
        assert_ne!(v4("202.8.42.178").to_string(), "203.3.43.211");
    }

    #[test]
    fn test_render_scope_suffix() {
        let addr = InetAddress::parse_with_scope("fe80::1", 2).unwrap();
        assert_eq!(addr.to_string(), "fe80::1%2");
        assert_eq!(addr.scope_index(), 2);
        // scope is ignored for IPv4
        let addr = InetAddress::parse_with_scope("10.0.0.1", 2).unwrap();
        assert_eq!(addr.scope_index(), 0);
        assert_eq!(addr.to_string(), "10.0.0.1");
    }

    #[test]
    fn test_canonical_layout() {
        let addr = v4("10.9.8.7");
        let mut expected = [0u8; 16];
        expected[12..].copy_from_slice(&[10, 9, 8, 7]);
        assert_eq!(addr.as_bytes(), &expected);
        assert_eq!(addr.octets(), &[10, 9, 8, 7]);
        assert!(InetAddress::default().octets().is_empty());
        assert_eq!(InetAddress::default().to_string(), "");
    }

    #[test]
    fn test_from_raw() {
        assert_eq!(InetAddress::from_raw(&[127, 0, 0, 1], 5).unwrap(), v4("127.0.0.1"));
        let mut loopback6 = [0u8; 16];
        loopback6[15] = 1;
        let addr = InetAddress::from_raw(&loopback6, 0).unwrap();
        assert_eq!(addr, InetAddress::parse("::1").unwrap());
        match InetAddress::from_raw(&[1, 2, 3], 0) {
            Err(Error::OutOfRange { len }) => assert_eq!(len, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_raw_structs_roundtrip() {
        let addr = v4("127.0.0.1");
        let raw = addr.to_in_addr();
        assert_eq!(InetAddress::from_in_addr(&raw), addr);

        let addr6 = InetAddress::parse_with_scope("fe80::1", 4).unwrap();
        let raw6 = addr6.to_in6_addr();
        assert_eq!(InetAddress::from_in6_addr(&raw6, 4), addr6);
        assert_ne!(InetAddress::from_in6_addr(&raw6, 0), addr6);
    }

    #[test]
    fn test_any_local() {
        let addr = InetAddress::from_octets_v4([0, 0, 0, 0]);
        assert!(addr.is_any_local());
        assert!(!addr.is_loopback());
        assert!(!addr.is_multicast());
        assert!(!addr.is_link_local());
        assert!(!addr.is_site_local());
        assert!(InetAddress::parse("::").unwrap().is_any_local());
        assert!(!InetAddress::default().is_any_local());
    }

    #[test]
    fn test_loopback() {
        assert!(v4("127.0.0.0").is_loopback());
        assert!(!v4("127.0.0.0").is_any_local());
        assert!(InetAddress::parse("::1").unwrap().is_loopback());
        assert!(InetAddress::parse("0:0:0:0:0:0:0:1").unwrap().is_loopback());
        assert!(!InetAddress::parse("::2").unwrap().is_loopback());
    }

    #[test]
    fn test_multicast() {
        let addr = v4("224.0.0.0");
        assert!(addr.is_multicast());
        assert!(!addr.is_any_local());
        assert!(!addr.is_link_local());
        assert!(v4("239.255.255.255").is_multicast());
        assert!(!v4("240.0.0.0").is_multicast());
        assert!(InetAddress::parse("ff01:0:0:0:0:0:0:43").unwrap().is_multicast());
    }

    #[test]
    fn test_link_local() {
        let addr = v4("169.254.0.0");
        assert!(addr.is_link_local());
        assert!(!addr.is_site_local());
        assert!(InetAddress::parse("fe80::1").unwrap().is_link_local());
        assert!(!InetAddress::parse("fec0::1").unwrap().is_link_local());
    }

    #[test]
    fn test_site_local() {
        assert!(v4("10.254.0.0").is_site_local());
        assert!(v4("172.16.0.0").is_site_local());
        assert!(v4("192.168.0.0").is_site_local());
        // only the first /16 of 172.16/12
        assert!(!v4("172.17.0.1").is_site_local());
        assert!(InetAddress::parse("fec0::1").unwrap().is_site_local());
    }

    #[test]
    fn test_multicast_scopes_ipv4() {
        let min = v4("224.0.1.0");
        assert!(min.is_multicast_global() && min.is_multicast());
        assert!(!min.is_site_local());
        let max = v4("238.255.255.255");
        assert!(max.is_multicast_global() && max.is_multicast());

        let link = v4("224.0.0.0");
        assert!(link.is_multicast_link_local());
        assert!(!link.is_multicast_global());

        let site = v4("239.255.0.0");
        assert!(site.is_multicast_site_local());
        assert!(!site.is_multicast_global());
        assert!(!site.is_multicast_link_local());

        for text in ["239.192.0.0", "239.195.0.0"] {
            let org = v4(text);
            assert!(org.is_multicast_org_local());
            assert!(!org.is_multicast_global());
            assert!(!org.is_multicast_site_local());
        }
        assert!(!v4("239.196.0.0").is_multicast_org_local());
        assert!(!InetAddress::from_octets_v4([0, 0, 0, 0]).is_multicast_node_local());
        assert!(!v4("224.0.0.1").is_multicast_node_local());
    }

    #[test]
    fn test_multicast_scopes_ipv6() {
        let p = |t: &str| InetAddress::parse(t).unwrap();
        assert!(p("ff0e::1").is_multicast_global());
        assert!(p("ff01::1").is_multicast_node_local());
        assert!(p("ff02::1").is_multicast_link_local());
        assert!(p("ff05::1").is_multicast_site_local());
        assert!(p("ff08::1").is_multicast_org_local());
        assert!(!p("fe02::1").is_multicast_link_local());
        assert!(!p("ff02::1").is_multicast_global());
    }

    #[test]
    fn test_equality() {
        assert_eq!(v4("10.1.0.158"), v4("10.1.0.158"));
        let raw = InetAddress::from_octets_v4([10, 1, 0, 159]);
        assert_eq!(raw, v4("10.1.0.159"));
        assert_ne!(v4("10.1.0.157"), v4("202.8.42.157"));

        let a = v4("127.0.0.1");
        let b = a;
        let c = b;
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_ne!(a, v4("1.1.1.1"));
    }

    #[test]
    fn test_ipv4_embedded_equality() {
        let p = |t: &str| InetAddress::parse(t).unwrap();
        assert_eq!(p("::ffff:10.1.0.1"), p("::ffff:0a01:0001"));
        assert_eq!(p("::10.9.8.7"), p("::0a09:0807"));
        // family participates in equality
        assert_ne!(v4("10.9.8.7"), p("::10.9.8.7"));
        assert_ne!(v4("10.9.8.7"), p("::0a09:0807"));
        assert_eq!(v4("10.9.8.7").as_bytes(), p("::10.9.8.7").as_bytes());
    }

    #[test]
    fn test_ipv4_compatible() {
        let p = |t: &str| InetAddress::parse(t).unwrap();
        assert!(v4("10.9.8.7").is_ipv4_compatible());
        assert!(p("::0a09:0807").is_ipv4_compatible());
        assert!(p("::10.9.8.7").is_ipv4_compatible());
        assert!(!p("::ffff:10.9.8.7").is_ipv4_compatible());
        assert!(!p("::1").is_ipv4_compatible());
        assert!(!p("::").is_ipv4_compatible());
        assert!(!p("2001:db8::1").is_ipv4_compatible());
    }

    #[test]
    fn test_std_conversions() {
        let addr: InetAddress = Ipv4Addr::new(192, 168, 1, 1).into();
        assert_eq!(addr, v4("192.168.1.1"));
        assert_eq!(addr.to_ip_addr(), Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))));
        let addr6: InetAddress = IpAddr::V6(Ipv6Addr::LOCALHOST).into();
        assert!(addr6.is_loopback());
        assert_eq!(InetAddress::default().to_ip_addr(), None);
        let parsed: InetAddress = "10.0.0.1".parse().unwrap();
        assert!(parsed.is_ipv4());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let addr = InetAddress::parse_with_scope("fe80::1", 3).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"fe80::1%3\"");
        let back: InetAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
        assert_eq!(back.scope_index(), 3);

        let v4: InetAddress = serde_json::from_str("\"10.9.8.7\"").unwrap();
        assert_eq!(v4, InetAddress::from_octets_v4([10, 9, 8, 7]));
        assert!(v4.is_ipv4_compatible());
        let compat: InetAddress = serde_json::from_str("\"::10.9.8.7\"").unwrap();
        assert!(compat.is_ipv6() && compat.is_ipv4_compatible());
        let none: InetAddress = serde_json::from_str("\"\"").unwrap();
        assert_eq!(none, InetAddress::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_non_canonical_payloads() {
        let fields = r#"{"bytes":[9,0,0,0,0,0,0,0,0,0,0,0,10,9,8,7],"family":"Ipv4","scope_index":0,"ipv4_compatible":true}"#;
        assert!(serde_json::from_str::<InetAddress>(fields).is_err());
        for text in ["\"10.9.8.7%2\"", "\"fe80::1%x\"", "\"333.1.1.1\"", "[10,9,8,7]"] {
            assert!(serde_json::from_str::<InetAddress>(text).is_err(), "{}", text);
        }
    }

    #[test]
    fn test_equality_ignores_derived_flag() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(addr: &InetAddress) -> u64 {
            let mut hasher = DefaultHasher::new();
            addr.hash(&mut hasher);
            hasher.finish()
        }

        let addr = v4("10.9.8.7");
        let flipped = InetAddress {
            ipv4_compatible: false,
            ..addr
        };
        assert_eq!(addr, flipped);
        assert_eq!(hash_of(&addr), hash_of(&flipped));
        let rescoped = InetAddress::parse_with_scope("fe80::1", 1).unwrap();
        assert_ne!(rescoped, InetAddress::parse_with_scope("fe80::1", 2).unwrap());
    }
}
