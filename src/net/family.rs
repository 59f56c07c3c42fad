use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Address family of an [`InetAddress`](crate::net::addr::InetAddress).
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AddressFamily {
    /// No address has been assigned
    #[default]
    Unspecified,
    /// IP version 4
    Ipv4,
    /// IP version 6
    Ipv6,
}

impl AddressFamily {
    /// Returns the OS-native family identifier (`AF_UNSPEC`, `AF_INET`, `AF_INET6`)
    pub fn to_raw(self) -> libc::c_int {
        match self {
            AddressFamily::Unspecified => libc::AF_UNSPEC,
            AddressFamily::Ipv4 => libc::AF_INET,
            AddressFamily::Ipv6 => libc::AF_INET6,
        }
    }

    /// Maps an OS-native family identifier back to an `AddressFamily`.
    /// Families other than the three IP ones return `None`.
    pub fn from_raw(raw: libc::c_int) -> Option<AddressFamily> {
        match raw {
            libc::AF_UNSPEC => Some(AddressFamily::Unspecified),
            libc::AF_INET => Some(AddressFamily::Ipv4),
            libc::AF_INET6 => Some(AddressFamily::Ipv6),
            _ => None,
        }
    }

    /// Returns a short name of the family
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFamily::Unspecified => "unspecified",
            AddressFamily::Ipv4 => "ipv4",
            AddressFamily::Ipv6 => "ipv6",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_roundtrip() {
        for family in [
            AddressFamily::Unspecified,
            AddressFamily::Ipv4,
            AddressFamily::Ipv6,
        ] {
            assert_eq!(AddressFamily::from_raw(family.to_raw()), Some(family));
        }
    }

    #[test]
    fn test_non_ip_family() {
        assert_eq!(AddressFamily::from_raw(libc::AF_UNIX), None);
    }

    #[test]
    fn test_default_is_unspecified() {
        assert_eq!(AddressFamily::default(), AddressFamily::Unspecified);
        assert_eq!(AddressFamily::Ipv6.to_string(), "ipv6");
    }
}
