use std::ffi::{CStr, CString};
use std::io;
use std::mem;
use std::os::raw::c_char;

use crate::net::addr::InetAddress;

// Not exported by the libc crate.
extern "C" {
    fn inet_pton(af: libc::c_int, src: *const c_char, dst: *mut libc::c_void) -> libc::c_int;
    fn inet_ntop(
        af: libc::c_int,
        src: *const libc::c_void,
        dst: *mut c_char,
        size: libc::socklen_t,
    ) -> *const c_char;
}

const INET_ADDRSTRLEN: usize = 16;
const INET6_ADDRSTRLEN: usize = 46;

/// Outcome of a presentation-to-network conversion.
pub(crate) enum Pton<const N: usize> {
    Parsed([u8; N]),
    Invalid,
}

/// Converts `text` with `inet_pton` for `family`, writing `N` network-order bytes.
fn pton<const N: usize>(family: libc::c_int, text: &CStr) -> io::Result<Pton<N>> {
    let mut dst = [0u8; N];
    let res = unsafe {
        inet_pton(
            family,
            text.as_ptr(),
            dst.as_mut_ptr() as *mut libc::c_void,
        )
    };
    match res {
        1 => Ok(Pton::Parsed(dst)),
        0 => Ok(Pton::Invalid),
        _ => Err(io::Error::last_os_error()),
    }
}

pub(crate) fn inet_pton_v4(text: &CString) -> io::Result<Pton<4>> {
    pton::<4>(libc::AF_INET, text)
}

pub(crate) fn inet_pton_v6(text: &CString) -> io::Result<Pton<16>> {
    pton::<16>(libc::AF_INET6, text)
}

fn ntop<const L: usize>(family: libc::c_int, src: &[u8]) -> Option<String> {
    let mut dst = [0 as c_char; L];
    let ret = unsafe {
        inet_ntop(
            family,
            src.as_ptr() as *const libc::c_void,
            dst.as_mut_ptr(),
            L as libc::socklen_t,
        )
    };
    if ret.is_null() {
        return None;
    }
    let text = unsafe { CStr::from_ptr(dst.as_ptr()) };
    Some(text.to_string_lossy().into_owned())
}

pub(crate) fn inet_ntop_v4(octets: &[u8; 4]) -> Option<String> {
    ntop::<INET_ADDRSTRLEN>(libc::AF_INET, octets)
}

pub(crate) fn inet_ntop_v6(octets: &[u8; 16]) -> Option<String> {
    ntop::<INET6_ADDRSTRLEN>(libc::AF_INET6, octets)
}

pub(crate) enum SockaddrRef<'a> {
    V4(&'a libc::sockaddr_in),
    V6(&'a libc::sockaddr_in6),
}

impl<'a> SockaddrRef<'a> {
    /// # Safety
    /// - `sa` must be null or point to a readable `sockaddr` whose full
    ///   family-specific structure (`sockaddr_in` / `sockaddr_in6`) is in bounds.
    pub(crate) unsafe fn from_raw(sa: *const libc::sockaddr) -> Option<Self> {
        if sa.is_null() {
            return None;
        }
        match unsafe { (*sa).sa_family as libc::c_int } {
            libc::AF_INET => {
                let sin = unsafe { &*(sa as *const libc::sockaddr_in) };
                Some(SockaddrRef::V4(sin))
            }
            libc::AF_INET6 => {
                let sin6 = unsafe { &*(sa as *const libc::sockaddr_in6) };
                Some(SockaddrRef::V6(sin6))
            }
            _ => None,
        }
    }

    /// Address carried by the sockaddr. IPv6 keeps the kernel scope id,
    /// which is 0 for global unicasts and the interface index for link-local ones.
    #[inline]
    pub(crate) fn to_inet_address(&self) -> InetAddress {
        match self {
            SockaddrRef::V4(sin) => InetAddress::from_in_addr(&sin.sin_addr),
            SockaddrRef::V6(sin6) => InetAddress::from_in6_addr(&sin6.sin6_addr, sin6.sin6_scope_id),
        }
    }

    /// Same as `to_inet_address` but without a scope. Used for netmasks and broadcasts.
    #[inline]
    pub(crate) fn to_unscoped(&self) -> InetAddress {
        match self {
            SockaddrRef::V4(sin) => InetAddress::from_in_addr(&sin.sin_addr),
            SockaddrRef::V6(sin6) => InetAddress::from_in6_addr(&sin6.sin6_addr, 0),
        }
    }
}

/// Reads a netmask from a `sockaddr`.
///
/// # Safety
/// `sa` must be null or point to a readable `sockaddr` as returned by the OS.
#[cfg(not(any(
    target_vendor = "apple",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
pub(crate) unsafe fn netmask_autolen(sa: *const libc::sockaddr) -> Option<InetAddress> {
    unsafe { SockaddrRef::from_raw(sa) }.map(|sa_ref| sa_ref.to_unscoped())
}

/// Reads a netmask from a BSD/Darwin `sockaddr` whose real length is in `sa_len`.
/// The kernel trims trailing zero bytes from masks, so short structures are accepted.
///
/// # Safety
/// `sa` must be null or point to at least `sa_len` readable bytes.
#[cfg(any(
    target_vendor = "apple",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub(crate) unsafe fn netmask_autolen(sa: *const libc::sockaddr) -> Option<InetAddress> {
    if sa.is_null() {
        return None;
    }
    let sa_dr = unsafe { *sa };
    let sa_len = sa_dr.sa_len as usize;
    if sa_len == 0 {
        return None;
    }
    let base = sa as *const u8;

    match sa_dr.sa_family as libc::c_int {
        libc::AF_INET => {
            const OFF_SIN_ADDR: usize = 4;
            let mut bytes = [0u8; 4];
            if sa_len > OFF_SIN_ADDR {
                let n = (sa_len - OFF_SIN_ADDR).min(4);
                unsafe {
                    std::ptr::copy_nonoverlapping(base.add(OFF_SIN_ADDR), bytes.as_mut_ptr(), n)
                };
            }
            Some(InetAddress::from_octets_v4(bytes))
        }
        libc::AF_INET6 => {
            const OFF_SIN6_ADDR: usize = 8;
            let mut bytes = [0u8; 16];
            if sa_len > OFF_SIN6_ADDR {
                let n = (sa_len - OFF_SIN6_ADDR).min(16);
                unsafe {
                    std::ptr::copy_nonoverlapping(base.add(OFF_SIN6_ADDR), bytes.as_mut_ptr(), n)
                };
            }
            Some(InetAddress::from_octets_v6(bytes, 0))
        }
        _ => None,
    }
}

/// Resolves the kernel index of an interface by name. Returns 0 if unknown.
pub(crate) fn if_nametoindex(name: &str) -> u32 {
    match CString::new(name) {
        Ok(c_name) => unsafe { libc::if_nametoindex(c_name.as_ptr()) },
        Err(_) => 0,
    }
}

/// Reads the NUL-terminated interface name at `ptr`.
///
/// # Safety
/// `ptr` must point to a valid NUL-terminated C string.
pub(crate) unsafe fn c_name_to_string(ptr: *const c_char) -> String {
    let bytes = unsafe { CStr::from_ptr(ptr).to_bytes() };
    String::from_utf8_lossy(bytes).into_owned()
}

/// Builds an `in_addr` from network-order octets.
pub(crate) fn in_addr_from_octets(octets: [u8; 4]) -> libc::in_addr {
    let mut raw: libc::in_addr = unsafe { mem::zeroed() };
    raw.s_addr = u32::from_ne_bytes(octets);
    raw
}

/// Builds an `in6_addr` from network-order octets.
pub(crate) fn in6_addr_from_octets(octets: [u8; 16]) -> libc::in6_addr {
    let mut raw: libc::in6_addr = unsafe { mem::zeroed() };
    raw.s6_addr = octets;
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pton_v4() {
        let text = CString::new("192.168.10.1").unwrap();
        match inet_pton_v4(&text).unwrap() {
            Pton::Parsed(bytes) => assert_eq!(bytes, [192, 168, 10, 1]),
            Pton::Invalid => panic!("valid address rejected"),
        }
        let bad = CString::new("192.168.10").unwrap();
        assert!(matches!(inet_pton_v4(&bad).unwrap(), Pton::Invalid));
    }

    #[test]
    fn test_ntop() {
        assert_eq!(inet_ntop_v4(&[10, 0, 0, 1]).as_deref(), Some("10.0.0.1"));
        let mut v6 = [0u8; 16];
        v6[15] = 1;
        assert_eq!(inet_ntop_v6(&v6).as_deref(), Some("::1"));
    }

    #[test]
    fn test_in_addr_keeps_network_order() {
        let raw = in_addr_from_octets([127, 0, 0, 1]);
        assert_eq!(raw.s_addr.to_ne_bytes(), [127, 0, 0, 1]);
    }

    #[test]
    fn test_sockaddr_v4() {
        let mut sin: libc::sockaddr_in = unsafe { mem::zeroed() };
        sin.sin_family = libc::AF_INET as libc::sa_family_t;
        sin.sin_addr = in_addr_from_octets([10, 1, 2, 3]);
        let sa_ref = unsafe { SockaddrRef::from_raw(&sin as *const _ as *const libc::sockaddr) };
        let addr = sa_ref.map(|s| s.to_inet_address());
        assert_eq!(addr, Some(InetAddress::from_octets_v4([10, 1, 2, 3])));
    }

    #[test]
    fn test_sockaddr_v6_keeps_scope() {
        let mut sin6: libc::sockaddr_in6 = unsafe { mem::zeroed() };
        sin6.sin6_family = libc::AF_INET6 as libc::sa_family_t;
        let mut octets = [0u8; 16];
        octets[0] = 0xfe;
        octets[1] = 0x80;
        octets[15] = 0x01;
        sin6.sin6_addr = in6_addr_from_octets(octets);
        sin6.sin6_scope_id = 3;
        let sa_ref = unsafe { SockaddrRef::from_raw(&sin6 as *const _ as *const libc::sockaddr) }
            .expect("ipv6 sockaddr");
        let addr = sa_ref.to_inet_address();
        assert_eq!(addr.scope_index(), 3);
        assert_eq!(sa_ref.to_unscoped().scope_index(), 0);
    }

    #[test]
    fn test_null_sockaddr() {
        assert!(unsafe { SockaddrRef::from_raw(std::ptr::null()) }.is_none());
        assert!(unsafe { netmask_autolen(std::ptr::null()) }.is_none());
    }

    #[test]
    fn test_loopback_index() {
        assert_eq!(if_nametoindex("no-such-interface0"), 0);
    }
}
