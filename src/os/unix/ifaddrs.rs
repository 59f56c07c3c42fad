use std::mem::MaybeUninit;

use tracing::{debug, trace};

use crate::error::Error;
use crate::interface::backend::{DiscoveredAddress, DiscoveryBackend};
use crate::interface::interface::InterfaceAddress;
use crate::net::family::AddressFamily;
use crate::sys::{self, SockaddrRef};

pub(crate) type GetIfAddrsFn = unsafe extern "C" fn(*mut *mut libc::ifaddrs) -> libc::c_int;
pub(crate) type FreeIfAddrsFn = unsafe extern "C" fn(*mut libc::ifaddrs);

/// Enumerates interfaces with `getifaddrs`.
///
/// The entry points are plain function pointers so they can come either
/// from static linkage or from a symbol lookup in the running process.
#[derive(Clone, Copy, Debug)]
pub struct IfAddrsBackend {
    getifaddrs: GetIfAddrsFn,
    freeifaddrs: FreeIfAddrsFn,
}

impl IfAddrsBackend {
    /// Backend bound to the statically linked libc entry points.
    pub fn new() -> IfAddrsBackend {
        IfAddrsBackend::with_fns(libc::getifaddrs, libc::freeifaddrs)
    }

    pub(crate) fn with_fns(getifaddrs: GetIfAddrsFn, freeifaddrs: FreeIfAddrsFn) -> IfAddrsBackend {
        IfAddrsBackend {
            getifaddrs,
            freeifaddrs,
        }
    }
}

impl Default for IfAddrsBackend {
    fn default() -> Self {
        IfAddrsBackend::new()
    }
}

/// Owns the list returned by `getifaddrs` and frees it on drop.
struct IfAddrsList {
    head: *mut libc::ifaddrs,
    freeifaddrs: FreeIfAddrsFn,
}

impl IfAddrsList {
    fn fetch(getifaddrs: GetIfAddrsFn, freeifaddrs: FreeIfAddrsFn) -> Result<IfAddrsList, Error> {
        let mut head: MaybeUninit<*mut libc::ifaddrs> = MaybeUninit::uninit();
        if unsafe { getifaddrs(head.as_mut_ptr()) } != 0 {
            return Err(Error::last_os_error("getifaddrs"));
        }
        Ok(IfAddrsList {
            head: unsafe { head.assume_init() },
            freeifaddrs,
        })
    }

    fn iter(&self) -> IfAddrsIter<'_> {
        IfAddrsIter {
            cur: self.head,
            _list: self,
        }
    }
}

impl Drop for IfAddrsList {
    fn drop(&mut self) {
        if !self.head.is_null() {
            unsafe { (self.freeifaddrs)(self.head) };
        }
    }
}

struct IfAddrsIter<'a> {
    cur: *mut libc::ifaddrs,
    _list: &'a IfAddrsList,
}

impl<'a> Iterator for IfAddrsIter<'a> {
    type Item = &'a libc::ifaddrs;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur.is_null() {
            return None;
        }
        // Entries stay valid while the owning list is alive.
        let entry: &'a libc::ifaddrs = unsafe { &*self.cur };
        self.cur = entry.ifa_next;
        Some(entry)
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn broadcast_ptr(entry: &libc::ifaddrs) -> *const libc::sockaddr {
    entry.ifa_ifu as *const libc::sockaddr
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn broadcast_ptr(entry: &libc::ifaddrs) -> *const libc::sockaddr {
    entry.ifa_dstaddr as *const libc::sockaddr
}

fn to_discovered(entry: &libc::ifaddrs) -> Option<DiscoveredAddress> {
    let name = unsafe { sys::c_name_to_string(entry.ifa_name) };
    if entry.ifa_addr.is_null() {
        trace!(interface = %name, "skipping entry without address");
        return None;
    }
    let family = unsafe { (*entry.ifa_addr).sa_family } as libc::c_int;
    match AddressFamily::from_raw(family) {
        Some(AddressFamily::Ipv4) | Some(AddressFamily::Ipv6) => {}
        _ => {
            trace!(interface = %name, family, "skipping non-IP entry");
            return None;
        }
    }
    let flags = entry.ifa_flags as libc::c_int;
    if flags & libc::IFF_UP == 0 {
        trace!(interface = %name, "skipping entry of interface that is down");
        return None;
    }

    let unicast = unsafe { SockaddrRef::from_raw(entry.ifa_addr) }?.to_inet_address();
    let netmask = unsafe { sys::netmask_autolen(entry.ifa_netmask) };
    let broadcast = if flags & libc::IFF_BROADCAST != 0 {
        unsafe { SockaddrRef::from_raw(broadcast_ptr(entry)) }.map(|sa| sa.to_unscoped())
    } else {
        None
    };
    let index = sys::if_nametoindex(&name);
    Some(DiscoveredAddress {
        name,
        index,
        address: InterfaceAddress {
            unicast,
            netmask,
            broadcast,
        },
    })
}

impl DiscoveryBackend for IfAddrsBackend {
    fn name(&self) -> &'static str {
        "getifaddrs"
    }

    fn discover(&self) -> Result<Vec<DiscoveredAddress>, Error> {
        let list = IfAddrsList::fetch(self.getifaddrs, self.freeifaddrs)?;
        let entries: Vec<DiscoveredAddress> = list.iter().filter_map(to_discovered).collect();
        debug!(entries = entries.len(), "getifaddrs enumeration complete");
        Ok(entries)
    }
}
