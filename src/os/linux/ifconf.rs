use std::io;
use std::mem;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use libc::{c_int, ifreq};
use tracing::{debug, trace};

use crate::error::Error;
use crate::interface::backend::{DiscoveredAddress, DiscoveryBackend};
use crate::interface::interface::InterfaceAddress;
use crate::net::addr::InetAddress;
use crate::sys::SockaddrRef;

/// Default number of `ifreq` slots offered to the first `SIOCGIFCONF` call.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Enumerates IPv4 interfaces with the `SIOCGIFCONF` ioctl.
///
/// The size of the result is not known in advance, so the buffer is grown
/// until two consecutive successful calls report the same length.
#[derive(Clone, Copy, Debug)]
pub struct IfConfBackend {
    initial_capacity: usize,
}

impl IfConfBackend {
    pub fn new() -> IfConfBackend {
        IfConfBackend {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }

    /// Sets the number of entries offered to the first request. Zero is treated as one.
    pub fn with_initial_capacity(mut self, entries: usize) -> IfConfBackend {
        self.initial_capacity = entries.max(1);
        self
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }
}

impl Default for IfConfBackend {
    fn default() -> Self {
        IfConfBackend::new()
    }
}

/// Grows a buffer until `query` reports the same filled length twice in a row.
///
/// `query` fills the slice and returns the number of entries written.
/// `EINVAL` before the first success means the buffer is too small; any
/// other error ends the loop. The returned vector holds the entries of the
/// last call.
pub(crate) fn converge<T, F>(initial: usize, zero: T, mut query: F) -> io::Result<Vec<T>>
where
    T: Clone,
    F: FnMut(&mut [T]) -> io::Result<usize>,
{
    let mut capacity = initial.max(1);
    let mut last_len: Option<usize> = None;
    loop {
        let mut buf = vec![zero.clone(); capacity];
        match query(&mut buf) {
            Ok(len) => {
                if last_len == Some(len) {
                    buf.truncate(len.min(capacity));
                    return Ok(buf);
                }
                last_len = Some(len);
            }
            Err(err) if last_len.is_none() && err.raw_os_error() == Some(libc::EINVAL) => {}
            Err(err) => return Err(err),
        }
        capacity = capacity.checked_mul(2).ok_or_else(|| {
            io::Error::new(io::ErrorKind::OutOfMemory, "interface buffer size overflow")
        })?;
        trace!(capacity, ?last_len, "growing SIOCGIFCONF buffer");
    }
}

fn control_socket() -> Result<OwnedFd, Error> {
    let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM | libc::SOCK_CLOEXEC, 0) };
    if fd < 0 {
        return Err(Error::last_os_error("socket"));
    }
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

fn query_ifconf(sock: &OwnedFd, buf: &mut [ifreq]) -> io::Result<usize> {
    let bytes = buf
        .len()
        .checked_mul(mem::size_of::<ifreq>())
        .and_then(|n| c_int::try_from(n).ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::OutOfMemory, "interface buffer size overflow"))?;
    let mut conf: libc::ifconf = unsafe { mem::zeroed() };
    conf.ifc_len = bytes;
    conf.ifc_ifcu.ifcu_req = buf.as_mut_ptr();
    let ret = unsafe { libc::ioctl(sock.as_raw_fd(), libc::SIOCGIFCONF as _, &mut conf) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(conf.ifc_len.max(0) as usize / mem::size_of::<ifreq>())
}

/// Issues a per-interface request on a copy of `name`'s `ifreq`.
fn query_entry(
    sock: &OwnedFd,
    name: &[libc::c_char; libc::IFNAMSIZ],
    request: libc::c_ulong,
    call: &'static str,
) -> Result<ifreq, Error> {
    let mut req: ifreq = unsafe { mem::zeroed() };
    req.ifr_name = *name;
    let ret = unsafe { libc::ioctl(sock.as_raw_fd(), request as _, &mut req) };
    if ret < 0 {
        return Err(Error::last_os_error(call));
    }
    Ok(req)
}

fn ifru_address(req: &ifreq) -> Option<InetAddress> {
    let sa = unsafe { &req.ifr_ifru.ifru_addr } as *const libc::sockaddr;
    unsafe { SockaddrRef::from_raw(sa) }.map(|sa_ref| sa_ref.to_unscoped())
}

fn ifr_name_to_string(name: &[libc::c_char; libc::IFNAMSIZ]) -> String {
    let bytes: Vec<u8> = name.iter().take_while(|c| **c != 0).map(|c| *c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

impl DiscoveryBackend for IfConfBackend {
    fn name(&self) -> &'static str {
        "SIOCGIFCONF"
    }

    fn discover(&self) -> Result<Vec<DiscoveredAddress>, Error> {
        let sock = control_socket()?;
        let zero: ifreq = unsafe { mem::zeroed() };
        let reqs = converge(self.initial_capacity, zero, |buf| query_ifconf(&sock, buf))
            .map_err(|e| Error::discovery("SIOCGIFCONF", e))?;

        let mut entries = Vec::with_capacity(reqs.len());
        for req in &reqs {
            let family = unsafe { req.ifr_ifru.ifru_addr.sa_family } as c_int;
            let name = ifr_name_to_string(&req.ifr_name);
            if family != libc::AF_INET {
                trace!(interface = %name, family, "skipping non-IPv4 entry");
                continue;
            }
            let Some(unicast) = ifru_address(req) else {
                continue;
            };

            let flags_req = query_entry(&sock, &req.ifr_name, libc::SIOCGIFFLAGS as _, "SIOCGIFFLAGS")?;
            let flags = unsafe { flags_req.ifr_ifru.ifru_flags } as c_int;
            if flags & libc::IFF_UP == 0 {
                trace!(interface = %name, "skipping entry of interface that is down");
                continue;
            }

            let mask_req =
                query_entry(&sock, &req.ifr_name, libc::SIOCGIFNETMASK as _, "SIOCGIFNETMASK")?;
            let netmask = ifru_address(&mask_req);

            let broadcast = if flags & libc::IFF_BROADCAST != 0 {
                let brd_req =
                    query_entry(&sock, &req.ifr_name, libc::SIOCGIFBRDADDR as _, "SIOCGIFBRDADDR")?;
                ifru_address(&brd_req)
            } else {
                None
            };

            let index_req =
                query_entry(&sock, &req.ifr_name, libc::SIOCGIFINDEX as _, "SIOCGIFINDEX")?;
            let index = unsafe { index_req.ifr_ifru.ifru_ifindex } as u32;

            entries.push(DiscoveredAddress {
                name,
                index,
                address: InterfaceAddress {
                    unicast,
                    netmask,
                    broadcast,
                },
            });
        }
        debug!(
            reported = reqs.len(),
            entries = entries.len(),
            "SIOCGIFCONF enumeration complete"
        );
        Ok(entries)
    }
}
