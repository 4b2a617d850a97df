//! Local network address discovery
//!
//! Developer convenience only: the startup banner prints the address a
//! phone on the same network can reach. A UDP connect never sends a
//! packet; it just asks the OS which interface would route there.

use std::net::{IpAddr, UdpSocket};

/// Best-effort local address as seen from the default route
pub fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ip_does_not_panic() {
        // Environment-dependent; a result of None is fine
        let _ = local_ip();
    }
}
