//! Configuration utilities (port, env vars)

use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
};

/// Socket address to bind the server to.
///
/// Reads the `PORT` env var or defaults to 8080, binds to 0.0.0.0.
pub fn server_addr() -> SocketAddr {
    addr_from_port(env::var("PORT").ok().as_deref())
}

fn addr_from_port(port: Option<&str>) -> SocketAddr {
    let port = port.and_then(|v| v.parse::<u16>().ok()).unwrap_or(8080);
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_to_8080() {
        assert_eq!(addr_from_port(None).port(), 8080);
        assert_eq!(addr_from_port(Some("not-a-port")).port(), 8080);
    }

    #[test]
    fn port_is_read_when_valid() {
        let addr = addr_from_port(Some("9000"));
        assert_eq!(addr.port(), 9000);
        assert!(addr.ip().is_unspecified());
    }
}
