//! Address Module
//!
//! Provides a unified value type for IPv4 and IPv6 endpoints. Both families
//! are stored in one fixed 16-byte buffer in network byte order; IPv4
//! addresses use the IPv4-mapped-IPv6 layout (10 zero bytes, two 0xff bytes,
//! then the 4 IPv4 bytes), which makes translation between the families and
//! dual-stack operation straightforward. Ports are accepted in host order
//! and stored in network order.

use std::fmt::{self, Write};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

use socket2::{Domain, SockAddr};

use crate::errors::{Error, ErrorCode};

/// Socket protocol selector
///
/// Chooses which native address family and byte layout apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketProtocol {
    /// IPv4
    Ipv4,
    /// IPv6
    Ipv6,
}

impl From<SocketProtocol> for Domain {
    fn from(protocol: SocketProtocol) -> Self {
        match protocol {
            SocketProtocol::Ipv4 => Domain::IPV4,
            SocketProtocol::Ipv6 => Domain::IPV6,
        }
    }
}

/// Unified socket address
///
/// An immutable, copyable value holding one IPv4 or IPv6 endpoint. The
/// protocol tag decides how the 16 address bytes are interpreted: callers
/// must consult [`protocol`](SocketAddress::protocol) before choosing
/// between the [`ipv4_host_order`](SocketAddress::ipv4_host_order) accessor
/// and the full [`ipv6`](SocketAddress::ipv6) view — both are always
/// populated but only one is semantically valid per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketAddress {
    // Address bytes in network order; mapped-IPv4 layout when the tag is Ipv4.
    octets: [u8; Self::IPV6_SIZE],
    // Port in network order.
    port: u16,
    protocol: SocketProtocol,
}

impl SocketAddress {
    /// Size of an IPv6 address in bytes
    pub const IPV6_SIZE: usize = 16;

    /// Minimum text buffer length accepted by
    /// [`to_string_buf`](SocketAddress::to_string_buf)
    ///
    /// Large enough for the longest possible IPv6 text form; 64 bytes is
    /// recommended for headroom.
    pub const MIN_TEXT_BUFFER: usize = 46;

    /// Create an address from a raw IPv4 value and port, both in host order
    pub fn new_v4(ipv4: u32, port: u16) -> Self {
        let mut octets = [0u8; Self::IPV6_SIZE];
        octets[10] = 0xff;
        octets[11] = 0xff;
        octets[12..16].copy_from_slice(&ipv4.to_be_bytes());

        Self {
            octets,
            port: port.to_be(),
            protocol: SocketProtocol::Ipv4,
        }
    }

    /// Create an address from raw IPv6 bytes (network order) and a host-order port
    pub fn new_v6(octets: [u8; Self::IPV6_SIZE], port: u16) -> Self {
        Self {
            octets,
            port: port.to_be(),
            protocol: SocketProtocol::Ipv6,
        }
    }

    /// Parse an address from text, with port zero
    ///
    /// Accepts exactly the platform textual forms for the family: dotted
    /// decimal for IPv4, colon-hex (with optional embedded dotted-decimal
    /// suffix for mapped addresses) for IPv6.
    ///
    /// # Returns
    ///
    /// * `Ok(SocketAddress)` - Parsed address
    /// * `Err(Error)` - `ErrorCode::AddressConversion` on malformed input
    pub fn from_string(protocol: SocketProtocol, text: &str) -> Result<Self, Error> {
        Self::from_string_with_port(protocol, text, 0)
    }

    /// Parse an address from text on the specified host-order port
    ///
    /// # Returns
    ///
    /// * `Ok(SocketAddress)` - Parsed address
    /// * `Err(Error)` - `ErrorCode::AddressConversion` on malformed input
    pub fn from_string_with_port(
        protocol: SocketProtocol,
        text: &str,
        port: u16,
    ) -> Result<Self, Error> {
        match protocol {
            SocketProtocol::Ipv4 => text
                .parse::<Ipv4Addr>()
                .map(|ip| Self::new_v4(u32::from(ip), port))
                .map_err(|_| Error::new(ErrorCode::AddressConversion, 0)),
            SocketProtocol::Ipv6 => text
                .parse::<Ipv6Addr>()
                .map(|ip| Self::new_v6(ip.octets(), port))
                .map_err(|_| Error::new(ErrorCode::AddressConversion, 0)),
        }
    }

    /// Wildcard ("all interfaces") address for the family, with port zero
    pub fn any(protocol: SocketProtocol) -> Self {
        Self::any_with_port(protocol, 0)
    }

    /// Wildcard ("all interfaces") address for the family, with the
    /// specified host-order port
    pub fn any_with_port(protocol: SocketProtocol, port: u16) -> Self {
        match protocol {
            SocketProtocol::Ipv4 => Self::new_v4(u32::from(Ipv4Addr::UNSPECIFIED), port),
            SocketProtocol::Ipv6 => Self::new_v6(Ipv6Addr::UNSPECIFIED.octets(), port),
        }
    }

    /// Loopback address for the family, with port zero
    pub fn loopback(protocol: SocketProtocol) -> Self {
        Self::loopback_with_port(protocol, 0)
    }

    /// Loopback address for the family, with the specified host-order port
    pub fn loopback_with_port(protocol: SocketProtocol, port: u16) -> Self {
        match protocol {
            SocketProtocol::Ipv4 => Self::new_v4(u32::from(Ipv4Addr::LOCALHOST), port),
            SocketProtocol::Ipv6 => Self::new_v6(Ipv6Addr::LOCALHOST.octets(), port),
        }
    }

    /// Get the protocol tag
    pub fn protocol(&self) -> SocketProtocol {
        self.protocol
    }

    /// Get the port in host order
    pub fn port_host_order(&self) -> u16 {
        u16::from_be(self.port)
    }

    /// Get the port in network order
    pub fn port_network_order(&self) -> u16 {
        self.port
    }

    /// Get the 16-byte IPv6-form view of the address
    ///
    /// When the tag is [`SocketProtocol::Ipv4`], this is the mapped layout.
    pub fn ipv6(&self) -> &[u8; Self::IPV6_SIZE] {
        &self.octets
    }

    /// Get the raw IPv4 value in host order
    ///
    /// Meaningful only when the tag is [`SocketProtocol::Ipv4`]; for an
    /// IPv6-tagged address this reads the final 4 address bytes.
    pub fn ipv4_host_order(&self) -> u32 {
        u32::from_be_bytes([
            self.octets[12],
            self.octets[13],
            self.octets[14],
            self.octets[15],
        ])
    }

    /// Render the address into a caller-owned buffer
    ///
    /// The buffer must hold the longest possible IPv6 text form
    /// ([`MIN_TEXT_BUFFER`](SocketAddress::MIN_TEXT_BUFFER) bytes minimum,
    /// 64 recommended). Returns a view into the buffer on success.
    ///
    /// # Returns
    ///
    /// * `Ok(&str)` - Rendered text, a prefix of `buffer`
    /// * `Err(Error)` - `ErrorCode::AddressConversion` if the buffer is too small
    pub fn to_string_buf<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a str, Error> {
        let mut cursor = BufCursor { buffer, written: 0 };

        let rendered = match self.protocol {
            SocketProtocol::Ipv4 => {
                write!(cursor, "{}", Ipv4Addr::from(self.ipv4_host_order()))
            }
            SocketProtocol::Ipv6 => write!(cursor, "{}", Ipv6Addr::from(self.octets)),
        };

        if rendered.is_err() {
            return Err(Error::new(ErrorCode::AddressConversion, 0));
        }

        let BufCursor { buffer, written } = cursor;
        std::str::from_utf8(&buffer[..written])
            .map_err(|_| Error::new(ErrorCode::AddressConversion, 0))
    }

    /// Translate into the native address structure of the given family
    ///
    /// The requested protocol is the socket's own, not the address tag: an
    /// IPv6 (dual-stack) socket addresses mapped-IPv4 peers through the
    /// IPv6-sized structure.
    pub(crate) fn to_native(&self, protocol: SocketProtocol) -> SockAddr {
        match protocol {
            SocketProtocol::Ipv4 => SockAddr::from(SocketAddrV4::new(
                Ipv4Addr::from(self.ipv4_host_order()),
                self.port_host_order(),
            )),
            SocketProtocol::Ipv6 => SockAddr::from(SocketAddrV6::new(
                Ipv6Addr::from(self.octets),
                self.port_host_order(),
                0,
                0,
            )),
        }
    }

    /// Translate back from a native address
    pub(crate) fn from_native(addr: &SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => Self::new_v4(u32::from(*v4.ip()), v4.port()),
            SocketAddr::V6(v6) => Self::new_v6(v6.ip().octets(), v6.port()),
        }
    }
}

impl fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.protocol {
            SocketProtocol::Ipv4 => write!(f, "{}", Ipv4Addr::from(self.ipv4_host_order())),
            SocketProtocol::Ipv6 => write!(f, "{}", Ipv6Addr::from(self.octets)),
        }
    }
}

// Bounded cursor so the std formatter can write into a caller-owned buffer.
struct BufCursor<'a> {
    buffer: &'a mut [u8],
    written: usize,
}

impl Write for BufCursor<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = self.written + bytes.len();
        if end > self.buffer.len() {
            return Err(fmt::Error);
        }

        self.buffer[self.written..end].copy_from_slice(bytes);
        self.written = end;
        Ok(())
    }
}

/// Received datagram
///
/// Pairs the sender's address with a view into the caller-provided receive
/// buffer, truncated to the bytes actually received. Never independently
/// allocated; the lifetime is bounded by the caller's buffer.
#[derive(Debug)]
pub struct Packet<'a> {
    /// Address the datagram came from
    pub address: SocketAddress,
    /// View into the caller's buffer holding the datagram contents
    pub payload: &'a [u8],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v4_round_trip() {
        let address = SocketAddress::new_v4(0x7f000001, 4242);

        assert_eq!(address.protocol(), SocketProtocol::Ipv4);
        assert_eq!(address.ipv4_host_order(), 0x7f000001);
        assert_eq!(address.port_host_order(), 4242);
        assert_eq!(address.port_network_order(), 4242u16.to_be());
    }

    #[test]
    fn test_v4_mapped_layout() {
        let address = SocketAddress::new_v4(0xc0a80101, 80);
        let view = address.ipv6();

        assert_eq!(&view[..10], &[0u8; 10]);
        assert_eq!(&view[10..12], &[0xff, 0xff]);
        assert_eq!(&view[12..], &[0xc0, 0xa8, 0x01, 0x01]);
    }

    #[test]
    fn test_v6_round_trip() {
        let octets: [u8; 16] = [
            0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01,
        ];
        let address = SocketAddress::new_v6(octets, 8080);

        assert_eq!(address.protocol(), SocketProtocol::Ipv6);
        assert_eq!(address.ipv6(), &octets);
        assert_eq!(address.port_host_order(), 8080);
    }

    #[test]
    fn test_from_string_v4() {
        let address = SocketAddress::from_string(SocketProtocol::Ipv4, "127.0.0.1").unwrap();
        assert_eq!(address.protocol(), SocketProtocol::Ipv4);
        assert_eq!(address.ipv4_host_order(), 0x7f000001);
        assert_eq!(address.port_host_order(), 0);
    }

    #[test]
    fn test_from_string_v6_mapped() {
        let address =
            SocketAddress::from_string(SocketProtocol::Ipv6, "::ffff:127.0.0.1").unwrap();
        assert_eq!(address.protocol(), SocketProtocol::Ipv6);

        let view = address.ipv6();
        assert_eq!(&view[..10], &[0u8; 10]);
        assert_eq!(&view[10..12], &[0xff, 0xff]);
        assert_eq!(&view[12..], &[127, 0, 0, 1]);
    }

    #[test]
    fn test_from_string_invalid() {
        let invalid = SocketAddress::from_string(SocketProtocol::Ipv4, "should fail");
        assert_eq!(invalid.unwrap_err(), ErrorCode::AddressConversion);

        let invalid = SocketAddress::from_string(SocketProtocol::Ipv6, "should fail");
        assert_eq!(invalid.unwrap_err(), ErrorCode::AddressConversion);

        let invalid = SocketAddress::from_string(SocketProtocol::Ipv4, "this should fail");
        assert_eq!(invalid.unwrap_err(), ErrorCode::AddressConversion);

        let invalid = SocketAddress::from_string(SocketProtocol::Ipv6, "this should fail");
        assert_eq!(invalid.unwrap_err(), ErrorCode::AddressConversion);
    }

    #[test]
    fn test_from_string_with_port() {
        let address =
            SocketAddress::from_string_with_port(SocketProtocol::Ipv4, "10.0.0.1", 9000).unwrap();
        assert_eq!(address.ipv4_host_order(), 0x0a000001);
        assert_eq!(address.port_host_order(), 9000);
    }

    #[test]
    fn test_to_string_round_trip_v4() {
        let mut buffer = [0u8; 64];

        let address = SocketAddress::from_string(SocketProtocol::Ipv4, "127.0.0.1").unwrap();
        let text = address.to_string_buf(&mut buffer).unwrap();
        assert_eq!(text, "127.0.0.1");

        let reparsed = SocketAddress::from_string(SocketProtocol::Ipv4, "127.0.0.1").unwrap();
        assert_eq!(reparsed, address);
    }

    #[test]
    fn test_to_string_round_trip_v6() {
        let mut buffer = [0u8; 64];

        let address =
            SocketAddress::from_string(SocketProtocol::Ipv6, "::ffff:127.0.0.1").unwrap();
        let text = address.to_string_buf(&mut buffer).unwrap();
        assert_eq!(text, "::ffff:127.0.0.1");

        let reparsed = SocketAddress::from_string(SocketProtocol::Ipv6, text).unwrap();
        assert_eq!(reparsed.ipv6(), address.ipv6());
    }

    #[test]
    fn test_to_string_buffer_too_small() {
        let mut buffer = [0u8; 4];
        let address = SocketAddress::new_v4(0xc0a80101, 0);

        let result = address.to_string_buf(&mut buffer);
        assert_eq!(result.unwrap_err(), ErrorCode::AddressConversion);
    }

    #[test]
    fn test_any() {
        let v4 = SocketAddress::any(SocketProtocol::Ipv4);
        assert_eq!(v4.ipv4_host_order(), 0);
        assert_eq!(v4.port_host_order(), 0);

        let v6 = SocketAddress::any_with_port(SocketProtocol::Ipv6, 7000);
        assert_eq!(v6.ipv6(), &[0u8; 16]);
        assert_eq!(v6.port_host_order(), 7000);
    }

    #[test]
    fn test_loopback() {
        let v4 = SocketAddress::loopback_with_port(SocketProtocol::Ipv4, 5000);
        assert_eq!(v4.ipv4_host_order(), 0x7f000001);
        assert_eq!(v4.port_host_order(), 5000);

        let v6 = SocketAddress::loopback(SocketProtocol::Ipv6);
        assert_eq!(v6.ipv6(), &Ipv6Addr::LOCALHOST.octets());
    }

    #[test]
    fn test_display_matches_buffer_rendering() {
        let mut buffer = [0u8; 64];
        let address = SocketAddress::new_v4(0x0a000001, 0);

        assert_eq!(
            address.to_string(),
            address.to_string_buf(&mut buffer).unwrap()
        );
    }

    #[test]
    fn test_native_translation_v4_through_v6_socket() {
        // A mapped-IPv4 address sent through an IPv6 socket uses the
        // IPv6-sized structure with the mapped form.
        let address = SocketAddress::new_v4(0x7f000001, 4000);
        let native = address.to_native(SocketProtocol::Ipv6);

        let round_trip = native.as_socket().unwrap();
        match round_trip {
            SocketAddr::V6(v6) => {
                assert_eq!(v6.ip().octets(), *address.ipv6());
                assert_eq!(v6.port(), 4000);
            }
            SocketAddr::V4(_) => panic!("expected an IPv6 structure"),
        }
    }

    #[test]
    fn test_native_translation_v4() {
        let address = SocketAddress::new_v4(0xc0a80105, 5555);
        let native = address.to_native(SocketProtocol::Ipv4);

        match native.as_socket().unwrap() {
            SocketAddr::V4(v4) => {
                assert_eq!(*v4.ip(), Ipv4Addr::new(192, 168, 1, 5));
                assert_eq!(v4.port(), 5555);
            }
            SocketAddr::V6(_) => panic!("expected an IPv4 structure"),
        }
    }

    #[test]
    fn test_native_round_trip() {
        let v4: SocketAddr = "192.168.1.5:6000".parse().unwrap();
        let address = SocketAddress::from_native(&v4);
        assert_eq!(address.protocol(), SocketProtocol::Ipv4);
        assert_eq!(address.ipv4_host_order(), 0xc0a80105);
        assert_eq!(address.port_host_order(), 6000);

        let v6: SocketAddr = "[2001:db8::1]:6001".parse().unwrap();
        let address = SocketAddress::from_native(&v6);
        assert_eq!(address.protocol(), SocketProtocol::Ipv6);
        assert_eq!(address.port_host_order(), 6001);
    }

    #[test]
    fn test_value_identity_equality() {
        let a = SocketAddress::new_v4(0x7f000001, 80);
        let b = SocketAddress::new_v4(0x7f000001, 80);
        let c = SocketAddress::new_v4(0x7f000001, 81);

        assert_eq!(a, b);
        assert_ne!(a, c);

        // Same bytes, different tag: distinct values.
        let mapped = SocketAddress::new_v6(*a.ipv6(), 80);
        assert_ne!(a, mapped);
    }
}
