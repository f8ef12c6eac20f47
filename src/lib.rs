//! Minimal cross-platform UDP datagram-socket library
//!
//! Provides non-blocking UDP sockets over a unified address representation
//! for IPv4 and IPv6, with structured error reporting that preserves the
//! native diagnostic code.
//!
//! ## Overview
//!
//! The crate provides:
//! - **[`SocketAddress`]**: one value type for both families, stored in the
//!   IPv4-mapped-IPv6 byte layout in network byte order
//! - **[`Socket`]**: a move-only, non-blocking UDP socket with bind,
//!   local-address query, send, and recv
//! - **[`SocketApi`]**: a lifecycle handle bracketing process-wide socket
//!   API startup and teardown
//! - **[`Error`]/[`ErrorCode`]**: failure classification paired with the
//!   raw socket API diagnostic
//!
//! ## Usage
//!
//! ```no_run
//! use datagram_socket::{Socket, SocketAddress, SocketApi, SocketFlags, SocketProtocol};
//!
//! let _api = SocketApi::new().expect("socket API");
//!
//! let receiver = Socket::new(SocketProtocol::Ipv4, SocketFlags::empty()).expect("socket");
//! receiver
//!     .bind(SocketAddress::any(SocketProtocol::Ipv4))
//!     .expect("bind");
//!
//! let port = receiver.address().expect("address").port_host_order();
//!
//! let sender = Socket::new(SocketProtocol::Ipv4, SocketFlags::empty()).expect("socket");
//! sender
//!     .send(
//!         SocketAddress::loopback_with_port(SocketProtocol::Ipv4, port),
//!         b"hello there",
//!     )
//!     .expect("send");
//!
//! let mut buffer = [0u8; 64];
//! match receiver.recv(&mut buffer) {
//!     Ok(packet) => println!("{} bytes from {}", packet.payload.len(), packet.address),
//!     Err(e) if e == datagram_socket::ErrorCode::WouldBlock => { /* poll again */ }
//!     Err(e) => panic!("{e}"),
//! }
//! ```
//!
//! ## Concurrency
//!
//! No internal scheduler, thread, or event loop exists: every operation is a
//! direct synchronous call into the host networking facility. Distinct
//! sockets may be driven from distinct threads; a single socket assumes one
//! active owner at a time. Wait/poll/backoff loops are the caller's job.

pub mod address;
pub mod api;
pub mod errors;
pub mod flags;
pub mod socket;

pub use address::{Packet, SocketAddress, SocketProtocol};
pub use api::SocketApi;
pub use errors::{Error, ErrorCode};
pub use flags::SocketFlags;
pub use socket::Socket;
