//! Socket Module
//!
//! Provides the UDP datagram socket. Sockets are created in non-blocking
//! mode, exclusively own their native resource, and translate between the
//! unified [`SocketAddress`] and the native structure sized for the socket's
//! own family. Every operation is a single synchronous call into the host
//! networking facility: nothing blocks, nothing retries, and would-block
//! conditions surface as the distinguished [`ErrorCode::WouldBlock`] signal.

use std::io;
use std::mem::MaybeUninit;
#[cfg(unix)]
use std::os::unix::io::{AsRawFd, RawFd};
#[cfg(windows)]
use std::os::windows::io::{AsRawSocket, RawSocket};

use log::{debug, trace};
use socket2::{Protocol as NativeProtocol, Socket as NativeSocket, Type};

use crate::address::{Packet, SocketAddress, SocketProtocol};
use crate::errors::{Error, ErrorCode};
use crate::flags::SocketFlags;

/// UDP datagram socket
///
/// Exclusively owns one native datagram resource; move-only, never cloned.
/// Dropping the socket releases the resource exactly once. An unbound socket
/// may send immediately (acquiring an implicit ephemeral local address);
/// receiving requires a prior [`bind`](Socket::bind).
///
/// A single instance assumes one active owner at a time; drive distinct
/// instances from distinct threads without coordination.
pub struct Socket {
    inner: NativeSocket,
    protocol: SocketProtocol,
}

impl Socket {
    /// Create a non-blocking UDP socket for the given family
    ///
    /// Passing [`SocketFlags::DUAL_STACK`] with [`SocketProtocol::Ipv6`]
    /// clears the v6-only restriction so IPv4-mapped traffic is accepted.
    /// Any failure during construction drops the partially created resource.
    ///
    /// # Returns
    ///
    /// * `Ok(Socket)` - Created socket, already in non-blocking mode
    /// * `Err(Error)` - `SocketCreation`, `DualStackUnavailable`, or
    ///   `ModeConfiguration` with the native diagnostic
    pub fn new(protocol: SocketProtocol, flags: SocketFlags) -> Result<Self, Error> {
        let inner = NativeSocket::new(protocol.into(), Type::DGRAM, Some(NativeProtocol::UDP))
            .map_err(|e| Error::from_io(ErrorCode::SocketCreation, &e))?;

        if protocol == SocketProtocol::Ipv6 && flags.contains(SocketFlags::DUAL_STACK) {
            inner
                .set_only_v6(false)
                .map_err(|e| Error::from_io(ErrorCode::DualStackUnavailable, &e))?;
        }

        inner
            .set_nonblocking(true)
            .map_err(|e| Error::from_io(ErrorCode::ModeConfiguration, &e))?;

        debug!("created non-blocking {:?} datagram socket", protocol);

        Ok(Self { inner, protocol })
    }

    /// Get the socket's protocol
    pub fn protocol(&self) -> SocketProtocol {
        self.protocol
    }

    /// Bind the socket to the provided address
    ///
    /// The address is translated into the native structure matching the
    /// socket's own protocol: an IPv6 (dual-stack) socket binds a
    /// mapped-IPv4 address through the IPv6-sized structure.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Success
    /// * `Err(Error)` - `ErrorCode::Bind` with the native diagnostic
    pub fn bind(&self, address: SocketAddress) -> Result<(), Error> {
        let native = address.to_native(self.protocol);
        self.inner
            .bind(&native)
            .map_err(|e| Error::from_io(ErrorCode::Bind, &e))?;

        debug!("bound {:?} socket to {}", self.protocol, address);
        Ok(())
    }

    /// Query the socket's current local address
    ///
    /// Meaningful once a local address exists, either through
    /// [`bind`](Socket::bind) or implicitly through a first send.
    ///
    /// # Returns
    ///
    /// * `Ok(SocketAddress)` - Local address, translated per the socket's protocol
    /// * `Err(Error)` - `ErrorCode::AddressQuery` with the native diagnostic
    pub fn address(&self) -> Result<SocketAddress, Error> {
        let native = self
            .inner
            .local_addr()
            .map_err(|e| Error::from_io(ErrorCode::AddressQuery, &e))?;

        let addr = native
            .as_socket()
            .ok_or_else(|| Error::new(ErrorCode::AddressQuery, 0))?;

        Ok(SocketAddress::from_native(&addr))
    }

    /// Send the buffer as one datagram to the destination
    ///
    /// Issues exactly one atomic datagram write of the full buffer. A
    /// non-blocking socket that cannot write immediately reports
    /// `ErrorCode::Send` carrying the native would-block diagnostic rather
    /// than suspending the caller.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Datagram handed to the host facility
    /// * `Err(Error)` - `ErrorCode::Send` with the native diagnostic
    pub fn send(&self, destination: SocketAddress, buffer: &[u8]) -> Result<(), Error> {
        let native = destination.to_native(self.protocol);
        let sent = self
            .inner
            .send_to(buffer, &native)
            .map_err(|e| Error::from_io(ErrorCode::Send, &e))?;

        trace!("sent {} byte datagram to {}", sent, destination);
        Ok(())
    }

    /// Attempt one non-blocking receive into the caller's buffer
    ///
    /// UDP delivers at most one datagram per call, never merged, never
    /// split; a datagram larger than the buffer is truncated to fit,
    /// following platform behavior. No internal buffering or retry.
    ///
    /// # Returns
    ///
    /// * `Ok(Packet)` - Sender address plus a view over the buffer truncated
    ///   to the bytes received
    /// * `Err(Error)` - `ErrorCode::WouldBlock` when nothing is queued
    ///   (expected transient signal, poll again), `ErrorCode::Recv` otherwise
    pub fn recv<'a>(&self, buffer: &'a mut [u8]) -> Result<Packet<'a>, Error> {
        // socket2 takes an uninitialized buffer; reuse the caller's storage.
        let uninit: &mut [MaybeUninit<u8>] = unsafe {
            std::slice::from_raw_parts_mut(buffer.as_mut_ptr() as *mut MaybeUninit<u8>, buffer.len())
        };

        match self.inner.recv_from(uninit) {
            Ok((received, source)) => {
                let addr = source
                    .as_socket()
                    .ok_or_else(|| Error::new(ErrorCode::Recv, 0))?;

                // recv_from initialized the first `received` bytes.
                let payload = &buffer[..received];
                let address = SocketAddress::from_native(&addr);

                trace!("received {} byte datagram from {}", received, address);

                Ok(Packet { address, payload })
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                Err(Error::from_io(ErrorCode::WouldBlock, &e))
            }
            Err(e) => Err(Error::from_io(ErrorCode::Recv, &e)),
        }
    }

    /// Get the raw file descriptor (Unix)
    ///
    /// Escape hatch for caller-side readiness polling; the library itself
    /// never waits.
    #[cfg(unix)]
    pub fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }

    /// Get the raw socket handle (Windows)
    #[cfg(windows)]
    pub fn as_raw_socket(&self) -> RawSocket {
        self.inner.as_raw_socket()
    }
}
