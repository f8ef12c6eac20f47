//! Socket API Lifecycle Module
//!
//! Brackets process-wide network-subsystem startup and teardown. The Rust
//! standard library performs Winsock startup internally on first socket use,
//! so construction is a no-op on every supported platform; the handle and
//! its [`Result`] signature are kept so callers have one place that scopes
//! all socket use and a stable contract if a platform ever requires explicit
//! startup again.

use log::debug;

use crate::errors::Error;

/// Socket API lifecycle handle
///
/// Construct one instance bracketing all socket use and keep it alive for
/// the duration. Moving the handle transfers the "initialized" flag so
/// teardown runs at most once. The type documents, rather than enforces,
/// single-instance discipline: the underlying subsystem is a process-wide
/// resource, and the handle must not be constructed or destroyed
/// concurrently without external synchronization.
#[derive(Debug)]
pub struct SocketApi {
    initialized: bool,
}

impl SocketApi {
    /// Initialize the socket API
    ///
    /// # Returns
    ///
    /// * `Ok(SocketApi)` - Live handle; drop it to tear the subsystem down
    /// * `Err(Error)` - `ErrorCode::ApiInitialization` where platform startup fails
    pub fn new() -> Result<Self, Error> {
        debug!("socket API initialized");
        Ok(Self { initialized: true })
    }
}

impl Drop for SocketApi {
    fn drop(&mut self) {
        if self.initialized {
            self.initialized = false;
            debug!("socket API torn down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_construction() {
        let api = SocketApi::new();
        assert!(api.is_ok());
    }

    #[test]
    fn test_api_move_transfers_ownership() {
        let api = SocketApi::new().unwrap();
        let moved = api;
        drop(moved);
    }
}
