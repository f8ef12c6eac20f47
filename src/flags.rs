//! Socket Flags Module
//!
//! Named boolean options for socket construction, combinable via set
//! operations (union, intersection, difference, complement) with a simple
//! membership query.

use bitflags::bitflags;

bitflags! {
    /// Socket configuration flags
    ///
    /// Combine flags with `|` and test membership with
    /// [`contains`](SocketFlags::contains). `SocketFlags::empty()` requests
    /// no optional behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SocketFlags: u32 {
        /// Configure an IPv6 socket to also accept IPv4-mapped traffic
        const DUAL_STACK = 0b0001;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_contains_nothing() {
        let flags = SocketFlags::empty();
        assert!(!flags.contains(SocketFlags::DUAL_STACK));
        assert!(flags.is_empty());
    }

    #[test]
    fn test_union_membership() {
        let flags = SocketFlags::empty() | SocketFlags::DUAL_STACK;
        assert!(flags.contains(SocketFlags::DUAL_STACK));
    }

    #[test]
    fn test_set_operations() {
        let all = SocketFlags::all();
        let none = SocketFlags::empty();

        assert_eq!(all & none, none);
        assert_eq!(all | none, all);
        assert_eq!(all - SocketFlags::DUAL_STACK, none);
        assert_eq!(!none, all);
        assert_eq!(all ^ SocketFlags::DUAL_STACK, none);
    }
}
