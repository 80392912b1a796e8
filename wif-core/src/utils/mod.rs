//! Helpers shared by classifiers.

pub mod ip_prefix;
pub mod timer;

pub use ip_prefix::{IpPrefix, IPV4_MAX_PREFIX_LENGTH, IPV6_MAX_PREFIX_LENGTH};
pub use timer::{Timer, TimerCallback};
