//! Local image serving: loopback HTTP listener, public tunnel, and the small
//! config file that drives both.

pub mod config;
pub mod http;
pub mod tunnel;
