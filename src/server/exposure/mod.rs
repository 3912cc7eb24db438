//! API exposure modules
//!
//! An exposure consumes a `ProbeHost` and produces a Router for its protocol.

pub mod rest;

pub use rest::RestExposure;
