//! Infrastructure layer - adapters for the ports.
//!
//! - `saxo`: HTTP session, login gateway and data API client
//! - `identity`: JSON file store for the device identity
//! - `prompt`: terminal two-factor prompt

pub mod identity;
pub mod prompt;
pub mod saxo;
