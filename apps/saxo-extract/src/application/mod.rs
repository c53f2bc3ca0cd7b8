//! Application layer - ports and use cases.
//!
//! - `ports`: interfaces for the identity file, the provider's login and data
//!   endpoints, and the operator prompt
//! - `use_cases`: the login sequencer and the data extraction run

pub mod ports;
pub mod use_cases;
