//! Device identity persistence.

mod file_store;

pub use file_store::{FileIdentityStore, IDENTITY_FILENAME};
