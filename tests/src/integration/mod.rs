//! Cross-crate flows over the in-memory transport.

pub mod flows;
pub mod replay;
