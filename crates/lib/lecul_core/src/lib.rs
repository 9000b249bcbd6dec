//! # lecul_core
//!
//! Core domain logic for Le Cul: personas, the completion client, the
//! fail-soft chat responder, and the client-side session model.

pub mod chat;
pub mod completion;
pub mod persona;
pub mod picker;
pub mod session;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
