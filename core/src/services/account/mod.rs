//! Account lifecycle: registration, authentication, contact management.

pub mod service;

#[cfg(test)]
mod tests;

pub use service::{AccountService, RegisterInput};
