//! Repository interfaces for the durable store.
//!
//! All components serialize through the durable store; no in-memory
//! caching of `verified`/`primary` flags is permitted. Implementations
//! live in the infrastructure layer; mocks are provided for tests.

pub mod account;
pub mod contact;
pub mod spam_block;
pub mod token;

pub use account::AccountRepository;
pub use contact::ContactRepository;
pub use spam_block::SpamBlockRepository;
pub use token::TokenRepository;

#[cfg(test)]
pub use account::MockAccountRepository;
#[cfg(test)]
pub use contact::MockContactRepository;
#[cfg(test)]
pub use spam_block::MockSpamBlockRepository;
#[cfg(test)]
pub use token::MockTokenRepository;
