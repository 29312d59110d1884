//! Domain entities representing core business objects.

pub mod account;
pub mod contact;
pub mod verification_token;

// Re-export commonly used types
pub use account::{Account, ban, TIER_ADMIN_THRESHOLD, TIER_DEFAULT, TIER_SUPERUSER};
pub use contact::{Contact, ContactChannel};
pub use verification_token::{VerificationToken, CODE_LENGTH, TOKEN_TTL_SECONDS};
