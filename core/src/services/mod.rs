//! Business services containing domain logic and use cases.

pub mod account;
pub mod issuer;
pub mod notify;
pub mod resolver;
pub mod session;
pub mod throttle;
pub mod verification;

// Re-export commonly used types
pub use account::{AccountService, RegisterInput};
pub use issuer::TokenIssuer;
pub use notify::{Notification, NotificationDispatcher, Recipient, Template};
pub use resolver::VerificationResolver;
pub use session::SessionTokenService;
pub use throttle::SpamGuard;
pub use verification::{
    provider_codes, EmailTarget, EmailVerificationService, PhoneVerificationService,
    ProviderStatus, RequestCodeResult, SmsChannel, SmsVerifyProvider, VerificationConfig,
};
