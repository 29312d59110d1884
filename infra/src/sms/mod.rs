//! External SMS verification provider implementations.

pub mod twilio;

pub use twilio::{TwilioVerifyConfig, TwilioVerifyService};
