//! Configuration for the verification flows

use vouch_shared::config::ThrottleWindows;

/// Configuration for the verification flows
#[derive(Debug, Clone, Default)]
pub struct VerificationConfig {
    /// Throttle windows for both gates
    pub windows: ThrottleWindows,
}
