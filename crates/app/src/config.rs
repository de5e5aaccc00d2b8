//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use hamper::checkout::CheckoutPolicy;

/// Everything the session context needs beyond a database connection.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Tax and shipping policy applied at checkout.
    pub checkout: CheckoutPolicy,
    /// Durable storage tuning.
    pub persistence: PersistenceConfig,
}

/// Durable storage tuning.
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Directory holding the guest cart's serialized blob.
    pub local_dir: PathBuf,
    /// Upper bound on any single durable call; expiry surfaces as a
    /// persistence failure.
    pub durable_call_timeout: Duration,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            local_dir: PathBuf::from(".hamper"),
            durable_call_timeout: Duration::from_secs(10),
        }
    }
}
