//! Settings for the summary service.

use std::time::Duration;

/// The config for building and caching summaries.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// The symbol placed before every amount in report text.
    pub currency_symbol: String,
    /// How long to wait for each data-source call before giving up.
    pub fetch_timeout: Duration,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_owned(),
            fetch_timeout: Duration::from_secs(5),
        }
    }
}
