//! Receiver configuration.

use serde::{Deserialize, Serialize};

/// Per-receiver crawl options, read once when the receiver is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverOptions {
    /// Dispatch to this receiver on sub-sites, not only root sites.
    ///
    /// Default: true.
    pub include_sub_sites: bool,

    /// Dispatch to this receiver on hidden lists.
    ///
    /// Default: false.
    pub include_hidden_lists: bool,
}

impl Default for ReceiverOptions {
    fn default() -> Self {
        Self {
            include_sub_sites: true,
            include_hidden_lists: false,
        }
    }
}

impl ReceiverOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether sub-sites are included.
    pub fn with_sub_sites(mut self, include: bool) -> Self {
        self.include_sub_sites = include;
        self
    }

    /// Set whether hidden lists are included.
    pub fn with_hidden_lists(mut self, include: bool) -> Self {
        self.include_hidden_lists = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReceiverOptions::default();
        assert!(options.include_sub_sites);
        assert!(!options.include_hidden_lists);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: ReceiverOptions =
            serde_json::from_str(r#"{ "include_hidden_lists": true }"#).unwrap();
        assert!(options.include_sub_sites);
        assert!(options.include_hidden_lists);
    }
}
