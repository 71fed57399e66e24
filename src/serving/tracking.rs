//! Tracking references handed to clients

/// Base used when no tracking URL is configured
pub const DEFAULT_TRACKING_BASE_URL: &str = "http://localhost:3000";

/// Builds stable tracking links from sequence numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingLinks {
    base_url: String,
}

impl Default for TrackingLinks {
    fn default() -> Self {
        Self::new(DEFAULT_TRACKING_BASE_URL)
    }
}

impl TrackingLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Tracking reference for a sequence number
    pub fn reference(&self, sequence_number: u64) -> String {
        format!("{}/track/{}", self.base_url, sequence_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_is_deterministic() {
        let links = TrackingLinks::new("https://queue.example.org");
        assert_eq!(links.reference(42), "https://queue.example.org/track/42");
        assert_eq!(links.reference(42), links.reference(42));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let links = TrackingLinks::new("https://queue.example.org/clinic/ ");
        assert_eq!(links.reference(1), "https://queue.example.org/clinic/track/1");
    }

    #[test]
    fn test_default_base() {
        assert_eq!(
            TrackingLinks::default().reference(3),
            "http://localhost:3000/track/3"
        );
    }
}
