use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to {retailer} ({url}) failed: {source}")]
    Http {
        retailer: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {retailer} ({url})")]
    UnexpectedStatus {
        retailer: String,
        url: String,
        status: u16,
    },

    #[error("JSON deserialization error for {retailer} ({url}): {source}")]
    Deserialize {
        retailer: String,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("station data not ready: {failed} of {total} retailer feeds failed and no earlier data exists")]
    NotReady { failed: usize, total: usize },
}

impl FeedError {
    /// Returns `true` for errors confined to a single retailer endpoint.
    #[must_use]
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            FeedError::Http { .. } | FeedError::UnexpectedStatus { .. } | FeedError::Deserialize { .. }
        )
    }
}
