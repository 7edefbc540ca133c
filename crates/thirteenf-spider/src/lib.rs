pub mod config;
pub mod error;
pub mod fs;
pub mod funds;
pub mod holdings;
pub mod overlap;
pub mod pacer;
pub mod stock;
pub mod template;
pub(crate) mod tui;

pub use config::FetchConfig;
pub use error::{FundFailure, PartialFailure, SpiderError, TemplateError};
pub use funds::{FundList, FundSpec, Group};
pub use holdings::{FundSnapshot, HoldingRecord, HoldingsDocument, SnapshotStatus};
pub use stock::sec::{fetch, fetch_with};

/// Shortcut for required API elements.
pub mod http {
    pub(crate) use dotenv::var;
    pub use reqwest::Client as HttpClient;

    use crate::config::FetchConfig;
    use crate::error::SpiderError;
    use reqwest::StatusCode;
    use std::future::Future;

    /// Anything that can GET a URL and hand back the raw body.
    ///
    /// [`EdgarClient`] is the real implementation; tests swap in canned responses.
    pub trait Transport {
        fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, SpiderError>> + Send;
    }

    /// [`reqwest::Client`] configured for the SEC's fair access policy: a declared
    /// `User-Agent`, gzip, and a request timeout.
    #[derive(Clone, Debug)]
    pub struct EdgarClient {
        http: HttpClient,
    }

    impl EdgarClient {
        pub fn new(config: &FetchConfig) -> Result<Self, SpiderError> {
            let http = reqwest::ClientBuilder::new()
                .user_agent(&config.user_agent)
                .timeout(config.timeout)
                .gzip(true)
                .build()?;
            Ok(Self { http })
        }
    }

    impl Transport for EdgarClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, SpiderError> {
            let response = self.http.get(url).send().await?;

            match response.status() {
                StatusCode::NOT_FOUND => Err(SpiderError::NotFound(url.to_string())),
                StatusCode::TOO_MANY_REQUESTS => Err(SpiderError::RateLimited(url.to_string())),
                status if !status.is_success() => Err(SpiderError::Http {
                    status: status.as_u16(),
                    url: url.to_string(),
                }),
                _ => Ok(response.bytes().await?.to_vec()),
            }
        }
    }
}

/// Formats the time elapsed since `time` for log lines.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:?}", time.elapsed())
}
