use crate::error::SpiderError;
use crate::http::var;
use std::time::Duration;
use tracing::debug;

pub const DATA_URL: &str = "https://data.sec.gov";
pub const ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";

const DEFAULT_USER_AGENT: &str = "thirteenf/0.1 (contact@example.com)";

// SEC fair access: at most 10 requests per second. The interval must be
// strictly longer, or 11 requests fit a closed one-second window.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// Settings for talking to EDGAR.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    /// Sent on every request; the SEC rejects anonymous clients.
    pub user_agent: String,
    pub data_url: String,
    pub archives_url: String,

    /// Fixed gap enforced between any two requests.
    pub request_interval: Duration,
    pub timeout: Duration,

    /// Retries after a transient failure, per request.
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub rate_limit_backoff: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            data_url: DATA_URL.to_string(),
            archives_url: ARCHIVES_URL.to_string(),
            request_interval: Duration::from_millis(150),
            timeout: Duration::from_secs(30),
            max_retries: 1,
            retry_backoff: Duration::from_secs(5),
            rate_limit_backoff: Duration::from_secs(12),
        }
    }
}

impl FetchConfig {
    /// Defaults, overridden by `USER_AGENT`, `SEC_DATA_URL`, `SEC_ARCHIVES_URL` and
    /// `REQUEST_INTERVAL_MS` when set (a `.env` file is honoured).
    pub fn from_env() -> Result<Self, SpiderError> {
        dotenv::dotenv().ok();
        let mut config = Self::default();

        if let Ok(user_agent) = var("USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Ok(url) = var("SEC_DATA_URL") {
            config.data_url = url;
        }
        if let Ok(url) = var("SEC_ARCHIVES_URL") {
            config.archives_url = url;
        }
        if let Ok(ms) = var("REQUEST_INTERVAL_MS") {
            let ms = ms
                .parse::<u64>()
                .map_err(|err| SpiderError::Config(format!("REQUEST_INTERVAL_MS: {err}")))?;
            config.request_interval = Duration::from_millis(ms);
        }

        config.validate()?;
        debug!("fetch config loaded: {config:?}");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SpiderError> {
        if self.user_agent.trim().is_empty() {
            return Err(SpiderError::Config("USER_AGENT must not be empty".into()));
        }
        if self.request_interval <= MIN_REQUEST_INTERVAL {
            return Err(SpiderError::Config(format!(
                "request interval {:?} exceeds the 10 requests/second limit",
                self.request_interval
            )));
        }
        Ok(())
    }

    pub(crate) fn submissions_url(&self, cik: &str) -> String {
        format!(
            "{}/submissions/CIK{cik:0>10}.json",
            self.data_url.trim_end_matches('/')
        )
    }

    /// Directory holding every document of one filing.
    pub(crate) fn filing_dir(&self, cik: &str, accession: &str) -> String {
        format!(
            "{}/{cik}/{}/",
            self.archives_url.trim_end_matches('/'),
            accession.replace('-', "")
        )
    }
}
