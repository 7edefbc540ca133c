use crate::config::FetchConfig;
use crate::error::{FundFailure, PartialFailure, SpiderError};
use crate::funds::{FundList, FundSpec};
use crate::holdings::{Filing, FundSnapshot, HoldingRecord, HoldingsDocument};
use crate::http::*;
use crate::pacer::Pacer;
use crate::tui::Progress;
use tracing::{debug, error, info, trace, warn};

/// Locating the information table within a filing.
pub mod filing_index;

/// Information table XML.
pub mod info_table;

/// `submissions/CIK##########.json`, the filer's filing history.
pub mod submissions;

use submissions::Submissions;

// fetch
// ----------------------------------------------------------------------------

/// Fetch the latest 13F-HR holdings of every fund in `funds` from EDGAR.
///
/// One fund's failure never aborts the batch: failed funds land in the document with
/// [`crate::SnapshotStatus::Failed`] and are listed by the returned [`PartialFailure`].
pub async fn fetch(
    funds: &FundList,
    config: &FetchConfig,
    tui: bool,
) -> Result<HoldingsDocument, PartialFailure> {
    let client = match EdgarClient::new(config) {
        Ok(client) => client,
        Err(err) => {
            error!("failed to build EDGAR client, error({err})");
            return Err(fail_all(funds, &err));
        }
    };
    fetch_with(client, funds, config, tui).await
}

/// [`fetch`] over any [`Transport`].
pub async fn fetch_with<T: Transport>(
    transport: T,
    funds: &FundList,
    config: &FetchConfig,
    tui: bool,
) -> Result<HoldingsDocument, PartialFailure> {
    let time = std::time::Instant::now();
    let mut spider = Spider::new(transport, config);
    let progress = Progress::new(funds.len(), tui);

    let mut document = HoldingsDocument::new();
    let mut failures = vec![];

    info!("fetching 13F holdings for {} funds ...", funds.len());
    for fund in funds {
        progress.fetching(fund);

        let snapshot = match spider.fund(fund).await {
            Ok(Some((filing, holdings))) => {
                info!(
                    "{} holdings parsed for [{}] {}, period {}",
                    holdings.len(),
                    fund.cik,
                    fund.name,
                    filing.period
                );
                FundSnapshot::from_holdings(fund, filing, holdings)
            }
            Ok(None) => {
                warn!("no 13F-HR filing found for [{}] {}", fund.cik, fund.name);
                FundSnapshot::empty(fund)
            }
            Err(err) => {
                error!(
                    "failed to fetch holdings for [{}] {}, error({err})",
                    fund.cik, fund.name
                );
                failures.push(FundFailure {
                    cik: fund.cik.clone(),
                    name: fund.name.clone(),
                    error: err.to_string(),
                });
                FundSnapshot::failed(fund, &err)
            }
        };

        progress.done(snapshot.is_retrieved());

        // FundList guarantees tracked, unique CIKs
        if let Err(err) = document.insert(funds, snapshot) {
            error!("dropping snapshot for [{}], error({err})", fund.cik);
        }
    }
    progress.finish();

    debug!(
        "{}/{} funds retrieved. {}",
        document.retrieved_count(),
        funds.len(),
        crate::time_elapsed(time)
    );

    if failures.is_empty() {
        Ok(document)
    } else {
        Err(PartialFailure { document, failures })
    }
}

fn fail_all(funds: &FundList, err: &SpiderError) -> PartialFailure {
    let mut document = HoldingsDocument::new();
    let mut failures = vec![];
    for fund in funds {
        failures.push(FundFailure {
            cik: fund.cik.clone(),
            name: fund.name.clone(),
            error: err.to_string(),
        });
        document.insert(funds, FundSnapshot::failed(fund, err)).ok();
    }
    PartialFailure { document, failures }
}

// spider
// ----------------------------------------------------------------------------

/// Sequential, paced EDGAR requests with a single retry on transient errors.
struct Spider<'a, T> {
    transport: T,
    config: &'a FetchConfig,
    pacer: Pacer,
}

impl<'a, T: Transport> Spider<'a, T> {
    fn new(transport: T, config: &'a FetchConfig) -> Self {
        Self {
            transport,
            config,
            pacer: Pacer::new(config.request_interval),
        }
    }

    async fn get(&mut self, url: &str) -> Result<Vec<u8>, SpiderError> {
        let mut attempt = 0;
        loop {
            self.pacer.wait().await;
            trace!("GET {url}");

            match self.transport.get(url).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let backoff = match &err {
                        SpiderError::RateLimited(_) => self.config.rate_limit_backoff,
                        _ => self.config.retry_backoff,
                    };
                    warn!("{err}; retrying {url} in {backoff:?}");
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Latest filing and its holdings; `None` when the fund has never filed a 13F-HR.
    async fn fund(
        &mut self,
        fund: &FundSpec,
    ) -> Result<Option<(Filing, Vec<HoldingRecord>)>, SpiderError> {
        // 1. submissions index
        let url = self.config.submissions_url(&fund.cik);
        let body = match self.get(&url).await {
            Ok(body) => body,
            Err(SpiderError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        let Some(filing) = Submissions::from_slice(&body)?.latest_13f()? else {
            return Ok(None);
        };
        debug!(
            "latest 13F-HR for [{}] is {}, period {}",
            fund.cik, filing.accession, filing.period
        );

        // 2. information table
        let url = self.info_table_url(&fund.cik, &filing.accession).await?;
        debug!("information table for [{}] at {url}", fund.cik);
        let xml = self.get(&url).await?;

        let holdings = info_table::parse(&xml, filing.filed)?;
        if holdings.is_empty() {
            return Err(SpiderError::parse(
                "information table",
                format!("no holdings in {url}"),
            ));
        }

        Ok(Some((filing, holdings)))
    }

    async fn info_table_url(&mut self, cik: &str, accession: &str) -> Result<String, SpiderError> {
        let dir = self.config.filing_dir(cik, accession);

        // a) index.json
        let url = filing_index::index_json_url(&dir, accession);
        match self.get(&url).await.and_then(|b| filing_index::from_index_json(&b)) {
            Ok(Some(name)) => return Ok(filing_index::resolve(&dir, &name)),
            Ok(None) => debug!("no information table listed in {url}"),
            Err(err) => warn!("index JSON failed for [{cik}], error({err})"),
        }

        // b) index.htm
        let url = filing_index::index_html_url(&dir, accession);
        match self.get(&url).await {
            Ok(body) => {
                let html = String::from_utf8_lossy(&body);
                if let Some(link) = filing_index::from_index_html(&html) {
                    return Ok(filing_index::resolve(&dir, &link));
                }
                debug!("no information table linked from {url}");
            }
            Err(err) => warn!("index HTML failed for [{cik}], error({err})"),
        }

        // c) well-known names
        for name in filing_index::COMMON_NAMES {
            let url = format!("{dir}{name}");
            if self.get(&url).await.is_ok() {
                debug!("information table found by probing {name}");
                return Ok(url);
            }
        }

        Err(SpiderError::parse(
            "filing index",
            format!("no information table in {accession}"),
        ))
    }
}
