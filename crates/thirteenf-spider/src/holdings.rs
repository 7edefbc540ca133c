use crate::error::SpiderError;
use crate::funds::{FundList, FundSpec};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One reported position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    /// Issuer name.
    pub name: String,
    /// Security class, e.g. "COM".
    pub title: String,
    pub cusip: String,
    pub shares: u64,
    /// "SH" for shares, "PRN" for principal amount.
    #[serde(rename = "type")]
    pub share_type: String,
    /// Market value in whole US dollars.
    pub value: u64,
    pub discretion: String,
    /// Percent of the fund's reported portfolio, two decimals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    /// Holdings parsed from the latest 13F-HR.
    Ok,
    /// The fund has not filed a 13F-HR.
    Empty,
    /// Fetching or parsing failed; see `error`.
    Failed,
}

/// A fund's positions as of one filing's reporting period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundSnapshot {
    #[serde(flatten)]
    pub fund: FundSpec,
    pub status: SnapshotStatus,
    /// Quarter end the filing reports on.
    pub period: Option<NaiveDate>,
    pub filed: Option<NaiveDate>,
    pub accession: Option<String>,
    pub total_value: u64,
    pub num_holdings: usize,
    /// Sorted by value, largest first.
    pub holdings: Vec<HoldingRecord>,
    pub top_holdings: Vec<HoldingRecord>,
    pub fetched_at: DateTime<Utc>,
    pub error: Option<String>,
}

/// Filing metadata for a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filing {
    pub accession: String,
    pub period: NaiveDate,
    pub filed: NaiveDate,
}

impl FundSnapshot {
    fn blank(fund: &FundSpec, status: SnapshotStatus) -> Self {
        Self {
            fund: fund.clone(),
            status,
            period: None,
            filed: None,
            accession: None,
            total_value: 0,
            num_holdings: 0,
            holdings: vec![],
            top_holdings: vec![],
            fetched_at: Utc::now(),
            error: None,
        }
    }

    /// The fund has no 13F-HR on record.
    pub fn empty(fund: &FundSpec) -> Self {
        Self::blank(fund, SnapshotStatus::Empty)
    }

    pub fn failed(fund: &FundSpec, error: &SpiderError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::blank(fund, SnapshotStatus::Failed)
        }
    }

    /// Orders `holdings` by value, computes totals and portfolio weights, and
    /// cuts the dashboard's top holdings.
    pub fn from_holdings(fund: &FundSpec, filing: Filing, mut holdings: Vec<HoldingRecord>) -> Self {
        let total_value: u64 = holdings.iter().map(|h| h.value).sum();

        // stable, so equal values keep document order
        holdings.sort_by(|a, b| b.value.cmp(&a.value));
        for holding in holdings.iter_mut() {
            holding.weight = Some(weight(holding.value, total_value));
        }

        let top_holdings = holdings
            .iter()
            .take(fund.group.top_holdings())
            .cloned()
            .collect();

        Self {
            period: Some(filing.period),
            filed: Some(filing.filed),
            accession: Some(filing.accession),
            total_value,
            num_holdings: holdings.len(),
            holdings,
            top_holdings,
            ..Self::blank(fund, SnapshotStatus::Ok)
        }
    }

    /// `Ok` and `Empty` both count as retrieved.
    pub fn is_retrieved(&self) -> bool {
        self.status != SnapshotStatus::Failed
    }
}

fn weight(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (value as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
}

/// Every fund's snapshot, keyed by CIK; the contract with the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HoldingsDocument(BTreeMap<String, FundSnapshot>);

impl HoldingsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a snapshot; the CIK must be in `funds` and not yet present.
    pub fn insert(&mut self, funds: &FundList, snapshot: FundSnapshot) -> Result<(), SpiderError> {
        let cik = snapshot.fund.cik.clone();
        if !funds.contains(&cik) {
            return Err(SpiderError::Config(format!("CIK {cik} is not a tracked fund")));
        }
        if self.0.contains_key(&cik) {
            return Err(SpiderError::Config(format!("CIK {cik} already in document")));
        }
        self.0.insert(cik, snapshot);
        Ok(())
    }

    pub fn get(&self, cik: &str) -> Option<&FundSnapshot> {
        self.0.get(cik)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FundSnapshot)> {
        self.0.iter()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &FundSnapshot> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn retrieved_count(&self) -> usize {
        self.snapshots().filter(|s| s.is_retrieved()).count()
    }

    /// Snapshots that actually carry holdings (`status: ok`).
    pub fn populated_count(&self) -> usize {
        self.snapshots()
            .filter(|s| s.status == SnapshotStatus::Ok)
            .count()
    }
}
