use crate::holdings::{HoldingsDocument, SnapshotStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entries kept in the overlap report.
pub const MAX_OVERLAPS: usize = 30;

/// A security held by two or more tracked funds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    pub cusip: String,
    pub name: String,
    pub fund_count: usize,
    pub fund_names: Vec<String>,
    pub total_value: u64,
    pub funds: Vec<OverlapHolder>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlapHolder {
    pub fund: String,
    pub manager: String,
    pub value: u64,
    pub shares: u64,
    pub weight: f64,
}

/// Securities (by CUSIP) held by at least two successfully fetched funds, most widely
/// held first, ties broken by combined value.
pub fn overlap(document: &HoldingsDocument) -> Vec<Overlap> {
    let mut by_cusip: BTreeMap<&str, Overlap> = BTreeMap::new();

    for snapshot in document.snapshots() {
        if snapshot.status != SnapshotStatus::Ok {
            continue;
        }
        for holding in snapshot.holdings.iter().filter(|h| !h.cusip.is_empty()) {
            let entry = by_cusip
                .entry(holding.cusip.as_str())
                .or_insert_with(|| Overlap {
                    cusip: holding.cusip.clone(),
                    name: holding.name.clone(),
                    fund_count: 0,
                    fund_names: vec![],
                    total_value: 0,
                    funds: vec![],
                });
            entry.funds.push(OverlapHolder {
                fund: snapshot.fund.name.clone(),
                manager: snapshot.fund.manager.clone(),
                value: holding.value,
                shares: holding.shares,
                weight: holding.weight.unwrap_or_default(),
            });
            entry.total_value += holding.value;
        }
    }

    let mut overlaps: Vec<Overlap> = by_cusip
        .into_values()
        .filter(|o| o.funds.len() >= 2)
        .map(|mut o| {
            o.fund_count = o.funds.len();
            o.fund_names = o.funds.iter().map(|f| f.fund.clone()).collect();
            o
        })
        .collect();

    overlaps.sort_by(|a, b| {
        b.fund_count
            .cmp(&a.fund_count)
            .then(b.total_value.cmp(&a.total_value))
    });
    overlaps.truncate(MAX_OVERLAPS);
    overlaps
}
