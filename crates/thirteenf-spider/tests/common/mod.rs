#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thirteenf_spider::http::Transport;
use thirteenf_spider::{FetchConfig, SpiderError};
use tokio::time::Instant;

pub const DATA_URL: &str = "https://data.test";
pub const ARCHIVES_URL: &str = "https://archives.test";

pub fn config() -> FetchConfig {
    FetchConfig {
        data_url: DATA_URL.into(),
        archives_url: ARCHIVES_URL.into(),
        ..Default::default()
    }
}

#[derive(Clone, Debug)]
pub enum Route {
    Body(Vec<u8>),
    Status(u16),
    /// 503 on the first request, the body afterwards.
    FlakyOnce(Vec<u8>),
    /// 429 on the first request, the body afterwards.
    RateLimitedOnce(Vec<u8>),
}

/// Canned EDGAR. Unrouted URLs are 404.
#[derive(Clone, Default)]
pub struct FakeEdgar {
    routes: HashMap<String, Route>,
    seen: Arc<Mutex<HashSet<String>>>,
    log: Arc<Mutex<Vec<(Instant, String)>>>,
}

impl FakeEdgar {
    pub fn route(&mut self, url: impl Into<String>, route: Route) -> &mut Self {
        self.routes.insert(url.into(), route);
        self
    }

    pub fn unroute(&mut self, url: &str) -> &mut Self {
        self.routes.remove(url);
        self
    }

    pub fn requests(&self) -> Vec<(Instant, String)> {
        self.log.lock().unwrap().clone()
    }

    pub fn hits(&self, url: &str) -> Vec<Instant> {
        self.requests()
            .into_iter()
            .filter(|(_, u)| u == url)
            .map(|(t, _)| t)
            .collect()
    }

    /// Routes a complete, well-formed 13F-HR with `rows` positions for `cik`.
    pub fn filer(&mut self, cik: &str, accession: &str, rows: usize) -> &mut Self {
        let dir = filing_dir(cik, accession);
        self.route(
            submissions_url(cik),
            Route::Body(submissions_json(accession, "2024-11-14", "2024-09-30")),
        )
        .route(
            format!("{dir}{accession}-index.json"),
            Route::Body(index_json(&["primary_doc.xml", "form13fInfoTable.xml"])),
        )
        .route(
            format!("{dir}form13fInfoTable.xml"),
            Route::Body(info_table_xml(rows)),
        )
    }
}

impl Transport for FakeEdgar {
    async fn get(&self, url: &str) -> Result<Vec<u8>, SpiderError> {
        self.log
            .lock()
            .unwrap()
            .push((Instant::now(), url.to_string()));

        match self.routes.get(url) {
            None => Err(SpiderError::NotFound(url.to_string())),
            Some(Route::Body(body)) => Ok(body.clone()),
            Some(Route::Status(status)) => Err(SpiderError::Http {
                status: *status,
                url: url.to_string(),
            }),
            Some(Route::FlakyOnce(body)) => {
                if self.seen.lock().unwrap().insert(url.to_string()) {
                    Err(SpiderError::Http {
                        status: 503,
                        url: url.to_string(),
                    })
                } else {
                    Ok(body.clone())
                }
            }
            Some(Route::RateLimitedOnce(body)) => {
                if self.seen.lock().unwrap().insert(url.to_string()) {
                    Err(SpiderError::RateLimited(url.to_string()))
                } else {
                    Ok(body.clone())
                }
            }
        }
    }
}

pub fn submissions_url(cik: &str) -> String {
    format!("{DATA_URL}/submissions/CIK{cik:0>10}.json")
}

pub fn filing_dir(cik: &str, accession: &str) -> String {
    format!("{ARCHIVES_URL}/{cik}/{}/", accession.replace('-', ""))
}

pub fn submissions_json(accession: &str, filed: &str, period: &str) -> Vec<u8> {
    serde_json::json!({
        "cik": "0",
        "name": "TEST FILER",
        "filings": {
            "recent": {
                "accessionNumber": ["0000000000-24-000001", accession],
                "filingDate": [filed, filed],
                "reportDate": ["", period],
                "form": ["SC 13G/A", "13F-HR"]
            },
            "files": []
        }
    })
    .to_string()
    .into_bytes()
}

pub fn index_json(names: &[&str]) -> Vec<u8> {
    let items: Vec<_> = names
        .iter()
        .map(|name| serde_json::json!({ "name": name, "type": "text.gif", "size": "" }))
        .collect();
    serde_json::json!({ "directory": { "name": "/Archives/edgar/data", "item": items } })
        .to_string()
        .into_bytes()
}

/// Information table with `rows` positions; row `i` is worth `(i + 1) * 1000` dollars.
pub fn info_table_xml(rows: usize) -> Vec<u8> {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<informationTable xmlns="http://www.sec.gov/edgar/document/thirteenf/informationtable">"#,
    );
    for i in 0..rows {
        xml.push_str(&format!(
            r#"
  <infoTable>
    <nameOfIssuer>ISSUER {i}</nameOfIssuer>
    <titleOfClass>COM</titleOfClass>
    <cusip>{i:09}</cusip>
    <value>{value}</value>
    <shrsOrPrnAmt><sshPrnamt>{shares}</sshPrnamt><sshPrnamtType>SH</sshPrnamtType></shrsOrPrnAmt>
    <investmentDiscretion>SOLE</investmentDiscretion>
    <votingAuthority><Sole>{shares}</Sole><Shared>0</Shared><None>0</None></votingAuthority>
  </infoTable>"#,
            value = (i + 1) * 1000,
            shares = (i + 1) * 10,
        ));
    }
    xml.push_str("\n</informationTable>");
    xml.into_bytes()
}
