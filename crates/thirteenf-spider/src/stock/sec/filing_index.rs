//! Locating the information table inside a 13F-HR filing.
//!
//! Filers name the attachment however they like, so it is found in three steps:
//! the filing's `-index.json`, then the `-index.htm` page, then a probe of the
//! names most filers use.

use crate::error::SpiderError;
use regex::Regex;
use serde::Deserialize;

/// File names tried directly when neither index lists the information table.
pub const COMMON_NAMES: [&str; 5] = [
    "form13fInfoTable.xml",
    "infotable.xml",
    "InfoTable.xml",
    "INFOTABLE.XML",
    "information_table.xml",
];

pub fn index_json_url(filing_dir: &str, accession: &str) -> String {
    format!("{filing_dir}{accession}-index.json")
}

pub fn index_html_url(filing_dir: &str, accession: &str) -> String {
    format!("{filing_dir}{accession}-index.htm")
}

/// Resolves a link found in an index against the filing directory.
pub fn resolve(filing_dir: &str, link: &str) -> String {
    if link.starts_with("http") {
        return link.to_string();
    }
    let file = link.rsplit('/').next().unwrap_or(link);
    format!("{filing_dir}{file}")
}

// index.json
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct IndexJson {
    directory: Directory,
}

#[derive(Debug, Deserialize)]
struct Directory {
    #[serde(default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    name: String,
}

/// Picks the information table out of `-index.json`: an `.xml` named like an info
/// table, else the first `.xml` that is not the primary document.
pub fn from_index_json(body: &[u8]) -> Result<Option<String>, SpiderError> {
    let index: IndexJson =
        serde_json::from_slice(body).map_err(|err| SpiderError::parse("filing index", err))?;
    let names: Vec<&str> = index.directory.item.iter().map(|i| i.name.as_str()).collect();

    Ok(pick_xml(&names, |name| name.contains("infotable")).map(str::to_string))
}

// index.htm
// ----------------------------------------------------------------------------

lazy_static::lazy_static! {
    /// Every `.xml` link on an index page.
    static ref XML_LINK: Regex = Regex::new(r#"(?i)href="([^"]*\.xml)""#).expect("valid regex");
}

/// Picks the information table out of the `-index.htm` page.
pub fn from_index_html(html: &str) -> Option<String> {
    let links: Vec<&str> = XML_LINK
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    if let Some(link) = links.iter().find(|link| {
        let lower = link.to_lowercase();
        lower.contains("infotable") || lower.contains("information")
    }) {
        return Some(link.to_string());
    }

    // the page describes the attachment even when its file name doesn't
    if html.to_uppercase().contains("INFORMATION TABLE") {
        return pick_xml(&links, |_| false).map(str::to_string);
    }
    None
}

fn pick_xml<'a>(names: &[&'a str], preferred: impl Fn(&str) -> bool) -> Option<&'a str> {
    let xml: Vec<(&str, String)> = names
        .iter()
        .map(|name| (*name, name.to_lowercase()))
        .filter(|(_, lower)| lower.ends_with(".xml"))
        .collect();

    xml.iter()
        .find(|(_, lower)| preferred(lower))
        .or_else(|| xml.iter().find(|(_, lower)| !lower.contains("primary")))
        .map(|(name, _)| *name)
}
