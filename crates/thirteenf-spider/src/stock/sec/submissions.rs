use crate::error::SpiderError;
use crate::holdings::Filing;
use chrono::NaiveDate;
use serde::Deserialize;

/// Form type carrying a complete holdings information table. Amendments
/// (`13F-HR/A`) may list only added positions, so they are skipped.
const HOLDINGS_FORM: &str = "13F-HR";

// de
// ----------------------------------------------------------------------------

/// The parts of `submissions/CIK##########.json` we need.
///
/// `filings.recent` is column oriented: the n-th entry of every array describes the
/// n-th filing, most recent first.
#[derive(Debug, Default, Deserialize)]
pub struct Submissions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub filings: Filings,
}

#[derive(Debug, Default, Deserialize)]
pub struct Filings {
    #[serde(default)]
    pub recent: Recent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recent {
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub report_date: Vec<String>,
    #[serde(default)]
    pub form: Vec<String>,
}

impl Submissions {
    pub fn from_slice(body: &[u8]) -> Result<Self, SpiderError> {
        serde_json::from_slice(body).map_err(|err| SpiderError::parse("submissions index", err))
    }

    /// The most recent original 13F-HR, if the filer has one.
    pub fn latest_13f(&self) -> Result<Option<Filing>, SpiderError> {
        let recent = &self.filings.recent;
        let Some(i) = recent
            .form
            .iter()
            .position(|form| form == HOLDINGS_FORM)
        else {
            return Ok(None);
        };

        let accession = recent
            .accession_number
            .get(i)
            .filter(|acc| !acc.is_empty())
            .ok_or_else(|| SpiderError::parse("submissions index", "missing accession number"))?;
        let filed = recent
            .filing_date
            .get(i)
            .ok_or_else(|| SpiderError::parse("submissions index", "missing filing date"))
            .and_then(|date| parse_date(date))?;

        // amendments and older filings sometimes leave the report date blank
        let period = match recent.report_date.get(i).filter(|date| !date.is_empty()) {
            Some(date) => parse_date(date)?,
            None => filed,
        };

        Ok(Some(Filing {
            accession: accession.clone(),
            period,
            filed,
        }))
    }
}

fn parse_date(date: &str) -> Result<NaiveDate, SpiderError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|err| SpiderError::parse("submissions index", format!("date {date:?}: {err}")))
}
