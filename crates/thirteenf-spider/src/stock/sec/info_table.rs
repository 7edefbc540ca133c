use crate::error::SpiderError;
use crate::holdings::HoldingRecord;
use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Filings submitted from this date on report values in dollars; earlier ones in
/// thousands of dollars.
pub fn dollar_reporting_since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 3).expect("valid date")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Name,
    Title,
    Cusip,
    Value,
    Shares,
    ShareType,
    Discretion,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"nameOfIssuer" => Some(Field::Name),
            b"titleOfClass" => Some(Field::Title),
            b"cusip" => Some(Field::Cusip),
            b"value" => Some(Field::Value),
            b"sshPrnamt" => Some(Field::Shares),
            b"sshPrnamtType" => Some(Field::ShareType),
            b"investmentDiscretion" => Some(Field::Discretion),
            _ => None,
        }
    }
}

/// Raw text of one `infoTable` element.
#[derive(Debug, Default)]
struct Row {
    name: Option<String>,
    title: Option<String>,
    cusip: Option<String>,
    value: Option<String>,
    shares: Option<String>,
    share_type: Option<String>,
    discretion: Option<String>,
}

impl Row {
    fn set(&mut self, field: Field, text: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Title => &mut self.title,
            Field::Cusip => &mut self.cusip,
            Field::Value => &mut self.value,
            Field::Shares => &mut self.shares,
            Field::ShareType => &mut self.share_type,
            Field::Discretion => &mut self.discretion,
        };
        *slot = Some(text.trim().to_string());
    }

    fn into_record(self, value_multiplier: u64) -> Result<Option<HoldingRecord>, SpiderError> {
        let Some(name) = self.name.filter(|n| !n.is_empty()) else {
            return Ok(None);
        };

        let value = parse_amount("value", self.value.as_deref())?
            .checked_mul(value_multiplier)
            .ok_or_else(|| SpiderError::parse("information table", "value overflows"))?;

        Ok(Some(HoldingRecord {
            title: text_or(self.title, "COM"),
            cusip: text_or(self.cusip, ""),
            shares: parse_amount("sshPrnamt", self.shares.as_deref())?,
            share_type: text_or(self.share_type, "SH"),
            value,
            discretion: text_or(self.discretion, "SOLE"),
            weight: None,
            name,
        }))
    }
}

fn text_or(text: Option<String>, default: &str) -> String {
    text.filter(|t| !t.is_empty())
        .unwrap_or_else(|| default.to_string())
}

// missing amounts are zero; anything else must be a non-negative integer
fn parse_amount(field: &str, text: Option<&str>) -> Result<u64, SpiderError> {
    match text.map(|t| t.replace(',', "")) {
        None => Ok(0),
        Some(t) if t.is_empty() => Ok(0),
        Some(t) => t.parse::<u64>().map_err(|err| {
            SpiderError::parse("information table", format!("{field} {t:?}: {err}"))
        }),
    }
}

/// Parses every `infoTable` entry of a 13F information table.
///
/// Elements are matched on their local name, so whichever namespace prefix the filer's
/// software used (`ns1:`, `n1:`, none) is irrelevant. Entries without an issuer name are
/// skipped. Values are scaled to dollars for filings made before
/// [`dollar_reporting_since`].
pub fn parse(xml: &[u8], filed: NaiveDate) -> Result<Vec<HoldingRecord>, SpiderError> {
    let value_multiplier = if filed < dollar_reporting_since() {
        1000
    } else {
        1
    };

    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut holdings = Vec::new();
    let mut row: Option<Row> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let local = e.local_name();
                if local.as_ref() == b"infoTable" {
                    row = Some(Row::default());
                    field = None;
                } else if row.is_some() {
                    field = Field::from_local_name(local.as_ref());
                }
            }
            Ok(Event::Text(text)) => {
                if let (Some(row), Some(field)) = (row.as_mut(), field) {
                    let text = text
                        .unescape()
                        .map_err(|err| SpiderError::parse("information table", err))?;
                    row.set(field, text.into_owned());
                }
            }
            Ok(Event::CData(data)) => {
                if let (Some(row), Some(field)) = (row.as_mut(), field) {
                    row.set(field, String::from_utf8_lossy(&data).into_owned());
                }
            }
            Ok(Event::End(e)) => {
                field = None;
                if e.local_name().as_ref() == b"infoTable" {
                    if let Some(done) = row.take() {
                        holdings.extend(done.into_record(value_multiplier)?);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(SpiderError::parse(
                    "information table",
                    format!("at byte {}: {err}", reader.buffer_position()),
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    if row.is_some() {
        return Err(SpiderError::parse("information table", "unterminated infoTable"));
    }

    Ok(holdings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const PREFIXED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ns1:informationTable xmlns:ns1="http://www.sec.gov/edgar/document/thirteenf/informationtable">
  <ns1:infoTable>
    <ns1:nameOfIssuer>ALLY FINL INC</ns1:nameOfIssuer>
    <ns1:titleOfClass>COM</ns1:titleOfClass>
    <ns1:cusip>02005N100</ns1:cusip>
    <ns1:value>451000000</ns1:value>
    <ns1:shrsOrPrnAmt>
      <ns1:sshPrnamt>12719675</ns1:sshPrnamt>
      <ns1:sshPrnamtType>SH</ns1:sshPrnamtType>
    </ns1:shrsOrPrnAmt>
    <ns1:investmentDiscretion>DFND</ns1:investmentDiscretion>
    <ns1:otherManager>4,8,11</ns1:otherManager>
    <ns1:votingAuthority>
      <ns1:Sole>12719675</ns1:Sole>
      <ns1:Shared>0</ns1:Shared>
      <ns1:None>0</ns1:None>
    </ns1:votingAuthority>
  </ns1:infoTable>
  <ns1:infoTable>
    <ns1:nameOfIssuer>AT&amp;T INC</ns1:nameOfIssuer>
    <ns1:cusip>00206R102</ns1:cusip>
    <ns1:value>1200</ns1:value>
  </ns1:infoTable>
</ns1:informationTable>"#;

    #[test]
    fn parses_prefixed_document() {
        let holdings = parse(PREFIXED.as_bytes(), date(2024, 11, 14)).unwrap();
        assert_eq!(holdings.len(), 2);

        let ally = &holdings[0];
        assert_eq!(ally.name, "ALLY FINL INC");
        assert_eq!(ally.cusip, "02005N100");
        assert_eq!(ally.value, 451_000_000);
        assert_eq!(ally.shares, 12_719_675);
        assert_eq!(ally.discretion, "DFND");

        // defaults for missing fields
        let att = &holdings[1];
        assert_eq!(att.name, "AT&T INC");
        assert_eq!(att.title, "COM");
        assert_eq!(att.shares, 0);
        assert_eq!(att.share_type, "SH");
        assert_eq!(att.discretion, "SOLE");
    }

    #[test]
    fn scales_values_reported_in_thousands() {
        let holdings = parse(PREFIXED.as_bytes(), date(2022, 11, 14)).unwrap();
        assert_eq!(holdings[1].value, 1_200_000);
    }

    #[test]
    fn skips_rows_without_issuer() {
        let xml = r#"<informationTable>
            <infoTable><cusip>000000000</cusip><value>5</value></infoTable>
            <infoTable><nameOfIssuer>APPLE INC</nameOfIssuer><value>7</value></infoTable>
        </informationTable>"#;
        let holdings = parse(xml.as_bytes(), date(2024, 2, 14)).unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].name, "APPLE INC");
    }

    #[test]
    fn negative_or_garbled_amounts_fail() {
        let xml = r#"<informationTable><infoTable>
            <nameOfIssuer>BAD CO</nameOfIssuer><value>-10</value>
        </infoTable></informationTable>"#;
        assert!(matches!(
            parse(xml.as_bytes(), date(2024, 2, 14)),
            Err(SpiderError::Parse { .. })
        ));

        assert!(matches!(
            parse(b"<informationTable><infoTable><nameOfIssuer>X</nameOfIssuer>", date(2024, 2, 14)),
            Err(SpiderError::Parse { .. })
        ));
    }
}
