use crate::error::SpiderError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Dashboard grouping of a fund.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// 2025 winners with clean 13F filings.
    A,
    /// Legendary names.
    B,
    /// Large multi-strategy performers; only their top 10 positions are displayed.
    C,
}

impl Group {
    /// Number of positions shown on the dashboard card.
    pub fn top_holdings(&self) -> usize {
        match self {
            Group::C => 10,
            Group::A | Group::B => 20,
        }
    }
}

/// A tracked filer and the metadata the dashboard shows alongside its holdings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundSpec {
    pub cik: String,
    pub name: String,
    pub manager: String,
    pub group: Group,
    pub tag: String,
    pub emoji: String,
    pub strategy: String,
    pub return_2025: Option<f64>,
}

impl FundSpec {
    #[allow(clippy::too_many_arguments)]
    fn new(
        cik: &str,
        name: &str,
        manager: &str,
        group: Group,
        tag: &str,
        emoji: &str,
        strategy: &str,
        return_2025: Option<f64>,
    ) -> Self {
        Self {
            cik: cik.to_string(),
            name: name.to_string(),
            manager: manager.to_string(),
            group,
            tag: tag.to_string(),
            emoji: emoji.to_string(),
            strategy: strategy.to_string(),
            return_2025,
        }
    }
}

/// Immutable, duplicate-free list of funds to fetch.
#[derive(Clone, Debug)]
pub struct FundList(Vec<FundSpec>);

impl FundList {
    /// Builds a list, rejecting empty or non-numeric CIKs and duplicates.
    pub fn new(funds: Vec<FundSpec>) -> Result<Self, SpiderError> {
        let mut seen = HashSet::new();
        for fund in &funds {
            if fund.cik.is_empty() || !fund.cik.bytes().all(|b| b.is_ascii_digit()) {
                return Err(SpiderError::Config(format!(
                    "CIK {:?} for {} is not numeric",
                    fund.cik, fund.name
                )));
            }
            if !seen.insert(fund.cik.as_str()) {
                return Err(SpiderError::Config(format!("duplicate CIK {}", fund.cik)));
            }
        }
        Ok(Self(funds))
    }

    /// The thirteen funds published on the dashboard.
    #[rustfmt::skip]
    pub fn tracked() -> Self {
        use Group::*;
        Self(vec![
            // group A: 2025 winners + clean 13F
            FundSpec::new("1647251", "TCI Fund Management", "크리스 혼 (Chris Hohn)", A, "2025 #1 Dollar Gains", "🏆", "Activist/Concentrated Equity", None),
            FundSpec::new("1535392", "Soroban Capital Partners", "에릭 만델블랫 (Eric Mandelblatt)", A, "2025 +25%", "📈", "Long/Short Equity", Some(25.0)),
            FundSpec::new("1336528", "Pershing Square Capital", "빌 애크먼 (Bill Ackman)", A, "Concentrated", "🎯", "Concentrated Equity", None),
            FundSpec::new("1656456", "Appaloosa Management", "데이비드 테퍼 (David Tepper)", A, "Contrarian", "🔄", "Macro-Equity", None),
            // group B: legendary names
            FundSpec::new("1067983", "Berkshire Hathaway", "워런 버핏 (Warren Buffett)", B, "Legend", "👑", "Value Investing", None),
            FundSpec::new("1649339", "Scion Asset Management", "마이클 버리 (Michael Burry)", B, "Big Short", "🎬", "Value/Contrarian", None),
            FundSpec::new("1029160", "Soros Fund Management", "조지 소로스 (George Soros)", B, "Macro Legend", "🌍", "Global Macro", None),
            FundSpec::new("1536411", "Duquesne Family Office", "스탠리 드러켄밀러 (Stanley Druckenmiller)", B, "GOAT Trader", "🐐", "Macro/Growth", None),
            FundSpec::new("1603466", "ARK Investment Management", "캐시 우드 (Cathie Wood)", B, "Innovation", "🚀", "Disruptive Innovation", None),
            // group C: 2025 top performers, top holdings only
            FundSpec::new("1350694", "Bridgewater Associates", "레이 달리오 (Ray Dalio, 설립)", C, "2025 +34%", "🌊", "Global Macro", Some(34.0)),
            FundSpec::new("1009207", "D.E. Shaw & Co.", "데이비드 쇼 (David Shaw)", C, "2025 +28%", "🤖", "Quant Multi-Strategy", Some(28.2)),
            FundSpec::new("1037389", "Renaissance Technologies", "짐 사이먼스 (Jim Simons, 설립)", C, "Quant King", "🧮", "Quantitative", None),
            FundSpec::new("1423053", "Citadel Advisors", "켄 그리핀 (Ken Griffin)", C, "2025 +10.2%", "🏰", "Multi-Strategy", Some(10.2)),
        ])
    }

    pub fn get(&self, cik: &str) -> Option<&FundSpec> {
        self.0.iter().find(|fund| fund.cik == cik)
    }

    pub fn contains(&self, cik: &str) -> bool {
        self.get(cik).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FundSpec> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a FundList {
    type Item = &'a FundSpec;
    type IntoIter = std::slice::Iter<'a, FundSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
