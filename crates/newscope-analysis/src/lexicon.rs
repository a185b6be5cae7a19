//! The curated domain lexicon: technical and multi-word terms that must
//! survive normalization intact.
//!
//! The built-in default covers the semiconductor news domain the pipeline
//! was built for; deployments can replace or extend it from a YAML file
//! shaped like:
//!
//! ```yaml
//! categories:
//!   semiconductor:
//!     - HBM3E
//!     - 웨이퍼
//!   companies:
//!     - SK하이닉스
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory/process-node/packaging vocabulary.
const SEMICONDUCTOR: &[&str] = &[
    "HBM",
    "HBM2E",
    "HBM3",
    "HBM3E",
    "HBM4",
    "DDR4",
    "DDR5",
    "LPDDR6",
    "DRAM",
    "D램",
    "NAND",
    "낸드",
    "플래시",
    "TSV",
    "Through Silicon Via",
    "3D DRAM",
    "파운드리",
    "팹리스",
    "패키징",
    "웨이퍼",
];

const COMPANIES: &[&str] = &[
    "SK하이닉스",
    "SK hynix",
    "삼성전자",
    "TSMC",
    "인텔",
    "마이크론",
    "퀄컴",
    "AMD",
    "엔비디아",
    "아마존",
    "구글",
    "애플",
];

const TECHNOLOGY: &[&str] = &[
    "AI",
    "인공지능",
    "빅데이터",
    "클라우드",
    "5G",
    "6G",
    "IoT",
    "자율주행",
    "메타버스",
    "양자컴퓨팅",
    "스마트팩토리",
    "디지털트랜스포메이션",
];

const LEADERSHIP: &[&str] = &[
    "혁신", "변화", "연구", "투자", "비전", "성과", "성장", "경영", "전략",
];

/// Errors produced while loading a lexicon file.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lexicon YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Categorized domain terms.
///
/// Category names are carried for fixed-vocabulary reporting; normalization
/// only cares about the flattened term list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainLexicon {
    pub categories: BTreeMap<String, Vec<String>>,
}

impl Default for DomainLexicon {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        for (name, terms) in [
            ("semiconductor", SEMICONDUCTOR),
            ("companies", COMPANIES),
            ("technology", TECHNOLOGY),
            ("leadership", LEADERSHIP),
        ] {
            categories.insert(
                name.to_string(),
                terms.iter().map(|t| (*t).to_string()).collect(),
            );
        }
        Self { categories }
    }
}

impl DomainLexicon {
    /// Parses a lexicon from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Parse`] on malformed YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LexiconError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a lexicon from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError`] when the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> Result<Self, LexiconError> {
        let raw = std::fs::read_to_string(path).map_err(|e| LexiconError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// All terms across every category, in category order.
    #[must_use]
    pub fn all_terms(&self) -> Vec<String> {
        self.categories.values().flatten().cloned().collect()
    }

    /// Number of terms across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
