pub mod builtin;
pub mod file;
pub mod filter;
pub mod generator;

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CatalogConfig;
use crate::profile::{
    normalize_opportunities, normalize_profiles, Opportunity, OpportunityInput, Profile,
    ProfileInput,
};

pub use builtin::BuiltinCatalog;
pub use file::FileCatalog;
pub use filter::{fuzzy_match, OpportunityFilter};
pub use generator::SeededGenerator;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can hand out profiles and opportunities in canonical form.
pub trait DataProvider: Send + Sync {
    fn name(&self) -> &str;
    fn profiles(&self) -> Result<Vec<Profile>, CatalogError>;
    fn opportunities(&self) -> Result<Vec<Opportunity>, CatalogError>;
}

/// On-disk and embedded catalog layout. Both lists accept the lenient input
/// shapes; `internships`/`projects` and `interns`/`students` are accepted as
/// alternative keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    #[serde(alias = "interns", alias = "students")]
    pub profiles: Vec<ProfileInput>,
    #[serde(alias = "internships", alias = "projects")]
    pub opportunities: Vec<OpportunityInput>,
}

impl CatalogDocument {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn profiles(&self) -> Vec<Profile> {
        normalize_profiles(self.profiles.clone())
    }

    pub fn opportunities(&self) -> Vec<Opportunity> {
        normalize_opportunities(self.opportunities.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    Generated,
    File(PathBuf),
}

impl Display for CatalogSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin => write!(f, "builtin"),
            Self::Generated => write!(f, "generated"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
#[error("catalog source must not be empty")]
pub struct CatalogSourceParseError;

impl FromStr for CatalogSource {
    type Err = CatalogSourceParseError;

    /// `builtin`, `generated`, or anything else as a file path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Err(CatalogSourceParseError),
            "builtin" | "demo" => Ok(Self::Builtin),
            "generated" | "mock" | "random" => Ok(Self::Generated),
            _ => Ok(Self::File(PathBuf::from(trimmed))),
        }
    }
}

pub fn provider_from_config(config: &CatalogConfig) -> Result<Arc<dyn DataProvider>, CatalogError> {
    let source = config
        .source
        .parse::<CatalogSource>()
        .unwrap_or_else(|_| {
            tracing::warn!("empty catalog source in config, using builtin catalog");
            CatalogSource::Builtin
        });
    tracing::info!(source = %source, "loading catalog");
    let provider: Arc<dyn DataProvider> = match source {
        CatalogSource::Builtin => Arc::new(BuiltinCatalog::load()?),
        CatalogSource::Generated => Arc::new(SeededGenerator::new(
            config.seed,
            config.profiles,
            config.opportunities,
        )),
        CatalogSource::File(path) => Arc::new(FileCatalog::open(path)?),
    };
    Ok(provider)
}
