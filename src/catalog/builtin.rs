use crate::catalog::{CatalogDocument, CatalogError, DataProvider};
use crate::profile::{Opportunity, Profile};

const CATALOG_JSON: &str = include_str!("../../data/catalog.json");

/// The demo catalog shipped with the dashboard: thirteen internships and
/// five sample student profiles.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    profiles: Vec<Profile>,
    opportunities: Vec<Opportunity>,
}

impl BuiltinCatalog {
    pub fn load() -> Result<Self, CatalogError> {
        let doc = CatalogDocument::from_json(CATALOG_JSON)?;
        Ok(Self {
            profiles: doc.profiles(),
            opportunities: doc.opportunities(),
        })
    }
}

impl DataProvider for BuiltinCatalog {
    fn name(&self) -> &str {
        "builtin"
    }

    fn profiles(&self) -> Result<Vec<Profile>, CatalogError> {
        Ok(self.profiles.clone())
    }

    fn opportunities(&self) -> Result<Vec<Opportunity>, CatalogError> {
        Ok(self.opportunities.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::WorkMode;
    use crate::scoring::{rank_opportunities, MatchScorer};

    #[test]
    fn embedded_catalog_loads() {
        let catalog = BuiltinCatalog::load().expect("embedded catalog parses");
        let opportunities = catalog.opportunities().unwrap();
        let profiles = catalog.profiles().unwrap();
        assert_eq!(opportunities.len(), 13);
        assert_eq!(profiles.len(), 5);

        let fe = &opportunities[0];
        assert_eq!(fe.id, "fe-001");
        assert_eq!(fe.required_skills.len(), 5);
        assert_eq!(fe.min_cgpa, 7.0);
        assert_eq!(fe.stipend, Some(42_000.0));
        assert_eq!(fe.duration_months, Some(6));
        assert!(!fe.is_remote);

        let sneha = &profiles[3];
        assert_eq!(sneha.name, "Sneha Gupta");
        assert_eq!(sneha.preferences.work_mode, Some(WorkMode::Remote));
        assert!(sneha.prefers_remote());
    }

    #[test]
    fn arjun_ranks_frontend_roles_first() {
        let catalog = BuiltinCatalog::load().expect("embedded catalog parses");
        let arjun = catalog.profiles().unwrap().remove(0);
        let ranked = rank_opportunities(
            &MatchScorer::default(),
            &arjun,
            &catalog.opportunities().unwrap(),
        );
        let top = &ranked[0];
        assert!(top.domain.contains("Development"));
        assert!(top.result.score >= 70);
        assert!(ranked.windows(2).all(|w| w[0].result.score >= w[1].result.score));
    }
}
