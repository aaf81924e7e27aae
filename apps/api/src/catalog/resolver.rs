//! Role Resolver — maps a free-text job title or description to a required-skill set.
//!
//! Title resolution, first success wins:
//! 1. exact role name
//! 2. containment: the first catalog role (in catalog order) whose name appears inside the title
//! 3. keyword scan: vocabulary terms appearing literally inside the title
//! 4. the `DEFAULT_CORE_SKILLS` set
//!
//! `FallbackPolicy::ExactOnly` stops after step 1 and reports `RoleNotFound`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::analysis::detector::detect_skills;
use crate::catalog::{SkillCatalog, DEFAULT_CORE_SKILLS};

#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("No catalog role matches '{title}'")]
    RoleNotFound { title: String },

    #[error("No known skills found in the job description")]
    NoSkillsInDescription,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Exact title lookup only.
    ExactOnly,
    /// Exact → containment → keyword scan → core default.
    #[default]
    Full,
}

impl std::str::FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact_only" | "exact" | "strict" => Ok(FallbackPolicy::ExactOnly),
            "full" | "lenient" => Ok(FallbackPolicy::Full),
            other => Err(format!(
                "unknown fallback policy '{other}' (expected 'full' or 'exact_only')"
            )),
        }
    }
}

/// Which resolution step produced the required set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    Exact,
    Containment,
    KeywordScan,
    CoreDefault,
    Description,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSkills {
    pub matched_role: Option<String>,
    pub required_skills: Vec<String>,
    pub strategy: ResolutionStrategy,
}

impl ResolvedSkills {
    fn core_default() -> Self {
        Self {
            matched_role: None,
            required_skills: DEFAULT_CORE_SKILLS.iter().map(|s| s.to_string()).collect(),
            strategy: ResolutionStrategy::CoreDefault,
        }
    }
}

pub struct RoleResolver<'a> {
    catalog: &'a SkillCatalog,
    policy: FallbackPolicy,
}

impl<'a> RoleResolver<'a> {
    pub fn new(catalog: &'a SkillCatalog, policy: FallbackPolicy) -> Self {
        Self { catalog, policy }
    }

    /// Resolves a short job title.
    pub fn resolve(&self, title: &str) -> Result<ResolvedSkills, ResolveError> {
        let normalized = title.trim().to_lowercase();

        if let Some(role) = self.catalog.resolve_by_name(&normalized) {
            debug!(role = %role.name, "Resolved title by exact match");
            return Ok(ResolvedSkills {
                matched_role: Some(role.name.clone()),
                required_skills: role.required_skills.clone(),
                strategy: ResolutionStrategy::Exact,
            });
        }

        if self.policy == FallbackPolicy::ExactOnly {
            return Err(ResolveError::RoleNotFound {
                title: title.trim().to_string(),
            });
        }

        if let Some(role) = self
            .catalog
            .roles()
            .iter()
            .find(|r| normalized.contains(r.name.as_str()))
        {
            debug!(role = %role.name, "Resolved title by containment");
            return Ok(ResolvedSkills {
                matched_role: Some(role.name.clone()),
                required_skills: role.required_skills.clone(),
                strategy: ResolutionStrategy::Containment,
            });
        }

        let keywords = detect_skills(&normalized, self.catalog.all_skills().terms());
        if !keywords.is_empty() {
            debug!(count = keywords.len(), "Resolved title by keyword scan");
            return Ok(ResolvedSkills {
                matched_role: None,
                required_skills: keywords,
                strategy: ResolutionStrategy::KeywordScan,
            });
        }

        debug!("Title matched nothing; using core default skills");
        Ok(ResolvedSkills::core_default())
    }

    /// Resolves free-text job-description prose by vocabulary detection only.
    pub fn resolve_description(&self, description: &str) -> Result<ResolvedSkills, ResolveError> {
        let required_skills = detect_skills(description, self.catalog.all_skills().terms());

        if !required_skills.is_empty() {
            return Ok(ResolvedSkills {
                matched_role: None,
                required_skills,
                strategy: ResolutionStrategy::Description,
            });
        }

        match self.policy {
            FallbackPolicy::ExactOnly => Err(ResolveError::NoSkillsInDescription),
            FallbackPolicy::Full => Ok(ResolvedSkills::core_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoleProfile;

    fn full(catalog: &SkillCatalog) -> RoleResolver<'_> {
        RoleResolver::new(catalog, FallbackPolicy::Full)
    }

    #[test]
    fn test_exact_match() {
        let catalog = SkillCatalog::builtin();
        let resolved = full(&catalog).resolve("DevOps Engineer").unwrap();
        assert_eq!(resolved.strategy, ResolutionStrategy::Exact);
        assert_eq!(resolved.matched_role.as_deref(), Some("devops engineer"));
        assert_eq!(resolved.required_skills.len(), 6);
    }

    #[test]
    fn test_containment_match() {
        let catalog = SkillCatalog::builtin();
        let resolved = full(&catalog)
            .resolve("Senior Backend Developer Intern")
            .unwrap();
        assert_eq!(resolved.strategy, ResolutionStrategy::Containment);
        assert_eq!(resolved.matched_role.as_deref(), Some("backend developer"));
        assert_eq!(resolved.required_skills[1], "django");
    }

    #[test]
    fn test_containment_first_catalog_role_wins() {
        let catalog = SkillCatalog::from_roles(vec![
            RoleProfile {
                name: "developer".to_string(),
                required_skills: vec!["git".to_string()],
            },
            RoleProfile {
                name: "backend developer".to_string(),
                required_skills: vec!["django".to_string()],
            },
        ])
        .unwrap();
        let resolved = full(&catalog).resolve("Backend Developer II").unwrap();
        assert_eq!(resolved.matched_role.as_deref(), Some("developer"));

        let reordered = SkillCatalog::from_roles(catalog.roles().iter().rev().cloned().collect())
            .unwrap();
        let resolved = full(&reordered).resolve("Backend Developer II").unwrap();
        assert_eq!(resolved.matched_role.as_deref(), Some("backend developer"));
    }

    #[test]
    fn test_keyword_scan_fallback() {
        let catalog = SkillCatalog::builtin().with_vocabulary(["cloud"]);
        let resolved = full(&catalog).resolve("Cloud Engineer (AWS, Linux)").unwrap();
        assert_eq!(resolved.strategy, ResolutionStrategy::KeywordScan);
        assert!(resolved.matched_role.is_none());
        assert_eq!(resolved.required_skills, vec!["aws", "linux", "cloud"]);
    }

    #[test]
    fn test_keyword_scan_requires_vocabulary_term() {
        let catalog = SkillCatalog::builtin();
        let resolved = full(&catalog).resolve("Cloud Architect").unwrap();
        assert_ne!(resolved.strategy, ResolutionStrategy::KeywordScan);
    }

    #[test]
    fn test_core_default_never_empty() {
        let catalog = SkillCatalog::builtin();
        let resolved = full(&catalog).resolve("Zookeeper").unwrap();
        assert_eq!(resolved.strategy, ResolutionStrategy::CoreDefault);
        assert_eq!(
            resolved.required_skills,
            vec!["python", "sql", "git", "data structures"]
        );
    }

    #[test]
    fn test_exact_only_reports_role_not_found() {
        let catalog = SkillCatalog::builtin();
        let resolver = RoleResolver::new(&catalog, FallbackPolicy::ExactOnly);
        assert!(resolver.resolve("software engineer").is_ok());
        assert_eq!(
            resolver.resolve(" Senior Software Engineer "),
            Err(ResolveError::RoleNotFound {
                title: "Senior Software Engineer".to_string()
            })
        );
    }

    #[test]
    fn test_description_mode_ignores_role_names() {
        let catalog = SkillCatalog::builtin();
        let resolved = full(&catalog)
            .resolve_description("We need a data scientist fluent in pandas and numpy.")
            .unwrap();
        assert_eq!(resolved.strategy, ResolutionStrategy::Description);
        assert!(resolved.matched_role.is_none());
        assert_eq!(resolved.required_skills, vec!["pandas", "numpy"]);
    }

    #[test]
    fn test_description_without_skills() {
        let catalog = SkillCatalog::builtin();
        let resolved = full(&catalog).resolve_description("Friendly team!").unwrap();
        assert_eq!(resolved.strategy, ResolutionStrategy::CoreDefault);

        let strict = RoleResolver::new(&catalog, FallbackPolicy::ExactOnly);
        assert_eq!(
            strict.resolve_description("Friendly team!"),
            Err(ResolveError::NoSkillsInDescription)
        );
    }

    #[test]
    fn test_fallback_policy_from_str() {
        assert_eq!("full".parse::<FallbackPolicy>(), Ok(FallbackPolicy::Full));
        assert_eq!(
            " EXACT_ONLY ".parse::<FallbackPolicy>(),
            Ok(FallbackPolicy::ExactOnly)
        );
        assert!("sometimes".parse::<FallbackPolicy>().is_err());
    }
}
