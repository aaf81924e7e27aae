//! Skill Catalog — the static role → required-skills table and the flat skill vocabulary.
//!
//! Loaded once at startup (built-in table or `SKILL_CATALOG_PATH`) and shared read-only
//! through `AppState` as `Arc<SkillCatalog>`. Role order is part of the contract: the
//! resolver's containment step picks the first role in this order.

pub mod resolver;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use resolver::{FallbackPolicy, ResolutionStrategy, ResolveError, ResolvedSkills, RoleResolver};

/// Fallback requirement set used when nothing else resolves: a general-purpose language,
/// a query language, version control and core CS fundamentals.
pub const DEFAULT_CORE_SKILLS: &[&str] = &["python", "sql", "git", "data structures"];

const BUILTIN_ROLES: &[(&str, &[&str])] = &[
    (
        "software engineer",
        &[
            "python",
            "java",
            "c++",
            "data structures",
            "algorithms",
            "sql",
            "git",
            "api",
            "oop",
            "problem solving",
        ],
    ),
    (
        "data analyst",
        &[
            "excel",
            "sql",
            "python",
            "power bi",
            "tableau",
            "statistics",
            "data visualization",
        ],
    ),
    (
        "data scientist",
        &[
            "python",
            "machine learning",
            "deep learning",
            "pandas",
            "numpy",
            "statistics",
        ],
    ),
    (
        "frontend developer",
        &[
            "html",
            "css",
            "javascript",
            "react",
            "bootstrap",
            "responsive design",
        ],
    ),
    (
        "backend developer",
        &["python", "django", "flask", "node", "sql", "api", "mongodb"],
    ),
    (
        "devops engineer",
        &["aws", "docker", "kubernetes", "linux", "ci/cd", "jenkins"],
    ),
    (
        "cyber security analyst",
        &[
            "network security",
            "linux",
            "penetration testing",
            "firewall",
            "cyber security",
        ],
    ),
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog contains a role with an empty name")]
    EmptyRoleName,

    #[error("Catalog declares role '{0}' more than once")]
    DuplicateRole(String),

    #[error("Role '{0}' has no required skills")]
    NoSkills(String),
}

/// A named bundle of required skills. Skills are lowercase, unique, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub name: String,
    pub required_skills: Vec<String>,
}

/// Flat, deduplicated skill set in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SkillVocabulary {
    terms: Vec<String>,
}

impl SkillVocabulary {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self::default();
        vocabulary.extend(terms);
        vocabulary
    }

    fn extend<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            let term = normalize_term(term.as_ref());
            if !term.is_empty() && !self.contains(&term) {
                self.terms.push(term);
            }
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

/// On-disk catalog format. `roles` is an array so that catalog order is explicit.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    roles: Vec<RoleProfile>,
    #[serde(default)]
    vocabulary: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SkillCatalog {
    roles: Vec<RoleProfile>,
    vocabulary: SkillVocabulary,
}

impl SkillCatalog {
    /// The built-in role table.
    pub fn builtin() -> Self {
        // Already lowercase and unique, so no validation pass.
        let roles: Vec<RoleProfile> = BUILTIN_ROLES
            .iter()
            .map(|(name, skills)| RoleProfile {
                name: name.to_string(),
                required_skills: skills.iter().map(|s| s.to_string()).collect(),
            })
            .collect();
        let vocabulary = SkillVocabulary::new(roles.iter().flat_map(|r| r.required_skills.iter()));

        Self { roles, vocabulary }
    }

    /// Builds a catalog from roles in the given order. Names and skills are trimmed and
    /// lowercased; duplicate skills inside a role keep their first occurrence.
    pub fn from_roles(roles: Vec<RoleProfile>) -> Result<Self, CatalogError> {
        let mut normalized: Vec<RoleProfile> = Vec::with_capacity(roles.len());

        for role in roles {
            let name = normalize_term(&role.name);
            if name.is_empty() {
                return Err(CatalogError::EmptyRoleName);
            }
            if normalized.iter().any(|r| r.name == name) {
                return Err(CatalogError::DuplicateRole(name));
            }

            let required_skills = SkillVocabulary::new(&role.required_skills).terms;
            if required_skills.is_empty() {
                return Err(CatalogError::NoSkills(name));
            }

            normalized.push(RoleProfile {
                name,
                required_skills,
            });
        }

        let vocabulary =
            SkillVocabulary::new(normalized.iter().flat_map(|r| r.required_skills.iter()));

        Ok(Self {
            roles: normalized,
            vocabulary,
        })
    }

    /// Loads a catalog from a JSON file (see `CatalogFile`).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Ok(Self::from_roles(file.roles)?.with_vocabulary(file.vocabulary))
    }

    /// Extends the flat vocabulary with an independent master list.
    pub fn with_vocabulary<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vocabulary.extend(extra);
        self
    }

    /// Exact, case-insensitive role lookup.
    pub fn resolve_by_name(&self, title: &str) -> Option<&RoleProfile> {
        let title = normalize_term(title);
        self.roles.iter().find(|r| r.name == title)
    }

    pub fn all_skills(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    /// Roles in catalog order.
    pub fn roles(&self) -> &[RoleProfile] {
        &self.roles
    }
}

fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}
