//! Score Engine — one engine, three selectable scoring modes.
//!
//! - `RoleLookup`: title → `RoleResolver` → skill-ratio score.
//! - `DescriptionDriven`: description → vocabulary detection → skill-ratio score, with the
//!   bag-of-words similarity reported alongside.
//! - `WeightedComposite`: description → similarity·100·SKILL_WEIGHT + experience/education bonuses.
//!
//! `ScoreEngine` is cheap to clone and shared through `AppState`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::analysis::detector::{detect, detect_skills};
use crate::analysis::scoring::{
    composite_score, detect_signals, partition_skills, skill_score, AuxiliarySignals, Tier,
};
use crate::analysis::similarity::cosine_similarity;
use crate::catalog::{
    FallbackPolicy, ResolutionStrategy, ResolveError, ResolvedSkills, RoleResolver, SkillCatalog,
};

/// Accepted on the wire in any letter case, the same way for JSON bodies and form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ScoringMode {
    RoleLookup,
    DescriptionDriven,
    WeightedComposite,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::RoleLookup => "role_lookup",
            ScoringMode::DescriptionDriven => "description_driven",
            ScoringMode::WeightedComposite => "weighted_composite",
        }
    }
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "role_lookup" => Ok(ScoringMode::RoleLookup),
            "description_driven" => Ok(ScoringMode::DescriptionDriven),
            "weighted_composite" => Ok(ScoringMode::WeightedComposite),
            other => Err(format!(
                "unknown mode '{other}' (expected role_lookup, description_driven or weighted_composite)"
            )),
        }
    }
}

impl TryFrom<String> for ScoringMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What the résumé is scored against, as supplied by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobTarget {
    pub job_title: Option<String>,
    pub job_description: Option<String>,
    pub mode: Option<ScoringMode>,
}

impl JobTarget {
    fn title(&self) -> Option<&str> {
        self.job_title.as_deref().filter(|t| !t.trim().is_empty())
    }

    fn description(&self) -> Option<&str> {
        self.job_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }

    /// Explicit mode, else description-driven when a description is present, else role lookup.
    pub fn effective_mode(&self) -> ScoringMode {
        self.mode.unwrap_or(if self.description().is_some() {
            ScoringMode::DescriptionDriven
        } else {
            ScoringMode::RoleLookup
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("{0} mode requires a job title")]
    MissingTitle(ScoringMode),

    #[error("{0} mode requires a job description")]
    MissingDescription(ScoringMode),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Required skills for one request, resolved once and applied to every candidate.
#[derive(Debug, Clone)]
pub struct PreparedTarget {
    pub mode: ScoringMode,
    pub resolved: ResolvedSkills,
    description: Option<String>,
}

/// Outcome of scoring one candidate.
///
/// `matched_skills` and `missing_skills` partition `required_skills`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub mode: ScoringMode,
    pub matched_role: Option<String>,
    pub resolution: ResolutionStrategy,
    pub required_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Every vocabulary skill present in the résumé, required or not.
    pub detected_skills: Vec<String>,
    /// 0 – 100, two decimals.
    pub score: f64,
    pub signals: AuxiliarySignals,
    pub tier: Tier,
    pub suggestions: Vec<String>,
    /// Set when the document could not be read; the candidate is then scored on empty text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

#[derive(Clone)]
pub struct ScoreEngine {
    catalog: Arc<SkillCatalog>,
    policy: FallbackPolicy,
}

impl ScoreEngine {
    pub fn new(catalog: Arc<SkillCatalog>, policy: FallbackPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    /// Resolves the required-skill set for `target` under its effective mode.
    pub fn prepare(&self, target: &JobTarget) -> Result<PreparedTarget, ScoreError> {
        let mode = target.effective_mode();
        let resolver = RoleResolver::new(&self.catalog, self.policy);

        let (resolved, description) = match mode {
            ScoringMode::RoleLookup => {
                let title = target.title().ok_or(ScoreError::MissingTitle(mode))?;
                (resolver.resolve(title)?, None)
            }
            ScoringMode::DescriptionDriven | ScoringMode::WeightedComposite => {
                let description = target
                    .description()
                    .ok_or(ScoreError::MissingDescription(mode))?;
                (
                    resolver.resolve_description(description)?,
                    Some(description.to_string()),
                )
            }
        };

        debug!(
            mode = ?mode,
            strategy = ?resolved.strategy,
            role = ?resolved.matched_role,
            required = resolved.required_skills.len(),
            "Prepared scoring target"
        );

        Ok(PreparedTarget {
            mode,
            resolved,
            description,
        })
    }

    /// Scores one résumé text against a prepared target. Pure: same inputs, same result.
    pub fn evaluate(&self, candidate_id: &str, text: &str, target: &PreparedTarget) -> MatchResult {
        let required = &target.resolved.required_skills;
        // Required sets may hold terms outside the vocabulary (core default, custom catalogs),
        // so matching runs against the required set itself.
        let detected = detect_skills(text, required);
        let detection = detect(text, self.catalog.all_skills());
        let (matched_skills, missing_skills) = partition_skills(required, &detected);

        let mut signals = detect_signals(text);
        signals.similarity_score = target
            .description
            .as_deref()
            .map(|description| cosine_similarity(text, description));

        let score = match target.mode {
            ScoringMode::RoleLookup | ScoringMode::DescriptionDriven => {
                skill_score(required, &detected)
            }
            ScoringMode::WeightedComposite => {
                composite_score(signals.similarity_score.unwrap_or(0.0), &signals)
            }
        };

        let tier = Tier::for_score(score);

        MatchResult {
            candidate_id: candidate_id.to_string(),
            mode: target.mode,
            matched_role: target.resolved.matched_role.clone(),
            resolution: target.resolved.strategy,
            required_skills: required.clone(),
            matched_skills,
            missing_skills,
            detected_skills: detection.detected_skills,
            score,
            signals,
            tier,
            suggestions: tier.suggestions().iter().map(|s| s.to_string()).collect(),
            extraction_error: None,
        }
    }

    /// Scores a candidate whose document could not be read: empty text, flagged.
    pub fn evaluate_unreadable(
        &self,
        candidate_id: &str,
        reason: &str,
        target: &PreparedTarget,
    ) -> MatchResult {
        let mut result = self.evaluate(candidate_id, "", target);
        result.extraction_error = Some(reason.to_string());
        result
    }
}
