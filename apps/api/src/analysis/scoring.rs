use serde::{Deserialize, Serialize};

use crate::analysis::detector::detect_skills;

/// Weight applied to the 0–100 similarity score in composite mode.
pub const SKILL_WEIGHT: f64 = 0.5;
/// Bonus points when an experience/years signal is present.
pub const EXPERIENCE_WEIGHT: f64 = 30.0;
/// Bonus points when a degree keyword is present.
pub const EDUCATION_WEIGHT: f64 = 20.0;

/// Lowest score (inclusive) in the moderate tier.
pub const MODERATE_TIER_MIN: f64 = 50.0;
/// Lowest score (inclusive) in the strong tier.
pub const STRONG_TIER_MIN: f64 = 75.0;

const EXPERIENCE_SIGNALS: &[&str] = &["experience", "years", "yrs", "internship"];

const EDUCATION_SIGNALS: &[&str] = &[
    "bachelor",
    "master",
    "degree",
    "b.tech",
    "m.tech",
    "b.sc",
    "m.sc",
    "phd",
    "university",
    "diploma",
];

const ACHIEVEMENT_SIGNALS: &[&str] = &[
    "award",
    "achieved",
    "winner",
    "certified",
    "published",
    "ranked",
    "%",
];

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `round(100 * |required ∩ detected| / |required|, 2)`, or 0 for an empty requirement set.
pub fn skill_score(required: &[String], detected: &[String]) -> f64 {
    if required.is_empty() {
        return 0.0;
    }
    let matched = required.iter().filter(|s| detected.contains(s)).count();
    round2(100.0 * matched as f64 / required.len() as f64)
}

/// Splits `required` into (matched, missing), both in `required` order.
pub fn partition_skills(required: &[String], detected: &[String]) -> (Vec<String>, Vec<String>) {
    required
        .iter()
        .cloned()
        .partition(|skill| detected.contains(skill))
}

/// Secondary signals read off the résumé text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxiliarySignals {
    pub experience: bool,
    pub education: bool,
    pub achievement: bool,
    /// Bag-of-words cosine similarity against the job description, when one was given.
    pub similarity_score: Option<f64>,
}

pub fn detect_signals(text: &str) -> AuxiliarySignals {
    let has = |terms: &[&str]| {
        let terms: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
        !detect_skills(text, &terms).is_empty()
    };

    AuxiliarySignals {
        experience: has(EXPERIENCE_SIGNALS),
        education: has(EDUCATION_SIGNALS),
        achievement: has(ACHIEVEMENT_SIGNALS),
        similarity_score: None,
    }
}

/// `round(similarity*100*SKILL_WEIGHT + experience bonus + education bonus, 2)`.
pub fn composite_score(similarity: f64, signals: &AuxiliarySignals) -> f64 {
    let experience_bonus = if signals.experience {
        EXPERIENCE_WEIGHT
    } else {
        0.0
    };
    let education_bonus = if signals.education {
        EDUCATION_WEIGHT
    } else {
        0.0
    };
    round2(similarity.clamp(0.0, 1.0) * 100.0 * SKILL_WEIGHT + experience_bonus + education_bonus)
}

/// Display-only suggestion bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    NeedsImprovement,
    Moderate,
    Strong,
}

impl Tier {
    pub fn for_score(score: f64) -> Self {
        if score >= STRONG_TIER_MIN {
            Tier::Strong
        } else if score >= MODERATE_TIER_MIN {
            Tier::Moderate
        } else {
            Tier::NeedsImprovement
        }
    }

    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            Tier::NeedsImprovement => &[
                "Add more relevant technical skills.",
                "Work on projects related to this job role.",
                "Customize your resume based on this role.",
            ],
            Tier::Moderate => &[
                "Add measurable achievements.",
                "Add internships or certifications.",
            ],
            Tier::Strong => &[
                "Your resume is well aligned for this role.",
                "Improve formatting for better ATS compatibility.",
            ],
        }
    }
}
