//! Tabular export of a ranking: `Candidate`, `Match %`, then either `Missing Skills` or
//! `Matched Skills Count`. Downstream spreadsheets key on these exact header names.

use serde::{Deserialize, Serialize};

use crate::analysis::ranking::RankingEntry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportColumns {
    #[default]
    MissingSkills,
    MatchedCount,
}

impl ExportColumns {
    fn headers(self) -> [&'static str; 3] {
        match self {
            ExportColumns::MissingSkills => ["Candidate", "Match %", "Missing Skills"],
            ExportColumns::MatchedCount => ["Candidate", "Match %", "Matched Skills Count"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Candidate")]
    pub candidate: String,
    #[serde(rename = "Match %")]
    pub match_percent: f64,
    #[serde(rename = "Missing Skills", skip_serializing_if = "Option::is_none")]
    pub missing_skills: Option<String>,
    #[serde(rename = "Matched Skills Count", skip_serializing_if = "Option::is_none")]
    pub matched_skills_count: Option<usize>,
}

pub fn export_rows(entries: &[RankingEntry], columns: ExportColumns) -> Vec<ExportRow> {
    entries
        .iter()
        .map(|entry| {
            let result = &entry.result;
            let (missing_skills, matched_skills_count) = match columns {
                ExportColumns::MissingSkills => (Some(result.missing_skills.join(", ")), None),
                ExportColumns::MatchedCount => (None, Some(result.matched_skills.len())),
            };
            ExportRow {
                candidate: result.candidate_id.clone(),
                match_percent: result.score,
                missing_skills,
                matched_skills_count,
            }
        })
        .collect()
}

/// Renders rows as RFC 4180 CSV with a header line.
pub fn to_csv(rows: &[ExportRow], columns: ExportColumns) -> String {
    let mut out = columns.headers().join(",");
    out.push_str("\r\n");

    for row in rows {
        let last = match columns {
            ExportColumns::MissingSkills => row.missing_skills.clone().unwrap_or_default(),
            ExportColumns::MatchedCount => row
                .matched_skills_count
                .map(|n| n.to_string())
                .unwrap_or_default(),
        };
        let fields = [
            escape_field(&row.candidate),
            row.match_percent.to_string(),
            escape_field(&last),
        ];
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
