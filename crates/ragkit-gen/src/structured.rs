//! Structured model output: fence stripping and tolerant parsing.
//!
//! A parse failure never propagates. The caller gets the type's default
//! value with the failure recorded on the object, so downstream code can
//! rely on every field being present.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Remove a wrapping markdown code fence (``` or ```json) from raw model
/// output, leaving the payload untouched otherwise.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_open = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed.to_string();
    };
    let without_close = without_open.strip_suffix("```").unwrap_or(without_open);
    without_close.trim().to_string()
}

/// Model output types that can absorb a parse failure.
pub trait StructuredOutput: DeserializeOwned + Default {
    fn tag_error(&mut self, message: String);
}

/// Parse (possibly fenced) JSON from the model into `T`; on failure return
/// the error-tagged default instead of propagating.
pub fn parse_structured<T: StructuredOutput>(raw: &str) -> T {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<T>(&cleaned) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "structured output parse failed, returning default");
            let mut fallback = T::default();
            fallback.tag_error(format!("failed to parse model output: {e}"));
            fallback
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub company: String,
    pub role: String,
    pub duration: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeProfile {
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StructuredOutput for ResumeProfile {
    fn tag_error(&mut self, message: String) {
        self.error = Some(message);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticSkillMatch {
    pub semantic_match_score: f32,
    pub matching_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StructuredOutput for SemanticSkillMatch {
    fn tag_error(&mut self, message: String) {
        self.error = Some(message);
    }
}

/// Three-level qualitative grade used by the technical evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qualitative {
    Low,
    Medium,
    High,
}

impl Qualitative {
    /// Numeric points on the 0-100 aggregation scale.
    pub fn points(self) -> f32 {
        match self {
            Qualitative::Low => 30.0,
            Qualitative::Medium => 60.0,
            Qualitative::High => 90.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchedSkill {
    pub skill: String,
    pub jd_requirement: String,
    pub proficiency: String,
    pub evidence: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalEvaluation {
    pub matched_skills: Vec<MatchedSkill>,
    pub technical_answers_score: Option<Qualitative>,
    pub overall_technical_fit: Option<Qualitative>,
    pub coverage_percentage: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StructuredOutput for TechnicalEvaluation {
    fn tag_error(&mut self, message: String) {
        self.error = Some(message);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunicationEvaluation {
    pub communication_score: Option<f32>,
    pub clarity_assessment: String,
    pub structure_assessment: String,
    pub tone_assessment: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StructuredOutput for CommunicationEvaluation {
    fn tag_error(&mut self, message: String) {
        self.error = Some(message);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchedAttribute {
    pub attribute: String,
    pub jd_requirement: String,
    pub evidence: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturalEvaluation {
    pub cultural_fit_score: Option<f32>,
    pub matched_cultural_attributes: Vec<MatchedAttribute>,
    pub cultural_fit_report: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub coverage_percentage: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StructuredOutput for CulturalEvaluation {
    fn tag_error(&mut self, message: String) {
        self.error = Some(message);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionalFactors {
    pub optional_factors_score: Option<f32>,
    pub assessment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StructuredOutput for OptionalFactors {
    fn tag_error(&mut self, message: String) {
        self.error = Some(message);
    }
}
