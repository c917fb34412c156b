//! Candidate evaluation: deterministic score blending around structured
//! model output. The model supplies semantic judgments; every numeric
//! combination happens here at fixed weights.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::generator::Generator;
use crate::prompt;
use crate::structured::{
    parse_structured, CommunicationEvaluation, CulturalEvaluation, ResumeProfile,
    SemanticSkillMatch, StructuredOutput, TechnicalEvaluation,
};

pub const EXACT_WEIGHT: f32 = 0.4;
pub const SEMANTIC_WEIGHT: f32 = 0.6;
const SKILL_WEIGHT: f32 = 0.5;
const QUALITY_WEIGHT: f32 = 0.5;
const MIN_RESUME_TEXT_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatch {
    pub match_score: f32,
    pub matching_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
}

/// Fraction of `required` present verbatim in `offered`. Zero when nothing
/// is required.
pub fn exact_match_score(required: &[String], offered: &[String]) -> f32 {
    if required.is_empty() {
        return 0.0;
    }
    let offered: HashSet<&str> = offered.iter().map(String::as_str).collect();
    let matches = required.iter().filter(|s| offered.contains(s.as_str())).count();
    matches as f32 / required.len() as f32
}

/// Blend the exact-intersection score with the model's semantic score at
/// fixed weights. A failed model call or an error-tagged parse falls back
/// to the exact score alone, reporting every required skill as a gap.
pub fn skill_match(
    generator: &Generator,
    required: &[String],
    offered: &[String],
    job_description: &str,
) -> SkillMatch {
    let exact = exact_match_score(required, offered);
    let fallback = || SkillMatch {
        match_score: exact,
        matching_skills: Vec::new(),
        skill_gaps: required.to_vec(),
    };

    let raw = match generator.complete(&prompt::semantic_skill_match(required, offered, job_description)) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "semantic skill match failed, using exact score");
            return fallback();
        }
    };
    let semantic: SemanticSkillMatch = parse_structured(&raw);
    if semantic.error.is_some() {
        return fallback();
    }
    let blended = (exact * EXACT_WEIGHT + semantic.semantic_match_score * SEMANTIC_WEIGHT).min(1.0);
    SkillMatch {
        match_score: blended,
        matching_skills: semantic.matching_skills,
        skill_gaps: semantic.skill_gaps,
    }
}

/// Interviewer quality from past feedback (0-5 scale) and years of
/// experience, the latter saturating at ten years.
pub fn quality_score(feedback_score: f32, years_of_experience: f32) -> f32 {
    let feedback = (feedback_score / 5.0).clamp(0.0, 1.0);
    let experience = (years_of_experience / 10.0).clamp(0.0, 1.0);
    feedback * 0.6 + experience * 0.4
}

pub fn overall_score(skill_score: f32, quality: f32) -> f32 {
    skill_score * SKILL_WEIGHT + quality * QUALITY_WEIGHT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCoverage {
    pub coverage_score: f32,
    pub covered_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Coverage of `required` by the union of available skills. The score is
/// the raw covered fraction; 1.0 when nothing is required.
pub fn skill_coverage(required: &[String], available: &[String]) -> SkillCoverage {
    if required.is_empty() {
        return SkillCoverage {
            coverage_score: 1.0,
            covered_skills: Vec::new(),
            missing_skills: Vec::new(),
        };
    }
    let available: HashSet<&str> = available.iter().map(String::as_str).collect();
    let (covered, missing): (Vec<String>, Vec<String>) = required
        .iter()
        .cloned()
        .partition(|s| available.contains(s.as_str()));
    let score = covered.len() as f32 / required.len() as f32;
    SkillCoverage { coverage_score: score, covered_skills: covered, missing_skills: missing }
}

/// Extract a structured profile from raw resume text. Too-short input and
/// model failures produce the error-tagged default, never a raw error.
pub fn parse_resume(generator: &Generator, raw_text: &str) -> ResumeProfile {
    let cleaned = raw_text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().count() < MIN_RESUME_TEXT_LEN {
        let mut profile = ResumeProfile::default();
        profile.error = Some("extracted text is too short or empty".to_string());
        return profile;
    }
    complete_structured(generator, &prompt::resume_extraction(&cleaned))
}

/// Evaluate written answers for clarity, structure, and tone. No answers
/// at all yields the error-tagged default without a model call.
pub fn evaluate_communication(
    generator: &Generator,
    answers: &[String],
) -> CommunicationEvaluation {
    if answers.is_empty() {
        let mut evaluation = CommunicationEvaluation::default();
        evaluation.error = Some("no answers provided for communication evaluation".to_string());
        return evaluation;
    }
    let answers_json = serde_json::to_string(answers).unwrap_or_default();
    complete_structured(generator, &prompt::communication_evaluation(&answers_json))
}

/// Technical evaluation against a job description, grounded in retrieved
/// context from a technical knowledge base.
pub fn evaluate_technical(
    generator: &Generator,
    candidate_json: &str,
    job_description: &str,
    context: &str,
) -> TechnicalEvaluation {
    complete_structured(
        generator,
        &prompt::technical_evaluation(candidate_json, job_description, context),
    )
}

/// Cultural-fit evaluation against the job description's cultural
/// requirements.
pub fn evaluate_cultural_fit(
    generator: &Generator,
    candidate_json: &str,
    job_description: &str,
    context: &str,
) -> CulturalEvaluation {
    complete_structured(generator, &prompt::cultural_fit(candidate_json, job_description, context))
}

fn complete_structured<T: StructuredOutput>(generator: &Generator, prompt: &str) -> T {
    match generator.complete(prompt) {
        Ok(raw) => parse_structured(&raw),
        Err(e) => {
            let mut fallback = T::default();
            fallback.tag_error(format!("model call failed: {e}"));
            fallback
        }
    }
}
