//! Scoring and aggregation pipeline.
//!
//! A linear sequence of pure stage functions, composed left-to-right with
//! `and_then`: `validate_inputs → extract_scores → score_optional_factors
//! → aggregate_scores → persist`. A failed stage short-circuits everything
//! after it; there is no mutable error field to check.

use serde::{Deserialize, Serialize};

use ragkit_core::error::{Error, Result};
use ragkit_core::traits::DocumentStore;

use crate::generator::Generator;
use crate::prompt;
use crate::structured::{
    parse_structured, CommunicationEvaluation, CulturalEvaluation, OptionalFactors, Qualitative,
    TechnicalEvaluation,
};

pub const WEIGHT_TOLERANCE: f32 = 0.01;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weights {
    pub technical: f32,
    pub communication: f32,
    pub cultural: f32,
    pub optional: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self { technical: 0.4, communication: 0.25, cultural: 0.25, optional: 0.1 }
    }
}

impl Weights {
    /// Weights must sum to 1.0 within `WEIGHT_TOLERANCE`.
    pub fn validate(&self) -> Result<()> {
        let total = self.technical + self.communication + self.cultural + self.optional;
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(Error::Validation(format!("weights must sum to 1.0, got {total}")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorScore {
    pub score: f32,
    pub weight: f32,
    pub contribution: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub technical: FactorScore,
    pub communication: FactorScore,
    pub cultural: FactorScore,
    pub optional: FactorScore,
}

/// The persisted outcome of one aggregation run. Immutable after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub candidate_id: String,
    pub final_score: f32,
    pub breakdown: ScoreBreakdown,
    pub weights: Weights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

/// State threaded through the stages.
#[derive(Debug, Clone)]
pub struct ScoringState {
    pub candidate_id: String,
    pub technical: TechnicalEvaluation,
    pub communication: CommunicationEvaluation,
    pub cultural: CulturalEvaluation,
    pub weights: Weights,
    technical_points: f32,
    communication_points: f32,
    cultural_points: f32,
    optional_points: f32,
    optional_assessment: String,
    breakdown: Option<ScoreBreakdown>,
    final_score: f32,
}

impl ScoringState {
    pub fn new(
        candidate_id: impl Into<String>,
        technical: TechnicalEvaluation,
        communication: CommunicationEvaluation,
        cultural: CulturalEvaluation,
        weights: Weights,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            technical,
            communication,
            cultural,
            weights,
            technical_points: 0.0,
            communication_points: 0.0,
            cultural_points: 0.0,
            optional_points: 0.0,
            optional_assessment: String::new(),
            breakdown: None,
            final_score: 0.0,
        }
    }

    pub fn optional_assessment(&self) -> &str {
        &self.optional_assessment
    }
}

/// Stage 1: every sub-evaluation must be present, untainted, and carry its
/// score field; weights must sum to 1.0. Nothing is scored before this
/// passes.
pub fn validate_inputs(state: ScoringState) -> Result<ScoringState> {
    if let Some(e) = &state.technical.error {
        return Err(Error::Validation(format!("technical evaluation invalid: {e}")));
    }
    if state.technical.technical_answers_score.is_none() {
        return Err(Error::Validation(
            "technical evaluation missing technical_answers_score".to_string(),
        ));
    }
    if let Some(e) = &state.communication.error {
        return Err(Error::Validation(format!("communication evaluation invalid: {e}")));
    }
    if state.communication.communication_score.is_none() {
        return Err(Error::Validation(
            "communication evaluation missing communication_score".to_string(),
        ));
    }
    if let Some(e) = &state.cultural.error {
        return Err(Error::Validation(format!("cultural evaluation invalid: {e}")));
    }
    if state.cultural.cultural_fit_score.is_none() {
        return Err(Error::Validation(
            "cultural evaluation missing cultural_fit_score".to_string(),
        ));
    }
    state.weights.validate()?;
    Ok(state)
}

/// Stage 2: pull numeric scores out of the sub-evaluations; the
/// qualitative technical grade maps onto the 0-100 scale.
pub fn extract_scores(mut state: ScoringState) -> Result<ScoringState> {
    state.technical_points = state
        .technical
        .technical_answers_score
        .map(Qualitative::points)
        .unwrap_or(0.0);
    state.communication_points = state.communication.communication_score.unwrap_or(0.0);
    state.cultural_points = state.cultural.cultural_fit_score.unwrap_or(0.0);
    Ok(state)
}

/// Stage 3: score project impact and certifications through the generator.
/// An error-tagged parse fails the stage.
pub fn score_optional_factors(mut state: ScoringState, generator: &Generator) -> Result<ScoringState> {
    let technical_json =
        serde_json::to_string(&state.technical).map_err(|e| Error::Operation(e.to_string()))?;
    let cultural_json =
        serde_json::to_string(&state.cultural).map_err(|e| Error::Operation(e.to_string()))?;
    let raw = generator
        .complete(&prompt::optional_factors(&technical_json, &cultural_json))
        .map_err(|e| Error::Operation(format!("optional factors scoring failed: {e}")))?;
    let parsed: OptionalFactors = parse_structured(&raw);
    if let Some(e) = parsed.error {
        return Err(Error::Operation(format!("optional factors scoring failed: {e}")));
    }
    state.optional_points = parsed.optional_factors_score.unwrap_or(0.0).clamp(0.0, 100.0);
    state.optional_assessment = parsed.assessment;
    Ok(state)
}

/// Stage 4: weighted sum with a per-factor contribution breakdown.
pub fn aggregate_scores(mut state: ScoringState) -> Result<ScoringState> {
    let w = state.weights;
    let factor = |score: f32, weight: f32| FactorScore {
        score,
        weight,
        contribution: round2(score * weight),
    };
    state.breakdown = Some(ScoreBreakdown {
        technical: factor(state.technical_points, w.technical),
        communication: factor(state.communication_points, w.communication),
        cultural: factor(state.cultural_points, w.cultural),
        optional: factor(state.optional_points, w.optional),
    });
    state.final_score = round2(
        state.technical_points * w.technical
            + state.communication_points * w.communication
            + state.cultural_points * w.cultural
            + state.optional_points * w.optional,
    );
    Ok(state)
}

/// Stage 5: insert the record through the store collaborator and capture
/// the assigned id.
pub fn persist(state: ScoringState, store: &mut dyn DocumentStore) -> Result<EvaluationRecord> {
    let Some(breakdown) = state.breakdown else {
        return Err(Error::Operation("aggregate_scores must run before persist".to_string()));
    };
    let mut record = EvaluationRecord {
        candidate_id: state.candidate_id,
        final_score: state.final_score,
        breakdown,
        weights: state.weights,
        record_id: None,
    };
    let value = serde_json::to_value(&record).map_err(|e| Error::Operation(e.to_string()))?;
    let id = store
        .insert(value)
        .map_err(|e| Error::Operation(format!("failed to persist evaluation: {e}")))?;
    record.record_id = Some(id);
    Ok(record)
}

/// Run the full pipeline.
pub fn run(
    state: ScoringState,
    generator: &Generator,
    store: &mut dyn DocumentStore,
) -> Result<EvaluationRecord> {
    validate_inputs(state)
        .and_then(extract_scores)
        .and_then(|s| score_optional_factors(s, generator))
        .and_then(aggregate_scores)
        .and_then(|s| persist(s, store))
}

fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}
