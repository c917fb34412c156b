use ragkit_core::error::{BackendError, Error};
use ragkit_core::traits::GenerativeBackend;
use ragkit_gen::generator::{Generator, DEFAULT_MODELS};

struct FlakyBackend {
    missing: Vec<&'static str>,
}

impl FlakyBackend {
    fn new(missing: Vec<&'static str>) -> Self {
        Self { missing }
    }
}

impl GenerativeBackend for FlakyBackend {
    fn generate(&self, _prompt: &str, model_id: &str) -> Result<String, BackendError> {
        if self.missing.contains(&model_id) {
            return Err(BackendError::ModelNotFound(model_id.to_string()));
        }
        Ok(format!("answer from {model_id}"))
    }
}

#[test]
fn fallback_chain_skips_missing_models() {
    let generator = Generator::new(Box::new(FlakyBackend::new(vec![
        "gemini-1.5-flash",
        "gemini-1.5-pro",
    ])));
    let answer = generator.complete("hello").unwrap();
    assert_eq!(answer, "answer from gemini-pro");
}

#[test]
fn first_available_model_wins() {
    let generator = Generator::new(Box::new(FlakyBackend::new(Vec::new())));
    let answer = generator.complete("hello").unwrap();
    assert_eq!(answer, "answer from gemini-1.5-flash");
}

#[test]
fn exhausted_fallbacks_surface_model_unavailable() {
    let generator = Generator::new(Box::new(FlakyBackend::new(DEFAULT_MODELS.to_vec())));
    let err = generator.complete("hello").unwrap_err();
    assert!(matches!(err, Error::ModelUnavailable(_)));
}

#[test]
fn non_missing_failures_are_surfaced_immediately() {
    struct BrokenBackend;
    impl GenerativeBackend for BrokenBackend {
        fn generate(&self, _prompt: &str, _model_id: &str) -> Result<String, BackendError> {
            Err(BackendError::Other("connection reset".to_string()))
        }
    }

    let generator = Generator::new(Box::new(BrokenBackend));
    let err = generator.complete("hello").unwrap_err();
    assert!(matches!(err, Error::Operation(_)));
}

#[test]
fn answer_embeds_context_and_question_verbatim() {
    struct EchoBackend;
    impl GenerativeBackend for EchoBackend {
        fn generate(&self, prompt: &str, _model_id: &str) -> Result<String, BackendError> {
            Ok(prompt.to_string())
        }
    }

    let generator = Generator::new(Box::new(EchoBackend));
    let out = generator.answer("CTX-BLOCK", "QUESTION-TEXT?").unwrap();
    assert!(out.contains("CTX-BLOCK"));
    assert!(out.contains("QUESTION-TEXT?"));
}

#[test]
fn custom_model_lists_are_respected() {
    let generator = Generator::with_models(
        Box::new(FlakyBackend::new(vec!["primary"])),
        vec!["primary".to_string(), "secondary".to_string()],
    );
    let answer = generator.complete("hello").unwrap();
    assert_eq!(answer, "answer from secondary");
}
