use ragkit_core::error::{BackendError, Error, Result};
use ragkit_core::traits::GenerativeBackend;

use crate::prompt;

/// Model identifiers tried in order of preference.
pub const DEFAULT_MODELS: [&str; 3] = ["gemini-1.5-flash", "gemini-1.5-pro", "gemini-pro"];

pub struct Generator {
    backend: Box<dyn GenerativeBackend>,
    models: Vec<String>,
}

impl Generator {
    pub fn new(backend: Box<dyn GenerativeBackend>) -> Self {
        Self::with_models(backend, DEFAULT_MODELS.iter().map(|m| (*m).to_string()).collect())
    }

    pub fn with_models(backend: Box<dyn GenerativeBackend>, models: Vec<String>) -> Self {
        Self { backend, models }
    }

    /// Run `prompt` through the first model the backend accepts.
    ///
    /// `ModelNotFound` moves on to the next identifier; any other backend
    /// failure is surfaced immediately. Exhausting the list is
    /// `Error::ModelUnavailable`.
    pub fn complete(&self, prompt: &str) -> Result<String> {
        for model in &self.models {
            match self.backend.generate(prompt, model) {
                Ok(text) => return Ok(text.trim().to_string()),
                Err(BackendError::ModelNotFound(_)) => {
                    tracing::warn!(model = %model, "model unavailable, trying next");
                }
                Err(BackendError::Other(message)) => return Err(Error::Operation(message)),
            }
        }
        Err(Error::ModelUnavailable(self.models.join(", ")))
    }

    /// Answer `question` grounded in `context`.
    pub fn answer(&self, context: &str, question: &str) -> Result<String> {
        self.complete(&prompt::grounded_answer(context, question))
    }
}
