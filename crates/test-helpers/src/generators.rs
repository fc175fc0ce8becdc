//! Text generators with predictable output.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use townsim_simulation::{ProviderError, TextGenerator};

/// Answers `"<persona> #<n>"`, numbering calls from 1, and records prompts.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, persona: &str) -> Result<String, ProviderError> {
        let mut prompts = self.prompts.lock();
        prompts.push(prompt.to_string());
        Ok(format!("{} #{}", persona, prompts.len()))
    }
}

/// Fails for the listed bots (matched by fixture persona), echoes otherwise.
#[derive(Debug)]
pub struct FailingGenerator {
    personas: HashSet<String>,
    all: bool,
}

impl FailingGenerator {
    pub fn for_bots(names: &[&str]) -> Self {
        Self {
            personas: names.iter().map(|n| format!("You are {}.", n)).collect(),
            all: false,
        }
    }

    /// Fail every request.
    pub fn always() -> Self {
        Self {
            personas: HashSet::new(),
            all: true,
        }
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, persona: &str) -> Result<String, ProviderError> {
        if self.all || self.personas.contains(persona) {
            return Err(ProviderError::Generation("model unavailable".to_string()));
        }
        Ok(format!("{} is fine", persona))
    }
}
