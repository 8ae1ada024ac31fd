//! Response composition
//!
//! Turns retrieved context plus a user query into final chatbot text in two
//! steps: generation (backend completion, longest candidate wins) and tone
//! adjustment (personality-driven prefix).

mod http_backend;
mod template;

pub use http_backend::*;
pub use template::*;

use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::Mutex;
use tracing::debug;

/// Prefixes prepended when friendliness exceeds its threshold
pub const FRIENDLY_PREFIXES: [&str; 4] = [
    "Hey there! ",
    "Great question! ",
    "Happy to help! ",
    "Sure thing! ",
];

/// Prefixes prepended when formality exceeds its threshold
pub const FORMAL_PREFIXES: [&str; 4] = [
    "Dear user, ",
    "Certainly. ",
    "In response to your inquiry: ",
    "Kindly note: ",
];

const TONE_THRESHOLD: f32 = 0.7;

/// Three-axis personality configuration
///
/// Each axis lives in [0, 1] and defaults to 0.5. Personality shapes
/// response generation only; it never affects what gets stored or
/// retrieved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Personality {
    /// Warmth of tone; above 0.7 a friendly prefix is added
    pub friendliness: f32,

    /// Formality of tone; above 0.7 a formal prefix is added (unless
    /// friendliness already claimed the prefix slot)
    pub formality: f32,

    /// Sampling temperature for generation, used directly
    pub creativity: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            friendliness: 0.5,
            formality: 0.5,
            creativity: 0.5,
        }
    }
}

impl Personality {
    /// Build a validated personality
    pub fn new(friendliness: f32, formality: f32, creativity: f32) -> Result<Self> {
        let personality = Self {
            friendliness,
            formality,
            creativity,
        };
        personality.validate()?;
        Ok(personality)
    }

    /// Check that every axis is within [0, 1]
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("friendliness", self.friendliness),
            ("formality", self.formality),
            ("creativity", self.creativity),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(Error::InvalidPersonality(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Trait for text-generation backends
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce up to `candidates` completions for the prompt at the given
    /// sampling temperature, in generation order
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        candidates: usize,
    ) -> Result<Vec<String>>;
}

/// Create a generator based on configuration
pub fn create_generator(config: &GenerationConfig) -> Result<Arc<dyn Generator>> {
    match config.backend.as_str() {
        "template" => Ok(Arc::new(TemplateGenerator::new())),
        "http" => Ok(Arc::new(HttpGenerator::new(config)?)),
        other => Err(Error::Config(format!(
            "Unknown generation backend '{}'",
            other
        ))),
    }
}

/// Composes final chatbot text from retrieved context and a query
pub struct ResponseComposer {
    generator: Arc<dyn Generator>,
    candidates: usize,
    rng: Mutex<StdRng>,
}

impl ResponseComposer {
    pub fn new(generator: Arc<dyn Generator>, candidates: usize) -> Self {
        Self {
            generator,
            candidates,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Use a fixed random seed for tone-prefix selection (deterministic
    /// tests)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Generate a response for the query given retrieved context
    ///
    /// Temperature comes directly from `personality.creativity`. The
    /// longest of the returned candidates wins; ties go to the first
    /// generated.
    pub async fn generate(
        &self,
        query: &str,
        context: &str,
        personality: &Personality,
    ) -> Result<String> {
        let prompt = build_prompt(context, query);
        debug!(
            candidates = self.candidates,
            temperature = personality.creativity,
            "Requesting completions"
        );

        let candidates = self
            .generator
            .complete(&prompt, personality.creativity, self.candidates)
            .await?;

        select_longest(candidates)
            .ok_or_else(|| Error::Generation("Backend returned no candidates".to_string()))
    }

    /// Prepend at most one tone prefix according to personality
    pub fn adjust_tone(&self, response: &str, personality: &Personality) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        adjust_tone_with(response, personality, &mut *rng)
    }
}

/// Build the generation prompt from context and query
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "Context: {}\n\nQuestion: {}\n\nAnswer using only the context above.",
        context, query
    )
}

/// Pick the longest candidate; ties resolve to the earliest generated
fn select_longest(candidates: Vec<String>) -> Option<String> {
    let mut best: Option<String> = None;
    for candidate in candidates {
        match &best {
            Some(current) if candidate.chars().count() <= current.chars().count() => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Tone adjustment with an explicit random source
///
/// Friendliness is checked before formality; only one prefix is ever added
/// even when both axes exceed the threshold.
pub fn adjust_tone_with<R: Rng>(
    response: &str,
    personality: &Personality,
    rng: &mut R,
) -> String {
    let prefix = if personality.friendliness > TONE_THRESHOLD {
        FRIENDLY_PREFIXES[rng.gen_range(0..FRIENDLY_PREFIXES.len())]
    } else if personality.formality > TONE_THRESHOLD {
        FORMAL_PREFIXES[rng.gen_range(0..FORMAL_PREFIXES.len())]
    } else {
        return response.to_string();
    };

    format!("{}{}", prefix, response)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGenerator {
        candidates: Vec<String>,
    }

    #[async_trait]
    impl Generator for FixedGenerator {
        async fn complete(
            &self,
            _prompt: &str,
            _temperature: f32,
            _candidates: usize,
        ) -> Result<Vec<String>> {
            Ok(self.candidates.clone())
        }
    }

    fn composer_with(candidates: Vec<&str>) -> ResponseComposer {
        ResponseComposer::new(
            Arc::new(FixedGenerator {
                candidates: candidates.into_iter().map(String::from).collect(),
            }),
            3,
        )
        .with_seed(7)
    }

    #[test]
    fn test_personality_defaults() {
        let p = Personality::default();
        assert_eq!(p.friendliness, 0.5);
        assert_eq!(p.formality, 0.5);
        assert_eq!(p.creativity, 0.5);
    }

    #[test]
    fn test_personality_validation() {
        assert!(Personality::new(0.0, 1.0, 0.5).is_ok());
        assert!(matches!(
            Personality::new(1.2, 0.5, 0.5).unwrap_err(),
            Error::InvalidPersonality(_)
        ));
        assert!(Personality::new(0.5, -0.1, 0.5).is_err());
        assert!(Personality::new(0.5, 0.5, f32::NAN).is_err());
    }

    #[tokio::test]
    async fn test_generate_selects_longest_candidate() {
        let composer = composer_with(vec!["short", "the longest candidate here", "medium one"]);
        let response = composer
            .generate("query", "context", &Personality::default())
            .await
            .unwrap();
        assert_eq!(response, "the longest candidate here");
    }

    #[tokio::test]
    async fn test_generate_tie_goes_to_first() {
        let composer = composer_with(vec!["aaaa", "bbbb"]);
        let response = composer
            .generate("query", "context", &Personality::default())
            .await
            .unwrap();
        assert_eq!(response, "aaaa");
    }

    #[tokio::test]
    async fn test_generate_no_candidates_fails() {
        let composer = composer_with(vec![]);
        let err = composer
            .generate("query", "context", &Personality::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn test_friendly_beats_formal_above_threshold() {
        let composer = composer_with(vec!["ok"]);
        let personality = Personality::new(0.9, 0.9, 0.5).unwrap();

        for _ in 0..20 {
            let adjusted = composer.adjust_tone("The answer.", &personality);
            assert!(
                FRIENDLY_PREFIXES.iter().any(|p| adjusted.starts_with(p)),
                "expected a friendly prefix, got {:?}",
                adjusted
            );
            assert!(!FORMAL_PREFIXES.iter().any(|p| adjusted.starts_with(p)));
        }
    }

    #[test]
    fn test_formal_prefix_when_only_formality_high() {
        let composer = composer_with(vec!["ok"]);
        let personality = Personality::new(0.2, 0.8, 0.5).unwrap();

        let adjusted = composer.adjust_tone("The answer.", &personality);
        assert!(FORMAL_PREFIXES.iter().any(|p| adjusted.starts_with(p)));
        assert!(adjusted.ends_with("The answer."));
    }

    #[test]
    fn test_neutral_personality_adds_no_prefix() {
        let composer = composer_with(vec!["ok"]);
        let adjusted = composer.adjust_tone("The answer.", &Personality::default());
        assert_eq!(adjusted, "The answer.");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let composer = composer_with(vec!["ok"]);
        let personality = Personality::new(0.7, 0.7, 0.5).unwrap();
        assert_eq!(composer.adjust_tone("Reply.", &personality), "Reply.");
    }

    #[test]
    fn test_seeded_tone_is_deterministic() {
        let personality = Personality::new(0.9, 0.0, 0.5).unwrap();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = adjust_tone_with("Same reply.", &personality, &mut rng_a);
        let b = adjust_tone_with("Same reply.", &personality, &mut rng_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_prompt_contains_context_and_query() {
        let prompt = build_prompt("some context", "some question");
        assert!(prompt.contains("some context"));
        assert!(prompt.contains("some question"));
    }
}
