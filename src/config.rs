use crate::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_TOPIC_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for an OpenAI-compatible completion endpoint.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub topic_model: String,
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            topic_model: DEFAULT_TOPIC_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads the service settings from the environment. Returns `None` when no
    /// API key is set, which puts every generator into permanent fallback mode.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty())?;
        let mut config = Self::new(api_key.trim());

        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("LESSON_FORGE_MODEL").filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(model) = lookup("LESSON_FORGE_TOPIC_MODEL").filter(|v| !v.trim().is_empty()) {
            config.topic_model = model.trim().to_string();
        }
        if let Some(secs) = lookup("LESSON_FORGE_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs.max(1));
        }

        debug!("Service config: base_url={}, model={}", config.base_url, config.model);
        Some(config)
    }
}

/// One additive scoring step: `points` are awarded once the measured value
/// passes `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTier {
    pub threshold: usize,
    pub points: u32,
}

const fn tier(threshold: usize, points: u32) -> ScoreTier {
    ScoreTier { threshold, points }
}

/// Largest number of points a single scoring step may award.
pub const MAX_STEP_POINTS: u32 = 100;

/// Constants of the heuristic answer scoring. Defaults reproduce the
/// historical behaviour exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Trimmed answers shorter than this score zero completion.
    pub min_answer_chars: usize,
    /// Awarded when the answer has strictly more characters than the threshold.
    pub length_tiers: Vec<ScoreTier>,
    /// Question tokens need at least this many characters to count as relevant.
    pub min_question_token_chars: usize,
    pub relevance_points_per_match: u32,
    pub relevance_cap: u32,
    /// Awarded when the answer has at least `threshold` sentences.
    pub sentence_tiers: Vec<ScoreTier>,
    /// Awarded when the answer has at least `threshold` words.
    pub word_tiers: Vec<ScoreTier>,
    pub vocabulary_points_per_hit: u32,
    pub vocabulary_cap: u32,
    pub punctuation_points: u32,
    pub connective_points: u32,
    /// Matched against whole answer words, so "standard" does not count as "and".
    /// The historical scorer matched substrings; scores differ for such answers.
    pub connectives: Vec<String>,
    pub completion_threshold: u8,
    pub excellent_threshold: u8,
    pub good_threshold: u8,
    pub partial_threshold: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_answer_chars: 10,
            length_tiers: vec![tier(50, 30), tier(100, 20), tier(200, 10)],
            min_question_token_chars: 4,
            relevance_points_per_match: 10,
            relevance_cap: 40,
            sentence_tiers: vec![tier(2, 10), tier(3, 10)],
            word_tiers: vec![tier(10, 20), tier(20, 10), tier(30, 10)],
            vocabulary_points_per_hit: 5,
            vocabulary_cap: 30,
            punctuation_points: 10,
            connective_points: 20,
            connectives: [
                "and", "but", "because", "so", "then", "also", "however", "ale", "a", "také",
                "protože",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
            completion_threshold: 70,
            excellent_threshold: 80,
            good_threshold: 60,
            partial_threshold: 40,
        }
    }
}

impl ScoringConfig {
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ForgeError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let raw = tokio::fs::read_to_string(path).await?;
        let config: ScoringConfig = serde_json::from_str(&raw)?;
        config.validate()?;

        info!("Loaded scoring config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("completionThreshold", self.completion_threshold),
            ("excellentThreshold", self.excellent_threshold),
            ("goodThreshold", self.good_threshold),
            ("partialThreshold", self.partial_threshold),
        ];
        for (name, value) in thresholds {
            if value > 100 {
                return Err(ForgeError::InvalidInput {
                    reason: format!("{} must be within 0..=100, got {}", name, value),
                });
            }
        }

        if !(self.partial_threshold <= self.good_threshold && self.good_threshold <= self.excellent_threshold) {
            return Err(ForgeError::InvalidInput {
                reason: "feedback thresholds must satisfy partial <= good <= excellent".to_string(),
            });
        }

        let steps = self
            .length_tiers
            .iter()
            .chain(&self.sentence_tiers)
            .chain(&self.word_tiers)
            .map(|t| ("tier points", t.points))
            .chain([
                ("relevancePointsPerMatch", self.relevance_points_per_match),
                ("vocabularyPointsPerHit", self.vocabulary_points_per_hit),
                ("punctuationPoints", self.punctuation_points),
                ("connectivePoints", self.connective_points),
            ]);
        for (name, points) in steps {
            if points > MAX_STEP_POINTS {
                return Err(ForgeError::InvalidInput {
                    reason: format!("{} must be at most {}, got {}", name, MAX_STEP_POINTS, points),
                });
            }
        }

        if self.min_answer_chars == 0 {
            return Err(ForgeError::InvalidInput {
                reason: "minAnswerChars must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
