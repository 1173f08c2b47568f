//! Typed assessment items from a topic and optional context.
//!
//! Each call walks `Request -> PromptBuild -> LlmCall -> Parse ->
//! ValidateRepair -> Result`. A failed call, an unparseable reply or an empty
//! repaired set diverts to `Fallback`, which always yields one usable item.

pub mod parse;
pub mod prompt;
pub mod repair;

use crate::services::generative::{complete_within, CompletionParams, GenerativeTextService};
use crate::types::{ContentSource, Difficulty, Language, QuestionItem, QuestionKind, QuestionOptions, QuestionType};
use chrono::Utc;
use parse::JsonArrayScanner;
use repair::{option_placeholder, placeholders, validate_and_repair, RepairContext, PADDED_OPTIONS};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Request,
    PromptBuild,
    LlmCall,
    Parse,
    ValidateRepair,
    Fallback,
    Result,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationStage::Request => "request",
            GenerationStage::PromptBuild => "prompt_build",
            GenerationStage::LlmCall => "llm_call",
            GenerationStage::Parse => "parse",
            GenerationStage::ValidateRepair => "validate_repair",
            GenerationStage::Fallback => "fallback",
            GenerationStage::Result => "result",
        };
        f.write_str(name)
    }
}

pub struct QuestionGenerator {
    service: Arc<dyn GenerativeTextService>,
    scanner: JsonArrayScanner,
}

impl QuestionGenerator {
    pub fn new(service: Arc<dyn GenerativeTextService>) -> Self {
        Self {
            service,
            scanner: JsonArrayScanner::new(),
        }
    }

    /// Never returns an empty list.
    pub async fn generate(
        &self,
        topic: &str,
        context: &str,
        requested_types: &[QuestionType],
        language: Language,
        options: &QuestionOptions,
    ) -> Vec<QuestionItem> {
        info!(
            "Generating questions for '{}' ({}, types: {:?})",
            topic, language, requested_types
        );

        if !self.service.is_available() {
            return self.fallback(topic, language, GenerationStage::Request, "generative service not configured");
        }

        debug!("Stage {}", GenerationStage::PromptBuild);
        let system_prompt = prompt::system_prompt(language);
        let user_prompt = prompt::build_prompt(topic, context, requested_types, language, options.max_context_chars);
        let params = CompletionParams::new(options.max_tokens, options.temperature);

        debug!("Stage {}", GenerationStage::LlmCall);
        let raw = match complete_within(
            self.service.as_ref(),
            &system_prompt,
            &user_prompt,
            &params,
            options.timeout,
        )
        .await
        {
            Ok(raw) => raw,
            Err(e) => return self.fallback(topic, language, GenerationStage::LlmCall, &e.to_string()),
        };

        debug!("Stage {}", GenerationStage::Parse);
        let values = match self.scanner.parse_response(&raw) {
            Ok(values) => values,
            Err(e) => return self.fallback(topic, language, GenerationStage::Parse, &e.to_string()),
        };

        debug!("Stage {} over {} elements", GenerationStage::ValidateRepair, values.len());
        let ctx = RepairContext::new(topic, language);
        let items: Vec<QuestionItem> = values
            .iter()
            .filter_map(|value| validate_and_repair(value, &ctx))
            .collect();

        if items.is_empty() {
            return self.fallback(
                topic,
                language,
                GenerationStage::ValidateRepair,
                "no usable question objects in model output",
            );
        }

        info!("Stage {}: generated {} questions", GenerationStage::Result, items.len());
        items
    }

    fn fallback(&self, topic: &str, language: Language, stage: GenerationStage, reason: &str) -> Vec<QuestionItem> {
        warn!(
            "Question generation moved from {} to {} ({}): {}",
            stage,
            GenerationStage::Fallback,
            self.service.name(),
            reason
        );
        vec![fallback_question(topic, language)]
    }
}

/// Deterministic placeholder item: four options, the first one correct.
pub fn fallback_question(topic: &str, language: Language) -> QuestionItem {
    let words = placeholders(language);
    let topic = topic.trim();
    let question = if topic.is_empty() {
        words.fallback_question.to_string()
    } else {
        format!("{}: {}", words.fallback_question, topic)
    };

    QuestionItem {
        id: format!("fallback_{}", Uuid::new_v4().simple()),
        question,
        difficulty: Difficulty::Medium,
        explanation: words.fallback_explanation.to_string(),
        language,
        generated_at: Utc::now(),
        generated: true,
        source: ContentSource::Fallback,
        kind: QuestionKind::MultipleChoice {
            options: (0..PADDED_OPTIONS)
                .map(|index| option_placeholder(language, index))
                .collect(),
            correct_answer: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForgeError;
    use crate::services::generative::testing::ScriptedService;
    use crate::services::generative::UnavailableService;

    fn assert_single_fallback(items: &[QuestionItem]) {
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert!(item.is_fallback());
        assert!(item.generated);
        assert!(item.id.starts_with("fallback_"));
        match &item.kind {
            QuestionKind::MultipleChoice { options, correct_answer } => {
                assert_eq!(options.len(), 4);
                assert_eq!(*correct_answer, 0);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_photosynthesis_without_service() {
        let generator = QuestionGenerator::new(Arc::new(UnavailableService));
        let items = generator
            .generate("Photosynthesis", "", &[], Language::Cs, &QuestionOptions::default())
            .await;

        assert_single_fallback(&items);
        assert_eq!(items[0].question_type(), QuestionType::MultipleChoice);
        assert!(items[0].question.contains("Photosynthesis"));
        assert_eq!(items[0].language, Language::Cs);
    }

    #[tokio::test]
    async fn test_generated_items_are_repaired() {
        let reply = r#"Sure! Here they are:
[
  {"type": "Multiple Choice", "question": "Which pigment absorbs light?",
   "options": ["Chlorophyll", "Keratin", "Melanin"], "correctAnswer": "chlorophyll", "difficulty": "easy"},
  {"type": "free_text", "question": "Explain photosynthesis.", "correctAnswer": "Light to chemical energy",
   "keyWords": ["light", "glucose"]},
  {"type": "fill-in-the-blank", "question": "Plants release _____.", "alternatives": ["O2"]},
  {"type": "matching", "pairs": [{"term": "CO2", "definition": "Input"}, {"term": "O2", "definition": "Output"}]},
  "stray string"
]"#;
        let service = Arc::new(ScriptedService::replying(reply));
        let generator = QuestionGenerator::new(service.clone());

        let items = generator
            .generate("Photosynthesis", "Plants convert light.", &[], Language::En, &QuestionOptions::default())
            .await;

        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|item| item.source == ContentSource::Llm && item.id.starts_with("ai_")));

        match &items[0].kind {
            QuestionKind::MultipleChoice { options, correct_answer } => {
                assert_eq!(options.len(), 3);
                assert_eq!(*correct_answer, 0);
            }
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(items[0].difficulty, Difficulty::Easy);

        match &items[1].kind {
            QuestionKind::FreeText { model_answer, key_words } => {
                assert_eq!(model_answer, "Light to chemical energy");
                assert_eq!(key_words.len(), 2);
            }
            other => panic!("unexpected kind {:?}", other),
        }

        match &items[2].kind {
            QuestionKind::FillInBlank { answer, .. } => assert_eq!(answer, "O2"),
            other => panic!("unexpected kind {:?}", other),
        }

        assert_eq!(items[3].question, "Photosynthesis");

        let calls = service.calls();
        assert!(calls[0].0.contains("\"type\": \"matching\""));
        assert!(calls[0].1.contains("Context: Plants convert light."));
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back() {
        let generator = QuestionGenerator::new(Arc::new(ScriptedService::replying("I am unable to comply.")));
        let items = generator
            .generate("Safety", "", &[], Language::En, &QuestionOptions::default())
            .await;

        assert_single_fallback(&items);
        assert_eq!(items[0].question, "Generated question about: Safety");
    }

    #[tokio::test]
    async fn test_service_error_falls_back() {
        let generator = QuestionGenerator::new(Arc::new(ScriptedService::failing(ForgeError::Timeout {
            seconds: 90,
        })));
        let items = generator
            .generate("Safety", "", &[QuestionType::FreeText], Language::De, &QuestionOptions::default())
            .await;

        assert_single_fallback(&items);
        match &items[0].kind {
            QuestionKind::MultipleChoice { options, .. } => assert_eq!(options[3], "Option D"),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_array_of_non_objects_falls_back() {
        let generator = QuestionGenerator::new(Arc::new(ScriptedService::replying(r#"["a", "b"]"#)));
        let items = generator
            .generate("Topic", "", &[], Language::Sk, &QuestionOptions::default())
            .await;

        assert_single_fallback(&items);
        assert!(items[0].question.starts_with("Vygenerovaná otázka k téme"));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(GenerationStage::ValidateRepair.to_string(), "validate_repair");
        assert_eq!(GenerationStage::LlmCall.to_string(), "llm_call");
    }
}
