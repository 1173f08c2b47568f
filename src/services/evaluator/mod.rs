//! Deterministic, offline scoring of free-text answers.
//!
//! Completion estimates how fully the answer addresses the question; quality
//! looks at length, vocabulary, punctuation and connectives. All constants
//! come from [`ScoringConfig`].

pub mod feedback;
pub mod vocabulary;

use crate::config::{ScoreTier, ScoringConfig};
use crate::error::Result;
use crate::types::{EvaluationResult, Language, ResponseLengthStats};
use chrono::Utc;
use feedback::{phrases, FeedbackTier};
use tracing::{debug, error, info};
pub use vocabulary::TrainingProfile;

const SHORT_ANSWER_CHARS: usize = 50;
const DETAILED_ANSWER_CHARS: usize = 100;
const RELEVANT_MATCHES_FOR_STRENGTH: usize = 2;

/// Measurements taken once per answer and shared by both scores and the
/// report lines.
#[derive(Debug, Default)]
struct AnswerSignals {
    characters: usize,
    words: usize,
    sentences: usize,
    keyword_matches: Vec<String>,
    vocabulary_hits: usize,
    vocabulary_available: bool,
    has_punctuation: bool,
    has_connective: bool,
}

pub struct ResponseEvaluator {
    config: ScoringConfig,
}

impl ResponseEvaluator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores with Czech feedback.
    pub fn evaluate(&self, question: &str, answer: &str, training_profile: &str) -> EvaluationResult {
        self.evaluate_in(question, answer, training_profile, Language::Cs)
    }

    /// Never fails: any internal error yields [`Self::default_result`].
    pub fn evaluate_in(
        &self,
        question: &str,
        answer: &str,
        training_profile: &str,
        language: Language,
    ) -> EvaluationResult {
        match self.try_evaluate(question, answer, training_profile, language) {
            Ok(result) => result,
            Err(e) => {
                error!("Answer evaluation failed: {}", e);
                Self::default_result(language)
            }
        }
    }

    pub fn try_evaluate(
        &self,
        question: &str,
        answer: &str,
        training_profile: &str,
        language: Language,
    ) -> Result<EvaluationResult> {
        self.config.validate()?;

        let profile = TrainingProfile::from_name(training_profile);
        let signals = self.measure(question, answer, profile);
        debug!("Answer signals for {}: {:?}", profile, signals);

        let completion = self.completion_percentage(&signals);
        let quality = self.quality_score(&signals);
        let phrases = phrases(language);

        let result = EvaluationResult {
            completion_percentage: completion,
            quality_score: quality,
            feedback: phrases.for_tier(self.feedback_tier(completion, quality)).to_string(),
            strengths: strengths(&signals, language),
            improvements: improvements(&signals, language),
            response_length_stats: length_stats(&signals),
            keyword_matches: signals.keyword_matches,
            is_complete: completion >= self.config.completion_threshold,
            timestamp: Utc::now(),
        };

        info!(
            "Evaluated answer ({}): completion {}%, quality {}%, complete: {}",
            profile, result.completion_percentage, result.quality_score, result.is_complete
        );
        Ok(result)
    }

    /// Zero scores, a localized "could not evaluate" message and one hint.
    pub fn default_result(language: Language) -> EvaluationResult {
        let phrases = phrases(language);
        EvaluationResult {
            completion_percentage: 0,
            quality_score: 0,
            feedback: phrases.not_evaluated.to_string(),
            strengths: Vec::new(),
            improvements: vec![phrases.not_evaluated_hint.to_string()],
            keyword_matches: Vec::new(),
            response_length_stats: ResponseLengthStats::default(),
            is_complete: false,
            timestamp: Utc::now(),
        }
    }

    fn measure(&self, question: &str, answer: &str, profile: TrainingProfile) -> AnswerSignals {
        let trimmed = answer.trim();
        let lowered = trimmed.to_lowercase();
        let answer_tokens: Vec<&str> = lowered.split_whitespace().collect();

        let keyword_matches = self
            .relevant_words(question, profile)
            .into_iter()
            .filter(|word| {
                answer_tokens
                    .iter()
                    .any(|token| token.contains(word.as_str()) || word.contains(token))
            })
            .collect();

        let vocabulary = profile.professional_words();
        let vocabulary_hits = vocabulary
            .iter()
            .filter(|word| lowered.contains(&word.to_lowercase()))
            .count();

        let answer_words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has_connective = self
            .config
            .connectives
            .iter()
            .any(|connective| answer_words.contains(&connective.to_lowercase().as_str()));

        AnswerSignals {
            characters: trimmed.chars().count(),
            words: trimmed.split_whitespace().count(),
            sentences: count_sentences(trimmed),
            keyword_matches,
            vocabulary_hits,
            vocabulary_available: !vocabulary.is_empty(),
            has_punctuation: trimmed.contains(['.', '!', '?']),
            has_connective,
        }
    }

    /// Long-enough question tokens followed by the profile's relevance words,
    /// without duplicates.
    fn relevant_words(&self, question: &str, profile: TrainingProfile) -> Vec<String> {
        let mut words: Vec<String> = Vec::new();
        let candidates = question
            .to_lowercase()
            .split_whitespace()
            .filter(|token| token.chars().count() >= self.config.min_question_token_chars)
            .map(str::to_string)
            .collect::<Vec<_>>();

        for word in candidates
            .into_iter()
            .chain(profile.relevance_words().iter().map(|w| w.to_string()))
        {
            if !words.contains(&word) {
                words.push(word);
            }
        }
        words
    }

    fn completion_percentage(&self, signals: &AnswerSignals) -> u8 {
        if signals.characters < self.config.min_answer_chars {
            return 0;
        }

        let config = &self.config;
        let mut score = tier_points(&config.length_tiers, |t| signals.characters > t.threshold);

        score = score.saturating_add(capped_points(
            signals.keyword_matches.len(),
            config.relevance_points_per_match,
            config.relevance_cap,
        ));
        score = score.saturating_add(tier_points(&config.sentence_tiers, |t| {
            signals.sentences >= t.threshold
        }));

        clamp_percent(score)
    }

    fn quality_score(&self, signals: &AnswerSignals) -> u8 {
        if signals.characters == 0 {
            return 0;
        }

        let config = &self.config;
        let mut score = tier_points(&config.word_tiers, |t| signals.words >= t.threshold);

        score = score.saturating_add(capped_points(
            signals.vocabulary_hits,
            config.vocabulary_points_per_hit,
            config.vocabulary_cap,
        ));

        if signals.has_punctuation {
            score = score.saturating_add(config.punctuation_points);
        }
        if signals.has_connective {
            score = score.saturating_add(config.connective_points);
        }

        clamp_percent(score)
    }

    fn feedback_tier(&self, completion: u8, quality: u8) -> FeedbackTier {
        let config = &self.config;
        if completion >= config.excellent_threshold && quality >= config.excellent_threshold {
            FeedbackTier::Excellent
        } else if completion >= config.good_threshold && quality >= config.good_threshold {
            FeedbackTier::Good
        } else if completion >= config.partial_threshold {
            FeedbackTier::Partial
        } else {
            FeedbackTier::Insufficient
        }
    }
}

impl Default for ResponseEvaluator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

fn tier_points<F>(tiers: &[ScoreTier], passed: F) -> u32
where
    F: Fn(&ScoreTier) -> bool,
{
    tiers
        .iter()
        .filter(|t| passed(t))
        .fold(0u32, |total, t| total.saturating_add(t.points))
}

fn capped_points(count: usize, points_each: u32, cap: u32) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(points_each)
        .min(cap)
}

fn clamp_percent(score: u32) -> u8 {
    score.min(100) as u8
}

fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

fn length_stats(signals: &AnswerSignals) -> ResponseLengthStats {
    let average = if signals.sentences == 0 {
        0.0
    } else {
        (signals.words as f64 / signals.sentences as f64 * 10.0).round() / 10.0
    };

    ResponseLengthStats {
        characters: signals.characters,
        words: signals.words,
        sentences: signals.sentences,
        average_words_per_sentence: average,
    }
}

fn strengths(signals: &AnswerSignals, language: Language) -> Vec<String> {
    let phrases = phrases(language);
    let mut lines = Vec::new();

    if signals.characters > DETAILED_ANSWER_CHARS {
        lines.push(phrases.strength_detailed);
    }
    if signals.keyword_matches.len() >= RELEVANT_MATCHES_FOR_STRENGTH {
        lines.push(phrases.strength_relevant);
    }
    if signals.vocabulary_hits > 0 {
        lines.push(phrases.strength_vocabulary);
    }
    if signals.sentences >= 2 {
        lines.push(phrases.strength_structured);
    }
    if signals.has_connective {
        lines.push(phrases.strength_coherent);
    }

    lines.into_iter().map(str::to_string).collect()
}

fn improvements(signals: &AnswerSignals, language: Language) -> Vec<String> {
    let phrases = phrases(language);
    let mut lines = Vec::new();

    if signals.characters <= SHORT_ANSWER_CHARS {
        lines.push(phrases.improve_length);
    }
    if signals.keyword_matches.is_empty() {
        lines.push(phrases.improve_relevance);
    }
    if signals.vocabulary_available && signals.vocabulary_hits == 0 {
        lines.push(phrases.improve_vocabulary);
    }
    if signals.sentences < 2 {
        lines.push(phrases.improve_sentences);
    }
    if !signals.has_punctuation {
        lines.push(phrases.improve_punctuation);
    }
    if !signals.has_connective {
        lines.push(phrases.improve_connectives);
    }

    lines.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_question_scenario() {
        let evaluator = ResponseEvaluator::default();
        let result = evaluator.evaluate(
            "What is your name?",
            "My name is John and I live in Prague with my family.",
            "english_basic",
        );

        assert_eq!(result.completion_percentage, 70);
        assert_eq!(result.quality_score, 55);
        assert!(result.is_complete);
        assert_eq!(
            result.feedback,
            "Odpověď byla částečně správná, ale zkuste více rozvinout vaše myšlenky."
        );
        assert_eq!(
            result.keyword_matches,
            vec!["name?", "basic", "simple", "family", "rodina"]
        );
        assert_eq!(result.response_length_stats.characters, 52);
        assert_eq!(result.response_length_stats.words, 12);
        assert_eq!(result.response_length_stats.sentences, 1);
        assert_eq!(result.response_length_stats.average_words_per_sentence, 12.0);
    }

    #[test]
    fn test_empty_and_short_answers() {
        let evaluator = ResponseEvaluator::default();

        let empty = evaluator.evaluate("Describe safety rules.", "", "safety_training");
        assert_eq!(empty.completion_percentage, 0);
        assert_eq!(empty.quality_score, 0);
        assert!(!empty.is_complete);

        let short = evaluator.evaluate("Describe safety rules.", "  helmet  ", "safety_training");
        assert_eq!(short.completion_percentage, 0);
        assert!(short.quality_score <= 100);
    }

    #[test]
    fn test_scores_are_clamped() {
        let evaluator = ResponseEvaluator::default();
        let answer = "Bezpečnost a ochrana jsou základ. Riziko snižuje prevence, opatření a kontrola. \
                      Postup podle pokyny je nutný, protože bezpečnost chrání lidi. Safety first! \
                      Každý postup má svá opatření a ochrana zaměstnanců je klíčová pro celou firmu.";

        let result = evaluator.evaluate("Jaká bezpečnostní opatření znáte při práci?", answer, "safety");
        assert_eq!(result.completion_percentage, 100);
        assert_eq!(result.quality_score, 100);
        assert!(result.is_complete);
        assert!(result.strengths.len() >= 4);
        assert_eq!(
            result.feedback,
            "Výborná odpověď! Prokázali jste dobré porozumění tématu a vyjádřili se jasně."
        );
    }

    fn signals(characters: usize, matches: usize, sentences: usize) -> AnswerSignals {
        AnswerSignals {
            characters,
            sentences,
            keyword_matches: vec!["word".to_string(); matches],
            ..AnswerSignals::default()
        }
    }

    #[test]
    fn test_completion_boundaries() {
        let evaluator = ResponseEvaluator::default();
        let cases = [
            // (characters, keyword matches, sentences, expected)
            (9, 3, 3, 0),
            (10, 0, 0, 0),
            (10, 1, 0, 10),
            (50, 0, 0, 0),
            (51, 0, 0, 30),
            (100, 0, 0, 30),
            (101, 0, 0, 50),
            (200, 0, 0, 50),
            (201, 0, 0, 60),
            (51, 4, 0, 70),
            (51, 5, 0, 70),
            (51, 12, 0, 70),
            (51, 0, 1, 30),
            (51, 0, 2, 40),
            (51, 0, 3, 50),
            (201, 5, 3, 100),
        ];

        for (characters, matches, sentences, expected) in cases {
            assert_eq!(
                evaluator.completion_percentage(&signals(characters, matches, sentences)),
                expected,
                "characters={} matches={} sentences={}",
                characters,
                matches,
                sentences
            );
        }
    }

    #[test]
    fn test_quality_boundaries() {
        let evaluator = ResponseEvaluator::default();
        let cases = [
            // (words, vocabulary hits, punctuation, connective, expected)
            (9, 0, false, false, 0),
            (10, 0, false, false, 20),
            (19, 0, false, false, 20),
            (20, 0, false, false, 30),
            (29, 0, false, false, 30),
            (30, 0, false, false, 40),
            (0, 6, false, false, 30),
            (0, 7, false, false, 30),
            (0, 20, false, false, 30),
            (0, 0, true, false, 10),
            (0, 0, false, true, 20),
            (30, 7, true, true, 100),
        ];

        for (words, vocabulary_hits, has_punctuation, has_connective, expected) in cases {
            let signals = AnswerSignals {
                characters: 1,
                words,
                vocabulary_hits,
                has_punctuation,
                has_connective,
                ..AnswerSignals::default()
            };
            assert_eq!(
                evaluator.quality_score(&signals),
                expected,
                "words={} hits={}",
                words,
                vocabulary_hits
            );
        }
    }

    #[test]
    fn test_ten_character_answer_is_scored() {
        let evaluator = ResponseEvaluator::default();

        let nine = evaluator.evaluate("Describe safety", "safety no", "general");
        assert_eq!(nine.completion_percentage, 0);

        let ten = evaluator.evaluate("Describe safety", "safety now", "general");
        assert_eq!(ten.response_length_stats.characters, 10);
        assert_eq!(ten.completion_percentage, 10);
        assert_eq!(ten.keyword_matches, vec!["safety"]);
    }

    #[test]
    fn test_good_feedback() {
        let evaluator = ResponseEvaluator::default();
        let result = evaluator.evaluate_in(
            "Explain ladder inspection steps",
            "Check the ladder feet first. Then inspect every rung and the rails before you climb up to work today safely.",
            "general",
            Language::En,
        );

        assert_eq!(result.response_length_stats.characters, 108);
        assert_eq!(result.response_length_stats.words, 20);
        assert_eq!(result.response_length_stats.sentences, 2);
        assert_eq!(result.completion_percentage, 80);
        assert_eq!(result.quality_score, 60);
        assert_eq!(
            result.feedback,
            "Good answer! You understood the topic, try to be more specific next time."
        );
    }

    #[test]
    fn test_feedback_tiers() {
        let evaluator = ResponseEvaluator::default();
        assert_eq!(evaluator.feedback_tier(80, 80), FeedbackTier::Excellent);
        assert_eq!(evaluator.feedback_tier(100, 79), FeedbackTier::Good);
        assert_eq!(evaluator.feedback_tier(60, 60), FeedbackTier::Good);
        assert_eq!(evaluator.feedback_tier(90, 59), FeedbackTier::Partial);
        assert_eq!(evaluator.feedback_tier(40, 0), FeedbackTier::Partial);
        assert_eq!(evaluator.feedback_tier(39, 100), FeedbackTier::Insufficient);
    }

    #[test]
    fn test_extreme_config_saturates() {
        let evaluator = ResponseEvaluator::new(ScoringConfig {
            relevance_points_per_match: u32::MAX,
            relevance_cap: u32::MAX,
            vocabulary_points_per_hit: u32::MAX,
            vocabulary_cap: u32::MAX,
            length_tiers: vec![ScoreTier { threshold: 0, points: u32::MAX }; 3],
            word_tiers: vec![ScoreTier { threshold: 0, points: u32::MAX }; 3],
            punctuation_points: u32::MAX,
            connective_points: u32::MAX,
            ..ScoringConfig::default()
        });

        let signals = AnswerSignals {
            characters: 500,
            words: 80,
            sentences: 4,
            keyword_matches: vec!["word".to_string(); 8],
            vocabulary_hits: 8,
            vocabulary_available: true,
            has_punctuation: true,
            has_connective: true,
        };
        assert_eq!(evaluator.completion_percentage(&signals), 100);
        assert_eq!(evaluator.quality_score(&signals), 100);

        // rejected by validation, so the public entry point falls back instead of panicking
        let result = evaluator.evaluate(
            "What is your name?",
            "My name is John and I live in Prague with my family.",
            "english_basic",
        );
        assert_eq!(result.completion_percentage, 0);
        assert!(!result.is_complete);
    }

    #[test]
    fn test_is_complete_follows_threshold() {
        let evaluator = ResponseEvaluator::new(ScoringConfig {
            completion_threshold: 71,
            ..ScoringConfig::default()
        });
        let result = evaluator.evaluate(
            "What is your name?",
            "My name is John and I live in Prague with my family.",
            "english_basic",
        );

        assert_eq!(result.completion_percentage, 70);
        assert!(!result.is_complete);
    }

    #[test]
    fn test_connectives_match_whole_words() {
        let evaluator = ResponseEvaluator::default();
        // "standard" and "soap" contain "and" and "so" only as substrings.
        let result = evaluator.evaluate("q", "Standard soap. Clean hands!", "general");
        assert_eq!(result.quality_score, 10);
    }

    #[test]
    fn test_feedback_language() {
        let evaluator = ResponseEvaluator::default();
        let result = evaluator.evaluate_in("Why?", "", "basic", Language::En);
        assert_eq!(
            result.feedback,
            "Try to answer in more detail and focus more on the question asked."
        );
        assert!(result.improvements.contains(&"Develop the answer in more detail".to_string()));
    }

    #[test]
    fn test_invalid_config_yields_default_result() {
        let evaluator = ResponseEvaluator::new(ScoringConfig {
            good_threshold: 95,
            ..ScoringConfig::default()
        });

        let result = evaluator.evaluate("What is your name?", "My name is John and I live here.", "basic");
        assert_eq!(result.completion_percentage, 0);
        assert_eq!(result.quality_score, 0);
        assert_eq!(result.feedback, "Nepodařilo se vyhodnotit odpověď. Zkuste to prosím znovu.");
        assert_eq!(result.improvements, vec!["Zkuste odpovědět jasně a srozumitelně"]);
        assert_eq!(result.response_length_stats, ResponseLengthStats::default());
        assert!(evaluator
            .try_evaluate("q", "a", "basic", Language::Cs)
            .is_err());
    }

    #[test]
    fn test_report_lines_for_scenario() {
        let evaluator = ResponseEvaluator::default();
        let result = evaluator.evaluate_in(
            "What is your name?",
            "My name is John and I live in Prague with my family.",
            "english_basic",
            Language::En,
        );

        assert_eq!(
            result.strengths,
            vec![
                "The answer stays on the question asked",
                "Uses professional vocabulary",
                "Ideas are logically connected",
            ]
        );
        assert_eq!(result.improvements, vec!["Split the answer into several sentences"]);
    }
}
