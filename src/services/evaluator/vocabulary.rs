use std::fmt;
use std::str::FromStr;

/// Domain profile selecting the relevance and professional word lists used
/// when scoring an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainingProfile {
    SafetyTraining,
    EnglishBusiness,
    EnglishTechnical,
    EnglishBasic,
    GermanBasic,
    #[default]
    General,
}

impl TrainingProfile {
    /// Unknown names map to [`TrainingProfile::General`], which carries no
    /// vocabulary.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "safety_training" | "safety" => TrainingProfile::SafetyTraining,
            "english_business" | "business" => TrainingProfile::EnglishBusiness,
            "english_technical" | "technical" => TrainingProfile::EnglishTechnical,
            "english_basic" | "basic" => TrainingProfile::EnglishBasic,
            "german_basic" | "german" => TrainingProfile::GermanBasic,
            _ => TrainingProfile::General,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrainingProfile::SafetyTraining => "safety_training",
            TrainingProfile::EnglishBusiness => "english_business",
            TrainingProfile::EnglishTechnical => "english_technical",
            TrainingProfile::EnglishBasic => "english_basic",
            TrainingProfile::GermanBasic => "german_basic",
            TrainingProfile::General => "general",
        }
    }

    /// Words that signal the answer stays on topic.
    pub fn relevance_words(&self) -> &'static [&'static str] {
        match self {
            TrainingProfile::SafetyTraining => {
                &["safety", "bezpečnost", "ochrana", "riziko", "postup", "opatření"]
            }
            TrainingProfile::EnglishBusiness => {
                &["business", "company", "meeting", "project", "client", "firma", "projekt"]
            }
            TrainingProfile::EnglishTechnical => &[
                "technical",
                "process",
                "equipment",
                "system",
                "technický",
                "postup",
                "zařízení",
            ],
            TrainingProfile::EnglishBasic => &[
                "basic",
                "simple",
                "everyday",
                "work",
                "family",
                "základní",
                "práce",
                "rodina",
            ],
            TrainingProfile::GermanBasic => &["grund", "basic", "arbeit", "familie", "základní", "práce"],
            TrainingProfile::General => &[],
        }
    }

    /// Domain terminology rewarded in the quality score.
    pub fn professional_words(&self) -> &'static [&'static str] {
        match self {
            TrainingProfile::SafetyTraining => &[
                "bezpečnost",
                "ochrana",
                "prevence",
                "riziko",
                "opatření",
                "postup",
                "pokyny",
                "kontrola",
            ],
            TrainingProfile::EnglishBusiness => &[
                "business",
                "professional",
                "company",
                "client",
                "project",
                "meeting",
                "presentation",
                "strategy",
            ],
            TrainingProfile::EnglishTechnical => &[
                "technical",
                "system",
                "process",
                "equipment",
                "procedure",
                "specification",
                "maintenance",
            ],
            TrainingProfile::EnglishBasic => {
                &["work", "family", "daily", "routine", "experience", "describe", "explain"]
            }
            TrainingProfile::GermanBasic => {
                &["arbeit", "familie", "alltag", "erfahrung", "beschreiben", "erklären"]
            }
            TrainingProfile::General => &[],
        }
    }
}

impl FromStr for TrainingProfile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(TrainingProfile::from_name(s))
    }
}

impl fmt::Display for TrainingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
