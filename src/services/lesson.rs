use crate::error::{ForgeError, Result};
use crate::services::excerpt;
use crate::services::generative::{complete_within, CompletionParams, GenerativeTextService};
use crate::types::{ComposeOptions, ContentSource, Language, LessonDocument, LessonMetadata, LessonSection};
use chrono::Utc;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

const TOPIC_EXCERPT_CHARS: usize = 2000;
const TOPIC_MAX_TOKENS: u32 = 300;
const TOPIC_TEMPERATURE: f32 = 0.5;
const MAX_FALLBACK_TOPICS: usize = 7;
const MIN_TOPIC_WORD_CHARS: usize = 5;
const CHARS_PER_READING_MINUTE: usize = 1000;

struct LessonPhrases {
    system_prompt: &'static str,
    respond_in: &'static str,
    intro_title: &'static str,
    intro_text: &'static str,
    content_title: &'static str,
    key_points_title: &'static str,
    key_points: [&'static str; 3],
    summary_title: &'static str,
    summary_text: &'static str,
    topics_prompt: &'static str,
}

const CS: LessonPhrases = LessonPhrases {
    system_prompt: "Jsi odborný vzdělávací konzultant. Z poskytnutého obsahu vytváříš kvalitní, \
        strukturované lekce jasným a srozumitelným jazykem. Nezačínej pozdravem. Piš prostý text, \
        nadpisy označ pouze znaky # a ##, jiné formátovací symboly nepoužívej. Lekce má zabrat 5-10 minut čtení.",
    respond_in: "Odpověz v češtině.",
    intro_title: "Úvod",
    intro_text: "Tato lekce obsahuje důležité informace z nahraného obsahu.",
    content_title: "Obsah",
    key_points_title: "Klíčové body",
    key_points: [
        "Prostudujte si poskytnutý obsah",
        "Zaměřte se na klíčové informace",
        "Aplikujte poznatky v praxi",
    ],
    summary_title: "Shrnutí",
    summary_text: "Shrnutí klíčových bodů z lekce.",
    topics_prompt: "Analyzuj následující text a vyextrahuj 5-7 klíčových témat. \
        Vrať pouze seznam témat, každé na novém řádku, začínající pomlčkou.",
};

const EN: LessonPhrases = LessonPhrases {
    system_prompt: "You are an expert educational consultant. You turn the provided content into \
        high-quality, structured lessons written in clear, understandable language. Do not open with a \
        greeting. Write plain text, mark headings only with # and ##, and use no other markup symbols. \
        The lesson should take 5-10 minutes to read.",
    respond_in: "Respond in English.",
    intro_title: "Introduction",
    intro_text: "This lesson contains important information from the uploaded content.",
    content_title: "Content",
    key_points_title: "Key Points",
    key_points: [
        "Study the provided content",
        "Focus on the key information",
        "Apply what you learned in practice",
    ],
    summary_title: "Summary",
    summary_text: "Summary of key points from the lesson.",
    topics_prompt: "Analyze the following text and extract 5-7 key topics. \
        Return only the list of topics, each on a new line starting with a dash.",
};

const DE: LessonPhrases = LessonPhrases {
    system_prompt: "Sie sind ein erfahrener Bildungsberater. Sie erstellen aus den bereitgestellten \
        Inhalten hochwertige, strukturierte Lektionen in klarer, verständlicher Sprache. Beginnen Sie ohne \
        Begrüßung. Schreiben Sie reinen Text, kennzeichnen Sie Überschriften nur mit # und ## und verwenden \
        Sie keine anderen Formatierungszeichen. Die Lektion soll 5-10 Minuten Lesezeit umfassen.",
    respond_in: "Antworte auf Deutsch.",
    intro_title: "Einführung",
    intro_text: "Diese Lektion enthält wichtige Informationen aus dem hochgeladenen Inhalt.",
    content_title: "Inhalt",
    key_points_title: "Kernpunkte",
    key_points: [
        "Studieren Sie den bereitgestellten Inhalt",
        "Konzentrieren Sie sich auf die wichtigsten Informationen",
        "Wenden Sie das Gelernte in der Praxis an",
    ],
    summary_title: "Zusammenfassung",
    summary_text: "Zusammenfassung der wichtigsten Punkte der Lektion.",
    topics_prompt: "Analysiere den folgenden Text und extrahiere 5-7 Schlüsselthemen. \
        Gib nur die Liste der Themen zurück, jedes in einer neuen Zeile mit einem Bindestrich.",
};

const SK: LessonPhrases = LessonPhrases {
    system_prompt: "Ste odborný vzdelávací konzultant. Z poskytnutého obsahu vytvárate kvalitné, \
        štruktúrované lekcie jasným a zrozumiteľným jazykom. Nezačínajte pozdravom. Píšte čistý text, \
        nadpisy označte iba znakmi # a ##, iné formátovacie symboly nepoužívajte. Lekcia má trvať 5-10 minút čítania.",
    respond_in: "Odpovedaj v slovenčine.",
    intro_title: "Úvod",
    intro_text: "Táto lekcia obsahuje dôležité informácie z nahraného obsahu.",
    content_title: "Obsah",
    key_points_title: "Kľúčové body",
    key_points: [
        "Preštudujte si poskytnutý obsah",
        "Zamerajte sa na kľúčové informácie",
        "Aplikujte poznatky v praxi",
    ],
    summary_title: "Zhrnutie",
    summary_text: "Zhrnutie kľúčových bodov z lekcie.",
    topics_prompt: "Analyzuj nasledujúci text a vyextrahuj 5-7 kľúčových tém. \
        Vráť iba zoznam tém, každú na novom riadku, začínajúcu pomlčkou.",
};

fn phrases(language: Language) -> &'static LessonPhrases {
    match language {
        Language::Cs => &CS,
        Language::En => &EN,
        Language::De => &DE,
        Language::Sk => &SK,
    }
}

/// Turns raw document text into a structured lesson, with a deterministic
/// template whenever the generative service cannot deliver one.
pub struct LessonComposer {
    service: Arc<dyn GenerativeTextService>,
    title_pattern: Regex,
    section_pattern: Regex,
    non_word: Regex,
}

impl LessonComposer {
    pub fn new(service: Arc<dyn GenerativeTextService>) -> Self {
        Self {
            service,
            title_pattern: Regex::new(r"^#\s+(.+)$").expect("static pattern"),
            section_pattern: Regex::new(r"^##\s+(.+)$").expect("static pattern"),
            non_word: Regex::new(r"[^\w\s]").expect("static pattern"),
        }
    }

    pub async fn compose(
        &self,
        raw_content: &str,
        title: &str,
        language: Language,
        options: &ComposeOptions,
    ) -> LessonDocument {
        info!(
            "Composing lesson '{}' ({}, {} chars of content)",
            title,
            language,
            raw_content.chars().count()
        );

        if !self.service.is_available() {
            debug!("Generative service not available, using lesson template");
            return self.fallback_lesson(raw_content, title, language);
        }

        let system_prompt = phrases(language).system_prompt;
        let prompt = self.build_lesson_prompt(raw_content, title, language, options);
        let params = CompletionParams::new(options.max_tokens, options.temperature);

        let generated =
            complete_within(self.service.as_ref(), system_prompt, &prompt, &params, options.timeout).await;

        match generated.and_then(|text| self.parse_generated_lesson(&text, title, language)) {
            Ok(lesson) => {
                info!(
                    "Generated lesson '{}' with {} sections",
                    lesson.title, lesson.metadata.section_count
                );
                lesson
            }
            Err(e) => {
                warn!("Lesson generation failed, using template: {}", e);
                self.fallback_lesson(raw_content, title, language)
            }
        }
    }

    pub fn build_lesson_prompt(
        &self,
        content: &str,
        title: &str,
        language: Language,
        options: &ComposeOptions,
    ) -> String {
        let (excerpt, truncated) = excerpt(content, options.max_excerpt_chars);
        let marker = if truncated { " ...[truncated]" } else { "" };

        format!(
            "{respond_in} Create a structured educational lesson from the content below.\n\n\
             LESSON TITLE: {title}\n\n\
             CONTENT:\n{excerpt}{marker}\n\n\
             REQUIREMENTS:\n\
             1. Clear structure with an introduction, main points and a conclusion\n\
             2. Split the material into logical sections with headings\n\
             3. Include key terms with short definitions\n\
             4. Add practical examples where possible\n\
             5. Finish with a summary\n\
             6. Use educational, accessible language\n\
             7. The lesson should take 5-10 minutes to read\n\n\
             FORMAT:\n\
             Return only the lesson text, without any other commentary.\n\
             # [Lesson title]\n\
             ## [Section title]\n\
             [Section text]",
            respond_in = phrases(language).respond_in,
        )
    }

    /// Reads the title from a leading `# ` line and one section per `## `
    /// heading.
    pub fn parse_generated_lesson(
        &self,
        generated: &str,
        requested_title: &str,
        language: Language,
    ) -> Result<LessonDocument> {
        let body = generated.trim();
        if body.is_empty() {
            return Err(ForgeError::MalformedResponse {
                reason: "lesson text is empty".to_string(),
            });
        }

        let mut title: Option<String> = None;
        let mut sections: Vec<LessonSection> = Vec::new();
        let mut current: Option<(String, Vec<&str>)> = None;

        for line in body.lines() {
            let trimmed = line.trim();

            if let Some(caps) = self.section_pattern.captures(trimmed) {
                if let Some((section_title, lines)) = current.take() {
                    sections.push(build_section(section_title, &lines));
                }
                current = Some((caps[1].trim().to_string(), Vec::new()));
                continue;
            }

            if title.is_none() && current.is_none() {
                if let Some(caps) = self.title_pattern.captures(trimmed) {
                    title = Some(caps[1].trim().to_string());
                    continue;
                }
            }

            if let Some((_, lines)) = current.as_mut() {
                lines.push(line);
            }
        }

        if let Some((section_title, lines)) = current.take() {
            sections.push(build_section(section_title, &lines));
        }

        Ok(LessonDocument {
            title: title.unwrap_or_else(|| requested_title.to_string()),
            body: body.to_string(),
            metadata: LessonMetadata {
                section_count: sections.len(),
                estimated_reading_minutes: reading_minutes(body),
            },
            sections,
            generated_at: Utc::now(),
            source: ContentSource::Llm,
            language,
        })
    }

    /// Fixed four-section lesson: introduction, the content itself, key
    /// points and summary.
    pub fn fallback_lesson(&self, content: &str, title: &str, language: Language) -> LessonDocument {
        let phrases = phrases(language);
        let content = content.trim();
        let key_points = phrases
            .key_points
            .iter()
            .map(|point| format!("- {}", point))
            .collect::<Vec<_>>()
            .join("\n");

        let sections = vec![
            LessonSection {
                title: phrases.intro_title.to_string(),
                content: phrases.intro_text.to_string(),
            },
            LessonSection {
                title: phrases.content_title.to_string(),
                content: content.to_string(),
            },
            LessonSection {
                title: phrases.key_points_title.to_string(),
                content: key_points,
            },
            LessonSection {
                title: phrases.summary_title.to_string(),
                content: phrases.summary_text.to_string(),
            },
        ];

        let mut body = format!("# {}", title.trim());
        for section in &sections {
            body.push_str(&format!("\n\n## {}\n{}", section.title, section.content));
        }

        LessonDocument {
            title: title.trim().to_string(),
            metadata: LessonMetadata {
                section_count: sections.len(),
                estimated_reading_minutes: reading_minutes(&body),
            },
            body,
            sections,
            generated_at: Utc::now(),
            source: ContentSource::Fallback,
            language,
        }
    }

    pub async fn extract_key_topics(&self, content: &str, language: Language) -> Vec<String> {
        if !self.service.is_available() {
            return self.extract_key_topics_fallback(content);
        }

        let (excerpt, _) = excerpt(content, TOPIC_EXCERPT_CHARS);
        let prompt = format!("{}\n\n{}", phrases(language).topics_prompt, excerpt);
        let mut params = CompletionParams::new(TOPIC_MAX_TOKENS, TOPIC_TEMPERATURE);
        if let Some(model) = self.service.topic_model() {
            params = params.with_model(model);
        }

        match complete_within(
            self.service.as_ref(),
            "",
            &prompt,
            &params,
            ComposeOptions::default().timeout,
        )
        .await
        {
            Ok(text) => {
                let topics = parse_topic_list(&text);
                if topics.is_empty() {
                    warn!("Topic extraction returned no bullet lines, using frequency ranking");
                    self.extract_key_topics_fallback(content)
                } else {
                    topics
                }
            }
            Err(e) => {
                warn!("Topic extraction failed: {}", e);
                self.extract_key_topics_fallback(content)
            }
        }
    }

    /// Most frequent words longer than four characters, ties broken by first
    /// occurrence.
    pub fn extract_key_topics_fallback(&self, content: &str) -> Vec<String> {
        let lowered = content.to_lowercase();
        let cleaned = self.non_word.replace_all(&lowered, " ");

        let mut frequency: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, word) in cleaned
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_TOPIC_WORD_CHARS)
            .enumerate()
        {
            frequency.entry(word).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(&str, (usize, usize))> = frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));

        ranked
            .into_iter()
            .take(MAX_FALLBACK_TOPICS)
            .map(|(word, _)| word.to_string())
            .collect()
    }
}

fn build_section(title: String, lines: &[&str]) -> LessonSection {
    LessonSection {
        title,
        content: lines.join("\n").trim().to_string(),
    }
}

fn reading_minutes(body: &str) -> usize {
    body.chars().count().div_ceil(CHARS_PER_READING_MINUTE).max(1)
}

fn parse_topic_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            line.strip_prefix('-')
                .or_else(|| line.strip_prefix('•'))
                .or_else(|| line.strip_prefix('*'))
        })
        .map(|topic| topic.trim().to_string())
        .filter(|topic| !topic.is_empty())
        .collect()
}
