use crate::error::{ForgeError, Result};
use crate::types::{
    ContentSection, DocumentInfo, ExtractOptions, ExtractedText, ExtractionMetadata, ExtractionMethod,
    ParsedDocument, PdfValidation, StructuredText,
};
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

const PDF_SIGNATURE: &[u8] = b"%PDF";
const MIN_PDF_BYTES: usize = 1024;
const MIN_FALLBACK_CHARS: usize = 50;
const MIN_STRUCTURED_CHARS: usize = 100;
const MAX_HEADING_CHARS: usize = 80;
const MAX_HEADING_WORDS: usize = 8;
const DEFAULT_SECTION_TITLE: &str = "Content";
const FALLBACK_NOTICE: &str =
    "PDF content could not be extracted automatically. Please convert to text format or use OCR.";
const FALLBACK_WARNING: &str = "PDF extraction used fallback method. Results may be incomplete.";

/// Structured document parsing backend.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }

    async fn parse(&self, bytes: &[u8], options: &ExtractOptions) -> Result<ParsedDocument>;
}

/// Stand-in for a missing parsing backend; extraction always takes the
/// fallback scan.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableParser;

#[async_trait]
impl DocumentParser for UnavailableParser {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn parse(&self, _bytes: &[u8], _options: &ExtractOptions) -> Result<ParsedDocument> {
        Err(ForgeError::NotConfigured {
            service: "document parser".to_string(),
        })
    }
}

/// Parser for text documents. Pages are separated by form feeds, the way
/// text converters emit them.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextParser;

#[async_trait]
impl DocumentParser for PlainTextParser {
    fn name(&self) -> &str {
        "plain-text"
    }

    async fn parse(&self, bytes: &[u8], options: &ExtractOptions) -> Result<ParsedDocument> {
        if bytes.starts_with(PDF_SIGNATURE) {
            return Err(ForgeError::DocumentParse {
                reason: "binary PDF documents are not supported by the plain-text parser".to_string(),
            });
        }

        let decoded = String::from_utf8_lossy(bytes);
        let decoded = decoded.trim_start_matches('\u{feff}');
        let pages: Vec<&str> = decoded.split('\x0c').collect();
        let text = pages
            .iter()
            .take(options.max_pages.max(1))
            .copied()
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(ParsedDocument {
            text,
            page_count: pages.len(),
            info: DocumentInfo::default(),
        })
    }
}

pub struct ContentExtractor {
    parser: Arc<dyn DocumentParser>,
    heading_patterns: Vec<Regex>,
    markdown_heading: Regex,
    paragraph_break: Regex,
    whitespace: Regex,
    parenthesised_run: Regex,
    disallowed_chars: Regex,
}

impl ContentExtractor {
    pub fn new(parser: Arc<dyn DocumentParser>) -> Self {
        let heading_patterns = vec![
            // Labelled chapter markers
            Regex::new(r"(?i)^(chapter|kapitola|část)\s+\d+").expect("static pattern"),
            // Labelled section markers
            Regex::new(r"(?i)^(section|sekce|oddíl)\s+\d+").expect("static pattern"),
            // Numbered headings: "3. Bezpečnost práce"
            Regex::new(r"^\d+\.\s+\p{Lu}").expect("static pattern"),
        ];

        Self {
            parser,
            heading_patterns,
            markdown_heading: Regex::new(r"^#{1,6}\s+(.+)$").expect("static pattern"),
            paragraph_break: Regex::new(r"\n\s*\n").expect("static pattern"),
            whitespace: Regex::new(r"\s+").expect("static pattern"),
            parenthesised_run: Regex::new(r"\(([^)]+)\)").expect("static pattern"),
            disallowed_chars: Regex::new(r"[^A-Za-z0-9_\s.,!?\-]").expect("static pattern"),
        }
    }

    pub fn parser_name(&self) -> &str {
        self.parser.name()
    }

    /// Extracts cleaned text. Parser failures, timeouts and a missing parser
    /// all end in the best-effort scan; this never fails.
    pub async fn extract_text(&self, bytes: &[u8], options: &ExtractOptions) -> ExtractedText {
        info!("Extracting text from {} bytes using {}", bytes.len(), self.parser.name());

        if !self.parser.is_available() {
            warn!("Document parser not available, using fallback extraction");
            return self.extract_text_fallback(bytes);
        }

        let parsed = tokio::time::timeout(options.parse_timeout, self.parser.parse(bytes, options)).await;

        match parsed {
            Ok(Ok(document)) => self.build_extraction(document),
            Ok(Err(e)) => {
                warn!("Document parsing failed: {}", e);
                self.extract_text_fallback(bytes)
            }
            Err(_) => {
                warn!(
                    "Document parsing timed out after {}s",
                    options.parse_timeout.as_secs()
                );
                self.extract_text_fallback(bytes)
            }
        }
    }

    fn build_extraction(&self, document: ParsedDocument) -> ExtractedText {
        let original_length = document.text.chars().count();
        let text = self.clean_extracted_text(&document.text);
        let cleaned_length = text.chars().count();

        debug!(
            "Parsed {} pages, {} chars cleaned to {}",
            document.page_count, original_length, cleaned_length
        );

        let info = document.info;
        ExtractedText {
            success: true,
            text,
            metadata: ExtractionMetadata {
                pages: Some(document.page_count),
                title: info.title.unwrap_or_default(),
                author: info.author.unwrap_or_default(),
                subject: info.subject.unwrap_or_default(),
                creator: info.creator.unwrap_or_default(),
                producer: info.producer.unwrap_or_default(),
                extracted_at: Utc::now(),
                method: ExtractionMethod::Parser,
                original_length,
                cleaned_length,
            },
            warning: None,
        }
    }

    /// Scans the raw bytes for parenthesised string runs, which is where PDF
    /// content streams keep their literal text.
    fn extract_text_fallback(&self, bytes: &[u8]) -> ExtractedText {
        debug!("Running fallback text scan");

        let latin1: String = bytes.iter().map(|&b| b as char).collect();
        let runs: Vec<&str> = self
            .parenthesised_run
            .captures_iter(&latin1)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .filter(|run| run.chars().count() > 2)
            .collect();

        let joined = runs.join(" ");
        let sanitized = self.disallowed_chars.replace_all(&joined, " ");
        let mut text = self.whitespace.replace_all(&sanitized, " ").trim().to_string();

        if text.chars().count() < MIN_FALLBACK_CHARS {
            text = FALLBACK_NOTICE.to_string();
        }

        let cleaned_length = text.chars().count();
        ExtractedText {
            success: false,
            text,
            metadata: ExtractionMetadata {
                pages: None,
                title: String::new(),
                author: String::new(),
                subject: String::new(),
                creator: String::new(),
                producer: String::new(),
                extracted_at: Utc::now(),
                method: ExtractionMethod::Fallback,
                original_length: bytes.len(),
                cleaned_length,
            },
            warning: Some(FALLBACK_WARNING.to_string()),
        }
    }

    /// Normalises extracted text: single line breaks become spaces, blank
    /// lines delimit paragraphs, whitespace runs collapse. Idempotent.
    pub fn clean_extracted_text(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }

        let normalized = raw
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\x0c', "\n\n");

        self.paragraph_break
            .split(&normalized)
            .map(|paragraph| self.whitespace.replace_all(paragraph, " ").trim().to_string())
            .filter(|paragraph| !paragraph.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Splits text into titled sections at heading-like lines.
    pub fn identify_sections(&self, text: &str) -> Vec<ContentSection> {
        let mut sections = Vec::new();
        let mut current_title: Option<String> = None;
        let mut current_lines: Vec<&str> = Vec::new();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match self.heading_title(line) {
                Some(title) => {
                    match current_title.take() {
                        Some(previous) => sections.push(ContentSection {
                            title: previous,
                            content: current_lines.join("\n"),
                        }),
                        None if !current_lines.is_empty() => sections.push(ContentSection {
                            title: DEFAULT_SECTION_TITLE.to_string(),
                            content: current_lines.join("\n"),
                        }),
                        None => {}
                    }
                    current_title = Some(title);
                    current_lines.clear();
                }
                None => current_lines.push(line),
            }
        }

        match current_title {
            Some(title) => sections.push(ContentSection {
                title,
                content: current_lines.join("\n"),
            }),
            None => {
                // No heading anywhere: the whole text is one section.
                sections.clear();
                sections.push(ContentSection {
                    title: DEFAULT_SECTION_TITLE.to_string(),
                    content: text.trim().to_string(),
                });
            }
        }

        debug!("Identified {} sections", sections.len());
        sections
    }

    fn heading_title(&self, line: &str) -> Option<String> {
        if let Some(caps) = self.markdown_heading.captures(line) {
            return caps.get(1).map(|m| m.as_str().trim().to_string());
        }

        if self.heading_patterns.iter().any(|p| p.is_match(line)) || is_standalone_heading(line) {
            return Some(line.to_string());
        }

        None
    }

    pub async fn extract_structured_text(&self, bytes: &[u8], options: &ExtractOptions) -> StructuredText {
        let extraction = self.extract_text(bytes, options).await;

        if !extraction.success || extraction.text.chars().count() < MIN_STRUCTURED_CHARS {
            debug!("Skipping segmentation for short or fallback extraction");
            return StructuredText {
                extraction,
                sections: Vec::new(),
                structured: false,
            };
        }

        info!("Structuring extracted text into sections");
        let sections = self.identify_sections(&extraction.text);

        StructuredText {
            extraction,
            sections,
            structured: true,
        }
    }

    pub fn validate_pdf(bytes: &[u8]) -> PdfValidation {
        if bytes.is_empty() {
            return PdfValidation::invalid("Empty buffer");
        }

        if !bytes.starts_with(PDF_SIGNATURE) {
            return PdfValidation::invalid("Invalid PDF signature");
        }

        if bytes.len() < MIN_PDF_BYTES {
            return PdfValidation::invalid("PDF file too small");
        }

        PdfValidation::ok()
    }

    pub fn get_extraction_stats(&self, structured: &StructuredText) -> HashMap<String, serde_json::Value> {
        let mut stats = HashMap::new();
        let metadata = &structured.extraction.metadata;

        stats.insert("success".to_string(), structured.extraction.success.into());
        stats.insert("original_length".to_string(), metadata.original_length.into());
        stats.insert("cleaned_length".to_string(), metadata.cleaned_length.into());
        stats.insert("sections".to_string(), structured.sections.len().into());

        let reduction_percent = if metadata.original_length > 0 {
            let ratio = metadata.cleaned_length as f64 / metadata.original_length as f64;
            ((1.0 - ratio) * 100.0).round()
        } else {
            0.0
        };
        stats.insert("reduction_percent".to_string(), reduction_percent.into());

        let avg_section_chars = if structured.sections.is_empty() {
            0.0
        } else {
            let total: usize = structured.sections.iter().map(|s| s.content.chars().count()).sum();
            total as f64 / structured.sections.len() as f64
        };
        stats.insert("avg_section_chars".to_string(), avg_section_chars.into());

        stats
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(Arc::new(PlainTextParser))
    }
}

/// Short line starting with a capital letter and carrying no sentence
/// punctuation, e.g. "BEZPEČNOST PRÁCE" or "Osobní ochranné pomůcky".
fn is_standalone_heading(line: &str) -> bool {
    if line.chars().count() > MAX_HEADING_CHARS || line.split_whitespace().count() > MAX_HEADING_WORDS {
        return false;
    }
    if line.contains(['.', '!', '?']) {
        return false;
    }
    line.chars().next().map_or(false, char::is_uppercase)
}
