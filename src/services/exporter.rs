use crate::error::{ForgeError, Result};
use crate::types::{ContentSection, ExportResult, ExtractedText, LessonDocument};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Writes pipeline output into a directory, one file per section plus a
/// metadata file, or one file per lesson / question set.
pub struct ArtifactExporter {
    output_dir: PathBuf,
}

impl ArtifactExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn write_sections(
        &self,
        source_name: &str,
        sections: &[ContentSection],
        extraction: &ExtractedText,
    ) -> Result<ExportResult> {
        info!(
            "Exporting {} sections of '{}' to {}",
            sections.len(),
            source_name,
            self.output_dir.display()
        );

        if sections.is_empty() {
            return Err(ForgeError::InvalidInput {
                reason: format!("'{}' has no sections to export", source_name),
            });
        }

        self.ensure_output_directory().await?;

        let mut output_files = Vec::with_capacity(sections.len());
        for (idx, section) in sections.iter().enumerate() {
            let path = self.section_filename(source_name, idx + 1, sections.len());
            let content = format!("# {}\n\n{}\n", section.title, section.content);
            write_file(&path, content).await?;

            debug!(
                "Wrote section {} '{}' ({} chars)",
                idx + 1,
                section.title,
                section.content.chars().count()
            );
            output_files.push(path);
        }

        let metadata_path = self.output_dir.join(format!("{}_metadata.json", file_stem(source_name)));
        let metadata = serde_json::json!({
            "source": source_name,
            "totalSections": output_files.len(),
            "extraction": extraction.metadata,
            "warning": extraction.warning,
            "sections": sections.iter().zip(&output_files).enumerate().map(|(idx, (section, path))| {
                serde_json::json!({
                    "number": idx + 1,
                    "title": section.title,
                    "filename": path.file_name().and_then(|n| n.to_str()).unwrap_or_default(),
                })
            }).collect::<Vec<_>>(),
        });
        write_file(&metadata_path, serde_json::to_string_pretty(&metadata)?).await?;
        info!("Generated metadata file: {}", metadata_path.display());

        Ok(ExportResult {
            output_files,
            metadata_file: Some(metadata_path),
        })
    }

    /// `{stem}_lesson.md` holding the lesson body.
    pub async fn write_lesson(&self, source_name: &str, lesson: &LessonDocument) -> Result<PathBuf> {
        self.ensure_output_directory().await?;

        let path = self.output_dir.join(format!("{}_lesson.md", file_stem(source_name)));
        write_file(&path, format!("{}\n", lesson.body)).await?;

        info!("Wrote lesson '{}' to {}", lesson.title, path.display());
        Ok(path)
    }

    /// `{stem}_{suffix}.json` holding `value` pretty-printed.
    pub async fn write_json<T: Serialize>(&self, source_name: &str, suffix: &str, value: &T) -> Result<PathBuf> {
        self.ensure_output_directory().await?;

        let path = self
            .output_dir
            .join(format!("{}_{}.json", file_stem(source_name), suffix));
        write_file(&path, serde_json::to_string_pretty(value)?).await?;

        info!("Wrote {}", path.display());
        Ok(path)
    }

    async fn ensure_output_directory(&self) -> Result<()> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir)
                .await
                .map_err(|e| ForgeError::OutputDirectory {
                    reason: format!("Failed to create output directory: {}", e),
                })?;
            info!("Created output directory: {}", self.output_dir.display());
        }
        Ok(())
    }

    fn section_filename(&self, source_name: &str, number: usize, total: usize) -> PathBuf {
        let filename = format!(
            "{}_section_{:0width$}_of_{}.txt",
            file_stem(source_name),
            number,
            total,
            width = total.to_string().len().max(2)
        );
        self.output_dir.join(filename)
    }
}

fn file_stem(source_name: &str) -> &str {
    Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document")
}

async fn write_file(path: &Path, content: String) -> Result<()> {
    fs::write(path, content)
        .await
        .map_err(|e| ForgeError::OutputDirectory {
            reason: format!("Failed to write {}: {}", path.display(), e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentSource, ExtractionMetadata, ExtractionMethod, Language, LessonMetadata};
    use chrono::Utc;

    fn extraction(text: &str) -> ExtractedText {
        ExtractedText {
            success: true,
            text: text.to_string(),
            metadata: ExtractionMetadata {
                pages: Some(1),
                title: String::new(),
                author: String::new(),
                subject: String::new(),
                creator: String::new(),
                producer: String::new(),
                extracted_at: Utc::now(),
                method: ExtractionMethod::Parser,
                original_length: text.len(),
                cleaned_length: text.len(),
            },
            warning: None,
        }
    }

    fn section(title: &str, content: &str) -> ContentSection {
        ContentSection {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_sections_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ArtifactExporter::new(dir.path().join("out"));
        let sections = vec![section("Intro", "Hello"), section("Rules", "Wear a helmet")];

        let result = exporter
            .write_sections("manual.pdf", &sections, &extraction("Hello Wear a helmet"))
            .await
            .unwrap();

        assert_eq!(result.output_files.len(), 2);
        assert!(result.output_files[0].ends_with("manual_section_01_of_2.txt"));
        let second = std::fs::read_to_string(&result.output_files[1]).unwrap();
        assert_eq!(second, "# Rules\n\nWear a helmet\n");

        let metadata_path = result.metadata_file.unwrap();
        assert!(metadata_path.ends_with("manual_metadata.json"));
        let metadata: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(metadata_path).unwrap()).unwrap();
        assert_eq!(metadata["totalSections"], 2);
        assert_eq!(metadata["sections"][1]["title"], "Rules");
        assert_eq!(metadata["extraction"]["method"], "parser");
    }

    #[tokio::test]
    async fn test_write_sections_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ArtifactExporter::new(dir.path());

        let result = exporter.write_sections("empty.txt", &[], &extraction("")).await;
        assert!(matches!(result, Err(ForgeError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_write_lesson_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ArtifactExporter::new(dir.path());
        let lesson = LessonDocument {
            title: "Safety".to_string(),
            body: "# Safety\n\n## Intro\nStay safe.".to_string(),
            sections: Vec::new(),
            generated_at: Utc::now(),
            source: ContentSource::Fallback,
            language: Language::En,
            metadata: LessonMetadata {
                section_count: 1,
                estimated_reading_minutes: 1,
            },
        };

        let lesson_path = exporter.write_lesson("docs/safety.txt", &lesson).await.unwrap();
        assert!(lesson_path.ends_with("safety_lesson.md"));
        assert!(std::fs::read_to_string(&lesson_path).unwrap().starts_with("# Safety"));

        let json_path = exporter.write_json("docs/safety.txt", "lesson", &lesson).await.unwrap();
        assert!(json_path.ends_with("safety_lesson.json"));
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(value["source"], "fallback");
    }
}
