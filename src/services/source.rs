use crate::error::{ForgeError, Result};
use crate::types::{SourceMetadata, SourceType};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};
use url::Url;
use walkdir::WalkDir;

const DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "txt", "md", "text"];

/// Loads document bytes for the CLI from local files, directories or URLs.
pub struct SourceLoader;

impl SourceLoader {
    pub async fn load(source: &str) -> Result<(Vec<u8>, SourceMetadata)> {
        if Self::is_url(source) {
            Self::load_from_url(source).await
        } else {
            Self::load_from_file(source).await
        }
    }

    async fn load_from_url(url: &str) -> Result<(Vec<u8>, SourceMetadata)> {
        info!("Downloading document from URL: {}", url);

        let parsed_url = Url::parse(url)?;
        let client = reqwest::Client::new();
        let response = client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ForgeError::ServiceStatus {
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?.to_vec();
        let metadata = SourceMetadata {
            filename: Self::extract_filename_from_url(&parsed_url),
            source_type: SourceType::Url,
            fetched_at: chrono::Utc::now().to_rfc3339(),
            byte_length: bytes.len(),
        };

        Ok((bytes, metadata))
    }

    async fn load_from_file(file_path: &str) -> Result<(Vec<u8>, SourceMetadata)> {
        debug!("Reading file: {}", file_path);

        let path = Path::new(file_path);
        if !path.is_file() {
            return Err(ForgeError::FileNotFound {
                path: file_path.to_string(),
            });
        }

        let bytes = fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let metadata = SourceMetadata {
            filename,
            source_type: SourceType::LocalFile,
            fetched_at: chrono::Utc::now().to_rfc3339(),
            byte_length: bytes.len(),
        };

        Ok((bytes, metadata))
    }

    pub fn is_url(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }

    fn extract_filename_from_url(url: &Url) -> String {
        url.path_segments()
            .and_then(|segments| segments.last())
            .and_then(|name| if name.is_empty() { None } else { Some(name) })
            .unwrap_or("downloaded.pdf")
            .to_string()
    }

    /// Validates sources and expands directories into the document files
    /// they contain, in sorted order.
    pub fn collect_sources(sources: &[String]) -> Result<Vec<String>> {
        let mut collected = Vec::new();

        for source in sources {
            if Self::is_url(source) {
                Url::parse(source)?;
                collected.push(source.clone());
                continue;
            }

            let path = Path::new(source);
            if path.is_file() {
                collected.push(source.clone());
            } else if path.is_dir() {
                let before = collected.len();
                for entry in WalkDir::new(path).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(e) => {
                            warn!("Skipping unreadable entry under {}: {}", source, e);
                            continue;
                        }
                    };
                    if entry.file_type().is_file() && Self::is_document(entry.path()) {
                        collected.push(entry.path().display().to_string());
                    }
                }
                info!("Found {} documents under {}", collected.len() - before, source);
            } else {
                return Err(ForgeError::FileNotFound {
                    path: source.clone(),
                });
            }
        }

        Ok(collected)
    }

    fn is_document(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_detection() {
        assert!(SourceLoader::is_url("https://example.com/manual.pdf"));
        assert!(!SourceLoader::is_url("./manual.pdf"));
    }

    #[test]
    fn test_filename_from_url() {
        let url = Url::parse("https://example.com/docs/safety.pdf").unwrap();
        assert_eq!(SourceLoader::extract_filename_from_url(&url), "safety.pdf");

        let bare = Url::parse("https://example.com/").unwrap();
        assert_eq!(SourceLoader::extract_filename_from_url(&bare), "downloaded.pdf");
    }

    #[test]
    fn test_collect_sources_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"text").unwrap();
        std::fs::write(dir.path().join("image.png"), b"png").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.md"), b"# md").unwrap();

        let sources = SourceLoader::collect_sources(&[dir.path().display().to_string()]).unwrap();
        let names: Vec<String> = sources
            .iter()
            .map(|s| Path::new(s).file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.txt", "b.pdf", "c.md"]);
    }

    #[test]
    fn test_collect_sources_rejects_missing_paths() {
        let result = SourceLoader::collect_sources(&["/definitely/not/here.pdf".to_string()]);
        assert!(matches!(result, Err(ForgeError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lesson.txt");
        std::fs::write(&path, "Kapitola 1").unwrap();

        let (bytes, metadata) = SourceLoader::load(&path.display().to_string()).await.unwrap();
        assert_eq!(bytes, b"Kapitola 1");
        assert_eq!(metadata.filename, "lesson.txt");
        assert_eq!(metadata.byte_length, 10);
        assert!(matches!(metadata.source_type, SourceType::LocalFile));
    }
}
