mod cli;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, Commands, EvaluateArgs, ExtractArgs, LessonArgs, QuestionsArgs, TopicsArgs, ValidateArgs};
use lesson_forge::types::ExtractOptions;
use lesson_forge::{ArtifactExporter, ContentExtractor, Pipeline, ScoringConfig, SourceLoader};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Extract(args) => handle_extract_command(args, &cli.output).await,
        Commands::Lesson(args) => handle_lesson_command(args, &cli.output).await,
        Commands::Topics(args) => handle_topics_command(args).await,
        Commands::Questions(args) => handle_questions_command(args, &cli.output).await,
        Commands::Evaluate(args) => handle_evaluate_command(args).await,
        Commands::Validate(args) => handle_validate_command(args).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_extract_command(args: &ExtractArgs, output_dir: &Path) -> anyhow::Result<()> {
    let sources = SourceLoader::collect_sources(&args.sources).context("Invalid input sources")?;
    info!("Extracting text from {} sources", sources.len());

    let pipeline = Pipeline::offline().with_extract_options(ExtractOptions {
        max_pages: args.max_pages,
        ..ExtractOptions::default()
    });
    let exporter = ArtifactExporter::new(output_dir);

    for (idx, source) in sources.iter().enumerate() {
        info!("Processing source {}/{}: {}", idx + 1, sources.len(), source);

        let (bytes, metadata) = SourceLoader::load(source)
            .await
            .with_context(|| format!("Failed to load {}", source))?;
        let structured = pipeline.extract_structured_text(&bytes).await;

        if let Some(warning) = &structured.extraction.warning {
            warn!("{}: {}", metadata.filename, warning);
        }

        println!("\n=== Extraction for '{}' ===", metadata.filename);
        println!("Method: {:?}", structured.extraction.metadata.method);
        if let Some(pages) = structured.extraction.metadata.pages {
            println!("Pages: {}", pages);
        }
        println!("Characters: {}", structured.extraction.metadata.cleaned_length);
        println!("Sections: {}", structured.sections.len());
        for (number, section) in structured.sections.iter().enumerate() {
            println!("  {}. {}", number + 1, section.title);
        }

        if args.stats {
            let stats = pipeline.extractor().get_extraction_stats(&structured);
            let mut keys: Vec<_> = stats.keys().collect();
            keys.sort();
            println!("\nStatistics:");
            for key in keys {
                println!("  {}: {}", key, stats[key]);
            }
        }

        if args.dry_run {
            continue;
        }

        let sections = if structured.sections.is_empty() {
            vec![lesson_forge::ContentSection {
                title: metadata.filename.clone(),
                content: structured.extraction.text.clone(),
            }]
        } else {
            structured.sections.clone()
        };

        let result = exporter
            .write_sections(&metadata.filename, &sections, &structured.extraction)
            .await
            .with_context(|| format!("Failed to write sections for {}", metadata.filename))?;

        for output_file in &result.output_files {
            info!("  - {}", output_file.display());
        }
        if let Some(metadata_file) = &result.metadata_file {
            info!("  - {} (metadata)", metadata_file.display());
        }
    }

    info!("Extraction completed successfully!");
    Ok(())
}

async fn load_text(pipeline: &Pipeline, source: &str) -> anyhow::Result<(String, String)> {
    let (bytes, metadata) = SourceLoader::load(source)
        .await
        .with_context(|| format!("Failed to load {}", source))?;
    let extracted = pipeline.extract_text(&bytes).await;

    if let Some(warning) = &extracted.warning {
        warn!("{}: {}", metadata.filename, warning);
    }
    Ok((extracted.text, metadata.filename))
}

fn title_from_filename(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| stem.replace(['_', '-'], " "))
        .unwrap_or_else(|| filename.to_string())
}

async fn handle_lesson_command(args: &LessonArgs, output_dir: &Path) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_env();
    let (text, filename) = load_text(&pipeline, &args.source).await?;
    let title = args.title.clone().unwrap_or_else(|| title_from_filename(&filename));

    let lesson = pipeline.compose_lesson(&text, &title, args.language).await;

    println!("\n=== Lesson '{}' ({:?}) ===", lesson.title, lesson.source);
    println!("Sections: {}", lesson.metadata.section_count);
    println!("Estimated reading time: {} min", lesson.metadata.estimated_reading_minutes);
    for section in &lesson.sections {
        println!("  - {}", section.title);
    }

    let exporter = ArtifactExporter::new(output_dir);
    let markdown = exporter.write_lesson(&filename, &lesson).await?;
    let json = exporter.write_json(&filename, "lesson", &lesson).await?;
    info!("Lesson written to {} and {}", markdown.display(), json.display());
    Ok(())
}

async fn handle_topics_command(args: &TopicsArgs) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_env();
    let (text, filename) = load_text(&pipeline, &args.source).await?;

    let topics = pipeline.extract_key_topics(&text, args.language).await;

    println!("\n=== Key topics for '{}' ===", filename);
    for topic in topics {
        println!("  - {}", topic);
    }
    Ok(())
}

async fn handle_questions_command(args: &QuestionsArgs, output_dir: &Path) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_env();
    let context = match &args.context {
        Some(source) => load_text(&pipeline, source).await?.0,
        None => String::new(),
    };

    let questions = pipeline
        .generate_questions(&args.topic, &context, &args.types, args.language)
        .await;

    println!("\n=== {} questions for '{}' ===", questions.len(), args.topic);
    for (idx, question) in questions.iter().enumerate() {
        println!(
            "  {}. [{}|{:?}] {}",
            idx + 1,
            question.question_type(),
            question.difficulty,
            question.question
        );
    }

    let exporter = ArtifactExporter::new(output_dir);
    let path = exporter
        .write_json(&args.topic.replace(['/', '\\'], "_"), "questions", &questions)
        .await?;
    info!("Questions written to {}", path.display());
    Ok(())
}

async fn handle_evaluate_command(args: &EvaluateArgs) -> anyhow::Result<()> {
    let answer = match (&args.answer, &args.answer_file) {
        (Some(answer), _) => answer.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read answer file {}", path.display()))?,
        (None, None) => bail!("Either --answer or --answer-file is required"),
    };

    let scoring = match &args.scoring_config {
        Some(path) => ScoringConfig::load(path)
            .await
            .with_context(|| format!("Failed to load scoring config {}", path.display()))?,
        None => ScoringConfig::default(),
    };

    let pipeline = Pipeline::offline().with_scoring(scoring);
    let result = pipeline.evaluate_response_in(&args.question, &answer, &args.profile, args.language);

    let json = serde_json::to_string_pretty(&result).context("Failed to serialize evaluation")?;
    println!("{}", json);
    Ok(())
}

async fn handle_validate_command(args: &ValidateArgs) -> anyhow::Result<()> {
    info!("Validating {} sources", args.sources.len());

    let mut valid_sources: Vec<String> = Vec::new();
    let mut invalid_sources: Vec<(String, String)> = Vec::new();

    for source in &args.sources {
        let expanded = match SourceLoader::collect_sources(std::slice::from_ref(source)) {
            Ok(expanded) => expanded,
            Err(e) => {
                error!("✗ Invalid: {} - {}", source, e);
                invalid_sources.push((source.clone(), e.to_string()));
                continue;
            }
        };

        for document in expanded {
            if !args.check_pdf || !is_pdf(&document) {
                info!("✓ Valid: {}", document);
                valid_sources.push(document);
                continue;
            }

            match SourceLoader::load(&document).await {
                Ok((bytes, _)) => {
                    let validation = ContentExtractor::validate_pdf(&bytes);
                    match validation.error {
                        None => {
                            info!("✓ Valid PDF: {} ({} bytes)", document, bytes.len());
                            valid_sources.push(document);
                        }
                        Some(reason) => {
                            error!("✗ Invalid PDF: {} - {}", document, reason);
                            invalid_sources.push((document, reason));
                        }
                    }
                }
                Err(e) => {
                    error!("  Cannot access content: {}", e);
                    invalid_sources.push((document, format!("Access error: {}", e)));
                }
            }
        }
    }

    println!("\n=== Validation Summary ===");
    println!("Valid sources: {}", valid_sources.len());

    if !invalid_sources.is_empty() {
        println!("Invalid sources:");
        for (source, reason) in &invalid_sources {
            println!("  - {}: {}", source, reason);
        }
        bail!("{} sources failed validation", invalid_sources.len());
    }

    println!("All sources are valid!");
    Ok(())
}

fn is_pdf(source: &str) -> bool {
    PathBuf::from(source)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
