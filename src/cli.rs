use clap::{Args, Parser, Subcommand};
use lesson_forge::{Language, QuestionType};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lesson-forge")]
#[command(about = "Turn documents into lessons and test questions, and score free-text answers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output directory for generated artifacts
    #[arg(short, long, global = true, default_value = "./output")]
    pub output: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract and segment text from documents
    Extract(ExtractArgs),

    /// Compose a structured lesson from a document
    Lesson(LessonArgs),

    /// List the key topics of a document
    Topics(TopicsArgs),

    /// Generate assessment questions for a topic
    Questions(QuestionsArgs),

    /// Score a free-text answer
    Evaluate(EvaluateArgs),

    /// Validate input sources
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Input sources (file paths, directories or URLs)
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Maximum number of pages to read per document
    #[arg(long, default_value = "50")]
    pub max_pages: usize,

    /// Print extraction statistics
    #[arg(long)]
    pub stats: bool,

    /// Print results without writing section files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct LessonArgs {
    /// Input source (file path or URL)
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Lesson title, defaults to the document file name
    #[arg(long)]
    pub title: Option<String>,

    /// Lesson language (cs, en, de, sk)
    #[arg(short, long, default_value = "cs")]
    pub language: Language,
}

#[derive(Args)]
pub struct TopicsArgs {
    /// Input source (file path or URL)
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Prompt language (cs, en, de, sk)
    #[arg(short, long, default_value = "cs")]
    pub language: Language,
}

#[derive(Args)]
pub struct QuestionsArgs {
    /// Main question or topic
    #[arg(long)]
    pub topic: String,

    /// Document whose text is used as context
    #[arg(long, value_name = "SOURCE")]
    pub context: Option<String>,

    /// Question types to request, comma separated (all when omitted)
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<QuestionType>,

    /// Question language (cs, en, de, sk)
    #[arg(short, long, default_value = "cs")]
    pub language: Language,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Question the learner answered
    #[arg(long)]
    pub question: String,

    /// Learner's answer
    #[arg(long, conflicts_with = "answer_file")]
    pub answer: Option<String>,

    /// File containing the learner's answer
    #[arg(long, value_name = "FILE")]
    pub answer_file: Option<PathBuf>,

    /// Training profile (safety_training, english_business, english_technical, english_basic, german_basic)
    #[arg(long, default_value = "general")]
    pub profile: String,

    /// Feedback language (cs, en, de, sk)
    #[arg(short, long, default_value = "cs")]
    pub language: Language,

    /// JSON file overriding the scoring constants
    #[arg(long, value_name = "FILE")]
    pub scoring_config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Input sources (file paths, directories or URLs)
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Load each source and check PDF structure
    #[arg(long)]
    pub check_pdf: bool,
}
