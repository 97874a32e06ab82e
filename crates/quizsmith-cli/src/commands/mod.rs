pub mod delete_attempt;
pub mod generate;
pub mod history;
pub mod import;
pub mod init;
pub mod list_models;
pub mod parse;
pub mod quizzes;
pub mod review;
pub mod show;
pub mod submit;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use quizsmith_core::service::{QuizDetails, QuizService};
use quizsmith_core::store::JsonFileStore;
use quizsmith_providers::config::load_config_from;
use quizsmith_providers::QuizsmithConfig;

/// Global options shared by every command.
pub struct Context {
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    pub user: String,
}

impl Context {
    pub fn new(config_path: Option<PathBuf>, data_dir: Option<PathBuf>, user: String) -> Self {
        Self {
            config_path,
            data_dir,
            user,
        }
    }

    pub fn config(&self) -> Result<QuizsmithConfig> {
        load_config_from(self.config_path.as_deref())
    }

    /// The store directory: `--data-dir`, else the configured one.
    pub fn data_dir(&self, config: &QuizsmithConfig) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| config.data_dir.clone())
    }

    pub fn store(&self, config: &QuizsmithConfig) -> Arc<JsonFileStore> {
        let dir = self.data_dir(config);
        tracing::debug!("using data directory {}", dir.display());
        Arc::new(JsonFileStore::new(dir))
    }

    /// A service for commands that never call a model.
    pub fn offline_service(&self) -> Result<QuizService> {
        let config = self.config()?;
        Ok(QuizService::offline(self.store(&config)))
    }
}

/// Print a quiz in the same layout the model was asked to produce.
pub fn print_quiz(details: &QuizDetails, reveal: bool) {
    let quiz = &details.quiz;
    println!("{} [{}]", quiz.title, quiz.difficulty);
    println!("Quiz id: {}", quiz.id);

    for question in &details.questions {
        println!();
        println!("{}. {}", question.order, question.question.text);
        println!("   id: {}", question.id);
        for (index, option) in question.question.options.iter().enumerate() {
            let label = quizsmith_core::scoring::option_label(index).unwrap_or('?');
            println!("   {label}. {option}");
        }
        if reveal {
            let labels = question.question.correct_answers.labels();
            if labels.is_empty() {
                println!("   Correct: (none recorded)");
            } else {
                println!("   Correct: {}", labels.join(", "));
            }
        }
    }
}

pub fn read_text(path: &Path) -> Result<String> {
    use anyhow::Context as _;
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
