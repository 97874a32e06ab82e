//! Repository implementations.
//!
//! [`MemoryStore`] keeps everything in process memory. [`JsonFileStore`]
//! persists one JSON document per quiz and per attempt under a directory:
//!
//! ```text
//! <root>/quizzes/<quiz-id>.json     quiz + questions
//! <root>/attempts/<attempt-id>.json
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{Quiz, QuizAttempt, StoredQuestion};
use crate::traits::{AttemptRepository, QuestionRepository};

fn sort_questions(questions: &mut [StoredQuestion]) {
    questions.sort_by_key(|q| q.order);
}

fn sort_quizzes(quizzes: &mut [Quiz]) {
    quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn sort_attempts(attempts: &mut [QuizAttempt]) {
    attempts.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory repository, used by tests and short-lived sessions.
#[derive(Default)]
pub struct MemoryStore {
    quizzes: RwLock<HashMap<String, Quiz>>,
    questions: RwLock<HashMap<String, Vec<StoredQuestion>>>,
    attempts: RwLock<HashMap<String, QuizAttempt>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepository for MemoryStore {
    async fn insert_quiz(&self, quiz: &Quiz) -> Result<()> {
        self.quizzes
            .write()
            .await
            .insert(quiz.id.clone(), quiz.clone());
        Ok(())
    }

    async fn fetch_quiz(&self, quiz_id: &str) -> Result<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(quiz_id).cloned())
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        let mut quizzes: Vec<Quiz> = self.quizzes.read().await.values().cloned().collect();
        sort_quizzes(&mut quizzes);
        Ok(quizzes)
    }

    async fn insert_questions(&self, quiz_id: &str, questions: &[StoredQuestion]) -> Result<()> {
        if !self.quizzes.read().await.contains_key(quiz_id) {
            anyhow::bail!("cannot add questions to unknown quiz {quiz_id}");
        }
        let mut all = self.questions.write().await;
        let entry = all.entry(quiz_id.to_string()).or_default();
        entry.extend_from_slice(questions);
        sort_questions(entry);
        Ok(())
    }

    async fn fetch_questions_by_quiz(&self, quiz_id: &str) -> Result<Vec<StoredQuestion>> {
        Ok(self
            .questions
            .read()
            .await
            .get(quiz_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl AttemptRepository for MemoryStore {
    async fn insert_attempt(&self, attempt: &QuizAttempt) -> Result<()> {
        self.attempts
            .write()
            .await
            .insert(attempt.id.clone(), attempt.clone());
        Ok(())
    }

    async fn fetch_submission(&self, attempt_id: &str) -> Result<Option<QuizAttempt>> {
        Ok(self.attempts.read().await.get(attempt_id).cloned())
    }

    async fn list_attempts_by_user(&self, user_id: &str) -> Result<Vec<QuizAttempt>> {
        let mut attempts: Vec<QuizAttempt> = self
            .attempts
            .read()
            .await
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        sort_attempts(&mut attempts);
        Ok(attempts)
    }

    async fn delete_attempt(&self, attempt_id: &str) -> Result<bool> {
        Ok(self.attempts.write().await.remove(attempt_id).is_some())
    }
}

// ---------------------------------------------------------------------------
// JSON directory store
// ---------------------------------------------------------------------------

/// On-disk layout of a quiz file.
#[derive(Debug, Serialize, Deserialize)]
struct QuizDocument {
    quiz: Quiz,
    #[serde(default)]
    questions: Vec<StoredQuestion>,
}

/// Repository backed by a directory of JSON files.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn quizzes_dir(&self) -> PathBuf {
        self.root.join("quizzes")
    }

    fn attempts_dir(&self) -> PathBuf {
        self.root.join("attempts")
    }

    /// File path for an id, or `None` if the id cannot name a file safely.
    fn document_path(dir: &Path, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| dir.join(format!("{id}.json")))
    }

    fn require_path(dir: &Path, id: &str) -> Result<PathBuf> {
        Self::document_path(dir, id)
            .with_context(|| format!("invalid identifier for file storage: {id:?}"))
    }

    async fn read_quiz_document(&self, quiz_id: &str) -> Result<Option<QuizDocument>> {
        match Self::document_path(&self.quizzes_dir(), quiz_id) {
            Some(path) => read_json(&path).await,
            None => Ok(None),
        }
    }

    async fn write_quiz_document(&self, document: &QuizDocument) -> Result<()> {
        let path = Self::require_path(&self.quizzes_dir(), &document.quiz.id)?;
        write_json(&path, document).await
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(value))
}

/// Write a document through a temporary sibling file and rename it over
/// `path`, so readers never see a partially written document.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize document")?;
    let parent = path
        .parent()
        .with_context(|| format!("no parent directory for {}", path.display()))?;
    tokio::fs::create_dir_all(parent)
        .await
        .with_context(|| format!("failed to create {}", parent.display()))?;

    // Not `.json`, so `read_all` ignores leftovers.
    let tmp = parent.join(format!(".{}.tmp", Uuid::new_v4()));
    tokio::fs::write(&tmp, json)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e).with_context(|| format!("failed to replace {}", path.display()));
    }
    Ok(())
}

/// Read every `.json` document in a directory, skipping unreadable files.
async fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read directory: {}", dir.display()));
        }
    };

    let mut documents = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(doc)) => documents.push(doc),
            Ok(None) => {}
            Err(e) => tracing::warn!("skipping {}: {e:#}", path.display()),
        }
    }
    Ok(documents)
}

#[async_trait]
impl QuestionRepository for JsonFileStore {
    async fn insert_quiz(&self, quiz: &Quiz) -> Result<()> {
        let questions = self
            .read_quiz_document(&quiz.id)
            .await?
            .map(|doc| doc.questions)
            .unwrap_or_default();
        self.write_quiz_document(&QuizDocument {
            quiz: quiz.clone(),
            questions,
        })
        .await
    }

    async fn fetch_quiz(&self, quiz_id: &str) -> Result<Option<Quiz>> {
        Ok(self.read_quiz_document(quiz_id).await?.map(|doc| doc.quiz))
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        let documents: Vec<QuizDocument> = read_all(&self.quizzes_dir()).await?;
        let mut quizzes: Vec<Quiz> = documents.into_iter().map(|doc| doc.quiz).collect();
        sort_quizzes(&mut quizzes);
        Ok(quizzes)
    }

    async fn insert_questions(&self, quiz_id: &str, questions: &[StoredQuestion]) -> Result<()> {
        let mut document = self
            .read_quiz_document(quiz_id)
            .await?
            .with_context(|| format!("cannot add questions to unknown quiz {quiz_id}"))?;
        document.questions.extend_from_slice(questions);
        sort_questions(&mut document.questions);
        self.write_quiz_document(&document).await
    }

    async fn fetch_questions_by_quiz(&self, quiz_id: &str) -> Result<Vec<StoredQuestion>> {
        let mut questions = self
            .read_quiz_document(quiz_id)
            .await?
            .map(|doc| doc.questions)
            .unwrap_or_default();
        sort_questions(&mut questions);
        Ok(questions)
    }
}

#[async_trait]
impl AttemptRepository for JsonFileStore {
    async fn insert_attempt(&self, attempt: &QuizAttempt) -> Result<()> {
        let path = Self::require_path(&self.attempts_dir(), &attempt.id)?;
        write_json(&path, attempt).await
    }

    async fn fetch_submission(&self, attempt_id: &str) -> Result<Option<QuizAttempt>> {
        match Self::document_path(&self.attempts_dir(), attempt_id) {
            Some(path) => read_json(&path).await,
            None => Ok(None),
        }
    }

    async fn list_attempts_by_user(&self, user_id: &str) -> Result<Vec<QuizAttempt>> {
        let mut attempts: Vec<QuizAttempt> = read_all::<QuizAttempt>(&self.attempts_dir())
            .await?
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .collect();
        sort_attempts(&mut attempts);
        Ok(attempts)
    }

    async fn delete_attempt(&self, attempt_id: &str) -> Result<bool> {
        let Some(path) = Self::document_path(&self.attempts_dir(), attempt_id) else {
            return Ok(false);
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("failed to delete {}", path.display())),
        }
    }
}
