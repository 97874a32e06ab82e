//! Quiz service orchestrator.
//!
//! Wires the prompt builder, an LLM provider, the parser and the scorer to
//! injected repositories. Parsing and scoring stay pure; everything with
//! I/O lives here.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProviderError, QuizError};
use crate::history::HistoryEntry;
use crate::model::{
    AttemptReview, Difficulty, ParsedQuestion, Quiz, QuizAttempt, QuizSource, ReviewedQuestion,
    StoredQuestion, Submission,
};
use crate::parser::{parse_quiz_response, validate_questions};
use crate::prompt::{build_prompt, QuizRequest};
use crate::scoring::score_submission;
use crate::traits::{
    AttemptRepository, GenerateRequest, GenerateResponse, LlmProvider, QuestionRepository,
    TokenUsage,
};

/// Configuration for the quiz service.
#[derive(Debug, Clone)]
pub struct QuizServiceConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Temperature for generation.
    pub temperature: f64,
    /// Max tokens for generation.
    pub max_tokens: u32,
    /// Retries on transient provider errors.
    pub max_retries: u32,
    /// Initial delay between retries, doubled after each one.
    pub retry_delay: Duration,
    /// Optional system prompt override.
    pub system_prompt_override: Option<String>,
}

impl Default for QuizServiceConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            system_prompt_override: None,
        }
    }
}

const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// A freshly generated (or imported) and persisted quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuiz {
    pub quiz: Quiz,
    /// The completion the questions were parsed from.
    pub raw_text: String,
    pub questions: Vec<StoredQuestion>,
    pub token_usage: TokenUsage,
}

/// A quiz with its ordered questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizDetails {
    pub quiz: Quiz,
    pub questions: Vec<StoredQuestion>,
}

/// The quiz service.
///
/// Only generation needs a provider; an offline service can still import,
/// score, review and report.
pub struct QuizService {
    provider: Option<Arc<dyn LlmProvider>>,
    questions: Arc<dyn QuestionRepository>,
    attempts: Arc<dyn AttemptRepository>,
    config: QuizServiceConfig,
}

impl QuizService {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn AttemptRepository>,
        config: QuizServiceConfig,
    ) -> Self {
        Self {
            provider: Some(provider),
            questions,
            attempts,
            config,
        }
    }

    /// Build a service without a provider over one store.
    pub fn offline<S>(store: Arc<S>) -> Self
    where
        S: QuestionRepository + AttemptRepository + 'static,
    {
        Self {
            provider: None,
            questions: store.clone(),
            attempts: store,
            config: QuizServiceConfig::default(),
        }
    }

    /// Build a service over one store that implements both repositories.
    pub fn with_store<S>(
        provider: Arc<dyn LlmProvider>,
        store: Arc<S>,
        config: QuizServiceConfig,
    ) -> Self
    where
        S: QuestionRepository + AttemptRepository + 'static,
    {
        Self::new(provider, store.clone(), store, config)
    }

    /// Generate a quiz with the provider, parse it and persist it.
    #[instrument(skip(self, request))]
    pub async fn generate_quiz(&self, user_id: &str, request: &QuizRequest) -> Result<GeneratedQuiz> {
        let prompt = build_prompt(request)?;
        let provider = self
            .provider
            .as_deref()
            .context("no LLM provider configured")?;

        let generate_request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            system_prompt: self.config.system_prompt_override.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self.generate_with_retry(provider, &generate_request).await?;
        tracing::info!(
            provider = provider.name(),
            model = %response.model,
            latency_ms = response.latency_ms,
            tokens = response.token_usage.total_tokens,
            "completion received"
        );

        let quiz = Quiz {
            id: Uuid::new_v4().to_string(),
            owner_id: user_id.to_string(),
            title: request.title(),
            source: request.quiz_source(),
            difficulty: request.difficulty,
            num_questions: request.num_questions,
            created_at: Utc::now(),
        };

        let questions = self
            .persist_parsed(&quiz, parse_quiz_response(&response.content))
            .await?;
        if questions.len() != request.num_questions as usize {
            tracing::warn!(
                requested = request.num_questions,
                parsed = questions.len(),
                "parsed question count differs from the requested count"
            );
        }

        Ok(GeneratedQuiz {
            quiz,
            raw_text: response.content,
            questions,
            token_usage: response.token_usage,
        })
    }

    /// Parse and persist a completion that was produced elsewhere.
    #[instrument(skip(self, raw_text))]
    pub async fn import_quiz(
        &self,
        user_id: &str,
        title: &str,
        difficulty: Difficulty,
        raw_text: &str,
    ) -> Result<GeneratedQuiz> {
        let parsed = parse_quiz_response(raw_text);
        let quiz = Quiz {
            id: Uuid::new_v4().to_string(),
            owner_id: user_id.to_string(),
            title: title.to_string(),
            source: QuizSource::Imported,
            difficulty,
            num_questions: u32::try_from(parsed.len()).context("too many questions")?,
            created_at: Utc::now(),
        };

        let questions = self.persist_parsed(&quiz, parsed).await?;

        Ok(GeneratedQuiz {
            quiz,
            raw_text: raw_text.to_string(),
            questions,
            token_usage: TokenUsage::default(),
        })
    }

    async fn generate_with_retry(
        &self,
        provider: &dyn LlmProvider,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse> {
        let mut last_error = None;
        let mut retry_delay = self.config.retry_delay;

        for retry in 0..=self.config.max_retries {
            if retry > 0 {
                tokio::time::sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
            }

            match provider.generate(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if let Some(provider_error) = e.downcast_ref::<ProviderError>() {
                        if provider_error.is_permanent() {
                            return Err(e);
                        }
                        if let Some(ms) = provider_error.retry_after_ms() {
                            retry_delay = Duration::from_millis(ms);
                        }
                    }
                    tracing::warn!(attempt = retry + 1, "generation failed: {e:#}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
    }

    async fn persist_parsed(
        &self,
        quiz: &Quiz,
        parsed: Vec<ParsedQuestion>,
    ) -> Result<Vec<StoredQuestion>> {
        if parsed.is_empty() {
            tracing::warn!(quiz_id = %quiz.id, "no questions found in completion");
        }
        for warning in validate_questions(&parsed) {
            tracing::warn!(
                quiz_id = %quiz.id,
                question = warning.question,
                "{}",
                warning.message
            );
        }

        let questions: Vec<StoredQuestion> = parsed
            .into_iter()
            .zip(1u32..)
            .map(|(question, order)| StoredQuestion {
                id: Uuid::new_v4().to_string(),
                quiz_id: quiz.id.clone(),
                order,
                question,
            })
            .collect();

        self.questions
            .insert_quiz(quiz)
            .await
            .context("failed to store quiz")?;
        self.questions
            .insert_questions(&quiz.id, &questions)
            .await
            .context("failed to store questions")?;

        Ok(questions)
    }

    /// A quiz and its questions in order.
    pub async fn quiz(&self, quiz_id: &str) -> Result<QuizDetails> {
        let quiz = self.require_quiz(quiz_id).await?;
        let questions = self.questions.fetch_questions_by_quiz(quiz_id).await?;
        Ok(QuizDetails { quiz, questions })
    }

    /// All quizzes, newest first.
    pub async fn quizzes(&self) -> Result<Vec<Quiz>> {
        self.questions.list_quizzes().await
    }

    /// Quizzes generated by a user, newest first.
    pub async fn created_quizzes(&self, user_id: &str) -> Result<Vec<Quiz>> {
        let mut quizzes = self.questions.list_quizzes().await?;
        quizzes.retain(|q| q.owner_id == user_id);
        Ok(quizzes)
    }

    async fn require_quiz(&self, quiz_id: &str) -> Result<Quiz> {
        self.questions
            .fetch_quiz(quiz_id)
            .await?
            .ok_or_else(|| QuizError::QuizNotFound(quiz_id.to_string()).into())
    }

    /// Score a submission and store the attempt.
    ///
    /// Inconsistent stored questions fail the whole submission with a
    /// `ScoreError` and nothing is stored.
    #[instrument(skip(self, submission))]
    pub async fn submit(
        &self,
        user_id: &str,
        quiz_id: &str,
        submission: &Submission,
    ) -> Result<QuizAttempt> {
        self.require_quiz(quiz_id).await?;
        let questions = self.questions.fetch_questions_by_quiz(quiz_id).await?;
        let completed_at = Utc::now();

        let scorecard = score_submission(&questions, &submission.answers).inspect_err(|e| {
            tracing::error!("cannot score quiz {quiz_id}: {e}");
        })?;

        let time_taken_seconds = submission
            .time_taken_seconds
            .or_else(|| {
                submission
                    .start_time
                    .map(|start| (completed_at - start).num_milliseconds() as f64 / 1000.0)
            })
            .unwrap_or(0.0)
            .max(0.0);

        let attempt = QuizAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            quiz_id: quiz_id.to_string(),
            scorecard,
            completed_at,
            time_taken_seconds,
        };

        self.attempts
            .insert_attempt(&attempt)
            .await
            .context("failed to store quiz attempt")?;

        tracing::info!(
            attempt_id = %attempt.id,
            correct = attempt.scorecard.correct_count,
            total = attempt.scorecard.total_count,
            "attempt scored"
        );

        Ok(attempt)
    }

    async fn owned_attempt(&self, user_id: &str, attempt_id: &str) -> Result<QuizAttempt> {
        let attempt = self
            .attempts
            .fetch_submission(attempt_id)
            .await?
            .ok_or_else(|| QuizError::AttemptNotFound(attempt_id.to_string()))?;
        if attempt.user_id != user_id {
            return Err(QuizError::Forbidden(attempt_id.to_string()).into());
        }
        Ok(attempt)
    }

    /// An attempt joined with its quiz for question-by-question review.
    pub async fn attempt_review(&self, user_id: &str, attempt_id: &str) -> Result<AttemptReview> {
        let attempt = self.owned_attempt(user_id, attempt_id).await?;
        let quiz = self.require_quiz(&attempt.quiz_id).await?;
        let questions = self
            .questions
            .fetch_questions_by_quiz(&attempt.quiz_id)
            .await?;

        let results: HashMap<&str, _> = attempt
            .scorecard
            .results
            .iter()
            .map(|r| (r.question_id.as_str(), r))
            .collect();

        let reviewed = questions
            .into_iter()
            .map(|q| {
                let result = results.get(q.id.as_str());
                ReviewedQuestion {
                    user_selected_answers: result.map(|r| r.user_answer.clone()).unwrap_or_default(),
                    is_correct: result.is_some_and(|r| r.is_correct),
                    id: q.id,
                    text: q.question.text,
                    options: q.question.options,
                    correct_answers: q.question.correct_answers,
                }
            })
            .collect();

        Ok(AttemptReview {
            attempt_id: attempt.id,
            user_id: attempt.user_id,
            quiz_id: attempt.quiz_id,
            quiz_title: quiz.title,
            quiz_difficulty: quiz.difficulty,
            score: attempt.scorecard.percentage,
            total_questions: attempt.scorecard.total_count,
            correct_answers: attempt.scorecard.correct_count,
            completed_at: attempt.completed_at,
            time_taken_seconds: attempt.time_taken_seconds,
            questions: reviewed,
        })
    }

    /// Delete one of the user's attempts.
    pub async fn delete_attempt(&self, user_id: &str, attempt_id: &str) -> Result<()> {
        self.owned_attempt(user_id, attempt_id).await?;
        if !self.attempts.delete_attempt(attempt_id).await? {
            return Err(QuizError::AttemptNotFound(attempt_id.to_string()).into());
        }
        Ok(())
    }

    /// The user's attempts, newest first. Attempts whose quiz no longer
    /// exists are left out.
    pub async fn history(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
        let attempts = self.attempts.list_attempts_by_user(user_id).await?;
        let quizzes = try_join_all(
            attempts
                .iter()
                .map(|attempt| self.questions.fetch_quiz(&attempt.quiz_id)),
        )
        .await?;

        Ok(attempts
            .iter()
            .zip(quizzes)
            .filter_map(|(attempt, quiz)| quiz.map(|quiz| HistoryEntry::new(attempt, &quiz)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;

    use crate::error::ScoreError;
    use crate::model::AnswerKey;
    use crate::store::MemoryStore;
    use crate::traits::ModelInfo;

    const COMPLETION: &str = "\
1. Which of the following are primary colors?
A. Red
B. Blue
C. Green
D. Yellow
**Correct Answers:** A, B

2. Which of these animals lay eggs?
A. Chicken
B. Cow
C. Snake
D. Dog
**Correct Answers:** A, C
";

    #[derive(Clone, Copy)]
    enum Outcome {
        Complete(&'static str),
        Fail(fn() -> ProviderError),
    }

    /// Provider that replays a script of outcomes, then repeats the last one.
    struct ScriptedProvider {
        script: Mutex<VecDeque<Outcome>>,
        calls: AtomicU32,
        last_prompt: Mutex<Option<String>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Outcome>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        fn completing(text: &'static str) -> Self {
            Self::new(vec![Outcome::Complete(text)])
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());

            let outcome = {
                let mut script = self.script.lock().unwrap();
                if script.len() > 1 {
                    script.pop_front()
                } else {
                    script.front().copied()
                }
            };
            let content = match outcome.unwrap() {
                Outcome::Complete(text) => text.to_string(),
                Outcome::Fail(make_error) => return Err(make_error().into()),
            };
            Ok(GenerateResponse {
                content,
                model: request.model.clone(),
                token_usage: TokenUsage::default(),
                latency_ms: 1,
            })
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    fn service(provider: Arc<ScriptedProvider>) -> (Arc<MemoryStore>, QuizService) {
        let store = Arc::new(MemoryStore::new());
        let service = QuizService::with_store(
            provider,
            store.clone(),
            QuizServiceConfig {
                retry_delay: Duration::from_millis(10),
                ..Default::default()
            },
        );
        (store, service)
    }

    fn answers_for(questions: &[StoredQuestion], picks: &[&[&str]]) -> Submission {
        Submission {
            answers: questions
                .iter()
                .zip(picks)
                .map(|(q, p)| (q.id.clone(), p.iter().map(|s| s.to_string()).collect()))
                .collect(),
            start_time: None,
            time_taken_seconds: Some(42.0),
        }
    }

    #[tokio::test]
    async fn generate_persists_ordered_questions() {
        let provider = Arc::new(ScriptedProvider::completing(COMPLETION));
        let (store, service) = service(provider.clone());

        let request = QuizRequest::subject("Biology").with_num_questions(2);
        let generated = service.generate_quiz("alice", &request).await.unwrap();

        assert_eq!(generated.quiz.title, "Quiz on Biology");
        assert_eq!(generated.quiz.owner_id, "alice");
        assert_eq!(generated.questions.len(), 2);
        assert_eq!(generated.questions[0].order, 1);
        assert_eq!(generated.questions[1].order, 2);
        assert_eq!(generated.raw_text, COMPLETION);

        let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("about the subject: Biology"));

        let stored = store
            .fetch_questions_by_quiz(&generated.quiz.id)
            .await
            .unwrap();
        assert_eq!(stored, generated.questions);
    }

    #[tokio::test]
    async fn empty_subject_never_reaches_provider() {
        let provider = Arc::new(ScriptedProvider::completing(COMPLETION));
        let (_, service) = service(provider.clone());

        let err = service
            .generate_quiz("alice", &QuizRequest::subject(""))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuizError>(),
            Some(QuizError::EmptySource(_))
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn offline_service_cannot_generate() {
        let service = QuizService::offline(Arc::new(MemoryStore::new()));
        let err = service
            .generate_quiz("alice", &QuizRequest::subject("Biology"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no LLM provider configured"));

        let imported = service
            .import_quiz("alice", "Offline", Difficulty::Easy, COMPLETION)
            .await
            .unwrap();
        assert_eq!(imported.questions.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_are_retried() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Outcome::Fail(|| ProviderError::Timeout(30)),
            Outcome::Fail(|| ProviderError::RateLimited {
                retry_after_ms: 2000,
            }),
            Outcome::Complete(COMPLETION),
        ]));
        let (_, service) = service(provider.clone());

        let generated = service
            .generate_quiz("alice", &QuizRequest::subject("Biology"))
            .await
            .unwrap();
        assert_eq!(generated.questions.len(), 2);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let provider = Arc::new(ScriptedProvider::new(vec![Outcome::Fail(|| {
            ProviderError::AuthenticationFailed("bad key".into())
        })]));
        let (_, service) = service(provider.clone());

        let err = service
            .generate_quiz("alice", &QuizRequest::subject("Biology"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("authentication failed"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_give_up_after_limit() {
        let provider = Arc::new(ScriptedProvider::new(vec![Outcome::Fail(|| {
            ProviderError::NetworkError("down".into())
        })]));
        let (_, service) = service(provider.clone());

        assert!(service
            .generate_quiz("alice", &QuizRequest::subject("Biology"))
            .await
            .is_err());
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test]
    async fn unparseable_completion_yields_empty_quiz() {
        let provider = Arc::new(ScriptedProvider::completing("I cannot write a quiz about that."));
        let (_, service) = service(provider);

        let generated = service
            .generate_quiz("alice", &QuizRequest::subject("Nothing"))
            .await
            .unwrap();
        assert!(generated.questions.is_empty());

        let details = service.quiz(&generated.quiz.id).await.unwrap();
        assert!(details.questions.is_empty());
    }

    #[tokio::test]
    async fn submit_scores_and_stores_attempt() {
        let (store, service) = service(Arc::new(ScriptedProvider::completing(COMPLETION)));
        let generated = service
            .import_quiz("alice", "Imported", Difficulty::Easy, COMPLETION)
            .await
            .unwrap();
        assert_eq!(generated.quiz.num_questions, 2);

        let submission = answers_for(
            &generated.questions,
            &[&["Blue", "Red"], &["Chicken"]],
        );
        let attempt = service
            .submit("alice", &generated.quiz.id, &submission)
            .await
            .unwrap();

        assert_eq!(attempt.scorecard.correct_count, 1);
        assert_eq!(attempt.scorecard.total_count, 2);
        assert_eq!(attempt.scorecard.percentage, 50.0);
        assert_eq!(
            attempt.scorecard.results[1].correct_answers,
            vec!["Chicken", "Snake"]
        );
        assert_eq!(attempt.time_taken_seconds, 42.0);

        let stored = store.fetch_submission(&attempt.id).await.unwrap().unwrap();
        assert_eq!(stored, attempt);
    }

    #[tokio::test]
    async fn submit_unknown_quiz() {
        let (_, service) = service(Arc::new(ScriptedProvider::completing(COMPLETION)));
        let err = service
            .submit("alice", "missing", &Submission::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuizError>(),
            Some(QuizError::QuizNotFound(_))
        ));
    }

    #[tokio::test]
    async fn inconsistent_questions_fail_without_storing() {
        let (store, service) = service(Arc::new(ScriptedProvider::completing(COMPLETION)));
        let generated = service
            .import_quiz("alice", "Broken", Difficulty::Medium, "1. Q\nA. only\n**Correct Answers:** A")
            .await
            .unwrap();

        // Corrupt the stored answer key behind the service's back.
        let mut broken = generated.questions[0].clone();
        broken.id = "corrupt".into();
        broken.order = 2;
        broken.question = ParsedQuestion {
            text: "Corrupt".into(),
            options: vec!["only".into()],
            correct_answers: AnswerKey::Labels(vec!["D".into()]),
        };
        store
            .insert_questions(&generated.quiz.id, &[broken])
            .await
            .unwrap();

        let err = service
            .submit("alice", &generated.quiz.id, &Submission::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScoreError>(),
            Some(ScoreError::InconsistentQuestionData { question_id, .. }) if question_id == "corrupt"
        ));
        assert!(store.list_attempts_by_user("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn time_taken_from_start_time() {
        let (_, service) = service(Arc::new(ScriptedProvider::completing(COMPLETION)));
        let generated = service
            .import_quiz("alice", "Timed", Difficulty::Easy, COMPLETION)
            .await
            .unwrap();

        let submission = Submission {
            answers: Default::default(),
            start_time: Some(Utc::now() - ChronoDuration::seconds(90)),
            time_taken_seconds: None,
        };
        let attempt = service
            .submit("alice", &generated.quiz.id, &submission)
            .await
            .unwrap();
        assert!(attempt.time_taken_seconds >= 90.0);
        assert!(attempt.time_taken_seconds < 120.0);
    }

    #[tokio::test]
    async fn review_history_and_delete() {
        let (store, service) = service(Arc::new(ScriptedProvider::completing(COMPLETION)));
        let generated = service
            .import_quiz("alice", "Colors and eggs", Difficulty::Hard, COMPLETION)
            .await
            .unwrap();
        let submission = answers_for(&generated.questions, &[&["Red", "Blue"]]);
        let attempt = service
            .submit("alice", &generated.quiz.id, &submission)
            .await
            .unwrap();

        let review = service.attempt_review("alice", &attempt.id).await.unwrap();
        assert_eq!(review.quiz_title, "Colors and eggs");
        assert_eq!(review.quiz_difficulty, Difficulty::Hard);
        assert_eq!(review.questions.len(), 2);
        assert!(review.questions[0].is_correct);
        assert_eq!(review.questions[0].user_selected_answers, vec!["Red", "Blue"]);
        assert!(!review.questions[1].is_correct);
        assert!(review.questions[1].user_selected_answers.is_empty());

        let err = service.attempt_review("mallory", &attempt.id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuizError>(),
            Some(QuizError::Forbidden(_))
        ));

        // An attempt whose quiz is gone is left out of history.
        let mut orphan = attempt.clone();
        orphan.id = "orphan".into();
        orphan.quiz_id = "deleted-quiz".into();
        store.insert_attempt(&orphan).await.unwrap();

        let history = service.history("alice").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].quiz_title, "Colors and eggs");
        assert_eq!(history[0].score, 50.0);

        assert!(service.delete_attempt("mallory", &attempt.id).await.is_err());
        service.delete_attempt("alice", &attempt.id).await.unwrap();
        assert!(service.history("alice").await.unwrap().is_empty());

        let err = service.delete_attempt("alice", &attempt.id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuizError>(),
            Some(QuizError::AttemptNotFound(_))
        ));
    }

    #[tokio::test]
    async fn created_quizzes_filters_by_owner() {
        let (_, service) = service(Arc::new(ScriptedProvider::completing(COMPLETION)));
        service
            .import_quiz("alice", "Mine", Difficulty::Easy, COMPLETION)
            .await
            .unwrap();
        service
            .import_quiz("bob", "Theirs", Difficulty::Easy, COMPLETION)
            .await
            .unwrap();

        let mine = service.created_quizzes("alice").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "Mine");
        assert_eq!(service.quizzes().await.unwrap().len(), 2);
    }
}
