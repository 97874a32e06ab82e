//! Attempt history and aggregate statistics.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Quiz, QuizAttempt};

/// One row of a user's attempt history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub attempt_id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub difficulty: Difficulty,
    /// Percentage score of the attempt.
    pub score: f64,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub completed_at: DateTime<Utc>,
    pub time_taken_seconds: f64,
}

impl HistoryEntry {
    pub fn new(attempt: &QuizAttempt, quiz: &Quiz) -> Self {
        Self {
            attempt_id: attempt.id.clone(),
            quiz_id: attempt.quiz_id.clone(),
            quiz_title: quiz.title.clone(),
            difficulty: quiz.difficulty,
            score: attempt.scorecard.percentage,
            total_questions: attempt.scorecard.total_count,
            correct_answers: attempt.scorecard.correct_count,
            completed_at: attempt.completed_at,
            time_taken_seconds: attempt.time_taken_seconds,
        }
    }
}

/// Statistics across all of a user's attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub attempts: usize,
    pub total_correct: usize,
    pub total_questions: usize,
    pub total_incorrect: usize,
    /// Correct answers over all questions answered, as a percentage.
    pub global_score: f64,
    pub total_time_seconds: f64,
    /// Per-quiz statistics keyed by quiz id.
    pub per_quiz: HashMap<String, QuizStats>,
}

/// Statistics for repeated attempts at one quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizStats {
    pub quiz_id: String,
    pub quiz_title: String,
    pub attempts: usize,
    pub best_score: f64,
    pub average_score: f64,
    pub total_time_seconds: f64,
}

/// Summarize a history.
pub fn summarize_history(entries: &[HistoryEntry]) -> HistorySummary {
    let total_correct: usize = entries.iter().map(|e| e.correct_answers).sum();
    let total_questions: usize = entries.iter().map(|e| e.total_questions).sum();
    let total_time_seconds: f64 = entries.iter().map(|e| e.time_taken_seconds).sum();

    let global_score = if total_questions > 0 {
        total_correct as f64 / total_questions as f64 * 100.0
    } else {
        0.0
    };

    let mut grouped: HashMap<&str, Vec<&HistoryEntry>> = HashMap::new();
    for entry in entries {
        grouped.entry(entry.quiz_id.as_str()).or_default().push(entry);
    }

    let per_quiz = grouped
        .into_iter()
        .map(|(quiz_id, group)| {
            let attempts = group.len();
            let best_score = group.iter().map(|e| e.score).fold(0.0, f64::max);
            let average_score = group.iter().map(|e| e.score).sum::<f64>() / attempts as f64;
            let stats = QuizStats {
                quiz_id: quiz_id.to_string(),
                quiz_title: group[0].quiz_title.clone(),
                attempts,
                best_score,
                average_score,
                total_time_seconds: group.iter().map(|e| e.time_taken_seconds).sum(),
            };
            (quiz_id.to_string(), stats)
        })
        .collect();

    HistorySummary {
        attempts: entries.len(),
        total_correct,
        total_questions,
        // Stored attempts are not validated on load.
        total_incorrect: total_questions.saturating_sub(total_correct),
        global_score,
        total_time_seconds,
        per_quiz,
    }
}
