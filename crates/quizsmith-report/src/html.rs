//! HTML attempt report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use quizsmith_core::model::{AttemptReview, ReviewedQuestion};
use quizsmith_core::scoring::option_label;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    if total >= 60 {
        format!("{}m {:02}s", total / 60, total % 60)
    } else {
        format!("{total}s")
    }
}

/// Generate an HTML report reviewing one attempt.
pub fn generate_attempt_html(review: &AttemptReview) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizsmith review: {}</title>\n",
        html_escape(&review.quiz_title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&review.quiz_title)));
    html.push_str(&format!(
        "<p class=\"meta\">Difficulty: <strong>{}</strong> | {} questions | completed {} | time {}</p>\n",
        review.quiz_difficulty,
        review.total_questions,
        review.completed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        format_duration(review.time_taken_seconds),
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Score</h2>\n");
    html.push_str(&format!(
        "<p class=\"score\">{:.1}% <span class=\"meta\">({} of {} correct)</span></p>\n",
        review.score, review.correct_answers, review.total_questions
    ));
    html.push_str(&score_bar(review.score));
    html.push_str("</section>\n");

    html.push_str("<section class=\"questions\">\n");
    html.push_str("<h2>Questions</h2>\n");
    for (i, question) in review.questions.iter().enumerate() {
        html.push_str(&question_card(i + 1, question));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(review).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn question_card(number: usize, question: &ReviewedQuestion) -> String {
    let (class, verdict) = if question.is_correct {
        ("pass", "Correct")
    } else {
        ("fail", "Incorrect")
    };

    let mut card = format!("<article class=\"question {class}\">\n");
    card.push_str(&format!(
        "<h3>{number}. {} <span class=\"verdict\">{verdict}</span></h3>\n",
        html_escape(&question.text)
    ));

    let labels = question.correct_answers.labels();
    card.push_str("<ol class=\"options\">\n");
    for (index, option) in question.options.iter().enumerate() {
        let label = option_label(index).map(String::from).unwrap_or_default();
        let is_answer = labels.contains(&label);
        let is_selected = question.user_selected_answers.contains(option);

        let mut classes = Vec::new();
        if is_answer {
            classes.push("answer");
        }
        if is_selected {
            classes.push("selected");
        }
        let marker = match (is_answer, is_selected) {
            (true, true) => "&#10003; your answer",
            (true, false) => "&#10003; missed",
            (false, true) => "&#10007; your answer",
            (false, false) => "",
        };

        card.push_str(&format!(
            "<li class=\"{}\"><span class=\"label\">{}.</span> {} <span class=\"marker\">{marker}</span></li>\n",
            classes.join(" "),
            html_escape(&label),
            html_escape(option),
        ));
    }
    card.push_str("</ol>\n");

    // Selections that match no option text (stale or hand-edited submissions).
    let unknown: Vec<&String> = question
        .user_selected_answers
        .iter()
        .filter(|answer| !question.options.contains(answer))
        .collect();
    if !unknown.is_empty() {
        let escaped: Vec<String> = unknown.iter().map(|a| html_escape(a)).collect();
        card.push_str(&format!(
            "<p class=\"meta\">Also selected: {}</p>\n",
            escaped.join(", ")
        ));
    }
    if question.correct_answers.is_unseen() {
        card.push_str("<p class=\"meta\">No correct answers were recorded for this question.</p>\n");
    }

    card.push_str("</article>\n");
    card
}

fn score_bar(score: f64) -> String {
    let max_width = 400.0;
    let bar_height = 24;
    let width = (score.clamp(0.0, 100.0) / 100.0 * max_width).round() as u32;

    let color = if score >= 80.0 {
        "#22c55e"
    } else if score >= 50.0 {
        "#eab308"
    } else {
        "#ef4444"
    };

    format!(
        "<svg width=\"{}\" height=\"{bar_height}\" xmlns=\"http://www.w3.org/2000/svg\">\n  \
         <rect x=\"0\" y=\"0\" width=\"{max_width}\" height=\"{bar_height}\" fill=\"var(--border)\" rx=\"4\"/>\n  \
         <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{bar_height}\" fill=\"{color}\" rx=\"4\"/>\n\
         </svg>\n",
        max_width + 2.0
    )
}

/// Write an attempt report to a file.
pub fn write_attempt_html(review: &AttemptReview, path: &Path) -> Result<()> {
    let html = generate_attempt_html(review);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --answer: #15803d; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --answer: #4ade80; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-size: 2rem; font-weight: bold; margin: 0.5rem 0; }
.question { border: 1px solid var(--border); border-radius: 8px; padding: 0.5rem 1rem; margin: 1rem 0; }
.question.pass { border-left: 6px solid #22c55e; }
.question.fail { border-left: 6px solid #ef4444; }
.verdict { font-size: 0.8rem; font-weight: normal; color: #6b7280; }
.options { list-style: none; padding-left: 0; }
.options li { padding: 0.25rem 0.5rem; border-radius: 4px; }
.options li.answer { color: var(--answer); font-weight: bold; }
.options li.selected { background: var(--fail); }
.options li.answer.selected { background: var(--pass); }
.marker { font-size: 0.8rem; color: #6b7280; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use quizsmith_core::model::{AnswerKey, Difficulty};

    fn make_review() -> AttemptReview {
        AttemptReview {
            attempt_id: "attempt-1".into(),
            user_id: "alice".into(),
            quiz_id: "quiz-1".into(),
            quiz_title: "Quiz on <Colors> & Eggs".into(),
            quiz_difficulty: Difficulty::Easy,
            score: 50.0,
            total_questions: 2,
            correct_answers: 1,
            completed_at: chrono::Utc::now(),
            time_taken_seconds: 95.0,
            questions: vec![
                ReviewedQuestion {
                    id: "q1".into(),
                    text: "Which are primary colors?".into(),
                    options: vec!["Red".into(), "Blue".into(), "Green".into(), "Yellow".into()],
                    correct_answers: AnswerKey::Labels(vec!["A".into(), "B".into()]),
                    user_selected_answers: vec!["Blue".into(), "Red".into()],
                    is_correct: true,
                },
                ReviewedQuestion {
                    id: "q2".into(),
                    text: "Which animals lay eggs?".into(),
                    options: vec!["Chicken".into(), "Cow".into(), "Snake".into(), "<script>".into()],
                    correct_answers: AnswerKey::Labels(vec!["A".into(), "C".into()]),
                    user_selected_answers: vec!["Cow".into(), "Platypus".into()],
                    is_correct: false,
                },
            ],
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_attempt_html(&make_review());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>"));
        assert!(html.contains("50.0%"));
        assert!(html.contains("(1 of 2 correct)"));
        assert!(html.contains("1m 35s"));
        assert!(html.contains("Difficulty: <strong>easy</strong>"));
        assert!(html.contains("1. Which are primary colors?"));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = generate_attempt_html(&make_review());
        assert!(html.contains("Quiz on &lt;Colors&gt; &amp; Eggs"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<Colors>"));
    }

    #[test]
    fn answers_and_selections_are_marked() {
        let html = generate_attempt_html(&make_review());
        assert!(html.contains(
            "<li class=\"answer selected\"><span class=\"label\">A.</span> Red"
        ));
        assert!(html.contains("<li class=\"answer\"><span class=\"label\">C.</span> Snake"));
        assert!(html.contains("<li class=\"selected\"><span class=\"label\">B.</span> Cow"));
        assert!(html.contains("Also selected: Platypus"));
    }

    #[test]
    fn unseen_answer_key_is_noted() {
        let mut review = make_review();
        review.questions[0].correct_answers = AnswerKey::Unseen;
        let html = generate_attempt_html(&review);
        assert!(html.contains("No correct answers were recorded"));
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(59.4), "59s");
        assert_eq!(format_duration(125.0), "2m 05s");
        assert_eq!(format_duration(-3.0), "0s");
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/attempt.html");

        write_attempt_html(&make_review(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
