use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizsmith_core::history::{summarize_history, HistoryEntry};
use quizsmith_core::model::{
    AnswerKey, Difficulty, ParsedQuestion, StoredQuestion, SubmissionAnswers,
};
use quizsmith_core::scoring::score_submission;

fn make_questions(n: usize) -> Vec<StoredQuestion> {
    (0..n)
        .map(|i| StoredQuestion {
            id: format!("q{i}"),
            quiz_id: "bench".into(),
            order: i as u32 + 1,
            question: ParsedQuestion {
                text: format!("Question {i}"),
                options: vec![
                    format!("alpha {i}"),
                    format!("beta {i}"),
                    format!("gamma {i}"),
                    format!("delta {i}"),
                ],
                correct_answers: AnswerKey::Labels(vec!["A".into(), "C".into()]),
            },
        })
        .collect()
}

fn make_answers(questions: &[StoredQuestion]) -> SubmissionAnswers {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            // Alternate correct and partially correct selections.
            let picked = if i % 2 == 0 {
                vec![q.question.options[2].clone(), q.question.options[0].clone()]
            } else {
                vec![q.question.options[0].clone()]
            };
            (q.id.clone(), picked)
        })
        .collect()
}

fn bench_score_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_submission");

    for size in [5, 50, 500] {
        let questions = make_questions(size);
        let answers = make_answers(&questions);
        group.bench_function(format!("{size}_questions"), |b| {
            b.iter(|| score_submission(black_box(&questions), black_box(&answers)))
        });
    }

    let questions = make_questions(50);
    let empty = SubmissionAnswers::new();
    group.bench_function("50_unanswered", |b| {
        b.iter(|| score_submission(black_box(&questions), black_box(&empty)))
    });

    group.finish();
}

fn bench_summarize_history(c: &mut Criterion) {
    let entries: Vec<HistoryEntry> = (0..1000)
        .map(|i| HistoryEntry {
            attempt_id: format!("a{i}"),
            quiz_id: format!("quiz{}", i % 20),
            quiz_title: format!("Quiz {}", i % 20),
            difficulty: Difficulty::Medium,
            score: (i % 5) as f64 * 20.0,
            total_questions: 5,
            correct_answers: i % 5,
            completed_at: chrono::Utc::now(),
            time_taken_seconds: 60.0,
        })
        .collect();

    c.bench_function("summarize_1000_attempts", |b| {
        b.iter(|| summarize_history(black_box(&entries)))
    });
}

criterion_group!(benches, bench_score_submission, bench_summarize_history);
criterion_main!(benches);
