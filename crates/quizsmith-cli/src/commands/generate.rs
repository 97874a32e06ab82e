//! The `quizsmith generate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizsmith_core::model::Difficulty;
use quizsmith_core::prompt::QuizRequest;
use quizsmith_core::service::{QuizDetails, QuizService};
use quizsmith_providers::{create_provider, QuizsmithConfig};

use super::{print_quiz, read_text, Context};

/// A `provider/model` pair.
#[derive(Debug, PartialEq)]
struct ModelRef {
    provider: String,
    model: String,
}

fn parse_model_ref(model: Option<&str>, config: &QuizsmithConfig) -> ModelRef {
    match model.map(str::trim) {
        Some(model) => match model.split_once('/') {
            Some((provider, model)) => ModelRef {
                provider: provider.to_string(),
                model: model.to_string(),
            },
            None => ModelRef {
                provider: config.default_provider.clone(),
                model: model.to_string(),
            },
        },
        None => ModelRef {
            provider: config.default_provider.clone(),
            model: config.default_model.clone(),
        },
    }
}

pub async fn execute(
    ctx: &Context,
    subject: Option<String>,
    file: Option<PathBuf>,
    num_questions: Option<u32>,
    difficulty: Option<Difficulty>,
    model: Option<String>,
) -> Result<()> {
    let config = ctx.config()?;

    let request = match (subject, file) {
        (Some(subject), _) => QuizRequest::subject(subject),
        (None, Some(path)) => {
            let text = read_text(&path)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            QuizRequest::document(file_name, text)
        }
        (None, None) => anyhow::bail!("either --subject or --file is required"),
    }
    .with_num_questions(num_questions.unwrap_or(config.default_num_questions))
    .with_difficulty(difficulty.unwrap_or(config.default_difficulty));

    let model_ref = parse_model_ref(model.as_deref(), &config);
    let provider_config = config.providers.get(&model_ref.provider).ok_or_else(|| {
        anyhow::anyhow!(
            "provider '{}' not found in config. Available: {:?}",
            model_ref.provider,
            config.providers.keys().collect::<Vec<_>>()
        )
    })?;
    let provider = create_provider(provider_config)?;

    eprintln!(
        "Generating {} {} question(s) with {}/{}...",
        request.num_questions, request.difficulty, model_ref.provider, model_ref.model
    );

    let service = QuizService::with_store(
        provider,
        ctx.store(&config),
        config.service_config(&model_ref.model),
    );
    let generated = service.generate_quiz(&ctx.user, &request).await?;

    if generated.questions.is_empty() {
        eprintln!("Warning: no questions could be parsed from the completion.");
    }
    eprintln!(
        "Tokens: {} (estimated cost ${:.4})",
        generated.token_usage.total_tokens, generated.token_usage.estimated_cost_usd
    );

    print_quiz(
        &QuizDetails {
            quiz: generated.quiz,
            questions: generated.questions,
        },
        false,
    );
    Ok(())
}
