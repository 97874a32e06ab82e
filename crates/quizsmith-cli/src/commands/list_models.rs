//! The `quizsmith list-models` command.

use anyhow::Result;

use quizsmith_core::traits::ModelInfo;
use quizsmith_providers::ollama::OllamaProvider;
use quizsmith_providers::{create_provider, ProviderConfig};

pub async fn execute(ctx: &super::Context, provider_filter: Option<String>) -> Result<()> {
    let config = ctx.config()?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;
    for name in names {
        if provider_filter.as_ref().is_some_and(|filter| filter != name) {
            continue;
        }

        let provider_config = &config.providers[name];
        let models = match provider_config {
            ProviderConfig::Ollama { base_url } => {
                match OllamaProvider::new(base_url).list_models_async().await {
                    Ok(models) => models,
                    Err(e) => {
                        eprintln!("Provider {name}: {e:#}");
                        continue;
                    }
                }
            }
            other => create_provider(other)?.available_models(),
        };

        if models.is_empty() {
            continue;
        }
        found_any = true;
        let marker = if *name == config.default_provider { " (default)" } else { "" };
        println!("Provider: {name}{marker}");
        for model in &models {
            print_model(model);
        }
        println!();
    }

    if !found_any {
        println!("No providers configured. Run `quizsmith init` to create a config file.");
    }

    Ok(())
}

fn print_model(model: &ModelInfo) {
    if model.cost_per_1k_input == 0.0 && model.cost_per_1k_output == 0.0 {
        println!("  {} ({}K context, free)", model.id, model.max_context / 1000);
    } else {
        println!(
            "  {} - {} ({}K context, ${:.4}/{:.4} per 1K tokens)",
            model.id,
            model.name,
            model.max_context / 1000,
            model.cost_per_1k_input,
            model.cost_per_1k_output,
        );
    }
}
