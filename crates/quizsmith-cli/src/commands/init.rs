//! The `quizsmith init` command.

use std::path::Path;

use anyhow::Result;

use quizsmith_providers::config::LOCAL_CONFIG_FILE;
use quizsmith_providers::mock::SAMPLE_COMPLETION;

const SAMPLE_COMPLETION_FILE: &str = "sample-completion.txt";
const EXAMPLE_ANSWERS_FILE: &str = "answers.example.json";

pub fn execute() -> Result<()> {
    for (path, content) in [
        (LOCAL_CONFIG_FILE, SAMPLE_CONFIG),
        (SAMPLE_COMPLETION_FILE, SAMPLE_COMPLETION),
        (EXAMPLE_ANSWERS_FILE, EXAMPLE_ANSWERS),
    ] {
        if Path::new(path).exists() {
            println!("{path} already exists, skipping.");
        } else {
            std::fs::write(path, content)?;
            println!("Created {path}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Edit {LOCAL_CONFIG_FILE} with your API keys");
    println!("  2. Run: quizsmith generate --subject \"Photosynthesis\"");
    println!("     or offline: quizsmith import --raw {SAMPLE_COMPLETION_FILE}");
    println!("  3. Run: quizsmith submit --quiz <id> --answers {EXAMPLE_ANSWERS_FILE}");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizsmith configuration

default_provider = "openai"
default_model = "gpt-4o-mini"
default_temperature = 0.7
max_tokens = 4096
data_dir = "./quizsmith-data"
default_num_questions = 5
default_difficulty = "medium"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"

# Replays sample-completion.txt instead of calling a model.
[providers.offline]
type = "mock"
response_file = "sample-completion.txt"
"#;

/// Keys are question numbers (or ids); values are option texts or labels.
const EXAMPLE_ANSWERS: &str = r#"{
  "1": ["Red", "Blue"],
  "2": ["A", "C"]
}
"#;
