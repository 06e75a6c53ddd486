//! The `algequiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quiz.toml
    if std::path::Path::new("quiz.toml").exists() {
        println!("quiz.toml already exists, skipping.");
    } else {
        std::fs::write("quiz.toml", SAMPLE_CONFIG)?;
        println!("Created quiz.toml");
    }

    // Create example question bank
    if std::path::Path::new("questions.json").exists() {
        println!("questions.json already exists, skipping.");
    } else {
        std::fs::write("questions.json", EXAMPLE_QUESTIONS)?;
        println!("Created questions.json");
    }

    println!("\nNext steps:");
    println!("  1. Point quiz.toml at your local model server");
    println!("  2. Run: algequiz validate --questions questions.json");
    println!("  3. Run: algequiz run");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# algequiz configuration

default_provider = "lmstudio"
default_model = "qwen3-30b-a3b"
temperature = 0.5
max_tokens = 768
timeout_secs = 60
question_count = 2
question_file = "questions.json"

[providers.lmstudio]
type = "openai"
base_url = "http://localhost:1234"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;

const EXAMPLE_QUESTIONS: &str = r#"{
  "questions": [
    { "prompt": "Factor x^2 - 9", "answer": "(x-3)(x+3)" },
    { "prompt": "Factor x^2 - 25", "answer": "(x-5)(x+5)" },
    { "prompt": "Factor x^2 - 49", "answer": "(x-7)(x+7)" },
    { "prompt": "Factor 4x^2 - 1", "answer": "(2x-1)(2x+1)" }
  ]
}
"#;
