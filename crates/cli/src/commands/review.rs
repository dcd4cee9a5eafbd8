//! `codecritic review` — run one full review over a file.

use codecritic_agent::{ReviewLoop, seed_instructions};
use codecritic_config::ReviewConfig;
use codecritic_core::event::EventBus;
use codecritic_providers::OpenAiCompatProvider;
use codecritic_tools::review_registry;
use std::sync::Arc;

pub async fn run(file_path: &str, model: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ReviewConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(model) = model {
        config.orchestrator.model = model.clone();
        config.analyst.model = model;
    }

    // Check for an API key early and give a clear error
    let Some(api_key) = config.api_key.clone() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GROQ_API_KEY=gsk_...          (recommended)");
        eprintln!("    OPENAI_API_KEY=sk-...         (for OpenAI-compatible endpoints)");
        eprintln!("    CODECRITIC_API_KEY=...        (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!(
            "    {}",
            ReviewConfig::config_dir().join("config.toml").display()
        );
        eprintln!();
        eprintln!("  Get a Groq key at: https://console.groq.com/keys");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    let provider: Arc<OpenAiCompatProvider> = Arc::new(OpenAiCompatProvider::new(
        "groq",
        &config.api_url,
        api_key,
    )?);

    let registry = Arc::new(review_registry(
        provider.clone(),
        &config.analyst.model,
        config.analyst.temperature,
    ));

    let event_bus = Arc::new(EventBus::default());
    let mut review = ReviewLoop::new(
        provider,
        &config.orchestrator.model,
        config.orchestrator.temperature,
        registry,
        event_bus,
    )
    .with_max_iterations(config.max_iterations);

    if let Some(max_tokens) = config.max_tokens {
        review = review.with_max_tokens(max_tokens);
    }

    println!();
    println!("  Starting Code Review for: {file_path}");
    println!("  Model: {}", config.orchestrator.model);
    println!();

    match review.run(&seed_instructions(file_path)).await {
        Ok(outcome) => {
            println!();
            println!("{}", "=".repeat(50));
            println!("  Final Code Review Report");
            println!("{}", "=".repeat(50));
            println!();
            println!("{}", outcome.report);
            Ok(())
        }
        Err(e) => {
            eprintln!("  [Error] An error occurred during the review: {e}");
            Err(e.into())
        }
    }
}
