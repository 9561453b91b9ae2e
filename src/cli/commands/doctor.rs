//! Doctor command - verify the model server, models and index.

use crate::cli::Output;
use crate::config::{Provider, Settings};
use crate::ollama::{has_model, OllamaClient};
use crate::vector_store::open_vector_store;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Crust Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Models").bold());
    let model_checks = check_models(settings).await;
    for check in &model_checks {
        check.print();
    }
    checks.extend(model_checks);
    println!();

    println!("{}", style("Review Index").bold());
    let index_check = check_index(settings).await;
    index_check.print();
    checks.push(index_check);
    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);
    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!("{} error(s) found. Please fix them before using Crust.", errors));
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Crust is ready to use.");
    }

    Ok(())
}

/// Check that each configured provider is usable and has its model.
async fn check_models(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let wanted = [
        ("LLM", settings.llm.provider, settings.llm.model.as_str()),
        ("Embedding", settings.embedding.provider, settings.embedding.model.as_str()),
    ];

    if wanted.iter().any(|(_, provider, _)| *provider == Provider::Ollama) {
        let reachable = match OllamaClient::from_settings(settings) {
            Ok(client) => client
                .list_models()
                .await
                .map(|installed| (client.base_url().to_string(), installed)),
            Err(e) => Err(e),
        };

        match reachable {
            Ok((base_url, installed)) => {
                results.push(CheckResult::ok(
                    "Ollama",
                    &format!("reachable at {} ({} models)", base_url, installed.len()),
                ));
                for (role, provider, model) in wanted {
                    if provider == Provider::Ollama {
                        results.push(check_ollama_model(role, model, &installed));
                    }
                }
            }
            Err(e) => results.push(CheckResult::error(
                "Ollama",
                &format!("not reachable at {}: {}", settings.ollama.effective_base_url(), e),
                "Start it with: ollama serve (or set OLLAMA_HOST)",
            )),
        }
    }

    if wanted.iter().any(|(_, provider, _)| *provider == Provider::OpenAI) {
        results.push(check_openai_api_key());
    }

    results
}

fn check_ollama_model(role: &str, model: &str, installed: &[String]) -> CheckResult {
    let name = format!("{} model", role);
    if has_model(installed, model) {
        CheckResult::ok(&name, model)
    } else {
        CheckResult::error(
            &name,
            &format!("{} is not installed", model),
            &format!("Install with: ollama pull {}", model),
        )
    }
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(key) if key.len() > 11 && key.is_ascii() => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but looks too short",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check that the index opens and holds reviews.
async fn check_index(settings: &Settings) -> CheckResult {
    if settings.vector_store.provider == "sqlite" && !settings.sqlite_path().exists() {
        return CheckResult::warning(
            "Database",
            &format!("{} (not created yet)", settings.sqlite_path().display()),
            "Create it with: crust ingest <reviews.csv>",
        );
    }

    let count = match open_vector_store(settings) {
        Ok(store) => store.document_count().await,
        Err(e) => Err(e),
    };

    match count {
        Ok(0) => CheckResult::warning(
            "Database",
            "no reviews indexed",
            "Add reviews with: crust ingest <reviews.csv>",
        ),
        Ok(count) => CheckResult::ok("Database", &format!("{} reviews indexed", count)),
        Err(e) => CheckResult::error(
            "Database",
            &format!("cannot be opened: {}", e),
            "Check vector_store settings or delete the database and re-ingest",
        ),
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: crust init (or crust config edit)",
        )
    }
}
