//! Init command - first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Crust Setup");
    println!();

    println!("{}", style("Step 1: Data directory").bold().cyan());
    let data_dir = settings.data_dir();
    if data_dir.exists() {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    } else {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    }

    println!();
    println!("{}", style("Step 2: Configuration file").bold().cyan());
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else {
        settings.save_to(&config_path.to_path_buf())?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!("  Edit your config with: {}", style("crust config edit").green());
    }

    println!();
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!(
        "  {} Pull the models",
        style(format!(
            "ollama pull {} && ollama pull {}",
            settings.llm.model, settings.embedding.model
        ))
        .cyan()
    );
    println!("  {} Check system status", style("crust doctor").cyan());
    println!("  {} Index your reviews", style("crust ingest <reviews.csv>").cyan());
    println!("  {} Start asking questions", style("crust").cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_dir_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.data_dir = dir.path().join("data").display().to_string();
        let config_path = dir.path().join("crust").join("config.toml");

        run_init(&settings, &config_path).unwrap();

        assert!(dir.path().join("data").is_dir());
        let saved = Settings::load_from(Some(&config_path)).unwrap();
        assert_eq!(saved.general.data_dir, settings.general.data_dir);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[retriever]\nk = 9\n").unwrap();

        let mut settings = Settings::default();
        settings.general.data_dir = dir.path().display().to_string();
        run_init(&settings, &config_path).unwrap();

        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), "[retriever]\nk = 9\n");
    }
}
