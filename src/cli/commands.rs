//! Command implementations for the flowsync CLI.
//!
//! The main commands:
//! - init: create the configuration interactively
//! - locales: list the locales known to the platform
//! - pull: download a Flow snapshot to the local flows directory
//! - localize: add/remove per-locale text variants on a Flow

use crate::checks::{check_locale, LocaleCheck};
use crate::config::{self, Config};
use crate::platform::{
    LocalizeOptions, LocalizeSummary, Platform, RestClient, DEFAULT_BATCH_SIZE,
};
use crate::utils::confirm::{ConfirmPrompt, TerminalPrompt};
use crate::utils::progress;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

// ============ INIT COMMAND ============

/// Interactive setup: platform URL, project id, API key, flows directory.
pub fn init() -> Result<ExitCode> {
    println!("{}", "flowsync setup".cyan().bold());
    println!();

    let path = config::default_config_path();
    let mut config = if path.exists() {
        Config::load(&path)?
    } else {
        Config::new()
    };

    config.base_url = dialoguer::Input::<String>::new()
        .with_prompt("Platform API base URL")
        .default(config.base_url.clone())
        .interact_text()?;

    let mut project_prompt = dialoguer::Input::<String>::new().with_prompt("Project id");
    if !config.project_id.is_empty() {
        project_prompt = project_prompt.default(config.project_id.clone());
    }
    config.project_id = project_prompt.interact_text()?;

    let api_key = rpassword::prompt_password("API key (input hidden): ")?;
    if api_key.is_empty() {
        if config.api_key.is_empty() {
            anyhow::bail!("An API key is required");
        }
        // empty input keeps the stored key
    } else {
        config.api_key = api_key;
    }

    let flows_dir = dialoguer::Input::<String>::new()
        .with_prompt("Local flows directory")
        .default(config.flows_dir.display().to_string())
        .interact_text()?;
    config.flows_dir = PathBuf::from(flows_dir);

    config.save(&path)?;
    println!("  {} Saved {}", "✓".green(), path.display());

    // verify the saved key can retrieve the project
    let client = RestClient::new(&config)?;
    let spinner = progress::spinner("Checking project access...");
    let checked = client.check_project();
    spinner.finish_and_clear();

    match checked {
        Ok(project) => println!("  {} Connected to project '{}'", "✓".green(), project.name),
        Err(err) => println!(
            "  {} Config saved, but the project check failed: {}",
            "⚠".yellow(),
            err
        ),
    }

    Ok(ExitCode::SUCCESS)
}

// ============ LOCALES COMMAND ============

/// List the locales known to the platform.
pub fn locales() -> Result<ExitCode> {
    let config = Config::load_required()?;
    let client = RestClient::new(&config)?;

    let spinner = progress::spinner("Fetching locales...");
    let fetched = client.pull_locales();
    spinner.finish_and_clear();
    let locales = fetched.context("Locales can't be loaded from the platform")?;

    if locales.is_empty() {
        println!("{}", "No locales found on the platform.".yellow());
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {} locale(s):\n",
        "Found".green(),
        locales.len().to_string().green().bold()
    );
    for (idx, locale) in locales.iter().enumerate() {
        println!("  {}. {}", (idx + 1).to_string().cyan(), locale.name);
    }
    println!();

    Ok(ExitCode::SUCCESS)
}

// ============ PULL COMMAND ============

/// Download a Flow snapshot into the local flows directory.
pub fn pull(resource_type: &str, resource_name: &str) -> Result<ExitCode> {
    if resource_type != "flow" {
        return Ok(report_unsupported("Pulling", resource_type));
    }

    let config = Config::load_required()?;
    let client = RestClient::new(&config)?;

    let spinner = progress::spinner(&format!("Pulling Flow '{}'...", resource_name));
    let pulled = client.pull_flow(resource_name, DEFAULT_BATCH_SIZE);
    spinner.finish_and_clear();

    let path = pulled.context("Flow pull failed")?;
    println!("{} Saved {}", "✓".green(), path.display());

    Ok(ExitCode::SUCCESS)
}

// ============ LOCALIZE COMMAND ============

/// How a localize run ended. The command layer maps each variant to console
/// output and an exit code; the orchestrator never exits on its own.
#[derive(Debug)]
pub(crate) enum LocalizeOutcome {
    Completed { summary: LocalizeSummary },
    Aborted,
    Unsupported(String),
    BadLocale(LocaleCheck),
}

/// Add or remove localizations on a Flow.
pub fn localize(
    resource_type: &str,
    resource_name: &str,
    options: LocalizeOptions,
) -> Result<ExitCode> {
    if resource_type != "flow" {
        return Ok(report_unsupported("Localization", resource_type));
    }

    let config = Config::load_required()?;
    let client = RestClient::new(&config)?;

    let outcome = run_localize(&client, &TerminalPrompt, resource_type, resource_name, &options)?;
    Ok(report_localize(resource_name, outcome))
}

/// The localize sequence: validate locale, check project access, confirm,
/// localize in batches, then re-pull so the local copy matches the platform.
pub(crate) fn run_localize(
    platform: &dyn Platform,
    prompt: &dyn ConfirmPrompt,
    resource_type: &str,
    resource_name: &str,
    options: &LocalizeOptions,
) -> Result<LocalizeOutcome> {
    if resource_type != "flow" {
        return Ok(LocalizeOutcome::Unsupported(resource_type.to_string()));
    }

    // the locale must exist before anything destructive happens
    let check = check_locale(platform, &options.locale_name);
    if check != LocaleCheck::Found {
        return Ok(LocalizeOutcome::BadLocale(check));
    }

    // the project must exist and the API key must be able to retrieve it
    let project = platform.check_project().context("Project check failed")?;
    tracing::debug!(project = %project.name, "project check passed");

    if !options.force_yes {
        let question = format!(
            "{} '{}' will be modified on the platform and the local copy overwritten. Continue?",
            capitalize(resource_type),
            resource_name
        );
        if !prompt.confirm(&question)? {
            return Ok(LocalizeOutcome::Aborted);
        }
    }

    let direction = if options.reverse {
        "remove localizations from"
    } else {
        "add localizations to"
    };
    println!("Starting to {} Flow '{}' ...\n", direction, resource_name);

    let summary = platform
        .localize_flow(resource_name, DEFAULT_BATCH_SIZE, options)
        .context("Localization failed")?;

    // re-pull so the local copy reflects what the platform now has
    println!("\nRefreshing local Flow copy...\n");
    let spinner = progress::spinner("Downloading...");
    let pulled = platform.pull_flow(resource_name, DEFAULT_BATCH_SIZE);
    spinner.finish_and_clear();
    pulled.context(
        "The Flow was localized, but the re-download failed. \
         Run 'flowsync pull flow <name>' to refresh the local copy",
    )?;

    Ok(LocalizeOutcome::Completed { summary })
}

fn report_localize(resource_name: &str, outcome: LocalizeOutcome) -> ExitCode {
    match outcome {
        LocalizeOutcome::Completed { summary } => {
            println!("{}", success_message(resource_name, &summary).green());
            ExitCode::SUCCESS
        }
        LocalizeOutcome::Aborted => {
            println!("Aborting.");
            ExitCode::SUCCESS
        }
        LocalizeOutcome::Unsupported(resource_type) => {
            report_unsupported("Localization", &resource_type)
        }
        LocalizeOutcome::BadLocale(check) => {
            if let Some(message) = check.failure_message() {
                eprintln!("{} {}", "✗".red(), message);
            }
            ExitCode::FAILURE
        }
    }
}

fn report_unsupported(action: &str, resource_type: &str) -> ExitCode {
    println!(
        "{}",
        format!(
            "{} of resource type '{}' is not supported.",
            action, resource_type
        )
        .yellow()
    );
    ExitCode::FAILURE
}

fn success_message(resource_name: &str, summary: &LocalizeSummary) -> String {
    let direction = if summary.removed {
        "removed localizations from"
    } else {
        "added localizations to"
    };
    format!(
        "\nWe've successfully {} Flow '{}' ({} nodes, {} intents).",
        direction, resource_name, summary.nodes, summary.intents
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Locale, PlatformError, Project};
    use std::cell::{Cell, RefCell};

    /// Scripted platform backend recording the order of remote calls.
    struct MockPlatform {
        locales: Vec<&'static str>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl MockPlatform {
        fn with_locales(locales: &[&'static str]) -> Self {
            Self {
                locales: locales.to_vec(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    impl Platform for MockPlatform {
        fn pull_locales(&self) -> Result<Vec<Locale>, PlatformError> {
            self.calls.borrow_mut().push("pull_locales");
            Ok(self
                .locales
                .iter()
                .map(|n| Locale {
                    name: n.to_string(),
                })
                .collect())
        }

        fn check_project(&self) -> Result<Project, PlatformError> {
            self.calls.borrow_mut().push("check_project");
            Ok(Project {
                id: "p1".to_string(),
                name: "Demo".to_string(),
            })
        }

        fn localize_flow(
            &self,
            _flow_name: &str,
            batch_size: usize,
            options: &LocalizeOptions,
        ) -> Result<LocalizeSummary, PlatformError> {
            self.calls.borrow_mut().push("localize_flow");
            assert_eq!(batch_size, DEFAULT_BATCH_SIZE);
            Ok(LocalizeSummary {
                nodes: 3,
                intents: 1,
                removed: options.reverse,
            })
        }

        fn pull_flow(
            &self,
            flow_name: &str,
            _batch_size: usize,
        ) -> Result<PathBuf, PlatformError> {
            self.calls.borrow_mut().push("pull_flow");
            Ok(PathBuf::from(format!("/tmp/{}.json", flow_name)))
        }
    }

    /// Prompt that always gives the scripted answer and remembers being asked.
    struct Answer {
        yes: bool,
        asked: Cell<bool>,
    }

    impl Answer {
        fn new(yes: bool) -> Self {
            Self {
                yes,
                asked: Cell::new(false),
            }
        }
    }

    impl ConfirmPrompt for Answer {
        fn confirm(&self, message: &str) -> Result<bool> {
            assert!(message.contains("Flow 'MainFlow'"));
            self.asked.set(true);
            Ok(self.yes)
        }
    }

    fn options(locale: &str) -> LocalizeOptions {
        LocalizeOptions {
            locale_name: locale.to_string(),
            force_yes: false,
            reverse: false,
        }
    }

    #[test]
    fn test_unsupported_resource_type_makes_no_remote_calls() -> Result<()> {
        let platform = MockPlatform::with_locales(&["de"]);
        let prompt = Answer::new(true);

        let outcome = run_localize(&platform, &prompt, "intent", "MainFlow", &options("de"))?;

        assert!(matches!(outcome, LocalizeOutcome::Unsupported(ref t) if t == "intent"));
        assert!(platform.calls().is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_locale_stops_before_project_check() -> Result<()> {
        let platform = MockPlatform::with_locales(&["de"]);
        let prompt = Answer::new(true);

        let outcome = run_localize(&platform, &prompt, "flow", "MainFlow", &options("fr"))?;

        match outcome {
            LocalizeOutcome::BadLocale(LocaleCheck::Missing(name)) => assert_eq!(name, "fr"),
            other => panic!("expected BadLocale, got {:?}", other),
        }
        assert_eq!(platform.calls(), vec!["pull_locales"]);
        Ok(())
    }

    #[test]
    fn test_force_yes_never_prompts() -> Result<()> {
        let platform = MockPlatform::with_locales(&["de"]);
        let prompt = Answer::new(false);

        let mut opts = options("de");
        opts.force_yes = true;
        let outcome = run_localize(&platform, &prompt, "flow", "MainFlow", &opts)?;

        assert!(matches!(outcome, LocalizeOutcome::Completed { .. }));
        assert!(!prompt.asked.get());
        assert_eq!(
            platform.calls(),
            vec!["pull_locales", "check_project", "localize_flow", "pull_flow"]
        );
        Ok(())
    }

    #[test]
    fn test_declined_confirmation_aborts_gracefully() -> Result<()> {
        let platform = MockPlatform::with_locales(&["de"]);
        let prompt = Answer::new(false);

        let outcome = run_localize(&platform, &prompt, "flow", "MainFlow", &options("de"))?;

        assert!(matches!(outcome, LocalizeOutcome::Aborted));
        assert!(prompt.asked.get());
        // nothing destructive ran
        assert_eq!(platform.calls(), vec!["pull_locales", "check_project"]);
        Ok(())
    }

    #[test]
    fn test_reverse_run_reports_removal() -> Result<()> {
        let platform = MockPlatform::with_locales(&["de"]);
        let prompt = Answer::new(true);

        let mut opts = options("de");
        opts.force_yes = true;
        opts.reverse = true;
        let outcome = run_localize(&platform, &prompt, "flow", "MainFlow", &opts)?;

        match outcome {
            LocalizeOutcome::Completed { summary } => {
                let message = success_message("MainFlow", &summary);
                assert!(message.contains("removed localizations from"));
                assert!(message.contains("MainFlow"));
            }
            other => panic!("expected Completed, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_empty_locale_name_is_rejected_without_fetching() -> Result<()> {
        let platform = MockPlatform::with_locales(&["de"]);
        let prompt = Answer::new(true);

        let outcome = run_localize(&platform, &prompt, "flow", "MainFlow", &options(""))?;

        assert!(matches!(
            outcome,
            LocalizeOutcome::BadLocale(LocaleCheck::NameRequired)
        ));
        assert!(platform.calls().is_empty());
        Ok(())
    }
}
