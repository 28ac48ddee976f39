//! Subcommand handlers. Each one opens a fresh editor session over the
//! configured store, performs a single action and reports on stdout.

use anyhow::{Context, Result};
use runner_core::config::RunnerConfig;
use runner_core::{
    EditorSession, FileStore, FlowStatus, LanguageRegistry, MemoryStore, PersistenceAdapter,
    PistonExecutor,
};
use std::path::Path;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefsAction {
    Show,
    ToggleTheme,
    FontUp,
    FontDown,
}

/// Opens the JSON store, or an in-memory one when the file cannot be used.
/// Drafts and preferences are then lost on exit, which beats refusing to run.
pub fn open_persistence(config: &RunnerConfig) -> PersistenceAdapter {
    let path = config.storage.resolved_path();
    match FileStore::open(&path) {
        Ok(store) => {
            log::debug!("Using store at {}", store.path().display());
            PersistenceAdapter::new(Box::new(store))
        }
        Err(e) => {
            log::warn!(
                "Local store {} is unavailable ({}); drafts and preferences will not be kept",
                path.display(),
                e
            );
            PersistenceAdapter::new(Box::new(MemoryStore::new()))
        }
    }
}

fn open_session(config: &RunnerConfig, language: Option<&str>) -> Result<EditorSession> {
    let language = language.unwrap_or(config.default_language.as_str());
    let session = EditorSession::open(open_persistence(config), language)?;
    Ok(session)
}

pub async fn read_stdin_arg(text: Option<String>, file: Option<&Path>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read stdin file {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

pub fn list_languages() {
    for profile in LanguageRegistry::global().all() {
        println!(
            "{} {:<12} {:<12} .{}",
            profile.icon, profile.id, profile.display_name, profile.file_extension
        );
    }
}

pub async fn run(
    config: &RunnerConfig,
    language: Option<&str>,
    file: Option<&Path>,
    stdin: String,
) -> Result<ExitCode> {
    let mut session = open_session(config, language)?;

    if let Some(path) = file {
        let code = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read source file {}", path.display()))?;
        session.set_code(code);
        session.save_draft();
    }
    session.set_stdin(stdin);

    if !session.can_run() {
        eprintln!("Nothing to run: the {} source is empty", session.language().display_name);
        return Ok(ExitCode::SUCCESS);
    }

    let executor = PistonExecutor::from_config(&config.execution);
    eprintln!("{}", session.output_placeholder());
    session.run(&executor).await?;

    let flow = session.flow();
    match flow.status() {
        FlowStatus::Succeeded => {
            print!("{}", with_trailing_newline(flow.output()));
            if let Some(elapsed) = flow.elapsed() {
                eprintln!("Finished in {}s", elapsed);
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            eprintln!("{}", flow.output());
            Ok(ExitCode::FAILURE)
        }
    }
}

pub fn show(config: &RunnerConfig, language: Option<&str>) -> Result<()> {
    let session = open_session(config, language)?;
    print!("{}", with_trailing_newline(session.code()));
    Ok(())
}

pub async fn edit(config: &RunnerConfig, language: Option<&str>, file: &Path) -> Result<()> {
    let mut session = open_session(config, language)?;
    let code = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read source file {}", file.display()))?;
    session.set_code(code);
    session.save_draft();
    println!("Saved {} draft", session.language().display_name);
    Ok(())
}

pub fn reset(config: &RunnerConfig, language: Option<&str>) -> Result<()> {
    let mut session = open_session(config, language)?;
    session.reset_editor();
    println!("Restored the {} starter source", session.language().display_name);
    Ok(())
}

pub fn export(config: &RunnerConfig, language: Option<&str>, out_dir: &Path) -> Result<()> {
    let session = open_session(config, language)?;
    let path = session
        .export()
        .write_to_dir(out_dir)
        .with_context(|| format!("Failed to export into {}", out_dir.display()))?;
    println!("{}", path.display());
    Ok(())
}

pub fn prefs(config: &RunnerConfig, action: PrefsAction) -> Result<()> {
    let mut session = open_session(config, None)?;
    match action {
        PrefsAction::Show => {}
        PrefsAction::ToggleTheme => {
            session.toggle_dark_mode();
        }
        PrefsAction::FontUp => {
            if !session.preferences().can_increase_font_size() {
                log::info!("Font size is already at its maximum");
            }
            session.increase_font_size();
        }
        PrefsAction::FontDown => {
            if !session.preferences().can_decrease_font_size() {
                log::info!("Font size is already at its minimum");
            }
            session.decrease_font_size();
        }
    }

    let preferences = session.preferences();
    println!("theme: {}", preferences.theme_name());
    println!("font size: {}px", preferences.font_size_px);
    Ok(())
}

fn with_trailing_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}
