//! Editor session state.
//!
//! Holds what a shell displays: the active language, the code being edited,
//! the stdin buffer, display preferences and the execution flow. Drafts and
//! preferences go through the injected [`PersistenceAdapter`].

use std::path::{Path, PathBuf};

use crate::errors::RunnerError;
use crate::executors::CodeExecutor;
use crate::flow::{Dispatch, ExecutionFlow, ExecutionOutcome, FlowStatus, Resolution};
use crate::languages::{LanguageProfile, LanguageRegistry};
use crate::preferences::SessionPreferences;
use crate::storage::PersistenceAdapter;

pub const RUNNING_PLACEHOLDER: &str = "Running your code...";
pub const EMPTY_OUTPUT_PLACEHOLDER: &str = "Output will appear here";
pub const STDIN_READY_PLACEHOLDER: &str = "Program will run with provided input";

/// The current source, ready to be saved by a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportedFile {
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, RunnerError> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        log::info!("Exported {} bytes to {}", self.contents.len(), path.display());
        Ok(path)
    }
}

pub struct EditorSession {
    registry: &'static LanguageRegistry,
    persistence: PersistenceAdapter,
    flow: ExecutionFlow,
    language: &'static LanguageProfile,
    code: String,
    stdin: String,
    preferences: SessionPreferences,
}

impl EditorSession {
    /// Opens `language_id` with its draft, or its starter source when no
    /// non-empty draft exists, and the stored preferences.
    pub fn open(persistence: PersistenceAdapter, language_id: &str) -> Result<Self, RunnerError> {
        let registry = LanguageRegistry::global();
        let language = registry.get(language_id)?;
        let preferences = persistence.load_preferences();
        let code = persistence
            .load_draft(language.id)
            .unwrap_or_else(|| language.starter_source.to_string());

        log::debug!(
            "Opened {} session (theme {}, font {}px)",
            language.display_name,
            preferences.theme_name(),
            preferences.font_size_px
        );

        Ok(Self {
            registry,
            persistence,
            flow: ExecutionFlow::new(),
            language,
            code,
            stdin: String::new(),
            preferences,
        })
    }

    pub fn language(&self) -> &'static LanguageProfile {
        self.language
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Mirrors the editor surface's content. Not persisted until the draft is
    /// saved or the language changes.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn stdin(&self) -> &str {
        &self.stdin
    }

    pub fn set_stdin(&mut self, stdin: impl Into<String>) {
        self.stdin = stdin.into();
    }

    pub fn clear_input(&mut self) {
        self.stdin.clear();
    }

    pub fn save_draft(&mut self) {
        self.persistence.save_draft(self.language.id, &self.code);
    }

    /// Saves the current code under the outgoing language, then loads the
    /// incoming language's draft or starter source. Returns `false` when
    /// `language_id` is already active.
    pub fn switch_language(&mut self, language_id: &str) -> Result<bool, RunnerError> {
        let next = self.registry.get(language_id)?;
        if next.id == self.language.id {
            return Ok(false);
        }

        self.persistence.save_draft(self.language.id, &self.code);

        self.code = self
            .persistence
            .load_draft(next.id)
            .unwrap_or_else(|| next.starter_source.to_string());
        log::debug!("Switched language {} -> {}", self.language.id, next.id);
        self.language = next;
        self.flow.invalidate();

        Ok(true)
    }

    /// Back to the starter source, dropping the stored draft and the output.
    pub fn reset_editor(&mut self) {
        self.code = self.language.starter_source.to_string();
        self.persistence.clear_draft(self.language.id);
        self.flow.invalidate();
    }

    pub fn export(&self) -> ExportedFile {
        ExportedFile {
            file_name: self.language.export_file_name(),
            mime_type: "text/plain",
            contents: self.code.clone(),
        }
    }

    pub fn preferences(&self) -> SessionPreferences {
        self.preferences
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        let dark_mode = self.preferences.toggle_dark_mode();
        self.persistence.save_preferences(&self.preferences);
        dark_mode
    }

    pub fn increase_font_size(&mut self) -> u8 {
        let size = self.preferences.increase_font_size();
        self.persistence.save_preferences(&self.preferences);
        size
    }

    pub fn decrease_font_size(&mut self) -> u8 {
        let size = self.preferences.decrease_font_size();
        self.persistence.save_preferences(&self.preferences);
        size
    }

    pub fn flow(&self) -> &ExecutionFlow {
        &self.flow
    }

    pub fn can_run(&self) -> bool {
        self.flow.can_run(&self.code)
    }

    /// Starts a run from the current editor state. `None` when a run is already
    /// in flight or the code is blank.
    pub fn begin_run(&mut self) -> Result<Option<Dispatch>, RunnerError> {
        self.flow
            .begin(self.registry, self.language.id, &self.code, &self.stdin)
    }

    pub fn complete_run(&mut self, dispatch: Dispatch, outcome: ExecutionOutcome) -> Resolution {
        self.flow.resolve(dispatch, outcome)
    }

    pub fn abandon_run(&mut self, dispatch: Dispatch) {
        self.flow.abandon(dispatch);
    }

    pub async fn run(
        &mut self,
        executor: &dyn CodeExecutor,
    ) -> Result<Option<Resolution>, RunnerError> {
        self.flow
            .run(
                executor,
                self.registry,
                self.language.id,
                &self.code,
                &self.stdin,
            )
            .await
    }

    pub fn clear_output(&mut self) {
        self.flow.clear_output();
    }

    /// Text for an output pane that has nothing to show yet.
    pub fn output_placeholder(&self) -> &'static str {
        if *self.flow.status() == FlowStatus::Dispatching {
            RUNNING_PLACEHOLDER
        } else if self.stdin.is_empty() {
            EMPTY_OUTPUT_PLACEHOLDER
        } else {
            STDIN_READY_PLACEHOLDER
        }
    }

    pub fn persistence(&self) -> &PersistenceAdapter {
        &self.persistence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::test_utils::scripted_executor::ScriptedExecutor;
    use tempfile::TempDir;

    fn session(language_id: &str) -> EditorSession {
        let persistence = PersistenceAdapter::new(Box::new(MemoryStore::new()));
        EditorSession::open(persistence, language_id).unwrap()
    }

    #[test]
    fn test_open_uses_starter_source_without_draft() {
        let session = session("python");
        assert_eq!(session.code(), "# Python\nprint(\"Hello, World!\")");
        assert_eq!(session.preferences(), SessionPreferences::default());
    }

    #[test]
    fn test_open_unknown_language() {
        let persistence = PersistenceAdapter::new(Box::new(MemoryStore::new()));
        let result = EditorSession::open(persistence, "cobol");
        assert!(matches!(result, Err(RunnerError::UnknownLanguage(_))));
    }

    #[test]
    fn test_switch_round_trip_restores_text() {
        let mut session = session("c");
        session.set_code("int main() { return 42; }");

        assert!(session.switch_language("ruby").unwrap());
        assert_eq!(session.code(), "# Ruby\nputs \"Hello, World!\"");
        session.set_code("puts 1");

        assert!(session.switch_language("c").unwrap());
        assert_eq!(session.code(), "int main() { return 42; }");

        session.switch_language("ruby").unwrap();
        assert_eq!(session.code(), "puts 1");
    }

    #[test]
    fn test_emptied_draft_comes_back_as_starter_source() {
        let mut session = session("python");
        session.set_code("");
        session.switch_language("ruby").unwrap();
        session.switch_language("python").unwrap();
        assert_eq!(session.code(), "# Python\nprint(\"Hello, World!\")");

        let mut store = MemoryStore::new();
        store.set("code_python", "").unwrap();
        let reopened =
            EditorSession::open(PersistenceAdapter::new(Box::new(store)), "python").unwrap();
        assert_eq!(reopened.code(), reopened.language().starter_source);
    }

    #[test]
    fn test_switch_saves_under_previous_language_key() {
        let mut session = session("go");
        session.set_code("package main // edited");
        session.switch_language("rust").unwrap();

        assert_eq!(
            session.persistence().load_draft("go").as_deref(),
            Some("package main // edited")
        );
        assert_eq!(session.persistence().load_draft("rust"), None);
    }

    #[test]
    fn test_switch_to_same_language_is_ignored() {
        let mut session = session("go");
        session.set_code("unsaved");
        assert!(!session.switch_language("go").unwrap());
        assert_eq!(session.code(), "unsaved");
        assert_eq!(session.persistence().load_draft("go"), None);
    }

    #[test]
    fn test_switch_to_unknown_language_keeps_state() {
        let mut session = session("go");
        session.set_code("unsaved");
        assert!(session.switch_language("cobol").is_err());
        assert_eq!(session.language().id, "go");
        assert_eq!(session.code(), "unsaved");
    }

    #[test]
    fn test_reset_editor_drops_draft() {
        let mut session = session("java");
        session.set_code("class X {}");
        session.save_draft();

        session.reset_editor();
        assert_eq!(session.code(), session.language().starter_source);
        assert_eq!(session.persistence().load_draft("java"), None);
    }

    #[test]
    fn test_export_names_file_after_extension() {
        let mut session = session("typescript");
        session.set_code("console.log(1)");

        let exported = session.export();
        assert_eq!(exported.file_name, "code.ts");
        assert_eq!(exported.mime_type, "text/plain");

        let dir = TempDir::new().unwrap();
        let path = exported.write_to_dir(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "console.log(1)");
    }

    #[test]
    fn test_preferences_persist_immediately() {
        let mut session = session("c");
        assert!(!session.toggle_dark_mode());
        assert_eq!(session.increase_font_size(), 15);

        let stored = session.persistence().load_preferences();
        assert!(!stored.dark_mode);
        assert_eq!(stored.font_size_px, 15);

        for _ in 0..30 {
            session.decrease_font_size();
        }
        assert_eq!(session.persistence().load_preferences().font_size_px, 10);
    }

    #[tokio::test]
    async fn test_run_sends_current_code_and_stdin() {
        let executor = ScriptedExecutor::output("42\n");
        let mut session = session("python");
        session.set_code("print(input())");
        session.set_stdin("42");

        let resolution = session.run(&executor).await.unwrap();
        assert_eq!(resolution, Some(Resolution::Applied));
        assert_eq!(session.flow().output(), "42\n");
        assert!(session.flow().elapsed().is_some());

        let request = &executor.requests()[0];
        assert_eq!(request.service_language_id, "python");
        assert_eq!(request.source_text, "print(input())");
        assert_eq!(request.stdin, "42");
    }

    #[tokio::test]
    async fn test_blank_code_does_not_run() {
        let executor = ScriptedExecutor::output("never");
        let mut session = session("python");
        session.set_code("  \n ");

        assert!(!session.can_run());
        assert_eq!(session.run(&executor).await.unwrap(), None);
        assert_eq!(executor.call_count(), 0);
        assert_eq!(session.flow().status(), &FlowStatus::Idle);
    }

    #[tokio::test]
    async fn test_language_switch_orphans_in_flight_run() {
        let executor = ScriptedExecutor::output("stale");
        let mut session = session("c");

        let dispatch = session.begin_run().unwrap().unwrap();
        assert_eq!(session.output_placeholder(), RUNNING_PLACEHOLDER);
        session.switch_language("python").unwrap();

        let outcome = dispatch.execute(&executor).await;
        assert_eq!(session.complete_run(dispatch, outcome), Resolution::Discarded);
        assert_eq!(session.flow().output(), "");
        assert!(session.can_run());
    }

    #[test]
    fn test_output_placeholder_reflects_stdin() {
        let mut session = session("c");
        assert_eq!(session.output_placeholder(), EMPTY_OUTPUT_PLACEHOLDER);
        session.set_stdin("1 2 3");
        assert_eq!(session.output_placeholder(), STDIN_READY_PLACEHOLDER);
        session.clear_input();
        assert_eq!(session.stdin(), "");
    }
}
