//! Fixed table of supported languages.
//!
//! The set is closed: it is built once and never mutated. The order of the
//! table is the order the language selector shows.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::errors::RunnerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageProfile {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Identifier understood by the editor's syntax highlighter.
    pub editor_syntax_id: &'static str,
    /// Identifier understood by the execution service.
    pub service_language_id: &'static str,
    pub starter_source: &'static str,
    pub file_extension: &'static str,
    pub icon: &'static str,
}

impl LanguageProfile {
    /// Name used when the current source is exported, e.g. `code.py`.
    pub fn export_file_name(&self) -> String {
        format!("code.{}", self.file_extension)
    }
}

const PROFILES: &[LanguageProfile] = &[
    LanguageProfile {
        id: "c",
        display_name: "C",
        editor_syntax_id: "c",
        service_language_id: "c",
        starter_source: "// C\n#include <stdio.h>\n\nint main() {\n    printf(\"Hello, World!\\n\");\n    return 0;\n}",
        file_extension: "c",
        icon: "🔷",
    },
    LanguageProfile {
        id: "cpp",
        display_name: "C++",
        editor_syntax_id: "cpp",
        service_language_id: "cpp",
        starter_source: "// C++\n#include <iostream>\nusing namespace std;\n\nint main() {\n    cout << \"Hello, World!\" << endl;\n    return 0;\n}",
        file_extension: "cpp",
        icon: "➕",
    },
    LanguageProfile {
        id: "java",
        display_name: "Java",
        editor_syntax_id: "java",
        service_language_id: "java",
        starter_source: "// Java\npublic class Main {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, World!\");\n    }\n}",
        file_extension: "java",
        icon: "☕",
    },
    LanguageProfile {
        id: "python",
        display_name: "Python",
        editor_syntax_id: "python",
        service_language_id: "python",
        starter_source: "# Python\nprint(\"Hello, World!\")",
        file_extension: "py",
        icon: "🐍",
    },
    LanguageProfile {
        id: "javascript",
        display_name: "JavaScript",
        editor_syntax_id: "javascript",
        service_language_id: "javascript",
        starter_source: "// JavaScript\nconsole.log(\"Hello, World!\");",
        file_extension: "js",
        icon: "📜",
    },
    LanguageProfile {
        id: "typescript",
        display_name: "TypeScript",
        editor_syntax_id: "typescript",
        service_language_id: "typescript",
        starter_source: "// TypeScript\nconst message: string = 'Hello, World!';\nconsole.log(message);",
        file_extension: "ts",
        icon: "🟦",
    },
    LanguageProfile {
        id: "csharp",
        display_name: "C#",
        editor_syntax_id: "csharp",
        service_language_id: "csharp",
        starter_source: "// C#\nusing System;\n\nclass Program {\n    static void Main() {\n        Console.WriteLine(\"Hello, World!\");\n    }\n}",
        file_extension: "cs",
        icon: "🔶",
    },
    LanguageProfile {
        id: "go",
        display_name: "Go",
        editor_syntax_id: "go",
        service_language_id: "go",
        starter_source: "// Go\npackage main\n\nimport \"fmt\"\n\nfunc main() {\n    fmt.Println(\"Hello, World!\")\n}",
        file_extension: "go",
        icon: "🚀",
    },
    LanguageProfile {
        id: "rust",
        display_name: "Rust",
        editor_syntax_id: "rust",
        service_language_id: "rust",
        starter_source: "// Rust\nfn main() {\n    println!(\"Hello, World!\");\n}",
        file_extension: "rs",
        icon: "🦀",
    },
    LanguageProfile {
        id: "ruby",
        display_name: "Ruby",
        editor_syntax_id: "ruby",
        service_language_id: "ruby",
        starter_source: "# Ruby\nputs \"Hello, World!\"",
        file_extension: "rb",
        icon: "💎",
    },
    LanguageProfile {
        id: "swift",
        display_name: "Swift",
        editor_syntax_id: "swift",
        service_language_id: "swift",
        starter_source: "// Swift\nprint(\"Hello, World!\")",
        file_extension: "swift",
        icon: "🕊️",
    },
    LanguageProfile {
        id: "php",
        display_name: "PHP",
        editor_syntax_id: "php",
        service_language_id: "php",
        starter_source: "// PHP\n<?php\necho \"Hello, World!\";",
        file_extension: "php",
        icon: "🐘",
    },
];

static REGISTRY: Lazy<LanguageRegistry> = Lazy::new(|| LanguageRegistry::new(PROFILES));

/// Immutable, ordered lookup over the language table.
#[derive(Debug)]
pub struct LanguageRegistry {
    profiles: &'static [LanguageProfile],
}

impl LanguageRegistry {
    fn new(profiles: &'static [LanguageProfile]) -> Self {
        Self { profiles }
    }

    /// The process-wide registry.
    pub fn global() -> &'static LanguageRegistry {
        &REGISTRY
    }

    pub fn get(&self, id: &str) -> Result<&LanguageProfile, RunnerError> {
        self.profiles
            .iter()
            .find(|profile| profile.id == id)
            .ok_or_else(|| RunnerError::UnknownLanguage(id.to_string()))
    }

    pub fn all(&self) -> &[LanguageProfile] {
        self.profiles
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_ok()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.profiles.iter().map(|profile| profile.id)
    }
}
