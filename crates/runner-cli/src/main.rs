use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use runner_core::config::ConfigLoader;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser, Debug)]
#[clap(
    name = "coderun",
    author,
    version = "0.1.0",
    about = "Edit and run snippets in a dozen languages on a Piston execution service"
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(long, short, help = "Configuration file (defaults to ./coderun.yaml when present)")]
    config: Option<PathBuf>,

    #[clap(long, help = "JSON file holding drafts and preferences")]
    store: Option<PathBuf>,

    #[clap(long, short, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the supported languages
    Languages,
    /// Run the stored draft, or a source file, and print its output
    Run {
        #[clap(long, short, help = "Language id (see `coderun languages`)")]
        language: Option<String>,

        #[clap(long, short, help = "Source file to run; it replaces the stored draft")]
        file: Option<PathBuf>,

        #[clap(long, conflicts_with = "stdin_file", help = "Text passed to the program's stdin")]
        stdin: Option<String>,

        #[clap(long, help = "File whose contents are passed to the program's stdin")]
        stdin_file: Option<PathBuf>,
    },
    /// Print the stored draft (or the starter source)
    Show {
        #[clap(long, short)]
        language: Option<String>,
    },
    /// Replace the stored draft with the contents of a file
    Edit {
        #[clap(long, short)]
        language: Option<String>,

        file: PathBuf,
    },
    /// Restore the starter source and drop the stored draft
    Reset {
        #[clap(long, short)]
        language: Option<String>,
    },
    /// Write the current draft to code.<extension>
    Export {
        #[clap(long, short)]
        language: Option<String>,

        #[clap(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Show or change display preferences
    Prefs {
        #[clap(subcommand)]
        action: PrefsCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsCommands {
    /// Print the current theme and font size
    Show,
    /// Switch between the dark and light theme
    ToggleTheme,
    /// Increase the editor font size by one pixel
    FontUp,
    /// Decrease the editor font size by one pixel
    FontDown,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Program output owns stdout, so logs always go to stderr.
    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .target(env_logger::Target::Stderr)
        .init();

    let mut config = ConfigLoader::load(cli.config.as_deref()).await?;
    if let Some(store) = cli.store {
        config.storage.path = Some(store);
    }

    match cli.command {
        Commands::Languages => {
            commands::list_languages();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            language,
            file,
            stdin,
            stdin_file,
        } => {
            let stdin = commands::read_stdin_arg(stdin, stdin_file.as_deref()).await?;
            commands::run(&config, language.as_deref(), file.as_deref(), stdin).await
        }
        Commands::Show { language } => {
            commands::show(&config, language.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Edit { language, file } => {
            commands::edit(&config, language.as_deref(), &file).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Reset { language } => {
            commands::reset(&config, language.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Export { language, out_dir } => {
            commands::export(&config, language.as_deref(), &out_dir)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Prefs { action } => {
            let action = match action {
                PrefsCommands::Show => commands::PrefsAction::Show,
                PrefsCommands::ToggleTheme => commands::PrefsAction::ToggleTheme,
                PrefsCommands::FontUp => commands::PrefsAction::FontUp,
                PrefsCommands::FontDown => commands::PrefsAction::FontDown,
            };
            commands::prefs(&config, action)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
