//! Command-line front end for the identity gate and page state.
//!
//! The binary parses [`CliArgs`], loads settings with [`load_settings`] and
//! delegates to [`execute`], which returns the text to print so commands can
//! be exercised without spawning a process. Page commands are pure; only the
//! identity commands open the file store.

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ortho_config::OrthoConfig;
use pagination::{PageItem, PaginationWindow, current_page, with_updated_page};
use thiserror::Error;

use crate::config::LockedViewSettings;
use crate::domain::ports::{KeyValueStore, KeyValueStoreError};
use crate::domain::{
    AccessDecision, AccessGuard, IdentityCandidate, IdentityGate, IdentityGateError,
};
use crate::outbound::store::FileKeyValueStore;

/// Printed by `whoami` when no identity is stored.
pub const NO_IDENTITY_MESSAGE: &str = "no identity recorded";

/// `lockedview` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lockedview",
    about = "Manage the local LockedView identity and page query state",
    version
)]
pub struct CliArgs {
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands accepted by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Commands reading or writing the stored identity.
    #[command(flatten)]
    Identity(IdentityCommand),
    /// Commands computing page state from their arguments alone.
    #[command(flatten)]
    Page(PageCommand),
}

/// Subcommands backed by the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum IdentityCommand {
    /// Print the stored identity.
    Whoami,
    /// Store a new identity, replacing any previous one.
    Login {
        /// Visitor name.
        #[arg(long, value_name = "name")]
        username: String,
        /// Visitor job title.
        #[arg(long = "job-title", value_name = "title")]
        job_title: String,
    },
    /// Remove the stored identity.
    Logout,
}

/// Subcommands over URL query strings.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum PageCommand {
    /// Print the page selected by a query string.
    Page {
        /// URL query string, with or without a leading `?`.
        #[arg(allow_hyphen_values = true)]
        query: String,
    },
    /// Print the query string after selecting a page.
    Goto {
        /// URL query string, with or without a leading `?`.
        #[arg(allow_hyphen_values = true)]
        query: String,
        /// Page to select; empty or `1` removes the parameter.
        #[arg(allow_hyphen_values = true)]
        page: String,
    },
    /// Print the pagination control for a query string.
    Window {
        /// URL query string, with or without a leading `?`.
        #[arg(allow_hyphen_values = true)]
        query: String,
        /// Total number of items across all pages.
        #[arg(long = "total-count", value_name = "n")]
        total_count: u64,
        /// Items per page; defaults to the configured page size.
        #[arg(long = "page-size", value_name = "n")]
        page_size: Option<u64>,
    },
}

/// Errors reported by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings could not be loaded.
    #[error("failed to load settings: {message}")]
    Settings {
        /// Description of the failure.
        message: String,
    },
    /// The store could not be opened.
    #[error("failed to open identity store: {0}")]
    Store(#[from] KeyValueStoreError),
    /// The identity gate rejected the operation.
    #[error(transparent)]
    Identity(#[from] IdentityGateError),
    /// The async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Load settings from defaults and `LOCKEDVIEW_*` environment variables.
///
/// # Errors
///
/// Returns [`CliError::Settings`] when a configured value cannot be parsed.
pub fn load_settings() -> Result<LockedViewSettings, CliError> {
    LockedViewSettings::load_from_iter([OsString::from("lockedview")]).map_err(|err| {
        CliError::Settings {
            message: err.to_string(),
        }
    })
}

/// Execute `command` under `settings` and return the text to print.
///
/// Identity commands open the file store in the configured data directory,
/// creating it if needed. Page commands never touch the filesystem.
///
/// # Errors
///
/// Returns [`CliError::Store`] when the store cannot be opened and
/// [`CliError::Identity`] when `login` is rejected or a store write fails.
pub async fn execute(command: Command, settings: &LockedViewSettings) -> Result<String, CliError> {
    match command {
        Command::Page(command) => Ok(run_page(command, settings.page_size())),
        Command::Identity(command) => {
            let store = Arc::new(FileKeyValueStore::open(settings.data_dir())?);
            let mut guard = AccessGuard::new(IdentityGate::with_key(store, settings.storage_key()));
            run_identity(command, &mut guard).await
        }
    }
}

/// Execute an identity command against `guard`.
///
/// # Errors
///
/// Returns [`CliError::Identity`] when `login` is rejected or a store write
/// fails.
pub async fn run_identity<S>(
    command: IdentityCommand,
    guard: &mut AccessGuard<S>,
) -> Result<String, CliError>
where
    S: KeyValueStore,
{
    let output = match command {
        IdentityCommand::Whoami => match guard.resolve().await {
            AccessDecision::Granted(record) => record.to_string(),
            AccessDecision::Pending | AccessDecision::Prompt => NO_IDENTITY_MESSAGE.to_owned(),
        },
        IdentityCommand::Login {
            username,
            job_title,
        } => {
            let record = guard
                .submit(IdentityCandidate::new(username, job_title))
                .await?;
            format!("signed in as {record}")
        }
        IdentityCommand::Logout => {
            guard.sign_out().await?;
            "signed out".to_owned()
        }
    };
    Ok(output)
}

/// Execute a page command.
///
/// `default_page_size` applies to `window` when `--page-size` is omitted.
pub fn run_page(command: PageCommand, default_page_size: u64) -> String {
    match command {
        PageCommand::Page { query } => current_page(&query).to_string(),
        PageCommand::Goto { query, page } => with_updated_page(&query, page),
        PageCommand::Window {
            query,
            total_count,
            page_size,
        } => {
            let window = PaginationWindow::new(current_page(&query), total_count)
                .with_page_size(page_size.unwrap_or(default_page_size));
            render_window(&window)
        }
    }
}

/// Render a pagination control as text, e.g. `1 … 4 [5] 6 … 10`.
///
/// The current page is bracketed. A hidden control renders as an empty
/// string.
pub fn render_window(window: &PaginationWindow) -> String {
    if !window.is_visible() {
        return String::new();
    }
    let current = window.current();
    window
        .items()
        .into_iter()
        .map(|item| match item {
            PageItem::Page(page) if page == current => format!("[{page}]"),
            PageItem::Page(page) => page.to_string(),
            PageItem::Ellipsis => "…".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use env_lock::lock_env;
    use pagination::PageNumber;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::IdentityValidationError;
    use crate::outbound::store::{InMemoryKeyValueStore, STORE_FILE_NAME};

    #[fixture]
    fn guard() -> AccessGuard<InMemoryKeyValueStore> {
        AccessGuard::new(IdentityGate::new(Arc::new(InMemoryKeyValueStore::new())))
    }

    fn parse(args: &[&str]) -> Command {
        let argv = std::iter::once("lockedview").chain(args.iter().copied());
        CliArgs::try_parse_from(argv).expect("valid arguments").command
    }

    async fn exec(guard: &mut AccessGuard<InMemoryKeyValueStore>, args: &[&str]) -> String {
        match parse(args) {
            Command::Identity(command) => run_identity(command, guard)
                .await
                .expect("command succeeds"),
            Command::Page(command) => run_page(command, 20),
        }
    }

    fn settings_in(data_dir: &std::path::Path) -> LockedViewSettings {
        LockedViewSettings {
            data_dir: Some(data_dir.to_path_buf()),
            storage_key: None,
            page_size: 20,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn login_then_whoami(mut guard: AccessGuard<InMemoryKeyValueStore>) {
        assert_eq!(exec(&mut guard, &["whoami"]).await, NO_IDENTITY_MESSAGE);

        let login = exec(
            &mut guard,
            &["login", "--username", " Morty ", "--job-title", "Sidekick"],
        )
        .await;

        assert_eq!(login, "signed in as Morty (Sidekick)");
        assert_eq!(exec(&mut guard, &["whoami"]).await, "Morty (Sidekick)");
    }

    #[rstest]
    #[tokio::test]
    async fn blank_login_is_rejected(mut guard: AccessGuard<InMemoryKeyValueStore>) {
        let Command::Identity(command) =
            parse(&["login", "--username", "", "--job-title", "Sidekick"])
        else {
            panic!("login is an identity command");
        };

        let err = run_identity(command, &mut guard)
            .await
            .expect_err("blank username");

        assert!(matches!(
            err,
            CliError::Identity(IdentityGateError::Validation(
                IdentityValidationError::EmptyField { .. }
            ))
        ));
        assert_eq!(err.to_string(), "empty field: username");
    }

    #[rstest]
    #[tokio::test]
    async fn logout_clears_identity(mut guard: AccessGuard<InMemoryKeyValueStore>) {
        exec(
            &mut guard,
            &["login", "--username", "Morty", "--job-title", "Sidekick"],
        )
        .await;

        assert_eq!(exec(&mut guard, &["logout"]).await, "signed out");
        assert_eq!(exec(&mut guard, &["whoami"]).await, NO_IDENTITY_MESSAGE);
    }

    #[rstest]
    #[case(&["page", ""], "1")]
    #[case(&["page", "?pageNumber=5"], "5")]
    #[case(&["page", "pageNumber=-3"], "1")]
    #[case(&["goto", "foo=bar&pageNumber=2", "1"], "foo=bar")]
    #[case(&["goto", "", "5"], "pageNumber=5")]
    #[case(&["goto", "pageNumber=4", "-2"], "pageNumber=-2")]
    #[case(&["window", "pageNumber=5", "--total-count", "200"], "1 … 4 [5] 6 … 10")]
    #[case(&["window", "", "--total-count", "20"], "")]
    #[case(&["window", "pageNumber=2", "--total-count", "200", "--page-size", "50"], "1 [2] 3 4")]
    #[tokio::test]
    async fn page_commands(
        mut guard: AccessGuard<InMemoryKeyValueStore>,
        #[case] args: &[&str],
        #[case] expected: &str,
    ) {
        assert_eq!(exec(&mut guard, args).await, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn execute_runs_with_default_settings() {
        let _guard = lock_env([
            ("LOCKEDVIEW_DATA_DIR", None::<String>),
            ("LOCKEDVIEW_STORAGE_KEY", None::<String>),
            ("LOCKEDVIEW_PAGE_SIZE", None::<String>),
        ]);
        let temp = tempfile::tempdir().expect("temp dir");
        let mut settings = load_settings().expect("settings load without environment");
        settings.data_dir = Some(temp.path().to_path_buf());

        let before = execute(parse(&["whoami"]), &settings)
            .await
            .expect("whoami succeeds");
        execute(
            parse(&["login", "--username", "Morty", "--job-title", "Sidekick"]),
            &settings,
        )
        .await
        .expect("login succeeds");
        let after = execute(parse(&["whoami"]), &settings)
            .await
            .expect("whoami succeeds");

        assert_eq!(before, NO_IDENTITY_MESSAGE);
        assert_eq!(after, "Morty (Sidekick)");
        assert!(temp.path().join(STORE_FILE_NAME).is_file());
    }

    #[rstest]
    #[tokio::test]
    async fn execute_uses_configured_page_size() {
        let temp = tempfile::tempdir().expect("temp dir");
        let mut settings = settings_in(temp.path());
        settings.page_size = 50;

        let output = execute(
            parse(&["window", "pageNumber=2", "--total-count", "200"]),
            &settings,
        )
        .await
        .expect("window succeeds");

        assert_eq!(output, "1 [2] 3 4");
    }

    #[rstest]
    #[case(&["page", "pageNumber=3"])]
    #[case(&["goto", "", "4"])]
    #[case(&["window", "pageNumber=5", "--total-count", "200"])]
    #[tokio::test]
    async fn page_commands_leave_the_data_dir_alone(#[case] args: &[&str]) {
        let temp = tempfile::tempdir().expect("temp dir");
        let data_dir = temp.path().join("unused");

        execute(parse(args), &settings_in(&data_dir))
            .await
            .expect("page command succeeds");

        assert!(!data_dir.exists());
    }

    #[rstest]
    #[tokio::test]
    async fn identity_commands_report_unopenable_store() {
        let temp = tempfile::tempdir().expect("temp dir");
        let occupied = temp.path().join("occupied");
        std::fs::write(&occupied, "x").expect("seed file");

        let err = execute(parse(&["whoami"]), &settings_in(&occupied))
            .await
            .expect_err("data dir is a file");

        assert!(matches!(err, CliError::Store(_)));
    }

    #[rstest]
    fn renders_ellipsis_and_bracketed_current_page() {
        let current = PageNumber::new(9).expect("non-zero page");
        let window = PaginationWindow::new(current, 200);

        assert_eq!(render_window(&window), "1 … 6 7 8 [9] 10");
    }

    #[rstest]
    fn missing_subcommand_is_rejected() {
        assert!(CliArgs::try_parse_from(["lockedview"]).is_err());
    }
}
