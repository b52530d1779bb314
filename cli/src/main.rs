use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use portal::{AuthError, ConfigError, FileStore, PortalConfig, RegisterRequest, SessionContext, SessionStatus, StoreError};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot determine a data directory; pass --session-file or set STUDIO_SESSION_FILE")]
    NoDataDir,
    #[error("session file: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("session ended; sign in again")]
    SessionEnded,
    #[error("could not render output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "studio", about = "Ironwood member portal session CLI")]
struct Cli {
    #[arg(long, env = "STUDIO_API_URL", default_value = portal::config::DEFAULT_API_URL)]
    api_url: String,

    /// Where the session's tokens and cached profile are kept.
    #[arg(long, env = "STUDIO_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and cache the member profile.
    Login(Credentials),
    /// Create an account, then sign in with it.
    Register(RegisterArgs),
    /// Forget the local session.
    Logout,
    /// Exchange the refresh token for a new pair.
    Refresh,
    /// Show the local session without contacting the backend.
    Status,
    /// Re-fetch the profile for the current access token.
    Whoami,
}

#[derive(Args, Debug)]
struct Credentials {
    #[arg(long)]
    email: String,

    #[arg(long, env = "STUDIO_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[command(flatten)]
    credentials: Credentials,

    #[arg(long)]
    username: Option<String>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,
}

impl RegisterArgs {
    fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            ..RegisterRequest::new(self.credentials.email, self.credentials.password)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await.and_then(|output| print_json(&output)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Execute one command and return what should be printed for it.
async fn run(cli: Cli) -> Result<Value, CliError> {
    let config = PortalConfig::new(&cli.api_url)?;
    let session_file = resolve_session_file(cli.session_file)?;
    tracing::debug!(path = %session_file.display(), "opening session file");
    let store = Arc::new(FileStore::open(session_file)?);
    let session = config.session_context(store);

    match cli.command {
        Command::Login(credentials) => {
            session.login(&credentials.email, &credentials.password).await?;
            summary(&session)
        }
        Command::Register(args) => {
            session.register(&args.into_request()).await?;
            summary(&session)
        }
        Command::Logout => {
            session.logout();
            summary(&session)
        }
        Command::Refresh => {
            if session.refresh_token().await == SessionStatus::Unauthenticated {
                return Err(CliError::SessionEnded);
            }
            summary(&session)
        }
        Command::Status => summary(&session),
        Command::Whoami => {
            let user = session.reload_profile().await?;
            Ok(serde_json::to_value(user)?)
        }
    }
}

fn resolve_session_file(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let dirs = directories::ProjectDirs::from("fit", "Ironwood", "studio").ok_or(CliError::NoDataDir)?;
    Ok(dirs.data_dir().join("session.json"))
}

/// Token-free session view.
fn summary(session: &SessionContext) -> Result<Value, CliError> {
    Ok(serde_json::to_value(session.snapshot().summary())?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_parses_credentials_and_globals() {
        let cli = Cli::try_parse_from([
            "studio",
            "--api-url",
            "https://api.ironwood.test",
            "--session-file",
            "/tmp/s.json",
            "login",
            "--email",
            "a@b.com",
            "--password",
            "pw123456",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "https://api.ironwood.test");
        assert_eq!(cli.session_file, Some(PathBuf::from("/tmp/s.json")));
        match cli.command {
            Command::Login(c) => {
                assert_eq!(c.email, "a@b.com");
                assert_eq!(c.password, "pw123456");
            }
            other => panic!("expected login, got {other:?}"),
        }
    }

    #[test]
    fn register_builds_request_with_optionals() {
        let cli = Cli::try_parse_from([
            "studio",
            "register",
            "--email",
            "a@b.com",
            "--password",
            "pw123456",
            "--first-name",
            "Ana",
        ])
        .unwrap();
        let Command::Register(args) = cli.command else {
            panic!("expected register");
        };
        let req = args.into_request();
        assert_eq!(req.email, "a@b.com");
        assert_eq!(req.first_name.as_deref(), Some("Ana"));
        assert!(req.username.is_none());
    }

    #[test]
    fn explicit_session_file_wins() {
        let path = PathBuf::from("/var/lib/studio/session.json");
        assert_eq!(resolve_session_file(Some(path.clone())).unwrap(), path);
    }

    fn offline_cli(session_file: &std::path::Path, command: &str) -> Cli {
        Cli::try_parse_from([
            "studio",
            "--api-url",
            "http://127.0.0.1:1",
            "--session-file",
            session_file.to_str().unwrap(),
            command,
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn status_reports_stored_session_without_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("session.json");
        std::fs::write(&file, r#"{"access_token":"T1","refresh_token":"R1"}"#).unwrap();

        let output = run(offline_cli(&file, "status")).await.unwrap();

        assert_eq!(
            output,
            serde_json::json!({
                "status": "token_only",
                "has_access_token": true,
                "has_refresh_token": true,
                "user": null
            })
        );
        assert!(!output.to_string().contains("T1"));
    }

    #[tokio::test]
    async fn logout_clears_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("session.json");
        std::fs::write(&file, r#"{"access_token":"T1","refresh_token":"R1"}"#).unwrap();

        let output = run(offline_cli(&file, "logout")).await.unwrap();
        assert_eq!(output["status"], "unauthenticated");

        let remaining: Value = serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(remaining, serde_json::json!({}));
    }

    #[tokio::test]
    async fn refresh_without_tokens_reports_session_ended() {
        let dir = tempfile::tempdir().unwrap();
        let cli = offline_cli(&dir.path().join("session.json"), "refresh");
        assert!(matches!(run(cli).await, Err(CliError::SessionEnded)));
    }
}
