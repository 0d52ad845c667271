use std::env;

use clap::{Parser, Subcommand};
use colored::Colorize;
use levelfolio_lib::{
    Backend, Error, LoadError, Table, config::CoreConfig, editor, repository::store,
    session::SessionState,
};
use sysexits::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod show;
mod table;

/// Environment variable holding the admin password
const PASSWORD_VAR: &str = "LEVELFOLIO_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "levelfolio")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Admin account for commands that modify content
    #[arg(short, long, global = true)]
    email: Option<String>,

    /// Ignore the configured backend and work on the built-in sample data
    #[arg(long, global = true)]
    demo: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Print the portfolio as visitors see it
    Show {
        /// Print the content as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the rows of a table
    List { table: Table },
    /// Change one field of a row
    Set {
        table: Table,
        id: Uuid,
        field: String,
        value: String,
    },
    /// Append a blank row to a table
    Add { table: Table },
    /// Delete a row
    Delete { table: Table, id: Uuid },
}

impl Command {
    fn modifies_content(&self) -> bool {
        matches!(
            self,
            Command::Set { .. } | Command::Add { .. } | Command::Delete { .. }
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let backend = match connect(cli.demo) {
        Ok(backend) => backend,
        Err(err) => return fail(&err),
    };

    if cli.command.modifies_content()
        && let Err(code) = sign_in(&backend, cli.email.as_deref()).await
    {
        return code;
    }

    let repo = &backend.repo;
    let result = match cli.command {
        Command::Show { json } => show::handle(repo, json).await,
        Command::List { table } => table::list(repo, table).await,
        Command::Set {
            table,
            id,
            field,
            value,
        } => table::set(repo, table, id, &field, &value).await,
        Command::Add { table } => table::add(repo, table).await,
        Command::Delete { table, id } => table::delete(repo, table, id).await,
    };

    match result {
        Ok(()) => ExitCode::Ok,
        Err(err) => fail(&err),
    }
}

fn connect(demo: bool) -> levelfolio_lib::Result<Backend> {
    let cfg = CoreConfig::load()?;
    if demo {
        return Ok(Backend::demo(&cfg));
    }
    Backend::from_config(&cfg)
}

/// Reuse a persisted session, or sign in with `--email` and the password from the environment.
async fn sign_in(backend: &Backend, email: Option<&str>) -> Result<(), ExitCode> {
    if let SessionState::Authenticated(session) = backend.session.init().await {
        debug!("Reusing session of {}", session.user.email);
        return Ok(());
    }

    let Some(email) = email else {
        eprintln!("{} this command requires --email", "error:".red().bold());
        return Err(ExitCode::Usage);
    };
    let Ok(password) = env::var(PASSWORD_VAR) else {
        eprintln!("{} {PASSWORD_VAR} is not set", "error:".red().bold());
        return Err(ExitCode::Usage);
    };

    match backend.session.sign_in(email, &password).await {
        Ok(user) => {
            info!("Signed in as {}", user.email);
            Ok(())
        }
        Err(err) => Err(fail(&err.into())),
    }
}

fn fail(err: &Error) -> ExitCode {
    eprintln!("{} {err}", "error:".red().bold());
    exit_code(err)
}

fn exit_code(err: &Error) -> ExitCode {
    match err {
        Error::Config(_) => ExitCode::Config,
        Error::Store(err)
        | Error::Load(LoadError::Read(err))
        | Error::Editor(editor::Error::Store(err)) => store_exit_code(err),
        Error::Load(LoadError::Missing(_)) => ExitCode::DataErr,
        Error::Editor(editor::Error::RowNotFound(_)) => ExitCode::NoInput,
        Error::Editor(editor::Error::Singleton(_)) => ExitCode::Usage,
        Error::Editor(editor::Error::Busy) => ExitCode::TempFail,
        Error::Editor(editor::Error::Patch(_)) | Error::Patch(_) => ExitCode::DataErr,
        Error::Auth(_) => ExitCode::NoPerm,
        Error::Relay(_) => ExitCode::Unavailable,
        Error::Io(_) => ExitCode::IoErr,
    }
}

fn store_exit_code(err: &store::Error) -> ExitCode {
    match err {
        store::Error::Http { .. } | store::Error::Unavailable(_) => ExitCode::Unavailable,
        store::Error::Status { .. } => ExitCode::Protocol,
        store::Error::Encode { .. }
        | store::Error::Decode { .. }
        | store::Error::MultipleRows { .. } => ExitCode::DataErr,
    }
}

#[cfg(test)]
mod test {
    use levelfolio_lib::repository::entities::PatchError;

    use super::*;

    #[test]
    fn test_cli_parses_tables() {
        let cli = Cli::parse_from(["levelfolio", "list", "social_links"]);

        assert!(matches!(
            cli.command,
            Command::List {
                table: Table::SocialLinks
            }
        ));
        assert!(!cli.command.modifies_content());
    }

    #[test]
    fn test_unknown_table_rejected() {
        assert!(Cli::try_parse_from(["levelfolio", "list", "guilds"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code(&Error::Store(store::Error::Unavailable(Table::Skills))),
            ExitCode::Unavailable
        );
        assert_eq!(
            exit_code(&Error::Patch(PatchError::UnknownField("colour".into()))),
            ExitCode::DataErr
        );
        assert_eq!(
            exit_code(&Error::Editor(editor::Error::Singleton("profile"))),
            ExitCode::Usage
        );
    }
}
