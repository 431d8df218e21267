use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use civicdesk_core::{
    Config, Credentials, RegistrationInfo, Role, Route, RouteHistory, SessionStore,
};

const ENV_EMAIL: &str = "CIVICDESK_EMAIL";
const ENV_PASSWORD: &str = "CIVICDESK_PASSWORD";

#[derive(Debug, Parser)]
#[command(name = "civicdesk", version, about = "Sign in to a civicdesk account")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session
    Login {
        /// Account email (defaults to the last one used)
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// `user` or `agency`
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in
    Status,
}

pub async fn run(command: Command, config: &Config) -> Result<()> {
    let routes = Arc::new(RouteHistory::new());
    let store = SessionStore::new(config.auth_service()?, config.storage()?, routes.clone());

    match command {
        Command::Login { email } => {
            let email = match email
                .or_else(|| std::env::var(ENV_EMAIL).ok())
                .or_else(|| config.last_email.clone())
            {
                Some(email) => email,
                None => prompt_line("Email: ")?,
            };
            let password = password_from_env_or_prompt()?;

            println!("Signing in...");
            let account = store.login(&Credentials::new(email.clone(), password)).await?;

            if let Err(e) = Config::remember_last_email(&email) {
                warn!(error = %e, "Failed to save config");
            }

            println!("Signed in as {} <{}> ({})", account.name, account.email, account.role);
            print_landing(&routes);
        }
        Command::Register { name, email, role } => {
            let password = password_from_env_or_prompt()?;
            let info = RegistrationInfo {
                name,
                email,
                password,
                role,
            };

            let message = store.register(&info).await?;
            println!("{}! Please log in.", message);
            print_landing(&routes);
        }
        Command::Logout => {
            store.logout();
            println!("Signed out");
            print_landing(&routes);
        }
        Command::Status => match store.account() {
            Some(account) => {
                println!("Signed in as {} <{}> ({})", account.name, account.email, account.role);
                println!("Dashboard: {}", Route::dashboard_for(account.role));
            }
            None => println!("Not signed in"),
        },
    }

    Ok(())
}

fn print_landing(routes: &RouteHistory) {
    if let Some(route) = routes.current() {
        println!("-> {}", route);
    }
}

fn password_from_env_or_prompt() -> Result<String> {
    match std::env::var(ENV_PASSWORD) {
        Ok(password) if !password.is_empty() => Ok(password),
        _ => rpassword::prompt_password("Password: ").context("Failed to read password"),
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    use std::io::Write;

    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_register() {
        let cli = Cli::try_parse_from([
            "civicdesk", "register", "--name", "City Works Dept", "--email", "works@city.gov",
            "--role", "agency",
        ])
        .unwrap();

        match cli.command {
            Command::Register { name, email, role } => {
                assert_eq!(name, "City Works Dept");
                assert_eq!(email, "works@city.gov");
                assert_eq!(role, Role::Agency);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_register_role_defaults_to_user() {
        let cli = Cli::try_parse_from(["civicdesk", "register", "--name", "A", "--email", "a@b.com"])
            .unwrap();
        assert!(matches!(cli.command, Command::Register { role: Role::User, .. }));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = Cli::try_parse_from([
            "civicdesk", "register", "--name", "A", "--email", "a@b.com", "--role", "admin",
        ]);
        assert!(result.is_err());
    }
}
