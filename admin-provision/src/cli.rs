use clap::Parser;
use tracing::debug;

use crate::config::Config;
use crate::error::{ProvisionError, Result};
use crate::prompt::{PasswordPrompt, PASSWORD_PROMPT};
use crate::validation::{validate_email, validate_password};

pub const USAGE: &str = "Uso: create-admin-user <email> [senha]";

/// Create or update the CRM administrator account
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "create-admin-user")]
#[command(about = "Create or update the CRM administrator account", long_about = None)]
pub struct Args {
    /// Admin email address (defaults to ADMIN_DEFAULT_EMAIL)
    pub email: Option<String>,

    /// Admin password; prompted for without echo when omitted
    #[arg(allow_hyphen_values = true)]
    pub password: Option<String>,

    /// Print the SQL statement instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Email and password the run will provision
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Fill in the email default, prompt for a missing password, then validate both
pub fn resolve_credentials(
    args: &Args,
    config: &Config,
    prompt: &dyn PasswordPrompt,
) -> Result<Credentials> {
    let email = args
        .email
        .clone()
        .unwrap_or_else(|| config.default_email.clone());

    let password = match &args.password {
        Some(password) => password.clone(),
        None => {
            debug!("No password argument, prompting");
            prompt
                .read_password(PASSWORD_PROMPT)
                .map_err(ProvisionError::Prompt)?
        }
    };

    let email = email.trim().to_string();
    if email.is_empty() {
        return Err(ProvisionError::MissingArgument("email"));
    }
    if password.is_empty() {
        return Err(ProvisionError::MissingArgument("password"));
    }

    validate_email(&email)?;
    validate_password(&password)?;

    Ok(Credentials { email, password })
}
