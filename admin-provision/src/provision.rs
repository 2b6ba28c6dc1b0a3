// The provisioning procedure: hash, build the upsert, run it, report.

use std::io::Write;
use std::process::ExitCode;

use tracing::{error, info};

use crate::cli::{resolve_credentials, Args, USAGE};
use crate::client::DatabaseClient;
use crate::config::Config;
use crate::error::Result;
use crate::password::{hash_password, hash_preview};
use crate::prompt::PasswordPrompt;
use crate::record::AdminRecord;

/// How a run ended, mapped onto the process exit status by [`Outcome::exit_code`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Provisioned,
    /// SQL printed instead of executed
    DryRun,
    /// Email or password missing or invalid; usage was printed
    Usage,
    /// The database client ran and reported failure
    ClientFailed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Provisioned | Outcome::DryRun)
    }

    pub fn exit_code(self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        }
    }
}

/// Hash the password and build the row to upsert
pub fn prepare_record(email: &str, password: &str, config: &Config) -> Result<AdminRecord> {
    let password_hash = hash_password(password, config.bcrypt_cost)?;
    Ok(AdminRecord::with_names(
        email,
        &password_hash,
        &config.first_name,
        &config.last_name,
    ))
}

/// Create the admin user, or update the existing row's hash and role.
///
/// Progress and the final report go to `out`. Returns `Ok(false)` when the
/// database client exits non-zero; its stderr has been written to `out` by
/// then. Nothing is retried.
pub async fn create_admin_user<C, W>(
    email: &str,
    password: &str,
    config: &Config,
    client: &C,
    out: &mut W,
) -> Result<bool>
where
    C: DatabaseClient + ?Sized,
    W: Write,
{
    writeln!(out, "Gerando hash da senha...")?;
    let record = prepare_record(email, password, config)?;
    writeln!(out, "✅ Hash gerado: {}", hash_preview(&record.password_hash))?;
    writeln!(out)?;

    writeln!(out, "Inserindo usuário no banco de dados...")?;
    info!(email = %email, db = %client.describe(), "Upserting admin user");
    let output = client.execute(&record.upsert_statement()).await?;

    if output.success {
        info!(email = %email, "Admin user created or updated");
        writeln!(out, "✅ Usuário criado/atualizado com sucesso!")?;
        writeln!(out)?;
        writeln!(out, "Email: {}", email)?;
        writeln!(out, "Senha: {}", password)?;
        writeln!(out)?;
        writeln!(out, "Você pode fazer login em: {}", config.login_url)?;
        Ok(true)
    } else {
        error!(
            email = %email,
            exit_code = ?output.exit_code,
            "Database client failed"
        );
        writeln!(out, "❌ Erro ao criar usuário:")?;
        writeln!(out, "{}", output.stderr.trim_end())?;
        Ok(false)
    }
}

/// One full invocation: resolve credentials, then provision or print the SQL
pub async fn run<C, W>(
    args: &Args,
    config: &Config,
    prompt: &dyn PasswordPrompt,
    client: &C,
    out: &mut W,
) -> Result<Outcome>
where
    C: DatabaseClient + ?Sized,
    W: Write,
{
    let credentials = match resolve_credentials(args, config, prompt) {
        Ok(credentials) => credentials,
        Err(e) if e.is_usage() => {
            error!(error = %e, "Rejected arguments");
            writeln!(out, "{}", e)?;
            writeln!(out, "{}", USAGE)?;
            return Ok(Outcome::Usage);
        }
        Err(e) => return Err(e),
    };

    if args.dry_run {
        let record = prepare_record(&credentials.email, &credentials.password, config)?;
        writeln!(out, "{}", record.upsert_statement())?;
        return Ok(Outcome::DryRun);
    }

    let created = create_admin_user(
        &credentials.email,
        &credentials.password,
        config,
        client,
        out,
    )
    .await?;

    Ok(if created {
        Outcome::Provisioned
    } else {
        Outcome::ClientFailed
    })
}
