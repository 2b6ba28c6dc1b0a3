// Running SQL through a database client inside the CRM container.
//
// The statement is passed as a single argv entry to `psql -c`; no shell is
// involved. Arguments are never logged verbatim because the statement
// carries the password hash.

use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ProvisionError, Result};

/// What the client process reported back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOutput {
    /// Whether the command exited with status 0
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ClientOutput {
    fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Executes one SQL statement against the target database
#[async_trait::async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Run the statement and capture the client's output.
    ///
    /// A client that ran but failed is `Ok` with `success == false`; `Err` is
    /// reserved for not being able to run the client at all.
    async fn execute(&self, sql: &str) -> Result<ClientOutput>;

    /// Human-readable target, for log lines
    fn describe(&self) -> String;
}

/// `<runtime> exec -i <container> psql -U <user> -d <db> -c <sql>`
#[derive(Debug, Clone)]
pub struct DockerPsqlClient {
    runtime: String,
    container: String,
    user: String,
    database: String,
    timeout: Duration,
}

impl DockerPsqlClient {
    pub fn new(runtime: &str, container: &str, user: &str, database: &str) -> Self {
        Self {
            runtime: runtime.to_string(),
            container: container.to_string(),
            user: user.to_string(),
            database: database.to_string(),
            timeout: Config::default().client_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.container_runtime,
            &config.db_container,
            &config.db_user,
            &config.db_name,
        )
        .timeout(config.client_timeout)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full argument vector passed to the runtime
    pub fn args(&self, sql: &str) -> Vec<String> {
        vec![
            "exec".to_string(),
            "-i".to_string(),
            self.container.clone(),
            "psql".to_string(),
            "-U".to_string(),
            self.user.clone(),
            "-d".to_string(),
            self.database.clone(),
            "-c".to_string(),
            sql.to_string(),
        ]
    }

    fn redacted_args(&self) -> Vec<String> {
        let mut args = self.args("");
        if let Some(last) = args.last_mut() {
            *last = "[REDACTED]".to_string();
        }
        args
    }
}

#[async_trait::async_trait]
impl DatabaseClient for DockerPsqlClient {
    async fn execute(&self, sql: &str) -> Result<ClientOutput> {
        debug!(
            program = %self.runtime,
            args = ?self.redacted_args(),
            timeout_secs = self.timeout.as_secs(),
            "Executing database client"
        );

        let mut cmd = Command::new(&self.runtime);
        cmd.args(self.args(sql))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| ProvisionError::Spawn {
            program: self.runtime.clone(),
            source: e,
        })?;

        // Dropping the wait future on timeout kills the child
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    program = %self.runtime,
                    timeout_secs = self.timeout.as_secs(),
                    "Database client timed out, killed"
                );
                return Err(ProvisionError::Timeout {
                    program: self.runtime.clone(),
                    timeout: self.timeout,
                });
            }
        };

        let output = ClientOutput::from_output(output);
        debug!(
            exit_code = ?output.exit_code,
            success = output.success,
            "Database client finished"
        );

        Ok(output)
    }

    fn describe(&self) -> String {
        format!(
            "{}@{} in container {}",
            self.user, self.database, self.container
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_match_container_invocation() {
        let client = DockerPsqlClient::new("docker", "phd-crm-db", "phd_crm_user", "phd_crm");
        let args = client.args("SELECT 1;");

        assert_eq!(
            args,
            vec![
                "exec", "-i", "phd-crm-db", "psql", "-U", "phd_crm_user", "-d", "phd_crm", "-c",
                "SELECT 1;"
            ]
        );
    }

    #[test]
    fn test_sql_is_a_single_argument() {
        let client = DockerPsqlClient::new("docker", "db", "u", "d");
        let sql = "INSERT INTO users VALUES ('a b', 'c; d');";
        let args = client.args(sql);

        assert_eq!(args.last().map(String::as_str), Some(sql));
        assert_eq!(args.len(), 10);
    }

    #[test]
    fn test_redacted_args_hide_statement() {
        let client = DockerPsqlClient::new("docker", "db", "u", "d");
        let redacted = client.redacted_args();

        assert_eq!(redacted.last().map(String::as_str), Some("[REDACTED]"));
    }

    #[test]
    fn test_from_config_uses_configured_target() {
        let config = Config {
            container_runtime: "podman".to_string(),
            db_container: "staging-db".to_string(),
            client_timeout: Duration::from_secs(7),
            ..Config::default()
        };
        let client = DockerPsqlClient::from_config(&config);

        assert_eq!(client.runtime, "podman");
        assert_eq!(client.container, "staging-db");
        assert_eq!(client.timeout, Duration::from_secs(7));
        assert_eq!(client.describe(), "phd_crm_user@phd_crm in container staging-db");
    }

    #[tokio::test]
    async fn test_missing_runtime_is_spawn_error() {
        let client = DockerPsqlClient::new(
            "definitely-not-a-container-runtime",
            "db",
            "u",
            "d",
        );

        let err = client.execute("SELECT 1;").await.unwrap_err();
        assert!(matches!(err, ProvisionError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_captured_not_error() {
        // `false` ignores its arguments and exits 1
        let client = DockerPsqlClient::new("false", "db", "u", "d");

        let output = client.execute("SELECT 1;").await.unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(1));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_exit_captures_stdout() {
        // `echo` prints its arguments and exits 0
        let client = DockerPsqlClient::new("echo", "db", "u", "d");

        let output = client.execute("SELECT 1;").await.unwrap();
        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert!(output.stdout.contains("exec -i db psql -U u -d d -c SELECT 1;"));
    }

    #[cfg(unix)]
    fn slow_runtime(dir: &std::path::Path) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("slow-runtime.sh");
        std::fs::write(&path, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_client_is_killed_on_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = slow_runtime(dir.path());
        let client =
            DockerPsqlClient::new(&runtime, "db", "u", "d").timeout(Duration::from_secs(1));

        let started = std::time::Instant::now();
        let err = client.execute("SELECT 1;").await.unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(matches!(
            err,
            ProvisionError::Timeout { ref timeout, .. } if *timeout == Duration::from_secs(1)
        ));
        assert!(err.to_string().contains("did not finish within 1s"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_fails_the_whole_run() {
        use crate::cli::Args;
        use crate::prompt::TerminalPrompt;
        use crate::provision::run;

        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            container_runtime: slow_runtime(dir.path()),
            client_timeout: Duration::from_secs(1),
            bcrypt_cost: 4,
            ..Config::default()
        };
        let client = DockerPsqlClient::from_config(&config);
        let args = Args {
            email: Some("ops@phdstudio.com.br".to_string()),
            password: Some("secret123".to_string()),
            dry_run: false,
        };
        let mut out = Vec::new();

        // An Err from run is what makes main exit 1
        let err = run(&args, &config, &TerminalPrompt, &client, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::Timeout { .. }));
        assert!(!String::from_utf8(out).unwrap().contains("sucesso"));
    }
}
