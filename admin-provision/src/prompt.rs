// Reading the password from the terminal without echoing it.

use std::io;

pub const PASSWORD_PROMPT: &str = "Digite a senha: ";

/// Source of a password when none was given on the command line
pub trait PasswordPrompt {
    fn read_password(&self, prompt: &str) -> io::Result<String>;
}

/// Masked prompt on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}
