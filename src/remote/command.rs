//! Typed remote command construction.
//!
//! Commands are assembled from argv pieces and every piece is shell-quoted
//! when rendered, so values from config or the release API never reach the
//! remote shell unescaped.

use std::fmt;

/// A single program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    program: String,
    args: Vec<String>,
    secrets: Vec<usize>,
}

impl RemoteCommand {
    /// Start a command for `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secrets: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append an argument that is masked in logs and error messages
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secrets.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    /// Program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Shell-safe rendering
    pub fn render(&self) -> String {
        self.render_with(false)
    }

    /// Rendering with secret arguments replaced by `***`
    pub fn render_redacted(&self) -> String {
        self.render_with(true)
    }

    fn render_with(&self, redact: bool) -> String {
        let args = self.args.iter().enumerate().map(|(i, arg)| {
            if redact && self.secrets.contains(&i) {
                "***".to_string()
            } else {
                quote(arg)
            }
        });
        std::iter::once(quote(&self.program))
            .chain(args)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_redacted())
    }
}

/// Identity a command runs under on the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Privilege {
    /// The SSH login account, no sudo
    Login,
    /// root via sudo
    Root,
    /// A named account via `sudo -u`
    User(String),
}

/// A command plus the environment it runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    privilege: Privilege,
    prelude: Vec<RemoteCommand>,
    command: RemoteCommand,
    warn_only: bool,
}

impl Invocation {
    /// Run as the login account
    pub fn login(command: RemoteCommand) -> Self {
        Self::with_privilege(Privilege::Login, command)
    }

    /// Run as root
    pub fn root(command: RemoteCommand) -> Self {
        Self::with_privilege(Privilege::Root, command)
    }

    /// Run as `user`
    pub fn user(user: impl Into<String>, command: RemoteCommand) -> Self {
        Self::with_privilege(Privilege::User(user.into()), command)
    }

    fn with_privilege(privilege: Privilege, command: RemoteCommand) -> Self {
        Self {
            privilege,
            prelude: Vec::new(),
            command,
            warn_only: false,
        }
    }

    /// Source a shell file before the command
    pub fn source(mut self, file: impl Into<String>) -> Self {
        self.prelude.push(RemoteCommand::new("source").arg(file));
        self
    }

    /// Change into `dir` before the command
    pub fn in_dir(mut self, dir: impl Into<String>) -> Self {
        self.prelude.push(RemoteCommand::new("cd").arg(dir));
        self
    }

    /// A non-zero exit is reported as a warning instead of an error
    pub fn warn_only(mut self) -> Self {
        self.warn_only = true;
        self
    }

    /// Whether failures are tolerated
    pub fn is_warn_only(&self) -> bool {
        self.warn_only
    }

    /// Identity the command runs under
    pub fn privilege(&self) -> &Privilege {
        &self.privilege
    }

    /// The wrapped command
    pub fn command(&self) -> &RemoteCommand {
        &self.command
    }

    /// The script run by the target shell, before privilege wrapping
    pub fn script(&self) -> String {
        self.script_with(RemoteCommand::render)
    }

    fn script_with(&self, render: fn(&RemoteCommand) -> String) -> String {
        self.prelude
            .iter()
            .chain(std::iter::once(&self.command))
            .map(render)
            .collect::<Vec<_>>()
            .join(" && ")
    }

    /// Full command line handed to ssh
    pub fn render(&self) -> String {
        self.wrap(self.script())
    }

    /// Command line safe to log
    pub fn render_redacted(&self) -> String {
        self.wrap(self.script_with(RemoteCommand::render_redacted))
    }

    fn wrap(&self, script: String) -> String {
        match &self.privilege {
            Privilege::Login => script,
            Privilege::Root => format!("sudo -n -H bash -c {}", quote(&script)),
            Privilege::User(user) => {
                format!("sudo -n -H -u {} bash -c {}", quote(user), quote(&script))
            }
        }
    }
}

/// Quote `word` for a POSIX shell; words made only of safe characters are
/// left untouched.
pub fn quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '@' | '=' | ',' | '+')
        });
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_safe_words() {
        assert_eq!(quote("supervisorctl"), "supervisorctl");
        assert_eq!(quote("/home/textit/releases/v1.2.0"), "/home/textit/releases/v1.2.0");
        assert_eq!(quote("textit:textit"), "textit:textit");
    }

    #[test]
    fn test_quote_unsafe_words() {
        assert_eq!(quote(""), "''");
        assert_eq!(quote("a b"), "'a b'");
        assert_eq!(quote("$(reboot)"), "'$(reboot)'");
        assert_eq!(quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_render_command() {
        let cmd = RemoteCommand::new("curl")
            .arg("-H")
            .arg("Accept: application/octet-stream");
        assert_eq!(cmd.render(), "curl -H 'Accept: application/octet-stream'");
    }

    #[test]
    fn test_secret_args_are_redacted() {
        let cmd = RemoteCommand::new("curl")
            .arg("-H")
            .secret_arg("Authorization: token abc123")
            .arg("-o")
            .arg("release.tar.gz");
        assert_eq!(
            cmd.render(),
            "curl -H 'Authorization: token abc123' -o release.tar.gz"
        );
        assert_eq!(cmd.render_redacted(), "curl -H *** -o release.tar.gz");
        assert_eq!(cmd.to_string(), cmd.render_redacted());

        let inv = Invocation::user("textit", cmd);
        assert!(inv.render().contains("abc123"));
        assert!(!inv.render_redacted().contains("abc123"));
    }

    #[test]
    fn test_login_invocation_is_bare() {
        let inv = Invocation::login(RemoteCommand::new("printenv").arg("SSH_AUTH_SOCK"));
        assert_eq!(inv.render(), "printenv SSH_AUTH_SOCK");
    }

    #[test]
    fn test_root_invocation() {
        let inv = Invocation::root(RemoteCommand::new("supervisorctl").args(["stop", "textit"]));
        assert_eq!(inv.render(), "sudo -n -H bash -c 'supervisorctl stop textit'");
    }

    #[test]
    fn test_user_invocation_sources_env_and_changes_dir() {
        let inv = Invocation::user("textit", RemoteCommand::new("tar").args(["zxpf", "release.tar.gz"]))
            .source("/home/textit/env.sh")
            .in_dir("/home/textit/releases/v1.2.0");
        assert_eq!(
            inv.script(),
            "source /home/textit/env.sh && cd /home/textit/releases/v1.2.0 && tar zxpf release.tar.gz"
        );
        assert_eq!(
            inv.render(),
            "sudo -n -H -u textit bash -c 'source /home/textit/env.sh && cd /home/textit/releases/v1.2.0 && tar zxpf release.tar.gz'"
        );
    }

    #[test]
    fn test_nested_quotes_survive_wrapping() {
        let inv = Invocation::user("textit", RemoteCommand::new("echo").arg("it's live"));
        assert_eq!(
            inv.render(),
            r"sudo -n -H -u textit bash -c 'echo '\''it'\''\'\'''\''s live'\'''"
        );
    }
}
