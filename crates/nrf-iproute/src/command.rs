use nrf_core::NetError;
use tokio::process::Command;
use tracing::trace;

const IP: &str = "ip";

/// stderr fragments from `ip` or `sudo` that mean the caller lacks privilege.
const PERMISSION_MARKERS: &[&str] = &[
    "operation not permitted",
    "permission denied",
    "a password is required",
    "not in the sudoers",
];

/// stderr fragments from `ip` that name a missing device or route.
const NOT_FOUND_MARKERS: &[&str] = &["cannot find device", "does not exist", "no such device"];

/// Error from a failed command.
#[derive(Debug, thiserror::Error)]
#[error("command failed: {command}\n{detail}")]
pub struct CommandError {
    pub command: String,
    pub detail: String,
}

impl CommandError {
    fn mentions(&self, markers: &[&str]) -> bool {
        let detail = self.detail.to_ascii_lowercase();
        markers.iter().any(|m| detail.contains(m))
    }
}

impl From<CommandError> for NetError {
    fn from(err: CommandError) -> Self {
        if err.mentions(PERMISSION_MARKERS) {
            NetError::PermissionDenied(err.to_string())
        } else if err.mentions(NOT_FOUND_MARKERS) {
            NetError::NotFound(err.to_string())
        } else {
            NetError::Failed(err.to_string())
        }
    }
}

/// How a command should be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Prefix with `sudo -n`, so a missing credential fails instead of prompting.
    Sudo,
    /// Run as the current user.
    User,
}

impl Privilege {
    fn command(self, program: &str, args: &[&str]) -> Command {
        match self {
            Privilege::Sudo => {
                let mut cmd = Command::new("sudo");
                cmd.arg("-n").arg(program).args(args);
                cmd
            }
            Privilege::User => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
        }
    }
}

fn format_command_display(program: &str, args: &[&str], privilege: Privilege) -> String {
    let prefix = match privilege {
        Privilege::Sudo => "sudo -n ",
        Privilege::User => "",
    };
    format!("{prefix}{program} {}", args.join(" "))
        .trim_end()
        .to_string()
}

/// Execute a command.
///
/// Returns trimmed stdout on success and trimmed stderr as the error detail.
pub async fn exec(
    program: &str,
    args: &[&str],
    privilege: Privilege,
) -> Result<String, CommandError> {
    let command = format_command_display(program, args, privilege);
    trace!(command = %command, "exec");

    let output = privilege
        .command(program, args)
        .output()
        .await
        .map_err(|e| CommandError {
            command: command.clone(),
            detail: e.to_string(),
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(CommandError {
            command,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Run `ip` with `args`, classifying a failure by its stderr.
pub async fn ip(args: &[&str], privilege: Privilege) -> Result<String, NetError> {
    Ok(exec(IP, args, privilege).await?)
}
