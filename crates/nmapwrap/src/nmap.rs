//! Running the `nmap` binary
//!
//! Locates the executable, builds its command line and captures the XML it
//! writes to stdout. Everything here is synchronous.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, instrument, warn};

use crate::error::{Error, ErrorKind, Result};

/// Environment variable that may point at the nmap binary
pub const NMAP_ENV: &str = "NMAP";

const NMAP: &str = "nmap";

/// Find the nmap binary.
///
/// Searches in this order:
/// 1. the `NMAP` environment variable, if it names an existing file
/// 2. the system `PATH` via `which`
pub fn find_nmap() -> Result<PathBuf> {
    if let Some(path) = env::var_os(NMAP_ENV).map(PathBuf::from) {
        if path.is_file() {
            return Ok(path);
        }
        warn!(path = %path.display(), "NMAP does not name a file, searching PATH");
    }

    which::which(NMAP).map_err(|_| {
        Error::from_kind(ErrorKind::ToolNotFound {
            tool: NMAP.to_string(),
        })
    })
}

/// Build the nmap command line. With `xml`, nmap is asked to write XML to
/// stdout (`-oX -`).
pub fn nmap_command<I, S>(nmap: &Path, args: I, xml: bool) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = vec![nmap.as_os_str().to_os_string()];
    if xml {
        command.push("-oX".into());
        command.push("-".into());
    }
    command.extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
    command
}

/// Run `command` to completion and return its stdout.
///
/// A non-zero exit status is an error carrying the captured stderr.
#[instrument(skip_all, fields(program = ?command.first()))]
pub fn run_command_sync(command: &[OsString]) -> Result<String> {
    let Some((program, args)) = command.split_first() else {
        return Err(command_error("empty command line"));
    };

    debug!(?args, "spawning");
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|err| {
            command_error(format!("failed to run {}: {err}", program.to_string_lossy()))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(command_error(format!(
            "{} exited with {}: {}",
            program.to_string_lossy(),
            output.status,
            stderr.trim()
        )));
    }

    debug!(bytes = output.stdout.len(), "command finished");
    String::from_utf8(output.stdout).map_err(|_| command_error("stdout is not valid utf-8"))
}

/// Locate nmap, run it with `args` and return its XML report
pub fn scan<I, S>(args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let nmap = find_nmap()?;
    run_command_sync(&nmap_command(&nmap, args, true))
}

fn command_error(message: impl Into<String>) -> Error {
    Error::from_kind(ErrorKind::Command {
        message: message.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nmap_command_xml() {
        let command = nmap_command(Path::new("/usr/bin/nmap"), ["-p20-22", "127.0.0.1"], true);
        assert_eq!(
            command,
            vec!["/usr/bin/nmap", "-oX", "-", "-p20-22", "127.0.0.1"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_nmap_command_plain() {
        let command = nmap_command(Path::new("nmap"), ["-sn", "10.0.0.0/24"], false);
        assert_eq!(command.len(), 3);
        assert_eq!(command.get(1).map(OsString::as_os_str), Some(OsStr::new("-sn")));
    }

    #[test]
    fn test_run_empty_command() {
        let err = run_command_sync(&[]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Command { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_captures_stdout() -> Result<()> {
        let command: Vec<OsString> = ["sh", "-c", "printf '<nmaprun/>'"]
            .into_iter()
            .map(OsString::from)
            .collect();
        assert_eq!(run_command_sync(&command)?, "<nmaprun/>");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_failure_keeps_stderr() {
        let command: Vec<OsString> = ["sh", "-c", "echo 'no targets' >&2; exit 2"]
            .into_iter()
            .map(OsString::from)
            .collect();
        let err = run_command_sync(&command).unwrap_err();
        assert!(err.message().contains("no targets"));
    }

    #[test]
    fn test_missing_program() {
        let command = vec![OsString::from("definitely-not-a-real-binary-4d2f")];
        let err = run_command_sync(&command).unwrap_err();
        assert!(err.message().contains("failed to run"));
    }
}
