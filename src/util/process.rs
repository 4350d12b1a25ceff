//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{bail, Context, Result};

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Execute with captured output and wait for completion.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd.output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))
    }

    /// Execute and require success.
    ///
    /// With `stream` set, the child inherits stdout/stderr so the user sees
    /// the tool's own progress; otherwise output is captured and stderr is
    /// included in the error.
    pub fn run(&self, stream: bool) -> Result<()> {
        tracing::debug!("running `{}`", self.display_command());

        if stream {
            let status = self
                .build_command()
                .status()
                .with_context(|| format!("failed to execute `{}`", self.program.display()))?;
            if !status.success() {
                bail!(
                    "`{}` failed with exit code {:?}",
                    self.display_command(),
                    status.code()
                );
            }
            return Ok(());
        }

        let output = self.exec()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            bail!(
                "`{}` failed with exit code {:?}\n{}",
                self.display_command(),
                output.status.code(),
                detail
            );
        }
        Ok(())
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|a| {
            if a.contains(' ') {
                format!("\"{}\"", a)
            } else {
                a.clone()
            }
        }));
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find CMake, honoring the `CMAKE` environment variable.
pub fn find_cmake() -> Option<PathBuf> {
    if let Ok(cmake) = std::env::var("CMAKE") {
        if let Some(path) = find_executable(&cmake) {
            return Some(path);
        }
    }
    find_executable("cmake")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command_quotes_spaces() {
        let pb = ProcessBuilder::new("cmake").args(["-S", "SDK CD Image", "-B", "build"]);
        assert_eq!(pb.display_command(), "cmake -S \"SDK CD Image\" -B build");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_failure() {
        let err = ProcessBuilder::new("sh")
            .args(["-c", "echo boom >&2; exit 3"])
            .run(false)
            .unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("exit code Some(3)"));
        assert!(msg.contains("boom"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_success() {
        ProcessBuilder::new("true").run(false).unwrap();
    }
}
