//! A tool for executing commands.

use crate::command::ProcessInvocation;
use crate::error::{Error, Result};
use std::io::{BufRead, BufReader, PipeReader};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

/// Represents a command executor.
///
/// Standard output and standard error share a single pipe, read while the
/// process runs so that a chatty process never blocks on a full pipe.
///
/// # Example
///
/// ```rust,no_run
/// # use ytved_core::executor::Executor;
/// # use std::path::PathBuf;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = Executor {
///     executable_path: PathBuf::from("yt-dlp"),
///     args: vec!["--version".to_string()],
///     working_directory: None,
///     timeout: None,
/// };
///
/// let outcome = executor.execute().await?;
/// println!("Version: {}", outcome.lines.join("\n"));
///
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Executor {
    /// The path to the command executable.
    pub executable_path: PathBuf,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The directory to run the command in.
    pub working_directory: Option<PathBuf>,
    /// The deadline for the process, `None` to wait indefinitely.
    pub timeout: Option<Duration>,
}

/// Represents the output of a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// The merged stdout and stderr lines, in the order they were written.
    pub lines: Vec<String>,
    /// The exit code of the process.
    pub code: i32,
}

impl Executor {
    /// Creates an executor for a built invocation.
    pub fn from_invocation(invocation: &ProcessInvocation, timeout: Option<Duration>) -> Self {
        Self {
            executable_path: PathBuf::from(invocation.program()),
            args: invocation.args().to_vec(),
            working_directory: invocation.working_directory.clone(),
            timeout,
        }
    }

    /// Executes the command and returns its output once it has exited.
    ///
    /// # Errors
    ///
    /// This function will return [`Error::Launch`] if the executable could not be started,
    /// [`Error::Execution`] with the full transcript if it exited with a non-zero status,
    /// and [`Error::Timeout`] if the configured deadline elapsed.
    pub async fn execute(&self) -> Result<ProcessOutcome> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Running: {} {}",
            self.executable_path.display(),
            self.args.join(" ")
        );

        // One pipe behind both descriptors keeps stdout and stderr in emission order
        let (reader, writer) = std::io::pipe()?;

        let mut command = tokio::process::Command::new(&self.executable_path);
        command.args(&self.args);
        command.stdin(Stdio::null());
        command.stdout(Stdio::from(writer.try_clone()?));
        command.stderr(Stdio::from(writer));
        if let Some(directory) = &self.working_directory {
            command.current_dir(directory);
        }

        #[cfg(target_os = "windows")]
        {
            command.creation_flags(0x08000000);
        }

        let spawned = command.spawn();
        // The command holds the write ends, the reader only sees EOF once they are closed
        drop(command);
        let mut child = spawned.map_err(|source| Error::Launch {
            program: self.executable_path.clone(),
            source,
        })?;

        let reader_task = tokio::task::spawn_blocking(move || read_lines(reader));

        let run = async {
            let lines = reader_task.await??;
            let status = child.wait().await?;
            Ok::<_, Error>((lines, status))
        };

        let (lines, status) = match self.timeout {
            None => run.await?,
            Some(timeout) => match tokio::time::timeout(timeout, run).await {
                Ok(result) => result?,
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Process timed out after {:?}, killing it", timeout);

                    if let Err(_e) = child.kill().await {
                        #[cfg(feature = "tracing")]
                        tracing::error!("Failed to kill process after timeout: {}", _e);
                    }

                    return Err(Error::Timeout(timeout));
                }
            },
        };

        let code = status.code().unwrap_or(-1);
        if status.success() {
            return Ok(ProcessOutcome { lines, code });
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(
            "{} exited with code {}",
            self.executable_path.display(),
            code
        );

        Err(Error::Execution { code, lines })
    }
}

/// Reads the pipe until every writer has closed it.
///
/// Lines end with `\n`, `\r\n` or a lone `\r`, the latter being how progress
/// bars redraw themselves. Invalid UTF-8 is replaced rather than rejected.
fn read_lines(pipe: PipeReader) -> std::io::Result<Vec<String>> {
    let mut reader = BufReader::new(pipe);
    let mut buffer = Vec::new();
    let mut lines = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }

        for line in split_lines(&buffer) {
            #[cfg(feature = "tracing")]
            tracing::debug!("[yt-dlp] {}", line);

            lines.push(line);
        }
    }

    Ok(lines)
}

fn split_lines(chunk: &[u8]) -> Vec<String> {
    let chunk = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let chunk = chunk.strip_suffix(b"\r").unwrap_or(chunk);

    // A blank line is a field of its own, empty segments between redraws are not
    if chunk.is_empty() {
        return vec![String::new()];
    }

    chunk
        .split(|byte| *byte == b'\r')
        .filter(|segment| !segment.is_empty())
        .map(|segment| String::from_utf8_lossy(segment).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_carriage_returns() {
        assert_eq!(split_lines(b"plain\n"), vec!["plain"]);
        assert_eq!(split_lines(b"windows\r\n"), vec!["windows"]);
        assert_eq!(split_lines(b"10%\r20%\r30%\n"), vec!["10%", "20%", "30%"]);
        assert_eq!(split_lines(b"\n"), vec![""]);
        assert_eq!(split_lines(b"\r\n"), vec![""]);
        assert_eq!(
            split_lines(b"\r[download] 10%\r[download] 20%\n"),
            vec!["[download] 10%", "[download] 20%"]
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(split_lines(b"caf\xe9\n"), vec!["caf\u{fffd}"]);
    }

    #[tokio::test]
    async fn missing_executable_fails_to_launch() {
        let executor = Executor {
            executable_path: PathBuf::from("definitely-not-an-installed-binary-7f3a"),
            args: Vec::new(),
            working_directory: None,
            timeout: None,
        };

        let err = executor.execute().await.unwrap_err();
        assert!(matches!(err, Error::Launch { .. }));
    }

    #[cfg(unix)]
    fn shell(script: &str) -> Executor {
        Executor {
            executable_path: PathBuf::from("sh"),
            args: vec!["-c".to_string(), script.to_string()],
            working_directory: None,
            timeout: None,
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn collects_lines_in_order() {
        let outcome = shell("echo one; echo two; echo three")
            .execute()
            .await
            .unwrap();

        assert_eq!(outcome.code, 0);
        assert_eq!(outcome.lines, vec!["one", "two", "three"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn merges_stderr_in_emission_order() {
        for _ in 0..50 {
            let outcome = shell("echo a; echo b >&2; echo c; echo d >&2")
                .execute()
                .await
                .unwrap();
            assert_eq!(outcome.lines, vec!["a", "b", "c", "d"]);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn keeps_blank_lines() {
        let outcome = shell("printf 'one\\n\\nthree\\n'").execute().await.unwrap();
        assert_eq!(outcome.lines, vec!["one", "", "three"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_keeps_transcript() {
        let err = shell("echo first; echo second; exit 3")
            .execute()
            .await
            .unwrap_err();

        match err {
            Error::Execution { code, lines } => {
                assert_eq!(code, 3);
                assert_eq!(lines, vec!["first", "second"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn large_output_does_not_block() {
        let outcome = shell("i=0; while [ $i -lt 20000 ]; do echo line$i; i=$((i+1)); done")
            .execute()
            .await
            .unwrap();

        assert_eq!(outcome.lines.len(), 20000);
        assert_eq!(outcome.lines[19999], "line19999");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = shell("pwd");
        executor.working_directory = Some(dir.path().to_path_buf());

        let outcome = executor.execute().await.unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            PathBuf::from(&outcome.lines[0]).canonicalize().unwrap(),
            expected
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_process() {
        let mut executor = shell("sleep 5");
        executor.timeout = Some(Duration::from_millis(100));

        let err = executor.execute().await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }
}
