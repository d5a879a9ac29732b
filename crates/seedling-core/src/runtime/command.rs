//! External command execution
//!
//! Commands are argv lists run directly (no shell) with an explicit working
//! directory and the parent's stdio, so prompts from child processes stay
//! visible to the operator.

use crate::config::CommandLine;
use std::io;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// Why a command did not succeed
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command is empty")]
    Empty,

    #[error("failed to start \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("\"{command}\" exited with {}", describe_code(.code))]
    Failed { command: String, code: Option<i32> },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Executes one external command
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, command: &CommandLine, cwd: &Path) -> Result<(), CommandError>;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandLine, cwd: &Path) -> Result<(), CommandError> {
        let program = command.program().ok_or(CommandError::Empty)?;
        debug!(command = %command, cwd = %cwd.display(), "running command");

        let status = TokioCommand::new(program)
            .args(command.args())
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                command: command.to_string(),
                code: status.code(),
            })
        }
    }
}

/// Run `commands` in order inside `cwd`, stopping at the first failure
///
/// A failure only cuts short the rest of this batch.
pub async fn run_batch<R: CommandRunner>(
    runner: &R,
    commands: &[CommandLine],
    cwd: &Path,
) -> Result<(), CommandError> {
    for command in commands {
        runner.run(command, cwd).await?;
    }
    Ok(())
}
