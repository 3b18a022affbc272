use crate::error::{OracleError, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// Computes the answer for a recognized input that has no stored answer.
/// Output goes straight to `out`; the oracle adds nothing around it.
pub trait Solver {
    fn solve(&self, input: &str, out: &mut dyn Write) -> Result<()>;
}

/// Solver that produces no output
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSolver;

impl Solver for NoopSolver {
    fn solve(&self, _input: &str, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}

/// Runs an external program with the consumed input on its stdin
#[derive(Debug, Clone)]
pub struct CommandSolver {
    program: String,
    args: Vec<String>,
}

impl CommandSolver {
    /// First element is the program, the rest are its arguments
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| OracleError::InvalidManifest("empty solver command".into()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl Solver for CommandSolver {
    fn solve(&self, input: &str, out: &mut dyn Write) -> Result<()> {
        debug!(program = %self.program, "invoking solver");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OracleError::SolverFailed("solver stdin unavailable".into()))?;
        // Feed stdin while collecting stdout so neither pipe can fill up and block
        let output = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(input.as_bytes()));
            let output = child.wait_with_output();
            match writer.join() {
                // A solver that exits without reading its input closes the pipe early
                Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                _ => output,
            }
        })?;

        if !output.status.success() {
            return Err(OracleError::SolverFailed(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        out.write_all(&output.stdout)?;
        Ok(())
    }
}

/// Solver configured by an instance manifest
pub fn solver_for(command: Option<&[String]>) -> Result<Box<dyn Solver>> {
    match command {
        Some(command) => Ok(Box::new(CommandSolver::new(command)?)),
        None => Ok(Box::new(NoopSolver)),
    }
}
