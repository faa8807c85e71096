// Invocation Request Domain Model
//
// One InvocationRequest describes one launch of the external inference
// routine: program path, ordered arguments (the serialized payload is the
// last argument) and an optional working-directory override. Created per
// incoming prediction request and discarded once the invocation resolves.

use std::path::PathBuf;

use super::error::{DomainError, Result};

/// Immutable description of a single external-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl InvocationRequest {
    /// Build a request, enforcing non-empty program and argument list.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Result<Self> {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(DomainError::EmptyProgram);
        }
        if args.is_empty() {
            return Err(DomainError::EmptyArguments);
        }
        Ok(Self {
            program,
            args,
            working_dir: None,
        })
    }

    /// Override the child's working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&std::path::Path> {
        self.working_dir.as_deref()
    }
}
