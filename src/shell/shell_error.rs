use std::{fmt, io, num::ParseIntError, path::PathBuf};

use miette::{Diagnostic, NamedSource, SourceCode};
use thiserror::Error;

/// Runtime failures raised while resolving or running a pipeline.
#[derive(Debug, Error)]
pub enum ShellErrorKind {
    Basic(&'static str, String),
    CommandNotFound(String),
    CommandPermissionDenied(String),
    FileNotFound(String),
    FilePermissionDenied(String),
    HomeNotSet,
    ParseInt(#[from] ParseIntError),
    Io(Option<PathBuf>, io::Error),
}

impl fmt::Display for ShellErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Basic(_, msg) => write!(f, "{msg}"),
            Self::CommandNotFound(name) => write!(f, "Command '{name}' not found"),
            Self::CommandPermissionDenied(name) => {
                write!(f, "Cannot run '{name}' permission denied")
            }
            Self::FileNotFound(path) => write!(f, "Cannot open '{path}' file not found"),
            Self::FilePermissionDenied(path) => {
                write!(f, "Cannot open '{path}' permission denied")
            }
            Self::HomeNotSet => write!(f, "The environment variable 'HOME' is not set"),
            Self::ParseInt(error) => write!(f, "{error}"),
            Self::Io(path, error) => match path {
                Some(path) => write!(f, "{} {}", error, path.to_string_lossy()),
                None => write!(f, "{error}"),
            },
        }
    }
}

impl From<io::Error> for ShellErrorKind {
    fn from(error: io::Error) -> Self {
        ShellErrorKind::Io(None, error)
    }
}

#[derive(Debug, Error)]
pub struct ShellError {
    pub error: ShellErrorKind,
    pub src: NamedSource<String>,
    pub len: usize,
}

impl ShellError {
    pub fn new(error: ShellErrorKind, src: String, name: String) -> Self {
        ShellError {
            error,
            len: src.len(),
            src: NamedSource::new(name, src),
        }
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.error.fmt(f)
    }
}

impl Diagnostic for ShellError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        use ShellErrorKind::*;
        let code = match &self.error {
            Basic(name, _) => *name,
            CommandNotFound(_) | CommandPermissionDenied(_) => "Command Error",
            FileNotFound(_) | FilePermissionDenied(_) | Io(..) => "File Error",
            HomeNotSet | ParseInt(_) => "Shell Error",
        };
        Some(Box::new(code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn SourceCode)
    }
}
