use std::{
    fs::{File, OpenOptions},
    path::Path,
};

use crate::shell::{
    builtins::file_err_to_shell_err,
    parser::{syntax_error::SyntaxErrorKind, Word},
    shell_error::ShellErrorKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Truncate,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectionSpec {
    pub target: TargetStream,
    pub mode: RedirectMode,
    pub path: String,
}

impl RedirectionSpec {
    /// Opens the target file relative to `cwd`. Truncate mode clobbers an
    /// existing file even if the command never writes a byte.
    pub fn open(&self, cwd: &Path) -> Result<File, ShellErrorKind> {
        let path = cwd.join(&self.path);
        let mut options = OpenOptions::new();
        options.write(true).create(true);
        match self.mode {
            RedirectMode::Truncate => options.truncate(true),
            RedirectMode::Append => options.append(true),
        };
        options
            .open(&path)
            .map_err(|e| file_err_to_shell_err(e, self.path.clone()))
    }
}

/// At most one redirection per stream. When an operator for the same
/// stream appears twice, the first one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    pub stdout: Option<RedirectionSpec>,
    pub stderr: Option<RedirectionSpec>,
}

fn parse_operator(word: &str) -> Option<(TargetStream, RedirectMode)> {
    match word {
        ">" | "1>" => Some((TargetStream::Stdout, RedirectMode::Truncate)),
        ">>" | "1>>" => Some((TargetStream::Stdout, RedirectMode::Append)),
        "2>" => Some((TargetStream::Stderr, RedirectMode::Truncate)),
        "2>>" => Some((TargetStream::Stderr, RedirectMode::Append)),
        _ => None,
    }
}

/// Strips redirection operators and their targets out of an argument list.
/// Everything from the first operator onward is dropped from the argument
/// list, even words that are not themselves operators.
pub fn extract(args: &[Word]) -> Result<(Vec<String>, Redirections), SyntaxErrorKind> {
    let mut redirect = Redirections::default();
    let mut cut = args.len();

    let mut i = 0;
    while i < args.len() {
        let Some((target, mode)) = parse_operator(&args[i].value) else {
            i += 1;
            continue;
        };
        let Some(path) = args.get(i + 1) else {
            return Err(SyntaxErrorKind::MalformedRedirection(args[i].span));
        };

        cut = cut.min(i);
        let spec = RedirectionSpec {
            target,
            mode,
            path: path.value.clone(),
        };
        let slot = match target {
            TargetStream::Stdout => &mut redirect.stdout,
            TargetStream::Stderr => &mut redirect.stderr,
        };
        slot.get_or_insert(spec);
        i += 2;
    }

    let remaining = args[..cut].iter().map(|w| w.value.clone()).collect();
    Ok((remaining, redirect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::parser::parse;

    fn words(line: &str) -> Vec<Word> {
        parse(line).words().to_vec()
    }

    #[test]
    fn no_redirection() {
        let (args, redirect) = extract(&words("hello world")).unwrap();
        assert_eq!(args, ["hello", "world"]);
        assert_eq!(redirect, Redirections::default());
    }

    #[test]
    fn stdout_truncate() {
        let (args, redirect) = extract(&words("hello > out.txt")).unwrap();
        assert_eq!(args, ["hello"]);
        let spec = redirect.stdout.unwrap();
        assert_eq!(spec.target, TargetStream::Stdout);
        assert_eq!(spec.mode, RedirectMode::Truncate);
        assert_eq!(spec.path, "out.txt");
        assert!(redirect.stderr.is_none());
    }

    #[test]
    fn explicit_fd_forms() {
        let (_, redirect) = extract(&words("a 1> out.txt 2>> err.txt")).unwrap();
        assert_eq!(redirect.stdout.unwrap().mode, RedirectMode::Truncate);
        let stderr = redirect.stderr.unwrap();
        assert_eq!(stderr.target, TargetStream::Stderr);
        assert_eq!(stderr.mode, RedirectMode::Append);
    }

    #[test]
    fn stdout_append() {
        let (_, redirect) = extract(&words("a >> out.txt")).unwrap();
        assert_eq!(redirect.stdout.unwrap().mode, RedirectMode::Append);
    }

    #[test]
    fn first_operator_wins_per_stream() {
        let (_, redirect) = extract(&words("a > first.txt > second.txt")).unwrap();
        assert_eq!(redirect.stdout.unwrap().path, "first.txt");
    }

    #[test]
    fn arguments_after_operator_are_dropped() {
        let (args, _) = extract(&words("a b > out.txt c")).unwrap();
        assert_eq!(args, ["a", "b"]);
    }

    #[test]
    fn quoted_operator_still_redirects() {
        let (args, redirect) = extract(&words("a '>' b")).unwrap();
        assert_eq!(args, ["a"]);
        assert_eq!(redirect.stdout.unwrap().path, "b");
    }

    #[test]
    fn embedded_operator_is_an_argument() {
        let (args, redirect) = extract(&words("a>b c")).unwrap();
        assert_eq!(args, ["a>b", "c"]);
        assert!(redirect.stdout.is_none());
    }

    #[test]
    fn missing_target_is_malformed() {
        let err = extract(&words("a >")).unwrap_err();
        assert!(matches!(err, SyntaxErrorKind::MalformedRedirection(_)));
    }
}
