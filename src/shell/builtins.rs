use std::{
    collections::HashMap,
    io::{self, Read, Write},
};

use phf::phf_map;

use crate::shell::{shell_error::ShellErrorKind, Env};

mod cd;
mod echo;
mod exit;
mod history;
mod pwd;
mod r#type;

/// A builtin runs inside a pipeline stage thread with whatever streams
/// that stage was wired to.
pub type BuiltinFn =
    fn(&Env, &mut dyn Read, &mut dyn Write, &mut dyn Write, &[String]) -> Result<(), ShellErrorKind>;

static DEFAULT_BUILTINS: phf::Map<&'static str, BuiltinFn> = phf_map! {
    "cd" => cd::cd,
    "echo" => echo::echo,
    "exit" => exit::exit,
    "history" => history::history,
    "pwd" => pwd::pwd,
    "type" => r#type::r#type,
};

/// Builtin lookup table. Builtins shadow path executables of the same
/// name, and a later registration replaces an earlier one.
pub struct Builtins {
    map: HashMap<String, BuiltinFn>,
}

impl Builtins {
    pub fn with_defaults() -> Self {
        let map = DEFAULT_BUILTINS
            .entries()
            .map(|(name, func)| (name.to_string(), *func))
            .collect();
        Builtins { map }
    }

    pub fn register(&mut self, name: impl Into<String>, func: BuiltinFn) {
        self.map.insert(name.into(), func);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.map.get(name).copied()
    }

    pub fn names(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }
}

pub fn file_err_to_shell_err(error: io::Error, name: String) -> ShellErrorKind {
    match error.kind() {
        io::ErrorKind::NotFound => ShellErrorKind::FileNotFound(name),
        io::ErrorKind::PermissionDenied => ShellErrorKind::FilePermissionDenied(name),
        _ => ShellErrorKind::Io(Some(name.into()), error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_registered() {
        let builtins = Builtins::with_defaults();
        for name in ["cd", "echo", "exit", "history", "pwd", "type"] {
            assert!(builtins.contains(name), "missing builtin {name}");
        }
        assert!(!builtins.contains("ls"));
    }

    #[test]
    fn later_registration_wins() {
        fn noop(
            _: &Env,
            _: &mut dyn Read,
            _: &mut dyn Write,
            _: &mut dyn Write,
            _: &[String],
        ) -> Result<(), ShellErrorKind> {
            Ok(())
        }

        let mut builtins = Builtins::with_defaults();
        builtins.register("echo", noop);
        assert_eq!(builtins.get("echo"), Some(noop as BuiltinFn));
    }
}
