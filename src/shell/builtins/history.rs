use std::io::{Read, Write};

use crate::shell::{shell_error::ShellErrorKind, Env};

pub fn history(
    env: &Env,
    _: &mut dyn Read,
    output: &mut dyn Write,
    _: &mut dyn Write,
    args: &[String],
) -> Result<(), ShellErrorKind> {
    match args.first().map(String::as_str) {
        Some(flag @ ("-r" | "-w" | "-a")) => {
            let Some(path) = args.get(1) else {
                return Err(ShellErrorKind::Basic(
                    "History Error",
                    format!("history {flag} requires a file path"),
                ));
            };
            let path = env.cwd().join(path);
            let mut history = env.history();
            match flag {
                "-r" => history.load(&path)?,
                "-w" => history.save(&path, false)?,
                _ => history.save(&path, true)?,
            }
            Ok(())
        }
        first => {
            let history = env.history();
            let entries = history.entries();
            let start = match first {
                Some(limit) if !limit.is_empty() && limit.bytes().all(|b| b.is_ascii_digit()) => {
                    entries.len().saturating_sub(limit.parse::<usize>()?)
                }
                _ => 0,
            };
            for (i, entry) in entries.iter().enumerate().skip(start) {
                writeln!(output, "\t{} {}", i + 1, entry)?;
            }
            Ok(())
        }
    }
}
