use std::io::{Read, Write};

use crate::shell::{shell_error::ShellErrorKind, Env};

pub fn r#type(
    env: &Env,
    _: &mut dyn Read,
    output: &mut dyn Write,
    error: &mut dyn Write,
    args: &[String],
) -> Result<(), ShellErrorKind> {
    for name in args {
        // Builtins shadow path executables, and a builtin match also skips
        // the lookups for any remaining arguments.
        if env.builtins().contains(name) {
            writeln!(output, "{name} is a shell builtin")?;
            return Ok(());
        }
        match env.resolver().resolve(name) {
            Some(path) => writeln!(output, "{name} is {}", path.display())?,
            None => writeln!(error, "{name}: not found")?,
        }
    }
    Ok(())
}
