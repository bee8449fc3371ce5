use std::io::{Read, Write};

use crate::shell::{shell_error::ShellErrorKind, Env};

pub fn pwd(
    env: &Env,
    _: &mut dyn Read,
    output: &mut dyn Write,
    _: &mut dyn Write,
    _: &[String],
) -> Result<(), ShellErrorKind> {
    writeln!(output, "{}", env.cwd().display())?;
    Ok(())
}
