use std::io::{Read, Write};

use crate::shell::{shell_error::ShellErrorKind, Env};

pub fn echo(
    _: &Env,
    _: &mut dyn Read,
    output: &mut dyn Write,
    _: &mut dyn Write,
    args: &[String],
) -> Result<(), ShellErrorKind> {
    writeln!(output, "{}", args.join(" "))?;
    Ok(())
}
