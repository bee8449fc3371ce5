use std::io::{Read, Write};

use crate::shell::{shell_error::ShellErrorKind, Env};

// The read loop handles `exit` itself so history gets written back. The
// builtin only exists so `type exit` and completion see it.
pub fn exit(
    _: &Env,
    _: &mut dyn Read,
    _: &mut dyn Write,
    _: &mut dyn Write,
    _: &[String],
) -> Result<(), ShellErrorKind> {
    Ok(())
}
