use std::{
    io::{Read, Write},
    path::{Component, Path, PathBuf},
};

use crate::shell::{shell_error::ShellErrorKind, Env};

pub fn cd(
    env: &Env,
    _: &mut dyn Read,
    _: &mut dyn Write,
    error: &mut dyn Write,
    args: &[String],
) -> Result<(), ShellErrorKind> {
    let Some(arg) = args.first() else {
        writeln!(error, "No directory passed to cd")?;
        return Ok(());
    };

    let path = expand_home(env, arg)?;
    let path = if path.is_absolute() {
        path
    } else {
        env.cwd().join(path)
    };
    let path = normalize(&path);

    if path.is_dir() {
        env.set_cwd(path);
    } else {
        writeln!(error, "cd: {arg}: No such file or directory")?;
    }
    Ok(())
}

fn expand_home(env: &Env, arg: &str) -> Result<PathBuf, ShellErrorKind> {
    let Some(rest) = arg.strip_prefix('~') else {
        return Ok(PathBuf::from(arg));
    };
    let home = env.home().ok_or(ShellErrorKind::HomeNotSet)?;
    Ok(home.join(rest.trim_start_matches('/')))
}

/// Resolves `.` and `..` components lexically, without touching the
/// filesystem, so `cd ../x` from a symlinked cwd behaves predictably.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(out.components().next_back(), None | Some(Component::RootDir)) {
                    out.pop();
                }
            }
            part => out.push(part),
        }
    }
    out
}
