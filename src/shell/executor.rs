use std::{
    fs::File,
    io::{self, Read, Write},
    path::PathBuf,
    process::{Command, Stdio},
    thread,
};

use os_pipe::{PipeReader, PipeWriter};
use tracing::debug;

use crate::shell::{
    builtins::BuiltinFn,
    parser::syntax_error::SyntaxErrorKind,
    pipeline::PipelineStage,
    redirect::{self, Redirections},
    shell_error::ShellErrorKind,
    Env,
};

pub enum InputStream {
    Inherit,
    Null,
    Pipe(PipeReader),
    File(File),
}

impl InputStream {
    fn into_stdio(self) -> Stdio {
        match self {
            Self::Inherit => Stdio::inherit(),
            Self::Null => Stdio::null(),
            Self::Pipe(reader) => reader.into(),
            Self::File(file) => file.into(),
        }
    }

    fn into_read(self) -> Box<dyn Read> {
        match self {
            Self::Inherit => Box::new(io::stdin()),
            Self::Null => Box::new(io::empty()),
            Self::Pipe(reader) => Box::new(reader),
            Self::File(file) => Box::new(file),
        }
    }
}

pub enum OutputStream {
    Stdout,
    Stderr,
    Null,
    Pipe(PipeWriter),
    File(File),
}

impl OutputStream {
    fn try_clone(&self) -> Result<OutputStream, ShellErrorKind> {
        Ok(match self {
            Self::Stdout => Self::Stdout,
            Self::Stderr => Self::Stderr,
            Self::Null => Self::Null,
            Self::Pipe(writer) => Self::Pipe(writer.try_clone()?),
            Self::File(file) => Self::File(file.try_clone()?),
        })
    }

    fn into_stdio(self) -> Stdio {
        match self {
            Self::Stdout | Self::Stderr => Stdio::inherit(),
            Self::Null => Stdio::null(),
            Self::Pipe(writer) => writer.into(),
            Self::File(file) => file.into(),
        }
    }

    fn into_write(self) -> Box<dyn Write> {
        match self {
            Self::Stdout => Box::new(io::stdout()),
            Self::Stderr => Box::new(io::stderr()),
            Self::Null => Box::new(io::sink()),
            Self::Pipe(writer) => Box::new(writer),
            Self::File(file) => Box::new(file),
        }
    }
}

enum CommandHandle {
    Builtin(BuiltinFn),
    External(PathBuf),
}

/// A pipeline stage with redirections extracted, ready to resolve and run.
pub struct StagePlan {
    pub command: String,
    pub args: Vec<String>,
    pub redirect: Redirections,
}

impl StagePlan {
    pub fn plan(stages: Vec<PipelineStage>) -> Result<Vec<StagePlan>, SyntaxErrorKind> {
        stages
            .into_iter()
            .map(|stage| {
                let (args, redirect) = redirect::extract(&stage.args)?;
                Ok(StagePlan {
                    command: stage.command.value,
                    args,
                    redirect,
                })
            })
            .collect()
    }
}

struct WiredStage {
    plan: StagePlan,
    handle: CommandHandle,
    stdin: InputStream,
    stdout: OutputStream,
    stderr: OutputStream,
}

/// Runs a planned pipeline to completion, one thread per stage.
///
/// All stages start concurrently with byte pipes between them, so a stage
/// blocked writing a full pipe is drained by its downstream neighbor. The
/// call returns once every stage has finished. The result carries the exit
/// code of the last stage when it ran an external command and `None` when
/// it was a builtin.
pub fn run(
    env: &Env,
    plans: Vec<StagePlan>,
    input: InputStream,
    output: OutputStream,
    error: OutputStream,
) -> Result<Option<i32>, ShellErrorKind> {
    if plans.is_empty() {
        return Ok(None);
    }

    // Every stage resolves before anything is spawned. Unresolvable names
    // report on the pipeline's output, and nothing runs.
    let mut handles = Vec::with_capacity(plans.len());
    let mut missing = Vec::new();
    for plan in &plans {
        if let Some(func) = env.builtins().get(&plan.command) {
            handles.push(CommandHandle::Builtin(func));
        } else if let Some(path) = env.resolver().resolve(&plan.command) {
            handles.push(CommandHandle::External(path));
        } else {
            missing.push(plan.command.as_str());
        }
    }
    if !missing.is_empty() {
        let mut output = output.into_write();
        for name in missing {
            writeln!(output, "{name}: command not found")?;
        }
        output.flush()?;
        return Ok(None);
    }

    let mut wired = Vec::with_capacity(plans.len());
    let mut stages = plans.into_iter().zip(handles).peekable();
    let mut stdin = input;
    while let Some((plan, handle)) = stages.next() {
        if stages.peek().is_none() {
            wired.push(PendingStage {
                plan,
                handle,
                stdin,
                stdout: output,
            });
            break;
        }
        let (reader, writer) = os_pipe::pipe()?;
        let stdin = std::mem::replace(&mut stdin, InputStream::Pipe(reader));
        wired.push(PendingStage {
            plan,
            handle,
            stdin,
            stdout: OutputStream::Pipe(writer),
        });
    }

    debug!("running pipeline of {} stages", wired.len());

    let cwd = env.cwd();
    let mut results = Vec::with_capacity(wired.len());
    thread::scope(|scope| -> Result<(), ShellErrorKind> {
        let mut joins = Vec::with_capacity(wired.len());
        for pending in wired {
            let stage = WiredStage {
                plan: pending.plan,
                handle: pending.handle,
                stdin: pending.stdin,
                stdout: pending.stdout,
                stderr: error.try_clone()?,
            };
            let env = &*env;
            let cwd = cwd.clone();
            joins.push(scope.spawn(move || run_stage(env, stage, cwd)));
        }
        drop(error);
        for join in joins {
            let result = join
                .join()
                .map_err(|_| ShellErrorKind::Basic("Stage Error", "pipeline stage panicked".into()));
            results.push(result);
        }
        Ok(())
    })?;

    let mut status = None;
    for result in results {
        status = result??;
    }
    Ok(status)
}

struct PendingStage {
    plan: StagePlan,
    handle: CommandHandle,
    stdin: InputStream,
    stdout: OutputStream,
}

fn run_stage(env: &Env, stage: WiredStage, cwd: PathBuf) -> Result<Option<i32>, ShellErrorKind> {
    let WiredStage {
        plan,
        handle,
        stdin,
        mut stdout,
        mut stderr,
    } = stage;

    // Redirect files open inside the stage thread. On failure the stage's
    // pipe ends drop here, so neighbors see EOF instead of hanging.
    if let Some(spec) = &plan.redirect.stdout {
        stdout = OutputStream::File(spec.open(&cwd)?);
    }
    if let Some(spec) = &plan.redirect.stderr {
        stderr = OutputStream::File(spec.open(&cwd)?);
    }

    match handle {
        CommandHandle::Builtin(func) => {
            let mut input = stdin.into_read();
            let mut output = stdout.into_write();
            let mut error = stderr.into_write();
            let result = func(env, &mut *input, &mut *output, &mut *error, &plan.args)
                .and_then(|()| output.flush().map_err(ShellErrorKind::from));
            match result {
                // A downstream stage that exits early closes the pipe. The
                // builtin just stops producing output.
                Err(ShellErrorKind::Io(_, e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                    Ok(None)
                }
                Err(e) => Err(e),
                Ok(()) => Ok(None),
            }
        }
        CommandHandle::External(path) => {
            let mut command = Command::new(&path);
            command
                .args(&plan.args)
                .current_dir(&cwd)
                .stdin(stdin.into_stdio())
                .stdout(stdout.into_stdio())
                .stderr(stderr.into_stdio());
            #[cfg(unix)]
            {
                use std::os::unix::process::CommandExt;
                if let Some(name) = path.file_name() {
                    command.arg0(name);
                }
            }

            let mut child = command.spawn().map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ShellErrorKind::CommandNotFound(plan.command.clone()),
                io::ErrorKind::PermissionDenied => {
                    ShellErrorKind::CommandPermissionDenied(plan.command.clone())
                }
                _ => ShellErrorKind::Io(None, e),
            })?;
            // The command still holds duped pipe ends. They have to close
            // before the wait or an upstream stage never sees EOF.
            drop(command);

            let status = child.wait()?;
            let code = status.code();
            #[cfg(unix)]
            let code = code.or_else(|| {
                use std::os::unix::process::ExitStatusExt;
                status.signal().map(|signal| 128 + signal)
            });
            Ok(Some(code.unwrap_or(1)))
        }
    }
}
