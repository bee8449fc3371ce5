use std::{
    env,
    io::stdout,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, RwLock},
};

use crossterm::{execute, terminal::SetTitle};
use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};
use tracing::debug;

pub mod builtins;
pub mod executor;
pub mod helper;
pub mod history;
pub mod parser;
pub mod path_resolver;
pub mod pipeline;
pub mod redirect;
pub mod shell_error;

use self::{
    builtins::Builtins,
    executor::{InputStream, OutputStream, StagePlan},
    helper::EditorHelper,
    history::History,
    parser::syntax_error::SyntaxError,
    path_resolver::PathResolver,
    shell_error::ShellError,
};

const HISTORY_FILE: &str = ".husk_history";

/// Shared context every pipeline stage runs against.
pub struct Env {
    builtins: Builtins,
    resolver: PathResolver,
    cwd: RwLock<PathBuf>,
    home: Option<PathBuf>,
    history: Mutex<History>,
}

impl Env {
    pub fn new() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Env {
            builtins: Builtins::with_defaults(),
            resolver: PathResolver::from_env(),
            cwd: RwLock::new(cwd),
            home: env::var_os("HOME").map(PathBuf::from),
            history: Mutex::new(History::default()),
        }
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn cwd(&self) -> PathBuf {
        self.cwd.read().unwrap().clone()
    }

    pub fn set_cwd(&self, path: PathBuf) {
        *self.cwd.write().unwrap() = path;
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap()
    }
}

#[cfg(test)]
impl Env {
    pub fn with_parts(dirs: Vec<PathBuf>, cwd: PathBuf, home: Option<PathBuf>) -> Self {
        Env {
            builtins: Builtins::with_defaults(),
            resolver: PathResolver::with_dirs(dirs),
            cwd: RwLock::new(cwd),
            home,
            history: Mutex::new(History::default()),
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Shell {
    env: Arc<Env>,
    running: bool,
    status: i32,
    history_path: Option<PathBuf>,
}

impl Shell {
    pub fn new() -> Self {
        let env = Arc::new(Env::new());
        let history_path = env::var_os("HISTFILE")
            .map(PathBuf::from)
            .or_else(default_history_path);

        if let Some(path) = &history_path {
            if path.exists() {
                if let Err(e) = env.history().load(path) {
                    debug!("could not load history from {}: {e}", path.display());
                }
            }
        }

        Shell {
            env,
            running: true,
            status: 0,
            history_path,
        }
    }

    pub fn run(mut self) -> i32 {
        let _ = execute!(stdout(), SetTitle("husk"));

        let config = rustyline::Config::builder()
            .bell_style(rustyline::config::BellStyle::None)
            .build();
        let mut editor: Editor<EditorHelper, DefaultHistory> =
            match Editor::with_config(config) {
                Ok(editor) => editor,
                Err(e) => {
                    eprintln!("Error: could not start line editor: {e}");
                    return 1;
                }
            };
        editor.set_helper(Some(EditorHelper::new(self.env.clone())));
        for entry in self.env.history().entries() {
            let _ = editor.add_history_entry(entry);
        }

        while self.running {
            match editor.readline("$ ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(line);
                    self.env.history().add(line);
                    self.interpret(line);
                }
                Err(ReadlineError::Interrupted) => println!("^C"),
                Err(ReadlineError::Eof) => self.running = false,
                Err(e) => {
                    eprintln!("Error: {e}");
                    self.running = false;
                }
            }
        }

        if let Some(path) = &self.history_path {
            let append = path.exists();
            if let Err(e) = self.env.history().save(path, append) {
                eprintln!("Error: could not save history: {e}");
            }
        }

        self.status
    }

    /// Parses and runs one input line against the interactive streams.
    pub fn interpret(&mut self, line: &str) {
        let parsed = parser::parse(line);
        if parsed.is_empty() {
            return;
        }
        if parsed.command() == "exit" {
            self.running = false;
            return;
        }

        let plans = pipeline::build(&parsed).and_then(StagePlan::plan);
        let plans = match plans {
            Ok(plans) => plans,
            Err(error) => {
                let report = miette::Report::new(SyntaxError::new(
                    error,
                    line.to_string(),
                    String::from("shell"),
                ));
                eprintln!("{report:?}");
                self.status = 1;
                return;
            }
        };

        match executor::run(
            &self.env,
            plans,
            InputStream::Inherit,
            OutputStream::Stdout,
            OutputStream::Stderr,
        ) {
            Ok(status) => self.status = status.unwrap_or(0),
            Err(error) => {
                let report = miette::Report::new(ShellError::new(
                    error,
                    line.to_string(),
                    String::from("shell"),
                ));
                eprintln!("{report:?}");
                self.status = 1;
            }
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

fn default_history_path() -> Option<PathBuf> {
    let dirs = directories::BaseDirs::new()?;
    Some(dirs.home_dir().join(HISTORY_FILE))
}
