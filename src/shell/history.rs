use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use fd_lock::RwLock;

use crate::shell::{builtins::file_err_to_shell_err, shell_error::ShellErrorKind};

/// In-memory command history with plain-text persistence, one entry per
/// line. The file is advisory-locked for reads and writes so concurrent
/// shells do not interleave partial lines.
#[derive(Default)]
pub struct History {
    entries: Vec<String>,
    /// Index of the first entry not yet written by an appending save.
    append_index: usize,
}

impl History {
    pub fn add(&mut self, line: &str) {
        let line = line.trim();
        if !line.is_empty() {
            self.entries.push(line.to_string());
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn load(&mut self, path: &Path) -> Result<(), ShellErrorKind> {
        let file = File::open(path)
            .map_err(|e| file_err_to_shell_err(e, path.to_string_lossy().into_owned()))?;
        let lock = RwLock::new(file);
        let guard = lock.read()?;
        for line in BufReader::new(&*guard).lines() {
            self.add(&line?);
        }
        self.append_index = self.entries.len();
        Ok(())
    }

    /// Writes entries to `path`. With `append` set, only the entries added
    /// since the last load or save are written, after the existing content.
    pub fn save(&mut self, path: &Path, append: bool) -> Result<(), ShellErrorKind> {
        let old_umask = umask();
        let opened = OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(path);
        restore_umask(old_umask);
        let file =
            opened.map_err(|e| file_err_to_shell_err(e, path.to_string_lossy().into_owned()))?;
        fix_perm(&file);

        let mut lock = RwLock::new(file);
        let guard = lock.write()?;
        let skip = if append { self.append_index } else { 0 };
        let mut writer = BufWriter::new(&*guard);
        for entry in self.entries.iter().skip(skip) {
            writer.write_all(entry.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        self.append_index = self.entries.len();
        Ok(())
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        use nix::sys::stat::{self, fchmod, Mode};

        fn umask() -> Mode {
            stat::umask(Mode::S_IXUSR | Mode::S_IRWXG | Mode::S_IRWXO)
        }

        fn restore_umask(old_umask: Mode) {
            stat::umask(old_umask);
        }

        fn fix_perm(file: &File) {
            use std::os::unix::io::AsRawFd;
            let _ = fchmod(file.as_raw_fd(), Mode::S_IRUSR | Mode::S_IWUSR);
        }
    } else {
        fn umask() {}

        fn restore_umask(_: ()) {}

        fn fix_perm(_: &File) {}
    }
}
