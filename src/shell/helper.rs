use std::{borrow::Cow, sync::Arc};

use crossterm::style::Stylize;
use rustyline::{
    completion::{extract_word, Completer, Pair},
    highlight::Highlighter,
    hint::Hinter,
    history::SearchDirection,
    validate::Validator,
    Changeset, Helper,
};

use crate::shell::Env;

pub struct EditorHelper {
    env: Arc<Env>,
}

impl EditorHelper {
    pub fn new(env: Arc<Env>) -> Self {
        Self { env }
    }

    fn candidates(&self, word: &str) -> Vec<String> {
        let mut names = self.env.builtins().names();
        names.extend(self.env.resolver().names());
        names.retain(|name| name.starts_with(word));
        names.sort();
        names.dedup();
        names
    }
}

impl Completer for EditorHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, word) = extract_word(line, pos, None, |c| c.is_whitespace() || c == '|');

        let candidates = self
            .candidates(word)
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, candidates))
    }

    fn update(
        &self,
        line: &mut rustyline::line_buffer::LineBuffer,
        start: usize,
        elected: &str,
        cl: &mut Changeset,
    ) {
        let end = line.pos();
        line.replace(start..end, elected, cl)
    }
}

impl Highlighter for EditorHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dim().to_string())
    }
}

impl Hinter for EditorHelper {
    type Hint = String;

    fn hint(&self, line: &str, _pos: usize, ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if line.is_empty() {
            return None;
        }
        let last = ctx.history().len().checked_sub(1)?;
        match ctx.history().starts_with(line, last, SearchDirection::Reverse) {
            Ok(Some(result)) => Some(String::from(&result.entry[result.pos..])),
            _ => None,
        }
    }
}

impl Validator for EditorHelper {}

impl Helper for EditorHelper {}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use std::{fs::File, os::unix::fs::PermissionsExt, path::PathBuf};

    use super::*;

    #[test]
    fn candidates_mix_builtins_and_path_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("echo-server");
        let file = File::create(&path).unwrap();
        let mut perm = file.metadata().unwrap().permissions();
        perm.set_mode(0o755);
        file.set_permissions(perm).unwrap();

        let env = Arc::new(Env::with_parts(
            vec![dir.path().to_path_buf()],
            PathBuf::from("/"),
            None,
        ));
        let helper = EditorHelper::new(env);

        assert_eq!(helper.candidates("ech"), ["echo", "echo-server"]);
        assert_eq!(helper.candidates("pw"), ["pwd"]);
        assert!(helper.candidates("zzz").is_empty());
    }
}
