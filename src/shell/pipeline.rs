use crate::shell::parser::{syntax_error::SyntaxErrorKind, ParsedLine, Word};

/// One command of a pipeline, before redirection operators are stripped
/// out of its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStage {
    pub command: Word,
    pub args: Vec<Word>,
}

/// Splits a parsed line on `|` words. The pipe is recognized after quote
/// removal, so a line that quotes the whole operator (`"|"`) still splits,
/// while a pipe embedded in a larger word (`a|b`) does not.
pub fn build(line: &ParsedLine) -> Result<Vec<PipelineStage>, SyntaxErrorKind> {
    let words = line.words();
    let mut stages = Vec::new();
    let mut segment: Vec<Word> = Vec::new();

    for word in words {
        if word.value == "|" {
            if segment.is_empty() {
                return Err(SyntaxErrorKind::MalformedPipeline(word.span));
            }
            stages.push(stage_from(std::mem::take(&mut segment)));
        } else {
            segment.push(word.clone());
        }
    }

    if segment.is_empty() {
        if let Some(last) = words.last() {
            return Err(SyntaxErrorKind::MalformedPipeline(last.span));
        }
        return Ok(Vec::new());
    }
    stages.push(stage_from(segment));

    Ok(stages)
}

fn stage_from(mut words: Vec<Word>) -> PipelineStage {
    let command = words.remove(0);
    PipelineStage {
        command,
        args: words,
    }
}
