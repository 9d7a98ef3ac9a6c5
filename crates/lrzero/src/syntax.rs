//! The line-oriented grammar source.
//!
//! ```text
//! E
//! E->aA
//! A->cA
//! A->d
//! ```
//!
//! The first line is the right-hand side of the augmented start production,
//! and each following line is a production of the form `LHS->RHS`.

/// The separator between the left and right-hand sides of a production.
pub const SEPARATOR: &str = "->";

#[derive(Debug, Default, Copy, Clone)]
#[non_exhaustive]
pub struct ParseOptions {
    /// Report lines without the separator instead of treating them as the
    /// end of the grammar.
    pub strict: bool,
}

impl ParseOptions {
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// The productions read from a grammar source, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarSource {
    pub start: String,
    pub productions: Vec<(char, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("missing the start line")]
    MissingStart,

    #[error("line 1: expected the start symbols, found the production `{content}'")]
    SeparatorInStart { content: String },

    #[error("line {line}: missing `->' in `{content}'")]
    MissingSeparator { line: usize, content: String },

    #[error("line {line}: the left-hand side `{lhs}' is not a single symbol")]
    InvalidLhs { line: usize, lhs: String },
}

pub fn parse(source: &str, options: ParseOptions) -> Result<GrammarSource, SyntaxError> {
    let span = tracing::trace_span!("parse");
    let _entered = span.enter();

    let mut lines = source.lines().enumerate().map(|(i, line)| (i + 1, line));

    let start = match lines.next() {
        Some((_, line)) if options.strict && line.contains(SEPARATOR) => {
            return Err(SyntaxError::SeparatorInStart {
                content: line.to_owned(),
            })
        }
        Some((_, line)) if !line.trim().is_empty() => symbols(line),
        _ => return Err(SyntaxError::MissingStart),
    };
    tracing::trace!("start: {:?}", start);

    let mut productions = vec![];
    for (line, content) in lines {
        let (lhs, rhs) = match content.split_once(SEPARATOR) {
            Some(pair) => pair,
            None if options.strict && content.trim().is_empty() => continue,
            None if options.strict => {
                return Err(SyntaxError::MissingSeparator {
                    line,
                    content: content.to_owned(),
                })
            }
            None => {
                tracing::debug!("stop reading at line {}: {:?}", line, content);
                break;
            }
        };

        let mut chars = lhs.trim().chars();
        let lhs = match (chars.next(), chars.next()) {
            (Some(ch), None) => ch,
            _ => {
                return Err(SyntaxError::InvalidLhs {
                    line,
                    lhs: lhs.to_owned(),
                })
            }
        };
        let rhs = symbols(rhs);

        tracing::trace!("line {}: {}->{}", line, lhs, rhs);
        productions.push((lhs, rhs));
    }

    Ok(GrammarSource { start, productions })
}

// spaces and tabs are never symbols.
fn symbols(s: &str) -> String {
    s.chars().filter(|ch| !matches!(ch, ' ' | '\t')).collect()
}
