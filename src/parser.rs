use crate::lexer::{tokenize, Token, TokenKind};

/// One pipeline stage: the command name plus its argument fragments.
///
/// Fragments keep single `" "` markers between arguments so the redirection
/// scan downstream can still match operator fragments exactly;
/// `normalize_fragments` collapses them into whole arguments when a plain
/// argv is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub fragments: Vec<String>,
}

impl ParsedCommand {
    pub fn args(&self) -> Vec<String> {
        normalize_fragments(&self.fragments)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub stages: Vec<ParsedCommand>,
}

impl Pipeline {
    pub fn has_pipeline(&self) -> bool {
        self.stages.len() > 1
    }
}

/// Tokenize a raw input line and shape it into pipeline stages.
pub fn parse_line(input: &str) -> Pipeline {
    let tokens = tokenize(input);
    let stages = split_stages(&tokens)
        .into_iter()
        .map(shape_stage)
        .collect();
    Pipeline { stages }
}

/// Cut the token stream at every Pipe token. Stages that carry nothing but
/// whitespace are dropped.
fn split_stages(tokens: &[Token]) -> Vec<Vec<Token>> {
    tokens
        .split(|t| t.kind == TokenKind::Pipe)
        .filter(|chunk| chunk.iter().any(|t| t.kind != TokenKind::Space))
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Shape one stage: the first run of non-space tokens concatenates into the
/// command name; the rest become fragments with collapsed space markers and
/// `1`/`2` merged into a following redirection operator.
fn shape_stage(tokens: Vec<Token>) -> ParsedCommand {
    let mut iter = tokens.iter().peekable();

    // Leading whitespace carries no meaning before the name.
    while iter.peek().is_some_and(|t| t.kind == TokenKind::Space) {
        iter.next();
    }

    let mut name = String::new();
    for token in iter.by_ref() {
        if token.kind == TokenKind::Space {
            break;
        }
        name.push_str(&token.literal);
    }

    let mut fragments: Vec<String> = Vec::new();
    let mut previous = TokenKind::Space;
    for token in iter {
        match token.kind {
            TokenKind::Space => {
                if previous != TokenKind::Space {
                    fragments.push(" ".to_string());
                }
            }
            TokenKind::Redirect if previous == TokenKind::Number => {
                // "1" or "2" glued to ">"/" >>" forms a channel operator.
                let last = fragments
                    .last_mut()
                    .expect("number fragment precedes redirect");
                last.push_str(&token.literal);
            }
            _ => fragments.push(token.literal.clone()),
        }
        previous = token.kind;
    }

    // A trailing space marker closes no argument.
    if fragments.last().is_some_and(|f| f == " ") {
        fragments.pop();
    }

    ParsedCommand { name, fragments }
}

/// Collapse fragments into whole arguments: space markers end an argument,
/// adjacent non-space fragments concatenate.
pub fn normalize_fragments(fragments: &[String]) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    for fragment in fragments {
        if fragment == " " {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push_str(fragment);
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}
