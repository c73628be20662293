//! Heuristic reinsertion of missing separators.
//!
//! Recovers the single most common structural defect in generated payloads:
//! a missing comma between two syntactically-adjacent values. Missing
//! colons, unbalanced brackets, and unterminated strings are left alone and
//! surface as parse failures from whichever strategy applied this step.

use crate::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Object,
    Array,
}

/// Rewrites a token stream, inserting a synthetic `,` wherever an object or
/// array value is directly followed by the start of another entry.
/// Deterministic and total; the output may still fail to parse.
pub fn insert_missing_separators(tokens: &[Token]) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Context> = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        match token.kind {
            TokenKind::OpenBrace => {
                stack.push(Context::Object);
                out.push(token.clone());
                i += 1;
            }
            TokenKind::OpenBracket => {
                stack.push(Context::Array);
                out.push(token.clone());
                i += 1;
            }
            TokenKind::CloseBrace | TokenKind::CloseBracket => {
                let matching = if token.kind == TokenKind::CloseBrace {
                    Context::Object
                } else {
                    Context::Array
                };
                if stack.last() == Some(&matching) {
                    stack.pop();
                }
                out.push(token.clone());
                // The closed structure is a value in the enclosing context,
                // so it participates in the same lookahead as a scalar.
                i = emit_separator_if_needed(tokens, i + 1, stack.last(), &mut out);
            }
            kind if kind.ends_value() && !stack.is_empty() => {
                out.push(token.clone());
                i = emit_separator_if_needed(tokens, i + 1, stack.last(), &mut out);
            }
            _ => {
                out.push(token.clone());
                i += 1;
            }
        }
    }

    out
}

/// Copies whitespace after a value, then inserts a synthetic comma when the
/// next token begins a new entry for `context`. Returns the index of the
/// next unconsumed token.
fn emit_separator_if_needed(
    tokens: &[Token],
    mut next: usize,
    context: Option<&Context>,
    out: &mut Vec<Token>,
) -> usize {
    while next < tokens.len() && tokens[next].kind == TokenKind::Whitespace {
        out.push(tokens[next].clone());
        next += 1;
    }
    let Some(follower) = tokens.get(next) else {
        return next;
    };

    let needs_comma = match context {
        // A new object entry looks like a string key followed by a colon.
        Some(Context::Object) => {
            follower.kind == TokenKind::Str && colon_follows(tokens, next + 1)
        }
        Some(Context::Array) => follower.kind.starts_value(),
        None => false,
    };

    if needs_comma {
        out.push(Token {
            kind: TokenKind::Comma,
            lexeme: ",".to_string(),
            offset: follower.offset,
        });
    }
    next
}

fn colon_follows(tokens: &[Token], mut index: usize) -> bool {
    while index < tokens.len() && tokens[index].kind == TokenKind::Whitespace {
        index += 1;
    }
    tokens.get(index).is_some_and(|t| t.kind == TokenKind::Colon)
}

/// Re-serializes a token stream back to text.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.lexeme.as_str()).collect()
}
