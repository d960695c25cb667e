//! Lexer for Vela using logos with string interning.
//!
//! Produces a `TokenList` for the parser. The list always ends with an
//! `Eof` token, and each token carries an `AT_LINE_START` flag recording
//! whether it is the first non-trivia token on its line — the member-list
//! parser uses this to enforce the newline-or-semicolon separation rule.
//!
//! # Code completion
//!
//! [`lex_with_completion`] inserts a `CodeComplete` sentinel token at the
//! first token boundary at or after the requested byte offset. The parser's
//! completion first pass keys off this token.

mod convert;
mod raw_token;
mod segments;

pub use segments::{has_interpolation, string_segments, SegmentKind, StringSegment};

use logos::Logos;
use vela_ir::{Span, StringInterner, Token, TokenFlags, TokenKind, TokenList};

use convert::convert_token;
use raw_token::RawToken;

/// Lex source code into a [`TokenList`].
pub fn lex(source: &str, interner: &StringInterner) -> TokenList {
    lex_inner(source, interner, None)
}

/// Lex source code, inserting a code-completion token at `offset`.
pub fn lex_with_completion(source: &str, interner: &StringInterner, offset: u32) -> TokenList {
    lex_inner(source, interner, Some(offset))
}

fn lex_inner(source: &str, interner: &StringInterner, completion: Option<u32>) -> TokenList {
    let mut result = TokenList::with_capacity(source.len() / 4 + 2);
    let mut logos = RawToken::lexer(source);
    let mut prev_end = 0u32;
    let mut completion = completion;

    while let Some(token_result) = logos.next() {
        let span = span_of(logos.span());
        let slice = logos.slice();

        // Completion sentinel goes in at the first boundary past the offset.
        if let Some(offset) = completion {
            if span.start >= offset {
                push_token(
                    &mut result,
                    source,
                    Token::new(TokenKind::CodeComplete, Span::point(offset)),
                    prev_end,
                );
                prev_end = offset;
                completion = None;
            }
        }

        let kind = match token_result {
            Ok(raw) => convert_token(raw, slice, interner),
            Err(()) => TokenKind::Error,
        };
        push_token(&mut result, source, Token::new(kind, span), prev_end);
        prev_end = span.end;
    }

    let eof_pos = u32::try_from(source.len()).unwrap_or(u32::MAX);
    if let Some(offset) = completion {
        push_token(
            &mut result,
            source,
            Token::new(TokenKind::CodeComplete, Span::point(offset.min(eof_pos))),
            prev_end,
        );
    }
    push_token(
        &mut result,
        source,
        Token::new(TokenKind::Eof, Span::point(eof_pos)),
        prev_end,
    );

    result
}

fn span_of(range: std::ops::Range<usize>) -> Span {
    let start = u32::try_from(range.start).unwrap_or(u32::MAX);
    let end = u32::try_from(range.end).unwrap_or(u32::MAX);
    Span::new(start, end)
}

/// Push a token, computing its line-start flag from the trivia gap that
/// precedes it. A token starts a line if the gap back to the previous token
/// contains a newline, or if it is the first token in the buffer.
fn push_token(list: &mut TokenList, source: &str, token: Token, prev_end: u32) {
    let gap_start = prev_end as usize;
    let gap_end = (token.span.start as usize).min(source.len()).max(gap_start);
    let at_line_start =
        list.is_empty() || source[gap_start..gap_end].contains('\n');
    let flags = if at_line_start {
        TokenFlags::AT_LINE_START
    } else {
        TokenFlags::EMPTY
    };
    list.push_with_flags(token, flags);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        let interner = StringInterner::new();
        lex(source, &interner).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn ends_with_eof() {
        let kinds = lex_kinds("");
        assert_eq!(kinds, vec![TokenKind::Eof]);
    }

    #[test]
    fn import_line() {
        let interner = StringInterner::new();
        let tokens = lex("import Foo.Bar", &interner);
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].kind, TokenKind::KwImport);
        assert!(matches!(tokens[1].kind, TokenKind::Ident(_)));
        assert_eq!(tokens[2].kind, TokenKind::Period);
        assert!(matches!(tokens[3].kind, TokenKind::Ident(_)));
        assert_eq!(tokens[4].kind, TokenKind::Eof);
    }

    #[test]
    fn line_start_flags() {
        let interner = StringInterner::new();
        let tokens = lex("var x\nvar y", &interner);
        // var, x, var, y, eof
        assert!(tokens.flags_at(0).has(TokenFlags::AT_LINE_START));
        assert!(!tokens.flags_at(1).has(TokenFlags::AT_LINE_START));
        assert!(tokens.flags_at(2).has(TokenFlags::AT_LINE_START));
        assert!(!tokens.flags_at(3).has(TokenFlags::AT_LINE_START));
    }

    #[test]
    fn comment_gap_counts_as_line_break() {
        let interner = StringInterner::new();
        let tokens = lex("var x // end\nfunc f", &interner);
        // var x func f eof
        assert_eq!(tokens[2].kind, TokenKind::KwFunc);
        assert!(tokens.flags_at(2).has(TokenFlags::AT_LINE_START));
    }

    #[test]
    fn string_interpolation_flag() {
        let interner = StringInterner::new();
        let tokens = lex(r#""\(x)""#, &interner);
        assert!(matches!(
            tokens[0].kind,
            TokenKind::StringLit {
                interpolated: true,
                ..
            }
        ));
        let plain = lex(r#""abc""#, &interner);
        assert!(matches!(
            plain[0].kind,
            TokenKind::StringLit {
                interpolated: false,
                ..
            }
        ));
    }

    #[test]
    fn completion_token_is_inserted_at_boundary() {
        let interner = StringInterner::new();
        let tokens = lex_with_completion("var x", &interner, 4);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TokenKind::CodeComplete));
        // Sentinel precedes the token that starts at/after the offset.
        let idx = kinds
            .iter()
            .position(|k| *k == TokenKind::CodeComplete)
            .unwrap_or_default();
        assert!(matches!(kinds[idx + 1], TokenKind::Ident(_)));
    }

    #[test]
    fn operator_run_keeps_trailing_less() {
        let interner = StringInterner::new();
        let tokens = lex("func ==<T>(a: T)", &interner);
        // func, ==<, T, >, (, a, :, T, ), eof
        assert_eq!(tokens[0].kind, TokenKind::KwFunc);
        match tokens[1].kind {
            TokenKind::Oper(name) => assert_eq!(interner.lookup(name), "==<"),
            other => panic!("expected operator token, got {other:?}"),
        }
    }
}
