//! Logos-derived raw tokenizer.
//!
//! Raw tokens carry no payloads; `convert` interns identifier text and
//! decodes literals. Whitespace and comments are skipped here, but the gaps
//! they leave are inspected later to compute line-start flags.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum RawToken {
    #[regex(r"//[^\n]*", logos::skip, priority = 10)]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip, priority = 10)]
    BlockComment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    /// Operator characters cluster into a single token; exact spellings
    /// (`=`, `->`, `.`) are remapped during conversion.
    #[regex(r"[/=\-+*%<>!&|^~.?]+")]
    Oper,

    #[regex(r"0x[0-9A-Fa-f][0-9A-Fa-f_]*")]
    #[regex(r"[0-9][0-9_]*")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*")]
    Float,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token("@")]
    At,
}

#[cfg(test)]
mod tests {
    use super::RawToken;
    use logos::Logos;

    fn kinds(source: &str) -> Vec<RawToken> {
        RawToken::lexer(source).flatten().collect()
    }

    #[test]
    fn operator_characters_cluster() {
        assert_eq!(kinds("==<"), vec![RawToken::Oper]);
        assert_eq!(kinds("a <*> b"), vec![
            RawToken::Ident,
            RawToken::Oper,
            RawToken::Ident
        ]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("a // trailing\nb"), vec![
            RawToken::Ident,
            RawToken::Ident
        ]);
        assert_eq!(kinds("a /* x ** y */ b"), vec![
            RawToken::Ident,
            RawToken::Ident
        ]);
    }

    #[test]
    fn float_beats_int_dot() {
        assert_eq!(kinds("1.5"), vec![RawToken::Float]);
        assert_eq!(kinds("1 .5"), vec![
            RawToken::Int,
            RawToken::Oper,
            RawToken::Int
        ]);
    }
}
