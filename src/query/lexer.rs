use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // Bare word, keyword or identifier
    Value,
    ListStart, // (
    ListEnd,   // )
}

/// A lexical unit and the byte offset where it starts in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Box<str>,
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: &str, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Whether this is a `Value` token spelling exactly `keyword`.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Value && &*self.text == keyword
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Separator,
    ListOpen,
    ListClose,
    Content,
}

fn classify(c: char) -> CharClass {
    match c {
        '(' => CharClass::ListOpen,
        ')' => CharClass::ListClose,
        ',' => CharClass::Separator,
        c if c.is_whitespace() => CharClass::Separator,
        _ => CharClass::Content,
    }
}

/// Splits command text into `Value`, `ListStart` and `ListEnd` tokens.
///
/// Whitespace and commas only separate words. Parentheses separate words and
/// are tokens themselves. Every other character belongs to the current word,
/// so keywords, names and numbers all come out as `Value`.
pub struct Lexer {
    input: Box<str>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn tokenize(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        // start offset of the word being accumulated
        let mut pending: Option<usize> = None;
        for (pos, c) in self.input.char_indices() {
            match classify(c) {
                CharClass::Content => {
                    pending.get_or_insert(pos);
                }
                class => {
                    self.flush(&mut pending, pos, &mut tokens);
                    match class {
                        CharClass::ListOpen => {
                            tokens.push(Token::new(TokenKind::ListStart, "(", pos))
                        }
                        CharClass::ListClose => {
                            tokens.push(Token::new(TokenKind::ListEnd, ")", pos))
                        }
                        _ => {}
                    }
                }
            }
        }
        self.flush(&mut pending, self.input.len(), &mut tokens);
        tokens
    }

    fn flush(&self, pending: &mut Option<usize>, end: usize, tokens: &mut Vec<Token>) {
        if let Some(start) = pending.take() {
            tokens.push(Token::new(TokenKind::Value, &self.input[start..end], start));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_text(input: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| (t.kind, t.text.to_string()))
            .collect()
    }

    fn value(text: &str) -> (TokenKind, String) {
        (TokenKind::Value, text.to_string())
    }

    #[test]
    fn test_tokenize_create_table() {
        assert_eq!(
            kinds_and_text("CREATE TABLE t (a,b)"),
            vec![
                value("CREATE"),
                value("TABLE"),
                value("t"),
                (TokenKind::ListStart, "(".to_string()),
                value("a"),
                value("b"),
                (TokenKind::ListEnd, ")".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_flushes_at_end_of_input() {
        assert_eq!(
            kinds_and_text("CREATE TABLE peoples"),
            vec![value("CREATE"), value("TABLE"), value("peoples")]
        );
    }

    #[test]
    fn test_tokenize_close_paren_flushes_word() {
        let tokens = Lexer::new("(id,name)").tokenize();
        let texts: Vec<&str> = tokens.iter().map(|t| &*t.text).collect();
        assert_eq!(texts, vec!["(", "id", "name", ")"]);
        assert_eq!(tokens[2].kind, TokenKind::Value);
        assert_eq!(tokens[3].kind, TokenKind::ListEnd);
    }

    #[test]
    fn test_tokenize_open_paren_without_space() {
        assert_eq!(
            kinds_and_text("t(a)"),
            vec![
                value("t"),
                (TokenKind::ListStart, "(".to_string()),
                value("a"),
                (TokenKind::ListEnd, ")".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_collapses_separators() {
        assert_eq!(
            kinds_and_text("  a ,, \t b\n"),
            vec![value("a"), value("b")]
        );
    }

    #[test]
    fn test_tokenize_keeps_unknown_characters_in_word() {
        assert_eq!(
            kinds_and_text("SELECT * FROM 'John'"),
            vec![value("SELECT"), value("*"), value("FROM"), value("'John'")]
        );
    }

    #[test]
    fn test_tokenize_positions() {
        let tokens = Lexer::new("CREATE TABLE t (a, b)").tokenize();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 7, 13, 15, 16, 19, 20]);
    }

    #[test]
    fn test_tokenize_multibyte_positions() {
        let tokens = Lexer::new("é (ü)").tokenize();
        assert_eq!(&*tokens[0].text, "é");
        assert_eq!(tokens[1].position, 3);
        assert_eq!(&*tokens[2].text, "ü");
        assert_eq!(tokens[2].position, 4);
        assert_eq!(tokens[3].position, 6);
    }

    #[test]
    fn test_tokenize_blank_input() {
        assert!(Lexer::new("").tokenize().is_empty());
        assert!(Lexer::new(" , ").tokenize().is_empty());
    }

    #[test]
    fn test_is_keyword() {
        let tokens = Lexer::new("CREATE create (").tokenize();
        assert!(tokens[0].is_keyword("CREATE"));
        assert!(!tokens[1].is_keyword("CREATE"));
        assert!(!tokens[2].is_keyword("("));
    }
}
