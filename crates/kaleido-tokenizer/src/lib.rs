mod cursor;
mod escape;

use std::str::FromStr;

use cursor::{Cursor, EOF_CHAR};
pub use escape::unescape;
use text_size::{TextRange, TextSize};

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    COLON,
    SEMICOLON,
    COMMA,
    STAR,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    EQ,
    DOT,
    SLASH,
    BACKSLASH,

    NAME,
    NUMBER,
    STRING,

    UNKNOWN,
    EOF,
}

use TokenKind::*;

/// A classified lexeme. The range points into the text the tokenizer was
/// created with; for strings it covers the contents between the quotes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.range]
    }

    pub fn is(&self, source: &str, text: &str) -> bool {
        self.text(source) == text
    }

    pub fn number(&self, source: &str) -> Option<f64> {
        self.text(source).parse().ok()
    }

    /// Reads the whole token as an integer; `1.5` is not one.
    pub fn integer<T: FromStr>(&self, source: &str) -> Option<T> {
        self.text(source).parse().ok()
    }
}

pub struct Tokenizer<'src> {
    text: &'src str,
    cursor: Cursor<'src>,
}

impl<'src> Tokenizer<'src> {
    pub fn new(text: &'src str) -> Self {
        Self { text, cursor: Cursor::new(text) }
    }

    pub fn text(&self) -> &'src str {
        self.text
    }

    fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let len = self.cursor.pos_within_token();
        TextRange::at(self.offset() - len, len)
    }

    pub fn next_token(&mut self) -> Token {
        self.trivia();

        if self.cursor.is_eof() {
            return Token { kind: EOF, range: TextRange::empty(self.offset()) };
        }

        let kind = match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            ':' => COLON,
            ';' => SEMICOLON,
            ',' => COMMA,
            '*' => STAR,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            '=' => EQ,
            '.' => DOT,
            '/' => SLASH,
            '\\' => BACKSLASH,
            '"' => return self.string(),
            'A'..='Z' | 'a'..='z' => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                NAME
            }
            '0'..='9' => self.number(),
            '-' if self.cursor.peek().is_ascii_digit() => self.number(),
            _ => UNKNOWN,
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();
        Token { kind, range }
    }

    /// Pulls the next token and reports whether it has the given kind.
    pub fn require(&mut self, kind: TokenKind) -> bool {
        self.next_token().kind == kind
    }

    fn trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                }
                '/' if self.cursor.second() == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    while !self.cursor.is_eof()
                        && !(self.cursor.peek() == '*' && self.cursor.second() == '/')
                    {
                        self.cursor.advance();
                    }
                    // An unterminated comment runs to the end of the text.
                    if self.cursor.peek() == '*' {
                        self.cursor.advance();
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }

        self.cursor.reset_pos_within_token();
    }

    fn string(&mut self) -> Token {
        self.cursor.reset_pos_within_token();

        while !matches!(self.cursor.peek(), '"' | EOF_CHAR) {
            if self.cursor.peek() == '\\' && self.cursor.second() != EOF_CHAR {
                self.cursor.advance();
            }
            self.cursor.advance();
        }

        let range = self.range();
        if self.cursor.peek() == '"' {
            self.cursor.advance();
        }
        self.cursor.reset_pos_within_token();

        Token { kind: STRING, range }
    }

    fn number(&mut self) -> TokenKind {
        self.cursor.advance_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == '.' {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }
        NUMBER
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != EOF).then_some(token)
    }
}
