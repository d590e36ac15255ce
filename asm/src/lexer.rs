use crate::error::Error;
use crate::token::{Location, Token, TokenKind};

/// Fixed textual macros, substituted verbatim into the source before
/// scanning starts. Plain string replacement, not context-sensitive.
const MACROS: &[(&str, &str)] = &[("FLAGS_LESSEQ", "0"), ("FLAGS_EQUAL", "4")];

/// Letters admitted into a number literal after the leading digit.
/// Permissive on purpose: radix and range checks happen in the encoder.
const NUM_LETTERS: &[char] = &['b', 'x', 'a', 'c', 'd', 'e', 'f'];

/// Apply the macro table to the whole source text.
pub fn preprocess(text: &str) -> String {
    let mut text = text.to_string();
    for (name, value) in MACROS {
        text = text.replace(name, value);
    }
    text
}

/// Single forward pass over the source text, producing the full token
/// sequence up front. Cursor, row and column live on the instance, so
/// nothing persists across runs.
pub struct Lexer {
    file: String,
    text: Vec<char>,
    cursor: usize,
    row: u32,
    col: u32,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(file: &str, text: &str) -> Self {
        Self {
            file: file.to_string(),
            text: preprocess(text).chars().collect(),
            cursor: 0,
            row: 1,
            col: 1,
            tokens: Vec::new(),
        }
    }

    /// The source text as the lexer sees it, after macro substitution.
    /// Token locations refer to this text.
    pub fn source(&self) -> String {
        self.text.iter().collect()
    }

    pub fn lex(mut self) -> Result<Vec<Token>, Error> {
        while let Some(c) = self.peek() {
            match c {
                '.' => self.punct(TokenKind::Dot, c),
                ':' => self.punct(TokenKind::Colon, c),
                ',' => self.punct(TokenKind::Comma, c),
                '[' => self.punct(TokenKind::OBrack, c),
                ']' => self.punct(TokenKind::CBrack, c),
                '#' => self.comment(),
                '"' => self.string()?,
                c if c.is_whitespace() => self.bump(),
                c if c.is_ascii_alphabetic() => self.name(),
                c if c.is_ascii_digit() => self.number(),
                c => {
                    return Err(Error::UnexpectedChar {
                        ch: c,
                        loc: self.location(),
                    })
                }
            }
        }
        Ok(self.tokens)
    }

    fn punct(&mut self, kind: TokenKind, c: char) {
        let loc = self.location();
        self.bump();
        self.tokens.push(Token::new(kind, c.to_string(), loc));
    }

    fn comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn name(&mut self) {
        let loc = self.location();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        self.tokens.push(Token::new(TokenKind::Name, text, loc));
    }

    fn number(&mut self) {
        let loc = self.location();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || NUM_LETTERS.contains(&c) {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        self.tokens.push(Token::new(TokenKind::Num, text, loc));
    }

    fn string(&mut self) -> Result<(), Error> {
        let loc = self.location();
        self.bump(); // opening quote
        let mut text = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
                None => return Err(Error::UnterminatedString { loc }),
            }
        }
        self.tokens.push(Token::new(TokenKind::Str, text, loc));
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.text.get(self.cursor).copied()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            if c == '\n' {
                self.row += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.cursor += 1;
        }
    }

    fn location(&self) -> Location {
        Location::new(&self.file, self.row, self.col)
    }
}
