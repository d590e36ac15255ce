use std::fmt;

use arch::op::Mnemonic;
use arch::reg::Reg;

/// Source position, 1-indexed for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub row: u32,
    pub col: u32,
}

impl Location {
    pub fn new(file: &str, row: u32, col: u32) -> Self {
        Self {
            file: file.to_string(),
            row,
            col,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.row, self.col)
    }
}

/// What a token is allowed to do is its variant: registers and
/// instructions carry their table entry instead of relying on a numeric
/// kind range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    Dot,
    Colon,
    Comma,
    OBrack,
    CBrack,
    Str,
    Num,
    Inst(Mnemonic),
    Reg(Reg),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Name => f.write_str("name"),
            TokenKind::Dot => f.write_str("`.`"),
            TokenKind::Colon => f.write_str("`:`"),
            TokenKind::Comma => f.write_str("`,`"),
            TokenKind::OBrack => f.write_str("`[`"),
            TokenKind::CBrack => f.write_str("`]`"),
            TokenKind::Str => f.write_str("string literal"),
            TokenKind::Num => f.write_str("number literal"),
            TokenKind::Inst(m) => write!(f, "instruction `{m}`"),
            TokenKind::Reg(r) => write!(f, "register `{r}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub loc: Location,
}

impl Token {
    /// A NAME whose text matches a reserved word becomes that word's
    /// token. The lookup happens once, here.
    pub fn new(kind: TokenKind, text: String, loc: Location) -> Self {
        let kind = match kind {
            TokenKind::Name => reserved(&text).unwrap_or(TokenKind::Name),
            other => other,
        };
        Self { kind, text, loc }
    }

    pub fn is_register(&self) -> bool {
        matches!(self.kind, TokenKind::Reg(_))
    }

    pub fn is_instruction(&self) -> bool {
        matches!(self.kind, TokenKind::Inst(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {} \"{}\"", self.loc, self.kind, self.text)
    }
}

/// Reserved-word table. Registers and mnemonics are disjoint sets, both
/// matched on exact text.
pub fn reserved(text: &str) -> Option<TokenKind> {
    if let Some(reg) = Reg::parse(text) {
        return Some(TokenKind::Reg(reg));
    }
    if let Some(m) = Mnemonic::parse(text) {
        return Some(TokenKind::Inst(m));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::new("test.s", 1, 1)
    }

    #[test]
    fn names_reclassify_to_reserved_words() {
        let t = Token::new(TokenKind::Name, "mov".into(), loc());
        assert_eq!(t.kind, TokenKind::Inst(Mnemonic::Mov));
        assert!(t.is_instruction());
        assert!(!t.is_register());

        let t = Token::new(TokenKind::Name, "sp".into(), loc());
        assert_eq!(t.kind, TokenKind::Reg(Reg::R13));
        assert!(t.is_register());

        let t = Token::new(TokenKind::Name, "loop".into(), loc());
        assert_eq!(t.kind, TokenKind::Name);
    }

    #[test]
    fn reclassification_is_exact_text() {
        let t = Token::new(TokenKind::Name, "Mov".into(), loc());
        assert_eq!(t.kind, TokenKind::Name);
        let t = Token::new(TokenKind::Name, "R0".into(), loc());
        assert_eq!(t.kind, TokenKind::Name);
    }

    #[test]
    fn non_names_keep_their_kind() {
        // "mov" inside a string literal stays a string literal
        let t = Token::new(TokenKind::Str, "mov".into(), loc());
        assert_eq!(t.kind, TokenKind::Str);
    }

    #[test]
    fn display_shows_location_kind_text() {
        let t = Token::new(TokenKind::Name, "r3".into(), Location::new("a.s", 2, 5));
        assert_eq!(t.to_string(), "a.s:2:5: register `r3` \"r3\"");
    }
}
