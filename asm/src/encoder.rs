use std::num::IntErrorKind;

use arch::op::{Mnemonic, Op};
use arch::reg::Reg;

use crate::error::Error;
use crate::symbol::{backpatch, Fixup, Symbols};
use crate::token::{Location, Token, TokenKind};

/// The `mov` left side: `rN` writes the register, `[rN]` writes through
/// it. Either way the operand encodes as the register's index byte.
enum MovDst {
    Direct(Reg),
    Pointer(Reg),
}

impl MovDst {
    fn reg(&self) -> Reg {
        match self {
            MovDst::Direct(r) | MovDst::Pointer(r) => *r,
        }
    }

    fn select(&self, direct: Op, pointer: Op) -> Op {
        match self {
            MovDst::Direct(_) => direct,
            MovDst::Pointer(_) => pointer,
        }
    }
}

/// Consumes the token stream statement by statement, appending bytes to
/// the image and collecting labels and forward references. The byte
/// offset is the image length, so the two cannot drift apart.
pub struct Encoder {
    file: String,
    tokens: Vec<Token>,
    cursor: usize,
    out: Vec<u8>,
    symbols: Symbols,
    fixups: Vec<Fixup>,
}

impl Encoder {
    pub fn new(file: &str, tokens: Vec<Token>) -> Self {
        Self {
            file: file.to_string(),
            tokens,
            cursor: 0,
            out: Vec::new(),
            symbols: Symbols::new(),
            fixups: Vec::new(),
        }
    }

    /// Consume the whole stream. Statements are emitted in source order;
    /// a label's address is the offset of the first byte emitted after
    /// its definition.
    pub fn generate(&mut self) -> Result<(), Error> {
        while let Some(kind) = self.peek().map(|t| t.kind) {
            match kind {
                TokenKind::Dot => self.label()?,
                TokenKind::Inst(m) => self.instruction(m)?,
                _ => {
                    let token = self.advance("a label or an instruction")?;
                    return Err(Error::UnexpectedToken {
                        expected: "a label or an instruction".into(),
                        found: token.kind,
                        loc: token.loc,
                    });
                }
            }
        }
        Ok(())
    }

    /// Backpatch forward references and hand over the finished image
    /// with the frozen symbol table.
    pub fn finish(mut self) -> Result<(Vec<u8>, Symbols), Error> {
        backpatch(&mut self.out, &self.fixups, &self.symbols)?;
        Ok((self.out, self.symbols))
    }

    /// Bytes emitted so far. Forward references are still zero
    /// placeholders until `finish` runs.
    pub fn image(&self) -> &[u8] {
        &self.out
    }

    // ----------------------------------------------------------------
    // Statements

    /// `.` NAME `:` records the name at the current offset; no bytes.
    fn label(&mut self) -> Result<(), Error> {
        self.expect(TokenKind::Dot, "`.`")?;
        let name = self.expect_name()?;
        self.expect(TokenKind::Colon, "`:`")?;
        let at = self.offset(&name.loc)?;
        self.symbols.define(name.text, at, name.loc)
    }

    fn instruction(&mut self, m: Mnemonic) -> Result<(), Error> {
        self.advance("an instruction")?;
        match m {
            Mnemonic::Push => self.reg_form(Op::Push),
            Mnemonic::Pop => self.reg_form(Op::Pop),
            Mnemonic::Call => self.reg_form(Op::Call),
            Mnemonic::Ret => {
                self.emit(Op::Ret);
                Ok(())
            }
            Mnemonic::Cmp => self.cmp(),
            Mnemonic::Flg => self.flg(),
            Mnemonic::Add => self.arith(Op::AddRR, Op::AddRC),
            Mnemonic::Sub => self.arith(Op::SubRR, Op::SubRC),
            Mnemonic::Jnz => self.jnz(),
            Mnemonic::Jmp => self.jmp(),
            Mnemonic::Mov => self.mov(),
        }
    }

    /// push / pop / call: opcode, reg.
    fn reg_form(&mut self, op: Op) -> Result<(), Error> {
        let reg = self.expect_register()?;
        self.emit(op);
        self.emit_reg(reg);
        Ok(())
    }

    /// cmp: opcode, reg, reg.
    fn cmp(&mut self) -> Result<(), Error> {
        let a = self.expect_register()?;
        self.expect(TokenKind::Comma, "`,`")?;
        let b = self.expect_register()?;
        self.emit(Op::Cmp);
        self.emit_reg(a);
        self.emit_reg(b);
        Ok(())
    }

    /// flg: opcode, reg, one literal byte.
    fn flg(&mut self) -> Result<(), Error> {
        let reg = self.expect_register()?;
        self.expect(TokenKind::Comma, "`,`")?;
        let num = self.expect_number()?;
        let value = parse_number(&num)?;
        if value > u8::MAX as u16 {
            return Err(Error::ValueTooLarge {
                text: num.text,
                max: u8::MAX as u32,
                loc: num.loc,
            });
        }
        self.emit(Op::Flg);
        self.emit_reg(reg);
        self.emit_byte(value as u8);
        Ok(())
    }

    /// add / sub: register operand selects the 3-byte reg,reg form, a
    /// numeric literal the 4-byte reg,imm16 form.
    fn arith(&mut self, reg_op: Op, imm_op: Op) -> Result<(), Error> {
        let a = self.expect_register()?;
        self.expect(TokenKind::Comma, "`,`")?;
        let operand = self.advance("a register or number literal")?;
        match operand.kind {
            TokenKind::Reg(b) => {
                self.emit(reg_op);
                self.emit_reg(a);
                self.emit_reg(b);
            }
            TokenKind::Num => {
                let value = parse_number(&operand)?;
                self.emit(imm_op);
                self.emit_reg(a);
                self.emit_u16(value);
            }
            found => {
                return Err(Error::ExpectedOperand {
                    expected: "a register or number literal",
                    found,
                    loc: operand.loc,
                })
            }
        }
        Ok(())
    }

    /// jnz: opcode, reg, addr16.
    fn jnz(&mut self) -> Result<(), Error> {
        let reg = self.expect_register()?;
        self.expect(TokenKind::Comma, "`,`")?;
        self.emit(Op::Jnz);
        self.emit_reg(reg);
        self.target()
    }

    /// jmp: opcode, addr16.
    fn jmp(&mut self) -> Result<(), Error> {
        self.emit(Op::Jmp);
        self.target()
    }

    /// mov left, right. Legal combinations:
    ///   [rD], rS   -> mov_rp_r      rD, rS   -> mov_r_r
    ///   [rD], sym  -> mov_rp_m      rD, sym  -> mov_r_m
    ///   [rD], imm  -> mov_rp_c      rD, imm  -> mov_r_c
    /// A pointer on the right is never encodable.
    fn mov(&mut self) -> Result<(), Error> {
        let dst = self.mov_dst()?;
        self.expect(TokenKind::Comma, "`,`")?;
        let src = self.advance("a register, symbol or number literal")?;
        match src.kind {
            TokenKind::Reg(b) => {
                self.emit(dst.select(Op::MovRR, Op::MovRpR));
                self.emit_reg(dst.reg());
                self.emit_reg(b);
            }
            TokenKind::OBrack => {
                self.expect_register()?;
                self.expect(TokenKind::CBrack, "`]`")?;
                let detail = match dst {
                    MovDst::Direct(_) => "register destination, pointer source",
                    MovDst::Pointer(_) => "pointer destination, pointer source",
                };
                return Err(Error::IllegalMove {
                    detail,
                    loc: src.loc,
                });
            }
            TokenKind::Name => {
                self.emit(dst.select(Op::MovRM, Op::MovRpM));
                self.emit_reg(dst.reg());
                self.emit_symbol(src)?;
            }
            TokenKind::Num => {
                let value = parse_number(&src)?;
                self.emit(dst.select(Op::MovRC, Op::MovRpC));
                self.emit_reg(dst.reg());
                self.emit_u16(value);
            }
            found => {
                return Err(Error::ExpectedOperand {
                    expected: "a register, symbol or number literal",
                    found,
                    loc: src.loc,
                })
            }
        }
        Ok(())
    }

    fn mov_dst(&mut self) -> Result<MovDst, Error> {
        let token = self.advance("a register or `[`")?;
        match token.kind {
            TokenKind::Reg(reg) => Ok(MovDst::Direct(reg)),
            TokenKind::OBrack => {
                let reg = self.expect_register()?;
                self.expect(TokenKind::CBrack, "`]`")?;
                Ok(MovDst::Pointer(reg))
            }
            found => Err(Error::ExpectedOperand {
                expected: "a register or `[`",
                found,
                loc: token.loc,
            }),
        }
    }

    // ----------------------------------------------------------------
    // Operand resolution

    /// Jump target: a symbol (resolved now or backpatched later) or a
    /// numeric literal. Two big-endian bytes either way.
    fn target(&mut self) -> Result<(), Error> {
        let token = self.advance("a symbol or number literal")?;
        match token.kind {
            TokenKind::Name => self.emit_symbol(token),
            TokenKind::Num => {
                let value = parse_number(&token)?;
                self.emit_u16(value);
                Ok(())
            }
            found => Err(Error::ExpectedOperand {
                expected: "a symbol or number literal",
                found,
                loc: token.loc,
            }),
        }
    }

    /// Symbol use: already defined resolves immediately, otherwise a
    /// zero placeholder goes out and the backpatch pass fills it in.
    fn emit_symbol(&mut self, name: Token) -> Result<(), Error> {
        match self.symbols.get(&name.text) {
            Some(value) => self.emit_u16(value),
            None => {
                let at = self.offset(&name.loc)? as usize;
                self.emit_u16(0);
                self.fixups.push(Fixup {
                    name: name.text,
                    at,
                    loc: name.loc,
                });
            }
        }
        Ok(())
    }

    // ----------------------------------------------------------------
    // Emission

    fn emit(&mut self, op: Op) {
        self.out.push(op.into());
    }

    fn emit_reg(&mut self, reg: Reg) {
        self.out.push(reg.into());
    }

    fn emit_byte(&mut self, byte: u8) {
        self.out.push(byte);
    }

    fn emit_u16(&mut self, value: u16) {
        self.out.extend_from_slice(&value.to_be_bytes());
    }

    /// Label offsets and placeholder positions must fit the 16-bit
    /// address space.
    fn offset(&self, loc: &Location) -> Result<u16, Error> {
        u16::try_from(self.out.len()).map_err(|_| Error::ImageTooLarge { loc: loc.clone() })
    }

    // ----------------------------------------------------------------
    // Cursor

    /// Statement-boundary end of input is `None`; running out mid
    /// statement goes through `advance` and is an error.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self, expected: &str) -> Result<Token, Error> {
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                Ok(token.clone())
            }
            None => Err(Error::UnexpectedEof {
                expected: expected.to_string(),
                loc: self.last_location(),
            }),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, Error> {
        let token = self.advance(expected)?;
        if token.kind != kind {
            return Err(Error::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind,
                loc: token.loc,
            });
        }
        Ok(token)
    }

    fn expect_name(&mut self) -> Result<Token, Error> {
        let token = self.advance("a name")?;
        match token.kind {
            TokenKind::Name => Ok(token),
            found => Err(Error::UnexpectedToken {
                expected: "a name".into(),
                found,
                loc: token.loc,
            }),
        }
    }

    fn expect_register(&mut self) -> Result<Reg, Error> {
        let token = self.advance("a register")?;
        match token.kind {
            TokenKind::Reg(reg) => Ok(reg),
            found => Err(Error::ExpectedRegister {
                found,
                loc: token.loc,
            }),
        }
    }

    fn expect_number(&mut self) -> Result<Token, Error> {
        let token = self.advance("a number literal")?;
        match token.kind {
            TokenKind::Num => Ok(token),
            found => Err(Error::UnexpectedToken {
                expected: "a number literal".into(),
                found,
                loc: token.loc,
            }),
        }
    }

    fn last_location(&self) -> Location {
        match self.tokens.last() {
            Some(token) => token.loc.clone(),
            None => Location::new(&self.file, 1, 1),
        }
    }
}

/// Radix from the prefix: `0x` hex, `0b` binary, bare digits decimal.
/// The lexer admits any digit/letter run, so malformed and oversized
/// literals die here, at the literal's location.
pub fn parse_number(token: &Token) -> Result<u16, Error> {
    let text = token.text.as_str();
    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = text.strip_prefix("0b") {
        (bin, 2)
    } else {
        (text, 10)
    };
    match u16::from_str_radix(digits, radix) {
        Ok(value) => Ok(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(Error::ValueTooLarge {
            text: token.text.clone(),
            max: u16::MAX as u32,
            loc: token.loc.clone(),
        }),
        Err(_) => Err(Error::MalformedNumber {
            text: token.text.clone(),
            loc: token.loc.clone(),
        }),
    }
}
