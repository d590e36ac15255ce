use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumString};

/// Opcode byte values. Declaration order is the encoding contract: the
/// disassembler reads images with this exact numbering, so variants must
/// never be reordered or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, Display)]
#[repr(u8)]
pub enum Op {
    #[strum(serialize = "push")]
    Push, // 0
    #[strum(serialize = "mov_rp_r")]
    MovRpR, // 1
    #[strum(serialize = "mov_rp_m")]
    MovRpM, // 2
    #[strum(serialize = "mov_rp_c")]
    MovRpC, // 3
    #[strum(serialize = "mov_r_r")]
    MovRR, // 4
    #[strum(serialize = "mov_r_m")]
    MovRM, // 5
    #[strum(serialize = "mov_r_c")]
    MovRC, // 6
    #[strum(serialize = "mov_r_rp")]
    MovRRp, // 7, in the numbering contract but never emitted by the assembler
    #[strum(serialize = "sub_r_r")]
    SubRR, // 8
    #[strum(serialize = "sub_r_c")]
    SubRC, // 9
    #[strum(serialize = "add_r_r")]
    AddRR, // 10
    #[strum(serialize = "add_r_c")]
    AddRC, // 11
    #[strum(serialize = "cmp")]
    Cmp, // 12
    #[strum(serialize = "flg")]
    Flg, // 13
    #[strum(serialize = "jnz")]
    Jnz, // 14
    #[strum(serialize = "jmp")]
    Jmp, // 15
    #[strum(serialize = "call")]
    Call, // 16
    #[strum(serialize = "pop")]
    Pop, // 17
    #[strum(serialize = "ret")]
    Ret, // 18
}

/// Reserved instruction words. Matching is exact text: `MOV` is a plain
/// name, not a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mnemonic {
    Mov,
    Push,
    Pop,
    Ret,
    Add,
    Sub,
    Cmp,
    Flg,
    Jnz,
    Jmp,
    Call,
}

impl Mnemonic {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_values() {
        assert_eq!(u8::from(Op::Push), 0);
        assert_eq!(u8::from(Op::MovRpR), 1);
        assert_eq!(u8::from(Op::MovRC), 6);
        assert_eq!(u8::from(Op::MovRRp), 7);
        assert_eq!(u8::from(Op::SubRR), 8);
        assert_eq!(u8::from(Op::AddRC), 11);
        assert_eq!(u8::from(Op::Flg), 13);
        assert_eq!(u8::from(Op::Jmp), 15);
        assert_eq!(u8::from(Op::Pop), 17);
        assert_eq!(u8::from(Op::Ret), 18);
    }

    #[test]
    fn opcode_roundtrip() {
        assert_eq!(Op::try_from(0u8).ok(), Some(Op::Push));
        assert_eq!(Op::try_from(18u8).ok(), Some(Op::Ret));
        assert!(Op::try_from(19u8).is_err());
    }

    #[test]
    fn mnemonic_lookup() {
        assert_eq!(Mnemonic::parse("mov"), Some(Mnemonic::Mov));
        assert_eq!(Mnemonic::parse("jnz"), Some(Mnemonic::Jnz));
        assert_eq!(Mnemonic::parse("ret"), Some(Mnemonic::Ret));
        assert_eq!(Mnemonic::parse("MOV"), None);
        assert_eq!(Mnemonic::parse("movz"), None);
        assert_eq!(Mnemonic::parse(""), None);
    }

    #[test]
    fn contract_names() {
        assert_eq!(Op::MovRpM.to_string(), "mov_rp_m");
        assert_eq!(Op::AddRC.to_string(), "add_r_c");
        assert_eq!(Op::Ret.to_string(), "ret");
    }
}
