use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

/// The sixteen machine registers. `r13`-`r15` double as the stack
/// pointer, stack frame and return value registers; both spellings are
/// accepted, the `rN` form is canonical. Matching is exact text, so `R0`
/// is a plain name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Reg {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    #[strum(to_string = "r13", serialize = "sp")]
    R13,
    #[strum(to_string = "r14", serialize = "sf")]
    R14,
    #[strum(to_string = "r15", serialize = "rv")]
    R15,
}

impl Reg {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    pub fn index(self) -> u8 {
        self.into()
    }
}
