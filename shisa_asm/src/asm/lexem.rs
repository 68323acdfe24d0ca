use shisa_isa::isa::Opcode;

/// One token with the source line it came from.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Lexem {
    pub kind: LexemKind,
    pub line: usize,
}

impl Lexem {
    pub fn new(kind: LexemKind, line: usize) -> Lexem {
        Lexem { kind, line }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum LexemKind {
    /// An opcode mnemonic.
    Op(Opcode),

    /// A register name, `r0` through `r15`.
    Reg(usize),

    /// A jump label, `[A-Z]+`.
    Mark(String),

    Colon,

    /// Statement terminator.
    Newline,
}
