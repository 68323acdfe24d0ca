use shisa_isa::isa::{Addr, Opcode, RawInst};
use thiserror::Error;

/// The closed set of conditions that stop the simulator.
///
/// `ProgramEnd` is the normal termination signal, raised when execution
/// falls past the last instruction; the step driver converts it into a
/// successful exit. Everything else propagates out of the step loop.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    #[error("program end")]
    ProgramEnd,

    /// A jump targeted an address below the first instruction.
    #[error("bad jump target {0:#06x}: below program start")]
    BadPc(Addr),

    #[error("stack overflow")]
    StackOverflow,

    #[error("stack underflow")]
    StackUnderflow,

    /// An instruction word whose opcode field does not decode.
    ///
    /// Unreachable from the stepper with the 16-bit encoding, where every
    /// nibble names an opcode; kept for harnesses that validate hand-built
    /// words.
    #[error("invalid instruction {0:#06x}")]
    InvalidInst(RawInst),

    /// A validating harness met an instruction it did not expect.
    #[error("unexpected {got:?} instruction, expected one of {expected:?}")]
    UnexpectedInst {
        got: Opcode,
        expected: &'static [Opcode],
    },
}
