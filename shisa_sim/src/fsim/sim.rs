use super::cpu::Cpu;
use super::error::Error;
use super::Result;

/// The stepping capability shared by the four execution engines.
///
/// The engines differ only in how `execute_one` selects a handler; the CPU
/// state and the handler semantics are common, so any valid program runs
/// identically on all of them. `execute_all` is the step driver: it treats
/// `ProgramEnd` as normal termination and propagates every other failure.
pub trait Simulator {
    /// Execute exactly one instruction.
    fn execute_one(&mut self) -> Result<()>;

    /// The CPU owned by this engine, for inspecting registers and memory.
    fn state(&self) -> &Cpu;

    /// Step until the program ends or a fault surfaces.
    fn execute_all(&mut self) -> Result<()> {
        loop {
            match self.execute_one() {
                Ok(()) => {}
                Err(Error::ProgramEnd) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }
}
