use shisa_isa::isa::{Reg, FIRST_WRITABLE_REG, NREGS};

use std::io::{self, Write};
use std::ops::Range;

/// The CPU register file.
///
/// `r0` and `r1` are hardwired to the constants 0 and 1. The encoding has no
/// immediate field, so the two low registers stand in for the constants a
/// program builds every other value from. Writes to them are dropped here,
/// in the file itself, which also spares the CALL/RET register spill from
/// special-casing their restoration.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct RegisterFile {
    regs: [Reg; NREGS],
}

impl RegisterFile {
    pub fn new() -> RegisterFile {
        let mut regs = [0; NREGS];
        regs[1] = 1;

        RegisterFile { regs }
    }

    pub fn read(&self, r: usize) -> Reg {
        self.regs[r]
    }

    /// Write `data` into register `r`. A no-op for `r0` and `r1`.
    pub fn write(&mut self, r: usize, data: Reg) {
        if r != 0 && r != 1 {
            self.regs[r] = data;
        }
    }

    /// Indices of the writable registers, in spill order. Reverse it for
    /// the restore order.
    pub fn writable() -> Range<usize> {
        FIRST_WRITABLE_REG..NREGS
    }

    pub fn dump(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Register file dump")?;
        for (number, reg) in self.regs.iter().enumerate() {
            writeln!(out, "r{:<2} = {:#06x}", number, reg)?;
        }

        Ok(())
    }
}

impl Default for RegisterFile {
    fn default() -> RegisterFile {
        RegisterFile::new()
    }
}
