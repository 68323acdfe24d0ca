mod binary;
mod inst;
mod module;
mod opcode;

pub use binary::Binary;
pub use inst::{Decoded, Inst};
pub use module::IsaModule;
pub use opcode::Opcode;

use std::mem::size_of;

/// Width of a general register.
pub type Reg = u16;

/// Width of a memory address.
pub type Addr = u16;

/// The smallest addressable unit of RAM.
pub type Cell = u8;

/// One word of the binary's data image.
pub type Data = u16;

/// One encoded instruction word.
pub type RawInst = u16;

/// Number of registers in the register file.
pub const NREGS: usize = 16;

/// `r0` and `r1` are hardwired constants; everything from here up is writable.
pub const FIRST_WRITABLE_REG: usize = 2;

/// Maximum stack depth, in cells, above the loaded binary image.
pub const STACK_OFFSET: Addr = 0x1000;

/// Cells needed to hold a value of `width` bytes, rounded up.
const fn cells_per(width: usize) -> usize {
    (width + size_of::<Cell>() - 1) / size_of::<Cell>()
}

/// RAM cells occupied by one register-sized word.
pub const CELLS_PER_REG: usize = cells_per(size_of::<Reg>());

/// RAM cells occupied by one encoded instruction.
pub const CELLS_PER_INST: usize = cells_per(size_of::<RawInst>());

/// RAM cells occupied by one data word.
pub const CELLS_PER_DATA: usize = cells_per(size_of::<Data>());
