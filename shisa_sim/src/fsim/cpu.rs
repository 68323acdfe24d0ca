use shisa_isa::isa::{
    Addr, Binary, Cell, RawInst, Reg, CELLS_PER_INST, CELLS_PER_REG, STACK_OFFSET,
};

use std::io::{self, Write};

use super::error::Error;
use super::ram::RamController;
use super::register_file::RegisterFile;
use super::Result;

/// The processor state: register file, RAM, program counter, stack pointer.
///
/// A `Cpu` starts empty. `load_bin` installs a binary exactly once, leaving
/// PC at the first instruction and SP at the empty stack; a `Cpu` is not
/// reused across binaries. The stack grows upward from `bin_end`, at most
/// `STACK_OFFSET` cells deep.
pub struct Cpu {
    regs: RegisterFile,
    ram: RamController,

    /// Program counter; always within `[data_end, bin_end]`.
    pc: Addr,

    /// Stack pointer; points one past the top of the stack.
    sp: Addr,

    /// True once PC sits at `bin_end`; the next fetch reports `ProgramEnd`.
    reach_end: bool,
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu {
            regs: RegisterFile::new(),
            ram: RamController::new(),

            pc: 0,
            sp: 0,

            reach_end: false,
        }
    }

    /// Install `bin` in memory and point PC at its first instruction.
    pub fn load_bin(&mut self, bin: &Binary) {
        self.ram.load_bin(bin);
        self.pc = self.ram.program_start();
        self.sp = self.ram.bin_end();
        self.reach_end = self.pc == self.ram.bin_end();
    }

    pub fn pc(&self) -> Addr {
        self.pc
    }

    pub fn sp(&self) -> Addr {
        self.sp
    }

    pub fn reach_end(&self) -> bool {
        self.reach_end
    }

    pub fn program_start(&self) -> Addr {
        self.ram.program_start()
    }

    pub fn program_end(&self) -> Addr {
        self.ram.program_end()
    }

    pub fn bin_end(&self) -> Addr {
        self.ram.bin_end()
    }

    pub fn read_reg(&self, r: usize) -> Reg {
        self.regs.read(r)
    }

    pub fn write_reg(&mut self, r: usize, data: Reg) {
        self.regs.write(r, data);
    }

    pub fn read_from_ram(&self, addr: Addr) -> Cell {
        self.ram.read(addr)
    }

    pub fn write_to_ram(&mut self, addr: Addr, data: Cell) {
        self.ram.write(addr, data);
    }

    /// Advance PC by one instruction. Reaching `bin_end` is fine (the next
    /// fetch terminates); going past it restores PC and raises.
    pub fn pc_increment(&mut self) -> Result<()> {
        let next = self
            .pc
            .checked_add(CELLS_PER_INST as Addr)
            .ok_or(Error::ProgramEnd)?;
        if next > self.ram.bin_end() {
            return Err(Error::ProgramEnd);
        }

        self.pc = next;
        self.reach_end = next == self.ram.bin_end();

        Ok(())
    }

    /// Point PC at `addr`. Past `bin_end` is `ProgramEnd`; below the first
    /// instruction is `BadPc`.
    pub fn set_pc(&mut self, addr: Addr) -> Result<()> {
        if addr > self.ram.bin_end() {
            return Err(Error::ProgramEnd);
        }
        if addr < self.ram.program_start() {
            return Err(Error::BadPc(addr));
        }

        self.pc = addr;
        self.reach_end = addr == self.ram.bin_end();

        Ok(())
    }

    /// Soft halt: park PC on `bin_end` so the next fetch terminates the
    /// program without crashing the host. Used by faulting instructions.
    pub fn set_pc_to_end(&mut self) {
        self.pc = self.ram.bin_end();
        self.reach_end = true;
    }

    /// Read the instruction word at PC and advance past it.
    pub fn fetch_next(&mut self) -> Result<RawInst> {
        if self.reach_end {
            return Err(Error::ProgramEnd);
        }

        let mut inst: RawInst = 0;
        for i in 0..CELLS_PER_INST {
            inst = inst << Cell::BITS | RawInst::from(self.ram.read(self.pc + i as Addr));
        }

        self.pc_increment()?;
        Ok(inst)
    }

    /// Move SP up by `n` cells; `StackOverflow` leaves it unchanged.
    pub fn sp_increment_by(&mut self, n: Addr) -> Result<()> {
        let next = self.sp as usize + n as usize;
        if next > self.ram.bin_end() as usize + STACK_OFFSET as usize {
            return Err(Error::StackOverflow);
        }

        self.sp = next as Addr;
        Ok(())
    }

    /// Move SP down by `n` cells; `StackUnderflow` leaves it unchanged.
    pub fn sp_decrement_by(&mut self, n: Addr) -> Result<()> {
        let next = self.sp.checked_sub(n).ok_or(Error::StackUnderflow)?;
        if next < self.ram.bin_end() {
            return Err(Error::StackUnderflow);
        }

        self.sp = next;
        Ok(())
    }

    pub fn sp_increment(&mut self) -> Result<()> {
        self.sp_increment_by(1)
    }

    pub fn sp_decrement(&mut self) -> Result<()> {
        self.sp_decrement_by(1)
    }

    pub fn sp_reg_increment(&mut self) -> Result<()> {
        self.sp_increment_by(CELLS_PER_REG as Addr)
    }

    pub fn sp_reg_decrement(&mut self) -> Result<()> {
        self.sp_decrement_by(CELLS_PER_REG as Addr)
    }

    /// Assemble the cells starting at `addr` into a word, most significant
    /// cell first, mirroring the loader's packing.
    pub fn read_word_from_ram(&self, addr: Addr) -> Reg {
        let mut word: Reg = 0;
        for i in 0..CELLS_PER_REG {
            word = word << Cell::BITS | Reg::from(self.ram.read(addr.wrapping_add(i as Addr)));
        }

        word
    }

    /// Scatter `data` into the cells starting at `addr`, most significant
    /// cell first.
    pub fn write_word_to_ram(&mut self, addr: Addr, data: Reg) {
        for i in 0..CELLS_PER_REG {
            let cell = (data >> ((CELLS_PER_REG - 1 - i) as u32 * Cell::BITS)) as Cell;
            self.ram.write(addr.wrapping_add(i as Addr), cell);
        }
    }

    pub fn read_reg_from_ram(&mut self, addr: Addr, r: usize) {
        let word = self.read_word_from_ram(addr);
        self.regs.write(r, word);
    }

    pub fn write_reg_to_ram(&mut self, addr: Addr, r: usize) {
        self.write_word_to_ram(addr, self.regs.read(r));
    }

    pub fn store_on_stack(&mut self, data: Cell) -> Result<()> {
        self.ram.write(self.sp, data);
        self.sp_increment()
    }

    pub fn load_from_stack(&mut self) -> Result<Cell> {
        self.sp_decrement()?;
        Ok(self.ram.read(self.sp))
    }

    pub fn store_reg_on_stack(&mut self, r: usize) -> Result<()> {
        self.write_reg_to_ram(self.sp, r);
        self.sp_reg_increment()
    }

    pub fn load_reg_from_stack(&mut self, r: usize) -> Result<()> {
        self.sp_reg_decrement()?;
        self.read_reg_from_ram(self.sp, r);
        Ok(())
    }

    pub fn store_pc_on_stack(&mut self) -> Result<()> {
        self.write_word_to_ram(self.sp, self.pc);
        self.sp_reg_increment()
    }

    pub fn load_pc_from_stack(&mut self) -> Result<()> {
        self.sp_reg_decrement()?;
        let addr = self.read_word_from_ram(self.sp);
        self.set_pc(addr)
    }

    /// Spill the writable registers, ascending.
    pub fn store_regs_on_stack(&mut self) -> Result<()> {
        for r in RegisterFile::writable() {
            self.store_reg_on_stack(r)?;
        }

        Ok(())
    }

    /// Restore the writable registers, descending. The reversal is what
    /// makes this the inverse of `store_regs_on_stack`.
    pub fn load_regs_from_stack(&mut self) -> Result<()> {
        for r in RegisterFile::writable().rev() {
            self.load_reg_from_stack(r)?;
        }

        Ok(())
    }

    pub fn dump(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Cpu state dump")?;
        writeln!(out, "PC = {:#06x}", self.pc)?;
        writeln!(out, "SP = {:#06x}", self.sp)?;
        self.regs.dump(out)
    }
}

impl Default for Cpu {
    fn default() -> Cpu {
        Cpu::new()
    }
}
