use shisa_isa::isa::{Binary, Inst};

use super::cpu::Cpu;
use super::handlers;
use super::sim::Simulator;
use super::Result;

/// Fetches, decodes and dispatches through an exhaustive branch on the
/// opcode, every step. The baseline engine.
pub struct SwitchedSim {
    cpu: Cpu,
}

impl SwitchedSim {
    pub fn new(bin: Binary) -> SwitchedSim {
        let mut cpu = Cpu::new();
        cpu.load_bin(&bin);

        SwitchedSim { cpu }
    }
}

impl Simulator for SwitchedSim {
    fn execute_one(&mut self) -> Result<()> {
        let raw = self.cpu.fetch_next()?;
        let inst = Inst::from(raw).decode();

        handlers::dispatch(&mut self.cpu, inst)
    }

    fn state(&self) -> &Cpu {
        &self.cpu
    }
}
