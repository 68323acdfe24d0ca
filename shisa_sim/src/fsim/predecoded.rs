use shisa_isa::isa::{Binary, Decoded, Inst, CELLS_PER_INST};

use super::cpu::Cpu;
use super::error::Error;
use super::handlers;
use super::sim::Simulator;
use super::Result;

/// Decodes the whole instruction stream once at construction; each step
/// indexes the predecoded tuple by PC and branch-dispatches, skipping the
/// per-step decode cost.
pub struct PredecodedSim {
    cpu: Cpu,
    predecoded: Vec<Decoded>,
}

impl PredecodedSim {
    pub fn new(bin: Binary) -> PredecodedSim {
        let mut cpu = Cpu::new();
        cpu.load_bin(&bin);

        let predecoded = bin.module().iter().map(Inst::decode).collect();

        PredecodedSim { cpu, predecoded }
    }
}

impl Simulator for PredecodedSim {
    fn execute_one(&mut self) -> Result<()> {
        // Same end-of-program report a fetch would give.
        if self.cpu.reach_end() {
            return Err(Error::ProgramEnd);
        }

        let inst_idx = (self.cpu.pc() - self.cpu.program_start()) as usize / CELLS_PER_INST;
        self.cpu.pc_increment()?;

        handlers::dispatch(&mut self.cpu, self.predecoded[inst_idx])
    }

    fn state(&self) -> &Cpu {
        &self.cpu
    }
}
