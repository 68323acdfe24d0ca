use shisa_isa::isa::{Binary, Decoded, Inst, CELLS_PER_INST};

use super::cpu::Cpu;
use super::error::Error;
use super::handlers::{self, Handler};
use super::sim::Simulator;
use super::Result;

/// Combines predecoding with table dispatch: no per-step decode and no
/// per-step branch tree.
pub struct PredecodedSubroutinedSim {
    cpu: Cpu,
    predecoded: Vec<Decoded>,
    routines: [Handler; 16],
}

impl PredecodedSubroutinedSim {
    pub fn new(bin: Binary) -> PredecodedSubroutinedSim {
        let mut cpu = Cpu::new();
        cpu.load_bin(&bin);

        let predecoded = bin.module().iter().map(Inst::decode).collect();

        PredecodedSubroutinedSim {
            cpu,
            predecoded,
            routines: handlers::routines(),
        }
    }
}

impl Simulator for PredecodedSubroutinedSim {
    fn execute_one(&mut self) -> Result<()> {
        if self.cpu.reach_end() {
            return Err(Error::ProgramEnd);
        }

        let inst_idx = (self.cpu.pc() - self.cpu.program_start()) as usize / CELLS_PER_INST;
        self.cpu.pc_increment()?;

        let inst = self.predecoded[inst_idx];
        self.routines[inst.op as usize](&mut self.cpu, inst.dst, inst.src_l, inst.src_r)
    }

    fn state(&self) -> &Cpu {
        &self.cpu
    }
}
