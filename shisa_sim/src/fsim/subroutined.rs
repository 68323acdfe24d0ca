use shisa_isa::isa::{Binary, Inst};

use super::cpu::Cpu;
use super::handlers::{self, Handler};
use super::sim::Simulator;
use super::Result;

/// Decodes every step like `SwitchedSim`, but dispatches through a handler
/// table indexed by the opcode value. The table is built once per engine.
pub struct SubroutinedSim {
    cpu: Cpu,
    routines: [Handler; 16],
}

impl SubroutinedSim {
    pub fn new(bin: Binary) -> SubroutinedSim {
        let mut cpu = Cpu::new();
        cpu.load_bin(&bin);

        SubroutinedSim {
            cpu,
            routines: handlers::routines(),
        }
    }
}

impl Simulator for SubroutinedSim {
    fn execute_one(&mut self) -> Result<()> {
        let raw = self.cpu.fetch_next()?;
        let inst = Inst::from(raw).decode();

        self.routines[inst.op as usize](&mut self.cpu, inst.dst, inst.src_l, inst.src_r)
    }

    fn state(&self) -> &Cpu {
        &self.cpu
    }
}
