pub mod workloads;

use shisa_isa::isa::Binary;
use shisa_sim::fsim::{
    PredecodedSim, PredecodedSubroutinedSim, Simulator, SubroutinedSim, SwitchedSim,
};

/// The four interchangeable execution engines, by name.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Engine {
    Switched,
    Subroutined,
    Predecoded,
    PredecodedSubroutined,
}

impl Engine {
    pub const ALL: [Engine; 4] = [
        Engine::Switched,
        Engine::Subroutined,
        Engine::Predecoded,
        Engine::PredecodedSubroutined,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Engine::Switched => "switched",
            Engine::Subroutined => "subroutined",
            Engine::Predecoded => "predecoded",
            Engine::PredecodedSubroutined => "predecoded-subroutined",
        }
    }

    pub fn from_name(name: &str) -> Option<Engine> {
        Engine::ALL.into_iter().find(|engine| engine.name() == name)
    }
}

/// Load `bin` into a fresh simulator of the chosen kind.
pub fn build(engine: Engine, bin: Binary) -> Box<dyn Simulator> {
    match engine {
        Engine::Switched => Box::new(SwitchedSim::new(bin)),
        Engine::Subroutined => Box::new(SubroutinedSim::new(bin)),
        Engine::Predecoded => Box::new(PredecodedSim::new(bin)),
        Engine::PredecodedSubroutined => Box::new(PredecodedSubroutinedSim::new(bin)),
    }
}
