mod cpu;
mod error;
mod handlers;
mod predecoded;
mod predecoded_subroutined;
mod ram;
mod register_file;
mod sim;
mod subroutined;
mod switched;

pub use cpu::Cpu;
pub use error::Error;
pub use predecoded::PredecodedSim;
pub use predecoded_subroutined::PredecodedSubroutinedSim;
pub use ram::{Ram, RamController};
pub use register_file::RegisterFile;
pub use sim::Simulator;
pub use subroutined::SubroutinedSim;
pub use switched::SwitchedSim;

pub type Result<A> = std::result::Result<A, Error>;
