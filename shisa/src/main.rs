use std::io;
use std::process;

use log::error;
use shisa::Engine;
use shisa_asm::asm;
use shisa_sim::fsim::Simulator;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => usage(),
    };
    let engine = match args.next() {
        None => Engine::Switched,
        Some(name) => match Engine::from_name(&name) {
            Some(engine) => engine,
            None => usage(),
        },
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            error!("cannot read {}: {}", path, e);
            process::exit(1);
        }
    };

    let bin = match asm::assemble(&source) {
        Ok(bin) => bin,
        Err(report) => {
            eprint!("{}", report);
            process::exit(1);
        }
    };

    let mut sim = shisa::build(engine, bin);
    if let Err(e) = sim.execute_all() {
        error!("execution failed: {}", e);
        process::exit(1);
    }

    if let Err(e) = sim.state().dump(&mut io::stdout()) {
        error!("cannot dump the final state: {}", e);
        process::exit(1);
    }
}

fn usage() -> ! {
    eprintln!("usage: shisa <program.s> [engine]");
    eprint!("engines:");
    for engine in Engine::ALL {
        eprint!(" {}", engine.name());
    }
    eprintln!();
    process::exit(2);
}
