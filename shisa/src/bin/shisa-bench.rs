use std::process;
use std::time::Instant;

use log::error;
use shisa::workloads::Workload;
use shisa::Engine;
use shisa_sim::fsim::Simulator;

/// Runs every workload on all four engines and prints wall-clock times.
/// Construction is timed together with execution, so the predecoded
/// engines pay for their decode pass up front like any real run would.
fn main() {
    env_logger::init();

    let order = [
        Workload::Fibonacci,
        Workload::OnlyNops,
        Workload::OneLoop,
        Workload::FunctionInLoop,
        Workload::NestedLoops,
        Workload::OneLongLoop,
        Workload::FunctionWithNopsInLoop,
    ];

    for workload in order {
        println!("{}:", workload.name());

        for engine in Engine::ALL {
            let bin = workload.binary();

            let start = Instant::now();
            let mut sim = shisa::build(engine, bin);
            if let Err(e) = sim.execute_all() {
                error!("{} failed on {}: {}", workload.name(), engine.name(), e);
                process::exit(1);
            }
            let elapsed = start.elapsed();

            println!("{:<25} {:.6}", engine.name(), elapsed.as_secs_f64());
        }

        println!();
    }
}
