use shisa_isa::isa::{Binary, Inst, IsaModule, Opcode, Reg, NREGS};
use shisa_sim::fsim::{
    Cpu, Error, PredecodedSim, PredecodedSubroutinedSim, Simulator, SubroutinedSim, SwitchedSim,
};

fn run_to_end(bin: &Binary, check: impl Fn(&Cpu)) {
    let mut sim = SwitchedSim::new(bin.clone());
    sim.execute_all().unwrap();
    check(sim.state());

    let mut sim = SubroutinedSim::new(bin.clone());
    sim.execute_all().unwrap();
    check(sim.state());

    let mut sim = PredecodedSim::new(bin.clone());
    sim.execute_all().unwrap();
    check(sim.state());

    let mut sim = PredecodedSubroutinedSim::new(bin.clone());
    sim.execute_all().unwrap();
    check(sim.state());
}

fn check_regs(cpu: &Cpu, expected: &[(usize, Reg)]) {
    for &(r, value) in expected {
        assert_eq!(
            cpu.read_reg(r),
            value,
            "r{} == {:#06x} but must be {:#06x}",
            r,
            cpu.read_reg(r),
            value
        );
    }
}

/// One instruction per run: `op r, r0, r1` into every writable register.
#[test]
fn arithmetic_on_the_constant_registers() {
    let cases = [
        (Opcode::Add, 0x0001),
        (Opcode::Sub, 0xFFFF),
        (Opcode::Mul, 0x0000),
        (Opcode::Div, 0x0000),
        (Opcode::And, 0x0000),
        (Opcode::Or, 0x0001),
        (Opcode::Xor, 0x0001),
        (Opcode::Not, 0xFFFF),
        (Opcode::Cmp, 0xFFFF),
    ];

    for (op, expected) in cases {
        for r in 2..NREGS {
            let module = IsaModule::new(vec![Inst::encode(op, r, 0x0, 0x1)]);
            let bin = Binary::new(module, Vec::new());

            run_to_end(&bin, |cpu| {
                assert_eq!(
                    cpu.read_reg(r),
                    expected,
                    "{:?} into r{} left {:#06x}, expected {:#06x}",
                    op,
                    r,
                    cpu.read_reg(r),
                    expected
                );
            });
        }
    }
}

/// A taken and a not-taken branch. The predicate register reading zero
/// means "take"; `r1` never takes, `r0` always does.
#[test]
fn jump_scenario() {
    run_to_end(&jump_binary(), |cpu| {
        check_regs(cpu, &[(0x5, 0x1), (0x6, 0x0), (0x7, 0x1)]);
    });
}

/// Loads, stores and a push/pop across all three memory regions.
///
/// The store at address 4 lands in the writable data region, so r7
/// re-reads the stored 0xbeef. The store at address 6 targets program
/// text and is dropped, so r8 and r9 both read the first instruction
/// word back (`add r2 r1 r1` == 0x0211).
#[test]
fn memory_scenario() {
    run_to_end(&memory_binary(), |cpu| {
        check_regs(
            cpu,
            &[
                (0x2, 0x0002),
                (0x3, 0x0003),
                (0x4, 0xBEEF),
                (0x5, 0xDEAD),
                (0x6, 0xEEEE),
                (0x7, 0xBEEF),
                (0x8, 0x0211),
                (0x9, 0x0211),
                (0xA, 0xDEAD),
                (0xB, 0x0080),
                (0xC, 0x0000),
                (0xD, 0x0000),
                (0xE, 0x0080),
                (0xF, 0x0008),
            ],
        );
    });
}

/// A call that clobbers the caller's registers, stores its result through
/// memory and returns; the spill/restore protocol hides the clobbering.
#[test]
fn call_and_return_scenario() {
    run_to_end(&funcs_binary(), |cpu| {
        check_regs(
            cpu,
            &[
                (0x2, 0x0002),
                (0x3, 0x001C),
                (0x4, 0x2000),
                (0x5, 0x0010),
                (0x6, 0x0011),
                (0x7, 0x0026),
                (0x8, 0x0000),
                (0x9, 0x0000),
                (0xA, 0x0000),
                (0xB, 0x0000),
                (0xC, 0x0000),
                (0xD, 0x0000),
                (0xE, 0x0000),
                (0xF, 0x0004),
            ],
        );
    });
}

/// Division by zero is a soft halt: the program ends cleanly and nothing
/// after the division executes.
#[test]
fn division_by_zero_soft_halts() {
    let module = IsaModule::new(vec![
        Inst::encode(Opcode::Div, 0x2, 0x1, 0x0),
        Inst::encode(Opcode::Add, 0x3, 0x1, 0x1),
    ]);
    let bin = Binary::new(module, Vec::new());

    run_to_end(&bin, |cpu| {
        check_regs(cpu, &[(0x2, 0x0000), (0x3, 0x0000)]);
        assert!(cpu.reach_end());
    });
}

/// A jump below the first instruction surfaces `BadPc` out of the driver.
#[test]
fn jump_below_program_start_is_a_bad_pc() {
    let module = IsaModule::new(vec![Inst::encode(Opcode::Jtr, 0x0, 0x0, 0x0)]);
    let bin = Binary::new(module, vec![0x0000]);

    let mut sim = SwitchedSim::new(bin);
    assert_eq!(sim.execute_all(), Err(Error::BadPc(0)));
}

/// Unbounded recursion runs the stack region out.
#[test]
fn runaway_recursion_overflows_the_stack() {
    let module = IsaModule::new(vec![
        Inst::encode(Opcode::Add, 0xF, 0x0, 0x0),
        Inst::encode(Opcode::Ld, 0x2, 0xF, 0x0),
        Inst::encode(Opcode::Call, 0x2, 0x0, 0x0),
    ]);
    // the data word points the call at itself
    let bin = Binary::new(module, vec![0x0006]);

    let mut sim = SwitchedSim::new(bin);
    assert_eq!(sim.execute_all(), Err(Error::StackOverflow));
}

/// A return with nothing on the stack underflows.
#[test]
fn return_on_an_empty_stack_underflows() {
    let module = IsaModule::new(vec![Inst::encode(Opcode::Ret, 0x0, 0x0, 0x0)]);
    let bin = Binary::new(module, Vec::new());

    let mut sim = SwitchedSim::new(bin);
    assert_eq!(sim.execute_all(), Err(Error::StackUnderflow));
}

/// The four engines are a performance axis, not a correctness axis: for
/// the same binary they settle on identical registers and memory.
#[test]
fn engines_agree_on_final_state() {
    let programs = [jump_binary(), memory_binary(), funcs_binary()];

    for bin in &programs {
        let mut reference = SwitchedSim::new(bin.clone());
        reference.execute_all().unwrap();

        let mut subroutined = SubroutinedSim::new(bin.clone());
        subroutined.execute_all().unwrap();
        assert_same_state(reference.state(), subroutined.state());

        let mut predecoded = PredecodedSim::new(bin.clone());
        predecoded.execute_all().unwrap();
        assert_same_state(reference.state(), predecoded.state());

        let mut both = PredecodedSubroutinedSim::new(bin.clone());
        both.execute_all().unwrap();
        assert_same_state(reference.state(), both.state());
    }
}

fn assert_same_state(a: &Cpu, b: &Cpu) {
    assert_eq!(a.pc(), b.pc());
    assert_eq!(a.sp(), b.sp());
    for r in 0..NREGS {
        assert_eq!(a.read_reg(r), b.read_reg(r), "r{} diverged", r);
    }
    for addr in 0..=u16::MAX {
        assert_eq!(
            a.read_from_ram(addr),
            b.read_from_ram(addr),
            "RAM diverged at {:#06x}",
            addr
        );
    }
}

fn jump_binary() -> Binary {
    Binary::new(
        IsaModule::new(vec![
            Inst::encode(Opcode::Add, 0x2, 0x1, 0x1),
            Inst::encode(Opcode::Add, 0xF, 0x0, 0x0),
            Inst::encode(Opcode::Ld, 0x3, 0xF, 0x0),
            Inst::encode(Opcode::Add, 0xF, 0xF, 0x2),
            Inst::encode(Opcode::Ld, 0x4, 0xF, 0x0),
            Inst::encode(Opcode::Jtr, 0x0, 0x1, 0x3),
            Inst::encode(Opcode::Add, 0x5, 0x0, 0x1),
            Inst::encode(Opcode::Jtr, 0x0, 0x0, 0x4),
            Inst::encode(Opcode::Add, 0x6, 0x0, 0x1),
            Inst::encode(Opcode::Add, 0x0, 0x0, 0x0),
            Inst::encode(Opcode::Add, 0x0, 0x0, 0x0),
            Inst::encode(Opcode::Add, 0x7, 0x0, 0x1),
            Inst::encode(Opcode::Add, 0x0, 0x0, 0x0),
        ]),
        vec![0x0014, 0x0018],
    )
}

fn memory_binary() -> Binary {
    Binary::new(
        IsaModule::new(vec![
            Inst::encode(Opcode::Add, 0x2, 0x1, 0x1),
            Inst::encode(Opcode::Add, 0x3, 0x2, 0x1),
            Inst::encode(Opcode::Add, 0xF, 0x0, 0x0),
            Inst::encode(Opcode::Ld, 0x4, 0xF, 0x0),
            Inst::encode(Opcode::Add, 0xF, 0xF, 0x2),
            Inst::encode(Opcode::Ld, 0x5, 0xF, 0x0),
            Inst::encode(Opcode::Add, 0xF, 0xF, 0x2),
            Inst::encode(Opcode::Ld, 0x6, 0xF, 0x0),
            Inst::encode(Opcode::St, 0x0, 0xF, 0x4),
            Inst::encode(Opcode::Ld, 0x7, 0xF, 0x0),
            Inst::encode(Opcode::Add, 0xF, 0xF, 0x2),
            Inst::encode(Opcode::Ld, 0x8, 0xF, 0x0),
            Inst::encode(Opcode::St, 0x0, 0xF, 0x7),
            Inst::encode(Opcode::Ld, 0x9, 0xF, 0x0),
            Inst::encode(Opcode::Push, 0x0, 0x5, 0x0),
            Inst::encode(Opcode::Pop, 0xA, 0x0, 0x0),
            Inst::encode(Opcode::Add, 0xF, 0xF, 0x2),
            Inst::encode(Opcode::Mul, 0xE, 0xF, 0xF),
            Inst::encode(Opcode::Mul, 0xE, 0xE, 0x2),
            Inst::encode(Opcode::St, 0x0, 0xE, 0xE),
            Inst::encode(Opcode::Ld, 0xB, 0xE, 0x0),
        ]),
        vec![0xBEEF, 0xDEAD, 0xEEEE],
    )
}

fn funcs_binary() -> Binary {
    Binary::new(
        IsaModule::new(vec![
            Inst::encode(Opcode::Add, 0x2, 0x1, 0x1),
            Inst::encode(Opcode::Add, 0xF, 0x0, 0x0),
            Inst::encode(Opcode::Ld, 0x3, 0xF, 0x0),
            Inst::encode(Opcode::Add, 0xF, 0xF, 0x2),
            Inst::encode(Opcode::Ld, 0x4, 0xF, 0x0),
            Inst::encode(Opcode::Call, 0x3, 0x0, 0x0),
            Inst::encode(Opcode::Ld, 0x5, 0x4, 0x0),
            Inst::encode(Opcode::Add, 0x6, 0x5, 0x1),
            Inst::encode(Opcode::Add, 0xF, 0xF, 0x2),
            Inst::encode(Opcode::Ld, 0x7, 0xF, 0x0),
            Inst::encode(Opcode::Jtr, 0x0, 0x0, 0x7),
            Inst::encode(Opcode::Mul, 0x4, 0x2, 0x2),
            Inst::encode(Opcode::Mul, 0x4, 0x4, 0x4),
            Inst::encode(Opcode::Ld, 0x3, 0xF, 0x0),
            Inst::encode(Opcode::St, 0x0, 0x3, 0x4),
            Inst::encode(Opcode::Ret, 0x0, 0x0, 0x0),
        ]),
        vec![0x001C, 0x2000, 0x0026],
    )
}
