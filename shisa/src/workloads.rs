//! The benchmark programs, hand-assembled with `Inst::encode`.
//!
//! Every program follows the same conventions: addresses and loop bounds
//! live in the data image and are loaded through `rf` at startup, `r2`
//! holds the constant 2 for walking word-sized data, and loops are a
//! conditional `jtr` out on a zero compare followed by an unconditional
//! `jtr` (predicate `r0`) back.

use shisa_isa::isa::{
    Addr, Binary, Data, Inst, IsaModule, Opcode, CELLS_PER_DATA, CELLS_PER_INST, CELLS_PER_REG,
    STACK_OFFSET,
};

const R0: usize = 0x0;
const R1: usize = 0x1;
const R2: usize = 0x2;
const R3: usize = 0x3;
const R4: usize = 0x4;
const R5: usize = 0x5;
const R6: usize = 0x6;
const R7: usize = 0x7;
const R8: usize = 0x8;
const R9: usize = 0x9;
const RA: usize = 0xA;
const RB: usize = 0xB;
const RC: usize = 0xC;
const RD: usize = 0xD;
const RE: usize = 0xE;
const RF: usize = 0xF;

/// Instruction slots available in the address space.
const MAX_N_INSTS: usize = Addr::MAX as usize / CELLS_PER_INST;

/// Instruction slots covered by one register-sized word.
const CELLS_PER_REG_SLOTS: usize = CELLS_PER_REG / CELLS_PER_INST;

/// The named benchmark programs.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Workload {
    OnlyNops,
    OneLoop,
    OneLongLoop,
    NestedLoops,
    FunctionInLoop,
    FunctionWithNopsInLoop,
    Fibonacci,
}

impl Workload {
    pub const ALL: [Workload; 7] = [
        Workload::OnlyNops,
        Workload::OneLoop,
        Workload::OneLongLoop,
        Workload::NestedLoops,
        Workload::FunctionInLoop,
        Workload::FunctionWithNopsInLoop,
        Workload::Fibonacci,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Workload::OnlyNops => "only nops",
            Workload::OneLoop => "one loop",
            Workload::OneLongLoop => "one long loop",
            Workload::NestedLoops => "nested loops",
            Workload::FunctionInLoop => "function in loop",
            Workload::FunctionWithNopsInLoop => "function with nops in loop",
            Workload::Fibonacci => "fibonacci",
        }
    }

    pub fn binary(self) -> Binary {
        match self {
            Workload::OnlyNops => only_nops(),
            Workload::OneLoop => one_loop(),
            Workload::OneLongLoop => one_long_loop(),
            Workload::NestedLoops => nested_loops(),
            Workload::FunctionInLoop => function_in_loop(),
            Workload::FunctionWithNopsInLoop => function_with_nops_in_loop(),
            Workload::Fibonacci => fibonacci(0x7000),
        }
    }
}

fn nop() -> Inst {
    Inst::encode(Opcode::Add, R0, R0, R0)
}

/// Address of instruction `idx` in an image carrying `n_data` data words.
fn inst_addr(n_data: usize, idx: usize) -> Data {
    (n_data * CELLS_PER_DATA + idx * CELLS_PER_INST) as Data
}

/// A straight run over as many nops as the address space holds.
fn only_nops() -> Binary {
    Binary::new(IsaModule::new(vec![nop(); MAX_N_INSTS]), Vec::new())
}

/// Count `r4` up to the bound in `r3`.
fn one_loop() -> Binary {
    let n_loops: Data = 0xFFFF;
    let loop_addr = inst_addr(3, 7);
    let end_addr = inst_addr(3, 11);

    let insts = vec![
        Inst::encode(Opcode::Xor, RF, RF, RF),
        Inst::encode(Opcode::Ld, R3, RF, R0), // loop bound
        Inst::encode(Opcode::Add, R2, R1, R1),
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RE, RF, R0), // loop addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RD, RF, R0), // end addr
        Inst::encode(Opcode::Add, R4, R4, R1), // loop
        Inst::encode(Opcode::Cmp, R5, R3, R4),
        Inst::encode(Opcode::Jtr, R0, R5, RD), // done
        Inst::encode(Opcode::Jtr, R0, R0, RE), // next round
        nop(),
    ];

    Binary::new(IsaModule::new(insts), vec![n_loops, loop_addr, end_addr])
}

/// The same loop stretched over nearly the whole address space with nops,
/// so each round pays the full fetch distance.
fn one_long_loop() -> Binary {
    let n_data = 3;
    let n_insts = MAX_N_INSTS - n_data;

    let n_loops: Data = 0xFFFF;
    let loop_addr = inst_addr(n_data, 7);
    let end_addr = inst_addr(n_data, n_insts); // == bin_end

    let mut insts = vec![
        Inst::encode(Opcode::Xor, RF, RF, RF),
        Inst::encode(Opcode::Ld, R3, RF, R0),
        Inst::encode(Opcode::Add, R2, R1, R1),
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RE, RF, R0),
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RD, RF, R0),
        Inst::encode(Opcode::Add, R4, R4, R1), // loop
        Inst::encode(Opcode::Cmp, R5, R3, R4),
        Inst::encode(Opcode::Jtr, R0, R5, RD), // done
    ];
    insts.resize(n_insts - 1, nop());
    insts.push(Inst::encode(Opcode::Jtr, R0, R0, RE)); // back across the nops

    Binary::new(IsaModule::new(insts), vec![n_loops, loop_addr, end_addr])
}

/// `r4` counts the inner rounds, `r6` the outer ones, both up to `r3`.
fn nested_loops() -> Binary {
    let n_loops: Data = 0x3FFF;
    let inner_addr = inst_addr(5, 12);
    let inner_exit_addr = inst_addr(5, 16);
    let outer_addr = inst_addr(5, 11);
    let end_addr = inst_addr(5, 20);

    let insts = vec![
        Inst::encode(Opcode::Xor, RF, RF, RF),
        Inst::encode(Opcode::Ld, R3, RF, R0), // loop bound
        Inst::encode(Opcode::Add, R2, R1, R1),
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RE, RF, R0), // inner loop addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RB, RF, R0), // inner exit addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RC, RF, R0), // outer loop addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RD, RF, R0), // end addr
        Inst::encode(Opcode::Xor, R4, R4, R4), // outer: reset the inner counter
        Inst::encode(Opcode::Add, R4, R4, R1), // inner
        Inst::encode(Opcode::Cmp, R5, R3, R4),
        Inst::encode(Opcode::Jtr, R0, R5, RB), // inner done
        Inst::encode(Opcode::Jtr, R0, R0, RE), // next inner round
        Inst::encode(Opcode::Add, R6, R6, R1), // inner exit
        Inst::encode(Opcode::Cmp, R5, R3, R6),
        Inst::encode(Opcode::Jtr, R0, R5, RD), // all done
        Inst::encode(Opcode::Jtr, R0, R0, RC), // next outer round
        nop(),
    ];

    Binary::new(
        IsaModule::new(insts),
        vec![n_loops, inner_addr, inner_exit_addr, outer_addr, end_addr],
    )
}

/// The caller/callee pair shared by the two function workloads: the loop
/// stores its counter as the argument, the function compares it against
/// the bound and stores the result for the caller to branch on.
fn function_body() -> Vec<Inst> {
    vec![
        Inst::encode(Opcode::Xor, RF, RF, RF),
        Inst::encode(Opcode::Add, R2, R1, R1),
        Inst::encode(Opcode::Ld, RE, RF, R0), // loop addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, R6, RF, R0), // function addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, R5, RF, R0), // argument addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, R7, RF, R0), // result addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RD, RF, R0), // end addr
        Inst::encode(Opcode::Sub, RF, RF, R2),
        Inst::encode(Opcode::Sub, RF, RF, R2),
        Inst::encode(Opcode::Sub, RF, RF, R2), // back to the argument slot
        Inst::encode(Opcode::Add, R4, R4, R1), // loop
        Inst::encode(Opcode::St, R0, R5, R4), // store the argument
        Inst::encode(Opcode::Call, R6, R0, R0),
        Inst::encode(Opcode::Ld, R8, R7, R0), // load the result
        Inst::encode(Opcode::Jtr, R0, R8, RD), // bound reached
        Inst::encode(Opcode::Jtr, R0, R0, RE), // next round
        Inst::encode(Opcode::Add, R2, R1, R1), // function
        Inst::encode(Opcode::Ld, R3, RF, R0), // argument addr
        Inst::encode(Opcode::Ld, R3, R3, R0), // argument
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, R4, RF, R0), // loop bound
        Inst::encode(Opcode::Cmp, R5, R3, R4), // zero iff bound reached
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, R6, RF, R0), // result addr
        Inst::encode(Opcode::St, R0, R6, R5), // store the result
    ]
}

fn function_data(n_data: usize, arg_addr: Data, ret_addr: Data, inst_end: Data) -> Vec<Data> {
    let loop_addr = inst_addr(n_data, 15);
    let func_addr = inst_addr(n_data, 21);
    let n_loops: Data = 0xFFFF;

    vec![loop_addr, func_addr, arg_addr, n_loops, ret_addr, inst_end]
}

fn function_in_loop() -> Binary {
    let n_data = 6;

    let mut insts = function_body();
    insts.push(Inst::encode(Opcode::Ret, R0, R0, R0));
    insts.push(nop());
    let inst_end = inst_addr(n_data, insts.len() - 1);

    Binary::new(
        IsaModule::new(insts),
        function_data(n_data, 0x8000, 0x8002, inst_end),
    )
}

/// Same call per round, but the function drags a nop field behind it so
/// the image nearly fills memory. Room is left for the data words, the
/// stack region and the two words the program keeps at the top of memory.
fn function_with_nops_in_loop() -> Binary {
    let n_data = 6;

    let mut insts = function_body();
    let reserved =
        n_data + STACK_OFFSET as usize / CELLS_PER_INST + 2 * CELLS_PER_REG_SLOTS;
    let n_nops = MAX_N_INSTS - insts.len() - 2 - reserved;
    insts.extend(std::iter::repeat(nop()).take(n_nops));
    insts.push(Inst::encode(Opcode::Ret, R0, R0, R0));
    insts.push(nop());
    let inst_end = inst_addr(n_data, insts.len() - 1);

    Binary::new(
        IsaModule::new(insts),
        function_data(n_data, 0xFFFC, 0xFFFE, inst_end),
    )
}

/// Compute the first `n` Fibonacci numbers into an array at the top of
/// memory. The function stores 1 for arguments below 2 and the sum of the
/// two previous elements otherwise; `mul` of the two compares gives the
/// base-case predicate (zero exactly when the argument is 0 or 1).
pub fn fibonacci(n: Data) -> Binary {
    let n_data = 7;

    let loop_addr = inst_addr(n_data, 14);
    let func_addr = inst_addr(n_data, 20);
    let base_addr = inst_addr(n_data, 44);
    let inst_end = inst_addr(n_data, 49); // == bin_end
    let func_arg_addr: Data = 0xFFFE;
    let fib_array = (0x1_0000 - CELLS_PER_DATA * (n as usize + 1)) as Data;

    let insts = vec![
        Inst::encode(Opcode::Xor, RF, RF, RF),
        Inst::encode(Opcode::Add, R2, R1, R1),
        Inst::encode(Opcode::Ld, RE, RF, R0), // loop addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, R5, RF, R0), // how many numbers
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, R6, RF, R0), // function addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, R7, RF, R0), // argument addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RD, RF, R0), // end addr
        Inst::encode(Opcode::Xor, R4, R4, R4), // i = 0
        Inst::encode(Opcode::St, R0, R7, R4), // loop: store the argument
        Inst::encode(Opcode::Call, R6, R0, R0),
        Inst::encode(Opcode::Add, R4, R4, R1),
        Inst::encode(Opcode::Cmp, R8, R4, R5), // zero iff n numbers done
        Inst::encode(Opcode::Jtr, R0, R8, RD), // done
        Inst::encode(Opcode::Jtr, R0, R0, RE), // next number
        Inst::encode(Opcode::Add, R2, R1, R1), // function
        Inst::encode(Opcode::Xor, RF, RF, RF),
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, R3, RF, R0), // argument addr
        Inst::encode(Opcode::Ld, R3, R3, R0), // argument i
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RE, RF, R0), // array addr
        Inst::encode(Opcode::Add, RF, RF, R2),
        Inst::encode(Opcode::Ld, RD, RF, R0), // base-case addr
        Inst::encode(Opcode::Cmp, R4, R3, R0), // zero iff i == 0
        Inst::encode(Opcode::Cmp, R5, R3, R1), // zero iff i == 1
        Inst::encode(Opcode::Mul, R6, R5, R4), // zero iff i < 2
        Inst::encode(Opcode::Jtr, R0, R6, RD), // base case
        Inst::encode(Opcode::Mul, R4, R3, R2), // element offset
        Inst::encode(Opcode::Add, R5, RE, R4), // arr[i] addr
        Inst::encode(Opcode::Sub, R6, R5, R2), // arr[i-1] addr
        Inst::encode(Opcode::Ld, R7, R6, R0),
        Inst::encode(Opcode::Sub, R8, R6, R2), // arr[i-2] addr
        Inst::encode(Opcode::Ld, R9, R8, R0),
        Inst::encode(Opcode::Add, RA, R7, R9),
        Inst::encode(Opcode::St, R0, R5, RA), // arr[i] = arr[i-1] + arr[i-2]
        Inst::encode(Opcode::Ret, R0, R0, R0),
        Inst::encode(Opcode::Mul, R7, R3, R2), // base case: element offset
        Inst::encode(Opcode::Add, R8, RE, R7),
        Inst::encode(Opcode::St, R0, R8, R1), // arr[i] = 1
        Inst::encode(Opcode::Ret, R0, R0, R0),
        Inst::encode(Opcode::Not, R0, R0, R0),
    ];

    Binary::new(
        IsaModule::new(insts),
        vec![
            loop_addr,
            n,
            func_addr,
            func_arg_addr,
            fib_array,
            base_addr,
            inst_end,
        ],
    )
}
