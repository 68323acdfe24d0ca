use std::collections::HashMap;

use log::debug;
use shisa_isa::isa::{Addr, Binary, Data, Inst, IsaModule, Opcode, CELLS_PER_DATA, CELLS_PER_INST};

use super::error::{AsmError, Report};
use super::parser::Statement;

/// Register the emitted code may clobber when lowering a `jtr`. Programs
/// must not keep a live value in it across a label jump, and must not use
/// it as a jump predicate.
pub const SCRATCH_REG: usize = 0xF;

/// Resolve labels and emit the final binary.
///
/// A label cannot live in a 4-bit operand, so every defined label gets one
/// word in the binary's data table holding its resolved target address.
/// `jtr reg LABEL` lowers to a sequence that clears the scratch register,
/// shift-adds the label's data-slot address into it, loads the target
/// address through it, and issues the jump. Targets resolve to the address
/// of the instruction following the label in the emitted stream.
pub(crate) fn emit(statements: &[Statement], report: &mut Report) -> Binary {
    // Data slots, in definition order.
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for statement in statements {
        if let Statement::Label { line, name } = statement {
            if slots.contains_key(name.as_str()) {
                report.push(AsmError::DuplicateLabel {
                    line: *line,
                    label: name.clone(),
                });
            } else {
                let slot = slots.len();
                slots.insert(name, slot);
            }
        }
    }

    let data_end = (slots.len() * CELLS_PER_DATA) as Addr;

    // Emitted length of each statement. The jtr expansion depends only on
    // the label's slot, so sizes are known before any address is.
    let sizes: Vec<usize> = statements
        .iter()
        .map(|statement| match statement {
            Statement::Label { .. } => 0,
            Statement::Jtr { pred, label, .. } => slots
                .get(label.as_str())
                .map(|&slot| jtr_sequence(slot, *pred).len())
                .unwrap_or(0),
            _ => 1,
        })
        .collect();

    // Each label's target: the instruction that follows it.
    let mut targets: HashMap<&str, Addr> = HashMap::new();
    let mut emitted = 0;
    for (statement, size) in statements.iter().zip(&sizes) {
        if let Statement::Label { name, .. } = statement {
            targets
                .entry(name)
                .or_insert(data_end + (emitted * CELLS_PER_INST) as Addr);
        }
        emitted += size;
    }

    let mut insts = Vec::new();
    for statement in statements {
        match statement {
            Statement::Label { .. } => {}

            Statement::Three {
                op,
                dst,
                src_l,
                src_r,
                ..
            } => insts.push(Inst::encode(*op, *dst, *src_l, *src_r)),

            Statement::Two {
                op, first, second, ..
            } => insts.push(encode_two(*op, *first, *second)),

            Statement::Call { target, .. } => insts.push(Inst::encode(Opcode::Call, *target, 0, 0)),

            Statement::Ret { .. } => insts.push(Inst::encode(Opcode::Ret, 0, 0, 0)),

            Statement::Jtr { line, pred, label } => match slots.get(label.as_str()) {
                Some(&slot) => insts.extend(jtr_sequence(slot, *pred)),
                None => report.push(AsmError::UnknownLabel {
                    line: *line,
                    label: label.clone(),
                }),
            },
        }
    }

    let mut data = vec![0 as Data; slots.len()];
    for (name, &slot) in &slots {
        data[slot] = targets[*name];
    }

    debug!(
        "emitted {} instructions and {} label words",
        insts.len(),
        data.len()
    );
    Binary::new(IsaModule::new(insts), data)
}

/// The two-operand forms map onto the fields their opcode actually reads:
/// `not`/`ld` write the first operand from the second, `st` stores the
/// second at the address in the first, `push`/`pop` follow the encoding's
/// `dst srcL` order with their unused field zeroed.
fn encode_two(op: Opcode, first: usize, second: usize) -> Inst {
    match op {
        Opcode::St => Inst::encode(op, 0, first, second),
        _ => Inst::encode(op, first, second, 0),
    }
}

fn jtr_sequence(slot: usize, pred: usize) -> Vec<Inst> {
    let slot_addr = (slot * CELLS_PER_DATA) as Addr;

    let mut seq = vec![Inst::encode(Opcode::Xor, SCRATCH_REG, SCRATCH_REG, SCRATCH_REG)];
    build_const(&mut seq, slot_addr);
    seq.push(Inst::encode(Opcode::Ld, SCRATCH_REG, SCRATCH_REG, 0));
    seq.push(Inst::encode(Opcode::Jtr, 0, pred, SCRATCH_REG));

    seq
}

/// Append the shift-add steps that build `value` in the scratch register,
/// which must hold zero on entry: walking the bits most significant first,
/// double the running value and add one for each set bit.
fn build_const(seq: &mut Vec<Inst>, value: Addr) {
    let mut started = false;
    for bit in (0..Addr::BITS).rev() {
        let set = value >> bit & 1 == 1;

        if !started {
            if set {
                seq.push(Inst::encode(Opcode::Add, SCRATCH_REG, SCRATCH_REG, 1));
                started = true;
            }
            continue;
        }

        seq.push(Inst::encode(Opcode::Add, SCRATCH_REG, SCRATCH_REG, SCRATCH_REG));
        if set {
            seq.push(Inst::encode(Opcode::Add, SCRATCH_REG, SCRATCH_REG, 1));
        }
    }
}
