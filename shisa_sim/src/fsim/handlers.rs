use shisa_isa::isa::{Addr, Decoded, Opcode};

use super::cpu::Cpu;
use super::Result;

/// One instruction handler. Every handler takes `(dst, srcL, srcR)` even
/// when it ignores a field, so the subroutined engines can table them.
pub(crate) type Handler = fn(&mut Cpu, usize, usize, usize) -> Result<()>;

/// Branch-dispatch a decoded instruction, for the switch-style engines.
pub(crate) fn dispatch(cpu: &mut Cpu, inst: Decoded) -> Result<()> {
    let Decoded {
        op,
        dst,
        src_l,
        src_r,
    } = inst;

    match op {
        Opcode::Add => add(cpu, dst, src_l, src_r),
        Opcode::Sub => sub(cpu, dst, src_l, src_r),
        Opcode::Mul => mul(cpu, dst, src_l, src_r),
        Opcode::Div => div(cpu, dst, src_l, src_r),
        Opcode::And => and(cpu, dst, src_l, src_r),
        Opcode::Or => or(cpu, dst, src_l, src_r),
        Opcode::Xor => xor(cpu, dst, src_l, src_r),
        Opcode::Not => not(cpu, dst, src_l, src_r),
        Opcode::Cmp => cmp(cpu, dst, src_l, src_r),
        Opcode::Jtr => jmp_true(cpu, dst, src_l, src_r),
        Opcode::Ld => load(cpu, dst, src_l, src_r),
        Opcode::St => store(cpu, dst, src_l, src_r),
        Opcode::Push => push(cpu, dst, src_l, src_r),
        Opcode::Pop => pop(cpu, dst, src_l, src_r),
        Opcode::Call => call(cpu, dst, src_l, src_r),
        Opcode::Ret => ret(cpu, dst, src_l, src_r),
    }
}

/// Handler table indexed by opcode value, for the subroutined engines.
pub(crate) fn routines() -> [Handler; 16] {
    [
        add, sub, mul, div, and, or, xor, not, cmp, jmp_true, load, store, push, pop, call, ret,
    ]
}

fn add(cpu: &mut Cpu, dst: usize, src_l: usize, src_r: usize) -> Result<()> {
    let res = cpu.read_reg(src_l).wrapping_add(cpu.read_reg(src_r));
    cpu.write_reg(dst, res);
    Ok(())
}

fn sub(cpu: &mut Cpu, dst: usize, src_l: usize, src_r: usize) -> Result<()> {
    let res = cpu.read_reg(src_l).wrapping_sub(cpu.read_reg(src_r));
    cpu.write_reg(dst, res);
    Ok(())
}

fn mul(cpu: &mut Cpu, dst: usize, src_l: usize, src_r: usize) -> Result<()> {
    let res = cpu.read_reg(src_l).wrapping_mul(cpu.read_reg(src_r));
    cpu.write_reg(dst, res);
    Ok(())
}

fn div(cpu: &mut Cpu, dst: usize, src_l: usize, src_r: usize) -> Result<()> {
    let divisor = cpu.read_reg(src_r);
    if divisor == 0 {
        // Soft halt instead of a fault the program cannot observe.
        // TODO: report the cause once there is MMIO to report it through.
        cpu.set_pc_to_end();
        return Ok(());
    }

    let res = cpu.read_reg(src_l) / divisor;
    cpu.write_reg(dst, res);
    Ok(())
}

fn and(cpu: &mut Cpu, dst: usize, src_l: usize, src_r: usize) -> Result<()> {
    let res = cpu.read_reg(src_l) & cpu.read_reg(src_r);
    cpu.write_reg(dst, res);
    Ok(())
}

fn or(cpu: &mut Cpu, dst: usize, src_l: usize, src_r: usize) -> Result<()> {
    let res = cpu.read_reg(src_l) | cpu.read_reg(src_r);
    cpu.write_reg(dst, res);
    Ok(())
}

fn xor(cpu: &mut Cpu, dst: usize, src_l: usize, src_r: usize) -> Result<()> {
    let res = cpu.read_reg(src_l) ^ cpu.read_reg(src_r);
    cpu.write_reg(dst, res);
    Ok(())
}

fn not(cpu: &mut Cpu, dst: usize, src_l: usize, _src_r: usize) -> Result<()> {
    let res = !cpu.read_reg(src_l);
    cpu.write_reg(dst, res);
    Ok(())
}

// Identical to sub: zero means equal, and programs branch on that.
fn cmp(cpu: &mut Cpu, dst: usize, src_l: usize, src_r: usize) -> Result<()> {
    let res = cpu.read_reg(src_l).wrapping_sub(cpu.read_reg(src_r));
    cpu.write_reg(dst, res);
    Ok(())
}

fn jmp_true(cpu: &mut Cpu, _dst: usize, src_l: usize, src_r: usize) -> Result<()> {
    if cpu.read_reg(src_l) == 0 {
        let target = cpu.read_reg(src_r);
        cpu.set_pc(target as Addr)?;
    }

    Ok(())
}

fn load(cpu: &mut Cpu, dst: usize, src_l: usize, _src_r: usize) -> Result<()> {
    let addr = cpu.read_reg(src_l) as Addr;
    let word = cpu.read_word_from_ram(addr);
    cpu.write_reg(dst, word);
    Ok(())
}

fn store(cpu: &mut Cpu, _dst: usize, src_l: usize, src_r: usize) -> Result<()> {
    let addr = cpu.read_reg(src_l) as Addr;
    let data = cpu.read_reg(src_r);
    cpu.write_word_to_ram(addr, data);
    Ok(())
}

fn push(cpu: &mut Cpu, _dst: usize, src_l: usize, _src_r: usize) -> Result<()> {
    cpu.store_reg_on_stack(src_l)
}

fn pop(cpu: &mut Cpu, dst: usize, _src_l: usize, _src_r: usize) -> Result<()> {
    cpu.load_reg_from_stack(dst)
}

fn call(cpu: &mut Cpu, dst: usize, _src_l: usize, _src_r: usize) -> Result<()> {
    let target = cpu.read_reg(dst) as Addr;
    cpu.store_pc_on_stack()?;
    cpu.store_regs_on_stack()?;
    cpu.set_pc(target)
}

fn ret(cpu: &mut Cpu, _dst: usize, _src_l: usize, _src_r: usize) -> Result<()> {
    cpu.load_regs_from_stack()?;
    cpu.load_pc_from_stack()
}
