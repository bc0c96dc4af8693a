//! IR 解释器
//!
//! 按程序顺序执行 `IRBlock`，跳转目标在执行前一次性解析。gvec 操作在
//! `oprsz` 字节上逐元素计算，`oprsz..maxsz` 清零。

use log::{trace, warn};
use sve_core::{ExecError, SveResult};
use sve_ir::{
    BinOp, Gvec2Op, Gvec2iOp, Gvec3Op, Gvec4Op, IRBlock, IROp, Label, MemOp, Rounding, Temp, UnOp,
};

use crate::elem::{self, bits, mask, sat_signed, sat_unsigned, sext};
use crate::helpers::{self, Args, Halt, HelperResult};
use crate::memory::GuestMemory;
use crate::state::CpuState;
use crate::{ExecResult, ExecStats, ExecStatus, ExecutionEngine, TrapKind};

/// SVE IR 参考解释器
#[derive(Debug, Default)]
pub struct Interpreter {
    totals: ExecStats,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 自创建以来所有块的累计统计
    pub fn totals(&self) -> ExecStats {
        self.totals
    }
}

/// 标量临时值槽；未写入的槽为 `None`
struct Temps(Vec<Option<u64>>);

impl Temps {
    fn new(n: u32) -> Self {
        Self(vec![None; n as usize])
    }

    fn get(&self, t: Temp) -> Result<u64, ExecError> {
        self.0
            .get(t.0 as usize)
            .copied()
            .flatten()
            .ok_or(ExecError::UninitializedTemp(t.0))
    }

    fn set(&mut self, t: Temp, v: u64) {
        let i = t.0 as usize;
        if i >= self.0.len() {
            self.0.resize(i + 1, None);
        }
        self.0[i] = Some(v);
    }
}

enum Flow {
    Next,
    Jump(usize),
    Trap(TrapKind),
}

fn label_table(block: &IRBlock) -> Vec<Option<usize>> {
    let mut table = vec![None; block.num_labels as usize];
    for (pc, op) in block.ops.iter().enumerate() {
        if let IROp::Label(l) = op {
            let i = l.0 as usize;
            if i >= table.len() {
                table.resize(i + 1, None);
            }
            table[i] = Some(pc);
        }
    }
    table
}

fn target(labels: &[Option<usize>], l: Label) -> Result<usize, ExecError> {
    labels
        .get(l.0 as usize)
        .copied()
        .flatten()
        .ok_or(ExecError::UndefinedLabel(l.0))
}

fn unop(op: UnOp, v: u64) -> u64 {
    match op {
        UnOp::Neg => v.wrapping_neg(),
        UnOp::Not => !v,
        UnOp::Ext8u => v & 0xff,
        UnOp::Ext8s => sext(v, 0) as u64,
        UnOp::Ext16u => v & 0xffff,
        UnOp::Ext16s => sext(v, 1) as u64,
        UnOp::Ext32u => v & 0xffff_ffff,
        UnOp::Ext32s => sext(v, 2) as u64,
        UnOp::Ctpop => v.count_ones() as u64,
    }
}

fn binop(op: BinOp, a: u64, b: u64) -> u64 {
    match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::And => a & b,
        BinOp::AndC => a & !b,
        BinOp::Or => a | b,
        BinOp::Xor => a ^ b,
        BinOp::Shl => a.wrapping_shl(b as u32),
        BinOp::Shr => a.wrapping_shr(b as u32),
        BinOp::Sar => (a as i64).wrapping_shr(b as u32) as u64,
        BinOp::Smin => (a as i64).min(b as i64) as u64,
        BinOp::Smax => (a as i64).max(b as i64) as u64,
        BinOp::Umin => a.min(b),
        BinOp::Umax => a.max(b),
    }
}

fn gvec2_elem(op: Gvec2Op, a: u64, esz: u8) -> u64 {
    let r = match op {
        Gvec2Op::Mov => a,
        Gvec2Op::Not => !a,
        Gvec2Op::Neg => a.wrapping_neg(),
        Gvec2Op::Abs => sext(a, esz).wrapping_abs() as u64,
    };
    r & mask(esz)
}

fn gvec2i_elem(op: Gvec2iOp, a: u64, imm: i64, esz: u8) -> u64 {
    let width = bits(esz);
    let sh = imm.clamp(0, 64) as u32;
    let r = match op {
        Gvec2iOp::Shli if sh >= width => 0,
        Gvec2iOp::Shli => a << sh,
        Gvec2iOp::Shri if sh >= width => 0,
        Gvec2iOp::Shri => a >> sh,
        Gvec2iOp::Sari => (sext(a, esz) >> sh.min(width - 1)) as u64,
        Gvec2iOp::Addi => a.wrapping_add(imm as u64),
        Gvec2iOp::Muli => a.wrapping_mul(imm as u64),
        Gvec2iOp::Andi => a & imm as u64,
        Gvec2iOp::Ori => a | imm as u64,
        Gvec2iOp::Xori => a ^ imm as u64,
    };
    r & mask(esz)
}

/// `a`、`b` 已截断到元素宽度
fn gvec3_elem(op: Gvec3Op, a: u64, b: u64, esz: u8) -> u64 {
    let (sa, sb) = (sext(a, esz) as i128, sext(b, esz) as i128);
    let (ua, ub) = (a as i128, b as i128);
    let r = match op {
        Gvec3Op::Add => a.wrapping_add(b),
        Gvec3Op::Sub => a.wrapping_sub(b),
        Gvec3Op::Mul => a.wrapping_mul(b),
        Gvec3Op::And => a & b,
        Gvec3Op::Or => a | b,
        Gvec3Op::Xor => a ^ b,
        Gvec3Op::AndC => a & !b,
        Gvec3Op::SsAdd => sat_signed(sa + sb, esz),
        Gvec3Op::UsAdd => sat_unsigned(ua + ub, esz),
        Gvec3Op::SsSub => sat_signed(sa - sb, esz),
        Gvec3Op::UsSub => sat_unsigned(ua - ub, esz),
        Gvec3Op::Smin => if sa <= sb { a } else { b },
        Gvec3Op::Smax => if sa >= sb { a } else { b },
        Gvec3Op::Umin => a.min(b),
        Gvec3Op::Umax => a.max(b),
    };
    r & mask(esz)
}

/// 按字节计算；这些运算与元素大小无关
fn gvec4_byte(op: Gvec4Op, a: u8, b: u8, c: u8) -> u8 {
    match op {
        Gvec4Op::Bitsel => (a & b) | (!a & c),
        Gvec4Op::Eor3 => a ^ b ^ c,
        Gvec4Op::Bcax => a ^ (b & !c),
        Gvec4Op::Bsl | Gvec4Op::SelPg => (a & c) | (b & !c),
        Gvec4Op::Bsl1n => (!a & c) | (b & !c),
        Gvec4Op::Bsl2n => (a & c) | (!b & !c),
        Gvec4Op::Nbsl => !((a & c) | (b & !c)),
        Gvec4Op::AndPg => a & b & c,
        Gvec4Op::BicPg => a & !b & c,
        Gvec4Op::EorPg => (a ^ b) & c,
        Gvec4Op::OrrPg => (a | b) & c,
        Gvec4Op::OrnPg => (a | !b) & c,
        Gvec4Op::NorPg => c & !(a | b),
        Gvec4Op::NandPg => c & !(a & b),
    }
}

/// 写入 gvec 结果并清零 `oprsz..maxsz`
fn write_gvec(cpu: &mut CpuState, dofs: u32, data: &[u8], maxsz: u32) -> Result<(), ExecError> {
    cpu.write(dofs, data)?;
    let oprsz = data.len() as u32;
    if maxsz > oprsz {
        cpu.write(dofs + oprsz, &vec![0u8; (maxsz - oprsz) as usize])?;
    }
    Ok(())
}

fn gvec_map(
    cpu: &mut CpuState,
    esz: u8,
    dofs: u32,
    aofs: u32,
    oprsz: u32,
    maxsz: u32,
    f: impl Fn(usize, u64) -> u64,
) -> Result<(), ExecError> {
    let a = cpu.read(aofs, oprsz as usize)?;
    let mut d = vec![0u8; oprsz as usize];
    for i in 0..(oprsz as usize) >> esz {
        elem::put(&mut d, i, esz, f(i, elem::get(&a, i, esz)));
    }
    write_gvec(cpu, dofs, &d, maxsz)
}

fn dup_bytes(pattern: &[u8], oprsz: u32) -> Vec<u8> {
    pattern.iter().copied().cycle().take(oprsz as usize).collect()
}

fn guest_load(mem: &dyn GuestMemory, addr: u64, mop: MemOp) -> HelperResult<u64> {
    let raw = mem.read(addr, mop.bytes())?;
    let raw = if mop.be && mop.size > 0 { raw.swap_bytes() >> (64 - bits(mop.size)) } else { raw };
    Ok(if mop.signed { sext(raw, mop.size) as u64 } else { raw })
}

fn guest_store(mem: &mut dyn GuestMemory, addr: u64, val: u64, mop: MemOp) -> HelperResult<()> {
    let val = val & mask(mop.size);
    let val = if mop.be && mop.size > 0 { val.swap_bytes() >> (64 - bits(mop.size)) } else { val };
    mem.write(addr, val, mop.bytes())?;
    Ok(())
}

fn env_index(ofs: u32, index: Option<Temp>, temps: &Temps) -> Result<usize, ExecError> {
    let extra = match index {
        Some(t) => temps.get(t)?,
        None => 0,
    };
    Ok((ofs as u64).wrapping_add(extra) as usize)
}

fn step(
    cpu: &mut CpuState,
    mem: &mut dyn GuestMemory,
    op: &IROp,
    temps: &mut Temps,
    labels: &[Option<usize>],
    stats: &mut ExecStats,
) -> HelperResult<Flow> {
    match op {
        IROp::MovI { dst, imm } => temps.set(*dst, *imm),
        IROp::Mov { dst, src } => temps.set(*dst, temps.get(*src)?),
        IROp::Unary { op, dst, src } => temps.set(*dst, unop(*op, temps.get(*src)?)),
        IROp::Binary { op, dst, a, b } => {
            let v = binop(*op, temps.get(*a)?, temps.get(*b)?);
            temps.set(*dst, v);
        }
        IROp::BinaryImm { op, dst, a, imm } => temps.set(*dst, binop(*op, temps.get(*a)?, *imm)),
        IROp::SetCond { cond, dst, a, b } => {
            let v = cond.eval(temps.get(*a)?, temps.get(*b)?);
            temps.set(*dst, v as u64);
        }
        IROp::MovCond { cond, dst, c1, c2, v1, v2 } => {
            let v = if cond.eval(temps.get(*c1)?, temps.get(*c2)?) { temps.get(*v1)? } else { temps.get(*v2)? };
            temps.set(*dst, v);
        }

        IROp::ReadXreg { dst, reg, sp } => {
            let v = if *sp && *reg == 31 { cpu.sp() } else { cpu.xreg(*reg) };
            temps.set(*dst, v);
        }
        IROp::WriteXreg { reg, src, sp } => {
            let v = temps.get(*src)?;
            if *sp && *reg == 31 {
                cpu.set_sp(v);
            } else {
                cpu.set_xreg(*reg, v);
            }
        }
        IROp::ReadFlag { dst, flag } => temps.set(*dst, cpu.flag(*flag) as u64),
        IROp::SetFlag { flag, src } => {
            let v = temps.get(*src)? != 0;
            cpu.set_flag(*flag, v);
        }
        IROp::SetPredFlags { src } => {
            let flags = temps.get(*src)? as u32;
            cpu.set_pred_flags(flags);
        }

        IROp::LoadEnv { dst, ofs, mop, index } => {
            let at = env_index(*ofs, *index, temps)?;
            let v = cpu.load(at, mop.bytes())?;
            temps.set(*dst, if mop.signed { sext(v, mop.size) as u64 } else { v });
        }
        IROp::StoreEnv { src, ofs, mop, index } => {
            let at = env_index(*ofs, *index, temps)?;
            cpu.store(at, mop.bytes(), temps.get(*src)?)?;
        }

        IROp::GuestLoad { dst, addr, mop } => {
            stats.mem_accesses += 1;
            let v = guest_load(mem, temps.get(*addr)?, *mop)?;
            temps.set(*dst, v);
        }
        IROp::GuestStore { src, addr, mop } => {
            stats.mem_accesses += 1;
            guest_store(mem, temps.get(*addr)?, temps.get(*src)?, *mop)?;
        }

        IROp::GvecDupImm { esz, dofs, oprsz, maxsz, imm } => {
            let pattern = (imm & mask(*esz)).to_le_bytes();
            write_gvec(cpu, *dofs, &dup_bytes(&pattern[..1usize << *esz], *oprsz), *maxsz)?;
        }
        IROp::GvecDupTemp { esz, dofs, oprsz, maxsz, src } => {
            let pattern = (temps.get(*src)? & mask(*esz)).to_le_bytes();
            write_gvec(cpu, *dofs, &dup_bytes(&pattern[..1usize << *esz], *oprsz), *maxsz)?;
        }
        IROp::GvecDupMem { esz, dofs, aofs, oprsz, maxsz } => {
            let pattern = cpu.read(*aofs, 1usize << *esz)?;
            write_gvec(cpu, *dofs, &dup_bytes(&pattern, *oprsz), *maxsz)?;
        }
        IROp::Gvec2 { op, esz, dofs, aofs, oprsz, maxsz } => {
            gvec_map(cpu, *esz, *dofs, *aofs, *oprsz, *maxsz, |_, a| gvec2_elem(*op, a, *esz))?;
        }
        IROp::Gvec2i { op, esz, dofs, aofs, imm, oprsz, maxsz } => {
            gvec_map(cpu, *esz, *dofs, *aofs, *oprsz, *maxsz, |_, a| gvec2i_elem(*op, a, *imm, *esz))?;
        }
        IROp::Gvec2s { op, esz, dofs, aofs, src, oprsz, maxsz } => {
            let b = temps.get(*src)? & mask(*esz);
            gvec_map(cpu, *esz, *dofs, *aofs, *oprsz, *maxsz, |_, a| gvec3_elem(*op, a, b, *esz))?;
        }
        IROp::Gvec3 { op, esz, dofs, aofs, bofs, oprsz, maxsz } => {
            let b = cpu.read(*bofs, *oprsz as usize)?;
            gvec_map(cpu, *esz, *dofs, *aofs, *oprsz, *maxsz, |i, a| {
                gvec3_elem(*op, a, elem::get(&b, i, *esz), *esz)
            })?;
        }
        IROp::Gvec4 { op, dofs, aofs, bofs, cofs, oprsz, maxsz } => {
            let n = *oprsz as usize;
            let (a, b, c) = (cpu.read(*aofs, n)?, cpu.read(*bofs, n)?, cpu.read(*cofs, n)?);
            let d: Vec<u8> = (0..n).map(|i| gvec4_byte(*op, a[i], b[i], c[i])).collect();
            write_gvec(cpu, *dofs, &d, *maxsz)?;
        }

        IROp::Call { helper, ret, args } => {
            stats.helper_calls += 1;
            if helper.touches_memory() {
                stats.mem_accesses += 1;
            }
            let value = {
                let a = Args::new(*helper, args, &temps.0);
                helpers::call(cpu, mem, *helper, &a)?
            };
            if let Some(dst) = ret {
                let v = value.ok_or_else(|| {
                    ExecError::MalformedCall(format!("{helper:?} produces no value"))
                })?;
                temps.set(*dst, v);
            }
        }

        IROp::SetRounding { fpst, mode, save } => {
            temps.set(*save, cpu.rounding(*fpst).as_u64());
            cpu.set_rounding(*fpst, *mode);
        }
        IROp::RestoreRounding { fpst, saved } => {
            let mode = Rounding::from_u64(temps.get(*saved)?);
            cpu.set_rounding(*fpst, mode);
        }

        IROp::Label(_) => {}
        IROp::Br(l) => return Ok(Flow::Jump(target(labels, *l)?)),
        IROp::BrCond { cond, a, b, label } => {
            if cond.eval(temps.get(*a)?, temps.get(*b)?) {
                return Ok(Flow::Jump(target(labels, *label)?));
            }
        }

        IROp::AccessTrap => return Ok(Flow::Trap(TrapKind::SveAccess)),
    }
    Ok(Flow::Next)
}

impl ExecutionEngine<IRBlock> for Interpreter {
    fn run(&mut self, cpu: &mut CpuState, mem: &mut dyn GuestMemory, block: &IRBlock) -> SveResult<ExecResult> {
        let labels = label_table(block);
        let mut temps = Temps::new(block.num_temps);
        let mut stats = ExecStats::default();
        let mut pc = 0;

        let status = loop {
            let Some(op) = block.ops.get(pc) else {
                break ExecStatus::Ok;
            };
            stats.executed_ops += 1;
            match step(cpu, mem, op, &mut temps, &labels, &mut stats) {
                Ok(Flow::Next) => pc += 1,
                Ok(Flow::Jump(to)) => pc = to,
                Ok(Flow::Trap(kind)) => break ExecStatus::Trap(kind),
                Err(Halt::Fault(e)) => {
                    warn!("guest memory fault at op {pc}: {e}");
                    break ExecStatus::Fault(e);
                }
                Err(Halt::Error(e)) => {
                    self.totals.accumulate(&stats);
                    return Err(e.into());
                }
            }
        };

        self.totals.accumulate(&stats);
        trace!("block finished: {status:?}, {} ops", stats.executed_ops);
        Ok(ExecResult { status, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::FlatMemory;
    use sve_core::{MemoryError, SveError};
    use sve_ir::layout::vec_full_reg_offset;
    use sve_ir::{Cond, IRBuilder};

    fn run(cpu: &mut CpuState, mem: &mut FlatMemory, block: &IRBlock) -> SveResult<ExecResult> {
        Interpreter::new().run(cpu, mem, block)
    }

    #[test]
    fn test_scalar_ops_and_branch() {
        let mut b = IRBuilder::new();
        let x = b.movi(5);
        let y = b.movi(3);
        let skip = b.new_label();
        b.binary(BinOp::Sub, x, x, y);
        b.brcond(Cond::Eq, x, y, skip);
        b.binary_imm(BinOp::Shl, x, x, 4);
        b.set_label(skip);
        b.push(IROp::WriteXreg { reg: 1, src: x, sp: false });
        let block = b.build();

        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        let res = run(&mut cpu, &mut mem, &block).unwrap();
        assert!(res.is_ok());
        assert_eq!(cpu.xreg(1), 32);
    }

    #[test]
    fn test_xzr_and_sp() {
        let mut b = IRBuilder::new();
        let v = b.movi(0x1000);
        b.push(IROp::WriteXreg { reg: 31, src: v, sp: true });
        b.push(IROp::WriteXreg { reg: 31, src: v, sp: false });
        let block = b.build();
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        run(&mut cpu, &mut mem, &block).unwrap();
        assert_eq!(cpu.sp(), 0x1000);
        assert_eq!(cpu.xreg(31), 0);
    }

    #[test]
    fn test_undefined_label_is_error() {
        let block = IRBlock {
            ops: vec![IROp::Br(Label(3))],
            num_temps: 0,
            num_labels: 1,
        };
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        let err = run(&mut cpu, &mut mem, &block).unwrap_err();
        assert!(matches!(err, SveError::Execution { .. }), "{err:?}");
    }

    #[test]
    fn test_uninitialized_temp_is_error() {
        let block = IRBlock {
            ops: vec![IROp::Mov { dst: Temp(0), src: Temp(1) }],
            num_temps: 2,
            num_labels: 0,
        };
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        assert!(run(&mut cpu, &mut mem, &block).is_err());
    }

    #[test]
    fn test_gvec3_saturating_and_tail_clear() {
        let mut cpu = CpuState::new(32);
        cpu.set_zreg_elements(1, 0, &[0x7f, 0x80, 0x10]);
        cpu.set_zreg_elements(2, 0, &[0x01, 0xff, 0x10]);
        cpu.set_zreg_elements(0, 0, &[0xaa; 32]);
        let block = IRBlock {
            ops: vec![IROp::Gvec3 {
                op: Gvec3Op::SsAdd,
                esz: 0,
                dofs: vec_full_reg_offset(0),
                aofs: vec_full_reg_offset(1),
                bofs: vec_full_reg_offset(2),
                oprsz: 16,
                maxsz: 32,
            }],
            num_temps: 0,
            num_labels: 0,
        };
        let mut mem = FlatMemory::new(0, 16);
        run(&mut cpu, &mut mem, &block).unwrap();
        let z = cpu.zreg_elements(0, 0);
        assert_eq!(&z[..3], &[0x7f, 0x80, 0x20]);
        assert!(z[16..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_gvec4_bitsel() {
        assert_eq!(gvec4_byte(Gvec4Op::Bitsel, 0xf0, 0xaa, 0x55), 0xa5);
        assert_eq!(gvec4_byte(Gvec4Op::Bsl, 0xaa, 0x55, 0xf0), 0xa5);
        assert_eq!(gvec4_byte(Gvec4Op::NorPg, 0x01, 0x02, 0x0f), 0x0c);
        assert_eq!(gvec4_byte(Gvec4Op::SelPg, 0xff, 0x00, 0x0f), 0x0f);
    }

    #[test]
    fn test_gvec2i_shift_clamps() {
        assert_eq!(gvec2i_elem(Gvec2iOp::Shri, 0x8000, 16, 1), 0);
        assert_eq!(gvec2i_elem(Gvec2iOp::Sari, 0x8000, 15, 1), 0xffff);
        assert_eq!(gvec2i_elem(Gvec2iOp::Shli, 0x01, 7, 0), 0x80);
        assert_eq!(gvec2_elem(Gvec2Op::Abs, 0x80, 0), 0x80);
    }

    #[test]
    fn test_guest_fault_reports_status() {
        let mut b = IRBuilder::new();
        let addr = b.movi(0x4000);
        let dst = b.temp();
        b.push(IROp::GuestLoad { dst, addr, mop: MemOp::unsigned(3) });
        let block = b.build();
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        let res = run(&mut cpu, &mut mem, &block).unwrap();
        assert_eq!(
            res.status,
            ExecStatus::Fault(MemoryError::OutOfBounds { addr: 0x4000, size: 8 })
        );
        assert_eq!(res.stats.mem_accesses, 1);
    }

    #[test]
    fn test_big_endian_guest_load() {
        let mut b = IRBuilder::new();
        let addr = b.movi(0);
        let dst = b.temp();
        b.push(IROp::GuestLoad { dst, addr, mop: MemOp { size: 1, signed: true, be: true } });
        b.push(IROp::WriteXreg { reg: 0, src: dst, sp: false });
        let block = b.build();
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        mem.write(0, 0x0080, 2).unwrap();
        run(&mut cpu, &mut mem, &block).unwrap();
        assert_eq!(cpu.xreg(0), 0xffff_ffff_ffff_8000);
    }

    #[test]
    fn test_access_trap_stops_block() {
        let mut b = IRBuilder::new();
        b.push(IROp::AccessTrap);
        let v = b.movi(1);
        b.push(IROp::WriteXreg { reg: 0, src: v, sp: false });
        let block = b.build();
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        let mut interp = Interpreter::new();
        let res = interp.run(&mut cpu, &mut mem, &block).unwrap();
        assert_eq!(res.status, ExecStatus::Trap(TrapKind::SveAccess));
        assert_eq!(cpu.xreg(0), 0);
        assert_eq!(interp.totals().executed_ops, 1);
    }
}
