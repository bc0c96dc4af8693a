//! 内存访问助手：连续加载/存储、首次故障加载、聚集与分散
//!
//! 普通加载先把所有寄存器装进缓冲区，任一元素出错时目的寄存器保持不变。
//! 首次故障与非故障加载把出错位置之后的 FFR 位清零，未加载的元素为零。

use log::debug;
use sve_core::{GuestAddr, MemoryError};
use sve_ir::desc::{simd_data, simd_oprsz};
use sve_ir::layout::{FFR_PRED_NUM, pred_full_reg_offset, vec_full_reg_offset};
use sve_ir::{ContigLoad, ContigStore, FaultLoad, GatherKey, Helper, OffsetKind, ScatterKey};
use sve_ir::{dtype_esz, dtype_msz, dtype_signed};

use super::{Args, HelperResult};
use crate::elem::{self, active, bits, mask, sext};
use crate::memory::GuestMemory;
use crate::state::CpuState;

/// 单个元素的访问属性
#[derive(Clone, Copy)]
struct Access {
    msz: u8,
    be: bool,
    mte: bool,
}

impl Access {
    fn size(self) -> usize {
        1 << self.msz
    }

    fn swap(self, v: u64) -> u64 {
        if self.be && self.msz > 0 {
            v.swap_bytes() >> (64 - bits(self.msz))
        } else {
            v
        }
    }

    fn load(self, mem: &dyn GuestMemory, addr: GuestAddr, signed: bool) -> Result<u64, MemoryError> {
        if self.mte {
            mem.check_tag(addr, self.size())?;
        }
        let raw = self.swap(mem.read(addr, self.size())?);
        Ok(if signed { sext(raw, self.msz) as u64 } else { raw })
    }

    fn store(self, mem: &mut dyn GuestMemory, addr: GuestAddr, val: u64) -> Result<(), MemoryError> {
        if self.mte {
            mem.check_tag(addr, self.size())?;
        }
        mem.write(addr, self.swap(val & mask(self.msz)), self.size())
    }
}

fn zreg_ofs(zt: u32, r: usize) -> u32 {
    vec_full_reg_offset((zt + r as u32) % 32)
}

/// 把 FFR 中从第 `i` 个元素开始的位清零
fn clear_ffr_from(ffr: &mut [u8], i: usize, esz: u8) {
    for bit in (i << esz)..ffr.len() * 8 {
        elem::set_pred_bit(ffr, bit, false);
    }
}

/// (g, addr, desc[data = zt])
fn ld_contig(cpu: &mut CpuState, mem: &dyn GuestMemory, key: ContigLoad, a: &Args<'_>) -> HelperResult<()> {
    let desc = a.desc(2)?;
    let vsz = simd_oprsz(desc);
    let zt = simd_data(desc).max(0) as u32;
    let g = cpu.read(a.env(0)?, vsz / 8)?;
    let base = a.temp(1)?;

    let (esz, signed) = (dtype_esz(key.dtype), dtype_signed(key.dtype));
    let acc = Access { msz: dtype_msz(key.dtype), be: key.be, mte: key.mte };
    let nreg = key.nreg as usize + 1;

    let mut regs = vec![vec![0u8; vsz]; nreg];
    for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
        for (r, buf) in regs.iter_mut().enumerate() {
            let addr = base.wrapping_add(((i * nreg + r) << acc.msz) as u64);
            elem::put(buf, i, esz, acc.load(mem, addr, signed)? & mask(esz));
        }
    }
    for (r, buf) in regs.iter().enumerate() {
        cpu.write(zreg_ofs(zt, r), buf)?;
    }
    Ok(())
}

/// (g, addr, desc[data = zt])
fn ld_fault(cpu: &mut CpuState, mem: &dyn GuestMemory, key: FaultLoad, a: &Args<'_>) -> HelperResult<()> {
    let desc = a.desc(2)?;
    let vsz = simd_oprsz(desc);
    let zt = simd_data(desc).max(0) as u32;
    let g = cpu.read(a.env(0)?, vsz / 8)?;
    let base = a.temp(1)?;

    let (esz, signed) = (dtype_esz(key.dtype), dtype_signed(key.dtype));
    let acc = Access { msz: dtype_msz(key.dtype), be: key.be, mte: key.mte };
    let ffr_ofs = pred_full_reg_offset(FFR_PRED_NUM);
    let mut ffr = cpu.read(ffr_ofs, vsz / 8)?;
    let mut d = vec![0u8; vsz];

    let mut first = key.first_fault;
    for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
        let addr = base.wrapping_add((i << acc.msz) as u64);
        match acc.load(mem, addr, signed) {
            Ok(v) => elem::put(&mut d, i, esz, v & mask(esz)),
            Err(e) if first => return Err(e.into()),
            Err(e) => {
                debug!("fault load suppressed at element {i} ({addr:#x}): {e}");
                clear_ffr_from(&mut ffr, i, esz);
                break;
            }
        }
        first = false;
    }
    cpu.write(zreg_ofs(zt, 0), &d)?;
    cpu.write(ffr_ofs, &ffr)?;
    Ok(())
}

/// (g, addr, desc[data = zt])
fn st_contig(cpu: &mut CpuState, mem: &mut dyn GuestMemory, key: ContigStore, a: &Args<'_>) -> HelperResult<()> {
    let desc = a.desc(2)?;
    let vsz = simd_oprsz(desc);
    let zt = simd_data(desc).max(0) as u32;
    let g = cpu.read(a.env(0)?, vsz / 8)?;
    let base = a.temp(1)?;

    let acc = Access { msz: key.msz, be: key.be, mte: key.mte };
    let nreg = key.nreg as usize + 1;
    let regs = (0..nreg)
        .map(|r| cpu.read(zreg_ofs(zt, r), vsz))
        .collect::<Result<Vec<_>, _>>()?;
    for i in (0..vsz >> key.esz).filter(|&i| active(&g, i, key.esz)) {
        for (r, buf) in regs.iter().enumerate() {
            let addr = base.wrapping_add(((i * nreg + r) << acc.msz) as u64);
            acc.store(mem, addr, elem::get(buf, i, key.esz))?;
        }
    }
    Ok(())
}

fn vec_offset(kind: OffsetKind, zm: &[u8], i: usize, esz: u8) -> u64 {
    let v = elem::get(zm, i, esz);
    match kind {
        OffsetKind::Zero32 => v & 0xffff_ffff,
        OffsetKind::Sign32 => sext(v & 0xffff_ffff, 2) as u64,
        OffsetKind::Full64 => v,
    }
}

/// (d, g, zm, base, desc[data = scale])
fn gather(cpu: &mut CpuState, mem: &dyn GuestMemory, key: GatherKey, a: &Args<'_>) -> HelperResult<()> {
    let desc = a.desc(4)?;
    let vsz = simd_oprsz(desc);
    let scale = simd_data(desc).clamp(0, 3) as u32;
    let dofs = a.env(0)?;
    let g = cpu.read(a.env(1)?, vsz / 8)?;
    let zm = cpu.read(a.env(2)?, vsz)?;
    let base = a.temp(3)?;

    let esz = key.esz;
    let acc = Access { msz: key.msz, be: key.be, mte: key.mte };
    let ffr_ofs = pred_full_reg_offset(FFR_PRED_NUM);
    let mut ffr = if key.first_fault { Some(cpu.read(ffr_ofs, vsz / 8)?) } else { None };
    let mut d = vec![0u8; vsz];

    let mut first = true;
    for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
        let addr = base.wrapping_add(vec_offset(key.offset, &zm, i, esz) << scale);
        match (acc.load(mem, addr, !key.unsigned), ffr.as_mut()) {
            (Ok(v), _) => elem::put(&mut d, i, esz, v & mask(esz)),
            (Err(e), Some(ffr)) if !first => {
                debug!("first-fault gather suppressed at element {i} ({addr:#x}): {e}");
                clear_ffr_from(ffr, i, esz);
                break;
            }
            (Err(e), _) => return Err(e.into()),
        }
        first = false;
    }
    cpu.write(dofs, &d)?;
    if let Some(ffr) = ffr {
        cpu.write(ffr_ofs, &ffr)?;
    }
    Ok(())
}

/// (d, g, zm, base, desc[data = scale])
fn scatter(cpu: &mut CpuState, mem: &mut dyn GuestMemory, key: ScatterKey, a: &Args<'_>) -> HelperResult<()> {
    let desc = a.desc(4)?;
    let vsz = simd_oprsz(desc);
    let scale = simd_data(desc).clamp(0, 3) as u32;
    let d = cpu.read(a.env(0)?, vsz)?;
    let g = cpu.read(a.env(1)?, vsz / 8)?;
    let zm = cpu.read(a.env(2)?, vsz)?;
    let base = a.temp(3)?;

    let acc = Access { msz: key.msz, be: key.be, mte: key.mte };
    for i in (0..vsz >> key.esz).filter(|&i| active(&g, i, key.esz)) {
        let addr = base.wrapping_add(vec_offset(key.offset, &zm, i, key.esz) << scale);
        acc.store(mem, addr, elem::get(&d, i, key.esz))?;
    }
    Ok(())
}

pub(super) fn call(
    cpu: &mut CpuState,
    mem: &mut dyn GuestMemory,
    helper: Helper,
    a: &Args<'_>,
) -> HelperResult<Option<u64>> {
    match helper {
        Helper::LdContig(key) => ld_contig(cpu, mem, key, a)?,
        Helper::LdFault(key) => ld_fault(cpu, mem, key, a)?,
        Helper::StContig(key) => st_contig(cpu, mem, key, a)?,
        Helper::Gather(key) => gather(cpu, mem, key, a)?,
        Helper::Scatter(key) => scatter(cpu, mem, key, a)?,
        _ => unreachable!("{helper:?} does not access memory"),
    }
    Ok(None)
}
