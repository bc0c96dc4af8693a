//! 整数向量助手：比较、带谓词运算、归约与复制
//!
//! 带谓词的运算只写活动元素，非活动元素保持目的寄存器原值。

use sve_ir::desc::{simd_data, simd_oprsz};
use sve_ir::{CmpOp, Helper, ReduceOp, ZpzOp, ZpziOp, ZpzzOp, ZpzzzOp, ZziOp};

use super::pred::predtest;
use super::{Args, HelperResult};
use crate::elem::{self, active, bits, esz_ones, mask, pred_word, put_pred_word, sat_signed, sat_unsigned, sext};
use crate::state::CpuState;

pub(super) fn call(cpu: &mut CpuState, helper: Helper, a: &Args<'_>) -> HelperResult<Option<u64>> {
    let ret = match helper {
        Helper::Cmp { op, esz, wide } => Some(cmp_ppzz(cpu, a, op, esz, wide)? as u64),
        Helper::CmpImm { op, esz } => Some(cmp_ppzi(cpu, a, op, esz)? as u64),
        Helper::Match { negate, esz } => Some(do_match(cpu, a, negate, esz)? as u64),
        Helper::Zpzz { op, esz } => {
            zpzz(cpu, a, op, esz)?;
            None
        }
        Helper::Zpz { op, esz } => {
            zpz(cpu, a, op, esz)?;
            None
        }
        Helper::Zpzi { op, esz } => {
            zpzi(cpu, a, op, esz)?;
            None
        }
        Helper::Zpzzz { op, esz } => {
            zpzzz(cpu, a, op, esz)?;
            None
        }
        Helper::Zzi { op, esz } => {
            zzi(cpu, a, op, esz)?;
            None
        }
        Helper::Index { esz } => {
            let vsz = simd_oprsz(a.desc(3)?);
            let (start, incr) = (a.temp(1)?, a.temp(2)?);
            let mut d = vec![0u8; vsz];
            for i in 0..vsz >> esz {
                let v = start.wrapping_add(incr.wrapping_mul(i as u64));
                elem::put(&mut d, i, esz, v & mask(esz));
            }
            cpu.write(a.env(0)?, &d)?;
            None
        }
        Helper::CpyM { esz } => {
            let vsz = simd_oprsz(a.desc(4)?);
            let mut d = cpu.read(a.env(1)?, vsz)?;
            let g = cpu.read(a.env(2)?, vsz / 8)?;
            let val = a.temp(3)? & mask(esz);
            for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
                elem::put(&mut d, i, esz, val);
            }
            cpu.write(a.env(0)?, &d)?;
            None
        }
        Helper::CpyZ { esz } => {
            let vsz = simd_oprsz(a.desc(3)?);
            let g = cpu.read(a.env(1)?, vsz / 8)?;
            let val = a.temp(2)? & mask(esz);
            let mut d = vec![0u8; vsz];
            for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
                elem::put(&mut d, i, esz, val);
            }
            cpu.write(a.env(0)?, &d)?;
            None
        }
        Helper::Reduce { op, esz } => Some(reduce(cpu, a, op, esz)?),
        _ => unreachable!("{helper:?} routed to integer helpers"),
    };
    Ok(ret)
}

/// 整数比较；`esz_m` 为第二操作数的元素大小（宽比较为 3）
pub(crate) fn compare(op: CmpOp, n: u64, m: u64, esz_n: u8, esz_m: u8) -> bool {
    let (sn, sm) = (sext(n, esz_n), sext(m, esz_m));
    let (un, um) = (n & mask(esz_n), m & mask(esz_m));
    match op {
        CmpOp::Eq => sn == sm,
        CmpOp::Ne => sn != sm,
        CmpOp::Ge => sn >= sm,
        CmpOp::Gt => sn > sm,
        CmpOp::Le => sn <= sm,
        CmpOp::Lt => sn < sm,
        CmpOp::Hs => un >= um,
        CmpOp::Hi => un > um,
        CmpOp::Ls => un <= um,
        CmpOp::Lo => un < um,
    }
}

/// 把逐元素结果写成谓词并按 esz 掩码后的控制谓词计算标志
fn write_pred_result(
    cpu: &mut CpuState,
    dofs: u32,
    g: &[u8],
    esz: u8,
    f: impl Fn(usize) -> bool,
) -> HelperResult<u32> {
    let psz = g.len();
    let mut d = vec![0u8; psz];
    for i in (0..(psz * 8) >> esz).filter(|&i| active(g, i, esz)) {
        if f(i) {
            elem::set_pred_bit(&mut d, i << esz, true);
        }
    }
    let mut gm = g.to_vec();
    for w in 0..psz.div_ceil(8) {
        put_pred_word(&mut gm, w, pred_word(g, w) & esz_ones(esz));
    }
    cpu.write(dofs, &d)?;
    Ok(predtest(&d, &gm))
}

fn cmp_ppzz(cpu: &mut CpuState, a: &Args<'_>, op: CmpOp, esz: u8, wide: bool) -> HelperResult<u32> {
    let vsz = simd_oprsz(a.desc(4)?);
    let n = cpu.read(a.env(1)?, vsz)?;
    let m = cpu.read(a.env(2)?, vsz)?;
    let g = cpu.read(a.env(3)?, vsz / 8)?;
    write_pred_result(cpu, a.env(0)?, &g, esz, |i| {
        let nv = elem::get(&n, i, esz);
        if wide {
            compare(op, nv, elem::get(&m, (i << esz) >> 3, 3), esz, 3)
        } else {
            compare(op, nv, elem::get(&m, i, esz), esz, esz)
        }
    })
}

fn cmp_ppzi(cpu: &mut CpuState, a: &Args<'_>, op: CmpOp, esz: u8) -> HelperResult<u32> {
    let desc = a.desc(3)?;
    let vsz = simd_oprsz(desc);
    let imm = simd_data(desc) as i64 as u64;
    let n = cpu.read(a.env(1)?, vsz)?;
    let g = cpu.read(a.env(2)?, vsz / 8)?;
    write_pred_result(cpu, a.env(0)?, &g, esz, |i| compare(op, elem::get(&n, i, esz), imm, esz, 3))
}

/// MATCH/NMATCH：在同一 128 位段内查找相等元素
fn do_match(cpu: &mut CpuState, a: &Args<'_>, negate: bool, esz: u8) -> HelperResult<u32> {
    let vsz = simd_oprsz(a.desc(4)?);
    let n = cpu.read(a.env(1)?, vsz)?;
    let m = cpu.read(a.env(2)?, vsz)?;
    let g = cpu.read(a.env(3)?, vsz / 8)?;
    let per_seg = 16 >> esz;
    write_pred_result(cpu, a.env(0)?, &g, esz, |i| {
        let seg = i / per_seg * per_seg;
        let nv = elem::get(&n, i, esz);
        let found = (seg..seg + per_seg).any(|j| elem::get(&m, j, esz) == nv);
        found != negate
    })
}

fn shift_left(v: u64, sh: u64, esz: u8) -> u64 {
    if sh >= bits(esz) as u64 { 0 } else { (v << sh) & mask(esz) }
}

fn shift_right(v: u64, sh: u64, esz: u8) -> u64 {
    if sh >= bits(esz) as u64 { 0 } else { (v & mask(esz)) >> sh }
}

fn shift_arith(v: u64, sh: u64, esz: u8) -> u64 {
    let sh = sh.min(bits(esz) as u64 - 1);
    (sext(v, esz) >> sh) as u64 & mask(esz)
}

fn zpzz_elem(op: ZpzzOp, n: u64, m: u64, esz: u8) -> u64 {
    let (sn, sm) = (sext(n, esz), sext(m, esz));
    let (un, um) = (n & mask(esz), m & mask(esz));
    let r = match op {
        ZpzzOp::Add => un.wrapping_add(um),
        ZpzzOp::Sub => un.wrapping_sub(um),
        ZpzzOp::Smax => sn.max(sm) as u64,
        ZpzzOp::Umax => un.max(um),
        ZpzzOp::Smin => sn.min(sm) as u64,
        ZpzzOp::Umin => un.min(um),
        ZpzzOp::Sabd => (sn as i128 - sm as i128).unsigned_abs() as u64,
        ZpzzOp::Uabd => un.abs_diff(um),
        ZpzzOp::Mul => un.wrapping_mul(um),
        ZpzzOp::Smulh => ((sn as i128 * sm as i128) >> bits(esz)) as u64,
        ZpzzOp::Umulh => ((un as u128 * um as u128) >> bits(esz)) as u64,
        // 除数为零时结果为零；最小值除以 -1 回绕
        ZpzzOp::Sdiv => {
            if sm == 0 {
                0
            } else {
                sn.wrapping_div(sm) as u64
            }
        }
        ZpzzOp::Udiv => un.checked_div(um).unwrap_or(0),
        ZpzzOp::Orr => un | um,
        ZpzzOp::Eor => un ^ um,
        ZpzzOp::And => un & um,
        ZpzzOp::Bic => un & !um,
        ZpzzOp::Asr | ZpzzOp::AsrWide => shift_arith(un, m, esz),
        ZpzzOp::Lsr | ZpzzOp::LsrWide => shift_right(un, m, esz),
        ZpzzOp::Lsl | ZpzzOp::LslWide => shift_left(un, m, esz),
        ZpzzOp::Sel | ZpzzOp::Splice => un,
    };
    r & mask(esz)
}

fn zpzz(cpu: &mut CpuState, a: &Args<'_>, op: ZpzzOp, esz: u8) -> HelperResult<()> {
    let vsz = simd_oprsz(a.desc(4)?);
    let dofs = a.env(0)?;
    let n = cpu.read(a.env(1)?, vsz)?;
    let m = cpu.read(a.env(2)?, vsz)?;
    let g = cpu.read(a.env(3)?, vsz / 8)?;
    let elements = vsz >> esz;

    let d = match op {
        ZpzzOp::Sel => {
            let mut d = m.clone();
            for i in (0..elements).filter(|&i| active(&g, i, esz)) {
                elem::put(&mut d, i, esz, elem::get(&n, i, esz));
            }
            d
        }
        ZpzzOp::Splice => {
            // n 中第一个到最后一个活动元素之间的片段，其后接 m 的低位元素
            let first = (0..elements).find(|&i| active(&g, i, esz));
            let last = (0..elements).rev().find(|&i| active(&g, i, esz));
            let mut d = vec![0u8; vsz];
            let mut len = 0;
            if let (Some(f), Some(l)) = (first, last) {
                for i in f..=l {
                    elem::put(&mut d, len, esz, elem::get(&n, i, esz));
                    len += 1;
                }
            }
            for j in 0..elements - len {
                elem::put(&mut d, len + j, esz, elem::get(&m, j, esz));
            }
            d
        }
        _ => {
            let wide = matches!(op, ZpzzOp::AsrWide | ZpzzOp::LsrWide | ZpzzOp::LslWide);
            let mut d = cpu.read(dofs, vsz)?;
            for i in (0..elements).filter(|&i| active(&g, i, esz)) {
                let mv = if wide {
                    elem::get(&m, (i << esz) >> 3, 3)
                } else {
                    elem::get(&m, i, esz)
                };
                elem::put(&mut d, i, esz, zpzz_elem(op, elem::get(&n, i, esz), mv, esz));
            }
            d
        }
    };
    cpu.write(dofs, &d)?;
    Ok(())
}

fn reverse_bits(v: u64, esz: u8) -> u64 {
    v.reverse_bits() >> (64 - bits(esz))
}

/// 按 `chunk` 字节为单位反转元素内的顺序
fn reverse_chunks(v: u64, esz: u8, chunk: usize) -> u64 {
    let n = 1usize << esz;
    let bytes = v.to_le_bytes();
    let mut out = [0u8; 8];
    for c in 0..n / chunk {
        let src = c * chunk;
        let dst = n - chunk - src;
        out[dst..dst + chunk].copy_from_slice(&bytes[src..src + chunk]);
    }
    u64::from_le_bytes(out)
}

fn zpz_elem(op: ZpzOp, n: u64, esz: u8) -> u64 {
    let sn = sext(n, esz);
    let un = n & mask(esz);
    let width = bits(esz);
    let sign = 1u64 << (width - 1);
    let r = match op {
        ZpzOp::Cls => {
            let x = if sn < 0 { !un & mask(esz) } else { un };
            (x.leading_zeros() - (64 - width)).saturating_sub(1) as u64
        }
        ZpzOp::Clz => (un.leading_zeros() - (64 - width)) as u64,
        ZpzOp::Cnt => un.count_ones() as u64,
        ZpzOp::Cnot => (un == 0) as u64,
        ZpzOp::Fabs => un & !sign,
        ZpzOp::Fneg => un ^ sign,
        ZpzOp::Not => !un,
        ZpzOp::Sxtb => sext(un, 0) as u64,
        ZpzOp::Uxtb => un & 0xff,
        ZpzOp::Sxth => sext(un, 1) as u64,
        ZpzOp::Uxth => un & 0xffff,
        ZpzOp::Sxtw => sext(un, 2) as u64,
        ZpzOp::Uxtw => un & 0xffff_ffff,
        ZpzOp::Abs => sn.wrapping_abs() as u64,
        ZpzOp::Neg => sn.wrapping_neg() as u64,
        ZpzOp::Revb => reverse_chunks(un, esz, 1),
        ZpzOp::Revh => reverse_chunks(un, esz, 2),
        ZpzOp::Revw => reverse_chunks(un, esz, 4),
        ZpzOp::Rbit => reverse_bits(un, esz),
        ZpzOp::Sqabs => sat_signed((sn as i128).abs(), esz),
        ZpzOp::Sqneg => sat_signed(-(sn as i128), esz),
        ZpzOp::Compact | ZpzOp::Movz => un,
    };
    r & mask(esz)
}

fn zpz(cpu: &mut CpuState, a: &Args<'_>, op: ZpzOp, esz: u8) -> HelperResult<()> {
    let desc = a.desc(3)?;
    let vsz = simd_oprsz(desc);
    let dofs = a.env(0)?;
    let n = cpu.read(a.env(1)?, vsz)?;
    let g = cpu.read(a.env(2)?, vsz / 8)?;
    let elements = vsz >> esz;

    let d = match op {
        ZpzOp::Compact => {
            let mut d = vec![0u8; vsz];
            for (j, i) in (0..elements).filter(|&i| active(&g, i, esz)).enumerate() {
                elem::put(&mut d, j, esz, elem::get(&n, i, esz));
            }
            d
        }
        ZpzOp::Movz => {
            let invert = simd_data(desc) != 0;
            let mut d = n.clone();
            for i in (0..elements).filter(|&i| active(&g, i, esz) == invert) {
                elem::put(&mut d, i, esz, 0);
            }
            d
        }
        _ => {
            let mut d = cpu.read(dofs, vsz)?;
            for i in (0..elements).filter(|&i| active(&g, i, esz)) {
                elem::put(&mut d, i, esz, zpz_elem(op, elem::get(&n, i, esz), esz));
            }
            d
        }
    };
    cpu.write(dofs, &d)?;
    Ok(())
}

/// 舍入右移：加上被移出部分的最高位
fn round_shr(v: i128, sh: u32) -> i128 {
    if sh == 0 { v } else { (v + (1i128 << (sh - 1))) >> sh }
}

fn zpzi_elem(op: ZpziOp, n: u64, sh: u32, esz: u8) -> u64 {
    let sn = sext(n, esz) as i128;
    let un = (n & mask(esz)) as i128;
    let r = match op {
        ZpziOp::Asr => shift_arith(n, sh as u64, esz),
        ZpziOp::Lsr => shift_right(n, sh as u64, esz),
        ZpziOp::Lsl => shift_left(n, sh as u64, esz),
        // 向零舍入的除以 2^sh
        ZpziOp::Asrd => {
            let sh = sh.min(bits(esz) - 1);
            let bias = if sn < 0 { (1i128 << sh) - 1 } else { 0 };
            ((sn + bias) >> sh) as u64
        }
        ZpziOp::Sqshl => sat_signed(sn << sh, esz),
        ZpziOp::Uqshl => sat_unsigned(un << sh, esz),
        ZpziOp::Sqshlu => sat_unsigned(sn << sh, esz),
        ZpziOp::Srshr => round_shr(sn, sh) as u64,
        ZpziOp::Urshr => round_shr(un, sh) as u64,
    };
    r & mask(esz)
}

fn zpzi(cpu: &mut CpuState, a: &Args<'_>, op: ZpziOp, esz: u8) -> HelperResult<()> {
    let desc = a.desc(3)?;
    let vsz = simd_oprsz(desc);
    let sh = simd_data(desc).clamp(0, 64) as u32;
    let dofs = a.env(0)?;
    let n = cpu.read(a.env(1)?, vsz)?;
    let g = cpu.read(a.env(2)?, vsz / 8)?;
    let mut d = cpu.read(dofs, vsz)?;
    for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
        elem::put(&mut d, i, esz, zpzi_elem(op, elem::get(&n, i, esz), sh, esz));
    }
    cpu.write(dofs, &d)?;
    Ok(())
}

fn zpzzz(cpu: &mut CpuState, a: &Args<'_>, op: ZpzzzOp, esz: u8) -> HelperResult<()> {
    let vsz = simd_oprsz(a.desc(5)?);
    let dofs = a.env(0)?;
    let acc = cpu.read(a.env(1)?, vsz)?;
    let n = cpu.read(a.env(2)?, vsz)?;
    let m = cpu.read(a.env(3)?, vsz)?;
    let g = cpu.read(a.env(4)?, vsz / 8)?;
    let mut d = cpu.read(dofs, vsz)?;
    for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
        let prod = elem::get(&n, i, esz).wrapping_mul(elem::get(&m, i, esz));
        let av = elem::get(&acc, i, esz);
        let r = match op {
            ZpzzzOp::Mla => av.wrapping_add(prod),
            ZpzzzOp::Mls => av.wrapping_sub(prod),
        };
        elem::put(&mut d, i, esz, r & mask(esz));
    }
    cpu.write(dofs, &d)?;
    Ok(())
}

fn zzi(cpu: &mut CpuState, a: &Args<'_>, op: ZziOp, esz: u8) -> HelperResult<()> {
    let vsz = simd_oprsz(a.desc(3)?);
    let n = cpu.read(a.env(1)?, vsz)?;
    let val = a.temp(2)? & mask(esz);
    let elements = vsz >> esz;
    let mut d = vec![0u8; vsz];
    match op {
        ZziOp::Insr => {
            // 整体上移一个元素，元素 0 写入标量
            d[1 << esz..].copy_from_slice(&n[..vsz - (1 << esz)]);
            elem::put(&mut d, 0, esz, val);
        }
        _ => {
            for i in 0..elements {
                let nv = elem::get(&n, i, esz);
                let r = match op {
                    ZziOp::Smax => sext(nv, esz).max(sext(val, esz)) as u64,
                    ZziOp::Umax => nv.max(val),
                    ZziOp::Smin => sext(nv, esz).min(sext(val, esz)) as u64,
                    ZziOp::Umin => nv.min(val),
                    ZziOp::Subr => val.wrapping_sub(nv),
                    ZziOp::Insr => nv,
                };
                elem::put(&mut d, i, esz, r & mask(esz));
            }
        }
    }
    cpu.write(a.env(0)?, &d)?;
    Ok(())
}

fn reduce(cpu: &mut CpuState, a: &Args<'_>, op: ReduceOp, esz: u8) -> HelperResult<u64> {
    let vsz = simd_oprsz(a.desc(2)?);
    let n = cpu.read(a.env(0)?, vsz)?;
    let g = cpu.read(a.env(1)?, vsz / 8)?;
    let vals = (0..vsz >> esz).filter(|&i| active(&g, i, esz)).map(|i| elem::get(&n, i, esz));
    let m = mask(esz);
    let smax = (m >> 1) as i64;

    let r = match op {
        ReduceOp::Orv => vals.fold(0, |acc, v| acc | v),
        ReduceOp::Eorv => vals.fold(0, |acc, v| acc ^ v),
        ReduceOp::Andv => vals.fold(m, |acc, v| acc & v),
        ReduceOp::Saddv => vals.fold(0i64, |acc, v| acc.wrapping_add(sext(v, esz))) as u64,
        ReduceOp::Uaddv => vals.fold(0u64, |acc, v| acc.wrapping_add(v)),
        ReduceOp::Smaxv => vals.fold(-smax - 1, |acc, v| acc.max(sext(v, esz))) as u64 & m,
        ReduceOp::Sminv => vals.fold(smax, |acc, v| acc.min(sext(v, esz))) as u64 & m,
        ReduceOp::Umaxv => vals.fold(0, u64::max),
        ReduceOp::Uminv => vals.fold(m, u64::min),
    };
    Ok(r)
}
