//! 无谓词整数运算：加宽/收窄、宽移位、ADR、点积与矩阵乘
//!
//! 加宽与收窄助手的 esz 为宽元素大小，窄元素大小为 `esz - 1`。

use sve_ir::desc::{simd_data, simd_oprsz};
use sve_ir::{ZzOp, ZzzOp, ZzzzOp};

use super::{Args, HelperResult};
use crate::elem::{self, bits, mask, sat_signed, sat_unsigned, sext};
use crate::state::CpuState;

/// 无进位乘法，截断到元素宽度
fn clmul(a: u64, b: u64, esz: u8) -> u64 {
    let mut r = 0u64;
    for i in 0..bits(esz) {
        if (b >> i) & 1 != 0 {
            r ^= a << i;
        }
    }
    r & mask(esz)
}

/// FTSSEL 的浮点常数 1.0
fn fp_one(esz: u8) -> u64 {
    match esz {
        1 => 0x3c00,
        2 => 0x3f80_0000,
        _ => 0x3ff0_0000_0000_0000,
    }
}

fn zzz_elem(op: ZzzOp, n: u64, m: u64, data: u32, esz: u8) -> u64 {
    let width = bits(esz);
    let (sn, sm) = (sext(n, esz) as i128, sext(m, esz) as i128);
    let r = match op {
        ZzzOp::Smulh => ((sn * sm) >> width) as u64,
        ZzzOp::Umulh => (((n & mask(esz)) as u128 * (m & mask(esz)) as u128) >> width) as u64,
        ZzzOp::Pmul => clmul(n, m, esz),
        ZzzOp::Sqdmulh => sat_signed((2 * sn * sm) >> width, esz),
        ZzzOp::Sqrdmulh => sat_signed((2 * sn * sm + (1i128 << (width - 1))) >> width, esz),
        ZzzOp::Ftssel => {
            let mut v = if m & 1 != 0 { fp_one(esz) } else { n };
            if m & 2 != 0 {
                v ^= 1 << (width - 1);
            }
            v
        }
        ZzzOp::AdrP32 | ZzzOp::AdrP64 => n.wrapping_add(m << data),
        ZzzOp::AdrS32 => n.wrapping_add((sext(m, 2) as u64) << data),
        ZzzOp::AdrU32 => n.wrapping_add((m & 0xffff_ffff) << data),
        _ => unreachable!("{op:?} is not an element-wise op"),
    };
    r & mask(esz)
}

/// 元素内循环右移
fn ror(v: u64, sh: u32, esz: u8) -> u64 {
    let width = bits(esz);
    let v = v & mask(esz);
    let sh = sh % width;
    if sh == 0 { v } else { ((v >> sh) | (v << (width - sh))) & mask(esz) }
}

/// (d, n, m, desc)
pub(super) fn zzz(cpu: &mut CpuState, op: ZzzOp, esz: u8, a: &Args<'_>) -> HelperResult<Option<u64>> {
    let desc = a.desc(3)?;
    let vsz = simd_oprsz(desc);
    let data = simd_data(desc).max(0) as u32;
    let dofs = a.env(0)?;
    let n = cpu.read(a.env(1)?, vsz)?;
    let m = cpu.read(a.env(2)?, vsz)?;
    let elements = vsz >> esz;

    let mut d = vec![0u8; vsz];
    match op {
        ZzzOp::AsrWide | ZzzOp::LsrWide | ZzzOp::LslWide => {
            for i in 0..elements {
                let nv = elem::get(&n, i, esz);
                let sh = elem::get(&m, (i << esz) >> 3, 3);
                let r = match op {
                    ZzzOp::AsrWide => (sext(nv, esz) >> sh.min(bits(esz) as u64 - 1)) as u64,
                    ZzzOp::LsrWide if sh < bits(esz) as u64 => nv >> sh,
                    ZzzOp::LslWide if sh < bits(esz) as u64 => nv << sh,
                    _ => 0,
                };
                elem::put(&mut d, i, esz, r & mask(esz));
            }
        }
        ZzzOp::Saddl | ZzzOp::Uaddl | ZzzOp::Ssubl | ZzzOp::Usubl | ZzzOp::Sabdl | ZzzOp::Uabdl
        | ZzzOp::Smull | ZzzOp::Umull => {
            let narrow = esz - 1;
            let (sel_n, sel_m) = ((data & 1) as usize, ((data >> 1) & 1) as usize);
            let signed = matches!(op, ZzzOp::Saddl | ZzzOp::Ssubl | ZzzOp::Sabdl | ZzzOp::Smull);
            for i in 0..elements {
                let nv = elem::get(&n, 2 * i + sel_n, narrow);
                let mv = elem::get(&m, 2 * i + sel_m, narrow);
                let (x, y) = if signed {
                    (sext(nv, narrow) as i128, sext(mv, narrow) as i128)
                } else {
                    (nv as i128, mv as i128)
                };
                let r = match op {
                    ZzzOp::Saddl | ZzzOp::Uaddl => x + y,
                    ZzzOp::Ssubl | ZzzOp::Usubl => x - y,
                    ZzzOp::Sabdl | ZzzOp::Uabdl => (x - y).abs(),
                    _ => x * y,
                };
                elem::put(&mut d, i, esz, r as u64 & mask(esz));
            }
        }
        ZzzOp::Saddw | ZzzOp::Uaddw | ZzzOp::Ssubw | ZzzOp::Usubw => {
            let narrow = esz - 1;
            let sel = (data & 1) as usize;
            let signed = matches!(op, ZzzOp::Saddw | ZzzOp::Ssubw);
            for i in 0..elements {
                let nv = elem::get(&n, i, esz);
                let mv = elem::get(&m, 2 * i + sel, narrow);
                let mv = if signed { sext(mv, narrow) as u64 } else { mv };
                let r = match op {
                    ZzzOp::Saddw | ZzzOp::Uaddw => nv.wrapping_add(mv),
                    _ => nv.wrapping_sub(mv),
                };
                elem::put(&mut d, i, esz, r & mask(esz));
            }
        }
        ZzzOp::Addhn | ZzzOp::Subhn => {
            let narrow = esz - 1;
            let top = (data & 1) as usize;
            if top == 1 {
                d = cpu.read(dofs, vsz)?;
            }
            for i in 0..elements {
                let (nv, mv) = (elem::get(&n, i, esz), elem::get(&m, i, esz));
                let r = match op {
                    ZzzOp::Addhn => nv.wrapping_add(mv),
                    _ => nv.wrapping_sub(mv),
                };
                let hi = (r & mask(esz)) >> bits(narrow);
                elem::put(&mut d, 2 * i + top, narrow, hi);
                if top == 0 {
                    elem::put(&mut d, 2 * i + 1, narrow, 0);
                }
            }
        }
        ZzzOp::Xar => {
            for i in 0..elements {
                let v = elem::get(&n, i, esz) ^ elem::get(&m, i, esz);
                elem::put(&mut d, i, esz, ror(v, data, esz));
            }
        }
        _ => {
            for i in 0..elements {
                let r = zzz_elem(op, elem::get(&n, i, esz), elem::get(&m, i, esz), data, esz);
                elem::put(&mut d, i, esz, r);
            }
        }
    }
    cpu.write(dofs, &d)?;
    Ok(None)
}

/// 8 位整数 2x8 矩阵乘：每 128 位段 `d[i][j] += sum(n[i][k] * m[j][k])`
fn mmla(d: &mut [u8], acc: &[u8], n: &[u8], m: &[u8], n_signed: bool, m_signed: bool) {
    let val = |buf: &[u8], idx: usize, signed: bool| -> i64 {
        let v = buf[idx] as u64;
        if signed { sext(v, 0) } else { v as i64 }
    };
    for seg in (0..d.len()).step_by(16) {
        for i in 0..2 {
            for j in 0..2 {
                let k_sum: i64 = (0..8)
                    .map(|k| val(n, seg + i * 8 + k, n_signed) * val(m, seg + j * 8 + k, m_signed))
                    .sum();
                let e = seg / 4 + i * 2 + j;
                let r = (elem::get(acc, e, 2) as u32).wrapping_add(k_sum as u32);
                elem::put(d, e, 2, r as u64);
            }
        }
    }
}

/// (d, n, m, a, desc)
pub(super) fn zzzz(cpu: &mut CpuState, op: ZzzzOp, esz: u8, a: &Args<'_>) -> HelperResult<Option<u64>> {
    let vsz = simd_oprsz(a.desc(4)?);
    let n = cpu.read(a.env(1)?, vsz)?;
    let m = cpu.read(a.env(2)?, vsz)?;
    let acc = cpu.read(a.env(3)?, vsz)?;
    let elements = vsz >> esz;
    let mut d = vec![0u8; vsz];

    match op {
        ZzzzOp::Sdot | ZzzzOp::Udot | ZzzzOp::Usdot => {
            let narrow = esz - 2;
            let (ns, ms) = match op {
                ZzzzOp::Sdot => (true, true),
                ZzzzOp::Udot => (false, false),
                _ => (false, true),
            };
            let ext = |v: u64, signed: bool| if signed { sext(v, narrow) as i128 } else { v as i128 };
            for i in 0..elements {
                let sum: i128 = (0..4)
                    .map(|k| {
                        ext(elem::get(&n, 4 * i + k, narrow), ns) * ext(elem::get(&m, 4 * i + k, narrow), ms)
                    })
                    .sum();
                let r = elem::get(&acc, i, esz).wrapping_add(sum as u64);
                elem::put(&mut d, i, esz, r & mask(esz));
            }
        }
        ZzzzOp::Smmla => mmla(&mut d, &acc, &n, &m, true, true),
        ZzzzOp::Ummla => mmla(&mut d, &acc, &n, &m, false, false),
        ZzzzOp::Usmmla => mmla(&mut d, &acc, &n, &m, false, true),
        ZzzzOp::Saba | ZzzzOp::Uaba => {
            for i in 0..elements {
                let (nv, mv) = (elem::get(&n, i, esz), elem::get(&m, i, esz));
                let diff = if op == ZzzzOp::Saba {
                    (sext(nv, esz) as i128 - sext(mv, esz) as i128).unsigned_abs() as u64
                } else {
                    nv.abs_diff(mv)
                };
                let r = elem::get(&acc, i, esz).wrapping_add(diff);
                elem::put(&mut d, i, esz, r & mask(esz));
            }
        }
        ZzzzOp::Tbl2 => unreachable!("TBL is a permute"),
    }
    cpu.write(a.env(0)?, &d)?;
    Ok(None)
}

/// 宽元素右移并收窄
fn narrow_elem(op: ZzOp, v: u64, sh: u32, esz: u8) -> u64 {
    let narrow = esz - 1;
    let sv = sext(v, esz) as i128;
    let uv = (v & mask(esz)) as i128;
    let r = match op {
        ZzOp::Shrn => (uv >> sh) as u64,
        ZzOp::Rshrn => {
            let round = if sh == 0 { 0 } else { 1i128 << (sh - 1) };
            ((uv + round) >> sh) as u64
        }
        ZzOp::Sqshrn | ZzOp::Sqxtn => sat_signed(sv >> sh, narrow),
        ZzOp::Uqshrn | ZzOp::Uqxtn => sat_unsigned(uv >> sh, narrow),
        ZzOp::Sqshrun | ZzOp::Sqxtun => sat_unsigned(sv >> sh, narrow),
        _ => unreachable!("{op:?} is not a narrowing op"),
    };
    r & mask(narrow)
}

/// (d, n, desc)
pub(super) fn zz(cpu: &mut CpuState, op: ZzOp, esz: u8, a: &Args<'_>) -> HelperResult<Option<u64>> {
    let desc = a.desc(2)?;
    let vsz = simd_oprsz(desc);
    let data = simd_data(desc).max(0) as u32;
    let dofs = a.env(0)?;
    let n = cpu.read(a.env(1)?, vsz)?;
    let old = cpu.read(dofs, vsz)?;
    let elements = vsz >> esz;
    let width = bits(esz);
    let mut d = vec![0u8; vsz];

    match op {
        ZzOp::Sshll | ZzOp::Ushll => {
            let (sh, top) = (data & 0xff, ((data >> 8) & 1) as usize);
            let narrow = esz - 1;
            for i in 0..elements {
                let v = elem::get(&n, 2 * i + top, narrow);
                let v = if op == ZzOp::Sshll { sext(v, narrow) as u64 } else { v };
                elem::put(&mut d, i, esz, (v << sh) & mask(esz));
            }
        }
        ZzOp::Shrn | ZzOp::Rshrn | ZzOp::Sqshrn | ZzOp::Uqshrn | ZzOp::Sqshrun | ZzOp::Sqxtn
        | ZzOp::Uqxtn | ZzOp::Sqxtun => {
            let (sh, top) = (data & 0xff, ((data >> 8) & 1) as usize);
            let narrow = esz - 1;
            // 顶部形式保留偶数窄元素
            if top == 1 {
                d.copy_from_slice(&old);
            }
            for i in 0..elements {
                let r = narrow_elem(op, elem::get(&n, i, esz), sh, esz);
                elem::put(&mut d, 2 * i + top, narrow, r);
                if top == 0 {
                    elem::put(&mut d, 2 * i + 1, narrow, 0);
                }
            }
        }
        ZzOp::Ssra | ZzOp::Usra | ZzOp::Srsra | ZzOp::Ursra => {
            let sh = data.min(width);
            for i in 0..elements {
                let nv = elem::get(&n, i, esz);
                let (sv, uv) = (sext(nv, esz) as i128, nv as i128);
                let round = if sh == 0 { 0 } else { 1i128 << (sh - 1) };
                let add = match op {
                    ZzOp::Ssra => sv >> sh,
                    ZzOp::Usra => uv >> sh,
                    ZzOp::Srsra => (sv + round) >> sh,
                    _ => (uv + round) >> sh,
                };
                let r = elem::get(&old, i, esz).wrapping_add(add as u64);
                elem::put(&mut d, i, esz, r & mask(esz));
            }
        }
        ZzOp::Sri => {
            for i in 0..elements {
                let (dv, nv) = (elem::get(&old, i, esz), elem::get(&n, i, esz));
                let r = if data >= width {
                    dv
                } else {
                    let keep = !(mask(esz) >> data) & mask(esz);
                    (dv & keep) | (nv >> data)
                };
                elem::put(&mut d, i, esz, r);
            }
        }
        ZzOp::Sli => {
            for i in 0..elements {
                let (dv, nv) = (elem::get(&old, i, esz), elem::get(&n, i, esz));
                let r = if data >= width {
                    dv
                } else {
                    let keep = (1u64 << data) - 1;
                    ((dv & keep) | (nv << data)) & mask(esz)
                };
                elem::put(&mut d, i, esz, r);
            }
        }
        _ => unreachable!("{op:?} is a permute"),
    }
    cpu.write(dofs, &d)?;
    Ok(None)
}
