//! 向量置换：查表、交织、EXT、解包与反转

use sve_ir::desc::{simd_data, simd_oprsz};
use sve_ir::{ZzOp, ZzzOp};

use super::{Args, HelperResult};
use crate::elem::{self, mask, sext};
use crate::state::CpuState;

pub(super) fn is_zzz_perm(op: ZzzOp) -> bool {
    matches!(
        op,
        ZzzOp::Tbl | ZzzOp::Tbx | ZzzOp::Zip | ZzzOp::Uzp | ZzzOp::Trn | ZzzOp::Ext
    )
}

pub(super) fn is_zz_perm(op: ZzOp) -> bool {
    matches!(
        op,
        ZzOp::SunpkLo | ZzOp::SunpkHi | ZzOp::UunpkLo | ZzOp::UunpkHi | ZzOp::Rev
    )
}

/// (d, n, m, desc)
pub(super) fn zzz(cpu: &mut CpuState, op: ZzzOp, esz: u8, a: &Args<'_>) -> HelperResult<Option<u64>> {
    let desc = a.desc(3)?;
    let vsz = simd_oprsz(desc);
    let data = simd_data(desc).max(0) as usize;
    let dofs = a.env(0)?;
    let n = cpu.read(a.env(1)?, vsz)?;
    let m = cpu.read(a.env(2)?, vsz)?;
    let esize = 1usize << esz;
    let elements = vsz >> esz;
    let half = elements / 2;

    let mut d = match op {
        ZzzOp::Tbx => cpu.read(dofs, vsz)?,
        _ => vec![0u8; vsz],
    };
    match op {
        ZzzOp::Tbl | ZzzOp::Tbx => {
            for i in 0..elements {
                let idx = elem::get(&m, i, esz);
                if idx < elements as u64 {
                    elem::put(&mut d, i, esz, elem::get(&n, idx as usize, esz));
                } else if op == ZzzOp::Tbl {
                    elem::put(&mut d, i, esz, 0);
                }
            }
        }
        ZzzOp::Zip => {
            let base = data / esize;
            for i in 0..half {
                elem::put(&mut d, 2 * i, esz, elem::get(&n, base + i, esz));
                elem::put(&mut d, 2 * i + 1, esz, elem::get(&m, base + i, esz));
            }
        }
        ZzzOp::Uzp => {
            // n:m 拼接后取偶数或奇数元素
            let cat = [n.as_slice(), m.as_slice()].concat();
            let odd = data / esize;
            for i in 0..elements {
                elem::put(&mut d, i, esz, elem::get(&cat, 2 * i + odd, esz));
            }
        }
        ZzzOp::Trn => {
            let odd = data / esize;
            for i in 0..half {
                elem::put(&mut d, 2 * i, esz, elem::get(&n, 2 * i + odd, esz));
                elem::put(&mut d, 2 * i + 1, esz, elem::get(&m, 2 * i + odd, esz));
            }
        }
        ZzzOp::Ext => {
            let ofs = data.min(vsz);
            d[..vsz - ofs].copy_from_slice(&n[ofs..]);
            d[vsz - ofs..].copy_from_slice(&m[..ofs]);
        }
        _ => unreachable!("{op:?} is not a permute"),
    }
    cpu.write(dofs, &d)?;
    Ok(None)
}

/// 两寄存器表查找：(d, 表一, 表二, 下标, desc)
pub(super) fn tbl2(cpu: &mut CpuState, esz: u8, a: &Args<'_>) -> HelperResult<Option<u64>> {
    let vsz = simd_oprsz(a.desc(4)?);
    let t1 = cpu.read(a.env(1)?, vsz)?;
    let t2 = cpu.read(a.env(2)?, vsz)?;
    let idx = cpu.read(a.env(3)?, vsz)?;
    let elements = vsz >> esz;
    let mut d = vec![0u8; vsz];
    for i in 0..elements {
        let k = elem::get(&idx, i, esz);
        let v = if k < elements as u64 {
            elem::get(&t1, k as usize, esz)
        } else if k < 2 * elements as u64 {
            elem::get(&t2, k as usize - elements, esz)
        } else {
            0
        };
        elem::put(&mut d, i, esz, v);
    }
    cpu.write(a.env(0)?, &d)?;
    Ok(None)
}

/// (d, n, desc)；解包时 esz 为宽元素大小
pub(super) fn zz(cpu: &mut CpuState, op: ZzOp, esz: u8, a: &Args<'_>) -> HelperResult<Option<u64>> {
    let vsz = simd_oprsz(a.desc(2)?);
    let n = cpu.read(a.env(1)?, vsz)?;
    let elements = vsz >> esz;
    let mut d = vec![0u8; vsz];
    match op {
        ZzOp::Rev => {
            for i in 0..elements {
                elem::put(&mut d, i, esz, elem::get(&n, elements - 1 - i, esz));
            }
        }
        _ => {
            let narrow = esz - 1;
            let hi = matches!(op, ZzOp::SunpkHi | ZzOp::UunpkHi);
            let signed = matches!(op, ZzOp::SunpkLo | ZzOp::SunpkHi);
            let base = if hi { elements } else { 0 };
            for i in 0..elements {
                let v = elem::get(&n, base + i, narrow);
                let v = if signed { sext(v, narrow) as u64 & mask(esz) } else { v };
                elem::put(&mut d, i, esz, v);
            }
        }
    }
    cpu.write(a.env(0)?, &d)?;
    Ok(None)
}
