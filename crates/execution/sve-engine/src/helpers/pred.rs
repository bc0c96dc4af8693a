//! 谓词助手：PredTest、分割、计数、WHILE 与谓词置换
//!
//! 谓词第 `i << esz` 位对应第 `i` 个 esz 元素；按 64 位字处理时不足一个字
//! 的尾部补零。

use sve_ir::desc::{pred_data, pred_esz, pred_oprsz};
use sve_ir::predflags::{PREDTEST_INIT, iter_predtest_fwd};
use sve_ir::{BrkOp, Helper, PermPredOp};

use super::{Args, HelperResult};
use crate::elem::{self, esz_ones, pred_bit, pred_word, put_pred_word, set_pred_bit};
use crate::state::CpuState;

pub(super) fn call(cpu: &mut CpuState, helper: Helper, a: &Args<'_>) -> HelperResult<Option<u64>> {
    let ret = match helper {
        Helper::PredTest => {
            let words = a.desc(2)? as usize;
            let d = cpu.read(a.env(0)?, words * 8)?;
            let g = cpu.read(a.env(1)?, words * 8)?;
            Some(predtest(&d, &g) as u64)
        }
        Helper::PredTest1 => Some(iter_predtest_fwd(a.temp(0)?, a.temp(1)?, PREDTEST_INIT) as u64),
        Helper::LastActiveElement => {
            let desc = a.desc(1)?;
            let g = cpu.read(a.env(0)?, pred_oprsz(desc))?;
            Some(last_active_element(&g, pred_esz(desc)) as u64)
        }
        Helper::Pfirst => Some(pfirst(cpu, a)? as u64),
        Helper::Pnext => Some(pnext(cpu, a)? as u64),
        Helper::Brk { op, flags } => {
            let f = brk(cpu, op, a)?;
            flags.then_some(f as u64)
        }
        Helper::Cntp => {
            let desc = a.desc(2)?;
            let psz = pred_oprsz(desc);
            let n = cpu.read(a.env(0)?, psz)?;
            let g = cpu.read(a.env(1)?, psz)?;
            let mask = esz_ones(pred_esz(desc));
            let count: u32 = (0..psz.div_ceil(8))
                .map(|i| (pred_word(&n, i) & pred_word(&g, i) & mask).count_ones())
                .sum();
            Some(count as u64)
        }
        Helper::Whilel => Some(do_while(cpu, a, false)? as u64),
        Helper::Whileg => Some(do_while(cpu, a, true)? as u64),
        Helper::PermPred(op) => {
            perm_pred(cpu, op, a)?;
            None
        }
        _ => unreachable!("{helper:?} routed to predicate helpers"),
    };
    Ok(ret)
}

/// 对两个等长谓词计算 PredTest 标志字
pub(crate) fn predtest(d: &[u8], g: &[u8]) -> u32 {
    let words = d.len().max(g.len()).div_ceil(8);
    (0..words).fold(PREDTEST_INIT, |flags, i| {
        iter_predtest_fwd(pred_word(d, i), pred_word(g, i), flags)
    })
}

/// 元素 esz 的全真谓词
fn ones(psz: usize, esz: u8) -> Vec<u8> {
    masked(&vec![0xff; psz], esz)
}

/// 只保留每个元素的最低位
fn masked(g: &[u8], esz: u8) -> Vec<u8> {
    let mut p = g.to_vec();
    for i in 0..g.len().div_ceil(8) {
        let w = pred_word(g, i) & esz_ones(esz);
        put_pred_word(&mut p, i, w);
    }
    p
}

/// 最后一个活动元素的字节偏移；没有时为 `-(1 << esz)`
pub(crate) fn last_active_element(g: &[u8], esz: u8) -> i64 {
    let mask = esz_ones(esz);
    for i in (0..g.len().div_ceil(8)).rev() {
        let w = pred_word(g, i) & mask;
        if w != 0 {
            return (i * 64 + 63 - w.leading_zeros() as usize) as i64;
        }
    }
    -(1i64 << esz)
}

/// `g` 的最后一个活动位在 `n` 中是否为真
fn last_active_pred(n: &[u8], g: &[u8]) -> bool {
    let last = last_active_element(g, 0);
    last >= 0 && pred_bit(n, last as usize)
}

fn pfirst(cpu: &mut CpuState, a: &Args<'_>) -> HelperResult<u32> {
    let psz = pred_oprsz(a.desc(2)?);
    let dofs = a.env(0)?;
    let mut d = cpu.read(dofs, psz)?;
    let g = cpu.read(a.env(1)?, psz)?;
    for i in 0..psz.div_ceil(8) {
        let gw = pred_word(&g, i);
        if gw != 0 {
            let w = pred_word(&d, i) | (gw & gw.wrapping_neg());
            put_pred_word(&mut d, i, w);
            break;
        }
    }
    cpu.write(dofs, &d)?;
    Ok(predtest(&d, &g))
}

fn pnext(cpu: &mut CpuState, a: &Args<'_>) -> HelperResult<u32> {
    let desc = a.desc(2)?;
    let (psz, esz) = (pred_oprsz(desc), pred_esz(desc));
    let dofs = a.env(0)?;
    let old = cpu.read(dofs, psz)?;
    let g = cpu.read(a.env(1)?, psz)?;

    let start = ((last_active_element(&old, esz) + (1 << esz)) >> esz) as usize;
    let elements = (psz * 8) >> esz;
    let mut d = vec![0u8; psz];
    if let Some(e) = (start..elements).find(|&e| elem::active(&g, e, esz)) {
        set_pred_bit(&mut d, e << esz, true);
    }
    cpu.write(dofs, &d)?;
    Ok(predtest(&d, &masked(&g, esz)))
}

/// 分割的逐字计算；`brk` 记录是否已遇到分割点
fn brk_word(n: u64, g: u64, brk: &mut bool, after: bool) -> u64 {
    if *brk {
        0
    } else if n & g == 0 {
        g
    } else {
        let first = n & g & (n & g).wrapping_neg();
        *brk = true;
        if after { first | (first - 1) } else { first - 1 }
    }
}

/// 零化形式：d = brk(n) & g
fn brk_z(n: &[u8], g: &[u8], after: bool) -> Vec<u8> {
    let mut d = vec![0u8; g.len()];
    let mut brk = false;
    for i in 0..g.len().div_ceil(8) {
        let gw = pred_word(g, i);
        put_pred_word(&mut d, i, brk_word(pred_word(n, i), gw, &mut brk, after) & gw);
    }
    d
}

fn brk(cpu: &mut CpuState, op: BrkOp, a: &Args<'_>) -> HelperResult<u32> {
    let three = matches!(op, BrkOp::Pa | BrkOp::Pb);
    let (gi, di) = if three { (3, 4) } else { (2, 3) };
    let psz = pred_oprsz(a.desc(di)?);
    let dofs = a.env(0)?;
    let n = cpu.read(a.env(1)?, psz)?;
    let g = cpu.read(a.env(gi)?, psz)?;

    let (d, flags) = match op {
        BrkOp::Pa | BrkOp::Pb => {
            if last_active_pred(&n, &g) {
                let m = cpu.read(a.env(2)?, psz)?;
                let d = brk_z(&m, &g, op == BrkOp::Pa);
                let f = predtest(&d, &g);
                (d, f)
            } else {
                (vec![0u8; psz], PREDTEST_INIT)
            }
        }
        BrkOp::Az | BrkOp::Bz => {
            let d = brk_z(&n, &g, op == BrkOp::Az);
            let f = predtest(&d, &g);
            (d, f)
        }
        BrkOp::Am | BrkOp::Bm => {
            let old = cpu.read(dofs, psz)?;
            let mut d = vec![0u8; psz];
            let mut brk = false;
            for i in 0..psz.div_ceil(8) {
                let gw = pred_word(&g, i);
                let b = brk_word(pred_word(&n, i), gw, &mut brk, op == BrkOp::Am);
                put_pred_word(&mut d, i, (b & gw) | (pred_word(&old, i) & !gw));
            }
            let f = predtest(&d, &g);
            (d, f)
        }
        BrkOp::N => {
            // Pdm 同时是输入
            if last_active_pred(&n, &g) {
                let d = cpu.read(dofs, psz)?;
                let f = predtest(&d, &vec![0xff; psz]);
                (d, f)
            } else {
                (vec![0u8; psz], PREDTEST_INIT)
            }
        }
    };
    cpu.write(dofs, &d)?;
    Ok(flags)
}

/// `count` 个元素为真：WHILELO 类从低端，WHILEGT 类从高端
fn do_while(cpu: &mut CpuState, a: &Args<'_>, from_top: bool) -> HelperResult<u32> {
    let desc = a.desc(2)?;
    let (psz, esz) = (pred_oprsz(desc), pred_esz(desc));
    let elements = (psz * 8) >> esz;
    let count = a.temp(1)?.min(elements as u64) as usize;

    let range = if from_top { elements - count..elements } else { 0..count };
    let mut d = vec![0u8; psz];
    for e in range {
        set_pred_bit(&mut d, e << esz, true);
    }
    cpu.write(a.env(0)?, &d)?;
    Ok(predtest(&d, &ones(psz, esz)))
}

/// 第 `e` 个元素对应的 `1 << esz` 个谓词位
fn get_group(p: &[u8], e: usize, esz: u8) -> u8 {
    let w = 1usize << esz;
    (0..w).fold(0, |acc, k| acc | (pred_bit(p, e * w + k) as u8) << k)
}

fn set_group(p: &mut [u8], e: usize, esz: u8, v: u8) {
    let w = 1usize << esz;
    for k in 0..w {
        set_pred_bit(p, e * w + k, (v >> k) & 1 != 0);
    }
}

fn perm_pred(cpu: &mut CpuState, op: PermPredOp, a: &Args<'_>) -> HelperResult<()> {
    let binary = matches!(op, PermPredOp::Zip | PermPredOp::Uzp | PermPredOp::Trn);
    let desc = a.desc(if binary { 3 } else { 2 })?;
    let (psz, esz) = (pred_oprsz(desc), pred_esz(desc));
    let high_odd = pred_data(desc) != 0;
    let n = cpu.read(a.env(1)?, psz)?;
    let m = if binary { cpu.read(a.env(2)?, psz)? } else { Vec::new() };

    let elements = (psz * 8) >> esz;
    let half = elements / 2;
    let odd = high_odd as usize;
    let mut d = vec![0u8; psz];
    match op {
        PermPredOp::Zip => {
            let base = if high_odd { half } else { 0 };
            for i in 0..half {
                set_group(&mut d, 2 * i, esz, get_group(&n, base + i, esz));
                set_group(&mut d, 2 * i + 1, esz, get_group(&m, base + i, esz));
            }
        }
        PermPredOp::Uzp => {
            for i in 0..half {
                set_group(&mut d, i, esz, get_group(&n, 2 * i + odd, esz));
                set_group(&mut d, half + i, esz, get_group(&m, 2 * i + odd, esz));
            }
        }
        PermPredOp::Trn => {
            for i in 0..half {
                set_group(&mut d, 2 * i, esz, get_group(&n, 2 * i + odd, esz));
                set_group(&mut d, 2 * i + 1, esz, get_group(&m, 2 * i + odd, esz));
            }
        }
        PermPredOp::Rev => {
            for i in 0..elements {
                set_group(&mut d, i, esz, get_group(&n, elements - 1 - i, esz));
            }
        }
        PermPredOp::Punpk => {
            // 字节谓词的一半展开为半字谓词
            let bits = psz * 8;
            let base = if high_odd { bits / 2 } else { 0 };
            for i in 0..bits / 2 {
                set_pred_bit(&mut d, 2 * i, pred_bit(&n, base + i));
            }
        }
    }
    cpu.write(a.env(0)?, &d)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predtest_spans_words() {
        // 96 字节 VL：谓词 12 字节，最后活动元素位于第二个字
        let mut d = vec![0u8; 12];
        let g = vec![0xffu8; 12];
        d[0] = 1;
        let f = predtest(&d, &g);
        // N=1, Z=0, C=1（最后一个活动元素为假）
        assert_eq!(f & 0x8000_0003, 0x8000_0003);
        d[11] = 0x80;
        assert_eq!(predtest(&d, &g) & 1, 0);
    }

    #[test]
    fn test_last_active_element() {
        let mut g = vec![0u8; 4];
        assert_eq!(last_active_element(&g, 2), -4);
        g[3] = 0x11;
        assert_eq!(last_active_element(&g, 2), 28);
        // 非元素对齐位被忽略
        g[3] = 0x02;
        assert_eq!(last_active_element(&g, 1), -2);
    }

    #[test]
    fn test_brk_word() {
        let mut brk = false;
        // 第一个真元素为位 2
        assert_eq!(brk_word(0b0100, 0xff, &mut brk, true), 0b0111);
        assert!(brk);
        assert_eq!(brk_word(0xff, 0xff, &mut brk, true), 0);
        let mut brk = false;
        assert_eq!(brk_word(0b0100, 0xff, &mut brk, false), 0b0011);
    }

    #[test]
    fn test_groups() {
        let mut p = vec![0u8; 2];
        set_group(&mut p, 3, 1, 0b11);
        assert_eq!(p[0], 0b1100_0000);
        assert_eq!(get_group(&p, 3, 1), 0b11);
    }
}
