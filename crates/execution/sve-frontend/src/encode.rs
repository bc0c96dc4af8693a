//! 指令编码器
//!
//! 测试、基准与引擎场景用来拼出指令字。只覆盖常用形式；
//! 参数不做合法性检查，越界位被截断。

#[inline]
fn f(v: u32, pos: u32, len: u32) -> u32 {
    (v & (u32::MAX >> (32 - len))) << pos
}

#[inline]
fn zzz(base: u32, esz: u8, rd: u32, rn: u32, rm: u32) -> u32 {
    base | f(esz as u32, 22, 2) | f(rm, 16, 5) | f(rn, 5, 5) | f(rd, 0, 5)
}

#[inline]
fn zpz(base: u32, esz: u8, rd: u32, pg: u32, rn: u32) -> u32 {
    base | f(esz as u32, 22, 2) | f(pg, 10, 3) | f(rn, 5, 5) | f(rd, 0, 5)
}

/// 右移立即数的 tsz:imm3：`(16 << esz) - shift`
fn tsz_shr(esz: u8, shift: u32) -> u32 {
    (16u32 << esz).wrapping_sub(shift)
}

/// 左移立即数的 tsz:imm3：`(8 << esz) + shift`
fn tsz_shl(esz: u8, shift: u32) -> u32 {
    (8u32 << esz) + shift
}

// ---- 整数 ----

pub fn add_zzz(esz: u8, rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x0420_0000, esz, rd, rn, rm)
}

pub fn sub_zzz(esz: u8, rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x0420_0400, esz, rd, rn, rm)
}

pub fn sqadd_zzz(esz: u8, rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x0420_1000, esz, rd, rn, rm)
}

pub fn uqsub_zzz(esz: u8, rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x0420_1C00, esz, rd, rn, rm)
}

pub fn and_zzz(rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x0420_3000, 0, rd, rn, rm)
}

pub fn eor_zzz(rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x04A0_3000, 0, rd, rn, rm)
}

/// 谓词控制二元运算：Zdn = Zdn op Zm
pub fn add_zpzz(esz: u8, rdn: u32, pg: u32, rm: u32) -> u32 {
    zpz(0x0400_0000, esz, rdn, pg, rm)
}

pub fn sub_zpzz(esz: u8, rdn: u32, pg: u32, rm: u32) -> u32 {
    zpz(0x0401_0000, esz, rdn, pg, rm)
}

pub fn subr_zpzz(esz: u8, rdn: u32, pg: u32, rm: u32) -> u32 {
    zpz(0x0403_0000, esz, rdn, pg, rm)
}

pub fn mul_zpzz(esz: u8, rdn: u32, pg: u32, rm: u32) -> u32 {
    zpz(0x0410_0000, esz, rdn, pg, rm)
}

pub fn sdiv_zpzz(esz: u8, rdn: u32, pg: u32, rm: u32) -> u32 {
    zpz(0x0414_0000, esz, rdn, pg, rm)
}

pub fn udiv_zpzz(esz: u8, rdn: u32, pg: u32, rm: u32) -> u32 {
    zpz(0x0415_0000, esz, rdn, pg, rm)
}

pub fn smax_zpzz(esz: u8, rdn: u32, pg: u32, rm: u32) -> u32 {
    zpz(0x0408_0000, esz, rdn, pg, rm)
}

pub fn neg(esz: u8, rd: u32, pg: u32, rn: u32) -> u32 {
    zpz(0x0417_A000, esz, rd, pg, rn)
}

pub fn cnt_zpz(esz: u8, rd: u32, pg: u32, rn: u32) -> u32 {
    zpz(0x041A_A000, esz, rd, pg, rn)
}

pub fn uaddv(esz: u8, rd: u32, pg: u32, rn: u32) -> u32 {
    zpz(0x0401_2000, esz, rd, pg, rn)
}

pub fn smaxv(esz: u8, rd: u32, pg: u32, rn: u32) -> u32 {
    zpz(0x0408_2000, esz, rd, pg, rn)
}

pub fn andv(esz: u8, rd: u32, pg: u32, rn: u32) -> u32 {
    zpz(0x041A_2000, esz, rd, pg, rn)
}

/// MLA Zda, Pg/M, Zn, Zm
pub fn mla(esz: u8, rda: u32, pg: u32, rn: u32, rm: u32) -> u32 {
    zpz(0x0400_4000, esz, rda, pg, rn) | f(rm, 16, 5)
}

pub fn asr_zpzi(esz: u8, rdn: u32, pg: u32, shift: u32) -> u32 {
    let x = tsz_shr(esz, shift);
    0x0400_8000 | f(x >> 5, 22, 2) | f(pg, 10, 3) | f(x, 5, 5) | f(rdn, 0, 5)
}

pub fn lsr_zpzi(esz: u8, rdn: u32, pg: u32, shift: u32) -> u32 {
    let x = tsz_shr(esz, shift);
    0x0401_8000 | f(x >> 5, 22, 2) | f(pg, 10, 3) | f(x, 5, 5) | f(rdn, 0, 5)
}

pub fn lsl_zpzi(esz: u8, rdn: u32, pg: u32, shift: u32) -> u32 {
    let x = tsz_shl(esz, shift);
    0x0403_8000 | f(x >> 5, 22, 2) | f(pg, 10, 3) | f(x, 5, 5) | f(rdn, 0, 5)
}

pub fn lsr_zzi(esz: u8, rd: u32, rn: u32, shift: u32) -> u32 {
    let x = tsz_shr(esz, shift);
    0x0420_9400 | f(x >> 5, 22, 2) | f(x, 16, 5) | f(rn, 5, 5) | f(rd, 0, 5)
}

pub fn lsl_zzi(esz: u8, rd: u32, rn: u32, shift: u32) -> u32 {
    let x = tsz_shl(esz, shift);
    0x0420_9C00 | f(x >> 5, 22, 2) | f(x, 16, 5) | f(rn, 5, 5) | f(rd, 0, 5)
}

pub fn index_ii(esz: u8, rd: u32, start: i32, incr: i32) -> u32 {
    0x0420_4000 | f(esz as u32, 22, 2) | f(incr as u32, 16, 5) | f(start as u32, 5, 5) | f(rd, 0, 5)
}

pub fn index_rr(esz: u8, rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x0420_4C00, esz, rd, rn, rm)
}

pub fn dup_i(esz: u8, rd: u32, imm8: i32, shift8: bool) -> u32 {
    0x2538_C000 | f(esz as u32, 22, 2) | f(shift8 as u32, 13, 1) | f(imm8 as u32, 5, 8) | f(rd, 0, 5)
}

pub fn add_zzi(esz: u8, rdn: u32, imm8: u32, shift8: bool) -> u32 {
    0x2520_C000 | f(esz as u32, 22, 2) | f(shift8 as u32, 13, 1) | f(imm8, 5, 8) | f(rdn, 0, 5)
}

pub fn dup_s(esz: u8, rd: u32, rn: u32) -> u32 {
    0x0520_3800 | f(esz as u32, 22, 2) | f(rn, 5, 5) | f(rd, 0, 5)
}

/// CNT{B,H,W,D} Xd, pattern, MUL #mul
pub fn cnt_r(esz: u8, rd: u32, pat: u32, mul: u32) -> u32 {
    0x0420_E000 | f(esz as u32, 22, 2) | f(mul.wrapping_sub(1), 16, 4) | f(pat, 5, 5) | f(rd, 0, 5)
}

pub fn rdvl(rd: u32, imm: i32) -> u32 {
    0x04BF_5000 | f(imm as u32, 5, 6) | f(rd, 0, 5)
}

pub fn movprfx(rd: u32, rn: u32) -> u32 {
    0x0420_BC00 | f(rn, 5, 5) | f(rd, 0, 5)
}

pub fn sdot(esz: u8, rda: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x4400_0000, esz, rda, rn, rm)
}

// ---- 置换 ----

pub fn zip1_z(esz: u8, rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x0520_6000, esz, rd, rn, rm)
}

pub fn rev_v(esz: u8, rd: u32, rn: u32) -> u32 {
    0x0538_3800 | f(esz as u32, 22, 2) | f(rn, 5, 5) | f(rd, 0, 5)
}

pub fn tbl(esz: u8, rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x0520_3000, esz, rd, rn, rm)
}

pub fn compact(esz: u8, rd: u32, pg: u32, rn: u32) -> u32 {
    zpz(0x0521_8000, esz, rd, pg, rn)
}

pub fn sel_zpzz(esz: u8, rd: u32, pg: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x0520_C000, esz, rd, rn, rm) | f(pg, 10, 4)
}

/// CLASTB Zdn, Pg, Zdn, Zm
pub fn clastb_z(esz: u8, rdn: u32, pg: u32, rm: u32) -> u32 {
    zpz(0x0529_8000, esz, rdn, pg, rm)
}

pub fn lastb_r(esz: u8, rd: u32, pg: u32, rn: u32) -> u32 {
    zpz(0x0521_A000, esz, rd, pg, rn)
}

// ---- 谓词 ----

pub fn ptrue(esz: u8, pd: u32, pat: u32) -> u32 {
    0x2518_E000 | f(esz as u32, 22, 2) | f(pat, 5, 5) | f(pd, 0, 4)
}

pub fn ptrues(esz: u8, pd: u32, pat: u32) -> u32 {
    ptrue(esz, pd, pat) | 1 << 16
}

pub fn pfalse(pd: u32) -> u32 {
    0x2518_E400 | f(pd, 0, 4)
}

pub fn setffr() -> u32 {
    0x252C_9000
}

pub fn rdffr(pd: u32) -> u32 {
    0x2519_F000 | f(pd, 0, 4)
}

pub fn ptest(pg: u32, pn: u32) -> u32 {
    0x2550_C000 | f(pg, 10, 4) | f(pn, 5, 4)
}

pub fn and_pppp(pd: u32, pg: u32, pn: u32, pm: u32, s: bool) -> u32 {
    0x2500_4000 | f(s as u32, 22, 1) | f(pm, 16, 4) | f(pg, 10, 4) | f(pn, 5, 4) | f(pd, 0, 4)
}

pub fn brka_z(pd: u32, pg: u32, pn: u32, s: bool) -> u32 {
    0x2510_4000 | f(s as u32, 22, 1) | f(pg, 10, 4) | f(pn, 5, 4) | f(pd, 0, 4)
}

pub fn cntp(esz: u8, rd: u32, pg: u32, pn: u32) -> u32 {
    0x2520_8000 | f(esz as u32, 22, 2) | f(pg, 10, 4) | f(pn, 5, 4) | f(rd, 0, 5)
}

pub fn pfirst(pdn: u32, pg: u32) -> u32 {
    0x2558_C000 | f(pg, 5, 4) | f(pdn, 0, 4)
}

pub fn pnext(esz: u8, pdn: u32, pg: u32) -> u32 {
    0x2519_C400 | f(esz as u32, 22, 2) | f(pg, 5, 4) | f(pdn, 0, 4)
}

/// WHILELT Pd, Rn, Rm（`sf` 为 64 位操作数）
pub fn whilelt(esz: u8, pd: u32, rn: u32, rm: u32, sf: bool) -> u32 {
    0x2520_0400 | f(esz as u32, 22, 2) | f(rm, 16, 5) | f(sf as u32, 12, 1) | f(rn, 5, 5) | f(pd, 0, 4)
}

pub fn whilelo(esz: u8, pd: u32, rn: u32, rm: u32, sf: bool) -> u32 {
    whilelt(esz, pd, rn, rm, sf) | 1 << 11
}

pub fn cmpeq_ppzz(esz: u8, pd: u32, pg: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x2400_A000, esz, pd, rn, rm) | f(pg, 10, 3)
}

pub fn cmpgt_ppzi(esz: u8, pd: u32, pg: u32, rn: u32, imm: i32) -> u32 {
    0x2500_0010 | f(esz as u32, 22, 2) | f(imm as u32, 16, 5) | f(pg, 10, 3) | f(rn, 5, 5) | f(pd, 0, 4)
}

// ---- 浮点 ----

pub fn fadd_zzz(esz: u8, rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x6500_0000, esz, rd, rn, rm)
}

pub fn fmul_zpzz(esz: u8, rdn: u32, pg: u32, rm: u32) -> u32 {
    zpz(0x6502_8000, esz, rdn, pg, rm)
}

pub fn fmla_zpzzz(esz: u8, rda: u32, pg: u32, rn: u32, rm: u32) -> u32 {
    zpz(0x6520_0000, esz, rda, pg, rn) | f(rm, 16, 5)
}

pub fn faddv(esz: u8, rd: u32, pg: u32, rn: u32) -> u32 {
    zpz(0x6500_2000, esz, rd, pg, rn)
}

pub fn fadda(esz: u8, rdn: u32, pg: u32, rm: u32) -> u32 {
    zpz(0x6518_2000, esz, rdn, pg, rm)
}

pub fn frintn(esz: u8, rd: u32, pg: u32, rn: u32) -> u32 {
    zpz(0x6500_A000, esz, rd, pg, rn)
}

pub fn scvtf_ss(rd: u32, pg: u32, rn: u32) -> u32 {
    zpz(0x6594_A000, 2, rd, pg, rn)
}

pub fn fdup(esz: u8, rd: u32, imm8: u32) -> u32 {
    0x2539_C000 | f(esz as u32, 22, 2) | f(imm8, 5, 8) | f(rd, 0, 5)
}

// ---- 访存 ----

/// LD1{B,H,W,D} 标量加标量；`dtype` 见 `extract::msz_dtype`
pub fn ld1_zprr(dtype: u32, zt: u32, pg: u32, rn: u32, rm: u32) -> u32 {
    0xA400_4000 | f(dtype, 21, 4) | f(rm, 16, 5) | f(pg, 10, 3) | f(rn, 5, 5) | f(zt, 0, 5)
}

pub fn ld1_zpri(dtype: u32, zt: u32, pg: u32, rn: u32, imm4: i32) -> u32 {
    0xA400_A000 | f(dtype, 21, 4) | f(imm4 as u32, 16, 4) | f(pg, 10, 3) | f(rn, 5, 5) | f(zt, 0, 5)
}

pub fn ldff1_zprr(dtype: u32, zt: u32, pg: u32, rn: u32, rm: u32) -> u32 {
    ld1_zprr(dtype, zt, pg, rn, rm) | 1 << 13
}

pub fn ldnf1_zpri(dtype: u32, zt: u32, pg: u32, rn: u32, imm4: i32) -> u32 {
    ld1_zpri(dtype, zt, pg, rn, imm4) | 1 << 20
}

/// ST1 标量加标量：`msz` 为内存元素大小，`esz` 为寄存器元素大小
pub fn st1_zprr(msz: u8, esz: u8, zt: u32, pg: u32, rn: u32, rm: u32) -> u32 {
    0xE400_4000
        | f(msz as u32, 23, 2)
        | f(esz as u32, 21, 2)
        | f(rm, 16, 5)
        | f(pg, 10, 3)
        | f(rn, 5, 5)
        | f(zt, 0, 5)
}

pub fn st1_zpri(msz: u8, esz: u8, zt: u32, pg: u32, rn: u32, imm4: i32) -> u32 {
    0xE400_E000
        | f(msz as u32, 23, 2)
        | f(esz as u32, 21, 2)
        | f(imm4 as u32, 16, 4)
        | f(pg, 10, 3)
        | f(rn, 5, 5)
        | f(zt, 0, 5)
}

/// LD2/LD3/LD4 标量加标量；`nreg` 为寄存器数减一
pub fn ldn_zprr(msz: u8, nreg: u32, zt: u32, pg: u32, rn: u32, rm: u32) -> u32 {
    0xA400_C000
        | f(msz as u32, 23, 2)
        | f(nreg, 21, 2)
        | f(rm, 16, 5)
        | f(pg, 10, 3)
        | f(rn, 5, 5)
        | f(zt, 0, 5)
}

pub fn ldr_zri(zt: u32, rn: u32, imm9: i32) -> u32 {
    let imm = imm9 as u32;
    0x8580_4000 | f(imm >> 3, 16, 6) | f(imm, 10, 3) | f(rn, 5, 5) | f(zt, 0, 5)
}

pub fn str_zri(zt: u32, rn: u32, imm9: i32) -> u32 {
    let imm = imm9 as u32;
    0xE580_4000 | f(imm >> 3, 16, 6) | f(imm, 10, 3) | f(rn, 5, 5) | f(zt, 0, 5)
}

pub fn ldr_pri(pt: u32, rn: u32, imm9: i32) -> u32 {
    let imm = imm9 as u32;
    0x8580_0000 | f(imm >> 3, 16, 6) | f(imm, 10, 3) | f(rn, 5, 5) | f(pt, 0, 4)
}

pub fn ld1r(dtype: u32, zt: u32, pg: u32, rn: u32, imm6: u32) -> u32 {
    0x8440_8000
        | f(dtype >> 2, 23, 2)
        | f(imm6, 16, 6)
        | f(dtype, 13, 2)
        | f(pg, 10, 3)
        | f(rn, 5, 5)
        | f(zt, 0, 5)
}

/// PRFB/H/W/D 标量加立即数；`msz` 选择预取粒度
pub fn prf_zpri(msz: u8, prfop: u32, pg: u32, rn: u32, imm6: i32) -> u32 {
    0x85C0_0000
        | f(imm6 as u32, 16, 6)
        | f(msz as u32, 13, 2)
        | f(pg, 10, 3)
        | f(rn, 5, 5)
        | f(prfop, 0, 4)
}

/// LD1{W,D} 聚集，64 位偏移（`Zm` 为偏移向量）
pub fn ld1d_gather64(zt: u32, pg: u32, rn: u32, zm: u32, scaled: bool, ff: bool) -> u32 {
    0xC5C0_C000
        | f(scaled as u32, 21, 1)
        | f(zm, 16, 5)
        | f(ff as u32, 13, 1)
        | f(pg, 10, 3)
        | f(rn, 5, 5)
        | f(zt, 0, 5)
}

/// ST1D 分散，64 位偏移
pub fn st1d_scatter64(zt: u32, pg: u32, rn: u32, zm: u32, scaled: bool) -> u32 {
    0xE580_A000 | f(scaled as u32, 21, 1) | f(zm, 16, 5) | f(pg, 10, 3) | f(rn, 5, 5) | f(zt, 0, 5)
}

// ---- SVE2 ----

pub fn eor3(rdn: u32, rm: u32, rk: u32) -> u32 {
    0x0420_3800 | f(rm, 16, 5) | f(rk, 5, 5) | f(rdn, 0, 5)
}

pub fn saddlb(esz: u8, rd: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x4500_0000, esz, rd, rn, rm)
}

/// SHRNB：`esz` 为窄元素大小
pub fn shrnb(esz: u8, rd: u32, rn: u32, shift: u32) -> u32 {
    let x = tsz_shr(esz, shift);
    0x4520_1000 | f(x >> 5, 22, 1) | f(x, 16, 5) | f(rn, 5, 5) | f(rd, 0, 5)
}

pub fn match_ppzz(esz: u8, pd: u32, pg: u32, rn: u32, rm: u32) -> u32 {
    zzz(0x4520_8000, esz, pd, rn, rm) | f(pg, 10, 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    #[test]
    fn test_encoders_hit_their_patterns() {
        let cases = [
            (add_zzz(2, 0, 1, 2), "ADD_zzz"),
            (sub_zzz(0, 0, 1, 2), "SUB_zzz"),
            (sqadd_zzz(1, 0, 1, 2), "SQADD_zzz"),
            (uqsub_zzz(3, 0, 1, 2), "UQSUB_zzz"),
            (and_zzz(0, 1, 2), "AND_zzz"),
            (eor_zzz(0, 1, 2), "EOR_zzz"),
            (add_zpzz(2, 0, 1, 2), "ADD_zpzz"),
            (sub_zpzz(2, 0, 1, 2), "SUB_zpzz"),
            (subr_zpzz(2, 0, 1, 2), "SUBR_zpzz"),
            (mul_zpzz(2, 0, 1, 2), "MUL_zpzz"),
            (sdiv_zpzz(2, 0, 1, 2), "SDIV_zpzz"),
            (udiv_zpzz(3, 0, 1, 2), "UDIV_zpzz"),
            (smax_zpzz(1, 0, 1, 2), "SMAX_zpzz"),
            (neg(2, 0, 1, 2), "NEG"),
            (cnt_zpz(0, 0, 1, 2), "CNT_zpz"),
            (uaddv(0, 0, 1, 2), "UADDV"),
            (smaxv(2, 0, 1, 2), "SMAXV"),
            (andv(3, 0, 1, 2), "ANDV"),
            (mla(2, 0, 1, 2, 3), "MLA"),
            (asr_zpzi(2, 0, 1, 3), "ASR_zpzi"),
            (lsr_zpzi(1, 0, 1, 16), "LSR_zpzi"),
            (lsl_zpzi(3, 0, 1, 63), "LSL_zpzi"),
            (lsr_zzi(0, 0, 1, 8), "LSR_zzi"),
            (lsl_zzi(2, 0, 1, 5), "LSL_zzi"),
            (index_ii(2, 0, -3, 2), "INDEX_ii"),
            (index_rr(3, 0, 1, 2), "INDEX_rr"),
            (dup_i(1, 0, -1, true), "DUP_i"),
            (add_zzi(2, 0, 7, false), "ADD_zzi"),
            (dup_s(2, 0, 1), "DUP_s"),
            (cnt_r(0, 0, 31, 1), "CNT_r"),
            (rdvl(0, 1), "RDVL"),
            (movprfx(0, 1), "MOVPRFX"),
            (sdot(2, 0, 1, 2), "SDOT_zzzz"),
            (zip1_z(0, 0, 1, 2), "ZIP1_z"),
            (rev_v(2, 0, 1), "REV_v"),
            (tbl(0, 0, 1, 2), "TBL"),
            (compact(2, 0, 1, 2), "COMPACT"),
            (sel_zpzz(2, 0, 1, 2, 3), "SEL_zpzz"),
            (clastb_z(2, 0, 1, 2), "CLASTB_z"),
            (lastb_r(2, 0, 1, 2), "LASTB_r"),
            (ptrue(0, 0, 31), "PTRUE"),
            (ptrues(2, 0, 31), "PTRUE"),
            (pfalse(3), "PFALSE"),
            (setffr(), "SETFFR"),
            (rdffr(1), "RDFFR"),
            (ptest(1, 2), "PTEST"),
            (and_pppp(0, 1, 2, 3, true), "AND_pppp"),
            (brka_z(0, 1, 2, false), "BRKA_z"),
            (cntp(0, 0, 1, 2), "CNTP"),
            (pfirst(0, 1), "PFIRST"),
            (pnext(0, 0, 1), "PNEXT"),
            (whilelt(0, 0, 1, 2, true), "WHILE_lt"),
            (whilelo(2, 0, 1, 2, false), "WHILE_lt"),
            (cmpeq_ppzz(0, 0, 1, 2, 3), "CMPEQ_ppzz"),
            (cmpgt_ppzi(2, 0, 1, 2, -1), "CMPGT_ppzi"),
            (fadd_zzz(2, 0, 1, 2), "FADD_zzz"),
            (fmul_zpzz(3, 0, 1, 2), "FMUL_zpzz"),
            (fmla_zpzzz(2, 0, 1, 2, 3), "FMLA_zpzzz"),
            (faddv(1, 0, 1, 2), "FADDV"),
            (fadda(2, 0, 1, 2), "FADDA"),
            (frintn(2, 0, 1, 2), "FRINTN"),
            (scvtf_ss(0, 1, 2), "SCVTF_ss"),
            (fdup(2, 0, 0x70), "FDUP"),
            (ld1_zprr(10, 0, 1, 2, 3), "LD1_zprr"),
            (ld1_zpri(15, 0, 1, 2, -1), "LD1_zpri"),
            (ldff1_zprr(0, 0, 1, 2, 3), "LDFF1_zprr"),
            (ldnf1_zpri(5, 0, 1, 2, 0), "LDNF1_zpri"),
            (st1_zprr(2, 2, 0, 1, 2, 3), "ST1_zprr"),
            (st1_zpri(0, 3, 0, 1, 2, 1), "ST1_zpri"),
            (ldn_zprr(2, 1, 0, 1, 2, 3), "LDn_zprr"),
            (ldr_zri(0, 1, -2), "LDR_zri"),
            (str_zri(0, 1, 255), "STR_zri"),
            (ldr_pri(0, 1, 3), "LDR_pri"),
            (ld1r(10, 0, 1, 2, 4), "LD1R_zpri"),
            (prf_zpri(2, 1, 0, 1, -3), "PRF"),
            (ld1d_gather64(0, 1, 2, 3, true, false), "LD1_zprz_64"),
            (st1d_scatter64(0, 1, 2, 3, false), "ST1_zprz_64"),
            (eor3(0, 1, 2), "EOR3"),
            (saddlb(2, 0, 1, 2), "SADDLB"),
            (shrnb(0, 0, 1, 3), "SHRNB"),
            (match_ppzz(0, 0, 1, 2, 3), "MATCH"),
        ];
        for (insn, name) in cases {
            let d = decode(insn).unwrap_or_else(|| panic!("{name}: {insn:08x} did not decode"));
            assert_eq!(d.name, name, "insn {insn:08x}");
        }
    }
}
