//! SVE 译码表
//!
//! 每条模板由 32 位比特串给出：`0`/`1` 为固定位，其余字符为通配，空格只作分隔。
//! 查找时按固定位个数降序扫描，因此更具体的模板（包括 `INVALID` 保留编码）
//! 总是先于其基础模板命中。为避免线性扫描，按指令字的 29:22 与 13:10 位建立
//! 4096 个桶，每个桶只保存可能命中的模板下标。
//!
//! 格式函数（`fmt` 子模块）负责把指令字拆成参数结构，同时完成操作数换位：
//! 例如 SUBR 形式把 Zdn 放到第二操作数，MAD 形式把 Zdn 作为被乘数。

use std::sync::OnceLock;

use crate::args::*;
use crate::ctx::DisasContext;
use crate::translate::{fp, int, mem, permute, predicate, sve2};

/// 把比特串模板编译为 (mask, expected)
const fn parse_pattern(pat: &[u8]) -> (u32, u32) {
    let mut mask: u32 = 0;
    let mut expected: u32 = 0;
    let mut pos: i32 = 31;
    let mut i: usize = 0;
    while i < pat.len() {
        match pat[i] {
            b' ' => {}
            b'0' => {
                mask |= 1 << pos;
                pos -= 1;
            }
            b'1' => {
                mask |= 1 << pos;
                expected |= 1 << pos;
                pos -= 1;
            }
            _ => pos -= 1,
        }
        i += 1;
    }
    if pos != -1 {
        panic!("pattern must describe exactly 32 bits");
    }
    (mask, expected)
}

/// 一条译码模板
pub(crate) struct Pattern {
    pub(crate) name: &'static str,
    pub(crate) mask: u32,
    pub(crate) expected: u32,
    /// 保留编码：命中即视为未分配
    pub(crate) invalid: bool,
    pub(crate) args: fn(u32) -> DecodedArgs,
    pub(crate) trans: fn(&mut DisasContext<'_>, u32) -> bool,
}

impl Pattern {
    #[inline]
    pub(crate) fn matches(&self, insn: u32) -> bool {
        insn & self.mask == self.expected
    }
}

macro_rules! inst {
    ($name:literal, $pat:literal, $fmt:path, $trans:path) => {{
        const P: (u32, u32) = parse_pattern($pat);
        Pattern {
            name: $name,
            mask: P.0,
            expected: P.1,
            invalid: false,
            args: |insn| DecodedArgs::from($fmt(insn)),
            trans: |s, insn| $trans(s, &$fmt(insn)),
        }
    }};
}

macro_rules! invalid {
    ($pat:literal) => {{
        const P: (u32, u32) = parse_pattern($pat);
        Pattern {
            name: "INVALID",
            mask: P.0,
            expected: P.1,
            invalid: true,
            args: |_| DecodedArgs::from(Empty),
            trans: |_, _| false,
        }
    }};
}

/// 译码结果：模板名与参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub name: &'static str,
    pub args: DecodedArgs,
}

// ----------------------------------------------------------------------
// 格式函数
// ----------------------------------------------------------------------

mod fmt {
    use crate::args::*;
    use crate::extract::*;

    #[inline]
    fn rd(i: u32) -> u32 {
        bits(i, 0, 5)
    }
    #[inline]
    fn rn(i: u32) -> u32 {
        bits(i, 5, 5)
    }
    #[inline]
    fn rm(i: u32) -> u32 {
        bits(i, 16, 5)
    }
    #[inline]
    fn pg(i: u32) -> u32 {
        bits(i, 10, 3)
    }
    #[inline]
    fn pd(i: u32) -> u32 {
        bits(i, 0, 4)
    }
    #[inline]
    fn pn(i: u32) -> u32 {
        bits(i, 5, 4)
    }
    #[inline]
    fn pm(i: u32) -> u32 {
        bits(i, 16, 4)
    }
    #[inline]
    fn pg4(i: u32) -> u32 {
        bits(i, 10, 4)
    }
    #[inline]
    fn esz(i: u32) -> u8 {
        bits(i, 22, 2) as u8
    }
    #[inline]
    fn msz(i: u32) -> u8 {
        bits(i, 23, 2) as u8
    }

    pub(super) fn empty(_: u32) -> Empty {
        Empty
    }

    pub(super) fn p_d(i: u32) -> Rd {
        Rd { rd: pd(i) }
    }

    pub(super) fn p_n(i: u32) -> Rn {
        Rn { rn: pn(i) }
    }

    pub(super) fn r_m(i: u32) -> Rm {
        Rm { rm: rm(i) }
    }

    // ---- 两/三寄存器 ----

    pub(super) fn rd_rn(i: u32) -> RrEsz {
        RrEsz { rd: rd(i), rn: rn(i), esz: esz(i) }
    }

    pub(super) fn pd_pn(i: u32) -> RrEsz {
        RrEsz { rd: pd(i), rn: pn(i), esz: esz(i) }
    }

    pub(super) fn pd_pn_e0(i: u32) -> RrEsz {
        RrEsz { rd: pd(i), rn: pn(i), esz: 0 }
    }

    pub(super) fn rd_rn_rm(i: u32) -> RrrEsz {
        RrrEsz { rd: rd(i), rn: rn(i), rm: rm(i), esz: esz(i) }
    }

    pub(super) fn rd_rn_rm_e0(i: u32) -> RrrEsz {
        RrrEsz { rd: rd(i), rn: rn(i), rm: rm(i), esz: 0 }
    }

    /// INSR：Zdn 同时是源和目的，插入值在 5..9
    pub(super) fn rdn_rm(i: u32) -> RrrEsz {
        RrrEsz { rd: rd(i), rn: rd(i), rm: rn(i), esz: esz(i) }
    }

    pub(super) fn pd_pn_pm(i: u32) -> RrrEsz {
        RrrEsz { rd: pd(i), rn: pn(i), rm: pm(i), esz: esz(i) }
    }

    /// EOR3/BCAX/BSL 系列：rd = rn = Zdn，rm = Zm，ra = Zk
    pub(super) fn rdn_rm_ra(i: u32) -> RrrrEsz {
        RrrrEsz { rd: rd(i), rn: rd(i), rm: rm(i), ra: rn(i), esz: 0 }
    }

    /// 点积与矩阵乘累加：累加器即目的寄存器
    pub(super) fn rda_rn_rm(i: u32) -> RrrrEsz {
        RrrrEsz { rd: rd(i), rn: rn(i), rm: rm(i), ra: rd(i), esz: esz(i) }
    }

    // ---- 谓词控制 ----

    pub(super) fn rd_pg_rn(i: u32) -> RprEsz {
        RprEsz { rd: rd(i), pg: pg(i), rn: rn(i), esz: esz(i) }
    }

    pub(super) fn pd_pg_rn(i: u32) -> RprEsz {
        RprEsz { rd: pd(i), pg: pg(i), rn: rn(i), esz: esz(i) }
    }

    pub(super) fn cntp(i: u32) -> RprEsz {
        RprEsz { rd: rd(i), pg: pg4(i), rn: pn(i), esz: esz(i) }
    }

    pub(super) fn rdn_pg_rm(i: u32) -> RprrEsz {
        RprrEsz { rd: rd(i), pg: pg(i), rn: rd(i), rm: rn(i), esz: esz(i) }
    }

    /// 反向形式（SUBR、SDIVR、ASRR 等）：Zdn 作为第二操作数
    pub(super) fn rdm_pg_rn(i: u32) -> RprrEsz {
        RprrEsz { rd: rd(i), pg: pg(i), rn: rn(i), rm: rd(i), esz: esz(i) }
    }

    pub(super) fn rd_pg4_rn_rm(i: u32) -> RprrEsz {
        RprrEsz { rd: rd(i), pg: pg4(i), rn: rn(i), rm: rm(i), esz: esz(i) }
    }

    pub(super) fn pd_pg_rn_rm(i: u32) -> RprrEsz {
        RprrEsz { rd: pd(i), pg: pg(i), rn: rn(i), rm: rm(i), esz: esz(i) }
    }

    pub(super) fn rda_pg_rn_rm(i: u32) -> RprrrEsz {
        RprrrEsz { rd: rd(i), pg: pg(i), rn: rn(i), rm: rm(i), ra: rd(i), esz: esz(i) }
    }

    /// 整数 MAD/MSB：Zm 在 16..20，Za 在 5..9
    pub(super) fn rdn_pg_rm_ra(i: u32) -> RprrrEsz {
        RprrrEsz { rd: rd(i), pg: pg(i), rn: rd(i), rm: rm(i), ra: rn(i), esz: esz(i) }
    }

    /// 浮点 FMAD 系列：Za 在 16..20，Zm 在 5..9
    pub(super) fn rdn_pg_ra_rm(i: u32) -> RprrrEsz {
        RprrrEsz { rd: rd(i), pg: pg(i), rn: rd(i), rm: rn(i), ra: rm(i), esz: esz(i) }
    }

    // ---- 立即数 ----

    pub(super) fn pd_pg_rn_si5(i: u32) -> RpriEsz {
        RpriEsz { rd: pd(i), pg: pg(i), rn: rn(i), imm: sextract(i, 16, 5), esz: esz(i) }
    }

    pub(super) fn pd_pg_rn_ui7(i: u32) -> RpriEsz {
        RpriEsz { rd: pd(i), pg: pg(i), rn: rn(i), imm: bits(i, 14, 7) as i64, esz: esz(i) }
    }

    pub(super) fn rdn_pg_i1(i: u32) -> RpriEsz {
        RpriEsz { rd: rd(i), pg: pg(i), rn: rd(i), imm: bits(i, 5, 1) as i64, esz: esz(i) }
    }

    pub(super) fn rdn_sh8u(i: u32) -> RriEsz {
        RriEsz { rd: rd(i), rn: rd(i), imm: expand_imm_sh8u(bits(i, 5, 9)), esz: esz(i) }
    }

    pub(super) fn rdn_i8s(i: u32) -> RriEsz {
        RriEsz { rd: rd(i), rn: rd(i), imm: sextract(i, 5, 8), esz: esz(i) }
    }

    pub(super) fn rdn_i8u(i: u32) -> RriEsz {
        RriEsz { rd: rd(i), rn: rd(i), imm: bits(i, 5, 8) as i64, esz: esz(i) }
    }

    pub(super) fn rd_sh8s(i: u32) -> RiEsz {
        RiEsz { rd: rd(i), imm: expand_imm_sh8s(bits(i, 5, 9)), esz: esz(i) }
    }

    pub(super) fn rd_i8(i: u32) -> RiEsz {
        RiEsz { rd: rd(i), imm: bits(i, 5, 8) as i64, esz: esz(i) }
    }

    pub(super) fn rd_pg4_sh8s(i: u32) -> RpiEsz {
        RpiEsz { rd: rd(i), pg: pm(i), imm: expand_imm_sh8s(bits(i, 5, 9)), esz: esz(i) }
    }

    pub(super) fn rd_pg4_i8(i: u32) -> RpiEsz {
        RpiEsz { rd: rd(i), pg: pm(i), imm: bits(i, 5, 8) as i64, esz: esz(i) }
    }

    pub(super) fn rdn_dbm(i: u32) -> RrDbm {
        RrDbm { rd: rd(i), rn: rd(i), dbm: bits(i, 5, 13) }
    }

    // ---- tsz 编码移位 ----

    #[inline]
    fn tsz_pred(i: u32) -> u32 {
        (bits(i, 22, 2) << 5) | bits(i, 5, 5)
    }

    #[inline]
    fn tsz_unpred(i: u32) -> u32 {
        (bits(i, 22, 2) << 5) | bits(i, 16, 5)
    }

    /// 收窄/加宽形式：tszh 只有 1 位
    #[inline]
    fn tsz_half(i: u32) -> u32 {
        (bits(i, 22, 1) << 5) | bits(i, 16, 5)
    }

    pub(super) fn rdn_pg_tsz_shr(i: u32) -> RpriTsz {
        let x = tsz_pred(i);
        RpriTsz { rd: rd(i), pg: pg(i), rn: rd(i), imm: tszimm_shr(x), esz: tszimm_esz(x) }
    }

    pub(super) fn rdn_pg_tsz_shl(i: u32) -> RpriTsz {
        let x = tsz_pred(i);
        RpriTsz { rd: rd(i), pg: pg(i), rn: rd(i), imm: tszimm_shl(x), esz: tszimm_esz(x) }
    }

    pub(super) fn rd_rn_tsz_shr(i: u32) -> RriTsz {
        let x = tsz_unpred(i);
        RriTsz { rd: rd(i), rn: rn(i), imm: tszimm_shr(x), esz: tszimm_esz(x) }
    }

    pub(super) fn rd_rn_tsz_shl(i: u32) -> RriTsz {
        let x = tsz_unpred(i);
        RriTsz { rd: rd(i), rn: rn(i), imm: tszimm_shl(x), esz: tszimm_esz(x) }
    }

    pub(super) fn rd_rn_tszh_shr(i: u32) -> RriTsz {
        let x = tsz_half(i);
        RriTsz { rd: rd(i), rn: rn(i), imm: tszimm_shr(x), esz: tszimm_esz(x) }
    }

    pub(super) fn rd_rn_tszh_shl(i: u32) -> RriTsz {
        let x = tsz_half(i);
        RriTsz { rd: rd(i), rn: rn(i), imm: tszimm_shl(x), esz: tszimm_esz(x) }
    }

    /// 饱和收窄提取：imm3 原样带出，非零即保留编码
    pub(super) fn rd_rn_tszh(i: u32) -> RriTsz {
        let x = tsz_half(i);
        RriTsz { rd: rd(i), rn: rn(i), imm: bits(i, 16, 3), esz: tszimm_esz(x) }
    }

    pub(super) fn xar(i: u32) -> RrriTsz {
        let x = tsz_unpred(i);
        RrriTsz { rd: rd(i), rn: rd(i), rm: rn(i), imm: tszimm_shr(x), esz: tszimm_esz(x) }
    }

    // ---- 置换 ----

    pub(super) fn ext(i: u32) -> Rrri {
        let imm = (bits(i, 16, 5) << 3) | bits(i, 10, 3);
        Rrri { rd: rd(i), rn: rd(i), rm: rn(i), imm: imm as i64 }
    }

    pub(super) fn ext_sve2(i: u32) -> Rri {
        let imm = (bits(i, 16, 5) << 3) | bits(i, 10, 3);
        Rri { rd: rd(i), rn: rn(i), imm: imm as i64 }
    }

    /// DUP（索引）：imm2:tsz，最低置位给出元素大小
    pub(super) fn dup_x(i: u32) -> Rri {
        let imm = (bits(i, 22, 2) << 5) | bits(i, 16, 5);
        Rri { rd: rd(i), rn: rn(i), imm: imm as i64 }
    }

    // ---- 计数与地址 ----

    pub(super) fn index_ii(i: u32) -> Index {
        Index {
            rd: rd(i),
            esz: esz(i),
            start: Operand::Imm(sextract(i, 5, 5)),
            incr: Operand::Imm(sextract(i, 16, 5)),
        }
    }

    pub(super) fn index_ir(i: u32) -> Index {
        Index {
            rd: rd(i),
            esz: esz(i),
            start: Operand::Imm(sextract(i, 5, 5)),
            incr: Operand::Reg(rm(i)),
        }
    }

    pub(super) fn index_ri(i: u32) -> Index {
        Index {
            rd: rd(i),
            esz: esz(i),
            start: Operand::Reg(rn(i)),
            incr: Operand::Imm(sextract(i, 16, 5)),
        }
    }

    pub(super) fn index_rr(i: u32) -> Index {
        Index { rd: rd(i), esz: esz(i), start: Operand::Reg(rn(i)), incr: Operand::Reg(rm(i)) }
    }

    pub(super) fn addvl(i: u32) -> Rri {
        Rri { rd: rd(i), rn: rm(i), imm: sextract(i, 5, 6) }
    }

    pub(super) fn rdvl(i: u32) -> Ri {
        Ri { rd: rd(i), imm: sextract(i, 5, 6) }
    }

    pub(super) fn adr(i: u32) -> Rrri {
        Rrri { rd: rd(i), rn: rn(i), rm: rm(i), imm: bits(i, 10, 2) as i64 }
    }

    pub(super) fn incdec_cnt(i: u32) -> IncdecCnt {
        IncdecCnt {
            rd: rd(i),
            pat: rn(i),
            esz: esz(i),
            imm: bits(i, 16, 4) + 1,
            d: bit(i, 10),
            u: false,
            sf: true,
        }
    }

    pub(super) fn sincdec_cnt(i: u32) -> IncdecCnt {
        IncdecCnt {
            rd: rd(i),
            pat: rn(i),
            esz: esz(i),
            imm: bits(i, 16, 4) + 1,
            d: bit(i, 11),
            u: bit(i, 10),
            sf: bit(i, 20),
        }
    }

    pub(super) fn incdec_pred(i: u32) -> IncdecPred {
        IncdecPred { rd: rd(i), pg: pn(i), esz: esz(i), d: bit(i, 16), u: false, sf: true }
    }

    pub(super) fn sincdec_pred(i: u32) -> IncdecPred {
        IncdecPred {
            rd: rd(i),
            pg: pn(i),
            esz: esz(i),
            d: bit(i, 17),
            u: bit(i, 16),
            sf: bit(i, 10),
        }
    }

    // ---- 谓词 ----

    pub(super) fn pd_pg_pn_pm_s(i: u32) -> RprrS {
        RprrS { rd: pd(i), pg: pg4(i), rn: pn(i), rm: pm(i), s: bit(i, 22) }
    }

    pub(super) fn pd_pg_pn_s(i: u32) -> RprS {
        RprS { rd: pd(i), pg: pg4(i), rn: pn(i), s: bit(i, 22) }
    }

    /// RDFFR（谓词控制）：Pg 位于 5..8
    pub(super) fn rdffr_p(i: u32) -> RprS {
        RprS { rd: pd(i), pg: pn(i), rn: 16, s: bit(i, 22) }
    }

    pub(super) fn ptest(i: u32) -> Ptest {
        Ptest { pg: pg4(i), rn: pn(i) }
    }

    pub(super) fn ptrue(i: u32) -> Ptrue {
        Ptrue { rd: pd(i), pat: rn(i), esz: esz(i), s: bit(i, 16) }
    }

    pub(super) fn while_lt(i: u32) -> While {
        While {
            rd: pd(i),
            rn: rn(i),
            rm: rm(i),
            esz: esz(i),
            sf: bit(i, 12),
            u: bit(i, 11),
            lt: true,
            eq: bit(i, 4),
        }
    }

    pub(super) fn while_gt(i: u32) -> While {
        While {
            rd: pd(i),
            rn: rn(i),
            rm: rm(i),
            esz: esz(i),
            sf: bit(i, 12),
            u: bit(i, 11),
            lt: false,
            eq: !bit(i, 4),
        }
    }

    pub(super) fn while_ptr(i: u32) -> WhilePtr {
        WhilePtr { rd: pd(i), rn: rn(i), rm: rm(i), esz: esz(i), rw: bit(i, 4) }
    }

    pub(super) fn cterm(i: u32) -> Cterm {
        Cterm { rn: rn(i), rm: rm(i), sf: bit(i, 22), ne: bit(i, 4) }
    }

    // ---- 访存 ----

    /// LDR/STR：imm9h:imm9l，以 VL（或 PL）为单位
    pub(super) fn ldr(i: u32) -> Rri {
        let imm9 = (bits(i, 16, 6) << 3) | bits(i, 10, 3);
        Rri { rd: rd(i), rn: rn(i), imm: sextract(imm9, 0, 9) }
    }

    pub(super) fn ld1r(i: u32) -> RpriLoad {
        RpriLoad {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            imm: bits(i, 16, 6) as i64,
            dtype: (bits(i, 23, 2) << 2) | bits(i, 13, 2),
            nreg: 0,
        }
    }

    pub(super) fn ld_rr(i: u32) -> RprrLoad {
        RprrLoad { rd: rd(i), pg: pg(i), rn: rn(i), rm: rm(i), dtype: bits(i, 21, 4), nreg: 0 }
    }

    pub(super) fn ld_ri(i: u32) -> RpriLoad {
        RpriLoad {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            imm: sextract(i, 16, 4),
            dtype: bits(i, 21, 4),
            nreg: 0,
        }
    }

    pub(super) fn ldn_rr(i: u32) -> RprrLoad {
        RprrLoad {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            rm: rm(i),
            dtype: msz_dtype(bits(i, 23, 2)),
            nreg: bits(i, 21, 2),
        }
    }

    pub(super) fn ldn_ri(i: u32) -> RpriLoad {
        RpriLoad {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            imm: sextract(i, 16, 4),
            dtype: msz_dtype(bits(i, 23, 2)),
            nreg: bits(i, 21, 2),
        }
    }

    pub(super) fn ldq_rr(i: u32) -> RprrLoad {
        RprrLoad {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            rm: rm(i),
            dtype: msz_dtype(bits(i, 23, 2)),
            nreg: 0,
        }
    }

    pub(super) fn ldq_ri(i: u32) -> RpriLoad {
        RpriLoad {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            imm: sextract(i, 16, 4),
            dtype: msz_dtype(bits(i, 23, 2)),
            nreg: 0,
        }
    }

    fn gather_rr(i: u32, esz: u8, xs: u8) -> RprrGather {
        RprrGather {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            rm: rm(i),
            esz,
            msz: msz(i),
            u: bit(i, 14),
            ff: bit(i, 13),
            xs,
            scale: bit(i, 21),
        }
    }

    pub(super) fn gather32_rr(i: u32) -> RprrGather {
        gather_rr(i, 2, bits(i, 22, 1) as u8)
    }

    pub(super) fn gather64_unpacked_rr(i: u32) -> RprrGather {
        gather_rr(i, 3, bits(i, 22, 1) as u8)
    }

    pub(super) fn gather64_rr(i: u32) -> RprrGather {
        gather_rr(i, 3, 2)
    }

    fn gather_ri(i: u32, esz: u8) -> RpriGather {
        RpriGather {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            imm: bits(i, 16, 5) as i64,
            esz,
            msz: msz(i),
            u: bit(i, 14),
            ff: bit(i, 13),
        }
    }

    pub(super) fn gather32_ri(i: u32) -> RpriGather {
        gather_ri(i, 2)
    }

    pub(super) fn gather64_ri(i: u32) -> RpriGather {
        gather_ri(i, 3)
    }

    pub(super) fn st_rr(i: u32) -> RprrStore {
        RprrStore {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            rm: rm(i),
            msz: msz(i),
            esz: bits(i, 21, 2) as u8,
            nreg: 0,
        }
    }

    pub(super) fn st_ri(i: u32) -> RpriStore {
        RpriStore {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            imm: sextract(i, 16, 4),
            msz: msz(i),
            esz: bits(i, 21, 2) as u8,
            nreg: 0,
        }
    }

    pub(super) fn stn_rr(i: u32) -> RprrStore {
        RprrStore {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            rm: rm(i),
            msz: msz(i),
            esz: msz(i),
            nreg: bits(i, 21, 2),
        }
    }

    pub(super) fn stn_ri(i: u32) -> RpriStore {
        RpriStore {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            imm: sextract(i, 16, 4),
            msz: msz(i),
            esz: msz(i),
            nreg: bits(i, 21, 2),
        }
    }

    fn scatter_rr(i: u32, esz: u8, xs: u8) -> RprrScatter {
        RprrScatter {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            rm: rm(i),
            esz,
            msz: msz(i),
            xs,
            scale: bit(i, 21),
        }
    }

    pub(super) fn scatter32_rr(i: u32) -> RprrScatter {
        scatter_rr(i, 2, bits(i, 14, 1) as u8)
    }

    pub(super) fn scatter64_unpacked_rr(i: u32) -> RprrScatter {
        scatter_rr(i, 3, bits(i, 14, 1) as u8)
    }

    pub(super) fn scatter64_rr(i: u32) -> RprrScatter {
        scatter_rr(i, 3, 2)
    }

    fn scatter_ri(i: u32, esz: u8) -> RpriScatter {
        RpriScatter {
            rd: rd(i),
            pg: pg(i),
            rn: rn(i),
            imm: bits(i, 16, 5) as i64,
            esz,
            msz: msz(i),
        }
    }

    pub(super) fn scatter32_ri(i: u32) -> RpriScatter {
        scatter_ri(i, 2)
    }

    pub(super) fn scatter64_ri(i: u32) -> RpriScatter {
        scatter_ri(i, 3)
    }
}

// ----------------------------------------------------------------------
// 模板表
// ----------------------------------------------------------------------

#[rustfmt::skip]
fn make_decode_table() -> Vec<Pattern> {
    vec![
        // ---- 整数二元运算（谓词控制）----
        inst!("ADD_zpzz",   b"00000100 .. 000 000 000 ... ..... .....", fmt::rdn_pg_rm, int::add_zpzz),
        inst!("SUB_zpzz",   b"00000100 .. 000 001 000 ... ..... .....", fmt::rdn_pg_rm, int::sub_zpzz),
        inst!("SUBR_zpzz",  b"00000100 .. 000 011 000 ... ..... .....", fmt::rdm_pg_rn, int::sub_zpzz),
        inst!("SMAX_zpzz",  b"00000100 .. 001 000 000 ... ..... .....", fmt::rdn_pg_rm, int::smax_zpzz),
        inst!("UMAX_zpzz",  b"00000100 .. 001 001 000 ... ..... .....", fmt::rdn_pg_rm, int::umax_zpzz),
        inst!("SMIN_zpzz",  b"00000100 .. 001 010 000 ... ..... .....", fmt::rdn_pg_rm, int::smin_zpzz),
        inst!("UMIN_zpzz",  b"00000100 .. 001 011 000 ... ..... .....", fmt::rdn_pg_rm, int::umin_zpzz),
        inst!("SABD_zpzz",  b"00000100 .. 001 100 000 ... ..... .....", fmt::rdn_pg_rm, int::sabd_zpzz),
        inst!("UABD_zpzz",  b"00000100 .. 001 101 000 ... ..... .....", fmt::rdn_pg_rm, int::uabd_zpzz),
        inst!("MUL_zpzz",   b"00000100 .. 010 000 000 ... ..... .....", fmt::rdn_pg_rm, int::mul_zpzz),
        inst!("SMULH_zpzz", b"00000100 .. 010 010 000 ... ..... .....", fmt::rdn_pg_rm, int::smulh_zpzz),
        inst!("UMULH_zpzz", b"00000100 .. 010 011 000 ... ..... .....", fmt::rdn_pg_rm, int::umulh_zpzz),
        inst!("SDIV_zpzz",  b"00000100 .. 010 100 000 ... ..... .....", fmt::rdn_pg_rm, int::sdiv_zpzz),
        inst!("UDIV_zpzz",  b"00000100 .. 010 101 000 ... ..... .....", fmt::rdn_pg_rm, int::udiv_zpzz),
        inst!("SDIVR_zpzz", b"00000100 .. 010 110 000 ... ..... .....", fmt::rdm_pg_rn, int::sdiv_zpzz),
        inst!("UDIVR_zpzz", b"00000100 .. 010 111 000 ... ..... .....", fmt::rdm_pg_rn, int::udiv_zpzz),
        inst!("ORR_zpzz",   b"00000100 .. 011 000 000 ... ..... .....", fmt::rdn_pg_rm, int::orr_zpzz),
        inst!("EOR_zpzz",   b"00000100 .. 011 001 000 ... ..... .....", fmt::rdn_pg_rm, int::eor_zpzz),
        inst!("AND_zpzz",   b"00000100 .. 011 010 000 ... ..... .....", fmt::rdn_pg_rm, int::and_zpzz),
        inst!("BIC_zpzz",   b"00000100 .. 011 011 000 ... ..... .....", fmt::rdn_pg_rm, int::bic_zpzz),

        // ---- 整数归约 ----
        inst!("SADDV",      b"00000100 .. 000 000 001 ... ..... .....", fmt::rd_pg_rn, int::saddv),
        inst!("UADDV",      b"00000100 .. 000 001 001 ... ..... .....", fmt::rd_pg_rn, int::uaddv),
        inst!("SMAXV",      b"00000100 .. 001 000 001 ... ..... .....", fmt::rd_pg_rn, int::smaxv),
        inst!("UMAXV",      b"00000100 .. 001 001 001 ... ..... .....", fmt::rd_pg_rn, int::umaxv),
        inst!("SMINV",      b"00000100 .. 001 010 001 ... ..... .....", fmt::rd_pg_rn, int::sminv),
        inst!("UMINV",      b"00000100 .. 001 011 001 ... ..... .....", fmt::rd_pg_rn, int::uminv),
        inst!("MOVPRFX_z",  b"00000100 .. 010 000 001 ... ..... .....", fmt::rd_pg_rn, permute::movprfx_z),
        inst!("MOVPRFX_m",  b"00000100 .. 010 001 001 ... ..... .....", fmt::rd_pg_rn, permute::movprfx_m),
        inst!("ORV",        b"00000100 .. 011 000 001 ... ..... .....", fmt::rd_pg_rn, int::orv),
        inst!("EORV",       b"00000100 .. 011 001 001 ... ..... .....", fmt::rd_pg_rn, int::eorv),
        inst!("ANDV",       b"00000100 .. 011 010 001 ... ..... .....", fmt::rd_pg_rn, int::andv),

        // ---- 立即数移位（谓词控制）----
        inst!("ASR_zpzi",   b"00000100 .. 00 0000 100 ... .. ... .....", fmt::rdn_pg_tsz_shr, int::asr_zpzi),
        inst!("LSR_zpzi",   b"00000100 .. 00 0001 100 ... .. ... .....", fmt::rdn_pg_tsz_shr, int::lsr_zpzi),
        inst!("LSL_zpzi",   b"00000100 .. 00 0011 100 ... .. ... .....", fmt::rdn_pg_tsz_shl, int::lsl_zpzi),
        inst!("ASRD",       b"00000100 .. 00 0100 100 ... .. ... .....", fmt::rdn_pg_tsz_shr, int::asrd),
        inst!("SQSHL_zpzi", b"00000100 .. 00 0110 100 ... .. ... .....", fmt::rdn_pg_tsz_shl, sve2::sqshl_zpzi),
        inst!("UQSHL_zpzi", b"00000100 .. 00 0111 100 ... .. ... .....", fmt::rdn_pg_tsz_shl, sve2::uqshl_zpzi),
        inst!("SRSHR",      b"00000100 .. 00 1100 100 ... .. ... .....", fmt::rdn_pg_tsz_shr, sve2::srshr),
        inst!("URSHR",      b"00000100 .. 00 1101 100 ... .. ... .....", fmt::rdn_pg_tsz_shr, sve2::urshr),
        inst!("SQSHLU",     b"00000100 .. 00 1111 100 ... .. ... .....", fmt::rdn_pg_tsz_shl, sve2::sqshlu),

        // ---- 向量移位（谓词控制）----
        inst!("ASR_zpzz",   b"00000100 .. 010 000 100 ... ..... .....", fmt::rdn_pg_rm, int::asr_zpzz),
        inst!("LSR_zpzz",   b"00000100 .. 010 001 100 ... ..... .....", fmt::rdn_pg_rm, int::lsr_zpzz),
        inst!("LSL_zpzz",   b"00000100 .. 010 011 100 ... ..... .....", fmt::rdn_pg_rm, int::lsl_zpzz),
        inst!("ASRR",       b"00000100 .. 010 100 100 ... ..... .....", fmt::rdm_pg_rn, int::asr_zpzz),
        inst!("LSRR",       b"00000100 .. 010 101 100 ... ..... .....", fmt::rdm_pg_rn, int::lsr_zpzz),
        inst!("LSLR",       b"00000100 .. 010 111 100 ... ..... .....", fmt::rdm_pg_rn, int::lsl_zpzz),
        inst!("ASR_zpzw",   b"00000100 .. 011 000 100 ... ..... .....", fmt::rdn_pg_rm, int::asr_zpzw),
        inst!("LSR_zpzw",   b"00000100 .. 011 001 100 ... ..... .....", fmt::rdn_pg_rm, int::lsr_zpzw),
        inst!("LSL_zpzw",   b"00000100 .. 011 011 100 ... ..... .....", fmt::rdn_pg_rm, int::lsl_zpzw),

        // ---- 一元运算（谓词控制）----
        inst!("SXTB",       b"00000100 .. 010 000 101 ... ..... .....", fmt::rd_pg_rn, int::sxtb),
        inst!("UXTB",       b"00000100 .. 010 001 101 ... ..... .....", fmt::rd_pg_rn, int::uxtb),
        inst!("SXTH",       b"00000100 .. 010 010 101 ... ..... .....", fmt::rd_pg_rn, int::sxth),
        inst!("UXTH",       b"00000100 .. 010 011 101 ... ..... .....", fmt::rd_pg_rn, int::uxth),
        inst!("SXTW",       b"00000100 .. 010 100 101 ... ..... .....", fmt::rd_pg_rn, int::sxtw),
        inst!("UXTW",       b"00000100 .. 010 101 101 ... ..... .....", fmt::rd_pg_rn, int::uxtw),
        inst!("ABS",        b"00000100 .. 010 110 101 ... ..... .....", fmt::rd_pg_rn, int::abs),
        inst!("NEG",        b"00000100 .. 010 111 101 ... ..... .....", fmt::rd_pg_rn, int::neg),
        inst!("CLS",        b"00000100 .. 011 000 101 ... ..... .....", fmt::rd_pg_rn, int::cls),
        inst!("CLZ",        b"00000100 .. 011 001 101 ... ..... .....", fmt::rd_pg_rn, int::clz),
        inst!("CNT_zpz",    b"00000100 .. 011 010 101 ... ..... .....", fmt::rd_pg_rn, int::cnt_zpz),
        inst!("CNOT",       b"00000100 .. 011 011 101 ... ..... .....", fmt::rd_pg_rn, int::cnot),
        inst!("FABS",       b"00000100 .. 011 100 101 ... ..... .....", fmt::rd_pg_rn, int::fabs),
        inst!("FNEG",       b"00000100 .. 011 101 101 ... ..... .....", fmt::rd_pg_rn, int::fneg),
        inst!("NOT_zpz",    b"00000100 .. 011 110 101 ... ..... .....", fmt::rd_pg_rn, int::not_zpz),

        // ---- 乘累加 ----
        inst!("MLA",        b"00000100 .. 0 ..... 010 ... ..... .....", fmt::rda_pg_rn_rm, int::mla),
        inst!("MLS",        b"00000100 .. 0 ..... 011 ... ..... .....", fmt::rda_pg_rn_rm, int::mls),
        inst!("MAD",        b"00000100 .. 0 ..... 110 ... ..... .....", fmt::rdn_pg_rm_ra, int::mla),
        inst!("MSB",        b"00000100 .. 0 ..... 111 ... ..... .....", fmt::rdn_pg_rm_ra, int::mls),

        // ---- 无谓词整数运算 ----
        inst!("ADD_zzz",    b"00000100 .. 1 ..... 000 000 ..... .....", fmt::rd_rn_rm, int::add_zzz),
        inst!("SUB_zzz",    b"00000100 .. 1 ..... 000 001 ..... .....", fmt::rd_rn_rm, int::sub_zzz),
        inst!("SQADD_zzz",  b"00000100 .. 1 ..... 000 100 ..... .....", fmt::rd_rn_rm, int::sqadd_zzz),
        inst!("UQADD_zzz",  b"00000100 .. 1 ..... 000 101 ..... .....", fmt::rd_rn_rm, int::uqadd_zzz),
        inst!("SQSUB_zzz",  b"00000100 .. 1 ..... 000 110 ..... .....", fmt::rd_rn_rm, int::sqsub_zzz),
        inst!("UQSUB_zzz",  b"00000100 .. 1 ..... 000 111 ..... .....", fmt::rd_rn_rm, int::uqsub_zzz),
        inst!("AND_zzz",    b"00000100 00 1 ..... 001 100 ..... .....", fmt::rd_rn_rm_e0, int::and_zzz),
        inst!("ORR_zzz",    b"00000100 01 1 ..... 001 100 ..... .....", fmt::rd_rn_rm_e0, int::orr_zzz),
        inst!("EOR_zzz",    b"00000100 10 1 ..... 001 100 ..... .....", fmt::rd_rn_rm_e0, int::eor_zzz),
        inst!("BIC_zzz",    b"00000100 11 1 ..... 001 100 ..... .....", fmt::rd_rn_rm_e0, int::bic_zzz),
        inst!("EOR3",       b"00000100 00 1 ..... 001 110 ..... .....", fmt::rdn_rm_ra, sve2::eor3),
        inst!("BCAX",       b"00000100 01 1 ..... 001 110 ..... .....", fmt::rdn_rm_ra, sve2::bcax),
        inst!("BSL",        b"00000100 00 1 ..... 001 111 ..... .....", fmt::rdn_rm_ra, sve2::bsl),
        inst!("BSL1N",      b"00000100 01 1 ..... 001 111 ..... .....", fmt::rdn_rm_ra, sve2::bsl1n),
        inst!("BSL2N",      b"00000100 10 1 ..... 001 111 ..... .....", fmt::rdn_rm_ra, sve2::bsl2n),
        inst!("NBSL",       b"00000100 11 1 ..... 001 111 ..... .....", fmt::rdn_rm_ra, sve2::nbsl),
        inst!("XAR",        b"00000100 .. 1 ..... 001 101 ..... .....", fmt::xar, sve2::xar),

        // ---- INDEX / ADDVL / RDVL ----
        inst!("INDEX_ii",   b"00000100 .. 1 ..... 010 000 ..... .....", fmt::index_ii, int::index),
        inst!("INDEX_ri",   b"00000100 .. 1 ..... 010 001 ..... .....", fmt::index_ri, int::index),
        inst!("INDEX_ir",   b"00000100 .. 1 ..... 010 010 ..... .....", fmt::index_ir, int::index),
        inst!("INDEX_rr",   b"00000100 .. 1 ..... 010 011 ..... .....", fmt::index_rr, int::index),
        inst!("ADDVL",      b"00000100 001 ..... 01010 ...... .....",   fmt::addvl, int::addvl),
        inst!("ADDPL",      b"00000100 011 ..... 01010 ...... .....",   fmt::addvl, int::addpl),
        inst!("RDVL",       b"00000100 101 11111 01010 ...... .....",   fmt::rdvl, int::rdvl),

        // ---- SVE2 无谓词乘法 ----
        inst!("MUL_zzz",      b"00000100 .. 1 ..... 0110 00 ..... .....", fmt::rd_rn_rm, sve2::mul_zzz),
        inst!("PMUL_zzz",     b"00000100 .. 1 ..... 0110 01 ..... .....", fmt::rd_rn_rm, sve2::pmul_zzz),
        inst!("SMULH_zzz",    b"00000100 .. 1 ..... 0110 10 ..... .....", fmt::rd_rn_rm, sve2::smulh_zzz),
        inst!("UMULH_zzz",    b"00000100 .. 1 ..... 0110 11 ..... .....", fmt::rd_rn_rm, sve2::umulh_zzz),
        inst!("SQDMULH_zzz",  b"00000100 .. 1 ..... 0111 00 ..... .....", fmt::rd_rn_rm, sve2::sqdmulh_zzz),
        inst!("SQRDMULH_zzz", b"00000100 .. 1 ..... 0111 01 ..... .....", fmt::rd_rn_rm, sve2::sqrdmulh_zzz),

        // ---- 无谓词移位 ----
        inst!("ASR_zzw",    b"00000100 .. 1 ..... 1000 00 ..... .....", fmt::rd_rn_rm, int::asr_zzw),
        inst!("LSR_zzw",    b"00000100 .. 1 ..... 1000 01 ..... .....", fmt::rd_rn_rm, int::lsr_zzw),
        inst!("LSL_zzw",    b"00000100 .. 1 ..... 1000 11 ..... .....", fmt::rd_rn_rm, int::lsl_zzw),
        inst!("ASR_zzi",    b"00000100 .. 1 ..... 1001 00 ..... .....", fmt::rd_rn_tsz_shr, int::asr_zzi),
        inst!("LSR_zzi",    b"00000100 .. 1 ..... 1001 01 ..... .....", fmt::rd_rn_tsz_shr, int::lsr_zzi),
        inst!("LSL_zzi",    b"00000100 .. 1 ..... 1001 11 ..... .....", fmt::rd_rn_tsz_shl, int::lsl_zzi),

        // ---- ADR / MOVPRFX / FTSSEL ----
        inst!("ADR_s32",    b"00000100 00 1 ..... 1010 .. ..... .....", fmt::adr, int::adr_s32),
        inst!("ADR_u32",    b"00000100 01 1 ..... 1010 .. ..... .....", fmt::adr, int::adr_u32),
        inst!("ADR_p32",    b"00000100 10 1 ..... 1010 .. ..... .....", fmt::adr, int::adr_p32),
        inst!("ADR_p64",    b"00000100 11 1 ..... 1010 .. ..... .....", fmt::adr, int::adr_p64),
        inst!("MOVPRFX",    b"00000100 00 1 00000 101111 ..... .....",  fmt::rd_rn, permute::movprfx),
        inst!("FTSSEL",     b"00000100 .. 1 ..... 101100 ..... .....",  fmt::rd_rn_rm, fp::ftssel),

        // ---- 元素计数 ----
        inst!("CNT_r",        b"00000100 .. 10 .... 111000 ..... .....", fmt::incdec_cnt, int::cnt_r),
        inst!("INCDEC_r",     b"00000100 .. 11 .... 11100 . ..... .....", fmt::incdec_cnt, int::incdec_r),
        inst!("INCDEC_v",     b"00000100 .. 11 .... 11000 . ..... .....", fmt::incdec_cnt, int::incdec_v),
        inst!("SINCDEC_r_32", b"00000100 .. 10 .... 1111 . . ..... .....", fmt::sincdec_cnt, int::sincdec_r_32),
        inst!("SINCDEC_r_64", b"00000100 .. 11 .... 1111 . . ..... .....", fmt::sincdec_cnt, int::sincdec_r_64),
        inst!("SINCDEC_v",    b"00000100 .. 10 .... 1100 . . ..... .....", fmt::sincdec_cnt, int::sincdec_v),

        // ---- 位掩码立即数与立即数复制 ----
        inst!("ORR_zzi",    b"00000101 00 0000 ............. .....", fmt::rdn_dbm, int::orr_zzi),
        inst!("EOR_zzi",    b"00000101 01 0000 ............. .....", fmt::rdn_dbm, int::eor_zzi),
        inst!("AND_zzi",    b"00000101 10 0000 ............. .....", fmt::rdn_dbm, int::and_zzi),
        inst!("DUPM",       b"00000101 11 0000 ............. .....", fmt::rdn_dbm, int::dupm),
        inst!("CPY_z_i",    b"00000101 .. 01 .... 00 . ........ .....", fmt::rd_pg4_sh8s, int::cpy_z_i),
        inst!("CPY_m_i",    b"00000101 .. 01 .... 01 . ........ .....", fmt::rd_pg4_sh8s, int::cpy_m_i),
        invalid!(           b"00000101 00 01 .... 00 1 ........ ....."),
        invalid!(           b"00000101 00 01 .... 01 1 ........ ....."),
        inst!("FCPY",       b"00000101 .. 01 .... 110 ........ .....",  fmt::rd_pg4_i8, fp::fcpy),

        // ---- 置换 ----
        inst!("EXT",        b"00000101 001 ..... 000 ... ..... .....",  fmt::ext, permute::ext),
        inst!("EXT_sve2",   b"00000101 011 ..... 000 ... ..... .....",  fmt::ext_sve2, permute::ext_sve2),
        inst!("DUP_x",      b"00000101 .. 1 ..... 001000 ..... .....",  fmt::dup_x, permute::dup_x),
        inst!("TBL_sve2",   b"00000101 .. 1 ..... 001010 ..... .....",  fmt::rd_rn_rm, permute::tbl_sve2),
        inst!("TBX",        b"00000101 .. 1 ..... 001011 ..... .....",  fmt::rd_rn_rm, permute::tbx),
        inst!("TBL",        b"00000101 .. 1 ..... 001100 ..... .....",  fmt::rd_rn_rm, permute::tbl),
        inst!("DUP_s",      b"00000101 .. 1 00000 001110 ..... .....",  fmt::rd_rn, permute::dup_s),
        inst!("INSR_r",     b"00000101 .. 1 00100 001110 ..... .....",  fmt::rdn_rm, permute::insr_r),
        inst!("INSR_f",     b"00000101 .. 1 10100 001110 ..... .....",  fmt::rdn_rm, permute::insr_f),
        inst!("SUNPKLO",    b"00000101 .. 1 10000 001110 ..... .....",  fmt::rd_rn, permute::sunpklo),
        inst!("SUNPKHI",    b"00000101 .. 1 10001 001110 ..... .....",  fmt::rd_rn, permute::sunpkhi),
        inst!("UUNPKLO",    b"00000101 .. 1 10010 001110 ..... .....",  fmt::rd_rn, permute::uunpklo),
        inst!("UUNPKHI",    b"00000101 .. 1 10011 001110 ..... .....",  fmt::rd_rn, permute::uunpkhi),
        inst!("REV_v",      b"00000101 .. 1 11000 001110 ..... .....",  fmt::rd_rn, permute::rev_v),

        inst!("ZIP1_p",     b"00000101 .. 10 .... 010 00 0 0 .... 0 ....", fmt::pd_pn_pm, permute::zip1_p),
        inst!("ZIP2_p",     b"00000101 .. 10 .... 010 00 1 0 .... 0 ....", fmt::pd_pn_pm, permute::zip2_p),
        inst!("UZP1_p",     b"00000101 .. 10 .... 010 01 0 0 .... 0 ....", fmt::pd_pn_pm, permute::uzp1_p),
        inst!("UZP2_p",     b"00000101 .. 10 .... 010 01 1 0 .... 0 ....", fmt::pd_pn_pm, permute::uzp2_p),
        inst!("TRN1_p",     b"00000101 .. 10 .... 010 10 0 0 .... 0 ....", fmt::pd_pn_pm, permute::trn1_p),
        inst!("TRN2_p",     b"00000101 .. 10 .... 010 10 1 0 .... 0 ....", fmt::pd_pn_pm, permute::trn2_p),
        inst!("REV_p",      b"00000101 .. 11 0100 010 000 0 .... 0 ....", fmt::pd_pn, permute::rev_p),
        inst!("PUNPKLO",    b"00000101 00 11 0000 010 000 0 .... 0 ....", fmt::pd_pn, permute::punpklo),
        inst!("PUNPKHI",    b"00000101 00 11 0001 010 000 0 .... 0 ....", fmt::pd_pn, permute::punpkhi),

        inst!("ZIP1_z",     b"00000101 .. 1 ..... 011 000 ..... .....", fmt::rd_rn_rm, permute::zip1_z),
        inst!("ZIP2_z",     b"00000101 .. 1 ..... 011 001 ..... .....", fmt::rd_rn_rm, permute::zip2_z),
        inst!("UZP1_z",     b"00000101 .. 1 ..... 011 010 ..... .....", fmt::rd_rn_rm, permute::uzp1_z),
        inst!("UZP2_z",     b"00000101 .. 1 ..... 011 011 ..... .....", fmt::rd_rn_rm, permute::uzp2_z),
        inst!("TRN1_z",     b"00000101 .. 1 ..... 011 100 ..... .....", fmt::rd_rn_rm, permute::trn1_z),
        inst!("TRN2_z",     b"00000101 .. 1 ..... 011 101 ..... .....", fmt::rd_rn_rm, permute::trn2_z),

        // ---- 谓词控制的置换与复制 ----
        inst!("CPY_m_v",      b"00000101 .. 100000 100 ... ..... .....", fmt::rd_pg_rn, permute::cpy_m_v),
        inst!("COMPACT",      b"00000101 .. 100001 100 ... ..... .....", fmt::rd_pg_rn, permute::compact),
        inst!("LASTA_v",      b"00000101 .. 100010 100 ... ..... .....", fmt::rd_pg_rn, permute::lasta_v),
        inst!("LASTB_v",      b"00000101 .. 100011 100 ... ..... .....", fmt::rd_pg_rn, permute::lastb_v),
        inst!("REVB",         b"00000101 .. 100100 100 ... ..... .....", fmt::rd_pg_rn, permute::revb),
        inst!("REVH",         b"00000101 .. 100101 100 ... ..... .....", fmt::rd_pg_rn, permute::revh),
        inst!("REVW",         b"00000101 .. 100110 100 ... ..... .....", fmt::rd_pg_rn, permute::revw),
        inst!("RBIT",         b"00000101 .. 100111 100 ... ..... .....", fmt::rd_pg_rn, int::rbit),
        inst!("CLASTA_z",     b"00000101 .. 101000 100 ... ..... .....", fmt::rdn_pg_rm, permute::clasta_z),
        inst!("CLASTB_z",     b"00000101 .. 101001 100 ... ..... .....", fmt::rdn_pg_rm, permute::clastb_z),
        inst!("CLASTA_v",     b"00000101 .. 101010 100 ... ..... .....", fmt::rd_pg_rn, permute::clasta_v),
        inst!("CLASTB_v",     b"00000101 .. 101011 100 ... ..... .....", fmt::rd_pg_rn, permute::clastb_v),
        inst!("SPLICE",       b"00000101 .. 101100 100 ... ..... .....", fmt::rdn_pg_rm, permute::splice),
        inst!("SPLICE_sve2",  b"00000101 .. 101101 100 ... ..... .....", fmt::rd_pg_rn, permute::splice_sve2),
        inst!("LASTA_r",      b"00000101 .. 100000 101 ... ..... .....", fmt::rd_pg_rn, permute::lasta_r),
        inst!("LASTB_r",      b"00000101 .. 100001 101 ... ..... .....", fmt::rd_pg_rn, permute::lastb_r),
        inst!("CPY_m_r",      b"00000101 .. 101000 101 ... ..... .....", fmt::rd_pg_rn, permute::cpy_m_r),
        inst!("CLASTA_r",     b"00000101 .. 110000 101 ... ..... .....", fmt::rd_pg_rn, permute::clasta_r),
        inst!("CLASTB_r",     b"00000101 .. 110001 101 ... ..... .....", fmt::rd_pg_rn, permute::clastb_r),
        inst!("SEL_zpzz",     b"00000101 .. 1 ..... 11 .... ..... .....", fmt::rd_pg4_rn_rm, int::sel_zpzz),

        // ---- 向量比较 ----
        inst!("CMPHS_ppzz", b"00100100 .. 0 ..... 000 ... ..... 0 ....", fmt::pd_pg_rn_rm, predicate::cmphs_ppzz),
        inst!("CMPHI_ppzz", b"00100100 .. 0 ..... 000 ... ..... 1 ....", fmt::pd_pg_rn_rm, predicate::cmphi_ppzz),
        inst!("CMPEQ_ppzw", b"00100100 .. 0 ..... 001 ... ..... 0 ....", fmt::pd_pg_rn_rm, predicate::cmpeq_ppzw),
        inst!("CMPNE_ppzw", b"00100100 .. 0 ..... 001 ... ..... 1 ....", fmt::pd_pg_rn_rm, predicate::cmpne_ppzw),
        inst!("CMPGE_ppzw", b"00100100 .. 0 ..... 010 ... ..... 0 ....", fmt::pd_pg_rn_rm, predicate::cmpge_ppzw),
        inst!("CMPGT_ppzw", b"00100100 .. 0 ..... 010 ... ..... 1 ....", fmt::pd_pg_rn_rm, predicate::cmpgt_ppzw),
        inst!("CMPLT_ppzw", b"00100100 .. 0 ..... 011 ... ..... 0 ....", fmt::pd_pg_rn_rm, predicate::cmplt_ppzw),
        inst!("CMPLE_ppzw", b"00100100 .. 0 ..... 011 ... ..... 1 ....", fmt::pd_pg_rn_rm, predicate::cmple_ppzw),
        inst!("CMPGE_ppzz", b"00100100 .. 0 ..... 100 ... ..... 0 ....", fmt::pd_pg_rn_rm, predicate::cmpge_ppzz),
        inst!("CMPGT_ppzz", b"00100100 .. 0 ..... 100 ... ..... 1 ....", fmt::pd_pg_rn_rm, predicate::cmpgt_ppzz),
        inst!("CMPEQ_ppzz", b"00100100 .. 0 ..... 101 ... ..... 0 ....", fmt::pd_pg_rn_rm, predicate::cmpeq_ppzz),
        inst!("CMPNE_ppzz", b"00100100 .. 0 ..... 101 ... ..... 1 ....", fmt::pd_pg_rn_rm, predicate::cmpne_ppzz),
        inst!("CMPHS_ppzw", b"00100100 .. 0 ..... 110 ... ..... 0 ....", fmt::pd_pg_rn_rm, predicate::cmphs_ppzw),
        inst!("CMPHI_ppzw", b"00100100 .. 0 ..... 110 ... ..... 1 ....", fmt::pd_pg_rn_rm, predicate::cmphi_ppzw),
        inst!("CMPLO_ppzw", b"00100100 .. 0 ..... 111 ... ..... 0 ....", fmt::pd_pg_rn_rm, predicate::cmplo_ppzw),
        inst!("CMPLS_ppzw", b"00100100 .. 0 ..... 111 ... ..... 1 ....", fmt::pd_pg_rn_rm, predicate::cmpls_ppzw),

        // ---- 立即数比较 ----
        inst!("CMPHS_ppzi", b"00100100 .. 1 ....... 0 ... ..... 0 ....", fmt::pd_pg_rn_ui7, predicate::cmphs_ppzi),
        inst!("CMPHI_ppzi", b"00100100 .. 1 ....... 0 ... ..... 1 ....", fmt::pd_pg_rn_ui7, predicate::cmphi_ppzi),
        inst!("CMPLO_ppzi", b"00100100 .. 1 ....... 1 ... ..... 0 ....", fmt::pd_pg_rn_ui7, predicate::cmplo_ppzi),
        inst!("CMPLS_ppzi", b"00100100 .. 1 ....... 1 ... ..... 1 ....", fmt::pd_pg_rn_ui7, predicate::cmpls_ppzi),
        inst!("CMPGE_ppzi", b"00100101 .. 0 ..... 000 ... ..... 0 ....", fmt::pd_pg_rn_si5, predicate::cmpge_ppzi),
        inst!("CMPGT_ppzi", b"00100101 .. 0 ..... 000 ... ..... 1 ....", fmt::pd_pg_rn_si5, predicate::cmpgt_ppzi),
        inst!("CMPLT_ppzi", b"00100101 .. 0 ..... 001 ... ..... 0 ....", fmt::pd_pg_rn_si5, predicate::cmplt_ppzi),
        inst!("CMPLE_ppzi", b"00100101 .. 0 ..... 001 ... ..... 1 ....", fmt::pd_pg_rn_si5, predicate::cmple_ppzi),
        inst!("CMPEQ_ppzi", b"00100101 .. 0 ..... 100 ... ..... 0 ....", fmt::pd_pg_rn_si5, predicate::cmpeq_ppzi),
        inst!("CMPNE_ppzi", b"00100101 .. 0 ..... 100 ... ..... 1 ....", fmt::pd_pg_rn_si5, predicate::cmpne_ppzi),

        // ---- 谓词逻辑 ----
        inst!("AND_pppp",   b"00100101 0 . 00 .... 01 .... 0 .... 0 ....", fmt::pd_pg_pn_pm_s, predicate::and_pppp),
        inst!("BIC_pppp",   b"00100101 0 . 00 .... 01 .... 0 .... 1 ....", fmt::pd_pg_pn_pm_s, predicate::bic_pppp),
        inst!("EOR_pppp",   b"00100101 0 . 00 .... 01 .... 1 .... 0 ....", fmt::pd_pg_pn_pm_s, predicate::eor_pppp),
        inst!("SEL_pppp",   b"00100101 0 . 00 .... 01 .... 1 .... 1 ....", fmt::pd_pg_pn_pm_s, predicate::sel_pppp),
        inst!("ORR_pppp",   b"00100101 1 . 00 .... 01 .... 0 .... 0 ....", fmt::pd_pg_pn_pm_s, predicate::orr_pppp),
        inst!("ORN_pppp",   b"00100101 1 . 00 .... 01 .... 0 .... 1 ....", fmt::pd_pg_pn_pm_s, predicate::orn_pppp),
        inst!("NOR_pppp",   b"00100101 1 . 00 .... 01 .... 1 .... 0 ....", fmt::pd_pg_pn_pm_s, predicate::nor_pppp),
        inst!("NAND_pppp",  b"00100101 1 . 00 .... 01 .... 1 .... 1 ....", fmt::pd_pg_pn_pm_s, predicate::nand_pppp),

        // ---- 分段（BRK）----
        inst!("BRKPA",      b"00100101 0 . 00 .... 11 .... 0 .... 0 ....", fmt::pd_pg_pn_pm_s, predicate::brkpa),
        inst!("BRKPB",      b"00100101 0 . 00 .... 11 .... 0 .... 1 ....", fmt::pd_pg_pn_pm_s, predicate::brkpb),
        inst!("BRKA_z",     b"00100101 0 . 01 0000 01 .... 0 .... 0 ....", fmt::pd_pg_pn_s, predicate::brka_z),
        inst!("BRKA_m",     b"00100101 0 . 01 0000 01 .... 0 .... 1 ....", fmt::pd_pg_pn_s, predicate::brka_m),
        inst!("BRKB_z",     b"00100101 1 . 01 0000 01 .... 0 .... 0 ....", fmt::pd_pg_pn_s, predicate::brkb_z),
        inst!("BRKB_m",     b"00100101 1 . 01 0000 01 .... 0 .... 1 ....", fmt::pd_pg_pn_s, predicate::brkb_m),
        invalid!(           b"00100101 0 1 01 0000 01 .... 0 .... 1 ...."),
        invalid!(           b"00100101 1 1 01 0000 01 .... 0 .... 1 ...."),
        inst!("BRKN",       b"00100101 0 . 01 1000 01 .... 0 .... 0 ....", fmt::pd_pg_pn_s, predicate::brkn),

        // ---- 谓词杂项 ----
        inst!("PTEST",      b"00100101 0 1 01 0000 11 .... 0 .... 0 0000", fmt::ptest, predicate::ptest),
        inst!("PFIRST",     b"00100101 0 1 01 1000 11 0000 0 .... 0 ....", fmt::pd_pn_e0, predicate::pfirst),
        inst!("PNEXT",      b"00100101 .. 01 1001 11000 10 .... 0 ....",  fmt::pd_pn, predicate::pnext),
        inst!("PTRUE",      b"00100101 .. 011 00 . 111000 ..... 0 ....",  fmt::ptrue, predicate::ptrue),
        inst!("SETFFR",     b"00100101 0010 1100 1001 0000 0000 0000",    fmt::empty, predicate::setffr),
        inst!("PFALSE",     b"00100101 0001 1000 1110 0100 0000 ....",    fmt::p_d, predicate::pfalse),
        inst!("RDFFR_p",    b"00100101 0 . 01 1000 1111 000 .... 0 ....", fmt::rdffr_p, predicate::rdffr_p),
        inst!("RDFFR",      b"00100101 0001 1001 1111 0000 000 0 ....",   fmt::p_d, predicate::rdffr),
        inst!("WRFFR",      b"00100101 0010 1000 1001 000 .... 00000",    fmt::p_n, predicate::wrffr),

        // ---- 谓词计数 ----
        inst!("CNTP",          b"00100101 .. 100 000 10 .... 0 .... .....", fmt::cntp, predicate::cntp),
        inst!("INCDECP_r",     b"00100101 .. 101 10 . 10001 00 .... .....", fmt::incdec_pred, predicate::incdecp_r),
        inst!("INCDECP_z",     b"00100101 .. 101 10 . 10000 00 .... .....", fmt::incdec_pred, predicate::incdecp_z),
        inst!("SINCDECP_r_32", b"00100101 .. 101 0 . . 10001 0 0 .... .....", fmt::sincdec_pred, predicate::sincdecp_r_32),
        inst!("SINCDECP_r_64", b"00100101 .. 101 0 . . 10001 1 0 .... .....", fmt::sincdec_pred, predicate::sincdecp_r_64),
        inst!("SINCDECP_z",    b"00100101 .. 101 0 . . 10000 0 0 .... .....", fmt::sincdec_pred, predicate::sincdecp_z),

        // ---- WHILE / CTERM ----
        inst!("WHILE_lt",   b"00100101 .. 1 ..... 000 . . 1 ..... . ....", fmt::while_lt, predicate::while_lt),
        inst!("WHILE_gt",   b"00100101 .. 1 ..... 000 . . 0 ..... . ....", fmt::while_gt, predicate::while_gt),
        inst!("WHILE_ptr",  b"00100101 .. 1 ..... 001 100 ..... . ....",   fmt::while_ptr, predicate::while_ptr),
        inst!("CTERM",      b"00100101 1 . 1 ..... 001 000 ..... . 0000",  fmt::cterm, predicate::cterm),

        // ---- 宽立即数 ----
        inst!("DUP_i",      b"00100101 .. 111 00 011 . ........ .....", fmt::rd_sh8s, int::dup_i),
        invalid!(           b"00100101 00 111 00 011 1 ........ ....."),
        inst!("FDUP",       b"00100101 .. 111 00 111 0 ........ .....", fmt::rd_i8, fp::fdup),
        inst!("ADD_zzi",    b"00100101 .. 100 000 11 . ........ .....", fmt::rdn_sh8u, int::add_zzi),
        inst!("SUB_zzi",    b"00100101 .. 100 001 11 . ........ .....", fmt::rdn_sh8u, int::sub_zzi),
        inst!("SUBR_zzi",   b"00100101 .. 100 011 11 . ........ .....", fmt::rdn_sh8u, int::subr_zzi),
        inst!("SQADD_zzi",  b"00100101 .. 100 100 11 . ........ .....", fmt::rdn_sh8u, int::sqadd_zzi),
        inst!("UQADD_zzi",  b"00100101 .. 100 101 11 . ........ .....", fmt::rdn_sh8u, int::uqadd_zzi),
        inst!("SQSUB_zzi",  b"00100101 .. 100 110 11 . ........ .....", fmt::rdn_sh8u, int::sqsub_zzi),
        inst!("UQSUB_zzi",  b"00100101 .. 100 111 11 . ........ .....", fmt::rdn_sh8u, int::uqsub_zzi),
        invalid!(           b"00100101 00 100 000 11 1 ........ ....."),
        invalid!(           b"00100101 00 100 001 11 1 ........ ....."),
        invalid!(           b"00100101 00 100 011 11 1 ........ ....."),
        invalid!(           b"00100101 00 100 100 11 1 ........ ....."),
        invalid!(           b"00100101 00 100 101 11 1 ........ ....."),
        invalid!(           b"00100101 00 100 110 11 1 ........ ....."),
        invalid!(           b"00100101 00 100 111 11 1 ........ ....."),
        inst!("SMAX_zzi",   b"00100101 .. 101 000 110 ........ .....", fmt::rdn_i8s, int::smax_zzi),
        inst!("UMAX_zzi",   b"00100101 .. 101 001 110 ........ .....", fmt::rdn_i8u, int::umax_zzi),
        inst!("SMIN_zzi",   b"00100101 .. 101 010 110 ........ .....", fmt::rdn_i8s, int::smin_zzi),
        inst!("UMIN_zzi",   b"00100101 .. 101 011 110 ........ .....", fmt::rdn_i8u, int::umin_zzi),
        inst!("MUL_zzi",    b"00100101 .. 110 000 110 ........ .....", fmt::rdn_i8s, int::mul_zzi),

        // ---- 点积与矩阵乘 ----
        inst!("SDOT_zzzz",  b"01000100 1 . 0 ..... 00000 0 ..... .....", fmt::rda_rn_rm, int::sdot_zzzz),
        inst!("UDOT_zzzz",  b"01000100 1 . 0 ..... 00000 1 ..... .....", fmt::rda_rn_rm, int::udot_zzzz),
        inst!("USDOT_zzzz", b"01000100 10 0 ..... 011110 ..... .....",   fmt::rda_rn_rm, sve2::usdot_zzzz),
        inst!("SMMLA",      b"01000101 00 0 ..... 100110 ..... .....",   fmt::rda_rn_rm, sve2::smmla),
        inst!("USMMLA",     b"01000101 10 0 ..... 100110 ..... .....",   fmt::rda_rn_rm, sve2::usmmla),
        inst!("UMMLA",      b"01000101 11 0 ..... 100110 ..... .....",   fmt::rda_rn_rm, sve2::ummla),

        // ---- SVE2 饱和一元 ----
        inst!("SQABS",      b"01000100 .. 001 000 101 ... ..... .....", fmt::rd_pg_rn, sve2::sqabs),
        inst!("SQNEG",      b"01000100 .. 001 001 101 ... ..... .....", fmt::rd_pg_rn, sve2::sqneg),

        // ---- SVE2 加宽运算 ----
        inst!("SADDLB",     b"01000101 .. 0 ..... 000000 ..... .....", fmt::rd_rn_rm, sve2::saddlb),
        inst!("SADDLT",     b"01000101 .. 0 ..... 000001 ..... .....", fmt::rd_rn_rm, sve2::saddlt),
        inst!("UADDLB",     b"01000101 .. 0 ..... 000010 ..... .....", fmt::rd_rn_rm, sve2::uaddlb),
        inst!("UADDLT",     b"01000101 .. 0 ..... 000011 ..... .....", fmt::rd_rn_rm, sve2::uaddlt),
        inst!("SSUBLB",     b"01000101 .. 0 ..... 000100 ..... .....", fmt::rd_rn_rm, sve2::ssublb),
        inst!("SSUBLT",     b"01000101 .. 0 ..... 000101 ..... .....", fmt::rd_rn_rm, sve2::ssublt),
        inst!("USUBLB",     b"01000101 .. 0 ..... 000110 ..... .....", fmt::rd_rn_rm, sve2::usublb),
        inst!("USUBLT",     b"01000101 .. 0 ..... 000111 ..... .....", fmt::rd_rn_rm, sve2::usublt),
        inst!("SABDLB",     b"01000101 .. 0 ..... 001100 ..... .....", fmt::rd_rn_rm, sve2::sabdlb),
        inst!("SABDLT",     b"01000101 .. 0 ..... 001101 ..... .....", fmt::rd_rn_rm, sve2::sabdlt),
        inst!("UABDLB",     b"01000101 .. 0 ..... 001110 ..... .....", fmt::rd_rn_rm, sve2::uabdlb),
        inst!("UABDLT",     b"01000101 .. 0 ..... 001111 ..... .....", fmt::rd_rn_rm, sve2::uabdlt),
        inst!("SADDWB",     b"01000101 .. 0 ..... 010000 ..... .....", fmt::rd_rn_rm, sve2::saddwb),
        inst!("SADDWT",     b"01000101 .. 0 ..... 010001 ..... .....", fmt::rd_rn_rm, sve2::saddwt),
        inst!("UADDWB",     b"01000101 .. 0 ..... 010010 ..... .....", fmt::rd_rn_rm, sve2::uaddwb),
        inst!("UADDWT",     b"01000101 .. 0 ..... 010011 ..... .....", fmt::rd_rn_rm, sve2::uaddwt),
        inst!("SSUBWB",     b"01000101 .. 0 ..... 010100 ..... .....", fmt::rd_rn_rm, sve2::ssubwb),
        inst!("SSUBWT",     b"01000101 .. 0 ..... 010101 ..... .....", fmt::rd_rn_rm, sve2::ssubwt),
        inst!("USUBWB",     b"01000101 .. 0 ..... 010110 ..... .....", fmt::rd_rn_rm, sve2::usubwb),
        inst!("USUBWT",     b"01000101 .. 0 ..... 010111 ..... .....", fmt::rd_rn_rm, sve2::usubwt),
        inst!("SMULLB_zzz", b"01000101 .. 0 ..... 011100 ..... .....", fmt::rd_rn_rm, sve2::smullb_zzz),
        inst!("SMULLT_zzz", b"01000101 .. 0 ..... 011101 ..... .....", fmt::rd_rn_rm, sve2::smullt_zzz),
        inst!("UMULLB_zzz", b"01000101 .. 0 ..... 011110 ..... .....", fmt::rd_rn_rm, sve2::umullb_zzz),
        inst!("UMULLT_zzz", b"01000101 .. 0 ..... 011111 ..... .....", fmt::rd_rn_rm, sve2::umullt_zzz),
        inst!("SADDLBT",    b"01000101 .. 0 ..... 100000 ..... .....", fmt::rd_rn_rm, sve2::saddlbt),
        inst!("SSUBLBT",    b"01000101 .. 0 ..... 100010 ..... .....", fmt::rd_rn_rm, sve2::ssublbt),
        inst!("SSUBLTB",    b"01000101 .. 0 ..... 100011 ..... .....", fmt::rd_rn_rm, sve2::ssubltb),
        inst!("SSHLLB",     b"01000101 0 . 0 ..... 1010 00 ..... .....", fmt::rd_rn_tszh_shl, sve2::sshllb),
        inst!("SSHLLT",     b"01000101 0 . 0 ..... 1010 01 ..... .....", fmt::rd_rn_tszh_shl, sve2::sshllt),
        inst!("USHLLB",     b"01000101 0 . 0 ..... 1010 10 ..... .....", fmt::rd_rn_tszh_shl, sve2::ushllb),
        inst!("USHLLT",     b"01000101 0 . 0 ..... 1010 11 ..... .....", fmt::rd_rn_tszh_shl, sve2::ushllt),

        // ---- SVE2 收窄运算 ----
        inst!("SQSHRUNB",   b"01000101 0 . 1 ..... 00 0000 ..... .....", fmt::rd_rn_tszh_shr, sve2::sqshrunb),
        inst!("SQSHRUNT",   b"01000101 0 . 1 ..... 00 0001 ..... .....", fmt::rd_rn_tszh_shr, sve2::sqshrunt),
        inst!("SHRNB",      b"01000101 0 . 1 ..... 00 0100 ..... .....", fmt::rd_rn_tszh_shr, sve2::shrnb),
        inst!("SHRNT",      b"01000101 0 . 1 ..... 00 0101 ..... .....", fmt::rd_rn_tszh_shr, sve2::shrnt),
        inst!("RSHRNB",     b"01000101 0 . 1 ..... 00 0110 ..... .....", fmt::rd_rn_tszh_shr, sve2::rshrnb),
        inst!("RSHRNT",     b"01000101 0 . 1 ..... 00 0111 ..... .....", fmt::rd_rn_tszh_shr, sve2::rshrnt),
        inst!("SQSHRNB",    b"01000101 0 . 1 ..... 00 1000 ..... .....", fmt::rd_rn_tszh_shr, sve2::sqshrnb),
        inst!("SQSHRNT",    b"01000101 0 . 1 ..... 00 1001 ..... .....", fmt::rd_rn_tszh_shr, sve2::sqshrnt),
        inst!("UQSHRNB",    b"01000101 0 . 1 ..... 00 1100 ..... .....", fmt::rd_rn_tszh_shr, sve2::uqshrnb),
        inst!("UQSHRNT",    b"01000101 0 . 1 ..... 00 1101 ..... .....", fmt::rd_rn_tszh_shr, sve2::uqshrnt),
        inst!("SQXTNB",     b"01000101 0 . 1 .. 000 010 000 ..... .....", fmt::rd_rn_tszh, sve2::sqxtnb),
        inst!("SQXTNT",     b"01000101 0 . 1 .. 000 010 001 ..... .....", fmt::rd_rn_tszh, sve2::sqxtnt),
        inst!("UQXTNB",     b"01000101 0 . 1 .. 000 010 010 ..... .....", fmt::rd_rn_tszh, sve2::uqxtnb),
        inst!("UQXTNT",     b"01000101 0 . 1 .. 000 010 011 ..... .....", fmt::rd_rn_tszh, sve2::uqxtnt),
        inst!("SQXTUNB",    b"01000101 0 . 1 .. 000 010 100 ..... .....", fmt::rd_rn_tszh, sve2::sqxtunb),
        inst!("SQXTUNT",    b"01000101 0 . 1 .. 000 010 101 ..... .....", fmt::rd_rn_tszh, sve2::sqxtunt),
        inst!("ADDHNB",     b"01000101 .. 1 ..... 011 000 ..... .....", fmt::rd_rn_rm, sve2::addhnb),
        inst!("ADDHNT",     b"01000101 .. 1 ..... 011 001 ..... .....", fmt::rd_rn_rm, sve2::addhnt),
        inst!("SUBHNB",     b"01000101 .. 1 ..... 011 100 ..... .....", fmt::rd_rn_rm, sve2::subhnb),
        inst!("SUBHNT",     b"01000101 .. 1 ..... 011 101 ..... .....", fmt::rd_rn_rm, sve2::subhnt),

        // ---- SVE2 匹配 ----
        inst!("MATCH",      b"01000101 .. 1 ..... 100 ... ..... 0 ....", fmt::pd_pg_rn_rm, sve2::match_ppzz),
        inst!("NMATCH",     b"01000101 .. 1 ..... 100 ... ..... 1 ....", fmt::pd_pg_rn_rm, sve2::nmatch_ppzz),

        // ---- SVE2 移位累加与插入 ----
        inst!("SSRA",       b"01000101 .. 0 ..... 1110 00 ..... .....", fmt::rd_rn_tsz_shr, sve2::ssra),
        inst!("USRA",       b"01000101 .. 0 ..... 1110 01 ..... .....", fmt::rd_rn_tsz_shr, sve2::usra),
        inst!("SRSRA",      b"01000101 .. 0 ..... 1110 10 ..... .....", fmt::rd_rn_tsz_shr, sve2::srsra),
        inst!("URSRA",      b"01000101 .. 0 ..... 1110 11 ..... .....", fmt::rd_rn_tsz_shr, sve2::ursra),
        inst!("SRI",        b"01000101 .. 0 ..... 11110 0 ..... .....", fmt::rd_rn_tsz_shr, sve2::sri),
        inst!("SLI",        b"01000101 .. 0 ..... 11110 1 ..... .....", fmt::rd_rn_tsz_shl, sve2::sli),
        inst!("SABA",       b"01000101 .. 0 ..... 11111 0 ..... .....", fmt::rd_rn_rm, sve2::saba),
        inst!("UABA",       b"01000101 .. 0 ..... 11111 1 ..... .....", fmt::rd_rn_rm, sve2::uaba),

        // ---- 浮点：无谓词 ----
        inst!("FADD_zzz",   b"01100101 .. 0 ..... 000 000 ..... .....", fmt::rd_rn_rm, fp::fadd_zzz),
        inst!("FSUB_zzz",   b"01100101 .. 0 ..... 000 001 ..... .....", fmt::rd_rn_rm, fp::fsub_zzz),
        inst!("FMUL_zzz",   b"01100101 .. 0 ..... 000 010 ..... .....", fmt::rd_rn_rm, fp::fmul_zzz),
        inst!("FTSMUL",     b"01100101 .. 0 ..... 000 011 ..... .....", fmt::rd_rn_rm, fp::ftsmul),
        inst!("FRECPS",     b"01100101 .. 0 ..... 000 110 ..... .....", fmt::rd_rn_rm, fp::frecps),
        inst!("FRSQRTS",    b"01100101 .. 0 ..... 000 111 ..... .....", fmt::rd_rn_rm, fp::frsqrts),
        inst!("FRECPE",     b"01100101 .. 001 110 001100 ..... .....",  fmt::rd_rn, fp::frecpe),
        inst!("FRSQRTE",    b"01100101 .. 001 111 001100 ..... .....",  fmt::rd_rn, fp::frsqrte),

        // ---- 浮点：谓词控制二元 ----
        inst!("FADD_zpzz",   b"01100101 .. 00 0000 100 ... ..... .....", fmt::rdn_pg_rm, fp::fadd_zpzz),
        inst!("FSUB_zpzz",   b"01100101 .. 00 0001 100 ... ..... .....", fmt::rdn_pg_rm, fp::fsub_zpzz),
        inst!("FMUL_zpzz",   b"01100101 .. 00 0010 100 ... ..... .....", fmt::rdn_pg_rm, fp::fmul_zpzz),
        inst!("FSUBR_zpzz",  b"01100101 .. 00 0011 100 ... ..... .....", fmt::rdm_pg_rn, fp::fsub_zpzz),
        inst!("FMAXNM_zpzz", b"01100101 .. 00 0100 100 ... ..... .....", fmt::rdn_pg_rm, fp::fmaxnm_zpzz),
        inst!("FMINNM_zpzz", b"01100101 .. 00 0101 100 ... ..... .....", fmt::rdn_pg_rm, fp::fminnm_zpzz),
        inst!("FMAX_zpzz",   b"01100101 .. 00 0110 100 ... ..... .....", fmt::rdn_pg_rm, fp::fmax_zpzz),
        inst!("FMIN_zpzz",   b"01100101 .. 00 0111 100 ... ..... .....", fmt::rdn_pg_rm, fp::fmin_zpzz),
        inst!("FABD",        b"01100101 .. 00 1000 100 ... ..... .....", fmt::rdn_pg_rm, fp::fabd),
        inst!("FSCALE",      b"01100101 .. 00 1001 100 ... ..... .....", fmt::rdn_pg_rm, fp::fscale),
        inst!("FMULX",       b"01100101 .. 00 1010 100 ... ..... .....", fmt::rdn_pg_rm, fp::fmulx),
        inst!("FDIVR",       b"01100101 .. 00 1100 100 ... ..... .....", fmt::rdm_pg_rn, fp::fdiv),
        inst!("FDIV",        b"01100101 .. 00 1101 100 ... ..... .....", fmt::rdn_pg_rm, fp::fdiv),

        // ---- 浮点：谓词控制立即数 ----
        inst!("FADD_zpzi",   b"01100101 .. 011 000 100 ... 0000 . .....", fmt::rdn_pg_i1, fp::fadd_zpzi),
        inst!("FSUB_zpzi",   b"01100101 .. 011 001 100 ... 0000 . .....", fmt::rdn_pg_i1, fp::fsub_zpzi),
        inst!("FMUL_zpzi",   b"01100101 .. 011 010 100 ... 0000 . .....", fmt::rdn_pg_i1, fp::fmul_zpzi),
        inst!("FSUBR_zpzi",  b"01100101 .. 011 011 100 ... 0000 . .....", fmt::rdn_pg_i1, fp::fsubr_zpzi),
        inst!("FMAXNM_zpzi", b"01100101 .. 011 100 100 ... 0000 . .....", fmt::rdn_pg_i1, fp::fmaxnm_zpzi),
        inst!("FMINNM_zpzi", b"01100101 .. 011 101 100 ... 0000 . .....", fmt::rdn_pg_i1, fp::fminnm_zpzi),
        inst!("FMAX_zpzi",   b"01100101 .. 011 110 100 ... 0000 . .....", fmt::rdn_pg_i1, fp::fmax_zpzi),
        inst!("FMIN_zpzi",   b"01100101 .. 011 111 100 ... 0000 . .....", fmt::rdn_pg_i1, fp::fmin_zpzi),

        // ---- 浮点归约 ----
        inst!("FADDV",      b"01100101 .. 000 000 001 ... ..... .....", fmt::rd_pg_rn, fp::faddv),
        inst!("FMAXNMV",    b"01100101 .. 000 100 001 ... ..... .....", fmt::rd_pg_rn, fp::fmaxnmv),
        inst!("FMINNMV",    b"01100101 .. 000 101 001 ... ..... .....", fmt::rd_pg_rn, fp::fminnmv),
        inst!("FMAXV",      b"01100101 .. 000 110 001 ... ..... .....", fmt::rd_pg_rn, fp::fmaxv),
        inst!("FMINV",      b"01100101 .. 000 111 001 ... ..... .....", fmt::rd_pg_rn, fp::fminv),
        inst!("FADDA",      b"01100101 .. 011 000 001 ... ..... .....", fmt::rdn_pg_rm, fp::fadda),

        // ---- 浮点比较 ----
        inst!("FCMGE_ppzz", b"01100101 .. 0 ..... 010 ... ..... 0 ....", fmt::pd_pg_rn_rm, fp::fcmge_ppzz),
        inst!("FCMGT_ppzz", b"01100101 .. 0 ..... 010 ... ..... 1 ....", fmt::pd_pg_rn_rm, fp::fcmgt_ppzz),
        inst!("FCMEQ_ppzz", b"01100101 .. 0 ..... 011 ... ..... 0 ....", fmt::pd_pg_rn_rm, fp::fcmeq_ppzz),
        inst!("FCMNE_ppzz", b"01100101 .. 0 ..... 011 ... ..... 1 ....", fmt::pd_pg_rn_rm, fp::fcmne_ppzz),
        inst!("FCMUO_ppzz", b"01100101 .. 0 ..... 110 ... ..... 0 ....", fmt::pd_pg_rn_rm, fp::fcmuo_ppzz),
        inst!("FACGE_ppzz", b"01100101 .. 0 ..... 110 ... ..... 1 ....", fmt::pd_pg_rn_rm, fp::facge_ppzz),
        inst!("FACGT_ppzz", b"01100101 .. 0 ..... 111 ... ..... 1 ....", fmt::pd_pg_rn_rm, fp::facgt_ppzz),
        inst!("FCMGE_ppz0", b"01100101 .. 010 000 001 ... ..... 0 ....", fmt::pd_pg_rn, fp::fcmge_ppz0),
        inst!("FCMGT_ppz0", b"01100101 .. 010 000 001 ... ..... 1 ....", fmt::pd_pg_rn, fp::fcmgt_ppz0),
        inst!("FCMLT_ppz0", b"01100101 .. 010 001 001 ... ..... 0 ....", fmt::pd_pg_rn, fp::fcmlt_ppz0),
        inst!("FCMLE_ppz0", b"01100101 .. 010 001 001 ... ..... 1 ....", fmt::pd_pg_rn, fp::fcmle_ppz0),
        inst!("FCMEQ_ppz0", b"01100101 .. 010 010 001 ... ..... 0 ....", fmt::pd_pg_rn, fp::fcmeq_ppz0),
        inst!("FCMNE_ppz0", b"01100101 .. 010 011 001 ... ..... 0 ....", fmt::pd_pg_rn, fp::fcmne_ppz0),

        // ---- 浮点乘累加 ----
        inst!("FMLA_zpzzz",  b"01100101 .. 1 ..... 0 00 ... ..... .....", fmt::rda_pg_rn_rm, fp::fmla_zpzzz),
        inst!("FMLS_zpzzz",  b"01100101 .. 1 ..... 0 01 ... ..... .....", fmt::rda_pg_rn_rm, fp::fmls_zpzzz),
        inst!("FNMLA_zpzzz", b"01100101 .. 1 ..... 0 10 ... ..... .....", fmt::rda_pg_rn_rm, fp::fnmla_zpzzz),
        inst!("FNMLS_zpzzz", b"01100101 .. 1 ..... 0 11 ... ..... .....", fmt::rda_pg_rn_rm, fp::fnmls_zpzzz),
        inst!("FMAD_zpzzz",  b"01100101 .. 1 ..... 1 00 ... ..... .....", fmt::rdn_pg_ra_rm, fp::fmla_zpzzz),
        inst!("FMSB_zpzzz",  b"01100101 .. 1 ..... 1 01 ... ..... .....", fmt::rdn_pg_ra_rm, fp::fmls_zpzzz),
        inst!("FNMAD_zpzzz", b"01100101 .. 1 ..... 1 10 ... ..... .....", fmt::rdn_pg_ra_rm, fp::fnmla_zpzzz),
        inst!("FNMSB_zpzzz", b"01100101 .. 1 ..... 1 11 ... ..... .....", fmt::rdn_pg_ra_rm, fp::fnmls_zpzzz),

        // ---- 浮点一元 ----
        inst!("FRINTN",     b"01100101 .. 000 000 101 ... ..... .....", fmt::rd_pg_rn, fp::frintn),
        inst!("FRINTP",     b"01100101 .. 000 001 101 ... ..... .....", fmt::rd_pg_rn, fp::frintp),
        inst!("FRINTM",     b"01100101 .. 000 010 101 ... ..... .....", fmt::rd_pg_rn, fp::frintm),
        inst!("FRINTZ",     b"01100101 .. 000 011 101 ... ..... .....", fmt::rd_pg_rn, fp::frintz),
        inst!("FRINTA",     b"01100101 .. 000 100 101 ... ..... .....", fmt::rd_pg_rn, fp::frinta),
        inst!("FRINTX",     b"01100101 .. 000 110 101 ... ..... .....", fmt::rd_pg_rn, fp::frintx),
        inst!("FRINTI",     b"01100101 .. 000 111 101 ... ..... .....", fmt::rd_pg_rn, fp::frinti),
        inst!("FRECPX",     b"01100101 .. 001 100 101 ... ..... .....", fmt::rd_pg_rn, fp::frecpx),
        inst!("FSQRT",      b"01100101 .. 001 101 101 ... ..... .....", fmt::rd_pg_rn, fp::fsqrt),

        // ---- 浮点精度转换 ----
        inst!("FCVT_sh",    b"01100101 10 0010 00 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvt_sh),
        inst!("FCVT_hs",    b"01100101 10 0010 01 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvt_hs),
        inst!("BFCVT",      b"01100101 10 0010 10 101 ... ..... .....", fmt::rd_pg_rn, fp::bfcvt),
        inst!("FCVT_dh",    b"01100101 11 0010 00 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvt_dh),
        inst!("FCVT_hd",    b"01100101 11 0010 01 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvt_hd),
        inst!("FCVT_ds",    b"01100101 11 0010 10 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvt_ds),
        inst!("FCVT_sd",    b"01100101 11 0010 11 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvt_sd),

        // ---- 浮点转整数（向零）----
        inst!("FCVTZS_hh",  b"01100101 01 011 01 0 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzs_hh),
        inst!("FCVTZU_hh",  b"01100101 01 011 01 1 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzu_hh),
        inst!("FCVTZS_hs",  b"01100101 01 011 10 0 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzs_hs),
        inst!("FCVTZU_hs",  b"01100101 01 011 10 1 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzu_hs),
        inst!("FCVTZS_hd",  b"01100101 01 011 11 0 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzs_hd),
        inst!("FCVTZU_hd",  b"01100101 01 011 11 1 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzu_hd),
        inst!("FCVTZS_ss",  b"01100101 10 011 10 0 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzs_ss),
        inst!("FCVTZU_ss",  b"01100101 10 011 10 1 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzu_ss),
        inst!("FCVTZS_ds",  b"01100101 11 011 00 0 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzs_ds),
        inst!("FCVTZU_ds",  b"01100101 11 011 00 1 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzu_ds),
        inst!("FCVTZS_sd",  b"01100101 11 011 10 0 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzs_sd),
        inst!("FCVTZU_sd",  b"01100101 11 011 10 1 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzu_sd),
        inst!("FCVTZS_dd",  b"01100101 11 011 11 0 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzs_dd),
        inst!("FCVTZU_dd",  b"01100101 11 011 11 1 101 ... ..... .....", fmt::rd_pg_rn, fp::fcvtzu_dd),

        // ---- 整数转浮点 ----
        inst!("SCVTF_hh",   b"01100101 01 010 01 0 101 ... ..... .....", fmt::rd_pg_rn, fp::scvtf_hh),
        inst!("UCVTF_hh",   b"01100101 01 010 01 1 101 ... ..... .....", fmt::rd_pg_rn, fp::ucvtf_hh),
        inst!("SCVTF_sh",   b"01100101 01 010 10 0 101 ... ..... .....", fmt::rd_pg_rn, fp::scvtf_sh),
        inst!("UCVTF_sh",   b"01100101 01 010 10 1 101 ... ..... .....", fmt::rd_pg_rn, fp::ucvtf_sh),
        inst!("SCVTF_dh",   b"01100101 01 010 11 0 101 ... ..... .....", fmt::rd_pg_rn, fp::scvtf_dh),
        inst!("UCVTF_dh",   b"01100101 01 010 11 1 101 ... ..... .....", fmt::rd_pg_rn, fp::ucvtf_dh),
        inst!("SCVTF_ss",   b"01100101 10 010 10 0 101 ... ..... .....", fmt::rd_pg_rn, fp::scvtf_ss),
        inst!("UCVTF_ss",   b"01100101 10 010 10 1 101 ... ..... .....", fmt::rd_pg_rn, fp::ucvtf_ss),
        inst!("SCVTF_sd",   b"01100101 11 010 00 0 101 ... ..... .....", fmt::rd_pg_rn, fp::scvtf_sd),
        inst!("UCVTF_sd",   b"01100101 11 010 00 1 101 ... ..... .....", fmt::rd_pg_rn, fp::ucvtf_sd),
        inst!("SCVTF_ds",   b"01100101 11 010 10 0 101 ... ..... .....", fmt::rd_pg_rn, fp::scvtf_ds),
        inst!("UCVTF_ds",   b"01100101 11 010 10 1 101 ... ..... .....", fmt::rd_pg_rn, fp::ucvtf_ds),
        inst!("SCVTF_dd",   b"01100101 11 010 11 0 101 ... ..... .....", fmt::rd_pg_rn, fp::scvtf_dd),
        inst!("UCVTF_dd",   b"01100101 11 010 11 1 101 ... ..... .....", fmt::rd_pg_rn, fp::ucvtf_dd),

        // ---- 浮点矩阵乘与 BF16 ----
        inst!("FMMLA_d",    b"01100100 11 1 ..... 111001 ..... .....", fmt::rda_rn_rm, sve2::fmmla_d),
        inst!("BFDOT",      b"01100100 01 1 ..... 100000 ..... .....", fmt::rda_rn_rm, sve2::bfdot_zzzz),
        inst!("BFMMLA",     b"01100100 01 1 ..... 111001 ..... .....", fmt::rda_rn_rm, sve2::bfmmla),

        // ---- LDR/STR ----
        inst!("LDR_pri",    b"10000101 10 ...... 000 ... ..... 0 ....", fmt::ldr, mem::ldr_pri),
        inst!("LDR_zri",    b"10000101 10 ...... 010 ... ..... .....",  fmt::ldr, mem::ldr_zri),
        inst!("STR_pri",    b"11100101 10 ...... 000 ... ..... 0 ....", fmt::ldr, mem::str_pri),
        inst!("STR_zri",    b"11100101 10 ...... 010 ... ..... .....",  fmt::ldr, mem::str_zri),

        // ---- 连续加载 ----
        inst!("LD1R_zpri",  b"1000010 .. 1 ...... 1 .. ... ..... .....", fmt::ld1r, mem::ld1r_zpri),
        inst!("LD1_zprr",   b"1010010 .... ..... 010 ... ..... .....",   fmt::ld_rr, mem::ld_zprr),
        inst!("LDFF1_zprr", b"1010010 .... ..... 011 ... ..... .....",   fmt::ld_rr, mem::ldff1_zprr),
        inst!("LD1_zpri",   b"1010010 .... 0 .... 101 ... ..... .....",  fmt::ld_ri, mem::ld_zpri),
        inst!("LDNF1_zpri", b"1010010 .... 1 .... 101 ... ..... .....",  fmt::ld_ri, mem::ldnf1_zpri),
        inst!("LDn_zprr",   b"1010010 .. .. ..... 110 ... ..... .....",  fmt::ldn_rr, mem::ld_zprr),
        inst!("LDn_zpri",   b"1010010 .. .. 0 .... 111 ... ..... .....", fmt::ldn_ri, mem::ld_zpri),
        inst!("LD1RQ_zprr", b"1010010 .. 00 ..... 000 ... ..... .....",  fmt::ldq_rr, mem::ld1rq_zprr),
        inst!("LD1RQ_zpri", b"1010010 .. 00 0 .... 001 ... ..... .....", fmt::ldq_ri, mem::ld1rq_zpri),
        inst!("LD1RO_zprr", b"1010010 .. 01 ..... 000 ... ..... .....",  fmt::ldq_rr, mem::ld1ro_zprr),
        inst!("LD1RO_zpri", b"1010010 .. 01 0 .... 001 ... ..... .....", fmt::ldq_ri, mem::ld1ro_zpri),

        // ---- 聚集加载 ----
        inst!("LD1_zprz_32",   b"1000010 .. . . ..... 0 . . ... ..... .....", fmt::gather32_rr, mem::ld1_zprz),
        inst!("LD1_zpiz_32",   b"1000010 .. 01 ..... 1 . . ... ..... .....",  fmt::gather32_ri, mem::ld1_zpiz),
        inst!("LD1_zprz_64u",  b"1100010 .. . . ..... 0 . . ... ..... .....", fmt::gather64_unpacked_rr, mem::ld1_zprz),
        inst!("LD1_zprz_64",   b"1100010 .. 1 . ..... 1 . . ... ..... .....", fmt::gather64_rr, mem::ld1_zprz),
        inst!("LD1_zpiz_64",   b"1100010 .. 01 ..... 1 . . ... ..... .....",  fmt::gather64_ri, mem::ld1_zpiz),

        // ---- 预取：只做访问检查 ----
        inst!("PRF",           b"1000010 11 1 ...... 0 .. ... ..... 0 ....", fmt::empty, mem::prf),
        inst!("PRF_rr",        b"1000010 .. 00 ..... 110 ... ..... 0 ....",  fmt::r_m, mem::prf_rr),
        inst!("PRF_vi_32",     b"1000010 .. 00 ..... 111 ... ..... 0 ....",  fmt::empty, mem::prf),
        inst!("PRF_sv_32",     b"1000010 00 . 1 ..... 0 .. ... ..... 0 ....", fmt::empty, mem::prf),
        inst!("PRF_vi_64",     b"1100010 .. 00 ..... 111 ... ..... 0 ....",  fmt::empty, mem::prf),
        inst!("PRF_sv_64u",    b"1100010 00 . 1 ..... 0 .. ... ..... 0 ....", fmt::empty, mem::prf),
        inst!("PRF_sv_64",     b"1100010 00 11 ..... 1 .. ... ..... 0 ....", fmt::empty, mem::prf),

        // ---- 连续存储 ----
        inst!("ST1_zprr",   b"1110010 .. .. ..... 010 ... ..... .....",   fmt::st_rr, mem::st_zprr),
        inst!("ST1_zpri",   b"1110010 .. .. 0 .... 111 ... ..... .....",  fmt::st_ri, mem::st_zpri),
        inst!("STn_zprr",   b"1110010 .. .. ..... 011 ... ..... .....",   fmt::stn_rr, mem::st_zprr),
        inst!("STn_zpri",   b"1110010 .. .. 1 .... 111 ... ..... .....",  fmt::stn_ri, mem::st_zpri),

        // ---- 分散存储 ----
        inst!("ST1_zprz_32",  b"1110010 .. 1 . ..... 1 . 0 ... ..... .....", fmt::scatter32_rr, mem::st1_zprz),
        inst!("ST1_zprz_64u", b"1110010 .. 0 . ..... 1 . 0 ... ..... .....", fmt::scatter64_unpacked_rr, mem::st1_zprz),
        inst!("ST1_zprz_64",  b"1110010 .. 0 . ..... 101 ... ..... .....",   fmt::scatter64_rr, mem::st1_zprz),
        inst!("ST1_zpiz_64",  b"1110010 .. 10 ..... 101 ... ..... .....",    fmt::scatter64_ri, mem::st1_zpiz),
        inst!("ST1_zpiz_32",  b"1110010 .. 11 ..... 101 ... ..... .....",    fmt::scatter32_ri, mem::st1_zpiz),
    ]
}

// ----------------------------------------------------------------------
// 查找
// ----------------------------------------------------------------------

/// 参与快速索引的位：29:22 与 13:10
const HASH_BITS: u32 = 0x3FC0_3C00;

#[inline]
fn fast_index(insn: u32) -> usize {
    (((insn >> 10) & 0xF) | ((insn >> 18) & 0xFF0)) as usize
}

struct LookupTable {
    buckets: Vec<Vec<u16>>,
    entries: Vec<Pattern>,
}

fn build_lookup_table() -> LookupTable {
    let mut entries = make_decode_table();
    // 固定位越多越优先；排序稳定，表内顺序作为次序
    entries.sort_by(|a, b| b.mask.count_ones().cmp(&a.mask.count_ones()));

    let mut buckets: Vec<Vec<u16>> = vec![Vec::new(); 4096];
    for (idx, entry) in entries.iter().enumerate() {
        let relevant_mask = entry.mask & HASH_BITS;
        let relevant_expected = entry.expected & HASH_BITS;
        for slot in 0..4096u32 {
            let test = ((slot & 0xF) << 10) | (((slot >> 4) & 0xFF) << 22);
            if test & relevant_mask == relevant_expected {
                buckets[slot as usize].push(idx as u16);
            }
        }
    }
    LookupTable { buckets, entries }
}

fn lookup_table() -> &'static LookupTable {
    static LOOKUP: OnceLock<LookupTable> = OnceLock::new();
    LOOKUP.get_or_init(build_lookup_table)
}

/// 找到命中的模板；保留编码与无匹配都返回 `None`
pub(crate) fn lookup(insn: u32) -> Option<&'static Pattern> {
    let table = lookup_table();
    let bucket = &table.buckets[fast_index(insn)];
    bucket
        .iter()
        .map(|&idx| &table.entries[idx as usize])
        .find(|p| p.matches(insn))
        .filter(|p| !p.invalid)
}

/// 纯译码：不产生任何 IR，只报告模板名与参数
pub fn decode(insn: u32) -> Option<Decoded> {
    lookup(insn).map(|p| Decoded { name: p.name, args: (p.args)(insn) })
}

/// 译码表中全部有效模板的名字
pub fn pattern_names() -> impl Iterator<Item = &'static str> {
    lookup_table().entries.iter().filter(|p| !p.invalid).map(|p| p.name)
}
