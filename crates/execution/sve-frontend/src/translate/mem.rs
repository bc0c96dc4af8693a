//! 内存访问
//!
//! 整寄存器 LDR/STR 直接展开为按字节流（小端）的客户机访问；
//! 其余形式调用按 `[mte][be][dtype][nreg]` 等键选择的助手。
//! 助手描述符的 data 携带目标寄存器号（连续访问）或偏移移位量（聚集/分散）。

use sve_ir::layout::{PREG_TMP, pred_full_reg_offset, vec_full_reg_offset};
use sve_ir::{
    Arg, BinOp, Cond, ContigLoad, ContigStore, FaultLoad, GatherKey, Helper, IROp, MemOp,
    OffsetKind, ScatterKey, Temp, simd_desc,
};

use super::*;
use crate::args::*;
use crate::extract::{dtype_esz, dtype_msz, dtype_signed, msz_dtype};
use crate::pred::PRED_ESZ_MASKS;

// ----------------------------------------------------------------------
// 地址计算
// ----------------------------------------------------------------------

/// `Xn|SP + (Xm << shift)`
fn addr_rr(s: &mut DisasContext<'_>, rn: u32, rm: u32, shift: u8) -> Temp {
    let addr = s.read_xreg(rm);
    s.binary_imm(BinOp::Shl, addr, addr, shift as u64);
    let base = s.read_xreg_sp(rn);
    s.binary(BinOp::Add, addr, addr, base);
    addr
}

/// `Xn|SP + ofs`
fn addr_ri(s: &mut DisasContext<'_>, rn: u32, ofs: i64) -> Temp {
    let addr = s.read_xreg_sp(rn);
    if ofs != 0 {
        s.binary_imm(BinOp::Add, addr, addr, ofs as u64);
    }
    addr
}

// ----------------------------------------------------------------------
// 整寄存器加载/存储
// ----------------------------------------------------------------------

/// 按 8/4/2 字节分块；谓词寄存器长度总是 2 的倍数
fn ldst_chunks(len: u32) -> impl Iterator<Item = (u32, u8)> {
    let mut done = 0;
    std::iter::from_fn(move || {
        let left = len - done;
        if left == 0 {
            return None;
        }
        let size = match left {
            8.. => 3,
            4..=7 => 2,
            2..=3 => 1,
            _ => 0,
        };
        let at = done;
        done += 1 << size;
        Some((at, size))
    })
}

fn do_ldr(s: &mut DisasContext<'_>, vofs: u32, len: u32, rn: u32, imm: i64) {
    let base = addr_ri(s, rn, imm);
    for (at, size) in ldst_chunks(len) {
        let addr = s.temp();
        s.binary_imm(BinOp::Add, addr, base, at as u64);
        let val = s.temp();
        let mop = MemOp::unsigned(size);
        s.push(IROp::GuestLoad { dst: val, addr, mop });
        s.store_env(val, vofs + at, mop);
    }
}

fn do_str(s: &mut DisasContext<'_>, vofs: u32, len: u32, rn: u32, imm: i64) {
    let base = addr_ri(s, rn, imm);
    for (at, size) in ldst_chunks(len) {
        let addr = s.temp();
        s.binary_imm(BinOp::Add, addr, base, at as u64);
        let mop = MemOp::unsigned(size);
        let val = s.load_env(vofs + at, mop);
        s.push(IROp::GuestStore { src: val, addr, mop });
    }
}

trans!(ldr_zri, Rri, |s, a| {
    if s.sve_access_check() {
        let size = s.vec_full_reg_size();
        do_ldr(s, vec_full_reg_offset(a.rd), size, a.rn, a.imm * size as i64);
    }
    true
});

trans!(ldr_pri, Rri, |s, a| {
    if s.sve_access_check() {
        let size = s.pred_full_reg_size();
        do_ldr(s, pred_full_reg_offset(a.rd), size, a.rn, a.imm * size as i64);
    }
    true
});

trans!(str_zri, Rri, |s, a| {
    if s.sve_access_check() {
        let size = s.vec_full_reg_size();
        do_str(s, vec_full_reg_offset(a.rd), size, a.rn, a.imm * size as i64);
    }
    true
});

trans!(str_pri, Rri, |s, a| {
    if s.sve_access_check() {
        let size = s.pred_full_reg_size();
        do_str(s, pred_full_reg_offset(a.rd), size, a.rn, a.imm * size as i64);
    }
    true
});

// ----------------------------------------------------------------------
// 连续加载
// ----------------------------------------------------------------------

/// 调用连续访问助手：`(g, addr, desc[data = zt])`
fn do_mem_zpa(s: &mut DisasContext<'_>, helper: Helper, zt: u32, pg: Arg, addr: Temp, oprsz: u32) {
    let desc = simd_desc(oprsz, oprsz, zt as i32);
    s.call(helper, vec![pg, Arg::Temp(addr), Arg::Desc(desc)]);
}

/// LD2/LD3/LD4 只有不扩展的 dtype
fn nreg_ok(dtype: u32, nreg: u32) -> bool {
    nreg == 0 || dtype == msz_dtype(dtype_msz(dtype) as u32)
}

fn contig_load(s: &DisasContext<'_>, dtype: u32, nreg: u32) -> Helper {
    Helper::LdContig(ContigLoad {
        mte: s.mte_active(),
        be: s.big_endian(),
        dtype: dtype as u8,
        nreg: nreg as u8,
    })
}

fn do_ld_zpa(s: &mut DisasContext<'_>, zt: u32, pg: u32, addr: Temp, dtype: u32, nreg: u32) {
    let helper = contig_load(s, dtype, nreg);
    let vsz = s.vec_full_reg_size();
    let pg = s.preg(pg);
    do_mem_zpa(s, helper, zt, pg, addr, vsz);
}

trans!(ld_zprr, RprrLoad, |s, a| {
    if a.rm == 31 || !nreg_ok(a.dtype, a.nreg) {
        return false;
    }
    if s.sve_access_check() {
        let addr = addr_rr(s, a.rn, a.rm, dtype_msz(a.dtype));
        do_ld_zpa(s, a.rd, a.pg, addr, a.dtype, a.nreg);
    }
    true
});

trans!(ld_zpri, RpriLoad, |s, a| {
    if !nreg_ok(a.dtype, a.nreg) {
        return false;
    }
    if s.sve_access_check() {
        let elements = (s.vec_full_reg_size() >> dtype_esz(a.dtype)) as i64;
        let ofs = (a.imm * elements * (a.nreg as i64 + 1)) << dtype_msz(a.dtype);
        let addr = addr_ri(s, a.rn, ofs);
        do_ld_zpa(s, a.rd, a.pg, addr, a.dtype, a.nreg);
    }
    true
});

fn do_ld_fault(s: &mut DisasContext<'_>, zt: u32, pg: u32, addr: Temp, dtype: u32, first_fault: bool) {
    let helper = Helper::LdFault(FaultLoad {
        mte: s.mte_active(),
        be: s.big_endian(),
        dtype: dtype as u8,
        first_fault,
    });
    let vsz = s.vec_full_reg_size();
    let pg = s.preg(pg);
    do_mem_zpa(s, helper, zt, pg, addr, vsz);
}

// 首次故障加载允许 XZR 作为偏移
trans!(ldff1_zprr, RprrLoad, |s, a| {
    if s.sve_access_check() {
        let addr = addr_rr(s, a.rn, a.rm, dtype_msz(a.dtype));
        do_ld_fault(s, a.rd, a.pg, addr, a.dtype, true);
    }
    true
});

trans!(ldnf1_zpri, RpriLoad, |s, a| {
    if s.sve_access_check() {
        let elements = (s.vec_full_reg_size() >> dtype_esz(a.dtype)) as i64;
        let addr = addr_ri(s, a.rn, (a.imm * elements) << dtype_msz(a.dtype));
        do_ld_fault(s, a.rd, a.pg, addr, a.dtype, false);
    }
    true
});

// ----------------------------------------------------------------------
// 加载并复制
// ----------------------------------------------------------------------

/// 截取谓词的低 `1 << size` 字节到暂存槽，返回暂存槽参数
fn narrow_pred(s: &mut DisasContext<'_>, pg: u32, size: u8) -> Arg {
    let tmp = s.load_env(pred_full_reg_offset(pg), MemOp::unsigned(size));
    s.store_env(tmp, PREG_TMP, MemOp::unsigned(3));
    Arg::Env(PREG_TMP)
}

/// LD1RQ：以 16 字节为向量长度加载，再复制到整个寄存器
fn do_ldrq(s: &mut DisasContext<'_>, zt: u32, pg: u32, addr: Temp, dtype: u32) {
    let vsz = s.vec_full_reg_size();
    let pg = if vsz > 16 { narrow_pred(s, pg, 1) } else { s.preg(pg) };
    let helper = contig_load(s, dtype, 0);
    do_mem_zpa(s, helper, zt, pg, addr, 16);

    if vsz > 16 {
        let doff = vec_full_reg_offset(zt);
        s.push(IROp::GvecDupMem {
            esz: 4,
            dofs: doff + 16,
            aofs: doff,
            oprsz: vsz - 16,
            maxsz: vsz - 16,
        });
    }
}

trans!(ld1rq_zprr, RprrLoad, |s, a| {
    if a.rm == 31 {
        return false;
    }
    if s.sve_access_check() {
        let addr = addr_rr(s, a.rn, a.rm, dtype_msz(a.dtype));
        do_ldrq(s, a.rd, a.pg, addr, a.dtype);
    }
    true
});

trans!(ld1rq_zpri, RpriLoad, |s, a| {
    if s.sve_access_check() {
        let addr = addr_ri(s, a.rn, a.imm * 16);
        do_ldrq(s, a.rd, a.pg, addr, a.dtype);
    }
    true
});

/// LD1RO：以 32 字节为单位复制；不足 32 字节的尾部清零
fn do_ldro(s: &mut DisasContext<'_>, zt: u32, pg: u32, addr: Temp, dtype: u32) {
    let vsz = s.vec_full_reg_size();
    let pg = if vsz > 32 { narrow_pred(s, pg, 2) } else { s.preg(pg) };
    let helper = contig_load(s, dtype, 0);
    do_mem_zpa(s, helper, zt, pg, addr, 32);

    let doff = vec_full_reg_offset(zt);
    let vsz_r32 = vsz & !31;
    if vsz >= 64 {
        s.push(IROp::GvecDupMem {
            esz: 5,
            dofs: doff + 32,
            aofs: doff,
            oprsz: vsz_r32 - 32,
            maxsz: vsz_r32 - 32,
        });
    }
    let rem = vsz - vsz_r32;
    if rem != 0 {
        s.push(IROp::GvecDupImm {
            esz: 3,
            dofs: doff + vsz_r32,
            oprsz: rem,
            maxsz: rem,
            imm: 0,
        });
    }
}

// VL 小于 32 字节时为未定义指令，但检查在 SVE 访问检查之后
trans_feat!(ld1ro_zprr, F64MM, RprrLoad, |s, a| {
    if a.rm == 31 {
        return false;
    }
    if !s.sve_access_check() {
        return true;
    }
    if s.vec_full_reg_size() < 32 {
        return false;
    }
    let addr = addr_rr(s, a.rn, a.rm, dtype_msz(a.dtype));
    do_ldro(s, a.rd, a.pg, addr, a.dtype);
    true
});

trans_feat!(ld1ro_zpri, F64MM, RpriLoad, |s, a| {
    if !s.sve_access_check() {
        return true;
    }
    if s.vec_full_reg_size() < 32 {
        return false;
    }
    let addr = addr_ri(s, a.rn, a.imm * 32);
    do_ldro(s, a.rd, a.pg, addr, a.dtype);
    true
});

// LD1R：无活动元素时不访问内存
trans!(ld1r_zpri, RpriLoad, |s, a| {
    if !s.sve_access_check() {
        return true;
    }
    let psz = s.pred_full_reg_size();
    let esz = dtype_esz(a.dtype);
    let msz = dtype_msz(a.dtype);
    let over = s.new_label();

    if psz <= 8 {
        let psz_mask = if psz == 8 { u64::MAX } else { (1u64 << (psz * 8)) - 1 };
        let t = s.load_env(pred_full_reg_offset(a.pg), MemOp::unsigned(3));
        s.binary_imm(BinOp::And, t, t, PRED_ESZ_MASKS[esz as usize] & psz_mask);
        let zero = s.movi(0);
        s.brcond(Cond::Eq, t, zero, over);
    } else {
        let last = s.find_last_active(a.pg, esz);
        let zero = s.movi(0);
        s.brcond(Cond::Lt, last, zero, over);
    }

    let addr = addr_ri(s, a.rn, a.imm << msz);
    let val = s.temp();
    let mop = MemOp {
        size: msz,
        signed: dtype_signed(a.dtype),
        be: s.big_endian(),
    };
    s.push(IROp::GuestLoad { dst: val, addr, mop });
    s.do_dup_z(esz, a.rd, val);

    s.set_label(over);
    s.do_movz_zpz(a.rd, a.rd, a.pg, esz, false);
    true
});

// ----------------------------------------------------------------------
// 连续存储
// ----------------------------------------------------------------------

fn do_st_zpa(s: &mut DisasContext<'_>, zt: u32, pg: u32, addr: Temp, msz: u8, esz: u8, nreg: u32) {
    let helper = Helper::StContig(ContigStore {
        mte: s.mte_active(),
        be: s.big_endian(),
        msz,
        esz,
        nreg: nreg as u8,
    });
    let vsz = s.vec_full_reg_size();
    let pg = s.preg(pg);
    do_mem_zpa(s, helper, zt, pg, addr, vsz);
}

/// ST1 可截断到更窄的内存宽度；ST2..4 要求 msz == esz
fn st_ok(msz: u8, esz: u8, nreg: u32) -> bool {
    esz <= 3 && msz <= esz && (nreg == 0 || msz == esz)
}

trans!(st_zprr, RprrStore, |s, a| {
    if a.rm == 31 || !st_ok(a.msz, a.esz, a.nreg) {
        return false;
    }
    if s.sve_access_check() {
        let addr = addr_rr(s, a.rn, a.rm, a.msz);
        do_st_zpa(s, a.rd, a.pg, addr, a.msz, a.esz, a.nreg);
    }
    true
});

trans!(st_zpri, RpriStore, |s, a| {
    if !st_ok(a.msz, a.esz, a.nreg) {
        return false;
    }
    if s.sve_access_check() {
        let elements = (s.vec_full_reg_size() >> a.esz) as i64;
        let ofs = (a.imm * elements * (a.nreg as i64 + 1)) << a.msz;
        let addr = addr_ri(s, a.rn, ofs);
        do_st_zpa(s, a.rd, a.pg, addr, a.msz, a.esz, a.nreg);
    }
    true
});

// ----------------------------------------------------------------------
// 聚集加载与分散存储
// ----------------------------------------------------------------------

fn offset_kind(xs: u8) -> OffsetKind {
    match xs {
        0 => OffsetKind::Zero32,
        1 => OffsetKind::Sign32,
        _ => OffsetKind::Full64,
    }
}

/// `(d, g, zm, base, desc[data = scale])`
fn do_mem_zpz(s: &mut DisasContext<'_>, helper: Helper, zt: u32, pg: u32, zm: u32, scale: u8, base: Temp) {
    let args = vec![
        s.zreg(zt),
        s.preg(pg),
        s.zreg(zm),
        Arg::Temp(base),
        s.vdesc(scale as i32),
    ];
    s.call(helper, args);
}

/// 聚集加载的合法组合：元素不窄于内存宽度，等宽时不能符号扩展
fn gather_ok(esz: u8, msz: u8, u: bool) -> bool {
    (2..=3).contains(&esz) && msz <= esz && (esz != msz || u)
}

trans!(ld1_zprz, RprrGather, |s, a| {
    if !gather_ok(a.esz, a.msz, a.u) || (a.esz == 2 && a.xs > 1) || (a.msz == 0 && a.scale) {
        return false;
    }
    if s.sve_access_check() {
        let helper = Helper::Gather(GatherKey {
            mte: s.mte_active(),
            be: s.big_endian(),
            first_fault: a.ff,
            offset: offset_kind(a.xs),
            unsigned: a.u,
            msz: a.msz,
            esz: a.esz,
        });
        let base = s.read_xreg_sp(a.rn);
        let scale = if a.scale { a.msz } else { 0 };
        do_mem_zpz(s, helper, a.rd, a.pg, a.rm, scale, base);
    }
    true
});

// 向量基址加立即数：把立即数当作标量基址，向量作为偏移
trans!(ld1_zpiz, RpriGather, |s, a| {
    if !gather_ok(a.esz, a.msz, a.u) {
        return false;
    }
    if s.sve_access_check() {
        let offset = if a.esz == 2 { OffsetKind::Zero32 } else { OffsetKind::Full64 };
        let helper = Helper::Gather(GatherKey {
            mte: s.mte_active(),
            be: s.big_endian(),
            first_fault: a.ff,
            offset,
            unsigned: a.u,
            msz: a.msz,
            esz: a.esz,
        });
        let base = s.movi((a.imm << a.msz) as u64);
        do_mem_zpz(s, helper, a.rd, a.pg, a.rn, 0, base);
    }
    true
});

trans!(st1_zprz, RprrScatter, |s, a| {
    if !(2..=3).contains(&a.esz) || a.esz < a.msz || (a.msz == 0 && a.scale) || (a.esz == 2 && a.xs > 1) {
        return false;
    }
    if s.sve_access_check() {
        let helper = Helper::Scatter(ScatterKey {
            mte: s.mte_active(),
            be: s.big_endian(),
            offset: offset_kind(a.xs),
            msz: a.msz,
            esz: a.esz,
        });
        let base = s.read_xreg_sp(a.rn);
        let scale = if a.scale { a.msz } else { 0 };
        do_mem_zpz(s, helper, a.rd, a.pg, a.rm, scale, base);
    }
    true
});

trans!(st1_zpiz, RpriScatter, |s, a| {
    if !(2..=3).contains(&a.esz) || a.esz < a.msz {
        return false;
    }
    if s.sve_access_check() {
        let offset = if a.esz == 2 { OffsetKind::Zero32 } else { OffsetKind::Full64 };
        let helper = Helper::Scatter(ScatterKey {
            mte: s.mte_active(),
            be: s.big_endian(),
            offset,
            msz: a.msz,
            esz: a.esz,
        });
        let base = s.movi((a.imm << a.msz) as u64);
        do_mem_zpz(s, helper, a.rd, a.pg, a.rn, 0, base);
    }
    true
});

// ----------------------------------------------------------------------
// 预取：访问检查之后为空操作
// ----------------------------------------------------------------------

trans!(prf, Empty, |s, _a| {
    s.sve_access_check();
    true
});

trans!(prf_rr, Rm, |s, a| {
    if a.rm == 31 {
        return false;
    }
    s.sve_access_check();
    true
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeContext;
    use sve_core::IsaFeatures;
    use sve_ir::IRBuilder;

    fn ctx(vl: u32, features: IsaFeatures) -> DecodeContext {
        DecodeContext {
            vl_bytes: vl,
            features,
            sve_enabled: true,
            mte_active: false,
            big_endian: false,
        }
    }

    fn guest_accesses(ops: &[IROp]) -> Vec<u8> {
        ops.iter()
            .filter_map(|op| match op {
                IROp::GuestLoad { mop, .. } | IROp::GuestStore { mop, .. } => Some(mop.size),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_ldst_chunks_cover_length() {
        let chunks: Vec<_> = ldst_chunks(22).collect();
        assert_eq!(chunks, vec![(0, 3), (8, 3), (16, 2), (20, 1)]);
    }

    #[test]
    fn test_ldr_predicate_odd_words() {
        // VL 48 字节：谓词 6 字节，拆为 4 + 2
        let mut b = IRBuilder::new();
        let c = ctx(48, IsaFeatures::SVE);
        let mut s = DisasContext::new(&c, b.scope());
        assert!(ldr_pri(&mut s, &Rri { rd: 3, rn: 31, imm: 1 }));
        drop(s);
        assert_eq!(guest_accesses(b.ops()), vec![2, 1]);
    }

    #[test]
    fn test_str_vector_words() {
        let mut b = IRBuilder::new();
        let c = ctx(32, IsaFeatures::SVE);
        let mut s = DisasContext::new(&c, b.scope());
        assert!(str_zri(&mut s, &Rri { rd: 0, rn: 1, imm: -2 }));
        drop(s);
        assert_eq!(guest_accesses(b.ops()), vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_ld2_requires_plain_dtype() {
        let mut b = IRBuilder::new();
        let c = ctx(16, IsaFeatures::SVE);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RpriLoad { rd: 0, pg: 0, rn: 1, imm: 0, dtype: 1, nreg: 1 };
        assert!(!ld_zpri(&mut s, &a));
        let a = RpriLoad { dtype: 5, ..a };
        assert!(ld_zpri(&mut s, &a));
    }

    #[test]
    fn test_ld1ro_small_vl_rejects() {
        let mut b = IRBuilder::new();
        let c = ctx(16, IsaFeatures::SVE | IsaFeatures::F64MM);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RpriLoad { rd: 0, pg: 0, rn: 1, imm: 0, dtype: 0, nreg: 0 };
        assert!(!ld1ro_zpri(&mut s, &a));
        assert_eq!(s.missing_feature(), None);
    }

    #[test]
    fn test_ld1ro_replicates_octaword() {
        // VL 80：32 字节复制一次，尾部 16 字节清零
        let mut b = IRBuilder::new();
        let c = ctx(80, IsaFeatures::SVE | IsaFeatures::F64MM);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RpriLoad { rd: 2, pg: 0, rn: 1, imm: 0, dtype: 0, nreg: 0 };
        assert!(ld1ro_zpri(&mut s, &a));
        drop(s);
        let ops = b.ops();
        assert!(ops.iter().any(|op| matches!(op, IROp::GvecDupMem { esz: 5, oprsz: 32, .. })));
        assert!(ops.iter().any(|op| matches!(op, IROp::GvecDupImm { oprsz: 16, imm: 0, .. })));
    }

    #[test]
    fn test_gather_signed_word_into_word_rejects() {
        let mut b = IRBuilder::new();
        let c = ctx(16, IsaFeatures::SVE);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RpriGather { rd: 0, pg: 0, rn: 1, imm: 0, esz: 2, msz: 2, u: false, ff: false };
        assert!(!ld1_zpiz(&mut s, &a));
        let a = RpriGather { u: true, ..a };
        assert!(ld1_zpiz(&mut s, &a));
    }

    #[test]
    fn test_ld1r_branches_over_load() {
        let mut b = IRBuilder::new();
        let c = ctx(16, IsaFeatures::SVE);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RpriLoad { rd: 0, pg: 1, rn: 2, imm: 3, dtype: 10, nreg: 0 };
        assert!(ld1r_zpri(&mut s, &a));
        drop(s);
        let ops = b.ops();
        let br = ops.iter().position(|op| matches!(op, IROp::BrCond { cond: Cond::Eq, .. }));
        let ld = ops.iter().position(|op| matches!(op, IROp::GuestLoad { .. }));
        assert!(br.is_some() && br < ld);
    }
}
