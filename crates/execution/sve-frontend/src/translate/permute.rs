//! 置换：提取、复制、插入、查表、解包、交织、条件提取与 MOVPRFX

use sve_ir::layout::{vec_full_reg_offset, vec_reg_offset};
use sve_ir::{Cond, Gvec2Op, Helper, IROp, MemOp, PermPredOp, Temp, ZpzOp, ZpzzOp, ZziOp, ZzOp, ZzzOp, ZzzzOp};

use super::*;
use crate::args::*;
use crate::pred::size_for_gvec;

// ----------------------------------------------------------------------
// EXT
// ----------------------------------------------------------------------

fn do_ext(s: &mut DisasContext<'_>, rd: u32, rn: u32, rm: u32, imm: i64) -> bool {
    if !s.sve_access_check() {
        return true;
    }

    let vsz = s.vec_full_reg_size();
    let imm = imm as u32;
    let n_ofs = if imm >= vsz { 0 } else { imm };
    let n_siz = vsz - n_ofs;
    let d = vec_full_reg_offset(rd);
    let n = vec_full_reg_offset(rn);
    let m = vec_full_reg_offset(rm);

    // 大小合适且没有不利重叠时，用两次整块复制代替助手
    if m != d
        && n_ofs == size_for_gvec(n_ofs)
        && n_siz == size_for_gvec(n_siz)
        && (d != n || n_siz <= n_ofs)
    {
        s.push(IROp::Gvec2 {
            op: Gvec2Op::Mov,
            esz: 0,
            dofs: d,
            aofs: n + n_ofs,
            oprsz: n_siz,
            maxsz: n_siz,
        });
        if n_ofs != 0 {
            s.push(IROp::Gvec2 {
                op: Gvec2Op::Mov,
                esz: 0,
                dofs: d + n_siz,
                aofs: m,
                oprsz: n_ofs,
                maxsz: n_ofs,
            });
        }
    } else {
        s.gen_gvec_ool_zzz(Helper::Zzz { op: ZzzOp::Ext, esz: 0 }, rd, rn, rm, n_ofs as i32);
    }
    true
}

trans!(ext, Rrri, |s, a| do_ext(s, a.rd, a.rn, a.rm, a.imm));
// 构造形式：源为连续的寄存器对
trans_feat!(ext_sve2, SVE2, Rri, |s, a| do_ext(s, a.rd, a.rn, (a.rn + 1) % 32, a.imm));

// ----------------------------------------------------------------------
// 无谓词置换
// ----------------------------------------------------------------------

trans!(dup_s, RrEsz, |s, a| {
    if s.sve_access_check() {
        let val = s.read_xreg_sp(a.rn);
        s.do_dup_z(a.esz, a.rd, val);
    }
    true
});

// imm 为 imm2:tsz，最低置位给出元素大小（4 为 128 位块）
trans!(dup_x, Rri, |s, a| {
    let imm = a.imm as u32;
    if imm & 0x1f == 0 {
        return false;
    }
    if s.sve_access_check() {
        let vsz = s.vec_full_reg_size();
        let dofs = vec_full_reg_offset(a.rd);
        let esz = imm.trailing_zeros();
        let index = imm >> (esz + 1);

        if (index << esz) < vsz {
            s.push(IROp::GvecDupMem {
                esz: esz as u8,
                dofs,
                aofs: vec_full_reg_offset(a.rn) + (index << esz),
                oprsz: vsz,
                maxsz: vsz,
            });
        } else {
            // 下标越界：结果为零，与元素大小无关
            s.do_dupi_z(3, a.rd, 0);
        }
    }
    true
});

fn do_insr_i64(s: &mut DisasContext<'_>, a: &RrrEsz, val: Temp) {
    s.gen_gvec_ool_zzi(Helper::Zzi { op: ZziOp::Insr, esz: a.esz }, a.rd, a.rn, val, 0);
}

trans!(insr_f, RrrEsz, |s, a| {
    if s.sve_access_check() {
        let t = s.load_env(vec_reg_offset(a.rm, 0, 3), MemOp::unsigned(3));
        do_insr_i64(s, a, t);
    }
    true
});

trans!(insr_r, RrrEsz, |s, a| {
    if s.sve_access_check() {
        let t = s.read_xreg(a.rm);
        do_insr_i64(s, a, t);
    }
    true
});

trans!(rev_v, RrEsz, |s, a| {
    gen_gvec_ool_zz(s, Some(Helper::Zz { op: ZzOp::Rev, esz: a.esz }), a.rd, a.rn, 0)
});

trans!(tbl, RrrEsz, |s, a| {
    gen_gvec_ool_arg_zzz(s, Some(Helper::Zzz { op: ZzzOp::Tbl, esz: a.esz }), a, 0)
});

// 两寄存器表：Zn 与 Zn+1
trans_feat!(tbl_sve2, SVE2, RrrEsz, |s, a| {
    let h = Helper::Zzzz { op: ZzzzOp::Tbl2, esz: a.esz };
    gen_gvec_ool_zzzz(s, Some(h), a.rd, a.rn, (a.rn + 1) % 32, a.rm, 0)
});

trans_feat!(tbx, SVE2, RrrEsz, |s, a| {
    gen_gvec_ool_arg_zzz(s, Some(Helper::Zzz { op: ZzzOp::Tbx, esz: a.esz }), a, 0)
});

fn unpk(s: &mut DisasContext<'_>, a: &RrEsz, op: ZzOp) -> bool {
    let h = esz_in(a.esz, 1, 3, Helper::Zz { op, esz: a.esz });
    gen_gvec_ool_zz(s, h, a.rd, a.rn, 0)
}

trans!(sunpklo, RrEsz, |s, a| unpk(s, a, ZzOp::SunpkLo));
trans!(sunpkhi, RrEsz, |s, a| unpk(s, a, ZzOp::SunpkHi));
trans!(uunpklo, RrEsz, |s, a| unpk(s, a, ZzOp::UunpkLo));
trans!(uunpkhi, RrEsz, |s, a| unpk(s, a, ZzOp::UunpkHi));

// ----------------------------------------------------------------------
// 谓词置换：描述符 data 位为高半/奇数选择
// ----------------------------------------------------------------------

fn do_perm_pred3(s: &mut DisasContext<'_>, a: &RrrEsz, high_odd: bool, op: PermPredOp) -> bool {
    if s.sve_access_check() {
        let args = vec![s.preg(a.rd), s.preg(a.rn), s.preg(a.rm), s.pdesc(a.esz, high_odd as u32)];
        s.call(Helper::PermPred(op), args);
    }
    true
}

fn do_perm_pred2(s: &mut DisasContext<'_>, a: &RrEsz, high_odd: bool, op: PermPredOp) -> bool {
    if s.sve_access_check() {
        let args = vec![s.preg(a.rd), s.preg(a.rn), s.pdesc(a.esz, high_odd as u32)];
        s.call(Helper::PermPred(op), args);
    }
    true
}

trans!(zip1_p, RrrEsz, |s, a| do_perm_pred3(s, a, false, PermPredOp::Zip));
trans!(zip2_p, RrrEsz, |s, a| do_perm_pred3(s, a, true, PermPredOp::Zip));
trans!(uzp1_p, RrrEsz, |s, a| do_perm_pred3(s, a, false, PermPredOp::Uzp));
trans!(uzp2_p, RrrEsz, |s, a| do_perm_pred3(s, a, true, PermPredOp::Uzp));
trans!(trn1_p, RrrEsz, |s, a| do_perm_pred3(s, a, false, PermPredOp::Trn));
trans!(trn2_p, RrrEsz, |s, a| do_perm_pred3(s, a, true, PermPredOp::Trn));

trans!(rev_p, RrEsz, |s, a| do_perm_pred2(s, a, false, PermPredOp::Rev));
trans!(punpklo, RrEsz, |s, a| do_perm_pred2(s, a, false, PermPredOp::Punpk));
trans!(punpkhi, RrEsz, |s, a| do_perm_pred2(s, a, true, PermPredOp::Punpk));

// ----------------------------------------------------------------------
// 向量交织
// ----------------------------------------------------------------------

fn interleave(s: &mut DisasContext<'_>, a: &RrrEsz, op: ZzzOp, data: i32) -> bool {
    gen_gvec_ool_arg_zzz(s, Some(Helper::Zzz { op, esz: a.esz }), a, data)
}

trans!(zip1_z, RrrEsz, |s, a| interleave(s, a, ZzzOp::Zip, 0));
trans!(zip2_z, RrrEsz, |s, a| {
    let half = (s.vec_full_reg_size() / 2) as i32;
    interleave(s, a, ZzzOp::Zip, half)
});
trans!(uzp1_z, RrrEsz, |s, a| interleave(s, a, ZzzOp::Uzp, 0));
trans!(uzp2_z, RrrEsz, |s, a| interleave(s, a, ZzzOp::Uzp, 1 << a.esz));
trans!(trn1_z, RrrEsz, |s, a| interleave(s, a, ZzzOp::Trn, 0));
trans!(trn2_z, RrrEsz, |s, a| interleave(s, a, ZzzOp::Trn, 1 << a.esz));

// ----------------------------------------------------------------------
// 带谓词置换
// ----------------------------------------------------------------------

trans!(compact, RprEsz, |s, a| {
    let h = esz_in(a.esz, 2, 3, Helper::Zpz { op: ZpzOp::Compact, esz: a.esz });
    gen_gvec_ool_arg_zpz(s, h, a, 0)
});

/// CLASTA/CLASTB 向量形式
///
/// 没有活动元素时目的不变；目的与源不同（经 MOVPRFX）时改为复制源。
fn do_clast_vector(s: &mut DisasContext<'_>, a: &RprrEsz, before: bool) -> bool {
    if !s.sve_access_check() {
        return true;
    }

    let esz = a.esz;
    let over = s.new_label();
    let last = s.find_last_active(a.pg, esz);

    // 整向量没有条件选择，只能跳过写入
    let zero = s.movi(0);
    s.brcond(Cond::Lt, last, zero, over);

    if !before {
        s.incr_last_active(last, esz);
    }

    let ele = s.load_last_active(a.rm, last, esz);
    s.do_dup_z(esz, a.rd, ele);

    if a.rd != a.rn {
        let done = s.new_label();
        s.br(done);
        s.set_label(over);
        s.do_mov_z(a.rd, a.rn);
        s.set_label(done);
    } else {
        s.set_label(over);
    }
    true
}

trans!(clasta_z, RprrEsz, |s, a| do_clast_vector(s, a, false));
trans!(clastb_z, RprrEsz, |s, a| do_clast_vector(s, a, true));

/// CLAST 标量形式：没有活动元素时 `reg_val` 保持原值
fn do_clast_scalar(s: &mut DisasContext<'_>, esz: u8, pg: u32, rm: u32, before: bool, reg_val: Temp) {
    let last = s.find_last_active(pg, esz);

    // 保留递增前的值判断是否找到
    let cmp = s.temp();
    s.mov(cmp, last);

    let zero = s.movi(0);
    if before {
        // 未找到时下标为负，夹紧到 0 再加载，结果随后被丢弃
        s.movcond(Cond::Lt, last, last, zero, zero, last);
    } else {
        s.incr_last_active(last, esz);
    }

    let ele = s.load_last_active(rm, last, esz);
    s.movcond(Cond::Ge, reg_val, cmp, zero, ele, reg_val);
}

fn do_clast_fp(s: &mut DisasContext<'_>, a: &RprEsz, before: bool) -> bool {
    if s.sve_access_check() {
        let ofs = vec_reg_offset(a.rd, 0, a.esz);
        let reg = s.load_env(ofs, MemOp::unsigned(a.esz));
        do_clast_scalar(s, a.esz, a.pg, a.rn, before, reg);
        s.write_fp_dreg(a.rd, reg);
    }
    true
}

trans!(clasta_v, RprEsz, |s, a| do_clast_fp(s, a, false));
trans!(clastb_v, RprEsz, |s, a| do_clast_fp(s, a, true));

fn do_clast_general(s: &mut DisasContext<'_>, a: &RprEsz, before: bool) -> bool {
    if !s.sve_access_check() {
        return true;
    }
    let reg = s.read_xreg(a.rd);
    s.ext_esz(reg, reg, a.esz, false);
    do_clast_scalar(s, a.esz, a.pg, a.rn, before, reg);
    s.write_xreg(a.rd, reg);
    true
}

trans!(clasta_r, RprEsz, |s, a| do_clast_general(s, a, false));
trans!(clastb_r, RprEsz, |s, a| do_clast_general(s, a, true));

/// LASTA/LASTB：没有活动元素时 LASTB 取最后一个元素，LASTA 取第 0 个
fn do_last_scalar(s: &mut DisasContext<'_>, esz: u8, pg: u32, rm: u32, before: bool) -> Temp {
    let last = s.find_last_active(pg, esz);
    if before {
        s.wrap_last_active(last, esz);
    } else {
        s.incr_last_active(last, esz);
    }
    s.load_last_active(rm, last, esz)
}

trans!(lasta_v, RprEsz, |s, a| {
    if s.sve_access_check() {
        let val = do_last_scalar(s, a.esz, a.pg, a.rn, false);
        s.write_fp_dreg(a.rd, val);
    }
    true
});

trans!(lastb_v, RprEsz, |s, a| {
    if s.sve_access_check() {
        let val = do_last_scalar(s, a.esz, a.pg, a.rn, true);
        s.write_fp_dreg(a.rd, val);
    }
    true
});

trans!(lasta_r, RprEsz, |s, a| {
    if s.sve_access_check() {
        let val = do_last_scalar(s, a.esz, a.pg, a.rn, false);
        s.write_xreg(a.rd, val);
    }
    true
});

trans!(lastb_r, RprEsz, |s, a| {
    if s.sve_access_check() {
        let val = do_last_scalar(s, a.esz, a.pg, a.rn, true);
        s.write_xreg(a.rd, val);
    }
    true
});

trans!(cpy_m_r, RprEsz, |s, a| {
    if s.sve_access_check() {
        let val = s.read_xreg_sp(a.rn);
        s.do_cpy_m(a.esz, a.rd, a.rd, a.pg, val);
    }
    true
});

trans!(cpy_m_v, RprEsz, |s, a| {
    if s.sve_access_check() {
        let val = s.load_env(vec_reg_offset(a.rn, 0, a.esz), MemOp::unsigned(a.esz));
        s.do_cpy_m(a.esz, a.rd, a.rd, a.pg, val);
    }
    true
});

trans!(revb, RprEsz, |s, a| {
    let h = esz_in(a.esz, 1, 3, Helper::Zpz { op: ZpzOp::Revb, esz: a.esz });
    gen_gvec_ool_arg_zpz(s, h, a, 0)
});
trans!(revh, RprEsz, |s, a| {
    let h = esz_in(a.esz, 2, 3, Helper::Zpz { op: ZpzOp::Revh, esz: a.esz });
    gen_gvec_ool_arg_zpz(s, h, a, 0)
});
trans!(revw, RprEsz, |s, a| {
    let h = esz_in(a.esz, 3, 3, Helper::Zpz { op: ZpzOp::Revw, esz: a.esz });
    gen_gvec_ool_arg_zpz(s, h, a, 0)
});

trans!(splice, RprrEsz, |s, a| {
    let h = Helper::Zpzz { op: ZpzzOp::Splice, esz: a.esz };
    gen_gvec_ool_arg_zpzz(s, Some(h), a, a.esz as i32)
});

trans_feat!(splice_sve2, SVE2, RprEsz, |s, a| {
    let h = Helper::Zpzz { op: ZpzzOp::Splice, esz: a.esz };
    gen_gvec_ool_zzzp(s, Some(h), a.rd, a.rn, (a.rn + 1) % 32, a.pg, a.esz as i32)
});

// ----------------------------------------------------------------------
// MOVPRFX：按等价的复制实现
// ----------------------------------------------------------------------

trans!(movprfx, RrEsz, |s, a| {
    if s.sve_access_check() {
        s.do_mov_z(a.rd, a.rn);
    }
    true
});

trans!(movprfx_m, RprEsz, |s, a| {
    if s.sve_access_check() {
        s.do_sel_z(a.rd, a.rn, a.rd, a.pg, a.esz);
    }
    true
});

trans!(movprfx_z, RprEsz, |s, a| {
    if s.sve_access_check() {
        s.do_movz_zpz(a.rd, a.rn, a.pg, a.esz, false);
    }
    true
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeContext;
    use sve_core::IsaFeatures;
    use sve_ir::IRBuilder;

    fn ctx(vl: u32) -> DecodeContext {
        DecodeContext {
            vl_bytes: vl,
            features: IsaFeatures::SVE,
            sve_enabled: true,
            mte_active: false,
            big_endian: false,
        }
    }

    #[test]
    fn test_ext_aligned_uses_moves() {
        let mut b = IRBuilder::new();
        let c = ctx(32);
        let mut s = DisasContext::new(&c, b.scope());
        let a = Rrri { rd: 0, rn: 1, rm: 2, imm: 16 };
        assert!(ext(&mut s, &a));
        drop(s);
        assert_eq!(b.ops().len(), 2);
        assert!(b.ops().iter().all(|op| matches!(op, IROp::Gvec2 { .. })));
    }

    #[test]
    fn test_ext_unaligned_uses_helper() {
        let mut b = IRBuilder::new();
        let c = ctx(32);
        let mut s = DisasContext::new(&c, b.scope());
        let a = Rrri { rd: 0, rn: 1, rm: 2, imm: 3 };
        assert!(ext(&mut s, &a));
        drop(s);
        assert!(matches!(b.ops()[0], IROp::Call { helper: Helper::Zzz { op: ZzzOp::Ext, .. }, .. }));
    }

    #[test]
    fn test_dup_index_out_of_range_zeroes() {
        let mut b = IRBuilder::new();
        let c = ctx(16);
        let mut s = DisasContext::new(&c, b.scope());
        // 字元素（tsz = x100），下标 7 超出 16 字节向量
        let a = Rri { rd: 0, rn: 1, imm: (7 << 3) | 0b100 };
        assert!(dup_x(&mut s, &a));
        drop(s);
        assert!(matches!(b.ops()[0], IROp::GvecDupImm { imm: 0, .. }));
    }

    #[test]
    fn test_dup_index_reserved() {
        let mut b = IRBuilder::new();
        let c = ctx(16);
        let mut s = DisasContext::new(&c, b.scope());
        assert!(!dup_x(&mut s, &Rri { rd: 0, rn: 1, imm: 0x20 }));
    }

    #[test]
    fn test_clast_vector_branches_over() {
        let mut b = IRBuilder::new();
        let c = ctx(32);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RprrEsz { rd: 3, pg: 1, rn: 4, rm: 5, esz: 2 };
        assert!(clasta_z(&mut s, &a));
        drop(s);
        let ops = b.ops();
        assert!(ops.iter().any(|op| matches!(op, IROp::BrCond { cond: Cond::Lt, .. })));
        // rd != rn：未找到时复制 rn
        assert!(ops.iter().any(|op| matches!(op, IROp::Br(_))));
        assert_eq!(ops.iter().filter(|op| matches!(op, IROp::Label(_))).count(), 2);
    }

    #[test]
    fn test_unpk_rejects_bytes() {
        let mut b = IRBuilder::new();
        let c = ctx(16);
        let mut s = DisasContext::new(&c, b.scope());
        assert!(!sunpklo(&mut s, &RrEsz { rd: 0, rn: 1, esz: 0 }));
        assert!(uunpkhi(&mut s, &RrEsz { rd: 0, rn: 1, esz: 1 }));
    }

    #[test]
    fn test_compact_sizes() {
        let mut b = IRBuilder::new();
        let c = ctx(16);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RprEsz { rd: 0, pg: 0, rn: 1, esz: 1 };
        assert!(!compact(&mut s, &a));
        assert!(compact(&mut s, &RprEsz { esz: 2, ..a }));
    }
}
