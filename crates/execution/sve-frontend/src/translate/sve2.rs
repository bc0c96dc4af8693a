//! SVE2 及矩阵/BF16 扩展
//!
//! 加宽与收窄类助手的 esz 一律取宽元素大小：
//! 加宽时是目的大小，收窄时是源大小。

use sve_ir::{
    FpStatus, FpZzzzOp, Gvec3Op, Gvec4Op, Helper, ZpzOp, ZpziOp, ZzOp, ZzzOp, ZzzzOp,
};

use super::predicate::do_ppzz_flags;
use super::*;
use crate::args::*;

// ----------------------------------------------------------------------
// 三元按位运算
// ----------------------------------------------------------------------

trans_feat!(eor3, SVE2, RrrrEsz, |s, a| gen_gvec_fn_arg_zzzz(s, Gvec4Op::Eor3, a));
trans_feat!(bcax, SVE2, RrrrEsz, |s, a| gen_gvec_fn_arg_zzzz(s, Gvec4Op::Bcax, a));
trans_feat!(bsl, SVE2, RrrrEsz, |s, a| gen_gvec_fn_arg_zzzz(s, Gvec4Op::Bsl, a));
trans_feat!(bsl1n, SVE2, RrrrEsz, |s, a| gen_gvec_fn_arg_zzzz(s, Gvec4Op::Bsl1n, a));
trans_feat!(bsl2n, SVE2, RrrrEsz, |s, a| gen_gvec_fn_arg_zzzz(s, Gvec4Op::Bsl2n, a));
trans_feat!(nbsl, SVE2, RrrrEsz, |s, a| gen_gvec_fn_arg_zzzz(s, Gvec4Op::Nbsl, a));

trans_feat!(xar, SVE2, RrriTsz, |s, a| {
    if a.esz < 0 {
        return false;
    }
    let esz = a.esz as u8;
    gen_gvec_ool_zzz(s, Some(Helper::Zzz { op: ZzzOp::Xar, esz }), a.rd, a.rn, a.rm, a.imm as i32)
});

// ----------------------------------------------------------------------
// 无谓词乘法
// ----------------------------------------------------------------------

trans_feat!(mul_zzz, SVE2, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::Mul, a));

fn zzz(s: &mut DisasContext<'_>, a: &RrrEsz, op: ZzzOp, data: i32) -> bool {
    gen_gvec_ool_arg_zzz(s, Some(Helper::Zzz { op, esz: a.esz }), a, data)
}

trans_feat!(smulh_zzz, SVE2, RrrEsz, |s, a| zzz(s, a, ZzzOp::Smulh, 0));
trans_feat!(umulh_zzz, SVE2, RrrEsz, |s, a| zzz(s, a, ZzzOp::Umulh, 0));
trans_feat!(sqdmulh_zzz, SVE2, RrrEsz, |s, a| zzz(s, a, ZzzOp::Sqdmulh, 0));
trans_feat!(sqrdmulh_zzz, SVE2, RrrEsz, |s, a| zzz(s, a, ZzzOp::Sqrdmulh, 0));

// 只有字节形式
trans_feat!(pmul_zzz, SVE2, RrrEsz, |s, a| {
    let h = esz_in(a.esz, 0, 0, Helper::Zzz { op: ZzzOp::Pmul, esz: 0 });
    gen_gvec_ool_arg_zzz(s, h, a, 0)
});

// ----------------------------------------------------------------------
// 加宽运算
//
// long 形式 data 的 bit0/bit1 分别选择 n/m 的奇数（顶部）半元素；
// wide 形式 data 为 1 时取 m 的奇数半。
// ----------------------------------------------------------------------

fn widen(s: &mut DisasContext<'_>, a: &RrrEsz, op: ZzzOp, data: i32) -> bool {
    let h = esz_in(a.esz, 1, 3, Helper::Zzz { op, esz: a.esz });
    gen_gvec_ool_arg_zzz(s, h, a, data)
}

trans_feat!(saddlb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Saddl, 0));
trans_feat!(saddlt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Saddl, 3));
trans_feat!(saddlbt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Saddl, 2));
trans_feat!(uaddlb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Uaddl, 0));
trans_feat!(uaddlt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Uaddl, 3));
trans_feat!(ssublb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Ssubl, 0));
trans_feat!(ssublt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Ssubl, 3));
trans_feat!(ssublbt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Ssubl, 2));
trans_feat!(ssubltb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Ssubl, 1));
trans_feat!(usublb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Usubl, 0));
trans_feat!(usublt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Usubl, 3));
trans_feat!(sabdlb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Sabdl, 0));
trans_feat!(sabdlt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Sabdl, 3));
trans_feat!(uabdlb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Uabdl, 0));
trans_feat!(uabdlt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Uabdl, 3));
trans_feat!(smullb_zzz, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Smull, 0));
trans_feat!(smullt_zzz, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Smull, 3));
trans_feat!(umullb_zzz, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Umull, 0));
trans_feat!(umullt_zzz, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Umull, 3));

trans_feat!(saddwb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Saddw, 0));
trans_feat!(saddwt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Saddw, 1));
trans_feat!(uaddwb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Uaddw, 0));
trans_feat!(uaddwt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Uaddw, 1));
trans_feat!(ssubwb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Ssubw, 0));
trans_feat!(ssubwt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Ssubw, 1));
trans_feat!(usubwb, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Usubw, 0));
trans_feat!(usubwt, SVE2, RrrEsz, |s, a| widen(s, a, ZzzOp::Usubw, 1));

/// 移位加宽：tsz 给出窄元素大小，0..=2
fn do_shll_tb(s: &mut DisasContext<'_>, a: &RriTsz, op: ZzOp, top: bool) -> bool {
    if !(0..=2).contains(&a.esz) {
        return false;
    }
    let esz = a.esz as u8 + 1;
    let data = a.imm as i32 | ((top as i32) << 8);
    gen_gvec_ool_zz(s, Some(Helper::Zz { op, esz }), a.rd, a.rn, data)
}

trans_feat!(sshllb, SVE2, RriTsz, |s, a| do_shll_tb(s, a, ZzOp::Sshll, false));
trans_feat!(sshllt, SVE2, RriTsz, |s, a| do_shll_tb(s, a, ZzOp::Sshll, true));
trans_feat!(ushllb, SVE2, RriTsz, |s, a| do_shll_tb(s, a, ZzOp::Ushll, false));
trans_feat!(ushllt, SVE2, RriTsz, |s, a| do_shll_tb(s, a, ZzOp::Ushll, true));

// ----------------------------------------------------------------------
// 收窄运算：底部形式写低半并清零高半，顶部形式写高半并保留低半
// ----------------------------------------------------------------------

/// 饱和收窄提取：tsz 给出窄元素大小，且移位字段必须为 0
fn do_narrow_extract(s: &mut DisasContext<'_>, a: &RriTsz, op: ZzOp, top: bool) -> bool {
    if !(0..=2).contains(&a.esz) || a.imm != 0 {
        return false;
    }
    let esz = a.esz as u8 + 1;
    gen_gvec_ool_zz(s, Some(Helper::Zz { op, esz }), a.rd, a.rn, (top as i32) << 8)
}

trans_feat!(sqxtnb, SVE2, RriTsz, |s, a| do_narrow_extract(s, a, ZzOp::Sqxtn, false));
trans_feat!(sqxtnt, SVE2, RriTsz, |s, a| do_narrow_extract(s, a, ZzOp::Sqxtn, true));
trans_feat!(uqxtnb, SVE2, RriTsz, |s, a| do_narrow_extract(s, a, ZzOp::Uqxtn, false));
trans_feat!(uqxtnt, SVE2, RriTsz, |s, a| do_narrow_extract(s, a, ZzOp::Uqxtn, true));
trans_feat!(sqxtunb, SVE2, RriTsz, |s, a| do_narrow_extract(s, a, ZzOp::Sqxtun, false));
trans_feat!(sqxtunt, SVE2, RriTsz, |s, a| do_narrow_extract(s, a, ZzOp::Sqxtun, true));

/// 移位收窄：移位量 1..=窄元素位宽
fn do_shr_narrow(s: &mut DisasContext<'_>, a: &RriTsz, op: ZzOp, top: bool) -> bool {
    if !(0..=2).contains(&a.esz) {
        return false;
    }
    let narrow = a.esz as u8;
    if a.imm == 0 || a.imm > 8 << narrow {
        return false;
    }
    let data = a.imm as i32 | ((top as i32) << 8);
    gen_gvec_ool_zz(s, Some(Helper::Zz { op, esz: narrow + 1 }), a.rd, a.rn, data)
}

trans_feat!(shrnb, SVE2, RriTsz, |s, a| do_shr_narrow(s, a, ZzOp::Shrn, false));
trans_feat!(shrnt, SVE2, RriTsz, |s, a| do_shr_narrow(s, a, ZzOp::Shrn, true));
trans_feat!(rshrnb, SVE2, RriTsz, |s, a| do_shr_narrow(s, a, ZzOp::Rshrn, false));
trans_feat!(rshrnt, SVE2, RriTsz, |s, a| do_shr_narrow(s, a, ZzOp::Rshrn, true));
trans_feat!(sqshrnb, SVE2, RriTsz, |s, a| do_shr_narrow(s, a, ZzOp::Sqshrn, false));
trans_feat!(sqshrnt, SVE2, RriTsz, |s, a| do_shr_narrow(s, a, ZzOp::Sqshrn, true));
trans_feat!(uqshrnb, SVE2, RriTsz, |s, a| do_shr_narrow(s, a, ZzOp::Uqshrn, false));
trans_feat!(uqshrnt, SVE2, RriTsz, |s, a| do_shr_narrow(s, a, ZzOp::Uqshrn, true));
trans_feat!(sqshrunb, SVE2, RriTsz, |s, a| do_shr_narrow(s, a, ZzOp::Sqshrun, false));
trans_feat!(sqshrunt, SVE2, RriTsz, |s, a| do_shr_narrow(s, a, ZzOp::Sqshrun, true));

// 高半加减收窄：esz 为宽元素大小
fn do_hn(s: &mut DisasContext<'_>, a: &RrrEsz, op: ZzzOp, top: bool) -> bool {
    let h = esz_in(a.esz, 1, 3, Helper::Zzz { op, esz: a.esz });
    gen_gvec_ool_arg_zzz(s, h, a, top as i32)
}

trans_feat!(addhnb, SVE2, RrrEsz, |s, a| do_hn(s, a, ZzzOp::Addhn, false));
trans_feat!(addhnt, SVE2, RrrEsz, |s, a| do_hn(s, a, ZzzOp::Addhn, true));
trans_feat!(subhnb, SVE2, RrrEsz, |s, a| do_hn(s, a, ZzzOp::Subhn, false));
trans_feat!(subhnt, SVE2, RrrEsz, |s, a| do_hn(s, a, ZzzOp::Subhn, true));

// ----------------------------------------------------------------------
// 移位累加与插入
// ----------------------------------------------------------------------

fn do_zzi_shift(s: &mut DisasContext<'_>, a: &RriTsz, op: ZzOp) -> bool {
    if a.esz < 0 {
        return false;
    }
    let esz = a.esz as u8;
    gen_gvec_ool_zz(s, Some(Helper::Zz { op, esz }), a.rd, a.rn, a.imm as i32)
}

trans_feat!(ssra, SVE2, RriTsz, |s, a| do_zzi_shift(s, a, ZzOp::Ssra));
trans_feat!(usra, SVE2, RriTsz, |s, a| do_zzi_shift(s, a, ZzOp::Usra));
trans_feat!(srsra, SVE2, RriTsz, |s, a| do_zzi_shift(s, a, ZzOp::Srsra));
trans_feat!(ursra, SVE2, RriTsz, |s, a| do_zzi_shift(s, a, ZzOp::Ursra));
trans_feat!(sri, SVE2, RriTsz, |s, a| do_zzi_shift(s, a, ZzOp::Sri));
trans_feat!(sli, SVE2, RriTsz, |s, a| do_zzi_shift(s, a, ZzOp::Sli));

// 绝对差累加：累加器即目的寄存器
fn do_aba(s: &mut DisasContext<'_>, a: &RrrEsz, op: ZzzzOp) -> bool {
    let h = Some(Helper::Zzzz { op, esz: a.esz });
    gen_gvec_ool_zzzz(s, h, a.rd, a.rn, a.rm, a.rd, 0)
}

trans_feat!(saba, SVE2, RrrEsz, |s, a| do_aba(s, a, ZzzzOp::Saba));
trans_feat!(uaba, SVE2, RrrEsz, |s, a| do_aba(s, a, ZzzzOp::Uaba));

// ----------------------------------------------------------------------
// 带谓词的饱和/舍入移位与饱和一元运算
// ----------------------------------------------------------------------

fn do_zpzi(s: &mut DisasContext<'_>, a: &RpriTsz, op: ZpziOp) -> bool {
    if a.esz < 0 {
        return false;
    }
    let esz = a.esz as u8;
    gen_gvec_ool_zzp(s, Some(Helper::Zpzi { op, esz }), a.rd, a.rn, a.pg, a.imm as i32)
}

trans_feat!(sqshl_zpzi, SVE2, RpriTsz, |s, a| do_zpzi(s, a, ZpziOp::Sqshl));
trans_feat!(uqshl_zpzi, SVE2, RpriTsz, |s, a| do_zpzi(s, a, ZpziOp::Uqshl));
trans_feat!(srshr, SVE2, RpriTsz, |s, a| do_zpzi(s, a, ZpziOp::Srshr));
trans_feat!(urshr, SVE2, RpriTsz, |s, a| do_zpzi(s, a, ZpziOp::Urshr));
trans_feat!(sqshlu, SVE2, RpriTsz, |s, a| do_zpzi(s, a, ZpziOp::Sqshlu));

trans_feat!(sqabs, SVE2, RprEsz, |s, a| {
    gen_gvec_ool_arg_zpz(s, Some(Helper::Zpz { op: ZpzOp::Sqabs, esz: a.esz }), a, 0)
});

trans_feat!(sqneg, SVE2, RprEsz, |s, a| {
    gen_gvec_ool_arg_zpz(s, Some(Helper::Zpz { op: ZpzOp::Sqneg, esz: a.esz }), a, 0)
});

// ----------------------------------------------------------------------
// 字符匹配：只有字节与半字
// ----------------------------------------------------------------------

fn do_match(s: &mut DisasContext<'_>, a: &RprrEsz, negate: bool) -> bool {
    let h = esz_in(a.esz, 0, 1, Helper::Match { negate, esz: a.esz });
    do_ppzz_flags(s, a, h)
}

trans_feat!(match_ppzz, SVE2, RprrEsz, |s, a| do_match(s, a, false));
trans_feat!(nmatch_ppzz, SVE2, RprrEsz, |s, a| do_match(s, a, true));

// ----------------------------------------------------------------------
// 矩阵乘与混合符号点积（I8MM）
// ----------------------------------------------------------------------

fn do_i8mm(s: &mut DisasContext<'_>, a: &RrrrEsz, op: ZzzzOp) -> bool {
    gen_gvec_ool_arg_zzzz(s, Some(Helper::Zzzz { op, esz: 2 }), a, 0)
}

trans_feat!(smmla, I8MM, RrrrEsz, |s, a| do_i8mm(s, a, ZzzzOp::Smmla));
trans_feat!(ummla, I8MM, RrrrEsz, |s, a| do_i8mm(s, a, ZzzzOp::Ummla));
trans_feat!(usmmla, I8MM, RrrrEsz, |s, a| do_i8mm(s, a, ZzzzOp::Usmmla));
trans_feat!(usdot_zzzz, I8MM, RrrrEsz, |s, a| do_i8mm(s, a, ZzzzOp::Usdot));

// ----------------------------------------------------------------------
// BF16 与 FP64 矩阵乘
// ----------------------------------------------------------------------

trans_feat!(bfdot_zzzz, BF16, RrrrEsz, |s, a| {
    let h = Some(Helper::FpZzzz { op: FpZzzzOp::Bfdot, esz: 2 });
    gen_gvec_fpst_zzzz(s, h, a, FpStatus::A64)
});

trans_feat!(bfmmla, BF16, RrrrEsz, |s, a| {
    let h = Some(Helper::FpZzzz { op: FpZzzzOp::Bfmmla, esz: 2 });
    gen_gvec_fpst_zzzz(s, h, a, FpStatus::A64)
});

// 2x2 双精度块；VL 不足 32 字节时没有完整的块，结果为空操作
trans_feat!(fmmla_d, F64MM, RrrrEsz, |s, a| {
    let h = Some(Helper::FpZzzz { op: FpZzzzOp::Fmmla, esz: 3 });
    gen_gvec_fpst_zzzz(s, h, a, FpStatus::A64)
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeContext;
    use sve_core::IsaFeatures;
    use sve_ir::{Arg, IRBuilder, IROp};

    fn ctx(features: IsaFeatures) -> DecodeContext {
        DecodeContext {
            vl_bytes: 32,
            features,
            sve_enabled: true,
            mte_active: false,
            big_endian: false,
        }
    }

    fn desc_data(op: &IROp) -> i32 {
        let IROp::Call { args, .. } = op else {
            panic!("expected call, got {op:?}");
        };
        match args.last() {
            Some(Arg::Desc(d)) => sve_ir::desc::simd_data(*d),
            other => panic!("expected descriptor, got {other:?}"),
        }
    }

    #[test]
    fn test_sve2_required() {
        let mut b = IRBuilder::new();
        let c = ctx(IsaFeatures::SVE);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RrrEsz { rd: 0, rn: 1, rm: 2, esz: 2 };
        assert!(!saddlb(&mut s, &a));
        assert_eq!(s.missing_feature(), Some(IsaFeatures::SVE2));
    }

    #[test]
    fn test_long_selectors() {
        let mut b = IRBuilder::new();
        let c = ctx(IsaFeatures::SVE | IsaFeatures::SVE2);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RrrEsz { rd: 0, rn: 1, rm: 2, esz: 2 };
        assert!(ssubltb(&mut s, &a));
        assert!(saddlbt(&mut s, &a));
        drop(s);
        assert_eq!(desc_data(&b.ops()[0]), 1);
        assert_eq!(desc_data(&b.ops()[1]), 2);
    }

    #[test]
    fn test_widen_rejects_bytes() {
        let mut b = IRBuilder::new();
        let c = ctx(IsaFeatures::SVE | IsaFeatures::SVE2);
        let mut s = DisasContext::new(&c, b.scope());
        assert!(!smullb_zzz(&mut s, &RrrEsz { rd: 0, rn: 1, rm: 2, esz: 0 }));
        assert_eq!(s.missing_feature(), None);
    }

    #[test]
    fn test_shr_narrow_range() {
        let mut b = IRBuilder::new();
        let c = ctx(IsaFeatures::SVE | IsaFeatures::SVE2);
        let mut s = DisasContext::new(&c, b.scope());
        // 窄元素为字节：移位量 1..=8
        assert!(shrnb(&mut s, &RriTsz { rd: 0, rn: 1, imm: 8, esz: 0 }));
        assert!(!shrnb(&mut s, &RriTsz { rd: 0, rn: 1, imm: 9, esz: 0 }));
        assert!(!shrnb(&mut s, &RriTsz { rd: 0, rn: 1, imm: 4, esz: 3 }));
        drop(s);
        let IROp::Call { helper, .. } = &b.ops()[0] else {
            panic!("expected call");
        };
        assert_eq!(*helper, Helper::Zz { op: ZzOp::Shrn, esz: 1 });
        assert_eq!(desc_data(&b.ops()[0]), 8);
    }

    #[test]
    fn test_match_halfword_only() {
        let mut b = IRBuilder::new();
        let c = ctx(IsaFeatures::SVE | IsaFeatures::SVE2);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RprrEsz { rd: 0, pg: 1, rn: 2, rm: 3, esz: 2 };
        assert!(!match_ppzz(&mut s, &a));
        assert!(match_ppzz(&mut s, &RprrEsz { esz: 1, ..a }));
    }

    #[test]
    fn test_i8mm_gate() {
        let mut b = IRBuilder::new();
        let c = ctx(IsaFeatures::SVE | IsaFeatures::SVE2);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RrrrEsz { rd: 0, rn: 1, rm: 2, ra: 0, esz: 2 };
        assert!(!smmla(&mut s, &a));
        assert_eq!(s.missing_feature(), Some(IsaFeatures::I8MM));
    }
}
