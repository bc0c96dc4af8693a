//! 浮点运算
//!
//! 半精度使用独立的 FP 状态字；转换类指令按源类型选择状态字。
//! 字节元素大小对这里的指令都是保留编码。

use sve_ir::layout::vec_reg_offset;
use sve_ir::{
    Arg, FpBinOp, FpCmpOp, FpMlaOp, FpReduceOp, FpStatus, FpUnOp, FpZzOp, Helper, MemOp, Rounding,
    ZzzOp,
};

use super::*;
use crate::args::*;
use crate::extract::vfp_expand_imm;

// ----------------------------------------------------------------------
// 无谓词算术
// ----------------------------------------------------------------------

fn fp3(s: &mut DisasContext<'_>, a: &RrrEsz, op: FpBinOp) -> bool {
    gen_gvec_fpst_arg_zzz(s, fp_esz(a.esz, Helper::FpZzz { op, esz: a.esz }), a, 0)
}

trans!(fadd_zzz, RrrEsz, |s, a| fp3(s, a, FpBinOp::Add));
trans!(fsub_zzz, RrrEsz, |s, a| fp3(s, a, FpBinOp::Sub));
trans!(fmul_zzz, RrrEsz, |s, a| fp3(s, a, FpBinOp::Mul));
trans!(ftsmul, RrrEsz, |s, a| fp3(s, a, FpBinOp::Tsmul));
trans!(frecps, RrrEsz, |s, a| fp3(s, a, FpBinOp::Recps));
trans!(frsqrts, RrrEsz, |s, a| fp3(s, a, FpBinOp::Rsqrts));

// 只做位操作，不需要状态字
trans!(ftssel, RrrEsz, |s, a| {
    let h = fp_esz(a.esz, Helper::Zzz { op: ZzzOp::Ftssel, esz: a.esz });
    gen_gvec_ool_arg_zzz(s, h, a, 0)
});

fn fp_zz(s: &mut DisasContext<'_>, a: &RrEsz, op: FpZzOp) -> bool {
    let fpst = FpStatus::for_esz(a.esz);
    gen_gvec_fpst_arg_zz(s, fp_esz(a.esz, Helper::FpZz { op, esz: a.esz }), a, fpst)
}

trans!(frecpe, RrEsz, |s, a| fp_zz(s, a, FpZzOp::Recpe));
trans!(frsqrte, RrEsz, |s, a| fp_zz(s, a, FpZzOp::Rsqrte));

// ----------------------------------------------------------------------
// 带谓词算术；FSUBR/FDIVR 在译码时已交换操作数
// ----------------------------------------------------------------------

fn fp_zpzz(s: &mut DisasContext<'_>, a: &RprrEsz, op: FpBinOp) -> bool {
    gen_gvec_fpst_arg_zpzz(s, fp_esz(a.esz, Helper::FpZpzz { op, esz: a.esz }), a)
}

trans!(fadd_zpzz, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Add));
trans!(fsub_zpzz, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Sub));
trans!(fmul_zpzz, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Mul));
trans!(fmaxnm_zpzz, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Maxnm));
trans!(fminnm_zpzz, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Minnm));
trans!(fmax_zpzz, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Max));
trans!(fmin_zpzz, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Min));
trans!(fabd, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Abd));
trans!(fscale, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Scale));
trans!(fmulx, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Mulx));
trans!(fdiv, RprrEsz, |s, a| fp_zpzz(s, a, FpBinOp::Div));

// ----------------------------------------------------------------------
// 带谓词的立即数运算：imm 选择两个常量之一
// ----------------------------------------------------------------------

/// 常量对的位模式，依次为半、单、双精度
struct FpConstPair([[u64; 2]; 3]);

const HALF_ONE: FpConstPair = FpConstPair([
    [0x3800, 0x3c00],
    [0x3f00_0000, 0x3f80_0000],
    [0x3fe0_0000_0000_0000, 0x3ff0_0000_0000_0000],
]);

const HALF_TWO: FpConstPair = FpConstPair([
    [0x3800, 0x4000],
    [0x3f00_0000, 0x4000_0000],
    [0x3fe0_0000_0000_0000, 0x4000_0000_0000_0000],
]);

const ZERO_ONE: FpConstPair = FpConstPair([
    [0x0000, 0x3c00],
    [0x0000_0000, 0x3f80_0000],
    [0x0000_0000_0000_0000, 0x3ff0_0000_0000_0000],
]);

fn do_fp_imm(s: &mut DisasContext<'_>, a: &RpriEsz, consts: &FpConstPair, op: FpBinOp) -> bool {
    if a.esz == 0 {
        return false;
    }
    if s.sve_access_check() {
        let imm = consts.0[a.esz as usize - 1][(a.imm & 1) as usize];
        let scalar = s.movi(imm);
        let fpst = FpStatus::for_esz(a.esz);
        let args = vec![
            s.zreg(a.rd),
            s.zreg(a.rn),
            s.preg(a.pg),
            Arg::Temp(scalar),
            Arg::Fpst(fpst),
            s.vdesc(0),
        ];
        s.call(Helper::FpZpzs { op, esz: a.esz }, args);
    }
    true
}

trans!(fadd_zpzi, RpriEsz, |s, a| do_fp_imm(s, a, &HALF_ONE, FpBinOp::Add));
trans!(fsub_zpzi, RpriEsz, |s, a| do_fp_imm(s, a, &HALF_ONE, FpBinOp::Sub));
trans!(fmul_zpzi, RpriEsz, |s, a| do_fp_imm(s, a, &HALF_TWO, FpBinOp::Mul));
trans!(fsubr_zpzi, RpriEsz, |s, a| do_fp_imm(s, a, &HALF_ONE, FpBinOp::Subr));
trans!(fmaxnm_zpzi, RpriEsz, |s, a| do_fp_imm(s, a, &ZERO_ONE, FpBinOp::Maxnm));
trans!(fminnm_zpzi, RpriEsz, |s, a| do_fp_imm(s, a, &ZERO_ONE, FpBinOp::Minnm));
trans!(fmax_zpzi, RpriEsz, |s, a| do_fp_imm(s, a, &ZERO_ONE, FpBinOp::Max));
trans!(fmin_zpzi, RpriEsz, |s, a| do_fp_imm(s, a, &ZERO_ONE, FpBinOp::Min));

// ----------------------------------------------------------------------
// 浮点立即数复制
// ----------------------------------------------------------------------

trans!(fdup, RiEsz, |s, a| {
    if a.esz == 0 {
        return false;
    }
    if s.sve_access_check() {
        let imm = vfp_expand_imm(a.esz, a.imm as u32);
        s.do_dupi_z(a.esz, a.rd, imm);
    }
    true
});

trans!(fcpy, RpiEsz, |s, a| {
    if a.esz == 0 {
        return false;
    }
    if s.sve_access_check() {
        let imm = vfp_expand_imm(a.esz, a.imm as u32);
        let val = s.movi(imm);
        s.do_cpy_m(a.esz, a.rd, a.rd, a.pg, val);
    }
    true
});

// ----------------------------------------------------------------------
// 归约
// ----------------------------------------------------------------------

/// 树形归约；描述符 data 为向上取整到 2 的幂的 VL，超出部分以单位元填充
fn do_reduce(s: &mut DisasContext<'_>, a: &RprEsz, op: FpReduceOp) -> bool {
    if a.esz == 0 {
        return false;
    }
    if !s.sve_access_check() {
        return true;
    }
    let vsz = s.vec_full_reg_size();
    let p2vsz = vsz.next_power_of_two();
    let fpst = FpStatus::for_esz(a.esz);
    let args = vec![s.zreg(a.rn), s.preg(a.pg), Arg::Fpst(fpst), s.vdesc(p2vsz as i32)];
    let temp = s.call_ret(Helper::FpReduce { op, esz: a.esz }, args);
    s.write_fp_dreg(a.rd, temp);
    true
}

trans!(faddv, RprEsz, |s, a| do_reduce(s, a, FpReduceOp::Addv));
trans!(fmaxnmv, RprEsz, |s, a| do_reduce(s, a, FpReduceOp::Maxnmv));
trans!(fminnmv, RprEsz, |s, a| do_reduce(s, a, FpReduceOp::Minnmv));
trans!(fmaxv, RprEsz, |s, a| do_reduce(s, a, FpReduceOp::Maxv));
trans!(fminv, RprEsz, |s, a| do_reduce(s, a, FpReduceOp::Minv));

// 严格按元素顺序累加，初值取自 Vdn 的第 0 个元素
trans!(fadda, RprrEsz, |s, a| {
    if a.esz == 0 {
        return false;
    }
    if !s.sve_access_check() {
        return true;
    }
    let init = s.load_env(vec_reg_offset(a.rn, 0, a.esz), MemOp::unsigned(a.esz));
    let fpst = FpStatus::for_esz(a.esz);
    let args = vec![Arg::Temp(init), s.zreg(a.rm), s.preg(a.pg), Arg::Fpst(fpst), s.vdesc(0)];
    let val = s.call_ret(Helper::Fadda { esz: a.esz }, args);
    s.write_fp_dreg(a.rd, val);
    true
});

// ----------------------------------------------------------------------
// 比较
// ----------------------------------------------------------------------

fn do_fp_cmp(s: &mut DisasContext<'_>, a: &RprrEsz, op: FpCmpOp) -> bool {
    if a.esz == 0 {
        return false;
    }
    if s.sve_access_check() {
        let fpst = FpStatus::for_esz(a.esz);
        let args = vec![
            s.preg(a.rd),
            s.zreg(a.rn),
            s.zreg(a.rm),
            s.preg(a.pg),
            Arg::Fpst(fpst),
            s.vdesc(0),
        ];
        s.call(Helper::FpCmp { op, esz: a.esz, zero: false }, args);
    }
    true
}

trans!(fcmge_ppzz, RprrEsz, |s, a| do_fp_cmp(s, a, FpCmpOp::Ge));
trans!(fcmgt_ppzz, RprrEsz, |s, a| do_fp_cmp(s, a, FpCmpOp::Gt));
trans!(fcmeq_ppzz, RprrEsz, |s, a| do_fp_cmp(s, a, FpCmpOp::Eq));
trans!(fcmne_ppzz, RprrEsz, |s, a| do_fp_cmp(s, a, FpCmpOp::Ne));
trans!(fcmuo_ppzz, RprrEsz, |s, a| do_fp_cmp(s, a, FpCmpOp::Uo));
trans!(facge_ppzz, RprrEsz, |s, a| do_fp_cmp(s, a, FpCmpOp::Acge));
trans!(facgt_ppzz, RprrEsz, |s, a| do_fp_cmp(s, a, FpCmpOp::Acgt));

fn do_fp_cmp0(s: &mut DisasContext<'_>, a: &RprEsz, op: FpCmpOp) -> bool {
    if a.esz == 0 {
        return false;
    }
    if s.sve_access_check() {
        let fpst = FpStatus::for_esz(a.esz);
        let args = vec![s.preg(a.rd), s.zreg(a.rn), s.preg(a.pg), Arg::Fpst(fpst), s.vdesc(0)];
        s.call(Helper::FpCmp { op, esz: a.esz, zero: true }, args);
    }
    true
}

trans!(fcmge_ppz0, RprEsz, |s, a| do_fp_cmp0(s, a, FpCmpOp::Ge));
trans!(fcmgt_ppz0, RprEsz, |s, a| do_fp_cmp0(s, a, FpCmpOp::Gt));
trans!(fcmlt_ppz0, RprEsz, |s, a| do_fp_cmp0(s, a, FpCmpOp::Lt));
trans!(fcmle_ppz0, RprEsz, |s, a| do_fp_cmp0(s, a, FpCmpOp::Le));
trans!(fcmeq_ppz0, RprEsz, |s, a| do_fp_cmp0(s, a, FpCmpOp::Eq));
trans!(fcmne_ppz0, RprEsz, |s, a| do_fp_cmp0(s, a, FpCmpOp::Ne));

// ----------------------------------------------------------------------
// 融合乘加；FMAD 类在译码时已换成 FMLA 的操作数次序
// ----------------------------------------------------------------------

fn do_fmla(s: &mut DisasContext<'_>, a: &RprrrEsz, op: FpMlaOp) -> bool {
    if a.esz == 0 {
        return false;
    }
    if s.sve_access_check() {
        let fpst = FpStatus::for_esz(a.esz);
        let helper = Helper::FpMla { op, esz: a.esz };
        s.gen_gvec_fpst_zzzzp(helper, a.rd, a.rn, a.rm, a.ra, a.pg, 0, fpst);
    }
    true
}

trans!(fmla_zpzzz, RprrrEsz, |s, a| do_fmla(s, a, FpMlaOp::Fmla));
trans!(fmls_zpzzz, RprrrEsz, |s, a| do_fmla(s, a, FpMlaOp::Fmls));
trans!(fnmla_zpzzz, RprrrEsz, |s, a| do_fmla(s, a, FpMlaOp::Fnmla));
trans!(fnmls_zpzzz, RprrrEsz, |s, a| do_fmla(s, a, FpMlaOp::Fnmls));

// ----------------------------------------------------------------------
// 转换
//
// 状态字随源类型：源为半精度时用 F16 状态字。
// 助手的 esz 取容器大小，即源与目的中较大者。
// ----------------------------------------------------------------------

fn do_fp_unary(s: &mut DisasContext<'_>, a: &RprEsz, op: FpUnOp, esz: u8, fpst: FpStatus) -> bool {
    gen_gvec_fpst_arg_zpz(s, Some(Helper::FpZpz { op, esz }), a, fpst)
}

fn fcvt(s: &mut DisasContext<'_>, a: &RprEsz, from: u8, to: u8) -> bool {
    do_fp_unary(s, a, FpUnOp::Fcvt { from, to }, from.max(to), FpStatus::for_esz(from))
}

trans!(fcvt_sh, RprEsz, |s, a| fcvt(s, a, 2, 1));
trans!(fcvt_hs, RprEsz, |s, a| fcvt(s, a, 1, 2));
trans!(fcvt_dh, RprEsz, |s, a| fcvt(s, a, 3, 1));
trans!(fcvt_hd, RprEsz, |s, a| fcvt(s, a, 1, 3));
trans!(fcvt_ds, RprEsz, |s, a| fcvt(s, a, 3, 2));
trans!(fcvt_sd, RprEsz, |s, a| fcvt(s, a, 2, 3));

trans_feat!(bfcvt, BF16, RprEsz, |s, a| do_fp_unary(s, a, FpUnOp::Bfcvt, 2, FpStatus::A64));

/// 浮点转整数，向零舍入；`from` 为浮点源大小
fn fcvtz(s: &mut DisasContext<'_>, a: &RprEsz, signed: bool, from: u8, to: u8) -> bool {
    let op = FpUnOp::FcvtToInt { signed, from, to };
    do_fp_unary(s, a, op, from.max(to), FpStatus::for_esz(from))
}

trans!(fcvtzs_hh, RprEsz, |s, a| fcvtz(s, a, true, 1, 1));
trans!(fcvtzu_hh, RprEsz, |s, a| fcvtz(s, a, false, 1, 1));
trans!(fcvtzs_hs, RprEsz, |s, a| fcvtz(s, a, true, 1, 2));
trans!(fcvtzu_hs, RprEsz, |s, a| fcvtz(s, a, false, 1, 2));
trans!(fcvtzs_hd, RprEsz, |s, a| fcvtz(s, a, true, 1, 3));
trans!(fcvtzu_hd, RprEsz, |s, a| fcvtz(s, a, false, 1, 3));
trans!(fcvtzs_ss, RprEsz, |s, a| fcvtz(s, a, true, 2, 2));
trans!(fcvtzu_ss, RprEsz, |s, a| fcvtz(s, a, false, 2, 2));
trans!(fcvtzs_sd, RprEsz, |s, a| fcvtz(s, a, true, 2, 3));
trans!(fcvtzu_sd, RprEsz, |s, a| fcvtz(s, a, false, 2, 3));
trans!(fcvtzs_ds, RprEsz, |s, a| fcvtz(s, a, true, 3, 2));
trans!(fcvtzu_ds, RprEsz, |s, a| fcvtz(s, a, false, 3, 2));
trans!(fcvtzs_dd, RprEsz, |s, a| fcvtz(s, a, true, 3, 3));
trans!(fcvtzu_dd, RprEsz, |s, a| fcvtz(s, a, false, 3, 3));

/// 整数转浮点；`from` 为整数源大小，状态字随目的类型
fn cvtf(s: &mut DisasContext<'_>, a: &RprEsz, signed: bool, from: u8, to: u8) -> bool {
    let op = FpUnOp::IntToFp { signed, from, to };
    do_fp_unary(s, a, op, from.max(to), FpStatus::for_esz(to))
}

trans!(scvtf_hh, RprEsz, |s, a| cvtf(s, a, true, 1, 1));
trans!(ucvtf_hh, RprEsz, |s, a| cvtf(s, a, false, 1, 1));
trans!(scvtf_sh, RprEsz, |s, a| cvtf(s, a, true, 2, 1));
trans!(ucvtf_sh, RprEsz, |s, a| cvtf(s, a, false, 2, 1));
trans!(scvtf_dh, RprEsz, |s, a| cvtf(s, a, true, 3, 1));
trans!(ucvtf_dh, RprEsz, |s, a| cvtf(s, a, false, 3, 1));
trans!(scvtf_ss, RprEsz, |s, a| cvtf(s, a, true, 2, 2));
trans!(ucvtf_ss, RprEsz, |s, a| cvtf(s, a, false, 2, 2));
trans!(scvtf_sd, RprEsz, |s, a| cvtf(s, a, true, 2, 3));
trans!(ucvtf_sd, RprEsz, |s, a| cvtf(s, a, false, 2, 3));
trans!(scvtf_ds, RprEsz, |s, a| cvtf(s, a, true, 3, 2));
trans!(ucvtf_ds, RprEsz, |s, a| cvtf(s, a, false, 3, 2));
trans!(scvtf_dd, RprEsz, |s, a| cvtf(s, a, true, 3, 3));
trans!(ucvtf_dd, RprEsz, |s, a| cvtf(s, a, false, 3, 3));

// ----------------------------------------------------------------------
// 取整与其它一元运算
// ----------------------------------------------------------------------

fn fp_unary_esz(s: &mut DisasContext<'_>, a: &RprEsz, op: FpUnOp) -> bool {
    let h = fp_esz(a.esz, Helper::FpZpz { op, esz: a.esz });
    gen_gvec_fpst_arg_zpz(s, h, a, FpStatus::for_esz(a.esz))
}

trans!(frinti, RprEsz, |s, a| fp_unary_esz(s, a, FpUnOp::Rint));
trans!(frintx, RprEsz, |s, a| fp_unary_esz(s, a, FpUnOp::RintX));
trans!(frecpx, RprEsz, |s, a| fp_unary_esz(s, a, FpUnOp::Recpx));
trans!(fsqrt, RprEsz, |s, a| fp_unary_esz(s, a, FpUnOp::Sqrt));

/// 以指定舍入模式取整，结束后恢复原模式
fn do_frint_mode(s: &mut DisasContext<'_>, a: &RprEsz, mode: Rounding) -> bool {
    if a.esz == 0 {
        return false;
    }
    if !s.sve_access_check() {
        return true;
    }
    let fpst = FpStatus::for_esz(a.esz);
    let helper = Helper::FpZpz { op: FpUnOp::Rint, esz: a.esz };
    let args = vec![s.zreg(a.rd), s.zreg(a.rn), s.preg(a.pg), Arg::Fpst(fpst), s.vdesc(0)];
    s.with_rounding_mode(fpst, mode, |b| b.call(helper, args));
    true
}

trans!(frintn, RprEsz, |s, a| do_frint_mode(s, a, Rounding::TieEven));
trans!(frintp, RprEsz, |s, a| do_frint_mode(s, a, Rounding::PosInf));
trans!(frintm, RprEsz, |s, a| do_frint_mode(s, a, Rounding::NegInf));
trans!(frintz, RprEsz, |s, a| do_frint_mode(s, a, Rounding::Zero));
trans!(frinta, RprEsz, |s, a| do_frint_mode(s, a, Rounding::TieAway));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeContext;
    use sve_core::IsaFeatures;
    use sve_ir::{IRBuilder, IROp};

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
    fn test_frint_brackets_rounding() {
        let mut b = IRBuilder::new();
        let c = ctx(32);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RprEsz { rd: 0, pg: 1, rn: 2, esz: 1 };
        assert!(frintz(&mut s, &a));
        drop(s);
        let ops = b.ops();
        assert!(matches!(
            ops[0],
            IROp::SetRounding { fpst: FpStatus::A64F16, mode: Rounding::Zero, .. }
        ));
        assert!(matches!(ops[1], IROp::Call { .. }));
        assert!(matches!(ops[2], IROp::RestoreRounding { .. }));
    }

    #[test]
    fn test_fp_byte_size_rejects() {
        let mut b = IRBuilder::new();
        let c = ctx(32);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RprrEsz { rd: 0, pg: 1, rn: 2, rm: 3, esz: 0 };
        assert!(!fadd_zpzz(&mut s, &a));
        assert!(!fadda(&mut s, &a));
        assert!(!fcmge_ppzz(&mut s, &a));
        assert!(!faddv(&mut s, &RprEsz { rd: 0, pg: 1, rn: 2, esz: 0 }));
    }

    #[test]
    fn test_fp_imm_constant() {
        let mut b = IRBuilder::new();
        let c = ctx(16);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RpriEsz { rd: 0, pg: 1, rn: 0, imm: 1, esz: 2 };
        assert!(fmul_zpzi(&mut s, &a));
        drop(s);
        assert!(matches!(b.ops()[0], IROp::MovI { imm: 0x4000_0000, .. }));
    }

    #[test]
    fn test_reduce_desc_pow2() {
        // VL = 48 字节：data 为 64
        let mut b = IRBuilder::new();
        let c = ctx(48);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RprEsz { rd: 0, pg: 1, rn: 2, esz: 2 };
        assert!(faddv(&mut s, &a));
        drop(s);
        let IROp::Call { args, .. } = &b.ops()[0] else {
            panic!("expected call");
        };
        let Arg::Desc(d) = args[3] else {
            panic!("expected descriptor");
        };
        assert_eq!(sve_ir::desc::simd_data(d), 64);
    }

    #[test]
    fn test_bfcvt_requires_bf16() {
        let mut b = IRBuilder::new();
        let c = ctx(16);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RprEsz { rd: 0, pg: 1, rn: 2, esz: 2 };
        assert!(!bfcvt(&mut s, &a));
        assert_eq!(s.missing_feature(), Some(IsaFeatures::BF16));
    }
}
