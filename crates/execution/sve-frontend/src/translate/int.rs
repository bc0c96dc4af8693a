//! 整数运算、逻辑运算、移位与元素计数

use sve_ir::{
    Arg, BinOp, Gvec2iOp, Gvec3Op, Helper, ReduceOp, UnOp, ZpzOp, ZpziOp, ZpzzOp, ZpzzzOp, ZziOp,
    ZzzOp, ZzzzOp,
};

use super::*;
use crate::args::*;
use crate::extract::logic_imm_decode_wmask;
use crate::pred::decode_pred_count;

// ----------------------------------------------------------------------
// 无谓词逻辑与加减
// ----------------------------------------------------------------------

trans!(and_zzz, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::And, a));
trans!(orr_zzz, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::Or, a));
trans!(eor_zzz, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::Xor, a));
trans!(bic_zzz, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::AndC, a));

trans!(add_zzz, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::Add, a));
trans!(sub_zzz, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::Sub, a));
trans!(sqadd_zzz, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::SsAdd, a));
trans!(sqsub_zzz, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::SsSub, a));
trans!(uqadd_zzz, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::UsAdd, a));
trans!(uqsub_zzz, RrrEsz, |s, a| gen_gvec_fn_arg_zzz(s, Gvec3Op::UsSub, a));

// ----------------------------------------------------------------------
// 带谓词二元运算（合并）
// ----------------------------------------------------------------------

fn zpzz(s: &mut DisasContext<'_>, a: &RprrEsz, op: ZpzzOp) -> bool {
    gen_gvec_ool_arg_zpzz(s, Some(Helper::Zpzz { op, esz: a.esz }), a, 0)
}

trans!(and_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::And));
trans!(eor_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Eor));
trans!(orr_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Orr));
trans!(bic_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Bic));
trans!(add_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Add));
trans!(sub_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Sub));
trans!(smax_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Smax));
trans!(umax_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Umax));
trans!(smin_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Smin));
trans!(umin_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Umin));
trans!(sabd_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Sabd));
trans!(uabd_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Uabd));
trans!(mul_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Mul));
trans!(smulh_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Smulh));
trans!(umulh_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Umulh));
trans!(asr_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Asr));
trans!(lsr_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Lsr));
trans!(lsl_zpzz, RprrEsz, |s, a| zpzz(s, a, ZpzzOp::Lsl));

// 除法只有字与双字
trans!(sdiv_zpzz, RprrEsz, |s, a| {
    let h = esz_in(a.esz, 2, 3, Helper::Zpzz { op: ZpzzOp::Sdiv, esz: a.esz });
    gen_gvec_ool_arg_zpzz(s, h, a, 0)
});
trans!(udiv_zpzz, RprrEsz, |s, a| {
    let h = esz_in(a.esz, 2, 3, Helper::Zpzz { op: ZpzzOp::Udiv, esz: a.esz });
    gen_gvec_ool_arg_zpzz(s, h, a, 0)
});

trans!(sel_zpzz, RprrEsz, |s, a| {
    if s.sve_access_check() {
        s.do_sel_z(a.rd, a.rn, a.rm, a.pg, a.esz);
    }
    true
});

fn zpzw(s: &mut DisasContext<'_>, a: &RprrEsz, op: ZpzzOp) -> bool {
    let h = esz_in(a.esz, 0, 2, Helper::Zpzz { op, esz: a.esz });
    gen_gvec_ool_arg_zpzz(s, h, a, 0)
}

trans!(asr_zpzw, RprrEsz, |s, a| zpzw(s, a, ZpzzOp::AsrWide));
trans!(lsr_zpzw, RprrEsz, |s, a| zpzw(s, a, ZpzzOp::LsrWide));
trans!(lsl_zpzw, RprrEsz, |s, a| zpzw(s, a, ZpzzOp::LslWide));

// ----------------------------------------------------------------------
// 带谓词一元运算
// ----------------------------------------------------------------------

fn zpz(s: &mut DisasContext<'_>, a: &RprEsz, op: ZpzOp, min_esz: u8) -> bool {
    let h = esz_in(a.esz, min_esz, 3, Helper::Zpz { op, esz: a.esz });
    gen_gvec_ool_arg_zpz(s, h, a, 0)
}

trans!(cls, RprEsz, |s, a| zpz(s, a, ZpzOp::Cls, 0));
trans!(clz, RprEsz, |s, a| zpz(s, a, ZpzOp::Clz, 0));
trans!(cnt_zpz, RprEsz, |s, a| zpz(s, a, ZpzOp::Cnt, 0));
trans!(cnot, RprEsz, |s, a| zpz(s, a, ZpzOp::Cnot, 0));
trans!(not_zpz, RprEsz, |s, a| zpz(s, a, ZpzOp::Not, 0));
trans!(abs, RprEsz, |s, a| zpz(s, a, ZpzOp::Abs, 0));
trans!(neg, RprEsz, |s, a| zpz(s, a, ZpzOp::Neg, 0));
trans!(rbit, RprEsz, |s, a| zpz(s, a, ZpzOp::Rbit, 0));
trans!(fabs, RprEsz, |s, a| zpz(s, a, ZpzOp::Fabs, 1));
trans!(fneg, RprEsz, |s, a| zpz(s, a, ZpzOp::Fneg, 1));
trans!(sxtb, RprEsz, |s, a| zpz(s, a, ZpzOp::Sxtb, 1));
trans!(uxtb, RprEsz, |s, a| zpz(s, a, ZpzOp::Uxtb, 1));
trans!(sxth, RprEsz, |s, a| zpz(s, a, ZpzOp::Sxth, 2));
trans!(uxth, RprEsz, |s, a| zpz(s, a, ZpzOp::Uxth, 2));
trans!(sxtw, RprEsz, |s, a| zpz(s, a, ZpzOp::Sxtw, 3));
trans!(uxtw, RprEsz, |s, a| zpz(s, a, ZpzOp::Uxtw, 3));

// ----------------------------------------------------------------------
// 整数归约：结果写入 Vd 的低 64 位
// ----------------------------------------------------------------------

fn do_vpz_ool(s: &mut DisasContext<'_>, a: &RprEsz, helper: Option<Helper>) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if !s.sve_access_check() {
        return true;
    }
    let args = vec![s.zreg(a.rn), s.preg(a.pg), s.vdesc(0)];
    let temp = s.call_ret(helper, args);
    s.write_fp_dreg(a.rd, temp);
    true
}

fn reduce(s: &mut DisasContext<'_>, a: &RprEsz, op: ReduceOp) -> bool {
    do_vpz_ool(s, a, Some(Helper::Reduce { op, esz: a.esz }))
}

trans!(orv, RprEsz, |s, a| reduce(s, a, ReduceOp::Orv));
trans!(andv, RprEsz, |s, a| reduce(s, a, ReduceOp::Andv));
trans!(eorv, RprEsz, |s, a| reduce(s, a, ReduceOp::Eorv));
trans!(uaddv, RprEsz, |s, a| reduce(s, a, ReduceOp::Uaddv));
trans!(smaxv, RprEsz, |s, a| reduce(s, a, ReduceOp::Smaxv));
trans!(umaxv, RprEsz, |s, a| reduce(s, a, ReduceOp::Umaxv));
trans!(sminv, RprEsz, |s, a| reduce(s, a, ReduceOp::Sminv));
trans!(uminv, RprEsz, |s, a| reduce(s, a, ReduceOp::Uminv));
// 双字的有符号累加与 UADDV 相同，编码保留
trans!(saddv, RprEsz, |s, a| {
    let h = esz_in(a.esz, 0, 2, Helper::Reduce { op: ReduceOp::Saddv, esz: a.esz });
    do_vpz_ool(s, a, h)
});

// ----------------------------------------------------------------------
// 带谓词的立即数移位
// ----------------------------------------------------------------------

fn do_shift_zpzi(s: &mut DisasContext<'_>, a: &RpriTsz, asr: bool, op: ZpziOp) -> bool {
    if a.esz < 0 {
        return false;
    }
    let esz = a.esz as u8;
    let max = 8u32 << esz;
    let mut imm = a.imm;
    // 移位量等于元素宽度合法：算术右移等价于移 max-1，其余结果为零
    if imm >= max {
        if asr {
            imm = max - 1;
        } else {
            if s.sve_access_check() {
                s.do_movz_zpz(a.rd, a.rd, a.pg, esz, true);
            }
            return true;
        }
    }
    gen_gvec_ool_zzp(s, Some(Helper::Zpzi { op, esz }), a.rd, a.rn, a.pg, imm as i32)
}

trans!(asr_zpzi, RpriTsz, |s, a| do_shift_zpzi(s, a, true, ZpziOp::Asr));
trans!(lsr_zpzi, RpriTsz, |s, a| do_shift_zpzi(s, a, false, ZpziOp::Lsr));
trans!(lsl_zpzi, RpriTsz, |s, a| do_shift_zpzi(s, a, false, ZpziOp::Lsl));
trans!(asrd, RpriTsz, |s, a| do_shift_zpzi(s, a, false, ZpziOp::Asrd));

// ----------------------------------------------------------------------
// 无谓词移位
// ----------------------------------------------------------------------

fn do_shift_imm(s: &mut DisasContext<'_>, a: &RriTsz, asr: bool, op: Gvec2iOp) -> bool {
    if a.esz < 0 {
        return false;
    }
    if s.sve_access_check() {
        let esz = a.esz as u8;
        let mut imm = a.imm;
        if imm >= 8 << esz {
            if asr {
                imm = (8 << esz) - 1;
            } else {
                s.do_dupi_z(esz, a.rd, 0);
                return true;
            }
        }
        s.gen_gvec_fn_zzi(op, esz, a.rd, a.rn, imm as i64);
    }
    true
}

trans!(asr_zzi, RriTsz, |s, a| do_shift_imm(s, a, true, Gvec2iOp::Sari));
trans!(lsr_zzi, RriTsz, |s, a| do_shift_imm(s, a, false, Gvec2iOp::Shri));
trans!(lsl_zzi, RriTsz, |s, a| do_shift_imm(s, a, false, Gvec2iOp::Shli));

fn zzw(s: &mut DisasContext<'_>, a: &RrrEsz, op: ZzzOp) -> bool {
    let h = esz_in(a.esz, 0, 2, Helper::Zzz { op, esz: a.esz });
    gen_gvec_ool_arg_zzz(s, h, a, 0)
}

trans!(asr_zzw, RrrEsz, |s, a| zzw(s, a, ZzzOp::AsrWide));
trans!(lsr_zzw, RrrEsz, |s, a| zzw(s, a, ZzzOp::LsrWide));
trans!(lsl_zzw, RrrEsz, |s, a| zzw(s, a, ZzzOp::LslWide));

// ----------------------------------------------------------------------
// 乘加
// ----------------------------------------------------------------------

fn do_zpzzz_ool(s: &mut DisasContext<'_>, a: &RprrrEsz, op: ZpzzzOp) -> bool {
    if s.sve_access_check() {
        let helper = Helper::Zpzzz { op, esz: a.esz };
        s.gen_gvec_ool_zzzzp(helper, a.rd, a.ra, a.rn, a.rm, a.pg, 0);
    }
    true
}

// MAD/MSB 在译码时已换成 MLA/MLS 的操作数次序
trans!(mla, RprrrEsz, |s, a| do_zpzzz_ool(s, a, ZpzzzOp::Mla));
trans!(mls, RprrrEsz, |s, a| do_zpzzz_ool(s, a, ZpzzzOp::Mls));

// ----------------------------------------------------------------------
// INDEX
// ----------------------------------------------------------------------

trans!(index, Index, |s, a| {
    if !s.sve_access_check() {
        return true;
    }
    let start = match a.start {
        Operand::Imm(v) => s.movi(v as u64),
        Operand::Reg(r) => s.read_xreg(r),
    };
    let incr = match a.incr {
        Operand::Imm(v) => s.movi(v as u64),
        Operand::Reg(r) => s.read_xreg(r),
    };
    let args = vec![s.zreg(a.rd), Arg::Temp(start), Arg::Temp(incr), s.vdesc(0)];
    s.call(Helper::Index { esz: a.esz }, args);
    true
});

// ----------------------------------------------------------------------
// 栈分配与向量长度
// ----------------------------------------------------------------------

trans!(addvl, Rri, |s, a| {
    if s.sve_access_check() {
        let vsz = s.vec_full_reg_size() as i64;
        let rn = s.read_xreg_sp(a.rn);
        s.binary_imm(BinOp::Add, rn, rn, a.imm.wrapping_mul(vsz) as u64);
        s.write_xreg_sp(a.rd, rn);
    }
    true
});

trans!(addpl, Rri, |s, a| {
    if s.sve_access_check() {
        let psz = s.pred_full_reg_size() as i64;
        let rn = s.read_xreg_sp(a.rn);
        s.binary_imm(BinOp::Add, rn, rn, a.imm.wrapping_mul(psz) as u64);
        s.write_xreg_sp(a.rd, rn);
    }
    true
});

trans!(rdvl, Ri, |s, a| {
    if s.sve_access_check() {
        let vsz = s.vec_full_reg_size() as i64;
        let v = s.movi(a.imm.wrapping_mul(vsz) as u64);
        s.write_xreg(a.rd, v);
    }
    true
});

// ----------------------------------------------------------------------
// ADR：imm 为偏移左移量
// ----------------------------------------------------------------------

fn do_adr(s: &mut DisasContext<'_>, a: &Rrri, op: ZzzOp, esz: u8) -> bool {
    gen_gvec_ool_zzz(s, Some(Helper::Zzz { op, esz }), a.rd, a.rn, a.rm, a.imm as i32)
}

trans!(adr_p32, Rrri, |s, a| do_adr(s, a, ZzzOp::AdrP32, 2));
trans!(adr_p64, Rrri, |s, a| do_adr(s, a, ZzzOp::AdrP64, 3));
trans!(adr_s32, Rrri, |s, a| do_adr(s, a, ZzzOp::AdrS32, 3));
trans!(adr_u32, Rrri, |s, a| do_adr(s, a, ZzzOp::AdrU32, 3));

// ----------------------------------------------------------------------
// 按模式的元素计数
// ----------------------------------------------------------------------

fn pattern_count(s: &DisasContext<'_>, a: &IncdecCnt) -> u64 {
    let numelem = decode_pred_count(s.vec_full_reg_size(), a.pat, a.esz);
    numelem as u64 * a.imm as u64
}

trans!(cnt_r, IncdecCnt, |s, a| {
    if s.sve_access_check() {
        let n = pattern_count(s, a);
        let v = s.movi(n);
        s.write_xreg(a.rd, v);
    }
    true
});

trans!(incdec_r, IncdecCnt, |s, a| {
    if s.sve_access_check() {
        let inc = pattern_count(s, a);
        let inc = if a.d { inc.wrapping_neg() } else { inc };
        let reg = s.read_xreg(a.rd);
        s.binary_imm(BinOp::Add, reg, reg, inc);
        s.write_xreg(a.rd, reg);
    }
    true
});

trans!(sincdec_r_32, IncdecCnt, |s, a| {
    if !s.sve_access_check() {
        return true;
    }
    let inc = pattern_count(s, a);
    let reg = s.read_xreg(a.rd);
    if inc == 0 {
        // 增量为零时仍需按 32 位扩展
        let op = if a.u { UnOp::Ext32u } else { UnOp::Ext32s };
        s.unary(op, reg, reg);
    } else {
        let val = s.movi(inc);
        s.do_sat_addsub_32(reg, val, a.u, a.d);
    }
    s.write_xreg(a.rd, reg);
    true
});

trans!(sincdec_r_64, IncdecCnt, |s, a| {
    if !s.sve_access_check() {
        return true;
    }
    let inc = pattern_count(s, a);
    if inc != 0 {
        let reg = s.read_xreg(a.rd);
        let val = s.movi(inc);
        s.do_sat_addsub_64(reg, val, a.u, a.d);
        s.write_xreg(a.rd, reg);
    }
    true
});

trans!(incdec_v, IncdecCnt, |s, a| {
    if a.esz == 0 {
        return false;
    }
    if !s.sve_access_check() {
        return true;
    }
    let inc = pattern_count(s, a);
    if inc != 0 {
        let val = s.movi(if a.d { inc.wrapping_neg() } else { inc });
        s.gen_gvec_fn_zzs(Gvec3Op::Add, a.esz, a.rd, a.rd, val);
    } else {
        s.do_mov_z(a.rd, a.rd);
    }
    true
});

trans!(sincdec_v, IncdecCnt, |s, a| {
    if a.esz == 0 {
        return false;
    }
    if !s.sve_access_check() {
        return true;
    }
    let inc = pattern_count(s, a);
    if inc != 0 {
        let val = s.movi(inc);
        s.do_sat_addsub_vec(a.esz, a.rd, a.rd, val, a.u, a.d);
    } else {
        s.do_mov_z(a.rd, a.rd);
    }
    true
});

// ----------------------------------------------------------------------
// 位掩码立即数
// ----------------------------------------------------------------------

fn do_zz_dbm(s: &mut DisasContext<'_>, a: &RrDbm, op: Gvec2iOp) -> bool {
    let Some(imm) = logic_imm_decode_wmask(a.dbm) else {
        return false;
    };
    if s.sve_access_check() {
        s.gen_gvec_fn_zzi(op, 3, a.rd, a.rn, imm as i64);
    }
    true
}

trans!(and_zzi, RrDbm, |s, a| do_zz_dbm(s, a, Gvec2iOp::Andi));
trans!(orr_zzi, RrDbm, |s, a| do_zz_dbm(s, a, Gvec2iOp::Ori));
trans!(eor_zzi, RrDbm, |s, a| do_zz_dbm(s, a, Gvec2iOp::Xori));

trans!(dupm, RrDbm, |s, a| {
    let Some(imm) = logic_imm_decode_wmask(a.dbm) else {
        return false;
    };
    if s.sve_access_check() {
        s.do_dupi_z(3, a.rd, imm);
    }
    true
});

// ----------------------------------------------------------------------
// 无谓词宽立即数
// ----------------------------------------------------------------------

trans!(dup_i, RiEsz, |s, a| {
    if s.sve_access_check() {
        s.do_dupi_z(a.esz, a.rd, a.imm as u64);
    }
    true
});

trans!(add_zzi, RriEsz, |s, a| gen_gvec_fn_arg_zzi(s, Gvec2iOp::Addi, a));

trans!(sub_zzi, RriEsz, |s, a| {
    let neg = RriEsz {
        imm: a.imm.wrapping_neg(),
        ..*a
    };
    gen_gvec_fn_arg_zzi(s, Gvec2iOp::Addi, &neg)
});

trans!(mul_zzi, RriEsz, |s, a| gen_gvec_fn_arg_zzi(s, Gvec2iOp::Muli, a));

fn do_zzi_ool(s: &mut DisasContext<'_>, a: &RriEsz, op: ZziOp) -> bool {
    if s.sve_access_check() {
        let val = s.movi(a.imm as u64);
        s.gen_gvec_ool_zzi(Helper::Zzi { op, esz: a.esz }, a.rd, a.rn, val, 0);
    }
    true
}

trans!(subr_zzi, RriEsz, |s, a| do_zzi_ool(s, a, ZziOp::Subr));
trans!(smax_zzi, RriEsz, |s, a| do_zzi_ool(s, a, ZziOp::Smax));
trans!(umax_zzi, RriEsz, |s, a| do_zzi_ool(s, a, ZziOp::Umax));
trans!(smin_zzi, RriEsz, |s, a| do_zzi_ool(s, a, ZziOp::Smin));
trans!(umin_zzi, RriEsz, |s, a| do_zzi_ool(s, a, ZziOp::Umin));

fn do_zzi_sat(s: &mut DisasContext<'_>, a: &RriEsz, u: bool, d: bool) -> bool {
    if s.sve_access_check() {
        let val = s.movi(a.imm as u64);
        s.do_sat_addsub_vec(a.esz, a.rd, a.rn, val, u, d);
    }
    true
}

trans!(sqadd_zzi, RriEsz, |s, a| do_zzi_sat(s, a, false, false));
trans!(uqadd_zzi, RriEsz, |s, a| do_zzi_sat(s, a, true, false));
trans!(sqsub_zzi, RriEsz, |s, a| do_zzi_sat(s, a, false, true));
trans!(uqsub_zzi, RriEsz, |s, a| do_zzi_sat(s, a, true, true));

// ----------------------------------------------------------------------
// 带谓词立即数复制
// ----------------------------------------------------------------------

trans!(cpy_m_i, RpiEsz, |s, a| {
    if s.sve_access_check() {
        let val = s.movi(a.imm as u64);
        s.do_cpy_m(a.esz, a.rd, a.rd, a.pg, val);
    }
    true
});

trans!(cpy_z_i, RpiEsz, |s, a| {
    if s.sve_access_check() {
        let val = s.movi(a.imm as u64);
        let args = vec![s.zreg(a.rd), s.preg(a.pg), Arg::Temp(val), s.vdesc(0)];
        s.call(Helper::CpyZ { esz: a.esz }, args);
    }
    true
});

// ----------------------------------------------------------------------
// 点积：esz 为目的元素大小
// ----------------------------------------------------------------------

trans!(sdot_zzzz, RrrrEsz, |s, a| {
    gen_gvec_ool_arg_zzzz(s, Some(Helper::Zzzz { op: ZzzzOp::Sdot, esz: a.esz }), a, 0)
});
trans!(udot_zzzz, RrrrEsz, |s, a| {
    gen_gvec_ool_arg_zzzz(s, Some(Helper::Zzzz { op: ZzzzOp::Udot, esz: a.esz }), a, 0)
});

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
    fn test_lsl_by_width_zeroes() {
        let mut b = IRBuilder::new();
        let c = ctx(16);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RriTsz { rd: 1, rn: 2, imm: 8, esz: 0 };
        assert!(lsl_zzi(&mut s, &a));
        drop(s);
        assert!(matches!(b.ops()[0], IROp::GvecDupImm { imm: 0, .. }));
    }

    #[test]
    fn test_asr_by_width_clamps() {
        let mut b = IRBuilder::new();
        let c = ctx(16);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RriTsz { rd: 1, rn: 2, imm: 16, esz: 1 };
        assert!(asr_zzi(&mut s, &a));
        drop(s);
        assert!(matches!(
            b.ops()[0],
            IROp::Gvec2i { op: Gvec2iOp::Sari, imm: 15, .. }
        ));
    }

    #[test]
    fn test_reserved_sizes_reject() {
        let mut b = IRBuilder::new();
        let c = ctx(32);
        let mut s = DisasContext::new(&c, b.scope());
        let zpzz = RprrEsz { rd: 0, pg: 0, rn: 1, rm: 2, esz: 1 };
        assert!(!sdiv_zpzz(&mut s, &zpzz));
        let zpz = RprEsz { rd: 0, pg: 0, rn: 1, esz: 2 };
        assert!(!sxtw(&mut s, &zpz));
        assert!(!fabs(&mut s, &RprEsz { esz: 0, ..zpz }));
        let red = RprEsz { esz: 3, ..zpz };
        assert!(!saddv(&mut s, &red));
        assert!(uaddv(&mut s, &red));
    }

    #[test]
    fn test_bitmask_reserved_rejects() {
        let mut b = IRBuilder::new();
        let c = ctx(16);
        let mut s = DisasContext::new(&c, b.scope());
        let a = RrDbm { rd: 0, rn: 0, dbm: 0x103f };
        assert!(!and_zzi(&mut s, &a));
        assert!(!dupm(&mut s, &a));
    }
}
