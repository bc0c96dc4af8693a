//! 谓词逻辑、谓词初始化、整数比较、分割（BRK）、谓词计数与 WHILE

use sve_ir::layout::{FFR_PRED_NUM, pred_full_reg_offset};
use sve_ir::{Arg, BinOp, BrkOp, CmpOp, Cond, Flag, Gvec3Op, Gvec4Op, Helper, IROp, MemOp, Temp, UnOp};

use super::*;
use crate::args::*;
use crate::pred::{PAT_ALL, PAT_NONE, PRED_ESZ_MASKS, decode_pred_count};

const MO_64: MemOp = MemOp::unsigned(3);

// ----------------------------------------------------------------------
// 谓词逻辑
// ----------------------------------------------------------------------

trans!(and_pppp, RprrS, |s, a| {
    if !a.s {
        if a.rn == a.rm {
            if !s.sve_access_check() {
                return true;
            }
            if a.pg == a.rn {
                s.do_mov_p(a.rd, a.rn);
            } else {
                s.gen_gvec_fn_ppp(Gvec3Op::And, a.rd, a.rn, a.pg);
            }
            return true;
        }
        if a.pg == a.rn || a.pg == a.rm {
            if s.sve_access_check() {
                s.gen_gvec_fn_ppp(Gvec3Op::And, a.rd, a.rn, a.rm);
            }
            return true;
        }
    }
    s.do_pppp_flags(a, Gvec4Op::AndPg)
});

trans!(bic_pppp, RprrS, |s, a| {
    if !a.s && a.pg == a.rn {
        if s.sve_access_check() {
            s.gen_gvec_fn_ppp(Gvec3Op::AndC, a.rd, a.rn, a.rm);
        }
        return true;
    }
    s.do_pppp_flags(a, Gvec4Op::BicPg)
});

trans!(eor_pppp, RprrS, |s, a| {
    // NOT (predicate) 别名：EOR Pd, Pg/Z, Pn, Pg
    if !a.s && a.pg == a.rm {
        if s.sve_access_check() {
            s.gen_gvec_fn_ppp(Gvec3Op::AndC, a.rd, a.pg, a.rn);
        }
        return true;
    }
    s.do_pppp_flags(a, Gvec4Op::EorPg)
});

trans!(sel_pppp, RprrS, |s, a| {
    if a.s {
        return false;
    }
    if s.sve_access_check() {
        s.gen_gvec_fn_pppp(Gvec4Op::SelPg, a.rd, a.rn, a.rm, a.pg);
    }
    true
});

trans!(orr_pppp, RprrS, |s, a| {
    if !a.s && a.pg == a.rn && a.rn == a.rm {
        if s.sve_access_check() {
            s.do_mov_p(a.rd, a.rn);
        }
        return true;
    }
    s.do_pppp_flags(a, Gvec4Op::OrrPg)
});

trans!(orn_pppp, RprrS, |s, a| s.do_pppp_flags(a, Gvec4Op::OrnPg));
trans!(nor_pppp, RprrS, |s, a| s.do_pppp_flags(a, Gvec4Op::NorPg));
trans!(nand_pppp, RprrS, |s, a| s.do_pppp_flags(a, Gvec4Op::NandPg));

// ----------------------------------------------------------------------
// PTEST
// ----------------------------------------------------------------------

trans!(ptest, Ptest, |s, a| {
    if !s.sve_access_check() {
        return true;
    }
    let nofs = pred_full_reg_offset(a.rn);
    let gofs = pred_full_reg_offset(a.pg);
    let words = s.pred_full_reg_size().div_ceil(8);

    if words == 1 {
        let pn = s.load_env(nofs, MO_64);
        let pg = s.load_env(gofs, MO_64);
        s.do_predtest1(pn, pg);
    } else {
        s.do_predtest(nofs, gofs, words);
    }
    true
});

// ----------------------------------------------------------------------
// 谓词初始化
// ----------------------------------------------------------------------

/// 按模式写入谓词：前 `numelem` 个元素为真，其余清零
///
/// 写满整个谓词寄存器，VL 之外的填充位同样清零。
fn do_predset(s: &mut DisasContext<'_>, esz: u8, rd: u32, pat: u32, setflag: bool) -> bool {
    if !s.sve_access_check() {
        return true;
    }

    let fullsz = s.vec_full_reg_size();
    let ofs = pred_full_reg_offset(rd);
    let numelem = decode_pred_count(fullsz, pat, esz);

    let (word, lastword, setsz) = if numelem == 0 {
        (0u64, 0u64, fullsz)
    } else {
        let setsz = numelem << esz;
        let word = PRED_ESZ_MASKS[esz as usize];
        let lastword = if setsz % 64 != 0 {
            word & ((1u64 << (setsz % 64)) - 1)
        } else {
            word
        };
        (word, lastword, setsz)
    };

    if fullsz <= 64 {
        let t = s.movi(lastword);
        s.store_env(t, ofs, MO_64);
    } else {
        let setsz = setsz / 8;
        let fullsz = fullsz / 8;
        let t = s.movi(word);
        let mut i = 0;
        while i < setsz & !7 {
            s.store_env(t, ofs + i, MO_64);
            i += 8;
        }
        if lastword != word {
            let t = s.movi(lastword);
            s.store_env(t, ofs + i, MO_64);
            i += 8;
        }
        if i < fullsz {
            let zero = s.movi(0);
            while i < fullsz {
                s.store_env(zero, ofs + i, MO_64);
                i += 8;
            }
        }
    }

    // PTRUES：结果即是控制谓词，N 与 !Z 同为“有活动元素”
    if setflag {
        let flags = s.movi(if word != 0 { 0x8000_0006 } else { 1 });
        s.push(IROp::SetPredFlags { src: flags });
    }
    true
}

trans!(ptrue, Ptrue, |s, a| do_predset(s, a.esz, a.rd, a.pat, a.s));
trans!(setffr, Empty, |s, _a| do_predset(s, 0, FFR_PRED_NUM, PAT_ALL, false));
trans!(pfalse, Rd, |s, a| do_predset(s, 0, a.rd, PAT_NONE, false));

trans!(rdffr_p, RprS, |s, a| {
    let alias = RprrS {
        rd: a.rd,
        pg: a.pg,
        rn: FFR_PRED_NUM,
        rm: FFR_PRED_NUM,
        s: a.s,
    };
    and_pppp(s, &alias)
});

trans!(rdffr, Rd, |s, a| {
    if s.sve_access_check() {
        s.do_mov_p(a.rd, FFR_PRED_NUM);
    }
    true
});

trans!(wrffr, Rn, |s, a| {
    if s.sve_access_check() {
        s.do_mov_p(FFR_PRED_NUM, a.rn);
    }
    true
});

fn do_pfirst_pnext(s: &mut DisasContext<'_>, a: &RrEsz, helper: Helper) -> bool {
    if !s.sve_access_check() {
        return true;
    }
    let args = vec![s.preg(a.rd), s.preg(a.rn), s.pdesc(a.esz, 0)];
    let flags = s.call_ret(helper, args);
    s.push(IROp::SetPredFlags { src: flags });
    true
}

trans!(pfirst, RrEsz, |s, a| do_pfirst_pnext(s, a, Helper::Pfirst));
trans!(pnext, RrEsz, |s, a| do_pfirst_pnext(s, a, Helper::Pnext));

// ----------------------------------------------------------------------
// 整数比较：结果写入谓词并设置 PredTest 标志
// ----------------------------------------------------------------------

pub(super) fn do_ppzz_flags(s: &mut DisasContext<'_>, a: &RprrEsz, helper: Option<Helper>) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if !s.sve_access_check() {
        return true;
    }
    let args = vec![s.preg(a.rd), s.zreg(a.rn), s.zreg(a.rm), s.preg(a.pg), s.vdesc(0)];
    let flags = s.call_ret(helper, args);
    s.push(IROp::SetPredFlags { src: flags });
    true
}

fn ppzz(s: &mut DisasContext<'_>, a: &RprrEsz, op: CmpOp) -> bool {
    do_ppzz_flags(s, a, Some(Helper::Cmp { op, esz: a.esz, wide: false }))
}

// 第二操作数为 64 位元素，双字形式无意义
fn ppzw(s: &mut DisasContext<'_>, a: &RprrEsz, op: CmpOp) -> bool {
    let h = esz_in(a.esz, 0, 2, Helper::Cmp { op, esz: a.esz, wide: true });
    do_ppzz_flags(s, a, h)
}

trans!(cmpeq_ppzz, RprrEsz, |s, a| ppzz(s, a, CmpOp::Eq));
trans!(cmpne_ppzz, RprrEsz, |s, a| ppzz(s, a, CmpOp::Ne));
trans!(cmpgt_ppzz, RprrEsz, |s, a| ppzz(s, a, CmpOp::Gt));
trans!(cmpge_ppzz, RprrEsz, |s, a| ppzz(s, a, CmpOp::Ge));
trans!(cmphi_ppzz, RprrEsz, |s, a| ppzz(s, a, CmpOp::Hi));
trans!(cmphs_ppzz, RprrEsz, |s, a| ppzz(s, a, CmpOp::Hs));

trans!(cmpeq_ppzw, RprrEsz, |s, a| ppzw(s, a, CmpOp::Eq));
trans!(cmpne_ppzw, RprrEsz, |s, a| ppzw(s, a, CmpOp::Ne));
trans!(cmpgt_ppzw, RprrEsz, |s, a| ppzw(s, a, CmpOp::Gt));
trans!(cmpge_ppzw, RprrEsz, |s, a| ppzw(s, a, CmpOp::Ge));
trans!(cmphi_ppzw, RprrEsz, |s, a| ppzw(s, a, CmpOp::Hi));
trans!(cmphs_ppzw, RprrEsz, |s, a| ppzw(s, a, CmpOp::Hs));
trans!(cmplt_ppzw, RprrEsz, |s, a| ppzw(s, a, CmpOp::Lt));
trans!(cmple_ppzw, RprrEsz, |s, a| ppzw(s, a, CmpOp::Le));
trans!(cmplo_ppzw, RprrEsz, |s, a| ppzw(s, a, CmpOp::Lo));
trans!(cmpls_ppzw, RprrEsz, |s, a| ppzw(s, a, CmpOp::Ls));

fn ppzi(s: &mut DisasContext<'_>, a: &RpriEsz, op: CmpOp) -> bool {
    if !s.sve_access_check() {
        return true;
    }
    let args = vec![s.preg(a.rd), s.zreg(a.rn), s.preg(a.pg), s.vdesc(a.imm as i32)];
    let flags = s.call_ret(Helper::CmpImm { op, esz: a.esz }, args);
    s.push(IROp::SetPredFlags { src: flags });
    true
}

trans!(cmpeq_ppzi, RpriEsz, |s, a| ppzi(s, a, CmpOp::Eq));
trans!(cmpne_ppzi, RpriEsz, |s, a| ppzi(s, a, CmpOp::Ne));
trans!(cmpgt_ppzi, RpriEsz, |s, a| ppzi(s, a, CmpOp::Gt));
trans!(cmpge_ppzi, RpriEsz, |s, a| ppzi(s, a, CmpOp::Ge));
trans!(cmplt_ppzi, RpriEsz, |s, a| ppzi(s, a, CmpOp::Lt));
trans!(cmple_ppzi, RpriEsz, |s, a| ppzi(s, a, CmpOp::Le));
trans!(cmphs_ppzi, RpriEsz, |s, a| ppzi(s, a, CmpOp::Hs));
trans!(cmphi_ppzi, RpriEsz, |s, a| ppzi(s, a, CmpOp::Hi));
trans!(cmplo_ppzi, RpriEsz, |s, a| ppzi(s, a, CmpOp::Lo));
trans!(cmpls_ppzi, RpriEsz, |s, a| ppzi(s, a, CmpOp::Ls));

// ----------------------------------------------------------------------
// 谓词分割
//
// 谓词可能不足 8 字节，描述符只能用 pred_desc。
// ----------------------------------------------------------------------

fn do_brk3(s: &mut DisasContext<'_>, a: &RprrS, op: BrkOp) -> bool {
    if !s.sve_access_check() {
        return true;
    }
    let args = vec![s.preg(a.rd), s.preg(a.rn), s.preg(a.rm), s.preg(a.pg), s.pdesc(0, 0)];
    let helper = Helper::Brk { op, flags: a.s };
    if a.s {
        let flags = s.call_ret(helper, args);
        s.push(IROp::SetPredFlags { src: flags });
    } else {
        s.call(helper, args);
    }
    true
}

fn do_brk2(s: &mut DisasContext<'_>, a: &RprS, op: BrkOp) -> bool {
    if !s.sve_access_check() {
        return true;
    }
    let args = vec![s.preg(a.rd), s.preg(a.rn), s.preg(a.pg), s.pdesc(0, 0)];
    let helper = Helper::Brk { op, flags: a.s };
    if a.s {
        let flags = s.call_ret(helper, args);
        s.push(IROp::SetPredFlags { src: flags });
    } else {
        s.call(helper, args);
    }
    true
}

trans!(brkpa, RprrS, |s, a| do_brk3(s, a, BrkOp::Pa));
trans!(brkpb, RprrS, |s, a| do_brk3(s, a, BrkOp::Pb));

trans!(brka_m, RprS, |s, a| do_brk2(s, a, BrkOp::Am));
trans!(brkb_m, RprS, |s, a| do_brk2(s, a, BrkOp::Bm));
trans!(brka_z, RprS, |s, a| do_brk2(s, a, BrkOp::Az));
trans!(brkb_z, RprS, |s, a| do_brk2(s, a, BrkOp::Bz));
// Pdm 同时是输入
trans!(brkn, RprS, |s, a| do_brk2(s, a, BrkOp::N));

// ----------------------------------------------------------------------
// 谓词计数
// ----------------------------------------------------------------------

/// 计算 pn & pg 中 esz 元素的活动个数
fn do_cntp(s: &mut DisasContext<'_>, esz: u8, pn: u32, pg: u32) -> Temp {
    let psz = s.pred_full_reg_size();

    if psz <= 8 {
        let val = s.load_env(pred_full_reg_offset(pn), MO_64);
        if pn != pg {
            let g = s.load_env(pred_full_reg_offset(pg), MO_64);
            s.binary(BinOp::And, val, val, g);
        }
        let psz_mask = if psz >= 8 { u64::MAX } else { (1u64 << (psz * 8)) - 1 };
        s.binary_imm(BinOp::And, val, val, PRED_ESZ_MASKS[esz as usize] & psz_mask);
        s.unary(UnOp::Ctpop, val, val);
        val
    } else {
        let args = vec![s.preg(pn), s.preg(pg), s.pdesc(esz, 0)];
        s.call_ret(Helper::Cntp, args)
    }
}

trans!(cntp, RprEsz, |s, a| {
    if s.sve_access_check() {
        let val = do_cntp(s, a.esz, a.rn, a.pg);
        s.write_xreg(a.rd, val);
    }
    true
});

trans!(incdecp_r, IncdecPred, |s, a| {
    if s.sve_access_check() {
        let reg = s.read_xreg(a.rd);
        let val = do_cntp(s, a.esz, a.pg, a.pg);
        let op = if a.d { BinOp::Sub } else { BinOp::Add };
        s.binary(op, reg, reg, val);
        s.write_xreg(a.rd, reg);
    }
    true
});

trans!(incdecp_z, IncdecPred, |s, a| {
    if a.esz == 0 {
        return false;
    }
    if s.sve_access_check() {
        let val = do_cntp(s, a.esz, a.pg, a.pg);
        let op = if a.d { Gvec3Op::Sub } else { Gvec3Op::Add };
        s.gen_gvec_fn_zzs(op, a.esz, a.rd, a.rd, val);
    }
    true
});

trans!(sincdecp_r_32, IncdecPred, |s, a| {
    if s.sve_access_check() {
        let reg = s.read_xreg(a.rd);
        let val = do_cntp(s, a.esz, a.pg, a.pg);
        s.do_sat_addsub_32(reg, val, a.u, a.d);
        s.write_xreg(a.rd, reg);
    }
    true
});

trans!(sincdecp_r_64, IncdecPred, |s, a| {
    if s.sve_access_check() {
        let reg = s.read_xreg(a.rd);
        let val = do_cntp(s, a.esz, a.pg, a.pg);
        s.do_sat_addsub_64(reg, val, a.u, a.d);
        s.write_xreg(a.rd, reg);
    }
    true
});

trans!(sincdecp_z, IncdecPred, |s, a| {
    if a.esz == 0 {
        return false;
    }
    if s.sve_access_check() {
        let val = do_cntp(s, a.esz, a.pg, a.pg);
        s.do_sat_addsub_vec(a.esz, a.rd, a.rd, val, a.u, a.d);
    }
    true
});

// ----------------------------------------------------------------------
// 标量比较
// ----------------------------------------------------------------------

/// 读通用寄存器，32 位形式零扩展
fn read_cpu_reg(s: &mut DisasContext<'_>, reg: u32, sf: bool) -> Temp {
    let v = s.read_xreg(reg);
    if !sf {
        s.unary(UnOp::Ext32u, v, v);
    }
    v
}

trans!(cterm, Cterm, |s, a| {
    if !s.sve_access_check() {
        return true;
    }
    let cond = if a.ne { Cond::Ne } else { Cond::Eq };
    let rn = read_cpu_reg(s, a.rn, a.sf);
    let rm = read_cpu_reg(s, a.rm, a.sf);
    let cmp = s.temp();
    s.setcond(cond, cmp, rn, rm);
    s.push(IROp::SetFlag { flag: Flag::N, src: cmp });

    // V = !N & !C
    let c = s.temp();
    s.push(IROp::ReadFlag { dst: c, flag: Flag::C });
    let v = s.temp();
    s.binary_imm(BinOp::Xor, v, cmp, 1);
    s.binary(BinOp::AndC, v, v, c);
    s.push(IROp::SetFlag { flag: Flag::V, src: v });
    true
});

/// WHILE 系列：把比较条件归结为“条件成立的迭代次数”，交给助手展开成谓词
fn do_while(s: &mut DisasContext<'_>, a: &While, helper: Helper) -> bool {
    if !s.sve_access_check() {
        return true;
    }

    let vsz = s.vec_full_reg_size();
    let op0 = s.read_xreg(a.rn);
    let op1 = s.read_xreg(a.rm);
    if !a.sf {
        let ext = if a.u { UnOp::Ext32u } else { UnOp::Ext32s };
        s.unary(ext, op0, op0);
        s.unary(ext, op1, op1);
    }

    let t0 = s.temp();
    let (maxval, cond) = if a.lt {
        s.binary(BinOp::Sub, t0, op1, op0);
        if a.u {
            let max = if a.sf { u64::MAX } else { u32::MAX as u64 };
            (max, if a.eq { Cond::Leu } else { Cond::Ltu })
        } else {
            let max = if a.sf { i64::MAX as u64 } else { i32::MAX as u64 };
            (max, if a.eq { Cond::Le } else { Cond::Lt })
        }
    } else {
        s.binary(BinOp::Sub, t0, op0, op1);
        if a.u {
            (0, if a.eq { Cond::Geu } else { Cond::Gtu })
        } else {
            let min = if a.sf { i64::MIN as u64 } else { i32::MIN as i64 as u64 };
            (min, if a.eq { Cond::Ge } else { Cond::Gt })
        }
    };

    let tmax = s.movi((vsz >> a.esz) as u64);
    if a.eq {
        // 含等号多一次迭代；op1 为极值时计数循环永不终止，直接取满
        s.binary_imm(BinOp::Add, t0, t0, 1);
        let t1 = s.movi(maxval);
        s.movcond(Cond::Eq, t0, op1, t1, tmax, t0);
    }

    s.binary(BinOp::Umin, t0, t0, tmax);

    let zero = s.movi(0);
    s.movcond(cond, t0, op0, op1, t0, zero);

    let args = vec![s.preg(a.rd), Arg::Temp(t0), s.pdesc(a.esz, 0)];
    let flags = s.call_ret(helper, args);
    s.push(IROp::SetPredFlags { src: flags });
    true
}

trans!(while_lt, While, |s, a| do_while(s, a, Helper::Whilel));
trans_feat!(while_gt, SVE2, While, |s, a| do_while(s, a, Helper::Whileg));

trans_feat!(while_ptr, SVE2, WhilePtr, |s, a| {
    if !s.sve_access_check() {
        return true;
    }

    let vsz = s.vec_full_reg_size();
    let op0 = s.read_xreg(a.rn);
    let op1 = s.read_xreg(a.rm);
    let tmax = s.movi((vsz >> a.esz) as u64);
    let diff = s.temp();

    if a.rw {
        // diff = |op1 - op0|，按无符号比较
        let t1 = s.temp();
        s.binary(BinOp::Sub, diff, op0, op1);
        s.binary(BinOp::Sub, t1, op1, op0);
        s.movcond(Cond::Geu, diff, op0, op1, diff, t1);
        s.binary_imm(BinOp::Shr, diff, diff, a.esz as u64);
        // 两指针相同时没有冲突
        s.movcond(Cond::Eq, diff, op0, op1, tmax, diff);
    } else {
        s.binary(BinOp::Sub, diff, op1, op0);
        s.binary_imm(BinOp::Shr, diff, diff, a.esz as u64);
        // op0 >= op1 时写在读之后，没有冲突
        s.movcond(Cond::Geu, diff, op0, op1, tmax, diff);
    }

    s.binary(BinOp::Umin, diff, diff, tmax);

    let args = vec![s.preg(a.rd), Arg::Temp(diff), s.pdesc(a.esz, 0)];
    let flags = s.call_ret(Helper::Whilel, args);
    s.push(IROp::SetPredFlags { src: flags });
    true
});
