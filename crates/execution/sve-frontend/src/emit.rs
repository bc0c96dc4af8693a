//! 向量操作发射库
//!
//! 翻译函数通过这里的原语发射 gvec 操作或出线助手调用。
//! 向量操作的 oprsz 与 maxsz 都取 VL；谓词操作取 `pred_gvec_reg_size`。

use sve_ir::layout::{PREG_TMP, pred_full_reg_offset, vec_full_reg_offset};
use sve_ir::{
    Arg, BinOp, Cond, FpStatus, Gvec2Op, Gvec2iOp, Gvec3Op, Gvec4Op, Helper, IROp, MemOp, Temp,
    UnOp, ZpzOp, ZpzzOp, pred_desc, simd_desc,
};

use crate::args::RprrS;
use crate::ctx::DisasContext;

impl DisasContext<'_> {
    /// 整向量助手描述符，oprsz 与 maxsz 均为 VL
    pub(crate) fn vdesc(&self, data: i32) -> Arg {
        let vsz = self.vec_full_reg_size();
        Arg::Desc(simd_desc(vsz, vsz, data))
    }

    pub(crate) fn zreg(&self, reg: u32) -> Arg {
        Arg::Env(vec_full_reg_offset(reg))
    }

    pub(crate) fn preg(&self, reg: u32) -> Arg {
        Arg::Env(pred_full_reg_offset(reg))
    }

    /// 谓词助手描述符
    pub(crate) fn pdesc(&self, esz: u8, data: u32) -> Arg {
        Arg::Desc(pred_desc(self.pred_full_reg_size(), esz, data))
    }

    // ------------------------------------------------------------------
    // 内联 gvec 操作
    // ------------------------------------------------------------------

    pub(crate) fn gen_gvec_fn_zz(&mut self, op: Gvec2Op, esz: u8, rd: u32, rn: u32) {
        let vsz = self.vec_full_reg_size();
        self.push(IROp::Gvec2 {
            op,
            esz,
            dofs: vec_full_reg_offset(rd),
            aofs: vec_full_reg_offset(rn),
            oprsz: vsz,
            maxsz: vsz,
        });
    }

    pub(crate) fn gen_gvec_fn_zzi(&mut self, op: Gvec2iOp, esz: u8, rd: u32, rn: u32, imm: i64) {
        let vsz = self.vec_full_reg_size();
        self.push(IROp::Gvec2i {
            op,
            esz,
            dofs: vec_full_reg_offset(rd),
            aofs: vec_full_reg_offset(rn),
            imm,
            oprsz: vsz,
            maxsz: vsz,
        });
    }

    pub(crate) fn gen_gvec_fn_zzs(&mut self, op: Gvec3Op, esz: u8, rd: u32, rn: u32, src: Temp) {
        let vsz = self.vec_full_reg_size();
        self.push(IROp::Gvec2s {
            op,
            esz,
            dofs: vec_full_reg_offset(rd),
            aofs: vec_full_reg_offset(rn),
            src,
            oprsz: vsz,
            maxsz: vsz,
        });
    }

    pub(crate) fn gen_gvec_fn_zzz(&mut self, op: Gvec3Op, esz: u8, rd: u32, rn: u32, rm: u32) {
        let vsz = self.vec_full_reg_size();
        self.push(IROp::Gvec3 {
            op,
            esz,
            dofs: vec_full_reg_offset(rd),
            aofs: vec_full_reg_offset(rn),
            bofs: vec_full_reg_offset(rm),
            oprsz: vsz,
            maxsz: vsz,
        });
    }

    pub(crate) fn gen_gvec_fn_zzzz(&mut self, op: Gvec4Op, rd: u32, rn: u32, rm: u32, ra: u32) {
        let vsz = self.vec_full_reg_size();
        self.push(IROp::Gvec4 {
            op,
            dofs: vec_full_reg_offset(rd),
            aofs: vec_full_reg_offset(rn),
            bofs: vec_full_reg_offset(rm),
            cofs: vec_full_reg_offset(ra),
            oprsz: vsz,
            maxsz: vsz,
        });
    }

    /// 四谓词操作：d = op(n, m, g)
    pub(crate) fn gen_gvec_fn_pppp(&mut self, op: Gvec4Op, rd: u32, rn: u32, rm: u32, pg: u32) {
        let psz = self.pred_gvec_reg_size();
        self.push(IROp::Gvec4 {
            op,
            dofs: pred_full_reg_offset(rd),
            aofs: pred_full_reg_offset(rn),
            bofs: pred_full_reg_offset(rm),
            cofs: pred_full_reg_offset(pg),
            oprsz: psz,
            maxsz: psz,
        });
    }

    /// 三谓词无控制操作：d = op(n, m)
    pub(crate) fn gen_gvec_fn_ppp(&mut self, op: Gvec3Op, rd: u32, rn: u32, rm: u32) {
        let psz = self.pred_gvec_reg_size();
        self.push(IROp::Gvec3 {
            op,
            esz: 0,
            dofs: pred_full_reg_offset(rd),
            aofs: pred_full_reg_offset(rn),
            bofs: pred_full_reg_offset(rm),
            oprsz: psz,
            maxsz: psz,
        });
    }

    pub(crate) fn do_mov_z(&mut self, rd: u32, rn: u32) {
        self.gen_gvec_fn_zz(Gvec2Op::Mov, 0, rd, rn);
    }

    /// 按谓词 gvec 大小复制，`dofs`/`aofs` 为 env 偏移
    pub(crate) fn do_mov_p_ofs(&mut self, dofs: u32, aofs: u32) {
        let psz = self.pred_gvec_reg_size();
        self.push(IROp::Gvec2 {
            op: Gvec2Op::Mov,
            esz: 0,
            dofs,
            aofs,
            oprsz: psz,
            maxsz: psz,
        });
    }

    pub(crate) fn do_mov_p(&mut self, rd: u32, rn: u32) {
        self.do_mov_p_ofs(pred_full_reg_offset(rd), pred_full_reg_offset(rn));
    }

    pub(crate) fn do_dupi_z(&mut self, esz: u8, rd: u32, imm: u64) {
        let vsz = self.vec_full_reg_size();
        self.push(IROp::GvecDupImm {
            esz,
            dofs: vec_full_reg_offset(rd),
            oprsz: vsz,
            maxsz: vsz,
            imm,
        });
    }

    pub(crate) fn do_dup_z(&mut self, esz: u8, rd: u32, src: Temp) {
        let vsz = self.vec_full_reg_size();
        self.push(IROp::GvecDupTemp {
            esz,
            dofs: vec_full_reg_offset(rd),
            oprsz: vsz,
            maxsz: vsz,
            src,
        });
    }

    // ------------------------------------------------------------------
    // 出线助手
    // ------------------------------------------------------------------

    pub(crate) fn gen_gvec_ool_zz(&mut self, helper: Helper, rd: u32, rn: u32, data: i32) {
        let args = vec![self.zreg(rd), self.zreg(rn), self.vdesc(data)];
        self.call(helper, args);
    }

    pub(crate) fn gen_gvec_ool_zzz(&mut self, helper: Helper, rd: u32, rn: u32, rm: u32, data: i32) {
        let args = vec![self.zreg(rd), self.zreg(rn), self.zreg(rm), self.vdesc(data)];
        self.call(helper, args);
    }

    pub(crate) fn gen_gvec_ool_zzzz(
        &mut self,
        helper: Helper,
        rd: u32,
        rn: u32,
        rm: u32,
        ra: u32,
        data: i32,
    ) {
        let args = vec![
            self.zreg(rd),
            self.zreg(rn),
            self.zreg(rm),
            self.zreg(ra),
            self.vdesc(data),
        ];
        self.call(helper, args);
    }

    pub(crate) fn gen_gvec_ool_zzp(&mut self, helper: Helper, rd: u32, rn: u32, pg: u32, data: i32) {
        let args = vec![self.zreg(rd), self.zreg(rn), self.preg(pg), self.vdesc(data)];
        self.call(helper, args);
    }

    pub(crate) fn gen_gvec_ool_zzzp(
        &mut self,
        helper: Helper,
        rd: u32,
        rn: u32,
        rm: u32,
        pg: u32,
        data: i32,
    ) {
        let args = vec![
            self.zreg(rd),
            self.zreg(rn),
            self.zreg(rm),
            self.preg(pg),
            self.vdesc(data),
        ];
        self.call(helper, args);
    }

    /// (d, n, val, desc)：向量与标量
    pub(crate) fn gen_gvec_ool_zzi(&mut self, helper: Helper, rd: u32, rn: u32, val: Temp, data: i32) {
        let args = vec![self.zreg(rd), self.zreg(rn), Arg::Temp(val), self.vdesc(data)];
        self.call(helper, args);
    }

    /// (d, a, n, m, g, desc)：带谓词的乘加
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn gen_gvec_ool_zzzzp(
        &mut self,
        helper: Helper,
        rd: u32,
        ra: u32,
        rn: u32,
        rm: u32,
        pg: u32,
        data: i32,
    ) {
        let args = vec![
            self.zreg(rd),
            self.zreg(ra),
            self.zreg(rn),
            self.zreg(rm),
            self.preg(pg),
            self.vdesc(data),
        ];
        self.call(helper, args);
    }

    pub(crate) fn gen_gvec_fpst_zz(&mut self, helper: Helper, rd: u32, rn: u32, data: i32, fpst: FpStatus) {
        let args = vec![self.zreg(rd), self.zreg(rn), Arg::Fpst(fpst), self.vdesc(data)];
        self.call(helper, args);
    }

    pub(crate) fn gen_gvec_fpst_zzz(
        &mut self,
        helper: Helper,
        rd: u32,
        rn: u32,
        rm: u32,
        data: i32,
        fpst: FpStatus,
    ) {
        let args = vec![
            self.zreg(rd),
            self.zreg(rn),
            self.zreg(rm),
            Arg::Fpst(fpst),
            self.vdesc(data),
        ];
        self.call(helper, args);
    }

    pub(crate) fn gen_gvec_fpst_zzp(
        &mut self,
        helper: Helper,
        rd: u32,
        rn: u32,
        pg: u32,
        data: i32,
        fpst: FpStatus,
    ) {
        let args = vec![
            self.zreg(rd),
            self.zreg(rn),
            self.preg(pg),
            Arg::Fpst(fpst),
            self.vdesc(data),
        ];
        self.call(helper, args);
    }

    pub(crate) fn gen_gvec_fpst_zzzp(
        &mut self,
        helper: Helper,
        rd: u32,
        rn: u32,
        rm: u32,
        pg: u32,
        data: i32,
        fpst: FpStatus,
    ) {
        let args = vec![
            self.zreg(rd),
            self.zreg(rn),
            self.zreg(rm),
            self.preg(pg),
            Arg::Fpst(fpst),
            self.vdesc(data),
        ];
        self.call(helper, args);
    }

    pub(crate) fn gen_gvec_fpst_zzzz(
        &mut self,
        helper: Helper,
        rd: u32,
        rn: u32,
        rm: u32,
        ra: u32,
        data: i32,
        fpst: FpStatus,
    ) {
        let args = vec![
            self.zreg(rd),
            self.zreg(rn),
            self.zreg(rm),
            self.zreg(ra),
            Arg::Fpst(fpst),
            self.vdesc(data),
        ];
        self.call(helper, args);
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn gen_gvec_fpst_zzzzp(
        &mut self,
        helper: Helper,
        rd: u32,
        rn: u32,
        rm: u32,
        ra: u32,
        pg: u32,
        data: i32,
        fpst: FpStatus,
    ) {
        let args = vec![
            self.zreg(rd),
            self.zreg(rn),
            self.zreg(rm),
            self.zreg(ra),
            self.preg(pg),
            Arg::Fpst(fpst),
            self.vdesc(data),
        ];
        self.call(helper, args);
    }

    /// 按谓词选择：活动元素取 rn，其余取 rm
    pub(crate) fn do_sel_z(&mut self, rd: u32, rn: u32, rm: u32, pg: u32, esz: u8) {
        self.gen_gvec_ool_zzzp(Helper::Zpzz { op: ZpzzOp::Sel, esz }, rd, rn, rm, pg, 0);
    }

    /// 按谓词清零；`invert` 时清零活动元素
    pub(crate) fn do_movz_zpz(&mut self, rd: u32, rn: u32, pg: u32, esz: u8, invert: bool) {
        self.gen_gvec_ool_zzp(
            Helper::Zpz {
                op: ZpzOp::Movz,
                esz,
            },
            rd,
            rn,
            pg,
            invert as i32,
        );
    }

    /// 活动元素写入标量 `val`，其余取 rn
    pub(crate) fn do_cpy_m(&mut self, esz: u8, rd: u32, rn: u32, pg: u32, val: Temp) {
        let args = vec![
            self.zreg(rd),
            self.zreg(rn),
            self.preg(pg),
            Arg::Temp(val),
            self.vdesc(0),
        ];
        self.call(Helper::CpyM { esz }, args);
    }

    // ------------------------------------------------------------------
    // 标量与寄存器文件
    // ------------------------------------------------------------------

    pub(crate) fn read_xreg(&mut self, reg: u32) -> Temp {
        let dst = self.temp();
        self.push(IROp::ReadXreg {
            dst,
            reg: reg as u8,
            sp: false,
        });
        dst
    }

    pub(crate) fn read_xreg_sp(&mut self, reg: u32) -> Temp {
        let dst = self.temp();
        self.push(IROp::ReadXreg {
            dst,
            reg: reg as u8,
            sp: true,
        });
        dst
    }

    pub(crate) fn write_xreg(&mut self, reg: u32, src: Temp) {
        self.push(IROp::WriteXreg {
            reg: reg as u8,
            src,
            sp: false,
        });
    }

    pub(crate) fn write_xreg_sp(&mut self, reg: u32, src: Temp) {
        self.push(IROp::WriteXreg {
            reg: reg as u8,
            src,
            sp: true,
        });
    }

    /// 写标量浮点寄存器：低 64 位写入 `val`，其余清零
    pub(crate) fn write_fp_dreg(&mut self, rd: u32, val: Temp) {
        self.do_dupi_z(3, rd, 0);
        self.store_env(val, vec_full_reg_offset(rd), MemOp::unsigned(3));
    }

    /// 按元素大小零/符号扩展
    pub(crate) fn ext_esz(&mut self, dst: Temp, src: Temp, esz: u8, signed: bool) {
        let op = match (esz, signed) {
            (0, false) => UnOp::Ext8u,
            (0, true) => UnOp::Ext8s,
            (1, false) => UnOp::Ext16u,
            (1, true) => UnOp::Ext16s,
            (2, false) => UnOp::Ext32u,
            (2, true) => UnOp::Ext32s,
            _ => {
                self.mov(dst, src);
                return;
            }
        };
        self.unary(op, dst, src);
    }

    /// 从 env 中 `base + index` 处加载一个 esz 元素（零扩展）
    pub(crate) fn load_esz(&mut self, base: u32, index: Temp, esz: u8) -> Temp {
        let dst = self.temp();
        self.push(IROp::LoadEnv {
            dst,
            ofs: base,
            mop: MemOp::unsigned(esz),
            index: Some(index),
        });
        dst
    }

    // ------------------------------------------------------------------
    // PredTest
    // ------------------------------------------------------------------

    /// 单字 PredTest：谓词不超过 64 位时直接在临时值上计算
    pub(crate) fn do_predtest1(&mut self, d: Temp, g: Temp) {
        let flags = self.call_ret(Helper::PredTest1, vec![Arg::Temp(d), Arg::Temp(g)]);
        self.push(IROp::SetPredFlags { src: flags });
    }

    /// 多字 PredTest，`words` 为 64 位字数
    pub(crate) fn do_predtest(&mut self, dofs: u32, gofs: u32, words: u32) {
        let flags = self.call_ret(
            Helper::PredTest,
            vec![Arg::Env(dofs), Arg::Env(gofs), Arg::Desc(words)],
        );
        self.push(IROp::SetPredFlags { src: flags });
    }

    /// 谓词逻辑运算，可选同时计算 PredTest
    ///
    /// 写 rd 之前先保存 pg：rd 与 pg 相同时 PredTest 需要原始的控制谓词。
    pub(crate) fn do_pppp_flags(&mut self, a: &RprrS, op: Gvec4Op) -> bool {
        if !self.sve_access_check() {
            return true;
        }

        let psz = self.pred_full_reg_size();
        if !a.s {
            self.gen_gvec_fn_pppp(op, a.rd, a.rn, a.rm, a.pg);
            return true;
        }

        if psz <= 8 {
            // 一个字即可容纳：先把三个源读入临时值
            let mop = MemOp::unsigned(3);
            let pn = self.load_env(pred_full_reg_offset(a.rn), mop);
            let pm = self.load_env(pred_full_reg_offset(a.rm), mop);
            let pg = self.load_env(pred_full_reg_offset(a.pg), mop);
            let pd = self.temp();
            gen_pred_op_i64(self, op, pd, pn, pm, pg);
            self.store_env(pd, pred_full_reg_offset(a.rd), mop);
            self.do_predtest1(pd, pg);
        } else {
            let mut gofs = pred_full_reg_offset(a.pg);
            if a.rd == a.pg {
                self.do_mov_p_ofs(PREG_TMP, gofs);
                gofs = PREG_TMP;
            }
            let psz_gvec = self.pred_gvec_reg_size();
            self.push(IROp::Gvec4 {
                op,
                dofs: pred_full_reg_offset(a.rd),
                aofs: pred_full_reg_offset(a.rn),
                bofs: pred_full_reg_offset(a.rm),
                cofs: gofs,
                oprsz: psz_gvec,
                maxsz: psz_gvec,
            });
            self.do_predtest(pred_full_reg_offset(a.rd), gofs, psz.div_ceil(8));
        }
        true
    }

    // ------------------------------------------------------------------
    // 最后活动元素
    // ------------------------------------------------------------------

    /// 最后一个活动元素的字节偏移；没有活动元素时为 `-(1 << esz)`
    pub(crate) fn find_last_active(&mut self, pg: u32, esz: u8) -> Temp {
        let args = vec![self.preg(pg), self.pdesc(esz, 0)];
        self.call_ret(Helper::LastActiveElement, args)
    }

    /// 偏移加一个元素，超过 VL 时回绕到 0
    pub(crate) fn incr_last_active(&mut self, last: Temp, esz: u8) {
        let vsz = self.vec_full_reg_size();
        self.binary_imm(BinOp::Add, last, last, 1u64 << esz);
        if vsz.is_power_of_two() {
            self.binary_imm(BinOp::And, last, last, (vsz - 1) as u64);
        } else {
            let max = self.movi(vsz as u64);
            let zero = self.movi(0);
            self.movcond(Cond::Geu, last, last, max, zero, last);
        }
    }

    /// 负偏移映射到最后一个元素
    pub(crate) fn wrap_last_active(&mut self, last: Temp, esz: u8) {
        let vsz = self.vec_full_reg_size();
        if vsz.is_power_of_two() {
            self.binary_imm(BinOp::And, last, last, (vsz - 1) as u64);
        } else {
            let max = self.movi((vsz - (1 << esz)) as u64);
            let zero = self.movi(0);
            self.movcond(Cond::Lt, last, last, zero, max, last);
        }
    }

    /// 加载 rn 中偏移为 `last` 的元素
    pub(crate) fn load_last_active(&mut self, rn: u32, last: Temp, esz: u8) -> Temp {
        self.load_esz(vec_full_reg_offset(rn), last, esz)
    }

    // ------------------------------------------------------------------
    // 饱和加减
    // ------------------------------------------------------------------

    /// 32 位饱和加减：在 64 位中运算后用比较选择夹紧
    pub(crate) fn do_sat_addsub_32(&mut self, reg: Temp, val: Temp, u: bool, d: bool) {
        self.ext_esz(reg, reg, 2, !u);
        if d {
            self.binary(BinOp::Sub, reg, reg, val);
            let bound = self.movi(if u { 0 } else { i32::MIN as i64 as u64 });
            self.binary(BinOp::Smax, reg, reg, bound);
        } else {
            self.binary(BinOp::Add, reg, reg, val);
            let bound = self.movi(if u { u32::MAX as u64 } else { i32::MAX as u64 });
            self.binary(BinOp::Smin, reg, reg, bound);
        }
    }

    /// 64 位饱和加减：通过比较检测进位与溢出
    pub(crate) fn do_sat_addsub_64(&mut self, reg: Temp, val: Temp, u: bool, d: bool) {
        let t0 = self.temp();
        let zero = self.movi(0);
        if u {
            if d {
                self.binary(BinOp::Sub, t0, reg, val);
                self.movcond(Cond::Ltu, reg, reg, val, zero, t0);
            } else {
                self.binary(BinOp::Add, t0, reg, val);
                let ones = self.movi(u64::MAX);
                self.movcond(Cond::Ltu, reg, t0, reg, ones, t0);
            }
        } else {
            let t1 = self.temp();
            if d {
                // 异号相减才可能溢出
                self.binary(BinOp::Xor, t0, reg, val);
                self.binary(BinOp::Sub, t1, reg, val);
                self.binary(BinOp::Xor, reg, reg, t1);
                self.binary(BinOp::And, t0, t0, reg);
                let min = self.movi(i64::MIN as u64);
                self.movcond(Cond::Lt, reg, t0, zero, min, t1);
            } else {
                // 同号相加才可能溢出
                self.binary(BinOp::Xor, t0, reg, val);
                self.binary(BinOp::Add, reg, reg, val);
                self.binary(BinOp::Xor, t1, reg, val);
                self.binary(BinOp::AndC, t0, t1, t0);
                let max = self.movi(i64::MAX as u64);
                self.movcond(Cond::Lt, reg, t0, zero, max, reg);
            }
        }
    }

    /// 向量饱和加减标量
    pub(crate) fn do_sat_addsub_vec(&mut self, esz: u8, rd: u32, rn: u32, val: Temp, u: bool, d: bool) {
        let op = match (u, d) {
            (false, false) => Gvec3Op::SsAdd,
            (true, false) => Gvec3Op::UsAdd,
            (false, true) => Gvec3Op::SsSub,
            (true, true) => Gvec3Op::UsSub,
        };
        self.gen_gvec_fn_zzs(op, esz, rd, rn, val);
    }
}

/// 在 64 位临时值上计算谓词运算
fn gen_pred_op_i64(s: &mut DisasContext<'_>, op: Gvec4Op, d: Temp, n: Temp, m: Temp, g: Temp) {
    match op {
        Gvec4Op::AndPg => {
            s.binary(BinOp::And, d, n, m);
            s.binary(BinOp::And, d, d, g);
        }
        Gvec4Op::BicPg => {
            s.binary(BinOp::AndC, d, n, m);
            s.binary(BinOp::And, d, d, g);
        }
        Gvec4Op::EorPg => {
            s.binary(BinOp::Xor, d, n, m);
            s.binary(BinOp::And, d, d, g);
        }
        Gvec4Op::OrrPg => {
            s.binary(BinOp::Or, d, n, m);
            s.binary(BinOp::And, d, d, g);
        }
        Gvec4Op::OrnPg => {
            let t = s.temp();
            s.unary(UnOp::Not, t, m);
            s.binary(BinOp::Or, d, n, t);
            s.binary(BinOp::And, d, d, g);
        }
        Gvec4Op::NorPg => {
            s.binary(BinOp::Or, d, n, m);
            s.binary(BinOp::AndC, d, g, d);
        }
        Gvec4Op::NandPg => {
            s.binary(BinOp::And, d, n, m);
            s.binary(BinOp::AndC, d, g, d);
        }
        Gvec4Op::SelPg => {
            let t = s.temp();
            s.binary(BinOp::And, t, n, g);
            s.binary(BinOp::AndC, d, m, g);
            s.binary(BinOp::Or, d, d, t);
        }
        _ => unreachable!("not a predicate op: {:?}", op),
    }
}
