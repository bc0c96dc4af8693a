//! 翻译器测试
//!
//! 覆盖拒绝路径、访问检查、特性门控与临时值释放

use sve_core::{DecodeError, IsaFeatures, SveConfig, SveError};
use sve_frontend::encode::*;
use sve_frontend::{DecodeContext, Outcome, SveTranslator, translate_insn};
use sve_ir::layout::vec_full_reg_offset;
use sve_ir::{Gvec3Op, IRBuilder, IROp};

fn ctx(vl: u32, features: IsaFeatures) -> DecodeContext {
    DecodeContext {
        vl_bytes: vl,
        features,
        sve_enabled: true,
        mte_active: false,
        big_endian: false,
    }
}

fn translate(ctx: &DecodeContext, insn: u32) -> (Outcome, IRBuilder) {
    let mut b = IRBuilder::new();
    let out = translate_insn(ctx, &mut b, insn);
    (out, b)
}

/// 常用指令集合，字段都合法
fn accepted_insns() -> Vec<u32> {
    vec![
        add_zzz(2, 0, 1, 2),
        sqadd_zzz(0, 3, 4, 5),
        add_zpzz(1, 0, 1, 2),
        sdiv_zpzz(3, 0, 1, 2),
        neg(2, 0, 1, 2),
        uaddv(0, 0, 1, 2),
        andv(3, 0, 1, 2),
        mla(2, 0, 1, 2, 3),
        asr_zpzi(2, 0, 1, 32),
        lsr_zpzi(1, 0, 1, 16),
        lsr_zzi(0, 0, 1, 8),
        index_rr(3, 0, 1, 2),
        dup_s(2, 0, 1),
        cnt_r(1, 0, 31, 4),
        rdvl(0, -1),
        zip1_z(1, 0, 1, 2),
        tbl(2, 0, 1, 2),
        compact(3, 0, 1, 2),
        sel_zpzz(2, 0, 1, 2, 3),
        clastb_z(2, 0, 1, 2),
        lastb_r(3, 0, 1, 2),
        ptrue(2, 0, 31),
        ptrues(0, 1, 9),
        pfalse(2),
        setffr(),
        rdffr(3),
        ptest(1, 2),
        and_pppp(0, 1, 2, 3, true),
        brka_z(0, 1, 2, true),
        cntp(1, 0, 1, 2),
        whilelt(0, 0, 1, 2, true),
        whilelo(3, 0, 1, 2, false),
        cmpeq_ppzz(1, 0, 1, 2, 3),
        cmpgt_ppzi(2, 0, 1, 2, -4),
        fadd_zzz(2, 0, 1, 2),
        fmla_zpzzz(3, 0, 1, 2, 3),
        faddv(1, 0, 1, 2),
        fadda(3, 0, 1, 2),
        frintn(2, 0, 1, 2),
        fdup(3, 0, 0x70),
        ld1_zprr(10, 0, 1, 2, 3),
        ld1_zpri(15, 0, 1, 2, -1),
        ldff1_zprr(5, 0, 1, 2, 31),
        ldnf1_zpri(0, 0, 1, 2, 3),
        st1_zprr(0, 3, 0, 1, 2, 3),
        st1_zpri(2, 2, 0, 1, 2, -8),
        ldn_zprr(3, 2, 0, 1, 2, 3),
        ldr_zri(0, 1, -2),
        str_zri(0, 1, 17),
        ldr_pri(0, 1, 3),
        ld1r(10, 0, 1, 2, 4),
        ld1d_gather64(0, 1, 2, 3, true, true),
        st1d_scatter64(0, 1, 2, 3, false),
        eor3(0, 1, 2),
        saddlb(2, 0, 1, 2),
        shrnb(1, 0, 1, 3),
        match_ppzz(0, 0, 1, 2, 3),
    ]
}

#[cfg(test)]
mod emission_tests {
    use super::*;

    // Test 1: ADD_zzz 翻译为单个覆盖整个向量的 gvec 操作
    #[test]
    fn test_add_zzz_single_gvec_op() {
        let c = ctx(48, IsaFeatures::SVE);
        let (out, b) = translate(&c, add_zzz(3, 4, 5, 6));
        assert_eq!(out, Outcome::Emitted);
        assert_eq!(
            b.ops(),
            &[IROp::Gvec3 {
                op: Gvec3Op::Add,
                esz: 3,
                dofs: vec_full_reg_offset(4),
                aofs: vec_full_reg_offset(5),
                bofs: vec_full_reg_offset(6),
                oprsz: 48,
                maxsz: 48,
            }]
        );
    }

    // Test 2: 每条指令结束后临时值全部释放
    #[test]
    fn test_temps_released_after_each_insn() {
        for vl in [16, 80, 256] {
            let c = ctx(vl, IsaFeatures::all());
            let mut b = IRBuilder::new();
            for insn in accepted_insns() {
                let out = translate_insn(&c, &mut b, insn);
                assert_eq!(out, Outcome::Emitted, "{insn:08x} at vl {vl}");
                assert_eq!(b.live_temps(), 0, "{insn:08x} at vl {vl}");
            }
        }
    }

    // Test 3: 访问检查失败时每条指令只发射一个陷入
    #[test]
    fn test_access_disabled_emits_only_trap() {
        let mut c = ctx(32, IsaFeatures::all());
        c.sve_enabled = false;
        for insn in [
            add_zzz(2, 0, 1, 2),
            uaddv(0, 0, 1, 2),
            clastb_z(2, 0, 1, 2),
            lsr_zpzi(1, 0, 1, 16),
            whilelt(0, 0, 1, 2, true),
            ld1_zprr(10, 0, 1, 2, 3),
            ldff1_zprr(15, 0, 1, 2, 31),
            faddv(2, 0, 1, 2),
        ] {
            let (out, b) = translate(&c, insn);
            assert_eq!(out, Outcome::Emitted);
            assert_eq!(b.ops(), &[IROp::AccessTrap], "{insn:08x}");
        }
    }

    // Test 4: 字段不合法时即使访问被禁用也先拒绝
    #[test]
    fn test_reject_precedes_access_check() {
        let mut c = ctx(32, IsaFeatures::SVE);
        c.sve_enabled = false;
        let (out, b) = translate(&c, ld1_zprr(10, 0, 1, 2, 31));
        assert_eq!(out, Outcome::Rejected { name: "LD1_zprr" });
        assert!(b.ops().is_empty());
    }
}

#[cfg(test)]
mod reject_tests {
    use super::*;

    // Test 1: 偏移寄存器为 XZR 的 LD1 被拒绝
    #[test]
    fn test_ld1_rm_xzr_rejected() {
        let c = ctx(32, IsaFeatures::SVE);
        let (out, b) = translate(&c, ld1_zprr(10, 0, 1, 2, 31));
        assert_eq!(out, Outcome::Rejected { name: "LD1_zprr" });
        assert!(b.ops().is_empty());
        // 首次故障形式允许 XZR
        assert_eq!(translate(&c, ldff1_zprr(10, 0, 1, 2, 31)).0, Outcome::Emitted);
    }

    // Test 2: 元素大小不支持的组合被拒绝
    #[test]
    fn test_unsupported_element_sizes() {
        let c = ctx(32, IsaFeatures::SVE);
        assert_eq!(translate(&c, compact(0, 0, 1, 2)).0, Outcome::Rejected { name: "COMPACT" });
        assert_eq!(translate(&c, faddv(0, 0, 1, 2)).0, Outcome::Rejected { name: "FADDV" });
    }

    // Test 3: SVE2 指令在只有 SVE 时报告缺失特性
    #[test]
    fn test_sve2_feature_gate() {
        let c = ctx(32, IsaFeatures::SVE);
        for (insn, name) in [
            (eor3(0, 1, 2), "EOR3"),
            (saddlb(2, 0, 1, 2), "SADDLB"),
            (shrnb(1, 0, 1, 3), "SHRNB"),
            (match_ppzz(0, 0, 1, 2, 3), "MATCH"),
        ] {
            let (out, b) = translate(&c, insn);
            assert_eq!(out, Outcome::FeatureUnavailable { name, feature: IsaFeatures::SVE2 });
            assert!(b.ops().is_empty());
        }
    }

    // Test 4: 缺失特性映射为带特性名的译码错误
    #[test]
    fn test_feature_error_message() {
        let insn = eor3(0, 1, 2);
        let out = translate(&ctx(32, IsaFeatures::SVE), insn).0;
        match out.into_result(insn) {
            Err(SveError::Decode { source: DecodeError::FeatureUnavailable { name, feature, .. }, .. }) => {
                assert_eq!(name, "EOR3");
                assert_eq!(feature, "SVE2");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[cfg(test)]
mod block_tests {
    use super::*;

    // Test 1: 块翻译在第一条被拒绝的指令处返回错误
    #[test]
    fn test_block_stops_at_unallocated() {
        let t = SveTranslator::new(ctx(32, IsaFeatures::SVE));
        let err = t.translate_block(&[add_zzz(0, 0, 1, 2), 0]).unwrap_err();
        assert!(matches!(err, SveError::Decode { source: DecodeError::Unallocated(0), .. }));
    }

    // Test 2: 从配置构造时使用配置的向量长度
    #[test]
    fn test_from_config_uses_vector_length() {
        let config = SveConfig::default().with_vl(64);
        let t = SveTranslator::from_config(&config);
        assert_eq!(t.context().vl_bytes, 64);
        let block = t.translate_block(&[add_zzz(0, 0, 1, 2)]).unwrap();
        assert!(matches!(block.ops[0], IROp::Gvec3 { oprsz: 64, maxsz: 64, .. }));
    }

    // Test 3: 多条指令的块保留程序顺序
    #[test]
    fn test_block_keeps_program_order() {
        let t = SveTranslator::new(ctx(16, IsaFeatures::SVE));
        let block = t.translate_block(&[add_zzz(0, 0, 1, 2), sub_zzz(0, 3, 4, 5)]).unwrap();
        let ops: Vec<_> = block
            .ops
            .iter()
            .filter_map(|op| match op {
                IROp::Gvec3 { op, .. } => Some(*op),
                _ => None,
            })
            .collect();
        assert_eq!(ops, vec![Gvec3Op::Add, Gvec3Op::Sub]);
    }
}
