//! 译码器测试
//!
//! 字段提取的属性测试，以及对整个 32 位编码空间的随机扫描

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sve_frontend::args::{Ptrue, RprrLoad, RpriTsz, RrrEsz, While};
use sve_frontend::encode::*;
use sve_frontend::{DecodeContext, DecodedArgs, Outcome, decode, pattern_names, translate_insn};
use sve_ir::IRBuilder;

/// SVE 编码组：bits[28:25] == 0b0010
fn in_sve_space(insn: u32) -> bool {
    (insn >> 25) & 0xf == 0b0010
}

// ============================================================================
// 字段提取属性测试
// ============================================================================

// 属性测试: ADD_zzz 的寄存器与元素大小字段
proptest! {
    #[test]
    fn prop_add_zzz_fields(esz in 0u8..4, rd in 0u32..32, rn in 0u32..32, rm in 0u32..32) {
        let d = decode(add_zzz(esz, rd, rn, rm)).unwrap();
        prop_assert_eq!(d.name, "ADD_zzz");
        prop_assert_eq!(d.args, DecodedArgs::RrrEsz(RrrEsz { rd, rn, rm, esz }));
    }
}

// 属性测试: WHILE 的符号与宽度位
proptest! {
    #[test]
    fn prop_while_fields(esz in 0u8..4, pd in 0u32..16, rn in 0u32..32, rm in 0u32..32, sf in any::<bool>(), u in any::<bool>()) {
        let insn = if u { whilelo(esz, pd, rn, rm, sf) } else { whilelt(esz, pd, rn, rm, sf) };
        let d = decode(insn).unwrap();
        prop_assert_eq!(d.name, "WHILE_lt");
        prop_assert_eq!(
            d.args,
            DecodedArgs::While(While { rd: pd, rn, rm, esz, sf, u, lt: true, eq: false })
        );
    }
}

// 属性测试: PTRUE/PTRUES 的模式字段
proptest! {
    #[test]
    fn prop_ptrue_fields(esz in 0u8..4, pd in 0u32..16, pat in 0u32..32, s in any::<bool>()) {
        let insn = if s { ptrues(esz, pd, pat) } else { ptrue(esz, pd, pat) };
        let d = decode(insn).unwrap();
        prop_assert_eq!(d.args, DecodedArgs::Ptrue(Ptrue { rd: pd, pat, esz, s }));
    }
}

// 属性测试: 右移立即数由 tsz:imm3 还原
proptest! {
    #[test]
    fn prop_lsr_zpzi_shift(esz in 0u8..4, shift_seed in any::<u32>(), rdn in 0u32..32, pg in 0u32..8) {
        let shift = shift_seed % (8 << esz) + 1;
        let d = decode(lsr_zpzi(esz, rdn, pg, shift)).unwrap();
        prop_assert_eq!(d.name, "LSR_zpzi");
        prop_assert_eq!(
            d.args,
            DecodedArgs::RpriTsz(RpriTsz { rd: rdn, pg, rn: rdn, imm: shift, esz: esz as i32 })
        );
    }
}

// 属性测试: 连续加载的 dtype 字段
proptest! {
    #[test]
    fn prop_ld1_dtype(dtype in 0u32..16, zt in 0u32..32, pg in 0u32..8, rn in 0u32..32, rm in 0u32..31) {
        let d = decode(ld1_zprr(dtype, zt, pg, rn, rm)).unwrap();
        prop_assert_eq!(d.name, "LD1_zprr");
        prop_assert_eq!(
            d.args,
            DecodedArgs::RprrLoad(RprrLoad { rd: zt, pg, rn, rm, dtype, nreg: 0 })
        );
    }
}

// ============================================================================
// 随机扫描
// ============================================================================

#[cfg(test)]
mod sweep_tests {
    use super::*;

    // Test 1: 译码结果总是有效模板之一，且重复译码结果一致
    #[test]
    fn test_random_words_decode_to_known_patterns() {
        let names: HashSet<&str> = pattern_names().collect();
        let mut rng = StdRng::seed_from_u64(0x5e5e);
        let mut hits = 0;
        for _ in 0..50_000 {
            let insn = rng.gen_range(0..=u32::MAX);
            if let Some(d) = decode(insn) {
                assert!(names.contains(d.name), "{insn:08x} -> {}", d.name);
                assert_eq!(decode(insn).map(|d| d.name), Some(d.name));
                hits += 1;
            }
        }
        assert!(hits > 0);
    }

    // Test 2: SVE 编码组之外的字都未分配
    #[test]
    fn test_outside_sve_space_is_unallocated() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50_000 {
            let insn = rng.gen_range(0..=u32::MAX);
            if !in_sve_space(insn) {
                assert!(decode(insn).is_none(), "{insn:08x}");
            }
        }
    }

    // Test 3: 未分配的字翻译为 Unallocated 且不写入构建器
    #[test]
    fn test_unallocated_translates_to_nothing() {
        let ctx = DecodeContext::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = 0;
        while seen < 2_000 {
            let insn = rng.gen_range(0..=u32::MAX);
            if decode(insn).is_some() {
                continue;
            }
            let mut b = IRBuilder::new();
            assert_eq!(translate_insn(&ctx, &mut b, insn), Outcome::Unallocated);
            assert!(b.ops().is_empty());
            seen += 1;
        }
    }

    // Test 4: 编码器在随机字段下都落在 SVE 编码组内
    #[test]
    fn test_encoders_stay_in_sve_space() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..1_000 {
            let esz = rng.gen_range(0..4u8);
            let (a, b, c) = (rng.gen_range(0..32u32), rng.gen_range(0..32u32), rng.gen_range(0..8u32));
            for insn in [
                add_zzz(esz, a, b, c),
                add_zpzz(esz, a, c, b),
                uaddv(esz, a, c, b),
                cmpeq_ppzz(esz, c, c, a, b),
                whilelt(esz, c, a, b, true),
                st1_zprr(esz, 3, a, c, b, c),
            ] {
                assert!(in_sve_space(insn), "{insn:08x}");
            }
        }
    }
}

#[cfg(test)]
mod prefetch_tests {
    use super::*;
    use sve_frontend::SveTranslator;
    use sve_ir::IROp;

    // Test 1: PRFB/PRFH/PRFW/PRFD 标量加立即数形式都译码为预取
    #[test]
    fn test_prf_all_sizes_decode() {
        for msz in 0u8..4 {
            for imm in [-32, -1, 0, 31] {
                let insn = prf_zpri(msz, 5, 3, 9, imm);
                let d = decode(insn).unwrap();
                assert_eq!(d.name, "PRF", "msz {msz} imm {imm}: {insn:08x}");
            }
        }
        assert_eq!(decode(0x85C0_2000).map(|d| d.name), Some("PRF"));
        assert_eq!(decode(0x85C0_4000).map(|d| d.name), Some("PRF"));
        assert_eq!(decode(0x85C0_6000).map(|d| d.name), Some("PRF"));
    }

    // Test 2: 预取不发射任何操作；访问被禁用时只发射陷入
    #[test]
    fn test_prf_translates_to_nothing() {
        let insns: Vec<u32> = (0u8..4).map(|msz| prf_zpri(msz, 0, 0, 1, 2)).collect();
        let block = SveTranslator::new(DecodeContext::default()).translate_block(&insns).unwrap();
        assert!(block.ops.is_empty());

        let ctx = DecodeContext { sve_enabled: false, ..DecodeContext::default() };
        for insn in insns {
            let mut b = IRBuilder::new();
            assert_eq!(translate_insn(&ctx, &mut b, insn), Outcome::Emitted);
            assert_eq!(b.ops(), &[IROp::AccessTrap]);
        }
    }
}
