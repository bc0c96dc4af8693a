//! sve-ir 核心类型测试
//!
//! 测试 IRBuilder 临时值管理、描述符与 env 布局

use proptest::prelude::*;
use sve_ir::desc::{pred_data, pred_esz, pred_oprsz, simd_data, simd_maxsz, simd_oprsz};
use sve_ir::layout::{ENV_SIZE, PREG_TMP, pred_full_reg_offset, vec_full_reg_offset};
use sve_ir::{
    Arg, BinOp, Cond, FpStatus, Helper, IRBuilder, IROp, MemOp, Rounding, ZpzzOp,
    pred_desc, simd_desc,
};

#[cfg(test)]
mod builder_tests {
    use super::*;

    // Test 1: 作用域结束后临时值全部释放
    #[test]
    fn test_nested_scopes_release() {
        let mut b = IRBuilder::new();
        {
            let mut outer = b.scope();
            let a = outer.movi(3);
            let c = outer.temp();
            outer.binary(BinOp::Add, c, a, a);
            {
                let mut inner = outer.scope();
                inner.movi(4);
                inner.movi(5);
                assert_eq!(inner.live_temps(), 4);
            }
            assert_eq!(outer.live_temps(), 2);
        }
        assert_eq!(b.live_temps(), 0);
        assert_eq!(b.build().num_temps, 4);
    }

    // Test 2: 标签编号单调递增
    #[test]
    fn test_labels_unique() {
        let mut b = IRBuilder::new();
        let l0 = b.new_label();
        let l1 = b.new_label();
        assert_ne!(l0, l1);
        b.set_label(l0);
        b.br(l1);
        b.set_label(l1);
        let block = b.build();
        assert_eq!(block.num_labels, 2);
        assert_eq!(block.ops.len(), 3);
    }

    // Test 3: 带返回值的助手调用分配临时值
    #[test]
    fn test_call_ret_allocates() {
        let mut b = IRBuilder::new();
        let r = b.call_ret(
            Helper::PredTest,
            vec![Arg::Env(0), Arg::Env(32), Arg::Desc(1)],
        );
        assert_eq!(b.live_temps(), 1);
        match &b.ops()[0] {
            IROp::Call { ret, args, .. } => {
                assert_eq!(*ret, Some(r));
                assert_eq!(args.len(), 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    // Test 4: 舍入模式切换成对出现
    #[test]
    fn test_rounding_pair() {
        let mut b = IRBuilder::new();
        let v = b.with_rounding_mode(FpStatus::A64F16, Rounding::NegInf, |b| {
            b.call(
                Helper::Zpzz {
                    op: ZpzzOp::Add,
                    esz: 1,
                },
                vec![],
            );
            42
        });
        assert_eq!(v, 42);
        let sets = b
            .ops()
            .iter()
            .filter(|op| matches!(op, IROp::SetRounding { .. }))
            .count();
        let restores = b
            .ops()
            .iter()
            .filter(|op| matches!(op, IROp::RestoreRounding { .. }))
            .count();
        assert_eq!((sets, restores), (1, 1));
    }

    // Test 5: 内存操作宽度
    #[test]
    fn test_memop_bytes() {
        assert_eq!(MemOp::unsigned(0).bytes(), 1);
        assert_eq!(MemOp::signed(3).bytes(), 8);
        assert!(MemOp::signed(1).signed);
    }
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    // Test 6: 只有加载/存储助手访问内存
    #[test]
    fn test_touches_memory() {
        assert!(!Helper::PredTest.touches_memory());
        assert!(
            Helper::StContig(sve_ir::ContigStore {
                mte: false,
                be: false,
                msz: 0,
                esz: 0,
                nreg: 0,
            })
            .touches_memory()
        );
    }

    // Test 7: 半精度使用独立状态字
    #[test]
    fn test_fpst_for_esz() {
        assert_eq!(FpStatus::for_esz(1), FpStatus::A64F16);
        assert_eq!(FpStatus::for_esz(2), FpStatus::A64);
        assert_eq!(FpStatus::for_esz(3), FpStatus::A64);
    }

    // Test 8: RMode 编码
    #[test]
    fn test_rounding_encoding() {
        assert_eq!(Rounding::from_rmode(3), Rounding::Zero);
        for r in [Rounding::TieAway, Rounding::Odd, Rounding::PosInf] {
            assert_eq!(Rounding::from_u64(r.as_u64()), r);
        }
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;

    // Test 9: 暂存谓词位于 FFR 之后
    #[test]
    fn test_tmp_after_ffr() {
        assert!(PREG_TMP > pred_full_reg_offset(16));
        assert!(vec_full_reg_offset(31) < pred_full_reg_offset(0));
        assert!((PREG_TMP as usize) < ENV_SIZE);
    }
}

proptest! {
    #[test]
    fn prop_simd_desc_fields(q in 1u32..=32, extra in 0u32..=32, data in -32768i32..=32767) {
        let oprsz = q * 8;
        let maxsz = (q + extra).min(256) * 8;
        let d = simd_desc(oprsz, maxsz, data);
        prop_assert_eq!(simd_oprsz(d), oprsz as usize);
        prop_assert_eq!(simd_maxsz(d), maxsz as usize);
        prop_assert_eq!(simd_data(d), data);
    }

    #[test]
    fn prop_pred_desc_fields(oprsz in 1u32..=32, esz in 0u8..4, data in 0u32..0x10000) {
        let d = pred_desc(oprsz, esz, data);
        prop_assert_eq!(pred_oprsz(d), oprsz as usize);
        prop_assert_eq!(pred_esz(d), esz);
        prop_assert_eq!(pred_data(d), data);
    }

    #[test]
    fn prop_cond_invert_is_complement(a: u64, b: u64) {
        for c in [Cond::Eq, Cond::Ne, Cond::Lt, Cond::Le, Cond::Gt, Cond::Ge,
                  Cond::Ltu, Cond::Leu, Cond::Gtu, Cond::Geu] {
            prop_assert_eq!(c.eval(a, b), !c.invert().eval(a, b));
        }
    }
}
