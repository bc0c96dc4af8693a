//! 解释器属性测试
//!
//! 使用proptest对随机向量长度、元素大小与寄存器内容检查逐元素语义

use proptest::prelude::*;
use sve_engine::{CpuState, ExecutionEngine, FlatMemory, GuestMemory, Interpreter};
use sve_frontend::encode::*;
use sve_frontend::{DecodeContext, SveTranslator};

const BASE: u64 = 0x4000;

fn run(vl: u32, cpu: &mut CpuState, mem: &mut FlatMemory, insns: &[u32]) {
    let ctx = DecodeContext { vl_bytes: vl, ..DecodeContext::default() };
    let block = SveTranslator::new(ctx).translate_block(insns).unwrap();
    let res = Interpreter::new().run(cpu, mem, &block).unwrap();
    assert!(res.is_ok(), "{:?}", res.status);
}

fn emask(esz: u8) -> u64 {
    if esz == 3 { u64::MAX } else { (1u64 << (8 << esz)) - 1 }
}

fn load_bytes(cpu: &mut CpuState, reg: u32, bytes: &[u8]) {
    let vals: Vec<u64> = bytes.iter().map(|&b| b as u64).collect();
    cpu.set_zreg_elements(reg, 0, &vals);
}

fn pred_active(p: &[u8], i: usize, esz: u8) -> bool {
    let bit = i << esz;
    p[bit / 8] >> (bit % 8) & 1 != 0
}

fn vl_strategy() -> impl Strategy<Value = u32> {
    (1u32..=16).prop_map(|k| k * 16)
}

// ============================================================================
// 整数运算属性
// ============================================================================

// 属性测试: ADD_zzz 等价于逐元素回绕加法
proptest! {
    #[test]
    fn prop_add_zzz_wraps(
        vl in vl_strategy(),
        esz in 0u8..4,
        a in prop::collection::vec(any::<u8>(), 256),
        b in prop::collection::vec(any::<u8>(), 256),
    ) {
        let mut cpu = CpuState::new(vl);
        let mut mem = FlatMemory::new(BASE, 16);
        load_bytes(&mut cpu, 1, &a);
        load_bytes(&mut cpu, 2, &b);
        let (za, zb) = (cpu.zreg_elements(1, esz), cpu.zreg_elements(2, esz));

        run(vl, &mut cpu, &mut mem, &[add_zzz(esz, 0, 1, 2)]);
        let got = cpu.zreg_elements(0, esz);
        for i in 0..got.len() {
            prop_assert_eq!(got[i], za[i].wrapping_add(zb[i]) & emask(esz));
        }
    }
}

// 属性测试: UQSUB 在零处饱和
proptest! {
    #[test]
    fn prop_uqsub_saturates(
        vl in vl_strategy(),
        esz in 0u8..4,
        a in prop::collection::vec(any::<u8>(), 256),
        b in prop::collection::vec(any::<u8>(), 256),
    ) {
        let mut cpu = CpuState::new(vl);
        let mut mem = FlatMemory::new(BASE, 16);
        load_bytes(&mut cpu, 1, &a);
        load_bytes(&mut cpu, 2, &b);
        let (za, zb) = (cpu.zreg_elements(1, esz), cpu.zreg_elements(2, esz));

        run(vl, &mut cpu, &mut mem, &[uqsub_zzz(esz, 0, 1, 2)]);
        let got = cpu.zreg_elements(0, esz);
        for i in 0..got.len() {
            prop_assert_eq!(got[i], za[i].saturating_sub(zb[i]));
        }
    }
}

// 属性测试: 带谓词加法只修改活动元素
proptest! {
    #[test]
    fn prop_predicated_add_merges(
        vl in vl_strategy(),
        esz in 0u8..4,
        a in prop::collection::vec(any::<u8>(), 256),
        b in prop::collection::vec(any::<u8>(), 256),
        p in prop::collection::vec(any::<u8>(), 32),
    ) {
        let mut cpu = CpuState::new(vl);
        let mut mem = FlatMemory::new(BASE, 16);
        load_bytes(&mut cpu, 0, &a);
        load_bytes(&mut cpu, 2, &b);
        cpu.set_preg(1, &p);
        let (za, zb) = (cpu.zreg_elements(0, esz), cpu.zreg_elements(2, esz));

        run(vl, &mut cpu, &mut mem, &[add_zpzz(esz, 0, 1, 2)]);
        let got = cpu.zreg_elements(0, esz);
        for i in 0..got.len() {
            let want = if pred_active(&p, i, esz) {
                za[i].wrapping_add(zb[i]) & emask(esz)
            } else {
                za[i]
            };
            prop_assert_eq!(got[i], want);
        }
    }
}

// 属性测试: DUP 立即数按元素大小符号扩展
proptest! {
    #[test]
    fn prop_dup_imm_sign_extends(vl in vl_strategy(), esz in 0u8..4, imm in -128i32..128) {
        let mut cpu = CpuState::new(vl);
        let mut mem = FlatMemory::new(BASE, 16);

        run(vl, &mut cpu, &mut mem, &[dup_i(esz, 7, imm, false)]);
        let want = imm as i64 as u64 & emask(esz);
        prop_assert!(cpu.zreg_elements(7, esz).iter().all(|&v| v == want));
    }
}

// 属性测试: UADDV 等于活动元素之和
proptest! {
    #[test]
    fn prop_uaddv_sums_active(
        vl in vl_strategy(),
        esz in 0u8..4,
        a in prop::collection::vec(any::<u8>(), 256),
        p in prop::collection::vec(any::<u8>(), 32),
    ) {
        let mut cpu = CpuState::new(vl);
        let mut mem = FlatMemory::new(BASE, 16);
        load_bytes(&mut cpu, 1, &a);
        cpu.set_preg(0, &p);
        let za = cpu.zreg_elements(1, esz);
        let want = za
            .iter()
            .enumerate()
            .filter(|&(i, _)| pred_active(&p, i, esz))
            .fold(0u64, |acc, (_, &v)| acc.wrapping_add(v));

        run(vl, &mut cpu, &mut mem, &[uaddv(esz, 3, 0, 1)]);
        prop_assert_eq!(cpu.zreg_elements(3, 3)[0], want);
    }
}

// ============================================================================
// 谓词与置换属性
// ============================================================================

// 属性测试: WHILELO 生成前缀谓词，标志与计数一致
proptest! {
    #[test]
    fn prop_whilelo_prefix(vl in vl_strategy(), esz in 0u8..4, start in 0u64..512, end in 0u64..512) {
        let mut cpu = CpuState::new(vl);
        let mut mem = FlatMemory::new(BASE, 16);
        cpu.set_xreg(1, start);
        cpu.set_xreg(2, end);

        run(vl, &mut cpu, &mut mem, &[whilelo(esz, 4, 1, 2, true)]);
        let elements = vl as usize >> esz;
        let count = (end.saturating_sub(start) as usize).min(elements);
        let p = cpu.preg(4).to_vec();
        for i in 0..elements {
            prop_assert_eq!(pred_active(&p, i, esz), i < count);
        }
        let f = cpu.nzcv();
        prop_assert_eq!(f.n, count > 0);
        prop_assert_eq!(f.z, count == 0);
        prop_assert_eq!(f.c, count < elements);
        prop_assert!(!f.v);
    }
}

// 属性测试: REV 两次还原
proptest! {
    #[test]
    fn prop_rev_involution(vl in vl_strategy(), esz in 0u8..4, a in prop::collection::vec(any::<u8>(), 256)) {
        let mut cpu = CpuState::new(vl);
        let mut mem = FlatMemory::new(BASE, 16);
        load_bytes(&mut cpu, 1, &a);
        let orig = cpu.zreg(1).to_vec();

        run(vl, &mut cpu, &mut mem, &[rev_v(esz, 2, 1), rev_v(esz, 3, 2)]);
        prop_assert_eq!(cpu.zreg(3), orig.as_slice());
        let last = cpu.zreg_elements(1, esz).last().copied();
        prop_assert_eq!(cpu.zreg_elements(2, esz).first().copied(), last);
    }
}

// ============================================================================
// 访存属性
// ============================================================================

// 属性测试: LD1 后 ST1 复制内存
proptest! {
    #[test]
    fn prop_ld1_st1_copies(vl in vl_strategy(), esz in 0u8..4, data in prop::collection::vec(any::<u8>(), 256)) {
        let mut cpu = CpuState::new(vl);
        let mut mem = FlatMemory::new(BASE, 512);
        mem.write_bulk(BASE, &data).unwrap();
        cpu.set_xreg(1, BASE);
        cpu.set_xreg(2, 0);
        cpu.set_xreg(3, (vl >> esz) as u64);

        let insns = [
            ptrue(esz, 0, 31),
            ld1_zprr(esz as u32 * 5, 9, 0, 1, 2),
            st1_zprr(esz, esz, 9, 0, 1, 3),
        ];
        run(vl, &mut cpu, &mut mem, &insns);
        let vl = vl as usize;
        let bytes = mem.as_bytes();
        prop_assert_eq!(&bytes[vl..2 * vl], &data[..vl]);
        prop_assert_eq!(cpu.zreg(9), &data[..vl]);
    }
}

// 属性测试: LDFF1 截断位置之前的元素全部加载
proptest! {
    #[test]
    fn prop_ldff1_prefix(vl in vl_strategy(), avail in 1usize..32) {
        let mut cpu = CpuState::new(vl);
        let size = avail * 8;
        let mut mem = FlatMemory::new(BASE, size);
        let data: Vec<u8> = (0..size).map(|i| (i * 7 + 1) as u8).collect();
        mem.write_bulk(BASE, &data).unwrap();
        cpu.set_xreg(1, BASE);

        run(vl, &mut cpu, &mut mem, &[setffr(), ptrue(3, 0, 31), ldff1_zprr(15, 0, 0, 1, 31)]);
        let elements = vl as usize / 8;
        let loaded = avail.min(elements);
        let ffr = cpu.ffr().to_vec();
        for i in 0..elements {
            prop_assert_eq!(pred_active(&ffr, i, 3), i < loaded);
        }
        prop_assert_eq!(&cpu.zreg(0)[..loaded * 8], &data[..loaded * 8]);
    }
}
