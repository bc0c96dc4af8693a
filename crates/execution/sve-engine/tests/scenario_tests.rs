//! 端到端场景测试
//!
//! 指令字经 sve-frontend 翻译为 IR 块，再由解释器执行，检查客户机可见状态

use sve_core::IsaFeatures;
use sve_engine::{
    CpuState, ExecResult, ExecStatus, ExecutionEngine, FlatMemory, GuestMemory, Interpreter, Nzcv, SharedMemory,
    TrapKind,
};
use sve_frontend::encode::*;
use sve_frontend::{DecodeContext, SveTranslator};

fn ctx(vl: u32) -> DecodeContext {
    DecodeContext {
        vl_bytes: vl,
        features: IsaFeatures::SVE | IsaFeatures::SVE2,
        sve_enabled: true,
        mte_active: false,
        big_endian: false,
    }
}

fn run_with(ctx: DecodeContext, cpu: &mut CpuState, mem: &mut dyn GuestMemory, insns: &[u32]) -> ExecResult {
    sve_core::logging::init();
    let block = SveTranslator::new(ctx).translate_block(insns).unwrap();
    Interpreter::new().run(cpu, mem, &block).unwrap()
}

fn run(vl: u32, cpu: &mut CpuState, mem: &mut FlatMemory, insns: &[u32]) -> ExecResult {
    run_with(ctx(vl), cpu, mem, insns)
}

fn flags(cpu: &CpuState) -> (bool, bool, bool) {
    let f = cpu.nzcv();
    (f.n, f.z, f.c)
}

#[cfg(test)]
mod integer_tests {
    use super::*;

    // Test 1: 无谓词加法逐元素计算且不影响标志
    #[test]
    fn test_add_zzz_words() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        let before = Nzcv { n: true, z: false, c: true, v: true };
        cpu.set_nzcv(before);
        cpu.set_zreg_elements(1, 2, &[1, 2, 3, 4]);
        cpu.set_zreg_elements(2, 2, &[10, 20, 30, 40]);

        let res = run(16, &mut cpu, &mut mem, &[add_zzz(2, 0, 1, 2)]);
        assert!(res.is_ok());
        assert_eq!(cpu.zreg_elements(0, 2), vec![11, 22, 33, 44]);
        assert_eq!(cpu.nzcv(), before);
    }

    // Test 2: 有符号饱和加法
    #[test]
    fn test_sqadd_saturates() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 0, &[0x7f, 0x80, 5]);
        cpu.set_zreg_elements(2, 0, &[1, 0xff, 3]);

        run(16, &mut cpu, &mut mem, &[sqadd_zzz(0, 0, 1, 2)]);
        assert_eq!(&cpu.zreg_elements(0, 0)[..3], &[0x7f, 0x80, 8]);
    }

    // Test 3: 移位量等于元素宽度时逻辑右移清零活动元素
    #[test]
    fn test_lsr_by_element_width() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(0, 1, &[0xffff; 8]);
        cpu.set_preg_all(0, 1);

        run(16, &mut cpu, &mut mem, &[lsr_zpzi(1, 0, 0, 16)]);
        assert_eq!(cpu.zreg_elements(0, 1), vec![0; 8]);
    }

    // Test 4: 非活动元素保持原值
    #[test]
    fn test_lsr_inactive_elements_untouched() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(0, 1, &[0xffff; 8]);
        cpu.set_preg(1, &[0x01, 0x00]);

        run(16, &mut cpu, &mut mem, &[lsr_zpzi(1, 0, 1, 16)]);
        let z = cpu.zreg_elements(0, 1);
        assert_eq!(z[0], 0);
        assert!(z[1..].iter().all(|&v| v == 0xffff));
    }

    // Test 5: 整数除以零结果为零
    #[test]
    fn test_sdiv_by_zero() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(0, 2, &[100, (-9i32) as u32 as u64, 7, 8]);
        cpu.set_zreg_elements(1, 2, &[0, 2, 7, 0]);
        cpu.set_preg_all(0, 2);

        run(16, &mut cpu, &mut mem, &[sdiv_zpzz(2, 0, 0, 1)]);
        assert_eq!(cpu.zreg_elements(0, 2), vec![0, (-4i32) as u32 as u64, 1, 0]);
    }

    // Test 6: INDEX 生成等差序列
    #[test]
    fn test_index_immediate() {
        let mut cpu = CpuState::new(32);
        let mut mem = FlatMemory::new(0, 16);
        run(32, &mut cpu, &mut mem, &[index_ii(2, 3, 1, 3)]);
        assert_eq!(cpu.zreg_elements(3, 2), vec![1, 4, 7, 10, 13, 16, 19, 22]);
    }

    // Test 7: RDVL 与 CNTD 读取向量长度
    #[test]
    fn test_vector_length_queries() {
        let mut cpu = CpuState::new(32);
        let mut mem = FlatMemory::new(0, 16);
        run(32, &mut cpu, &mut mem, &[rdvl(0, 2), cnt_r(3, 1, 31, 1)]);
        assert_eq!(cpu.xreg(0), 64);
        assert_eq!(cpu.xreg(1), 4);
    }

    // Test 8: MOVPRFX 后的破坏性操作写入前缀目的
    #[test]
    fn test_movprfx_then_mul() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 2, &[2, 3, 4, 5]);
        cpu.set_zreg_elements(2, 2, &[10, 10, 10, 10]);
        cpu.set_preg_all(0, 2);

        run(16, &mut cpu, &mut mem, &[movprfx(0, 1), mul_zpzz(2, 0, 0, 2)]);
        assert_eq!(cpu.zreg_elements(0, 2), vec![20, 30, 40, 50]);
        assert_eq!(cpu.zreg_elements(1, 2), vec![2, 3, 4, 5]);
    }
}

#[cfg(test)]
mod reduction_tests {
    use super::*;

    // Test 1: 全假谓词的归约返回单位元，Vd 其余部分清零
    #[test]
    fn test_reductions_on_empty_predicate() {
        let mut cpu = CpuState::new(32);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 0, &[0x55; 32]);
        for rd in 3..6 {
            cpu.set_zreg_elements(rd, 3, &[u64::MAX; 4]);
        }

        let insns = [pfalse(0), uaddv(2, 3, 0, 1), andv(1, 4, 0, 1), smaxv(0, 5, 0, 1)];
        run(32, &mut cpu, &mut mem, &insns);
        assert_eq!(cpu.zreg_elements(3, 3), vec![0, 0, 0, 0]);
        assert_eq!(cpu.zreg_elements(4, 3), vec![0xffff, 0, 0, 0]);
        assert_eq!(cpu.zreg_elements(5, 3), vec![0x80, 0, 0, 0]);
    }

    // Test 2: UADDV 的结果为 64 位
    #[test]
    fn test_uaddv_widens() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 0, &[0xff; 16]);
        cpu.set_preg_all(0, 0);

        run(16, &mut cpu, &mut mem, &[uaddv(0, 2, 0, 1)]);
        assert_eq!(cpu.zreg_elements(2, 3)[0], 16 * 0xff);
    }
}

#[cfg(test)]
mod predicate_tests {
    use super::*;

    // Test 1: WHILELT 置位前 5 个字节元素并设置标志
    #[test]
    fn test_whilelt_sets_prefix() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_xreg(1, 0);
        cpu.set_xreg(2, 5);

        run(16, &mut cpu, &mut mem, &[whilelt(0, 0, 1, 2, true)]);
        assert_eq!(cpu.preg(0), &[0x1f, 0x00]);
        assert_eq!(flags(&cpu), (true, false, true));
        assert!(!cpu.nzcv().v);
    }

    // Test 2: 起点不小于终点时结果为空
    #[test]
    fn test_whilelt_empty() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_xreg(1, 9);
        cpu.set_xreg(2, 3);

        run(16, &mut cpu, &mut mem, &[whilelt(2, 0, 1, 2, true)]);
        assert_eq!(cpu.preg(0), &[0x00, 0x00]);
        assert_eq!(flags(&cpu), (false, true, true));
    }

    // Test 3: 向量超过 64 字节时谓词跨多个 64 位字
    #[test]
    fn test_predtest_multiword() {
        let mut cpu = CpuState::new(128);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_xreg(1, 0);
        cpu.set_xreg(2, 100);

        run(128, &mut cpu, &mut mem, &[whilelt(0, 0, 1, 2, true)]);
        let p = cpu.preg(0);
        assert!(p[..12].iter().all(|&b| b == 0xff));
        assert_eq!(p[12], 0x0f);
        assert!(p[13..].iter().all(|&b| b == 0));
        assert_eq!(flags(&cpu), (true, false, true));
    }

    // Test 4: 最大向量长度下 PTRUES 置满并设置标志
    #[test]
    fn test_ptrues_full_width() {
        let mut cpu = CpuState::new(256);
        let mut mem = FlatMemory::new(0, 16);

        run(256, &mut cpu, &mut mem, &[ptrues(0, 3, 31)]);
        assert!(cpu.preg(3).iter().all(|&b| b == 0xff));
        assert_eq!(flags(&cpu), (true, false, false));
    }

    // Test 5: 全零谓词的 PTEST
    #[test]
    fn test_ptest_empty() {
        let mut cpu = CpuState::new(32);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_preg_all(1, 0);

        run(32, &mut cpu, &mut mem, &[pfalse(2), ptest(1, 2)]);
        assert_eq!(flags(&cpu), (false, true, true));
    }

    // Test 6: CNTP 只统计受控元素
    #[test]
    fn test_cntp_words() {
        let mut cpu = CpuState::new(32);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_preg_all(0, 2);
        cpu.set_preg(1, &[0x11, 0x01, 0x00, 0x10]);

        run(32, &mut cpu, &mut mem, &[cntp(2, 4, 0, 1)]);
        assert_eq!(cpu.xreg(4), 4);
    }

    // Test 7: 比较结果写入谓词并设置标志
    #[test]
    fn test_cmpeq_vectors() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 2, &[1, 2, 3, 4]);
        cpu.set_zreg_elements(2, 2, &[1, 0, 3, 0]);
        cpu.set_preg_all(0, 2);

        run(16, &mut cpu, &mut mem, &[cmpeq_ppzz(2, 1, 0, 1, 2)]);
        assert_eq!(cpu.preg(1), &[0x01, 0x01]);
        assert_eq!(flags(&cpu), (true, false, true));
    }

    // Test 8: PNEXT 依次找到下一个活动元素，标志相对 Pg 计算
    #[test]
    fn test_pnext_walks_governing_predicate() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_preg(1, &[0x0c, 0x00]);
        cpu.set_preg(0, &[0x00, 0x00]);

        run(16, &mut cpu, &mut mem, &[pnext(0, 0, 1)]);
        assert_eq!(cpu.preg(0), &[0x04, 0x00]);
        assert_eq!(flags(&cpu), (true, false, true));

        run(16, &mut cpu, &mut mem, &[pnext(0, 0, 1)]);
        assert_eq!(cpu.preg(0), &[0x08, 0x00]);
        assert_eq!(flags(&cpu), (false, false, false));

        run(16, &mut cpu, &mut mem, &[pnext(0, 0, 1)]);
        assert_eq!(cpu.preg(0), &[0x00, 0x00]);
        assert_eq!(flags(&cpu), (false, true, true));
    }

    // Test 9: PNEXT 对半字元素只看每个元素的最低位
    #[test]
    fn test_pnext_halfword_elements() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_preg(1, &[0x00, 0x3c]);
        cpu.set_preg(0, &[0x00, 0x00]);

        run(16, &mut cpu, &mut mem, &[pnext(1, 0, 1)]);
        assert_eq!(cpu.preg(0), &[0x00, 0x04]);
        assert_eq!(flags(&cpu), (true, false, true));
    }

    // Test 10: PFIRST 保留原有位并置位 Pg 的第一个活动元素
    #[test]
    fn test_pfirst_keeps_existing_bits() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_preg(1, &[0x0c, 0x00]);
        cpu.set_preg(0, &[0x80, 0x00]);

        run(16, &mut cpu, &mut mem, &[pfirst(0, 1)]);
        assert_eq!(cpu.preg(0), &[0x84, 0x00]);
        assert_eq!(flags(&cpu), (true, false, true));
    }
}

#[cfg(test)]
mod permute_tests {
    use super::*;

    // Test 1: 没有活动元素时 CLASTB 不修改目的
    #[test]
    fn test_clastb_empty_predicate() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(0, 2, &[9, 9, 9, 9]);
        cpu.set_zreg_elements(1, 2, &[1, 2, 3, 4]);

        run(16, &mut cpu, &mut mem, &[pfalse(0), clastb_z(2, 0, 0, 1)]);
        assert_eq!(cpu.zreg_elements(0, 2), vec![9, 9, 9, 9]);
    }

    // Test 2: CLASTB 广播最后一个活动元素
    #[test]
    fn test_clastb_last_active() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(0, 2, &[9, 9, 9, 9]);
        cpu.set_zreg_elements(1, 2, &[1, 2, 3, 4]);
        cpu.set_preg(1, &[0x11, 0x00]);

        run(16, &mut cpu, &mut mem, &[clastb_z(2, 0, 1, 1)]);
        assert_eq!(cpu.zreg_elements(0, 2), vec![2, 2, 2, 2]);
    }

    // Test 3: 反转与交织
    #[test]
    fn test_rev_and_zip1() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 2, &[1, 2, 3, 4]);
        cpu.set_zreg_elements(2, 2, &[5, 6, 7, 8]);

        run(16, &mut cpu, &mut mem, &[rev_v(2, 3, 1), zip1_z(2, 4, 1, 2)]);
        assert_eq!(cpu.zreg_elements(3, 2), vec![4, 3, 2, 1]);
        assert_eq!(cpu.zreg_elements(4, 2), vec![1, 5, 2, 6]);
    }

    // Test 4: 越界下标的 TBL 结果为零
    #[test]
    fn test_tbl_out_of_range() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 2, &[10, 11, 12, 13]);
        cpu.set_zreg_elements(2, 2, &[3, 0, 4, 1]);

        run(16, &mut cpu, &mut mem, &[tbl(2, 0, 1, 2)]);
        assert_eq!(cpu.zreg_elements(0, 2), vec![13, 10, 0, 11]);
    }

    // Test 5: COMPACT 把活动元素压到低端
    #[test]
    fn test_compact_words() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 2, &[1, 2, 3, 4]);
        cpu.set_preg(0, &[0x10, 0x10]);

        run(16, &mut cpu, &mut mem, &[compact(2, 0, 0, 1)]);
        assert_eq!(cpu.zreg_elements(0, 2), vec![2, 4, 0, 0]);
    }
}

#[cfg(test)]
mod fp_tests {
    use super::*;

    fn f32s(cpu: &CpuState, reg: u32) -> Vec<f32> {
        cpu.zreg_elements(reg, 2).into_iter().map(|v| f32::from_bits(v as u32)).collect()
    }

    fn bits(vals: &[f32]) -> Vec<u64> {
        vals.iter().map(|v| v.to_bits() as u64).collect()
    }

    // Test 1: 单精度向量加法
    #[test]
    fn test_fadd_single() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 2, &bits(&[1.5, -1.0, 0.25, 8.0]));
        cpu.set_zreg_elements(2, 2, &bits(&[2.25, 1.0, 0.25, -16.0]));

        run(16, &mut cpu, &mut mem, &[fadd_zzz(2, 0, 1, 2)]);
        assert_eq!(f32s(&cpu, 0), vec![3.75, 0.0, 0.5, -8.0]);
    }

    // Test 2: FADDA 严格按元素顺序累加
    #[test]
    fn test_fadda_ordered() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(0, 2, &bits(&[1.0]));
        cpu.set_zreg_elements(1, 2, &bits(&[2.0, 3.0, 4.0, 5.0]));
        cpu.set_preg(0, &[0x01, 0x01]);

        run(16, &mut cpu, &mut mem, &[fadda(2, 0, 0, 1)]);
        assert_eq!(f32s(&cpu, 0)[0], 7.0);
    }

    // Test 3: 全假谓词的 FADDV 返回 +0
    #[test]
    fn test_faddv_empty() {
        let mut cpu = CpuState::new(32);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 3, &[1.5f64.to_bits(); 4]);
        cpu.set_zreg_elements(2, 3, &[u64::MAX; 4]);

        run(32, &mut cpu, &mut mem, &[pfalse(0), faddv(3, 2, 0, 1)]);
        assert_eq!(cpu.zreg_elements(2, 3), vec![0, 0, 0, 0]);
    }
}

#[cfg(test)]
mod memory_tests {
    use super::*;

    const BASE: u64 = 0x1000;

    fn patterned(size: usize) -> FlatMemory {
        let mut mem = FlatMemory::new(BASE, size);
        let bytes: Vec<u8> = (0..size).map(|i| i as u8).collect();
        mem.write_bulk(BASE, &bytes).unwrap();
        mem
    }

    // Test 1: LD1W 后 ST1W 到另一地址，内容一致
    #[test]
    fn test_ld1_st1_roundtrip() {
        let mut cpu = CpuState::new(32);
        let mut mem = patterned(256);
        cpu.set_xreg(1, BASE);
        cpu.set_xreg(2, 0);
        cpu.set_xreg(3, 32);

        let insns = [ptrue(2, 0, 31), ld1_zprr(10, 5, 0, 1, 2), st1_zprr(2, 2, 5, 0, 1, 3)];
        let res = run(32, &mut cpu, &mut mem, &insns);
        assert!(res.is_ok());
        assert_eq!(cpu.zreg_elements(5, 2)[0], 0x0302_0100);
        let bytes = mem.as_bytes();
        assert_eq!(&bytes[128..160], &bytes[0..32]);
        assert!(res.stats.mem_accesses > 0);
    }

    // Test 2: 普通加载出错时目的寄存器不变，状态为 Fault
    #[test]
    fn test_ld1_fault_leaves_register() {
        let mut cpu = CpuState::new(32);
        let mut mem = patterned(24);
        cpu.set_zreg_elements(0, 3, &[7, 7, 7, 7]);
        cpu.set_xreg(1, BASE);
        cpu.set_xreg(2, 0);

        let res = run(32, &mut cpu, &mut mem, &[ptrue(3, 0, 31), ld1_zprr(15, 0, 0, 1, 2)]);
        assert!(matches!(res.status, ExecStatus::Fault(_)));
        assert_eq!(cpu.zreg_elements(0, 3), vec![7, 7, 7, 7]);
    }

    // Test 3: 首次故障加载在出错元素处截断 FFR
    #[test]
    fn test_ldff1_updates_ffr() {
        let mut cpu = CpuState::new(32);
        let mut mem = patterned(24);
        cpu.set_xreg(1, BASE);

        let insns = [setffr(), ptrue(3, 0, 31), ldff1_zprr(15, 0, 0, 1, 31)];
        let res = run(32, &mut cpu, &mut mem, &insns);
        assert!(res.is_ok());
        assert_eq!(cpu.ffr(), &[0xff, 0xff, 0xff, 0x00]);
        let z = cpu.zreg_elements(0, 3);
        assert_eq!(z[0], 0x0706_0504_0302_0100);
        assert_eq!(z[3], 0);
    }

    // Test 4: 第一个活动元素出错时首次故障加载照常产生异常
    #[test]
    fn test_ldff1_first_element_faults() {
        let mut cpu = CpuState::new(32);
        let mut mem = patterned(24);
        cpu.set_xreg(1, BASE + 0x100);

        let res = run(32, &mut cpu, &mut mem, &[setffr(), ptrue(3, 0, 31), ldff1_zprr(15, 0, 0, 1, 31)]);
        assert!(matches!(res.status, ExecStatus::Fault(_)));
    }

    // Test 5: 64 位偏移的聚集加载
    #[test]
    fn test_gather_doublewords() {
        let mut cpu = CpuState::new(32);
        let mut mem = patterned(64);
        cpu.set_xreg(1, BASE);
        cpu.set_zreg_elements(2, 3, &[3, 0, 1, 2]);

        run(32, &mut cpu, &mut mem, &[ptrue(3, 0, 31), ld1d_gather64(4, 0, 1, 2, true, false)]);
        let z = cpu.zreg_elements(4, 3);
        assert_eq!(z[0], 0x1f1e_1d1c_1b1a_1918);
        assert_eq!(z[1], 0x0706_0504_0302_0100);
    }

    // Test 6: 大端模式下按元素交换字节
    #[test]
    fn test_big_endian_load() {
        let mut cpu = CpuState::new(16);
        let mut mem = patterned(64);
        cpu.set_xreg(1, BASE);
        cpu.set_xreg(2, 0);
        let c = DecodeContext { big_endian: true, ..ctx(16) };

        run_with(c, &mut cpu, &mut mem, &[ptrue(2, 0, 31), ld1_zprr(10, 0, 0, 1, 2)]);
        assert_eq!(cpu.zreg_elements(0, 2)[0], 0x0001_0203);
    }

    // Test 7: 标签不匹配在 MTE 激活时产生异常
    #[test]
    fn test_mte_tag_check() {
        let mut cpu = CpuState::new(16);
        let mut mem = patterned(64);
        mem.poison_tags(BASE + 8..BASE + 16);
        cpu.set_xreg(1, BASE);
        cpu.set_xreg(2, 0);
        let c = DecodeContext { mte_active: true, ..ctx(16) };

        let res = run_with(c, &mut cpu, &mut mem, &[ptrue(2, 0, 31), ld1_zprr(10, 0, 0, 1, 2)]);
        assert!(matches!(res.status, ExecStatus::Fault(sve_core::MemoryError::TagCheck(_))));
    }

    // Test 8: 共享内存上一个核心的存储对另一个核心可见
    #[test]
    fn test_shared_memory_between_cpus() {
        let shared = SharedMemory::new(patterned(64));
        let mut writer_mem = shared.clone();
        let mut reader_mem = shared.clone();

        let mut writer = CpuState::new(16);
        writer.set_zreg_elements(0, 2, &[0xdead_beef; 4]);
        writer.set_xreg(1, BASE);
        writer.set_xreg(2, 8);
        run_with(ctx(16), &mut writer, &mut writer_mem, &[ptrue(2, 0, 31), st1_zprr(2, 2, 0, 0, 1, 2)]);

        let mut reader = CpuState::new(16);
        reader.set_xreg(1, BASE + 32);
        reader.set_xreg(2, 0);
        run_with(ctx(16), &mut reader, &mut reader_mem, &[ptrue(2, 0, 31), ld1_zprr(10, 3, 0, 1, 2)]);
        assert_eq!(reader.zreg_elements(3, 2), vec![0xdead_beef; 4]);
        shared.with(|m| assert_eq!(&m.as_bytes()[32..36], &[0xef, 0xbe, 0xad, 0xde]));
    }
}

#[cfg(test)]
mod access_tests {
    use super::*;

    // Test 1: SVE 未启用时块以陷入结束且状态不变
    #[test]
    fn test_access_trap() {
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        cpu.set_zreg_elements(1, 2, &[1, 2, 3, 4]);
        let c = DecodeContext { sve_enabled: false, ..ctx(16) };

        let res = run_with(c, &mut cpu, &mut mem, &[add_zzz(2, 0, 1, 1)]);
        assert_eq!(res.status, ExecStatus::Trap(TrapKind::SveAccess));
        assert_eq!(cpu.zreg_elements(0, 2), vec![0, 0, 0, 0]);
    }

    // Test 2: 解释器累计多次执行的统计
    #[test]
    fn test_interpreter_totals() {
        let block = SveTranslator::new(ctx(16)).translate_block(&[add_zzz(2, 0, 1, 2)]).unwrap();
        let mut engine = Interpreter::new();
        let mut cpu = CpuState::new(16);
        let mut mem = FlatMemory::new(0, 16);
        let a = engine.run(&mut cpu, &mut mem, &block).unwrap();
        let b = engine.run(&mut cpu, &mut mem, &block).unwrap();
        assert_eq!(engine.totals().executed_ops, a.stats.executed_ops + b.stats.executed_ops);
    }
}
