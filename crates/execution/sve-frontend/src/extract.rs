//! 字段提取器
//!
//! 纯位域函数，供译码表的格式函数使用。

/// 取 `insn` 从 `start` 开始的 `len` 位
#[inline]
pub const fn bits(insn: u32, start: u32, len: u32) -> u32 {
    (insn >> start) & (u32::MAX >> (32 - len))
}

#[inline]
pub const fn bit(insn: u32, pos: u32) -> bool {
    (insn >> pos) & 1 != 0
}

/// 有符号位域提取
#[inline]
pub const fn sextract(insn: u32, start: u32, len: u32) -> i64 {
    (((insn << (32 - len - start)) as i32) >> (32 - len)) as i64
}

/// 由 tsz:imm3 得到元素大小；tsz 为零时返回 -1
pub fn tszimm_esz(x: u32) -> i32 {
    31 - (x >> 3).leading_zeros() as i32
}

/// 右移量：`(16 << esz) - x`
pub fn tszimm_shr(x: u32) -> u32 {
    let esz = tszimm_esz(x);
    if esz < 0 {
        return 0;
    }
    (16u32 << esz).wrapping_sub(x)
}

/// 左移量：`x - (8 << esz)`
pub fn tszimm_shl(x: u32) -> u32 {
    let esz = tszimm_esz(x);
    if esz < 0 {
        return 0;
    }
    x.wrapping_sub(8u32 << esz)
}

/// sh:imm8，有符号
pub fn expand_imm_sh8s(x: u32) -> i64 {
    let v = (x as u8) as i8 as i64;
    if x & 0x100 != 0 { v << 8 } else { v }
}

/// sh:imm8，无符号
pub fn expand_imm_sh8u(x: u32) -> i64 {
    let v = (x as u8) as i64;
    if x & 0x100 != 0 { v << 8 } else { v }
}

/// 同大小加载对应的 dtype
pub fn msz_dtype(msz: u32) -> u32 {
    const DTYPE: [u32; 4] = [0, 5, 10, 15];
    DTYPE[msz as usize & 3]
}

pub fn dtype_msz(dtype: u32) -> u8 {
    sve_ir::dtype_msz(dtype as u8)
}

pub fn dtype_esz(dtype: u32) -> u8 {
    sve_ir::dtype_esz(dtype as u8)
}

pub fn dtype_signed(dtype: u32) -> bool {
    sve_ir::dtype_signed(dtype as u8)
}

fn bitmask64(len: u32) -> u64 {
    if len >= 64 { u64::MAX } else { (1u64 << len) - 1 }
}

fn replicate(mut mask: u64, mut e: u32) -> u64 {
    while e < 64 {
        mask |= mask << e;
        e *= 2;
    }
    mask
}

/// 位掩码立即数（N:immr:imms），保留编码返回 `None`
pub fn logic_imm_decode_wmask(imm13: u32) -> Option<u64> {
    let immn = (imm13 >> 12) & 1;
    let immr = (imm13 >> 6) & 0x3f;
    let imms = imm13 & 0x3f;

    let combined = (immn << 6) | (!imms & 0x3f);
    if combined == 0 {
        return None;
    }
    let len = 31 - combined.leading_zeros();
    if len < 1 {
        return None;
    }
    let e = 1u32 << len;
    let levels = e - 1;
    let s = imms & levels;
    let r = immr & levels;
    if s == levels {
        return None;
    }

    let mut mask = bitmask64(s + 1);
    if r != 0 {
        mask = (mask >> r) | (mask << (e - r));
        mask &= bitmask64(e);
    }
    Some(replicate(mask, e))
}

/// FDUP/FCPY 的 8 位浮点立即数展开，结果位于低 `8 << esz` 位
pub fn vfp_expand_imm(esz: u8, imm8: u32) -> u64 {
    let sign = if imm8 & 0x80 != 0 { 0x8000u64 } else { 0 };
    let b6 = imm8 & 0x40 != 0;
    let frac = (imm8 & 0x3f) as u64;
    match esz {
        1 => sign | if b6 { 0x3000 } else { 0x4000 } | (frac << 6),
        2 => (sign | if b6 { 0x3e00 } else { 0x4000 } | (frac << 3)) << 16,
        _ => (sign | if b6 { 0x3fc0 } else { 0x4000 } | frac) << 48,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tszimm() {
        // tsz = 0001 -> 字节元素，imm3 = 5：右移 16 - 13 = 3
        let x = (1 << 3) | 5;
        assert_eq!(tszimm_esz(x), 0);
        assert_eq!(tszimm_shr(x), 3);
        assert_eq!(tszimm_shl(x), 5);

        // tsz = 1xxx -> 双字
        let x = (0b1010 << 3) | 1;
        assert_eq!(tszimm_esz(x), 3);
        assert_eq!(tszimm_shr(x), 128 - 81);
        assert_eq!(tszimm_shl(x), 81 - 64);

        assert_eq!(tszimm_esz(5), -1);
    }

    #[test]
    fn test_expand_imm_sh8() {
        assert_eq!(expand_imm_sh8s(0x0ff), -1);
        assert_eq!(expand_imm_sh8s(0x1ff), -256);
        assert_eq!(expand_imm_sh8u(0x1ff), 0xff00);
        assert_eq!(expand_imm_sh8u(0x080), 0x80);
    }

    #[test]
    fn test_dtype_tables() {
        for msz in 0..4 {
            let d = msz_dtype(msz);
            assert_eq!(dtype_msz(d) as u32, msz);
            assert_eq!(dtype_esz(d) as u32, msz);
            assert!(!dtype_signed(d));
        }
        assert_eq!((dtype_msz(4), dtype_esz(4), dtype_signed(4)), (2, 3, true));
    }

    #[test]
    fn test_logic_imm() {
        // N=1 immr=0 imms=0 -> 64 位元素，单个 1
        assert_eq!(logic_imm_decode_wmask(0x1000), Some(1));
        // N=0 imms=111100 -> 2 位元素 "01" 重复
        assert_eq!(logic_imm_decode_wmask(0b0_000000_111100), Some(0x5555_5555_5555_5555));
        // 全 1 为保留编码
        assert_eq!(logic_imm_decode_wmask(0x103f), None);
        // 8 位元素 0x0f，循环右移 4 位
        assert_eq!(
            logic_imm_decode_wmask(0b0_000100_110011),
            Some(0xf0f0_f0f0_f0f0_f0f0)
        );
    }

    #[test]
    fn test_vfp_expand() {
        // 1.0
        assert_eq!(vfp_expand_imm(2, 0x70), 0x3f80_0000);
        assert_eq!(vfp_expand_imm(3, 0x70), 0x3ff0_0000_0000_0000);
        assert_eq!(vfp_expand_imm(1, 0x70), 0x3c00);
        // -2.0
        assert_eq!(vfp_expand_imm(2, 0x80), 0xc000_0000);
    }
}
