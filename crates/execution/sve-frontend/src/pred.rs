//! 元素计数与谓词语义

/// 每种元素大小下谓词中有意义的位
pub const PRED_ESZ_MASKS: [u64; 4] = [
    0xffff_ffff_ffff_ffff,
    0x5555_5555_5555_5555,
    0x1111_1111_1111_1111,
    0x0101_0101_0101_0101,
];

/// PTRUE/PTRUES 的 ALL 模式
pub const PAT_ALL: u32 = 31;
/// 保留模式，计数为 0，用于 PFALSE
pub const PAT_NONE: u32 = 32;

pub fn pow2floor(x: u32) -> u32 {
    if x == 0 { 0 } else { 1 << (31 - x.leading_zeros()) }
}

/// 按 `pattern` 计算 `fullsz` 字节向量中 `esz` 元素的个数
pub fn decode_pred_count(fullsz: u32, pattern: u32, esz: u8) -> u32 {
    let elements = fullsz >> esz;
    let bound = match pattern {
        0x0 => return pow2floor(elements),
        0x1..=0x8 => pattern,
        0x9..=0xd => 16 << (pattern - 9),
        0x1d => return elements - elements % 4,
        0x1e => return elements - elements % 3,
        0x1f => return elements,
        _ => return 0,
    };
    if elements >= bound { bound } else { 0 }
}

/// 谓词 gvec 操作的字节数：不足 8 字节按 8，否则向上取整到 16
pub fn size_for_gvec(psz: u32) -> u32 {
    if psz <= 8 { 8 } else { (psz + 15) & !15 }
}

pub use sve_ir::predflags::{PREDTEST_INIT, predtest_nzcv};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_table() {
        // VL = 256 位，字元素 8 个
        assert_eq!(decode_pred_count(32, 0x00, 2), 8);
        assert_eq!(decode_pred_count(32, 0x05, 2), 5);
        assert_eq!(decode_pred_count(32, 0x08, 2), 8);
        assert_eq!(decode_pred_count(32, 0x09, 2), 0);
        assert_eq!(decode_pred_count(32, 0x1d, 2), 8);
        assert_eq!(decode_pred_count(32, 0x1e, 2), 6);
        assert_eq!(decode_pred_count(32, 0x1f, 2), 8);
        assert_eq!(decode_pred_count(32, 0x0e, 2), 0);
        assert_eq!(decode_pred_count(32, PAT_NONE, 2), 0);

        // VL = 384 位，字节元素 48 个
        assert_eq!(decode_pred_count(48, 0x00, 0), 32);
        assert_eq!(decode_pred_count(48, 0x0a, 0), 32);
        assert_eq!(decode_pred_count(48, 0x0b, 0), 0);
        assert_eq!(decode_pred_count(48, 0x1e, 0), 48);
    }

    #[test]
    fn test_size_for_gvec() {
        assert_eq!(size_for_gvec(2), 8);
        assert_eq!(size_for_gvec(8), 8);
        assert_eq!(size_for_gvec(10), 16);
        assert_eq!(size_for_gvec(32), 32);
    }
}
