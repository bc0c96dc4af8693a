//! 助手描述符打包
//!
//! 向量描述符：OPRSZ[7:0] = oprsz/8 - 1，MAXSZ[15:8] = maxsz/8 - 1，
//! DATA[31:16] 为有符号附加数据。
//! 谓词描述符：OPRSZ[5:0] 为字节数，ESZ[7:6]，DATA[31:8]。

const SIMD_OPRSZ_SHIFT: u32 = 0;
const SIMD_MAXSZ_SHIFT: u32 = 8;
const SIMD_DATA_SHIFT: u32 = 16;
const SIMD_DATA_BITS: u32 = 16;

const PREDDESC_OPRSZ_BITS: u32 = 6;
const PREDDESC_ESZ_SHIFT: u32 = 6;
const PREDDESC_DATA_SHIFT: u32 = 8;

/// 打包向量助手描述符
///
/// `oprsz` 与 `maxsz` 为 8 的倍数，不超过 2048 字节；`data` 须能以 16 位有符号数表示。
pub fn simd_desc(oprsz: u32, maxsz: u32, data: i32) -> u32 {
    debug_assert!(oprsz % 8 == 0 && oprsz >= 8 && oprsz <= 2048);
    debug_assert!(maxsz % 8 == 0 && maxsz >= oprsz && maxsz <= 2048);
    debug_assert!(data == sextract32(data as u32, 0, SIMD_DATA_BITS));

    ((oprsz / 8 - 1) << SIMD_OPRSZ_SHIFT)
        | ((maxsz / 8 - 1) << SIMD_MAXSZ_SHIFT)
        | ((data as u32) << SIMD_DATA_SHIFT)
}

pub fn simd_oprsz(desc: u32) -> usize {
    (((desc >> SIMD_OPRSZ_SHIFT) & 0xff) as usize + 1) * 8
}

pub fn simd_maxsz(desc: u32) -> usize {
    (((desc >> SIMD_MAXSZ_SHIFT) & 0xff) as usize + 1) * 8
}

pub fn simd_data(desc: u32) -> i32 {
    sextract32(desc, SIMD_DATA_SHIFT, SIMD_DATA_BITS)
}

/// 打包谓词助手描述符
///
/// 谓词寄存器可能小于 8 字节，因此 OPRSZ 记录精确字节数。
pub fn pred_desc(oprsz: u32, esz: u8, data: u32) -> u32 {
    debug_assert!(oprsz < (1 << PREDDESC_OPRSZ_BITS));
    oprsz | ((esz as u32 & 3) << PREDDESC_ESZ_SHIFT) | (data << PREDDESC_DATA_SHIFT)
}

pub fn pred_oprsz(desc: u32) -> usize {
    (desc & ((1 << PREDDESC_OPRSZ_BITS) - 1)) as usize
}

pub fn pred_esz(desc: u32) -> u8 {
    ((desc >> PREDDESC_ESZ_SHIFT) & 3) as u8
}

pub fn pred_data(desc: u32) -> u32 {
    desc >> PREDDESC_DATA_SHIFT
}

fn sextract32(value: u32, start: u32, len: u32) -> i32 {
    ((value << (32 - len - start)) as i32) >> (32 - len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simd_desc_fields() {
        let d = simd_desc(32, 256, -3);
        assert_eq!(simd_oprsz(d), 32);
        assert_eq!(simd_maxsz(d), 256);
        assert_eq!(simd_data(d), -3);
    }

    #[test]
    fn test_pred_desc_fields() {
        // 2048 位向量对应 32 字节谓词
        let d = pred_desc(32, 3, 1);
        assert_eq!(pred_oprsz(d), 32);
        assert_eq!(pred_esz(d), 3);
        assert_eq!(pred_data(d), 1);

        let small = pred_desc(2, 0, 0);
        assert_eq!(pred_oprsz(small), 2);
    }
}
