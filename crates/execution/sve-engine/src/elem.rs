//! 向量元素与谓词位访问

/// 元素位宽
pub(crate) fn bits(esz: u8) -> u32 {
    8 << esz
}

pub(crate) fn mask(esz: u8) -> u64 {
    if esz >= 3 { u64::MAX } else { (1u64 << bits(esz)) - 1 }
}

/// 按元素大小符号扩展
pub(crate) fn sext(v: u64, esz: u8) -> i64 {
    let shift = 64 - bits(esz);
    ((v << shift) as i64) >> shift
}

pub(crate) fn get(buf: &[u8], i: usize, esz: u8) -> u64 {
    let n = 1usize << esz;
    let mut b = [0u8; 8];
    b[..n].copy_from_slice(&buf[i * n..i * n + n]);
    u64::from_le_bytes(b)
}

pub(crate) fn put(buf: &mut [u8], i: usize, esz: u8, v: u64) {
    let n = 1usize << esz;
    buf[i * n..i * n + n].copy_from_slice(&v.to_le_bytes()[..n]);
}

pub(crate) fn pred_bit(p: &[u8], bit: usize) -> bool {
    p.get(bit / 8).is_some_and(|b| (b >> (bit % 8)) & 1 != 0)
}

pub(crate) fn set_pred_bit(p: &mut [u8], bit: usize, v: bool) {
    if let Some(b) = p.get_mut(bit / 8) {
        let m = 1u8 << (bit % 8);
        if v { *b |= m } else { *b &= !m }
    }
}

/// 第 `i` 个 `esz` 元素是否活动
pub(crate) fn active(p: &[u8], i: usize, esz: u8) -> bool {
    pred_bit(p, i << esz)
}

/// 谓词的第 `i` 个 64 位字，不足部分补零
pub(crate) fn pred_word(p: &[u8], i: usize) -> u64 {
    let mut b = [0u8; 8];
    for (k, dst) in b.iter_mut().enumerate() {
        *dst = p.get(i * 8 + k).copied().unwrap_or(0);
    }
    u64::from_le_bytes(b)
}

pub(crate) fn put_pred_word(p: &mut [u8], i: usize, w: u64) {
    for (k, byte) in w.to_le_bytes().iter().enumerate() {
        if let Some(dst) = p.get_mut(i * 8 + k) {
            *dst = *byte;
        }
    }
}

/// 每个元素最低位为 1 的谓词掩码
pub(crate) fn esz_ones(esz: u8) -> u64 {
    const MASKS: [u64; 4] = [
        0xffff_ffff_ffff_ffff,
        0x5555_5555_5555_5555,
        0x1111_1111_1111_1111,
        0x0101_0101_0101_0101,
    ];
    MASKS[esz as usize & 3]
}

pub(crate) fn sat_signed(v: i128, esz: u8) -> u64 {
    let max = (mask(esz) >> 1) as i128;
    let min = -max - 1;
    (v.clamp(min, max) as u64) & mask(esz)
}

pub(crate) fn sat_unsigned(v: i128, esz: u8) -> u64 {
    v.clamp(0, mask(esz) as i128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_put() {
        let mut buf = [0u8; 16];
        put(&mut buf, 1, 2, 0xdead_beef);
        assert_eq!(get(&buf, 1, 2), 0xdead_beef);
        assert_eq!(get(&buf, 2, 1), 0xbeef);
        assert_eq!(sext(0x80, 0), -128);
        assert_eq!(sext(0x7fff, 1), 0x7fff);
    }

    #[test]
    fn test_saturation_bounds() {
        for esz in 0..4u8 {
            let max = mask(esz) >> 1;
            assert_eq!(sat_signed(i128::MAX, esz), max);
            assert_eq!(sat_signed(i128::MIN, esz), (max + 1) & mask(esz));
            assert_eq!(sat_unsigned(-1, esz), 0);
            assert_eq!(sat_unsigned(1 << 70, esz), mask(esz));
        }
    }

    #[test]
    fn test_pred_words() {
        let mut p = [0u8; 10];
        put_pred_word(&mut p, 1, 0xffff_ffff);
        assert_eq!(&p[8..], &[0xff, 0xff]);
        assert_eq!(pred_word(&p, 1), 0xffff);
        assert!(active(&p, 64, 0));
        assert!(!active(&p, 1, 3));
    }
}
