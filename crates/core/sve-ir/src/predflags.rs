//! PredTest 结果字
//!
//! 谓词测试类助手返回一个 32 位标志字，由 `IROp::SetPredFlags` 写入 NZCV。

/// PredTest 标志字初值：无活动元素时 N=0, Z=1, C=1
pub const PREDTEST_INIT: u32 = 1;

/// 已遇到第一个活动元素
const SEEN_FIRST: u32 = 4;

/// 把 PredTest 标志字拆成 (N, Z, C, V)
///
/// bit31 为 N，bit1 表示存在活动位（Z 取反），bit0 为 C。
pub fn predtest_nzcv(flags: u32) -> (bool, bool, bool, bool) {
    (flags & 0x8000_0000 != 0, flags & 2 == 0, flags & 1 != 0, false)
}

/// 按低位到高位的顺序累计一个 64 位谓词字
pub fn iter_predtest_fwd(d: u64, g: u64, mut flags: u32) -> u32 {
    if g == 0 {
        return flags;
    }
    if flags & SEEN_FIRST == 0 {
        // N: 第一个活动元素
        if d & g & g.wrapping_neg() != 0 {
            flags |= 0x8000_0000;
        }
        flags |= SEEN_FIRST;
    }
    if d & g != 0 {
        flags |= 2;
    }
    // C: 最后一个活动元素为假
    let last = 1u64 << (63 - g.leading_zeros());
    (flags & !1) | u32::from(d & last == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predtest_nzcv() {
        assert_eq!(predtest_nzcv(PREDTEST_INIT), (false, true, true, false));
        assert_eq!(predtest_nzcv(0x8000_0006), (true, false, false, false));
    }

    #[test]
    fn test_iter_predtest_fwd() {
        // 全部活动且全真
        let f = iter_predtest_fwd(0xff, 0xff, PREDTEST_INIT);
        assert_eq!(predtest_nzcv(f), (true, false, false, false));
        // 控制谓词为空时标志不变
        assert_eq!(iter_predtest_fwd(0xff, 0, PREDTEST_INIT), PREDTEST_INIT);
        // 第一个活动元素为假，最后一个为真
        let f = iter_predtest_fwd(0x80, 0x81, PREDTEST_INIT);
        assert_eq!(predtest_nzcv(f), (false, false, false, false));
    }
}
