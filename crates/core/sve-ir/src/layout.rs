//! 架构寄存器在 env 字节数组中的布局
//!
//! Z 寄存器按架构最大长度（256 字节）分配槽位，P 寄存器按 32 字节分配；
//! 实际只有前 VL（或 VL/8）字节有意义。元素按小端序存放。

/// Z 寄存器槽位大小
pub const ZREG_SLOT: u32 = 256;
/// P 寄存器槽位大小
pub const PREG_SLOT: u32 = 32;
/// 第一容错寄存器在谓词寄存器组中的编号
pub const FFR_PRED_NUM: u32 = 16;

pub const ZREG_BASE: u32 = 0;
pub const PREG_BASE: u32 = ZREG_BASE + 32 * ZREG_SLOT;
/// 谓词暂存槽，用于写目的前保存被覆盖的控制谓词
pub const PREG_TMP: u32 = PREG_BASE + (FFR_PRED_NUM + 1) * PREG_SLOT;
pub const ENV_SIZE: usize = (PREG_TMP + PREG_SLOT) as usize;

pub fn vec_full_reg_offset(reg: u32) -> u32 {
    debug_assert!(reg < 32);
    ZREG_BASE + reg * ZREG_SLOT
}

pub fn pred_full_reg_offset(reg: u32) -> u32 {
    debug_assert!(reg <= FFR_PRED_NUM);
    PREG_BASE + reg * PREG_SLOT
}

/// 寄存器 `reg` 中第 `element` 个 `esz` 元素的偏移
pub fn vec_reg_offset(reg: u32, element: u32, esz: u8) -> u32 {
    vec_full_reg_offset(reg) + (element << esz)
}

/// 按偏移判断所属的 Z 寄存器编号（调试输出用）
pub fn zreg_of_offset(ofs: u32) -> Option<u32> {
    (ofs < PREG_BASE).then(|| (ofs - ZREG_BASE) / ZREG_SLOT)
}

/// 按偏移判断所属的 P 寄存器编号（16 为 FFR）
pub fn preg_of_offset(ofs: u32) -> Option<u32> {
    (PREG_BASE..PREG_TMP)
        .contains(&ofs)
        .then(|| (ofs - PREG_BASE) / PREG_SLOT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_do_not_overlap() {
        assert_eq!(vec_full_reg_offset(31) + ZREG_SLOT, PREG_BASE);
        assert_eq!(pred_full_reg_offset(FFR_PRED_NUM) + PREG_SLOT, PREG_TMP);
        assert_eq!(ENV_SIZE as u32, PREG_TMP + PREG_SLOT);
    }

    #[test]
    fn test_offset_lookup() {
        assert_eq!(zreg_of_offset(vec_reg_offset(5, 3, 2)), Some(5));
        assert_eq!(preg_of_offset(pred_full_reg_offset(16)), Some(16));
        assert_eq!(preg_of_offset(PREG_TMP), None);
    }
}
