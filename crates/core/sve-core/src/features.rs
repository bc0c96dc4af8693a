//! 可选 ISA 特性集合

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// 当前 CPU 实现的向量扩展特性
    ///
    /// 译码器不读取特性；由各翻译函数在发射前检查。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct IsaFeatures: u32 {
        const SVE = 1 << 0;
        const SVE2 = 1 << 1;
        const BF16 = 1 << 2;
        const I8MM = 1 << 3;
        const F64MM = 1 << 4;
    }
}

impl IsaFeatures {
    /// 以逗号分隔的名称列表解析特性，如 `"sve,sve2,i8mm"`
    pub fn parse_list(list: &str) -> Option<Self> {
        let mut features = IsaFeatures::empty();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let flag = match name.to_ascii_lowercase().as_str() {
                "sve" => IsaFeatures::SVE,
                "sve2" => IsaFeatures::SVE2,
                "bf16" => IsaFeatures::BF16,
                "i8mm" => IsaFeatures::I8MM,
                "f64mm" => IsaFeatures::F64MM,
                _ => return None,
            };
            features |= flag;
        }
        Some(features)
    }

    /// Human readable name of a single flag.
    pub fn label(self) -> &'static str {
        match self {
            f if f == IsaFeatures::SVE => "SVE",
            f if f == IsaFeatures::SVE2 => "SVE2",
            f if f == IsaFeatures::BF16 => "BF16",
            f if f == IsaFeatures::I8MM => "I8MM",
            f if f == IsaFeatures::F64MM => "F64MM",
            _ => "mixed",
        }
    }
}

impl Default for IsaFeatures {
    fn default() -> Self {
        IsaFeatures::SVE | IsaFeatures::SVE2
    }
}
