//! sve-frontend: SVE/SVE2 指令译码与翻译
//!
//! 一条 32 位指令字经模板表匹配后交给对应的翻译函数，翻译函数通过
//! `DisasContext` 向 `IRBuilder` 追加 IR 操作。翻译不保存跨指令状态。
//!
//! ```text
//! insn ──► decode::lookup ──► 格式函数（参数结构）──► translate::* ──► IROp
//! ```

pub mod args;
pub mod ctx;
pub mod decode;
pub mod emit;
pub mod encode;
pub mod extract;
pub mod pred;
mod translate;

use log::{debug, trace};
use sve_core::{DecodeError, IsaFeatures, SveConfig, SveError, SveResult};
use sve_ir::{IRBlock, IRBuilder};

pub use args::DecodedArgs;
pub use ctx::DisasContext;
pub use decode::{Decoded, decode, pattern_names};

/// 翻译一条指令所需的外部状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    /// 向量长度（字节）
    pub vl_bytes: u32,
    pub features: IsaFeatures,
    /// 访问检查：为假时每条被接受的指令只发射一个陷入操作
    pub sve_enabled: bool,
    pub mte_active: bool,
    pub big_endian: bool,
}

impl DecodeContext {
    pub fn from_config(config: &SveConfig) -> Self {
        Self {
            vl_bytes: config.vl_bytes,
            features: config.features,
            sve_enabled: config.sve_enabled,
            mte_active: config.mte_active,
            big_endian: config.big_endian,
        }
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::from_config(&SveConfig::default())
    }
}

/// 单条指令的翻译结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Emitted,
    /// 没有模板匹配（含 INVALID 保留编码）
    Unallocated,
    /// 模板匹配但字段组合保留
    Rejected { name: &'static str },
    /// 模板匹配但所需特性未启用
    FeatureUnavailable { name: &'static str, feature: IsaFeatures },
}

impl Outcome {
    pub fn is_emitted(&self) -> bool {
        matches!(self, Outcome::Emitted)
    }

    /// 转换为 `SveResult`；三种拒绝都映射为译码错误
    pub fn into_result(self, insn: u32) -> SveResult<()> {
        let source = match self {
            Outcome::Emitted => return Ok(()),
            Outcome::Unallocated => DecodeError::Unallocated(insn),
            Outcome::Rejected { name } => DecodeError::Rejected { name: name.to_string(), insn },
            Outcome::FeatureUnavailable { name, feature } => DecodeError::FeatureUnavailable {
                name: name.to_string(),
                feature: feature.label().to_string(),
                insn,
            },
        };
        let message = source.to_string();
        Err(SveError::Decode { source, message })
    }
}

/// 翻译一条指令，IR 追加到 `b`
///
/// 拒绝时已追加的操作会被回滚，`b` 保持调用前的状态。
pub fn translate_insn(ctx: &DecodeContext, b: &mut IRBuilder, insn: u32) -> Outcome {
    let Some(pattern) = decode::lookup(insn) else {
        debug!("unallocated encoding {insn:#010x}");
        return Outcome::Unallocated;
    };
    trace!("{insn:#010x}: {}", pattern.name);

    let mark = b.ops().len();
    let (ok, missing) = {
        let mut s = DisasContext::new(ctx, b.scope());
        let ok = (pattern.trans)(&mut s, insn);
        (ok, s.missing_feature())
    };
    if ok {
        return Outcome::Emitted;
    }

    b.truncate_ops(mark);
    match missing {
        Some(feature) => {
            debug!("{} ({insn:#010x}) requires {}", pattern.name, feature.label());
            Outcome::FeatureUnavailable { name: pattern.name, feature }
        }
        None => {
            debug!("{} ({insn:#010x}) rejected", pattern.name);
            Outcome::Rejected { name: pattern.name }
        }
    }
}

/// 把一串指令翻译为一个 IR 块
///
/// 遇到第一条被拒绝的指令即返回错误。
pub struct SveTranslator {
    ctx: DecodeContext,
}

impl SveTranslator {
    pub fn new(ctx: DecodeContext) -> Self {
        Self { ctx }
    }

    pub fn from_config(config: &SveConfig) -> Self {
        Self::new(DecodeContext::from_config(config))
    }

    pub fn context(&self) -> &DecodeContext {
        &self.ctx
    }

    pub fn translate_block(&self, insns: &[u32]) -> SveResult<IRBlock> {
        let mut b = IRBuilder::new();
        for &insn in insns {
            translate_insn(&self.ctx, &mut b, insn).into_result(insn)?;
        }
        Ok(b.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sve_ir::IROp;

    fn ctx(features: IsaFeatures) -> DecodeContext {
        DecodeContext {
            vl_bytes: 32,
            features,
            sve_enabled: true,
            mte_active: false,
            big_endian: false,
        }
    }

    #[test]
    fn test_unallocated_leaves_builder_untouched() {
        let mut b = IRBuilder::new();
        let out = translate_insn(&ctx(IsaFeatures::SVE), &mut b, 0);
        assert_eq!(out, Outcome::Unallocated);
        assert!(b.ops().is_empty());
    }

    #[test]
    fn test_feature_gate_reports_feature() {
        // EOR3 z0.d, z0.d, z1.d, z2.d
        let mut b = IRBuilder::new();
        let out = translate_insn(&ctx(IsaFeatures::SVE), &mut b, 0x0421_3840);
        assert_eq!(out, Outcome::FeatureUnavailable { name: "EOR3", feature: IsaFeatures::SVE2 });
        assert!(b.ops().is_empty());
        assert_eq!(b.live_temps(), 0);
    }

    #[test]
    fn test_reject_rolls_back() {
        // LSL_zpzi 的 tsz 全零为保留编码
        let mut b = IRBuilder::new();
        let out = translate_insn(&ctx(IsaFeatures::SVE), &mut b, 0x0403_8000);
        assert_eq!(out, Outcome::Rejected { name: "LSL_zpzi" });
        assert!(b.ops().is_empty());
    }

    #[test]
    fn test_access_disabled_emits_trap() {
        let mut c = ctx(IsaFeatures::SVE);
        c.sve_enabled = false;
        let mut b = IRBuilder::new();
        assert_eq!(translate_insn(&c, &mut b, 0x0420_0000), Outcome::Emitted);
        assert_eq!(b.ops(), &[IROp::AccessTrap]);
    }

    #[test]
    fn test_into_result_maps_decode_errors() {
        let err = Outcome::Unallocated.into_result(0x1234).unwrap_err();
        assert!(matches!(err, SveError::Decode { source: DecodeError::Unallocated(0x1234), .. }));
        assert!(Outcome::Emitted.into_result(0).is_ok());
    }

    #[test]
    fn test_translate_block_stops_at_first_reject() {
        let t = SveTranslator::new(ctx(IsaFeatures::SVE));
        let block = t.translate_block(&[0x0420_0000, 0x0460_0000]).unwrap();
        assert!(!block.ops.is_empty());
        assert!(t.translate_block(&[0x0420_0000, 0]).is_err());
    }
}
