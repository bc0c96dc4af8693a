//! 单条指令的翻译上下文

use std::ops::{Deref, DerefMut};

use log::debug;
use sve_core::IsaFeatures;
use sve_ir::{IRBuilder, IROp, TempScope};

use crate::DecodeContext;
use crate::pred::size_for_gvec;

/// 翻译一条指令期间的状态
///
/// 持有一个临时值作用域，指令翻译结束（无论接受或拒绝）时全部临时值随之释放。
pub struct DisasContext<'a> {
    b: TempScope<'a>,
    vl: u32,
    features: IsaFeatures,
    sve_enabled: bool,
    mte_active: bool,
    be: bool,
    missing_feature: Option<IsaFeatures>,
}

impl<'a> DisasContext<'a> {
    pub fn new(ctx: &DecodeContext, b: TempScope<'a>) -> Self {
        Self {
            b,
            vl: ctx.vl_bytes,
            features: ctx.features,
            sve_enabled: ctx.sve_enabled,
            mte_active: ctx.mte_active,
            be: ctx.big_endian,
            missing_feature: None,
        }
    }

    /// 向量寄存器字节数（VL）
    pub fn vec_full_reg_size(&self) -> u32 {
        self.vl
    }

    /// 谓词寄存器字节数（VL / 8）
    pub fn pred_full_reg_size(&self) -> u32 {
        self.vl >> 3
    }

    /// 谓词 gvec 操作的字节数
    pub fn pred_gvec_reg_size(&self) -> u32 {
        size_for_gvec(self.pred_full_reg_size())
    }

    pub fn mte_active(&self) -> bool {
        self.mte_active
    }

    pub fn big_endian(&self) -> bool {
        self.be
    }

    /// SVE 访问检查
    ///
    /// 不可用时发射陷入操作并返回 false；调用者此时仍应报告指令已接受。
    pub fn sve_access_check(&mut self) -> bool {
        if self.sve_enabled {
            return true;
        }
        debug!("SVE access disabled, emitting trap");
        self.b.push(IROp::AccessTrap);
        false
    }

    /// 特性检查，缺失时记录下来供分派器区分拒绝原因
    pub fn has_feature(&mut self, feature: IsaFeatures) -> bool {
        if self.features.contains(feature) {
            true
        } else {
            self.missing_feature = Some(feature);
            false
        }
    }

    pub fn missing_feature(&self) -> Option<IsaFeatures> {
        self.missing_feature
    }
}

impl Deref for DisasContext<'_> {
    type Target = IRBuilder;

    fn deref(&self) -> &IRBuilder {
        &self.b
    }
}

impl DerefMut for DisasContext<'_> {
    fn deref_mut(&mut self) -> &mut IRBuilder {
        &mut self.b
    }
}
