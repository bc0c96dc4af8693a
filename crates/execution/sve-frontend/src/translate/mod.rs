//! 逐指令翻译函数
//!
//! 每个翻译函数签名为 `fn(&mut DisasContext<'_>, &Args) -> bool`：
//! 返回 `true` 表示已接受（可能只发射了一个陷入操作），`false` 表示拒绝。
//! SVE 特性本身由分派器统一检查，这里只检查 SVE2 及其后的扩展。

use sve_ir::{FpStatus, Gvec2iOp, Gvec3Op, Gvec4Op, Helper};

use crate::args::{RprEsz, RprrEsz, RrEsz, RriEsz, RrrEsz, RrrrEsz};
use crate::ctx::DisasContext;

/// 定义一个只依赖 SVE 的翻译函数
macro_rules! trans {
    ($name:ident, $args:ty, |$s:ident, $a:ident| $body:expr) => {
        pub(crate) fn $name($s: &mut DisasContext<'_>, $a: &$args) -> bool {
            $body
        }
    };
}

/// 定义一个需要额外特性的翻译函数；特性缺失时拒绝并记录原因
macro_rules! trans_feat {
    ($name:ident, $feat:ident, $args:ty, |$s:ident, $a:ident| $body:expr) => {
        pub(crate) fn $name($s: &mut DisasContext<'_>, $a: &$args) -> bool {
            $s.has_feature(sve_core::IsaFeatures::$feat) && $body
        }
    };
}

pub(crate) mod fp;
pub(crate) mod int;
pub(crate) mod mem;
pub(crate) mod permute;
pub(crate) mod predicate;
pub(crate) mod sve2;

// ----------------------------------------------------------------------
// 带访问检查的公共发射包装
//
// 助手为 `None` 表示该元素大小无对应实现，属于保留编码。
// ----------------------------------------------------------------------

pub(crate) fn gen_gvec_fn_arg_zzz(s: &mut DisasContext<'_>, op: Gvec3Op, a: &RrrEsz) -> bool {
    if s.sve_access_check() {
        s.gen_gvec_fn_zzz(op, a.esz, a.rd, a.rn, a.rm);
    }
    true
}

pub(crate) fn gen_gvec_fn_arg_zzzz(s: &mut DisasContext<'_>, op: Gvec4Op, a: &RrrrEsz) -> bool {
    if s.sve_access_check() {
        s.gen_gvec_fn_zzzz(op, a.rd, a.rn, a.rm, a.ra);
    }
    true
}

pub(crate) fn gen_gvec_fn_arg_zzi(s: &mut DisasContext<'_>, op: Gvec2iOp, a: &RriEsz) -> bool {
    if s.sve_access_check() {
        s.gen_gvec_fn_zzi(op, a.esz, a.rd, a.rn, a.imm);
    }
    true
}

pub(crate) fn gen_gvec_ool_zz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    rd: u32,
    rn: u32,
    data: i32,
) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if s.sve_access_check() {
        s.gen_gvec_ool_zz(helper, rd, rn, data);
    }
    true
}

pub(crate) fn gen_gvec_ool_zzz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    rd: u32,
    rn: u32,
    rm: u32,
    data: i32,
) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if s.sve_access_check() {
        s.gen_gvec_ool_zzz(helper, rd, rn, rm, data);
    }
    true
}

pub(crate) fn gen_gvec_ool_arg_zzz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    a: &RrrEsz,
    data: i32,
) -> bool {
    gen_gvec_ool_zzz(s, helper, a.rd, a.rn, a.rm, data)
}

pub(crate) fn gen_gvec_ool_zzzz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    rd: u32,
    rn: u32,
    rm: u32,
    ra: u32,
    data: i32,
) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if s.sve_access_check() {
        s.gen_gvec_ool_zzzz(helper, rd, rn, rm, ra, data);
    }
    true
}

pub(crate) fn gen_gvec_ool_arg_zzzz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    a: &RrrrEsz,
    data: i32,
) -> bool {
    gen_gvec_ool_zzzz(s, helper, a.rd, a.rn, a.rm, a.ra, data)
}

pub(crate) fn gen_gvec_ool_zzp(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    rd: u32,
    rn: u32,
    pg: u32,
    data: i32,
) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if s.sve_access_check() {
        s.gen_gvec_ool_zzp(helper, rd, rn, pg, data);
    }
    true
}

pub(crate) fn gen_gvec_ool_arg_zpz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    a: &RprEsz,
    data: i32,
) -> bool {
    gen_gvec_ool_zzp(s, helper, a.rd, a.rn, a.pg, data)
}

pub(crate) fn gen_gvec_ool_zzzp(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    rd: u32,
    rn: u32,
    rm: u32,
    pg: u32,
    data: i32,
) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if s.sve_access_check() {
        s.gen_gvec_ool_zzzp(helper, rd, rn, rm, pg, data);
    }
    true
}

pub(crate) fn gen_gvec_ool_arg_zpzz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    a: &RprrEsz,
    data: i32,
) -> bool {
    gen_gvec_ool_zzzp(s, helper, a.rd, a.rn, a.rm, a.pg, data)
}

pub(crate) fn gen_gvec_fpst_arg_zz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    a: &RrEsz,
    fpst: FpStatus,
) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if s.sve_access_check() {
        s.gen_gvec_fpst_zz(helper, a.rd, a.rn, 0, fpst);
    }
    true
}

pub(crate) fn gen_gvec_fpst_arg_zzz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    a: &RrrEsz,
    data: i32,
) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if s.sve_access_check() {
        let fpst = s.fpstatus(a.esz);
        s.gen_gvec_fpst_zzz(helper, a.rd, a.rn, a.rm, data, fpst);
    }
    true
}

pub(crate) fn gen_gvec_fpst_arg_zpz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    a: &RprEsz,
    fpst: FpStatus,
) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if s.sve_access_check() {
        s.gen_gvec_fpst_zzp(helper, a.rd, a.rn, a.pg, 0, fpst);
    }
    true
}

pub(crate) fn gen_gvec_fpst_arg_zpzz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    a: &RprrEsz,
) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if s.sve_access_check() {
        let fpst = s.fpstatus(a.esz);
        s.gen_gvec_fpst_zzzp(helper, a.rd, a.rn, a.rm, a.pg, 0, fpst);
    }
    true
}

pub(crate) fn gen_gvec_fpst_zzzz(
    s: &mut DisasContext<'_>,
    helper: Option<Helper>,
    a: &RrrrEsz,
    fpst: FpStatus,
) -> bool {
    let Some(helper) = helper else {
        return false;
    };
    if s.sve_access_check() {
        s.gen_gvec_fpst_zzzz(helper, a.rd, a.rn, a.rm, a.ra, 0, fpst);
    }
    true
}

/// 整数元素大小的助手选择：`esz` 不在 `min..=max` 内时为 `None`
pub(crate) fn esz_in(esz: u8, min: u8, max: u8, helper: Helper) -> Option<Helper> {
    (min..=max).contains(&esz).then_some(helper)
}

/// 浮点元素大小（半、单、双精度）
pub(crate) fn fp_esz(esz: u8, helper: Helper) -> Option<Helper> {
    esz_in(esz, 1, 3, helper)
}
