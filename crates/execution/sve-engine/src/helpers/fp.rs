//! 浮点助手
//!
//! 半精度与单精度先扩展到 f64 计算，再舍入回原格式；加减乘除与平方根
//! 这样得到的结果与直接计算一致。算术固定为就近舍入，只有 FRINT 类按
//! 状态字中的模式取整。

use half::{bf16, f16};
use sve_ir::desc::{simd_data, simd_oprsz};
use sve_ir::{FpBinOp, FpCmpOp, FpMlaOp, FpReduceOp, FpUnOp, FpZzOp, FpZzzzOp, Helper, Rounding};

use super::{Args, HelperResult};
use crate::elem::{self, active, bits, mask, sext};
use crate::state::CpuState;

/// (指数位数, 尾数位数)
fn layout(esz: u8) -> (u32, u32) {
    match esz {
        1 => (5, 10),
        2 => (8, 23),
        _ => (11, 52),
    }
}

fn quiet_bit(esz: u8) -> u64 {
    1u64 << (layout(esz).1 - 1)
}

fn default_nan(esz: u8) -> u64 {
    let (e, m) = layout(esz);
    (((1u64 << e) - 1) << m) | quiet_bit(esz)
}

fn to_f64(v: u64, esz: u8) -> f64 {
    match esz {
        1 => f16::from_bits(v as u16).to_f64(),
        2 => f32::from_bits(v as u32) as f64,
        _ => f64::from_bits(v),
    }
}

fn from_f64(v: f64, esz: u8) -> u64 {
    match esz {
        1 => f16::from_f64(v).to_bits() as u64,
        2 => (v as f32).to_bits() as u64,
        _ => v.to_bits(),
    }
}

fn is_nan(v: u64, esz: u8) -> bool {
    to_f64(v & mask(esz), esz).is_nan()
}

fn is_snan(v: u64, esz: u8) -> bool {
    is_nan(v, esz) && v & quiet_bit(esz) == 0
}

/// NaN 传播：信号 NaN 优先，其次按操作数顺序取第一个静默 NaN
fn propagate(ops: &[u64], esz: u8) -> Option<u64> {
    ops.iter()
        .find(|&&v| is_snan(v, esz))
        .or_else(|| ops.iter().find(|&&v| is_nan(v, esz)))
        .map(|&v| (v | quiet_bit(esz)) & mask(esz))
}

fn finish(r: f64, esz: u8) -> u64 {
    if r.is_nan() { default_nan(esz) } else { from_f64(r, esz) }
}

fn fmax(x: f64, y: f64) -> f64 {
    if x == 0.0 && y == 0.0 {
        if x.is_sign_negative() && y.is_sign_negative() { -0.0 } else { 0.0 }
    } else {
        x.max(y)
    }
}

fn fmin(x: f64, y: f64) -> f64 {
    if x == 0.0 && y == 0.0 {
        if x.is_sign_negative() || y.is_sign_negative() { -0.0 } else { 0.0 }
    } else {
        x.min(y)
    }
}

fn zero_times_inf(x: f64, y: f64) -> bool {
    (x == 0.0 && y.is_infinite()) || (x.is_infinite() && y == 0.0)
}

/// `x * 2^k`
fn scale(x: f64, k: i64) -> f64 {
    let mut k = k.clamp(-2200, 2200);
    let mut r = x;
    while k > 1000 {
        r *= 2f64.powi(1000);
        k -= 1000;
    }
    while k < -1000 {
        r *= 2f64.powi(-1000);
        k += 1000;
    }
    r * 2f64.powi(k as i32)
}

fn binop(op: FpBinOp, n: u64, m: u64, esz: u8) -> u64 {
    let (n, m) = (n & mask(esz), m & mask(esz));
    if op == FpBinOp::Scale {
        // m 为整数
        if is_nan(n, esz) {
            return propagate(&[n], esz).unwrap_or(n);
        }
        return finish(scale(to_f64(n, esz), sext(m, esz)), esz);
    }
    if matches!(op, FpBinOp::Maxnm | FpBinOp::Minnm) {
        // 一个静默 NaN 与一个数：取数
        let (qn, qm) = (is_nan(n, esz) && !is_snan(n, esz), is_nan(m, esz) && !is_snan(m, esz));
        if qn && !is_nan(m, esz) {
            return m;
        }
        if qm && !is_nan(n, esz) {
            return n;
        }
    }
    if let Some(nan) = propagate(&[n, m], esz) {
        return nan;
    }
    let (x, y) = (to_f64(n, esz), to_f64(m, esz));
    let r = match op {
        FpBinOp::Add => x + y,
        FpBinOp::Sub => x - y,
        FpBinOp::Subr => y - x,
        FpBinOp::Mul => x * y,
        FpBinOp::Mulx if zero_times_inf(x, y) => 2.0 * x.signum() * y.signum(),
        FpBinOp::Mulx => x * y,
        FpBinOp::Div => x / y,
        FpBinOp::Maxnm | FpBinOp::Max => fmax(x, y),
        FpBinOp::Minnm | FpBinOp::Min => fmin(x, y),
        FpBinOp::Abd => (x - y).abs(),
        FpBinOp::Tsmul => {
            let sq = x * x;
            if m & 1 != 0 { -sq.abs() } else { sq.abs() }
        }
        FpBinOp::Recps if zero_times_inf(x, y) => 2.0,
        FpBinOp::Recps => (-x).mul_add(y, 2.0),
        FpBinOp::Rsqrts if zero_times_inf(x, y) => 1.5,
        FpBinOp::Rsqrts => (-x).mul_add(y, 3.0) / 2.0,
        FpBinOp::Scale => unreachable!("handled above"),
    };
    finish(r, esz)
}

fn round(x: f64, mode: Rounding) -> f64 {
    match mode {
        Rounding::TieEven => x.round_ties_even(),
        Rounding::PosInf => x.ceil(),
        Rounding::NegInf => x.floor(),
        Rounding::TieAway => x.round(),
        Rounding::Zero | Rounding::Odd => x.trunc(),
    }
}

fn recpx(v: u64, esz: u8) -> u64 {
    let (eb, mb) = layout(esz);
    let emax = (1u64 << eb) - 1;
    let sign = v & (1u64 << (eb + mb));
    let exp = (v >> mb) & emax;
    let new_exp = if exp == 0 { emax - 1 } else { !exp & emax };
    sign | (new_exp << mb)
}

/// 一元运算；`esz` 为容器大小
fn unop(op: FpUnOp, v: u64, esz: u8, mode: Rounding) -> u64 {
    match op {
        FpUnOp::Rint | FpUnOp::RintX => {
            let v = v & mask(esz);
            match propagate(&[v], esz) {
                Some(nan) => nan,
                None => from_f64(round(to_f64(v, esz), mode), esz),
            }
        }
        FpUnOp::Recpx => {
            let v = v & mask(esz);
            propagate(&[v], esz).unwrap_or_else(|| recpx(v, esz))
        }
        FpUnOp::Sqrt => {
            let v = v & mask(esz);
            match propagate(&[v], esz) {
                Some(nan) => nan,
                None => finish(to_f64(v, esz).sqrt(), esz),
            }
        }
        FpUnOp::Fcvt { from, to } => {
            let v = v & mask(from);
            if is_nan(v, from) {
                // 保留符号，尾数高位截断
                let (_, mb_from) = layout(from);
                let (eb_to, mb_to) = layout(to);
                let sign = (v >> (bits(from) - 1)) & 1;
                let payload = (v & ((1u64 << mb_from) - 1)) >> mb_from.saturating_sub(mb_to);
                let payload = payload << mb_to.saturating_sub(mb_from);
                return (sign << (eb_to + mb_to)) | (((1u64 << eb_to) - 1) << mb_to) | payload | quiet_bit(to);
            }
            from_f64(to_f64(v, from), to)
        }
        FpUnOp::FcvtToInt { signed, from, to } => {
            let x = to_f64(v & mask(from), from);
            let (lo, hi) = if signed {
                let half_range = 1i128 << (bits(to) - 1);
                (-half_range, half_range - 1)
            } else {
                (0, mask(to) as i128)
            };
            let r = if x.is_nan() { 0 } else { (x.trunc() as i128).clamp(lo, hi) };
            (r as u64) & mask(esz)
        }
        FpUnOp::IntToFp { signed, from, to } => {
            let raw = v & mask(from);
            match to {
                2 if signed => (sext(raw, from) as f32).to_bits() as u64,
                2 => (raw as f32).to_bits() as u64,
                _ if signed => from_f64(sext(raw, from) as f64, to),
                _ => from_f64(raw as f64, to),
            }
        }
        FpUnOp::Bfcvt => bf16::from_f32(f32::from_bits(v as u32)).to_bits() as u64,
    }
}

/// 倒数与平方根倒数估计，保留 8 位尾数
fn estimate(op: FpZzOp, v: u64, esz: u8) -> u64 {
    let v = v & mask(esz);
    if let Some(nan) = propagate(&[v], esz) {
        return nan;
    }
    let x = to_f64(v, esz);
    let r = match op {
        FpZzOp::Recpe => 1.0 / x,
        FpZzOp::Rsqrte if x < 0.0 => return default_nan(esz),
        FpZzOp::Rsqrte => 1.0 / x.sqrt(),
    };
    let out = from_f64(r, esz);
    let mb = layout(esz).1;
    if r.is_finite() && r != 0.0 { out & !((1u64 << (mb - 8)) - 1) } else { out }
}

fn compare(op: FpCmpOp, n: u64, m: u64, esz: u8) -> bool {
    let (x, y) = (to_f64(n & mask(esz), esz), to_f64(m & mask(esz), esz));
    match op {
        FpCmpOp::Ge => x >= y,
        FpCmpOp::Gt => x > y,
        FpCmpOp::Le => x <= y,
        FpCmpOp::Lt => x < y,
        FpCmpOp::Eq => x == y,
        FpCmpOp::Ne => x != y,
        FpCmpOp::Uo => x.is_nan() || y.is_nan(),
        FpCmpOp::Acge => x.abs() >= y.abs(),
        FpCmpOp::Acgt => x.abs() > y.abs(),
    }
}

fn muladd(op: FpMlaOp, n: u64, m: u64, a: u64, esz: u8) -> u64 {
    let (n, m, a) = (n & mask(esz), m & mask(esz), a & mask(esz));
    if let Some(nan) = propagate(&[a, n, m], esz) {
        return nan;
    }
    let (x, y, z) = (to_f64(n, esz), to_f64(m, esz), to_f64(a, esz));
    let r = match op {
        FpMlaOp::Fmla => x.mul_add(y, z),
        FpMlaOp::Fmls => (-x).mul_add(y, z),
        FpMlaOp::Fnmla => (-x).mul_add(y, -z),
        FpMlaOp::Fnmls => x.mul_add(y, -z),
    };
    finish(r, esz)
}

fn reduce_identity(op: FpReduceOp, esz: u8) -> u64 {
    match op {
        FpReduceOp::Addv => 0,
        FpReduceOp::Maxnmv | FpReduceOp::Minnmv => default_nan(esz),
        FpReduceOp::Maxv => from_f64(f64::NEG_INFINITY, esz),
        FpReduceOp::Minv => from_f64(f64::INFINITY, esz),
    }
}

/// 两两成对的树形归约
fn reduce_tree(op: FpReduceOp, vals: &[u64], esz: u8) -> u64 {
    if vals.len() == 1 {
        return vals[0];
    }
    let (lo, hi) = vals.split_at(vals.len() / 2);
    let bin = match op {
        FpReduceOp::Addv => FpBinOp::Add,
        FpReduceOp::Maxnmv => FpBinOp::Maxnm,
        FpReduceOp::Minnmv => FpBinOp::Minnm,
        FpReduceOp::Maxv => FpBinOp::Max,
        FpReduceOp::Minv => FpBinOp::Min,
    };
    binop(bin, reduce_tree(op, lo, esz), reduce_tree(op, hi, esz), esz)
}

fn bf16_at(buf: &[u8], i: usize) -> f64 {
    bf16::from_bits(elem::get(buf, i, 1) as u16).to_f64()
}

fn f32_at(buf: &[u8], i: usize) -> f64 {
    f32::from_bits(elem::get(buf, i, 2) as u32) as f64
}

fn zzzz(op: FpZzzzOp, d: &mut [u8], n: &[u8], m: &[u8], acc: &[u8]) {
    match op {
        FpZzzzOp::Bfdot => {
            for i in 0..d.len() / 4 {
                let sum = f32_at(acc, i)
                    + bf16_at(n, 2 * i) * bf16_at(m, 2 * i)
                    + bf16_at(n, 2 * i + 1) * bf16_at(m, 2 * i + 1);
                elem::put(d, i, 2, (sum as f32).to_bits() as u64);
            }
        }
        FpZzzzOp::Bfmmla => {
            for seg in 0..d.len() / 16 {
                for i in 0..2 {
                    for j in 0..2 {
                        let e = seg * 4 + i * 2 + j;
                        let sum: f64 = (0..4)
                            .map(|k| bf16_at(n, seg * 8 + i * 4 + k) * bf16_at(m, seg * 8 + j * 4 + k))
                            .sum();
                        elem::put(d, e, 2, ((f32_at(acc, e) + sum) as f32).to_bits() as u64);
                    }
                }
            }
        }
        FpZzzzOp::Fmmla => {
            // 只处理完整的 256 位段
            let f = |buf: &[u8], i: usize| f64::from_bits(elem::get(buf, i, 3));
            for seg in 0..d.len() / 32 {
                for i in 0..2 {
                    for j in 0..2 {
                        let e = seg * 4 + i * 2 + j;
                        let p0 = f(n, seg * 4 + i * 2) * f(m, seg * 4 + j * 2);
                        let r = f(n, seg * 4 + i * 2 + 1).mul_add(f(m, seg * 4 + j * 2 + 1), p0 + f(acc, e));
                        elem::put(d, e, 3, r.to_bits());
                    }
                }
            }
        }
    }
}

pub(super) fn call(cpu: &mut CpuState, helper: Helper, a: &Args<'_>) -> HelperResult<Option<u64>> {
    match helper {
        Helper::FpZzz { op, esz } => {
            let vsz = simd_oprsz(a.desc(4)?);
            let n = cpu.read(a.env(1)?, vsz)?;
            let m = cpu.read(a.env(2)?, vsz)?;
            let mut d = vec![0u8; vsz];
            for i in 0..vsz >> esz {
                elem::put(&mut d, i, esz, binop(op, elem::get(&n, i, esz), elem::get(&m, i, esz), esz));
            }
            cpu.write(a.env(0)?, &d)?;
            Ok(None)
        }
        Helper::FpZpzz { op, esz } => {
            let vsz = simd_oprsz(a.desc(5)?);
            let dofs = a.env(0)?;
            let n = cpu.read(a.env(1)?, vsz)?;
            let m = cpu.read(a.env(2)?, vsz)?;
            let g = cpu.read(a.env(3)?, vsz / 8)?;
            let mut d = cpu.read(dofs, vsz)?;
            for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
                elem::put(&mut d, i, esz, binop(op, elem::get(&n, i, esz), elem::get(&m, i, esz), esz));
            }
            cpu.write(dofs, &d)?;
            Ok(None)
        }
        Helper::FpZpzs { op, esz } => {
            let vsz = simd_oprsz(a.desc(5)?);
            let dofs = a.env(0)?;
            let n = cpu.read(a.env(1)?, vsz)?;
            let g = cpu.read(a.env(2)?, vsz / 8)?;
            let scalar = a.temp(3)?;
            let mut d = cpu.read(dofs, vsz)?;
            for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
                elem::put(&mut d, i, esz, binop(op, elem::get(&n, i, esz), scalar, esz));
            }
            cpu.write(dofs, &d)?;
            Ok(None)
        }
        Helper::FpZpz { op, esz } => {
            let vsz = simd_oprsz(a.desc(4)?);
            let mode = cpu.rounding(a.fpst(3)?);
            let dofs = a.env(0)?;
            let n = cpu.read(a.env(1)?, vsz)?;
            let g = cpu.read(a.env(2)?, vsz / 8)?;
            let mut d = cpu.read(dofs, vsz)?;
            for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
                elem::put(&mut d, i, esz, unop(op, elem::get(&n, i, esz), esz, mode));
            }
            cpu.write(dofs, &d)?;
            Ok(None)
        }
        Helper::FpZz { op, esz } => {
            let vsz = simd_oprsz(a.desc(3)?);
            let n = cpu.read(a.env(1)?, vsz)?;
            let mut d = vec![0u8; vsz];
            for i in 0..vsz >> esz {
                elem::put(&mut d, i, esz, estimate(op, elem::get(&n, i, esz), esz));
            }
            cpu.write(a.env(0)?, &d)?;
            Ok(None)
        }
        Helper::FpReduce { op, esz } => {
            let desc = a.desc(3)?;
            let vsz = simd_oprsz(desc);
            let p2vsz = (simd_data(desc).max(0) as usize).max(vsz);
            let n = cpu.read(a.env(0)?, vsz)?;
            let g = cpu.read(a.env(1)?, vsz / 8)?;
            let ident = reduce_identity(op, esz);
            let vals: Vec<u64> = (0..p2vsz >> esz)
                .map(|i| {
                    if i < vsz >> esz && active(&g, i, esz) { elem::get(&n, i, esz) } else { ident }
                })
                .collect();
            Ok(Some(reduce_tree(op, &vals, esz)))
        }
        Helper::Fadda { esz } => {
            let vsz = simd_oprsz(a.desc(4)?);
            let m = cpu.read(a.env(1)?, vsz)?;
            let g = cpu.read(a.env(2)?, vsz / 8)?;
            let acc = (0..vsz >> esz)
                .filter(|&i| active(&g, i, esz))
                .fold(a.temp(0)? & mask(esz), |acc, i| binop(FpBinOp::Add, acc, elem::get(&m, i, esz), esz));
            Ok(Some(acc))
        }
        Helper::FpCmp { op, esz, zero } => {
            let gi = if zero { 2 } else { 3 };
            let vsz = simd_oprsz(a.desc(gi + 2)?);
            let n = cpu.read(a.env(1)?, vsz)?;
            let m = if zero { vec![0u8; vsz] } else { cpu.read(a.env(2)?, vsz)? };
            let g = cpu.read(a.env(gi)?, vsz / 8)?;
            let mut d = vec![0u8; vsz / 8];
            for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
                let hit = compare(op, elem::get(&n, i, esz), elem::get(&m, i, esz), esz);
                elem::set_pred_bit(&mut d, i << esz, hit);
            }
            cpu.write(a.env(0)?, &d)?;
            Ok(None)
        }
        Helper::FpMla { op, esz } => {
            let vsz = simd_oprsz(a.desc(6)?);
            let dofs = a.env(0)?;
            let n = cpu.read(a.env(1)?, vsz)?;
            let m = cpu.read(a.env(2)?, vsz)?;
            let acc = cpu.read(a.env(3)?, vsz)?;
            let g = cpu.read(a.env(4)?, vsz / 8)?;
            let mut d = cpu.read(dofs, vsz)?;
            for i in (0..vsz >> esz).filter(|&i| active(&g, i, esz)) {
                let r = muladd(op, elem::get(&n, i, esz), elem::get(&m, i, esz), elem::get(&acc, i, esz), esz);
                elem::put(&mut d, i, esz, r);
            }
            cpu.write(dofs, &d)?;
            Ok(None)
        }
        Helper::FpZzzz { op, .. } => {
            let vsz = simd_oprsz(a.desc(5)?);
            let dofs = a.env(0)?;
            let n = cpu.read(a.env(1)?, vsz)?;
            let m = cpu.read(a.env(2)?, vsz)?;
            let acc = cpu.read(a.env(3)?, vsz)?;
            let mut d = cpu.read(dofs, vsz)?;
            zzzz(op, &mut d, &n, &m, &acc);
            cpu.write(dofs, &d)?;
            Ok(None)
        }
        _ => unreachable!("{helper:?} is not a floating-point helper"),
    }
}
