//! 出线（out-of-line）助手函数标识
//!
//! 每个 `Helper` 对应解释器中一个固定签名的实现；参数次序在变体注释中给出。
//! 元素大小与子操作码以枚举字段携带，不依赖布尔下标的多维数组。

/// 浮点状态句柄
///
/// 半精度运算使用独立的状态字（对应 FPCR.FZ16）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpStatus {
    A64,
    A64F16,
}

impl FpStatus {
    pub fn for_esz(esz: u8) -> Self {
        if esz == 1 { FpStatus::A64F16 } else { FpStatus::A64 }
    }
}

/// IEEE 舍入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rounding {
    #[default]
    TieEven,
    PosInf,
    NegInf,
    Zero,
    TieAway,
    Odd,
}

impl Rounding {
    /// FPCR.RMode 编码
    pub fn from_rmode(rmode: u32) -> Self {
        match rmode & 3 {
            0 => Rounding::TieEven,
            1 => Rounding::PosInf,
            2 => Rounding::NegInf,
            _ => Rounding::Zero,
        }
    }

    pub fn as_u64(self) -> u64 {
        match self {
            Rounding::TieEven => 0,
            Rounding::PosInf => 1,
            Rounding::NegInf => 2,
            Rounding::Zero => 3,
            Rounding::TieAway => 4,
            Rounding::Odd => 5,
        }
    }

    pub fn from_u64(v: u64) -> Self {
        match v {
            1 => Rounding::PosInf,
            2 => Rounding::NegInf,
            3 => Rounding::Zero,
            4 => Rounding::TieAway,
            5 => Rounding::Odd,
            _ => Rounding::TieEven,
        }
    }
}

/// Predicated binary integer ops, merging into the first operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZpzzOp {
    Add,
    Sub,
    Smax,
    Umax,
    Smin,
    Umin,
    Sabd,
    Uabd,
    Mul,
    Smulh,
    Umulh,
    Sdiv,
    Udiv,
    Orr,
    Eor,
    And,
    Bic,
    Asr,
    Lsr,
    Lsl,
    /// 第二操作数为 64 位元素
    AsrWide,
    LsrWide,
    LslWide,
    /// 非活动元素取第二操作数
    Sel,
    Splice,
}

/// Predicated unary ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZpzOp {
    Cls,
    Clz,
    Cnt,
    Cnot,
    Fabs,
    Fneg,
    Not,
    Sxtb,
    Uxtb,
    Sxth,
    Uxth,
    Sxtw,
    Uxtw,
    Abs,
    Neg,
    Revb,
    Revh,
    Revw,
    Rbit,
    Sqabs,
    Sqneg,
    /// 活动元素依次紧缩到低位，其余清零
    Compact,
    /// 按谓词清零；data 为 1 时取反谓词
    Movz,
}

/// Predicated shift-by-immediate ops; the shift is the descriptor data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZpziOp {
    Asr,
    Lsr,
    Lsl,
    Asrd,
    Sqshl,
    Uqshl,
    Srshr,
    Urshr,
    Sqshlu,
}

/// Predicated multiply-accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZpzzzOp {
    Mla,
    Mls,
}

/// Unpredicated three-register ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZzzOp {
    AsrWide,
    LsrWide,
    LslWide,
    Tbl,
    /// 目的寄存器同时为输入
    Tbx,
    /// data: 源操作数起始字节偏移（ZIP2 为 VL/2）
    Zip,
    /// data: 0 取偶数元素，否则为元素字节数（取奇数元素）
    Uzp,
    Trn,
    /// data: 字节偏移
    Ext,
    /// data: 移位量
    AdrP32,
    AdrP64,
    AdrS32,
    AdrU32,
    Ftssel,
    Smulh,
    Umulh,
    Pmul,
    Sqdmulh,
    Sqrdmulh,
    /// data: bit0 选择 n 的高半，bit1 选择 m 的高半
    Saddl,
    Uaddl,
    Ssubl,
    Usubl,
    Sabdl,
    Uabdl,
    Smull,
    Umull,
    /// data: 1 表示取 m 的奇数半
    Saddw,
    Uaddw,
    Ssubw,
    Usubw,
    /// data: 1 写入高半（保留低半）
    Addhn,
    Subhn,
    /// data: 循环右移量
    Xar,
}

/// Unpredicated four-register integer ops (`d, n, m, a`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZzzzOp {
    Sdot,
    Udot,
    Usdot,
    Smmla,
    Ummla,
    Usmmla,
    /// (d, 表一, 表二, 下标)
    Tbl2,
    Saba,
    Uaba,
}

/// Unpredicated two-register ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZzOp {
    SunpkLo,
    SunpkHi,
    UunpkLo,
    UunpkHi,
    Rev,
    /// data: shift | top << 8
    Sshll,
    Ushll,
    Shrn,
    Rshrn,
    Sqshrn,
    Uqshrn,
    Sqshrun,
    /// data: top
    Sqxtn,
    Uqxtn,
    Sqxtun,
    /// 目的寄存器累加；data: 移位量
    Ssra,
    Usra,
    Srsra,
    Ursra,
    Sri,
    Sli,
}

/// Unpredicated vector op with a scalar operand (`d, n, val`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZziOp {
    Smax,
    Umax,
    Smin,
    Umin,
    Subr,
    Insr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    Orv,
    Eorv,
    Andv,
    Saddv,
    Uaddv,
    Smaxv,
    Umaxv,
    Sminv,
    Uminv,
}

/// Integer compare conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    Hs,
    Hi,
    Ls,
    Lo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrkOp {
    Pa,
    Pb,
    Am,
    Az,
    Bm,
    Bz,
    N,
}

/// Predicate permutes; the odd/high selector is in the descriptor data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermPredOp {
    Zip,
    Uzp,
    Trn,
    Rev,
    Punpk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpBinOp {
    Add,
    Sub,
    Subr,
    Mul,
    Mulx,
    Div,
    Maxnm,
    Minnm,
    Max,
    Min,
    Abd,
    Scale,
    Tsmul,
    Recps,
    Rsqrts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpUnOp {
    /// 按当前舍入模式取整，不报告不精确
    Rint,
    /// 按当前舍入模式取整，报告不精确
    RintX,
    Recpx,
    Sqrt,
    /// 浮点间转换，大小为 esz 编码
    Fcvt { from: u8, to: u8 },
    /// 向零舍入的浮点转整数
    FcvtToInt { signed: bool, from: u8, to: u8 },
    IntToFp { signed: bool, from: u8, to: u8 },
    /// f32 -> bf16
    Bfcvt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpZzOp {
    Recpe,
    Rsqrte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpReduceOp {
    Addv,
    Maxnmv,
    Minnmv,
    Maxv,
    Minv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpCmpOp {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
    Ne,
    Uo,
    Acge,
    Acgt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpMlaOp {
    Fmla,
    Fmls,
    Fnmla,
    Fnmls,
}

/// Four-register FP ops (`d, n, m, a`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpZzzzOp {
    Bfdot,
    Bfmmla,
    Fmmla,
}

// dtype -> (msz, esz, signed)
const DTYPE_TABLE: [(u8, u8, bool); 16] = [
    (0, 0, false),
    (0, 1, false),
    (0, 2, false),
    (0, 3, false),
    (2, 3, true),
    (1, 1, false),
    (1, 2, false),
    (1, 3, false),
    (1, 3, true),
    (1, 2, true),
    (2, 2, false),
    (2, 3, false),
    (0, 3, true),
    (0, 2, true),
    (0, 1, true),
    (3, 3, false),
];

/// 连续加载 dtype 的内存访问大小（log2 字节）
pub fn dtype_msz(dtype: u8) -> u8 {
    DTYPE_TABLE[dtype as usize & 15].0
}

/// 连续加载 dtype 的寄存器元素大小
pub fn dtype_esz(dtype: u8) -> u8 {
    DTYPE_TABLE[dtype as usize & 15].1
}

/// 内存数据是否符号扩展
pub fn dtype_signed(dtype: u8) -> bool {
    DTYPE_TABLE[dtype as usize & 15].2
}

/// Contiguous load helper key.
///
/// `dtype` 为 4 位数据类型（见 `dtype_msz`/`dtype_esz`）；`nreg` 为寄存器数减一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContigLoad {
    pub mte: bool,
    pub be: bool,
    pub dtype: u8,
    pub nreg: u8,
}

/// First-fault or non-fault contiguous load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaultLoad {
    pub mte: bool,
    pub be: bool,
    pub dtype: u8,
    /// true: first-fault；false: non-fault
    pub first_fault: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContigStore {
    pub mte: bool,
    pub be: bool,
    pub msz: u8,
    pub esz: u8,
    pub nreg: u8,
}

/// Offset form of a gather or scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetKind {
    /// 32 位偏移零扩展
    Zero32,
    /// 32 位偏移符号扩展
    Sign32,
    /// 64 位偏移
    Full64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GatherKey {
    pub mte: bool,
    pub be: bool,
    pub first_fault: bool,
    pub offset: OffsetKind,
    /// 内存数据零扩展（否则符号扩展）
    pub unsigned: bool,
    pub msz: u8,
    /// 元素大小：2 或 3
    pub esz: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScatterKey {
    pub mte: bool,
    pub be: bool,
    pub offset: OffsetKind,
    pub msz: u8,
    pub esz: u8,
}

/// Out-of-line helper identifiers.
///
/// 参数以 `Arg::Env` 传递寄存器在 env 中的偏移，`Arg::Desc` 为打包描述符。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Helper {
    /// ret flags; (d, g, words)
    PredTest,
    /// ret flags; (d: temp, g: temp)
    PredTest1,
    /// ret offset; (pg, preddesc)
    LastActiveElement,
    /// ret flags; (d, g, preddesc)
    Pfirst,
    Pnext,
    /// [ret flags]; (d, n, [m,] g, preddesc)
    Brk { op: BrkOp, flags: bool },
    /// ret count; (n, g, preddesc)
    Cntp,
    /// ret flags; (d, count: temp, preddesc)
    Whilel,
    Whileg,
    /// (d, n, [m,] preddesc)
    PermPred(PermPredOp),
    /// ret flags; (d, n, m, g, desc)
    Cmp { op: CmpOp, esz: u8, wide: bool },
    /// ret flags; (d, n, g, desc[data = imm])
    CmpImm { op: CmpOp, esz: u8 },
    /// ret flags; (d, n, m, g, desc)
    Match { negate: bool, esz: u8 },

    /// (d, n, m, g, desc)
    Zpzz { op: ZpzzOp, esz: u8 },
    /// (d, n, g, desc)
    Zpz { op: ZpzOp, esz: u8 },
    /// (d, n, g, desc[data = shift])
    Zpzi { op: ZpziOp, esz: u8 },
    /// (d, a, n, m, g, desc)
    Zpzzz { op: ZpzzzOp, esz: u8 },
    /// (d, n, m, desc)
    Zzz { op: ZzzOp, esz: u8 },
    /// (d, n, m, a, desc)
    Zzzz { op: ZzzzOp, esz: u8 },
    /// (d, n, desc)
    Zz { op: ZzOp, esz: u8 },
    /// (d, n, val: temp, desc)
    Zzi { op: ZziOp, esz: u8 },
    /// (d, start: temp, incr: temp, desc)
    Index { esz: u8 },
    /// (d, n, g, val: temp, desc)
    CpyM { esz: u8 },
    /// (d, g, val: temp, desc)
    CpyZ { esz: u8 },
    /// ret value; (n, g, desc)
    Reduce { op: ReduceOp, esz: u8 },

    /// (d, n, m, fpst, desc)
    FpZzz { op: FpBinOp, esz: u8 },
    /// (d, n, m, g, fpst, desc)
    FpZpzz { op: FpBinOp, esz: u8 },
    /// (d, n, g, scalar: temp, fpst, desc)
    FpZpzs { op: FpBinOp, esz: u8 },
    /// (d, n, g, fpst, desc)
    FpZpz { op: FpUnOp, esz: u8 },
    /// (d, n, fpst, desc)
    FpZz { op: FpZzOp, esz: u8 },
    /// ret value; (n, g, fpst, desc)
    FpReduce { op: FpReduceOp, esz: u8 },
    /// ret value; (init: temp, m, g, fpst, desc)
    Fadda { esz: u8 },
    /// (d, n, m, g, fpst, desc)；与零比较时省略 m
    FpCmp { op: FpCmpOp, esz: u8, zero: bool },
    /// (d, n, m, a, g, fpst, desc)
    FpMla { op: FpMlaOp, esz: u8 },
    /// (d, n, m, a, fpst, desc)
    FpZzzz { op: FpZzzzOp, esz: u8 },

    /// (g, addr: temp, desc[data = zt])
    LdContig(ContigLoad),
    LdFault(FaultLoad),
    StContig(ContigStore),
    /// (d, g, zm, base: temp, desc[data = scale])
    Gather(GatherKey),
    /// (d, g, zm, base: temp, desc[data = scale])
    Scatter(ScatterKey),
}

impl Helper {
    /// 是否需要访问客户机内存
    pub fn touches_memory(&self) -> bool {
        matches!(
            self,
            Helper::LdContig(_)
                | Helper::LdFault(_)
                | Helper::StContig(_)
                | Helper::Gather(_)
                | Helper::Scatter(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_table_never_narrows() {
        for dtype in 0..16u8 {
            assert!(dtype_msz(dtype) <= dtype_esz(dtype), "dtype {dtype}");
            // 不扩展的 dtype 位于对角线 0/5/10/15
            if dtype % 5 == 0 {
                assert_eq!(dtype_msz(dtype), dtype_esz(dtype));
                assert!(!dtype_signed(dtype));
            }
        }
        assert!(dtype_signed(4));
        assert_eq!((dtype_msz(4), dtype_esz(4)), (2, 3));
    }

    #[test]
    fn test_rounding_round_trips() {
        for mode in [Rounding::TieEven, Rounding::PosInf, Rounding::Zero, Rounding::TieAway, Rounding::Odd] {
            assert_eq!(Rounding::from_u64(mode.as_u64()), mode);
        }
        assert_eq!(Rounding::from_rmode(2), Rounding::NegInf);
    }
}
