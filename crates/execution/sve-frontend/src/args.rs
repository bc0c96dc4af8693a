//! 译码参数结构
//!
//! 每种指令格式一个结构体；`DecodedArgs` 把它们收拢成一个带标签的联合，
//! 供 `decode()` 对外报告。寄存器编号为 0..=31，谓词编号为 0..=15（16 为 FFR）。

/// 立即数或寄存器操作数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Imm(i64),
    Reg(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rd {
    pub rd: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rn {
    pub rn: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rm {
    pub rm: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RrEsz {
    pub rd: u32,
    pub rn: u32,
    pub esz: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RrrEsz {
    pub rd: u32,
    pub rn: u32,
    pub rm: u32,
    pub esz: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RrrrEsz {
    pub rd: u32,
    pub rn: u32,
    pub rm: u32,
    pub ra: u32,
    pub esz: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RprEsz {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub esz: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RprrEsz {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub rm: u32,
    pub esz: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RprrrEsz {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub rm: u32,
    pub ra: u32,
    pub esz: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RriEsz {
    pub rd: u32,
    pub rn: u32,
    pub imm: i64,
    pub esz: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiEsz {
    pub rd: u32,
    pub imm: i64,
    pub esz: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpriEsz {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub imm: i64,
    pub esz: u8,
}

/// 谓词控制的立即数复制（CPY/FCPY）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpiEsz {
    pub rd: u32,
    pub pg: u32,
    pub imm: i64,
    pub esz: u8,
}

/// tsz 编码的移位：`esz` 为 -1 表示保留编码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RriTsz {
    pub rd: u32,
    pub rn: u32,
    pub imm: u32,
    pub esz: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpriTsz {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub imm: u32,
    pub esz: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RrriTsz {
    pub rd: u32,
    pub rn: u32,
    pub rm: u32,
    pub imm: u32,
    pub esz: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rri {
    pub rd: u32,
    pub rn: u32,
    pub imm: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ri {
    pub rd: u32,
    pub imm: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rrri {
    pub rd: u32,
    pub rn: u32,
    pub rm: u32,
    pub imm: i64,
}

/// 位掩码立即数（未展开的 N:immr:imms）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RrDbm {
    pub rd: u32,
    pub rn: u32,
    pub dbm: u32,
}

/// 谓词逻辑运算；`s` 为置标志形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RprrS {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub rm: u32,
    pub s: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RprS {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub s: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ptest {
    pub pg: u32,
    pub rn: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ptrue {
    pub rd: u32,
    pub pat: u32,
    pub esz: u8,
    pub s: bool,
}

/// 按模式计数的元素计数类指令
///
/// `imm` 为乘数（1..=16）；`d` 为递减，`u` 为无符号饱和，`sf` 为 64 位。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncdecCnt {
    pub rd: u32,
    pub pat: u32,
    pub esz: u8,
    pub imm: u32,
    pub d: bool,
    pub u: bool,
    pub sf: bool,
}

/// 按谓词计数的 INCP/DECP 类指令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncdecPred {
    pub rd: u32,
    pub pg: u32,
    pub esz: u8,
    pub d: bool,
    pub u: bool,
    pub sf: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct While {
    pub rd: u32,
    pub rn: u32,
    pub rm: u32,
    pub esz: u8,
    pub sf: bool,
    pub u: bool,
    pub lt: bool,
    pub eq: bool,
}

/// WHILEWR/WHILERW：按两个指针的距离生成谓词
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhilePtr {
    pub rd: u32,
    pub rn: u32,
    pub rm: u32,
    pub esz: u8,
    pub rw: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cterm {
    pub rn: u32,
    pub rm: u32,
    pub sf: bool,
    pub ne: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    pub rd: u32,
    pub esz: u8,
    pub start: Operand,
    pub incr: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RprrLoad {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub rm: u32,
    pub dtype: u32,
    pub nreg: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpriLoad {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub imm: i64,
    pub dtype: u32,
    pub nreg: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RprrStore {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub rm: u32,
    pub msz: u8,
    pub esz: u8,
    pub nreg: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpriStore {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub imm: i64,
    pub msz: u8,
    pub esz: u8,
    pub nreg: u32,
}

/// 标量基址加向量偏移的聚集加载
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RprrGather {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub rm: u32,
    pub esz: u8,
    pub msz: u8,
    pub u: bool,
    pub ff: bool,
    /// 0: 32 位零扩展，1: 32 位符号扩展，2: 64 位
    pub xs: u8,
    pub scale: bool,
}

/// 向量基址加立即数的聚集加载
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpriGather {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub imm: i64,
    pub esz: u8,
    pub msz: u8,
    pub u: bool,
    pub ff: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RprrScatter {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub rm: u32,
    pub esz: u8,
    pub msz: u8,
    pub xs: u8,
    pub scale: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpriScatter {
    pub rd: u32,
    pub pg: u32,
    pub rn: u32,
    pub imm: i64,
    pub esz: u8,
    pub msz: u8,
}

macro_rules! decoded_args {
    ($($name:ident),* $(,)?) => {
        /// 任一格式的译码参数
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum DecodedArgs {
            $($name($name),)*
        }

        $(
            impl From<$name> for DecodedArgs {
                fn from(a: $name) -> Self {
                    DecodedArgs::$name(a)
                }
            }
        )*
    };
}

decoded_args! {
    Empty, Rd, Rn, Rm, RrEsz, RrrEsz, RrrrEsz, RprEsz, RprrEsz, RprrrEsz, RriEsz, RiEsz,
    RpriEsz, RpiEsz, RriTsz, RpriTsz, RrriTsz, Rri, Ri, Rrri, RrDbm, RprrS, RprS,
    Ptest, Ptrue, IncdecCnt, IncdecPred, While, WhilePtr, Cterm, Index, RprrLoad, RpriLoad,
    RprrStore, RpriStore, RprrGather, RpriGather, RprrScatter, RpriScatter,
}
