//! sve-ir: SVE 翻译器与解释器之间的中间表示
//!
//! 操作分三类：64 位标量临时值上的运算、env 字节区间上的整向量（gvec）运算、
//! 以及出线助手调用。寄存器操作数一律为 env 内字节偏移，由 `layout` 给出。

pub mod desc;
pub mod helper;
pub mod layout;
pub mod predflags;

use std::ops::{Deref, DerefMut};

pub use desc::{pred_desc, simd_desc};
pub use helper::*;

/// 64 位标量临时值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Temp(pub u32);

/// 块内跳转目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Neg,
    Not,
    Ext8u,
    Ext8s,
    Ext16u,
    Ext16s,
    Ext32u,
    Ext32s,
    Ctpop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    And,
    AndC,
    Or,
    Xor,
    Shl,
    Shr,
    Sar,
    Smin,
    Smax,
    Umin,
    Umax,
}

/// 64 位比较条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cond {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Ltu,
    Leu,
    Gtu,
    Geu,
}

impl Cond {
    pub fn invert(self) -> Self {
        match self {
            Cond::Eq => Cond::Ne,
            Cond::Ne => Cond::Eq,
            Cond::Lt => Cond::Ge,
            Cond::Ge => Cond::Lt,
            Cond::Le => Cond::Gt,
            Cond::Gt => Cond::Le,
            Cond::Ltu => Cond::Geu,
            Cond::Geu => Cond::Ltu,
            Cond::Leu => Cond::Gtu,
            Cond::Gtu => Cond::Leu,
        }
    }

    pub fn eval(self, a: u64, b: u64) -> bool {
        match self {
            Cond::Eq => a == b,
            Cond::Ne => a != b,
            Cond::Lt => (a as i64) < (b as i64),
            Cond::Le => (a as i64) <= (b as i64),
            Cond::Gt => (a as i64) > (b as i64),
            Cond::Ge => (a as i64) >= (b as i64),
            Cond::Ltu => a < b,
            Cond::Leu => a <= b,
            Cond::Gtu => a > b,
            Cond::Geu => a >= b,
        }
    }
}

/// NZCV 标志位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    N,
    Z,
    C,
    V,
}

/// env 或客户机内存访问宽度：`size` 为 log2 字节数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemOp {
    pub size: u8,
    pub signed: bool,
    pub be: bool,
}

impl MemOp {
    pub const fn unsigned(size: u8) -> Self {
        Self {
            size,
            signed: false,
            be: false,
        }
    }

    pub const fn signed(size: u8) -> Self {
        Self {
            size,
            signed: true,
            be: false,
        }
    }

    pub fn bytes(self) -> usize {
        1 << self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gvec2Op {
    Mov,
    Not,
    Neg,
    Abs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gvec2iOp {
    Shli,
    Shri,
    Sari,
    Addi,
    Muli,
    Andi,
    Ori,
    Xori,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gvec3Op {
    Add,
    Sub,
    Mul,
    And,
    Or,
    Xor,
    AndC,
    SsAdd,
    UsAdd,
    SsSub,
    UsSub,
    Smin,
    Smax,
    Umin,
    Umax,
}

/// 四操作数按位运算（`d, a, b, c`），与元素大小无关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gvec4Op {
    /// (a & b) | (!a & c)
    Bitsel,
    /// a ^ b ^ c
    Eor3,
    /// a ^ (b & !c)
    Bcax,
    /// 以 c 为选择子：(a & c) | (b & !c)
    Bsl,
    Bsl1n,
    Bsl2n,
    Nbsl,
    /// 谓词运算，c 为控制谓词
    AndPg,
    BicPg,
    EorPg,
    SelPg,
    OrrPg,
    OrnPg,
    NorPg,
    NandPg,
}

/// 助手调用参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arg {
    /// env 内偏移
    Env(u32),
    Temp(Temp),
    Desc(u32),
    Fpst(FpStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub enum IROp {
    MovI { dst: Temp, imm: u64 },
    Mov { dst: Temp, src: Temp },
    Unary { op: UnOp, dst: Temp, src: Temp },
    Binary { op: BinOp, dst: Temp, a: Temp, b: Temp },
    BinaryImm { op: BinOp, dst: Temp, a: Temp, imm: u64 },
    SetCond { cond: Cond, dst: Temp, a: Temp, b: Temp },
    MovCond { cond: Cond, dst: Temp, c1: Temp, c2: Temp, v1: Temp, v2: Temp },

    /// 读通用寄存器；`sp` 为真时 31 号是 SP，否则是 XZR
    ReadXreg { dst: Temp, reg: u8, sp: bool },
    WriteXreg { reg: u8, src: Temp, sp: bool },
    ReadFlag { dst: Temp, flag: Flag },
    /// 标志位置为 `src != 0`
    SetFlag { flag: Flag, src: Temp },
    /// 由 PredTest 结果字设置 NZCV
    SetPredFlags { src: Temp },

    /// env 访问；`index` 为附加的运行时字节偏移
    LoadEnv { dst: Temp, ofs: u32, mop: MemOp, index: Option<Temp> },
    StoreEnv { src: Temp, ofs: u32, mop: MemOp, index: Option<Temp> },

    GuestLoad { dst: Temp, addr: Temp, mop: MemOp },
    GuestStore { src: Temp, addr: Temp, mop: MemOp },

    GvecDupImm { esz: u8, dofs: u32, oprsz: u32, maxsz: u32, imm: u64 },
    GvecDupTemp { esz: u8, dofs: u32, oprsz: u32, maxsz: u32, src: Temp },
    /// 复制 `aofs` 处一个元素；esz 4/5 为 16/32 字节块
    GvecDupMem { esz: u8, dofs: u32, aofs: u32, oprsz: u32, maxsz: u32 },
    Gvec2 { op: Gvec2Op, esz: u8, dofs: u32, aofs: u32, oprsz: u32, maxsz: u32 },
    Gvec2i { op: Gvec2iOp, esz: u8, dofs: u32, aofs: u32, imm: i64, oprsz: u32, maxsz: u32 },
    Gvec2s { op: Gvec3Op, esz: u8, dofs: u32, aofs: u32, src: Temp, oprsz: u32, maxsz: u32 },
    Gvec3 { op: Gvec3Op, esz: u8, dofs: u32, aofs: u32, bofs: u32, oprsz: u32, maxsz: u32 },
    Gvec4 { op: Gvec4Op, dofs: u32, aofs: u32, bofs: u32, cofs: u32, oprsz: u32, maxsz: u32 },

    Call { helper: Helper, ret: Option<Temp>, args: Vec<Arg> },

    /// 切换舍入模式，旧模式存入 `save`
    SetRounding { fpst: FpStatus, mode: Rounding, save: Temp },
    RestoreRounding { fpst: FpStatus, saved: Temp },

    Label(Label),
    Br(Label),
    BrCond { cond: Cond, a: Temp, b: Temp, label: Label },

    /// SVE 不可用：执行到此处时陷入
    AccessTrap,
}

/// 一条指令（或一段指令）的翻译结果
#[derive(Debug, Clone, Default)]
pub struct IRBlock {
    pub ops: Vec<IROp>,
    /// 临时值编号上界
    pub num_temps: u32,
    pub num_labels: u32,
}

#[derive(Debug, Default)]
pub struct IRBuilder {
    block: IRBlock,
    next_temp: u32,
}

impl IRBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: IROp) {
        self.block.ops.push(op);
    }

    pub fn ops(&self) -> &[IROp] {
        &self.block.ops
    }

    /// 丢弃 `len` 之后追加的操作（翻译被拒绝时回滚）
    pub fn truncate_ops(&mut self, len: usize) {
        self.block.ops.truncate(len);
    }

    pub fn build(self) -> IRBlock {
        self.block
    }

    /// 当前存活的临时值个数
    pub fn live_temps(&self) -> u32 {
        self.next_temp
    }

    /// 打开一个临时值作用域，作用域结束时释放其中分配的临时值
    pub fn scope(&mut self) -> TempScope<'_> {
        let mark = self.next_temp;
        TempScope { b: self, mark }
    }

    pub fn temp(&mut self) -> Temp {
        let t = Temp(self.next_temp);
        self.next_temp += 1;
        self.block.num_temps = self.block.num_temps.max(self.next_temp);
        t
    }

    fn release_to(&mut self, mark: u32) {
        debug_assert!(mark <= self.next_temp);
        self.next_temp = mark;
    }

    pub fn new_label(&mut self) -> Label {
        let l = Label(self.block.num_labels);
        self.block.num_labels += 1;
        l
    }

    pub fn set_label(&mut self, l: Label) {
        self.push(IROp::Label(l));
    }

    pub fn br(&mut self, l: Label) {
        self.push(IROp::Br(l));
    }

    pub fn brcond(&mut self, cond: Cond, a: Temp, b: Temp, label: Label) {
        self.push(IROp::BrCond { cond, a, b, label });
    }

    pub fn movi(&mut self, imm: u64) -> Temp {
        let dst = self.temp();
        self.push(IROp::MovI { dst, imm });
        dst
    }

    pub fn mov(&mut self, dst: Temp, src: Temp) {
        self.push(IROp::Mov { dst, src });
    }

    pub fn unary(&mut self, op: UnOp, dst: Temp, src: Temp) {
        self.push(IROp::Unary { op, dst, src });
    }

    pub fn binary(&mut self, op: BinOp, dst: Temp, a: Temp, b: Temp) {
        self.push(IROp::Binary { op, dst, a, b });
    }

    pub fn binary_imm(&mut self, op: BinOp, dst: Temp, a: Temp, imm: u64) {
        self.push(IROp::BinaryImm { op, dst, a, imm });
    }

    pub fn setcond(&mut self, cond: Cond, dst: Temp, a: Temp, b: Temp) {
        self.push(IROp::SetCond { cond, dst, a, b });
    }

    pub fn movcond(&mut self, cond: Cond, dst: Temp, c1: Temp, c2: Temp, v1: Temp, v2: Temp) {
        self.push(IROp::MovCond {
            cond,
            dst,
            c1,
            c2,
            v1,
            v2,
        });
    }

    pub fn load_env(&mut self, ofs: u32, mop: MemOp) -> Temp {
        let dst = self.temp();
        self.push(IROp::LoadEnv {
            dst,
            ofs,
            mop,
            index: None,
        });
        dst
    }

    pub fn store_env(&mut self, src: Temp, ofs: u32, mop: MemOp) {
        self.push(IROp::StoreEnv {
            src,
            ofs,
            mop,
            index: None,
        });
    }

    pub fn call(&mut self, helper: Helper, args: Vec<Arg>) {
        self.push(IROp::Call {
            helper,
            ret: None,
            args,
        });
    }

    pub fn call_ret(&mut self, helper: Helper, args: Vec<Arg>) -> Temp {
        let ret = self.temp();
        self.push(IROp::Call {
            helper,
            ret: Some(ret),
            args,
        });
        ret
    }

    /// 按元素大小选择浮点状态字
    pub fn fpstatus(&self, esz: u8) -> FpStatus {
        FpStatus::for_esz(esz)
    }

    /// 在 `f` 发射的操作期间使用指定舍入模式，之后恢复
    pub fn with_rounding_mode<R>(
        &mut self,
        fpst: FpStatus,
        mode: Rounding,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let save = self.temp();
        self.push(IROp::SetRounding { fpst, mode, save });
        let r = f(self);
        self.push(IROp::RestoreRounding { fpst, saved: save });
        r
    }
}

/// 临时值作用域
///
/// 解引用为 `IRBuilder`；析构时把临时值分配回退到作用域开始处，
/// 因此任何返回路径（包括提前拒绝）都不会泄漏临时值。
pub struct TempScope<'a> {
    b: &'a mut IRBuilder,
    mark: u32,
}

impl TempScope<'_> {
    pub fn scope(&mut self) -> TempScope<'_> {
        self.b.scope()
    }
}

impl Deref for TempScope<'_> {
    type Target = IRBuilder;

    fn deref(&self) -> &IRBuilder {
        self.b
    }
}

impl DerefMut for TempScope<'_> {
    fn deref_mut(&mut self) -> &mut IRBuilder {
        self.b
    }
}

impl Drop for TempScope<'_> {
    fn drop(&mut self) {
        self.b.release_to(self.mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_releases_temps() {
        let mut b = IRBuilder::new();
        {
            let mut s = b.scope();
            let t0 = s.movi(1);
            {
                let mut inner = s.scope();
                let t1 = inner.temp();
                inner.mov(t1, t0);
                assert_eq!(inner.live_temps(), 2);
            }
            assert_eq!(s.live_temps(), 1);
        }
        assert_eq!(b.live_temps(), 0);
        let block = b.build();
        assert_eq!(block.num_temps, 2);
        assert_eq!(block.ops.len(), 2);
    }

    #[test]
    fn test_with_rounding_brackets_ops() {
        let mut b = IRBuilder::new();
        b.with_rounding_mode(FpStatus::A64, Rounding::Zero, |b| {
            b.movi(7);
        });
        let ops = b.ops();
        assert!(matches!(ops[0], IROp::SetRounding { mode: Rounding::Zero, .. }));
        assert!(matches!(ops[1], IROp::MovI { imm: 7, .. }));
        assert!(matches!(ops[2], IROp::RestoreRounding { .. }));
    }

    #[test]
    fn test_cond_invert() {
        for c in [Cond::Eq, Cond::Lt, Cond::Leu, Cond::Gtu] {
            for (a, b) in [(0u64, 1u64), (5, 5), (u64::MAX, 0)] {
                assert_eq!(c.eval(a, b), !c.invert().eval(a, b));
            }
        }
    }
}
