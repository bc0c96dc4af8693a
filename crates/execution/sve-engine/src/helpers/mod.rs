//! 出线助手的实现
//!
//! 每个 `Helper` 变体的参数次序与 `sve_ir::helper` 中的注释一致。
//! 助手先把源寄存器复制出来再写目的，因此目的与源重叠时结果仍然正确。

mod fp;
mod int;
mod mem;
mod perm;
mod pred;
mod widen;

use sve_core::{ExecError, MemoryError};
use sve_ir::{Arg, FpStatus, Helper, ZzzzOp};

use crate::memory::GuestMemory;
use crate::state::CpuState;

/// 解释中止的原因
#[derive(Debug)]
pub(crate) enum Halt {
    /// 客户机可见的访存异常
    Fault(MemoryError),
    /// IR 错误
    Error(ExecError),
}

impl From<ExecError> for Halt {
    fn from(e: ExecError) -> Self {
        Halt::Error(e)
    }
}

impl From<MemoryError> for Halt {
    fn from(e: MemoryError) -> Self {
        Halt::Fault(e)
    }
}

pub(crate) type HelperResult<T> = Result<T, Halt>;

/// 助手参数的类型化访问
pub(crate) struct Args<'a> {
    helper: Helper,
    args: &'a [Arg],
    temps: &'a [Option<u64>],
}

impl<'a> Args<'a> {
    pub(crate) fn new(helper: Helper, args: &'a [Arg], temps: &'a [Option<u64>]) -> Self {
        Self { helper, args, temps }
    }

    fn malformed(&self, i: usize, want: &str) -> Halt {
        Halt::Error(ExecError::MalformedCall(format!(
            "{:?}: argument {i} is {:?}, expected {want}",
            self.helper,
            self.args.get(i)
        )))
    }

    pub(crate) fn env(&self, i: usize) -> HelperResult<u32> {
        match self.args.get(i) {
            Some(Arg::Env(ofs)) => Ok(*ofs),
            _ => Err(self.malformed(i, "env offset")),
        }
    }

    pub(crate) fn temp(&self, i: usize) -> HelperResult<u64> {
        match self.args.get(i) {
            Some(Arg::Temp(t)) => self
                .temps
                .get(t.0 as usize)
                .copied()
                .flatten()
                .ok_or(Halt::Error(ExecError::UninitializedTemp(t.0))),
            _ => Err(self.malformed(i, "temp")),
        }
    }

    pub(crate) fn desc(&self, i: usize) -> HelperResult<u32> {
        match self.args.get(i) {
            Some(Arg::Desc(d)) => Ok(*d),
            _ => Err(self.malformed(i, "descriptor")),
        }
    }

    pub(crate) fn fpst(&self, i: usize) -> HelperResult<FpStatus> {
        match self.args.get(i) {
            Some(Arg::Fpst(f)) => Ok(*f),
            _ => Err(self.malformed(i, "fp status")),
        }
    }
}

/// 调用一个助手；有返回值的助手返回 `Some`
pub(crate) fn call(
    cpu: &mut CpuState,
    mem: &mut dyn GuestMemory,
    helper: Helper,
    a: &Args<'_>,
) -> HelperResult<Option<u64>> {
    use Helper::*;

    match helper {
        PredTest | PredTest1 | LastActiveElement | Pfirst | Pnext | Brk { .. } | Cntp | Whilel
        | Whileg | PermPred(_) => pred::call(cpu, helper, a),

        Cmp { .. } | CmpImm { .. } | Match { .. } | Zpzz { .. } | Zpz { .. } | Zpzi { .. }
        | Zpzzz { .. } | Zzi { .. } | Index { .. } | CpyM { .. } | CpyZ { .. } | Reduce { .. } => {
            int::call(cpu, helper, a)
        }

        Zzz { op, esz } => {
            if perm::is_zzz_perm(op) {
                perm::zzz(cpu, op, esz, a)
            } else {
                widen::zzz(cpu, op, esz, a)
            }
        }
        Zzzz { op: ZzzzOp::Tbl2, esz } => perm::tbl2(cpu, esz, a),
        Zzzz { op, esz } => widen::zzzz(cpu, op, esz, a),
        Zz { op, esz } => {
            if perm::is_zz_perm(op) {
                perm::zz(cpu, op, esz, a)
            } else {
                widen::zz(cpu, op, esz, a)
            }
        }

        FpZzz { .. } | FpZpzz { .. } | FpZpzs { .. } | FpZpz { .. } | FpZz { .. }
        | FpReduce { .. } | Fadda { .. } | FpCmp { .. } | FpMla { .. } | FpZzzz { .. } => {
            fp::call(cpu, helper, a)
        }

        LdContig(_) | LdFault(_) | StContig(_) | Gather(_) | Scatter(_) => mem::call(cpu, mem, helper, a),
    }
}
