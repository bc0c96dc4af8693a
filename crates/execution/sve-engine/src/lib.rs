//! sve-engine: SVE IR 参考解释器
//!
//! 按程序顺序重放 `IRBlock`：标量临时值保存在 64 位槽中，寄存器操作数是
//! env 字节区内的偏移，出线助手在 `helpers` 中按 `Helper` 键分派。
//!
//! 客户机可见的结果（陷入、访存异常）通过 `ExecResult::status` 返回；
//! IR 本身有误（未定义标签、未初始化临时值、参数类型不符）时返回 `SveError`。

mod elem;
mod helpers;
mod interp;
pub mod memory;
pub mod state;

use sve_core::{MemoryError, SveResult};

pub use interp::Interpreter;
pub use memory::{FlatMemory, GuestMemory, SharedMemory};
pub use state::{CpuState, Nzcv};

/// 陷入原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapKind {
    /// 当前异常级别下 SVE 不可用
    SveAccess,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecStatus {
    Ok,
    Trap(TrapKind),
    /// 非容错路径上的客户机访存异常
    Fault(MemoryError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecStats {
    pub executed_ops: u64,
    pub helper_calls: u64,
    pub mem_accesses: u64,
}

impl ExecStats {
    pub fn accumulate(&mut self, other: &ExecStats) {
        self.executed_ops += other.executed_ops;
        self.helper_calls += other.helper_calls;
        self.mem_accesses += other.mem_accesses;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    pub status: ExecStatus,
    pub stats: ExecStats,
}

impl ExecResult {
    pub fn is_ok(&self) -> bool {
        self.status == ExecStatus::Ok
    }
}

/// 执行引擎接口
pub trait ExecutionEngine<B> {
    fn run(&mut self, cpu: &mut CpuState, mem: &mut dyn GuestMemory, block: &B) -> SveResult<ExecResult>;
}
