//! Unified error handling for the SVE translator workspace
//!
//! 译码、执行、配置与访存错误统一收敛到 `SveError`，
//! 各变体携带具体来源和一段上下文消息。

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;

/// Unified error type for all SVE components
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum SveError {
    #[error("Decode error: {message}")]
    Decode { source: DecodeError, message: String },

    #[error("Execution error: {message}")]
    Execution { source: ExecError, message: String },

    #[error("Configuration error: {message}")]
    Configuration {
        source: ConfigError,
        message: String,
    },

    #[error("Memory error: {message}")]
    Memory {
        source: MemoryError,
        message: String,
    },

    #[error("{message}")]
    Generic { message: String },
}

/// 译码阶段的拒绝原因
///
/// 三者对客户机而言都表现为未定义指令异常，但在宿主侧区分开来便于诊断。
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeError {
    #[error("Unallocated encoding: {0:#010x}")]
    Unallocated(u32),

    #[error("Reserved field combination in {name}: {insn:#010x}")]
    Rejected { name: String, insn: u32 },

    #[error("{name} requires feature {feature}: {insn:#010x}")]
    FeatureUnavailable {
        name: String,
        feature: String,
        insn: u32,
    },
}

/// 解释执行阶段的错误
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecError {
    #[error("SVE access trapped")]
    AccessTrap,

    #[error("Undefined label {0}")]
    UndefinedLabel(u32),

    #[error("Temporary t{0} read before write")]
    UninitializedTemp(u32),

    #[error("Env access out of range: offset {offset}, size {size}")]
    EnvOutOfRange { offset: usize, size: usize },

    #[error("Malformed helper call: {0}")]
    MalformedCall(String),
}

/// Guest memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryError {
    #[error("Memory access out of bounds: address {addr:#x}, size {size}")]
    OutOfBounds { addr: u64, size: usize },

    #[error("Memory alignment violation: address {addr:#x} not aligned to {align} bytes")]
    AlignmentViolation { addr: u64, align: usize },

    #[error("Tag check fault at address {0:#x}")]
    TagCheck(u64),
}

impl From<DecodeError> for SveError {
    fn from(source: DecodeError) -> Self {
        let message = source.to_string();
        SveError::Decode { source, message }
    }
}

impl From<ExecError> for SveError {
    fn from(source: ExecError) -> Self {
        let message = source.to_string();
        SveError::Execution { source, message }
    }
}

impl From<ConfigError> for SveError {
    fn from(source: ConfigError) -> Self {
        let message = source.to_string();
        SveError::Configuration { source, message }
    }
}

impl From<MemoryError> for SveError {
    fn from(source: MemoryError) -> Self {
        let message = source.to_string();
        SveError::Memory { source, message }
    }
}

/// Error context for additional information
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: String,
    pub component: String,
    pub insn: Option<u32>,
    pub additional_info: std::collections::HashMap<String, String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            component: component.into(),
            insn: None,
            additional_info: std::collections::HashMap::new(),
        }
    }

    pub fn with_insn(mut self, insn: u32) -> Self {
        self.insn = Some(insn);
        self
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }
}

/// Result type alias for convenience
pub type SveResult<T> = Result<T, SveError>;

/// Utility functions for error handling
pub mod utils {
    use super::*;

    /// Log error with context
    pub fn log_error(error: &SveError, context: &ErrorContext) {
        match context.insn {
            Some(insn) => log::error!(
                "Error in {}::{}: {} | insn: {:#010x}",
                context.component,
                context.operation,
                error,
                insn
            ),
            None => log::error!(
                "Error in {}::{}: {}",
                context.component,
                context.operation,
                error
            ),
        }
    }

    /// 客户机可恢复的错误：未定义指令与访存异常都由客户机异常处理接管
    pub fn is_recoverable(error: &SveError) -> bool {
        matches!(
            error,
            SveError::Decode { .. }
                | SveError::Memory { .. }
                | SveError::Execution {
                    source: ExecError::AccessTrap,
                    ..
                }
        )
    }

    /// Get error severity level
    pub fn error_severity(error: &SveError) -> ErrorSeverity {
        match error {
            SveError::Decode {
                source: DecodeError::Unallocated(..),
                ..
            } => ErrorSeverity::Info,
            SveError::Decode { .. } => ErrorSeverity::Warning,
            SveError::Execution {
                source: ExecError::AccessTrap,
                ..
            } => ErrorSeverity::Info,
            SveError::Execution { .. } => ErrorSeverity::Critical,
            SveError::Memory { .. } => ErrorSeverity::Warning,
            SveError::Configuration { .. } => ErrorSeverity::Error,
            SveError::Generic { .. } => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Debug = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    Critical = 4,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Debug => write!(f, "DEBUG"),
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
