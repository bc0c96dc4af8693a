//! sve-core: SVE 翻译器的公共基础设施
//!
//! 错误分类、配置、ISA 特性与日志初始化。

pub mod config;
pub mod error;
pub mod features;
pub mod logging;

pub use config::{Config, ConfigBuilder, ConfigDiff, ConfigError, SveConfig};
pub use error::{
    DecodeError, ErrorContext, ErrorSeverity, ExecError, MemoryError, SveError, SveResult, utils,
};
pub use features::IsaFeatures;

/// 客户机地址
pub type GuestAddr = u64;
