//! 日志初始化
//!
//! 基于 `env_logger`，`RUST_LOG` 优先于代码中给出的默认级别。

use std::sync::Once;

static INIT: Once = Once::new();

/// 以 `warn` 为默认级别初始化日志；重复调用无副作用
pub fn init() {
    init_with_level(log::LevelFilter::Warn);
}

/// 以指定默认级别初始化日志
pub fn init_with_level(level: log::LevelFilter) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(level);
        if let Ok(spec) = std::env::var("RUST_LOG") {
            builder.parse_filters(&spec);
        }
        // 测试二进制可能已装好别的 logger
        if builder.try_init().is_err() {
            log::debug!("logger already installed");
        }
    });
}
