//! 统一配置管理
//!
//! 提供翻译器与参考解释器共用的配置 Trait，以及 SVE 实现参数 `SveConfig`。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::features::IsaFeatures;

/// 架构允许的最大向量长度（字节）
pub const ARCH_MAX_VL_BYTES: u32 = 256;

/// 统一配置 Trait
///
/// # 示例
///
/// ```rust,ignore
/// use sve_core::config::{Config, SveConfig};
///
/// let cfg = SveConfig::from_toml("vl_bytes = 64\nfeatures = \"SVE | SVE2\"")?;
/// cfg.validate()?;
/// ```
pub trait Config: Serialize + serde::de::DeserializeOwned {
    /// 验证配置的有效性
    ///
    /// # 错误
    ///
    /// 如果配置无效，返回 `ConfigError::Invalid`
    fn validate(&self) -> Result<(), ConfigError>;

    /// 获取默认配置
    fn defaults() -> Self;

    /// 合并两个配置
    ///
    /// `self` 为基础配置，`other` 优先级更高
    ///
    /// # 错误
    ///
    /// 如果配置冲突无法合并，返回 `ConfigError::MergeConflict`
    fn merge(&self, other: &Self) -> Result<Self, ConfigError>
    where
        Self: Sized;

    /// 从 TOML 字符串加载配置
    fn from_toml(toml: &str) -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))
    }

    /// 从 JSON 字符串加载配置
    fn from_json(json: &str) -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        serde_json::from_str(json)
            .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e)))
    }

    /// 将配置序列化为 TOML
    fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(format!("TOML serialize error: {}", e)))
    }

    /// 将配置序列化为 JSON
    fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(format!("JSON serialize error: {}", e)))
    }

    /// 从环境变量加载配置
    ///
    /// 环境变量格式: `PREFIX_KEY`
    fn from_env(_prefix: &str) -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        Err(ConfigError::NotSupported(
            "Environment variable loading not implemented for this config type".to_string(),
        ))
    }

    /// 获取配置的差异
    ///
    /// 按顶层字段比较 JSON 表示，只报告两边都存在且取值不同的字段
    fn diff(&self, other: &Self) -> HashMap<String, ConfigDiff>
    where
        Self: Sized,
    {
        let (Ok(lhs), Ok(rhs)) = (serde_json::to_value(self), serde_json::to_value(other)) else {
            return HashMap::new();
        };
        let (Some(a), Some(b)) = (lhs.as_object(), rhs.as_object()) else {
            return HashMap::new();
        };

        a.iter()
            .filter_map(|(key, old)| {
                let new = b.get(key)?;
                (new != old).then(|| {
                    (
                        key.clone(),
                        ConfigDiff {
                            old: old.to_string(),
                            new: new.to_string(),
                        },
                    )
                })
            })
            .collect()
    }
}

/// 单个字段的配置差异
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDiff {
    pub old: String,
    pub new: String,
}

/// 配置错误类型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ConfigError {
    /// 无效的配置
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// 配置合并冲突
    #[error("Configuration merge conflict: {0}")]
    MergeConflict(String),

    /// 解析错误
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// 序列化错误
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(String),

    /// 不支持的操作
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// 验证错误
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// SVE 实现参数
///
/// 翻译上下文与参考解释器都由它构造。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SveConfig {
    /// 当前向量长度（字节），16 的倍数
    pub vl_bytes: u32,
    /// 实现支持的最大向量长度（字节）
    pub max_vl_bytes: u32,
    /// 已启用的可选特性
    pub features: IsaFeatures,
    /// 当前异常级别下 SVE 是否可用（访问检查）
    pub sve_enabled: bool,
    /// 内存标签检查是否激活
    pub mte_active: bool,
    /// 数据访问是否为大端
    pub big_endian: bool,
}

impl Default for SveConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl SveConfig {
    pub fn with_vl(mut self, vl_bytes: u32) -> Self {
        self.vl_bytes = vl_bytes;
        self
    }

    pub fn with_features(mut self, features: IsaFeatures) -> Self {
        self.features = features;
        self
    }
}

impl Config for SveConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_vl_bytes == 0
            || self.max_vl_bytes % 16 != 0
            || self.max_vl_bytes > ARCH_MAX_VL_BYTES
        {
            return Err(ConfigError::Invalid(format!(
                "max_vl_bytes must be a multiple of 16 in 16..={}, got {}",
                ARCH_MAX_VL_BYTES, self.max_vl_bytes
            )));
        }
        if self.vl_bytes == 0 || self.vl_bytes % 16 != 0 || self.vl_bytes > self.max_vl_bytes {
            return Err(ConfigError::Invalid(format!(
                "vl_bytes must be a multiple of 16 in 16..={}, got {}",
                self.max_vl_bytes, self.vl_bytes
            )));
        }
        let needs_sve = IsaFeatures::SVE2 | IsaFeatures::BF16 | IsaFeatures::I8MM | IsaFeatures::F64MM;
        if self.features.intersects(needs_sve) && !self.features.contains(IsaFeatures::SVE) {
            return Err(ConfigError::Validation(
                "SVE2/BF16/I8MM/F64MM require SVE".to_string(),
            ));
        }
        Ok(())
    }

    fn defaults() -> Self {
        Self {
            vl_bytes: 32,
            max_vl_bytes: ARCH_MAX_VL_BYTES,
            features: IsaFeatures::default(),
            sve_enabled: true,
            mte_active: false,
            big_endian: false,
        }
    }

    fn merge(&self, other: &Self) -> Result<Self, ConfigError> {
        let max_vl_bytes = self.max_vl_bytes.min(other.max_vl_bytes);
        if other.vl_bytes > max_vl_bytes {
            return Err(ConfigError::MergeConflict(format!(
                "vl_bytes {} exceeds merged max_vl_bytes {}",
                other.vl_bytes, max_vl_bytes
            )));
        }
        Ok(Self {
            vl_bytes: other.vl_bytes,
            max_vl_bytes,
            features: other.features,
            sve_enabled: other.sve_enabled,
            mte_active: other.mte_active,
            big_endian: other.big_endian,
        })
    }

    fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let mut cfg = Self::defaults();
        let var = |key: &str| std::env::var(format!("{}_{}", prefix, key)).ok();

        if let Some(v) = var("VL_BYTES") {
            cfg.vl_bytes = v
                .parse()
                .map_err(|e| ConfigError::Parse(format!("{}_VL_BYTES: {}", prefix, e)))?;
        }
        if let Some(v) = var("FEATURES") {
            cfg.features = IsaFeatures::parse_list(&v).ok_or_else(|| {
                ConfigError::Parse(format!("{}_FEATURES: unknown feature in {:?}", prefix, v))
            })?;
        }
        if let Some(v) = var("ENABLED") {
            cfg.sve_enabled = v
                .parse()
                .map_err(|e| ConfigError::Parse(format!("{}_ENABLED: {}", prefix, e)))?;
        }
        if let Some(v) = var("MTE") {
            cfg.mte_active = v
                .parse()
                .map_err(|e| ConfigError::Parse(format!("{}_MTE: {}", prefix, e)))?;
        }
        Ok(cfg)
    }
}

/// 配置构建器
///
/// 按 base < file < env < overrides 的优先级合并
///
/// ```rust,ignore
/// let cfg = ConfigBuilder::<SveConfig>::with_defaults()
///     .with_file("sve.toml")?
///     .with_env("SVE")?
///     .build()?;
/// ```
pub struct ConfigBuilder<C: Config> {
    base: C,
    overrides: Vec<C>,
}

impl<C: Config + Default> Default for ConfigBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Config> ConfigBuilder<C> {
    /// 创建新的配置构建器
    pub fn new() -> Self
    where
        C: Default,
    {
        Self {
            base: C::default(),
            overrides: Vec::new(),
        }
    }

    /// 使用默认配置
    pub fn with_defaults() -> Self {
        Self {
            base: C::defaults(),
            overrides: Vec::new(),
        }
    }

    /// 从文件加载配置
    pub fn with_file(mut self, path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path, e)))?;

        let config = C::from_toml(&content)?;
        self.overrides.push(config);
        Ok(self)
    }

    /// 从环境变量加载配置
    pub fn with_env(mut self, prefix: &str) -> Result<Self, ConfigError> {
        let config = C::from_env(prefix)?;
        self.overrides.push(config);
        Ok(self)
    }

    /// 添加配置覆盖
    pub fn with_override(mut self, config: C) -> Self {
        self.overrides.push(config);
        self
    }

    /// 构建最终配置
    pub fn build(mut self) -> Result<C, ConfigError> {
        let mut current = self.base;

        for override_config in self.overrides.drain(..) {
            current = current.merge(&override_config)?;
        }

        current.validate()?;
        Ok(current)
    }
}
