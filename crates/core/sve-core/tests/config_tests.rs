//! sve-core 配置加载测试
//!
//! 覆盖 TOML/JSON 解析、环境变量与构建器合并

use proptest::prelude::*;
use sve_core::{Config, ConfigBuilder, ConfigError, IsaFeatures, SveConfig};

#[cfg(test)]
mod toml_tests {
    use super::*;

    // Test 1: 从 TOML 加载部分字段，其余取默认值
    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg = SveConfig::from_toml("vl_bytes = 64").unwrap();
        assert_eq!(cfg.vl_bytes, 64);
        assert!(cfg.sve_enabled);
        assert_eq!(cfg.features, IsaFeatures::default());
    }

    // Test 2: 特性以名称列表序列化
    #[test]
    fn test_features_roundtrip_toml() {
        let cfg = SveConfig::defaults()
            .with_features(IsaFeatures::SVE | IsaFeatures::I8MM | IsaFeatures::BF16);
        let text = cfg.to_toml().unwrap();
        assert!(text.contains("I8MM"));
        let back = SveConfig::from_toml(&text).unwrap();
        assert_eq!(back, cfg);
    }

    // Test 3: 非法 TOML
    #[test]
    fn test_bad_toml() {
        let err = SveConfig::from_toml("vl_bytes = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    // Test 4: JSON 加载
    #[test]
    fn test_from_json() {
        let cfg = SveConfig::from_json(r#"{"vl_bytes": 16, "sve_enabled": false}"#).unwrap();
        assert_eq!(cfg.vl_bytes, 16);
        assert!(!cfg.sve_enabled);
    }
}

#[cfg(test)]
mod builder_tests {
    use super::*;

    // Test 5: 文件覆盖默认值
    #[test]
    fn test_builder_with_file() {
        let path = std::env::temp_dir().join(format!("sve-config-{}.toml", std::process::id()));
        std::fs::write(&path, "vl_bytes = 128\nmte_active = true\n").unwrap();

        let cfg = ConfigBuilder::<SveConfig>::with_defaults()
            .with_file(path.to_str().unwrap())
            .unwrap()
            .build()
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.vl_bytes, 128);
        assert!(cfg.mte_active);
    }

    // Test 6: 缺失文件报 IO 错误
    #[test]
    fn test_builder_missing_file() {
        let res = ConfigBuilder::<SveConfig>::with_defaults().with_file("/nonexistent/sve.toml");
        assert!(matches!(res, Err(ConfigError::Io(_))));
    }

    // Test 7: 构建时执行验证
    #[test]
    fn test_builder_validates() {
        let res = ConfigBuilder::<SveConfig>::with_defaults()
            .with_override(SveConfig::defaults().with_vl(40))
            .build();
        assert!(res.is_err());
    }

    // Test 8: 环境变量
    #[test]
    fn test_from_env() {
        // SAFETY: 测试使用独有前缀，不与其他测试共享变量
        unsafe {
            std::env::set_var("SVETEST_VL_BYTES", "48");
            std::env::set_var("SVETEST_FEATURES", "sve,f64mm");
        }
        let cfg = SveConfig::from_env("SVETEST").unwrap();
        assert_eq!(cfg.vl_bytes, 48);
        assert_eq!(cfg.features, IsaFeatures::SVE | IsaFeatures::F64MM);
    }
}

proptest! {
    // 任意 16 倍数的向量长度都能通过验证并经 JSON 往返
    #[test]
    fn prop_vl_multiple_of_16_validates(q in 1u32..=16) {
        let cfg = SveConfig::defaults().with_vl(q * 16);
        prop_assert!(cfg.validate().is_ok());
        let back = SveConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        prop_assert_eq!(back, cfg);
    }

    #[test]
    fn prop_vl_not_multiple_rejected(vl in 1u32..=256) {
        prop_assume!(vl % 16 != 0);
        prop_assert!(SveConfig::defaults().with_vl(vl).validate().is_err());
    }
}
