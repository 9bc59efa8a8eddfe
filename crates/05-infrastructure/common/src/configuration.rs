//! 注册表配置
//!
//! 配置来源按优先级从低到高：默认值、配置文件、`DI_REGISTRY_` 前缀的环境变量。

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "DI_REGISTRY";

/// 默认最大解析深度
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 64;

/// 工厂键的属性式访问策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactoryAccessPolicy {
    /// 返回转发参数到 `resolve` 的可调用对象
    #[default]
    Bind,
    /// 拒绝访问，返回 `FactoryAccess` 错误
    Reject,
}

/// 注册表配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// 嵌套解析的最大深度
    pub max_resolution_depth: usize,
    /// 工厂键的属性式访问策略
    pub factory_access: FactoryAccessPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
            factory_access: FactoryAccessPolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 文件格式由扩展名决定，文件不存在时只使用默认值和环境变量。
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("加载注册表配置: {}", path.display());

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()?;

        Self::finish(settings)
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Self::finish(settings)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    fn finish(settings: config::Config) -> ConfigResult<Self> {
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        debug!("注册表配置: {:?}", config);
        Ok(config)
    }
}
