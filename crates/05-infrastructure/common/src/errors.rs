//! 错误类型定义

use thiserror::Error;

/// 注册表错误类型
///
/// 所有错误都同步返回给直接调用者，注册表本身不做重试或恢复。
/// 解析未注册的键不属于错误，见 `resolve` 的 `Ok(None)` 返回值。
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("无效的键: {key:?}，键必须是非空字符串")]
    InvalidKey { key: String },

    #[error("注册表已定义 [{key}]")]
    DuplicateKey { key: String },

    #[error("{operation}() 需要一个构造函数: [{key}]")]
    NotCallable { operation: &'static str, key: String },

    #[error("已创建 [{key}] 的实例，不能再传入构造参数")]
    AlreadyInstantiated { key: String },

    #[error("无法替换 [{key}]，该键尚未定义")]
    UndefinedKey { key: String },

    #[error("工厂 [{key}] 不允许属性式访问，请使用 resolve()")]
    FactoryAccess { key: String },

    #[error("构造 [{key}] 失败: {source}")]
    ConstructionFailed {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("检测到循环依赖: {chain}")]
    CircularDependency { chain: String },

    #[error("解析深度超过上限 {limit}: {chain}")]
    ResolutionDepthExceeded { limit: usize, chain: String },

    #[error("类型不匹配: [{key}] 不是 {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

impl RegistryError {
    /// 创建无效键错误
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// 创建重复键错误
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// 创建未定义键错误
    pub fn undefined_key(key: impl Into<String>) -> Self {
        Self::UndefinedKey { key: key.into() }
    }

    /// 出错的键（如果错误与单个键相关）
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::InvalidKey { key }
            | Self::DuplicateKey { key }
            | Self::NotCallable { key, .. }
            | Self::AlreadyInstantiated { key }
            | Self::UndefinedKey { key }
            | Self::FactoryAccess { key }
            | Self::ConstructionFailed { key, .. }
            | Self::TypeMismatch { key, .. } => Some(key),
            Self::CircularDependency { .. } | Self::ResolutionDepthExceeded { .. } => None,
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(source: config::ConfigError) -> Self {
        Self::ParseError {
            source: Box::new(source),
        }
    }
}

/// 结果类型别名
pub type RegistryResult<T> = Result<T, RegistryError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
