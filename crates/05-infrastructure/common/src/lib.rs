//! # DI Common
//!
//! 键控依赖注入注册表的公共错误类型与配置。
//!
//! ## 核心组件
//!
//! - [`RegistryError`] - 注册、解析与替换的错误分类
//! - [`ConfigError`] - 配置加载错误
//! - [`RegistryConfig`] - 注册表配置

pub mod configuration;
pub mod errors;

pub use configuration::*;
pub use errors::*;
