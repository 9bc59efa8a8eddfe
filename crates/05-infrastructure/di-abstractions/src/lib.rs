//! # Dependency Injection Abstractions
//!
//! 键控依赖注入的抽象层，定义注册键、注册值和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`Key`] - 非空且唯一的注册键
//! - [`Value`] - 类型擦除后的注册值
//! - [`Discipline`] - 注册方式（值、单例、工厂）
//! - [`DependencyResolver`] - 依赖解析器接口

pub mod key;
pub mod resolver;
pub mod value;

pub use key::*;
pub use resolver::*;
pub use value::*;

pub use di_common::RegistryError;
