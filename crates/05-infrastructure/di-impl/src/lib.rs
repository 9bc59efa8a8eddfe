//! # 依赖注入具体实现
//!
//! 提供键控依赖注入注册表：按字符串键注册值、单例和工厂，并支持覆盖与属性式访问。
//!
//! ```
//! use di_impl::{DependencyResolver, Registry};
//!
//! let registry = Registry::new();
//! registry
//!     .define_value("foo", "foo value")?
//!     .define_instance("bar", |ctx, _args| {
//!         let foo = ctx.require::<&str>("foo")?;
//!         Ok(format!("bar: {foo}"))
//!     })?;
//!
//! let bar = registry.resolve_as::<String>("bar", &[])?;
//! assert_eq!(bar.as_deref().map(String::as_str), Some("bar: foo value"));
//! # Ok::<(), di_impl::RegistryError>(())
//! ```

pub mod access;
pub mod context;
pub mod registry;

pub use access::*;
pub use context::*;
pub use registry::*;

pub use di_abstractions::{downcast, value, DependencyResolver, Discipline, Key, Value};
pub use di_common::{FactoryAccessPolicy, RegistryConfig, RegistryError, RegistryResult};

#[cfg(test)]
mod tests;
