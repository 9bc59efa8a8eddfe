//! 属性式访问

use crate::registry::Registry;
use di_abstractions::{downcast, Key, Value};
use di_common::{RegistryError, RegistryResult};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// [`Registry::get`] 的结果
#[derive(Debug, Clone)]
pub enum Access<'r> {
    /// 值或单例的解析结果
    Resolved(Value),
    /// 绑定到工厂键的可调用对象
    Factory(BoundFactory<'r>),
}

impl<'r> Access<'r> {
    /// 解析结果，工厂返回 `None`
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Resolved(resolved) => Some(resolved),
            Self::Factory(_) => None,
        }
    }

    /// 绑定的工厂，值和单例返回 `None`
    pub fn into_factory(self) -> Option<BoundFactory<'r>> {
        match self {
            Self::Resolved(_) => None,
            Self::Factory(factory) => Some(factory),
        }
    }
}

/// 绑定到工厂键的可调用对象
///
/// 等价于 `|args| registry.resolve(key, args)`。
#[derive(Clone)]
pub struct BoundFactory<'r> {
    registry: &'r Registry,
    key: Key,
}

impl<'r> BoundFactory<'r> {
    pub(crate) fn new(registry: &'r Registry, key: Key) -> Self {
        Self { registry, key }
    }

    /// 绑定的键
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// 以给定参数调用工厂
    pub fn call(&self, args: &[Value]) -> RegistryResult<Value> {
        self.registry
            .resolve(self.key.as_str(), args)?
            .ok_or_else(|| RegistryError::undefined_key(self.key.as_str()))
    }

    /// 调用工厂并向下转型为具体类型
    pub fn call_as<T>(&self, args: &[Value]) -> RegistryResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        downcast(self.key.as_str(), self.call(args)?)
    }
}

impl fmt::Debug for BoundFactory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundFactory").field("key", &self.key).finish()
    }
}
