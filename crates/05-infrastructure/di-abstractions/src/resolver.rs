//! 依赖解析器抽象接口

use crate::value::Value;
use di_common::RegistryError;
use std::any::{type_name, Any};
use std::sync::Arc;

/// 依赖解析器 trait
///
/// 注册表与构造上下文都实现此 trait，构造函数可以面向它编写。
pub trait DependencyResolver {
    /// 按键解析依赖
    ///
    /// 未注册的键返回 `Ok(None)`，用于可选依赖。
    fn resolve(&self, key: &str, args: &[Value]) -> Result<Option<Value>, RegistryError>;

    /// 按键解析并向下转型为具体类型
    fn resolve_as<T>(&self, key: &str, args: &[Value]) -> Result<Option<Arc<T>>, RegistryError>
    where
        Self: Sized,
        T: Any + Send + Sync,
    {
        match self.resolve(key, args)? {
            Some(resolved) => downcast(key, resolved).map(Some),
            None => Ok(None),
        }
    }

    /// 解析必需的依赖，未注册时返回 `UndefinedKey`
    fn require<T>(&self, key: &str) -> Result<Arc<T>, RegistryError>
    where
        Self: Sized,
        T: Any + Send + Sync,
    {
        self.resolve_as(key, &[])?
            .ok_or_else(|| RegistryError::undefined_key(key))
    }
}

/// 将类型擦除的值转回具体类型
pub fn downcast<T>(key: &str, resolved: Value) -> Result<Arc<T>, RegistryError>
where
    T: Any + Send + Sync,
{
    resolved
        .downcast::<T>()
        .map_err(|_| RegistryError::TypeMismatch {
            key: key.to_string(),
            expected: type_name::<T>(),
        })
}
