//! 注册值与注册方式

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的注册值
///
/// 同一个值的多次解析返回同一个 `Arc`，可以用 [`Arc::ptr_eq`] 比较身份。
pub type Value = Arc<dyn Any + Send + Sync>;

/// 将任意值包装为 [`Value`]
pub fn value<T>(inner: T) -> Value
where
    T: Any + Send + Sync,
{
    Arc::new(inner)
}

/// 注册方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discipline {
    /// 注册时已计算好的值
    Value,
    /// 首次解析时构造一次，之后缓存
    Instance,
    /// 每次解析都重新构造，从不缓存
    Factory,
}

impl Discipline {
    /// 对应的注册操作名
    pub fn operation(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Instance => "instance",
            Self::Factory => "factory",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discipline_display_matches_operation() {
        for discipline in [Discipline::Value, Discipline::Instance, Discipline::Factory] {
            assert_eq!(discipline.to_string(), discipline.operation());
        }
        assert_eq!(Discipline::Instance.to_string(), "instance");
    }
}
