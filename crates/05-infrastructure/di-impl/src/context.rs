//! 构造函数与构造上下文

use crate::registry::Registry;
use di_abstractions::{value, DependencyResolver, Key, Value};
use di_common::RegistryError;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 类型擦除的构造逻辑
trait Construct: Send + Sync {
    fn construct(&self, context: &Context<'_>, args: &[Value]) -> anyhow::Result<Value>;
}

/// 返回具体类型的构造闭包
struct TypedConstruct<F, T> {
    body: F,
    _output: PhantomData<fn() -> T>,
}

impl<F, T> Construct for TypedConstruct<F, T>
where
    F: Fn(&Context<'_>, &[Value]) -> anyhow::Result<T> + Send + Sync,
    T: Any + Send + Sync,
{
    fn construct(&self, context: &Context<'_>, args: &[Value]) -> anyhow::Result<Value> {
        (self.body)(context, args).map(value)
    }
}

/// 构造函数
///
/// 接收显式的 [`Context`] 和调用方转发的参数，返回任意值或错误。
/// 构造函数本身也可以作为普通值注册，再通过 [`Registry::define_instance_from`]
/// 或 [`Registry::define_factory_from`] 提升为单例或工厂。
#[derive(Clone)]
pub struct Constructor(Arc<dyn Construct>);

impl Constructor {
    /// 包装构造闭包
    pub fn new<F, T>(body: F) -> Self
    where
        F: Fn(&Context<'_>, &[Value]) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        Self(Arc::new(TypedConstruct {
            body,
            _output: PhantomData,
        }))
    }

    /// 从类型擦除的值中取出构造函数，值不是构造函数时返回 `None`
    pub fn from_value(candidate: &Value) -> Option<Self> {
        candidate.downcast_ref::<Self>().cloned()
    }

    pub(crate) fn construct(&self, context: &Context<'_>, args: &[Value]) -> anyhow::Result<Value> {
        self.0.construct(context, args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Constructor(<function>)")
    }
}

/// 构造上下文
///
/// 每次调用构造函数时创建，记录所属注册表、正在构造的键以及外层的构造链。
/// 构造函数应通过上下文解析自己的依赖，这样循环依赖和解析深度才能被检测到。
#[derive(Clone, Copy)]
pub struct Context<'a> {
    registry: &'a Registry,
    key: &'a Key,
    parent: Option<&'a Context<'a>>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        key: &'a Key,
        parent: Option<&'a Context<'a>>,
    ) -> Self {
        Self {
            registry,
            key,
            parent,
        }
    }

    /// 所属注册表
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// 正在构造的键
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// 构造链长度，包含当前键
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// 正在构造的键，从最外层到当前键
    pub fn chain(&self) -> Vec<Key> {
        let mut chain: Vec<Key> = self.ancestors().map(|context| context.key.clone()).collect();
        chain.reverse();
        chain
    }

    /// 键是否正在构造链上
    pub fn is_constructing(&self, key: &str) -> bool {
        self.ancestors().any(|context| context.key == key)
    }

    fn ancestors(&self) -> impl Iterator<Item = &Context<'a>> {
        std::iter::successors(Some(self), |context| context.parent)
    }
}

impl DependencyResolver for Context<'_> {
    fn resolve(&self, key: &str, args: &[Value]) -> Result<Option<Value>, RegistryError> {
        self.registry.resolve_within(Some(self), key, args)
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("key", &self.key)
            .field("chain", &self.chain())
            .finish()
    }
}

/// 格式化构造链，例如 `a -> b -> a`
pub(crate) fn format_chain(parent: Option<&Context<'_>>, key: &str) -> String {
    let mut keys: Vec<String> = parent
        .map(|context| context.chain().iter().map(ToString::to_string).collect())
        .unwrap_or_default();
    keys.push(key.to_string());
    keys.join(" -> ")
}
