//! 键控依赖注入注册表

use crate::access::{Access, BoundFactory};
use crate::context::{format_chain, Constructor, Context};
use di_abstractions::{value, DependencyResolver, Discipline, Key, Value};
use di_common::{FactoryAccessPolicy, RegistryConfig, RegistryError, RegistryResult};
use indexmap::IndexMap;
use parking_lot::{ReentrantMutex, RwLock};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// 单个键的注册信息
struct Slot {
    /// 注册方式，替换后保持不变
    discipline: Discipline,
    /// 单例或工厂的构造函数
    constructor: Option<Constructor>,
    /// 已计算的值
    cached: Option<Value>,
    /// 单例首次构造期间持有，其他线程在此等待
    init_lock: Arc<ReentrantMutex<()>>,
}

/// 依赖注入注册表
///
/// 支持三种注册方式：
///
/// - [`define_value`](Self::define_value) - 立即注册已计算好的值
/// - [`define_instance`](Self::define_instance) - 首次解析时构造并缓存
/// - [`define_factory`](Self::define_factory) - 每次解析都重新构造
///
/// 键在所有注册方式之间唯一，只能通过 [`substitute`](Self::substitute) 覆盖。
/// 构造函数运行期间不持有注册表锁，因此可以在构造函数中回调注册表。
/// 同一单例的首次构造在线程间串行执行，构造函数只会成功运行一次。
pub struct Registry {
    config: RegistryConfig,
    slots: RwLock<IndexMap<Key, Slot>>,
}

impl Registry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// 使用指定配置创建空注册表
    pub fn with_config(config: RegistryConfig) -> Self {
        debug!("创建注册表: {:?}", config);
        Self {
            config,
            slots: RwLock::new(IndexMap::new()),
        }
    }

    /// 注册表配置
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// 注册已计算好的值
    pub fn define_value<T>(&self, key: &str, inner: T) -> RegistryResult<&Self>
    where
        T: Any + Send + Sync,
    {
        let key = Key::parse(key)?;
        self.register(key, Discipline::Value, None, Some(value(inner)))
    }

    /// 注册单例：首次解析时调用构造函数，结果永久缓存
    pub fn define_instance<F, T>(&self, key: &str, body: F) -> RegistryResult<&Self>
    where
        F: Fn(&Context<'_>, &[Value]) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        let key = Key::parse(key)?;
        self.register(key, Discipline::Instance, Some(Constructor::new(body)), None)
    }

    /// 注册工厂：每次解析都调用构造函数，结果从不缓存
    pub fn define_factory<F, T>(&self, key: &str, body: F) -> RegistryResult<&Self>
    where
        F: Fn(&Context<'_>, &[Value]) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        let key = Key::parse(key)?;
        self.register(key, Discipline::Factory, Some(Constructor::new(body)), None)
    }

    /// 以类型擦除的构造函数注册单例
    ///
    /// `candidate` 不是 [`Constructor`] 时返回 `NotCallable`。
    pub fn define_instance_from(&self, key: &str, candidate: &Value) -> RegistryResult<&Self> {
        self.register_erased(key, Discipline::Instance, candidate)
    }

    /// 以类型擦除的构造函数注册工厂
    ///
    /// `candidate` 不是 [`Constructor`] 时返回 `NotCallable`。
    pub fn define_factory_from(&self, key: &str, candidate: &Value) -> RegistryResult<&Self> {
        self.register_erased(key, Discipline::Factory, candidate)
    }

    /// 解析依赖
    ///
    /// 未注册的键返回 `Ok(None)`。已缓存的单例再次解析时不能传入参数。
    pub fn resolve(&self, key: &str, args: &[Value]) -> RegistryResult<Option<Value>> {
        self.resolve_within(None, key, args)
    }

    /// 解析依赖并向下转型为具体类型
    pub fn resolve_as<T>(&self, key: &str, args: &[Value]) -> RegistryResult<Option<Arc<T>>>
    where
        T: Any + Send + Sync,
    {
        DependencyResolver::resolve_as(self, key, args)
    }

    /// 覆盖已注册键的值，绕过其构造函数
    ///
    /// 之后的解析都返回该值，键的注册方式保持不变。
    pub fn substitute<T>(&self, key: &str, inner: T) -> RegistryResult<()>
    where
        T: Any + Send + Sync,
    {
        let key = Key::parse(key)?;
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(&key)
            .ok_or_else(|| RegistryError::undefined_key(key.as_str()))?;

        debug!("替换依赖: [{}] ({})", key, slot.discipline);
        slot.cached = Some(value(inner));
        Ok(())
    }

    /// 属性式访问
    ///
    /// 值和单例等同于无参数的 [`resolve`](Self::resolve)；
    /// 工厂按 [`FactoryAccessPolicy`] 返回绑定的可调用对象或 `FactoryAccess` 错误。
    pub fn get(&self, key: &str) -> RegistryResult<Option<Access<'_>>> {
        let key = Key::parse(key)?;
        match self.discipline(key.as_str()) {
            None => Ok(None),
            Some(Discipline::Factory) => match self.config.factory_access {
                FactoryAccessPolicy::Bind => {
                    Ok(Some(Access::Factory(BoundFactory::new(self, key))))
                }
                FactoryAccessPolicy::Reject => Err(RegistryError::FactoryAccess {
                    key: key.to_string(),
                }),
            },
            Some(_) => Ok(self.resolve(key.as_str(), &[])?.map(Access::Resolved)),
        }
    }

    /// 按注册顺序列出所有键
    pub fn keys(&self) -> Vec<Key> {
        self.slots.read().keys().cloned().collect()
    }

    /// 键是否已注册
    pub fn contains(&self, key: &str) -> bool {
        self.slots.read().contains_key(key)
    }

    /// 键的注册方式
    pub fn discipline(&self, key: &str) -> Option<Discipline> {
        self.slots.read().get(key).map(|slot| slot.discipline)
    }

    /// 已注册键的数量
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// 是否没有任何注册
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    fn register_erased(
        &self,
        key: &str,
        discipline: Discipline,
        candidate: &Value,
    ) -> RegistryResult<&Self> {
        let key = Key::parse(key)?;
        let constructor =
            Constructor::from_value(candidate).ok_or_else(|| RegistryError::NotCallable {
                operation: discipline.operation(),
                key: key.to_string(),
            })?;
        self.register(key, discipline, Some(constructor), None)
    }

    fn register(
        &self,
        key: Key,
        discipline: Discipline,
        constructor: Option<Constructor>,
        cached: Option<Value>,
    ) -> RegistryResult<&Self> {
        let mut slots = self.slots.write();
        if slots.contains_key(&key) {
            return Err(RegistryError::duplicate_key(key.as_str()));
        }

        debug!("注册依赖: [{}] ({})", key, discipline);
        slots.insert(
            key,
            Slot {
                discipline,
                constructor,
                cached,
                init_lock: Arc::new(ReentrantMutex::new(())),
            },
        );
        Ok(self)
    }

    pub(crate) fn resolve_within(
        &self,
        parent: Option<&Context<'_>>,
        key: &str,
        args: &[Value],
    ) -> RegistryResult<Option<Value>> {
        if key.is_empty() {
            return Err(RegistryError::invalid_key(key));
        }

        let (key, discipline, constructor, init_lock) = {
            let slots = self.slots.read();
            let Some((key, slot)) = slots.get_key_value(key) else {
                trace!("未注册的依赖: [{}]", key);
                return Ok(None);
            };

            if let Some(cached) = &slot.cached {
                return Self::reuse(key, slot.discipline, cached, args);
            }

            let Some(constructor) = slot.constructor.clone() else {
                return Ok(None);
            };
            (
                key.clone(),
                slot.discipline,
                constructor,
                Arc::clone(&slot.init_lock),
            )
        };

        let reentered = parent.is_some_and(|context| context.is_constructing(key.as_str()));
        if discipline == Discipline::Instance && reentered {
            return Err(RegistryError::CircularDependency {
                chain: format_chain(parent, key.as_str()),
            });
        }

        let depth = parent.map_or(0, Context::depth) + 1;
        if depth > self.config.max_resolution_depth {
            return Err(RegistryError::ResolutionDepthExceeded {
                limit: self.config.max_resolution_depth,
                chain: format_chain(parent, key.as_str()),
            });
        }

        if discipline == Discipline::Factory {
            return self.construct(parent, &key, discipline, &constructor, args, depth);
        }

        let _constructing = init_lock.lock();
        // 等待期间其他线程可能已完成构造
        let cached = self.slots.read().get(&key).and_then(|slot| slot.cached.clone());
        if let Some(cached) = cached {
            return Self::reuse(&key, discipline, &cached, args);
        }

        let constructed = self.construct(parent, &key, discipline, &constructor, args, depth)?;
        let mut slots = self.slots.write();
        let Some(slot) = slots.get_mut(&key) else {
            return Ok(constructed);
        };
        // 构造期间写入的替换值优先
        if let Some(cached) = &slot.cached {
            return Self::reuse(&key, discipline, cached, args);
        }
        slot.cached = constructed.clone();
        Ok(constructed)
    }

    fn construct(
        &self,
        parent: Option<&Context<'_>>,
        key: &Key,
        discipline: Discipline,
        constructor: &Constructor,
        args: &[Value],
        depth: usize,
    ) -> RegistryResult<Option<Value>> {
        trace!("构造依赖: [{}] ({})，深度 {}", key, discipline, depth);
        let context = Context::new(self, key, parent);
        constructor
            .construct(&context, args)
            .map(Some)
            .map_err(|source| match source.downcast::<RegistryError>() {
                Ok(nested) => nested,
                Err(source) => RegistryError::ConstructionFailed {
                    key: key.to_string(),
                    source: source.into(),
                },
            })
    }

    /// 返回已缓存的值，单例不再接受参数
    fn reuse(
        key: &Key,
        discipline: Discipline,
        cached: &Value,
        args: &[Value],
    ) -> RegistryResult<Option<Value>> {
        if discipline == Discipline::Instance && !args.is_empty() {
            return Err(RegistryError::AlreadyInstantiated {
                key: key.to_string(),
            });
        }
        trace!("命中缓存: [{}]", key);
        Ok(Some(Arc::clone(cached)))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyResolver for Registry {
    fn resolve(&self, key: &str, args: &[Value]) -> RegistryResult<Option<Value>> {
        self.resolve_within(None, key, args)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.read();
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field(
                "entries",
                &slots
                    .iter()
                    .map(|(key, slot)| (key.as_str(), slot.discipline))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
