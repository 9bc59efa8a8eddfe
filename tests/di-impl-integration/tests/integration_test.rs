//! 依赖注入注册表的集成测试

use di_abstractions::{value, DependencyResolver, Value};
use di_common::{FactoryAccessPolicy, RegistryConfig, RegistryError};
use di_impl::{Access, Context, Registry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 测试用的存储接口
trait Store: Send + Sync {
    fn get(&self, id: u64) -> Option<String>;
}

#[derive(Debug)]
struct MemoryStore {
    prefix: String,
}

impl Store for MemoryStore {
    fn get(&self, id: u64) -> Option<String> {
        Some(format!("{}-{}", self.prefix, id))
    }
}

struct EmptyStore;

impl Store for EmptyStore {
    fn get(&self, _id: u64) -> Option<String> {
        None
    }
}

/// 依赖存储的服务
struct UserService {
    store: Arc<dyn Store>,
    request_id: usize,
}

/// 面向解析器接口编写的构造逻辑
fn build_service(
    resolver: &impl DependencyResolver,
    request_id: usize,
) -> anyhow::Result<UserService> {
    let store = resolver.require::<Arc<dyn Store>>("store")?;
    Ok(UserService {
        store: (*store).clone(),
        request_id,
    })
}

fn wire(registry: &Registry, requests: &Arc<AtomicUsize>) -> Result<(), RegistryError> {
    let requests = Arc::clone(requests);
    registry
        .define_value("store.prefix", String::from("user"))?
        .define_instance("store", |ctx, _args| {
            let prefix = ctx.require::<String>("store.prefix")?;
            let store: Arc<dyn Store> = Arc::new(MemoryStore {
                prefix: (*prefix).clone(),
            });
            Ok(store)
        })?
        .define_factory("user_service", move |ctx: &Context<'_>, _args: &[Value]| {
            build_service(ctx, requests.fetch_add(1, Ordering::SeqCst))
        })?;
    Ok(())
}

#[test]
fn test_wired_services_share_singletons() {
    let requests = Arc::new(AtomicUsize::new(0));
    let registry = Registry::new();
    wire(&registry, &requests).unwrap();

    let first = registry.resolve_as::<UserService>("user_service", &[]).unwrap().unwrap();
    let second = registry.resolve_as::<UserService>("user_service", &[]).unwrap().unwrap();

    assert!(Arc::ptr_eq(&first.store, &second.store));
    assert_ne!(first.request_id, second.request_id);
    assert_eq!(first.store.get(7).as_deref(), Some("user-7"));
    assert_eq!(requests.load(Ordering::SeqCst), 2);
}

#[test]
fn test_substitute_installs_test_double() {
    let requests = Arc::new(AtomicUsize::new(0));
    let registry = Registry::new();
    wire(&registry, &requests).unwrap();

    let double: Arc<dyn Store> = Arc::new(EmptyStore);
    registry.substitute("store", double).unwrap();

    let service = registry.resolve_as::<UserService>("user_service", &[]).unwrap().unwrap();
    assert_eq!(service.store.get(7), None);
}

#[test]
fn test_resolver_trait_works_on_registry_directly() {
    let requests = Arc::new(AtomicUsize::new(0));
    let registry = Registry::new();
    wire(&registry, &requests).unwrap();

    let service = build_service(&registry, 99).unwrap();
    assert_eq!(service.request_id, 99);
    assert_eq!(service.store.get(1).as_deref(), Some("user-1"));
}

#[test]
fn test_optional_dependencies() {
    let registry = Registry::new();
    registry
        .define_factory("greeting", |ctx, _args| {
            let name = ctx
                .resolve_as::<String>("name", &[])?
                .map_or_else(|| "anonymous".to_string(), |name| (*name).clone());
            Ok(format!("hello, {name}"))
        })
        .unwrap();

    let anonymous = registry.resolve_as::<String>("greeting", &[]).unwrap().unwrap();
    assert_eq!(*anonymous, "hello, anonymous");

    registry.define_value("name", String::from("ada")).unwrap();
    let named = registry.resolve_as::<String>("greeting", &[]).unwrap().unwrap();
    assert_eq!(*named, "hello, ada");
}

#[test]
fn test_property_access_mirrors_resolution() {
    let registry = Registry::new();
    registry
        .define_value("foo", "foo value")
        .unwrap()
        .define_instance("bar", |ctx, _args| {
            let foo = ctx.require::<&str>("foo")?;
            Ok(format!("bar: {foo}"))
        })
        .unwrap()
        .define_factory("baz", |_ctx, args| Ok(args.len()))
        .unwrap();

    let bar = registry.get("bar").unwrap().and_then(Access::into_value).unwrap();
    assert_eq!(bar.downcast_ref::<String>().map(String::as_str), Some("bar: foo value"));

    let baz = registry.get("baz").unwrap().and_then(Access::into_factory).unwrap();
    assert_eq!(*baz.call_as::<usize>(&[value(1), value(2)]).unwrap(), 2);

    let keys: Vec<String> = registry.keys().iter().map(ToString::to_string).collect();
    assert_eq!(keys, ["foo", "bar", "baz"]);
}

#[test]
fn test_configured_registry() {
    let config = RegistryConfig::from_toml_str(
        r#"
        max_resolution_depth = 2
        factory_access = "reject"
        "#,
    )
    .unwrap();
    let registry = Registry::with_config(config);
    registry
        .define_factory("leaf", |_ctx, _args| Ok(1_u8))
        .unwrap()
        .define_factory("middle", |ctx, _args| Ok(*ctx.require::<u8>("leaf")? + 1))
        .unwrap()
        .define_factory("top", |ctx, _args| Ok(*ctx.require::<u8>("middle")? + 1))
        .unwrap();

    assert_eq!(registry.config().factory_access, FactoryAccessPolicy::Reject);
    assert!(matches!(registry.get("leaf"), Err(RegistryError::FactoryAccess { .. })));
    assert_eq!(*registry.resolve_as::<u8>("middle", &[]).unwrap().unwrap(), 2);
    assert!(matches!(
        registry.resolve("top", &[]),
        Err(RegistryError::ResolutionDepthExceeded { limit: 2, .. })
    ));
}
