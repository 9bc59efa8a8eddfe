//! # 示例应用程序
//!
//! 演示如何用键控注册表装配服务：值、单例、工厂、属性式访问与替换。

use clap::Parser;
use di_common::RegistryConfig;
use di_impl::{Access, DependencyResolver, Registry};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "键控依赖注入注册表示例")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "config/registry.toml")]
    config: String,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    json_logs: bool,

    /// 用替换值覆盖问候语
    #[arg(long)]
    greeting: Option<String>,
}

/// 请求处理器
#[derive(Debug)]
struct Handler {
    id: u64,
    greeting: Arc<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},di_impl=debug", args.log_level)));
    if args.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("启动注册表示例应用");

    let config = RegistryConfig::load(&args.config)?;
    let registry = build_registry(config)?;

    if let Some(greeting) = args.greeting {
        warn!("覆盖问候语: {}", greeting);
        registry.substitute("greeting", greeting)?;
    }

    demonstrate_resolution(&registry)?;
    demonstrate_property_access(&registry)?;

    info!("已注册的键: {:?}", registry.keys());
    Ok(())
}

/// 构建注册表
fn build_registry(config: RegistryConfig) -> anyhow::Result<Registry> {
    let registry = Registry::with_config(config);
    let next_id = Arc::new(AtomicU64::new(1));

    registry
        .define_value("app.name", String::from("example-app"))?
        .define_instance("greeting", |ctx, _args| {
            let name = ctx.require::<String>("app.name")?;
            Ok(format!("hello from {name}"))
        })?
        .define_factory("handler", move |ctx, _args| {
            Ok(Handler {
                id: next_id.fetch_add(1, Ordering::SeqCst),
                greeting: ctx.require::<String>("greeting")?,
            })
        })?;

    Ok(registry)
}

/// 演示显式解析
fn demonstrate_resolution(registry: &Registry) -> anyhow::Result<()> {
    info!("=== 显式解析 ===");

    let greeting = registry.require::<String>("greeting")?;
    info!("greeting: {}", greeting);

    for _ in 0..2 {
        let handler = registry.require::<Handler>("handler")?;
        info!("handler #{}: {}", handler.id, handler.greeting);
    }

    match registry.resolve("metrics", &[])? {
        Some(_) => info!("metrics 已注册"),
        None => info!("metrics 未注册，按可选依赖跳过"),
    }
    Ok(())
}

/// 演示属性式访问
fn demonstrate_property_access(registry: &Registry) -> anyhow::Result<()> {
    info!("=== 属性式访问 ===");

    for key in ["app.name", "greeting", "handler"] {
        match registry.get(key) {
            Ok(Some(Access::Resolved(resolved))) => {
                let text = resolved.downcast_ref::<String>().map_or("<非字符串>", String::as_str);
                info!("{}: {}", key, text);
            }
            Ok(Some(Access::Factory(factory))) => {
                let handler = factory.call_as::<Handler>(&[])?;
                info!("{}() -> handler #{}", factory.key(), handler.id);
            }
            Ok(None) => info!("{}: 未注册", key),
            Err(err) => warn!("{}: {}", key, err),
        }
    }
    Ok(())
}
