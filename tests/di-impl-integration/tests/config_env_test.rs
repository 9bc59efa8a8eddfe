//! 环境变量覆盖配置文件

use di_common::{FactoryAccessPolicy, RegistryConfig};
use std::io::Write;

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "max_resolution_depth = 12").unwrap();
    writeln!(file, r#"factory_access = "reject""#).unwrap();

    std::env::set_var("DI_REGISTRY_MAX_RESOLUTION_DEPTH", "5");
    let config = RegistryConfig::load(file.path());
    std::env::remove_var("DI_REGISTRY_MAX_RESOLUTION_DEPTH");

    let config = config.unwrap();
    assert_eq!(config.max_resolution_depth, 5);
    assert_eq!(config.factory_access, FactoryAccessPolicy::Reject);
}
