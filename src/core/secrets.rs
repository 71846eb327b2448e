//! 密钥生成
//!
//! 已有非空值的密钥永远不会被覆盖，重复运行是幂等的

use crate::core::env_file::EnvFile;
use crate::error::Result;
use crate::types::SecretSpec;
use ring::rand::SecureRandom;

/// 内置的密钥集合
///
/// 32 字节用于长期签名/加密密钥，16 字节用于初始化向量
pub fn default_secrets() -> Vec<SecretSpec> {
    vec![
        SecretSpec::new("CREDS_KEY", 32),
        SecretSpec::new("CREDS_IV", 16),
        SecretSpec::new("JWT_SECRET", 32),
        SecretSpec::new("JWT_REFRESH_SECRET", 32),
        SecretSpec::new("MEILI_MASTER_KEY", 16),
    ]
}

/// 生成 `bytes` 个随机字节并十六进制编码
pub fn random_hex(rng: &dyn SecureRandom, bytes: usize) -> Result<String> {
    let mut buf = vec![0u8; bytes];
    rng.fill(&mut buf)?;
    Ok(hex::encode(buf))
}

/// 为缺失的密钥填充随机值
///
/// 返回本次新生成的变量名；调用方负责写回磁盘
pub fn generate_secrets(
    env: &mut EnvFile,
    specs: &[SecretSpec],
    rng: &dyn SecureRandom,
) -> Result<Vec<String>> {
    let mut generated = Vec::new();

    for spec in specs {
        if env.is_set(&spec.name) {
            tracing::debug!(name = %spec.name, "密钥已存在，跳过");
            continue;
        }
        let value = random_hex(rng, spec.bytes)?;
        env.set(&spec.name, &value);
        tracing::info!(name = %spec.name, bytes = spec.bytes, "已生成密钥");
        generated.push(spec.name.clone());
    }

    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring::rand::SystemRandom;
    use std::path::Path;

    fn is_hex(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn test_fills_empty_placeholder_line() {
        let mut env = EnvFile::from_content(Path::new(".env"), "JWT_SECRET=\nOTHER=1");
        let rng = SystemRandom::new();

        let generated =
            generate_secrets(&mut env, &[SecretSpec::new("JWT_SECRET", 32)], &rng).unwrap();

        assert_eq!(generated, vec!["JWT_SECRET".to_string()]);
        let value = env.get("JWT_SECRET").unwrap();
        assert_eq!(value.len(), 64);
        assert!(is_hex(value));
        assert_eq!(env.keys(), vec!["JWT_SECRET", "OTHER"]);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mut env = EnvFile::from_content(Path::new(".env"), "JWT_SECRET=");
        let rng = SystemRandom::new();
        let specs = default_secrets();

        generate_secrets(&mut env, &specs, &rng).unwrap();
        let before: Vec<String> = specs
            .iter()
            .map(|s| env.get(&s.name).unwrap().to_string())
            .collect();

        let second = generate_secrets(&mut env, &specs, &rng).unwrap();
        assert!(second.is_empty());

        let after: Vec<String> = specs
            .iter()
            .map(|s| env.get(&s.name).unwrap().to_string())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_existing_value_untouched() {
        let mut env = EnvFile::from_content(Path::new(".env"), "CREDS_IV=keepme");
        let rng = SystemRandom::new();

        let generated =
            generate_secrets(&mut env, &[SecretSpec::new("CREDS_IV", 16)], &rng).unwrap();

        assert!(generated.is_empty());
        assert_eq!(env.get("CREDS_IV"), Some("keepme"));
        assert!(!env.is_dirty());
    }

    #[test]
    fn test_lengths_follow_spec() {
        let mut env = EnvFile::from_content(Path::new(".env"), "");
        let rng = SystemRandom::new();

        generate_secrets(&mut env, &default_secrets(), &rng).unwrap();

        assert_eq!(env.get("CREDS_KEY").unwrap().len(), 64);
        assert_eq!(env.get("CREDS_IV").unwrap().len(), 32);
    }

    #[test]
    fn test_random_values_differ() {
        let rng = SystemRandom::new();
        assert_ne!(random_hex(&rng, 32).unwrap(), random_hex(&rng, 32).unwrap());
    }
}
