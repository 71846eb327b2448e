//! 变量发现
//!
//! 扫描配置文档中的占位符：`${VAR}` 或 `${VAR:-default}`

use crate::error::{DeployError, Result};
use crate::types::VariableName;
use crate::utils::paths::{file_exists, read_file, read_optional};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

// 正则表达式：匹配 ${NAME...}，只捕获前导的大写变量名，其余修饰部分丢弃
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)[^}]*\}").expect("占位符正则表达式无效")
});

/// 扫描单个文档中引用的变量名
///
/// 不以 `[A-Z_]` 开头的占位符不产生任何名字
pub fn scan(content: &str) -> BTreeSet<VariableName> {
    PLACEHOLDER
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .filter_map(|name| VariableName::parse(name.as_str()))
        .collect()
}

/// 合并服务拓扑与应用配置中引用的变量
pub fn discover(topology: &str, app_config: Option<&str>) -> BTreeSet<VariableName> {
    let mut names = scan(topology);
    if let Some(config) = app_config {
        names.extend(scan(config));
    }
    names
}

/// 从文件发现变量
///
/// 服务拓扑文件必须存在；应用配置文件缺失时视为空
pub fn discover_files(topology: &Path, app_config: &Path) -> Result<BTreeSet<VariableName>> {
    if !file_exists(topology) {
        return Err(DeployError::SourceNotFound(topology.to_path_buf()));
    }
    let topology_content = read_file(topology)?;
    let config_content = read_optional(app_config)?;

    if config_content.is_none() {
        tracing::debug!(path = %app_config.display(), "应用配置文件不存在，跳过");
    }

    let names = discover(&topology_content, config_content.as_deref());
    tracing::debug!(count = names.len(), "发现变量");
    Ok(names)
}
