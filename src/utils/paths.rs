//! 文件与目录工具 (传统原则：常识性接口设计)

use crate::error::{DeployError, Result};
use std::path::{Path, PathBuf};

/// 检查文件是否存在
pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// 读取文件内容，返回错误时提供详细信息
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        DeployError::Io(std::io::Error::new(
            e.kind(),
            format!("读取文件 {} 失败: {}", path.display(), e),
        ))
    })
}

/// 读取可选文件：不存在时返回 `None`
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    if !file_exists(path) {
        return Ok(None);
    }
    read_file(path).map(Some)
}

/// 安全写入文件 (使用临时文件 + 原子替换)
///
/// 目标文件已存在时沿用其权限位
pub fn write_file_safe(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);
    std::fs::write(&temp_path, content)?;

    if let Ok(existing) = std::fs::metadata(path) {
        std::fs::set_permissions(&temp_path, existing.permissions())?;
    }

    std::fs::rename(&temp_path, path)?;

    Ok(())
}

/// 确保一组目录存在 (幂等操作)
///
/// 返回本次新创建的目录
pub fn ensure_dirs(base: &Path, dirs: &[String]) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for dir in dirs {
        let path = base.join(dir);
        if !path.is_dir() {
            std::fs::create_dir_all(&path)?;
            created.push(path);
        }
    }
    Ok(created)
}

/// 从模板复制文件（目标已存在时不做任何事）
///
/// 返回是否发生了复制
pub fn copy_if_absent(template: &Path, target: &Path) -> Result<bool> {
    if file_exists(target) {
        return Ok(false);
    }
    if !file_exists(template) {
        return Err(DeployError::TemplateNotFound(template.to_path_buf()));
    }
    let content = read_file(template)?;
    write_file_safe(target, &content)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_write_file_safe_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();

        write_file_safe(&path, "new").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_file_safe_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        write_file_safe(&path, "A=1\n").unwrap();
        write_file_safe(&path, "A=2\n").unwrap();

        assert_eq!(read_file(&path).unwrap(), "A=2\n");
        assert!(!dir.path().join(".env.tmp").exists());
    }

    #[test]
    fn test_ensure_dirs_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = vec!["logs".to_string(), "data/node".to_string()];

        let first = ensure_dirs(dir.path(), &dirs).unwrap();
        assert_eq!(first.len(), 2);
        assert!(dir.path().join("data/node").is_dir());

        let second = ensure_dirs(dir.path(), &dirs).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_copy_if_absent() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join(".env.example");
        let target = dir.path().join(".env");
        std::fs::write(&template, "KEY=\n").unwrap();

        assert!(copy_if_absent(&template, &target).unwrap());
        std::fs::write(&target, "KEY=mine\n").unwrap();
        assert!(!copy_if_absent(&template, &target).unwrap());
        assert_eq!(read_file(&target).unwrap(), "KEY=mine\n");
    }

    #[test]
    fn test_copy_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let result = copy_if_absent(&dir.path().join("nope"), &dir.path().join(".env"));
        assert!(matches!(result, Err(DeployError::TemplateNotFound(_))));
    }

    #[test]
    fn test_read_optional_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_optional(&dir.path().join("absent.yaml")).unwrap().is_none());
    }
}
