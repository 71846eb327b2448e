//! 持久化环境文件 (模块原则：内存模型是唯一事实来源)
//!
//! 启动时读取一次，之后所有读写都针对内存中的行模型，
//! 只有发生变更时才整体原子写回磁盘。

use crate::config::format::dotenv::{DotenvParser, Line};
use crate::error::Result;
use crate::utils::paths::{read_file, write_file_safe};
use std::path::{Path, PathBuf};

/// `.env` 文件的内存表示
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    lines: Vec<Line>,
    dirty: bool,
}

impl EnvFile {
    /// 从磁盘加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_file(path)?;
        Ok(Self::from_content(path, &content))
    }

    /// 从文本构造（不接触磁盘）
    pub fn from_content(path: &Path, content: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: DotenvParser::parse(content),
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 获取变量值（重复键以最后一个为准）
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| match line {
            Line::Assignment { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// 变量是否有非空值
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.trim().is_empty())
    }

    /// 设置变量：存在则原地替换，否则追加
    ///
    /// 同名的后续重复行会被删除，保证键唯一；
    /// 只有值真正改变的行才按新格式重写
    pub fn set(&mut self, key: &str, value: &str) {
        let mut found = false;
        self.lines.retain_mut(|line| match line {
            Line::Assignment {
                key: k,
                value: v,
                raw,
            } if k.as_str() == key => {
                if found {
                    return false;
                }
                found = true;
                if v.as_str() != value {
                    *v = value.to_string();
                    *raw = None;
                }
                true
            }
            _ => true,
        });

        if !found {
            self.lines.push(Line::assignment(key, value));
        }
        self.dirty = true;
    }

    /// 所有键（按文件顺序，去重）
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for line in &self.lines {
            if let Line::Assignment { key, .. } = line {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    /// 是否有未写回的修改
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 有修改时写回磁盘，返回是否实际写入
    pub fn save(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        write_file_safe(&self.path, &DotenvParser::serialize(&self.lines))?;
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "环境文件已写回");
        Ok(true)
    }
}
