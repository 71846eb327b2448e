//! .env 格式解析器 (简单原则：透明的文本解析)

/// .env 文件中的一行
///
/// 注释、空行以及无法识别的行原样保留，重写文件时不丢失
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// `raw` 为读入时的原始文本；值被修改后置为 `None`，由 `key`/`value` 重新生成
    Assignment {
        key: String,
        value: String,
        raw: Option<String>,
    },
    Verbatim(String),
}

impl Line {
    /// 新建的赋值行（没有原始文本）
    pub fn assignment(key: &str, value: &str) -> Self {
        Line::Assignment {
            key: key.to_string(),
            value: value.to_string(),
            raw: None,
        }
    }
}

/// .env 格式解析器
pub struct DotenvParser;

impl DotenvParser {
    /// 解析 .env 文件内容
    ///
    /// 规则：
    /// - 空行和以 # 开头的注释行保留为 `Verbatim`
    /// - 格式：KEY=VALUE，可选 `export ` 前缀
    /// - VALUE 两侧的成对引号会被去除
    /// - 未加引号的值中 ` #` 之后是行内注释
    #[must_use]
    pub fn parse(content: &str) -> Vec<Line> {
        content.lines().map(Self::parse_line).collect()
    }

    fn parse_line(raw: &str) -> Line {
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            return Line::Verbatim(raw.to_string());
        }

        let line = line.strip_prefix("export ").unwrap_or(line);

        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Line::Assignment {
                key: key.trim().to_string(),
                value: unquote(value.trim()),
                raw: Some(raw.to_string()),
            },
            // 不是 KEY=VALUE 格式，原样保留
            _ => Line::Verbatim(raw.to_string()),
        }
    }

    /// 序列化为 .env 格式（末尾带换行）
    ///
    /// 未修改过的赋值行按原文输出
    #[must_use]
    pub fn serialize(lines: &[Line]) -> String {
        let mut out = String::new();
        for line in lines {
            match line {
                Line::Assignment { raw: Some(text), .. } => out.push_str(text),
                Line::Assignment { key, value, raw: None } => {
                    out.push_str(key);
                    out.push('=');
                    out.push_str(&quote(value));
                }
                Line::Verbatim(text) => out.push_str(text),
            }
            out.push('\n');
        }
        out
    }
}

fn unquote(value: &str) -> String {
    if let Some(rest) = value.strip_prefix('"') {
        if let Some(end) = rest.rfind('"') {
            return rest[..end].replace("\\\"", "\"").replace("\\\\", "\\");
        }
    }
    if let Some(rest) = value.strip_prefix('\'') {
        if let Some(end) = rest.rfind('\'') {
            return rest[..end].to_string();
        }
    }
    strip_inline_comment(value).to_string()
}

fn strip_inline_comment(value: &str) -> &str {
    if value.starts_with('#') {
        return "";
    }
    match value.find(" #").or_else(|| value.find("\t#")) {
        Some(pos) => value[..pos].trim_end(),
        None => value,
    }
}

/// 需要引号时优先单引号，避免 `$` 被 compose 插值
fn quote(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '$'));
    if !needs_quotes {
        return value.to_string();
    }
    if !value.contains('\'') && !value.contains('\n') {
        return format!("'{value}'");
    }
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
