//! リージョン指定の解釈
//!
//! CLI側から渡される3形式をサポートする:
//! カンマ区切りのインラインリスト、1行1トークンのファイル、
//! 同梱のリージョン名→国コード対応表。

use std::path::Path;

use crate::error::ChartsError;

use super::generator::normalize_region;

/// 同梱のリージョン名→コード対応表。
/// トークン直接指定（"jp"等）の代わりに名前でも指定できるようにする。
const REGION_CODES: &[(&str, &str)] = &[
    ("worldwide", "global"),
    ("global", "global"),
    ("argentina", "ar"),
    ("australia", "au"),
    ("brazil", "br"),
    ("canada", "ca"),
    ("france", "fr"),
    ("germany", "de"),
    ("india", "in"),
    ("indonesia", "id"),
    ("italy", "it"),
    ("japan", "jp"),
    ("mexico", "mx"),
    ("netherlands", "nl"),
    ("south korea", "kr"),
    ("spain", "es"),
    ("sweden", "se"),
    ("united kingdom", "gb"),
    ("united states", "us"),
];

/// リージョン名からコードを引く（大文字小文字は無視）
pub fn lookup_region_code(name: &str) -> Option<&'static str> {
    let name = name.trim().to_ascii_lowercase();
    REGION_CODES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

/// カンマ区切りのインラインリストをトークン列に展開する
pub fn parse_inline_regions(arg: &str) -> Result<Vec<String>, ChartsError> {
    let tokens: Vec<String> = arg
        .split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(resolve_token)
        .collect::<Result<_, _>>()?;

    if tokens.is_empty() {
        return Err(ChartsError::InvalidRegion(
            "リージョンが1つも指定されていません".into(),
        ));
    }
    Ok(tokens)
}

/// 1行1トークンのファイルを読む。空行と `#` コメント行はスキップ。
pub fn parse_region_file(path: &Path) -> Result<Vec<String>, ChartsError> {
    let content = std::fs::read_to_string(path)?;

    let mut tokens = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        tokens.push(resolve_token(line)?);
    }

    if tokens.is_empty() {
        return Err(ChartsError::InvalidRegion(format!(
            "リージョンファイルが空です: {:?}",
            path
        )));
    }
    Ok(tokens)
}

/// トークンまたはリージョン名をコードへ解決する
fn resolve_token(token: &str) -> Result<String, ChartsError> {
    if let Some(code) = lookup_region_code(token) {
        return Ok(code.to_string());
    }
    let normalized = normalize_region(token);
    if normalized.is_empty() || normalized.chars().any(|c| !c.is_ascii_alphabetic()) {
        return Err(ChartsError::InvalidRegion(token.to_string()));
    }
    Ok(normalized)
}
