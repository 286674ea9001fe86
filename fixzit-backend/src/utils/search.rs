// src/utils/search.rs

//! 検索語の正規化とエスケープ
//!
//! 利用者入力の検索語はそのままクエリに渡さず、必ず `sanitize_search` を通してから
//! `escape_like` でLIKEパターンに変換する。

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::ColumnTrait;

/// 検索語の最大文字数
pub const MAX_SEARCH_LENGTH: usize = 100;

/// 前後の空白を除去し、100文字で切り詰め、小文字化する。空なら None
pub fn sanitize_search(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    // 文字境界で切る（マルチバイト文字対応）
    let truncated: String = trimmed.chars().take(MAX_SEARCH_LENGTH).collect();
    Some(truncated.to_lowercase())
}

/// LIKEのメタ文字（`\` `%` `_`）をエスケープする
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 正規表現のメタ文字をエスケープする
pub fn escape_regex(term: &str) -> String {
    regex::escape(term)
}

/// `LOWER(col) LIKE '%term%' ESCAPE '\'` を生成
pub fn contains_ci<C: ColumnTrait>(column: C, sanitized: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(sanitized));
    Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// メモリ上の値に対する大文字小文字を無視した部分一致
pub fn matches_ci(haystack: &str, sanitized: &str) -> bool {
    match regex::RegexBuilder::new(&escape_regex(sanitized))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.is_match(haystack),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_trims_and_lowercases() {
        assert_eq!(sanitize_search("  Hello World "), Some("hello world".to_string()));
        assert_eq!(sanitize_search("   "), None);
        assert_eq!(sanitize_search(""), None);
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "a".repeat(250);
        assert_eq!(sanitize_search(&long).unwrap().chars().count(), MAX_SEARCH_LENGTH);

        // マルチバイトでもパニックしない
        let multibyte = "é".repeat(150);
        assert_eq!(
            sanitize_search(&multibyte).unwrap().chars().count(),
            MAX_SEARCH_LENGTH
        );
    }

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("a.b*c"), "a\\.b\\*c");
        assert!(matches_ci("Price (USD)", "(usd)"));
        assert!(!matches_ci("abc", ".*x"));
    }
}
