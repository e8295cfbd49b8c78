//! ビルドバージョン → イメージタグの正規化
//!
//! タグに使える文字は英数字、アンダースコア、ピリオド、ハイフンのみ。
//! それ以外の文字の連続は 1 つのハイフンに置き換えます。
//! 128 文字制限と先頭文字の制約は書き換えずに警告として報告するだけです。

use std::fmt;

/// タグの最大長
pub const MAX_TAG_LENGTH: usize = 128;

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}

/// ビルドバージョンをイメージタグとして使える文字列に変換
///
/// # Examples
/// - `1.2.3-rc.1` -> `1.2.3-rc.1`
/// - `feature/foo bar` -> `feature-foo-bar`
/// - `a//b` -> `a-b`
pub fn sanitize_build_version(build_version: &str) -> String {
    let mut tag = String::with_capacity(build_version.len());
    let mut in_invalid_run = false;

    for c in build_version.chars() {
        if is_tag_char(c) {
            tag.push(c);
            in_invalid_run = false;
        } else if !in_invalid_run {
            tag.push('-');
            in_invalid_run = true;
        }
    }

    tag
}

/// エンジンに拒否される可能性のあるタグの問題
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagWarning {
    Empty,
    TooLong(usize),
    LeadingSeparator(char),
}

impl fmt::Display for TagWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagWarning::Empty => write!(f, "tag is empty"),
            TagWarning::TooLong(len) => write!(
                f,
                "tag too long ({} characters, max {})",
                len, MAX_TAG_LENGTH
            ),
            TagWarning::LeadingSeparator(c) => write!(f, "tag starts with '{}'", c),
        }
    }
}

/// タグを書き換えずに、エンジン側の制約違反を列挙
pub fn tag_warnings(tag: &str) -> Vec<TagWarning> {
    let mut warnings = Vec::new();

    let Some(first) = tag.chars().next() else {
        warnings.push(TagWarning::Empty);
        return warnings;
    };

    if tag.len() > MAX_TAG_LENGTH {
        warnings.push(TagWarning::TooLong(tag.len()));
    }

    if first == '.' || first == '-' {
        warnings.push(TagWarning::LeadingSeparator(first));
    }

    warnings
}
