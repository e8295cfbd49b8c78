//! レジストリ認証情報の解決
//!
//! 認証情報は JSON 配列（`[{"repository", "username", "password"}]`）で渡されます。
//! 空・不正な入力はエラーにせず「認証情報なし」として扱います。

use crate::model::{CredentialRecord, ImageReference};

/// JSON 配列から認証情報を読み込む
pub fn parse_credentials(json: &str) -> Vec<CredentialRecord> {
    if json.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<CredentialRecord>>(json) {
        Ok(credentials) => {
            tracing::debug!("Loaded {} repository credentials", credentials.len());
            credentials
        }
        Err(e) => {
            tracing::debug!("Ignoring unparsable repository credentials: {}", e);
            Vec::new()
        }
    }
}

/// イメージ参照に一致する認証情報を取得
///
/// イメージのリポジトリ部分（最後のセグメントを除いたパス）と
/// `repository` が完全一致する最初のレコードを返す。
pub fn resolve<'a>(
    credentials: &'a [CredentialRecord],
    image: &ImageReference,
) -> Option<&'a CredentialRecord> {
    if credentials.is_empty() {
        return None;
    }

    let repository = image.repository_path();
    credentials.iter().find(|c| c.repository == repository)
}
