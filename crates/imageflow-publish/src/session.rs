//! レジストリログイン処理
//!
//! 一致する認証情報がある場合のみログインします。
//! 一致しない場合は匿名でアクセスできるリポジトリとみなし、何もしません。

use crate::credentials::resolve;
use crate::model::{CredentialRecord, ImageReference};
use crate::operation::Operation;

/// イメージに必要なログイン操作を作成
pub fn login_operation(
    credentials: &[CredentialRecord],
    image: &ImageReference,
) -> Option<Operation> {
    let credential = resolve(credentials, image)?;

    tracing::debug!(
        "Found credentials for repository {} (image {})",
        credential.repository,
        image
    );

    Some(Operation::Login {
        server: credential.server().map(str::to_string),
        username: credential.username.clone(),
        password: credential.password.clone(),
    })
}

/// 認証情報を保持し、push/pull の前に必要なログインを判定する
pub struct RegistrySession<'a> {
    credentials: &'a [CredentialRecord],
}

impl<'a> RegistrySession<'a> {
    pub fn new(credentials: &'a [CredentialRecord]) -> Self {
        Self { credentials }
    }

    /// 必要な場合のみログイン操作を返す
    ///
    /// # Returns
    /// * `Some(op)` - 一致する認証情報があり、ログインが必要な場合
    /// * `None` - 匿名でアクセスできるとみなす場合
    pub fn login_if_required(&self, image: &ImageReference) -> Option<Operation> {
        login_operation(self.credentials, image)
    }
}
