//! 実行設定
//!
//! フラグと環境変数から 1 度だけ組み立て、以降は読み取り専用で各処理に渡します。

use crate::cli::Cli;
use imageflow_publish::{
    Action, ActionRequest, BuildArg, CredentialRecord, PublishError, parse_credentials,
    sanitize_build_version,
};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub action: String,
    pub repositories: Vec<String>,
    pub container: String,
    pub tags: Vec<String>,
    pub path: PathBuf,
    pub dockerfile: String,
    pub copy: Vec<String>,
    pub build_args: Vec<BuildArg>,
    /// 正規化済みのビルドバージョン
    pub default_tag: String,
    pub credentials: Vec<CredentialRecord>,
    pub work_dir: PathBuf,
    pub engine: String,
    pub dry_run: bool,
}

impl Config {
    /// CLI 引数から設定を組み立てる
    ///
    /// ビルド引数の値はこの時点の環境変数から取得する（未設定は空文字）。
    pub fn from_cli(cli: Cli) -> Self {
        let container = match cli.container.filter(|c| !c.is_empty()) {
            Some(container) => container,
            None => cli.app_label.unwrap_or_default(),
        };

        let build_args = split_list(cli.args.as_deref())
            .into_iter()
            .map(|name| {
                let value = std::env::var(&name).unwrap_or_default();
                BuildArg::new(name, value)
            })
            .collect();

        Self {
            action: cli.action.unwrap_or_default(),
            repositories: split_list(cli.repositories.as_deref()),
            container,
            tags: split_list(cli.tags.as_deref()),
            path: cli.path,
            dockerfile: cli.dockerfile,
            copy: split_list(cli.copy.as_deref()),
            build_args,
            default_tag: sanitize_build_version(&cli.build_version),
            credentials: parse_credentials(&cli.credentials_json),
            work_dir: cli.work_dir,
            engine: cli.engine,
            dry_run: cli.dry_run,
        }
    }

    /// 検証してリクエストを作成
    ///
    /// リポジトリ → アクションの順に検証する。どちらもコマンド実行前に失敗する。
    pub fn request(&self) -> Result<ActionRequest, PublishError> {
        if self.repositories.is_empty() {
            return Err(PublishError::MissingRepositories);
        }
        let action: Action = self.action.parse()?;

        Ok(ActionRequest::new(
            action,
            self.repositories.clone(),
            self.container.clone(),
            self.default_tag.clone(),
        )?
        .with_tags(self.tags.clone())
        .with_path(self.path.clone())
        .with_dockerfile(self.dockerfile.clone())
        .with_copy(self.copy.clone())
        .with_build_args(self.build_args.clone()))
    }
}

/// カンマ区切りのリストを分割（空文字は空リスト）
pub fn split_list(value: Option<&str>) -> Vec<String> {
    match value {
        Some(value) if !value.is_empty() => value.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}
