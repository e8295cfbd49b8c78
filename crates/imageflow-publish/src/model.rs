//! 公開処理のデータモデル

use crate::error::{PublishError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// イメージ参照: `repository/container:tag`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    pub repository: String,
    pub container: String,
    pub tag: String,
}

impl ImageReference {
    pub fn new(
        repository: impl Into<String>,
        container: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            container: container.into(),
            tag: tag.into(),
        }
    }

    /// 最後のセグメント（`container:tag`）を除いたパス
    ///
    /// レンダリング後の文字列を `/` で分割して求めるため、
    /// container に `/` が含まれる場合はその手前までになります。
    ///
    /// # Examples
    /// - `docker.io/estafette/app:1.0` -> `docker.io/estafette`
    /// - `extensions/docker:dev` -> `extensions`
    pub fn repository_path(&self) -> String {
        let rendered = self.to_string();
        match rendered.rfind('/') {
            Some(pos) => rendered[..pos].to_string(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.repository, self.container, self.tag)
    }
}

/// レジストリ認証情報
///
/// 欠けているフィールドは空文字列として扱う（キーは大文字始まりも受け付ける）。
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CredentialRecord {
    #[serde(alias = "Repository")]
    pub repository: String,
    #[serde(alias = "Username")]
    pub username: String,
    #[serde(alias = "Password")]
    pub password: String,
}

impl CredentialRecord {
    pub fn new(
        repository: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// ログインに使うレジストリホスト
    ///
    /// `/` を含まないリポジトリはデフォルトレジストリ上にあるとみなし、None を返す。
    pub fn server(&self) -> Option<&str> {
        self.repository.split_once('/').map(|(host, _)| host)
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("repository", &self.repository)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// 実行するアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Build,
    Push,
    Tag,
}

impl FromStr for Action {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "build" => Ok(Action::Build),
            "push" => Ok(Action::Push),
            "tag" => Ok(Action::Tag),
            other => Err(PublishError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Build => "build",
            Action::Push => "push",
            Action::Tag => "tag",
        };
        f.write_str(name)
    }
}

/// ビルド引数（値は組み立て時に環境変数から取得済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArg {
    pub name: String,
    pub value: String,
}

impl BuildArg {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 1 回の実行で処理するリクエスト
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub action: Action,
    /// ローカルにビルド済みのイメージを持つリポジトリ（`repositories` の先頭）
    pub source_repository: String,
    pub repositories: Vec<String>,
    pub tags: Vec<String>,
    pub container: String,
    /// 正規化済みのビルドバージョン（全イメージ参照のデフォルトタグ）
    pub default_tag: String,
    pub path: PathBuf,
    pub dockerfile: String,
    pub copy: Vec<String>,
    pub build_args: Vec<BuildArg>,
}

impl ActionRequest {
    /// リクエストを作成
    ///
    /// `repositories` が空の場合は `MissingRepositories` を返す。
    pub fn new(
        action: Action,
        repositories: Vec<String>,
        container: impl Into<String>,
        default_tag: impl Into<String>,
    ) -> Result<Self> {
        let source_repository = repositories
            .first()
            .cloned()
            .ok_or(PublishError::MissingRepositories)?;

        Ok(Self {
            action,
            source_repository,
            repositories,
            tags: Vec::new(),
            container: container.into(),
            default_tag: default_tag.into(),
            path: PathBuf::from("."),
            dockerfile: "Dockerfile".to_string(),
            copy: Vec::new(),
            build_args: Vec::new(),
        })
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_dockerfile(mut self, dockerfile: impl Into<String>) -> Self {
        self.dockerfile = dockerfile.into();
        self
    }

    pub fn with_copy(mut self, copy: Vec<String>) -> Self {
        self.copy = copy;
        self
    }

    pub fn with_build_args(mut self, build_args: Vec<BuildArg>) -> Self {
        self.build_args = build_args;
        self
    }

    /// ソースイメージ（先頭リポジトリ × デフォルトタグ）
    pub fn source_image(&self) -> ImageReference {
        self.image(&self.source_repository, &self.default_tag)
    }

    /// このリクエストのコンテナ名でイメージ参照を作成
    pub fn image(&self, repository: &str, tag: &str) -> ImageReference {
        ImageReference::new(repository, &self.container, tag)
    }
}
