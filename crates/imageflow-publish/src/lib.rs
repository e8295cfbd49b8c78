//! imageflow コンテナイメージ公開処理
//!
//! CI パイプラインの 1 ステップとして、ローカルでビルドした 1 つのイメージを
//! 複数のリポジトリ × 複数のタグへ複製するためのコマンド列を計画・実行します。
//!
//! # 概要
//!
//! - **tag**: ビルドバージョンをイメージタグとして使える文字列に正規化
//! - **credentials**: イメージ参照に一致するレジストリ認証情報の解決
//! - **session**: 必要な場合のみレジストリへログイン
//! - **planner**: build / push / tag アクションの操作列を計画・実行
//! - **runner**: 外部コマンド（コンテナエンジン）の実行

pub mod credentials;
pub mod error;
pub mod model;
pub mod operation;
pub mod planner;
pub mod runner;
pub mod session;
pub mod tag;

pub use credentials::{parse_credentials, resolve};
pub use error::{PublishError, Result};
pub use model::{Action, ActionRequest, BuildArg, CredentialRecord, ImageReference};
pub use operation::Operation;
pub use planner::{PublicationPlanner, PublishSummary};
pub use runner::{CommandRunner, DryRunRunner, ProcessRunner};
pub use session::{RegistrySession, login_operation};
pub use tag::{TagWarning, sanitize_build_version, tag_warnings};
