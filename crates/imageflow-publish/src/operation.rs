//! 計画された 1 つの外部コマンド呼び出し

use crate::model::{BuildArg, ImageReference};
use std::fmt;
use std::path::PathBuf;

const REDACTED: &str = "********";

/// プランナーが出力する操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// ビルドディレクトリの作成（`mkdir -p`）
    EnsureDirectory { path: PathBuf },
    /// ビルドディレクトリへのファイル/ディレクトリのコピー（`cp -r`）
    Copy { source: String, destination: PathBuf },
    Login {
        server: Option<String>,
        username: String,
        password: String,
    },
    Build {
        tags: Vec<ImageReference>,
        build_args: Vec<BuildArg>,
        dockerfile: String,
        context: PathBuf,
    },
    Tag {
        source: ImageReference,
        target: ImageReference,
    },
    Push { image: ImageReference },
    Pull { image: ImageReference },
}

impl Operation {
    /// 実行するプログラムと引数
    ///
    /// `engine` はコンテナエンジンの CLI 名（例: "docker", "podman"）
    pub fn command(&self, engine: &str) -> (String, Vec<String>) {
        match self {
            Operation::EnsureDirectory { path } => (
                "mkdir".to_string(),
                vec!["-p".to_string(), path.display().to_string()],
            ),
            Operation::Copy {
                source,
                destination,
            } => (
                "cp".to_string(),
                vec![
                    "-r".to_string(),
                    source.clone(),
                    destination.display().to_string(),
                ],
            ),
            Operation::Login {
                server,
                username,
                password,
            } => {
                let mut args = vec![
                    "login".to_string(),
                    "--username".to_string(),
                    username.clone(),
                    "--password".to_string(),
                    password.clone(),
                ];
                if let Some(server) = server {
                    args.push(server.clone());
                }
                (engine.to_string(), args)
            }
            Operation::Build {
                tags,
                build_args,
                dockerfile,
                context,
            } => {
                let mut args = vec!["build".to_string()];
                for tag in tags {
                    args.push("--tag".to_string());
                    args.push(tag.to_string());
                }
                for arg in build_args {
                    args.push("--build-arg".to_string());
                    args.push(format!("{}={}", arg.name, arg.value));
                }
                args.push("--file".to_string());
                args.push(format!("{}/{}", context.display(), dockerfile));
                args.push(context.display().to_string());
                (engine.to_string(), args)
            }
            Operation::Tag { source, target } => (
                engine.to_string(),
                vec!["tag".to_string(), source.to_string(), target.to_string()],
            ),
            Operation::Push { image } => (
                engine.to_string(),
                vec!["push".to_string(), image.to_string()],
            ),
            Operation::Pull { image } => (
                engine.to_string(),
                vec!["pull".to_string(), image.to_string()],
            ),
        }
    }

    /// ログ・dry-run 表示用のコマンドライン（パスワードはマスク）
    pub fn command_line(&self, engine: &str) -> String {
        let (program, args) = self.command(engine);
        redact_command_line(&program, &args)
    }

    /// push 対象のイメージ
    pub fn pushed_image(&self) -> Option<&ImageReference> {
        match self {
            Operation::Push { image } => Some(image),
            _ => None,
        }
    }
}

/// `--password` の値をマスクしてコマンドラインを組み立てる
pub fn redact_command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    let mut mask_next = false;
    for arg in args {
        line.push(' ');
        if mask_next {
            line.push_str(REDACTED);
        } else {
            line.push_str(arg);
        }
        mask_next = arg == "--password";
    }
    line
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::EnsureDirectory { path } => {
                write!(f, "Ensuring build directory {} exists", path.display())
            }
            Operation::Copy {
                source,
                destination,
            } => write!(f, "Copying {} to {}", source, destination.display()),
            Operation::Login {
                server: Some(server),
                username,
                ..
            } => write!(f, "Logging in to {} as {}", server, username),
            Operation::Login { username, .. } => {
                write!(f, "Logging in to default registry as {}", username)
            }
            Operation::Build { tags, .. } => match tags.first() {
                Some(first) => write!(f, "Building docker image {}", first),
                None => write!(f, "Building docker image"),
            },
            Operation::Tag { target, .. } => write!(f, "Tagging container image {}", target),
            Operation::Push { image } => write!(f, "Pushing container image {}", image),
            Operation::Pull { image } => write!(f, "Pulling container image {}", image),
        }
    }
}
