//! 外部コマンドの実行
//!
//! コンテナエンジン・ファイル操作はすべて外部コマンドとして実行します。
//! 終了コード 0 以外と起動失敗はどちらも同じくエラーとして扱います。

use crate::error::{PublishError, Result};
use crate::operation::redact_command_line;
use std::path::PathBuf;
use std::process::Command;

/// 外部コマンドを実行するトレイト
pub trait CommandRunner {
    /// コマンドを実行し、完了するまでブロックする
    fn run(&mut self, program: &str, args: &[String]) -> Result<()>;
}

/// 固定の作業ディレクトリでプロセスを起動するランナー
///
/// 標準出力・標準エラーは親プロセスのものを引き継ぐ。
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    work_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<()> {
        let command_line = redact_command_line(program, args);
        tracing::info!("Running command '{}'...", command_line);

        let status = Command::new(program)
            .args(args)
            .current_dir(&self.work_dir)
            .status()
            .map_err(|e| PublishError::CommandSpawn {
                program: program.to_string(),
                source: e,
            })?;

        if !status.success() {
            return Err(PublishError::CommandFailed {
                command: command_line,
                code: status.code(),
            });
        }

        Ok(())
    }
}

/// 実行せずにコマンドを表示・記録するランナー
#[derive(Debug, Default)]
pub struct DryRunRunner {
    commands: Vec<String>,
    quiet: bool,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 標準出力に表示しない
    pub fn quiet() -> Self {
        Self {
            commands: Vec::new(),
            quiet: true,
        }
    }

    /// 記録したコマンドライン（パスワードはマスク済み）
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<()> {
        let command_line = redact_command_line(program, args);
        if !self.quiet {
            println!("{}", command_line);
        }
        self.commands.push(command_line);
        Ok(())
    }
}
