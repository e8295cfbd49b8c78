use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("No repositories configured")]
    MissingRepositories,

    #[error("Unknown action: '{0}'")]
    UnknownAction(String),

    #[error("Failed to run '{program}': {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with {}", exit_description(.code))]
    CommandFailed { command: String, code: Option<i32> },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl PublishError {
    /// ユーザー向けの分かりやすいエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            PublishError::MissingRepositories => "リポジトリが指定されていません\n\
                 \n\
                 解決方法:\n\
                 Set `repositories:` to list at least one `- <repository>` (for example like `- extensions`)"
                .to_string(),
            PublishError::UnknownAction(action) => {
                format!(
                    "不明なアクションです: '{}'\n\
                     \n\
                     解決方法:\n\
                     Set `action: <action>` on this step to build, push or tag",
                    action
                )
            }
            _ => format!("{}", self),
        }
    }

}

pub type Result<T> = std::result::Result<T, PublishError>;
