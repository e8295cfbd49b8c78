use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "imageflow")]
#[command(
    about = "コンテナイメージを複数のレジストリへビルド・push・タグ付けする CI ステップ",
    version,
    long_about = None
)]
pub struct Cli {
    /// Any of the following actions: build, push, tag
    #[arg(long, env = "ESTAFETTE_EXTENSION_ACTION")]
    pub action: Option<String>,

    /// List of the repositories the image needs to be pushed to or tagged in (comma separated)
    #[arg(long, env = "ESTAFETTE_EXTENSION_REPOSITORIES")]
    pub repositories: Option<String>,

    /// Name of the container to build, defaults to app label if present
    #[arg(long, env = "ESTAFETTE_EXTENSION_CONTAINER")]
    pub container: Option<String>,

    /// List of tags the image needs to receive (comma separated)
    #[arg(long, env = "ESTAFETTE_EXTENSION_TAGS")]
    pub tags: Option<String>,

    /// Directory to build docker container from
    #[arg(long, env = "ESTAFETTE_EXTENSION_PATH", default_value = ".")]
    pub path: PathBuf,

    /// Dockerfile to build
    #[arg(long, env = "ESTAFETTE_EXTENSION_DOCKERFILE", default_value = "Dockerfile")]
    pub dockerfile: String,

    /// List of files or directories to copy into the build directory (comma separated)
    #[arg(long, env = "ESTAFETTE_EXTENSION_COPY")]
    pub copy: Option<String>,

    /// List of environment variable names to pass as build arguments (comma separated)
    #[arg(long, env = "ESTAFETTE_EXTENSION_ARGS")]
    pub args: Option<String>,

    /// Build version used as the default tag
    #[arg(long, env = "ESTAFETTE_BUILD_VERSION", default_value = "")]
    pub build_version: String,

    /// JSON array of repository credentials
    #[arg(
        long,
        env = "ESTAFETTE_CI_REPOSITORY_CREDENTIALS_JSON",
        default_value = "",
        hide_env_values = true
    )]
    pub credentials_json: String,

    /// App label, used when no container name is given
    #[arg(long, env = "ESTAFETTE_LABEL_APP", hide = true)]
    pub app_label: Option<String>,

    /// Working directory for all external commands
    #[arg(long, env = "ESTAFETTE_WORK_DIR", default_value = "/estafette-work")]
    pub work_dir: PathBuf,

    /// Container engine CLI to drive
    #[arg(long, env = "ESTAFETTE_EXTENSION_ENGINE", default_value = "docker")]
    pub engine: String,

    /// Print the planned commands without running them
    #[arg(
        long,
        env = "ESTAFETTE_EXTENSION_DRY_RUN",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub dry_run: bool,
}
