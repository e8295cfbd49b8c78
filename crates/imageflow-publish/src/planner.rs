//! 公開操作の計画と実行
//!
//! 1 つのソースイメージを全リポジトリ × 全タグへ複製するための操作列を計算します。
//! 各操作は直前の操作（ローカルのタグ）に依存するため、常に逐次実行します。
//! 失敗した時点で中断し、リトライもロールバックも行いません。

use crate::error::Result;
use crate::model::{Action, ActionRequest, CredentialRecord, ImageReference};
use crate::operation::Operation;
use crate::runner::CommandRunner;
use crate::session::RegistrySession;

/// 実行結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    /// 実行した操作の数
    pub operations: usize,
    /// push したイメージ（実行順）
    pub pushed: Vec<ImageReference>,
}

pub struct PublicationPlanner<'a> {
    request: &'a ActionRequest,
    session: RegistrySession<'a>,
    engine: String,
}

impl<'a> PublicationPlanner<'a> {
    pub fn new(
        request: &'a ActionRequest,
        credentials: &'a [CredentialRecord],
        engine: impl Into<String>,
    ) -> Self {
        Self {
            request,
            session: RegistrySession::new(credentials),
            engine: engine.into(),
        }
    }

    /// リクエストのアクションに対する操作列を計算
    pub fn plan(&self) -> Vec<Operation> {
        let mut ops = Vec::new();
        match self.request.action {
            Action::Build => self.plan_build(&mut ops),
            Action::Push => self.plan_push(&mut ops),
            Action::Tag => self.plan_tag(&mut ops),
        }
        ops
    }

    /// 操作列を順番に実行
    ///
    /// 最初に失敗した操作のエラーをそのまま返す。
    pub fn execute(&self, runner: &mut dyn CommandRunner) -> Result<PublishSummary> {
        let ops = self.plan();
        tracing::debug!(
            "Planned {} operations for action '{}'",
            ops.len(),
            self.request.action
        );

        let mut summary = PublishSummary::default();
        for op in &ops {
            tracing::info!("{}", op);
            let (program, args) = op.command(&self.engine);
            runner.run(&program, &args)?;

            summary.operations += 1;
            if let Some(image) = op.pushed_image() {
                summary.pushed.push(image.clone());
            }
        }

        Ok(summary)
    }

    fn plan_build(&self, ops: &mut Vec<Operation>) {
        let request = self.request;

        ops.push(Operation::EnsureDirectory {
            path: request.path.clone(),
        });

        for source in self.copy_list() {
            ops.push(Operation::Copy {
                source,
                destination: request.path.clone(),
            });
        }

        // ビルド時にタグ付けされる先頭リポジトリのみ確認する
        let source_image = request.source_image();
        self.add_login(ops, &source_image);

        let mut tags = Vec::new();
        for repository in &request.repositories {
            tags.push(request.image(repository, &request.default_tag));
            for tag in &request.tags {
                tags.push(request.image(repository, tag));
            }
        }

        ops.push(Operation::Build {
            tags,
            build_args: request.build_args.clone(),
            dockerfile: request.dockerfile.clone(),
            context: request.path.clone(),
        });
    }

    fn plan_push(&self, ops: &mut Vec<Operation>) {
        self.fan_out(ops, true);
    }

    fn plan_tag(&self, ops: &mut Vec<Operation>) {
        let source_image = self.request.source_image();
        self.add_login(ops, &source_image);
        ops.push(Operation::Pull {
            image: source_image,
        });

        // 先頭リポジトリのデフォルトタグはレジストリに既に存在する
        self.fan_out(ops, false);
    }

    /// 全リポジトリ × (デフォルトタグ + 追加タグ) へタグ付けして push
    ///
    /// 先頭リポジトリのデフォルトタグはソースそのものなのでタグ付けしない。
    /// `push_source_default` が false の場合は push もしない。
    fn fan_out(&self, ops: &mut Vec<Operation>, push_source_default: bool) {
        let request = self.request;
        let source = request.source_image();

        for (i, repository) in request.repositories.iter().enumerate() {
            let target = request.image(repository, &request.default_tag);

            if i > 0 {
                ops.push(Operation::Tag {
                    source: source.clone(),
                    target: target.clone(),
                });
                self.push_with_login(ops, target);
            } else if push_source_default {
                self.push_with_login(ops, target);
            }

            for tag in &request.tags {
                let target = request.image(repository, tag);
                ops.push(Operation::Tag {
                    source: source.clone(),
                    target: target.clone(),
                });
                self.push_with_login(ops, target);
            }
        }
    }

    fn push_with_login(&self, ops: &mut Vec<Operation>, image: ImageReference) {
        self.add_login(ops, &image);
        ops.push(Operation::Push { image });
    }

    fn add_login(&self, ops: &mut Vec<Operation>, image: &ImageReference) {
        if let Some(login) = self.session.login_if_required(image) {
            ops.push(login);
        }
    }

    /// ビルドディレクトリへコピーする項目
    ///
    /// ビルドパスがデフォルト以外の場合、Dockerfile が未指定なら追加する。
    fn copy_list(&self) -> Vec<String> {
        let request = self.request;
        let mut copy = request.copy.clone();
        if request.path.as_os_str() != "." && !copy.contains(&request.dockerfile) {
            copy.push(request.dockerfile.clone());
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;
    use crate::model::BuildArg;
    use crate::runner::DryRunRunner;

    fn repos(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn image(repository: &str, tag: &str) -> ImageReference {
        ImageReference::new(repository, "app", tag)
    }

    fn request(action: Action) -> ActionRequest {
        ActionRequest::new(action, repos(&["a", "b"]), "app", "1.0")
            .unwrap()
            .with_tags(repos(&["dev"]))
    }

    fn tag(source: &str, target: (&str, &str)) -> Operation {
        Operation::Tag {
            source: image(source, "1.0"),
            target: image(target.0, target.1),
        }
    }

    fn push(repository: &str, tag: &str) -> Operation {
        Operation::Push {
            image: image(repository, tag),
        }
    }

    fn login(server: Option<&str>) -> Operation {
        Operation::Login {
            server: server.map(str::to_string),
            username: "user".to_string(),
            password: "pass".to_string(),
        }
    }

    /// n 回目の呼び出しで失敗するランナー
    struct FailingRunner {
        fail_at: usize,
        calls: Vec<String>,
    }

    impl CommandRunner for FailingRunner {
        fn run(&mut self, program: &str, args: &[String]) -> Result<()> {
            self.calls.push(format!("{} {}", program, args.join(" ")));
            if self.calls.len() == self.fail_at {
                return Err(PublishError::CommandFailed {
                    command: program.to_string(),
                    code: Some(1),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_plan_push() {
        let request = request(Action::Push);
        let planner = PublicationPlanner::new(&request, &[], "docker");

        assert_eq!(
            planner.plan(),
            vec![
                push("a", "1.0"),
                tag("a", ("a", "dev")),
                push("a", "dev"),
                tag("a", ("b", "1.0")),
                push("b", "1.0"),
                tag("a", ("b", "dev")),
                push("b", "dev"),
            ]
        );
    }

    #[test]
    fn test_plan_push_single_repository_no_tags() {
        let request = ActionRequest::new(Action::Push, repos(&["a"]), "app", "1.0").unwrap();
        let planner = PublicationPlanner::new(&request, &[], "docker");

        assert_eq!(planner.plan(), vec![push("a", "1.0")]);
    }

    #[test]
    fn test_plan_push_with_credentials() {
        let request = request(Action::Push);
        let credentials = vec![CredentialRecord::new("b", "user", "pass")];
        let planner = PublicationPlanner::new(&request, &credentials, "docker");

        // b への push の直前にのみログイン
        assert_eq!(
            planner.plan(),
            vec![
                push("a", "1.0"),
                tag("a", ("a", "dev")),
                push("a", "dev"),
                tag("a", ("b", "1.0")),
                login(None),
                push("b", "1.0"),
                tag("a", ("b", "dev")),
                login(None),
                push("b", "dev"),
            ]
        );
    }

    #[test]
    fn test_plan_tag() {
        let request = request(Action::Tag);
        let planner = PublicationPlanner::new(&request, &[], "docker");

        assert_eq!(
            planner.plan(),
            vec![
                Operation::Pull {
                    image: image("a", "1.0"),
                },
                tag("a", ("a", "dev")),
                push("a", "dev"),
                tag("a", ("b", "1.0")),
                push("b", "1.0"),
                tag("a", ("b", "dev")),
                push("b", "dev"),
            ]
        );
    }

    #[test]
    fn test_plan_tag_logs_in_before_pull() {
        let request = ActionRequest::new(Action::Tag, repos(&["gcr.io/project"]), "app", "1.0")
            .unwrap()
            .with_tags(repos(&["stable"]));
        let credentials = vec![CredentialRecord::new("gcr.io/project", "user", "pass")];
        let planner = PublicationPlanner::new(&request, &credentials, "docker");

        let ops = planner.plan();
        assert_eq!(ops[0], login(Some("gcr.io")));
        assert_eq!(
            ops[1],
            Operation::Pull {
                image: ImageReference::new("gcr.io/project", "app", "1.0"),
            }
        );
        assert_eq!(ops.len(), 5);
        assert_eq!(ops[3], login(Some("gcr.io")));
    }

    #[test]
    fn test_plan_build() {
        let request = request(Action::Build)
            .with_build_args(vec![BuildArg::new("VERSION", "1.0")]);
        let planner = PublicationPlanner::new(&request, &[], "docker");

        assert_eq!(
            planner.plan(),
            vec![
                Operation::EnsureDirectory {
                    path: ".".into(),
                },
                Operation::Build {
                    tags: vec![
                        image("a", "1.0"),
                        image("a", "dev"),
                        image("b", "1.0"),
                        image("b", "dev"),
                    ],
                    build_args: vec![BuildArg::new("VERSION", "1.0")],
                    dockerfile: "Dockerfile".to_string(),
                    context: ".".into(),
                },
            ]
        );
    }

    #[test]
    fn test_plan_build_copies_dockerfile_for_custom_path() {
        let request = ActionRequest::new(Action::Build, repos(&["a"]), "app", "1.0")
            .unwrap()
            .with_path("build")
            .with_copy(repos(&["ca-certificates.crt"]));
        let credentials = vec![CredentialRecord::new("a", "user", "pass")];
        let planner = PublicationPlanner::new(&request, &credentials, "docker");

        let ops = planner.plan();
        assert_eq!(
            &ops[..4],
            &[
                Operation::EnsureDirectory {
                    path: "build".into(),
                },
                Operation::Copy {
                    source: "ca-certificates.crt".to_string(),
                    destination: "build".into(),
                },
                Operation::Copy {
                    source: "Dockerfile".to_string(),
                    destination: "build".into(),
                },
                login(None),
            ]
        );
        assert!(matches!(ops[4], Operation::Build { .. }));
        assert_eq!(
            ops[4].command_line("docker"),
            "docker build --tag a/app:1.0 --file build/Dockerfile build"
        );
    }

    #[test]
    fn test_plan_build_dockerfile_not_duplicated() {
        let request = ActionRequest::new(Action::Build, repos(&["a"]), "app", "1.0")
            .unwrap()
            .with_path("build")
            .with_copy(repos(&["Dockerfile"]));
        let planner = PublicationPlanner::new(&request, &[], "docker");

        let copies = planner
            .plan()
            .into_iter()
            .filter(|op| matches!(op, Operation::Copy { .. }))
            .count();
        assert_eq!(copies, 1);
    }

    #[test]
    fn test_plan_build_dot_slash_path_is_not_default() {
        // "./" は "." と別の文字列として扱い、Dockerfile をコピーする
        let request = ActionRequest::new(Action::Build, repos(&["a"]), "app", "1.0")
            .unwrap()
            .with_path("./");
        let planner = PublicationPlanner::new(&request, &[], "docker");

        let ops = planner.plan();
        assert_eq!(
            ops[1],
            Operation::Copy {
                source: "Dockerfile".to_string(),
                destination: "./".into(),
            }
        );
    }

    #[test]
    fn test_execute_stops_when_login_fails() {
        let request = ActionRequest::new(Action::Push, repos(&["gcr.io/project", "b"]), "app", "1.0")
            .unwrap();
        let credentials = vec![CredentialRecord::new("gcr.io/project", "user", "pass")];
        let planner = PublicationPlanner::new(&request, &credentials, "docker");
        let mut runner = FailingRunner {
            fail_at: 1,
            calls: Vec::new(),
        };

        assert!(planner.execute(&mut runner).is_err());
        assert_eq!(runner.calls.len(), 1);
        assert!(runner.calls[0].starts_with("docker login"));
    }

    #[test]
    fn test_execute_in_order() {
        let request = request(Action::Push);
        let planner = PublicationPlanner::new(&request, &[], "docker");
        let mut runner = DryRunRunner::quiet();

        let summary = planner.execute(&mut runner).unwrap();
        assert_eq!(summary.operations, 7);
        assert_eq!(
            summary.pushed,
            vec![
                image("a", "1.0"),
                image("a", "dev"),
                image("b", "1.0"),
                image("b", "dev"),
            ]
        );
        assert_eq!(runner.commands()[0], "docker push a/app:1.0");
        assert_eq!(runner.commands()[3], "docker tag a/app:1.0 b/app:1.0");
    }

    #[test]
    fn test_execute_stops_at_first_failure() {
        let request = request(Action::Push);
        let planner = PublicationPlanner::new(&request, &[], "docker");
        let mut runner = FailingRunner {
            fail_at: 2,
            calls: Vec::new(),
        };

        let err = planner.execute(&mut runner).unwrap_err();
        assert!(matches!(err, PublishError::CommandFailed { .. }));
        assert_eq!(runner.calls.len(), 2);
        assert_eq!(runner.calls[1], "docker tag a/app:1.0 a/app:dev");
    }

    #[test]
    fn test_execute_uses_engine() {
        let request = ActionRequest::new(Action::Push, repos(&["a"]), "app", "1.0").unwrap();
        let planner = PublicationPlanner::new(&request, &[], "podman");
        let mut runner = DryRunRunner::quiet();

        planner.execute(&mut runner).unwrap();
        assert_eq!(runner.commands(), &["podman push a/app:1.0".to_string()]);
    }
}
