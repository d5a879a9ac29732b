//! Scaffold orchestration
//!
//! A run copies the requested templates, writes the package manifest and then
//! works through the post-scaffold command stages in a fixed order:
//!
//! 1. `start` is reported unconditionally
//! 2. base, fetch, docker and commitlint templates are copied; the first copy
//!    error ends the run
//! 3. the manifest is synthesized; an error here is returned to the caller
//! 4. git init, env file, hooks, commitlint hook and the initial commit each
//!    run independently; a failing stage is logged and the next one still runs

use crate::config::{CommandLine, ScaffoldConfig, Step};
use crate::manifest::{ManifestOptions, ManifestSynthesizer};
use crate::report;
use crate::runtime::command::{run_batch, CommandError, CommandRunner};
use crate::templates::{copy_template, TemplateKey, TemplateSource};
use anyhow::Result;
use colored::Colorize;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Flag appended to `git init` and `git commit` in silent mode
pub const QUIET_FLAG: &str = "--quiet";

/// Package name used when the destination directory has no name of its own
pub const FALLBACK_PROJECT_NAME: &str = "project";

/// One scaffolding invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldRequest {
    /// Destination directory; its last component names the package
    pub directory: PathBuf,
    /// No interactive prompts, quiet git output
    pub silent: bool,
    pub with_fetch: bool,
    pub with_docker: bool,
    pub with_commitlint: bool,
}

impl ScaffoldRequest {
    /// Package name derived from the destination directory
    ///
    /// The directory is made absolute against the working directory and `.`
    /// and `..` are resolved lexically, so `.` names the current directory
    /// and `apps/web/..` names `apps`.
    pub fn project_name(&self) -> String {
        let absolute = if self.directory.is_absolute() {
            self.directory.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.directory))
                .unwrap_or_else(|_| self.directory.clone())
        };
        last_component(&absolute).unwrap_or_else(|| FALLBACK_PROJECT_NAME.to_string())
    }

    /// Templates to copy, in copy order
    pub fn templates(&self) -> Vec<TemplateKey> {
        let mut keys = vec![TemplateKey::Base];
        if self.with_fetch {
            keys.push(TemplateKey::Fetch);
        }
        if self.with_docker {
            keys.push(TemplateKey::Docker);
        }
        if self.with_commitlint {
            keys.push(TemplateKey::Commitlint);
        }
        keys
    }
}

fn last_component(path: &Path) -> Option<String> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts.last().map(|part| part.to_string_lossy().into_owned())
}

/// A command stage that did not succeed
#[derive(Debug)]
pub struct StageFailure {
    pub step: Step,
    pub error: CommandError,
}

/// What a run did
#[derive(Debug, Default)]
pub struct ScaffoldSummary {
    /// Reported steps, in order
    pub completed: Vec<Step>,
    /// Templates copied, in order
    pub copied: Vec<TemplateKey>,
    /// Command stages that failed
    pub failures: Vec<StageFailure>,
    /// Set when template copying failed and the run stopped early
    pub aborted: Option<String>,
}

impl ScaffoldSummary {
    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }
}

/// The post-manifest command stages for `request`, in run order
pub fn command_stages(
    config: &ScaffoldConfig,
    request: &ScaffoldRequest,
) -> Vec<(Step, Vec<CommandLine>)> {
    let commands = &config.commands;
    let mut stages = vec![
        (
            Step::Git,
            vec![commands.git_init.with_flag_if(QUIET_FLAG, request.silent)],
        ),
        (Step::Env, vec![commands.create_local_env.clone()]),
        (Step::Husky, commands.husky.clone()),
    ];

    if request.with_commitlint {
        stages.push((Step::CommitlintHook, vec![commands.husky_commitlint.clone()]));
    }

    stages.push((
        Step::Commit,
        vec![
            commands.git_add.clone(),
            commands.git_commit.with_flag_if(QUIET_FLAG, request.silent),
        ],
    ));

    stages
}

/// Drives one scaffolding run
pub struct Scaffolder<R, M> {
    config: ScaffoldConfig,
    source: TemplateSource,
    product_name: String,
    runner: R,
    synthesizer: M,
}

impl<R: CommandRunner, M: ManifestSynthesizer> Scaffolder<R, M> {
    pub fn new(
        config: ScaffoldConfig,
        source: TemplateSource,
        product_name: impl Into<String>,
        runner: R,
        synthesizer: M,
    ) -> Self {
        Self {
            config,
            source,
            product_name: product_name.into(),
            runner,
            synthesizer,
        }
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Scaffold a project
    ///
    /// Copy failures are logged and end the run with `aborted` set; only a
    /// manifest failure is returned as an error.
    pub async fn run(&self, request: &ScaffoldRequest) -> Result<ScaffoldSummary> {
        let mut summary = ScaffoldSummary::default();
        let directory = request.directory.display().to_string();
        info!(directory = %directory, "scaffolding project");

        self.report(&mut summary, Step::Start, &directory.cyan().to_string());

        for key in request.templates() {
            if let Err(err) = self.copy(key, &request.directory).await {
                let message = format!("{:#}", err);
                report::report_failure(format!("Failed to copy the {} template", key), &message);
                summary.aborted = Some(message);
                return Ok(summary);
            }
            summary.copied.push(key);
            self.report(&mut summary, key.step(), "");
        }

        self.report(&mut summary, Step::Package, "");
        let options = ManifestOptions::assemble(&self.config, request, &self.product_name);
        self.synthesizer.synthesize(&options).await?;
        self.report(&mut summary, Step::Npm, "");

        for (step, commands) in command_stages(&self.config, request) {
            self.run_stage(&mut summary, step, &commands, &request.directory)
                .await;
        }

        Ok(summary)
    }

    async fn copy(&self, key: TemplateKey, project_dir: &Path) -> Result<()> {
        let entry = self.config.templates.entry(key);
        let copied = copy_template(&self.source, entry, project_dir).await?;
        debug!(template = %key, files = copied.len(), "template copied");
        Ok(())
    }

    async fn run_stage(
        &self,
        summary: &mut ScaffoldSummary,
        step: Step,
        commands: &[CommandLine],
        cwd: &Path,
    ) {
        match run_batch(&self.runner, commands, cwd).await {
            Ok(()) => self.report(summary, step, ""),
            Err(error) => {
                report::report_failure(format!("Step {} failed", step), &error);
                summary.failures.push(StageFailure { step, error });
            }
        }
    }

    fn report(&self, summary: &mut ScaffoldSummary, step: Step, extra: &str) {
        report::report(&self.config.steps, step, extra);
        summary.completed.push(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeRunner {
        seen: RefCell<Vec<String>>,
        fail_on: Vec<&'static str>,
    }

    impl CommandRunner for FakeRunner {
        async fn run(&self, command: &CommandLine, _cwd: &Path) -> Result<(), CommandError> {
            let rendered = command.to_string();
            self.seen.borrow_mut().push(rendered.clone());
            if self.fail_on.iter().any(|f| rendered.starts_with(f)) {
                return Err(CommandError::Failed {
                    command: rendered,
                    code: Some(1),
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeSynthesizer {
        calls: RefCell<Vec<ManifestOptions>>,
        fail: bool,
    }

    impl ManifestSynthesizer for FakeSynthesizer {
        async fn synthesize(&self, options: &ManifestOptions) -> Result<()> {
            self.calls.borrow_mut().push(options.clone());
            if self.fail {
                anyhow::bail!("npm is unavailable");
            }
            Ok(())
        }
    }

    fn template_root() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let files = [
            "base/README.md",
            "base/.env.example",
            "base/src/index.mjs",
            "fetch/utils.mjs",
            "docker/Dockerfile",
            "docker/.dockerignore",
            "commitlint/commitlint.config.js",
        ];
        for file in files {
            let path = root.path().join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, file).unwrap();
        }
        root
    }

    fn scaffolder(
        root: &Path,
        runner: FakeRunner,
        synthesizer: FakeSynthesizer,
    ) -> Scaffolder<FakeRunner, FakeSynthesizer> {
        Scaffolder::new(
            ScaffoldConfig::embedded().unwrap(),
            TemplateSource::Local(root.to_path_buf()),
            "seedling",
            runner,
            synthesizer,
        )
    }

    fn request(project: &Path, fetch: bool, docker: bool, commitlint: bool) -> ScaffoldRequest {
        ScaffoldRequest {
            directory: project.join("demo"),
            silent: true,
            with_fetch: fetch,
            with_docker: docker,
            with_commitlint: commitlint,
        }
    }

    #[tokio::test]
    async fn test_copied_templates_follow_flags() {
        let root = template_root();

        for bits in 0..8u8 {
            let (fetch, docker, commitlint) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let project = tempfile::tempdir().unwrap();
            let req = request(project.path(), fetch, docker, commitlint);
            let s = scaffolder(root.path(), FakeRunner::default(), FakeSynthesizer::default());

            let summary = s.run(&req).await.unwrap();

            assert_eq!(summary.copied, req.templates());
            let dir = &req.directory;
            assert!(dir.join("README.md").exists());
            assert_eq!(dir.join("src/utils/utils.mjs").exists(), fetch);
            assert_eq!(dir.join("Dockerfile").exists(), docker);
            assert_eq!(dir.join("commitlint.config.js").exists(), commitlint);
        }
    }

    #[tokio::test]
    async fn test_base_copy_failure_stops_everything() {
        let empty_root = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let s = scaffolder(
            empty_root.path(),
            FakeRunner::default(),
            FakeSynthesizer::default(),
        );

        let summary = s.run(&request(project.path(), true, true, true)).await.unwrap();

        assert!(summary.is_aborted());
        assert_eq!(summary.completed, vec![Step::Start]);
        assert!(summary.copied.is_empty());
        assert!(s.synthesizer.calls.borrow().is_empty());
        assert!(s.runner.seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_optional_copy_failure_is_fatal_too() {
        let root = template_root();
        std::fs::remove_dir_all(root.path().join("docker")).unwrap();
        let project = tempfile::tempdir().unwrap();
        let s = scaffolder(root.path(), FakeRunner::default(), FakeSynthesizer::default());

        let summary = s.run(&request(project.path(), false, true, false)).await.unwrap();

        assert!(summary.is_aborted());
        assert_eq!(summary.copied, vec![TemplateKey::Base]);
        assert_eq!(summary.completed, vec![Step::Start, Step::Base]);
        assert!(s.synthesizer.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_failed_stage_does_not_stop_later_stages() {
        let root = template_root();
        let project = tempfile::tempdir().unwrap();
        let runner = FakeRunner {
            fail_on: vec!["npx husky install"],
            ..FakeRunner::default()
        };
        let s = scaffolder(root.path(), runner, FakeSynthesizer::default());

        let summary = s.run(&request(project.path(), false, false, true)).await.unwrap();

        assert!(!summary.is_aborted());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].step, Step::Husky);
        assert!(summary.completed.contains(&Step::CommitlintHook));
        assert!(summary.completed.contains(&Step::Commit));
        assert!(!summary.completed.contains(&Step::Husky));

        let seen = s.runner.seen.borrow();
        // The rest of the husky batch is skipped, later batches are not
        assert!(!seen.iter().any(|c| c.starts_with("npx husky add .husky/pre-commit")));
        assert!(seen.iter().any(|c| c.starts_with("git commit")));
    }

    #[tokio::test]
    async fn test_manifest_failure_is_returned() {
        let root = template_root();
        let project = tempfile::tempdir().unwrap();
        let synthesizer = FakeSynthesizer {
            fail: true,
            ..FakeSynthesizer::default()
        };
        let s = scaffolder(root.path(), FakeRunner::default(), synthesizer);

        let err = s
            .run(&request(project.path(), false, false, false))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("npm is unavailable"));
        assert!(s.runner.seen.borrow().is_empty());
    }

    #[test]
    fn test_silent_adds_quiet_flag() {
        let config = ScaffoldConfig::embedded().unwrap();
        let mut req = ScaffoldRequest {
            directory: PathBuf::from("demo"),
            silent: true,
            ..ScaffoldRequest::default()
        };

        let stages = command_stages(&config, &req);
        assert_eq!(stages[0].1[0].to_string(), "git init --quiet");
        let commit = stages.last().unwrap();
        assert_eq!(commit.0, Step::Commit);
        assert!(commit.1[1].to_string().ends_with("--quiet"));

        req.silent = false;
        let stages = command_stages(&config, &req);
        assert_eq!(stages[0].1[0].to_string(), "git init");
        assert!(!stages.last().unwrap().1[1].to_string().contains("--quiet"));
    }

    #[tokio::test]
    async fn test_demo_scenario() {
        let root = template_root();
        let project = tempfile::tempdir().unwrap();
        let s = scaffolder(root.path(), FakeRunner::default(), FakeSynthesizer::default());
        let req = request(project.path(), false, true, false);

        let summary = s.run(&req).await.unwrap();

        assert_eq!(summary.copied, vec![TemplateKey::Base, TemplateKey::Docker]);
        assert_eq!(
            summary.completed,
            vec![
                Step::Start,
                Step::Base,
                Step::Docker,
                Step::Package,
                Step::Npm,
                Step::Git,
                Step::Env,
                Step::Husky,
                Step::Commit,
            ]
        );

        let calls = s.synthesizer.calls.borrow();
        assert_eq!(calls.len(), 1);
        let options = &calls[0];
        let config = s.config();
        assert_eq!(options.name, "demo");
        assert!(!options.prompt);
        assert!(options.dependencies.iter().any(|d| d == "pm2"));
        assert!(!options.dependencies.iter().any(|d| d == "node-fetch"));
        assert!(!options
            .dev_dependencies
            .iter()
            .any(|d| config.extra_deps.commitlint.contains(d)));
        assert_eq!(
            options.scripts["commitlint"],
            config.extra_options.commitlint_fallback.scripts["commitlint"]
        );

        let seen = s.runner.seen.borrow();
        assert_eq!(seen[0], "git init --quiet");
        assert!(!seen.iter().any(|c| c.contains(".husky/commit-msg")));
        assert_eq!(
            seen.last().map(String::as_str),
            Some("git commit -m \"chore: initial commit\" --quiet")
        );
    }

    #[test]
    fn test_project_name_uses_last_component() {
        let req = ScaffoldRequest {
            directory: PathBuf::from("apps/web"),
            ..ScaffoldRequest::default()
        };
        assert_eq!(req.project_name(), "web");
    }

    #[test]
    fn test_project_name_resolves_dot_segments() {
        let named = |dir: &str| {
            ScaffoldRequest {
                directory: PathBuf::from(dir),
                ..ScaffoldRequest::default()
            }
            .project_name()
        };

        assert_eq!(named("/srv/apps/demo/.."), "apps");
        assert_eq!(named("/srv/apps/./demo/"), "demo");
        assert_eq!(named("/"), FALLBACK_PROJECT_NAME);

        let cwd = std::env::current_dir().unwrap();
        let cwd_name = cwd.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(named("."), cwd_name);
        assert_eq!(named("demo/.."), cwd_name);
    }

    #[tokio::test]
    async fn test_bundled_templates_scaffold_every_option() {
        let project = tempfile::tempdir().unwrap();
        let s = Scaffolder::new(
            ScaffoldConfig::embedded().unwrap(),
            TemplateSource::Bundled,
            "seedling",
            FakeRunner::default(),
            FakeSynthesizer::default(),
        );
        let req = request(project.path(), true, true, true);

        let summary = s.run(&req).await.unwrap();

        assert!(!summary.is_aborted());
        assert_eq!(summary.copied, TemplateKey::ALL.to_vec());
        let dir = &req.directory;
        assert!(dir.join(".env.example").is_file());
        assert!(dir.join("src/index.mjs").is_file());
        assert!(dir.join("src/utils/utils.mjs").is_file());
        assert!(dir.join("Dockerfile").is_file());
        assert!(dir.join("commitlint.config.js").is_file());
    }
}
