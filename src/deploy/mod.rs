//! Deploy sequencing.
//!
//! `SelectVersion → ConfirmDeploy → NotifyStart → Install → StopOld →
//! Relink → StartNew → NotifyDone`. Only the confirmation can end the run
//! early. Nothing is rolled back: a failure once the old release is stopped
//! leaves the service down.

use crate::cli::{OutputManager, Prompter};
use crate::config::DeployConfig;
use crate::error::Result;
use crate::git::TagSource;
use crate::github::ReleaseLookup;
use crate::notify::{Chat, Notifier};
use crate::remote::{RemoteCommand, RemoteExecutor, RemoteSession};
use crate::state::{DeployContext, DeployPhase, SelectedVersion};
use crate::supervisor::ProcessController;
use crate::version::{Selection, VersionSelector};

/// How a deploy run ended
#[derive(Debug)]
pub enum DeployOutcome {
    /// Every phase ran
    Completed(DeployContext),
    /// The operator backed out before anything changed on the target
    Cancelled,
}

/// Runs the deploy sequence against one target
pub struct Deployer<'a, E, N> {
    config: &'a DeployConfig,
    session: &'a RemoteSession<E>,
    chat: &'a Chat<N>,
    output: &'a OutputManager,
    github_token: &'a str,
    operator: String,
}

impl<'a, E: RemoteExecutor, N: Notifier> Deployer<'a, E, N> {
    /// Create a deployer; `operator` names the local user in notifications
    pub fn new(
        config: &'a DeployConfig,
        session: &'a RemoteSession<E>,
        chat: &'a Chat<N>,
        output: &'a OutputManager,
        github_token: &'a str,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            config,
            session,
            chat,
            output,
            github_token,
            operator: operator.into(),
        }
    }

    fn context(&self) -> DeployContext {
        DeployContext::new(&self.config.user, &self.config.host, self.session.home())
    }

    fn controller(&self) -> ProcessController<'_, E, N> {
        ProcessController::new(self.config, self.session, self.chat, self.output)
    }

    /// Full interactive deploy
    pub async fn deploy<T, L, P>(
        &self,
        selector: &VersionSelector<'_, T, L, P>,
        prompter: &P,
    ) -> Result<DeployOutcome>
    where
        T: TagSource,
        L: ReleaseLookup,
        P: Prompter,
    {
        let mut ctx = self.context();

        let selected = match selector.choose().await? {
            Selection::Chosen(selected) => selected,
            Selection::Cancelled => return Ok(DeployOutcome::Cancelled),
        };
        ctx.select(&selected);
        ctx.advance();

        let answer = prompter.input(
            &format!("Deploy {} to {}?", selected.version, ctx.target()),
            Some("n"),
        )?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            self.output.error("Cancelled");
            return Ok(DeployOutcome::Cancelled);
        }
        ctx.advance();

        self.execute(&mut ctx, &selected).await?;
        Ok(DeployOutcome::Completed(ctx))
    }

    /// Run every phase after confirmation
    pub async fn execute(&self, ctx: &mut DeployContext, selected: &SelectedVersion) -> Result<()> {
        ctx.select(selected);
        ctx.phase = DeployPhase::NotifyStart;

        match self.run_phases(ctx, selected).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if ctx.phase.leaves_service_down() {
                    self.output.error(&format!(
                        "Deploy failed during {}; {} may be down",
                        ctx.phase,
                        ctx.target()
                    ));
                }
                log::error!("deploy aborted in phase '{}': {}", ctx.phase, e);
                Err(e)
            }
        }
    }

    async fn run_phases(&self, ctx: &mut DeployContext, selected: &SelectedVersion) -> Result<()> {
        let install_dir = ctx.install_dir(&selected.version);

        let _ = self.output.status("configuring ssh");
        self.session.hijack_agent_socket().await?;
        self.chat
            .say(&format!(
                "{} is deploying {} to {}",
                self.operator,
                selected.version,
                ctx.target()
            ))
            .await;
        ctx.advance();

        self.install(selected, &install_dir).await?;
        ctx.advance();

        self.controller().stop().await?;
        ctx.advance();

        self.relink(&install_dir, &ctx.live_dir()).await?;
        ctx.advance();

        self.controller().start().await?;
        ctx.advance();

        self.chat
            .say(&format!("Deployment successful for {}", ctx.target()))
            .await;
        let _ = self.output.success("server ready");
        ctx.advance();

        log::info!("deploy finished: {}", ctx.summary());
        Ok(())
    }

    /// Replace `<home>/releases/<version>` with a fresh unpack of the asset
    pub async fn install(&self, selected: &SelectedVersion, install_dir: &str) -> Result<()> {
        let _ = self.output.status("removing existing dir");
        self.session
            .run_user(RemoteCommand::new("rm").args(["-Rf", install_dir]))
            .await?;
        self.session
            .run_user(RemoteCommand::new("mkdir").args(["-p", install_dir]))
            .await?;

        let _ = self
            .output
            .status(&format!("fetching release {}", selected.version));
        self.session
            .run_user_in(install_dir, self.download_command(selected))
            .await?;
        self.session
            .run_user_in(
                install_dir,
                RemoteCommand::new("tar").args(["zxpf", self.config.artifact_file.as_str()]),
            )
            .await?;
        Ok(())
    }

    /// `curl` fetching the asset binary into the artifact file
    pub fn download_command(&self, selected: &SelectedVersion) -> RemoteCommand {
        RemoteCommand::new("curl")
            .args(["-sSfL", "-H", "Accept: application/octet-stream", "-H"])
            .secret_arg(format!("Authorization: token {}", self.github_token))
            .arg(selected.asset_url.as_str())
            .args(["-o", self.config.artifact_file.as_str()])
    }

    /// Point `live` at `install_dir`
    pub async fn relink(&self, install_dir: &str, live_dir: &str) -> Result<()> {
        self.session
            .run_user(RemoteCommand::new("rm").args(["-Rf", live_dir]))
            .await?;
        self.session
            .run_user(RemoteCommand::new("ln").args(["-s", install_dir, live_dir]))
            .await?;
        Ok(())
    }

    /// Stop the service (standalone task)
    pub async fn stop_server(&self) -> Result<()> {
        self.controller().stop().await
    }

    /// Start the service (standalone task)
    pub async fn start_server(&self) -> Result<()> {
        self.controller().start().await
    }
}
