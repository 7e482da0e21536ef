//! In-memory tracking of a single deploy run.

use chrono::{DateTime, Utc};
use std::fmt;
use url::Url;

/// Phase of the deploy sequence, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeployPhase {
    /// Choosing a tag and resolving its asset
    SelectVersion,
    /// Waiting for operator confirmation
    ConfirmDeploy,
    /// Handing the agent socket over and announcing the deploy
    NotifyStart,
    /// Downloading and unpacking the artifact
    Install,
    /// Stopping the running service
    StopOld,
    /// Pointing `live` at the new release
    Relink,
    /// Starting the new release
    StartNew,
    /// Announcing success
    NotifyDone,
    /// Deploy finished
    Completed,
}

impl DeployPhase {
    /// Phase that follows this one
    pub fn next(self) -> Option<Self> {
        use DeployPhase::*;
        match self {
            SelectVersion => Some(ConfirmDeploy),
            ConfirmDeploy => Some(NotifyStart),
            NotifyStart => Some(Install),
            Install => Some(StopOld),
            StopOld => Some(Relink),
            Relink => Some(StartNew),
            StartNew => Some(NotifyDone),
            NotifyDone => Some(Completed),
            Completed => None,
        }
    }

    /// Whether a failure in this phase leaves the service down
    pub fn leaves_service_down(self) -> bool {
        matches!(
            self,
            DeployPhase::StopOld | DeployPhase::Relink | DeployPhase::StartNew
        )
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployPhase::SelectVersion => "select version",
            DeployPhase::ConfirmDeploy => "confirm deploy",
            DeployPhase::NotifyStart => "notify start",
            DeployPhase::Install => "install",
            DeployPhase::StopOld => "stop old",
            DeployPhase::Relink => "relink",
            DeployPhase::StartNew => "start new",
            DeployPhase::NotifyDone => "notify done",
            DeployPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A version whose platform asset was found; the only way past selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedVersion {
    /// Chosen tag
    pub version: String,
    /// Asset API URL
    pub asset_url: Url,
}

/// Everything known about the current deploy
#[derive(Debug, Clone)]
pub struct DeployContext {
    /// Deploy user
    pub user: String,
    /// Target host
    pub host: String,
    /// Deploy user's home directory
    pub home: String,
    /// Resolved version tag
    pub version: Option<String>,
    /// Resolved asset URL
    pub asset_url: Option<Url>,
    /// Set once the new release is up
    pub success: bool,
    /// Current phase
    pub phase: DeployPhase,
    /// Phases completed so far
    pub completed: Vec<DeployPhase>,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

impl DeployContext {
    /// Fresh context for `user@host`
    pub fn new(user: impl Into<String>, host: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
            home: home.into(),
            version: None,
            asset_url: None,
            success: false,
            phase: DeployPhase::SelectVersion,
            completed: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Record the selection result
    pub fn select(&mut self, selected: &SelectedVersion) {
        self.version = Some(selected.version.clone());
        self.asset_url = Some(selected.asset_url.clone());
    }

    /// Mark the current phase complete and move to the next one
    pub fn advance(&mut self) {
        self.completed.push(self.phase);
        if let Some(next) = self.phase.next() {
            self.phase = next;
        }
        if self.phase == DeployPhase::Completed {
            self.success = true;
        }
    }

    /// `user@host`
    pub fn target(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// `<home>/releases/<version>`
    pub fn install_dir(&self, version: &str) -> String {
        format!("{}/releases/{}", self.home, version)
    }

    /// `<home>/live`
    pub fn live_dir(&self) -> String {
        format!("{}/live", self.home)
    }

    /// Time since the run started
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }

    /// One-line summary for the console
    pub fn summary(&self) -> String {
        format!(
            "{} → {} ({}, {}s)",
            self.version.as_deref().unwrap_or("<no version>"),
            self.target(),
            self.phase,
            self.elapsed().num_seconds()
        )
    }
}
