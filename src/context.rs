//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::github::LiveGitHub;
use crate::adapters::live::id_gen::LiveIdGenerator;
use crate::adapters::live::todoist::LiveTodoist;
use crate::adapters::live::ApiEndpoints;
use crate::adapters::recording::{RecordingGitHub, RecordingIdGenerator, RecordingTodoist};
use crate::adapters::replaying::{ReplayingGitHub, ReplayingIdGenerator, ReplayingTodoist};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::credentials::Credentials;
use crate::error::GhtError;
use crate::ports::{
    CommitReceipt, IdGenerator, IssueRecord, IssueSource, StateSnapshot, SyncCommand,
    TaskBackend, TaskItem,
};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Issue tracker queried for assigned issues.
    pub github: Box<dyn IssueSource>,
    /// Task backend holding managed tasks.
    pub todoist: Box<dyn TaskBackend>,
    /// Temp-id generator for command batches.
    pub id_gen: Box<dyn IdGenerator>,
}

impl ServiceContext {
    /// Creates a context talking to the real APIs.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn live(credentials: &Credentials, endpoints: &ApiEndpoints) -> Result<Self, GhtError> {
        Ok(Self {
            github: Box::new(LiveGitHub::new(&credentials.github_token, &endpoints.github)?),
            todoist: Box::new(LiveTodoist::new(&credentials.todoist_token, &endpoints.todoist)?),
            id_gen: Box::new(LiveIdGenerator),
        })
    }

    /// Creates a live context whose every call is captured by `session`.
    ///
    /// The context must be dropped before [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn recording(
        credentials: &Credentials,
        endpoints: &ApiEndpoints,
        session: &RecordingSession,
    ) -> Result<Self, GhtError> {
        let live = Self::live(credentials, endpoints)?;
        Ok(Self {
            github: Box::new(RecordingGitHub::new(live.github, session.github.clone())),
            todoist: Box::new(RecordingTodoist::new(live.todoist, session.todoist.clone())),
            id_gen: Box::new(RecordingIdGenerator::new(live.id_gen, session.id_gen.clone())),
        })
    }

    /// Creates a replaying context from a single cassette file holding
    /// every port's interactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, GhtError> {
        let cassette = Cassette::load(path)?;
        Ok(Self {
            github: Box::new(ReplayingGitHub::new(CassetteReplayer::for_port(
                &cassette,
                Some("github"),
            ))),
            todoist: Box::new(ReplayingTodoist::new(CassetteReplayer::for_port(
                &cassette,
                Some("todoist"),
            ))),
            id_gen: Box::new(ReplayingIdGenerator::new(CassetteReplayer::for_port(
                &cassette,
                Some("id_gen"),
            ))),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette panic with a clear message
    /// when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, GhtError> {
        let replayers = config.load_all()?;
        Ok(Self {
            github: match replayers.github {
                Some(r) => Box::new(ReplayingGitHub::new(r)),
                None => Box::new(PanickingGitHub),
            },
            todoist: match replayers.todoist {
                Some(r) => Box::new(ReplayingTodoist::new(r)),
                None => Box::new(PanickingTodoist),
            },
            id_gen: match replayers.id_gen {
                Some(r) => Box::new(ReplayingIdGenerator::new(r)),
                None => Box::new(PanickingIdGenerator),
            },
        })
    }
}

// --- Panicking adapters for unconfigured ports ---

struct PanickingGitHub;
impl IssueSource for PanickingGitHub {
    fn current_login(&self) -> Result<String, GhtError> {
        panic!("github port not configured in CassetteConfig");
    }
    fn search_assigned_open(&self, _login: &str) -> Result<Vec<IssueRecord>, GhtError> {
        panic!("github port not configured in CassetteConfig");
    }
}

struct PanickingTodoist;
impl TaskBackend for PanickingTodoist {
    fn sync_state(&self) -> Result<StateSnapshot, GhtError> {
        panic!("todoist port not configured in CassetteConfig");
    }
    fn fetch_task(&self, _id: &str) -> Result<Option<TaskItem>, GhtError> {
        panic!("todoist port not configured in CassetteConfig");
    }
    fn commit(&self, _commands: &[SyncCommand]) -> Result<CommitReceipt, GhtError> {
        panic!("todoist port not configured in CassetteConfig");
    }
}

struct PanickingIdGenerator;
impl IdGenerator for PanickingIdGenerator {
    fn generate_id(&self) -> String {
        panic!("id_gen port not configured in CassetteConfig");
    }
}
