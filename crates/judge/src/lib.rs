pub mod broker;
pub mod compare;
pub mod config;
pub mod error;
pub mod harness;
pub mod pipeline;
pub mod sandbox;
pub mod scorer;
pub mod strategy;
pub mod workspace;

pub use broker::{BroadcastReport, LeaderboardBroker, Payload, SubscriberId, Subscription};
pub use compare::{Comparison, InputMapping, compare};
pub use config::{BrokerConfig, JudgeConfig, SandboxConfig};
pub use error::{JudgeError, Result};
pub use pipeline::{Judge, JudgeSubmission};
pub use sandbox::{DockerSandbox, Sandbox, SandboxCommand, SandboxOutput};
pub use scorer::{CaseFailure, Scorecard, parse_harness_output, score};
pub use workspace::{Workspace, WorkspaceManager};
