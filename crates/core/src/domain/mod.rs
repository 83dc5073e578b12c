mod difficulty;
mod error;
mod ids;
mod leaderboard;
mod problem;
mod run_result;
mod submission_status;
mod value;
mod verdict;

pub use difficulty::Difficulty;
pub use error::DomainError;
pub use ids::{ContestId, ProblemId, RunId, SubmissionId};
pub use leaderboard::{LeaderboardEntry, SolvedProblem, rank_contest, rank_global};
pub use problem::{FunctionTask, JudgeMode, JudgeTask, Parameter, Signature, StreamIoTask, TestCase};
pub use run_result::{RunResult, RunStatus};
pub use submission_status::SubmissionStatus;
pub use value::Value;
pub use verdict::{CaseTally, Verdict};
