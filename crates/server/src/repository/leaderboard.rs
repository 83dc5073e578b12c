//! Standings computed from registrations and passing submissions.

use anyhow::Result;
use arena_core::domain::{ContestId, LeaderboardEntry, ProblemId, rank_contest, rank_global};

use super::{ProblemRecord, Repositories, SubmissionRecord};

/// What `GET /problem/{id}/leaderboard` shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemStandings {
    Contest(Vec<LeaderboardEntry>),
    Practice(Vec<SubmissionRecord>),
}

impl Repositories {
    /// Points of distinct solved problems per user, across all problems.
    pub async fn global_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let solved = self.submissions.list_solved(None).await?;
        Ok(rank_global(solved))
    }

    /// Every registered user with the points of the contest problems they
    /// solved. No registrations means an empty board.
    pub async fn contest_leaderboard(&self, contest_id: ContestId) -> Result<Vec<LeaderboardEntry>> {
        let registered = self
            .registrations
            .list_by_contest(contest_id)
            .await?
            .into_iter()
            .map(|registration| registration.user_id);
        let solved = self.submissions.list_solved(Some(contest_id)).await?;

        Ok(rank_contest(registered, solved))
    }

    pub async fn problem_standings(&self, problem: &ProblemRecord) -> Result<ProblemStandings> {
        match problem.contest_id {
            Some(contest_id) => self
                .contest_leaderboard(contest_id)
                .await
                .map(ProblemStandings::Contest),
            None => self
                .practice_solves(problem.id)
                .await
                .map(ProblemStandings::Practice),
        }
    }

    async fn practice_solves(&self, problem_id: ProblemId) -> Result<Vec<SubmissionRecord>> {
        self.submissions.list_passed_for_problem(problem_id).await
    }
}
