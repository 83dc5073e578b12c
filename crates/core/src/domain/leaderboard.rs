use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ProblemId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "username")]
    pub user_id: String,
    pub score: i64,
}

/// A passed submission joined with the points of its problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedProblem {
    pub user_id: String,
    pub problem_id: ProblemId,
    pub points: i32,
}

/// Contest standings: every registered user appears, starting at zero, and
/// each distinct solved problem counts once. Solves by unregistered users are
/// ignored.
pub fn rank_contest(
    registered: impl IntoIterator<Item = String>,
    solved: impl IntoIterator<Item = SolvedProblem>,
) -> Vec<LeaderboardEntry> {
    let mut scores: HashMap<String, i64> = registered.into_iter().map(|u| (u, 0)).collect();

    for solve in dedup(solved) {
        if let Some(score) = scores.get_mut(&solve.user_id) {
            *score += i64::from(solve.points);
        }
    }

    sorted(scores)
}

/// Standings across all problems; anyone with a solve appears.
pub fn rank_global(solved: impl IntoIterator<Item = SolvedProblem>) -> Vec<LeaderboardEntry> {
    let mut scores: HashMap<String, i64> = HashMap::new();

    for solve in dedup(solved) {
        *scores.entry(solve.user_id).or_default() += i64::from(solve.points);
    }

    sorted(scores)
}

fn dedup(solved: impl IntoIterator<Item = SolvedProblem>) -> Vec<SolvedProblem> {
    let mut seen = HashSet::new();
    solved
        .into_iter()
        .filter(|solve| seen.insert((solve.user_id.clone(), solve.problem_id)))
        .collect()
}

fn sorted(scores: HashMap<String, i64>) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = scores
        .into_iter()
        .map(|(user_id, score)| LeaderboardEntry { user_id, score })
        .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.user_id.cmp(&b.user_id)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(user: &str, problem: u32, points: i32) -> SolvedProblem {
        SolvedProblem {
            user_id: user.to_string(),
            problem_id: ProblemId::new(problem),
            points,
        }
    }

    #[test]
    fn contest_without_registrations_is_empty() {
        let board = rank_contest(Vec::new(), vec![solve("alice", 1, 100)]);
        assert!(board.is_empty());
    }

    #[test]
    fn registered_users_without_solves_score_zero() {
        let board = rank_contest(vec!["bob".to_string(), "alice".to_string()], Vec::new());

        assert_eq!(board.len(), 2);
        assert!(board.iter().all(|entry| entry.score == 0));
        assert_eq!(board[0].user_id, "alice");
    }

    #[test]
    fn repeated_solves_count_once_and_sort_descending() {
        let registered = vec!["alice".to_string(), "bob".to_string(), "carol".to_string()];
        let solved = vec![
            solve("bob", 1, 100),
            solve("bob", 1, 100),
            solve("alice", 1, 100),
            solve("alice", 2, 50),
            solve("mallory", 2, 50),
        ];

        let board = rank_contest(registered, solved);

        assert_eq!(
            board,
            vec![
                LeaderboardEntry { user_id: "alice".to_string(), score: 150 },
                LeaderboardEntry { user_id: "bob".to_string(), score: 100 },
                LeaderboardEntry { user_id: "carol".to_string(), score: 0 },
            ]
        );
    }

    #[test]
    fn global_board_includes_every_solver() {
        let board = rank_global(vec![solve("dave", 3, 10), solve("erin", 4, 30), solve("dave", 3, 10)]);

        assert_eq!(board[0], LeaderboardEntry { user_id: "erin".to_string(), score: 30 });
        assert_eq!(board[1], LeaderboardEntry { user_id: "dave".to_string(), score: 10 });
    }

    #[test]
    fn entry_serializes_with_username_key() {
        let json = serde_json::to_string(&LeaderboardEntry { user_id: "alice".to_string(), score: 5 })
            .expect("entry should serialize");
        assert_eq!(json, r#"{"username":"alice","score":5}"#);
    }
}
