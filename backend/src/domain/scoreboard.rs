//! Live scoreboard for a match.

/// Validation failures for scoreboard fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreboardValidationError {
    /// A team score dropped below zero.
    #[error("scores must be zero or greater")]
    NegativeScore,
    /// Periods are numbered from one.
    #[error("period must be at least 1")]
    InvalidPeriod,
}

/// Unvalidated scoreboard fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardDraft {
    pub match_id: i32,
    pub score_team_a: i32,
    pub score_team_b: i32,
    pub period: i32,
    pub is_flag: bool,
}

impl ScoreboardDraft {
    /// Fresh scoreboard for `match_id`: nil-nil in the first period.
    pub fn kickoff(match_id: i32) -> Self {
        Self {
            match_id,
            score_team_a: 0,
            score_team_b: 0,
            period: 1,
            is_flag: false,
        }
    }

    /// Check field invariants.
    pub fn validate(&self) -> Result<(), ScoreboardValidationError> {
        if self.score_team_a < 0 || self.score_team_b < 0 {
            return Err(ScoreboardValidationError::NegativeScore);
        }
        if self.period < 1 {
            return Err(ScoreboardValidationError::InvalidPeriod);
        }
        Ok(())
    }
}

/// Partial update of a scoreboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreboardPatch {
    pub score_team_a: Option<i32>,
    pub score_team_b: Option<i32>,
    pub period: Option<i32>,
    pub is_flag: Option<bool>,
}

/// A persisted scoreboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    id: i32,
    fields: ScoreboardDraft,
}

impl Scoreboard {
    /// Build a scoreboard from validated fields.
    ///
    /// # Examples
    /// ```
    /// use league_backend::domain::{Scoreboard, ScoreboardDraft, ScoreboardPatch};
    ///
    /// let board = Scoreboard::new(1, ScoreboardDraft::kickoff(7)).expect("valid board");
    /// let scored = board
    ///     .with_patch(ScoreboardPatch { score_team_a: Some(3), ..ScoreboardPatch::default() })
    ///     .expect("valid patch");
    /// assert_eq!(scored.score_team_a(), 3);
    /// ```
    pub fn new(id: i32, draft: ScoreboardDraft) -> Result<Self, ScoreboardValidationError> {
        draft.validate()?;
        Ok(Self { id, fields: draft })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn match_id(&self) -> i32 {
        self.fields.match_id
    }

    pub fn score_team_a(&self) -> i32 {
        self.fields.score_team_a
    }

    pub fn score_team_b(&self) -> i32 {
        self.fields.score_team_b
    }

    pub fn period(&self) -> i32 {
        self.fields.period
    }

    pub fn is_flag(&self) -> bool {
        self.fields.is_flag
    }

    /// Apply `patch`; the owning match never changes.
    pub fn with_patch(&self, patch: ScoreboardPatch) -> Result<Self, ScoreboardValidationError> {
        let current = &self.fields;
        Self::new(
            self.id,
            ScoreboardDraft {
                match_id: current.match_id,
                score_team_a: patch.score_team_a.unwrap_or(current.score_team_a),
                score_team_b: patch.score_team_b.unwrap_or(current.score_team_b),
                period: patch.period.unwrap_or(current.period),
                is_flag: patch.is_flag.unwrap_or(current.is_flag),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(-1, 0, 1, ScoreboardValidationError::NegativeScore)]
    #[case(0, -2, 1, ScoreboardValidationError::NegativeScore)]
    #[case(0, 0, 0, ScoreboardValidationError::InvalidPeriod)]
    fn invalid_fields_are_rejected(
        #[case] score_team_a: i32,
        #[case] score_team_b: i32,
        #[case] period: i32,
        #[case] expected: ScoreboardValidationError,
    ) {
        let draft = ScoreboardDraft {
            match_id: 1,
            score_team_a,
            score_team_b,
            period,
            is_flag: false,
        };
        assert_eq!(Scoreboard::new(1, draft), Err(expected));
    }

    #[rstest]
    fn patch_preserves_match() {
        let board = Scoreboard::new(2, ScoreboardDraft::kickoff(9)).expect("valid board");
        let patched = board
            .with_patch(ScoreboardPatch {
                period: Some(2),
                is_flag: Some(true),
                ..ScoreboardPatch::default()
            })
            .expect("valid patch");

        assert_eq!(patched.match_id(), 9);
        assert_eq!(patched.period(), 2);
        assert!(patched.is_flag());
    }
}
