//! Match entity.
//!
//! A match is scheduled between two distinct teams of a tournament. Titles are
//! trimmed and must hold between 1 and [`MATCH_TITLE_MAX`] characters.

use chrono::{DateTime, Utc};

/// Maximum length of a match title, in characters.
pub const MATCH_TITLE_MAX: usize = 128;

/// Validation failures for match fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchValidationError {
    /// Title is blank after trimming.
    #[error("match title must not be empty")]
    EmptyTitle,
    /// Title exceeds the length limit.
    #[error("match title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Both sides reference the same team.
    #[error("a match needs two distinct teams")]
    SameTeams,
    /// Week number is negative.
    #[error("week must be zero or greater")]
    NegativeWeek,
}

/// Unvalidated match fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDraft {
    pub tournament_id: i32,
    pub team_a_id: i32,
    pub team_b_id: i32,
    pub title: String,
    pub week: i32,
    pub match_date: Option<DateTime<Utc>>,
}

/// Partial update of a match. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPatch {
    pub tournament_id: Option<i32>,
    pub team_a_id: Option<i32>,
    pub team_b_id: Option<i32>,
    pub title: Option<String>,
    pub week: Option<i32>,
    pub match_date: Option<DateTime<Utc>>,
}

/// Validated match fields awaiting an id from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch(MatchDraft);

impl NewMatch {
    /// Validate `draft`, trimming the title.
    ///
    /// # Examples
    /// ```
    /// use league_backend::domain::{MatchDraft, MatchValidationError, NewMatch};
    ///
    /// let draft = MatchDraft {
    ///     tournament_id: 1,
    ///     team_a_id: 4,
    ///     team_b_id: 4,
    ///     title: "Derby".to_owned(),
    ///     week: 1,
    ///     match_date: None,
    /// };
    /// assert_eq!(NewMatch::new(draft), Err(MatchValidationError::SameTeams));
    /// ```
    pub fn new(mut draft: MatchDraft) -> Result<Self, MatchValidationError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(MatchValidationError::EmptyTitle);
        }
        if title.chars().count() > MATCH_TITLE_MAX {
            return Err(MatchValidationError::TitleTooLong {
                max: MATCH_TITLE_MAX,
            });
        }
        if draft.team_a_id == draft.team_b_id {
            return Err(MatchValidationError::SameTeams);
        }
        if draft.week < 0 {
            return Err(MatchValidationError::NegativeWeek);
        }
        draft.title = title.to_owned();
        Ok(Self(draft))
    }

    /// Validated fields.
    pub fn fields(&self) -> &MatchDraft {
        &self.0
    }
}

/// A persisted match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    id: i32,
    fields: MatchDraft,
}

impl Match {
    /// Rebuild a match from stored fields.
    pub fn new(id: i32, draft: MatchDraft) -> Result<Self, MatchValidationError> {
        NewMatch::new(draft).map(|new| Self::from_new(id, new))
    }

    /// Attach the store-assigned id to validated fields.
    pub fn from_new(id: i32, new: NewMatch) -> Self {
        Self { id, fields: new.0 }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn tournament_id(&self) -> i32 {
        self.fields.tournament_id
    }

    pub fn team_a_id(&self) -> i32 {
        self.fields.team_a_id
    }

    pub fn team_b_id(&self) -> i32 {
        self.fields.team_b_id
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn week(&self) -> i32 {
        self.fields.week
    }

    pub fn match_date(&self) -> Option<DateTime<Utc>> {
        self.fields.match_date
    }

    /// Apply `patch`, re-validating the merged fields.
    pub fn with_patch(&self, patch: MatchPatch) -> Result<Self, MatchValidationError> {
        let current = self.fields.clone();
        Self::new(
            self.id,
            MatchDraft {
                tournament_id: patch.tournament_id.unwrap_or(current.tournament_id),
                team_a_id: patch.team_a_id.unwrap_or(current.team_a_id),
                team_b_id: patch.team_b_id.unwrap_or(current.team_b_id),
                title: patch.title.unwrap_or(current.title),
                week: patch.week.unwrap_or(current.week),
                match_date: patch.match_date.or(current.match_date),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    //! Validation coverage for match fields.

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn draft() -> MatchDraft {
        MatchDraft {
            tournament_id: 1,
            team_a_id: 10,
            team_b_id: 11,
            title: "  Opening Day  ".to_owned(),
            week: 0,
            match_date: None,
        }
    }

    #[rstest]
    fn title_is_trimmed(draft: MatchDraft) {
        let created = NewMatch::new(draft).expect("valid match");
        assert_eq!(created.fields().title, "Opening Day");
    }

    #[rstest]
    #[case("   ", MatchValidationError::EmptyTitle)]
    #[case(&"x".repeat(MATCH_TITLE_MAX + 1), MatchValidationError::TitleTooLong { max: MATCH_TITLE_MAX })]
    fn invalid_titles_are_rejected(
        mut draft: MatchDraft,
        #[case] title: &str,
        #[case] expected: MatchValidationError,
    ) {
        draft.title = title.to_owned();
        assert_eq!(NewMatch::new(draft), Err(expected));
    }

    #[rstest]
    fn title_at_limit_is_accepted(mut draft: MatchDraft) {
        draft.title = "é".repeat(MATCH_TITLE_MAX);
        assert!(NewMatch::new(draft).is_ok());
    }

    #[rstest]
    fn negative_week_is_rejected(mut draft: MatchDraft) {
        draft.week = -1;
        assert_eq!(NewMatch::new(draft), Err(MatchValidationError::NegativeWeek));
    }

    #[rstest]
    fn patch_revalidates_teams(draft: MatchDraft) {
        let existing = Match::new(3, draft).expect("valid match");

        let err = existing
            .with_patch(MatchPatch {
                team_b_id: Some(10),
                ..MatchPatch::default()
            })
            .expect_err("same teams");

        assert_eq!(err, MatchValidationError::SameTeams);
    }

    #[rstest]
    fn patch_keeps_untouched_fields(draft: MatchDraft) {
        let existing = Match::new(3, draft).expect("valid match");

        let patched = existing
            .with_patch(MatchPatch {
                week: Some(4),
                ..MatchPatch::default()
            })
            .expect("valid patch");

        assert_eq!(patched.id(), 3);
        assert_eq!(patched.week(), 4);
        assert_eq!(patched.title(), "Opening Day");
        assert_eq!(patched.team_a_id(), 10);
    }
}
