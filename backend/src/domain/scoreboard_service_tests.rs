//! Tests for the scoreboard service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockMatchRepository, MockScoreboardRepository};
use crate::domain::{ChangeOperation, Channel, ErrorCode, Match, MatchDraft};

fn some_match(id: i32) -> Match {
    Match::new(
        id,
        MatchDraft {
            tournament_id: 1,
            team_a_id: 1,
            team_b_id: 2,
            title: "League".to_owned(),
            week: 2,
            match_date: None,
        },
    )
    .expect("valid match")
}

fn board(id: i32, match_id: i32) -> Scoreboard {
    Scoreboard::new(id, ScoreboardDraft::kickoff(match_id)).expect("valid scoreboard")
}

#[rstest]
#[tokio::test]
async fn create_requires_existing_match() {
    let mut matches = MockMatchRepository::new();
    matches.expect_find_by_id().times(1).returning(|_| Ok(None));
    let mut scoreboards = MockScoreboardRepository::new();
    scoreboards.expect_insert().times(0);
    let (notifier, feed) = crate::test_support::recording_feed();
    let service = ScoreboardServiceImpl::new(Arc::new(scoreboards), Arc::new(matches), feed);

    let err = service
        .create(ScoreboardDraft::kickoff(4))
        .await
        .expect_err("missing match");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(notifier.events().is_empty());
}

#[rstest]
#[tokio::test]
async fn create_fires_insert_with_match_id() {
    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_by_id()
        .times(1)
        .returning(|id| Ok(Some(some_match(id))));
    let mut scoreboards = MockScoreboardRepository::new();
    scoreboards
        .expect_insert()
        .times(1)
        .returning(|draft| Ok(Scoreboard::new(10, draft.clone()).expect("valid")));
    let (notifier, feed) = crate::test_support::recording_feed();
    let service = ScoreboardServiceImpl::new(Arc::new(scoreboards), Arc::new(matches), feed);

    service
        .create(ScoreboardDraft::kickoff(4))
        .await
        .expect("create succeeds");

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, Channel::ScoreboardChange);
    assert_eq!(events[0].1.match_id, Some(4));
    assert_eq!(events[0].1.new_id, Some(10));
}

#[rstest]
#[tokio::test]
async fn score_update_fires_exactly_one_update() {
    let mut scoreboards = MockScoreboardRepository::new();
    scoreboards
        .expect_find_by_id()
        .times(1)
        .returning(|id| Ok(Some(board(id, 4))));
    scoreboards
        .expect_update()
        .times(1)
        .returning(|updated| Ok(Some(updated.clone())));
    let (notifier, feed) = crate::test_support::recording_feed();
    let service = ScoreboardServiceImpl::new(
        Arc::new(scoreboards),
        Arc::new(MockMatchRepository::new()),
        feed,
    );

    let updated = service
        .update(
            10,
            ScoreboardPatch {
                score_team_b: Some(7),
                ..ScoreboardPatch::default()
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.score_team_b(), 7);
    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].1.operation, ChangeOperation::Update);
    assert_eq!(events[0].1.new_id, Some(10));
}

#[rstest]
#[tokio::test]
async fn negative_score_is_invalid() {
    let mut scoreboards = MockScoreboardRepository::new();
    scoreboards
        .expect_find_by_id()
        .returning(|id| Ok(Some(board(id, 4))));
    scoreboards.expect_update().times(0);
    let (notifier, feed) = crate::test_support::recording_feed();
    let service = ScoreboardServiceImpl::new(
        Arc::new(scoreboards),
        Arc::new(MockMatchRepository::new()),
        feed,
    );

    let err = service
        .update(
            10,
            ScoreboardPatch {
                score_team_a: Some(-1),
                ..ScoreboardPatch::default()
            },
        )
        .await
        .expect_err("negative score");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(notifier.events().is_empty());
}

#[rstest]
#[tokio::test]
async fn duplicate_scoreboard_is_conflict() {
    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_by_id()
        .returning(|id| Ok(Some(some_match(id))));
    let mut scoreboards = MockScoreboardRepository::new();
    scoreboards
        .expect_insert()
        .returning(|draft| Err(ScoreboardRepositoryError::duplicate(draft.match_id)));
    let (_notifier, feed) = crate::test_support::recording_feed();
    let service = ScoreboardServiceImpl::new(Arc::new(scoreboards), Arc::new(matches), feed);

    let err = service
        .create(ScoreboardDraft::kickoff(4))
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn delete_fires_delete_without_new_id() {
    let mut scoreboards = MockScoreboardRepository::new();
    scoreboards
        .expect_delete()
        .times(1)
        .returning(|id| Ok(Some(board(id, 4))));
    let (notifier, feed) = crate::test_support::recording_feed();
    let service = ScoreboardServiceImpl::new(
        Arc::new(scoreboards),
        Arc::new(MockMatchRepository::new()),
        feed,
    );

    service.delete(10).await.expect("delete succeeds");

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].1.operation, ChangeOperation::Delete);
    assert_eq!(events[0].1.old_id, 10);
    assert!(events[0].1.new_id.is_none());
}
