//! Tests for clock transitions and versions.

use rstest::{fixture, rstest};

use super::*;

#[fixture]
fn stopped_gameclock() -> GameClock {
    GameClock::new(1, Version::INITIAL, GameClockDraft::full(7, 720)).expect("valid clock")
}

#[fixture]
fn idle_playclock() -> PlayClock {
    PlayClock::new(
        2,
        Version::INITIAL,
        PlayClockDraft {
            match_id: 7,
            ..PlayClockDraft::default()
        },
    )
    .expect("valid clock")
}

#[rstest]
#[case(0, None)]
#[case(1, Some(1))]
#[case(2_147_483_647, Some(2_147_483_647))]
#[case(2_147_483_648, None)]
fn version_accepts_only_store_range(#[case] raw: u32, #[case] expected: Option<u32>) {
    assert_eq!(Version::new(raw).map(Version::get), expected);
}

#[rstest]
fn version_rejects_non_positive_columns() {
    assert_eq!(Version::try_from(0_i32), Err(InvalidVersion { value: 0 }));
    assert_eq!(Version::try_from(-3_i32), Err(InvalidVersion { value: -3 }));
    assert_eq!(Version::try_from(4_i32).map(Version::to_i32), Ok(4));
}

#[rstest]
fn version_deserialisation_rejects_zero() {
    assert!(serde_json::from_str::<Version>("0").is_err());
    assert_eq!(
        serde_json::from_str::<Version>("3").expect("valid version"),
        Version::INITIAL.next().next()
    );
}

#[rstest]
fn status_round_trips_through_text() {
    for status in [ClockStatus::Stopped, ClockStatus::Running, ClockStatus::Paused] {
        assert_eq!(status.as_str().parse::<ClockStatus>(), Ok(status));
    }
    assert!("frozen".parse::<ClockStatus>().is_err());
}

#[rstest]
fn start_sets_running_and_bumps_version(stopped_gameclock: GameClock) {
    let running = stopped_gameclock.start(5_000).expect("start");

    assert_eq!(running.status(), ClockStatus::Running);
    assert_eq!(running.started_at_ms(), Some(5_000));
    assert_eq!(running.version().get(), 2);
}

#[rstest]
fn start_twice_is_rejected(stopped_gameclock: GameClock) {
    let running = stopped_gameclock.start(0).expect("start");
    assert_eq!(running.start(1_000), Err(ClockError::AlreadyRunning));
}

#[rstest]
fn pause_banks_whole_elapsed_seconds(stopped_gameclock: GameClock) {
    let paused = stopped_gameclock
        .start(1_000)
        .expect("start")
        .pause(31_999)
        .expect("pause");

    assert_eq!(paused.status(), ClockStatus::Paused);
    assert_eq!(paused.gameclock(), 690);
    assert_eq!(paused.started_at_ms(), None);
    assert_eq!(paused.version().get(), 3);
}

#[rstest]
fn pause_clamps_at_zero(stopped_gameclock: GameClock) {
    let paused = stopped_gameclock
        .start(0)
        .expect("start")
        .pause(10_000_000)
        .expect("pause");

    assert_eq!(paused.gameclock(), 0);
}

#[rstest]
fn pause_requires_running(stopped_gameclock: GameClock) {
    assert_eq!(stopped_gameclock.pause(1), Err(ClockError::NotRunning));
}

#[rstest]
fn reset_restores_full_duration(stopped_gameclock: GameClock) {
    let reset = stopped_gameclock
        .start(0)
        .expect("start")
        .pause(60_000)
        .expect("pause")
        .reset();

    assert_eq!(reset.gameclock(), 720);
    assert_eq!(reset.status(), ClockStatus::Stopped);
    assert_eq!(reset.version().get(), 4);
}

#[rstest]
fn remaining_ignores_time_when_not_running(stopped_gameclock: GameClock) {
    assert_eq!(stopped_gameclock.remaining_at(999_999), 720);
}

#[rstest]
fn gameclock_patch_is_validated(stopped_gameclock: GameClock) {
    let err = stopped_gameclock
        .with_patch(
            GameClockPatch {
                gameclock: Some(721),
                ..GameClockPatch::default()
            },
            0,
        )
        .expect_err("out of range");

    assert_eq!(
        err,
        ClockError::GameClockOutOfRange {
            value: 721,
            max: 720
        }
    );
}

#[rstest]
fn patching_to_running_starts_the_run(stopped_gameclock: GameClock) {
    let running = stopped_gameclock
        .with_patch(
            GameClockPatch {
                status: Some(ClockStatus::Running),
                ..GameClockPatch::default()
            },
            1_000,
        )
        .expect("valid patch");

    assert_eq!(running.status(), ClockStatus::Running);
    assert_eq!(running.started_at_ms(), Some(1_000));
    assert_eq!(running.remaining_at(61_000), 660);
    assert_eq!(running.start(62_000), Err(ClockError::AlreadyRunning));
}

#[rstest]
fn patching_a_running_clock_keeps_its_start(stopped_gameclock: GameClock) {
    let running = stopped_gameclock.start(1_000).expect("start");

    let adjusted = running
        .with_patch(
            GameClockPatch {
                gameclock: Some(700),
                ..GameClockPatch::default()
            },
            9_000,
        )
        .expect("valid patch");

    assert_eq!(adjusted.started_at_ms(), Some(1_000));
    assert_eq!(adjusted.remaining_at(11_000), 690);
}

#[rstest]
#[case(ClockStatus::Stopped)]
#[case(ClockStatus::Paused)]
fn patching_away_from_running_clears_the_start(
    stopped_gameclock: GameClock,
    #[case] status: ClockStatus,
) {
    let running = stopped_gameclock.start(1_000).expect("start");

    let idle = running
        .with_patch(
            GameClockPatch {
                status: Some(status),
                ..GameClockPatch::default()
            },
            5_000,
        )
        .expect("valid patch");

    assert_eq!(idle.status(), status);
    assert_eq!(idle.started_at_ms(), None);
    assert_eq!(idle.remaining_at(999_000), idle.gameclock());
}

#[rstest]
fn start_time_on_an_idle_clock_is_rejected(stopped_gameclock: GameClock) {
    let err = stopped_gameclock
        .with_patch(
            GameClockPatch {
                started_at_ms: Some(1_000),
                ..GameClockPatch::default()
            },
            5_000,
        )
        .expect_err("idle clock with a start");

    assert_eq!(err, ClockError::StartWhileIdle);
}

#[rstest]
#[case(ClockStatus::Running, None, Err(ClockError::MissingStart))]
#[case(ClockStatus::Stopped, Some(5), Err(ClockError::StartWhileIdle))]
#[case(ClockStatus::Running, Some(5), Ok(()))]
#[case(ClockStatus::Paused, None, Ok(()))]
fn draft_ties_start_to_running(
    #[case] status: ClockStatus,
    #[case] started_at_ms: Option<i64>,
    #[case] expected: Result<(), ClockError>,
) {
    let draft = GameClockDraft {
        status,
        started_at_ms,
        ..GameClockDraft::full(7, 720)
    };

    assert_eq!(draft.validate(), expected);
}

#[rstest]
#[case(0)]
#[case(301)]
fn playclock_start_rejects_out_of_range(idle_playclock: PlayClock, #[case] seconds: i32) {
    assert_eq!(
        idle_playclock.start(seconds),
        Err(ClockError::PlayClockOutOfRange {
            seconds,
            max: PLAYCLOCK_MAX_SECONDS
        })
    );
}

#[rstest]
fn playclock_start_then_stop(idle_playclock: PlayClock) {
    let running = idle_playclock.start(40).expect("start");
    assert_eq!(running.playclock(), Some(40));
    assert_eq!(running.status(), ClockStatus::Running);

    let stopped = running.stop();
    assert_eq!(stopped.playclock(), None);
    assert_eq!(stopped.status(), ClockStatus::Stopped);
    assert!(stopped.version() > running.version());
}
