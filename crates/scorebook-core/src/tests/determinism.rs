//! Replay purity and count invariants.
//!
//! These tests verify that:
//! - Derived views depend on nothing but the play log
//! - A log restored from JSON derives exactly like the live one
//! - Counts stay in range for any pitch sequence
//!
//! This is critical for:
//! - Resuming a game from its save slot
//! - Re-rendering finished games from the ledger

use proptest::prelude::*;

use crate::config::SessionConfig;
use crate::derive::{
    box_score, decisions, flatten_ledger, fold_lineups, line_score, pitcher_lines, replay,
    DecisionOverrides,
};
use crate::event::{Contact, EventKind, Pitch, PlayEvent, RunnerAction, StrikeKind};
use crate::game::{Game, PitchReport};
use crate::lineup::Side;
use crate::player::{Fielder, PitcherInfo, PlayerId};
use crate::resolver::{Overrides, RunnerAdjudicator};
use crate::state::{Base, MAX_BALLS, MAX_STRIKES};

use super::helpers::{in_play, start_game, strike_out, three_outs, walk, HOME_BASE};

const ADJ: RunnerAdjudicator = RunnerAdjudicator::new();

/// A few innings with hits, walks, errors, runner plays and a pitching change.
fn scripted_game() -> Game {
    let mut game = start_game(SessionConfig::default());
    in_play(&mut game, Fielder::LeftField, Contact::Double);
    walk(&mut game);
    game.runner_action(Base::Second, RunnerAction::WildPitch)
        .unwrap();
    in_play(&mut game, Fielder::Shortstop, Contact::Error);
    in_play(&mut game, Fielder::CenterField, Contact::SacrificeFly);
    three_outs(&mut game);

    in_play(&mut game, Fielder::RightField, Contact::HomeRun);
    strike_out(&mut game, StrikeKind::Swinging);
    three_outs(&mut game);

    game.change_pitcher(Side::Home, PitcherInfo::new(PlayerId::new(HOME_BASE + 20)))
        .unwrap();
    in_play(&mut game, Fielder::ThirdBase, Contact::Triple);
    three_outs(&mut game);
    game
}

fn all_views(events: &[PlayEvent]) -> impl PartialEq + std::fmt::Debug {
    (
        fold_lineups(events),
        line_score(events, 7),
        box_score(events, Side::Away, 7),
        box_score(events, Side::Home, 7),
        pitcher_lines(events),
        decisions(events, &DecisionOverrides::default()),
        replay(events),
        flatten_ledger("g", events),
    )
}

// =============================================================================
// Replay Purity
// =============================================================================

#[test]
fn derivation_twice_is_identical() {
    let game = scripted_game();
    let events = game.log().events();
    assert_eq!(all_views(events), all_views(events));
}

#[test]
fn restored_log_derives_identically() {
    let game = scripted_game();
    let json = serde_json::to_string(&game).unwrap();
    let restored: Game = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, game);
    assert_eq!(
        all_views(restored.log().events()),
        all_views(game.log().events())
    );
}

#[test]
fn line_score_matches_state_store() {
    let game = scripted_game();
    assert_eq!(game.line_score().final_score(), game.state().final_score());
}

#[test]
fn prefix_of_log_derives_earlier_state() {
    let game = scripted_game();
    let events = game.log().events();
    let half = events.len() / 2;
    let score = line_score(&events[..half], 7);
    let next = &events[half];
    assert_eq!(
        score.runs_in_play(Side::Away),
        next.before.score.away,
        "runs folded from a prefix must match the next event's snapshot"
    );
}

// =============================================================================
// Count Invariants
// =============================================================================

fn pitch_strategy() -> impl Strategy<Value = Pitch> {
    prop_oneof![
        4 => Just(Pitch::Ball),
        2 => Just(Pitch::CalledStrike),
        2 => Just(Pitch::SwingingStrike),
        3 => Just(Pitch::Foul),
        1 => Just(Pitch::HitByPitch),
        1 => Just(Pitch::IntentionalWalk),
    ]
}

proptest! {
    /// Property: counts are in range before every terminal event, and the
    /// count resets after it.
    #[test]
    fn prop_counts_in_range_before_terminal(pitches in prop::collection::vec(pitch_strategy(), 1..200)) {
        let mut game = start_game(SessionConfig::default());
        for pitch in pitches {
            if game.state().is_finished() {
                break;
            }
            let report = game.pitch(&ADJ, pitch).unwrap();
            if matches!(report, PitchReport::AwaitingConfirmation(_)) {
                game.confirm(&ADJ, &Overrides::new()).unwrap();
            }
            prop_assert!(game.state().count().balls() <= MAX_BALLS);
            prop_assert!(game.state().count().strikes() <= MAX_STRIKES);
            prop_assert!(game.state().outs() < 3);
        }

        for event in game.log().events() {
            if let EventKind::AtBatResult(_) = event.kind {
                prop_assert!(event.before.count.balls() <= MAX_BALLS);
                prop_assert!(event.before.count.strikes() <= MAX_STRIKES);
            }
        }
    }

    /// Property: folding the log rebuilds the live lineups and score.
    #[test]
    fn prop_fold_matches_live_game(pitches in prop::collection::vec(pitch_strategy(), 1..120)) {
        let mut game = start_game(SessionConfig::default());
        for pitch in pitches {
            let report = game.pitch(&ADJ, pitch).unwrap();
            if matches!(report, PitchReport::AwaitingConfirmation(_)) {
                game.confirm(&ADJ, &Overrides::new()).unwrap();
            }
        }
        let folded = fold_lineups(game.log().events());
        prop_assert_eq!(&folded.away, game.lineup(Side::Away));
        prop_assert_eq!(&folded.home, game.lineup(Side::Home));
        prop_assert_eq!(game.line_score().final_score(), game.state().final_score());
    }
}
