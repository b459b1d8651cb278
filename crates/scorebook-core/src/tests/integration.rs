//! Whole-game scenarios driven through the public actions.

use crate::config::{SessionConfig, TieBreakRule};
use crate::derive::{BoxCell, CellResult};
use crate::event::{Contact, Destination, EventKind, Outcome, Pitch, StrikeKind};
use crate::game::{ConfirmOutcome, Game, PitchReport};
use crate::lineup::Side;
use crate::persistence::{FileSlotStore, MemorySlotStore, SaveStatus};
use crate::player::{Fielder, PitcherInfo, PlayerId};
use crate::resolver::{Mover, Overrides, RunnerAdjudicator};
use crate::session::GameSession;
use crate::state::{Base, Half};
use crate::undo::UndoOutcome;

use super::helpers::{
    in_play, nine_man_sheets, registry, setup, slot_key, start_game, start_session, strike_out,
    three_outs, walk, FailingStore, AWAY_BASE, HOME_BASE,
};

const ADJ: RunnerAdjudicator = RunnerAdjudicator::new();

fn last_at_bat(game: &Game) -> &crate::event::AtBatRecord {
    game.log()
        .events()
        .iter()
        .rev()
        .find_map(|event| event.at_bat())
        .unwrap()
}

fn result_cell(cell: &BoxCell) -> &CellResult {
    match cell {
        BoxCell::Result(result) => result,
        other => panic!("expected a result cell, got {other:?}"),
    }
}

// =============================================================================
// Runner Movement
// =============================================================================

#[test]
fn bases_loaded_walk_forces_in_one_run() {
    let mut game = start_game(SessionConfig::default());
    walk(&mut game);
    walk(&mut game);
    walk(&mut game);
    let loaded = *game.state().bases();
    assert_eq!(loaded.count(), 3);

    walk(&mut game);

    let bases = game.state().bases();
    assert_eq!(game.state().score().away, 1);
    assert_eq!(bases.get(Base::Third), loaded.get(Base::Second));
    assert_eq!(bases.get(Base::Second), loaded.get(Base::First));
    assert_eq!(bases.get(Base::First), Some(PlayerId::new(AWAY_BASE + 3)));

    let record = last_at_bat(&game);
    assert_eq!(record.outcome, Outcome::Walk);
    assert_eq!(record.rbi, 1);
    assert_eq!(record.scorers, vec![PlayerId::new(AWAY_BASE)]);
}

#[test]
fn left_field_double_puts_batter_on_second() {
    let mut game = start_game(SessionConfig::default());
    in_play(&mut game, Fielder::LeftField, Contact::Double);

    let bases = game.state().bases();
    assert_eq!(bases.get(Base::Second), Some(PlayerId::new(AWAY_BASE)));
    assert!(!bases.is_occupied(Base::First));
    assert!(!bases.is_occupied(Base::Third));
    assert_eq!(game.state().score().away, 0);

    let record = last_at_bat(&game);
    assert_eq!(record.rbi, 0);
    assert!(matches!(
        record.outcome,
        Outcome::InPlay(ball) if ball.direction == Fielder::LeftField && ball.contact == Contact::Double
    ));
    assert_eq!(record.label(), "left field double");
}

#[test]
fn escaped_strikeout_through_session_is_labelled_apart() {
    let mut session = start_session(MemorySlotStore::new());
    for _ in 0..3 {
        session.pitch(Pitch::SwingingStrike).unwrap();
    }
    let confirmed = session
        .confirm(&Overrides::new().set(Mover::Batter, Destination::Base(Base::First)))
        .unwrap();
    assert!(matches!(confirmed.value, ConfirmOutcome::Committed(_)));
    assert_eq!(confirmed.save, SaveStatus::Saved);

    let game = session.game();
    assert_eq!(game.state().outs(), 0);
    assert_eq!(game.state().bases().get(Base::First), Some(PlayerId::new(AWAY_BASE)));
    let label = last_at_bat(game).label();
    assert_ne!(label, Outcome::Strikeout(StrikeKind::Swinging).to_string());
}

#[test]
fn courtesy_runner_leaves_lineup_unchanged() {
    let mut game = start_game(SessionConfig::default());
    game.pitch(&ADJ, Pitch::HitByPitch).unwrap();
    let before = game.lineup(Side::Away).clone();

    let guest = game.registry_mut().register_guest("Courtesy", None);
    game.courtesy_run(Base::First, guest).unwrap();

    assert_eq!(game.state().bases().get(Base::First), Some(guest));
    assert_eq!(game.lineup(Side::Away), &before);

    in_play(&mut game, Fielder::CenterField, Contact::HomeRun);
    assert_eq!(last_at_bat(&game).scorers[0], guest);
    assert_eq!(game.state().score().away, 2);
}

#[test]
fn tie_break_loads_bases_in_extra_innings() {
    let config = SessionConfig::default()
        .with_regulation_innings(1)
        .with_tie_break(TieBreakRule::BasesLoaded, 2);
    let mut game = start_game(config);
    three_outs(&mut game);
    three_outs(&mut game);

    assert_eq!(game.state().inning(), 2);
    assert_eq!(game.state().half(), Half::Top);
    assert_eq!(game.state().bases().count(), 3);

    let start = game.log().events().last().unwrap();
    assert!(matches!(
        start.kind,
        EventKind::InningStart { placed, .. } if placed.count() == 3
    ));

    in_play(&mut game, Fielder::RightField, Contact::HomeRun);
    assert_eq!(game.state().score().away, 4);
    assert_eq!(game.line_score().total(Side::Away), 4);
}

// =============================================================================
// Substitutions
// =============================================================================

#[test]
fn pinch_hitter_splits_box_score_row() {
    let mut game = start_game(SessionConfig::default());
    three_outs(&mut game);
    three_outs(&mut game);

    let pinch = PlayerId::new(AWAY_BASE + 50);
    game.pinch_hit(Side::Away, 0, pinch).unwrap();

    // Two outs, four walks and a strikeout bring slot 0 back up in the 2nd.
    strike_out(&mut game, StrikeKind::Called);
    strike_out(&mut game, StrikeKind::Called);
    for _ in 0..4 {
        walk(&mut game);
    }
    assert_eq!(game.current_batter().unwrap(), (0, pinch));
    strike_out(&mut game, StrikeKind::Swinging);
    assert_eq!(game.state().half(), Half::Bottom);

    let grid = game.box_score(Side::Away);
    let rows: Vec<_> = grid.slot_rows(0).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].player, PlayerId::new(AWAY_BASE));
    assert_eq!(rows[1].player, pinch);

    let first = grid.column_index(1, 1).unwrap();
    let second = grid.column_index(2, 1).unwrap();
    let third = grid.column_index(3, 1).unwrap();

    assert!(matches!(rows[0].cells[first], BoxCell::Result(_)));
    assert_eq!(rows[1].cells[first], BoxCell::Inactive);

    assert_eq!(rows[0].cells[second], BoxCell::Inactive);
    assert_eq!(
        result_cell(&rows[1].cells[second]).label,
        "strikeout swinging"
    );

    assert_eq!(rows[0].cells[third], BoxCell::Inactive);
    assert_eq!(rows[1].cells[third], BoxCell::Empty);

    assert_eq!(rows[0].totals.strikeouts, 1);
    assert_eq!(rows[1].totals.strikeouts, 1);
}

// =============================================================================
// Pitching
// =============================================================================

#[test]
fn reliever_takes_loss_after_blowing_lead() {
    let mut game = start_game(SessionConfig::default());

    // Top 1st: the home starter allows two.
    in_play(&mut game, Fielder::LeftField, Contact::HomeRun);
    in_play(&mut game, Fielder::RightField, Contact::HomeRun);
    three_outs(&mut game);

    // Bottom 1st: home scores four.
    for _ in 0..4 {
        in_play(&mut game, Fielder::CenterField, Contact::HomeRun);
    }
    three_outs(&mut game);

    // Top 2nd: the reliever allows three.
    let reliever = PlayerId::new(HOME_BASE + 20);
    game.change_pitcher(Side::Home, PitcherInfo::new(reliever))
        .unwrap();
    for _ in 0..3 {
        in_play(&mut game, Fielder::LeftField, Contact::HomeRun);
    }
    three_outs(&mut game);
    three_outs(&mut game);

    let final_score = game.finish().unwrap();
    assert_eq!((final_score.away, final_score.home), (5, 4));

    let lines = game.pitcher_lines();
    assert_eq!(lines.home.len(), 2);
    assert_eq!(lines.home[0].runs, 2);
    assert_eq!(lines.home[1].runs, 3);

    let decisions = game.decisions();
    assert_eq!(decisions.home.loss, Some(reliever));
    assert_eq!(decisions.home.win, None);
    assert_eq!(decisions.away.win, Some(PlayerId::new(AWAY_BASE)));
    assert_eq!(decisions.away.loss, None);
}

#[test]
fn pitch_counts_skip_intentional_walks() {
    let mut game = start_game(SessionConfig::default());
    game.pitch(&ADJ, Pitch::Ball).unwrap();
    game.pitch(&ADJ, Pitch::Foul).unwrap();
    game.pitch(&ADJ, Pitch::Ball).unwrap();
    game.pitch(&ADJ, Pitch::IntentionalWalk).unwrap();
    walk(&mut game);

    let home = &game.pitcher_lines().home[0];
    assert_eq!(home.pitches, 7);
    assert_eq!(home.walks, 2);
    assert_eq!(home.batters_faced, 2);
}

// =============================================================================
// Score
// =============================================================================

#[test]
fn line_score_total_includes_handicap() {
    let sheets = nine_man_sheets();
    let mut game = Game::start(
        SessionConfig::default(),
        setup().with_handicap(3, 1),
        registry(),
        sheets,
    )
    .unwrap();
    in_play(&mut game, Fielder::RightField, Contact::HomeRun);
    three_outs(&mut game);
    three_outs(&mut game);

    let line = game.line_score();
    assert_eq!(line.runs_in_play(Side::Away), 1);
    assert_eq!(line.total(Side::Away), 4);
    assert_eq!(line.total(Side::Home), 1);
    assert_eq!(line.final_score(), game.state().final_score());

    let final_score = game.finish().unwrap();
    assert_eq!(final_score, line.final_score());
}

#[test]
fn correction_relabels_cell_but_keeps_totals() {
    let mut game = start_game(SessionConfig::default());
    in_play(&mut game, Fielder::ThirdBase, Contact::Single);
    let seq = game
        .log()
        .events()
        .iter()
        .rev()
        .find(|event| event.at_bat().is_some())
        .unwrap()
        .seq;

    let before = game.box_score(Side::Away);
    game.correct_event(seq, Some("bunt single".into()), None)
        .unwrap();
    let after = game.box_score(Side::Away);

    let column = after.column_index(1, 1).unwrap();
    assert_eq!(result_cell(&after.rows[0].cells[column]).label, "bunt single");
    assert_eq!(after.rows[0].totals, before.rows[0].totals);
    assert_eq!(after.rows[0].totals.hits, 1);
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn undo_restores_state_log_and_order() {
    let mut session = start_session(MemorySlotStore::new());
    session.pitch(Pitch::Ball).unwrap();
    let snapshot = session.game().clone();

    session
        .pitch(Pitch::InPlay(crate::event::BattedBall::new(
            Fielder::Shortstop,
            Contact::Single,
        )))
        .unwrap();
    session.confirm(&Overrides::new()).unwrap();
    assert_eq!(session.game().batting_index(Side::Away), 1);

    assert!(matches!(session.undo(), UndoOutcome::Restored { .. }));
    assert!(session.game().pending().is_some());
    assert!(matches!(session.undo(), UndoOutcome::Restored { .. }));

    let game = session.game();
    assert_eq!(game, &snapshot);
    assert_eq!(game.state().count().balls(), 1);
    assert_eq!(game.log().len(), snapshot.log().len());
    assert_eq!(game.batting_index(Side::Away), 0);
    assert!(game.state().bases().is_empty());
}

#[test]
fn full_game_survives_failing_store() {
    let mut session = start_session(FailingStore);
    for inning in 0..7 {
        for _ in 0..2 {
            for _ in 0..3 {
                for _ in 0..3 {
                    let report = session.pitch(Pitch::CalledStrike).unwrap();
                    assert!(matches!(report.save, SaveStatus::Failed(_)));
                }
                session.confirm(&Overrides::new()).unwrap();
            }
        }
        assert_eq!(session.game().state().inning(), inning + 2);
    }
    let finished = session.finish_game().unwrap();
    assert!(matches!(finished.save, SaveStatus::Failed(_)));
    assert_eq!((finished.value.away, finished.value.home), (0, 0));

    let lines = session.game().pitcher_lines();
    assert_eq!(lines.home[0].strikeouts, 21);
    assert_eq!(lines.home[0].innings.to_string(), "7.0");
    assert!(session.game().state().is_finished());
}

#[test]
fn reload_from_file_store_derives_identically() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = start_session(FileSlotStore::new(dir.path()));
    session.pitch(Pitch::HitByPitch).unwrap();
    let report = session
        .pitch(Pitch::InPlay(crate::event::BattedBall::new(
            Fielder::RightField,
            Contact::Triple,
        )))
        .unwrap();
    assert!(matches!(report.value, PitchReport::AwaitingConfirmation(_)));
    let confirmed = session.confirm(&Overrides::new()).unwrap();
    assert_eq!(confirmed.save, SaveStatus::Saved);

    let reloaded = GameSession::load(FileSlotStore::new(dir.path()), slot_key(1))
        .unwrap()
        .unwrap();
    let (live, restored) = (session.game(), reloaded.game());
    assert_eq!(restored, live);
    assert_eq!(restored.line_score(), live.line_score());
    assert_eq!(restored.box_score(Side::Away), live.box_score(Side::Away));
    assert_eq!(restored.pitcher_lines(), live.pitcher_lines());
    assert_eq!(restored.replay(), live.replay());
    assert_eq!(reloaded.undo_depth(), 0);

    assert!(GameSession::load(FileSlotStore::new(dir.path()), slot_key(2))
        .unwrap()
        .is_none());
}
