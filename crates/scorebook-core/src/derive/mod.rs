//! Views derived from the play log.
//!
//! Every function here is a pure fold over `&[PlayEvent]`: no game state, no
//! caches, no hidden inputs. Folding the same log twice gives the same
//! result, and a log loaded from a save slot renders exactly like the live
//! one. Players are matched by [`PlayerId`](crate::player::PlayerId), so a
//! substitute's at-bats are never credited to the player they replaced.
//!
//! # Views
//!
//! - [`fold_lineups`]: lineups with every substitution segment
//! - [`box_score`]: per-segment batting grid plus batting totals
//! - [`line_score`]: runs by inning, hits, errors, final score
//! - [`pitcher_lines`]: per-pitcher lines with estimated earned runs
//! - [`decisions`]: win, loss and save
//! - [`replay`]: play-by-play lines
//! - [`flatten_ledger`]: rows for the central ledger upload
//!
//! # Example
//!
//! ```
//! use scorebook_core::derive::line_score;
//!
//! let score = line_score(&[], 7);
//! assert_eq!(score.innings(), 7);
//! assert!(score.runs.away.iter().all(Option::is_none));
//! ```

mod box_score;
mod decision;
mod ledger;
mod line_score;
mod lineups;
mod pitching;
mod replay;

pub use box_score::{
    batting_totals, box_score, BattingTotals, BoxCell, BoxColumn, BoxRow, BoxScore, CellResult,
};
pub use decision::{decisions, Decision, DecisionOverrides, PitcherDecisions};
pub use ledger::{flatten_ledger, LedgerEntry, LedgerRow};
pub use line_score::{line_score, LineScore};
pub use lineups::{fold_lineups, pitchers_used, pitching_side};
pub use pitching::{pitcher_lines, InningsPitched, PitcherLine};
pub use replay::{replay, ReplayLine};

use crate::event::{EventKind, InningStartReason, PlayEvent};

/// The log without a half opened by the final out of a finished game.
///
/// The third out of the last inning opens the next half before the game is
/// ended, so that half carries nothing but the opening and possibly lineup
/// changes. Grids and scoreboards stop before it.
fn played(events: &[PlayEvent]) -> &[PlayEvent] {
    if !matches!(events.last().map(|e| &e.kind), Some(EventKind::GameEnd { .. })) {
        return events;
    }
    let Some(opened) = events.iter().rposition(|e| {
        matches!(
            e.kind,
            EventKind::InningStart { reason, .. } if reason != InningStartReason::FirstPitch
        )
    }) else {
        return events;
    };
    let unplayed = events[opened + 1..].iter().all(|e| {
        matches!(
            e.kind,
            EventKind::Substitution(_) | EventKind::GameEnd { .. }
        )
    });
    if unplayed {
        &events[..opened]
    } else {
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::event::{BattedBall, Contact, Destination, Pitch, RunnerAction, StrikeKind};
    use crate::lineup::{Side, SidePair};
    use crate::player::{Fielder, PitcherInfo, PlayerId, Position};
    use crate::resolver::{Mover, Overrides, RunnerAdjudicator};
    use crate::state::Base;
    use crate::tests::helpers::{start_game, strike_out, three_outs, AWAY_BASE, HOME_BASE};

    const ADJ: RunnerAdjudicator = RunnerAdjudicator::new();

    fn hit(game: &mut crate::game::Game, direction: Fielder, contact: Contact) {
        game.pitch(&ADJ, Pitch::InPlay(BattedBall::new(direction, contact)))
            .unwrap();
        game.confirm(&ADJ, &Overrides::new()).unwrap();
    }

    mod innings_pitched_tests {
        use super::*;

        #[test]
        fn displays_whole_and_thirds() {
            assert_eq!(InningsPitched(0).to_string(), "0.0");
            assert_eq!(InningsPitched(17).to_string(), "5.2");
            assert_eq!(InningsPitched(21).to_string(), "7.0");
        }
    }

    mod lineup_fold_tests {
        use super::*;

        #[test]
        fn fold_matches_live_lineups() {
            let mut game = start_game(SessionConfig::default());
            hit(&mut game, Fielder::LeftField, Contact::Single);
            game.pinch_hit(Side::Away, 1, PlayerId::new(50)).unwrap();
            game.pinch_run(Base::First, PlayerId::new(51)).unwrap();
            game.change_position(Side::Home, 3, Position::Field(Fielder::Catcher))
                .unwrap();

            let folded = fold_lineups(game.log().events());
            assert_eq!(folded.away, *game.lineup(Side::Away));
            assert_eq!(folded.home, *game.lineup(Side::Home));
        }

        #[test]
        fn pitchers_listed_in_order_of_appearance() {
            let mut game = start_game(SessionConfig::default());
            game.pitch(&ADJ, Pitch::Ball).unwrap();
            let reliever = PitcherInfo::new(PlayerId::new(HOME_BASE + 20));
            game.change_pitcher(Side::Home, reliever).unwrap();
            game.pitch(&ADJ, Pitch::Ball).unwrap();

            let used = pitchers_used(game.log().events());
            assert_eq!(used.home, vec![PlayerId::new(HOME_BASE), reliever.player]);
            assert!(used.away.is_empty());
        }
    }

    mod line_score_tests {
        use super::*;

        #[test]
        fn unplayed_halves_are_blank() {
            let mut game = start_game(SessionConfig::default());
            hit(&mut game, Fielder::LeftField, Contact::HomeRun);
            let score = line_score(game.log().events(), 7);
            assert_eq!(score.runs.away[0], Some(1));
            assert_eq!(score.runs.home[0], None);
            assert_eq!(score.hits.away, 1);
            assert_eq!(score.innings(), 7);
        }

        #[test]
        fn finished_game_has_no_column_after_final_out() {
            let mut game = start_game(SessionConfig::default());
            hit(&mut game, Fielder::LeftField, Contact::HomeRun);
            for _ in 0..14 {
                three_outs(&mut game);
            }
            assert_eq!(game.state().inning(), 8);
            game.finish().unwrap();

            let events = game.log().events();
            let score = line_score(events, 7);
            assert_eq!(score.innings(), 7);
            assert_eq!(score.runs.away[6], Some(0));
            assert_eq!(score.runs.home[6], Some(0));
            assert_eq!(score.final_score(), SidePair::new(1, 0));

            for side in Side::BOTH {
                let grid = box_score(events, side, 7);
                assert_eq!(grid.columns.last().map(|c| c.inning), Some(7));
            }
        }

        #[test]
        fn live_extra_half_keeps_its_column() {
            let mut game = start_game(SessionConfig::default());
            for _ in 0..14 {
                three_outs(&mut game);
            }
            let score = line_score(game.log().events(), 7);
            assert_eq!(score.innings(), 8);
            assert_eq!(score.runs.away[7], Some(0));
        }

        #[test]
        fn errors_charged_to_fielding_side() {
            let mut game = start_game(SessionConfig::default());
            hit(&mut game, Fielder::Shortstop, Contact::Error);
            let score = line_score(game.log().events(), 7);
            assert_eq!(score.errors.home, 1);
            assert_eq!(score.errors.away, 0);
            assert_eq!(score.hits.away, 0);
        }
    }

    mod pitching_tests {
        use super::*;

        #[test]
        fn intentional_walk_adds_no_pitches() {
            let mut game = start_game(SessionConfig::default());
            game.pitch(&ADJ, Pitch::IntentionalWalk).unwrap();
            game.pitch(&ADJ, Pitch::Ball).unwrap();
            let lines = pitcher_lines(game.log().events());
            let line = lines.home[0];
            assert_eq!(line.pitches, 1);
            assert_eq!(line.walks, 1);
            assert_eq!(line.batters_faced, 1);
        }

        #[test]
        fn reached_on_strikeout_counts_as_strikeout() {
            let mut game = start_game(SessionConfig::default());
            for _ in 0..3 {
                game.pitch(&ADJ, Pitch::SwingingStrike).unwrap();
            }
            game.confirm(
                &ADJ,
                &Overrides::new().set(Mover::Batter, Destination::Base(Base::First)),
            )
            .unwrap();
            strike_out(&mut game, StrikeKind::Called);

            let line = pitcher_lines(game.log().events()).home[0];
            assert_eq!(line.strikeouts, 2);
            assert_eq!(line.innings, InningsPitched(1));
            assert_eq!(line.pitches, 6);
        }

        #[test]
        fn runs_after_error_extended_inning_are_unearned() {
            let mut game = start_game(SessionConfig::default());
            strike_out(&mut game, StrikeKind::Swinging);
            strike_out(&mut game, StrikeKind::Swinging);
            hit(&mut game, Fielder::Shortstop, Contact::Error);
            hit(&mut game, Fielder::LeftField, Contact::HomeRun);

            let line = pitcher_lines(game.log().events()).home[0];
            assert_eq!(line.runs, 2);
            assert_eq!(line.earned_runs, 0);
        }

        #[test]
        fn wild_pitches_counted_per_runner_play() {
            let mut game = start_game(SessionConfig::default());
            game.pitch(&ADJ, Pitch::HitByPitch).unwrap();
            game.runner_action(Base::First, RunnerAction::WildPitch)
                .unwrap();
            game.runner_action(Base::Second, RunnerAction::WildPitch)
                .unwrap();
            game.runner_action(Base::Third, RunnerAction::WildPitch)
                .unwrap();

            let line = pitcher_lines(game.log().events()).home[0];
            assert_eq!(line.wild_pitches, 3);
            assert_eq!(line.runs, 1);
            assert_eq!(line.earned_runs, 1);
        }
    }

    mod decision_tests {
        use super::*;

        #[test]
        fn single_pitcher_follows_result() {
            let mut game = start_game(SessionConfig::default());
            hit(&mut game, Fielder::CenterField, Contact::HomeRun);
            three_outs(&mut game);
            three_outs(&mut game);
            game.finish().unwrap();
            let result = decisions(game.log().events(), &DecisionOverrides::default());
            assert_eq!(result.away.win, Some(PlayerId::new(AWAY_BASE)));
            assert_eq!(result.home.loss, Some(PlayerId::new(HOME_BASE)));
        }

        #[test]
        fn tie_gives_no_decision() {
            let mut game = start_game(SessionConfig::default());
            game.finish().unwrap();
            let result = decisions(game.log().events(), &DecisionOverrides::default());
            assert_eq!(result, Default::default());
        }

        #[test]
        fn starter_allowing_exactly_the_losing_total_gets_no_loss() {
            let mut game = start_game(SessionConfig::default());
            hit(&mut game, Fielder::CenterField, Contact::HomeRun);
            three_outs(&mut game);
            three_outs(&mut game);
            let reliever = PitcherInfo::new(PlayerId::new(HOME_BASE + 20));
            game.change_pitcher(Side::Home, reliever).unwrap();
            three_outs(&mut game);
            three_outs(&mut game);
            game.finish().unwrap();

            let result = decisions(game.log().events(), &DecisionOverrides::default());
            assert_eq!(result.home.loss, None);
            assert_eq!(result.home.decision_of(reliever.player), None);
            assert_eq!(result.away.win, Some(PlayerId::new(AWAY_BASE)));
        }

        #[test]
        fn overrides_replace_inferred_decisions() {
            let mut game = start_game(SessionConfig::default());
            hit(&mut game, Fielder::CenterField, Contact::HomeRun);
            three_outs(&mut game);
            three_outs(&mut game);
            three_outs(&mut game);
            let reliever = PitcherInfo::new(PlayerId::new(AWAY_BASE + 20));
            game.change_pitcher(Side::Away, reliever).unwrap();
            three_outs(&mut game);
            game.finish().unwrap();

            let inferred = decisions(game.log().events(), &DecisionOverrides::default());
            assert_eq!(inferred.away.win, None);

            let overrides = DecisionOverrides {
                win: Some(reliever.player),
                loss: None,
                save: None,
            };
            let result = decisions(game.log().events(), &overrides);
            assert_eq!(result.away.decision_of(reliever.player), Some(Decision::Win));
            assert_eq!(result.home.loss, Some(PlayerId::new(HOME_BASE)));
        }
    }

    mod replay_tests {
        use super::*;

        #[test]
        fn runner_plays_and_at_bats_interleave() {
            let mut game = start_game(SessionConfig::default());
            game.pitch(&ADJ, Pitch::HitByPitch).unwrap();
            game.runner_action(Base::First, RunnerAction::StolenBase)
                .unwrap();
            hit(&mut game, Fielder::RightField, Contact::Single);

            let lines = replay(game.log().events());
            let descriptions: Vec<_> = lines.iter().map(|l| l.description.as_str()).collect();
            assert_eq!(
                descriptions,
                ["hit by pitch", "stolen base from first base", "right field single"]
            );
            assert_eq!(lines[2].score_before.away, 0);
            assert_eq!(lines[2].side(), Side::Away);
        }
    }
}
