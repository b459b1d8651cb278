//! A game in progress.
//!
//! [`Game`] bundles everything one open slot needs: the pre-game setup, the
//! state store, the play log, both lineups and batting indices, the pitchers
//! of record, the player registry, the at-bat in progress, and any play
//! awaiting runner confirmation. It is plain data, so a clone is a complete
//! snapshot for undo and a serialized copy is the persisted progress blob.
//!
//! Every action follows the same order:
//! 1. Validate against the current state (nothing has changed yet)
//! 2. Record the event, capturing the situation before the play
//! 3. Commit the effect through the state store
//! 4. Open the next half-inning if the play ended this one
//!
//! Actions that fail part-way are rolled back by the caller
//! ([`crate::session::GameSession`]) restoring its pre-action clone.
//!
//! # Example
//!
//! ```
//! use scorebook_core::config::SessionConfig;
//! use scorebook_core::event::Pitch;
//! use scorebook_core::game::{Game, GameSetup, PitchReport, TeamSheet};
//! use scorebook_core::lineup::{Lineup, LineupSlot, SidePair};
//! use scorebook_core::player::{Fielder, PlayerId, PlayerRegistry, Position};
//! use scorebook_core::resolver::RunnerAdjudicator;
//!
//! let sheet = |base: u64| {
//!     let slots = Fielder::ALL
//!         .iter()
//!         .enumerate()
//!         .map(|(i, f)| LineupSlot::new(PlayerId::new(base + i as u64), Position::Field(*f)))
//!         .collect();
//!     TeamSheet::new(Lineup::new(slots))
//! };
//!
//! let mut game = Game::start(
//!     SessionConfig::default(),
//!     GameSetup::new("2026-05-03", "Hawks", "Owls", true),
//!     PlayerRegistry::new(),
//!     SidePair::new(sheet(1), sheet(101)),
//! )
//! .unwrap();
//!
//! let report = game.pitch(&RunnerAdjudicator::new(), Pitch::Ball).unwrap();
//! assert!(matches!(report, PitchReport::Count(c) if c.balls() == 1));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::derive::{
    self, BoxScore, DecisionOverrides, LedgerRow, LineScore, PitcherDecisions, PitcherLine,
    ReplayLine,
};
use crate::error::{InvariantViolation, ScoreResult, ValidationError};
use crate::event::{
    AtBatRecord, Contact, Destination, EventKind, InningStartReason, Outcome, Pitch,
    RunnerAction, RunnerRecord, SubstitutionKind, SubstitutionRecord,
};
use crate::lineup::{Lineup, Side, SidePair};
use crate::player::{Fielder, PitcherInfo, PlayerId, PlayerRegistry, Position};
use crate::recorder::PlayLog;
use crate::resolver::{
    advance_runner, Adjudication, AtBatResolver, Overrides, PitchEffect, Proposal,
    RunnerAdjudicator,
};
use crate::state::{Base, Bases, Count, GameState, HalfInning, ResolvedPlay};

// =============================================================================
// Setup
// =============================================================================

/// Pre-game information entered by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    /// Game date as entered (e.g. `2026-05-03`).
    pub date: String,
    /// Scoring club's team name.
    pub my_team: String,
    /// Opponent's team name.
    pub opponent: String,
    /// The scoring club bats first (is the away side).
    pub batting_first: bool,
    /// Handicap runs for the scoring club.
    pub handicap_mine: u32,
    /// Handicap runs for the opponent.
    pub handicap_opponent: u32,
}

impl GameSetup {
    /// Setup without handicaps.
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        my_team: impl Into<String>,
        opponent: impl Into<String>,
        batting_first: bool,
    ) -> Self {
        Self {
            date: date.into(),
            my_team: my_team.into(),
            opponent: opponent.into(),
            batting_first,
            handicap_mine: 0,
            handicap_opponent: 0,
        }
    }

    /// Sets handicap runs.
    #[must_use]
    pub fn with_handicap(mut self, mine: u32, opponent: u32) -> Self {
        self.handicap_mine = mine;
        self.handicap_opponent = opponent;
        self
    }

    /// The side the scoring club plays as.
    #[must_use]
    pub const fn my_side(&self) -> Side {
        if self.batting_first {
            Side::Away
        } else {
            Side::Home
        }
    }

    /// Handicaps by side.
    #[must_use]
    pub fn handicap(&self) -> SidePair<u32> {
        let mut pair = SidePair::default();
        *pair.get_mut(self.my_side()) = self.handicap_mine;
        *pair.get_mut(self.my_side().opponent()) = self.handicap_opponent;
        pair
    }

    /// Team name for a side.
    #[must_use]
    pub fn team_name(&self, side: Side) -> &str {
        if side == self.my_side() {
            &self.my_team
        } else {
            &self.opponent
        }
    }
}

/// A side's starting lineup and pitcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSheet {
    /// Starting batting order.
    pub lineup: Lineup,
    /// Starting pitcher; when absent, the lineup's pitcher is used with
    /// default hand and delivery.
    pub pitcher: Option<PitcherInfo>,
}

impl TeamSheet {
    /// A sheet whose pitcher is taken from the lineup.
    #[must_use]
    pub const fn new(lineup: Lineup) -> Self {
        Self {
            lineup,
            pitcher: None,
        }
    }

    /// Names the starting pitcher explicitly.
    #[must_use]
    pub const fn with_pitcher(mut self, pitcher: PitcherInfo) -> Self {
        self.pitcher = Some(pitcher);
        self
    }

    fn starting_pitcher(&self) -> Option<PitcherInfo> {
        self.pitcher
            .or_else(|| self.lineup.fielder(Fielder::Pitcher).map(PitcherInfo::new))
    }
}

// =============================================================================
// Reports
// =============================================================================

/// A committed at-bat or runner play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayCommitted {
    /// Sequence number of the recorded event.
    pub seq: u64,
    /// The half-inning that started if the play ended the previous one.
    pub half_change: Option<HalfInning>,
}

/// What a pitch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PitchReport {
    /// The at-bat continues.
    Count(Count),
    /// The at-bat ended; runner movement awaits confirmation.
    AwaitingConfirmation(Proposal),
    /// The at-bat ended and was committed without confirmation.
    Committed(PlayCommitted),
}

/// Result of a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The pending play was committed.
    Committed(PlayCommitted),
    /// No play was pending; nothing changed.
    NothingPending,
}

// =============================================================================
// Game
// =============================================================================

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    setup: GameSetup,
    config: SessionConfig,
    state: GameState,
    log: PlayLog,
    lineups: SidePair<Lineup>,
    batting_index: SidePair<usize>,
    pitchers: SidePair<PitcherInfo>,
    registry: PlayerRegistry,
    at_bat: AtBatResolver,
    pending: Option<Proposal>,
    decisions: DecisionOverrides,
}

impl Game {
    /// Starts a game: records the starting lineups and opens the top of the
    /// first.
    ///
    /// # Errors
    ///
    /// Fails if a lineup is empty or a side has no pitcher.
    pub fn start(
        config: SessionConfig,
        setup: GameSetup,
        registry: PlayerRegistry,
        sheets: SidePair<TeamSheet>,
    ) -> ScoreResult<Self> {
        for side in Side::BOTH {
            if sheets.get(side).lineup.is_empty() {
                return Err(ValidationError::EmptyLineup(side.name()).into());
            }
        }
        let pitchers = SidePair::new(
            sheets.away.starting_pitcher().ok_or(ValidationError::NoPitcher)?,
            sheets.home.starting_pitcher().ok_or(ValidationError::NoPitcher)?,
        );
        let lineups = sheets.map(|sheet| sheet.lineup);
        let handicap = setup.handicap();

        let mut game = Self {
            state: GameState::with_handicap(handicap),
            log: PlayLog::new(),
            lineups,
            batting_index: SidePair::default(),
            pitchers,
            registry,
            at_bat: AtBatResolver::new(),
            pending: None,
            decisions: DecisionOverrides::default(),
            setup,
            config,
        };
        game.log.record(
            &game.state,
            None,
            EventKind::GameStart {
                lineups: game.lineups.clone(),
                pitchers,
                handicap,
            },
        );
        game.open_half_inning(InningStartReason::FirstPitch)?;
        info!(
            date = %game.setup.date,
            my_team = %game.setup.my_team,
            opponent = %game.setup.opponent,
            "game started"
        );
        Ok(game)
    }

    // ----- Accessors -----

    /// Pre-game setup.
    #[must_use]
    pub const fn setup(&self) -> &GameSetup {
        &self.setup
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The play log.
    #[must_use]
    pub const fn log(&self) -> &PlayLog {
        &self.log
    }

    /// Current lineup for a side.
    #[must_use]
    pub const fn lineup(&self, side: Side) -> &Lineup {
        self.lineups.get(side)
    }

    /// Slot due up next for a side.
    #[must_use]
    pub const fn batting_index(&self, side: Side) -> usize {
        *self.batting_index.get(side)
    }

    /// Pitcher of record for a side.
    #[must_use]
    pub const fn pitcher(&self, side: Side) -> PitcherInfo {
        *self.pitchers.get(side)
    }

    /// Player registry.
    #[must_use]
    pub const fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Player registry, for adding players mid-game.
    pub fn registry_mut(&mut self) -> &mut PlayerRegistry {
        &mut self.registry
    }

    /// Pitches of the at-bat in progress.
    #[must_use]
    pub fn pitches_in_at_bat(&self) -> &[Pitch] {
        self.at_bat.pitches()
    }

    /// The play awaiting runner confirmation, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&Proposal> {
        self.pending.as_ref()
    }

    /// Operator pitcher-decision overrides.
    #[must_use]
    pub const fn decision_overrides(&self) -> &DecisionOverrides {
        &self.decisions
    }

    /// The batting slot and player at the plate.
    ///
    /// # Errors
    ///
    /// Fails if the batting index points outside the lineup.
    pub fn current_batter(&self) -> ScoreResult<(usize, PlayerId)> {
        let side = self.state.batting_side();
        let lineup = self.lineups.get(side);
        let slot = self.batting_index(side);
        let batter = lineup.due_up(slot).ok_or(ValidationError::SlotOutOfRange {
            slot,
            len: lineup.len(),
        })?;
        Ok((slot, batter))
    }

    /// The pitcher currently on the mound.
    #[must_use]
    pub const fn current_pitcher(&self) -> PlayerId {
        self.pitchers.get(self.state.batting_side().opponent()).player
    }

    /// Starting lineups as recorded at game start.
    #[must_use]
    pub fn starting_lineups(&self) -> SidePair<Lineup> {
        self.log
            .events()
            .iter()
            .find_map(|event| match &event.kind {
                EventKind::GameStart { lineups, .. } => Some(lineups.clone()),
                _ => None,
            })
            .unwrap_or_else(|| self.lineups.clone())
    }

    // ----- Pitches and at-bats -----

    /// Applies one pitch signal.
    ///
    /// Non-terminal pitches update the count at once. A terminal pitch
    /// produces a runner proposal; dead-ball awards are committed directly
    /// when the configuration allows.
    ///
    /// # Errors
    ///
    /// Fails if the game is finished or a play awaits confirmation.
    pub fn pitch(&mut self, adjudicator: &RunnerAdjudicator, pitch: Pitch) -> ScoreResult<PitchReport> {
        self.ensure_can_play()?;
        let (slot, batter) = self.current_batter()?;
        let pitcher = self.current_pitcher();
        self.log.record(
            &self.state,
            Some(slot),
            EventKind::Pitch {
                batter,
                pitcher,
                pitch,
            },
        );

        match self.at_bat.apply(self.state.count(), pitch)? {
            PitchEffect::Count(count) => {
                self.state.set_count(count)?;
                Ok(PitchReport::Count(count))
            }
            PitchEffect::Terminal(outcome) => {
                let proposal = adjudicator.predict(outcome, batter, self.state.bases());
                if outcome.is_dead_ball() && self.config.auto_confirm_dead_ball {
                    let adjudication =
                        adjudicator.adjudicate(&proposal, &Overrides::new(), self.state.outs())?;
                    return self.commit_at_bat(adjudication).map(PitchReport::Committed);
                }
                self.pending = Some(proposal.clone());
                Ok(PitchReport::AwaitingConfirmation(proposal))
            }
        }
    }

    /// Confirms the pending play with operator overrides.
    ///
    /// Confirming twice is harmless: the second call reports
    /// [`ConfirmOutcome::NothingPending`].
    ///
    /// # Errors
    ///
    /// Fails if the confirmed runner map is inconsistent.
    pub fn confirm(
        &mut self,
        adjudicator: &RunnerAdjudicator,
        overrides: &Overrides,
    ) -> ScoreResult<ConfirmOutcome> {
        let Some(proposal) = self.pending.as_ref() else {
            return Ok(ConfirmOutcome::NothingPending);
        };
        let adjudication = adjudicator.adjudicate(proposal, overrides, self.state.outs())?;
        self.commit_at_bat(adjudication)
            .map(ConfirmOutcome::Committed)
    }

    /// Skips the batter due up (absent or injured) without recording an out.
    ///
    /// # Errors
    ///
    /// Fails if the game is finished or a play awaits confirmation.
    pub fn skip_batter(&mut self) -> ScoreResult<PlayCommitted> {
        self.ensure_can_play()?;
        self.at_bat.end_without_pitch(Outcome::Skipped);
        self.commit_at_bat(Adjudication {
            outcome: Outcome::Skipped,
            movements: Vec::new(),
            bases: *self.state.bases(),
            scorers: Vec::new(),
            outs: 0,
            rbi: 0,
            double_play: false,
        })
    }

    fn commit_at_bat(&mut self, adjudication: Adjudication) -> ScoreResult<PlayCommitted> {
        let side = self.state.batting_side();
        let (slot, batter) = self.current_batter()?;
        let pitcher = self.current_pitcher();
        let error_by = match adjudication.outcome {
            Outcome::InPlay(ball) if ball.contact == Contact::Error => {
                self.lineups.get(side.opponent()).fielder(ball.direction)
            }
            _ => None,
        };
        let runs = u32::try_from(adjudication.scorers.len()).unwrap_or(u32::MAX);

        let record = AtBatRecord {
            batter,
            slot,
            slot_at_bat: self.lineups.get(side).appearances(slot),
            cycle: self.cycle_for(slot),
            outcome: adjudication.outcome,
            double_play: adjudication.double_play,
            pitches: self.at_bat.reset(),
            scorers: adjudication.scorers,
            rbi: adjudication.rbi,
            outs_recorded: adjudication.outs,
            error_by,
            pitcher,
            label_override: None,
        };
        let label = record.label();
        let rbi = record.rbi;
        let seq = self
            .log
            .record(&self.state, Some(slot), EventKind::AtBatResult(record));

        let half_change = self.state.apply_resolved_play(&ResolvedPlay::at_bat(
            adjudication.bases,
            runs,
            adjudication.outs,
        ))?;
        let lineup = self.lineups.get_mut(side);
        lineup.record_appearance(slot);
        *self.batting_index.get_mut(side) = (slot + 1) % lineup.len();
        self.pending = None;
        info!(seq, %side, slot, %label, runs, rbi, outs = adjudication.outs, "at-bat committed");

        if half_change.is_some() {
            self.open_half_inning(InningStartReason::ThreeOuts)?;
        }
        Ok(PlayCommitted { seq, half_change })
    }

    /// Times `slot` has already batted in the current half-inning, plus one.
    fn cycle_for(&self, slot: usize) -> u32 {
        let (inning, half) = (self.state.inning(), self.state.half());
        let earlier = self
            .log
            .events()
            .iter()
            .filter(|event| event.inning == inning && event.half == half)
            .filter_map(|event| event.at_bat())
            .filter(|record| record.slot == slot)
            .count();
        u32::try_from(earlier).unwrap_or(u32::MAX).saturating_add(1)
    }

    // ----- Runner plays -----

    /// Records a runner play between pitches.
    ///
    /// # Errors
    ///
    /// Fails if the base is empty, the next base is occupied, the game is
    /// finished or a play awaits confirmation.
    pub fn runner_action(&mut self, base: Base, action: RunnerAction) -> ScoreResult<PlayCommitted> {
        self.ensure_can_play()?;
        let (bases, destination) = advance_runner(self.state.bases(), base, action)?;
        let runner = self
            .state
            .bases()
            .get(base)
            .ok_or(ValidationError::NoRunnerOnBase(base))?;
        let (slot, _) = self.current_batter()?;
        let record = RunnerRecord {
            runner,
            from: base,
            action,
            destination,
            pitcher: self.current_pitcher(),
        };
        let seq = self
            .log
            .record(&self.state, Some(slot), EventKind::RunnerEvent(record));

        let runs = u32::from(destination == Destination::Home);
        let outs = u8::from(destination == Destination::Out);
        let half_change = self
            .state
            .apply_resolved_play(&ResolvedPlay::between_pitches(bases, runs, outs))?;
        info!(seq, %base, %action, "runner play committed");

        if half_change.is_some() {
            // The batter at the plate leads off next time.
            self.at_bat.reset();
            self.open_half_inning(InningStartReason::ThreeOuts)?;
        }
        Ok(PlayCommitted { seq, half_change })
    }

    // ----- Substitutions -----

    /// A pinch hitter takes over `slot` from its next at-bat.
    ///
    /// # Errors
    ///
    /// Fails if the slot does not exist, the game is finished or a play
    /// awaits confirmation.
    pub fn pinch_hit(&mut self, side: Side, slot: usize, player: PlayerId) -> ScoreResult<u64> {
        let effective_from = self.substitute_in_slot(side, slot, player, Position::PinchHitter)?;
        Ok(self.record_substitution(
            side,
            SubstitutionKind::PinchHitter {
                slot,
                player,
                effective_from,
            },
        ))
    }

    /// A defensive substitute takes over `slot` and a position.
    ///
    /// # Errors
    ///
    /// Fails if the slot does not exist, the game is finished or a play
    /// awaits confirmation.
    pub fn substitute_defense(
        &mut self,
        side: Side,
        slot: usize,
        player: PlayerId,
        position: Position,
    ) -> ScoreResult<u64> {
        let effective_from = self.substitute_in_slot(side, slot, player, position)?;
        Ok(self.record_substitution(
            side,
            SubstitutionKind::Defensive {
                slot,
                player,
                position,
                effective_from,
            },
        ))
    }

    /// Moves the current occupant of `slot` to another position.
    ///
    /// # Errors
    ///
    /// Fails if the slot does not exist or the game is finished.
    pub fn change_position(&mut self, side: Side, slot: usize, position: Position) -> ScoreResult<u64> {
        self.ensure_not_finished()?;
        let lineup = self.lineups.get_mut(side);
        let len = lineup.len();
        lineup
            .slot_mut(slot)
            .ok_or(ValidationError::SlotOutOfRange { slot, len })?
            .set_current_position(position);
        Ok(self.record_substitution(side, SubstitutionKind::PositionChange { slot, position }))
    }

    /// A pinch runner replaces the runner on `base` for the rest of the game.
    ///
    /// # Errors
    ///
    /// Fails if the base is empty, the runner is not in the batting order,
    /// the game is finished or a play awaits confirmation.
    pub fn pinch_run(&mut self, base: Base, player: PlayerId) -> ScoreResult<u64> {
        self.ensure_can_play()?;
        let side = self.state.batting_side();
        let runner = self
            .state
            .bases()
            .get(base)
            .ok_or(ValidationError::NoRunnerOnBase(base))?;
        let slot = self
            .lineups
            .get(side)
            .slot_of(runner)
            .ok_or(ValidationError::RunnerNotInLineup(base))?;
        let effective_from = self.substitute_in_slot(side, slot, player, Position::PinchRunner)?;
        let seq = self.record_substitution(
            side,
            SubstitutionKind::PinchRunner {
                slot,
                base,
                player,
                effective_from,
            },
        );
        self.replace_runner(base, player)?;
        Ok(seq)
    }

    /// A temporary courtesy runner stands in on `base`; the lineup is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Fails if the base is empty, the game is finished or a play awaits
    /// confirmation.
    pub fn courtesy_run(&mut self, base: Base, player: PlayerId) -> ScoreResult<u64> {
        self.ensure_can_play()?;
        let side = self.state.batting_side();
        let replaced = self
            .state
            .bases()
            .get(base)
            .ok_or(ValidationError::NoRunnerOnBase(base))?;
        let seq = self.record_substitution(
            side,
            SubstitutionKind::CourtesyRunner {
                base,
                replaced,
                player,
            },
        );
        self.replace_runner(base, player)?;
        Ok(seq)
    }

    /// Changes a side's pitcher of record.
    ///
    /// # Errors
    ///
    /// Fails if the game is finished or a play awaits confirmation.
    pub fn change_pitcher(&mut self, side: Side, pitcher: PitcherInfo) -> ScoreResult<u64> {
        self.ensure_can_play()?;
        let replaced = self.pitchers.get(side).player;
        *self.pitchers.get_mut(side) = pitcher;
        Ok(self.record_substitution(side, SubstitutionKind::PitcherChange { replaced, pitcher }))
    }

    fn substitute_in_slot(
        &mut self,
        side: Side,
        slot: usize,
        player: PlayerId,
        position: Position,
    ) -> ScoreResult<u32> {
        self.ensure_can_play()?;
        let lineup = self.lineups.get_mut(side);
        let len = lineup.len();
        let effective_from = lineup.appearances(slot);
        lineup
            .slot_mut(slot)
            .ok_or(ValidationError::SlotOutOfRange { slot, len })?
            .substitute(player, position, effective_from);
        Ok(effective_from)
    }

    fn record_substitution(&mut self, side: Side, kind: SubstitutionKind) -> u64 {
        let slot = self.current_batter().ok().map(|(slot, _)| slot);
        let seq = self.log.record(
            &self.state,
            slot,
            EventKind::Substitution(SubstitutionRecord { side, kind }),
        );
        info!(seq, %side, ?kind, "substitution recorded");
        seq
    }

    fn replace_runner(&mut self, base: Base, player: PlayerId) -> ScoreResult<()> {
        let mut bases = *self.state.bases();
        bases.set(base, Some(player));
        self.state
            .apply_resolved_play(&ResolvedPlay::between_pitches(bases, 0, 0))?;
        Ok(())
    }

    // ----- Inning control -----

    /// Ends the current half-inning regardless of outs (called inning or
    /// mercy rule). Any pending play is discarded and the batter at the plate
    /// leads off next time.
    ///
    /// # Errors
    ///
    /// Fails if the game is finished.
    pub fn end_half_inning(&mut self) -> ScoreResult<HalfInning> {
        self.ensure_not_finished()?;
        self.pending = None;
        self.at_bat.reset();
        let change = self.state.force_half_change()?;
        self.open_half_inning(InningStartReason::Called)?;
        Ok(change)
    }

    /// Finishes the game and records the final score (runs plus handicap).
    ///
    /// # Errors
    ///
    /// Fails if the game is already finished.
    pub fn finish(&mut self) -> ScoreResult<SidePair<u32>> {
        self.ensure_not_finished()?;
        self.pending = None;
        self.at_bat.reset();
        let final_score = self.state.final_score();
        self.log
            .record(&self.state, None, EventKind::GameEnd { final_score });
        self.state.finish();
        info!(away = final_score.away, home = final_score.home, "game finished");
        Ok(final_score)
    }

    /// Rewrites the label and RBI of a past at-bat result.
    ///
    /// # Errors
    ///
    /// Fails if `seq` is unknown or not an at-bat result.
    pub fn correct_event(&mut self, seq: u64, label: Option<String>, rbi: Option<u32>) -> ScoreResult<()> {
        self.log.correct(seq, label, rbi)?;
        info!(seq, "event corrected");
        Ok(())
    }

    /// Replaces the operator's pitcher-decision overrides.
    pub fn set_decision_overrides(&mut self, overrides: DecisionOverrides) {
        self.decisions = overrides;
    }

    // ----- Derived views -----

    /// Runs by inning, hits and errors.
    #[must_use]
    pub fn line_score(&self) -> LineScore {
        derive::line_score(self.log.events(), self.config.regulation_innings)
    }

    /// Batting grid for a side.
    #[must_use]
    pub fn box_score(&self, side: Side) -> BoxScore {
        derive::box_score(self.log.events(), side, self.config.regulation_innings)
    }

    /// Pitcher lines by the side they pitched for.
    #[must_use]
    pub fn pitcher_lines(&self) -> SidePair<Vec<PitcherLine>> {
        derive::pitcher_lines(self.log.events())
    }

    /// Win, loss and save with operator overrides applied.
    #[must_use]
    pub fn decisions(&self) -> SidePair<PitcherDecisions> {
        derive::decisions(self.log.events(), &self.decisions)
    }

    /// Play-by-play lines.
    #[must_use]
    pub fn replay(&self) -> Vec<ReplayLine> {
        derive::replay(self.log.events())
    }

    /// Ledger rows for upload under `game_id`.
    #[must_use]
    pub fn ledger(&self, game_id: &str) -> Vec<LedgerRow> {
        derive::flatten_ledger(game_id, self.log.events())
    }

    fn open_half_inning(&mut self, reason: InningStartReason) -> ScoreResult<()> {
        let side = self.state.batting_side();
        let lineup = self.lineups.get(side);
        let lead = self.batting_index(side);
        let len = lineup.len();

        let mut placed = Bases::EMPTY;
        if self.config.tie_break_applies(self.state.inning()) && len > 0 {
            // The batter due up never starts on base.
            let runners = self.config.tie_break.runners().min(len - 1);
            for (offset, base) in (1..=runners).zip(Base::ALL) {
                let index = (lead + len * 3 - offset) % len;
                placed.set(base, lineup.slot(index).map(|slot| slot.current().player));
            }
        }

        self.log
            .record(&self.state, Some(lead), EventKind::InningStart { reason, placed });
        if !placed.is_empty() {
            self.state.place_runners(placed)?;
            debug!(inning = self.state.inning(), runners = placed.count(), "tie-break runners placed");
        }
        Ok(())
    }

    fn ensure_not_finished(&self) -> Result<(), InvariantViolation> {
        if self.state.is_finished() {
            return Err(InvariantViolation::GameFinished);
        }
        Ok(())
    }

    fn ensure_can_play(&self) -> Result<(), InvariantViolation> {
        self.ensure_not_finished()?;
        if self.pending.is_some() {
            return Err(InvariantViolation::AwaitingConfirmation);
        }
        Ok(())
    }
}
