//! The fixed-tick simulation: owns the engine and every piece of game state.

use glam::Vec2;

use crate::api::config::SimConfig;
use crate::api::engine::{AnchorPin, BallSpec, TableEngine};
use crate::api::types::{Ball, BallId, BallKind, GameEvent, Outcome};
use crate::error::SetupError;
use crate::input::queue::{InputEvent, InputQueue};
use crate::render::frame::RenderFrame;
use crate::rules::match_state::MatchState;
use crate::rules::pockets::resolve_pockets;
use crate::rules::shot::{is_resting, Shot, ShotPhase};
use crate::table::layout::{rack_positions, Table, CUE_NUMBER};

/// One table, one player. Everything mutable lives here and is advanced by
/// [`Simulation::tick`]; the host supplies input and reads back frames.
pub struct Simulation<E: TableEngine> {
    config: SimConfig,
    engine: E,
    table: Table,
    /// Live balls: object balls in rack order, cue ball last.
    balls: Vec<Ball>,
    cue: BallId,
    shot: Shot,
    state: MatchState,
    pointer: Vec2,
    events: Vec<GameEvent>,
    ticks: u64,
}

impl<E: TableEngine> Simulation<E> {
    /// Rack the balls and build the table inside `engine`.
    pub fn new(mut engine: E, config: SimConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let table = Table::standard(&config);
        for cushion in table.cushion_specs() {
            engine.add_cushion(&cushion)?;
        }

        let radius = config.ball_radius();
        let pin = AnchorPin {
            max_bias: config.pin_max_bias,
            max_force: config.pin_max_force,
        };
        let spots = rack_positions(config.ball_diameter)
            .into_iter()
            .enumerate()
            .map(|(i, pos)| (i as u8 + 1, BallKind::Object, pos))
            .chain(std::iter::once((CUE_NUMBER, BallKind::Cue, config.cue_home)));

        let mut balls = Vec::with_capacity(16);
        for (number, kind, position) in spots {
            let id = BallId(number as u32);
            engine.add_ball(&BallSpec {
                id,
                position,
                radius,
                mass: config.ball_mass,
                elasticity: config.ball_elasticity,
                pin,
            })?;
            balls.push(Ball { id, kind, number, radius });
        }

        log::info!(
            "Table ready: {} balls, {} pockets, {} Hz",
            balls.len(),
            table.pockets().len(),
            config.tick_hz
        );

        Ok(Self {
            state: MatchState::new(config.starting_lives),
            pointer: config.cue_home,
            cue: BallId(CUE_NUMBER as u32),
            config,
            engine,
            table,
            balls,
            shot: Shot::new(),
            events: Vec::new(),
            ticks: 0,
        })
    }

    /// Advance one fixed tick: physics, pockets, shot, verdict.
    pub fn tick(&mut self, input: &InputQueue) {
        self.events.clear();
        self.ticks += 1;

        self.engine.step(self.config.dt());

        let hits = resolve_pockets(
            &mut self.engine,
            &mut self.balls,
            &self.table,
            &mut self.state,
            self.config.cue_parking,
            &mut self.events,
        );
        let cue_just_potted = hits.iter().any(|h| h.ball == self.cue);

        self.update_shot(input, cue_just_potted);

        if let Some(outcome) = self.state.evaluate(self.balls.len()) {
            log::info!("Match over after {} ticks: {:?}", self.ticks, outcome);
            let won = if outcome == Outcome::Won { 1.0 } else { 0.0 };
            self.events
                .push(GameEvent::new(GameEvent::MATCH_OVER, won, self.state.lives() as f32));
        }
    }

    fn update_shot(&mut self, input: &InputQueue, cue_just_potted: bool) {
        for event in input.iter() {
            let pos = event.pos();
            if pos.is_finite() {
                self.pointer = pos;
            } else {
                log::warn!("Ignoring non-finite pointer position {:?}", pos);
            }
        }

        let active = self.state.is_active();
        let at_rest = !self.table_in_motion();

        // the re-spot waits for the first settled tick after the pot
        if at_rest && active && self.state.cue_potted() && !cue_just_potted {
            self.engine.set_position(self.cue, self.config.cue_home);
            self.engine.set_velocity(self.cue, Vec2::ZERO);
            self.state.clear_cue_potted();
            log::debug!("Cue ball re-spotted at {:?}", self.config.cue_home);
            self.events.push(GameEvent::new(GameEvent::CUE_RESPOTTED, 0.0, 0.0));
        }
        let cue_on_table = !self.state.cue_potted();
        let mut ready = at_rest && active && cue_on_table;
        if ready {
            let cue_pos = self.engine.position(self.cue);
            self.shot.aim(cue_pos, self.pointer);
        }

        // events apply in arrival order: a release strikes before a later
        // press in the same tick can start the next session
        for event in input.iter() {
            match event {
                InputEvent::PointerDown { .. } => {
                    if ready {
                        self.shot.begin_charge();
                    } else {
                        log::debug!("Charge ignored: table not ready");
                    }
                }
                InputEvent::PointerUp { .. } => {
                    if self.shot.release() && ready && self.strike() {
                        ready = false;
                    }
                }
                InputEvent::PointerMove { .. } => {}
            }
        }

        if !active {
            return;
        }
        if self.shot.is_charging() {
            self.shot
                .advance_charge(self.config.charge_step, self.config.max_charge);
        } else if ready {
            self.strike();
        }
    }

    /// Apply the owed strike to the cue ball, if any.
    fn strike(&mut self) -> bool {
        let Some(strike) = self.shot.take_strike() else {
            return false;
        };
        self.engine.apply_impulse(self.cue, strike.impulse, Vec2::ZERO);
        log::info!(
            "Shot struck: charge {} at {:.1} degrees",
            strike.charge,
            strike.angle
        );
        self.events.push(GameEvent::new(
            GameEvent::SHOT_STRUCK,
            strike.charge as f32,
            strike.angle,
        ));
        true
    }

    /// `true` while any live ball still has perceptible velocity.
    pub fn table_in_motion(&self) -> bool {
        self.balls
            .iter()
            .any(|b| !is_resting(self.engine.velocity(b.id)))
    }

    pub fn phase(&self) -> ShotPhase {
        self.shot.phase(self.table_in_motion())
    }

    /// Snapshot of everything the host draws this frame.
    pub fn frame(&self) -> RenderFrame {
        RenderFrame::build(self)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Direct engine access for hosts and tests that stage positions.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn cue(&self) -> BallId {
        self.cue
    }

    pub fn cue_position(&self) -> Vec2 {
        self.engine.position(self.cue)
    }

    pub fn shot(&self) -> &Shot {
        &self.shot
    }

    pub fn match_state(&self) -> &MatchState {
        &self.state
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Events raised by the most recent tick.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Object balls still on the table.
    pub fn object_balls_left(&self) -> usize {
        self.balls.iter().filter(|b| !b.is_cue()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedEngine;

    fn sim() -> Simulation<ScriptedEngine> {
        Simulation::new(ScriptedEngine::new(), SimConfig::default()).unwrap()
    }

    fn idle() -> InputQueue {
        InputQueue::new()
    }

    fn events(list: &[InputEvent]) -> InputQueue {
        list.iter().copied().collect()
    }

    #[test]
    fn fresh_rack_scenario() {
        let mut sim = sim();
        assert_eq!(sim.balls().len(), 16);
        assert_eq!(sim.object_balls_left(), 15);
        assert_eq!(sim.engine().cushions, 6);
        assert_eq!(sim.balls().iter().filter(|b| b.is_cue()).count(), 1);
        assert!(sim.balls().last().unwrap().is_cue());

        sim.tick(&idle());
        let state = sim.match_state();
        assert!(state.is_active());
        assert_eq!(state.outcome(), Outcome::Undecided);
        assert_eq!(state.lives(), 3);
        assert!(state.potted().is_empty());
        assert_eq!(sim.phase(), ShotPhase::Aiming);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = SimConfig { charge_step: 0, ..SimConfig::default() };
        assert!(Simulation::new(ScriptedEngine::new(), cfg).is_err());
    }

    #[test]
    fn cue_pot_parks_then_respots_when_table_settles() {
        let mut sim = sim();
        let cue = sim.cue();
        // 10 units from the top-left pocket, rolling slowly toward it
        sim.engine_mut().set_position(cue, Vec2::new(65.0, 63.0));
        sim.engine_mut().set_velocity(cue, Vec2::new(-12.0, 0.0));
        // keep something else rolling so the re-spot waits
        sim.engine_mut().set_velocity(BallId(8), Vec2::new(0.0, 5.0));

        sim.tick(&idle());
        assert_eq!(sim.match_state().lives(), 2);
        assert!(sim.match_state().cue_potted());
        assert_eq!(sim.cue_position(), Vec2::new(-100.0, -100.0));
        assert_eq!(sim.engine().velocity(cue), Vec2::ZERO);
        assert!(sim.engine().contains(cue));
        assert_eq!(sim.phase(), ShotPhase::Struck);

        sim.engine_mut().set_velocity(BallId(8), Vec2::ZERO);
        sim.tick(&idle());
        assert!(!sim.match_state().cue_potted());
        assert_eq!(sim.cue_position(), Vec2::new(888.0, 339.0));
        assert!(sim.events().iter().any(|e| e.kind == GameEvent::CUE_RESPOTTED));
        assert_eq!(sim.object_balls_left(), 15);
    }

    #[test]
    fn three_cue_pots_lose_even_with_balls_left() {
        let mut sim = sim();
        let cue = sim.cue();
        for _ in 0..3 {
            sim.engine_mut().set_position(cue, Vec2::new(1134.0, 616.0));
            sim.tick(&idle());
        }
        let state = sim.match_state();
        assert_eq!(state.lives(), 0);
        assert_eq!(state.outcome(), Outcome::Lost);
        assert!(!state.is_active());
        assert_eq!(sim.object_balls_left(), 15);
        assert!(sim.events().iter().any(|e| e.kind == GameEvent::MATCH_OVER && e.a == 0.0));
        // the cue ball stays parked once the match is over
        sim.tick(&idle());
        assert_eq!(sim.cue_position(), Vec2::new(-100.0, -100.0));
    }

    #[test]
    fn clearing_the_table_wins() {
        let mut sim = sim();
        let cue = sim.cue();
        sim.engine_mut().set_position(cue, Vec2::new(1134.0, 616.0));
        sim.tick(&idle());
        // parked for the rest of the pot tick even though nothing moves
        assert_eq!(sim.cue_position(), Vec2::new(-100.0, -100.0));
        sim.tick(&idle());
        assert_eq!(sim.cue_position(), Vec2::new(888.0, 339.0));
        assert_eq!(sim.match_state().lives(), 2);

        let pockets: Vec<Vec2> = sim.table().pockets().iter().map(|p| p.center).collect();
        let objects: Vec<BallId> = sim.balls().iter().filter(|b| !b.is_cue()).map(|b| b.id).collect();
        for (i, id) in objects.iter().enumerate() {
            sim.engine_mut().set_position(*id, pockets[i % pockets.len()]);
        }
        sim.tick(&idle());

        assert_eq!(sim.balls().len(), 1);
        assert_eq!(sim.match_state().outcome(), Outcome::Won);
        assert!(!sim.match_state().is_active());
        assert_eq!(sim.match_state().potted(), (1..=15).collect::<Vec<u8>>().as_slice());
        assert_eq!(sim.engine().ball_count(), 1);
    }

    #[test]
    fn potted_object_ball_never_returns() {
        let mut sim = sim();
        sim.engine_mut().set_position(BallId(5), Vec2::new(592.0, 48.0));
        sim.tick(&idle());
        for _ in 0..10 {
            sim.tick(&idle());
            assert!(sim.balls().iter().all(|b| b.id != BallId(5)));
            assert!(!sim.engine().contains(BallId(5)));
        }
        assert_eq!(sim.match_state().potted(), &[5]);
    }

    #[test]
    fn full_shot_cycle() {
        let mut sim = sim();
        let cue = sim.cue();
        let home = sim.cue_position();

        // aim: pointer straight left of the cue ball
        sim.tick(&events(&[InputEvent::PointerMove { x: home.x - 200.0, y: home.y }]));
        assert!(sim.shot().angle().abs() < 1e-3);

        sim.tick(&events(&[InputEvent::PointerDown { x: home.x - 200.0, y: home.y }]));
        assert_eq!(sim.phase(), ShotPhase::Charging);
        assert_eq!(sim.shot().charge(), 100);
        for _ in 0..24 {
            sim.tick(&idle());
        }
        assert_eq!(sim.shot().charge(), 2500);

        // moving the pointer while charging does not change the aim
        sim.tick(&events(&[InputEvent::PointerMove { x: home.x, y: home.y - 300.0 }]));
        assert!(sim.shot().angle().abs() < 1e-3);
        assert_eq!(sim.shot().charge(), 2600);

        sim.tick(&events(&[InputEvent::PointerUp { x: home.x, y: home.y - 300.0 }]));
        assert_eq!(sim.engine().impulses.len(), 1);
        let (id, impulse) = sim.engine().impulses[0];
        assert_eq!(id, cue);
        assert!((impulse.x + 2600.0).abs() < 0.01, "impulse = {:?}", impulse);
        assert!(impulse.y.abs() < 0.01);
        assert_eq!(sim.shot().charge(), 0);
        assert_eq!(sim.shot().direction(), 1);
        assert_eq!(sim.phase(), ShotPhase::Struck);
        assert!(sim.events().iter().any(|e| e.kind == GameEvent::SHOT_STRUCK && e.a == 2600.0));

        // no new charge while rolling
        sim.tick(&events(&[InputEvent::PointerDown { x: 0.0, y: 0.0 }]));
        assert!(!sim.shot().is_charging());

        sim.engine_mut().set_velocity(cue, Vec2::ZERO);
        sim.tick(&idle());
        assert_eq!(sim.phase(), ShotPhase::Aiming);
    }

    #[test]
    fn instant_press_and_release_is_harmless() {
        let mut sim = sim();
        let cue = sim.cue();
        sim.tick(&events(&[
            InputEvent::PointerDown { x: 100.0, y: 100.0 },
            InputEvent::PointerUp { x: 100.0, y: 100.0 },
        ]));
        assert_eq!(sim.engine().impulses, vec![(cue, Vec2::ZERO)]);
        assert_eq!(sim.engine().velocity(cue), Vec2::ZERO);
        assert_eq!(sim.phase(), ShotPhase::Aiming);
    }

    #[test]
    fn release_then_press_in_one_tick_strikes_first() {
        let mut sim = sim();
        let cue = sim.cue();
        let home = sim.cue_position();
        let (px, py) = (home.x - 200.0, home.y);

        sim.tick(&events(&[InputEvent::PointerDown { x: px, y: py }]));
        for _ in 0..29 {
            sim.tick(&idle());
        }
        assert_eq!(sim.shot().charge(), 3000);

        sim.tick(&events(&[
            InputEvent::PointerUp { x: px, y: py },
            InputEvent::PointerDown { x: px, y: py },
        ]));
        assert_eq!(sim.engine().impulses.len(), 1);
        let (id, impulse) = sim.engine().impulses[0];
        assert_eq!(id, cue);
        assert!((impulse.x + 3000.0).abs() < 0.01, "impulse = {:?}", impulse);
        // the press landed on a rolling table and starts nothing
        assert!(!sim.shot().is_charging());
        assert_eq!(sim.shot().charge(), 0);
        assert_eq!(sim.shot().direction(), 1);
        assert_eq!(sim.phase(), ShotPhase::Struck);
        assert_eq!(
            sim.events().iter().filter(|e| e.kind == GameEvent::SHOT_STRUCK).count(),
            1
        );
    }

    #[test]
    fn no_shots_after_the_match_is_decided() {
        let mut sim = sim();
        let cue = sim.cue();
        for _ in 0..3 {
            sim.engine_mut().set_position(cue, Vec2::new(55.0, 616.0));
            sim.tick(&idle());
        }
        assert!(!sim.match_state().is_active());

        sim.tick(&events(&[InputEvent::PointerDown { x: 10.0, y: 10.0 }]));
        assert!(!sim.shot().is_charging());
        sim.tick(&events(&[InputEvent::PointerUp { x: 10.0, y: 10.0 }]));
        assert!(sim.engine().impulses.is_empty());
    }

    #[test]
    fn physics_keeps_stepping_after_the_match() {
        let mut sim = sim();
        let cue = sim.cue();
        for _ in 0..3 {
            sim.engine_mut().set_position(cue, Vec2::new(55.0, 616.0));
            sim.tick(&idle());
        }
        sim.engine_mut().set_velocity(BallId(1), Vec2::new(120.0, 0.0));
        let before = sim.engine().position(BallId(1));
        sim.tick(&idle());
        assert!(sim.engine().position(BallId(1)).x > before.x);
        assert_eq!(sim.engine().steps, 4);
    }

    #[test]
    fn non_finite_pointer_is_ignored() {
        let mut sim = sim();
        sim.tick(&events(&[InputEvent::PointerMove { x: 300.0, y: 339.0 }]));
        sim.tick(&events(&[InputEvent::PointerMove { x: f32::NAN, y: 0.0 }]));
        assert_eq!(sim.pointer(), Vec2::new(300.0, 339.0));
    }
}
