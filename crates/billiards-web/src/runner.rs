use billiards_core::{
    AssetManifest, BallInstance, FixedTimestep, GameEvent, InputEvent, InputQueue, PhysicsWorld,
    RenderFrame, SetupError, SimConfig, Simulation,
};

/// Drives the billiards simulation from the host's frame loop.
///
/// The page owns a single runner through a `thread_local!` in `lib.rs`,
/// because wasm-bindgen exports are free functions.
pub struct SimRunner {
    sim: Simulation<PhysicsWorld>,
    manifest: AssetManifest,
    input: InputQueue,
    /// Stays empty; handed to every substep after the first.
    no_input: InputQueue,
    timestep: FixedTimestep,
    frame: RenderFrame,
    instances: Vec<BallInstance>,
    /// Events raised by every substep of the last frame.
    events: Vec<GameEvent>,
}

impl SimRunner {
    pub fn new(manifest: AssetManifest) -> Result<Self, SetupError> {
        Self::with_config(manifest, SimConfig::default())
    }

    pub fn with_config(manifest: AssetManifest, config: SimConfig) -> Result<Self, SetupError> {
        manifest.validate()?;
        let timestep = FixedTimestep::from_hz(config.tick_hz);
        let sim = Simulation::new(PhysicsWorld::new(), config)?;
        let frame = sim.frame();
        let mut instances = Vec::with_capacity(16);
        BallInstance::fill_from(&frame, &mut instances);

        Ok(Self {
            sim,
            manifest,
            input: InputQueue::new(),
            no_input: InputQueue::new(),
            timestep,
            frame,
            instances,
            events: Vec::with_capacity(32),
        })
    }

    /// Queue an input event for the next simulation tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame: as many fixed ticks as `dt` covers, then rebuild
    /// the render buffers.
    pub fn tick(&mut self, dt: f32) {
        self.events.clear();

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            // queued input belongs to the first tick only
            let input = if step == 0 { &self.input } else { &self.no_input };
            self.sim.tick(input);
            self.events.extend_from_slice(self.sim.events());
        }
        if steps > 0 {
            self.input.drain();
        }

        self.frame = self.sim.frame();
        BallInstance::fill_from(&self.frame, &mut self.instances);
    }

    pub fn simulation(&self) -> &Simulation<PhysicsWorld> {
        &self.sim
    }

    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    pub fn frame_json(&self) -> String {
        // RenderFrame holds only strings and numbers
        serde_json::to_string(&self.frame).unwrap_or_default()
    }

    pub fn ball_image(&self, number: u8) -> Option<&str> {
        self.manifest.ball_image(number)
    }

    pub fn table_image(&self) -> &str {
        &self.manifest.table
    }

    // ---- Pointer accessors for linear-memory reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn world_width(&self) -> f32 {
        self.sim.config().table_width
    }

    /// Table height plus the bottom panel.
    pub fn world_height(&self) -> f32 {
        self.sim.config().world_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billiards_core::{Outcome, ShotPhase};

    const FRAME: f32 = 1.0 / 120.0;

    fn runner() -> SimRunner {
        SimRunner::new(AssetManifest::placeholder()).unwrap()
    }

    #[test]
    fn starts_with_a_full_rack() {
        let r = runner();
        assert_eq!(r.instance_count(), 16);
        assert_eq!(r.world_width(), 1200.0);
        assert_eq!(r.world_height(), 728.0);
        assert_eq!(r.ball_image(16), Some("images/ball_16.png"));
        assert_eq!(r.frame().outcome, Outcome::Undecided);
    }

    #[test]
    fn invalid_manifest_aborts_start_up() {
        let mut manifest = AssetManifest::placeholder();
        manifest.balls.pop();
        assert!(matches!(SimRunner::new(manifest), Err(SetupError::MissingAsset(_))));
    }

    #[test]
    fn input_reaches_exactly_one_tick() {
        let mut r = runner();
        r.push_input(InputEvent::PointerMove { x: 888.0, y: 200.0 });
        r.push_input(InputEvent::PointerDown { x: 888.0, y: 200.0 });
        // four ticks in one frame: the press is seen once, charge still climbs
        r.tick(4.0 * FRAME + 0.001);
        assert_eq!(r.simulation().shot().charge(), 400);
        assert_eq!(r.simulation().phase(), ShotPhase::Charging);

        r.push_input(InputEvent::PointerUp { x: 888.0, y: 200.0 });
        r.tick(FRAME);
        assert_eq!(r.simulation().shot().charge(), 0);
        assert!(r.events().iter().any(|e| e.kind == GameEvent::SHOT_STRUCK));
        assert_eq!(r.game_events_len() as usize, r.events().len());
    }

    #[test]
    fn short_frame_keeps_input_for_later() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 888.0, y: 200.0 });
        r.tick(0.0);
        assert!(!r.simulation().shot().is_charging());
        r.tick(FRAME);
        assert!(r.simulation().shot().is_charging());
    }

    #[test]
    fn frame_json_round_trips_through_serde() {
        let r = runner();
        let value: serde_json::Value = serde_json::from_str(&r.frame_json()).unwrap();
        assert_eq!(value["lives_label"]["text"], "LIVES: 3");
        assert_eq!(value["balls"].as_array().map(Vec::len), Some(16));
    }
}
