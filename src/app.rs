//! Per-screen session
//!
//! Owns the simulation, the scene and the voice listener for one run of the
//! demo, and drives the fixed 30 ms physics tick from variable frame times.

use crate::consts::*;
use crate::controls::{SliderKind, apply_slider};
use crate::renderer::{SceneImages, SceneRenderer, SpriteDraw, Viewport};
use crate::settings::Settings;
use crate::sim::{Mode, PhysicsParams, SimState, tick};
use crate::voice::{ListenerAction, VoiceEvent, VoiceListener};

/// Demo session for one screen
pub struct Session {
    state: SimState,
    scene: SceneRenderer,
    listener: VoiceListener,
    accumulator: f32,
    status: String,
    running: bool,
}

impl Session {
    pub fn new(mode: Mode, settings: &Settings, images: SceneImages) -> Self {
        log::info!("Session starting in {} mode", mode.as_str());
        Self {
            state: SimState::new(mode),
            scene: SceneRenderer::new(images, mode.profile()),
            listener: VoiceListener::new(
                settings.keyword_matcher(),
                settings.effective_shout_force(),
            ),
            accumulator: 0.0,
            status: mode.status_text().to_string(),
            running: true,
        }
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn speed(&self) -> f32 {
        self.state.speed()
    }

    pub fn params(&self) -> PhysicsParams {
        self.state.params()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed elapsed wall time; runs as many fixed ticks as have accrued.
    /// Returns the number of ticks run.
    pub fn update(&mut self, elapsed_secs: f32) -> u32 {
        if !self.running {
            return 0;
        }
        if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
            self.accumulator += elapsed_secs.min(MAX_FRAME_DT);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog the substep cap could not absorb
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Route a recognizer event. Returns what the platform should do next.
    pub fn on_voice(&mut self, event: VoiceEvent) -> ListenerAction {
        let outcome = self.listener.handle(event, &mut self.state.impulse);
        if let Some(force) = outcome.force {
            self.status = format!("偵測到指令：加速！（F={:?}）", force);
        }
        outcome.action
    }

    /// Keyboard stand-in for a recognized shout
    pub fn shout(&mut self) -> ListenerAction {
        let phrase = crate::voice::DEFAULT_KEYWORDS[0].to_string();
        self.on_voice(VoiceEvent::Results(vec![phrase]))
    }

    /// Slider moved. Returns the new parameters in member mode.
    pub fn on_slider(&mut self, kind: SliderKind, progress: u32) -> Option<PhysicsParams> {
        if !self.running {
            return None;
        }
        apply_slider(&mut self.state, kind, progress)
    }

    /// Label for a slider at the current parameters
    pub fn slider_label(&self, kind: SliderKind) -> String {
        kind.label(&self.state.params())
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.scene.resize(viewport);
    }

    /// Lay out the next rendered frame
    pub fn frame(&mut self) -> Vec<SpriteDraw> {
        let speed = self.state.speed();
        self.scene.frame(speed)
    }

    /// Screen teardown: stop ticking and listening
    pub fn close(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.listener.stop();
        self.state.impulse.clear();
        self.accumulator = 0.0;
        log::info!("Session closed after {} ticks", self.state.time_ticks);
    }

    /// Start over in the same mode after a `close`, as when the page is
    /// shown again from the back/forward cache
    pub fn restart(&mut self) {
        let mode = self.state.mode;
        self.state = SimState::new(mode);
        self.scene.reset_scroll();
        self.listener.resume();
        self.accumulator = 0.0;
        self.status = mode.status_text().to_string();
        self.running = true;
        log::info!("Session restarted in {} mode", mode.as_str());
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{AssetProvider, ImageSize, ProceduralAssets, SpriteId};

    fn session(mode: Mode) -> Session {
        let images = ProceduralAssets::new().scene_images();
        Session::new(mode, &Settings::default(), images)
    }

    #[test]
    fn test_status_per_mode() {
        assert_eq!(session(Mode::Flat).status(), "模式：平面 (無重力 / 無摩擦)");
        assert_eq!(session(Mode::Slope).status(), "模式：斜面 (45°，有重力)");
        assert_eq!(session(Mode::Member).status(), "會員專屬：自訂 m / θ / μ");
    }

    #[test]
    fn test_update_runs_fixed_ticks() {
        let mut s = session(Mode::Flat);
        assert_eq!(s.update(0.01), 0);
        assert_eq!(s.update(0.025), 1);
        assert_eq!(s.update(0.09), 3);
        assert_eq!(s.state().time_ticks, 4);
    }

    #[test]
    fn test_update_caps_substeps() {
        let mut s = session(Mode::Flat);
        assert_eq!(s.update(10.0), MAX_SUBSTEPS);
        // Backlog is dropped rather than replayed
        assert!(s.update(0.0) <= 1);
    }

    #[test]
    fn test_voice_shout_accelerates_once() {
        let mut s = session(Mode::Flat);
        let action = s.on_voice(VoiceEvent::Results(vec!["加速加速".to_string()]));
        assert_eq!(action, ListenerAction::Restart);
        assert_eq!(s.status(), "偵測到指令：加速！（F=260.0）");

        s.update(SIM_DT);
        let expected = (SHOUT_FORCE / DEFAULT_MASS_KG) * SIM_DT * PIXEL_SCALE;
        assert_eq!(s.speed(), expected);

        s.update(SIM_DT);
        assert_eq!(s.speed(), expected);
    }

    #[test]
    fn test_slope_coasts_to_rest() {
        let mut s = session(Mode::Slope);
        s.shout();
        for _ in 0..100 {
            s.update(SIM_DT);
        }
        assert_eq!(s.speed(), 0.0);
    }

    #[test]
    fn test_sliders_member_only() {
        let mut member = session(Mode::Member);
        let params = member.on_slider(SliderKind::Friction, 50).unwrap();
        assert_eq!(params.mu, 0.5);
        assert_eq!(member.slider_label(SliderKind::Friction), "摩擦係數 μ = 0.5");

        let mut flat = session(Mode::Flat);
        assert!(flat.on_slider(SliderKind::Angle, 300).is_none());
        assert_eq!(flat.params(), Mode::Flat.default_params());
    }

    #[test]
    fn test_frame_uses_current_speed() {
        let mut s = session(Mode::Flat);
        s.resize(ImageSize::new(1080, 1920));
        s.shout();
        s.update(SIM_DT);

        let draws = s.frame();
        let bg = draws
            .iter()
            .find(|d| d.sprite == SpriteId::BackgroundFlat)
            .unwrap();
        assert!((bg.pos.x + s.speed()).abs() < 1e-2);
    }

    #[test]
    fn test_close_stops_everything() {
        let mut s = session(Mode::Flat);
        s.shout();
        s.close();
        assert!(!s.is_running());
        assert_eq!(s.update(1.0), 0);
        assert_eq!(s.speed(), 0.0);
        assert_eq!(s.on_voice(VoiceEvent::Error(3)), ListenerAction::Idle);
        assert!(s.on_slider(SliderKind::Mass, 10).is_none());
        assert!(s.state().impulse.is_empty());
    }

    #[test]
    fn test_restart_after_close() {
        let mut s = session(Mode::Member);
        s.on_slider(SliderKind::Angle, 0);
        s.shout();
        s.update(SIM_DT);
        s.close();

        s.restart();
        assert!(s.is_running());
        assert_eq!(s.speed(), 0.0);
        assert_eq!(s.params(), Mode::Member.default_params());
        assert_eq!(s.status(), "會員專屬：自訂 m / θ / μ");
        assert_eq!(s.on_voice(VoiceEvent::Results(vec!["跑".to_string()])), ListenerAction::Restart);
        assert_eq!(s.update(SIM_DT), 1);
        assert!(s.speed() > 0.0);
    }
}
