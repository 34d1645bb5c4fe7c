//! Slope Roller entry point
//!
//! Handles platform-specific initialization and runs the demo loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_demo {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement};

    use slope_roller::consts::SIM_DT;
    use slope_roller::controls::SliderKind;
    use slope_roller::renderer::{AssetProvider, ImageSize, ProceduralAssets, SpriteRenderState};
    use slope_roller::voice::{ListenerAction, VoiceEvent};
    use slope_roller::{Mode, Session, Settings};

    /// Demo instance holding all state
    pub struct Demo {
        session: Session,
        render_state: Option<SpriteRenderState>,
        last_time: f64,
        last_status: String,
    }

    thread_local! {
        /// Handle for callbacks coming from the page's speech script
        static DEMO: RefCell<Option<Rc<RefCell<Demo>>>> = const { RefCell::new(None) };
    }

    impl Demo {
        fn render(&mut self) {
            let draws = self.session.frame();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&draws) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Track canvas size changes
        fn sync_size(&mut self, canvas: &HtmlCanvasElement) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            if width == 0 || height == 0 {
                return;
            }
            if canvas.width() != width || canvas.height() != height {
                canvas.set_width(width);
                canvas.set_height(height);
                if let Some(ref mut render_state) = self.render_state {
                    render_state.resize(width, height);
                }
                self.session.resize(ImageSize::new(width, height));
            }
        }

        /// Mirror the status line into the DOM
        fn update_hud(&mut self) {
            if self.session.status() == self.last_status {
                return;
            }
            self.last_status = self.session.status().to_string();
            if let Some(el) = document().and_then(|d| d.get_element_by_id("status")) {
                el.set_text_content(Some(&self.last_status));
            }
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    /// Mode from `?mode=` in the page URL
    fn requested_mode(default: Mode) -> Mode {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "mode")
            .and_then(|(_, value)| Mode::from_str(value))
            .unwrap_or(default)
    }

    fn with_demo<R>(f: impl FnOnce(&mut Demo) -> R) -> Option<R> {
        DEMO.with(|cell| cell.borrow().as_ref().map(|demo| f(&mut demo.borrow_mut())))
    }

    /// Route a recognizer event. Events arriving before the demo is up are
    /// dropped but listening continues.
    fn voice_event(event: VoiceEvent) -> bool {
        with_demo(|d| d.session.on_voice(event))
            .map(|a| a == ListenerAction::Restart)
            .unwrap_or(true)
    }

    pub fn voice_results(phrases: Vec<String>) -> bool {
        voice_event(VoiceEvent::Results(phrases))
    }

    pub fn voice_error(code: i32) -> bool {
        voice_event(VoiceEvent::Error(code))
    }

    /// Recognizer setup as JSON; read from settings so it is ready before the GPU is
    pub fn recognizer_setup() -> String {
        match Settings::load().recognizer_setup().to_json() {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize recognizer setup: {}", e);
                String::from("{}")
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Slope Roller starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No <canvas id=\"canvas\"> element");
                return;
            }
        };

        let settings = Settings::load();
        let mode = requested_mode(settings.default_mode);
        let assets = ProceduralAssets::new();

        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let mut session = Session::new(mode, &settings, assets.scene_images());
        session.resize(ImageSize::new(width, height));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("No suitable GPU adapter: {}", e);
                return;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            match SpriteRenderState::new(surface, &adapter, width, height, &assets).await {
                Ok(state) => state,
                Err(e) => {
                    log::error!("Failed to create device: {}", e);
                    return;
                }
            };

        let demo = Rc::new(RefCell::new(Demo {
            session,
            render_state: Some(render_state),
            last_time: 0.0,
            last_status: String::new(),
        }));
        DEMO.with(|cell| *cell.borrow_mut() = Some(demo.clone()));

        setup_sliders(&document, mode, demo.clone());
        if settings.keyboard_shout {
            setup_keyboard(demo.clone());
        }
        setup_teardown(demo.clone(), canvas.clone());

        request_animation_frame(demo, canvas);

        log::info!("Slope Roller running in {} mode", mode.as_str());
    }

    fn setup_sliders(document: &web_sys::Document, mode: Mode, demo: Rc<RefCell<Demo>>) {
        if let Some(panel) = document.get_element_by_id("member-panel") {
            let class = if mode.is_tunable() { "" } else { "hidden" };
            let _ = panel.set_attribute("class", class);
        }
        if !mode.is_tunable() {
            return;
        }

        for kind in SliderKind::ALL {
            let Some(input) = document
                .get_element_by_id(kind.element_id())
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                log::warn!("Slider #{} missing", kind.element_id());
                continue;
            };

            let params = demo.borrow().session.params();
            input.set_max(&kind.max_progress().to_string());
            input.set_value(&kind.progress_for(kind.read(&params)).to_string());
            set_slider_label(kind, &demo.borrow().session.slider_label(kind));

            let demo = demo.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Ok(progress) = input_clone.value().parse::<u32>() else {
                    return;
                };
                let mut d = demo.borrow_mut();
                if d.session.on_slider(kind, progress).is_some() {
                    let label = d.session.slider_label(kind);
                    set_slider_label(kind, &label);
                }
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn set_slider_label(kind: SliderKind, text: &str) {
        let id = format!("{}-label", kind.element_id());
        if let Some(el) = document().and_then(|d| d.get_element_by_id(&id)) {
            el.set_text_content(Some(text));
        }
    }

    fn setup_keyboard(demo: Rc<RefCell<Demo>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            match event.key().as_str() {
                " " | "Enter" => {
                    demo.borrow_mut().session.shout();
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Leaving the page ends the session. A page restored from the
    /// back/forward cache starts a fresh one.
    fn setup_teardown(demo: Rc<RefCell<Demo>>, canvas: HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let hide_demo = demo.clone();
        let on_hide = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PageTransitionEvent| {
            hide_demo.borrow_mut().session.close();
        });
        let _ = window.add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref());
        on_hide.forget();

        let on_show = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PageTransitionEvent| {
            if !event.persisted() {
                return;
            }
            {
                let mut d = demo.borrow_mut();
                if d.session.is_running() {
                    return;
                }
                d.session.restart();
                d.last_time = 0.0;
            }
            request_animation_frame(demo.clone(), canvas.clone());
        });
        let _ = window.add_event_listener_with_callback("pageshow", on_show.as_ref().unchecked_ref());
        on_show.forget();
    }

    fn request_animation_frame(demo: Rc<RefCell<Demo>>, canvas: HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            demo_loop(demo, canvas, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn demo_loop(demo: Rc<RefCell<Demo>>, canvas: HtmlCanvasElement, time: f64) {
        {
            let mut d = demo.borrow_mut();
            if !d.session.is_running() {
                log::info!("Render loop stopped");
                return;
            }

            let dt = if d.last_time > 0.0 {
                ((time - d.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            d.last_time = time;

            d.sync_size(&canvas);
            d.session.update(dt);
            d.render();
            d.update_hud();
        }

        request_animation_frame(demo, canvas);
    }
}

/// Recognized phrases from the page's speech service.
/// Returns true when the recognizer should start listening again.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn push_voice_results(phrases: Vec<String>) -> bool {
    wasm_demo::voice_results(phrases)
}

/// Speech service error. Returns true when the recognizer should listen again.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn push_voice_error(code: i32) -> bool {
    wasm_demo::voice_error(code)
}

/// Recognizer language, max results and optional keyword grammar, as JSON
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn recognizer_setup() -> String {
    wasm_demo::recognizer_setup()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_demo::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// One sample of the headless trace
#[cfg(not(target_arch = "wasm32"))]
#[derive(serde::Serialize)]
struct TraceSample {
    tick: u64,
    speed: f32,
    scroll: f32,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use slope_roller::consts::SIM_DT;
    use slope_roller::renderer::{AssetProvider, ImageSize, ProceduralAssets, SpriteId};
    use slope_roller::{Mode, Session, Settings};

    env_logger::init();
    log::info!("Slope Roller (native) starting...");
    log::info!("Native mode runs a headless trace - use `trunk serve` for the web version");

    let settings = Settings::load();
    let mut args = std::env::args().skip(1);
    let mode = match args.next() {
        Some(arg) => Mode::from_str(&arg).unwrap_or_else(|| {
            log::warn!("Unknown mode {:?}, using {}", arg, settings.default_mode.as_str());
            settings.default_mode
        }),
        None => settings.default_mode,
    };
    let ticks: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(100);

    let assets = ProceduralAssets::new();
    let mut session = Session::new(mode, &settings, assets.scene_images());
    session.resize(ImageSize::new(1080, 1920));
    session.shout();

    let mut trace = Vec::with_capacity(ticks as usize);
    for _ in 0..ticks {
        session.update(SIM_DT);
        let draws = session.frame();
        let scroll = draws
            .iter()
            .find(|d| matches!(d.sprite, SpriteId::BackgroundFlat | SpriteId::BackgroundSlope))
            .map(|d| d.pos.x)
            .unwrap_or(0.0);
        trace.push(TraceSample {
            tick: session.state().time_ticks,
            speed: session.speed(),
            scroll,
        });
    }
    session.close();

    match serde_json::to_string_pretty(&trace) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize trace: {}", e),
    }
}
