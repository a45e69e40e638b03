//! Hand Slice entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Detection bridge
///
/// The pose detector is an external collaborator owned by the host page. It
/// estimates hands asynchronously and pushes each completed result here; the
/// frame loop polls the latest result and never awaits the detector, so a
/// slow or skipped estimate can never stall rendering.
#[cfg(target_arch = "wasm32")]
mod detection_bridge {
    use std::cell::RefCell;
    use wasm_bindgen::prelude::*;

    use hand_slice::input::HandDetection;

    thread_local! {
        static LATEST: RefCell<Option<Vec<HandDetection>>> = const { RefCell::new(None) };
    }

    /// Host page callback: one confident-or-not hand per completed estimate.
    /// `keypoints` is a flat `[x0, y0, x1, y1, ...]` buffer in video pixels.
    #[wasm_bindgen]
    pub fn submit_hand_frame(keypoints: &[f32], score: f32) {
        let hand = HandDetection::from_flat(score, keypoints);
        LATEST.with(|slot| *slot.borrow_mut() = Some(vec![hand]));
    }

    /// Host page callback: the estimate completed but saw no hands
    #[wasm_bindgen]
    pub fn submit_empty_frame() {
        LATEST.with(|slot| *slot.borrow_mut() = Some(Vec::new()));
    }

    /// A single estimate failed. Logged and swallowed; the frame loop keeps
    /// running on the sticky position.
    #[wasm_bindgen]
    pub fn report_detection_error(message: &str) {
        log::warn!("Detection error (continuing): {message}");
    }

    /// Take the most recent completed detection, if one arrived since the
    /// last frame
    pub fn take_latest() -> Option<Vec<HandDetection>> {
        LATEST.with(|slot| slot.borrow_mut().take())
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::fmt;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlVideoElement, MediaStream, Window};

    use hand_slice::consts::*;
    use hand_slice::input::{PointerTracker, Trail, TrackerFrame};
    use hand_slice::platform;
    use hand_slice::renderer::{RenderState, scene_vertices};
    use hand_slice::sim::{FrameInput, GamePhase, GameState, frame};
    use hand_slice::{HighScore, Settings};

    use crate::detection_bridge;

    const CAMERA_TIMEOUT_MS: i32 = 10_000;

    /// Fatal startup failures. Any of these leaves the session in Loading
    /// with a visible message; the player has to reload the page.
    #[derive(Debug)]
    enum InitError {
        CameraPermissionDenied,
        CameraNotFound,
        CameraBusy,
        CameraTimeout,
        CameraAccess(String),
        DetectorLoad(String),
        RenderSurface(String),
        MissingDom(&'static str),
    }

    impl fmt::Display for InitError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                InitError::CameraPermissionDenied => write!(f, "Camera permission denied"),
                InitError::CameraNotFound => write!(f, "Camera not found"),
                InitError::CameraBusy => write!(f, "Camera is already in use or unavailable"),
                InitError::CameraTimeout => write!(f, "Camera request timed out"),
                InitError::CameraAccess(name) => write!(f, "Failed to access camera: {name}"),
                InitError::DetectorLoad(msg) => {
                    write!(f, "Failed to load hand pose model: {msg}")
                }
                InitError::RenderSurface(msg) => write!(f, "Rendering unavailable: {msg}"),
                InitError::MissingDom(id) => write!(f, "Missing page element: {id}"),
            }
        }
    }

    // Pose detector collaborator, provided by the host page. It loads the
    // model, runs estimates against the video element, and reports results
    // through the `detection_bridge` exports.
    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(catch, js_name = initHandDetector)]
        async fn init_hand_detector(video: &HtmlVideoElement) -> Result<JsValue, JsValue>;
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        tracker: PointerTracker,
        trail: Trail,
        /// Tracker output of the current frame, for rendering
        pointer_frame: TrackerFrame,
        render_state: Option<RenderState>,
        high_score: HighScore,
        settings: Settings,
        /// Track phase for entry side effects
        last_phase: GamePhase,
        /// Active 1 Hz countdown interval, cleared before every new round
        countdown_handle: Option<i32>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed, SURFACE_WIDTH, SURFACE_HEIGHT),
                tracker: PointerTracker::new(SURFACE_WIDTH),
                trail: Trail::new(),
                pointer_frame: TrackerFrame::default(),
                render_state: None,
                high_score: HighScore::load(),
                settings: Settings::load(),
                last_phase: GamePhase::Loading,
                countdown_handle: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// One atomic frame step: poll detection, track, advance simulation
        fn step(&mut self, now_ms: f64) {
            // A frame with no fresh estimate proceeds on the sticky position
            let hands = detection_bridge::take_latest().unwrap_or_default();
            self.pointer_frame = self.tracker.update(&hands);
            self.trail.update(self.pointer_frame.pointer);

            frame(
                &mut self.state,
                &FrameInput {
                    pointer: self.pointer_frame.pointer,
                    now_ms,
                },
            );

            // Track frame times for FPS
            self.frame_times[self.frame_index] = now_ms;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = now_ms - oldest;
                if elapsed > 0.0 {
                    self.fps = (60_000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(ref mut render_state) = self.render_state else {
                return;
            };
            let vertices = scene_vertices(
                &self.state,
                &self.pointer_frame,
                &self.trail,
                &self.settings,
            );
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            set_text(document, "score-display", &format!("Score: {}", self.state.score));
            set_text(document, "timer-display", &format!("Time: {}", self.state.time_left));
            if self.settings.show_fps {
                set_text(document, "fps-display", &format!("{} FPS", self.fps));
            }
        }

        /// Run phase-entry side effects once per transition
        fn sync_phase(&mut self, document: &Document) {
            let phase = self.state.phase;
            if phase == self.last_phase {
                return;
            }
            match phase {
                GamePhase::Intro => {
                    set_text(document, "score-display", "Score: 0");
                    set_text(
                        document,
                        "timer-display",
                        &format!("Time: {}", ROUND_DURATION_SECS),
                    );
                }
                GamePhase::GameOver => self.finalize_round(document),
                _ => {}
            }
            show_phase_screens(document, phase);
            self.last_phase = phase;
        }

        /// Round over: stop the countdown, settle the high score, fill the
        /// game-over screen
        fn finalize_round(&mut self, document: &Document) {
            self.stop_countdown();

            let score = self.state.score;
            let is_new_best = self.high_score.submit(score);
            self.state.new_high_score = is_new_best;
            if is_new_best {
                self.high_score.save();
                log::info!("New high score: {score}");
            }

            set_text(document, "final-score", &format!("Your Score: {score}"));
            set_text(
                document,
                "high-score",
                &format!("High Score: {}", self.high_score.best),
            );
            set_hidden(document, "new-high-score-msg", !is_new_best);
        }

        fn stop_countdown(&mut self) {
            if let Some(handle) = self.countdown_handle.take()
                && let Some(window) = web_sys::window()
            {
                window.clear_interval_with_handle(handle);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn show_phase_screens(document: &Document, phase: GamePhase) {
        set_hidden(document, "loading-screen", phase != GamePhase::Loading);
        set_hidden(document, "intro-screen", phase != GamePhase::Intro);
        set_hidden(document, "game-over-screen", phase != GamePhase::GameOver);
        set_hidden(document, "game-ui", phase != GamePhase::Playing);
    }

    fn set_loading_message(document: &Document, message: &str) {
        set_text(document, "loading-message", message);
    }

    fn js_error_name(err: &JsValue) -> String {
        js_sys::Reflect::get(err, &JsValue::from_str("name"))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    }

    fn map_camera_error(err: JsValue) -> InitError {
        match js_error_name(&err).as_str() {
            "NotAllowedError" | "PermissionDeniedError" => InitError::CameraPermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" => InitError::CameraNotFound,
            "NotReadableError" | "TrackStartError" => InitError::CameraBusy,
            name => InitError::CameraAccess(name.to_string()),
        }
    }

    fn camera_constraints() -> web_sys::MediaStreamConstraints {
        fn ideal(value: f64) -> JsValue {
            let obj = js_sys::Object::new();
            let _ = js_sys::Reflect::set(&obj, &"ideal".into(), &JsValue::from_f64(value));
            obj.into()
        }
        let video = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&video, &"width".into(), &ideal(SURFACE_WIDTH as f64));
        let _ = js_sys::Reflect::set(&video, &"height".into(), &ideal(SURFACE_HEIGHT as f64));
        let _ = js_sys::Reflect::set(&video, &"facingMode".into(), &"user".into());

        let constraints = web_sys::MediaStreamConstraints::new();
        constraints.set_video(&video.into());
        constraints.set_audio(&JsValue::FALSE);
        constraints
    }

    /// Request the front camera, racing a timeout so a hung permission
    /// prompt can't wedge startup forever
    async fn init_camera(window: &Window, video: &HtmlVideoElement) -> Result<(), InitError> {
        let media = window
            .navigator()
            .media_devices()
            .map_err(|_| InitError::CameraNotFound)?;
        let request = media
            .get_user_media_with_constraints(&camera_constraints())
            .map_err(map_camera_error)?;

        let timeout = js_sys::Promise::new(&mut |_resolve, reject| {
            let cb = Closure::once_into_js(move || {
                let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("timeout"));
            });
            if let Some(w) = web_sys::window() {
                let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
                    cb.unchecked_ref(),
                    CAMERA_TIMEOUT_MS,
                );
            }
        });

        let race = js_sys::Promise::race(&js_sys::Array::of2(&request, &timeout).into());
        let stream_val = wasm_bindgen_futures::JsFuture::from(race)
            .await
            .map_err(|err| {
                if err.as_string().as_deref() == Some("timeout") {
                    InitError::CameraTimeout
                } else {
                    map_camera_error(err)
                }
            })?;

        let stream: MediaStream = stream_val
            .dyn_into()
            .map_err(|_| InitError::CameraAccess("invalid stream".to_string()))?;

        video.set_width(SURFACE_WIDTH as u32);
        video.set_height(SURFACE_HEIGHT as u32);
        video.set_src_object(Some(&stream));
        if let Ok(play) = video.play()
            && let Err(err) = wasm_bindgen_futures::JsFuture::from(play).await
        {
            // Autoplay rejection is recoverable; frames flow once the user
            // interacts with the page
            log::warn!("video.play() rejected (continuing): {:?}", err);
        }

        log::info!("Camera stream attached");
        Ok(())
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
    ) -> Result<RenderState, InitError> {
        canvas.set_width(SURFACE_WIDTH as u32);
        canvas.set_height(SURFACE_HEIGHT as u32);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| InitError::RenderSurface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| InitError::RenderSurface("no suitable adapter".to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        Ok(RenderState::new(
            surface,
            &adapter,
            SURFACE_WIDTH as u32,
            SURFACE_HEIGHT as u32,
            (SURFACE_WIDTH, SURFACE_HEIGHT),
        )
        .await)
    }

    /// Bring up camera, detector, and renderer. Any error leaves the session
    /// in Loading with the message on screen; there is no retry.
    async fn setup(
        window: &Window,
        document: &Document,
        game: &Rc<RefCell<Game>>,
    ) -> Result<(), InitError> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("output-canvas")
            .ok_or(InitError::MissingDom("output-canvas"))?
            .dyn_into()
            .map_err(|_| InitError::MissingDom("output-canvas"))?;
        let video: HtmlVideoElement = document
            .get_element_by_id("webcam")
            .ok_or(InitError::MissingDom("webcam"))?
            .dyn_into()
            .map_err(|_| InitError::MissingDom("webcam"))?;

        set_loading_message(document, "Requesting camera access...");
        init_camera(window, &video).await?;

        set_loading_message(document, "Loading hand pose model...");
        init_hand_detector(&video)
            .await
            .map_err(|err| InitError::DetectorLoad(js_error_name(&err)))?;
        log::info!("Hand pose model loaded");

        set_loading_message(document, "Preparing renderer...");
        let render_state = init_renderer(&canvas).await?;
        game.borrow_mut().render_state = Some(render_state);

        set_loading_message(document, "Ready");
        Ok(())
    }

    /// Start (or restart) a round: clear any previous countdown first so two
    /// intervals can never race on the timer
    fn begin_round(game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let mut g = game.borrow_mut();
            g.stop_countdown();
            g.state.start_round(platform::now_ms());
            log::info!("Round started");
        }

        let closure = Closure::<dyn FnMut()>::new({
            let game = game.clone();
            move || {
                game.borrow_mut().state.update_timer(platform::now_ms());
            }
        });
        if let Ok(handle) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1000,
        ) {
            game.borrow_mut().countdown_handle = Some(handle);
        }
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-button", "play-again-button"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    begin_round(&game);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            } else {
                log::warn!("Button #{id} not found");
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let mut g = game.borrow_mut();
            let now_ms = platform::now_ms();
            g.step(now_ms);
            g.render();
            g.update_hud(&document);
            g.sync_phase(&document);
        }

        request_animation_frame(game);
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Hand Slice starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        match setup(&window, &document, &game).await {
            Ok(()) => {
                game.borrow_mut().state.ready();
                setup_buttons(&document, game.clone());
                request_animation_frame(game);
                log::info!("Hand Slice running!");
            }
            Err(err) => {
                // Fatal: stay in Loading with the reason on screen, no retry
                log::error!("Initialization failed: {err}");
                set_loading_message(
                    &document,
                    &format!("Setup error: {err}. Check permissions and reload."),
                );
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hand Slice (native) starting...");
    log::info!("Native mode has no camera; run the web build for the real game");

    // Smoke-run the simulation headless
    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use glam::Vec2;
    use hand_slice::consts::{SURFACE_HEIGHT, SURFACE_WIDTH};
    use hand_slice::sim::{FrameInput, GameState, frame};

    let mut state = GameState::new(42, SURFACE_WIDTH, SURFACE_HEIGHT);
    state.ready();
    state.start_round(0.0);

    // Sweep the pointer across the surface for ~10 seconds of frames
    for i in 0..600 {
        let t = i as f32 / 600.0;
        let pointer = Vec2::new(
            SURFACE_WIDTH * (0.2 + 0.6 * t),
            SURFACE_HEIGHT * (0.3 + 0.4 * (t * 12.0).sin().abs()),
        );
        frame(
            &mut state,
            &FrameInput {
                pointer: Some(pointer),
                now_ms: i as f64 * 16.7,
            },
        );
    }

    println!(
        "Smoke run complete: score {}, {} fruit airborne, {} particles",
        state.score,
        state.fruits.len(),
        state.particles.len()
    );
}
