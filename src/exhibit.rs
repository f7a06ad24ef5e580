//! Exhibit Root Module
//!
//! [`Exhibit`] owns one scene and everything that drives it: the hotspot
//! managers, the animation sequencer, the narrative state machine and the
//! camera rig. It contains no window or GPU logic; a host feeds it clicks,
//! resizes and frame deltas, and renders `exhibit.scene()` however it likes.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine::{Exhibit, ExhibitConfig};
//!
//! let mut exhibit = Exhibit::new(ExhibitConfig::unboxing())?;
//! exhibit.load_configured_asset().await?;
//!
//! loop {
//!     // on click: exhibit.handle_click(cursor);
//!     exhibit.update(dt);
//!     // ... render exhibit.scene() ...
//! }
//! ```
//!
//! # Click flow
//!
//! Hotspot callbacks never touch the exhibit directly. They push a
//! [`Trigger`] onto a channel, and [`Exhibit::update`] drains it into the
//! [`Choreographer`] before advancing time. A click therefore takes effect on
//! the next frame, and the narrative is only ever mutated from `update`.

use glam::Vec2;

use crate::animation::AnimationSequencer;
use crate::assets::{AssetEvent, AssetHandle, AssetLoader, AssetReader};
use crate::choreography::{Choreographer, StageContext, Trigger};
use crate::config::ExhibitConfig;
use crate::errors::{Result, VitrineError};
use crate::interaction::{AnnotationManager, Input, RegionManager};
use crate::scene::{Camera, CameraKey, CameraRig, Scene};

pub struct Exhibit {
    config: ExhibitConfig,

    scene: Scene,
    camera: CameraKey,
    camera_rig: CameraRig,
    input: Input,

    annotations: AnnotationManager,
    regions: RegionManager,
    sequencer: AnimationSequencer,
    choreographer: Choreographer,

    loader: AssetLoader,
    asset: Option<AssetHandle>,

    trigger_tx: flume::Sender<Trigger>,
    trigger_rx: flume::Receiver<Trigger>,

    time: f32,
    frame_count: u64,
}

impl Exhibit {
    /// Builds the scene, hotspots and narrative described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::Config`] for duplicate hotspot names, invalid
    /// region dimensions, or a script that names unknown hotspots.
    pub fn new(config: ExhibitConfig) -> Result<Self> {
        let mut scene = Scene::new();
        let input = Input::new(config.viewport[0], config.viewport[1]);

        let cam = &config.camera;
        let mut camera = Camera::new_perspective(cam.fov, input.aspect().unwrap_or(1.0), cam.near, cam.far);
        camera.look_at(cam.position, cam.target);
        let camera_key = scene.add_camera(camera);

        let mut annotations = AnnotationManager::new();
        for desc in &config.annotations {
            if annotations.contains(&desc.name) {
                return Err(VitrineError::Config(format!("duplicate annotation '{}'", desc.name)));
            }
            annotations.add(&mut scene, desc);
        }
        annotations.set_camera(Some(camera_key));

        let mut regions = RegionManager::new();
        for desc in &config.regions {
            regions.add(&mut scene, desc)?;
        }

        let choreographer = Choreographer::new(&config.script, &annotations, &regions)?;

        let (trigger_tx, trigger_rx) = flume::unbounded();
        let mut exhibit = Self {
            camera_rig: CameraRig::new(config.camera.target),
            config,
            scene,
            camera: camera_key,
            input,
            annotations,
            regions,
            sequencer: AnimationSequencer::new(),
            choreographer,
            loader: AssetLoader::new(),
            asset: None,
            trigger_tx,
            trigger_rx,
            time: 0.0,
            frame_count: 0,
        };
        exhibit.bind_triggers();
        exhibit.scene.update_matrix_world();

        log::info!(
            "Exhibit ready: {} annotation(s), {} region(s), stage '{}'",
            exhibit.annotations.len(),
            exhibit.regions.len(),
            exhibit.choreographer.stage_name()
        );
        Ok(exhibit)
    }

    /// Connects every hotspot the script listens to with the trigger channel.
    fn bind_triggers(&mut self) {
        let mut bound: Vec<&Trigger> = Vec::new();
        for transition in &self.config.script.transitions {
            let trigger = &transition.trigger;
            if bound.contains(&trigger) {
                continue;
            }
            bound.push(trigger);

            let tx = self.trigger_tx.clone();
            let event = trigger.clone();
            let send = move || {
                // The exhibit owns the receiver, so sending cannot fail while
                // the hotspot exists.
                let _ = tx.send(event.clone());
            };
            match trigger {
                Trigger::Annotation(name) => {
                    self.annotations.trigger_interaction(name, send);
                }
                Trigger::Region(name) => {
                    self.regions.proxy_detection(name, send);
                }
            }
        }
    }

    // ========================================================================
    // Asset loading
    // ========================================================================

    /// Loads `uri` through `reader` and installs its clips in the sequencer.
    ///
    /// A previously loaded asset is replaced only once the new one has fully
    /// loaded.
    pub async fn load_asset<R: AssetReader>(&mut self, reader: &R, uri: &str) -> Result<&AssetHandle> {
        let handle = self.loader.load(reader, uri, &mut self.scene).await?;
        Ok(self.install(handle))
    }

    /// Loads the asset named in the configuration.
    pub async fn load_configured_asset(&mut self) -> Result<&AssetHandle> {
        let source = self.config.asset.clone();
        let handle = self.loader.load_source(&source, &mut self.scene).await?;
        Ok(self.install(handle))
    }

    fn install(&mut self, handle: AssetHandle) -> &AssetHandle {
        if let Some(old) = self.asset.take() {
            self.scene.remove_node(old.root());
        }
        self.sequencer.attach(&handle, &self.scene);
        self.scene.update_matrix_world();
        self.asset.insert(handle)
    }

    /// Receiver for asset load outcomes.
    #[must_use]
    pub fn asset_events(&self) -> flume::Receiver<AssetEvent> {
        self.loader.events()
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Delivers a click at `screen_pos` (pixels, origin top-left) to every
    /// hotspot. Returns how many hotspot callbacks fired.
    pub fn handle_click(&mut self, screen_pos: Vec2) -> usize {
        self.input.cursor_position = screen_pos;

        let mut fired = self.annotations.handle_click(&self.scene, &self.input, screen_pos).len();

        let ray = self
            .scene
            .get_camera(self.camera)
            .and_then(|camera| self.input.pick_ray(camera, screen_pos));
        if let Some(ray) = ray {
            fired += self.regions.handle_click(&self.scene, &ray).len();
        }
        fired
    }

    /// Queues a trigger as if its hotspot had been clicked.
    pub fn trigger(&self, trigger: Trigger) {
        let _ = self.trigger_tx.send(trigger);
    }

    /// Updates the viewport size and camera aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.input.handle_resize(width, height);
        if let Some(aspect) = self.input.aspect()
            && let Some(camera) = self.scene.get_camera_mut(self.camera)
        {
            camera.set_aspect(aspect);
        }
    }

    // ========================================================================
    // Frame update
    // ========================================================================

    /// Advances the exhibit by `dt` seconds.
    ///
    /// Order: due delayed actions, queued triggers, animation, region pulses,
    /// camera, world matrices. Delays scheduled by this frame's triggers
    /// start counting on the next frame.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        self.frame_count += 1;

        let mut ctx = StageContext {
            scene: &mut self.scene,
            annotations: &mut self.annotations,
            regions: &mut self.regions,
            sequencer: &mut self.sequencer,
            camera_rig: &mut self.camera_rig,
        };
        self.choreographer.tick(dt, &mut ctx);
        for trigger in self.trigger_rx.try_iter() {
            self.choreographer.fire(&trigger, &mut ctx);
        }

        self.sequencer.tick(dt, &mut self.scene);
        self.regions.update_all(dt, &mut self.scene);

        if let Some(camera) = self.scene.get_camera_mut(self.camera) {
            self.camera_rig.update(dt, camera);
        }
        self.scene.update_matrix_world();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &ExhibitConfig {
        &self.config
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn camera(&self) -> Option<&Camera> {
        self.scene.get_camera(self.camera)
    }

    #[must_use]
    pub fn camera_key(&self) -> CameraKey {
        self.camera
    }

    #[must_use]
    pub fn camera_rig(&self) -> &CameraRig {
        &self.camera_rig
    }

    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    #[must_use]
    pub fn annotations(&self) -> &AnnotationManager {
        &self.annotations
    }

    #[must_use]
    pub fn regions(&self) -> &RegionManager {
        &self.regions
    }

    #[must_use]
    pub fn sequencer(&self) -> &AnimationSequencer {
        &self.sequencer
    }

    #[must_use]
    pub fn choreographer(&self) -> &Choreographer {
        &self.choreographer
    }

    #[must_use]
    pub fn stage_name(&self) -> &'static str {
        self.choreographer.stage_name()
    }

    #[must_use]
    pub fn asset(&self) -> Option<&AssetHandle> {
        self.asset.as_ref()
    }

    /// Total time fed through `update`, in seconds.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
