//! Visualizer state and lifecycle: construct, initialize, run, cancel.

use log::{error, info};
use rand::Rng;
use std::time::Instant;

use crate::audio::{AudioCapability, FrequencySource};
use crate::camera::OrbitCamera;
use crate::clock::{FrameClock, FrameTime};
use crate::driver::AnimationDriver;
use crate::error::AccessError;
use crate::field::{ElementField, SharedUniforms};
use crate::params::VisualizerConfig;
use crate::scheduler::FrameScheduler;
use crate::viewport::Viewport;

/// Full-screen message shown when the piece cannot start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Microphone access was refused
    PermissionDenied,
    /// No audio input capability at all
    Unsupported,
}

impl Overlay {
    pub fn message(&self) -> &'static str {
        match self {
            Overlay::PermissionDenied => "please allow microphone access",
            Overlay::Unsupported => "this experience is not supported in your browser",
        }
    }

    /// Overlay for an access failure; invalid streams abort without one
    pub fn for_error(err: &AccessError) -> Option<Self> {
        match err {
            AccessError::Unsupported => Some(Overlay::Unsupported),
            AccessError::Denied(_) => Some(Overlay::PermissionDenied),
            AccessError::InvalidStream(_) => None,
        }
    }
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, audio not requested yet
    Idle,
    /// Audio granted, animation loop armed
    Running,
    /// Initialization failed; terminal
    Halted(Option<Overlay>),
    /// Loop cancelled; terminal
    Stopped,
}

/// Result of one animation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    pub time: FrameTime,
    /// Drive value applied to every element
    pub drive: f32,
    /// Whether the next frame was scheduled (request one redraw)
    pub rearmed: bool,
}

/// Audio stream and cube field, present only after access was granted
struct Stage {
    source: Box<dyn FrequencySource>,
    field: ElementField,
}

/// Application state owned by the event loop
pub struct Visualizer {
    config: VisualizerConfig,
    camera: OrbitCamera,
    viewport: Viewport,
    uniforms: SharedUniforms,
    clock: FrameClock,
    scheduler: FrameScheduler,
    driver: AnimationDriver,
    stage: Option<Stage>,
    phase: Phase,
}

impl Visualizer {
    /// Wire camera and viewport for a surface of `width`x`height` physical pixels
    pub fn new(config: VisualizerConfig, width: u32, height: u32, pixel_ratio: f64) -> Self {
        let viewport = Viewport::new(width.max(1), height.max(1), pixel_ratio);
        let camera = OrbitCamera::new(config.orbit.clone(), viewport.aspect_ratio());
        let driver = AnimationDriver::new(config.drive.clone());

        Self {
            config,
            camera,
            viewport,
            uniforms: SharedUniforms::default(),
            clock: FrameClock::new(),
            scheduler: FrameScheduler::new(),
            driver,
            stage: None,
            phase: Phase::Idle,
        }
    }

    /// Request audio and, on success, build the field and arm the first frame
    ///
    /// Failures are terminal: the phase becomes [`Phase::Halted`] with the
    /// overlay to show, and no frame will ever run.
    pub fn initialize<C, R>(&mut self, capability: &C, rng: &mut R) -> Result<(), AccessError>
    where
        C: AudioCapability + ?Sized,
        R: Rng,
    {
        if self.phase != Phase::Idle {
            return Ok(());
        }

        let result = if capability.is_supported() {
            capability.request_access()
        } else {
            Err(AccessError::Unsupported)
        };

        let source = match result {
            Ok(source) => source,
            Err(err) => {
                let overlay = Overlay::for_error(&err);
                match overlay {
                    Some(overlay) => error!("{} ({})", overlay.message(), err),
                    None => error!("Aborting initialization: {}", err),
                }
                self.phase = Phase::Halted(overlay);
                return Err(err);
            }
        };

        let field = ElementField::build(self.config.field.box_count, self.camera.distance(), rng);
        let (width, height) = self.viewport.drawing_buffer_size();
        self.uniforms.resolution = [width as f32, height as f32];

        info!("Built field of {} cubes", field.len());

        self.stage = Some(Stage { source, field });
        self.phase = Phase::Running;
        self.scheduler.arm();
        Ok(())
    }

    /// Whether a frame is armed and the host should draw
    pub fn wants_frame(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Run the armed animation step at `now`, then re-arm
    ///
    /// Returns `None` when no frame was pending (not running, cancelled, or
    /// a redraw the loop did not ask for).
    pub fn frame(&mut self, now: Instant) -> Option<FrameOutcome> {
        let stage = self.stage.as_mut()?;
        if !self.scheduler.take() {
            return None;
        }

        let time = self.clock.tick(now);
        let snapshot = stage.source.sample();
        let drive = self.driver.step(
            time,
            snapshot,
            &mut stage.field,
            &mut self.camera,
            &mut self.uniforms,
        );

        Some(FrameOutcome {
            time,
            drive,
            rearmed: self.scheduler.arm(),
        })
    }

    /// Window resize in physical pixels
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f64) -> bool {
        self.viewport.resize(width, height, pixel_ratio, &mut self.camera)
    }

    /// Stop the loop; pending and future frames are dropped
    pub fn cancel(&mut self) {
        self.scheduler.cancel();
        if self.phase == Phase::Running {
            self.phase = Phase::Stopped;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn overlay(&self) -> Option<Overlay> {
        match self.phase {
            Phase::Halted(overlay) => overlay,
            _ => None,
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn uniforms(&self) -> &SharedUniforms {
        &self.uniforms
    }

    /// Cube field, once audio access has been granted
    pub fn field(&self) -> Option<&ElementField> {
        self.stage.as_ref().map(|stage| &stage.field)
    }
}
