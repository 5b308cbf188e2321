//! Lifecycle of the animated background.
//!
//! `ParticleBackground` owns the field, the drawing surface and a `Host`
//! that supplies frame scheduling and event listener registration. It moves
//! through Unstarted -> Running -> Cancelled and never returns to Running;
//! a fresh mount builds a fresh driver.

use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::physics;
use crate::render;
use crate::surface::Surface;
use rand::rngs::StdRng;
use std::collections::HashSet;

/// Token identifying one scheduled frame callback
pub type FrameHandle = u64;

/// Host event sources the background subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Resize,
    PointerMove,
}

/// Events forwarded from the host to a listening background
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize { width: f32, height: f32 },
    PointerMove { x: f32, y: f32 },
}

/// Environment services the background depends on
pub trait Host {
    /// Current viewport size in field units
    fn viewport(&self) -> (f32, f32);

    /// Ask for one callback before the next repaint
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a pending frame request. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    fn add_listener(&mut self, listener: Listener);

    fn remove_listener(&mut self, listener: Listener);
}

/// Host backed by a single-slot frame queue, polled by an event loop.
///
/// The event loop calls `take_scheduled` once per display tick and hands the
/// handle back to the background, and forwards events only for listeners
/// that are registered.
#[derive(Debug, Default)]
pub struct QueuedHost {
    viewport: (f32, f32),
    next_handle: FrameHandle,
    scheduled: Option<FrameHandle>,
    listeners: HashSet<Listener>,
}

impl QueuedHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: (width, height),
            ..Default::default()
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    /// The pending frame request, if any, without consuming it
    #[cfg(test)]
    pub fn scheduled(&self) -> Option<FrameHandle> {
        self.scheduled
    }

    /// Consume the pending frame request
    pub fn take_scheduled(&mut self) -> Option<FrameHandle> {
        self.scheduled.take()
    }

    pub fn is_listening(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }
}

impl Host for QueuedHost {
    fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        self.scheduled = Some(self.next_handle);
        self.next_handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.scheduled == Some(handle) {
            self.scheduled = None;
        }
    }

    fn add_listener(&mut self, listener: Listener) {
        self.listeners.insert(listener);
    }

    fn remove_listener(&mut self, listener: Listener) {
        self.listeners.remove(&listener);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Unstarted,
    Running,
    Cancelled,
}

/// The animated particle background and its frame loop
pub struct ParticleBackground<H: Host, S: Surface> {
    state: DriverState,
    field: ParticleField,
    config: FieldConfig,
    host: H,
    surface: Option<S>,
    pending: Option<FrameHandle>,
    rng: StdRng,
    paused: bool,
    surface_lost: bool,
    frames: u64,
}

impl<H: Host, S: Surface> ParticleBackground<H, S> {
    pub fn new(config: FieldConfig, host: H, rng: StdRng) -> Self {
        Self {
            state: DriverState::Unstarted,
            field: ParticleField::default(),
            config,
            host,
            surface: None,
            pending: None,
            rng,
            paused: false,
            surface_lost: false,
            frames: 0,
        }
    }

    /// Start animating onto `surface`.
    ///
    /// Without a surface nothing happens and the driver stays Unstarted.
    /// Returns whether the loop is now running.
    pub fn attach(&mut self, surface: Option<S>) -> bool {
        if self.state != DriverState::Unstarted {
            log::warn!("attach ignored: background is {:?}", self.state);
            return false;
        }
        let Some(mut surface) = surface else {
            log::info!("no drawing surface available; particle background disabled");
            return false;
        };

        let (width, height) = self.host.viewport();
        surface.resize(width, height);
        self.field = ParticleField::new(width, height);
        self.field
            .reinitialize(width, height, &self.config, &mut self.rng);
        self.surface = Some(surface);

        self.host.add_listener(Listener::Resize);
        self.host.add_listener(Listener::PointerMove);
        self.pending = Some(self.host.request_frame());
        self.state = DriverState::Running;

        log::info!(
            "particle background attached: {}x{} with {} particles",
            width,
            height,
            self.field.len()
        );
        true
    }

    /// Run one frame for a callback fired by the host.
    /// Stale handles and frames after teardown are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if self.state != DriverState::Running || self.pending != Some(handle) {
            log::trace!("dropping frame {}", handle);
            return;
        }
        self.pending = None;

        if !self.paused {
            physics::step(&mut self.field, &self.config);
        }
        if let Some(surface) = self.surface.as_mut() {
            let drawn = render::draw(&self.field, &self.config, surface);
            if !drawn && !self.surface_lost {
                log::warn!("drawing surface lost; frames will no longer be drawn");
            }
            self.surface_lost = !drawn;
        }
        self.frames += 1;

        self.pending = Some(self.host.request_frame());
    }

    /// Deliver a host event. Ignored unless the background is listening.
    pub fn handle_event(&mut self, event: HostEvent) {
        if self.state != DriverState::Running {
            return;
        }
        match event {
            HostEvent::Resize { width, height } => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.resize(width, height);
                }
                self.field
                    .reinitialize(width, height, &self.config, &mut self.rng);
            }
            HostEvent::PointerMove { x, y } => self.field.set_pointer(x, y),
        }
    }

    /// Regenerate particles for the current viewport
    pub fn reseed(&mut self) {
        if self.state == DriverState::Running {
            let (width, height) = (self.field.width, self.field.height);
            self.field
                .reinitialize(width, height, &self.config, &mut self.rng);
        }
    }

    /// Swap in new parameters and regenerate the particles
    pub fn set_config(&mut self, config: FieldConfig) {
        self.config = config;
        self.reseed();
    }

    /// Stop the loop: cancel the pending frame and drop listeners.
    /// Safe to call any number of times.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
        if self.state == DriverState::Running {
            self.host.remove_listener(Listener::Resize);
            self.host.remove_listener(Listener::PointerMove);
            log::info!("particle background torn down after {} frames", self.frames);
        }
        self.state = DriverState::Cancelled;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<H: Host, S: Surface> Drop for ParticleBackground<H, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;
    use rand::SeedableRng;

    type TestBackground = ParticleBackground<QueuedHost, RecordingSurface>;

    fn background(width: f32, height: f32) -> TestBackground {
        ParticleBackground::new(
            FieldConfig::default(),
            QueuedHost::new(width, height),
            StdRng::seed_from_u64(11),
        )
    }

    fn tick(bg: &mut TestBackground) {
        if let Some(handle) = bg.host_mut().take_scheduled() {
            bg.on_frame(handle);
        }
    }

    #[test]
    fn test_attach_starts_loop() {
        let mut bg = background(1200.0, 800.0);
        assert_eq!(bg.state(), DriverState::Unstarted);

        assert!(bg.attach(Some(RecordingSurface::default())));
        assert_eq!(bg.state(), DriverState::Running);
        assert_eq!(bg.field().len(), 120);
        assert_eq!(bg.field().pointer, (600.0, 400.0));
        assert_eq!(bg.surface().unwrap().size, (1200.0, 800.0));
        assert!(bg.host().scheduled().is_some());
        assert!(bg.host().is_listening(Listener::Resize));
        assert!(bg.host().is_listening(Listener::PointerMove));
    }

    #[test]
    fn test_attach_without_surface_is_quiet() {
        let mut bg = background(1200.0, 800.0);
        assert!(!bg.attach(None));
        assert_eq!(bg.state(), DriverState::Unstarted);
        assert!(bg.host().scheduled().is_none());
        assert!(!bg.host().is_listening(Listener::Resize));

        // teardown of a never-started driver is harmless
        bg.teardown();
        assert_eq!(bg.state(), DriverState::Cancelled);
    }

    #[test]
    fn test_each_frame_schedules_the_next() {
        let mut bg = background(600.0, 400.0);
        bg.attach(Some(RecordingSurface::default()));

        for expected in 1..=5 {
            tick(&mut bg);
            assert_eq!(bg.frames(), expected);
            assert!(bg.host().scheduled().is_some());
        }
        let surface = bg.surface().unwrap();
        assert_eq!(surface.circles(), 5 * 60);
    }

    #[test]
    fn test_stale_handle_ignored() {
        let mut bg = background(600.0, 400.0);
        bg.attach(Some(RecordingSurface::default()));
        let first = bg.host().scheduled().unwrap();
        tick(&mut bg);

        bg.on_frame(first);
        assert_eq!(bg.frames(), 1);
    }

    #[test]
    fn test_resize_reinitializes() {
        let mut bg = background(1200.0, 800.0);
        bg.attach(Some(RecordingSurface::default()));
        bg.handle_event(HostEvent::PointerMove { x: 5.0, y: 6.0 });

        bg.handle_event(HostEvent::Resize {
            width: 600.0,
            height: 400.0,
        });
        assert_eq!(bg.field().len(), 60);
        assert_eq!((bg.field().width, bg.field().height), (600.0, 400.0));
        assert_eq!(bg.surface().unwrap().size, (600.0, 400.0));
        assert_eq!(bg.field().pointer, (5.0, 6.0));
    }

    #[test]
    fn test_pointer_move_keeps_particles() {
        let mut bg = background(1200.0, 800.0);
        bg.attach(Some(RecordingSurface::default()));
        let before = bg.field().particles.clone();

        bg.handle_event(HostEvent::PointerMove { x: 100.0, y: 50.0 });
        assert_eq!(bg.field().pointer, (100.0, 50.0));
        assert_eq!(bg.field().particles, before);
    }

    #[test]
    fn test_no_draws_after_teardown() {
        let mut bg = background(1200.0, 800.0);
        bg.attach(Some(RecordingSurface::default()));
        tick(&mut bg);
        let handle = bg.host().scheduled().unwrap();

        bg.teardown();
        assert_eq!(bg.state(), DriverState::Cancelled);
        assert!(bg.host().scheduled().is_none());
        assert!(!bg.host().is_listening(Listener::Resize));
        assert!(!bg.host().is_listening(Listener::PointerMove));

        let drawn = bg.surface().unwrap().commands.len();
        // the primitive fires once more anyway
        bg.on_frame(handle);
        tick(&mut bg);
        assert_eq!(bg.surface().unwrap().commands.len(), drawn);
        assert_eq!(bg.frames(), 1);

        bg.handle_event(HostEvent::Resize {
            width: 100.0,
            height: 100.0,
        });
        assert_eq!(bg.field().len(), 120);

        // idempotent, and never restarts
        bg.teardown();
        assert!(!bg.attach(Some(RecordingSurface::default())));
        assert_eq!(bg.state(), DriverState::Cancelled);
    }

    #[test]
    fn test_lost_surface_stops_drawing_not_frames() {
        let mut bg = background(600.0, 400.0);
        bg.attach(Some(RecordingSurface::default()));
        for _ in 0..3 {
            tick(&mut bg);
        }
        let drawn = bg.surface().unwrap().commands.len();
        assert!(drawn > 0);

        if let Some(surface) = bg.surface.as_mut() {
            surface.lost = true;
        }
        for _ in 0..5 {
            tick(&mut bg);
            assert!(bg.host().scheduled().is_some());
        }
        assert_eq!(bg.surface().unwrap().commands.len(), drawn);
        assert_eq!(bg.frames(), 8);
        assert_eq!(bg.state(), DriverState::Running);

        // drawing resumes once the surface is back
        if let Some(surface) = bg.surface.as_mut() {
            surface.lost = false;
        }
        tick(&mut bg);
        assert!(bg.surface().unwrap().commands.len() > drawn);
    }

    #[test]
    fn test_pause_keeps_drawing() {
        let mut bg = background(600.0, 400.0);
        bg.attach(Some(RecordingSurface::default()));
        bg.toggle_pause();
        let before = bg.field().particles.clone();

        tick(&mut bg);
        assert_eq!(bg.field().particles, before);
        assert_eq!(bg.surface().unwrap().circles(), 60);

        bg.toggle_pause();
        tick(&mut bg);
        assert_ne!(bg.field().particles, before);
    }

    #[test]
    fn test_set_config_regenerates() {
        let mut bg = background(1200.0, 800.0);
        bg.attach(Some(RecordingSurface::default()));

        bg.set_config(FieldConfig {
            max_particles: 25,
            ..Default::default()
        });
        assert_eq!(bg.field().len(), 25);
    }
}
