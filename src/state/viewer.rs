//! Lightbox viewer session: gallery position, zoom, pan, drag
//! classification, and pan momentum.
//!
//! Every transition is a pure function of explicit coordinates, timestamps,
//! and container bounds. The component layer feeds DOM events in and applies
//! the resulting transform; nothing here touches the browser, so the whole
//! machine runs under plain `cargo test`.

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_STEP: f64 = 0.2;
/// Geometric decay applied to the release velocity once per momentum step.
pub const PAN_FRICTION: f64 = 0.95;
/// Velocity magnitude (px/ms) below which momentum stops, and below which a
/// release starts none.
pub const MOMENTUM_CUTOFF: f64 = 0.1;

/// Live width/height of the overlay's image container, measured by the host
/// before each pan or momentum step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    /// One pointer down on a magnified image. Fields are the most recent
    /// sampled pointer position and its timestamp.
    Panning {
        last_x: f64,
        last_y: f64,
        last_time_ms: f64,
    },
    /// Two touch points down. Zoom follows the ratio of the current
    /// two-point distance against the recorded starting pair.
    Pinching {
        initial_distance: f64,
        start_zoom: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerSession {
    /// Gallery position; `None` while the overlay is closed.
    pub current_index: Option<usize>,
    /// Recorded at `open` so navigation can bound itself.
    pub item_count: usize,
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub drag: DragState,
    /// Last sampled drag velocity in px/ms. Consumed by momentum after a
    /// release; zeroed by every cancellation so a release without an
    /// intervening move cannot resume stale motion.
    pub velocity_x: f64,
    pub velocity_y: f64,
    // Checked by the integrator before every step; cancelling operations
    // clear it synchronously, turning any still-pending step into a no-op.
    momentum_active: bool,
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self {
            current_index: None,
            item_count: 0,
            zoom: MIN_ZOOM,
            pan_x: 0.0,
            pan_y: 0.0,
            drag: DragState::Idle,
            velocity_x: 0.0,
            velocity_y: 0.0,
            momentum_active: false,
        }
    }
}

fn pinch_distance((ax, ay): (f64, f64), (bx, by): (f64, f64)) -> f64 {
    let dx = ax - bx;
    let dy = ay - by;
    (dx * dx + dy * dy).sqrt()
}

impl ViewerSession {
    // ---------------- Gallery navigation -----------------

    /// Open the overlay on `index`. Out-of-range indices are rejected.
    pub fn open(&mut self, index: usize, item_count: usize) -> bool {
        if index >= item_count {
            return false;
        }
        self.current_index = Some(index);
        self.item_count = item_count;
        self.reset_view();
        true
    }

    /// Advance to the next image; no-op at the last index.
    pub fn next(&mut self) -> bool {
        match self.current_index {
            Some(i) if i + 1 < self.item_count => {
                self.current_index = Some(i + 1);
                self.reset_view();
                true
            }
            _ => false,
        }
    }

    /// Step back to the previous image; no-op at index 0.
    pub fn previous(&mut self) -> bool {
        match self.current_index {
            Some(i) if i > 0 => {
                self.current_index = Some(i - 1);
                self.reset_view();
                true
            }
            _ => false,
        }
    }

    pub fn close(&mut self) {
        self.current_index = None;
        self.item_count = 0;
        self.reset_view();
    }

    pub fn is_open(&self) -> bool {
        self.current_index.is_some()
    }

    pub fn at_first(&self) -> bool {
        self.current_index.map_or(true, |i| i == 0)
    }

    pub fn at_last(&self) -> bool {
        self.current_index.map_or(true, |i| i + 1 >= self.item_count)
    }

    // Every image load starts from an unmagnified, centered view.
    fn reset_view(&mut self) {
        self.zoom = MIN_ZOOM;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.drag = DragState::Idle;
        self.cancel_momentum();
    }

    // ---------------- Wheel zoom -----------------

    /// One discrete zoom step per wheel event; negative delta zooms in.
    /// Ignored while the overlay is closed.
    pub fn wheel_zoom(&mut self, delta_y: f64) {
        if !self.is_open() {
            return;
        }
        let direction = if delta_y > 0.0 { -1.0 } else { 1.0 };
        self.zoom = (self.zoom + direction * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
        if self.zoom == MIN_ZOOM {
            // An unmagnified image must sit centered; a dangling offset
            // would survive invisibly and reappear on the next zoom-in.
            self.pan_x = 0.0;
            self.pan_y = 0.0;
        }
        self.cancel_momentum();
    }

    // ---------------- Pointer pan -----------------

    /// Begin a drag. Rejected while the image is unmagnified or another
    /// drag is already active.
    pub fn pan_start(&mut self, x: f64, y: f64, time_ms: f64) -> bool {
        if self.zoom == MIN_ZOOM || !matches!(self.drag, DragState::Idle) {
            return false;
        }
        self.cancel_momentum();
        self.drag = DragState::Panning {
            last_x: x,
            last_y: y,
            last_time_ms: time_ms,
        };
        true
    }

    /// Accumulate a drag sample: offset moves by the pointer delta, the
    /// instantaneous velocity is re-sampled (a zero elapsed time keeps the
    /// prior sample), and the sample becomes the new reference point.
    pub fn pan_move(&mut self, x: f64, y: f64, time_ms: f64, container: ContainerSize) -> bool {
        let DragState::Panning {
            last_x,
            last_y,
            last_time_ms,
        } = self.drag
        else {
            return false;
        };
        let dx = x - last_x;
        let dy = y - last_y;
        let dt = time_ms - last_time_ms;
        if dt > 0.0 {
            self.velocity_x = dx / dt;
            self.velocity_y = dy / dt;
        }
        self.pan_x += dx;
        self.pan_y += dy;
        self.constrain_pan(container);
        self.drag = DragState::Panning {
            last_x: x,
            last_y: y,
            last_time_ms: time_ms,
        };
        true
    }

    /// Release the drag. Returns whether the last sampled velocity is fast
    /// enough that the host should start the momentum integrator.
    pub fn pan_end(&mut self) -> bool {
        if !matches!(self.drag, DragState::Panning { .. }) {
            return false;
        }
        self.drag = DragState::Idle;
        self.has_release_velocity()
    }

    // ---------------- Touch interpreter -----------------

    /// Classify a touch-start. Two points begin a pinch; a single point
    /// begins a pan only while magnified. Returns whether the event was
    /// claimed (the host suppresses the default action for claimed events).
    pub fn touch_start(&mut self, touches: &[(f64, f64)], time_ms: f64) -> bool {
        self.cancel_momentum();
        match touches {
            [a, b] => {
                self.drag = DragState::Pinching {
                    initial_distance: pinch_distance(*a, *b),
                    start_zoom: self.zoom,
                };
                true
            }
            [only] if self.zoom > MIN_ZOOM => {
                self.drag = DragState::Panning {
                    last_x: only.0,
                    last_y: only.1,
                    last_time_ms: time_ms,
                };
                true
            }
            _ => false,
        }
    }

    /// Two points while pinching adjust zoom only; a single point while
    /// panning follows the pan path.
    pub fn touch_move(
        &mut self,
        touches: &[(f64, f64)],
        time_ms: f64,
        container: ContainerSize,
    ) -> bool {
        match (touches, self.drag) {
            (
                [a, b],
                DragState::Pinching {
                    initial_distance,
                    start_zoom,
                },
            ) => {
                if initial_distance > 0.0 {
                    let ratio = pinch_distance(*a, *b) / initial_distance;
                    self.zoom = (start_zoom * ratio).clamp(MIN_ZOOM, MAX_ZOOM);
                }
                true
            }
            ([only], DragState::Panning { .. }) => {
                self.pan_move(only.0, only.1, time_ms, container)
            }
            _ => false,
        }
    }

    /// Handle lifted fingers. A pinch collapsing to one finger becomes a
    /// pan seeded from the remaining touch with no position jump; this
    /// handoff is not gated on zoom, unlike `touch_start`. Returns whether
    /// the host should start the momentum integrator.
    pub fn touch_end(&mut self, touches: &[(f64, f64)], time_ms: f64) -> bool {
        match (touches, self.drag) {
            ([remaining], DragState::Pinching { .. }) => {
                self.drag = DragState::Panning {
                    last_x: remaining.0,
                    last_y: remaining.1,
                    last_time_ms: time_ms,
                };
                false
            }
            ([], DragState::Panning { .. }) => {
                self.drag = DragState::Idle;
                self.has_release_velocity()
            }
            ([], _) => {
                self.drag = DragState::Idle;
                false
            }
            _ => false,
        }
    }

    // ---------------- Pan bound -----------------

    /// Clamp the offset so the magnified image's edges never separate from
    /// the container's edges: at zoom `z` each axis allows at most
    /// `size × (z − 1) / 2` pixels of travel either way.
    pub fn constrain_pan(&mut self, container: ContainerSize) {
        let max_x = container.width * (self.zoom - 1.0) / 2.0;
        let max_y = container.height * (self.zoom - 1.0) / 2.0;
        self.pan_x = self.pan_x.clamp(-max_x, max_x);
        self.pan_y = self.pan_y.clamp(-max_y, max_y);
    }

    // ---------------- Momentum integrator -----------------

    fn has_release_velocity(&self) -> bool {
        self.velocity_x.abs() >= MOMENTUM_CUTOFF || self.velocity_y.abs() >= MOMENTUM_CUTOFF
    }

    /// Arm the integrator from the release velocity. Slow releases start
    /// nothing.
    pub fn begin_momentum(&mut self) -> bool {
        if !self.has_release_velocity() {
            return false;
        }
        self.momentum_active = true;
        true
    }

    /// One decay step: velocity shrinks by the friction factor, the offset
    /// absorbs it, the bound re-applies. Returns whether another step is
    /// due; on termination the integrator clears its own flag.
    pub fn momentum_step(&mut self, container: ContainerSize) -> bool {
        if !self.momentum_active {
            return false;
        }
        self.velocity_x *= PAN_FRICTION;
        self.velocity_y *= PAN_FRICTION;
        self.pan_x += self.velocity_x;
        self.pan_y += self.velocity_y;
        self.constrain_pan(container);
        if self.velocity_x.abs() > MOMENTUM_CUTOFF || self.velocity_y.abs() > MOMENTUM_CUTOFF {
            true
        } else {
            self.momentum_active = false;
            false
        }
    }

    pub fn cancel_momentum(&mut self) {
        self.momentum_active = false;
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
    }

    pub fn momentum_active(&self) -> bool {
        self.momentum_active
    }

    // ---------------- Rendering -----------------

    /// CSS transform for the image element. Idempotent: a pure function of
    /// the current zoom and offset.
    pub fn transform(&self) -> String {
        format!(
            "scale({}) translate({}px, {}px)",
            self.zoom, self.pan_x, self.pan_y
        )
    }

    pub fn is_magnified(&self) -> bool {
        self.zoom > MIN_ZOOM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: ContainerSize = ContainerSize {
        width: 800.0,
        height: 600.0,
    };

    fn open_session() -> ViewerSession {
        let mut s = ViewerSession::default();
        assert!(s.open(0, 3));
        s
    }

    /// Open and wheel in until zoom sits at (floating-point) 2.0.
    fn magnified_session() -> ViewerSession {
        let mut s = open_session();
        for _ in 0..5 {
            s.wheel_zoom(-1.0);
        }
        assert!((s.zoom - 2.0).abs() < 1e-9);
        s
    }

    #[test]
    fn open_rejects_out_of_range_index() {
        let mut s = ViewerSession::default();
        assert!(!s.open(3, 3));
        assert!(!s.is_open());
        assert!(s.open(2, 3));
        assert_eq!(s.current_index, Some(2));
    }

    #[test]
    fn wheel_zoom_saturates_at_both_bounds() {
        let mut s = open_session();
        for _ in 0..40 {
            s.wheel_zoom(-1.0);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&s.zoom));
        }
        assert_eq!(s.zoom, MAX_ZOOM);
        for _ in 0..40 {
            s.wheel_zoom(1.0);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&s.zoom));
        }
        assert_eq!(s.zoom, MIN_ZOOM);
    }

    #[test]
    fn first_zoom_in_lands_on_one_point_two() {
        let mut s = open_session();
        s.wheel_zoom(-1.0);
        assert!((s.zoom - 1.2).abs() < 1e-12);
        assert_eq!((s.pan_x, s.pan_y), (0.0, 0.0));
    }

    #[test]
    fn wheel_zoom_is_ignored_while_closed() {
        let mut s = ViewerSession::default();
        s.wheel_zoom(-1.0);
        assert_eq!(s.zoom, MIN_ZOOM);
    }

    #[test]
    fn zoom_out_to_minimum_clears_pan() {
        let mut s = magnified_session();
        assert!(s.pan_start(100.0, 100.0, 0.0));
        assert!(s.pan_move(150.0, 130.0, 16.0, BOUNDS));
        s.pan_end();
        assert_ne!((s.pan_x, s.pan_y), (0.0, 0.0));
        for _ in 0..10 {
            s.wheel_zoom(1.0);
        }
        assert_eq!(s.zoom, MIN_ZOOM);
        assert_eq!((s.pan_x, s.pan_y), (0.0, 0.0));
    }

    #[test]
    fn pan_requires_magnification() {
        let mut s = open_session();
        assert_eq!(s.zoom, MIN_ZOOM);
        assert!(!s.pan_start(10.0, 10.0, 0.0));
        assert!(!s.touch_start(&[(10.0, 10.0)], 0.0));
        assert_eq!(s.drag, DragState::Idle);
    }

    #[test]
    fn pan_stays_within_container_bounds() {
        let mut s = magnified_session();
        let max_x = BOUNDS.width * (s.zoom - 1.0) / 2.0;
        let max_y = BOUNDS.height * (s.zoom - 1.0) / 2.0;
        assert!(s.pan_start(0.0, 0.0, 0.0));
        s.pan_move(10_000.0, -10_000.0, 16.0, BOUNDS);
        assert_eq!(s.pan_x, max_x);
        assert_eq!(s.pan_y, -max_y);
        s.pan_move(-30_000.0, 30_000.0, 32.0, BOUNDS);
        assert_eq!(s.pan_x, -max_x);
        assert_eq!(s.pan_y, max_y);
    }

    #[test]
    fn zero_elapsed_sample_keeps_prior_velocity() {
        let mut s = magnified_session();
        assert!(s.pan_start(0.0, 0.0, 100.0));
        s.pan_move(10.0, 0.0, 110.0, BOUNDS);
        assert_eq!(s.velocity_x, 1.0);
        // Same timestamp again: the offset still moves, the velocity holds.
        s.pan_move(30.0, 0.0, 110.0, BOUNDS);
        assert_eq!(s.velocity_x, 1.0);
        assert_eq!(s.pan_x, 30.0);
    }

    #[test]
    fn new_drag_cancels_running_momentum() {
        let mut s = magnified_session();
        assert!(s.pan_start(0.0, 0.0, 0.0));
        s.pan_move(40.0, 0.0, 10.0, BOUNDS);
        assert!(s.pan_end());
        assert!(s.begin_momentum());
        assert!(s.momentum_step(BOUNDS));
        let pan_after_cancel = s.pan_x;
        assert!(s.pan_start(0.0, 0.0, 20.0));
        assert!(!s.momentum_active());
        assert_eq!((s.velocity_x, s.velocity_y), (0.0, 0.0));
        // A step scheduled before the cancellation lands as a no-op.
        assert!(!s.momentum_step(BOUNDS));
        assert_eq!(s.pan_x, pan_after_cancel);
        // Releasing without moving must not resume the old motion.
        assert!(!s.pan_end());
    }

    #[test]
    fn wheel_zoom_cancels_running_momentum() {
        let mut s = magnified_session();
        assert!(s.pan_start(0.0, 0.0, 0.0));
        s.pan_move(40.0, 0.0, 10.0, BOUNDS);
        assert!(s.pan_end());
        assert!(s.begin_momentum());
        s.wheel_zoom(-1.0);
        assert!(!s.momentum_active());
        assert!(!s.momentum_step(BOUNDS));
    }

    #[test]
    fn navigation_is_idempotent_at_boundaries() {
        let mut s = ViewerSession::default();
        assert!(s.open(0, 3));
        assert!(!s.previous());
        assert_eq!(s.current_index, Some(0));
        assert!(s.open(2, 3));
        assert!(!s.next());
        assert_eq!(s.current_index, Some(2));
    }

    #[test]
    fn three_image_walkthrough_updates_button_states() {
        let mut s = ViewerSession::default();
        assert!(s.open(1, 3));
        assert_eq!(s.current_index, Some(1));
        assert!(!s.at_first());
        assert!(!s.at_last());
        assert!(s.next());
        assert_eq!(s.current_index, Some(2));
        assert!(s.at_last());
        assert!(!s.at_first());
        assert!(!s.next());
        assert_eq!(s.current_index, Some(2));
    }

    #[test]
    fn navigation_resets_zoom_and_pan() {
        let mut s = magnified_session();
        assert!(s.pan_start(0.0, 0.0, 0.0));
        s.pan_move(50.0, 20.0, 16.0, BOUNDS);
        assert!(s.next());
        assert_eq!(s.zoom, MIN_ZOOM);
        assert_eq!((s.pan_x, s.pan_y), (0.0, 0.0));
        assert_eq!(s.drag, DragState::Idle);
        assert!(!s.momentum_active());
    }

    #[test]
    fn pinch_zoom_follows_distance_ratio_and_clamps() {
        let mut s = open_session();
        assert!(s.touch_start(&[(0.0, 0.0), (100.0, 0.0)], 0.0));
        s.touch_move(&[(0.0, 0.0), (150.0, 0.0)], 16.0, BOUNDS);
        assert!((s.zoom - 1.5).abs() < 1e-12);
        // Spreading far past the range saturates at the ceiling.
        s.touch_move(&[(0.0, 0.0), (1_000.0, 0.0)], 32.0, BOUNDS);
        assert_eq!(s.zoom, MAX_ZOOM);
        s.touch_move(&[(0.0, 0.0), (10.0, 0.0)], 48.0, BOUNDS);
        assert_eq!(s.zoom, MIN_ZOOM);
    }

    #[test]
    fn pinch_handoff_preserves_zoom_and_reference_point() {
        let mut s = open_session();
        assert!(s.touch_start(&[(0.0, 0.0), (100.0, 0.0)], 0.0));
        s.touch_move(&[(0.0, 0.0), (200.0, 0.0)], 16.0, BOUNDS);
        let zoom_before = s.zoom;
        assert_eq!(zoom_before, 2.0);
        // One finger lifts; the other sits at (200, 0).
        assert!(!s.touch_end(&[(200.0, 0.0)], 32.0));
        assert_eq!(s.zoom, zoom_before);
        assert_eq!(
            s.drag,
            DragState::Panning {
                last_x: 200.0,
                last_y: 0.0,
                last_time_ms: 32.0
            }
        );
        // The next move is measured against the remaining finger, so a
        // 10px slide pans exactly 10px.
        s.touch_move(&[(210.0, 0.0)], 48.0, BOUNDS);
        assert_eq!(s.pan_x, 10.0);
    }

    #[test]
    fn pinch_release_without_pan_gives_no_momentum() {
        let mut s = open_session();
        assert!(s.touch_start(&[(0.0, 0.0), (100.0, 0.0)], 0.0));
        // Both fingers lift at once.
        assert!(!s.touch_end(&[], 16.0));
        assert_eq!(s.drag, DragState::Idle);
        assert!(!s.momentum_active());
    }

    #[test]
    fn momentum_run_is_finite_deterministic_and_bounded() {
        let run = || {
            let mut s = magnified_session();
            s.velocity_x = 2.0;
            s.velocity_y = 0.0;
            assert!(s.begin_momentum());
            let mut steps = 0;
            while s.momentum_step(BOUNDS) {
                steps += 1;
                assert!(steps < 1_000, "momentum failed to terminate");
            }
            (steps, s.pan_x, s.momentum_active())
        };
        let (steps_a, pan_a, active_a) = run();
        let (steps_b, pan_b, _) = run();
        assert_eq!((steps_a, pan_a), (steps_b, pan_b));
        assert!(!active_a);
        let max_x = BOUNDS.width * (2.0 - 1.0) / 2.0;
        assert!(pan_a > 0.0 && pan_a <= max_x);
    }

    #[test]
    fn slow_release_starts_no_momentum() {
        let mut s = magnified_session();
        s.velocity_x = 0.05;
        s.velocity_y = -0.05;
        assert!(!s.begin_momentum());
        assert!(!s.momentum_step(BOUNDS));
    }

    #[test]
    fn momentum_respects_bounds_mid_flight() {
        let mut s = magnified_session();
        let max_x = BOUNDS.width * (s.zoom - 1.0) / 2.0;
        s.velocity_x = 300.0;
        assert!(s.begin_momentum());
        while s.momentum_step(BOUNDS) {
            assert!(s.pan_x.abs() <= max_x);
        }
        assert!(s.pan_x.abs() <= max_x);
    }

    #[test]
    fn close_during_momentum_freezes_state() {
        let mut s = magnified_session();
        s.velocity_x = 2.0;
        assert!(s.begin_momentum());
        assert!(s.momentum_step(BOUNDS));
        s.close();
        assert!(!s.is_open());
        assert_eq!(s.zoom, MIN_ZOOM);
        assert_eq!((s.pan_x, s.pan_y), (0.0, 0.0));
        // Steps still scheduled at close time change nothing.
        assert!(!s.momentum_step(BOUNDS));
        assert_eq!((s.pan_x, s.pan_y), (0.0, 0.0));
        assert_eq!((s.velocity_x, s.velocity_y), (0.0, 0.0));
    }

    #[test]
    fn transform_reflects_zoom_and_offset() {
        let mut s = open_session();
        s.zoom = 2.0;
        s.pan_x = 12.5;
        s.pan_y = -4.0;
        assert_eq!(s.transform(), "scale(2) translate(12.5px, -4px)");
        assert!(s.is_magnified());
        let closed = ViewerSession::default();
        assert_eq!(closed.transform(), "scale(1) translate(0px, 0px)");
        assert!(!closed.is_magnified());
    }
}
