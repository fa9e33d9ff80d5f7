use std::time::Duration;

/// Fraction of the viewport width a drag must exceed to commit.
pub const SWIPE_THRESHOLD_RATIO: f64 = 0.25;
/// Fraction of the viewport width the card travels when it leaves.
pub const EXIT_DISTANCE_RATIO: f64 = 1.5;
pub const MAX_ROTATION_DEGREES: f64 = 20.0;
pub const COMMIT_DURATION: Duration = Duration::from_millis(250);

// Spring back to rest, tension 40 / friction 4 in origami units.
const SPRING_STIFFNESS: f64 = (40.0 - 30.0) * 3.62 + 194.0;
const SPRING_DAMPING: f64 = (4.0 - 8.0) * 3.0 + 25.0;
const SPRING_MASS: f64 = 1.0;
const SPRING_STEP: f64 = 0.001;
const REST_DISPLACEMENT: f64 = 0.01;
const REST_SPEED: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Card left to the right: show a new word.
    Forward,
    /// Card left to the left: go back to the previous word.
    Backward,
}

/// What a drag release resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    Commit(SwipeOutcome),
    Cancel,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SwipePhase {
    Idle,
    Dragging,
    AnimatingCommit(CommitTween),
    AnimatingCancel(Spring),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommitTween {
    pub outcome: SwipeOutcome,
    from: f64,
    to: f64,
    elapsed: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    velocity: f64,
    carry: f64,
}

/// Commit-or-cancel decision for a drag released at `dx`.
pub fn resolve_release(dx: f64, threshold: f64) -> Release {
    let dx = sanitize(dx);
    if dx > threshold {
        Release::Commit(SwipeOutcome::Forward)
    } else if dx < -threshold {
        Release::Commit(SwipeOutcome::Backward)
    } else {
        Release::Cancel
    }
}

/// Linear map of `x` from `input` to `output`, clamped at both ends.
/// A collapsed input range steps at its single point, with the midpoint on it.
pub fn interpolate_clamped(x: f64, input: (f64, f64), output: (f64, f64)) -> f64 {
    let (in_lo, in_hi) = input;
    if in_hi == in_lo {
        return if x < in_lo {
            output.0
        } else if x > in_hi {
            output.1
        } else {
            (output.0 + output.1) / 2.0
        };
    }
    let t = ((x - in_lo) / (in_hi - in_lo)).clamp(0.0, 1.0);
    output.0 + (output.1 - output.0) * t
}

fn sanitize(dx: f64) -> f64 {
    if dx.is_finite() { dx } else { 0.0 }
}

/// Symmetric ease-in-out built from the cubic bezier (0.42, 0, 1, 1).
fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        ease(t * 2.0) / 2.0
    } else {
        1.0 - ease((1.0 - t) * 2.0) / 2.0
    }
}

fn ease(x: f64) -> f64 {
    const X1: f64 = 0.42;
    const X2: f64 = 1.0;
    let bezier = |p1: f64, p2: f64, s: f64| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    };
    // x(s) is monotonic, bisect for the curve parameter.
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..30 {
        let mid = (lo + hi) / 2.0;
        if bezier(X1, X2, mid) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let s = (lo + hi) / 2.0;
    bezier(0.0, 1.0, s)
}

/// Drives one card's horizontal position through drags and animations.
///
/// Displacement is in the same unit as the viewport width (terminal columns
/// in the app). A new drag or commit is only accepted once any running
/// animation has finished and the card is back at rest.
#[derive(Clone, Debug)]
pub struct SwipeController {
    viewport_width: f64,
    dx: f64,
    phase: SwipePhase,
}

impl SwipeController {
    pub fn new(viewport_width: f64) -> Self {
        Self {
            viewport_width: sanitize(viewport_width).max(0.0),
            dx: 0.0,
            phase: SwipePhase::Idle,
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = sanitize(width).max(0.0);
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn threshold(&self) -> f64 {
        self.viewport_width * SWIPE_THRESHOLD_RATIO
    }

    pub fn displacement(&self) -> f64 {
        self.dx
    }

    pub fn phase(&self) -> &SwipePhase {
        &self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            SwipePhase::AnimatingCommit(_) | SwipePhase::AnimatingCancel(_)
        )
    }

    pub fn rotation_degrees(&self) -> f64 {
        let reach = self.viewport_width * EXIT_DISTANCE_RATIO;
        interpolate_clamped(
            self.dx,
            (-reach, reach),
            (-MAX_ROTATION_DEGREES, MAX_ROTATION_DEGREES),
        )
    }

    /// Visibility of the "new word" hint, 0 at rest and 1 at the threshold.
    pub fn forward_overlay_opacity(&self) -> f64 {
        if self.threshold() <= 0.0 {
            return 0.0;
        }
        interpolate_clamped(self.dx, (0.0, self.threshold()), (0.0, 1.0))
    }

    /// Visibility of the "previous" hint, mirrored for leftward drags.
    pub fn backward_overlay_opacity(&self) -> f64 {
        if self.threshold() <= 0.0 {
            return 0.0;
        }
        interpolate_clamped(self.dx, (-self.threshold(), 0.0), (1.0, 0.0))
    }

    /// Follow the pointer. Returns false while an animation owns the card.
    pub fn on_drag_update(&mut self, dx: f64) -> bool {
        if self.is_animating() {
            return false;
        }
        self.dx = sanitize(dx);
        self.phase = SwipePhase::Dragging;
        true
    }

    /// Release the card at `dx` and start the animation it resolves to.
    pub fn on_drag_end(&mut self, dx: f64) -> Option<Release> {
        if self.phase != SwipePhase::Dragging {
            return None;
        }
        self.dx = sanitize(dx);
        let release = resolve_release(self.dx, self.threshold());
        match release {
            Release::Commit(outcome) => {
                self.start_commit(outcome);
            }
            Release::Cancel => self.start_cancel(),
        }
        Some(release)
    }

    pub fn commit_forward(&mut self) -> bool {
        self.start_commit(SwipeOutcome::Forward)
    }

    pub fn commit_backward(&mut self) -> bool {
        self.start_commit(SwipeOutcome::Backward)
    }

    /// Spring the card back to rest.
    pub fn cancel(&mut self) -> bool {
        if self.is_animating() {
            return false;
        }
        self.start_cancel();
        true
    }

    /// Step any running animation by `dt`. Returns the outcome once, when a
    /// commit animation finishes; the card is back at zero by then.
    pub fn advance(&mut self, dt: Duration) -> Option<SwipeOutcome> {
        match &mut self.phase {
            SwipePhase::Idle | SwipePhase::Dragging => None,
            SwipePhase::AnimatingCommit(tween) => {
                tween.elapsed = (tween.elapsed + dt).min(COMMIT_DURATION);
                let progress = tween.elapsed.as_secs_f64() / COMMIT_DURATION.as_secs_f64();
                self.dx = tween.from + (tween.to - tween.from) * ease_in_out(progress);
                if tween.elapsed < COMMIT_DURATION {
                    return None;
                }
                let outcome = tween.outcome;
                self.reset();
                Some(outcome)
            }
            SwipePhase::AnimatingCancel(spring) => {
                let mut remaining = spring.carry + dt.as_secs_f64();
                while remaining >= SPRING_STEP {
                    let force = -SPRING_STIFFNESS * self.dx - SPRING_DAMPING * spring.velocity;
                    spring.velocity += force / SPRING_MASS * SPRING_STEP;
                    self.dx += spring.velocity * SPRING_STEP;
                    remaining -= SPRING_STEP;
                    if self.dx.abs() < REST_DISPLACEMENT && spring.velocity.abs() < REST_SPEED {
                        self.reset();
                        return None;
                    }
                }
                spring.carry = remaining;
                None
            }
        }
    }

    fn start_commit(&mut self, outcome: SwipeOutcome) -> bool {
        if self.is_animating() {
            return false;
        }
        let reach = self.viewport_width * EXIT_DISTANCE_RATIO;
        let to = match outcome {
            SwipeOutcome::Forward => reach,
            SwipeOutcome::Backward => -reach,
        };
        self.phase = SwipePhase::AnimatingCommit(CommitTween {
            outcome,
            from: self.dx,
            to,
            elapsed: Duration::ZERO,
        });
        true
    }

    fn start_cancel(&mut self) {
        self.phase = SwipePhase::AnimatingCancel(Spring {
            velocity: 0.0,
            carry: 0.0,
        });
    }

    fn reset(&mut self) {
        self.dx = 0.0;
        self.phase = SwipePhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 100.0;
    const FRAME: Duration = Duration::from_millis(16);

    fn run_until_idle(swipe: &mut SwipeController) -> Vec<SwipeOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..1000 {
            if let Some(outcome) = swipe.advance(FRAME) {
                outcomes.push(outcome);
            }
            if swipe.phase() == &SwipePhase::Idle {
                break;
            }
        }
        outcomes
    }

    #[test]
    fn test_release_decision_thresholds() {
        let threshold = WIDTH * SWIPE_THRESHOLD_RATIO;
        assert_eq!(
            resolve_release(25.1, threshold),
            Release::Commit(SwipeOutcome::Forward)
        );
        assert_eq!(
            resolve_release(-25.1, threshold),
            Release::Commit(SwipeOutcome::Backward)
        );
        assert_eq!(resolve_release(25.0, threshold), Release::Cancel);
        assert_eq!(resolve_release(-25.0, threshold), Release::Cancel);
        assert_eq!(resolve_release(0.0, threshold), Release::Cancel);
        assert_eq!(resolve_release(f64::INFINITY, threshold), Release::Cancel);
        assert_eq!(resolve_release(f64::NAN, threshold), Release::Cancel);
    }

    #[test]
    fn test_rotation_is_clamped_and_monotonic() {
        let mut swipe = SwipeController::new(WIDTH);
        let mut last = f64::NEG_INFINITY;
        for step in -300..=300 {
            swipe.on_drag_update(step as f64);
            let rotation = swipe.rotation_degrees();
            assert!(rotation >= last);
            last = rotation;
        }

        swipe.on_drag_update(-150.0);
        assert_eq!(swipe.rotation_degrees(), -20.0);
        swipe.on_drag_update(0.0);
        assert_eq!(swipe.rotation_degrees(), 0.0);
        swipe.on_drag_update(150.0);
        assert_eq!(swipe.rotation_degrees(), 20.0);
        swipe.on_drag_update(75.0);
        assert!((swipe.rotation_degrees() - 10.0).abs() < 1e-9);
        swipe.on_drag_update(900.0);
        assert_eq!(swipe.rotation_degrees(), 20.0);
        swipe.on_drag_update(-900.0);
        assert_eq!(swipe.rotation_degrees(), -20.0);
    }

    #[test]
    fn test_overlay_opacity_ramps_to_threshold() {
        let mut swipe = SwipeController::new(WIDTH);
        assert_eq!(swipe.forward_overlay_opacity(), 0.0);
        assert_eq!(swipe.backward_overlay_opacity(), 0.0);

        swipe.on_drag_update(12.5);
        assert!((swipe.forward_overlay_opacity() - 0.5).abs() < 1e-9);
        assert_eq!(swipe.backward_overlay_opacity(), 0.0);

        swipe.on_drag_update(40.0);
        assert_eq!(swipe.forward_overlay_opacity(), 1.0);

        swipe.on_drag_update(-25.0);
        assert_eq!(swipe.forward_overlay_opacity(), 0.0);
        assert_eq!(swipe.backward_overlay_opacity(), 1.0);
    }

    #[test]
    fn test_non_finite_drag_is_zero() {
        let mut swipe = SwipeController::new(WIDTH);
        assert!(swipe.on_drag_update(f64::NAN));
        assert_eq!(swipe.displacement(), 0.0);
        assert_eq!(swipe.rotation_degrees(), 0.0);
    }

    #[test]
    fn test_forward_drag_commits_and_resets() {
        let mut swipe = SwipeController::new(WIDTH);
        swipe.on_drag_update(40.0);
        assert_eq!(
            swipe.on_drag_end(40.0),
            Some(Release::Commit(SwipeOutcome::Forward))
        );
        assert!(swipe.is_animating());

        assert_eq!(swipe.advance(Duration::from_millis(100)), None);
        assert!(swipe.displacement() > 40.0);
        assert!(swipe.displacement() < 150.0);

        assert_eq!(
            swipe.advance(Duration::from_millis(150)),
            Some(SwipeOutcome::Forward)
        );
        assert_eq!(swipe.displacement(), 0.0);
        assert_eq!(swipe.phase(), &SwipePhase::Idle);
        assert_eq!(swipe.advance(FRAME), None);
    }

    #[test]
    fn test_backward_drag_commits_once() {
        let mut swipe = SwipeController::new(WIDTH);
        swipe.on_drag_update(-30.0);
        swipe.on_drag_end(-30.0);
        assert_eq!(run_until_idle(&mut swipe), vec![SwipeOutcome::Backward]);
        assert_eq!(swipe.displacement(), 0.0);
    }

    #[test]
    fn test_short_drag_springs_back() {
        let mut swipe = SwipeController::new(WIDTH);
        swipe.on_drag_update(20.0);
        assert_eq!(swipe.on_drag_end(20.0), Some(Release::Cancel));
        assert!(matches!(swipe.phase(), SwipePhase::AnimatingCancel(_)));

        let mut crossed_zero = false;
        for _ in 0..500 {
            swipe.advance(FRAME);
            if swipe.displacement() < 0.0 {
                crossed_zero = true;
            }
            if swipe.phase() == &SwipePhase::Idle {
                break;
            }
        }
        assert!(crossed_zero, "spring should overshoot past rest");
        assert_eq!(swipe.phase(), &SwipePhase::Idle);
        assert_eq!(swipe.displacement(), 0.0);
    }

    #[test]
    fn test_programmatic_commit_from_rest() {
        let mut swipe = SwipeController::new(WIDTH);
        assert!(swipe.commit_forward());
        assert_eq!(run_until_idle(&mut swipe), vec![SwipeOutcome::Forward]);

        assert!(swipe.commit_backward());
        assert_eq!(run_until_idle(&mut swipe), vec![SwipeOutcome::Backward]);
    }

    #[test]
    fn test_input_ignored_while_animating() {
        let mut swipe = SwipeController::new(WIDTH);
        swipe.commit_forward();
        swipe.advance(FRAME);
        let mid = swipe.displacement();

        assert!(!swipe.on_drag_update(-10.0));
        assert_eq!(swipe.on_drag_end(-10.0), None);
        assert!(!swipe.commit_backward());
        assert!(!swipe.cancel());
        assert_eq!(swipe.displacement(), mid);

        assert_eq!(run_until_idle(&mut swipe), vec![SwipeOutcome::Forward]);
        assert!(swipe.on_drag_update(-10.0));
    }

    #[test]
    fn test_drag_end_without_drag_is_ignored() {
        let mut swipe = SwipeController::new(WIDTH);
        assert_eq!(swipe.on_drag_end(80.0), None);
        assert_eq!(swipe.phase(), &SwipePhase::Idle);
    }

    #[test]
    fn test_zero_width_viewport_rests_without_overlays() {
        let mut swipe = SwipeController::new(0.0);
        assert_eq!(swipe.rotation_degrees(), 0.0);
        assert_eq!(swipe.forward_overlay_opacity(), 0.0);
        assert_eq!(swipe.backward_overlay_opacity(), 0.0);

        swipe.on_drag_update(-3.0);
        assert_eq!(swipe.rotation_degrees(), -20.0);
        assert_eq!(swipe.backward_overlay_opacity(), 0.0);

        assert_eq!(interpolate_clamped(0.0, (0.0, 0.0), (1.0, 0.0)), 0.5);
        assert_eq!(interpolate_clamped(-1.0, (0.0, 0.0), (1.0, 0.0)), 1.0);
        assert_eq!(interpolate_clamped(1.0, (0.0, 0.0), (1.0, 0.0)), 0.0);
    }

    #[test]
    fn test_threshold_follows_viewport() {
        let mut swipe = SwipeController::new(WIDTH);
        assert_eq!(swipe.threshold(), 25.0);
        swipe.set_viewport_width(40.0);
        assert_eq!(swipe.threshold(), 10.0);
        swipe.on_drag_update(11.0);
        assert_eq!(
            swipe.on_drag_end(11.0),
            Some(Release::Commit(SwipeOutcome::Forward))
        );
    }

    #[test]
    fn test_ease_endpoints() {
        assert!(ease_in_out(0.0).abs() < 1e-6);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!(ease_in_out(0.25) < 0.25);
    }
}
