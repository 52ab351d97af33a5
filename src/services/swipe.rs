//! Drag-to-decide gesture machine. Mouse and touch input both normalize to
//! `Point` samples before they get here; the machine turns a continuous drag
//! into a discrete pass/connect commit with cancellable visual feedback.

/// Horizontal release distance (px) past which a drag commits. Exclusive:
/// a release at exactly the threshold snaps back.
pub const COMMIT_THRESHOLD: f64 = 100.0;

/// Cosmetic tilt factor, degrees per horizontal pixel. Not physically
/// derived.
pub const ROTATION_FACTOR: f64 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Release outcome. `Right` is a connect intent, `Left` a pass intent; a
/// sub-threshold release is a plain snap back, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Commit(SwipeDirection),
    SnapBack,
}

/// One coalesced visual update. `animate` is false while the card tracks the
/// pointer (instant snap) and true for the release transition back to rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualFrame {
    pub offset: Point,
    pub rotation_deg: f64,
    pub animate: bool,
}

impl VisualFrame {
    fn at_rest(animate: bool) -> Self {
        VisualFrame {
            offset: Point::default(),
            rotation_deg: 0.0,
            animate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging { origin: Point, offset: Point },
}

/// States: Idle -> Dragging -> Idle (commit or snap back).
///
/// While Dragging the machine holds the global input capture (`capturing()`),
/// released on every exit path including teardown. Visual updates go through
/// a single pending slot: a new move sample supersedes an unconsumed frame,
/// so fast pointer sampling can never build a backlog.
#[derive(Debug)]
pub struct SwipeMachine {
    state: DragState,
    pending: Option<VisualFrame>,
}

impl Default for SwipeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SwipeMachine {
    pub fn new() -> Self {
        SwipeMachine {
            state: DragState::Idle,
            pending: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// True while global move/up listeners must be attached: the pointer may
    /// leave the card's bounds mid-drag.
    pub fn capturing(&self) -> bool {
        self.is_dragging()
    }

    /// Pointer/touch down. A second contact while already dragging is
    /// ignored (first touch wins).
    pub fn start(&mut self, point: Point) {
        if self.is_dragging() {
            return;
        }
        self.state = DragState::Dragging {
            origin: point,
            offset: Point::default(),
        };
    }

    /// Move sample. Replaces any unconsumed pending frame.
    pub fn move_to(&mut self, point: Point) {
        let DragState::Dragging { origin, .. } = self.state else {
            return;
        };
        let offset = Point::new(point.x - origin.x, point.y - origin.y);
        self.state = DragState::Dragging { origin, offset };
        self.pending = Some(VisualFrame {
            offset,
            rotation_deg: offset.x * ROTATION_FACTOR,
            animate: false,
        });
    }

    /// Pointer/touch up. Always returns to Idle and schedules an animated
    /// reset frame; commits only past the (exclusive) threshold.
    pub fn end(&mut self) -> SwipeOutcome {
        let DragState::Dragging { offset, .. } = self.state else {
            return SwipeOutcome::SnapBack;
        };
        self.state = DragState::Idle;
        self.pending = Some(VisualFrame::at_rest(true));

        if offset.x > COMMIT_THRESHOLD {
            SwipeOutcome::Commit(SwipeDirection::Right)
        } else if offset.x < -COMMIT_THRESHOLD {
            SwipeOutcome::Commit(SwipeDirection::Left)
        } else {
            SwipeOutcome::SnapBack
        }
    }

    /// Animation-tick consumer for the coalesced slot.
    pub fn take_frame(&mut self) -> Option<VisualFrame> {
        self.pending.take()
    }

    /// Disposal: drop the drag, release capture and cancel the pending frame
    /// so nothing runs after teardown.
    pub fn teardown(&mut self) {
        self.state = DragState::Idle;
        self.pending = None;
    }

    /// Convenience for replaying a completed gesture (origin-relative release
    /// offset) through the machine, e.g. from a reported drag end.
    pub fn replay_release(dx: f64, dy: f64) -> SwipeOutcome {
        let mut machine = SwipeMachine::new();
        machine.start(Point::default());
        machine.move_to(Point::new(dx, dy));
        machine.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive_on_both_sides() {
        assert_eq!(
            SwipeMachine::replay_release(101.0, 0.0),
            SwipeOutcome::Commit(SwipeDirection::Right)
        );
        assert_eq!(SwipeMachine::replay_release(100.0, 0.0), SwipeOutcome::SnapBack);
        assert_eq!(SwipeMachine::replay_release(-100.0, 0.0), SwipeOutcome::SnapBack);
        assert_eq!(
            SwipeMachine::replay_release(-150.0, 0.0),
            SwipeOutcome::Commit(SwipeDirection::Left)
        );
    }

    #[test]
    fn drag_to_150_10_rotates_12_degrees_and_commits_right() {
        let mut m = SwipeMachine::new();
        m.start(Point::new(0.0, 0.0));
        m.move_to(Point::new(150.0, 10.0));

        let frame = m.take_frame().unwrap();
        assert_eq!(frame.offset, Point::new(150.0, 10.0));
        assert!((frame.rotation_deg - 12.0).abs() < 1e-9);
        assert!(!frame.animate);

        assert_eq!(m.end(), SwipeOutcome::Commit(SwipeDirection::Right));
    }

    #[test]
    fn moves_supersede_instead_of_queueing() {
        let mut m = SwipeMachine::new();
        m.start(Point::default());
        m.move_to(Point::new(10.0, 0.0));
        m.move_to(Point::new(40.0, 5.0));
        m.move_to(Point::new(90.0, 9.0));

        // Only the latest sample survives in the slot.
        let frame = m.take_frame().unwrap();
        assert_eq!(frame.offset, Point::new(90.0, 9.0));
        assert_eq!(m.take_frame(), None);
    }

    #[test]
    fn offset_is_relative_to_origin() {
        let mut m = SwipeMachine::new();
        m.start(Point::new(200.0, 300.0));
        m.move_to(Point::new(320.0, 305.0));
        assert_eq!(m.end(), SwipeOutcome::Commit(SwipeDirection::Right));
    }

    #[test]
    fn release_schedules_animated_reset_and_drops_capture() {
        let mut m = SwipeMachine::new();
        m.start(Point::default());
        assert!(m.capturing());
        m.move_to(Point::new(30.0, 0.0));
        m.take_frame();

        assert_eq!(m.end(), SwipeOutcome::SnapBack);
        assert!(!m.capturing());
        let reset = m.take_frame().unwrap();
        assert_eq!(reset, VisualFrame::at_rest(true));
    }

    #[test]
    fn second_contact_is_ignored() {
        let mut m = SwipeMachine::new();
        m.start(Point::new(0.0, 0.0));
        m.move_to(Point::new(120.0, 0.0));
        // Second finger lands; the drag keeps its original origin.
        m.start(Point::new(500.0, 500.0));
        assert_eq!(m.end(), SwipeOutcome::Commit(SwipeDirection::Right));
    }

    #[test]
    fn moves_and_end_without_start_are_noops() {
        let mut m = SwipeMachine::new();
        m.move_to(Point::new(500.0, 0.0));
        assert_eq!(m.take_frame(), None);
        assert_eq!(m.end(), SwipeOutcome::SnapBack);
    }

    #[test]
    fn teardown_cancels_pending_frame_and_capture() {
        let mut m = SwipeMachine::new();
        m.start(Point::default());
        m.move_to(Point::new(50.0, 0.0));
        m.teardown();
        assert!(!m.capturing());
        assert_eq!(m.take_frame(), None);
    }
}
