//! Compositor state-machine properties.
//!
//! Drives the compositor with arbitrary operation sequences and checks the
//! log and mode invariants hold after every step.

use booth_core::{Compositor, ImageSource, Mode, Point, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    BeginDraw,
    Down(f32, f32),
    Move(f32, f32),
    Up,
    ArmStamp(usize),
    ArmText(String),
    Brush(u8, f32),
    Image,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::BeginDraw),
        (0.0f32..300.0, 0.0f32..150.0).prop_map(|(x, y)| Op::Down(x, y)),
        (0.0f32..300.0, 0.0f32..150.0).prop_map(|(x, y)| Op::Move(x, y)),
        Just(Op::Up),
        (0usize..5).prop_map(Op::ArmStamp),
        "[ a-z]{0,6}".prop_map(Op::ArmText),
        (any::<u8>(), -10.0f32..40.0).prop_map(|(c, s)| Op::Brush(c, s)),
        Just(Op::Image),
    ]
}

fn apply(compositor: &mut Compositor, op: &Op) {
    let _ = match op {
        Op::BeginDraw => compositor.begin_draw(),
        Op::Down(x, y) => compositor.pointer_down(Point::new(*x, *y)),
        Op::Move(x, y) => compositor.pointer_move(Point::new(*x, *y)),
        Op::Up => compositor.pointer_up(),
        Op::ArmStamp(i) => compositor.arm_stamp(booth_core::STAMP_PALETTE[*i].glyph),
        Op::ArmText(text) => compositor.arm_text(text),
        Op::Brush(c, s) => compositor.set_brush(&format!("#{c:02x}{c:02x}{c:02x}"), *s),
        Op::Image => compositor.set_base_image(ImageSource::new("photo.png")),
    };
}

proptest! {
    #[test]
    fn logs_are_append_only(ops in prop::collection::vec(op(), 0..60)) {
        let mut compositor = Compositor::new();
        for op in &ops {
            let before = compositor.state().clone();
            apply(&mut compositor, op);
            let after = compositor.state();

            prop_assert!(after.strokes().starts_with(before.strokes()));
            prop_assert!(after.stamps().starts_with(before.stamps()));
            if !matches!(op, Op::Image) {
                prop_assert!(after.texts().starts_with(before.texts()));
            }
        }
    }

    #[test]
    fn recorded_strokes_respect_brush_range(ops in prop::collection::vec(op(), 0..60)) {
        let mut compositor = Compositor::new();
        for op in &ops {
            apply(&mut compositor, op);
        }
        for stroke in compositor.state().strokes() {
            prop_assert!(stroke.size >= MIN_BRUSH_SIZE && stroke.size <= MAX_BRUSH_SIZE);
        }
        let brush = compositor.state().brush();
        prop_assert!(brush.size >= MIN_BRUSH_SIZE && brush.size <= MAX_BRUSH_SIZE);
    }

    #[test]
    fn mode_matches_pending_input(ops in prop::collection::vec(op(), 0..60)) {
        let mut compositor = Compositor::new();
        for op in &ops {
            apply(&mut compositor, op);
            let state = compositor.state();
            match state.mode() {
                Mode::PlacingStamp => prop_assert!(state.pending_glyph().is_some()),
                Mode::PlacingText => prop_assert!(state.pending_text().is_some()),
                Mode::Idle | Mode::Drawing => {
                    prop_assert!(state.pending_glyph().is_none());
                    prop_assert!(state.pending_text().is_none());
                }
            }
            if state.anchor().is_some() {
                prop_assert_eq!(state.mode(), Mode::Drawing);
            }
        }
    }

    #[test]
    fn up_always_leaves_drawing(ops in prop::collection::vec(op(), 0..40)) {
        let mut compositor = Compositor::new();
        for op in &ops {
            apply(&mut compositor, op);
        }
        let _ = compositor.pointer_up();
        prop_assert_ne!(compositor.mode(), Mode::Drawing);
        prop_assert!(compositor.state().anchor().is_none());
    }
}

#[test]
fn reset_returns_to_initial_state() {
    let mut compositor = Compositor::new();
    let _ = compositor.set_base_image(ImageSource::new("photo.png"));
    let _ = compositor.arm_stamp("\u{2b50}");
    let _ = compositor.pointer_down(Point::new(1.0, 1.0));
    let _ = compositor.reset();
    assert_eq!(compositor.state(), Compositor::new().state());
}
