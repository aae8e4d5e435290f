#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::NormPoint;

// =============================================================
// Helpers
// =============================================================

fn page() -> Option<Rect> {
    Some(Rect::new(0.0, 0.0, 100.0, 200.0))
}

fn annotating() -> StrokeRecorder {
    let mut r = StrokeRecorder::default();
    assert!(r.set_annotating(true).is_empty());
    r
}

fn ev(id: i32, x: f64, y: f64) -> PointerInput {
    PointerInput::primary(id, x, y)
}

fn completed(actions: &[Action]) -> Vec<&Stroke> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::StrokeCompleted(s) => Some(s),
            _ => None,
        })
        .collect()
}

// =============================================================
// Idle → Drawing
// =============================================================

#[test]
fn starts_idle_and_not_annotating() {
    let r = StrokeRecorder::default();
    assert!(r.state().is_idle());
    assert!(!r.is_annotating());
    assert!(r.in_progress().is_none());
}

#[test]
fn pointer_down_captures_and_starts_stroke() {
    let mut r = annotating();
    let actions = r.pointer_down(&ev(1, 50.0, 100.0), page());
    assert_eq!(actions, vec![Action::CapturePointer(1), Action::RenderNeeded]);
    assert!(r.state().is_drawing());
    assert_eq!(r.capture(), Some(CaptureToken { pointer_id: 1 }));

    let s = r.in_progress().unwrap();
    assert_eq!(s.points, vec![NormPoint::new(0.5, 0.5)]);
    assert_eq!(s.color, "#EF4444");
    assert_eq!(s.width, 2.0);
}

#[test]
fn pointer_down_uses_configured_style() {
    let config = OverlayConfig { stroke_color: "#00AA00".to_owned(), stroke_width: 5.0, ..Default::default() };
    let mut r = StrokeRecorder::new(&config);
    r.set_annotating(true);
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    let s = r.in_progress().unwrap();
    assert_eq!(s.color, "#00AA00");
    assert_eq!(s.width, 5.0);
}

#[test]
fn pointer_down_ignored_when_not_annotating() {
    let mut r = StrokeRecorder::default();
    assert!(r.pointer_down(&ev(1, 10.0, 10.0), page()).is_empty());
    assert!(r.state().is_idle());
}

#[test]
fn pointer_down_ignores_secondary_button() {
    let mut r = annotating();
    let input = PointerInput::new(1, crate::geom::Point::new(1.0, 1.0), Button::Secondary);
    assert!(r.pointer_down(&input, page()).is_empty());
    assert!(r.state().is_idle());
}

#[test]
fn second_pointer_down_while_drawing_is_ignored() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    assert!(r.pointer_down(&ev(2, 50.0, 50.0), page()).is_empty());
    assert_eq!(r.capture(), Some(CaptureToken { pointer_id: 1 }));
    assert_eq!(r.in_progress().unwrap().len(), 1);
}

#[test]
fn pointer_down_without_target_starts_at_origin() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 40.0, 40.0), None);
    assert_eq!(r.in_progress().unwrap().points[0], NormPoint::default());
}

// =============================================================
// Drawing → Drawing
// =============================================================

#[test]
fn pointer_move_appends_and_requests_render() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    assert_eq!(r.pointer_move(&ev(1, 100.0, 200.0), page()), vec![Action::RenderNeeded]);
    assert_eq!(r.in_progress().unwrap().points, vec![NormPoint::new(0.0, 0.0), NormPoint::new(1.0, 1.0)]);
}

#[test]
fn pointer_move_outside_page_clamps() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 50.0, 50.0), page());
    r.pointer_move(&ev(1, -30.0, 900.0), page());
    assert_eq!(r.in_progress().unwrap().points[1], NormPoint::new(0.0, 1.0));
}

#[test]
fn pointer_move_from_other_pointer_ignored() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    assert!(r.pointer_move(&ev(9, 10.0, 10.0), page()).is_empty());
    assert_eq!(r.in_progress().unwrap().len(), 1);
}

#[test]
fn pointer_move_while_idle_ignored() {
    let mut r = annotating();
    assert!(r.pointer_move(&ev(1, 10.0, 10.0), page()).is_empty());
    assert!(r.state().is_idle());
}

// =============================================================
// Drawing → Idle (commit)
// =============================================================

#[test]
fn gesture_yields_one_stroke_with_n_plus_one_points() {
    for n in [0_u32, 1, 5, 40] {
        let mut r = annotating();
        r.pointer_down(&ev(1, 0.0, 0.0), page());
        for i in 1..=n {
            r.pointer_move(&ev(1, f64::from(i), f64::from(i) * 2.0), page());
        }
        let actions = r.pointer_up(&ev(1, 0.0, 0.0));
        let strokes = completed(&actions);
        assert_eq!(strokes.len(), 1, "n = {n}");
        let s = strokes[0];
        assert_eq!(s.len(), usize::try_from(n).unwrap() + 1);
        for (i, p) in s.points.iter().enumerate() {
            let expected = f64::from(u32::try_from(i).unwrap()) / 100.0;
            assert!((p.x - expected).abs() < 1e-12);
        }
        assert!(r.state().is_idle());
    }
}

#[test]
fn pointer_up_releases_then_completes_then_renders() {
    let mut r = annotating();
    r.pointer_down(&ev(4, 0.0, 0.0), page());
    let actions = r.pointer_up(&ev(4, 0.0, 0.0));
    assert_eq!(actions.len(), 3);
    assert_eq!(actions[0], Action::ReleasePointer(4));
    assert!(matches!(actions[1], Action::StrokeCompleted(_)));
    assert_eq!(actions[2], Action::RenderNeeded);
    assert!(r.in_progress().is_none());
    assert!(r.capture().is_none());
}

#[test]
fn pointer_up_from_other_pointer_ignored() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    assert!(r.pointer_up(&ev(2, 0.0, 0.0)).is_empty());
    assert!(r.state().is_drawing());
}

#[test]
fn pointer_up_while_idle_is_noop() {
    let mut r = annotating();
    assert!(r.pointer_up(&ev(1, 0.0, 0.0)).is_empty());
    assert!(r.state().is_idle());
}

#[test]
fn pointer_up_does_not_add_a_point() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    let actions = r.pointer_up(&ev(1, 100.0, 200.0));
    assert_eq!(completed(&actions)[0].len(), 1);
}

// =============================================================
// Drawing → Idle (abort)
// =============================================================

#[test]
fn pointer_cancel_discards_stroke() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    r.pointer_move(&ev(1, 10.0, 10.0), page());
    let actions = r.pointer_cancel(&ev(1, 10.0, 10.0));
    assert_eq!(actions, vec![Action::ReleasePointer(1), Action::RenderNeeded]);
    assert!(completed(&actions).is_empty());
    assert!(r.state().is_idle());
    assert!(r.in_progress().is_none());
}

#[test]
fn pointer_cancel_from_other_pointer_ignored() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    assert!(r.pointer_cancel(&ev(2, 0.0, 0.0)).is_empty());
    assert!(r.state().is_drawing());
}

#[test]
fn pointer_cancel_while_idle_is_noop() {
    let mut r = annotating();
    assert!(r.pointer_cancel(&ev(1, 0.0, 0.0)).is_empty());
}

// =============================================================
// Annotation mode toggle
// =============================================================

#[test]
fn toggle_off_mid_gesture_commits_stroke() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    r.pointer_move(&ev(1, 50.0, 100.0), page());
    let actions = r.set_annotating(false);

    assert_eq!(actions[0], Action::ReleasePointer(1));
    let strokes = completed(&actions);
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].points, vec![NormPoint::new(0.0, 0.0), NormPoint::new(0.5, 0.5)]);
    assert!(r.state().is_idle());
    assert!(!r.is_annotating());
}

#[test]
fn events_after_toggle_off_are_ignored() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    r.set_annotating(false);
    assert!(r.pointer_move(&ev(1, 10.0, 10.0), page()).is_empty());
    assert!(r.pointer_up(&ev(1, 10.0, 10.0)).is_empty());
    assert!(r.pointer_cancel(&ev(1, 10.0, 10.0)).is_empty());
}

#[test]
fn toggle_off_while_idle_emits_nothing() {
    let mut r = annotating();
    assert!(r.set_annotating(false).is_empty());
}

#[test]
fn toggle_to_same_value_is_noop() {
    let mut r = annotating();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    assert!(r.set_annotating(true).is_empty());
    assert!(r.state().is_drawing());
}

#[test]
fn finalizing_is_never_observed_between_calls() {
    let mut r = annotating();
    let mut seen = Vec::new();
    r.pointer_down(&ev(1, 0.0, 0.0), page());
    seen.push(r.state().clone());
    r.pointer_up(&ev(1, 0.0, 0.0));
    seen.push(r.state().clone());
    r.pointer_down(&ev(2, 10.0, 10.0), page());
    r.set_annotating(false);
    seen.push(r.state().clone());
    assert!(!seen.iter().any(|s| matches!(s, RecorderState::Finalizing)));
    assert!(r.state().is_idle());
}
