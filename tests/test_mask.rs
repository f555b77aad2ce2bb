use spacial_game::geometry::Rect;
use spacial_game::mask::Mask;

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_edges_and_centre() {
    let r = Rect::new(10, 20, 30, 40);
    assert_eq!(r.left(), 10);
    assert_eq!(r.right(), 40);
    assert_eq!(r.top(), 20);
    assert_eq!(r.bottom(), 60);
    assert_eq!(r.center_x(), 25);
    assert_eq!(r.center_y(), 40);
}

#[test]
fn rect_intersection_is_the_overlap() {
    let a = Rect::new(0, 0, 10, 10);
    let b = Rect::new(5, 5, 10, 10);
    assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 5, 5)));
    assert!(a.intersects(&b));
}

#[test]
fn touching_rects_do_not_intersect() {
    let a = Rect::new(0, 0, 10, 10);
    assert_eq!(a.intersection(&Rect::new(10, 0, 10, 10)), None);
    assert_eq!(a.intersection(&Rect::new(0, 10, 10, 10)), None);
}

#[test]
fn clamp_keeps_rect_on_screen() {
    let mut r = Rect::new(-5, 95, 10, 10);
    r.clamp_within(100, 100);
    assert_eq!((r.x, r.y), (0, 90));

    let mut huge = Rect::new(50, 50, 200, 10);
    huge.clamp_within(100, 100);
    assert_eq!(huge.x, 0);
}

#[test]
fn centered_shares_the_centre() {
    let r = Rect::new(0, 0, 40, 20).centered(10, 10);
    assert_eq!(r, Rect::new(15, 5, 10, 10));
}

// ── Mask ──────────────────────────────────────────────────────────────────────

#[test]
fn mask_expands_cells_to_pixels() {
    let m = Mask::from_rows(&["# ", " #"], 2, 3);
    assert_eq!(m.width(), 4);
    assert_eq!(m.height(), 6);
    assert!(m.get(0, 0));
    assert!(m.get(1, 2));
    assert!(!m.get(2, 0));
    assert!(m.get(2, 3));
    assert!(!m.get(0, 3));
    assert_eq!(m.count(), 12);
}

#[test]
fn mask_pads_short_rows() {
    let m = Mask::from_rows(&["###", "#"], 1, 1);
    assert_eq!(m.width(), 3);
    assert!(m.get(0, 1));
    assert!(!m.get(2, 1));
}

#[test]
fn outside_pixels_are_transparent() {
    let m = Mask::from_rows(&["#"], 1, 1);
    assert!(!m.get(-1, 0));
    assert!(!m.get(0, 1));
    assert!(!m.get(1, 0));
}

#[test]
fn overlap_needs_opaque_pixels_on_both_sides() {
    let a = Mask::from_rows(&["# "], 4, 4);
    let b = Mask::from_rows(&["#"], 4, 4);
    assert!(a.overlaps(&b, 0, 0));
    assert!(a.overlaps(&b, 3, 3));
    // Over the transparent half of `a`.
    assert!(!a.overlaps(&b, 4, 0));
    // Past the edge.
    assert!(!a.overlaps(&b, 8, 0));
    assert!(!a.overlaps(&b, -4, 0));
}

#[test]
fn overlap_is_symmetric() {
    let a = Mask::from_rows(&[" ##", "#  "], 2, 2);
    let b = Mask::from_rows(&["#", "#"], 2, 2);
    for dx in -6..8 {
        for dy in -6..6 {
            assert_eq!(a.overlaps(&b, dx, dy), b.overlaps(&a, -dx, -dy), "dx={dx} dy={dy}");
        }
    }
}
