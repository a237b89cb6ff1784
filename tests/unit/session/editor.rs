use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use super::*;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 90, 255])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn session(w: u32, h: u32) -> EditorSession {
    let mut s = EditorSession::new(EditorOpts::default()).unwrap();
    s.open(&png(w, h)).unwrap();
    s
}

#[test]
fn open_yields_opaque_mask_and_empty_history() {
    let s = session(64, 48);
    assert!(s.is_open());
    assert!(s.mask().unwrap().is_uniform(255));
    assert_eq!(s.history_depths(), (0, 0));
    assert!(!s.can_undo());
    assert!(!s.can_redo());
    assert!(s.preview_pending());
}

#[test]
fn open_scales_large_sources_to_display_width() {
    let mut s = EditorSession::new(EditorOpts::default()).unwrap();
    let g = s.open(&png(2000, 1000)).unwrap();
    assert_eq!(g.display, Size { width: 520, height: 260 });
    assert_eq!(s.mask().unwrap().size(), g.display);
}

#[test]
fn failed_open_leaves_every_command_a_noop() {
    let mut s = session(16, 16);
    assert!(s.open(b"garbage").is_err());
    assert!(!s.is_open());
    assert!(!s.pointer_down(1, Point::new(1.0, 1.0)));
    assert!(!s.undo());
    assert!(!s.redo());
    assert!(!s.fill_all());
    assert!(!s.clear());
    assert!(!s.reset());
    assert!(s.request_preview().is_none());
    assert!(!s.pump_frame());
    assert!(s.preview().is_none());
    assert!(s.export().is_err());
}

#[test]
fn tap_produces_one_undoable_dot() {
    let mut s = session(64, 64);
    assert!(s.pointer_down(7, Point::new(20.0, 20.0)));
    assert!(s.is_stroking());
    assert!(s.pointer_up());
    assert!(!s.is_stroking());

    assert_eq!(s.history_depths(), (1, 0));
    assert_eq!(s.mask().unwrap().get(20, 20), 0);
    assert_eq!(s.mask().unwrap().get(60, 60), 255);

    assert!(s.undo());
    assert!(s.mask().unwrap().is_uniform(255));
}

#[test]
fn drag_is_a_single_history_step() {
    let mut s = session(100, 40);
    s.pointer_down(1, Point::new(10.0, 20.0));
    for x in (15..=90).step_by(5) {
        assert!(s.pointer_move(1, Point::new(f64::from(x), 20.0)));
    }
    s.pointer_up();
    assert_eq!(s.history_depths(), (1, 0));
    assert_eq!(s.mask().unwrap().get(50, 20), 0);
}

#[test]
fn other_pointers_cannot_extend_or_restart_a_captured_drag() {
    let mut s = session(64, 64);
    assert!(s.pointer_down(1, Point::new(5.0, 5.0)));
    assert!(!s.pointer_down(2, Point::new(50.0, 50.0)));
    assert!(!s.pointer_move(2, Point::new(50.0, 50.0)));
    assert_eq!(s.mask().unwrap().get(50, 50), 255);
    assert_eq!(s.pointer_state(), PointerState::Stroking { pointer_id: 1 });
}

#[test]
fn pointer_up_or_cancel_anywhere_ends_drag_and_clears_overlay() {
    let mut s = session(64, 64);
    s.pointer_down(1, Point::new(10.0, 10.0));
    assert!(s.overlay().unwrap().as_raw().iter().any(|&b| b != 0));
    assert!(s.pointer_cancel());
    assert_eq!(s.pointer_state(), PointerState::Idle);
    assert!(s.overlay().unwrap().as_raw().iter().all(|&b| b == 0));

    // Moves after release do nothing.
    assert!(!s.pointer_move(1, Point::new(40.0, 40.0)));
    assert!(!s.pointer_up());
}

#[test]
fn zoom_maps_surface_points_onto_mask() {
    let mut s = session(100, 100);
    assert_eq!(s.set_zoom(2.0), 2.0);
    s.set_mode(EditMode::Remove);
    s.set_brush_radius(8);
    s.pointer_down(1, Point::new(120.0, 60.0));
    s.pointer_up();
    assert_eq!(s.mask().unwrap().get(60, 30), 0);
    assert_eq!(s.mask().unwrap().size(), Size { width: 100, height: 100 });
    assert_eq!(s.surface_size(), Some((200.0, 200.0)));
}

#[test]
fn zoom_is_clamped_and_steps_by_a_fifth() {
    let mut s = session(8, 8);
    assert_eq!(s.set_zoom(0.1), MIN_ZOOM);
    assert_eq!(s.set_zoom(9.0), MAX_ZOOM);
    assert_eq!(s.set_zoom(f64::NAN), MAX_ZOOM);
    s.set_zoom(1.0);
    assert!((s.zoom_in() - 1.2).abs() < 1e-9);
    for _ in 0..10 {
        s.zoom_in();
    }
    assert_eq!(s.zoom(), MAX_ZOOM);
    for _ in 0..10 {
        s.zoom_out();
    }
    assert_eq!(s.zoom(), MIN_ZOOM);
}

#[test]
fn brush_radius_is_clamped() {
    let mut s = session(8, 8);
    assert_eq!(s.brush_radius(), 28);
    assert_eq!(s.set_brush_radius(5), 8);
    assert_eq!(s.set_brush_radius(500), 120);
}

#[test]
fn bulk_edits_are_undoable_and_clear_redo() {
    let mut s = session(32, 32);
    assert!(s.clear());
    assert!(s.mask().unwrap().is_uniform(0));
    assert!(s.undo());
    assert!(s.mask().unwrap().is_uniform(255));
    assert!(s.can_redo());

    assert!(s.fill_all());
    assert!(!s.can_redo());
    assert_eq!(s.history_depths(), (1, 0));

    assert!(s.clear());
    assert!(s.undo());
    assert!(s.redo());
    assert!(s.mask().unwrap().is_uniform(0));
}

#[test]
fn new_stroke_clears_redo() {
    let mut s = session(32, 32);
    s.pointer_down(1, Point::new(5.0, 5.0));
    s.pointer_up();
    s.undo();
    assert!(s.can_redo());
    s.pointer_down(1, Point::new(25.0, 25.0));
    s.pointer_up();
    assert!(!s.can_redo());
}

#[test]
fn reset_restores_fresh_state() {
    let mut s = session(32, 32);
    s.clear();
    assert!(s.reset());
    assert!(s.mask().unwrap().is_uniform(255));
    assert_eq!(s.history_depths(), (0, 0));
}

#[test]
fn reopening_discards_history_and_pending_preview() {
    let mut s = session(32, 32);
    s.clear();
    let stale = s.request_preview().unwrap();
    s.open(&png(40, 10)).unwrap();
    assert_eq!(s.history_depths(), (0, 0));
    assert!(s.mask().unwrap().is_uniform(255));
    assert!(!s.fire_frame(stale));
    assert!(s.pump_frame());
}

#[test]
fn preview_requests_coalesce_into_one_render_per_frame() {
    let mut s = session(64, 64);
    assert!(s.pump_frame());
    assert!(!s.pump_frame());

    s.pointer_down(1, Point::new(5.0, 5.0));
    for i in 0..30 {
        s.pointer_move(1, Point::new(5.0 + f64::from(i), 5.0));
    }
    s.pointer_up();

    let before = s.scheduler_stats().fired;
    assert!(s.pump_frame());
    assert!(!s.pump_frame());
    assert_eq!(s.scheduler_stats().fired, before + 1);

    let generation = s.preview().unwrap().generation;
    assert_eq!(generation, 2);
    let editor = s.editor_raster().unwrap();
    assert_eq!(editor.get_pixel(5, 5).0[3], 0);
    assert_eq!(editor.get_pixel(60, 60).0[3], 255);
}

#[test]
fn export_and_confirm_deliver_natural_resolution_cutout() {
    let mut s = session(1040, 100);
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    s.on_confirm(move |artifact| sink.borrow_mut().push(artifact.size));

    s.clear();
    let artifact = s.confirm().unwrap();
    assert_eq!(artifact.size, Size { width: 1040, height: 100 });
    assert_eq!(received.borrow().as_slice(), &[artifact.size]);

    let decoded = image::load_from_memory(&artifact.png).unwrap().to_rgba8();
    assert!(decoded.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn export_encode_failure_reports_error_and_skips_confirm_handler() {
    let opts = EditorOpts {
        max_encode_pixels: 100,
        ..EditorOpts::default()
    };
    let mut s = EditorSession::new(opts).unwrap();
    s.open(&png(20, 20)).unwrap();
    let called = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&called);
    s.on_confirm(move |_| *flag.borrow_mut() = true);

    assert!(matches!(s.confirm(), Err(CutoutError::Encode(_))));
    assert!(!*called.borrow());
    assert!(matches!(s.export(), Err(CutoutError::Encode(_))));
}

#[test]
fn download_writes_cutout_png() {
    let dir = std::env::temp_dir().join(format!(
        "cutout_session_download_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let mut s = session(12, 6);
    let path = s.download(&dir).unwrap();
    assert_eq!(path, dir.join("cutout.png"));
    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (12, 6));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn consecutive_exports_each_complete() {
    let mut s = session(24, 12);
    let first = s.export().unwrap();
    s.clear();
    let second = s.export().unwrap();
    assert_eq!(first.size, second.size);
    assert_ne!(first.png, second.png);
    let decoded = image::load_from_memory(&second.png).unwrap().to_rgba8();
    assert!(decoded.pixels().all(|p| p.0[3] == 0));
}
