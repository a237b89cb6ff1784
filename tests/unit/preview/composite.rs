use super::*;
use crate::raster::source::SourceImage;

fn store(w: u32, h: u32, px: [u8; 4]) -> RasterStore {
    let src = SourceImage::from_rgba(image::RgbaImage::from_pixel(w, h, image::Rgba(px))).unwrap();
    RasterStore::new(src, 520, 20).unwrap()
}

#[test]
fn destination_in_keeps_rgb_and_multiplies_alpha() {
    let img = image::RgbaImage::from_pixel(2, 1, image::Rgba([10, 20, 30, 128]));
    let mut mask = MaskRaster::opaque(Size {
        width: 2,
        height: 1,
    });
    mask.set(1, 0, 0);
    let out = composite_masked(&img, &mask).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [10, 20, 30, 128]);
    assert_eq!(out.get_pixel(1, 0).0, [10, 20, 30, 0]);
}

#[test]
fn render_produces_editor_raster_and_decodable_artifact() {
    let s = store(6, 4, [1, 2, 3, 255]);
    let mut r = PreviewRenderer::new(u64::MAX);
    assert!(r.render(&s));

    let editor = r.editor_raster().unwrap();
    assert_eq!(editor.dimensions(), (6, 4));

    let artifact = r.artifact().unwrap();
    assert_eq!(artifact.generation, 1);
    let decoded = image::load_from_memory(&artifact.png).unwrap().to_rgba8();
    assert_eq!(&decoded, editor);
    assert!(artifact.to_data_url().starts_with("data:image/png;base64,"));
}

#[test]
fn encode_failure_keeps_previous_artifact() {
    let s = store(6, 4, [1, 2, 3, 255]);
    let mut r = PreviewRenderer::new(u64::MAX);
    assert!(r.render(&s));
    let before = r.artifact().cloned().unwrap();

    r.set_max_encode_pixels(1);
    assert!(!r.render(&s));
    assert_eq!(r.failures(), 1);
    assert_eq!(r.artifact(), Some(&before));
}

#[test]
fn clear_forgets_output() {
    let s = store(2, 2, [0, 0, 0, 255]);
    let mut r = PreviewRenderer::new(u64::MAX);
    r.render(&s);
    r.clear();
    assert!(r.artifact().is_none());
    assert!(r.editor_raster().is_none());
}
