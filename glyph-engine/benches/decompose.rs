use criterion::{criterion_group, criterion_main, Criterion};
use glyph_engine::{
    outline::{decompose, OutlineBuf, PathSink, PointTag},
    path::PathStorage,
    raster::{render_scanlines, CurveApproximation, Rasterizer},
    scanline::{ScanlineStorage, ScanlineStorageAa, ScanlineU8},
    F26Dot6,
};
use kurbo::Affine;

/// A ring made of two contours of conic control points only, so every
/// segment needs an implied on-curve point.
fn ring(radius: f64, inner: f64, segments: usize) -> OutlineBuf {
    let mut buf = OutlineBuf::new();
    for (r, reverse) in [(radius, false), (inner, true)] {
        let points = (0..segments).map(|i| {
            let mut angle = i as f64 / segments as f64 * std::f64::consts::TAU;
            if reverse {
                angle = -angle;
            }
            let (sin, cos) = angle.sin_cos();
            (
                ((radius + cos * r) * 64.0) as i32,
                ((radius + sin * r) * 64.0) as i32,
                PointTag::Conic,
            )
        });
        buf.push_contour(points);
    }
    buf
}

struct NullSink;

#[allow(unused_variables)]
impl PathSink for NullSink {
    fn move_to(&mut self, x: F26Dot6, y: F26Dot6) {}
    fn line_to(&mut self, x: F26Dot6, y: F26Dot6) {}
    fn curve3(&mut self, cx: F26Dot6, cy: F26Dot6, x: F26Dot6, y: F26Dot6) {}
    fn curve4(
        &mut self,
        cx0: F26Dot6,
        cy0: F26Dot6,
        cx1: F26Dot6,
        cy1: F26Dot6,
        x: F26Dot6,
        y: F26Dot6,
    ) {
    }
    fn close_polygon(&mut self) {}
}

fn decompose_outline(c: &mut Criterion) {
    let outline = ring(40.0, 30.0, 64);
    for (name, transform) in [
        ("decompose identity", Affine::IDENTITY),
        ("decompose rotated", Affine::rotate(0.3).then_scale(1.5)),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| decompose(&outline.as_outline(), false, &transform, &mut NullSink))
        });
    }
    let mut path = PathStorage::<i32>::new();
    c.bench_function("decompose into path storage", |b| {
        b.iter(|| {
            path.remove_all();
            path.decompose(&outline.as_outline(), true, &Affine::IDENTITY)
        })
    });
}

fn rasterize(c: &mut Criterion) {
    let outline = ring(40.0, 30.0, 64);
    let mut path = PathStorage::<i32>::new();
    path.decompose(&outline.as_outline(), false, &Affine::IDENTITY)
        .unwrap();
    let mut rasterizer = Rasterizer::new();
    let mut scanline = ScanlineU8::new();
    let mut storage = ScanlineStorageAa::new();
    for scale in [1.0, 4.0, 16.0] {
        let curves = CurveApproximation::new(scale);
        c.bench_function(&format!("rasterize scale {scale}"), |b| {
            b.iter(|| {
                rasterizer.reset();
                rasterizer.add_path(path.elements(), &curves);
                storage.prepare();
                render_scanlines(&mut rasterizer, &mut scanline, &mut storage);
                storage.byte_size()
            })
        });
    }
}

criterion_group!(benches, decompose_outline, rasterize);
criterion_main!(benches);
