//! Compact integer path storage.
//!
//! Paths produced by outline decomposition are kept as a flat list of
//! vertices in 26.6 fixed point. The command of each vertex is packed into
//! the low bit of its two coordinates, so a vertex costs two 16-bit or two
//! 32-bit integers:
//!
//! ```text
//! stored_x = value_x << 1 | (command & 1)
//! stored_y = value_y << 1 | (command >> 1)
//! ```
//!
//! Commands are 0 for move_to, 1 for line_to, 2 for a curve3 point and 3
//! for a curve4 point. A quadratic segment is two consecutive curve3
//! vertices (control, end) and a cubic segment three curve4 vertices.
//! Contours are implicitly closed by the next move_to and by the end of
//! the data. The serialized form is the vertex array in native byte order.

mod serialized;

pub use serialized::{Elements, SerializedPath, SerializedVertices};

use std::fmt::Debug;

use kurbo::{Affine, Rect};

use crate::{
    error::{DecomposeError, WriteError},
    outline::{decompose, Outline, PathSink},
    F26Dot6, Point,
};

/// Width of the integers used to store path coordinates.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub enum CoordWidth {
    /// 16-bit coordinates: 15 bits of 26.6 value, about ±256 pixels.
    Int16,
    /// 32-bit coordinates.
    #[default]
    Int32,
}

impl CoordWidth {
    /// Size in bytes of one stored vertex.
    pub const fn vertex_size(self) -> usize {
        match self {
            Self::Int16 => 4,
            Self::Int32 => 8,
        }
    }
}

/// Vertex command.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Command {
    MoveTo = 0,
    LineTo = 1,
    Curve3 = 2,
    Curve4 = 3,
}

impl Command {
    fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Self::MoveTo,
            1 => Self::LineTo,
            2 => Self::Curve3,
            _ => Self::Curve4,
        }
    }
}

/// Integer type usable as a stored coordinate.
pub trait StorageCoord: bytemuck::Pod + Default + Debug {
    /// The coordinate width this type implements.
    const WIDTH: CoordWidth;

    /// Packs a 26.6 value and a flag bit. Values outside the representable
    /// range saturate.
    fn pack(value: i32, flag: u8) -> Self;

    /// Returns the 26.6 value and the flag bit.
    fn unpack(self) -> (i32, u8);
}

impl StorageCoord for i16 {
    const WIDTH: CoordWidth = CoordWidth::Int16;

    fn pack(value: i32, flag: u8) -> Self {
        let value = value.clamp(i16::MIN as i32 >> 1, i16::MAX as i32 >> 1);
        ((value << 1) | (flag & 1) as i32) as i16
    }

    fn unpack(self) -> (i32, u8) {
        ((self >> 1) as i32, (self & 1) as u8)
    }
}

impl StorageCoord for i32 {
    const WIDTH: CoordWidth = CoordWidth::Int32;

    fn pack(value: i32, flag: u8) -> Self {
        let value = value.clamp(i32::MIN >> 1, i32::MAX >> 1);
        (value << 1) | (flag & 1) as i32
    }

    fn unpack(self) -> (i32, u8) {
        (self >> 1, (self & 1) as u8)
    }
}

pub(crate) fn pack_vertex<C: StorageCoord>(command: Command, point: Point<F26Dot6>) -> [C; 2] {
    let bits = command as u8;
    [
        C::pack(point.x.to_bits(), bits & 1),
        C::pack(point.y.to_bits(), bits >> 1),
    ]
}

pub(crate) fn unpack_vertex<C: StorageCoord>(vertex: [C; 2]) -> (Command, Point<F26Dot6>) {
    let (x, flag_x) = vertex[0].unpack();
    let (y, flag_y) = vertex[1].unpack();
    (
        Command::from_bits(flag_x | flag_y << 1),
        Point::new(F26Dot6::from_bits(x), F26Dot6::from_bits(y)),
    )
}

/// Path of integer vertices with packed commands.
#[derive(Clone, Default, Debug)]
pub struct PathStorage<C> {
    vertices: Vec<[C; 2]>,
}

impl<C: StorageCoord> PathStorage<C> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    /// Removes all vertices, keeping the allocation.
    pub fn remove_all(&mut self) {
        self.vertices.clear();
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shortens the path to `len` vertices.
    pub fn truncate(&mut self, len: usize) {
        self.vertices.truncate(len);
    }

    pub fn push(&mut self, command: Command, x: F26Dot6, y: F26Dot6) {
        self.vertices.push(pack_vertex(command, Point::new(x, y)));
    }

    /// Returns the stored vertices with their commands.
    pub fn vertices(&self) -> impl Iterator<Item = (Command, Point<F26Dot6>)> + '_ {
        self.vertices.iter().map(|vertex| unpack_vertex(*vertex))
    }

    /// Appends the decomposed outline.
    ///
    /// Either the whole outline is appended or, on error, the path is left
    /// as it was before the call.
    pub fn decompose(
        &mut self,
        outline: &Outline,
        flip_y: bool,
        transform: &Affine,
    ) -> Result<(), DecomposeError> {
        let len = self.len();
        decompose(outline, flip_y, transform, &mut *self).inspect_err(|_| self.truncate(len))
    }

    /// Bounds of all vertices, control points included, in pixels.
    ///
    /// An empty path has zero bounds.
    pub fn bounding_rect(&self) -> Rect {
        let mut vertices = self.vertices();
        let Some((_, first)) = vertices.next() else {
            return Rect::ZERO;
        };
        let first = kurbo::Point::new(first.x.to_f64(), first.y.to_f64());
        vertices.fold(Rect::from_points(first, first), |rect, (_, p)| {
            rect.union_pt(kurbo::Point::new(p.x.to_f64(), p.y.to_f64()))
        })
    }

    /// Size in bytes of the serialized path.
    pub fn byte_size(&self) -> usize {
        self.vertices.len() * C::WIDTH.vertex_size()
    }

    /// Writes the vertex array to the front of `buf`, returning the number
    /// of bytes written.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize, WriteError> {
        let bytes: &[u8] = bytemuck::cast_slice(&self.vertices);
        let actual = buf.len();
        let out = buf
            .get_mut(..bytes.len())
            .ok_or(WriteError::BufferTooSmall {
                required: bytes.len(),
                actual,
            })?;
        out.copy_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Returns the path as elements in pixel units with explicit closes.
    pub fn elements(&self) -> Elements<impl Iterator<Item = (Command, kurbo::Point)> + '_> {
        Elements::new(self.vertices().map(|(command, p)| {
            (command, kurbo::Point::new(p.x.to_f64(), p.y.to_f64()))
        }))
    }
}

impl<C: StorageCoord> PathSink for PathStorage<C> {
    fn move_to(&mut self, x: F26Dot6, y: F26Dot6) {
        self.push(Command::MoveTo, x, y);
    }

    fn line_to(&mut self, x: F26Dot6, y: F26Dot6) {
        self.push(Command::LineTo, x, y);
    }

    fn curve3(&mut self, cx: F26Dot6, cy: F26Dot6, x: F26Dot6, y: F26Dot6) {
        self.push(Command::Curve3, cx, cy);
        self.push(Command::Curve3, x, y);
    }

    fn curve4(
        &mut self,
        cx0: F26Dot6,
        cy0: F26Dot6,
        cx1: F26Dot6,
        cy1: F26Dot6,
        x: F26Dot6,
        y: F26Dot6,
    ) {
        self.push(Command::Curve4, cx0, cy0);
        self.push(Command::Curve4, cx1, cy1);
        self.push(Command::Curve4, x, y);
    }

    // contours are implicitly closed
    fn close_polygon(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{OutlineBuf, PointTag};
    use kurbo::PathEl;
    use pretty_assertions::assert_eq;

    fn f(bits: i32) -> F26Dot6 {
        F26Dot6::from_bits(bits)
    }

    fn glyph() -> OutlineBuf {
        let mut outline = OutlineBuf::new();
        outline
            .push_contour([
                (0, 0, PointTag::OnCurve),
                (128, 0, PointTag::OnCurve),
                (128, 96, PointTag::Conic),
                (64, 160, PointTag::OnCurve),
            ])
            .push_contour([
                (32, 32, PointTag::OnCurve),
                (48, 144, PointTag::Cubic),
                (80, 144, PointTag::Cubic),
                (96, 32, PointTag::OnCurve),
            ]);
        outline
    }

    #[test]
    fn pack_unpack() {
        for value in [0, 1, -1, 64, -64, 16383, -16384] {
            for flag in [0, 1] {
                assert_eq!(i16::pack(value, flag).unpack(), (value, flag));
                assert_eq!(i32::pack(value, flag).unpack(), (value, flag));
            }
        }
        assert_eq!(i32::pack(-1_000_000, 1).unpack(), (-1_000_000, 1));
    }

    #[test]
    fn int16_saturates() {
        assert_eq!(i16::pack(100_000, 1).unpack(), (16383, 1));
        assert_eq!(i16::pack(-100_000, 0).unpack(), (-16384, 0));
    }

    #[test]
    fn stores_commands() {
        let mut path = PathStorage::<i16>::new();
        path.decompose(&glyph().as_outline(), false, &Affine::IDENTITY)
            .unwrap();
        let vertices: Vec<_> = path.vertices().collect();
        assert_eq!(
            vertices,
            [
                (Command::MoveTo, Point::new(f(0), f(0))),
                (Command::LineTo, Point::new(f(128), f(0))),
                (Command::Curve3, Point::new(f(128), f(96))),
                (Command::Curve3, Point::new(f(64), f(160))),
                (Command::MoveTo, Point::new(f(32), f(32))),
                (Command::Curve4, Point::new(f(48), f(144))),
                (Command::Curve4, Point::new(f(80), f(144))),
                (Command::Curve4, Point::new(f(96), f(32))),
            ]
        );
        assert_eq!(path.byte_size(), 8 * 4);
    }

    #[test]
    fn failed_decompose_leaves_path_untouched() {
        let mut path = PathStorage::<i32>::new();
        path.decompose(&glyph().as_outline(), false, &Affine::IDENTITY)
            .unwrap();
        let before: Vec<_> = path.vertices().collect();
        let mut bad = glyph();
        bad.push_contour([
            (0, 0, PointTag::OnCurve),
            (10, 10, PointTag::Cubic),
            (20, 0, PointTag::OnCurve),
        ]);
        assert!(path
            .decompose(&bad.as_outline(), false, &Affine::IDENTITY)
            .is_err());
        assert_eq!(path.vertices().collect::<Vec<_>>(), before);
    }

    #[test]
    fn bounds_contain_every_point() {
        let mut path = PathStorage::<i32>::new();
        let transform = Affine::new([0.9, 0.1, 0.3, 1.1, 2.25, -0.5]);
        path.decompose(&glyph().as_outline(), true, &transform)
            .unwrap();
        let rect = path.bounding_rect();
        let (x0, y0) = (rect.x0.floor(), rect.y0.floor());
        let (x1, y1) = (rect.x1.ceil(), rect.y1.ceil());
        for (_, p) in path.vertices() {
            let (x, y) = (p.x.to_f64(), p.y.to_f64());
            assert!(x >= x0 && x <= x1 && y >= y0 && y <= y1);
        }
        assert_eq!(PathStorage::<i16>::new().bounding_rect(), Rect::ZERO);
    }

    #[test]
    fn serialize_writes_exactly_byte_size() {
        let mut path = PathStorage::<i32>::new();
        path.decompose(&glyph().as_outline(), false, &Affine::IDENTITY)
            .unwrap();
        let size = path.byte_size();
        let mut buf = vec![0xAA; size + 4];
        assert_eq!(path.serialize(&mut buf), Ok(size));
        assert_eq!(&buf[size..], [0xAA; 4]);
        assert_eq!(
            path.serialize(&mut buf[..size - 1]),
            Err(WriteError::BufferTooSmall {
                required: size,
                actual: size - 1
            })
        );
    }

    #[test]
    fn elements_in_pixels() {
        let mut path = PathStorage::<i16>::new();
        path.decompose(&glyph().as_outline(), false, &Affine::IDENTITY)
            .unwrap();
        let elements: Vec<_> = path.elements().collect();
        assert_eq!(
            elements,
            [
                PathEl::MoveTo((0.0, 0.0).into()),
                PathEl::LineTo((2.0, 0.0).into()),
                PathEl::QuadTo((2.0, 1.5).into(), (1.0, 2.5).into()),
                PathEl::ClosePath,
                PathEl::MoveTo((0.5, 0.5).into()),
                PathEl::CurveTo(
                    (0.75, 2.25).into(),
                    (1.25, 2.25).into(),
                    (1.5, 0.5).into()
                ),
                PathEl::ClosePath,
            ]
        );
    }
}
