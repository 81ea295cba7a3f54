//! Reading paths back from their serialized form.

use kurbo::{PathEl, Point, Vec2};

use super::{unpack_vertex, Command, CoordWidth};

/// Adapts a stream of stored vertices to path elements.
///
/// Curve vertices are grouped into segments and every contour is closed
/// before the next move_to and at the end of the stream. A truncated curve
/// ends the iteration.
#[derive(Clone, Debug)]
pub struct Elements<I> {
    vertices: I,
    pending_move: Option<Point>,
    open: bool,
}

impl<I> Elements<I>
where
    I: Iterator<Item = (Command, Point)>,
{
    pub fn new(vertices: I) -> Self {
        Self {
            vertices,
            pending_move: None,
            open: false,
        }
    }
}

impl<I> Iterator for Elements<I>
where
    I: Iterator<Item = (Command, Point)>,
{
    type Item = PathEl;

    fn next(&mut self) -> Option<PathEl> {
        if let Some(p) = self.pending_move.take() {
            self.open = true;
            return Some(PathEl::MoveTo(p));
        }
        let Some((command, p)) = self.vertices.next() else {
            return std::mem::take(&mut self.open).then_some(PathEl::ClosePath);
        };
        Some(match command {
            Command::MoveTo if self.open => {
                self.open = false;
                self.pending_move = Some(p);
                PathEl::ClosePath
            }
            Command::MoveTo => {
                self.open = true;
                PathEl::MoveTo(p)
            }
            Command::LineTo => PathEl::LineTo(p),
            Command::Curve3 => {
                let (_, end) = self.vertices.next()?;
                PathEl::QuadTo(p, end)
            }
            Command::Curve4 => {
                let (_, control1) = self.vertices.next()?;
                let (_, end) = self.vertices.next()?;
                PathEl::CurveTo(p, control1, end)
            }
        })
    }
}

/// Vertices decoded from serialized path data, in pixels.
#[derive(Clone, Debug)]
pub struct SerializedVertices<'a> {
    data: &'a [u8],
    width: CoordWidth,
    offset: Vec2,
}

impl Iterator for SerializedVertices<'_> {
    type Item = (Command, Point);

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.width.vertex_size();
        if self.data.len() < size {
            return None;
        }
        let (chunk, rest) = self.data.split_at(size);
        self.data = rest;
        let (command, p) = match self.width {
            CoordWidth::Int16 => unpack_vertex(bytemuck::pod_read_unaligned::<[i16; 2]>(chunk)),
            CoordWidth::Int32 => unpack_vertex(bytemuck::pod_read_unaligned::<[i32; 2]>(chunk)),
        };
        Some((
            command,
            Point::new(p.x.to_f64(), p.y.to_f64()) + self.offset,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.data.len() / self.width.vertex_size();
        (len, Some(len))
    }
}

/// Serialized path data positioned at an offset.
#[derive(Copy, Clone, Debug)]
pub struct SerializedPath<'a> {
    data: &'a [u8],
    width: CoordWidth,
    offset: Vec2,
}

impl<'a> SerializedPath<'a> {
    /// Wraps path data written with the given coordinate width. Every
    /// decoded point is shifted by (x, y) pixels.
    pub fn new(data: &'a [u8], width: CoordWidth, x: f64, y: f64) -> Self {
        Self {
            data,
            width,
            offset: Vec2::new(x, y),
        }
    }

    /// Number of complete vertices in the data.
    pub fn num_vertices(&self) -> usize {
        self.data.len() / self.width.vertex_size()
    }

    /// Returns the raw vertices with their commands.
    pub fn vertices(&self) -> SerializedVertices<'a> {
        SerializedVertices {
            data: self.data,
            width: self.width,
            offset: self.offset,
        }
    }

    /// Returns the path elements.
    pub fn elements(&self) -> Elements<SerializedVertices<'a>> {
        Elements::new(self.vertices())
    }
}
