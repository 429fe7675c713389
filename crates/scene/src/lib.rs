mod codec;
mod color;
mod error;
mod feed;
mod render_scene;
mod wire;

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

pub use crate::codec::{decode, decode_str, encode, encode_string};
pub use crate::color::Rgba;
pub use crate::error::{DecodeError, EncodeError, Malformed};
pub use crate::feed::{FeedEvent, FeedStats, LatestScene, Message, STOP_SENTINEL, SceneFeed};
pub use crate::render_scene::{DrawCommand, DrawList};

use crate::wire::{coord, finite, finite_or_zero, is_false, is_zero, nullable};

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The closed set of shape variants.
///
/// `KIND_TAGS` is the only place a tag string is spelled out; decode and encode
/// both go through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Point,
    Line,
    Polygon,
}

// Indexed by discriminant.
const KIND_TAGS: [(ShapeKind, &str); 3] = [
    (ShapeKind::Point, "point"),
    (ShapeKind::Line, "line"),
    (ShapeKind::Polygon, "polygon"),
];

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Point, ShapeKind::Line, ShapeKind::Polygon];

    pub fn tag(self) -> &'static str {
        KIND_TAGS[self as usize].1
    }

    pub fn from_tag(tag: &str) -> Option<ShapeKind> {
        KIND_TAGS
            .iter()
            .find(|(_, candidate)| *candidate == tag)
            .map(|(kind, _)| *kind)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Stroke color. Empty means the variant's default.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colorable {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub color: String,
}

/// Polygon fill. Empty means outline only.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fillable {
    #[serde(
        rename = "fill",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "nullable"
    )]
    pub fill_color: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsDrawable {
    #[serde(skip_serializing_if = "is_false", deserialize_with = "nullable")]
    pub draw_points: bool,
}

/// Text label, placed at the shape's anchor shifted by `(label_x, label_y)`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labellable {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub label: String,
    #[serde(
        skip_serializing_if = "is_zero",
        serialize_with = "coord",
        deserialize_with = "finite_or_zero"
    )]
    pub label_x: f32,
    #[serde(
        skip_serializing_if = "is_zero",
        serialize_with = "coord",
        deserialize_with = "finite_or_zero"
    )]
    pub label_y: f32,
}

impl Labellable {
    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.label_x, self.label_y)
    }
}

/// A single coordinate. Also used for the vertices of lines and polygons,
/// where it is written without a discriminator.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(flatten)]
    pub colorable: Colorable,
    #[serde(serialize_with = "coord", deserialize_with = "finite")]
    pub x: f32,
    #[serde(serialize_with = "coord", deserialize_with = "finite")]
    pub y: f32,
    #[serde(flatten)]
    pub labellable: Labellable,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.colorable.color = color.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>, dx: f32, dy: f32) -> Self {
        self.labellable = Labellable {
            label: label.into(),
            label_x: dx,
            label_y: dy,
        };
        self
    }
}

/// An open polyline.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(flatten)]
    pub colorable: Colorable,
    #[serde(flatten)]
    pub points_drawable: PointsDrawable,
    pub points: Vec<Point>,
    #[serde(flatten)]
    pub labellable: Labellable,
}

impl Line {
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.colorable.color = color.into();
        self
    }

    pub fn with_draw_points(mut self, draw_points: bool) -> Self {
        self.points_drawable.draw_points = draw_points;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>, dx: f32, dy: f32) -> Self {
        self.labellable = Labellable {
            label: label.into(),
            label_x: dx,
            label_y: dy,
        };
        self
    }
}

/// A polyline whose last vertex connects back to the first. The closing edge
/// is implied by the variant and never stored in `points`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(flatten)]
    pub colorable: Colorable,
    #[serde(flatten)]
    pub points_drawable: PointsDrawable,
    #[serde(flatten)]
    pub fillable: Fillable,
    pub points: Vec<Point>,
    #[serde(flatten)]
    pub labellable: Labellable,
}

impl Polygon {
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.colorable.color = color.into();
        self
    }

    pub fn with_fill(mut self, fill_color: impl Into<String>) -> Self {
        self.fillable.fill_color = fill_color.into();
        self
    }

    pub fn with_draw_points(mut self, draw_points: bool) -> Self {
        self.points_drawable.draw_points = draw_points;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>, dx: f32, dy: f32) -> Self {
        self.labellable = Labellable {
            label: label.into(),
            label_x: dx,
            label_y: dy,
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Point),
    Line(Line),
    Polygon(Polygon),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Point(_) => ShapeKind::Point,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Vertices in drawing order. A point is its own single vertex.
    pub fn vertices(&self) -> &[Point] {
        match self {
            Shape::Point(p) => std::slice::from_ref(p),
            Shape::Line(l) => &l.points,
            Shape::Polygon(p) => &p.points,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Shape::Polygon(_))
    }

    pub fn color(&self) -> &str {
        match self {
            Shape::Point(p) => &p.colorable.color,
            Shape::Line(l) => &l.colorable.color,
            Shape::Polygon(p) => &p.colorable.color,
        }
    }

    pub fn draw_points(&self) -> bool {
        match self {
            Shape::Point(_) => false,
            Shape::Line(l) => l.points_drawable.draw_points,
            Shape::Polygon(p) => p.points_drawable.draw_points,
        }
    }

    pub fn fill_color(&self) -> Option<&str> {
        match self {
            Shape::Polygon(p) if !p.fillable.fill_color.is_empty() => {
                Some(p.fillable.fill_color.as_str())
            }
            _ => None,
        }
    }

    pub fn labellable(&self) -> &Labellable {
        match self {
            Shape::Point(p) => &p.labellable,
            Shape::Line(l) => &l.labellable,
            Shape::Polygon(p) => &p.labellable,
        }
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // discriminator first, then the variant's own fields
        #[derive(Serialize)]
        struct Tagged<'a, T> {
            item: &'static str,
            #[serde(flatten)]
            body: &'a T,
        }

        let item = self.kind().tag();
        match self {
            Shape::Point(body) => Tagged { item, body }.serialize(serializer),
            Shape::Line(body) => Tagged { item, body }.serialize(serializer),
            Shape::Polygon(body) => Tagged { item, body }.serialize(serializer),
        }
    }
}

impl From<Point> for Shape {
    fn from(p: Point) -> Self {
        Shape::Point(p)
    }
}

impl From<Line> for Shape {
    fn from(l: Line) -> Self {
        Shape::Line(l)
    }
}

impl From<Polygon> for Shape {
    fn from(p: Polygon) -> Self {
        Shape::Polygon(p)
    }
}

/// Axis-aligned box around a set of vertices.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.max.x - self.min.x, self.max.y - self.min.y)
    }

    fn include(&mut self, p: Vec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }
}

/// One complete visualization update. Item order is paint order.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub items: Vec<Shape>,
}

impl Scene {
    pub fn new(items: impl IntoIterator<Item = Shape>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn all_points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.items.iter().flat_map(Shape::vertices)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.all_points().map(Point::pos);
        let first = points.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for p in points {
            bounds.include(p);
        }
        Some(bounds)
    }
}
