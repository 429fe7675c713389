use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::{self, Rgba};
use crate::{Point, Scene, Shape, ShapeKind};

/// Flat list of primitives, in paint order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawCommand {
    Fill {
        points: Vec<[f32; 2]>,
        color: Rgba,
    },
    /// `closed` asks the renderer to join the last point back to the first.
    Stroke {
        points: Vec<[f32; 2]>,
        color: Rgba,
        closed: bool,
    },
    Marker {
        pos: [f32; 2],
        color: Rgba,
    },
    Label {
        text: String,
        pos: [f32; 2],
    },
}

impl DrawList {
    pub fn from_scene(scene: &Scene) -> Self {
        let mut commands = Vec::new();
        for shape in &scene.items {
            lower_shape(shape, &mut commands);
        }
        Self { commands }
    }
}

fn default_color(kind: ShapeKind) -> Rgba {
    match kind {
        ShapeKind::Point => color::RED,
        ShapeKind::Line => color::BLUE,
        ShapeKind::Polygon => color::GREEN,
    }
}

fn resolve(spec: &str, fallback: Rgba) -> Rgba {
    if spec.is_empty() {
        return fallback;
    }
    color::parse(spec).unwrap_or_else(|| {
        debug!("unrecognized color {spec:?}, using default");
        fallback
    })
}

fn lower_shape(shape: &Shape, out: &mut Vec<DrawCommand>) {
    let kind = shape.kind();
    let stroke = resolve(shape.color(), default_color(kind));
    let vertices = shape.vertices();

    match shape {
        Shape::Point(p) => out.push(DrawCommand::Marker {
            pos: [p.x, p.y],
            color: stroke,
        }),
        Shape::Line(_) | Shape::Polygon(_) => {
            let points: Vec<[f32; 2]> = vertices.iter().map(|p| [p.x, p.y]).collect();
            if let Some(fill) = shape.fill_color().filter(|_| points.len() >= 3) {
                out.push(DrawCommand::Fill {
                    points: points.clone(),
                    color: resolve(fill, stroke),
                });
            }
            if points.len() >= 2 {
                out.push(DrawCommand::Stroke {
                    points,
                    color: stroke,
                    closed: shape.is_closed(),
                });
            }
            if shape.draw_points() {
                out.extend(vertices.iter().map(|v| vertex_marker(v, stroke)));
            }
        }
    }

    let label = shape.labellable();
    if label.is_empty() {
        return;
    }
    let Some(anchor) = vertices.first() else {
        debug!("dropping label {:?} on a {kind} without vertices", label.label);
        return;
    };
    let offset = label.offset();
    out.push(DrawCommand::Label {
        text: label.label.clone(),
        pos: [anchor.x + offset.x, anchor.y + offset.y],
    });
}

// Vertex attributes only override the marker color; vertex labels are data only.
fn vertex_marker(vertex: &Point, shape_color: Rgba) -> DrawCommand {
    DrawCommand::Marker {
        pos: [vertex.x, vertex.y],
        color: resolve(&vertex.colorable.color, shape_color),
    }
}
