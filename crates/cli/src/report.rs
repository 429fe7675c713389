use scene::{Line, Point, Polygon, Scene, Shape};
use std::fmt::Write;

/// The document the viewer starts with before any update arrives.
pub fn sample_scene() -> Scene {
    Scene::new([
        Point::new(12.0, 32.0).with_color("red").into(),
        Line::new([Point::new(2.0, 3.4).with_color("red"), Point::new(1.3, 5.0)])
            .with_color("blue")
            .with_draw_points(true)
            .into(),
        Polygon::new([Point::new(20.0, 3.4).with_color("red"), Point::new(1.3, 5.0)])
            .with_color("blue")
            .with_fill("green")
            .into(),
    ])
}

pub fn describe_shape(index: usize, shape: &Shape) -> String {
    let mut out = format!("#{index} {}", shape.kind());
    match shape {
        Shape::Point(p) => {
            let _ = write!(out, " at ({}, {})", p.x, p.y);
        }
        Shape::Line(_) | Shape::Polygon(_) => {
            let n = shape.vertices().len();
            let _ = write!(out, ", {n} vertices");
            if shape.is_closed() {
                out.push_str(", closed");
            }
        }
    }
    if !shape.color().is_empty() {
        let _ = write!(out, ", color {}", shape.color());
    }
    if let Some(fill) = shape.fill_color() {
        let _ = write!(out, ", fill {fill}");
    }
    if shape.draw_points() {
        out.push_str(", points drawn");
    }
    let label = shape.labellable();
    if !label.is_empty() {
        let _ = write!(out, ", label {:?}", label.label);
    }
    out
}

pub fn summary(scene: &Scene) -> String {
    let mut out = format!("{} shapes", scene.len());
    if let Some(bounds) = scene.bounds() {
        let _ = write!(
            out,
            ", bounds ({}, {}) - ({}, {})",
            bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y
        );
    }
    out
}
