use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{DecodeError, EncodeError, Malformed};
use crate::wire::{COORDS, DISCRIMINATOR, ITEMS, POINTS};
use crate::{Scene, Shape, ShapeKind};

/// Decodes a `{"items": [...]}` document into a scene, keeping item order.
pub fn decode(bytes: &[u8]) -> Result<Scene, DecodeError> {
    let document: Value = serde_json::from_slice(bytes).map_err(Malformed::Syntax)?;
    decode_document(document)
}

pub fn decode_str(text: &str) -> Result<Scene, DecodeError> {
    decode(text.as_bytes())
}

/// Encodes a scene in the same envelope `decode` reads. Attributes at their
/// default value are left out.
pub fn encode(scene: &Scene) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(scene)?)
}

pub fn encode_string(scene: &Scene) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(scene)?)
}

fn decode_document(document: Value) -> Result<Scene, DecodeError> {
    let Value::Object(mut envelope) = document else {
        return Err(Malformed::NotAnObject.into());
    };
    let items = match envelope.remove(ITEMS) {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(Malformed::ItemsNotAList.into()),
        None => return Err(Malformed::MissingItems.into()),
    };

    let items = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| decode_shape(index, item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Scene { items })
}

fn decode_shape(index: usize, item: Value) -> Result<Shape, DecodeError> {
    let Value::Object(fields) = item else {
        return Err(Malformed::ItemNotAnObject { index }.into());
    };

    let kind = match fields.get(DISCRIMINATOR) {
        Some(Value::String(tag)) => {
            ShapeKind::from_tag(tag).ok_or_else(|| DecodeError::UnknownShapeKind {
                index,
                kind: tag.clone(),
            })?
        }
        Some(_) => return Err(Malformed::DiscriminatorNotAString { index }.into()),
        None => return Err(Malformed::MissingDiscriminator { index }.into()),
    };

    check_required(index, kind, &fields)?;

    let body = Value::Object(fields);
    let shape = match kind {
        ShapeKind::Point => Shape::Point(typed(index, kind, body)?),
        ShapeKind::Line => Shape::Line(typed(index, kind, body)?),
        ShapeKind::Polygon => Shape::Polygon(typed(index, kind, body)?),
    };
    Ok(shape)
}

/// Missing required fields are structural failures, so they are caught here
/// rather than surfacing as serde errors.
fn check_required(
    index: usize,
    kind: ShapeKind,
    fields: &Map<String, Value>,
) -> Result<(), Malformed> {
    match kind {
        ShapeKind::Point => match missing_coord(fields) {
            Some(field) => Err(Malformed::MissingField { index, kind, field }),
            None => Ok(()),
        },
        ShapeKind::Line | ShapeKind::Polygon => {
            let points = match fields.get(POINTS) {
                None | Some(Value::Null) => {
                    return Err(Malformed::MissingField {
                        index,
                        kind,
                        field: POINTS,
                    });
                }
                Some(points) => points,
            };
            // non-list or non-object vertices are type mismatches, left to serde
            if let Value::Array(vertices) = points {
                for (vertex, value) in vertices.iter().enumerate() {
                    if let Some(field) = value.as_object().and_then(missing_coord) {
                        return Err(Malformed::MissingVertexField {
                            index,
                            kind,
                            vertex,
                            field,
                        });
                    }
                }
            }
            Ok(())
        }
    }
}

fn missing_coord(fields: &Map<String, Value>) -> Option<&'static str> {
    COORDS
        .into_iter()
        .find(|name| matches!(fields.get(*name), None | Some(Value::Null)))
}

fn typed<T>(index: usize, kind: ShapeKind, body: Value) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(body)
        .map_err(|source| DecodeError::FieldTypeMismatch { index, kind, source })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Line, Point, Polygon};

    const REFERENCE: &str = r#"{
        "items": [
            { "item": "point", "color": "red", "x": 12, "y": 32 },
            { "item": "line", "draw_points": true, "color": "blue", "points": [{"color": "red", "x": 2, "y": 3.4}, {"x": 1.3, "y": 5}]},
            { "item": "polygon", "draw_points": false, "fill": "green", "color": "blue", "points": [{"color": "red", "x": 2, "y": 3.4}, {"x": 1.3, "y": 5}]}
        ]
    }"#;

    const REFERENCE_ENCODED: &str = r#"{"items":[{"item":"point","color":"red","x":12,"y":32},{"item":"line","color":"blue","draw_points":true,"points":[{"color":"red","x":2,"y":3.4},{"x":1.3,"y":5}]},{"item":"polygon","color":"blue","fill":"green","points":[{"color":"red","x":2,"y":3.4},{"x":1.3,"y":5}]}]}"#;

    fn reference_vertices() -> Vec<Point> {
        vec![Point::new(2.0, 3.4).with_color("red"), Point::new(1.3, 5.0)]
    }

    #[test]
    fn decodes_reference_document() {
        let scene = decode_str(REFERENCE).unwrap();

        assert_eq!(scene.len(), 3);
        assert_eq!(scene.items[0], Shape::Point(Point::new(12.0, 32.0).with_color("red")));
        assert_eq!(
            scene.items[1],
            Shape::Line(
                Line::new(reference_vertices())
                    .with_color("blue")
                    .with_draw_points(true)
            )
        );
        assert_eq!(
            scene.items[2],
            Shape::Polygon(
                Polygon::new(reference_vertices())
                    .with_color("blue")
                    .with_fill("green")
            )
        );
    }

    #[test]
    fn reencodes_reference_document_byte_for_byte() {
        let scene = decode_str(REFERENCE).unwrap();
        assert_eq!(encode_string(&scene).unwrap(), REFERENCE_ENCODED);
    }

    #[test]
    fn encode_omits_default_attributes() {
        let scene = Scene::new([
            Point::new(1.0, 2.0).into(),
            Line::new([Point::new(0.0, 0.0)]).into(),
            Polygon::new([]).into(),
        ]);
        assert_eq!(
            encode_string(&scene).unwrap(),
            r#"{"items":[{"item":"point","x":1,"y":2},{"item":"line","points":[{"x":0,"y":0}]},{"item":"polygon","points":[]}]}"#
        );
    }

    #[test]
    fn encode_writes_labels_after_geometry() {
        let scene = Scene::new([Point::new(1.0, 2.0).with_label("origin", 0.5, 0.0).into()]);
        assert_eq!(
            encode_string(&scene).unwrap(),
            r#"{"items":[{"item":"point","x":1,"y":2,"label":"origin","label_x":0.5}]}"#
        );
    }

    #[test]
    fn empty_scene_encodes_to_empty_list() {
        assert_eq!(encode_string(&Scene::default()).unwrap(), r#"{"items":[]}"#);
        assert_eq!(decode_str(r#"{"items":[]}"#).unwrap(), Scene::default());
    }

    #[test]
    fn unknown_kind_is_reported_with_its_tag() {
        let err = decode_str(r#"{"items":[{"item":"circle","x":0,"y":0}]}"#).unwrap_err();
        match err {
            DecodeError::UnknownShapeKind { index, kind } => {
                assert_eq!(index, 0);
                assert_eq!(kind, "circle");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn one_bad_item_aborts_the_whole_decode() {
        let err = decode_str(
            r#"{"items":[{"item":"point","x":0,"y":0},{"item":"hexagon","points":[]},{"item":"point","x":1,"y":1}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownShapeKind { index: 1, .. }));
    }

    #[test]
    fn envelope_failures_are_malformed() {
        let cases = [
            "not json",
            "[]",
            r#"{"shapes":[]}"#,
            r#"{"items":{}}"#,
            r#"{"items":null}"#,
        ];
        for case in cases {
            let err = decode_str(case).unwrap_err();
            assert!(
                matches!(err, DecodeError::MalformedDocument(_)),
                "{case}: {err:?}"
            );
            assert_eq!(err.index(), None);
        }
    }

    #[test]
    fn discriminator_must_be_a_present_string() {
        let err = decode_str(r#"{"items":[{"x":0,"y":0}]}"#).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedDocument(Malformed::MissingDiscriminator { index: 0 })
        ));

        let err = decode_str(r#"{"items":[{"item":3,"x":0,"y":0}]}"#).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedDocument(Malformed::DiscriminatorNotAString { index: 0 })
        ));

        let err = decode_str(r#"{"items":["point"]}"#).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedDocument(Malformed::ItemNotAnObject { index: 0 })
        ));
    }

    #[test]
    fn missing_required_fields_are_malformed() {
        let err = decode_str(r#"{"items":[{"item":"point","x":1}]}"#).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedDocument(Malformed::MissingField { field: "y", .. })
        ));

        let err = decode_str(r#"{"items":[{"item":"line","color":"red"}]}"#).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedDocument(Malformed::MissingField { field: "points", .. })
        ));

        let err = decode_str(
            r#"{"items":[{"item":"polygon","points":[{"x":0,"y":0},{"y":1}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedDocument(Malformed::MissingVertexField {
                index: 0,
                vertex: 1,
                field: "x",
                ..
            })
        ));
    }

    #[test]
    fn wrong_field_types_are_mismatches() {
        let cases = [
            r#"{"items":[{"item":"point","x":"1","y":0}]}"#,
            r#"{"items":[{"item":"point","x":1,"y":0,"color":7}]}"#,
            r#"{"items":[{"item":"line","points":{}}]}"#,
            r#"{"items":[{"item":"line","points":[[1,2]]}]}"#,
            r#"{"items":[{"item":"line","points":[],"draw_points":"yes"}]}"#,
            r#"{"items":[{"item":"polygon","points":[],"fill":false}]}"#,
            r#"{"items":[{"item":"polygon","points":[{"x":true,"y":0}]}]}"#,
        ];
        for case in cases {
            let err = decode_str(case).unwrap_err();
            assert!(
                matches!(err, DecodeError::FieldTypeMismatch { index: 0, .. }),
                "{case}: {err:?}"
            );
        }
    }

    #[test]
    fn null_optional_attributes_read_as_absent() {
        let scene = decode_str(
            r#"{"items":[{"item":"polygon","color":null,"fill":null,"draw_points":null,"label":null,"points":[]}]}"#,
        )
        .unwrap();
        assert_eq!(scene.items[0], Shape::Polygon(Polygon::new([])));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let scene =
            decode_str(r#"{"version":2,"items":[{"item":"point","x":1,"y":2,"radius":4}]}"#)
                .unwrap();
        assert_eq!(scene.items[0], Shape::Point(Point::new(1.0, 2.0)));
    }

    #[test]
    fn non_applicable_attributes_are_not_carried() {
        let scene = decode_str(
            r#"{"items":[{"item":"point","x":1,"y":2,"fill":"green","draw_points":true}]}"#,
        )
        .unwrap();
        assert_eq!(
            encode_string(&scene).unwrap(),
            r#"{"items":[{"item":"point","x":1,"y":2}]}"#
        );
    }

    #[test]
    fn non_finite_coordinates_fail_at_encode() {
        let scenes = [
            Scene::new([Point::new(f32::NAN, 0.0).into()]),
            Scene::new([Point::new(0.0, f32::NEG_INFINITY).into()]),
            Scene::new([Line::new([Point::new(1.0, f32::INFINITY)]).into()]),
            Scene::new([Point::new(0.0, 0.0).with_label("a", f32::NAN, 0.0).into()]),
            Scene::new([Polygon::new([]).with_label("b", 0.0, f32::INFINITY).into()]),
        ];
        for scene in &scenes {
            assert!(encode(scene).is_err(), "{scene:?}");
        }
    }

    #[test]
    fn coordinates_beyond_f32_range_are_mismatches() {
        let cases = [
            r#"{"items":[{"item":"point","x":1e300,"y":0}]}"#,
            r#"{"items":[{"item":"point","x":0,"y":-1e39}]}"#,
            r#"{"items":[{"item":"line","points":[{"x":0,"y":1e300}]}]}"#,
            r#"{"items":[{"item":"point","x":0,"y":0,"label":"a","label_x":1e300}]}"#,
            r#"{"items":[{"item":"polygon","points":[],"label_y":-1e300}]}"#,
        ];
        for case in cases {
            let err = decode_str(case).unwrap_err();
            assert!(
                matches!(err, DecodeError::FieldTypeMismatch { index: 0, .. }),
                "{case}: {err:?}"
            );
        }
    }

    #[test]
    fn largest_f32_coordinates_still_decode() {
        let scene = decode_str(r#"{"items":[{"item":"point","x":3.4e38,"y":-3.4e38}]}"#).unwrap();
        assert_eq!(scene.items[0], Shape::Point(Point::new(3.4e38, -3.4e38)));
    }
}
