//! GeoJSON → Features.
//!
//! Akzeptiert eine `FeatureCollection`, ein einzelnes `Feature` oder eine
//! nackte Geometrie. Koordinaten sind WGS84 (EPSG:4326) und werden nach
//! Web Mercator projiziert. `GeometryCollection`s werden aufgelöst.

use super::ImportedFeature;
use crate::core::{lon_lat_to_mercator, EditorError, Geometry, SplineOptions};
use glam::DVec2;
use serde_json::{Map, Value};

fn geojson_err(message: impl Into<String>) -> EditorError {
    EditorError::GeoJsonImport(message.into())
}

fn position(value: &Value) -> Result<DVec2, EditorError> {
    let coords = value
        .as_array()
        .ok_or_else(|| geojson_err("Position ist kein Array"))?;
    match coords.as_slice() {
        [lon, lat, ..] => match (lon.as_f64(), lat.as_f64()) {
            (Some(lon), Some(lat)) => Ok(lon_lat_to_mercator(DVec2::new(lon, lat))),
            _ => Err(geojson_err("Position enthält keine Zahlen")),
        },
        _ => Err(geojson_err("Position braucht mindestens zwei Werte")),
    }
}

fn positions(value: &Value) -> Result<Vec<DVec2>, EditorError> {
    value
        .as_array()
        .ok_or_else(|| geojson_err("Koordinatenliste erwartet"))?
        .iter()
        .map(position)
        .collect()
}

fn rings(value: &Value) -> Result<Vec<Vec<DVec2>>, EditorError> {
    value
        .as_array()
        .ok_or_else(|| geojson_err("Ringliste erwartet"))?
        .iter()
        .map(positions)
        .collect()
}

/// Liest eine Geometrie. `GeometryCollection` liefert mehrere.
fn geometries(value: &Value) -> Result<Vec<Geometry>, EditorError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| geojson_err("Geometrie ohne 'type'"))?;
    if kind == "GeometryCollection" {
        let mut out = Vec::new();
        for member in value
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| geojson_err("GeometryCollection ohne 'geometries'"))?
        {
            out.extend(geometries(member)?);
        }
        return Ok(out);
    }

    let coords = value
        .get("coordinates")
        .ok_or_else(|| geojson_err(format!("{} ohne 'coordinates'", kind)))?;
    let geometry = match kind {
        "Point" => Geometry::Point(position(coords)?),
        "MultiPoint" => {
            return Ok(positions(coords)?.into_iter().map(Geometry::Point).collect());
        }
        "LineString" => Geometry::LineString(positions(coords)?),
        "MultiLineString" => Geometry::MultiLineString(rings(coords)?),
        "Polygon" => Geometry::Polygon(rings(coords)?),
        "MultiPolygon" => Geometry::MultiPolygon(
            coords
                .as_array()
                .ok_or_else(|| geojson_err("Polygonliste erwartet"))?
                .iter()
                .map(rings)
                .collect::<Result<_, _>>()?,
        ),
        other => return Err(geojson_err(format!("unbekannter Geometrietyp '{}'", other))),
    };
    Ok(vec![geometry])
}

/// Spline-Markierung aus den Properties (`isSpline`, `splineOptions`).
fn spline_from_properties(properties: &Map<String, Value>) -> Option<SplineOptions> {
    if !properties.get("isSpline").and_then(Value::as_bool)? {
        return None;
    }
    Some(
        properties
            .get("splineOptions")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default(),
    )
}

fn read_feature(value: &Value, out: &mut Vec<ImportedFeature>) -> Result<(), EditorError> {
    let Some(geometry) = value.get("geometry").filter(|g| !g.is_null()) else {
        log::debug!("GeoJSON: Feature ohne Geometrie übersprungen");
        return Ok(());
    };
    let empty = Map::new();
    let properties = value
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let name = properties
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string);
    let spline = spline_from_properties(properties);

    for geometry in geometries(geometry)? {
        if !geometry.is_valid() {
            log::warn!("GeoJSON: ungültige {} übersprungen", geometry.type_name());
            continue;
        }
        let spline = spline.filter(|_| matches!(geometry, Geometry::LineString(_)));
        out.push(ImportedFeature {
            geometry,
            style: None,
            spline,
            name: name.clone(),
            source: "geojson",
        });
    }
    Ok(())
}

/// Liest alle Features. Styles bleiben leer (Typ-Standard beim Einfügen).
pub fn parse(text: &str) -> Result<Vec<ImportedFeature>, EditorError> {
    let root: Value = serde_json::from_str(text).map_err(|e| geojson_err(e.to_string()))?;
    let kind = root
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| geojson_err("Objekt ohne 'type'"))?;

    let mut features = Vec::new();
    match kind {
        "FeatureCollection" => {
            let members = root
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| geojson_err("FeatureCollection ohne 'features'"))?;
            for member in members {
                read_feature(member, &mut features)?;
            }
        }
        "Feature" => read_feature(&root, &mut features)?,
        _ => {
            for geometry in geometries(&root)? {
                features.push(ImportedFeature {
                    geometry,
                    style: None,
                    spline: None,
                    name: None,
                    source: "geojson",
                });
            }
        }
    }

    if features.is_empty() {
        return Err(EditorError::EmptyImport("GeoJSON"));
    }
    log::info!("GeoJSON gelesen: {} Features", features.len());
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mercator_to_lon_lat;
    use approx::assert_relative_eq;

    #[test]
    fn feature_collection_is_projected_to_mercator() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "Weg"},
                 "geometry": {"type": "LineString", "coordinates": [[10.0, 50.0], [10.5, 50.5, 120.0]]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}},
                {"type": "Feature", "properties": {}, "geometry": null}
            ]
        }"#;

        let features = parse(text).expect("GeoJSON sollte lesbar sein");

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name.as_deref(), Some("Weg"));
        let Geometry::LineString(coords) = &features[0].geometry else {
            panic!("Linie erwartet");
        };
        let back = mercator_to_lon_lat(coords[1]);
        assert_relative_eq!(back.x, 10.5, epsilon = 1e-9);
        assert_relative_eq!(back.y, 50.5, epsilon = 1e-9);
        assert!(features[1].geometry.is_area());
        assert!(features.iter().all(|f| f.style.is_none()));
    }

    #[test]
    fn bare_geometry_and_collection_are_accepted() {
        let point = parse(r#"{"type": "Point", "coordinates": [0, 0]}"#).expect("Punkt");
        let Geometry::Point(p) = point[0].geometry else {
            panic!("Punkt erwartet");
        };
        assert_relative_eq!(p.length(), 0.0, epsilon = 1e-6);

        let collection = parse(
            r#"{"type": "Feature", "properties": {},
                "geometry": {"type": "GeometryCollection", "geometries": [
                    {"type": "Point", "coordinates": [1, 1]},
                    {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}
                ]}}"#,
        )
        .expect("GeometryCollection");
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn spline_properties_survive_import() {
        let text = r#"{"type": "Feature",
            "properties": {"isSpline": true, "splineOptions": {"tension": 0.2, "pointsPerSeg": 8, "normalize": true}},
            "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1], [2, 0], [3, 1]]}}"#;

        let features = parse(text).expect("GeoJSON sollte lesbar sein");

        assert_eq!(
            features[0].spline,
            Some(SplineOptions {
                tension: 0.2,
                points_per_seg: 8,
                normalize: true,
            })
        );
    }

    #[test]
    fn invalid_and_empty_input_is_reported() {
        assert!(matches!(parse("kein json"), Err(EditorError::GeoJsonImport(_))));
        assert_eq!(
            parse(r#"{"type": "FeatureCollection", "features": []}"#),
            Err(EditorError::EmptyImport("GeoJSON"))
        );
        assert!(matches!(
            parse(r#"{"type": "Torus", "coordinates": []}"#),
            Err(EditorError::GeoJsonImport(_))
        ));
    }
}
