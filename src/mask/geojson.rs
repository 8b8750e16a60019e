use anyhow::{Context, Result, bail};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::merge::LandMassSet;
use crate::domain::Ring;

#[derive(Debug, Serialize, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    type_: String,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Feature {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    properties: Option<Properties>,
    geometry: Geometry,
}

#[derive(Debug, Serialize, Deserialize)]
struct Properties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rank: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    area: Option<f64>,
}

/// Polygon geometry; coordinates are `[lon, lat]`, outer ring first
#[derive(Debug, Serialize, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    type_: String,
    coordinates: Vec<Vec<[f64; 2]>>,
}

fn to_feature_collection(set: &LandMassSet) -> FeatureCollection {
    let features = set
        .polygons
        .iter()
        .map(|polygon| Feature {
            type_: "Feature".to_string(),
            properties: Some(Properties {
                source: Some(polygon.source.as_str().to_string()),
                rank: polygon.rank,
                area: Some(polygon.area),
            }),
            geometry: Geometry {
                type_: "Polygon".to_string(),
                coordinates: vec![
                    polygon
                        .ring
                        .points
                        .iter()
                        .map(|&(lon, lat)| [lon, lat])
                        .collect(),
                ],
            },
        })
        .collect();

    FeatureCollection {
        type_: "FeatureCollection".to_string(),
        features,
    }
}

/// Render the land mask as a pretty-printed GeoJSON FeatureCollection
pub fn to_geojson_string(set: &LandMassSet) -> Result<String> {
    serde_json::to_string_pretty(&to_feature_collection(set))
        .context("Failed to serialize land mask")
}

/// Write the land mask to `path`, creating parent directories as needed
pub fn write_land_mask(path: &Path, set: &LandMassSet) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create land mask file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &to_feature_collection(set))
        .context("Failed to serialize land mask")?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Read the outer rings of every Polygon feature in a land-mask file
pub fn read_land_mask(path: &Path) -> Result<Vec<Ring>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read land mask: {}", path.display()))?;
    let collection: FeatureCollection = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse land mask: {}", path.display()))?;

    let mut rings = Vec::with_capacity(collection.features.len());
    for (i, feature) in collection.features.into_iter().enumerate() {
        if feature.geometry.type_ != "Polygon" {
            bail!(
                "Feature {} in {} is a {}, expected Polygon",
                i,
                path.display(),
                feature.geometry.type_
            );
        }
        let Some(outer) = feature.geometry.coordinates.into_iter().next() else {
            continue;
        };
        let points = outer.into_iter().map(|[lon, lat]| (lon, lat)).collect();
        match Ring::from_outline(points) {
            Some(ring) => rings.push(ring),
            None => warn!(
                "Feature {} in {} has fewer than 3 distinct vertices, skipped",
                i,
                path.display()
            ),
        }
    }

    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoredRing;
    use crate::mask::merge_land_mask;
    use tempfile::tempdir;

    fn sample_set() -> LandMassSet {
        let island =
            Ring::from_outline(vec![(-122.40, 37.80), (-122.39, 37.80), (-122.39, 37.81)]).unwrap();
        let mainland = Ring::from_outline(vec![
            (-122.52, 37.70),
            (-122.36, 37.70),
            (-122.36, 37.80),
            (-122.52, 37.80),
        ])
        .unwrap();
        merge_land_mask(vec![ScoredRing::new(island)], mainland)
    }

    #[test]
    fn test_geojson_layout() {
        let json = to_geojson_string(&sample_set()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["type"], "Polygon");
        assert_eq!(features[0]["properties"]["source"], "coastline");
        assert_eq!(features[0]["properties"]["rank"], 1);
        // Coordinates are [lon, lat]
        assert_eq!(features[0]["geometry"]["coordinates"][0][0][0], -122.40);
        assert_eq!(features[1]["properties"]["source"], "mainland");
        assert!(features[1]["properties"].get("rank").is_none());
    }

    #[test]
    fn test_output_is_byte_identical() {
        let first = to_geojson_string(&sample_set()).unwrap();
        let second = to_geojson_string(&sample_set()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("land_mask.geojson");

        let set = sample_set();
        write_land_mask(&path, &set).unwrap();

        let rings = read_land_mask(&path).unwrap();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[1], set.polygons[1].ring);
    }

    #[test]
    fn test_read_skips_degenerate_feature() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.geojson");
        std::fs::write(
            &path,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Polygon",
                 "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]}},
                {"type": "Feature", "geometry": {"type": "Polygon",
                 "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}}
            ]}"#,
        )
        .unwrap();

        let rings = read_land_mask(&path).unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].points[2], (1.0, 1.0));
    }

    #[test]
    fn test_read_rejects_non_polygon() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.geojson");
        std::fs::write(
            &path,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [[[0.0, 0.0]]]}}
            ]}"#,
        )
        .unwrap();

        assert!(read_land_mask(&path).is_err());
    }
}
