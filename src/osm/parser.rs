use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::api::OverpassResponse;
use crate::coastline::Discard;
use crate::domain::{Ring, Segment};

/// Coastline input: an Overpass response or a bare list of `[lat, lon]` ways
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoastlineInput {
    Overpass(OverpassResponse),
    Ways(Vec<Vec<[f64; 2]>>),
}

/// Segments accepted at intake plus the number of malformed ways dropped
#[derive(Debug, Default)]
pub struct Intake {
    pub segments: Vec<Segment>,
    pub malformed: usize,
}

impl Intake {
    fn push(&mut self, id: u64, points: Vec<(f64, f64)>) {
        let segment = Segment::new(id, points);
        if segment.is_valid() {
            self.segments.push(segment);
        } else {
            debug!(
                "{}",
                Discard::MalformedSegment {
                    id,
                    points: segment.points.len()
                }
            );
            self.malformed += 1;
        }
    }
}

fn build_node_lookup(response: &OverpassResponse) -> HashMap<u64, (f64, f64)> {
    response
        .elements
        .iter()
        .filter(|e| e.type_ == "node")
        .filter_map(|e| {
            let lat = e.lat?;
            let lon = e.lon?;
            Some((e.id, (lon, lat)))
        })
        .collect()
}

/// Parse Overpass response into coastline segments
///
/// # Algorithm
/// 1. Build node_id → (lon, lat) lookup map from all node elements
/// 2. For each way element:
///    - Use inline `geometry` when present (`out geom`)
///    - Otherwise resolve node refs, dropping refs with no node
///    - Ways left with fewer than 2 points are counted as malformed
pub fn parse_coastline(response: &OverpassResponse) -> Intake {
    let nodes = build_node_lookup(response);
    let mut intake = Intake::default();

    for element in &response.elements {
        if element.type_ != "way" {
            continue;
        }

        let points: Vec<(f64, f64)> = if let Some(geometry) = &element.geometry {
            geometry.iter().map(|p| (p.lon, p.lat)).collect()
        } else if let Some(node_refs) = &element.nodes {
            node_refs
                .iter()
                .filter_map(|id| nodes.get(id).copied())
                .collect()
        } else {
            Vec::new()
        };

        intake.push(element.id, points);
    }

    intake
}

fn parse_way_list(ways: Vec<Vec<[f64; 2]>>) -> Intake {
    let mut intake = Intake::default();
    for (i, way) in ways.into_iter().enumerate() {
        let points = way.into_iter().map(|[lat, lon]| (lon, lat)).collect();
        intake.push(i as u64, points);
    }
    intake
}

/// Read coastline segments from a JSON file
pub fn read_segments(path: &Path) -> Result<Intake> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read coastline file: {}", path.display()))?;
    let input: CoastlineInput = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse coastline file: {}", path.display()))?;

    Ok(match input {
        CoastlineInput::Overpass(response) => parse_coastline(&response),
        CoastlineInput::Ways(ways) => parse_way_list(ways),
    })
}

/// Read the hand-traced mainland outline, a JSON array of `[lon, lat]` pairs
pub fn read_mainland(path: &Path) -> Result<Ring> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mainland outline: {}", path.display()))?;
    let outline: Vec<[f64; 2]> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse mainland outline: {}", path.display()))?;

    let points = outline.into_iter().map(|[lon, lat]| (lon, lat)).collect();
    match Ring::from_outline(points) {
        Some(ring) => Ok(ring),
        None => bail!(
            "Mainland outline {} needs at least 3 distinct vertices",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::overpass::Element;
    use std::fs;
    use tempfile::tempdir;

    fn node(id: u64, lat: f64, lon: f64) -> Element {
        Element {
            type_: "node".to_string(),
            id,
            nodes: None,
            geometry: None,
            tags: None,
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    fn way(id: u64, nodes: Vec<u64>) -> Element {
        Element {
            type_: "way".to_string(),
            id,
            nodes: Some(nodes),
            geometry: None,
            tags: Some({
                let mut m = HashMap::new();
                m.insert("natural".to_string(), "coastline".to_string());
                m
            }),
            lat: None,
            lon: None,
        }
    }

    #[test]
    fn test_parse_node_refs() {
        let response = OverpassResponse {
            elements: vec![
                node(1, 37.77, -122.42),
                node(2, 37.78, -122.43),
                way(100, vec![1, 2]),
            ],
        };

        let intake = parse_coastline(&response);
        assert_eq!(intake.segments.len(), 1);
        assert_eq!(intake.malformed, 0);
        // Stored as (lon, lat)
        assert_eq!(intake.segments[0].points[0], (-122.42, 37.77));
        assert_eq!(intake.segments[0].id, 100);
    }

    #[test]
    fn test_unresolved_refs_make_way_malformed() {
        let response = OverpassResponse {
            elements: vec![node(1, 37.77, -122.42), way(100, vec![1, 99])],
        };

        let intake = parse_coastline(&response);
        assert!(intake.segments.is_empty());
        assert_eq!(intake.malformed, 1);
    }

    #[test]
    fn test_read_plain_way_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ways.json");
        fs::write(
            &path,
            "[[[37.0, -122.0], [37.1, -122.1]], [[37.5, -122.5]], [[37.2, -122.2], [37.3, -122.3], [37.4, -122.4]]]",
        )
        .unwrap();

        let intake = read_segments(&path).unwrap();
        assert_eq!(intake.segments.len(), 2);
        assert_eq!(intake.malformed, 1);
        assert_eq!(intake.segments[1].id, 2);
        assert_eq!(intake.segments[1].points.len(), 3);
    }

    #[test]
    fn test_read_overpass_geom_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coastline.json");
        fs::write(
            &path,
            r#"{"elements": [{"type": "way", "id": 5,
                "geometry": [{"lat": 1.0, "lon": 2.0}, {"lat": 3.0, "lon": 4.0}]}]}"#,
        )
        .unwrap();

        let intake = read_segments(&path).unwrap();
        assert_eq!(intake.segments.len(), 1);
        assert_eq!(intake.segments[0].points, vec![(2.0, 1.0), (4.0, 3.0)]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(read_segments(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_read_mainland() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mainland.json");
        fs::write(&path, "[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]").unwrap();

        let ring = read_mainland(&path).unwrap();
        assert_eq!(ring.points.len(), 5);
        assert_eq!(ring.points.first(), ring.points.last());

        fs::write(&path, "[[0.0, 0.0], [1.0, 0.0]]").unwrap();
        assert!(read_mainland(&path).is_err());
    }

    #[test]
    fn test_read_mainland_rejects_repeated_vertices() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mainland.json");

        fs::write(&path, "[[0.0, 0.0], [1.0, 0.0], [1.0, 0.0]]").unwrap();
        assert!(read_mainland(&path).is_err());

        fs::write(&path, "[[0.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.0]]").unwrap();
        assert!(read_mainland(&path).is_err());
    }
}
