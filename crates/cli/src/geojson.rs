//! Coordinate-array JSON for geometries and the turn-graph dump.
//!
//! Accepted input nesting:
//! - ring: `[[x, y], ...]`
//! - polygon: `[[[x, y], ...], ...]` (exterior first, then holes)
//! - multi-polygon: `[[[[x, y], ...], ...], ...]`
//! - typed: `{"type": "LineString", "coordinates": ...}`, also `MultiLineString`,
//!   `Polygon` and `MultiPolygon`. Lines can only be given this way.
//!
//! Areal output is a bare multi-polygon array; linear output is a typed
//! `MultiLineString`.

use overlay::prelude::*;
use serde::{Deserialize, Serialize};

type Coords = Vec<[f64; 2]>;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum GeometryJson {
    Ring(Coords),
    Polygon(Vec<Coords>),
    MultiPolygon(Vec<Vec<Coords>>),
    Typed(TypedGeometry),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", content = "coordinates")]
pub enum TypedGeometry {
    LineString(Coords),
    MultiLineString(Vec<Coords>),
    Polygon(Vec<Coords>),
    MultiPolygon(Vec<Vec<Coords>>),
}

fn line_of(coords: &[[f64; 2]]) -> LineString {
    LineString::new(coords.iter().map(|&[x, y]| Point::new(x, y)).collect())
}

fn ring_of(coords: &[[f64; 2]]) -> Ring {
    Ring::new(coords.iter().map(|&[x, y]| Point::new(x, y)).collect())
}

fn polygon_of(rings: &[Coords]) -> Polygon {
    match rings.split_first() {
        Some((exterior, holes)) => {
            Polygon::new(ring_of(exterior), holes.iter().map(|h| ring_of(h)).collect())
        }
        None => Polygon::default(),
    }
}

fn coords_of(points: &[Point]) -> Coords {
    points.iter().map(|p| [p.x, p.y]).collect()
}

impl GeometryJson {
    pub fn to_geometry(&self) -> Geometry {
        match self {
            GeometryJson::Ring(c) => Geometry::Ring(ring_of(c)),
            GeometryJson::Polygon(rings) => Geometry::Polygon(polygon_of(rings)),
            GeometryJson::MultiPolygon(polys) => Geometry::MultiPolygon(MultiPolygon::new(
                polys.iter().map(|rings| polygon_of(rings)).collect(),
            )),
            GeometryJson::Typed(typed) => match typed {
                TypedGeometry::LineString(c) => Geometry::LineString(line_of(c)),
                TypedGeometry::MultiLineString(lines) => Geometry::MultiLineString(
                    MultiLineString::new(lines.iter().map(|c| line_of(c)).collect()),
                ),
                TypedGeometry::Polygon(rings) => Geometry::Polygon(polygon_of(rings)),
                TypedGeometry::MultiPolygon(polys) => Geometry::MultiPolygon(MultiPolygon::new(
                    polys.iter().map(|rings| polygon_of(rings)).collect(),
                )),
            },
        }
    }

    pub fn from_output(output: &OverlayOutput) -> Self {
        match output {
            OverlayOutput::Areal(mp) => Self::from_multi_polygon(mp),
            OverlayOutput::Linear(ml) => GeometryJson::Typed(TypedGeometry::MultiLineString(
                ml.lines.iter().map(|l| coords_of(&l.points)).collect(),
            )),
        }
    }

    pub fn from_multi_polygon(mp: &MultiPolygon) -> Self {
        GeometryJson::MultiPolygon(
            mp.polygons
                .iter()
                .map(|poly| {
                    std::iter::once(&poly.exterior)
                        .chain(&poly.interiors)
                        .map(|r| coords_of(&r.points))
                        .collect()
                })
                .collect(),
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OperationDump {
    pub source_index: usize,
    pub multi_index: usize,
    pub ring_index: isize,
    pub segment_index: usize,
    pub fraction: f64,
    pub operation: String,
    pub travels_to_ip_index: Option<usize>,
    pub travels_to_vertex_index: Option<usize>,
    pub region_id: Option<usize>,
    pub zone: Option<usize>,
    pub startable: bool,
    pub is_traversed: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct TurnDump {
    pub index: usize,
    pub point: [f64; 2],
    pub method: String,
    pub discarded: bool,
    pub cluster_id: Option<usize>,
    pub switch_source: bool,
    pub operations: Vec<OperationDump>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClusterDump {
    pub id: usize,
    pub turn_indices: Vec<usize>,
    pub open_count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct TurnGraphDump {
    pub target: String,
    pub turns: Vec<TurnDump>,
    pub clusters: Vec<ClusterDump>,
    pub regions: Vec<usize>,
}

impl TurnGraphDump {
    pub fn new(
        target: Operation,
        turns: &[Turn],
        clusters: &Clusters,
        regions: impl IntoIterator<Item = usize>,
    ) -> Self {
        let turns = turns
            .iter()
            .enumerate()
            .map(|(index, t)| TurnDump {
                index,
                point: [t.point.x, t.point.y],
                method: format!("{:?}", t.method),
                discarded: t.discarded,
                cluster_id: t.cluster_id,
                switch_source: t.switch_source,
                operations: t
                    .operations
                    .iter()
                    .map(|op| OperationDump {
                        source_index: op.seg_id.source_index,
                        multi_index: op.seg_id.multi_index,
                        ring_index: op.seg_id.ring_index,
                        segment_index: op.seg_id.segment_index,
                        fraction: op.fraction.value(),
                        operation: format!("{:?}", op.operation),
                        travels_to_ip_index: op.enriched.travels_to_ip_index,
                        travels_to_vertex_index: op.enriched.travels_to_vertex_index,
                        region_id: op.enriched.region_id,
                        zone: op.enriched.zone,
                        startable: op.enriched.startable,
                        is_traversed: op.enriched.is_traversed,
                    })
                    .collect(),
            })
            .collect();
        let clusters = clusters
            .iter()
            .map(|(&id, c)| ClusterDump {
                id,
                turn_indices: c.turn_indices.iter().copied().collect(),
                open_count: c.open_count,
            })
            .collect();
        Self {
            target: format!("{target:?}"),
            turns,
            clusters,
            regions: regions.into_iter().collect(),
        }
    }
}
