use geo::{Distance, Euclidean};
use geo_types::Point;

use crate::models::{GeoPoint, Row};

/// Distances closer than this (in degrees) count as a tie.
const TIE_EPSILON_DEG: f64 = 1e-12;

/// Nearest row to a point, before any threshold is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub row_index: u32,
    pub distance_meters: f64,
}

/// Find the row whose centerline is closest to `point`.
///
/// Distance is planar Euclidean point-to-line-string in degrees (the
/// nearest point may sit inside any segment), scaled by
/// `meters_per_degree`. Ties go to the lowest row index. Returns `None`
/// only when `rows` is empty.
pub fn resolve(point: GeoPoint, rows: &[Row], meters_per_degree: f64) -> Option<Proximity> {
    let point: Point<f64> = point.into();
    let mut best: Option<(u32, f64)> = None;

    for row in rows {
        let dist = Euclidean.distance(&point, &row.centerline);
        best = match best {
            None => Some((row.index, dist)),
            Some((best_index, best_dist)) => {
                let closer = dist < best_dist - TIE_EPSILON_DEG;
                let tied = (dist - best_dist).abs() <= TIE_EPSILON_DEG;
                if closer || (tied && row.index < best_index) {
                    Some((row.index, dist))
                } else {
                    Some((best_index, best_dist))
                }
            }
        };
    }

    best.map(|(row_index, dist)| Proximity {
        row_index,
        distance_meters: dist * meters_per_degree,
    })
}
