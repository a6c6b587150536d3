use std::collections::BTreeMap;

use geo_types::LineString;
use serde::{Deserialize, Serialize};

use crate::error::{TrackError, TrackResult};
use crate::models::Row;

/// Spacing between neighbouring rows of the built-in plots, in degrees of longitude.
const DEMO_ROW_SPACING_DEG: f64 = 0.00003;

/// Static row coordinates for one plot.
///
/// Each row is an ordered list of `[lon, lat]` pairs; row indices are
/// assigned from list order starting at 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotDefinition {
    pub name: String,
    pub rows: Vec<Vec<[f64; 2]>>,
}

impl PlotDefinition {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<[f64; 2]>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Convert every coordinate list into a fresh, unsprayed row.
    pub fn build_rows(&self) -> TrackResult<Vec<Row>> {
        if self.rows.is_empty() {
            return Err(self.invalid("plot has no rows".to_string()));
        }

        self.rows
            .iter()
            .enumerate()
            .map(|(i, coords)| {
                let index = i as u32 + 1;
                if coords.len() < 2 {
                    return Err(self.invalid(format!(
                        "row {index}: centerline needs at least 2 points, got {}",
                        coords.len()
                    )));
                }
                if let Some([lon, lat]) = coords
                    .iter()
                    .find(|[lon, lat]| !(lon.is_finite() && lat.is_finite()))
                {
                    return Err(self.invalid(format!(
                        "row {index}: non-finite coordinate ({lon}, {lat})"
                    )));
                }
                let centerline: LineString<f64> =
                    coords.iter().map(|&[lon, lat]| (lon, lat)).collect();
                Ok(Row::new(index, centerline))
            })
            .collect()
    }

    fn invalid(&self, reason: String) -> TrackError {
        TrackError::InvalidGeometry {
            plot: self.name.clone(),
            reason,
        }
    }
}

/// Registry of known plots, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct PlotRegistry {
    plots: BTreeMap<String, PlotDefinition>,
}

impl PlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the demo plots.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for plot in [my_vineyard(), hillside_block()] {
            // Built-in geometry is static and well-formed.
            registry.plots.insert(plot.name.clone(), plot);
        }
        registry
    }

    /// Add or replace a plot. The definition is validated up front so a
    /// malformed plot never becomes selectable.
    pub fn register(&mut self, plot: PlotDefinition) -> TrackResult<()> {
        plot.build_rows()?;
        self.plots.insert(plot.name.clone(), plot);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PlotDefinition> {
        self.plots.get(name)
    }

    pub fn build_rows(&self, name: &str) -> TrackResult<Vec<Row>> {
        self.plots
            .get(name)
            .ok_or_else(|| TrackError::UnknownPlot(name.to_string()))?
            .build_rows()
    }

    pub fn plot_names(&self) -> Vec<String> {
        self.plots.keys().cloned().collect()
    }
}

/// Five straight north-south rows; row 1 runs along lon 73.85672.
fn my_vineyard() -> PlotDefinition {
    let rows = (0..5)
        .map(|i| {
            let lon = 73.85672 + i as f64 * DEMO_ROW_SPACING_DEG;
            vec![[lon, 18.52040], [lon, 18.52080]]
        })
        .collect();
    PlotDefinition::new("My Vineyard", rows)
}

/// Three rows that bend east halfway up the slope.
fn hillside_block() -> PlotDefinition {
    let rows = (0..3)
        .map(|i| {
            let lon = 73.86000 + i as f64 * DEMO_ROW_SPACING_DEG;
            vec![
                [lon, 18.52500],
                [lon + 0.00002, 18.52530],
                [lon + 0.00002, 18.52560],
            ]
        })
        .collect();
    PlotDefinition::new("Hillside Block", rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rows_are_fresh_and_one_based() {
        let registry = PlotRegistry::builtin();
        let rows = registry.build_rows("My Vineyard").unwrap();

        assert_eq!(rows.len(), 5);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.index, i as u32 + 1);
            assert!(!row.sprayed);
            assert!(row.last_sprayed_at.is_none());
            assert!(row.centerline.0.len() >= 2);
        }
    }

    #[test]
    fn building_is_deterministic() {
        let registry = PlotRegistry::builtin();
        let a = registry.build_rows("Hillside Block").unwrap();
        let b = registry.build_rows("Hillside Block").unwrap();
        let a: Vec<_> = a.into_iter().map(|r| r.centerline).collect();
        let b: Vec<_> = b.into_iter().map(|r| r.centerline).collect();
        assert_eq!(a, b);
        assert_eq!(a[1].0.len(), 3);
    }

    #[test]
    fn unknown_plot_is_reported() {
        let registry = PlotRegistry::builtin();
        let err = registry.build_rows("Nowhere").unwrap_err();
        assert_eq!(err, TrackError::UnknownPlot("Nowhere".into()));
    }

    #[test]
    fn single_point_row_is_invalid_geometry() {
        let plot = PlotDefinition::new(
            "Broken",
            vec![vec![[0.0, 0.0], [0.0, 1.0]], vec![[1.0, 0.0]]],
        );
        match plot.build_rows() {
            Err(TrackError::InvalidGeometry { plot, reason }) => {
                assert_eq!(plot, "Broken");
                assert!(reason.starts_with("row 2:"), "reason: {reason}");
            }
            other => panic!("expected InvalidGeometry, got {other:?}"),
        }
    }

    #[test]
    fn plot_without_rows_is_invalid_geometry() {
        let mut registry = PlotRegistry::new();
        let err = registry.register(PlotDefinition::new("Empty", vec![])).unwrap_err();
        assert!(matches!(err, TrackError::InvalidGeometry { .. }));
        assert!(registry.get("Empty").is_none());
    }

    #[test]
    fn register_rejects_malformed_plot() {
        let mut registry = PlotRegistry::new();
        let plot = PlotDefinition::new("Nan", vec![vec![[f64::NAN, 0.0], [0.0, 1.0]]]);
        assert!(registry.register(plot).is_err());
        assert!(registry.plot_names().is_empty());
    }

    #[test]
    fn plot_definitions_load_from_json() {
        let json = r#"{"name": "Block C", "rows": [[[73.1, 18.1], [73.1, 18.2]]]}"#;
        let plot: PlotDefinition = serde_json::from_str(json).unwrap();
        let mut registry = PlotRegistry::new();
        registry.register(plot).unwrap();
        assert_eq!(registry.plot_names(), vec!["Block C".to_string()]);
    }
}
