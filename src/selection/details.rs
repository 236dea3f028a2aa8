//! The measures pseudo-axis.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};
use crate::metadata::Measure;

use super::axis::AxisLocation;
use super::calculated::CalculatedMeasure;

/// Which side of the axis cross join the measures take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureLocation {
    Top,
    #[default]
    Bottom,
}

/// A stored or calculated measure placed on the details axis.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailMeasure {
    Stored(Measure),
    Calculated(CalculatedMeasure),
}

impl DetailMeasure {
    pub fn name(&self) -> &str {
        match self {
            DetailMeasure::Stored(m) => &m.name,
            DetailMeasure::Calculated(m) => m.name(),
        }
    }

    pub fn unique_name(&self) -> &str {
        match self {
            DetailMeasure::Stored(m) => &m.unique_name,
            DetailMeasure::Calculated(m) => m.unique_name(),
        }
    }
}

/// Ordered, duplicate-free measures and where they go.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDetails {
    measures: Vec<DetailMeasure>,
    location: MeasureLocation,
    axis: AxisLocation,
}

impl Default for QueryDetails {
    fn default() -> Self {
        Self {
            measures: vec![],
            location: MeasureLocation::default(),
            axis: AxisLocation::Columns,
        }
    }
}

impl QueryDetails {
    pub fn measures(&self) -> &[DetailMeasure] {
        &self.measures
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    /// Append a measure; a measure already present stays where it is.
    pub fn add(&mut self, measure: DetailMeasure) {
        if self.position(measure.unique_name()).is_none() {
            self.measures.push(measure);
        }
    }

    /// Insert a measure at `position`, moving it if already present.
    pub fn set(&mut self, measure: DetailMeasure, position: usize) {
        self.remove(measure.unique_name());
        let at = position.min(self.measures.len());
        self.measures.insert(at, measure);
    }

    /// Swap in a new definition for a calculated measure already placed here.
    pub(crate) fn refresh_calculated(&mut self, cm: &CalculatedMeasure) {
        for measure in &mut self.measures {
            if let DetailMeasure::Calculated(existing) = measure {
                if existing.unique_name() == cm.unique_name() {
                    *existing = cm.clone();
                }
            }
        }
    }

    pub fn remove(&mut self, unique_name: &str) -> Option<DetailMeasure> {
        self.position(unique_name).map(|i| self.measures.remove(i))
    }

    pub fn clear(&mut self) {
        self.measures.clear();
    }

    pub fn location(&self) -> MeasureLocation {
        self.location
    }

    pub fn set_location(&mut self, location: MeasureLocation) {
        self.location = location;
    }

    /// Axis the measures are crossed into.
    pub fn axis(&self) -> AxisLocation {
        self.axis
    }

    /// Fails for [`AxisLocation::Unused`].
    pub fn set_axis(&mut self, axis: AxisLocation) -> QueryResult<()> {
        if axis == AxisLocation::Unused {
            return Err(QueryError::InvalidArgument(
                "Measures cannot be placed on the unused axis".into(),
            ));
        }
        self.axis = axis;
        Ok(())
    }

    fn position(&self, unique_name: &str) -> Option<usize> {
        self.measures
            .iter()
            .position(|m| m.unique_name() == unique_name)
    }
}
