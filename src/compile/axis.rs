//! Axis sets and the measures crossing.

use tracing::debug;

use crate::error::QueryResult;
use crate::mdx::{cross_join_all, func, member, set, Expr, Identifier, WithSet};
use crate::selection::{AxisLocation, DetailMeasure, MeasureLocation, QuerySet};

use super::{Compiler, WithList};

impl Compiler<'_> {
    /// Compile an axis into the expression its clause refers to.
    ///
    /// The axis set is declared as `SET [Axis<NAME>]`; the measures, when
    /// they belong on this axis, are crossed with that name. Returns `None`
    /// for an axis that contributes nothing.
    pub(super) fn compile_axis(
        &self,
        location: AxisLocation,
        with: &mut WithList,
    ) -> QueryResult<Option<Expr>> {
        let Some(axis) = self.query.axis(location) else {
            return Ok(None);
        };
        debug!(axis = location.name(), "compiling axis");

        let expr = match self.override_of(axis.modifiers())? {
            Some(expr) => {
                debug!(axis = location.name(), "axis overridden, skipping hierarchies");
                Some(expr)
            }
            None => {
                let mut parts = Vec::new();
                for hierarchy in self.query.axis_hierarchies(location) {
                    if let Some(expr) = self.compile_hierarchy(hierarchy, with)? {
                        parts.push(expr);
                    }
                }
                cross_join_all(parts)
            }
        };
        let expr = expr
            .map(|e| self.wrap(e, axis.modifiers(), None))
            .transpose()?;

        let axis_ref = expr.map(|expr| {
            let name = Identifier::quoted(format!("Axis{}", location.name()));
            with.push_set(WithSet {
                name: name.clone(),
                expr,
            });
            Expr::Identifier(name)
        });

        self.cross_measures(location, axis_ref, with)
    }

    /// Cross the details measures into the axis that holds them.
    fn cross_measures(
        &self,
        location: AxisLocation,
        axis_ref: Option<Expr>,
        with: &mut WithList,
    ) -> QueryResult<Option<Expr>> {
        let details = self.query.details();
        if details.is_empty() || details.axis() != location {
            return Ok(axis_ref);
        }

        let mut measures = Vec::new();
        for measure in details.measures() {
            if let DetailMeasure::Calculated(cm) = measure {
                with.push_member(self.with_member(cm.as_member())?);
            }
            measures.push(member(measure.unique_name()));
        }
        let measures = set(measures);

        Ok(Some(match axis_ref {
            None => measures,
            Some(axis_ref) => match details.location() {
                MeasureLocation::Top => func("CrossJoin", vec![measures, axis_ref]),
                MeasureLocation::Bottom => func("CrossJoin", vec![axis_ref, measures]),
            },
        }))
    }
}
