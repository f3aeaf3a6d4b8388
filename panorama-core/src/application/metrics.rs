// panorama-core/src/application/metrics.rs

use tracing::{debug, info, instrument};

use crate::domain::catalog::{MetricCatalog, MetricOption, resolve_eligible_metrics};
use crate::domain::condition::reconcile_conditions_on_catalog_change;
use crate::domain::gate::QualityGate;
use crate::domain::repository::Project;

/// Metric options for every language used by the project's repositories.
#[instrument(skip(catalog, project), fields(project = %project.id))]
pub fn eligible_metrics_for_project(catalog: &MetricCatalog, project: &Project) -> Vec<MetricOption> {
    let languages = project.languages();
    let options = resolve_eligible_metrics(catalog, &languages);
    debug!(?languages, options = options.len(), "Resolved eligible metrics");
    options
}

/// Metric options for an organization gate, which may apply to repositories of
/// any language the catalog knows.
#[instrument(skip(catalog))]
pub fn eligible_metrics_for_organization(catalog: &MetricCatalog) -> Vec<MetricOption> {
    let options = resolve_eligible_metrics(catalog, catalog.languages.keys());
    debug!(options = options.len(), "Resolved organization metrics");
    options
}

/// Copy of `gate` whose conditions follow the catalog from the `previous`
/// language set to the `next` one. Conditions without a successor are dropped.
#[instrument(skip(catalog, gate), fields(gate = %gate.name))]
pub fn reconcile_gate_for_languages(
    gate: &QualityGate,
    catalog: &MetricCatalog,
    previous: &[String],
    next: &[String],
) -> QualityGate {
    let before = resolve_eligible_metrics(catalog, previous);
    let after = resolve_eligible_metrics(catalog, next);
    let conditions = reconcile_conditions_on_catalog_change(&gate.conditions, &before, &after);

    let dropped = gate.conditions.len() - conditions.len();
    if dropped > 0 {
        info!(dropped, "Conditions dropped after catalog change");
    }

    QualityGate {
        conditions,
        ..gate.clone()
    }
}
