use crate::domain::model::{FeatureKind, LocationRecord, RawFeature, RunContext, SourceResponse};

/// Coordinates of a feature: direct for points, otherwise the computed
/// center. Features with neither are skipped.
fn feature_coordinate(feature: &RawFeature) -> Option<(f64, f64)> {
    if feature.kind == FeatureKind::Node {
        if let (Some(lat), Some(lon)) = (feature.lat, feature.lon) {
            return Some((lat, lon));
        }
    }
    feature.center.map(|c| (c.lat, c.lon))
}

/// Turn a response into records, assigning ids from the run counter in
/// element order.
pub fn normalize(response: &SourceResponse, ctx: &mut RunContext, id_prefix: &str) -> Vec<LocationRecord> {
    let mut records = Vec::with_capacity(response.elements.len());

    for feature in &response.elements {
        let Some((lat, lon)) = feature_coordinate(feature) else {
            tracing::trace!("Skipping {:?} element {:?} without coordinates", feature.kind, feature.id);
            continue;
        };

        records.push(LocationRecord {
            id: format!("{}_{}", id_prefix, ctx.next_id),
            lat,
            lon,
        });
        ctx.next_id += 1;
    }

    records
}
