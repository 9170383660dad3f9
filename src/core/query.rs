use crate::domain::model::{QuerySpec, Region};

/// Escape a value for use inside a double-quoted Overpass QL string.
fn escape_ql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Build the Overpass QL query for every node, way and relation inside
/// `region` that matches the category and brand of `spec`. Non-point
/// geometries are returned with a computed center.
pub fn build_query(region: &Region, spec: &QuerySpec) -> String {
    let area = escape_ql(region.name());
    let filter = format!(
        "[\"amenity\"=\"{}\"][\"brand\"=\"{}\"]",
        escape_ql(&spec.category),
        escape_ql(&spec.brand)
    );

    let mut query = format!("[out:json][timeout:{}];\n", spec.timeout_seconds);
    query.push_str(&format!("area[\"name\"=\"{}\"]->.region;\n(\n", area));
    for element in ["node", "way", "relation"] {
        query.push_str(&format!("  {}{}(area.region);\n", element, filter));
    }
    query.push_str(");\nout center;\n");
    query
}
