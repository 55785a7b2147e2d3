//! What a measurement sequence contains: objects, measures, water years.

use std::collections::BTreeSet;
use wb_core::{Measurement, WaterYear};

/// Distinct object names, the `priority` ones first in the order given,
/// then the rest alphabetically, ignoring case.
///
/// Priority names absent from the data are not listed.
pub fn objects(measurements: &[Measurement], priority: &[&str]) -> Vec<String> {
    let mut names: BTreeSet<&str> = measurements.iter().map(|m| m.object.as_str()).collect();
    names.remove("");
    let mut ordered: Vec<String> = Vec::with_capacity(names.len());
    for name in priority {
        if names.remove(name) {
            ordered.push(name.to_string());
        }
    }
    let mut rest: Vec<&str> = names.into_iter().collect();
    // ties on the folded name fall back to code point order
    rest.sort_by_cached_key(|name| (name.to_lowercase(), name.to_string()));
    ordered.extend(rest.into_iter().map(str::to_string));
    ordered
}

/// Distinct measure names recorded for an object, in lexical order.
pub fn measures(measurements: &[Measurement], object: &str) -> Vec<String> {
    measurements
        .iter()
        .filter(|m| m.object == object && !m.measure.is_empty())
        .map(|m| m.measure.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Water years covered by the measurements, ascending and gap-free.
pub fn water_years(measurements: &[Measurement]) -> Vec<WaterYear> {
    WaterYear::spanning(measurements.iter().map(|m| &m.date))
}
