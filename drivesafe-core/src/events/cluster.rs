//! Greedy, order-dependent clustering shared by the detectors.
//!
//! Candidates are visited in log order and join the first cluster whose most
//! recently added member is close enough in both space and magnitude. The
//! result depends on input order; two similar events separated by a
//! dissimilar one can end up in different clusters.

use super::geo::distance_ft;
use super::pin::EventPin;

/// Distance and magnitude windows for joining a cluster (both inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub distance_ft: f64,
    pub magnitude: f64,
}

/// Group candidates by comparing each to the last member of every open cluster.
pub fn cluster_by_last_member<T, F>(candidates: Vec<T>, mut joins: F) -> Vec<Vec<T>>
where
    F: FnMut(&T, &T) -> bool,
{
    let mut clusters: Vec<Vec<T>> = Vec::new();
    for candidate in candidates {
        let target = clusters.iter().position(|cluster| {
            cluster
                .last()
                .map_or(false, |last| joins(last, &candidate))
        });
        match target {
            Some(index) => clusters[index].push(candidate),
            None => clusters.push(vec![candidate]),
        }
    }
    clusters
}

/// Member with the largest magnitude; ties keep the earliest.
pub fn strongest<T, F>(cluster: Vec<T>, magnitude: F) -> Option<T>
where
    F: Fn(&T) -> f64,
{
    let mut iter = cluster.into_iter();
    let mut best = iter.next()?;
    for item in iter {
        if magnitude(&item) > magnitude(&best) {
            best = item;
        }
    }
    Some(best)
}

/// Cluster pins and keep one representative per cluster.
pub fn cluster_pins(candidates: Vec<EventPin>, tolerance: Tolerance) -> Vec<EventPin> {
    let clusters = cluster_by_last_member(candidates, |last, candidate| {
        distance_ft(last.location(), candidate.location()) <= tolerance.distance_ft
            && (last.magnitude() - candidate.magnitude()).abs() <= tolerance.magnitude
    });
    clusters
        .into_iter()
        .filter_map(|cluster| strongest(cluster, EventPin::magnitude))
        .collect()
}
