//! State aggregation.
//!
//! County records are collected per state while workers run, then folded
//! into one synthesized state record per state once every file is done.
//!
//! ## Accumulation
//!
//! [`StateAccumulator`] is the only state shared between workers: a
//! mutex-guarded map from state code to members. Each member carries its
//! position in the scan, and [`StateAccumulator::into_groups`] sorts by that
//! position, so the aggregate does not depend on which worker finished first.
//!
//! ## Synthesis
//!
//! ```text
//! CA/los_angeles.json ─┐                      coverage  ← first member
//! CA/orange.json      ─┼─► synthesize("CA") ─► schema    = 2
//! CA/kern.json        ─┘                      layers    = concat per known type, tagged with county
//!                                             counties  = [{name, geoid, data_types}, ...]
//! ```

use crate::naming::sanitize_filename;
use crate::record::{
    AGGREGATE_SCHEMA, Census, CountyRef, Coverage, KNOWN_LAYER_TYPES, Layers, Record,
};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AggregateError {
    #[error("No counties data found for state code: {0}")]
    EmptyGroup(String),
}

/// County records of one state, in scan order.
#[derive(Debug, Clone)]
pub struct StateGroup {
    /// State code of the first member in scan order.
    pub state_code: String,
    /// Output directory name under `states/`.
    pub state_dir: String,
    pub members: Vec<Record>,
}

/// A county record tagged with its scan position and declared state code.
type Member = (usize, String, Record);

/// Concurrency-safe multi-map from state output directory to county records.
///
/// Codes that sanitize to the same directory (`CA` and `ca`) share a group.
#[derive(Debug, Default)]
pub struct StateAccumulator {
    groups: Mutex<HashMap<String, Vec<Member>>>,
}

impl StateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a county record. `order` is the record's position in the scan.
    pub fn record(&self, state_code: &str, order: usize, record: Record) {
        let mut groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        groups
            .entry(sanitize_filename(state_code))
            .or_default()
            .push((order, state_code.to_string(), record));
    }

    /// Number of county records collected so far.
    pub fn len(&self) -> usize {
        let groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the accumulator into groups ordered by first appearance in the
    /// scan, members in scan order.
    pub fn into_groups(self) -> Vec<StateGroup> {
        let groups = self
            .groups
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let mut groups: Vec<(usize, StateGroup)> = groups
            .into_iter()
            .map(|(state_dir, mut members)| {
                members.sort_by_key(|(order, _, _)| *order);
                let first = members.first().map(|(o, _, _)| *o).unwrap_or(usize::MAX);
                let state_code = members
                    .first()
                    .map(|(_, code, _)| code.clone())
                    .unwrap_or_else(|| state_dir.clone());
                let members = members.into_iter().map(|(_, _, r)| r).collect();
                let group = StateGroup {
                    state_code,
                    state_dir,
                    members,
                };
                (first, group)
            })
            .collect();
        groups.sort_by(|(a, ga), (b, gb)| a.cmp(b).then_with(|| ga.state_dir.cmp(&gb.state_dir)));
        groups.into_iter().map(|(_, g)| g).collect()
    }
}

/// Build the state record for one group of counties.
pub fn synthesize(group: &StateGroup) -> Result<Record, AggregateError> {
    let first = group
        .members
        .first()
        .ok_or_else(|| AggregateError::EmptyGroup(group.state_code.clone()))?;

    let state_name = first.state_name().unwrap_or_default().to_string();
    let geoid: String = first.geoid().unwrap_or_default().chars().take(2).collect();

    let mut layers = Layers::with_types(KNOWN_LAYER_TYPES);
    let mut counties = Vec::with_capacity(group.members.len());
    for county in &group.members {
        if let Some(own) = &county.layers {
            // Only the known layer types carry over; the county index still
            // lists everything the county declares.
            for (layer_type, list) in own.iter() {
                let Some(target) = layers.get_mut(layer_type) else {
                    continue;
                };
                target.extend(list.iter().map(|layer| {
                    let mut layer = layer.clone();
                    layer.county = county.coverage.county.clone();
                    layer
                }));
            }
        }
        counties.push(CountyRef {
            name: county.coverage.county.clone(),
            geoid: county.geoid().map(str::to_string),
            data_types: county.layer_types(),
        });
    }

    Ok(Record {
        coverage: Coverage {
            us_census: Some(Census {
                geoid: Some(geoid),
                name: Some(state_name.clone()),
                state: Some(state_name),
                ..Default::default()
            }),
            country: first.coverage.country.clone(),
            state: Some(group.state_code.clone()),
            ..Default::default()
        },
        schema: Some(AGGREGATE_SCHEMA),
        layers: Some(layers),
        counties,
        ..Default::default()
    })
}
