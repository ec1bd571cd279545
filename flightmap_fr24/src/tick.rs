/*
 * Copyright © 2025, the flightmap project contributors. All rights reserved.
 *
 * The "flightmap" software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

//! per-tick processing: derive rotation angles from consecutive positions and turn the
//! normalized records into the full map tree that replaces whatever the client shows.
//!
//! The pure core is [`advance_tick`], which maps (tick input, previous state) to
//! (map tree, successor state) without touching the current state. Callers decide when
//! to commit the successor, which is what keeps a failed tick from corrupting history

use serde::{Deserialize,Serialize};

use flightmap_common::{
    angle::closest_round_angle,
    datetime::EpochMillis,
    geo::bearing_between
};

use crate::icon::{get_custom_icon, IconRef};
use crate::{FlightRecord, TickSnapshot};

/// the base layer id the client has to show for our markers to make sense
pub const BASE_LAYER: &str = "osm";

/// what we remember between ticks
#[derive(Debug,Clone,PartialEq)]
pub enum TickState {
    /// nothing fetched yet (startup, or nothing but failed fetches so far)
    NoPriorData,

    /// we have a processed tick to compare positions against
    HasPriorData(TickSnapshot),
}

impl TickState {
    pub fn prior_snapshot (&self)->Option<&TickSnapshot> {
        match self {
            TickState::NoPriorData => None,
            TickState::HasPriorData(snapshot) => Some(snapshot)
        }
    }
}

/// set the rotation angle of each record from its position change since the previous tick:
///
///   - moved since then: bearing from previous to current position
///   - present but unmoved: previous rotation angle carried forward
///   - not previously present: 0 (pointing up, until it moves)
pub fn update_rotation_angles (records: &mut Vec<FlightRecord>, prev: &TickSnapshot) {
    for rec in records.iter_mut() {
        rec.rotation_angle = match prev.get( rec.id.as_str()) {
            Some(prev_rec) if prev_rec.position == rec.position => prev_rec.rotation_angle,
            Some(prev_rec) => bearing_between( &prev_rec.position, &rec.position),
            None => 0.0
        }
    }
}

/// the popup content for one marker
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(rename_all="camelCase")]
pub struct PopupInfo {
    pub aircraft_type: String,
    pub ground_speed: f64,
    pub origin: String,
    pub destination: String,
    pub callsign: Option<String>,
}

/// everything the client needs to place one aircraft marker
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(rename_all="camelCase")]
pub struct MarkerDescriptor {
    pub id: String,
    pub position: [f64;2], // lat,lon
    pub popup: PopupInfo,
    pub icon: IconRef,
}

impl MarkerDescriptor {
    pub fn from_record (rec: &FlightRecord)->Self {
        MarkerDescriptor {
            id: rec.id.clone(),
            position: [rec.position.lat, rec.position.lon],
            popup: PopupInfo {
                aircraft_type: rec.aircraft_type.clone(),
                ground_speed: rec.ground_speed,
                origin: rec.origin.clone(),
                destination: rec.destination.clone(),
                callsign: rec.callsign.clone(),
            },
            icon: get_custom_icon( closest_round_angle( rec.rotation_angle)),
        }
    }
}

/// the full per-tick replacement for what the client displays. There are no incremental
/// updates - each tree stands on its own so a client can join, reconnect or fall behind
/// at any tick without resync protocol
#[derive(Debug,Clone,PartialEq,Serialize)]
#[serde(rename_all="camelCase")]
pub struct MapTree {
    pub tick: u64,
    pub time: EpochMillis,
    pub base_layer: &'static str,
    pub markers: Vec<MarkerDescriptor>,
}

impl MapTree {
    pub fn new (tick: u64, records: &[FlightRecord])->Self {
        MapTree {
            tick,
            time: EpochMillis::now(),
            base_layer: BASE_LAYER,
            markers: records.iter().map( MarkerDescriptor::from_record).collect(),
        }
    }
}

/// process one tick worth of fetched records against the previous state. This neither
/// mutates nor consumes `state` - the caller commits the returned successor once the
/// tree made it out the door
pub fn advance_tick (tick: u64, mut records: Vec<FlightRecord>, state: &TickState)->(MapTree,TickState) {
    if let Some(prev) = state.prior_snapshot() {
        update_rotation_angles( &mut records, prev);
    } else {
        for rec in records.iter_mut() { rec.rotation_angle = 0.0 }
    }

    let tree = MapTree::new( tick, records.as_slice());
    let next_state = TickState::HasPriorData( TickSnapshot::from_records( tick, records));

    (tree, next_state)
}
