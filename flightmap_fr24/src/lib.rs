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

//! live flight display based on a FlightRadar24 style feed. The importer polls the configured
//! zone/airline selection, derives per-flight rotation angles from consecutive positions and
//! publishes a full replacement marker tree to all connected browsers on every tick

use std::collections::HashMap;

use serde::{Deserialize,Serialize};

use flightmap_common::{
    define_load_asset, define_load_config,
    datetime::EpochMillis,
    geo::LatLon
};

pub mod client;
pub mod icon;
pub mod tick;
pub mod importer;

pub mod flights_service;
pub use flights_service::{FlightsService, FLIGHTS_JS_MODULE};

pub mod errors;
use errors::{Fr24Error,Fr24Result};

define_load_config!{ "fr24.ron" }
define_load_asset!{
    "flights.js",
    "plane_0.svg", "plane_15.svg", "plane_30.svg", "plane_45.svg", "plane_60.svg", "plane_75.svg",
    "plane_90.svg", "plane_105.svg", "plane_120.svg", "plane_135.svg", "plane_150.svg", "plane_165.svg",
    "plane_180.svg", "plane_195.svg", "plane_210.svg", "plane_225.svg", "plane_240.svg", "plane_255.svg",
    "plane_270.svg", "plane_285.svg", "plane_300.svg", "plane_315.svg", "plane_330.svg", "plane_345.svg",
}

/// placeholder for popup fields the feed doesn't provide
pub const NOT_AVAILABLE: &str = "N/A";

/// a single aircraft as shown on the map. This is the normalized form of one provider feed row,
/// annotated with the rotation angle we derive from consecutive positions
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct FlightRecord {
    pub id: String,                 // the provider's flight id (stable per flight, used as marker key)
    pub callsign: Option<String>,
    pub position: LatLon,
    pub track: Option<f64>,         // the track the provider reports, degrees [0,360)
    pub rotation_angle: f64,        // derived from consecutive positions, degrees [0,360)
    pub ground_speed: f64,          // knots
    pub aircraft_type: String,      // ICAO type designator, or "N/A"
    pub origin: String,             // IATA airport code, or "N/A"
    pub destination: String,        // IATA airport code, or "N/A"
    pub time: EpochMillis,          // provider timestamp of this feed row
}

/// everything we keep from a completed tick - the records keyed by flight id.
/// This is the sole input for rotation carry-over in the next tick
#[derive(Debug,Clone,PartialEq)]
pub struct TickSnapshot {
    pub tick: u64,
    records: HashMap<String,FlightRecord>,
}

impl TickSnapshot {
    pub fn new (tick: u64)->Self {
        TickSnapshot { tick, records: HashMap::new() }
    }

    pub fn from_records (tick: u64, records: Vec<FlightRecord>)->Self {
        let records = records.into_iter().map( |rec| (rec.id.clone(), rec)).collect();
        TickSnapshot { tick, records }
    }

    pub fn get (&self, id: &str)->Option<&FlightRecord> {
        self.records.get(id)
    }

    pub fn records (&self)->impl Iterator<Item=&FlightRecord> {
        self.records.values()
    }

    pub fn len (&self)->usize { self.records.len() }

    pub fn is_empty (&self)->bool { self.records.is_empty() }
}
