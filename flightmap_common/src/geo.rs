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

//! geographic positions and bounding boxes, plus the great circle bearing between two positions

use serde::{Deserialize,Serialize};

use crate::angle::normalize_360;

/// a geographic position in WGS84 degrees
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64
}

impl LatLon {
    pub fn new (lat: f64, lon: f64)->Self {
        LatLon { lat, lon }
    }

    /// within the numeric range of WGS84 coordinates (positions outside are dropped during feed normalization)
    pub fn is_valid (&self)->bool {
        self.lat.is_finite() && self.lon.is_finite()
            && self.lat >= -90.0 && self.lat <= 90.0
            && self.lon >= -180.0 && self.lon <= 180.0
    }
}

/// initial great circle bearing from `p1` to `p2` in degrees [0,360), clockwise from true north.
/// Uses the standard forward azimuth θ = atan2( sin Δλ · cos φ2, cos φ1 · sin φ2 − sin φ1 · cos φ2 · cos Δλ)
pub fn bearing_between (p1: &LatLon, p2: &LatLon)->f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let dlon = (p2.lon - p1.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_360( y.atan2(x).to_degrees())
}

/// a geographic bounding box in WGS84 degrees
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64
}

impl GeoBounds {
    pub fn from_wsen (west: f64, south: f64, east: f64, north: f64)->Self {
        GeoBounds { west, south, east, north }
    }

    pub fn contains (&self, p: &LatLon)->bool {
        p.lat >= self.south && p.lat <= self.north && p.lon >= self.west && p.lon <= self.east
    }
}
