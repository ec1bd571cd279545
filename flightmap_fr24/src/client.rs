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

//! the provider client: zone table retrieval and the per-tick flight feed request, including
//! normalization of raw feed rows into [`FlightRecord`]s. Malformed entries are dropped, a
//! malformed response as a whole fails the call (and hence the tick)

use std::collections::HashMap;
use std::sync::{Arc,OnceLock};
use std::time::Duration;

use reqwest::{Client,StatusCode};
use serde::{Deserialize,Serialize};
use serde_json::Value;
use tracing::debug;

use flightmap_common::{
    angle::normalize_360,
    datetime::EpochMillis,
    geo::{GeoBounds,LatLon}
};

use crate::{FlightRecord, NOT_AVAILABLE};
use crate::errors::{op_failed, Fr24Error, Fr24Result};

/// minimum number of columns a feed row needs before we consider it a flight
const MIN_ROW_LEN: usize = 13;

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct Fr24Config {
    pub zones_url: String,
    pub feed_url: String,

    pub zone: String,                   // zone name as listed by the provider, e.g. "europe"
    pub airline: Option<String>,        // optional ICAO airline filter, e.g. "AFR"
    pub aircraft_type: Option<String>,  // optional ICAO type filter, e.g. "A320"

    pub update_interval: Duration,
    pub request_timeout: Duration,      // per-request bound so that a stalled provider can't wedge the tick loop
}

/// one zone entry of the provider's zone table. Zones can be nested (e.g. "europe" contains "uk")
#[derive(Debug,Clone,Deserialize)]
pub struct Zone {
    pub tl_y: f64, // north
    pub tl_x: f64, // west
    pub br_y: f64, // south
    pub br_x: f64, // east

    #[serde(default)]
    pub subzones: HashMap<String,Zone>,
}

impl Zone {
    pub fn bounds (&self)->GeoBounds {
        GeoBounds::from_wsen( self.tl_x, self.br_y, self.br_x, self.tl_y)
    }
}

/// the provider's zone table. The wire format interleaves zone entries with non-zone keys
/// (such as "version") in one object, so this is parsed leniently: every value that has the
/// shape of a [`Zone`] becomes one, everything else is skipped
#[derive(Debug,Clone,Default)]
pub struct Zones {
    zones: HashMap<String,Zone>
}

impl Zones {
    pub fn from_json (json: &str)->Fr24Result<Zones> {
        let map: serde_json::Map<String,Value> = serde_json::from_str(json)?;
        let mut zones = HashMap::new();

        for (name,value) in map {
            if let Ok(zone) = Zone::deserialize( &value) {
                zones.insert( name, zone);
            }
        }

        Ok( Zones { zones } )
    }

    /// depth-first lookup of a zone by name, including subzones
    pub fn find (&self, name: &str)->Option<&Zone> {
        fn find_in<'a> (zones: &'a HashMap<String,Zone>, name: &str)->Option<&'a Zone> {
            if let Some(zone) = zones.get(name) { return Some(zone) }
            for zone in zones.values() {
                if let Some(found) = find_in( &zone.subzones, name) { return Some(found) }
            }
            None
        }
        find_in( &self.zones, name)
    }

    pub fn len (&self)->usize { self.zones.len() }

    pub fn is_empty (&self)->bool { self.zones.is_empty() }
}

/// the http client for the flight data provider. One instance is shared by all ticks, the
/// resolved zone bounds are cached after the first successful lookup
pub struct Fr24Client {
    http: Client,
    config: Arc<Fr24Config>,
    bounds: OnceLock<GeoBounds>,
}

impl Fr24Client {

    pub fn new (config: Arc<Fr24Config>)->Fr24Result<Self> {
        let http = Client::builder()
            .user_agent( concat!("flightmap/", env!("CARGO_PKG_VERSION")))
            .timeout( config.request_timeout)
            .build()?;

        Ok( Fr24Client { http, config, bounds: OnceLock::new() } )
    }

    pub async fn get_zones (&self)->Fr24Result<Zones> {
        let url = self.config.zones_url.as_str();
        let response = self.http.get(url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                Zones::from_json( body.as_str())
            }
            StatusCode::NOT_FOUND => Err( Fr24Error::NotFoundError( url.to_string()) ),
            code => Err( op_failed( format!("request for {url} returned {code}")) )
        }
    }

    /// bounds of the configured zone. The zone table is only fetched until we got it once
    pub async fn zone_bounds (&self)->Fr24Result<GeoBounds> {
        if let Some(bounds) = self.bounds.get() { return Ok(*bounds) }

        let zones = self.get_zones().await?;
        let zone = zones.find( self.config.zone.as_str())
            .ok_or_else( || Fr24Error::ZoneNotFoundError( self.config.zone.clone()))?;

        let bounds = zone.bounds();
        let _ = self.bounds.set( bounds); // a lost race would have set the identical value
        Ok(bounds)
    }

    /// one feed request for the given bounds, normalized into [`FlightRecord`]s
    pub async fn get_flights (&self, bounds: &GeoBounds)->Fr24Result<Vec<FlightRecord>> {
        let url = self.config.feed_url.as_str();
        let bounds_str = format!("{},{},{},{}", bounds.north, bounds.south, bounds.west, bounds.east);

        let mut query: Vec<(&str,String)> = vec![
            ("bounds", bounds_str),
            ("faa", "1".to_string()),
            ("satellite", "1".to_string()),
            ("mlat", "1".to_string()),
            ("flarm", "1".to_string()),
            ("adsb", "1".to_string()),
            ("gnd", "1".to_string()),
            ("air", "1".to_string()),
            ("vehicles", "0".to_string()),
            ("estimated", "1".to_string()),
            ("maxage", "14400".to_string()),
            ("gliders", "1".to_string()),
            ("stats", "0".to_string()),
        ];
        if let Some(airline) = &self.config.airline {
            query.push( ("airline", airline.clone()));
        }
        if let Some(ac_type) = &self.config.aircraft_type {
            query.push( ("type", ac_type.clone()));
        }

        let response = self.http.get(url).query(&query).send().await?;

        match response.status() {
            StatusCode::OK => {
                let feed: Value = response.json().await?;
                Ok( flight_records_from_feed( &feed) )
            }
            StatusCode::NOT_FOUND => Err( Fr24Error::NotFoundError( url.to_string()) ),
            code => Err( op_failed( format!("request for {url} returned {code}")) )
        }
    }

    /// the one-stop shop the tick loop uses: resolve the configured zone and fetch its flights
    pub async fn fetch_flight_data (&self)->Fr24Result<Vec<FlightRecord>> {
        let bounds = self.zone_bounds().await?;
        self.get_flights( &bounds).await
    }
}

/// extract all well-formed flight rows from a feed response. The feed object interleaves
/// flight rows (arrays keyed by flight id) with scalar bookkeeping entries ("full_count",
/// "version", ...) which are skipped, as are rows we can't get a valid position from
pub fn flight_records_from_feed (feed: &Value)->Vec<FlightRecord> {
    let mut records = Vec::new();

    if let Some(map) = feed.as_object() {
        for (key,value) in map {
            if let Some(row) = value.as_array() { // non-flight entries are not arrays
                match flight_record_from_row( key.as_str(), row.as_slice()) {
                    Some(rec) => records.push(rec),
                    None => debug!("dropping malformed feed row {key}")
                }
            }
        }
    }

    records
}

/// normalize one feed row. Rows are positional arrays:
/// ```text
///   [icao24, lat, lon, track, altitude, ground_speed, squawk, radar, aircraft_type,
///    registration, timestamp, origin, destination, flight_number, on_ground,
///    vertical_speed, callsign, is_glider]
/// ```
/// Position is mandatory, everything else degrades to defaults
pub fn flight_record_from_row (fid: &str, row: &[Value])->Option<FlightRecord> {
    if row.len() < MIN_ROW_LEN { return None }

    let lat = row[1].as_f64()?;
    let lon = row[2].as_f64()?;
    let position = LatLon::new( lat, lon);
    if !position.is_valid() { return None }

    let track = row[3].as_f64().map( normalize_360);
    let ground_speed = row[5].as_f64().unwrap_or(0.0);
    let aircraft_type = non_empty_or_na( &row[8]);
    let time = row[10].as_i64().map( EpochMillis::from_secs).unwrap_or_else( EpochMillis::now);
    let origin = non_empty_or_na( &row[11]);
    let destination = non_empty_or_na( &row[12]);
    let callsign = row.get(16).and_then( |v| v.as_str()).filter( |s| !s.is_empty()).map( |s| s.to_string());

    Some( FlightRecord {
        id: fid.to_string(),
        callsign,
        position,
        track,
        rotation_angle: 0.0, // set during tick processing
        ground_speed,
        aircraft_type,
        origin,
        destination,
        time,
    })
}

fn non_empty_or_na (v: &Value)->String {
    v.as_str().filter( |s| !s.is_empty()).map( |s| s.to_string()).unwrap_or_else( || NOT_AVAILABLE.to_string())
}
