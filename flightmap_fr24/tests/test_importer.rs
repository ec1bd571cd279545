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

// importer tick processing tests, driven through the per-tick transition the update loop
// commits: a failed fetch must leave both the published tree and the tick state as they were.
// run with: cargo test --test test_importer

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use flightmap_common::{datetime::EpochMillis, geo::LatLon};
use flightmap_fr24::client::Fr24Config;
use flightmap_fr24::errors::op_failed;
use flightmap_fr24::importer::LiveFr24Importer;
use flightmap_fr24::tick::TickState;
use flightmap_fr24::{FlightRecord, FLIGHTS_JS_MODULE};

fn test_config ()->Arc<Fr24Config> {
    Arc::new( Fr24Config {
        zones_url: "http://localhost/js/zones.js.php".to_string(),
        feed_url: "http://localhost/zones/fcgi/feed.js".to_string(),
        zone: "europe".to_string(),
        airline: Some( "AFR".to_string()),
        aircraft_type: None,
        update_interval: Duration::from_secs(2),
        request_timeout: Duration::from_secs(10),
    })
}

fn rec (id: &str, lat: f64, lon: f64)->FlightRecord {
    FlightRecord {
        id: id.to_string(),
        callsign: None,
        position: LatLon::new( lat, lon),
        track: None,
        rotation_angle: 0.0,
        ground_speed: 400.0,
        aircraft_type: "A320".to_string(),
        origin: "CDG".to_string(),
        destination: "JFK".to_string(),
        time: EpochMillis::now(),
    }
}

#[tokio::test]
async fn test_successful_tick_publishes_envelope () {
    let importer = LiveFr24Importer::new( test_config()).unwrap();
    let shared = importer.shared_tree();
    assert!( shared.read().await.is_none()); // nothing published before the first good tick

    let (msg, next) = importer.process_tick( 1, Ok( vec![ rec("AF123", 48.0, 2.0) ]), TickState::NoPriorData).await;

    let msg = msg.expect("successful tick produced no broadcast message");
    assert_eq!( shared.read().await.as_deref(), Some( msg.as_str()));

    let v: Value = serde_json::from_str( &msg).unwrap();
    assert_eq!( v["mod"], FLIGHTS_JS_MODULE);
    assert_eq!( v["mapTree"]["tick"], 1);
    assert_eq!( v["mapTree"]["markers"][0]["id"], "AF123");

    assert!( matches!( next, TickState::HasPriorData(_)));
}

#[tokio::test]
async fn test_failed_fetch_keeps_published_tree_and_state () {
    let importer = LiveFr24Importer::new( test_config()).unwrap();
    let shared = importer.shared_tree();

    let (_, state) = importer.process_tick( 1, Ok( vec![ rec("AF123", 0.0, 10.0) ]), TickState::NoPriorData).await;
    let published = shared.read().await.clone();
    assert!( published.is_some());

    // provider outage on tick 2 - the tick is dropped, nothing moves
    let (msg, after) = importer.process_tick( 2, Err( op_failed("connection timed out")), state.clone()).await;
    assert!( msg.is_none());
    assert_eq!( after, state);
    assert_eq!( shared.read().await.clone(), published);

    // tick 3 recovers and still sees the tick 1 positions: the northeast move
    // yields a ~45 degree rotation, which only works if the state survived the outage
    let (msg, _) = importer.process_tick( 3, Ok( vec![ rec("AF123", 0.1, 10.1) ]), after).await;
    let msg = msg.unwrap();
    assert!( msg.contains("plane_45.svg"), "rotation history lost across failed tick: {msg}");
    assert_ne!( shared.read().await.clone(), published); // and the new tree replaced the old one
}
