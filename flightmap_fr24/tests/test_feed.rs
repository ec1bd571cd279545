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

// feed and zone table parsing tests. Sample payloads mirror the provider wire format:
// flight rows are positional arrays keyed by flight id, interleaved with scalar
// bookkeeping entries in the same object.
// run with: cargo test --test test_feed

use serde_json::{json, Value};

use flightmap_fr24::client::{flight_record_from_row, flight_records_from_feed, Zones};
use flightmap_fr24::NOT_AVAILABLE;

const FEED: &str = r#"{
    "full_count": 13661,
    "version": 4,
    "2f5ac652": ["3944F2", 48.86, 2.35, 135.5, 36000, 447.0, "1000", "F-LFPG1", "A320", "F-GKXL", 1756000000, "CDG", "JFK", "AF006", 0, 0, "AFR006", 0],
    "2f5ac653": ["406B5B", 51.47, -0.45, 275.0, 0, 0, "7760", "T-EGLL2", "B77W", "G-VIIA", 1756000002, "LHR", "", "BA117", 1, 0, "", 0],
    "stats": { "total": { "ads-b": 12000 } }
}"#;

const ZONES: &str = r#"{
    "version": 4,
    "europe": {
        "tl_y": 72.57, "tl_x": -16.96, "br_y": 33.57, "br_x": 53.05,
        "subzones": {
            "poland": { "tl_y": 56.86, "tl_x": 11.06, "br_y": 48.22, "br_x": 28.26 },
            "uk": {
                "tl_y": 62.61, "tl_x": -13.07, "br_y": 49.71, "br_x": 3.46,
                "subzones": {
                    "london": { "tl_y": 53.06, "tl_x": -2.87, "br_y": 50.07, "br_x": 3.26 }
                }
            }
        }
    },
    "northamerica": { "tl_y": 75.0, "tl_x": -180.0, "br_y": 3.0, "br_x": -52.0 }
}"#;

#[test]
fn test_feed_rows () {
    let feed: Value = serde_json::from_str(FEED).unwrap();
    let mut records = flight_records_from_feed( &feed);
    records.sort_by( |a,b| a.id.cmp(&b.id));

    assert_eq!( records.len(), 2); // the scalar and object entries are not flights

    let rec = &records[0];
    assert_eq!( rec.id, "2f5ac652");
    assert_eq!( rec.position.lat, 48.86);
    assert_eq!( rec.position.lon, 2.35);
    assert_eq!( rec.track, Some(135.5));
    assert_eq!( rec.ground_speed, 447.0);
    assert_eq!( rec.aircraft_type, "A320");
    assert_eq!( rec.origin, "CDG");
    assert_eq!( rec.destination, "JFK");
    assert_eq!( rec.callsign.as_deref(), Some("AFR006"));
    assert_eq!( rec.time.millis(), 1_756_000_000_000);
    assert_eq!( rec.rotation_angle, 0.0); // rotation is derived later, from consecutive ticks
}

#[test]
fn test_missing_fields_degrade () {
    let feed: Value = serde_json::from_str(FEED).unwrap();
    let records = flight_records_from_feed( &feed);
    let rec = records.iter().find( |r| r.id == "2f5ac653").unwrap();

    assert_eq!( rec.ground_speed, 0.0);
    assert_eq!( rec.destination, NOT_AVAILABLE); // empty string in the row
    assert_eq!( rec.callsign, None);
}

#[test]
fn test_malformed_rows_dropped () {
    let feed = json!({
        "a1": ["AAAAAA", null, 2.0, 90.0, 1000, 100, "", "", "", "", 1756000000, "", "", ""],
        "a2": ["BBBBBB", 99.5, 2.0, 90.0, 1000, 100, "", "", "", "", 1756000000, "", "", ""],
        "a3": ["CCCCCC", 10.0, 20.0],
        "a4": ["DDDDDD", 10.0, 20.0, 90.0, 1000, 100, "", "", "", "", 1756000000, "", ""]
    });
    let records = flight_records_from_feed( &feed);

    assert_eq!( records.len(), 1); // no lat, lat out of range, row too short
    assert_eq!( records[0].id, "a4");
}

#[test]
fn test_track_normalization () {
    let row = json!(["3944F2", 10.0, 20.0, 370.0, 36000, 400, "", "", "A320", "", 1756000000, "AAA", "BBB"]);
    let rec = flight_record_from_row( "x1", row.as_array().unwrap()).unwrap();
    assert_eq!( rec.track, Some(10.0));

    let row = json!(["3944F2", 10.0, 20.0, -90.0, 36000, 400, "", "", "A320", "", 1756000000, "AAA", "BBB"]);
    let rec = flight_record_from_row( "x2", row.as_array().unwrap()).unwrap();
    assert_eq!( rec.track, Some(270.0));

    let row = json!(["3944F2", 10.0, 20.0, null, 36000, 400, "", "", "A320", "", 1756000000, "AAA", "BBB"]);
    let rec = flight_record_from_row( "x3", row.as_array().unwrap()).unwrap();
    assert_eq!( rec.track, None);
}

#[test]
fn test_missing_timestamp_uses_now () {
    let row = json!(["3944F2", 10.0, 20.0, 90.0, 36000, 400, "", "", "A320", "", null, "AAA", "BBB"]);
    let before = flightmap_common::datetime::EpochMillis::now();
    let rec = flight_record_from_row( "x1", row.as_array().unwrap()).unwrap();
    let after = flightmap_common::datetime::EpochMillis::now();

    assert!( rec.time >= before && rec.time <= after);
}

#[test]
fn test_zone_table () {
    let zones = Zones::from_json(ZONES).unwrap();
    assert_eq!( zones.len(), 2); // the "version" entry is not a zone

    let europe = zones.find("europe").unwrap();
    let bounds = europe.bounds();
    assert_eq!( bounds.west, -16.96);
    assert_eq!( bounds.south, 33.57);
    assert_eq!( bounds.east, 53.05);
    assert_eq!( bounds.north, 72.57);
}

#[test]
fn test_subzone_lookup () {
    let zones = Zones::from_json(ZONES).unwrap();

    assert!( zones.find("uk").is_some()); // one level down
    let london = zones.find("london").unwrap(); // two levels down
    assert_eq!( london.bounds().north, 53.06);

    assert!( zones.find("atlantis").is_none());
}
