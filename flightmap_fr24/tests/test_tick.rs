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

// tick processing tests: rotation angle derivation from consecutive positions, full
// replacement tree construction and the skip-tick friendly state handover.
// run with: cargo test --test test_tick

use flightmap_common::{datetime::EpochMillis, geo::LatLon};
use flightmap_fr24::icon::{get_custom_icon, icon_for_heading, ICON_SIZE};
use flightmap_fr24::tick::{advance_tick, update_rotation_angles, MapTree, TickState};
use flightmap_fr24::{FlightRecord, TickSnapshot};

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

fn rec_with_rotation (id: &str, lat: f64, lon: f64, rot: f64)->FlightRecord {
    let mut r = rec( id, lat, lon);
    r.rotation_angle = rot;
    r
}

#[test]
fn test_first_tick_baseline () {
    let records = vec![ rec("AF123", 48.0, 2.0), rec("AF456", 50.0, 8.0) ];
    let (tree, next) = advance_tick( 1, records, &TickState::NoPriorData);

    assert_eq!( tree.tick, 1);
    assert_eq!( tree.markers.len(), 2);
    for m in &tree.markers {
        assert!( m.icon.url.ends_with("plane_0.svg")); // nothing to compare against yet
    }

    match next {
        TickState::HasPriorData(snapshot) => {
            assert_eq!( snapshot.tick, 1);
            assert_eq!( snapshot.len(), 2);
            assert_eq!( snapshot.get("AF123").unwrap().rotation_angle, 0.0);
        }
        TickState::NoPriorData => panic!("successor state has no prior data")
    }
}

#[test]
fn test_bearing_from_movement () {
    // northeast move on the equator is a bearing of (almost exactly) 45 degrees
    let prev = TickSnapshot::from_records( 1, vec![ rec("AF123", 0.0, 10.0) ]);
    let state = TickState::HasPriorData(prev);

    let (tree, next) = advance_tick( 2, vec![ rec("AF123", 0.1, 10.1) ], &state);

    let m = &tree.markers[0];
    assert!( m.icon.url.ends_with("plane_45.svg"));

    let snapshot = next.prior_snapshot().unwrap();
    let rot = snapshot.get("AF123").unwrap().rotation_angle;
    assert!( (rot - 45.0).abs() < 0.1, "bearing {rot} not ~45");
}

#[test]
fn test_unmoved_carries_forward () {
    let prev = TickSnapshot::from_records( 4, vec![ rec_with_rotation("AF123", 48.0, 2.0, 75.0) ]);
    let state = TickState::HasPriorData(prev);

    // same position as last tick - the aircraft keeps pointing the way it was going
    let (tree, next) = advance_tick( 5, vec![ rec("AF123", 48.0, 2.0) ], &state);

    assert!( tree.markers[0].icon.url.ends_with("plane_75.svg"));
    assert_eq!( next.prior_snapshot().unwrap().get("AF123").unwrap().rotation_angle, 75.0);
}

#[test]
fn test_late_joiner_baseline () {
    let prev = TickSnapshot::from_records( 1, vec![ rec("AF123", 0.0, 10.0) ]);
    let state = TickState::HasPriorData(prev);

    // AF123 moved north, AF456 is new this tick
    let records = vec![ rec("AF123", 0.1, 10.0), rec("AF456", 50.0, 8.0) ];
    let (_, next) = advance_tick( 2, records, &state);

    let snapshot = next.prior_snapshot().unwrap();
    assert_eq!( snapshot.get("AF123").unwrap().rotation_angle, 0.0); // due north
    assert_eq!( snapshot.get("AF456").unwrap().rotation_angle, 0.0); // baseline, no history
}

#[test]
fn test_disappearance_and_return () {
    let prev = TickSnapshot::from_records( 1, vec![
        rec_with_rotation("AF123", 48.0, 2.0, 90.0),
        rec_with_rotation("AF456", 50.0, 8.0, 180.0)
    ]);
    let state = TickState::HasPriorData(prev);

    // AF456 left the zone - the replacement tree no longer contains it
    let (tree, next) = advance_tick( 2, vec![ rec("AF123", 48.0, 2.0) ], &state);
    assert_eq!( tree.markers.len(), 1);
    assert_eq!( next.prior_snapshot().unwrap().len(), 1);

    // when it shows up again there is no history for it - back to baseline
    let records = vec![ rec("AF123", 48.0, 2.0), rec("AF456", 50.1, 8.0) ];
    let (_, next) = advance_tick( 3, records, &next);
    assert_eq!( next.prior_snapshot().unwrap().get("AF456").unwrap().rotation_angle, 0.0);
}

#[test]
fn test_empty_fetch_is_empty_tree () {
    let prev = TickSnapshot::from_records( 1, vec![ rec_with_rotation("AF123", 48.0, 2.0, 90.0) ]);
    let state = TickState::HasPriorData(prev);

    // a successful fetch with no flights is a valid tick that clears the display
    let (tree, next) = advance_tick( 2, Vec::new(), &state);
    assert!( tree.markers.is_empty());
    assert!( next.prior_snapshot().unwrap().is_empty());

    let (_, next) = advance_tick( 3, vec![ rec("AF123", 48.1, 2.0) ], &next);
    assert_eq!( next.prior_snapshot().unwrap().get("AF123").unwrap().rotation_angle, 0.0);
}

#[test]
fn test_state_is_not_touched () {
    let prev = TickSnapshot::from_records( 1, vec![ rec_with_rotation("AF123", 0.0, 10.0, 30.0) ]);
    let state = TickState::HasPriorData(prev);
    let before = state.clone();

    let _ = advance_tick( 2, vec![ rec("AF123", 0.1, 10.1) ], &state);

    // the caller only commits the returned successor - a failure after processing
    // must leave the last good state intact
    assert_eq!( state, before);
}

#[test]
fn test_update_rotation_angles () {
    let prev = TickSnapshot::from_records( 1, vec![
        rec_with_rotation("moved", 0.0, 10.0, 200.0),
        rec_with_rotation("parked", 48.0, 2.0, 135.0)
    ]);

    let mut records = vec![ rec("moved", 0.1, 10.0), rec("parked", 48.0, 2.0), rec("new", 10.0, 10.0) ];
    update_rotation_angles( &mut records, &prev);

    assert_eq!( records[0].rotation_angle, 0.0);   // bearing due north, not the old 200
    assert_eq!( records[1].rotation_angle, 135.0); // unmoved - carried forward
    assert_eq!( records[2].rotation_angle, 0.0);   // no history
}

#[test]
fn test_tree_wire_shape () {
    let records = vec![ rec_with_rotation("AF123", 48.0, 2.0, 44.0) ];
    let tree = MapTree::new( 7, &records);
    let json = serde_json::to_value( &tree).unwrap();

    assert_eq!( json["tick"], 7);
    assert_eq!( json["baseLayer"], "osm");

    let m = &json["markers"][0];
    assert_eq!( m["id"], "AF123");
    assert_eq!( m["position"][0], 48.0);
    assert_eq!( m["position"][1], 2.0);
    assert_eq!( m["popup"]["aircraftType"], "A320");
    assert_eq!( m["popup"]["groundSpeed"], 400.0);
    assert_eq!( m["popup"]["origin"], "CDG");
    assert_eq!( m["popup"]["destination"], "JFK");
    assert!( m["icon"]["url"].as_str().unwrap().ends_with("plane_45.svg")); // 44 snaps to 45
    assert_eq!( m["icon"]["iconSize"][0], 38);
    assert_eq!( m["icon"]["iconSize"][1], 38);
}

#[test]
fn test_icon_selection () {
    assert!( get_custom_icon(45).url.ends_with("/plane_45.svg"));
    assert!( get_custom_icon(0).url.ends_with("/plane_0.svg"));
    assert!( get_custom_icon(345).url.ends_with("/plane_345.svg"));
    assert!( get_custom_icon(50).url.ends_with("/plane_0.svg"));  // not in the pre-rendered set
    assert!( get_custom_icon(360).url.ends_with("/plane_0.svg"));

    assert!( icon_for_heading(352.5).url.ends_with("/plane_0.svg")); // rounds up across north
    assert!( icon_for_heading(352.4).url.ends_with("/plane_345.svg"));
    assert_eq!( get_custom_icon(45).icon_size, ICON_SIZE);
}
