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

use flightmap_server::prelude::*;

// run with "cargo test -p flightmap_server --test test_spa -- --nocapture"

fn map_components ()->FlightmapServerResult<SpaComponents> {
    let services = SpaServiceListBuilder::new()
        .add( || MapService::new())
        .build();
    SpaComponents::from( &services)
}

#[test]
fn test_service_dependencies_are_deduplicated ()->FlightmapServerResult<()> {
    // MapService pulls in WsService, adding WsService again should be a no-op
    let services = SpaServiceListBuilder::new()
        .add( || WsService::new())
        .add( || MapService::new())
        .build();
    assert_eq!( services.len(), 2);
    Ok(())
}

#[test]
fn test_map_components ()->FlightmapServerResult<()> {
    let comps = map_components()?;

    assert!( comps.proxies.get("leaflet").is_some());
    assert_eq!( comps.proxies.get("leaflet").map(|s| s.as_str()), Some("https://unpkg.com/leaflet@1.9.4/dist"));
    assert!( comps.assets.get("flightmap_server").is_some());
    assert_eq!( comps.routes.len(), 1); // the ws route

    Ok(())
}

#[test]
fn test_doc_rendering ()->FlightmapServerResult<()> {
    let comps = map_components()?;
    let doc = comps.to_html( "flightmap");
    println!("{doc}");

    assert!( doc.starts_with("<!DOCTYPE html>"));
    assert!( doc.contains( r#"<base href="flightmap/">"#));
    assert!( doc.contains( r#"<script src="./proxy/leaflet/leaflet.js"></script>"#));
    assert!( doc.contains( r#"<link rel="stylesheet" type="text/css" href="./proxy/leaflet/leaflet.css"/>"#));
    assert!( doc.contains( r#"<script type="module" src="./asset/flightmap_server/map.js"></script>"#));
    assert!( doc.contains( r#"<div id="map"></div>"#));

    // module post-initialization runs after all modules are loaded
    assert!( doc.contains( "import * as map from './asset/flightmap_server/map.js';"));
    assert!( doc.contains( "if (map.postInitialize) { map.postInitialize(); }"));

    // the leaflet script has to be loaded before any module executes
    let script_pos = doc.find( "./proxy/leaflet/leaflet.js").unwrap();
    let module_pos = doc.find( "./asset/flightmap_server/map.js").unwrap();
    assert!( script_pos < module_pos);

    Ok(())
}

#[test]
fn test_assets_are_embedded () {
    let ws_js = flightmap_server::load_asset( "ws.js").unwrap();
    assert!( !ws_js.is_empty());

    let map_css = flightmap_server::load_asset( "map.css").unwrap();
    assert!( !map_css.is_empty());

    assert!( flightmap_server::load_asset( "no_such_asset.js").is_err());
}

#[test]
fn test_embedded_server_config () {
    let conf: MapServerConfig = flightmap_server::load_config( "server.ron").unwrap();
    assert_eq!( conf.sock_addr.port(), 8050);
}
