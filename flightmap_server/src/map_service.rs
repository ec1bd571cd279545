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

use crate::{
    asset_uri, load_asset, proxy_uri, self_crate,
    spa::{SpaComponents, SpaService, SpaServiceListBuilder},
    ws::WsService,
    errors::FlightmapServerResult
};

/// where we proxy the Leaflet distribution from. Pinned so that all clients get the same version
pub const LEAFLET_DIST_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist";

/// a SpaService that provides the Leaflet based map display other services render into.
/// This proxies the Leaflet distribution (so that clients don't need internet access beyond us),
/// sets up the map container and creates the map from the values in `map_config.js`
pub struct MapService {
    // tbd - per-app map options could go here
}

impl MapService {
    pub fn new ()->Self { MapService{} }
}

impl SpaService for MapService {
    fn add_dependencies (&self, sb: SpaServiceListBuilder)->SpaServiceListBuilder {
        sb.add( || WsService::new())
    }

    fn add_components (&self, spa: &mut SpaComponents) -> FlightmapServerResult<()> {
        spa.add_assets( self_crate!(), load_asset);

        spa.add_proxy( "leaflet", LEAFLET_DIST_URL);
        spa.add_css( proxy_uri!("leaflet", "leaflet.css"));
        spa.add_script( proxy_uri!("leaflet", "leaflet.js"));

        spa.add_css( asset_uri!("map.css"));
        spa.add_module( asset_uri!("map_config.js"));
        spa.add_module( asset_uri!("map.js"));

        spa.add_body_fragment( r#"<div id="map"></div>"#);

        Ok(())
    }
}
