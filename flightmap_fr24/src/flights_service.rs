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

//! the SpaService that puts live flights on the map: it contributes the flight layer JS module
//! and the pre-rotated icon assets, and seeds new connections with the last published tree

use async_trait::async_trait;

use flightmap_server::prelude::*;
use flightmap_server::{asset_uri, js_module_path, self_crate};

use crate::errors::Fr24Result;
use crate::importer::SharedMapTree;
use crate::load_asset;

/// the `mod` path under which `flights.js` registers its websocket handler
pub const FLIGHTS_JS_MODULE: &str = js_module_path!("flights.js");

pub struct FlightsService {
    last_tree: SharedMapTree,
}

impl FlightsService {
    pub fn new (last_tree: SharedMapTree)->Self {
        FlightsService { last_tree }
    }

    pub fn mod_path (&self)->&'static str { FLIGHTS_JS_MODULE }
}

#[async_trait]
impl SpaService for FlightsService {

    fn add_dependencies (&self, sb: SpaServiceListBuilder)->SpaServiceListBuilder {
        sb.add( || MapService::new())
    }

    fn add_components (&self, spa: &mut SpaComponents)->FlightmapServerResult<()> {
        spa.add_assets( self_crate!(), load_asset);
        spa.add_module( asset_uri!("flights.js"));

        Ok(())
    }

    /// a client that connects mid-flight gets the last tree right away instead of an
    /// empty map until the next tick broadcast
    async fn init_connection (&mut self, conn: &mut SpaConnection)->FlightmapServerResult<()> {
        let last_tree = self.last_tree.read().await;
        if let Some(msg) = last_tree.as_ref() {
            conn.send( msg.clone()).await?;
        }
        Ok(())
    }
}
