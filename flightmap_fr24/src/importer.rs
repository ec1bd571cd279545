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

//! the live data acquisition task: fetch flights for the configured zone at a fixed interval,
//! derive the map tree for each tick and broadcast it to all connected clients.
//!
//! Failure policy is skip-tick: if a fetch or serialization fails the tick is logged and
//! dropped, state and the last published tree stay as they were, and the loop waits for the
//! next interval. A provider outage thus freezes the display instead of clearing it

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug,warn};

use flightmap_server::prelude::*;

use crate::FlightRecord;
use crate::client::{Fr24Client, Fr24Config};
use crate::errors::Fr24Result;
use crate::flights_service::FLIGHTS_JS_MODULE;
use crate::tick::{advance_tick, TickState};

/// the payload property under which map trees travel in websocket messages
pub const MAP_TREE_PAYLOAD: &str = "mapTree";

/// the last successfully published map tree message, shared with the service that
/// initializes newly connected clients
pub type SharedMapTree = Arc<RwLock<Option<String>>>;

/// owns the update loop. Ticks are strictly sequential - the next fetch does not start
/// before the previous tick is fully processed
pub struct LiveFr24Importer {
    config: Arc<Fr24Config>,
    client: Fr24Client,
    last_tree: SharedMapTree,
}

impl LiveFr24Importer {

    pub fn new (config: Arc<Fr24Config>)->Fr24Result<Self> {
        let client = Fr24Client::new( config.clone())?;
        let last_tree = Arc::new( RwLock::new( None));

        Ok( LiveFr24Importer { config, client, last_tree } )
    }

    /// handle to give to the SpaService before spawning, so that new connections can be
    /// initialized with the last tree
    pub fn shared_tree (&self)->SharedMapTree {
        self.last_tree.clone()
    }

    /// the server handle is a spawn argument since service wiring happens between
    /// importer construction and server start
    pub fn spawn (self, hserver: ServerHandle)->JoinHandle<()> {
        tokio::spawn( self.run_update_loop( hserver))
    }

    async fn run_update_loop (self, hserver: ServerHandle) {
        let interval = self.config.update_interval;
        let mut state = TickState::NoPriorData;
        let mut tick: u64 = 0;

        loop {
            let t_start = Instant::now();
            tick += 1;

            let fetched = self.client.fetch_flight_data().await;
            let (msg, next_state) = self.process_tick( tick, fetched, state).await;
            state = next_state;

            if let Some(msg) = msg {
                if let Err(e) = hserver.broadcast_ws_msg( msg).await {
                    warn!("tick {tick}: failed to broadcast map tree: {e}");
                }
            }

            // fixed cadence measured from tick start, a slow tick does not accumulate delay
            sleep( interval.saturating_sub( t_start.elapsed())).await;
        }
    }

    /// one tick past the fetch: on success derive the new tree, store it as the last
    /// published tree and return its message for broadcast. On failure the tick is dropped -
    /// the returned state is the one passed in and the stored tree is left alone
    pub async fn process_tick (&self, tick: u64, fetched: Fr24Result<Vec<FlightRecord>>, state: TickState)->(Option<String>, TickState) {
        match fetched {
            Ok(records) => {
                let n_flights = records.len();
                let (tree, next_state) = advance_tick( tick, records, &state);

                match WsMsg::json( FLIGHTS_JS_MODULE, MAP_TREE_PAYLOAD, &tree) {
                    Ok(msg) => { // only now is the tick committed
                        { *self.last_tree.write().await = Some( msg.clone()); }
                        debug!("tick {tick}: publishing {n_flights} flights");
                        (Some(msg), next_state)
                    }
                    Err(e) => {
                        warn!("tick {tick}: failed to serialize map tree: {e}");
                        (None, state)
                    }
                }
            }
            Err(e) => {
                warn!("tick {tick}: failed to fetch flight data: {e}");
                (None, state)
            }
        }
    }
}
