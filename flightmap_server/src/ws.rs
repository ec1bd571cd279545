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

use std::net::SocketAddr;
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::connect_info::ConnectInfo,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::warn;

use crate::{
    asset_uri, load_asset, self_crate,
    spa::{ServerMsg, SpaComponents, SpaServerState, SpaService},
    errors::FlightmapServerResult
};

/// a SpaService that adds a shared websocket for all services that register for it.
/// This adds the websocket route and the JS module that dispatches incoming messages
/// to the handlers other JS modules register for their `mod` path
pub struct WsService {
    // tbd
}

impl WsService {
    pub fn new ()->Self { WsService{} }
}

impl SpaService for WsService {
    fn add_components (&self, spa: &mut SpaComponents) -> FlightmapServerResult<()> {
        spa.add_assets( self_crate!(), load_asset);
        spa.add_module( asset_uri!("ws.js"));

        spa.add_route( |router, spa_server_state| {
            router.route( &format!("/{}/ws", spa_server_state.name.as_str()), get( {
                let state = spa_server_state.clone();
                move |ws: WebSocketUpgrade, ci: ConnectInfo<SocketAddr>| { ws_handler(ws, ci, state) }
            }))
        });

        Ok(())
    }
}

async fn ws_handler (ws: WebSocketUpgrade, ConnectInfo(addr): ConnectInfo<SocketAddr>, sss: SpaServerState)->Response {
    ws.on_upgrade( move |socket| handle_socket(socket, addr, sss)).into_response()
}

async fn handle_socket (ws: WebSocket, remote_addr: SocketAddr, sss: SpaServerState) {
    if let Err(e) = sss.hserver.send_msg( ServerMsg::AddConnection{remote_addr, ws}).await {
        warn!("could not register connection {remote_addr}: {e}");
    }
}

/* #region WsMsg serialization  *******************************************************************************/

use serde::{Serialize,ser::{Serializer,SerializeStruct}};

/// envelope for everything we send through the websocket. This serializes as
/// `{"mod": <js_module>, <payload_name>: <payload>}` so that the client side `ws.js`
/// can dispatch on the `mod` property without knowing payload types
pub struct WsMsg<T> where T: Serialize {
    pub js_module: &'static str, // the crate qualified js module path, e.g. "flightmap_fr24/flights.js"
    pub payload_name: &'static str,
    pub payload: T
}

impl <T> WsMsg<T> where T: Serialize {
    pub fn new (js_module: &'static str, payload_name: &'static str, payload: T)->Self {
        WsMsg { js_module, payload_name, payload }
    }

    /// one-stop shop to create the wire format for a single payload
    pub fn json (js_module: &'static str, payload_name: &'static str, payload: T)->FlightmapServerResult<String> {
        WsMsg::new( js_module, payload_name, payload).to_json()
    }

    pub fn to_json (&self)->FlightmapServerResult<String> {
        Ok( serde_json::to_string( &self)? )
    }
}

impl <T> Serialize for WsMsg<T> where T: Serialize {
    fn serialize<S> (&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("WsMsg", 2)?;
        state.serialize_field("mod", &self.js_module)?;
        state.serialize_field( self.payload_name, &self.payload)?;
        state.end()
    }
}

/* #endregion WsMsg serialization */
