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

use std::{
    any::type_name, collections::HashMap, fmt::Write, net::SocketAddr, sync::Arc
};
use axum::{
    body::Body,
    extract::{
        connect_info::ConnectInfo,
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path as AxumPath, RawQuery, Request
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router
};
use bytes::Bytes;
use futures_util::{sink::SinkExt, stream::{SplitSink, SplitStream, StreamExt}};
use reqwest::Client;
use serde::{Deserialize,Serialize};
use async_trait::async_trait;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, info, warn};

use flightmap_common::resource::LoadAssetFp;

use crate::get_asset_response;
use crate::errors::{connect_error, init_error, op_failed, FlightmapServerError, FlightmapServerResult};

/// bound for the server message channel. Senders (route handlers, data importers) block once the
/// server falls this far behind
const SERVER_CHANNEL_BOUNDS: usize = 64;

/// the trait that abstracts a single page application service, which normally represents a visualization
/// layer with its own data (either dynamic or static) and document assets (such as Javascript modules
/// and images) or fragments (HTML elements)
#[async_trait]
pub trait SpaService: Send + Sync + 'static {
    /// override this if the service depends on other services. Default is it doesn't
    fn add_dependencies (&self, sb: SpaServiceListBuilder)->SpaServiceListBuilder { sb } // default is no dependencies

    /// this adds document fragments and route data for this micro service.
    /// Called during server construction to accumulate components of all included SpaServices
    fn add_components (&self, spa: &mut SpaComponents) -> FlightmapServerResult<()>;

    /// called from the server task after a new websocket connection was registered.
    /// This is where a service pushes its initial data snapshot, directly through `conn.send(..)`
    async fn init_connection (&mut self, conn: &mut SpaConnection) -> FlightmapServerResult<()> {
        Ok(())
    }

    /// called from the server task for each incoming websocket text message
    async fn handle_incoming_ws_msg (&mut self, remote_addr: &SocketAddr, msg: &str) -> FlightmapServerResult<()> {
        Ok(())
    }
}

/// an object to build SpaService lists from services that can recursively depend on other services.
/// Each service type is included just once, in the order of first occurrence
pub struct SpaServiceListBuilder {
    seen: Vec<&'static str>,
    services: Vec<Box<dyn SpaService>>
}

impl SpaServiceListBuilder {
    pub fn new ()->Self { SpaServiceListBuilder{ seen: Vec::new(), services: Vec::new() } }

    pub fn add<F,T> (self, svc_ctor: F)->Self where F: FnOnce()->T, T: SpaService + 'static {
        let name = type_name::<T>();
        if !self.seen.contains(&name) {
            let svc = svc_ctor();
            let mut sb = svc.add_dependencies( self);
            sb.seen.push(name);
            sb.services.push( Box::new(svc));
            sb
        } else {
            self
        }
    }

    pub fn build (self)->Vec<Box<dyn SpaService>> {
        self.services
    }
}

/// struct to keep track of active SinglePageApp connections
pub struct SpaConnection {
    pub remote_addr: SocketAddr,
    pub ws_sender: SplitSink<WebSocket,Message>, // used to send through the websocket
    pub ws_receiver_task: JoinHandle<()> // the task that (async) reads from the websocket
}

impl SpaConnection {
    pub async fn send (&mut self, msg: String)->FlightmapServerResult<()> {
        self.ws_sender.send( Message::Text( msg.into())).await?;
        Ok(())
    }
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct MapServerConfig {
    pub sock_addr: SocketAddr,
}

impl MapServerConfig {
    pub fn url (&self) -> String {
        format!("http://{}", self.sock_addr)
    }
}

/// the messages processed by the server task. Everything that mutates the connection map goes
/// through this channel so that route handlers and data importers never share mutable state
#[derive(Debug)]
pub enum ServerMsg {
    AddConnection { remote_addr: SocketAddr, ws: WebSocket },
    RemoveConnection { remote_addr: SocketAddr },
    BroadcastWsMsg { data: String },
    SendWsMsg { remote_addr: SocketAddr, data: String },
    HandleWsMsg { remote_addr: SocketAddr, data: String },
}

/// cheaply clonable sender half of the server message channel
#[derive(Clone)]
pub struct ServerHandle {
    tx: mpsc::Sender<ServerMsg>
}

impl ServerHandle {
    pub async fn send_msg (&self, msg: ServerMsg)->FlightmapServerResult<()> {
        self.tx.send(msg).await.map_err(|_| op_failed("server task closed"))
    }

    /// send `data` to all current websocket connections
    pub async fn broadcast_ws_msg (&self, data: String)->FlightmapServerResult<()> {
        self.send_msg( ServerMsg::BroadcastWsMsg{data}).await
    }

    /// send `data` to a single websocket connection
    pub async fn send_ws_msg (&self, remote_addr: SocketAddr, data: String)->FlightmapServerResult<()> {
        self.send_msg( ServerMsg::SendWsMsg{remote_addr,data}).await
    }
}

/// this is the state that can be passed into axum handlers
/// note this has to clone efficiently
#[derive(Clone)]
pub struct SpaServerState {
    pub name: Arc<String>,
    pub hserver: ServerHandle
}

/// a http server for a single page application that is composed of the given SpaServices.
/// The server task owns the services and the connection map and processes [`ServerMsg`] sequentially,
/// the axum routes run in a separate task and communicate through the [`ServerHandle`]
pub struct MapServer {
    config: MapServerConfig,
    name: String, // this is not from the config so that we can have the same config for different apps
    services: Vec<Box<dyn SpaService>>,

    connections: HashMap<SocketAddr,SpaConnection>, // updated when receiving Add/RemoveConnection messages

    tx: mpsc::Sender<ServerMsg>,
    rx: mpsc::Receiver<ServerMsg>,
}

impl MapServer {

    pub fn new (config: MapServerConfig, name: impl ToString, services: SpaServiceListBuilder)->Self {
        let (tx,rx) = mpsc::channel( SERVER_CHANNEL_BOUNDS);
        MapServer {
            config,
            name: name.to_string(),
            services: services.build(),
            connections: HashMap::new(),
            tx, rx,
        }
    }

    /// a handle to send [`ServerMsg`]s to the running server, e.g. for broadcasting new data
    pub fn handle (&self)->ServerHandle {
        ServerHandle { tx: self.tx.clone() }
    }

    /// bind the socket, spawn the axum serve task and process server messages until the
    /// message channel is closed. This consumes the server and normally does not return
    pub async fn run (mut self)->FlightmapServerResult<()> {
        let sock_addr = self.config.sock_addr;
        let router = self.build_router()?.into_make_service_with_connect_info::<SocketAddr>();

        let listener = tokio::net::TcpListener::bind(sock_addr).await?;
        info!("serving http://{}/{}", sock_addr, self.name);

        let server_task = tokio::spawn( async move {
            if let Err(e) = axum::serve( listener, router).await {
                error!("server task failed: {e}");
            }
        });

        while let Some(msg) = self.rx.recv().await {
            self.process_msg(msg).await;
        }

        server_task.abort();
        Ok(())
    }

    async fn process_msg (&mut self, msg: ServerMsg) {
        match msg {
            ServerMsg::AddConnection{remote_addr, ws} => {
                if let Err(e) = self.add_connection( remote_addr, ws).await {
                    warn!("failed to initialize connection {remote_addr}: {e}");
                    self.remove_connection( remote_addr);
                }
            }
            ServerMsg::RemoveConnection{remote_addr} => self.remove_connection( remote_addr),
            ServerMsg::BroadcastWsMsg{data} => self.broadcast_ws_msg( data).await,
            ServerMsg::SendWsMsg{remote_addr, data} => self.send_ws_msg( remote_addr, data).await,
            ServerMsg::HandleWsMsg{remote_addr, data} => self.handle_incoming_ws_msg( remote_addr, data).await,
        }
    }

    fn build_router (&self)->FlightmapServerResult<Router> {
        let comps = SpaComponents::from( &self.services)?;
        let doc = Arc::new( comps.to_html( &self.name));
        let proxies = comps.proxies;
        let assets = comps.assets;

        let mut router = Router::new()
            //--- the document route
            .route( &format!("/{}", self.name), get({
                let doc = doc.clone();
                move |req: Request| { Self::doc_handler( req, doc) }
            }));

        // add service specific routes
        if !comps.routes.is_empty() {
            let spa_server_state = SpaServerState {
                name: Arc::new( self.name.clone()),
                hserver: self.handle(),
            };
            for rf in comps.routes {
                router = rf( router, spa_server_state.clone());
            }
        }

        // now add the generic routes for proxies and assets
        router = router
            .route( &format!("/{}/proxy/{{*unmatched}}", self.name), get({
                let http_client = Client::new();
                move |path: AxumPath<String>, query: RawQuery, req: Request| { Self::proxy_handler( path, query, req, http_client, proxies) }
            }))

            // 'key' is the owning crate
            .route( &format!("/{}/asset/{{key}}/{{*unmatched}}", self.name), get({
                move |uri_elems: AxumPath<(String,String)>, req: Request| { Self::asset_handler( uri_elems, req, assets) }
            }));

        Ok(router)
    }

    async fn doc_handler (req: Request, doc: Arc<String>) -> Response {
        (StatusCode::OK, Body::from( doc.to_string())).into_response()
    }

    async fn proxy_handler (path: AxumPath<String>, query: RawQuery, req: Request,
                            http_client: Client, proxies: HashMap<String,String>) -> Response {
        if let Some(idx) = path.find('/') {
            let key = &path[0..idx];

            if let Some(base_uri) = proxies.get(key) {
                let rel_path = &path[idx+1..];
                let uri = Self::get_proxy_uri( base_uri, rel_path, query);

                let reqwest_response = match http_client.get( uri).send().await {
                    Ok(res) => res,
                    Err(err) => {
                        return (StatusCode::BAD_GATEWAY, Body::empty()).into_response();
                    }
                };

                let mut builder = Response::builder().status( reqwest_response.status().as_u16());
                if let Some(ct) = reqwest_response.headers().get( header::CONTENT_TYPE) {
                    builder = builder.header( header::CONTENT_TYPE, ct.clone());
                }

                builder
                    .body( Body::from_stream( reqwest_response.bytes_stream()))
                    .unwrap_or_else( |_| (StatusCode::BAD_GATEWAY, Body::empty()).into_response())

            } else {
                (StatusCode::BAD_REQUEST, "not proxied").into_response()
            }
        } else {
            (StatusCode::BAD_REQUEST, "not proxied").into_response()
        }
    }

    fn get_proxy_uri (base_uri: &str, path: &str, query: RawQuery)->String {
        let qs = if let Some(qs) = &query.0 { qs.as_str() } else { "" };

        let len = base_uri.len() + path.len() + 1 + qs.len() + 1;
        let mut uri = String::with_capacity(len);
        uri.push_str( base_uri);

        if path.len() > 0 {
            if !(path.starts_with('?') || path.starts_with('/')) {
                uri.push('/');
            }
            uri.push_str( path);
        }

        if qs.len() > 0 {
            uri.push('?');
            uri.push_str(qs)
        }

        uri
    }

    async fn asset_handler (uri_elems: AxumPath<(String,String)>, req: Request,
                            assets: HashMap<&'static str,LoadAssetFp>) -> Response {
        let AxumPath((key,path)) = uri_elems;

        if let Some(lookup_fn) = assets.get( key.as_str()) {
            let filename = path.as_str();
            match lookup_fn( filename) {
                Ok(bytes) => {
                    get_asset_response( filename, bytes)
                }
                Err(e) => {
                    (StatusCode::NOT_FOUND, filename.to_string()).into_response()
                }
            }
        } else { // unknown asset crate
            (StatusCode::NOT_FOUND, "unknown asset category").into_response()
        }
    }

    /// called when receiving an AddConnection message. This spawns the per-connection receiver task
    /// and lets all services push their initial data
    async fn add_connection (&mut self, remote_addr: SocketAddr, ws: WebSocket)->FlightmapServerResult<()> {
        let raddr = remote_addr.clone();
        let (ws_sender, mut ws_receiver) = ws.split();

        let ws_receiver_task = {
            let hserver = self.handle();
            let remote_addr = remote_addr.clone();

            tokio::spawn( async move {
                while let Some(Ok(msg)) = ws_receiver.next().await {
                    match msg.into_text() {
                        Ok(msg) => {
                            if !msg.is_empty() {
                                hserver.send_msg( ServerMsg::HandleWsMsg{remote_addr, data: msg.to_string()}).await;
                            }
                        }
                        Err(e) => debug!("ignoring binary message from {remote_addr}")
                    }
                }
                hserver.send_msg( ServerMsg::RemoveConnection{remote_addr}).await;
            })
        };

        let conn = SpaConnection { remote_addr, ws_sender, ws_receiver_task };
        self.connections.insert( raddr, conn);
        let conn_ref = self.connections.get_mut( &raddr).unwrap();

        info!("new connection from {raddr}");

        for svc in self.services.iter_mut() { // tell services to send their initial data
            svc.init_connection( conn_ref).await.map_err(|e| connect_error(e))?;
        }

        Ok(())
    }

    fn remove_connection (&mut self, remote_addr: SocketAddr) {
        if let Some(conn) = self.connections.remove( &remote_addr) {
            conn.ws_receiver_task.abort();
            info!("connection {remote_addr} closed");
        }
    }

    /// called when receiving a BroadcastWsMsg message
    async fn broadcast_ws_msg (&mut self, m: String) {
        let ws_msg = Message::Text( m.into());
        for conn in self.connections.values_mut() {
            if let Err(e) = conn.ws_sender.send( ws_msg.clone()).await {
                debug!("failed to send to {}: {e}", conn.remote_addr);
            }
        }
    }

    /// called when receiving a SendWsMsg message
    async fn send_ws_msg (&mut self, remote_addr: SocketAddr, m: String) {
        if let Some(conn) = self.connections.get_mut( &remote_addr) {
            if let Err(e) = conn.send( m).await {
                debug!("failed to send to {remote_addr}: {e}");
            }
        }
    }

    /// called when receiving a HandleWsMsg message - dispatch to all services
    async fn handle_incoming_ws_msg (&mut self, remote_addr: SocketAddr, data: String) {
        for svc in self.services.iter_mut() {
            if let Err(e) = svc.handle_incoming_ws_msg( &remote_addr, data.as_str()).await {
                warn!("service failed to process incoming message: {e}");
            }
        }
    }
}

/* #region single page app components ************************************************************************/

#[derive(Debug,PartialEq,Eq)]
pub enum HeaderItem {
    Css(String),
    Script(String),
    Module(String)
}

impl HeaderItem {
    fn append_html (&self, buf: &mut String) {
        match self {
            Self::Css(uri) => write!( buf, "<link rel=\"stylesheet\" type=\"text/css\" href=\"{uri}\"/>\n"),
            Self::Script(uri) => write!( buf, "<script src=\"{uri}\"></script>\n"),
            Self::Module(uri) => write!( buf, "<script type=\"module\" src=\"{uri}\"></script>\n")
        };
    }
}

/// accumulator for components of a single page application, including the parts that make up the document
/// and the routes to serve it (including referenced assets and proxied urls)
pub struct SpaComponents {
    //--- static document components
    pub header_items: Vec<HeaderItem>,
    pub body_frags: Vec<String>, // HTML elements to add to the body

    //--- components that are used to create the Router

    // service specific routes
    pub routes: Vec<Box<dyn FnOnce(Router,SpaServerState)->Router + 'static>>,

    // the URIs we proxy. The key is the symbolic name for the proxied server, the value is the remote URI prefix to use
    pub proxies: HashMap<String,String>,

    // asset data to serve - the key is the crate name and the value is a crate-specific function to
    // get the asset data for a filename. Both crate and filename are extracted from the request URI
    pub assets: HashMap<&'static str, LoadAssetFp>,
}

impl SpaComponents {

    pub fn new ()->Self {
        SpaComponents {
            header_items: Vec::new(),
            body_frags: Vec::new(),
            routes: Vec::new(),
            proxies: HashMap::new(),
            assets: HashMap::new(),
        }
    }

    pub fn from (services: &Vec<Box<dyn SpaService>>)->FlightmapServerResult<SpaComponents> {
        let mut comps = SpaComponents::new();
        for svc in services {
            svc.add_components( &mut comps).map_err(|e| init_error(e))?;
        }
        Ok(comps)
    }

    //--- the functions used to add SpaService components (normally by the `SpaService::add_components()` impl)

    pub fn add_header_item (&mut self, hitem: HeaderItem) {
        if !self.header_items.contains(&hitem) {
            self.header_items.push( hitem);
        }
    }
    pub fn add_css (&mut self, uri: impl ToString) { self.add_header_item( HeaderItem::Css(uri.to_string())) }
    pub fn add_script (&mut self, uri: impl ToString) { self.add_header_item( HeaderItem::Script(uri.to_string())) }
    pub fn add_module (&mut self, uri: impl ToString) { self.add_header_item( HeaderItem::Module(uri.to_string())) }

    pub fn add_body_fragment (&mut self, html: impl ToString) {
        self.body_frags.push( html.to_string())
    }

    pub fn add_route (&mut self, rf: impl FnOnce(Router,SpaServerState)->Router + 'static) {
        self.routes.push( Box::new(rf));
    }

    pub fn add_assets (&mut self, key: &'static str, load_asset_fn: LoadAssetFp) {
        self.assets.insert( key, load_asset_fn);
    }

    pub fn add_proxy (&mut self, key: impl ToString, uri_base: impl ToString) {
        let mut uri = uri_base.to_string();
        if uri.ends_with('/') { // canonicalize so that we don't have to check on every use
            uri.pop();
        }

        self.proxies.insert( key.to_string(), uri);
    }

    /// render the HTML document. Our documents are simple enough that we don't need an
    /// intermediate doc model
    pub fn to_html (&self, name: &str)->String {
        let mut buf = String::with_capacity(4096);

        write!( buf, "<!DOCTYPE html>\n");
        write!( buf, "<html>\n");
        write!( buf, "<head>\n");

        write!( buf, "<title>{name}</title>\n");
        write!( buf, "<base href=\"{}/\">\n", name);

        for item in &self.header_items {
            item.append_html(&mut buf);
        }

        write!( buf, "</head>\n");
        write!( buf, "<body>\n");

        for frag in &self.body_frags {
            write!( buf, "{frag}\n");
        }

        self.post_init_js_modules(&mut buf);

        write!( buf, "</body>\n");
        write!( buf, "</html>\n");

        buf
    }

    fn post_init_js_modules (&self, buf: &mut String) {
        let module_uris: Vec<&str> = self.header_items.iter()
            .filter_map( |e| if let HeaderItem::Module(uri) = e {Some(uri.as_str())} else {None})
            .collect();

        if !module_uris.is_empty() {
            let mut mod_names: Vec<&str> = Vec::with_capacity(module_uris.len());

            write!( buf, "<script type=\"module\">\n");

            for uri in module_uris.iter() {
                let mod_name = file_basename(uri);
                mod_names.push(mod_name);
                write!( buf, "import * as {mod_name} from '{uri}';\n");
            }

            for mod_name in mod_names.iter() {
                write!( buf, "if ({mod_name}.postInitialize) {{ {mod_name}.postInitialize(); }}\n");
            }

            write!( buf, "console.log('all js modules initialized');\n");
            write!( buf, "</script>\n");
        }
    }
}

/// filename without leading path and extension, e.g. "./asset/flightmap_server/map.js" -> "map".
/// This is used as the import name of js modules and hence has to be a valid identifier
fn file_basename (uri: &str)->&str {
    let name = uri.rsplit('/').next().unwrap_or(uri);
    match name.find('.') {
        Some(idx) => &name[..idx],
        None => name
    }
}

/* #endregion single page app components */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_basename () {
        assert_eq!( file_basename("./asset/flightmap_server/map.js"), "map");
        assert_eq!( file_basename("./asset/flightmap_server/map_config.js"), "map_config");
        assert_eq!( file_basename("ws.js"), "ws");
        assert_eq!( file_basename("noext"), "noext");
    }

    #[test]
    fn test_proxy_uri_composition () {
        let q = RawQuery(None);
        assert_eq!( MapServer::get_proxy_uri("https://unpkg.com/leaflet@1.9.4/dist", "leaflet.js", q),
                    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js");

        let q = RawQuery(Some("v=1".to_string()));
        assert_eq!( MapServer::get_proxy_uri("https://unpkg.com/leaflet@1.9.4/dist", "leaflet.css", q),
                    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css?v=1");
    }
}
