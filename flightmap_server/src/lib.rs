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

//! single page application server for browser based map display. The server owns a set of
//! [`spa::SpaService`] implementations that contribute document fragments, routes, proxies and
//! assets, and pushes data to connected browsers through a shared websocket

use std::path::Path;

use axum::{body::Body, http::StatusCode, response::Response};
use bytes::Bytes;

use flightmap_common::{define_load_asset, define_load_config};

pub mod prelude;
pub mod spa;

pub mod ws;
pub use ws::WsMsg;

pub mod map_service;

pub mod errors;
use errors::FlightmapServerResult;

define_load_config!{ "server.ron" }
define_load_asset!{ "ws.js", "map.js", "map_config.js", "map.css" }

type Result<T> = FlightmapServerResult<T>;

/// get `Response` for given asset, with the Content-Type derived from the filename extension
pub fn get_asset_response (pathname: &str, bytes: Bytes) -> Response<Body> {
    build_ok_response( mime_type_for_path(pathname), bytes)
}

fn build_ok_response (content_type: &str, bytes: Bytes)->Response<Body> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .body( Body::from(bytes)).unwrap()
}

/// mime type for the asset files we serve
pub fn mime_type_for_path (pathname: impl AsRef<Path>)->&'static str {
    match pathname.as_ref().extension().and_then(|e| e.to_str()) {
        Some("js") | Some("mjs") => "text/javascript",
        Some("css") => "text/css",
        Some("html") => "text/html",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream"
    }
}

//--- syntactic sugar macros

#[macro_export]
macro_rules! asset_uri {
    ($fname:literal) => {
        concat!("./asset/", env!("CARGO_PKG_NAME"), "/", $fname)
    };
    ($crate_name:ident, $fname:literal) => {
        concat!("./asset/", stringify!($crate_name), "/", $fname)
    }
}

#[macro_export]
macro_rules! proxy_uri {
    ($pname:literal, $rel_uri:literal) => {
        concat!( "./proxy/", $pname, "/", $rel_uri)
    }
}

#[macro_export]
macro_rules! self_crate {
    () => { env!("CARGO_PKG_NAME") }
}

#[macro_export]
macro_rules! js_module_path {
    ($mod_name:literal) => {
        concat!( env!("CARGO_PKG_NAME"), "/", $mod_name)
    }
}
