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

//! runtime lookup of configs and assets. Resources are compiled into the binary via the
//! `define_load_config!{..}` / `define_load_asset!{..}` macros but can be overridden through the
//! filesystem without rebuilding, in lookup order:
//!
//!   1. `$FLIGHTMAP_ROOT/{configs|assets}/<resource-crate>/<filename>`  (deployed layout)
//!   2. `./<resource-crate>/{configs|assets}/<filename>`                (in-repo layout, cwd = workspace root)
//!   3. the embedded copy
//!
//! Filesystem lookup can be disabled at runtime by setting FLIGHTMAP_EMBEDDED_ONLY

use std::env;
use std::path::{Component,Path,PathBuf};

pub type LoadAssetFp = fn(&str)->crate::Result<bytes::Bytes>;

/// is the given env var set to 1|true|on
pub fn is_env_enabled (var: &str)->bool {
    match env::var(var) {
        Ok(v) => v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("on"),
        Err(_) => false
    }
}

pub fn root_dir ()->Option<PathBuf> {
    env::var("FLIGHTMAP_ROOT").ok().map( PathBuf::from)
}

/// resource names come from request paths and have to stay within their
/// {configs|assets}/<crate>/ dir. Parent or root components would let `join()`
/// resolve outside of it (an absolute filename even replaces the whole path)
fn is_confined (name: &str)->bool {
    !name.is_empty() && Path::new(name).components().all( |c| matches!( c, Component::Normal(_)))
}

fn find_resource_file (rtype: &str, resource_crate: &str, filename: &str)->Option<PathBuf> {
    if !is_confined(resource_crate) || !is_confined(filename) { return None }

    if let Some(root) = root_dir() {
        let path = root.join(rtype).join(resource_crate).join(filename);
        if path.is_file() { return Some(path) }
    }

    let path = Path::new(resource_crate).join(rtype).join(filename);
    if path.is_file() { Some(path) } else { None }
}

pub fn find_config_file (resource_crate: &str, filename: &str)->Option<PathBuf> {
    find_resource_file( "configs", resource_crate, filename)
}

pub fn find_asset_file (resource_crate: &str, filename: &str)->Option<PathBuf> {
    find_resource_file( "assets", resource_crate, filename)
}

/// define a crate-level `load_config<C>(filename)` function for the invoking crate.
/// The listed files are embedded from the crate's `configs/` dir at compile time and used as
/// fallback if no filesystem override exists. Configs are RON
#[macro_export]
macro_rules! define_load_config {
    ( $( $fname:literal ),* $(,)? ) => {
        mod configs {
            use std::collections::HashMap;
            use $crate::lazy_static::lazy_static;

            lazy_static! { // this is module-private
                static ref EMBEDDED_CONFIGS: HashMap<&'static str, &'static str> = {
                    let mut map: HashMap<&'static str, &'static str> = HashMap::new();
                    $( map.insert( $fname, include_str!( concat!( env!("CARGO_MANIFEST_DIR"), "/configs/", $fname))); )*
                    map
                };
            }

            pub fn load_config<C> (filename: &str) -> $crate::Result<C> where C: for <'a> $crate::serde::Deserialize<'a> {
                let resource_crate = env!("CARGO_PKG_NAME");

                if !$crate::resource::is_env_enabled("FLIGHTMAP_EMBEDDED_ONLY") {
                    if let Some(path) = $crate::resource::find_config_file( resource_crate, filename) {
                        let data = std::fs::read_to_string( &path)?;
                        return Ok( $crate::ron::de::from_str( data.as_str())? )
                    }
                }

                if let Some(src) = EMBEDDED_CONFIGS.get( filename) {
                    return Ok( $crate::ron::de::from_str( src)? )
                }

                Err( $crate::FlightmapCommonError::ResourceNotFoundError( filename.to_string()) )
            }
        }
        pub use configs::*; // make load_config() visible at the crate level
    }
}

/// define a crate-level `load_asset(filename)` function for the invoking crate.
/// The listed files are embedded from the crate's `assets/` dir at compile time. Filesystem
/// overrides are cached after first lookup unless FLIGHTMAP_RELOAD_ASSETS is set
#[macro_export]
macro_rules! define_load_asset {
    ( $( $fname:literal ),* $(,)? ) => {
        mod assets {
            use std::{collections::HashMap,sync::Mutex};
            use $crate::lazy_static::lazy_static;
            use $crate::bytes::Bytes;

            lazy_static! {
                // embedded assets are the ones we compiled into the application
                static ref EMBEDDED_ASSETS: HashMap<&'static str, &'static [u8]> = {
                    let mut map: HashMap<&'static str, &'static [u8]> = HashMap::new();
                    $( map.insert( $fname, include_bytes!( concat!( env!("CARGO_MANIFEST_DIR"), "/assets/", $fname)).as_slice()); )*
                    map
                };

                // fs assets we already looked up (None if the fs didn't have the file)
                static ref CACHED_FS_ASSETS: Mutex<HashMap<String, Option<Bytes>>> = Mutex::new(HashMap::new());
            }

            pub fn load_asset (filename: &str) -> $crate::Result<Bytes> {
                let resource_crate = env!("CARGO_PKG_NAME");
                let reload = $crate::resource::is_env_enabled("FLIGHTMAP_RELOAD_ASSETS");
                let mut fs_checked = false;

                if !$crate::resource::is_env_enabled("FLIGHTMAP_EMBEDDED_ONLY") {
                    if !reload { // check if we already loaded it from file
                        if let Ok(cache) = CACHED_FS_ASSETS.lock() {
                            if let Some(maybe_data) = cache.get(filename) { // we have checked the fs before
                                if let Some(data) = maybe_data {
                                    return Ok( data.clone() );
                                } else { // we previously didn't find it in the fs, don't check again
                                    fs_checked = true;
                                }
                            }
                        }
                    }

                    if !fs_checked {
                        match $crate::resource::find_asset_file( resource_crate, filename) {
                            Some(path) => {
                                let data = Bytes::from( std::fs::read( &path)?);
                                if let Ok(mut cache) = CACHED_FS_ASSETS.lock() {
                                    cache.insert( filename.to_string(), Some(data.clone()));
                                }
                                return Ok(data)
                            }
                            None => {
                                if let Ok(mut cache) = CACHED_FS_ASSETS.lock() {
                                    cache.insert( filename.to_string(), None);
                                }
                            }
                        }
                    }
                }

                if let Some(data) = EMBEDDED_ASSETS.get( filename) {
                    return Ok( Bytes::from_static( data) )
                }

                Err( $crate::FlightmapCommonError::ResourceNotFoundError( filename.to_string()) )
            }
        }
        pub use assets::*; // make load_asset() visible at the crate level
    }
}
