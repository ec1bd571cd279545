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

//! selection of pre-rendered aircraft icons. There is one asset per 15° step (plane_0.svg,
//! plane_15.svg .. plane_345.svg), all the same size and pre-rotated so the client never has
//! to transform images

use serde::{Deserialize,Serialize};

use flightmap_common::angle::{closest_round_angle, is_round_angle};

/// width,height of all aircraft icon assets in pixels
pub const ICON_SIZE: [u32;2] = [38,38];

/// the angle to fall back to if we are asked for an icon that is not in the pre-rendered set
pub const DEFAULT_ICON_ANGLE: u32 = 0;

/// what the client needs to instantiate a marker icon
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(rename_all="camelCase")]
pub struct IconRef {
    pub url: String,
    pub icon_size: [u32;2],
}

/// icon for an already-snapped angle. Angles outside the pre-rendered set map to the
/// upright default icon rather than a broken image link
pub fn get_custom_icon (round_angle: u32)->IconRef {
    let angle = if is_round_angle(round_angle) { round_angle } else { DEFAULT_ICON_ANGLE };

    IconRef {
        url: format!("./asset/{}/plane_{}.svg", env!("CARGO_PKG_NAME"), angle),
        icon_size: ICON_SIZE,
    }
}

/// icon for an arbitrary heading in degrees, snapped to the closest pre-rendered angle
pub fn icon_for_heading (deg: f64)->IconRef {
    get_custom_icon( closest_round_angle( deg))
}
