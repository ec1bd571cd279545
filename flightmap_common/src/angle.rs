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

//! angle helpers. All angles are degrees unless noted otherwise, headings are clockwise from true north

/// the heading increment between two adjacent pre-rendered marker icons
pub const ICON_ANGLE_INC: u32 = 15;

/// number of pre-rendered marker icon headings (24 x 15° covers the full circle)
pub const N_ICON_ANGLES: u32 = 360 / ICON_ANGLE_INC;

pub fn normalize_360 (d: f64) -> f64 {
    let x = d % 360.0;
    if x < 0.0 { 360.0 + x } else { x }
}

/// is this one of the headings we have a pre-rendered icon for
pub fn is_round_angle (deg: u32) -> bool {
    deg < 360 && deg % ICON_ANGLE_INC == 0
}

/// the 24 icon headings in ascending order (0,15,..,345)
pub fn round_angles () -> impl Iterator<Item=u32> {
    (0..N_ICON_ANGLES).map( |i| i * ICON_ANGLE_INC)
}

/// map an arbitrary heading to the closest pre-rendered icon heading.
/// Input is normalized to [0,360) first, an exact midpoint between two icon headings rounds up,
/// and 360 wraps back to 0 so that the result is always a member of `round_angles()`
pub fn closest_round_angle (deg: f64) -> u32 {
    let x = normalize_360( deg);
    let inc = ICON_ANGLE_INC as f64;

    let mut q = (x / inc).floor() as u32;
    let r = x - (q as f64 * inc);
    if r >= inc / 2.0 { q += 1 }

    (q % N_ICON_ANGLES) * ICON_ANGLE_INC
}
