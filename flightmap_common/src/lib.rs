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

//! common definitions and helpers shared by all flightmap crates: angles, geo positions,
//! timestamps and the RON config / asset resource lookup (with embedded fallback)

pub mod angle;
pub mod geo;
pub mod datetime;
pub mod resource;

pub mod errors;
pub use errors::{FlightmapCommonError,Result,op_failed};

// re-exports used from within our resource macro expansions so that callers don't have to import these themselves
pub use bytes;
pub use lazy_static;
pub use ron;
pub use serde;
