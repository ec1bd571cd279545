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

use thiserror::Error;

pub type Fr24Result<T> = std::result::Result<T, Fr24Error>;

#[derive(Error,Debug)]
pub enum Fr24Error {

    #[error("common error: {0}")]
    CommonError( #[from] flightmap_common::FlightmapCommonError),

    #[error("server error: {0}")]
    ServerError( #[from] flightmap_server::errors::FlightmapServerError),

    #[error("http error: {0}")]
    HttpError( #[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("no such zone: {0}")]
    ZoneNotFoundError(String),

    #[error("not found: {0}")]
    NotFoundError(String),

    #[error("operation failed: {0}")]
    OpFailed(String),
}

pub fn op_failed (msg: impl ToString)->Fr24Error {
    Fr24Error::OpFailed( msg.to_string())
}
