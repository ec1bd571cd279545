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

pub type FlightmapServerResult<T> = std::result::Result<T, FlightmapServerError>;

#[derive(Error,Debug)]
pub enum FlightmapServerError {

    #[error("common error: {0}")]
    CommonError( #[from] flightmap_common::FlightmapCommonError),

    #[error("IO error: {0}")]
    IoError( #[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("service init error: {0}")]
    ServiceInitError(String),

    #[error("connect error: {0}")]
    ConnectError(String),

    #[error("axum error: {0}")]
    AxumError( #[from] axum::Error),

    #[error("RON deserialization error {0}")]
    RonDeError( #[from] ron::de::SpannedError),

    #[error("operation failed: {0}")]
    OpFailed( String ),
}

pub fn op_failed (msg: impl ToString)->FlightmapServerError {
    FlightmapServerError::OpFailed(msg.to_string())
}

pub fn init_error (msg: impl ToString)->FlightmapServerError {
    FlightmapServerError::ServiceInitError(msg.to_string())
}

pub fn connect_error (msg: impl ToString)->FlightmapServerError {
    FlightmapServerError::ConnectError(msg.to_string())
}
