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

pub type Result<T> = std::result::Result<T, FlightmapCommonError>;

#[derive(Error,Debug)]
pub enum FlightmapCommonError {
    #[error("IO error {0}")]
    IoError( #[from] std::io::Error),

    #[error("RON error {0}")]
    RonError( #[from] ron::error::SpannedError),

    #[error("resource not found: {0}")]
    ResourceNotFoundError(String),

    #[error("operation failed: {0}")]
    OpFailedError(String),
}

pub fn op_failed (msg: impl ToString)->FlightmapCommonError {
    FlightmapCommonError::OpFailedError( msg.to_string())
}
