/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use thiserror::Error;
use fieldclass_common::map_to_opaque_error;

pub type Result<T> = std::result::Result<T, FieldClassImageryError>;

/// fieldclass_imagery specific error type. This has to be Clone since it ends up in task results, hence we
/// map external errors into opaque String variants
#[derive(Error,Debug,Clone)]
pub enum FieldClassImageryError {
    #[error("http error {0}")]
    HttpError(String),

    #[error("catalog service error (status {0}): {1}")]
    ServiceError(u16,String),

    #[error("JSON error {0}")]
    JsonError(String),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("raster shape error {0}")]
    ShapeError(String),

    #[error("missing band {0}")]
    MissingBandError(String),

    #[error("insufficient data {0}")]
    InsufficientDataError(String),

    #[error("invalid argument {0}")]
    InvalidArgumentError(String),
}

impl FieldClassImageryError {
    /// true if this error was caused by the remote catalog (network, auth or service errors)
    pub fn is_remote (&self)->bool {
        matches!( self, Self::HttpError(_) | Self::ServiceError(..) | Self::JsonError(_))
    }
}

map_to_opaque_error!{ reqwest::Error => FieldClassImageryError::HttpError }
map_to_opaque_error!{ serde_json::Error => FieldClassImageryError::JsonError }
map_to_opaque_error!{ ndarray::ShapeError => FieldClassImageryError::ShapeError }

pub fn shape_error (msg: impl ToString)->FieldClassImageryError {
    FieldClassImageryError::ShapeError(msg.to_string())
}

pub fn missing_band (band: impl ToString)->FieldClassImageryError {
    FieldClassImageryError::MissingBandError(band.to_string())
}

pub fn insufficient_data (msg: impl ToString)->FieldClassImageryError {
    FieldClassImageryError::InsufficientDataError(msg.to_string())
}

pub fn invalid_argument (msg: impl ToString)->FieldClassImageryError {
    FieldClassImageryError::InvalidArgumentError(msg.to_string())
}
