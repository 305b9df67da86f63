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
use fieldclass_common::{map_to_opaque_error, geometry::GeometryError};
use fieldclass_imagery::FieldClassImageryError;
use fieldclass_model::FieldClassModelError;
use fieldclass_build::FieldClassBuildError;

pub type Result<T> = std::result::Result<T, FieldClassError>;

/// the application error type. Request level errors carry the `fid` of the failed request
#[derive(Error,Debug,Clone,PartialEq)]
pub enum FieldClassError {
    #[error("remote service error for '{fid}': {msg}")]
    RemoteServiceError { fid: String, msg: String },

    #[error("insufficient data for '{fid}': {msg}")]
    InsufficientDataError { fid: String, msg: String },

    #[error("invalid request '{fid}': {msg}")]
    InvalidRequestError { fid: String, msg: String },

    #[error("model error for '{fid}': {msg}")]
    ModelError { fid: String, msg: String },

    #[error("config error {0}")]
    ConfigError(String),

    #[error("IO error {0}")]
    IOError(String),
}

impl FieldClassError {
    /// map a lower level error that happened while processing the request with the given fid
    pub fn for_request (fid: &str, e: impl IntoRequestError)->Self {
        e.into_request_error(fid)
    }

    pub fn invalid_request (fid: &str, msg: impl ToString)->Self {
        FieldClassError::InvalidRequestError { fid: fid.to_string(), msg: msg.to_string() }
    }

    pub fn fid (&self)->Option<&str> {
        match self {
            Self::RemoteServiceError{fid,..} | Self::InsufficientDataError{fid,..} |
            Self::InvalidRequestError{fid,..} | Self::ModelError{fid,..} => Some(fid.as_str()),
            _ => None
        }
    }

    /// the error message without the fid
    pub fn msg (&self)->String {
        match self {
            Self::RemoteServiceError{msg,..} | Self::InsufficientDataError{msg,..} |
            Self::InvalidRequestError{msg,..} | Self::ModelError{msg,..} => msg.clone(),
            other => other.to_string()
        }
    }
}

pub trait IntoRequestError {
    fn into_request_error (self, fid: &str)->FieldClassError;
}

impl IntoRequestError for FieldClassImageryError {
    fn into_request_error (self, fid: &str)->FieldClassError {
        let fid = fid.to_string();
        let msg = self.to_string();

        match self {
            FieldClassImageryError::InsufficientDataError(_) => FieldClassError::InsufficientDataError { fid, msg },
            FieldClassImageryError::InvalidArgumentError(_) => FieldClassError::InvalidRequestError { fid, msg },
            FieldClassImageryError::ConfigError(_) => FieldClassError::ConfigError(msg),
            // everything else is caused by what the catalog returned
            _ => FieldClassError::RemoteServiceError { fid, msg }
        }
    }
}

impl IntoRequestError for FieldClassModelError {
    fn into_request_error (self, fid: &str)->FieldClassError {
        let fid = fid.to_string();
        let msg = self.to_string();

        if self.is_remote() {
            FieldClassError::RemoteServiceError { fid, msg }
        } else if let FieldClassModelError::InvalidKeyError(_) = self {
            FieldClassError::ConfigError(msg)
        } else {
            FieldClassError::ModelError { fid, msg }
        }
    }
}

impl IntoRequestError for GeometryError {
    fn into_request_error (self, fid: &str)->FieldClassError {
        FieldClassError::invalid_request( fid, self)
    }
}

impl IntoRequestError for FieldClassError {
    fn into_request_error (self, fid: &str)->FieldClassError { self }
}

map_to_opaque_error!{ FieldClassBuildError => FieldClassError::ConfigError }
map_to_opaque_error!{ ron::error::SpannedError => FieldClassError::ConfigError }
map_to_opaque_error!{ std::io::Error => FieldClassError::IOError }
