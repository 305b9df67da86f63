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

pub type Result<T> = std::result::Result<T, FieldClassModelError>;

/// fieldclass_model specific error type. Errors are Clone so that they can be shared by concurrent
/// callers waiting for the same model
#[derive(Error,Debug,Clone)]
pub enum FieldClassModelError {
    #[error("IO error {0}")]
    IOError(String),

    #[error("object store error {0}")]
    StoreError(String),

    #[error("object not found {0}")]
    ObjectNotFoundError(String),

    #[error("invalid object key {0}")]
    InvalidKeyError(String),

    #[error("model format error {0}")]
    FormatError(String),

    #[error("unsupported model format {0}")]
    UnsupportedFormatError(String),

    #[error("invalid model {0}")]
    InvalidModelError(String),

    #[error("expected {expected} features, got {got}")]
    FeatureMismatchError { expected: usize, got: usize },

    #[error("inference error {0}")]
    InferenceError(String),
}

impl FieldClassModelError {
    /// true if this error was caused by the (remote) object store
    pub fn is_remote (&self)->bool {
        matches!( self, Self::StoreError(_) | Self::ObjectNotFoundError(_))
    }
}

map_to_opaque_error!{ std::io::Error => FieldClassModelError::IOError }
map_to_opaque_error!{ serde_json::Error => FieldClassModelError::FormatError }
map_to_opaque_error!{ ron::error::SpannedError => FieldClassModelError::FormatError }

#[cfg(feature="onnx")]
map_to_opaque_error!{ ort::Error => FieldClassModelError::InferenceError }

#[cfg(feature="onnx")]
map_to_opaque_error!{ ndarray::ShapeError => FieldClassModelError::InferenceError }

pub fn store_error (msg: impl ToString)->FieldClassModelError {
    FieldClassModelError::StoreError(msg.to_string())
}

pub fn invalid_model (msg: impl ToString)->FieldClassModelError {
    FieldClassModelError::InvalidModelError(msg.to_string())
}

pub fn inference_error (msg: impl ToString)->FieldClassModelError {
    FieldClassModelError::InferenceError(msg.to_string())
}
