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
#![allow(unused)]

//! crop type classifiers, the object stores model artifacts are retrieved from and the per process model cache.
//!
//! Model artifacts are files whose extension determines the format:
//! - `.json` / `.ron` serialized [`ForestClassifier`] (decision tree ensemble)
//! - `.onnx` ONNX classifier run through `ort` (requires the `onnx` feature)

use std::path::Path;
use tracing::debug;

use fieldclass_common::fs::{extension, filepath_contents};

mod errors;
pub use errors::*;

pub mod forest;
pub use forest::ForestClassifier;

pub mod store;
pub mod cache;

#[cfg(feature="onnx")]
pub mod onnx;

/// a trained classifier that maps a single feature vector (the resampled NDVI series) to a class label
pub trait Classifier: Send + Sync {
    fn predict (&self, features: &[f64])->Result<i64>;

    /// the expected feature vector length, if the model knows it
    fn n_features (&self)->Option<usize>;

    fn check_features (&self, features: &[f64])->Result<()> {
        match self.n_features() {
            Some(expected) if expected != features.len() => {
                Err( FieldClassModelError::FeatureMismatchError { expected, got: features.len() })
            }
            _ => Ok(())
        }
    }
}

/// load a classifier from a model artifact file, dispatching on the file extension
pub fn load_classifier (path: impl AsRef<Path>)->Result<Box<dyn Classifier>> {
    let path = path.as_ref();
    let ext = extension(&path).map( |e| e.to_ascii_lowercase()).unwrap_or_default();
    debug!("loading {ext} classifier from {path:?}");

    match ext.as_str() {
        "json" => {
            let bytes = filepath_contents(&path)?;
            Ok( Box::new( ForestClassifier::from_json_bytes(&bytes)?) )
        }
        "ron" => {
            let bytes = filepath_contents(&path)?;
            Ok( Box::new( ForestClassifier::from_ron_bytes(&bytes)?) )
        }
        #[cfg(feature="onnx")]
        "onnx" => {
            Ok( Box::new( onnx::OnnxClassifier::load( path, &onnx::OnnxConfig::default())?) )
        }
        _ => Err( FieldClassModelError::UnsupportedFormatError( format!("{path:?}")))
    }
}
