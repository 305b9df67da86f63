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

//! ONNX classifiers as exported by sklearn-onnx (float32 input of shape (1,n), int64 label output)

use std::{path::Path, sync::Mutex};
use ndarray::Array2;
use ort::{inputs, session::Session, value::TensorRef};
use serde::{Serialize,Deserialize};
use tracing::debug;

use crate::{Classifier, Result, inference_error};

/// names of the model input and label output tensors
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct OnnxConfig {
    pub input: String,
    pub output: String,
}

impl Default for OnnxConfig {
    fn default()->Self {
        OnnxConfig { input: "float_input".to_string(), output: "output_label".to_string() }
    }
}

pub struct OnnxClassifier {
    session: Mutex<Session>, // running a session requires a mutable reference
    config: OnnxConfig,
    n_features: Option<usize>,
}

impl OnnxClassifier {
    pub fn load (path: &Path, config: &OnnxConfig)->Result<Self> {
        let session = Session::builder()?.commit_from_file(path)?;

        for input in &session.inputs {
            debug!("model input {}: {:?}", input.name, input.input_type);
        }
        for output in &session.outputs {
            debug!("model output {}: {:?}", output.name, output.output_type);
        }

        // the last input dimension is the feature count unless it is dynamic
        let n_features = session.inputs.iter()
            .find( |i| i.name == config.input)
            .and_then( |i| i.input_type.tensor_shape())
            .and_then( |shape| shape.last().copied())
            .and_then( |n| if n > 0 { Some(n as usize) } else { None });

        Ok( OnnxClassifier { session: Mutex::new(session), config: config.clone(), n_features } )
    }
}

impl Classifier for OnnxClassifier {
    fn predict (&self, features: &[f64])->Result<i64> {
        self.check_features(features)?;

        let input = Array2::<f32>::from_shape_vec( (1, features.len()), features.iter().map( |v| *v as f32).collect())?;
        let mut session = self.session.lock().map_err( |_| inference_error("poisoned session lock"))?;

        let outputs = session.run( inputs![ self.config.input.as_str() => TensorRef::from_array_view( &input)?])?;
        let output = outputs.get( self.config.output.as_str()).ok_or_else( || inference_error( format!("no output {}", self.config.output)))?;
        let labels = output.try_extract_array::<i64>()?;

        labels.iter().next().copied().ok_or_else( || inference_error("empty label output"))
    }

    fn n_features (&self)->Option<usize> {
        self.n_features
    }
}
