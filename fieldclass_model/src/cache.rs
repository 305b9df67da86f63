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

//! the per process model cache. Model artifacts are fetched from an [`ObjectStore`] into a local cache
//! directory and loaded at most once per model name, even if there are concurrent first requests

use std::{path::{Path,PathBuf}, sync::{Arc, atomic::{AtomicUsize,Ordering}}};
use dashmap::DashMap;
use tokio::{sync::OnceCell, task};
use tracing::{info,debug};

use fieldclass_common::fs::{ensure_writable_dir, is_non_empty_file, set_filepath_contents_atomic};
use crate::{Classifier, Result, FieldClassModelError, inference_error, load_classifier, store::ObjectStore};

pub struct ModelCache {
    store: Arc<dyn ObjectStore>,
    cache_dir: PathBuf,

    models: DashMap<String, Arc<OnceCell<Arc<dyn Classifier>>>>,
    n_fetched: AtomicUsize,
}

impl ModelCache {
    pub fn new (store: Arc<dyn ObjectStore>, cache_dir: impl Into<PathBuf>)->Result<Self> {
        let cache_dir = cache_dir.into();
        ensure_writable_dir(&cache_dir)?;

        Ok( ModelCache { store, cache_dir, models: DashMap::new(), n_fetched: AtomicUsize::new(0) } )
    }

    pub fn cache_dir (&self)->&Path { &self.cache_dir }

    pub fn model_path (&self, model_name: &str)->PathBuf {
        self.cache_dir.join(model_name)
    }

    /// number of artifacts retrieved from the object store so far
    pub fn n_fetched (&self)->usize {
        self.n_fetched.load( Ordering::Relaxed)
    }

    pub fn is_loaded (&self, model_name: &str)->bool {
        self.models.get(model_name).map( |cell| cell.initialized()).unwrap_or(false)
    }

    /// get the loaded classifier for `model_name`, fetching `<bucket>/<model_name>` from the object store
    /// if it is not in the cache dir yet. A failed fetch or load leaves the model uninitialized so that
    /// the next call retries
    pub async fn get_classifier (&self, bucket: &str, model_name: &str)->Result<Arc<dyn Classifier>> {
        if model_name.is_empty() || model_name.contains(['/','\\']) || model_name == "." || model_name == ".." {
            return Err( FieldClassModelError::InvalidKeyError( model_name.to_string()))
        }

        // clone the cell so that we don't hold the map shard lock across the await
        let cell = self.models.entry( model_name.to_string()).or_default().clone();

        let classifier = cell.get_or_try_init( || self.load( bucket, model_name)).await?;
        Ok( classifier.clone() )
    }

    /// predict the class of a single feature vector. Inference runs on the blocking thread pool since
    /// classifiers such as ONNX sessions execute synchronously
    pub async fn predict (&self, bucket: &str, model_name: &str, features: &[f64])->Result<i64> {
        let classifier = self.get_classifier( bucket, model_name).await?;
        let features = features.to_vec();

        task::spawn_blocking( move || classifier.predict(&features)).await
            .map_err( |e| inference_error( format!("inference task failed: {e}")))?
    }

    async fn load (&self, bucket: &str, model_name: &str)->Result<Arc<dyn Classifier>> {
        let path = self.ensure_model_file( bucket, model_name).await?;
        let classifier = load_classifier(&path)?;
        info!("loaded model {model_name}");

        Ok( Arc::from(classifier) )
    }

    async fn ensure_model_file (&self, bucket: &str, model_name: &str)->Result<PathBuf> {
        let path = self.model_path(model_name);

        if is_non_empty_file(&path) {
            debug!("using cached model {path:?}");
            Ok(path)
        } else {
            info!("fetching model {bucket}/{model_name}");
            let data = self.store.get_object( bucket, model_name).await?;
            self.n_fetched.fetch_add( 1, Ordering::Relaxed);

            Ok( set_filepath_contents_atomic( &self.cache_dir, model_name, &data)? )
        }
    }
}
