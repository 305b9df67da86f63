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

//! crop type classification of agricultural fields from their NDVI time series.
//!
//! A field (GeoJSON polygon) is classified by
//!   1. retrieving the per day cloud masked NDVI median over the field from the imagery catalog
//!   2. resampling it onto a fixed 6 day grid (the feature vector)
//!   3. running the configured classifier on it, which is fetched once per process into a local cache
//!
//! The same inner call ([`get_field_class`]) is exposed as a HTTP service ([`http`]), a batch CLI, a task
//! pool based fan-out over feature collections ([`fanout`]) and an AWS Lambda handler (`lambda` feature)

use std::{path::PathBuf, sync::Arc};
use serde::{Serialize,Deserialize};
use serde_json::Value;
use tracing::{info,debug};
use tracing_subscriber::EnvFilter;

use fieldclass_build::{define_load_config, load_config_path, pkg_cache_dir};
use fieldclass_common::{geometry::FieldGeometry, strings::env_expand};
use fieldclass_imagery::{
    ImageryCatalog,
    http_catalog::{CatalogConfig, HttpCatalog},
    timeseries::{TimeSeriesConfig, get_ndvi_timeseries},
    reference::{ReferenceConfig, get_reference_class},
};
use fieldclass_model::{cache::ModelCache, store::{ObjectStore, StoreConfig, create_store}};

mod errors;
pub use errors::*;

pub mod http;
pub mod fanout;

#[cfg(feature="lambda")]
pub mod lambda;

define_load_config!{}

pub const CONFIG_FILE: &'static str = "fieldclass.ron";

/// where to get the classifier from. String values support `${VAR}` expansion
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct ModelConfig {
    pub store: StoreConfig,
    pub bucket: String,
    pub model_name: String,

    /// local dir for model artifacts, defaults to the package cache dir
    #[serde(default)]
    pub cache_dir: Option<String>,
}

impl ModelConfig {
    pub fn bucket (&self)->String { env_expand( &self.bucket) }
    pub fn model_name (&self)->String { env_expand( &self.model_name) }

    pub fn cache_dir (&self)->PathBuf {
        match &self.cache_dir {
            Some(dir) => PathBuf::from( env_expand(dir)),
            None => pkg_cache_dir!()
        }
    }
}

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct FanoutConfig {
    pub max_concurrent: usize,
}

impl Default for FanoutConfig {
    fn default()->Self { FanoutConfig { max_concurrent: 8 } }
}

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct FieldClassConfig {
    pub catalog: CatalogConfig,
    pub timeseries: TimeSeriesConfig,

    #[serde(default)]
    pub reference: ReferenceConfig,

    pub model: ModelConfig,
    pub server: http::ServerConfig,

    #[serde(default)]
    pub fanout: FanoutConfig,
}

/// load the config from an explicit path or, if there is none, through the standard config file lookup
pub fn get_config (path: Option<&str>)->Result<FieldClassConfig> {
    match path {
        Some(path) => Ok( load_config_path( env_expand(path))? ),
        None => Ok( load_config( CONFIG_FILE)? )
    }
}

/// log to stderr with a level filter that is set from `RUST_LOG`. Does nothing if there already is a subscriber
pub fn init_tracing () {
    let _ = tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())
        .with_writer( std::io::stderr)
        .try_init();
}

/// the classification result
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct FieldClass {
    pub class: i64,
    pub fid: String,
}

/// the (untyped) input of all entry points. The field id is taken from `fid` or, if there is none, from `id`.
/// A missing field id is reported as empty string
#[derive(Serialize,Deserialize,Debug,Clone,Default)]
pub struct ClassRequest {
    #[serde(default)]
    pub geometry: Option<Value>,

    #[serde(default, skip_serializing_if="Option::is_none")]
    pub fid: Option<Value>,

    #[serde(default, skip_serializing_if="Option::is_none")]
    pub id: Option<Value>,
}

impl ClassRequest {
    pub fn new (geometry: Value, fid: impl ToString)->Self {
        ClassRequest { geometry: Some(geometry), fid: Some( Value::String(fid.to_string())), id: None }
    }

    pub fn fid (&self)->String {
        let fid = match &self.fid {
            Some(Value::Null) | None => &self.id,
            fid => fid
        };
        match fid {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(v) => v.to_string()
        }
    }

    pub fn field_geometry (&self)->Result<FieldGeometry> {
        let fid = self.fid();
        let v = self.geometry.clone().ok_or_else( || FieldClassError::invalid_request( &fid, "missing geometry"))?;
        FieldGeometry::from_json_value(v).map_err( |e| FieldClassError::for_request( &fid, e))
    }
}

/// everything the classification pipeline needs, shared by all requests of a process
pub struct FieldClassContext {
    pub config: FieldClassConfig,
    pub catalog: Arc<dyn ImageryCatalog>,
    pub models: Arc<ModelCache>,
}

impl FieldClassContext {
    pub fn new (config: FieldClassConfig, catalog: Arc<dyn ImageryCatalog>, store: Arc<dyn ObjectStore>)->Result<Self> {
        let cache_dir = config.model.cache_dir();
        let models = ModelCache::new( store, &cache_dir).map_err( |e| FieldClassError::ConfigError( format!("model cache {cache_dir:?}: {e}")))?;
        debug!("using model cache dir {cache_dir:?}");

        Ok( FieldClassContext { config, catalog, models: Arc::new(models) } )
    }

    /// create the catalog client and object store from the config
    pub async fn from_config (config: FieldClassConfig)->Result<Self> {
        let catalog = HttpCatalog::new( &config.catalog).map_err( |e| FieldClassError::ConfigError( e.to_string()))?;
        let store = create_store( &config.model.store).await.map_err( |e| FieldClassError::ConfigError( e.to_string()))?;

        Self::new( config, Arc::new(catalog), store)
    }
}

/// classify a field with the configured model
pub async fn get_field_class (ctx: &FieldClassContext, geometry: &FieldGeometry, fid: &str)->Result<FieldClass> {
    let bucket = ctx.config.model.bucket();
    let model_name = ctx.config.model.model_name();
    get_field_class_with_model( ctx, geometry, fid, &bucket, &model_name).await
}

/// classify a field with the model `<bucket>/<model_name>`
pub async fn get_field_class_with_model (ctx: &FieldClassContext, geometry: &FieldGeometry, fid: &str, bucket: &str, model_name: &str)->Result<FieldClass> {
    let features = get_ndvi_timeseries( ctx.catalog.as_ref(), geometry, &ctx.config.timeseries).await
        .map_err( |e| FieldClassError::for_request( fid, e))?;
    debug!("feature vector of '{fid}': {:?}", features.values);

    let class = ctx.models.predict( bucket, model_name, &features.values).await
        .map_err( |e| FieldClassError::for_request( fid, e))?;
    info!("field '{fid}' classified as {class}");

    Ok( FieldClass { class, fid: fid.to_string() } )
}

/// the common entry for request based handlers
pub async fn handle_class_request (ctx: &FieldClassContext, request: &ClassRequest)->Result<FieldClass> {
    let geometry = request.field_geometry()?;
    get_field_class( ctx, &geometry, &request.fid()).await
}

/// reference label of a field for a given year
pub async fn get_field_reference_class (ctx: &FieldClassContext, geometry: &FieldGeometry, fid: &str, year: i32)->Result<FieldClass> {
    let class = get_reference_class( ctx.catalog.as_ref(), geometry, year, &ctx.config.reference).await
        .map_err( |e| FieldClassError::for_request( fid, e))?;

    Ok( FieldClass { class, fid: fid.to_string() } )
}
