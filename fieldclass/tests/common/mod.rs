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

use std::{collections::HashMap, path::Path, sync::{Arc, atomic::{AtomicUsize,Ordering}}};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{NaiveDate,TimeDelta};
use ndarray::Array3;

use fieldclass_common::{datetime::utc_midnight, geometry::FieldGeometry};
use fieldclass_imagery::{*, http_catalog::CatalogConfig, timeseries::TimeSeriesConfig};
use fieldclass_model::{FieldClassModelError, store::{ObjectStore, StoreConfig}};
use fieldclass::{FieldClassConfig, FieldClassContext, ModelConfig, FanoutConfig, http::ServerConfig};

pub const UNIT_SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0],[0.0,0.0]]]}"#;

pub const BUCKET: &str = "models";
pub const MODEL_NAME: &str = "crops.json";

/// votes class 1 if the first feature (day 6 NDVI) is <= 0.5, class 5 otherwise
pub const MODEL: &str = r#"{"n_features":30,"trees":[{"nodes":[{"Split":{"feature":0,"threshold":0.5,"left":1,"right":2}},{"Leaf":{"class":1}},{"Leaf":{"class":5}}]}]}"#;

pub fn square (west: f64, south: f64)->FieldGeometry {
    FieldGeometry::from_lon_lat_ring( &[(west,south), (west+0.5,south), (west+0.5,south+0.5), (west,south+0.5)]).unwrap()
}

fn ndvi_layer (date: NaiveDate, ndvi: f64)->DayRaster {
    let red = 0.1;
    let nir = red * (1.0 + ndvi) / (1.0 - ndvi);

    let mut data = Array3::<f64>::zeros( (3,2,2));
    data.index_axis_mut( ndarray::Axis(0), 0).fill(red);
    data.index_axis_mut( ndarray::Axis(0), 1).fill(nir);

    let bands = vec![ "red".to_string(), "nir".to_string(), "cloud_mask".to_string() ];
    DayRaster::unmasked( date, bands, data).unwrap()
}

/// catalog with cloud free scenes on days 0/90/180 of the search range. The NDVI values are the base values
/// shifted by the west longitude of the field / 1000. Fields with a west longitude that is a multiple of 10
/// have no scenes
pub struct MockCatalog {
    pub base: [f64;3],
    pub n_search: AtomicUsize,
    pub fail_remote: bool,
}

impl MockCatalog {
    pub fn new (base: [f64;3])->Self {
        MockCatalog { base, n_search: AtomicUsize::new(0), fail_remote: false }
    }

    pub fn failing ()->Self {
        MockCatalog { base: [0.0;3], n_search: AtomicUsize::new(0), fail_remote: true }
    }
}

fn is_empty_field (west: f64)->bool {
    let w = west.round() as i64;
    w > 0 && w % 10 == 0
}

#[async_trait]
impl ImageryCatalog for MockCatalog {
    async fn search (&self, query: &SceneQuery)->Result<SceneCollection> {
        self.n_search.fetch_add( 1, Ordering::SeqCst);
        if self.fail_remote { return Err( FieldClassImageryError::ServiceError( 503, "catalog unavailable".into())) }

        let bbox = query.geometry.bbox().unwrap();
        let scenes = if is_empty_field( bbox.west) {
            vec![]
        } else {
            [0,90,180].iter().map( |n| {
                let d = query.start + TimeDelta::days(*n);
                Scene { id: format!("{}:{d}:{}", query.product, bbox.west), product: query.product.clone(), acquired: utc_midnight(&d), cloud_fraction: None }
            }).collect()
        };

        Ok( SceneCollection { scenes, geoctx: GeoContext::for_bbox( &bbox, 10.0) } )
    }

    async fn stack (&self, scenes: &SceneCollection, bands: &[String])->Result<RasterStack> {
        let shift = scenes.geoctx.bounds[0] / 1000.0;
        let layers = scenes.dates().into_iter().zip( self.base.iter())
            .map( |(d,v)| ndvi_layer( d, v + shift))
            .collect();
        Ok( RasterStack::new(layers) )
    }

    async fn mosaic (&self, scenes: &SceneCollection, bands: &[String])->Result<DayRaster> {
        let data = Array3::from_elem( (1,2,2), 24.0);
        DayRaster::unmasked( scenes.dates()[0], bands.to_vec(), data)
    }
}

/// in-memory object store that counts retrievals
pub struct MemStore {
    pub objects: HashMap<String,Bytes>,
    pub n_gets: AtomicUsize,
}

impl MemStore {
    pub fn new ()->Self {
        let mut objects = HashMap::new();
        objects.insert( format!("{BUCKET}/{MODEL_NAME}"), Bytes::from_static( MODEL.as_bytes()));
        MemStore { objects, n_gets: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl ObjectStore for MemStore {
    async fn get_object (&self, bucket: &str, key: &str)->fieldclass_model::Result<Bytes> {
        self.n_gets.fetch_add( 1, Ordering::SeqCst);
        let k = format!("{bucket}/{key}");
        self.objects.get(&k).cloned().ok_or( FieldClassModelError::ObjectNotFoundError(k))
    }
}

pub fn test_config (cache_dir: &Path)->FieldClassConfig {
    FieldClassConfig {
        catalog: CatalogConfig::default(),
        timeseries: TimeSeriesConfig::default(),
        reference: Default::default(),
        model: ModelConfig {
            store: StoreConfig::Local { root: cache_dir.to_string_lossy().to_string() },
            bucket: BUCKET.to_string(),
            model_name: MODEL_NAME.to_string(),
            cache_dir: Some( cache_dir.to_string_lossy().to_string())
        },
        server: ServerConfig::default(),
        fanout: FanoutConfig { max_concurrent: 4 },
    }
}

pub fn test_context (cache_dir: &Path, catalog: Arc<MockCatalog>, store: Arc<MemStore>)->FieldClassContext {
    FieldClassContext::new( test_config(cache_dir), catalog, store).unwrap()
}
