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

//! satellite imagery access and NDVI time series extraction for field geometries.
//!
//! The imagery catalog itself is a remote service that we only see through the [`ImageryCatalog`] trait:
//! scene search for a product/geometry/date range, and retrieval of band rasters that are either
//! stacked per acquisition day or mosaicked into a single layer. All raster processing (cloud masking,
//! NDVI, spatial aggregation and temporal resampling) happens locally

use std::collections::BTreeSet;
use async_trait::async_trait;
use chrono::{DateTime,NaiveDate,Utc};
use ndarray::{Array3,ArrayView2,Axis};
use serde::{Serialize,Deserialize};
use serde_json::{Map,Value};

use fieldclass_common::{BoundingBox, geometry::FieldGeometry};

mod errors;
pub use errors::*;

pub mod http_catalog;
pub mod ndvi;
pub mod resample;
pub mod timeseries;
pub mod reference;

pub const SENTINEL2_L2A: &'static str = "esa:sentinel-2:l2a:v1";
pub const CDL: &'static str = "usda:cdl:v1";

/// a single satellite image acquisition as reported by the catalog
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct Scene {
    pub id: String,
    pub product: String,
    pub acquired: DateTime<Utc>,

    #[serde(default, skip_serializing_if="fieldclass_common::is_none")]
    pub cloud_fraction: Option<f64>,
}

impl Scene {
    /// the (UTC) acquisition day, which is what we group scenes by
    pub fn date (&self)->NaiveDate {
        self.acquired.date_naive()
    }
}

/// the spatial reference used by the catalog to resample imagery (crs, resolution and bounds in crs units).
/// We do not interpret it - it is passed back to the catalog when requesting rasters
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct GeoContext {
    pub crs: String,
    pub resolution: f64,
    pub bounds: [f64;4],

    #[serde(flatten)]
    pub extra: Map<String,Value>,
}

impl GeoContext {
    pub fn new (crs: impl ToString, resolution: f64, bounds: [f64;4])->Self {
        GeoContext { crs: crs.to_string(), resolution, bounds, extra: Map::new() }
    }

    /// a geographic (EPSG:4326) context for the given bounding box
    pub fn for_bbox (bbox: &BoundingBox, resolution: f64)->Self {
        GeoContext::new( "EPSG:4326", resolution, bbox.to_minmax_array())
    }
}

#[derive(Debug,Clone)]
pub struct SceneQuery {
    pub product: String,
    pub geometry: FieldGeometry,
    pub start: NaiveDate,
    pub end: NaiveDate,

    /// max number of scenes, `None` means no limit
    pub limit: Option<usize>,
}

impl SceneQuery {
    pub fn new (product: impl ToString, geometry: FieldGeometry, start: NaiveDate, end: NaiveDate)->Self {
        SceneQuery { product: product.to_string(), geometry, start, end, limit: None }
    }
}

/// result of a scene search
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct SceneCollection {
    pub scenes: Vec<Scene>,
    pub geoctx: GeoContext,
}

impl SceneCollection {
    pub fn len (&self)->usize { self.scenes.len() }
    pub fn is_empty (&self)->bool { self.scenes.is_empty() }

    pub fn ids (&self)->Vec<String> {
        self.scenes.iter().map( |s| s.id.clone()).collect()
    }

    /// the sorted, unique acquisition days of all scenes
    pub fn dates (&self)->Vec<NaiveDate> {
        self.scenes.iter().map( |s| s.date()).collect::<BTreeSet<_>>().into_iter().collect()
    }
}

/// multi-band raster of a single acquisition day. Arrays are indexed as (band,row,col), the mask is `true`
/// for invalid (no-data or cloud) pixels
#[derive(Debug,Clone,PartialEq)]
pub struct DayRaster {
    pub date: NaiveDate,
    pub bands: Vec<String>,
    pub data: Array3<f64>,
    pub mask: Array3<bool>,
}

impl DayRaster {
    pub fn new (date: NaiveDate, bands: Vec<String>, data: Array3<f64>, mask: Array3<bool>)->Result<Self> {
        if data.shape() != mask.shape() {
            return Err( shape_error( format!("data shape {:?} does not match mask shape {:?}", data.shape(), mask.shape())))
        }
        if data.len_of(Axis(0)) != bands.len() {
            return Err( shape_error( format!("{} bands but {} band layers", bands.len(), data.len_of(Axis(0)))))
        }
        Ok( DayRaster { date, bands, data, mask } )
    }

    /// a raster without masked pixels
    pub fn unmasked (date: NaiveDate, bands: Vec<String>, data: Array3<f64>)->Result<Self> {
        let mask = Array3::from_elem( data.raw_dim(), false);
        Self::new( date, bands, data, mask)
    }

    pub fn band_index (&self, band: &str)->Result<usize> {
        self.bands.iter().position( |b| b == band).ok_or_else( || missing_band(band))
    }

    pub fn band (&self, band: &str)->Result<ArrayView2<'_,f64>> {
        Ok( self.data.index_axis( Axis(0), self.band_index(band)?) )
    }

    pub fn band_mask (&self, band: &str)->Result<ArrayView2<'_,bool>> {
        Ok( self.mask.index_axis( Axis(0), self.band_index(band)?) )
    }

    /// (rows,cols)
    pub fn grid_shape (&self)->(usize,usize) {
        let s = self.data.shape();
        (s[1], s[2])
    }

    pub fn n_masked (&self)->usize {
        self.mask.iter().filter( |m| **m).count()
    }
}

/// per acquisition day rasters, ordered by date
#[derive(Debug,Clone,PartialEq,Default)]
pub struct RasterStack {
    pub layers: Vec<DayRaster>,
}

impl RasterStack {
    pub fn new (mut layers: Vec<DayRaster>)->Self {
        layers.sort_by_key( |l| l.date);
        RasterStack { layers }
    }

    pub fn len (&self)->usize { self.layers.len() }
    pub fn is_empty (&self)->bool { self.layers.is_empty() }

    pub fn dates (&self)->Vec<NaiveDate> {
        self.layers.iter().map( |l| l.date).collect()
    }
}

/// the remote imagery catalog interface
#[async_trait]
pub trait ImageryCatalog: Send + Sync {
    /// find all scenes of the query product that intersect the query geometry within `[start,end)`
    async fn search (&self, query: &SceneQuery)->Result<SceneCollection>;

    /// retrieve the given bands of all scenes, flattened into one raster per acquisition day
    /// (same day scenes are merged by the catalog)
    async fn stack (&self, scenes: &SceneCollection, bands: &[String])->Result<RasterStack>;

    /// retrieve the given bands of all scenes mosaicked into a single raster
    async fn mosaic (&self, scenes: &SceneCollection, bands: &[String])->Result<DayRaster>;
}
