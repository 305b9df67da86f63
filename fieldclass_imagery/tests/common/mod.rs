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

use std::sync::atomic::{AtomicUsize,Ordering};
use async_trait::async_trait;
use chrono::{NaiveDate,TimeDelta};
use ndarray::{Array2,Array3};

use fieldclass_common::{datetime::utc_midnight, geometry::FieldGeometry};
use fieldclass_imagery::*;

pub const UNIT_SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0],[0.0,0.0]]]}"#;

pub fn unit_square ()->FieldGeometry {
    UNIT_SQUARE.parse().unwrap()
}

pub fn date (s: &str)->NaiveDate {
    fieldclass_common::datetime::parse_date(s).unwrap()
}

pub fn day (start: &NaiveDate, n: i64)->NaiveDate {
    *start + TimeDelta::days(n)
}

/// a 2x2 (red,nir,cloud_mask) layer for which all unclouded pixels have the given NDVI value
pub fn ndvi_layer (date: NaiveDate, ndvi: f64, cloudy: [[bool;2];2])->DayRaster {
    let red = 0.1;
    let nir = red * (1.0 + ndvi) / (1.0 - ndvi);

    let mut data = Array3::<f64>::zeros( (3,2,2));
    for r in 0..2 {
        for c in 0..2 {
            data[[0,r,c]] = red;
            data[[1,r,c]] = nir;
            data[[2,r,c]] = if cloudy[r][c] { 1.0 } else { 0.0 };
        }
    }

    let bands = vec![ "red".to_string(), "nir".to_string(), "cloud_mask".to_string() ];
    DayRaster::unmasked( date, bands, data).unwrap()
}

pub const CLEAR: [[bool;2];2] = [[false,false],[false,false]];
pub const OVERCAST: [[bool;2];2] = [[true,true],[true,true]];

/// in-memory catalog with one scene per configured day
pub struct MockCatalog {
    pub days: Vec<(NaiveDate,f64,[[bool;2];2])>,
    pub reference: Option<Array2<f64>>,
    pub error: Option<FieldClassImageryError>,
    pub n_search: AtomicUsize,
    pub n_raster: AtomicUsize,
}

impl MockCatalog {
    pub fn new (days: Vec<(NaiveDate,f64)>)->Self {
        let days = days.into_iter().map( |(d,v)| (d,v,CLEAR)).collect();
        MockCatalog { days, reference: None, error: None, n_search: AtomicUsize::new(0), n_raster: AtomicUsize::new(0) }
    }

    pub fn failing (error: FieldClassImageryError)->Self {
        let mut catalog = Self::new( vec![]);
        catalog.error = Some(error);
        catalog
    }

    pub fn with_reference (mut self, classes: Array2<f64>)->Self {
        self.reference = Some(classes);
        self
    }

    pub fn with_cloudy_day (mut self, date: NaiveDate, cloudy: [[bool;2];2])->Self {
        self.days.push( (date, 0.0, cloudy));
        self
    }
}

#[async_trait]
impl ImageryCatalog for MockCatalog {
    async fn search (&self, query: &SceneQuery)->Result<SceneCollection> {
        self.n_search.fetch_add( 1, Ordering::Relaxed);
        if let Some(e) = &self.error { return Err(e.clone()) }

        let scenes = if query.product == CDL {
            if self.reference.is_some() {
                vec![ Scene { id: format!("cdl-{}", query.start), product: CDL.to_string(), acquired: utc_midnight(&query.start), cloud_fraction: None } ]
            } else {
                vec![]
            }
        } else {
            self.days.iter()
                .filter( |(d,..)| *d >= query.start && *d < query.end)
                .map( |(d,..)| Scene {
                    id: format!("s2-{d}"),
                    product: query.product.clone(),
                    acquired: utc_midnight(d) + TimeDelta::hours(10),
                    cloud_fraction: Some(0.0)
                })
                .collect()
        };

        let bbox = query.geometry.bbox().unwrap();
        Ok( SceneCollection { scenes, geoctx: GeoContext::for_bbox( &bbox, 10.0) } )
    }

    async fn stack (&self, scenes: &SceneCollection, bands: &[String])->Result<RasterStack> {
        self.n_raster.fetch_add( 1, Ordering::Relaxed);
        let dates = scenes.dates();

        let layers = self.days.iter()
            .filter( |(d,..)| dates.contains(d))
            .map( |(d,v,cloudy)| ndvi_layer( *d, *v, *cloudy))
            .collect();

        Ok( RasterStack::new(layers) )
    }

    async fn mosaic (&self, scenes: &SceneCollection, bands: &[String])->Result<DayRaster> {
        self.n_raster.fetch_add( 1, Ordering::Relaxed);
        let classes = self.reference.as_ref().ok_or_else( || FieldClassImageryError::ServiceError( 404, "no reference".into()))?;

        let (rows,cols) = classes.dim();
        let data = classes.clone().into_shape_with_order( (1,rows,cols)).unwrap();
        let mask = data.mapv( |v| v == 0.0); // 0 is no-data

        DayRaster::new( scenes.dates()[0], bands.to_vec(), data, mask)
    }
}
