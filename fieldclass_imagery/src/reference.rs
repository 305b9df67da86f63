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

//! reference labels for training fields from a land cover product (e.g. the USDA Cropland Data Layer).
//! The label of a field is the most frequent class of all its valid pixels

use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::{Serialize,Deserialize};
use tracing::info;

use fieldclass_common::geometry::FieldGeometry;
use crate::{ImageryCatalog, SceneQuery, CDL, DayRaster, Result, insufficient_data, invalid_argument};

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct ReferenceConfig {
    pub product: String,
    pub band: String,
}

impl Default for ReferenceConfig {
    fn default()->Self {
        ReferenceConfig { product: CDL.to_string(), band: "class".to_string() }
    }
}

/// most frequent value of all valid pixels of the given band. Ties are resolved to the smaller class
pub fn majority_class (layer: &DayRaster, band: &str)->Option<i64> {
    let values = layer.band(band).ok()?;
    let mask = layer.band_mask(band).ok()?;

    let mut counts: BTreeMap<i64,usize> = BTreeMap::new();
    for (v,m) in values.iter().zip( mask.iter()) {
        if !*m && v.is_finite() {
            *counts.entry( v.round() as i64).or_insert(0) += 1;
        }
    }

    // max_by_key returns the last max element, hence we iterate in reverse to prefer smaller classes
    counts.into_iter().rev().max_by_key( |(_,n)| *n).map( |(class,_)| class)
}

/// the reference class of a field for a given year. Annual products are stamped at the end of the year so
/// we search `<year>-12-30 .. <year+1>-01-01`
pub async fn get_reference_class (catalog: &dyn ImageryCatalog, geometry: &FieldGeometry, year: i32, config: &ReferenceConfig)->Result<i64> {
    let start = NaiveDate::from_ymd_opt( year, 12, 30).ok_or_else( || invalid_argument( format!("invalid year {year}")))?;
    let end = NaiveDate::from_ymd_opt( year+1, 1, 1).ok_or_else( || invalid_argument( format!("invalid year {year}")))?;

    let query = SceneQuery::new( &config.product, geometry.clone(), start, end);
    let scenes = catalog.search( &query).await?;
    if scenes.is_empty() {
        return Err( insufficient_data( format!("no {} scenes for {year}", config.product)))
    }

    let layer = catalog.mosaic( &scenes, &[config.band.clone()]).await?;
    let class = majority_class( &layer, &config.band).ok_or_else( || insufficient_data("no valid reference pixels"))?;
    info!("reference class for {year}: {class}");

    Ok(class)
}
