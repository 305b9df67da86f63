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

//! the NDVI time series builder: catalog search, band stack retrieval, cloud masking, per day aggregation
//! and resampling onto a fixed date grid

use chrono::NaiveDate;
use serde::{Serialize,Deserialize};
use tracing::{info,debug};

use fieldclass_common::{datetime::fmt_date, geometry::FieldGeometry};
use crate::{
    ImageryCatalog, SceneQuery, SENTINEL2_L2A, Result, insufficient_data, invalid_argument,
    ndvi::{NdviBands, TimeSeries, ndvi_timeseries},
    resample::{ResampledSeries, resample_linear},
};

/// configuration of the NDVI time series extraction
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct TimeSeriesConfig {
    /// the catalog product to search
    pub product: String,
    pub bands: NdviBands,

    /// inclusive start of the date range
    pub start_date: NaiveDate,
    /// exclusive end of the date range
    pub end_date: NaiveDate,
    /// step of the resampling date grid
    pub step_days: u32,
}

impl Default for TimeSeriesConfig {
    fn default()->Self {
        TimeSeriesConfig {
            product: SENTINEL2_L2A.to_string(),
            bands: NdviBands::default(),
            start_date: NaiveDate::from_ymd_opt( 2019, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt( 2019, 10, 1).unwrap(),
            step_days: 6,
        }
    }
}

impl TimeSeriesConfig {
    pub fn with_date_range (mut self, start_date: NaiveDate, end_date: NaiveDate)->Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn check (&self)->Result<()> {
        if self.end_date <= self.start_date {
            Err( invalid_argument( format!("end date {} not after start date {}", fmt_date(&self.end_date), fmt_date(&self.start_date))))
        } else if self.step_days == 0 {
            Err( invalid_argument("step_days has to be positive"))
        } else {
            Ok(())
        }
    }
}

/// retrieve the per acquisition day NDVI series (masked median over the geometry) for the configured date range
pub async fn get_daily_ndvi (catalog: &dyn ImageryCatalog, geometry: &FieldGeometry, config: &TimeSeriesConfig)->Result<TimeSeries> {
    config.check()?;

    let query = SceneQuery::new( &config.product, geometry.clone(), config.start_date, config.end_date);
    let scenes = catalog.search( &query).await?;
    info!("found {} scenes for {}..{}", scenes.len(), fmt_date(&config.start_date), fmt_date(&config.end_date));

    if scenes.is_empty() {
        return Err( insufficient_data( format!("no {} scenes for geometry", config.product)))
    }

    let stack = catalog.stack( &scenes, &config.bands.request_bands()).await?;
    debug!("retrieved raster stack for {} acquisition days", stack.len());

    ndvi_timeseries( stack, &config.bands)
}

/// the fixed length NDVI feature vector for a field geometry
pub async fn get_ndvi_timeseries (catalog: &dyn ImageryCatalog, geometry: &FieldGeometry, config: &TimeSeriesConfig)->Result<ResampledSeries> {
    let daily = get_daily_ndvi( catalog, geometry, config).await?;
    info!("interpolating {} valid of {} daily samples", daily.n_valid(), daily.len());

    resample_linear( &daily, &config.start_date, &config.end_date, config.step_days)
}
