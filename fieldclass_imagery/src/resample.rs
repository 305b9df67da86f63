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

//! temporal resampling of irregular time series onto a fixed step date grid

use chrono::NaiveDate;
use serde::{Serialize,Deserialize};
use tracing::debug;

use fieldclass_common::datetime::{date_grid, to_epoch_secs, fmt_date};
use crate::{Result, insufficient_data, invalid_argument, ndvi::TimeSeries};

/// fixed length series on a regular date grid - this is the feature vector for classifiers
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct ResampledSeries {
    pub values: Vec<f64>,
    pub dates: Vec<NaiveDate>,
}

impl ResampledSeries {
    pub fn len (&self)->usize { self.values.len() }
    pub fn is_empty (&self)->bool { self.values.is_empty() }
}

/// piecewise linear interpolant over strictly increasing sample positions that also extrapolates linearly
/// (using the first/last two samples) outside of the sample range
#[derive(Debug,Clone)]
pub struct LinearInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolant {
    /// samples do not have to be sorted. Duplicate positions are collapsed into their mean value.
    /// This needs at least two distinct positions
    pub fn new (samples: impl IntoIterator<Item=(f64,f64)>)->Result<Self> {
        let mut samples: Vec<(f64,f64)> = samples.into_iter().filter( |(x,y)| x.is_finite() && y.is_finite()).collect();
        samples.sort_by( |a,b| a.0.total_cmp(&b.0));

        let mut xs: Vec<f64> = Vec::with_capacity( samples.len());
        let mut ys: Vec<f64> = Vec::with_capacity( samples.len());
        let mut n_dup = 1.0;

        for (x,y) in samples {
            if let (Some(&last_x), Some(last_y)) = (xs.last(), ys.last_mut()) {
                if x == last_x {
                    *last_y = (*last_y * n_dup + y) / (n_dup + 1.0);
                    n_dup += 1.0;
                    continue
                }
            }
            xs.push(x);
            ys.push(y);
            n_dup = 1.0;
        }

        if xs.len() < 2 {
            Err( insufficient_data( format!("need at least 2 valid samples to interpolate, got {}", xs.len())))
        } else {
            Ok( LinearInterpolant { xs, ys } )
        }
    }

    pub fn eval (&self, x: f64)->f64 {
        let n = self.xs.len();
        // index of the upper segment point, clamped so that we extrapolate from the boundary segments
        let i = self.xs.partition_point( |xi| *xi < x).clamp( 1, n-1);

        let (x0,x1) = (self.xs[i-1], self.xs[i]);
        let (y0,y1) = (self.ys[i-1], self.ys[i]);
        y0 + (x - x0) * (y1 - y0) / (x1 - x0)
    }
}

/// resample the valid samples of a time series onto the grid `start + k*step_days` (`< end`), dropping the
/// first grid point (which coincides with `start`). Fails with an insufficient data error if there are less
/// than two valid samples
pub fn resample_linear (series: &TimeSeries, start: &NaiveDate, end: &NaiveDate, step_days: u32)->Result<ResampledSeries> {
    if end <= start || step_days == 0 {
        return Err( invalid_argument( format!("invalid resampling range {}..{} step {}", fmt_date(start), fmt_date(end), step_days)))
    }

    let interpolant = LinearInterpolant::new( series.valid().map( |(d,v)| (to_epoch_secs(&d) as f64, v)))?;

    let dates: Vec<NaiveDate> = date_grid( start, end, step_days).into_iter().skip(1).collect();
    let values: Vec<f64> = dates.iter().map( |d| interpolant.eval( to_epoch_secs(d) as f64)).collect();
    debug!("resampled {} valid samples to {} grid points", series.n_valid(), values.len());

    Ok( ResampledSeries { values, dates } )
}
