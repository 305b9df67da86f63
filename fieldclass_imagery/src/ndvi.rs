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

//! cloud masking, normalized difference index computation and spatial aggregation

use chrono::NaiveDate;
use ndarray::{Array2,Axis,Zip};
use serde::{Serialize,Deserialize};

use crate::{DayRaster,RasterStack,Result,missing_band};

/// a 2D grid of values with a validity mask (`true` = invalid)
#[derive(Debug,Clone,PartialEq)]
pub struct MaskedGrid {
    pub values: Array2<f64>,
    pub mask: Array2<bool>,
}

impl MaskedGrid {
    pub fn n_valid (&self)->usize {
        self.mask.iter().filter( |m| !**m).count()
    }

    pub fn valid_values (&self)->impl Iterator<Item=f64> + '_ {
        self.values.iter().zip( self.mask.iter()).filter( |(_,m)| !**m).map( |(v,_)| *v)
    }

    /// median of all valid values, `None` if there are none
    pub fn median (&self)->Option<f64> {
        masked_median( self.valid_values())
    }
}

/// a single (day,value) sample of a time series. `None` values are invalid (fully masked) days
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct Sample {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// an irregular, date ordered time series with potentially invalid samples
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct TimeSeries {
    pub samples: Vec<Sample>,
}

impl TimeSeries {
    pub fn new (mut samples: Vec<Sample>)->Self {
        samples.sort_by_key( |s| s.date);
        TimeSeries { samples }
    }

    pub fn len (&self)->usize { self.samples.len() }
    pub fn is_empty (&self)->bool { self.samples.is_empty() }

    pub fn valid (&self)->impl Iterator<Item=(NaiveDate,f64)> + '_ {
        self.samples.iter().filter_map( |s| s.value.map( |v| (s.date, v)))
    }

    pub fn n_valid (&self)->usize {
        self.samples.iter().filter( |s| s.value.is_some()).count()
    }

    pub fn n_masked (&self)->usize {
        self.len() - self.n_valid()
    }
}

/// mask all bands of pixels for which the cloud band equals the cloud flag value. Returns the number of
/// pixels that were not masked before
pub fn apply_cloud_mask (layer: &mut DayRaster, cloud_band: &str, cloud_flag: f64)->Result<usize> {
    let idx = layer.band_index(cloud_band)?;

    let cloudy: Array2<bool> = layer.data.index_axis( Axis(0), idx).mapv( |v| v == cloud_flag);
    let mut n_new = 0;

    // each mask lane along the band axis is one pixel
    Zip::from( layer.mask.lanes_mut( Axis(0))).and( &cloudy)
        .for_each( |mut pixel, &is_cloudy| {
            if is_cloudy {
                if pixel.iter().any( |m| !*m) { n_new += 1 }
                pixel.fill(true);
            }
        });

    Ok(n_new)
}

/// the normalized difference `(b - a) / (b + a)`, or `None` if that is not a finite number
#[inline]
pub fn normalized_difference (a: f64, b: f64)->Option<f64> {
    let nd = (b - a) / (b + a);
    if nd.is_finite() { Some(nd) } else { None }
}

/// compute the normalized difference index `(band2 - band1)/(band2 + band1)` of a (masked) layer. A pixel is
/// invalid if it is masked in either band or if the index is not finite
pub fn normalized_difference_index (layer: &DayRaster, band1: &str, band2: &str)->Result<MaskedGrid> {
    let b1 = layer.band(band1)?;
    let b2 = layer.band(band2)?;
    let m1 = layer.band_mask(band1)?;
    let m2 = layer.band_mask(band2)?;

    let mut values = Array2::<f64>::zeros( b1.raw_dim());
    let mut mask = Array2::<bool>::from_elem( b1.raw_dim(), true);

    Zip::from(&mut values).and(&mut mask).and(&b1).and(&b2).and(&m1).and(&m2)
        .for_each( |v, m, &a, &b, &ma, &mb| {
            if !(ma || mb) {
                if let Some(nd) = normalized_difference(a, b) {
                    *v = nd;
                    *m = false;
                }
            }
        });

    Ok( MaskedGrid { values, mask } )
}

/// NDVI with conventional band names
pub fn ndvi (layer: &DayRaster, red_band: &str, nir_band: &str)->Result<MaskedGrid> {
    normalized_difference_index( layer, red_band, nir_band)
}

/// median of the given values (mean of the two middle values for even counts). Non-finite values are ignored
pub fn masked_median (values: impl Iterator<Item=f64>)->Option<f64> {
    let mut vs: Vec<f64> = values.filter( |v| v.is_finite()).collect();
    if vs.is_empty() {
        None
    } else {
        vs.sort_by( |a,b| a.total_cmp(b));
        let n = vs.len();
        if n % 2 == 1 {
            Some( vs[n/2])
        } else {
            Some( (vs[n/2 - 1] + vs[n/2]) / 2.0)
        }
    }
}

/// band names and cloud flag used to turn a raster stack into an NDVI time series
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct NdviBands {
    pub red: String,
    pub nir: String,
    pub cloud_mask: String,
    pub cloud_flag: f64,
}

impl NdviBands {
    /// the bands we have to request from the catalog, in (red,nir,cloud_mask) order
    pub fn request_bands (&self)->Vec<String> {
        vec![ self.red.clone(), self.nir.clone(), self.cloud_mask.clone() ]
    }
}

impl Default for NdviBands {
    fn default()->Self {
        NdviBands {
            red: "red".to_string(),
            nir: "nir".to_string(),
            cloud_mask: "cloud_mask".to_string(),
            cloud_flag: 1.0
        }
    }
}

/// cloud mask each layer of the stack, compute its NDVI and aggregate it into a per day masked median
pub fn ndvi_timeseries (stack: RasterStack, bands: &NdviBands)->Result<TimeSeries> {
    let mut samples = Vec::with_capacity( stack.len());

    for mut layer in stack.layers {
        apply_cloud_mask( &mut layer, &bands.cloud_mask, bands.cloud_flag)?;
        let grid = ndvi( &layer, &bands.red, &bands.nir)?;
        samples.push( Sample { date: layer.date, value: grid.median() });
    }

    Ok( TimeSeries::new(samples) )
}
