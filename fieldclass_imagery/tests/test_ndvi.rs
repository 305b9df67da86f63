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

mod common;
use common::*;

use ndarray::Array3;
use fieldclass_imagery::{*, ndvi::*};

// run with "cargo test test_ndvi_bounds -- --nocapture"

fn layer_from (red: &[f64], nir: &[f64])->DayRaster {
    let n = red.len();
    let mut data = Array3::<f64>::zeros( (3,1,n));
    for i in 0..n {
        data[[0,0,i]] = red[i];
        data[[1,0,i]] = nir[i];
    }
    DayRaster::unmasked( date("2019-05-01"), NdviBands::default().request_bands(), data).unwrap()
}

#[test]
fn test_ndvi_bounds() {
    let red = [0.05, 0.3, 0.0, 0.2, 1.0, 0.0];
    let nir = [0.45, 0.1, 0.7, 0.2, 0.0, 0.0];
    let layer = layer_from( &red, &nir);

    let grid = ndvi( &layer, "red", "nir").unwrap();
    println!("ndvi: {:?}", grid.values);

    for (v,m) in grid.values.iter().zip( grid.mask.iter()) {
        if !*m {
            assert!( *v >= -1.0 && *v <= 1.0, "ndvi {v} out of range");
        }
    }

    assert!( (grid.values[[0,0]] - 0.8).abs() < 1e-12);
    assert!( (grid.values[[0,1]] + 0.5).abs() < 1e-12);
    assert_eq!( grid.values[[0,2]], 1.0);
    assert_eq!( grid.values[[0,4]], -1.0);

    // 0/0 is not a valid NDVI
    assert!( grid.mask[[0,5]]);
    assert_eq!( grid.n_valid(), 5);
}

#[test]
fn test_masking_never_unmasks() {
    let mut layer = ndvi_layer( date("2019-05-01"), 0.5, [[false,true],[false,false]]);
    layer.mask[[0,1,0]] = true; // red masked for one clear pixel

    let n_before = layer.n_masked();
    let n_new = apply_cloud_mask( &mut layer, "cloud_mask", 1.0).unwrap();
    assert_eq!( n_new, 1);
    assert!( layer.n_masked() >= n_before);

    // cloud masking applies to all bands of the pixel
    assert!( layer.mask[[0,0,1]] && layer.mask[[1,0,1]] && layer.mask[[2,0,1]]);

    let grid = ndvi( &layer, "red", "nir").unwrap();
    assert!( grid.mask[[0,1]]);
    assert!( grid.mask[[1,0]]);
    assert_eq!( grid.n_valid(), 2);

    // applying the mask again does not change anything
    assert_eq!( apply_cloud_mask( &mut layer, "cloud_mask", 1.0).unwrap(), 0);
}

#[test]
fn test_cloud_mask_pixels() {
    let bands = NdviBands::default().request_bands();
    let data = Array3::<f64>::from_elem( (3,2,3), 0.3);
    let mut layer = DayRaster::unmasked( date("2019-05-01"), bands, data).unwrap();
    let cloud = layer.band_index("cloud_mask").unwrap();

    layer.data[[cloud,0,2]] = 1.0;
    layer.data[[cloud,1,0]] = 1.0;
    layer.data[[cloud,1,1]] = 2.0; // other flag values are clear

    assert_eq!( apply_cloud_mask( &mut layer, "cloud_mask", 1.0).unwrap(), 2);
    for r in 0..2 {
        for c in 0..3 {
            let cloudy = (r,c) == (0,2) || (r,c) == (1,0);
            for b in 0..3 {
                assert_eq!( layer.mask[[b,r,c]], cloudy, "band {b} pixel ({r},{c})");
            }
        }
    }
}

#[test]
fn test_missing_band() {
    let mut layer = ndvi_layer( date("2019-05-01"), 0.5, CLEAR);
    assert!( matches!( ndvi( &layer, "red", "swir"), Err(FieldClassImageryError::MissingBandError(_))));
    assert!( apply_cloud_mask( &mut layer, "scl", 1.0).is_err());
}

#[test]
fn test_masked_median() {
    assert_eq!( masked_median( [3.0, 1.0, 2.0].into_iter()), Some(2.0));
    assert_eq!( masked_median( [4.0, 1.0, 3.0, 2.0].into_iter()), Some(2.5));
    assert_eq!( masked_median( [f64::NAN, 1.0].into_iter()), Some(1.0));
    assert_eq!( masked_median( std::iter::empty()), None);
}

#[test]
fn test_ndvi_timeseries() {
    let d0 = date("2019-05-01");
    let layers = vec![
        ndvi_layer( day(&d0, 12), 0.6, [[true,false],[false,false]]),
        ndvi_layer( d0, 0.3, CLEAR),
        ndvi_layer( day(&d0, 6), 0.0, OVERCAST),
    ];

    let ts = ndvi_timeseries( RasterStack::new(layers), &NdviBands::default()).unwrap();
    assert_eq!( ts.len(), 3);
    assert_eq!( ts.n_valid(), 2);
    assert_eq!( ts.n_masked(), 1);

    let dates: Vec<_> = ts.samples.iter().map( |s| s.date).collect();
    assert_eq!( dates, vec![ d0, day(&d0,6), day(&d0,12) ]);
    assert!( (ts.samples[0].value.unwrap() - 0.3).abs() < 1e-9);
    assert_eq!( ts.samples[1].value, None);
    assert!( (ts.samples[2].value.unwrap() - 0.6).abs() < 1e-9);
}
