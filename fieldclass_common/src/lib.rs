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

use serde::{Serialize,Deserialize};

pub mod macros;
pub mod fs;
pub mod datetime;
pub mod strings;
pub mod geometry;

// a global fn that can be used with serde(skip_serializing_if="fieldclass_common::is_none")
#[inline] pub fn is_none<T> (opt: &Option<T>)->bool { opt.is_none() }

/// a geographic bounding box in degrees
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64)->Self {
        BoundingBox{ west, south, east, north}
    }

    pub fn to_minmax_array (&self) -> [f64;4] {
        [self.west,self.south,self.east,self.north]
    }

    pub fn center (&self) -> (f64,f64) {
        ( (self.west + self.east) / 2.0, (self.south + self.north) / 2.0 )
    }

    pub fn width (&self)->f64 { self.east - self.west }
    pub fn height (&self)->f64 { self.north - self.south }

    pub fn is_empty (&self)->bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}
