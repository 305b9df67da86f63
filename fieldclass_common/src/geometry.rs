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

//! validated field geometries. Fields are GeoJSON polygons (or multi-polygons) in geographic coordinates.
//! We keep the original GeoJSON so that it can be passed on to remote services unchanged

use std::{fmt, str::FromStr};
use serde::{Serialize,Deserialize};
use geojson::{GeoJson, Geometry, Value, PolygonType};
use ::geo::BoundingRect;
use thiserror::Error;

use crate::BoundingBox;

#[derive(Error,Debug,Clone,PartialEq)]
pub enum GeometryError {
    #[error("malformed GeoJSON: {0}")]
    MalformedError(String),

    #[error("unsupported geometry type: {0}")]
    UnsupportedTypeError(String),

    #[error("invalid polygon: {0}")]
    InvalidPolygonError(String),
}

/// a validated (multi-)polygon field boundary
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(try_from="Geometry", into="Geometry")]
pub struct FieldGeometry {
    geometry: Geometry
}

impl FieldGeometry {
    pub fn new (geometry: Geometry)->Result<Self,GeometryError> {
        match &geometry.value {
            Value::Polygon(rings) => check_polygon(rings)?,
            Value::MultiPolygon(polygons) => {
                if polygons.is_empty() { return Err( GeometryError::InvalidPolygonError("empty multipolygon".to_string())) }
                for rings in polygons { check_polygon(rings)? }
            }
            other => return Err( GeometryError::UnsupportedTypeError( type_name(other).to_string()))
        }
        Ok( FieldGeometry{ geometry } )
    }

    /// create a single ring polygon from (lon,lat) degree tuples. The ring is closed if it isn't already
    pub fn from_lon_lat_ring (coords: &[(f64,f64)])->Result<Self,GeometryError> {
        let mut ring: Vec<Vec<f64>> = coords.iter().map( |(lon,lat)| vec![*lon,*lat]).collect();
        if let (Some(first),Some(last)) = (ring.first(), ring.last()) {
            if first != last { ring.push( first.clone()) }
        }
        Self::new( Geometry::new( Value::Polygon( vec![ring])))
    }

    /// accept GeoJSON geometries or features with a geometry
    pub fn from_geojson (gj: GeoJson)->Result<Self,GeometryError> {
        match gj {
            GeoJson::Geometry(geometry) => Self::new(geometry),
            GeoJson::Feature(feature) => {
                if let Some(geometry) = feature.geometry {
                    Self::new(geometry)
                } else {
                    Err( GeometryError::MalformedError("feature without geometry".to_string()))
                }
            }
            GeoJson::FeatureCollection(_) => Err( GeometryError::UnsupportedTypeError("FeatureCollection".to_string()))
        }
    }

    pub fn from_json_value (v: serde_json::Value)->Result<Self,GeometryError> {
        let gj = GeoJson::from_json_value(v).map_err( |e| GeometryError::MalformedError(e.to_string()))?;
        Self::from_geojson(gj)
    }

    pub fn geojson (&self)->&Geometry {
        &self.geometry
    }

    pub fn to_json_value (&self)->serde_json::Value {
        serde_json::to_value( &self.geometry).unwrap_or(serde_json::Value::Null)
    }

    pub fn bbox (&self)->Option<BoundingBox> {
        let geom: ::geo::Geometry<f64> = self.geometry.value.clone().try_into().ok()?;
        geom.bounding_rect().map( |r| BoundingBox::new( r.min().x, r.min().y, r.max().x, r.max().y))
    }
}

fn type_name (v: &Value)->&'static str {
    match v {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn check_polygon (rings: &PolygonType)->Result<(),GeometryError> {
    if rings.is_empty() {
        return Err( GeometryError::InvalidPolygonError("polygon without rings".to_string()))
    }

    for ring in rings {
        if ring.len() < 4 {
            return Err( GeometryError::InvalidPolygonError( format!("ring with {} positions (need at least 4)", ring.len())))
        }
        if ring.first() != ring.last() {
            return Err( GeometryError::InvalidPolygonError("ring not closed".to_string()))
        }
        for pos in ring {
            if pos.len() < 2 || !pos.iter().all( |c| c.is_finite()) {
                return Err( GeometryError::InvalidPolygonError( format!("invalid position {pos:?}")))
            }
            if pos[0] < -180.0 || pos[0] > 180.0 || pos[1] < -90.0 || pos[1] > 90.0 {
                return Err( GeometryError::InvalidPolygonError( format!("position out of geographic range {pos:?}")))
            }
        }
    }
    Ok(())
}

impl TryFrom<Geometry> for FieldGeometry {
    type Error = GeometryError;
    fn try_from (geometry: Geometry)->Result<Self,Self::Error> { FieldGeometry::new(geometry) }
}

impl From<FieldGeometry> for Geometry {
    fn from (fg: FieldGeometry)->Self { fg.geometry }
}

impl FromStr for FieldGeometry {
    type Err = GeometryError;

    fn from_str (s: &str)->Result<Self,Self::Err> {
        let gj: GeoJson = s.parse().map_err( |e: geojson::Error| GeometryError::MalformedError(e.to_string()))?;
        Self::from_geojson(gj)
    }
}

impl fmt::Display for FieldGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(&self.geometry).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}
