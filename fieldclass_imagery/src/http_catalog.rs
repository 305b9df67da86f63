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

//! [`ImageryCatalog`] implementation for a JSON/HTTP catalog service:
//!
//! ```text
//! POST <url>/scenes/search   {product, geometry, start_datetime, end_datetime, limit}
//!                            -> {scenes: [..], geocontext: {..}}
//! POST <url>/scenes/stack    {scene_ids, bands, geocontext, flatten: "date", scaling}
//!                            -> {layers: [{date, shape: [bands,rows,cols], data: [..], mask: [..]}]}
//! POST <url>/scenes/mosaic   {scene_ids, bands, geocontext, scaling}
//!                            -> {layers: [{..}]}  (single layer)
//! ```
//!
//! Requests are authenticated with HTTP basic auth using the configured client id/secret

use std::time::Duration;
use async_trait::async_trait;
use chrono::NaiveDate;
use ndarray::Array3;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize,Deserialize, de::DeserializeOwned};
use tracing::debug;

use fieldclass_common::{datetime::{fmt_date, secs}, geometry::FieldGeometry, strings::env_expand};
use crate::{
    DayRaster, GeoContext, ImageryCatalog, RasterStack, Result, Scene, SceneCollection, SceneQuery,
    FieldClassImageryError, shape_error, insufficient_data
};

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct CatalogConfig {
    /// base URL of the catalog service (supports `${VAR}` expansion)
    pub url: String,

    /// client credentials (support `${VAR}` expansion)
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,

    /// request timeout
    pub timeout: Duration,

    /// raster value scaling requested from the catalog ("physical" means reflectance units)
    pub scaling: String,
}

impl Default for CatalogConfig {
    fn default()->Self {
        CatalogConfig {
            url: "${FIELDCLASS_CATALOG_URL}".to_string(),
            client_id: Some("${FIELDCLASS_CLIENT_ID}".to_string()),
            client_secret: Some("${FIELDCLASS_CLIENT_SECRET}".to_string()),
            timeout: secs(120),
            scaling: "physical".to_string(),
        }
    }
}

//--- the wire format

#[derive(Serialize,Debug)]
struct SearchRequest<'a> {
    product: &'a str,
    geometry: &'a FieldGeometry,
    start_datetime: String,
    end_datetime: String,
    limit: Option<usize>,
}

#[derive(Deserialize,Debug)]
struct SearchResponse {
    scenes: Vec<Scene>,
    geocontext: GeoContext,
}

#[derive(Serialize,Debug)]
struct RasterRequest<'a> {
    scene_ids: Vec<String>,
    bands: &'a [String],
    geocontext: &'a GeoContext,
    #[serde(skip_serializing_if="Option::is_none")]
    flatten: Option<&'static str>,
    scaling: &'a str,
}

#[derive(Deserialize,Debug)]
struct RasterLayer {
    date: NaiveDate,
    shape: [usize;3],
    data: Vec<f64>,
    #[serde(default)]
    mask: Option<Vec<bool>>,
}

#[derive(Deserialize,Debug)]
struct RasterResponse {
    layers: Vec<RasterLayer>,
}

impl RasterLayer {
    fn into_day_raster (self, bands: &[String])->Result<DayRaster> {
        let shape = (self.shape[0], self.shape[1], self.shape[2]);
        let data = Array3::from_shape_vec( shape, self.data)?;
        let mask = match self.mask {
            Some(mask) => Array3::from_shape_vec( shape, mask)?,
            None => Array3::from_elem( shape, false)
        };
        DayRaster::new( self.date, bands.to_vec(), data, mask)
    }
}

/// catalog client for the JSON/HTTP catalog service
pub struct HttpCatalog {
    url: String,
    credentials: Option<(String,Option<String>)>,
    scaling: String,
    client: Client,
}

impl HttpCatalog {
    pub fn new (config: &CatalogConfig)->Result<Self> {
        let url = env_expand( &config.url).trim_end_matches('/').to_string();
        if !url.starts_with("http") {
            return Err( FieldClassImageryError::ConfigError( format!("invalid catalog url '{url}'")))
        }

        let credentials = config.client_id.as_ref().map( |id| (env_expand(id), config.client_secret.as_ref().map( |s| env_expand(s))));
        let client = Client::builder().timeout( config.timeout).build()?;

        Ok( HttpCatalog { url, credentials, scaling: config.scaling.clone(), client } )
    }

    pub fn url (&self)->&str { self.url.as_str() }

    fn post (&self, path: &str)->RequestBuilder {
        let rb = self.client.post( format!("{}/{}", self.url, path));
        if let Some((id,secret)) = &self.credentials {
            rb.basic_auth( id, secret.as_ref())
        } else {
            rb
        }
    }

    async fn send_json<Q,R> (&self, path: &str, request: &Q)->Result<R> where Q: Serialize, R: DeserializeOwned {
        debug!("POST {}/{}", self.url, path);
        let response = self.post(path).json(request).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok( response.json::<R>().await? )
        } else {
            let msg = response.text().await.unwrap_or_default();
            Err( FieldClassImageryError::ServiceError( status.as_u16(), msg))
        }
    }

    async fn get_layers (&self, path: &str, scenes: &SceneCollection, bands: &[String], flatten: Option<&'static str>)->Result<Vec<DayRaster>> {
        let request = RasterRequest {
            scene_ids: scenes.ids(),
            bands,
            geocontext: &scenes.geoctx,
            flatten,
            scaling: &self.scaling,
        };
        let response: RasterResponse = self.send_json( path, &request).await?;

        response.layers.into_iter().map( |l| l.into_day_raster(bands)).collect()
    }
}

#[async_trait]
impl ImageryCatalog for HttpCatalog {
    async fn search (&self, query: &SceneQuery)->Result<SceneCollection> {
        let request = SearchRequest {
            product: &query.product,
            geometry: &query.geometry,
            start_datetime: fmt_date( &query.start),
            end_datetime: fmt_date( &query.end),
            limit: query.limit,
        };
        let response: SearchResponse = self.send_json( "scenes/search", &request).await?;

        Ok( SceneCollection { scenes: response.scenes, geoctx: response.geocontext } )
    }

    async fn stack (&self, scenes: &SceneCollection, bands: &[String])->Result<RasterStack> {
        let layers = self.get_layers( "scenes/stack", scenes, bands, Some("date")).await?;
        Ok( RasterStack::new(layers) )
    }

    async fn mosaic (&self, scenes: &SceneCollection, bands: &[String])->Result<DayRaster> {
        let mut layers = self.get_layers( "scenes/mosaic", scenes, bands, None).await?;
        if layers.len() == 1 {
            Ok( layers.remove(0) )
        } else {
            Err( shape_error( format!("mosaic returned {} layers", layers.len())))
        }
    }
}
