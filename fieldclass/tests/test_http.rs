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

use std::sync::Arc;
use axum::{body::{Body, to_bytes}, http::{Request, StatusCode}};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot
use fieldclass::{http::router, FieldClassContext};

// run with "cargo test test_getclass -- --nocapture"

fn test_router (dir: &std::path::Path, catalog: MockCatalog)->axum::Router {
    router( Arc::new( test_context( dir, Arc::new(catalog), Arc::new( MemStore::new()))))
}

async fn post_getclass (router: axum::Router, body: impl Into<Body>)->(StatusCode,Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/getclass")
        .header("content-type", "application/json")
        .body( body.into())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes( response.into_body(), usize::MAX).await.unwrap();
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    println!("{status}: {v}");

    (status, v)
}

#[tokio::test]
async fn test_getclass() {
    let dir = tempfile::tempdir().unwrap();
    let geometry: Value = serde_json::from_str(UNIT_SQUARE).unwrap();

    let body = json!({ "geometry": geometry, "fid": "test-field" }).to_string();
    let (status, v) = post_getclass( test_router( dir.path(), MockCatalog::new([0.2, 0.5, 0.8])), body).await;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( v, json!({ "class": 1, "fid": "test-field" }));

    // id alias
    let body = json!({ "geometry": geometry, "id": "aliased" }).to_string();
    let (status, v) = post_getclass( test_router( dir.path(), MockCatalog::new([0.2, 0.5, 0.8])), body).await;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( v["fid"], "aliased");

    // both fid and id
    let body = json!({ "geometry": geometry, "fid": "a", "id": "b" }).to_string();
    let (status, v) = post_getclass( test_router( dir.path(), MockCatalog::new([0.2, 0.5, 0.8])), body).await;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( v["fid"], "a");

    // no id at all
    let body = json!({ "geometry": geometry }).to_string();
    let (status, v) = post_getclass( test_router( dir.path(), MockCatalog::new([0.2, 0.5, 0.8])), body).await;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( v["fid"], "");
}

#[tokio::test]
async fn test_getclass_errors() {
    let dir = tempfile::tempdir().unwrap();

    let (status, v) = post_getclass( test_router( dir.path(), MockCatalog::new([0.2, 0.5, 0.8])), "{ not json").await;
    assert_eq!( status, StatusCode::BAD_REQUEST);
    assert!( v["error"].is_string());
    assert_eq!( v["fid"], "");

    let body = json!({ "fid": "no-geom" }).to_string();
    let (status, v) = post_getclass( test_router( dir.path(), MockCatalog::new([0.2, 0.5, 0.8])), body).await;
    assert_eq!( status, StatusCode::BAD_REQUEST);
    assert_eq!( v["fid"], "no-geom");

    let body = json!({ "geometry": {"type":"Polygon","coordinates":[[[10.0,0.0],[10.5,0.0],[10.5,0.5],[10.0,0.0]]]}, "fid": "empty" }).to_string();
    let (status, v) = post_getclass( test_router( dir.path(), MockCatalog::new([0.2, 0.5, 0.8])), body).await;
    assert_eq!( status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!( v["fid"], "empty");

    let body = json!({ "geometry": serde_json::from_str::<Value>(UNIT_SQUARE).unwrap(), "fid": "remote" }).to_string();
    let (status, v) = post_getclass( test_router( dir.path(), MockCatalog::failing()), body).await;
    assert_eq!( status, StatusCode::BAD_GATEWAY);
    assert_eq!( v["fid"], "remote");
}
