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

use std::sync::{Arc, atomic::Ordering};
use serde_json::json;
use fieldclass::*;

// run with "cargo test test_get_field_class -- --nocapture"

#[tokio::test]
async fn test_get_field_class() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new( MemStore::new());
    let ctx = test_context( dir.path(), Arc::new( MockCatalog::new( [0.2, 0.5, 0.8])), store.clone());

    let geometry = UNIT_SQUARE.parse().unwrap();
    let result = get_field_class( &ctx, &geometry, "test-field").await.unwrap();
    println!("result: {result:?}");
    assert_eq!( result, FieldClass { class: 1, fid: "test-field".to_string() });

    // high NDVI from the start
    let ctx = test_context( dir.path(), Arc::new( MockCatalog::new( [0.7, 0.8, 0.6])), store.clone());
    let result = get_field_class( &ctx, &geometry, "f2").await.unwrap();
    assert_eq!( result.class, 5);

    // the second context found the model in the cache dir
    assert_eq!( store.n_gets.load( Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_model_fetched_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new( MemStore::new());
    let ctx = Arc::new( test_context( dir.path(), Arc::new( MockCatalog::new( [0.2, 0.5, 0.8])), store.clone()));

    let mut tasks = Vec::new();
    for i in 0..8 {
        let ctx = ctx.clone();
        tasks.push( tokio::spawn( async move {
            get_field_class( &ctx, &square( 1.0 + i as f64, 0.0), &format!("f{i}")).await
        }));
    }
    for task in tasks {
        assert!( task.await.unwrap().is_ok());
    }

    assert_eq!( store.n_gets.load( Ordering::SeqCst), 1);
    assert!( ctx.models.is_loaded( MODEL_NAME));
}

#[tokio::test]
async fn test_request_errors() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_context( dir.path(), Arc::new( MockCatalog::new( [0.2, 0.5, 0.8])), Arc::new( MemStore::new()));

    // no scenes
    let res = get_field_class( &ctx, &square( 10.0, 0.0), "empty").await;
    assert!( matches!( &res, Err(FieldClassError::InsufficientDataError{fid,..}) if fid == "empty"));

    // missing and invalid geometries
    let res = handle_class_request( &ctx, &ClassRequest::default()).await;
    assert!( matches!( &res, Err(FieldClassError::InvalidRequestError{fid,..}) if fid.is_empty()));

    let res = handle_class_request( &ctx, &ClassRequest::new( json!({"type":"Point","coordinates":[0.0,0.0]}), "pt")).await;
    assert!( matches!( &res, Err(FieldClassError::InvalidRequestError{fid,..}) if fid == "pt"));

    // unknown model
    let res = get_field_class_with_model( &ctx, &square( 1.0, 0.0), "m", BUCKET, "unknown.json").await;
    assert!( matches!( &res, Err(FieldClassError::RemoteServiceError{fid,..}) if fid == "m"));

    // catalog failure
    let ctx = test_context( dir.path(), Arc::new( MockCatalog::failing()), Arc::new( MemStore::new()));
    let res = get_field_class( &ctx, &square( 1.0, 0.0), "remote").await;
    assert!( matches!( &res, Err(FieldClassError::RemoteServiceError{fid,..}) if fid == "remote"));
}

#[test]
fn test_class_request_fid() {
    let req: ClassRequest = serde_json::from_value( json!({"geometry": null, "id": "alias"})).unwrap();
    assert_eq!( req.fid(), "alias");

    let req: ClassRequest = serde_json::from_value( json!({"geometry": null, "fid": 42})).unwrap();
    assert_eq!( req.fid(), "42");

    let req: ClassRequest = serde_json::from_value( json!({})).unwrap();
    assert_eq!( req.fid(), "");
    assert!( req.field_geometry().is_err());
}

#[test]
fn test_class_request_fid_and_id() {
    // both keys present: `fid` wins, `id` is only a fallback
    let req: ClassRequest = serde_json::from_str( r#"{"geometry": null, "fid": "a", "id": "b"}"#).unwrap();
    assert_eq!( req.fid(), "a");

    let req: ClassRequest = serde_json::from_str( r#"{"geometry": null, "fid": null, "id": 7}"#).unwrap();
    assert_eq!( req.fid(), "7");
}

#[tokio::test]
async fn test_reference_class() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_context( dir.path(), Arc::new( MockCatalog::new( [0.2, 0.5, 0.8])), Arc::new( MemStore::new()));

    let result = get_field_reference_class( &ctx, &square( 1.0, 0.0), "ref", 2019).await.unwrap();
    assert_eq!( result, FieldClass { class: 24, fid: "ref".to_string() });
}
