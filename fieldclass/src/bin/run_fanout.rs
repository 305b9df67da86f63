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

//! classify all features of a GeoJSON feature collection concurrently

use std::sync::Arc;
use anyhow::Result;
use tracing::warn;
use fieldclass_common::{define_cli, check_cli, fs::set_filepath_contents_atomic};
use fieldclass::{
    FieldClassContext, get_config, init_tracing,
    fanout::{FailedField, field_class_pool, read_field_tasks, run_fanout}
};

define_cli! { ARGS [about="run_fanout - classify all fields of a GeoJSON feature collection"] =
    config: Option<String> [help="pathname of config file (default is fieldclass.ron lookup)", short, long],
    output: Option<String> [help="pathname of JSON output file (default is stdout)", short, long],
    rerun: usize [help="max number of times failed fields are re-submitted", long, default_value="0"],
    max_concurrent: Option<usize> [help="max number of concurrent classifications (default from config)", long],
    features: String [help="pathname of GeoJSON feature collection with field geometries"]
}

#[tokio::main]
async fn main()->Result<()> {
    fieldclass_build::set_bin_context!();
    check_cli!(ARGS);
    init_tracing();

    let config = get_config( ARGS.config.as_deref())?;
    let max_concurrent = ARGS.max_concurrent.unwrap_or( config.fanout.max_concurrent);
    let ctx = Arc::new( FieldClassContext::from_config( config).await?);

    let (tasks, rejected) = read_field_tasks( &ARGS.features)?;
    for e in &rejected { warn!("rejected feature: {e}") }

    let pool = field_class_pool( ctx, max_concurrent);
    let mut report = run_fanout( &pool, tasks, ARGS.rerun).await;
    report.failed.extend( rejected.iter().map( |e| FailedField { fid: e.fid().unwrap_or_default().to_string(), error: e.to_string() }));

    let json = serde_json::to_string_pretty( &report)?;
    if let Some(output) = &ARGS.output {
        let path = std::path::Path::new(output);
        let dir = path.parent().filter( |p| !p.as_os_str().is_empty()).unwrap_or( std::path::Path::new("."));
        let filename = path.file_name().and_then( |f| f.to_str()).ok_or_else( || anyhow::anyhow!("invalid output path {output}"))?;
        set_filepath_contents_atomic( dir, filename, json.as_bytes())?;
    } else {
        println!("{json}");
    }

    Ok(())
}
