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

//! classify a single field from the command line and print the JSON result

use anyhow::Result;
use tracing::{info,error};
use fieldclass_common::{define_cli, check_cli};
use fieldclass::{FieldClassContext, FieldClassError, get_config, get_field_class_with_model, init_tracing};
use fieldclass_common::geometry::FieldGeometry;

define_cli! { ARGS [about="run_batch - classify a single field geometry"] =
    config: Option<String> [help="pathname of config file (default is fieldclass.ron lookup)", short, long],
    geometry: String [help="GeoJSON geometry (or feature) of the field"],
    fid: String [help="field id"],
    bucket: String [help="bucket that holds the model"],
    model_name: String [help="name of the model object"]
}

#[tokio::main]
async fn main()->Result<()> {
    fieldclass_build::set_bin_context!();
    check_cli!(ARGS);
    init_tracing();

    let config = get_config( ARGS.config.as_deref())?;
    let ctx = FieldClassContext::from_config( config).await?;

    let res = match ARGS.geometry.parse::<FieldGeometry>() {
        Ok(geometry) => get_field_class_with_model( &ctx, &geometry, &ARGS.fid, &ARGS.bucket, &ARGS.model_name).await,
        Err(e) => Err( FieldClassError::for_request( &ARGS.fid, e))
    };

    match res {
        Ok(result) => {
            let json = serde_json::to_string( &result)?;
            info!("result: {json}");
            println!("{json}");
            Ok(())
        }
        Err(e) => {
            error!("classification failed: {e}");
            Err( e.into())
        }
    }
}
