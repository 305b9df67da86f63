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

//! retrieve the reference (land cover) class of a field, e.g. to label training data

use anyhow::Result;
use fieldclass_common::{define_cli, check_cli, geometry::FieldGeometry};
use fieldclass::{FieldClassContext, get_config, get_field_reference_class, init_tracing};

define_cli! { ARGS [about="get_reference_class - get the majority land cover class of a field geometry"] =
    config: Option<String> [help="pathname of config file (default is fieldclass.ron lookup)", short, long],
    year: i32 [help="year of the reference product", long, default_value="2019"],
    fid: Option<String> [help="field id to report", long],
    geometry: String [help="GeoJSON geometry (or feature) of the field"]
}

#[tokio::main]
async fn main()->Result<()> {
    fieldclass_build::set_bin_context!();
    check_cli!(ARGS);
    init_tracing();

    let config = get_config( ARGS.config.as_deref())?;
    let ctx = FieldClassContext::from_config( config).await?;

    let geometry: FieldGeometry = ARGS.geometry.parse()?;
    let fid = ARGS.fid.clone().unwrap_or_default();
    let result = get_field_reference_class( &ctx, &geometry, &fid, ARGS.year).await?;

    println!("{}", serde_json::to_string( &result)?);
    Ok(())
}
