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

//! AWS Lambda handler for field classification events

use std::sync::Arc;
use fieldclass::{FieldClassContext, get_config, init_tracing, lambda::run_lambda};

#[tokio::main]
async fn main()->Result<(),lambda_runtime::Error> {
    fieldclass_build::set_bin_context!();
    init_tracing();

    // the config file is usually deployed with the function and selected through FIELDCLASS_CONFIG
    let config_path = std::env::var("FIELDCLASS_CONFIG").ok();
    let config = get_config( config_path.as_deref())?;
    let ctx = Arc::new( FieldClassContext::from_config( config).await?);

    run_lambda(ctx).await
}
