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

//! HTTP server for field classification requests (see [`fieldclass::http`])

use std::sync::Arc;
use anyhow::Result;
use fieldclass_common::{define_cli, check_cli};
use fieldclass::{FieldClassContext, get_config, init_tracing, http::{router, spawn_server_task}};

define_cli! { ARGS [about="serve_class - HTTP server for crop type classification of field geometries"] =
    config: Option<String> [help="pathname of config file (default is fieldclass.ron lookup)", short, long]
}

#[tokio::main]
async fn main()->Result<()> {
    fieldclass_build::set_bin_context!();
    check_cli!(ARGS);
    init_tracing();

    let config = get_config( ARGS.config.as_deref())?;
    let server_config = config.server.clone();
    let ctx = Arc::new( FieldClassContext::from_config( config).await?);

    let server_task = spawn_server_task( &server_config, router(ctx));
    Ok( server_task.await?? )
}
