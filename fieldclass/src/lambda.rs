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

//! AWS Lambda entry. Events are [`ClassRequest`] objects, responses [`FieldClass`] objects. Failures are
//! reported as Lambda errors with the [`FieldClassError`] message (which includes the fid)

use std::sync::Arc;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::info;

use crate::{ClassRequest, FieldClass, FieldClassContext, handle_class_request};

pub async fn handle_event (ctx: &FieldClassContext, event: LambdaEvent<ClassRequest>)->Result<FieldClass,Error> {
    info!("received request {} for '{}'", event.context.request_id, event.payload.fid());
    Ok( handle_class_request( ctx, &event.payload).await? )
}

/// run the Lambda event loop. The context (and hence the model cache) lives as long as the execution environment
pub async fn run_lambda (ctx: Arc<FieldClassContext>)->Result<(),Error> {
    lambda_runtime::run( service_fn( move |event: LambdaEvent<ClassRequest>| {
        let ctx = ctx.clone();
        async move { handle_event( &ctx, event).await }
    })).await
}
