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

//! the synchronous HTTP interface:
//!
//! ```text
//! POST <host>:<port>/getclass   {"geometry": <GeoJSON geometry>, "fid": <string>}
//! ```
//!
//! responds with `{"class": <int>, "fid": <string>}` or, on failure, with `{"error": <msg>, "fid": <string>}` and
//! a status code that reflects the error kind

use std::{net::SocketAddr, sync::Arc};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Serialize,Deserialize};
use serde_json::json;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{info,warn};

use crate::{FieldClassContext, FieldClassError, ClassRequest, handle_class_request};

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct ServerConfig {
    pub sock_addr: SocketAddr,
}

impl ServerConfig {
    pub fn url (&self)->String {
        format!("http://{}", self.sock_addr)
    }
}

impl Default for ServerConfig {
    fn default()->Self {
        ServerConfig { sock_addr: SocketAddr::from( ([0,0,0,0], 8080)) }
    }
}

impl FieldClassError {
    pub fn status_code (&self)->StatusCode {
        match self {
            FieldClassError::InvalidRequestError{..} => StatusCode::BAD_REQUEST,
            FieldClassError::InsufficientDataError{..} => StatusCode::UNPROCESSABLE_ENTITY,
            FieldClassError::RemoteServiceError{..} => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for FieldClassError {
    fn into_response (self)->Response {
        let status = self.status_code();
        let body = json!({ "error": self.msg(), "fid": self.fid().unwrap_or_default() });
        (status, Json(body)).into_response()
    }
}

pub fn router (ctx: Arc<FieldClassContext>)->Router {
    Router::new()
        .route( "/getclass", post(get_class_handler))
        .layer( TraceLayer::new_for_http())
        .with_state(ctx)
}

/// we parse the body ourselves so that malformed requests get the same error response format
async fn get_class_handler (State(ctx): State<Arc<FieldClassContext>>, body: Bytes)->Response {
    let request: ClassRequest = match serde_json::from_slice( &body) {
        Ok(request) => request,
        Err(e) => return FieldClassError::invalid_request( "", format!("malformed request body: {e}")).into_response()
    };

    match handle_class_request( &ctx, &request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            warn!("getclass request failed: {e}");
            e.into_response()
        }
    }
}

/// serve the router on the configured socket address
pub fn spawn_server_task (config: &ServerConfig, router: Router)->JoinHandle<std::io::Result<()>> {
    let sock_addr = config.sock_addr;
    info!("serving on {}", config.url());

    tokio::spawn( async move {
        let listener = tokio::net::TcpListener::bind(sock_addr).await?;
        axum::serve( listener, router).await
    })
}
