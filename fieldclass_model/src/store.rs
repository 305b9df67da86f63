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

//! object stores that hold model artifacts

use std::{path::{Component,Path,PathBuf}, io::ErrorKind, sync::Arc};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Serialize,Deserialize};
use tracing::debug;

use fieldclass_common::strings::env_expand;
use crate::{Result, FieldClassModelError, store_error};

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object (&self, bucket: &str, key: &str)->Result<Bytes>;
}

/// object store configuration. String values support `${VAR}` expansion
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub enum StoreConfig {
    /// objects are files `<root>/<bucket>/<key>`
    Local { root: String },

    /// AWS S3, with an optional region (otherwise the default provider chain is used)
    S3 { region: Option<String> },
}

pub async fn create_store (config: &StoreConfig)->Result<Arc<dyn ObjectStore>> {
    match config {
        StoreConfig::Local { root } => {
            Ok( Arc::new( LocalStore::new( env_expand(root))) )
        }
        #[cfg(feature="s3")]
        StoreConfig::S3 { region } => {
            Ok( Arc::new( S3Store::new( region.as_ref().map( |r| env_expand(r))).await) )
        }
        #[cfg(not(feature="s3"))]
        StoreConfig::S3 {..} => {
            Err( store_error("S3 object store support not enabled (requires 's3' feature)"))
        }
    }
}

/// object keys and bucket names must be relative and must not escape their parent
fn check_key (key: &str)->Result<()> {
    let path = Path::new(key);
    if key.is_empty() || !path.components().all( |c| matches!(c, Component::Normal(_))) {
        Err( FieldClassModelError::InvalidKeyError( key.to_string()))
    } else {
        Ok(())
    }
}

/// object store that maps buckets to sub directories of a local root dir
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new (root: impl Into<PathBuf>)->Self {
        LocalStore { root: root.into() }
    }

    pub fn root (&self)->&Path { &self.root }

    pub fn object_path (&self, bucket: &str, key: &str)->Result<PathBuf> {
        check_key(bucket)?;
        check_key(key)?;
        Ok( self.root.join(bucket).join(key) )
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn get_object (&self, bucket: &str, key: &str)->Result<Bytes> {
        let path = self.object_path( bucket, key)?;
        debug!("reading object {path:?}");

        match tokio::fs::read(&path).await {
            Ok(data) => Ok( Bytes::from(data) ),
            Err(e) if e.kind() == ErrorKind::NotFound => Err( FieldClassModelError::ObjectNotFoundError( format!("{bucket}/{key}"))),
            Err(e) => Err( store_error( format!("{path:?}: {e}")))
        }
    }
}

#[cfg(feature="s3")]
pub use s3::S3Store;

#[cfg(feature="s3")]
mod s3 {
    use async_trait::async_trait;
    use aws_config::{Region, meta::region::RegionProviderChain};
    use aws_sdk_s3::{Client, error::{DisplayErrorContext, SdkError}, operation::get_object::GetObjectError};
    use bytes::Bytes;
    use tracing::debug;

    use super::{ObjectStore, check_key};
    use crate::{Result, FieldClassModelError, store_error};

    pub struct S3Store {
        client: Client,
    }

    impl S3Store {
        /// create a store for the given region, using credentials from the default provider chain
        pub async fn new (region: Option<String>)->Self {
            let region_provider = RegionProviderChain::first_try( region.map(Region::new)).or_default_provider();
            let aws_config = aws_config::from_env().region(region_provider).load().await;
            S3Store { client: Client::new(&aws_config) }
        }

        pub fn from_client (client: Client)->Self {
            S3Store { client }
        }
    }

    #[async_trait]
    impl ObjectStore for S3Store {
        async fn get_object (&self, bucket: &str, key: &str)->Result<Bytes> {
            check_key(key)?;
            debug!("retrieving s3://{bucket}/{key}");

            let object = self.client.get_object().bucket(bucket).key(key).send().await.map_err( |e| {
                match &e {
                    SdkError::ServiceError(se) if matches!( se.err(), GetObjectError::NoSuchKey(_)) => {
                        FieldClassModelError::ObjectNotFoundError( format!("s3://{bucket}/{key}"))
                    }
                    _ => store_error( DisplayErrorContext(&e))
                }
            })?;

            let data = object.body.collect().await.map_err( |e| store_error(e))?;
            Ok( data.into_bytes() )
        }
    }
}
