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

//! runtime context and resource lookup for fieldclass binaries. This is where we find config files
//! and the local cache dirs (e.g. for downloaded model artifacts)

use std::{fs, path::{Path,PathBuf}, sync::OnceLock, env};

mod configs;
pub use configs::*;

mod errors;
pub use errors::*;

pub type FieldClassBuildResult<T> = errors::Result<T>;

/// name of the env var that can be used to override the fieldclass root dir
pub const ROOT_ENV: &'static str = "FIELDCLASS_ROOT";

/* #region bin globals *******************************************************************/

#[derive(Debug)]
pub struct BinContext {
    pub bin_name: String,
    pub bin_crate: String,
    pub bin_suffix: Option<String>, // optionally set via FIELDCLASS_BIN_SUFFIX at runtime (to distinguish simultaneous instances)
    pub proc_id: Option<u32>,
}

impl BinContext {
    pub fn set(bin_name: &str, bin_crate: &str, bin_suffix: Option<String>, proc_id: Option<u32>) {
        // first one wins - tests and lambda warm starts might call this more than once
        let _ = BIN_CONTEXT.set( Self{ bin_name: bin_name.to_string(), bin_crate: bin_crate.to_string(), bin_suffix, proc_id });
    }
}

pub static BIN_CONTEXT: OnceLock<BinContext> = OnceLock::new();

/// this has to be called (once) from the bin source
#[macro_export]
macro_rules! set_bin_context {
    () => {
        {
            // env! is resolved at compile time, std::env::var at runtime
            fieldclass_build::BinContext::set(env!("CARGO_BIN_NAME"),
                 env!("CARGO_PKG_NAME"),
                 std::env::var("FIELDCLASS_BIN_SUFFIX").ok(),
                 Some(std::process::id()));
        }
    }
}

// the global dirs of the application, which are invariant after init
static ROOT_DIR: OnceLock<PathBuf> = OnceLock::new();
static CACHE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// the global root dir: `$FIELDCLASS_ROOT` or `~/.fieldclass` (or the system temp dir if there is no HOME,
/// which is the case for AWS Lambda containers)
pub fn root_dir()->&'static PathBuf {
    ROOT_DIR.get_or_init(|| ensure_existing_path( get_root_dir()))
}

/// the global cache dir: `<root>/cache`
pub fn cache_dir()->&'static PathBuf {
    CACHE_DIR.get_or_init(|| ensure_existing_path( root_dir().join("cache")))
}

/// the crate cache dir of the caller: `<root>/cache/<crate>`
/// This is a macro so that it uses the crate name of the caller source
#[macro_export]
macro_rules! pkg_cache_dir {
    () => {
        fieldclass_build::ensure_existing_path( fieldclass_build::cache_dir().join( env!("CARGO_PKG_NAME")))
    }
}

fn get_root_dir()->PathBuf {
    if let Ok(root) = env::var(ROOT_ENV) {
        PathBuf::from(root)
    } else if let Ok(home) = env::var("HOME") {
        Path::new(&home).join(".fieldclass")
    } else {
        env::temp_dir().join("fieldclass")
    }
}

/// Note - this panics if the directory does not exist and can't be created
pub fn ensure_existing_path<P> (path: P)->P where P: AsRef<Path> {
    let p = path.as_ref();
    if !p.is_dir() {
        fs::create_dir_all(p).expect(&format!("failed to create {:?}", p));
    }
    path
}

/* #endregion bin globals */

pub fn file_contents_as_bytes (path: impl AsRef<Path>) -> Result<Vec<u8>> {
    Ok( fs::read(path)? )
}
