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

use std::{env, path::{Path,PathBuf}};
use crate::*;

pub const CONFIGS: &'static str = "configs";

/// locate a config file and return its PathBuf. Lookup order is
///   1. `<root>/configs/<bin_crate>/<bin_name>/<resource_crate>/<filename>` (bin specific override)
///   2. `<root>/configs/<resource_crate>/<filename>`
///   3. `<manifest_dir>/configs/<filename>` (the in-repo default of the resource crate)
pub fn find_config_file (ctx: &Option<&BinContext>, resource_crate: &str, manifest_dir: &str, filename: &str) -> Option<PathBuf> {
    let root = root_dir().join(CONFIGS);

    if let Some(ctx) = ctx {
        let path = root.join(&ctx.bin_crate).join(&ctx.bin_name).join(resource_crate).join(filename);
        if path.is_file() { return Some(path) }
    }

    let path = root.join(resource_crate).join(filename);
    if path.is_file() { return Some(path) }

    let path = Path::new(manifest_dir).join(CONFIGS).join(filename);
    if path.is_file() { return Some(path) }

    None
}

/// this is mostly for tools that get explicit config paths from the command line
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> serde::Deserialize<'a>, P: AsRef<Path> {
    let data = file_contents_as_bytes(path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// this is the main macro that needs to be expanded at the top of crates (lib.rs) that define configs.
/// Config users call the defined `load_config(..)` function to instantiate config structs
#[macro_export]
macro_rules! define_load_config {
    () => {
        mod configs {
            /// load config using fieldclass_build - based lookup mechanism
            pub fn load_config<C> (filename: &str) -> fieldclass_build::Result<C> where C: for <'a> serde::Deserialize<'a> {
                let bin_ctx = fieldclass_build::BIN_CONTEXT.get();
                let resource_crate = env!("CARGO_PKG_NAME");
                let manifest_dir = env!("CARGO_MANIFEST_DIR");

                if let Some(path) = fieldclass_build::find_config_file( &bin_ctx, resource_crate, manifest_dir, filename) {
                    fieldclass_build::load_config_path(&path)
                } else {
                    Err( fieldclass_build::FieldClassBuildError::ResourceNotFoundError(filename.to_string()) )
                }
            }
        }
        pub use configs::*; // make load_config() visible at the crate level
    }
}
