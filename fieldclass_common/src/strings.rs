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

use std::env;
use regex::{Regex,Captures};
use lazy_static::lazy_static;

lazy_static! {
    static ref ENV_VAR_RE: Regex = Regex::new( r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
}

/// expand `${VAR}` references with the values of respective environment variables. References to
/// undefined variables are left as they are so that they show up in error messages
pub fn env_expand (s: &str)->String {
    ENV_VAR_RE.replace_all( s, |caps: &Captures| {
        env::var(&caps[1]).unwrap_or_else( |_| caps[0].to_string())
    }).into_owned()
}

/// `true` if the string still contains unexpanded `${VAR}` references
pub fn has_env_refs (s: &str)->bool {
    ENV_VAR_RE.is_match(s)
}
