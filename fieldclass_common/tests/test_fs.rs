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

use fieldclass_common::{fs::*, strings::*};

#[test]
fn test_atomic_write() {
    let dir = tempfile::tempdir().unwrap();
    let sub_dir = dir.path().join("models");

    let path = set_filepath_contents_atomic( &sub_dir, "classifier.json", b"{}").unwrap();
    assert_eq!( path, sub_dir.join("classifier.json"));
    assert!( is_non_empty_file(&path));
    assert_eq!( filepath_contents(&path).unwrap(), b"{}");

    // only the target file, no temp leftovers
    assert_eq!( std::fs::read_dir(&sub_dir).unwrap().count(), 1);
}

#[test]
fn test_env_expand() {
    unsafe { std::env::set_var("FIELDCLASS_TEST_BUCKET", "my-models"); }

    assert_eq!( env_expand("s3://${FIELDCLASS_TEST_BUCKET}/x"), "s3://my-models/x");
    assert_eq!( env_expand("${FIELDCLASS_TEST_UNDEFINED_VAR}"), "${FIELDCLASS_TEST_UNDEFINED_VAR}");
    assert!( has_env_refs( &env_expand("${FIELDCLASS_TEST_UNDEFINED_VAR}")));
    assert!( !has_env_refs("plain"));
}
