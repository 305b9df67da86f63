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

use thiserror::Error;

/// the error of a single task, which is either the error returned by the task function or a panic
#[derive(Error,Debug,Clone)]
pub enum TaskError<E> {
    #[error("task failed: {0}")]
    Failed(E),

    #[error("task panicked: {0}")]
    Panicked(String),
}

impl<E> TaskError<E> {
    /// the error returned by the task function, if it did not panic
    pub fn source_error (&self)->Option<&E> {
        match self {
            TaskError::Failed(e) => Some(e),
            TaskError::Panicked(_) => None
        }
    }
}
