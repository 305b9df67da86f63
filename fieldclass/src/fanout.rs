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

//! fan-out of field classifications over a GeoJSON feature collection, using a [`TaskPool`]

use std::{collections::HashMap, path::Path, sync::Arc};
use geojson::{Feature, FeatureCollection, GeoJson, feature::Id};
use serde::{Serialize,Deserialize};
use serde_json::Value;
use tracing::{info,warn};

use fieldclass_common::{fs::filepath_contents_as_string, geometry::FieldGeometry};
use fieldclass_job::{TaskPool, TaskQueue, TaskHandle, TaskError, TaskOutcomes};
use crate::{FieldClassContext, FieldClass, FieldClassError, Result, get_field_class};

/// a single classification task
#[derive(Debug,Clone)]
pub struct FieldTask {
    pub fid: String,
    pub geometry: FieldGeometry,
}

/// the fid of a feature is its `fid` (or `id`) property or, if there is none, the feature id
fn feature_fid (feature: &Feature)->String {
    let prop = feature.property("fid").or_else( || feature.property("id"));
    match (prop, &feature.id) {
        (Some(Value::String(s)),_) => s.clone(),
        (Some(v),_) if !v.is_null() => v.to_string(),
        (_,Some(Id::String(s))) => s.clone(),
        (_,Some(Id::Number(n))) => n.to_string(),
        _ => String::new()
    }
}

/// turn features into tasks. Features without valid geometry are returned as invalid request errors
pub fn field_tasks (fc: FeatureCollection)->(Vec<FieldTask>,Vec<FieldClassError>) {
    let mut tasks = Vec::with_capacity( fc.features.len());
    let mut rejected = Vec::new();

    for feature in fc.features {
        let fid = feature_fid(&feature);
        match feature.geometry {
            Some(geometry) => match FieldGeometry::new(geometry) {
                Ok(geometry) => tasks.push( FieldTask { fid, geometry }),
                Err(e) => rejected.push( FieldClassError::for_request( &fid, e))
            }
            None => rejected.push( FieldClassError::invalid_request( &fid, "feature without geometry"))
        }
    }

    (tasks, rejected)
}

pub fn read_field_tasks (path: impl AsRef<Path>)->Result<(Vec<FieldTask>,Vec<FieldClassError>)> {
    let path = path.as_ref();
    let input = filepath_contents_as_string(&path)?;
    let fc = match input.parse::<GeoJson>() {
        Ok(GeoJson::FeatureCollection(fc)) => fc,
        Ok(GeoJson::Feature(f)) => FeatureCollection { bbox: None, features: vec![f], foreign_members: None },
        Ok(_) => return Err( FieldClassError::invalid_request( "", format!("{path:?} is not a feature collection"))),
        Err(e) => return Err( FieldClassError::invalid_request( "", format!("{path:?}: {e}")))
    };

    Ok( field_tasks(fc) )
}

pub type FieldClassPool = TaskPool<FieldTask,FieldClass,FieldClassError>;

/// a task pool that runs [`get_field_class`] for each submitted task
pub fn field_class_pool (ctx: Arc<FieldClassContext>, max_concurrent: usize)->FieldClassPool {
    TaskPool::new( "fieldclass", max_concurrent, move |task: FieldTask| {
        let ctx = ctx.clone();
        async move { get_field_class( &ctx, &task.geometry, &task.fid).await }
    })
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct FailedField {
    pub fid: String,
    pub error: String,
}

/// the collected results of a fan-out run (in completion order)
#[derive(Serialize,Deserialize,Debug,Clone,Default)]
pub struct FanoutReport {
    pub classified: Vec<FieldClass>,
    pub failed: Vec<FailedField>,
}

/// submit all tasks, collect their results as they complete and re-submit failed ones up to `max_reruns` times
pub async fn run_fanout<Q> (queue: &Q, tasks: Vec<FieldTask>, max_reruns: usize)->FanoutReport
    where Q: TaskQueue<FieldTask,FieldClass,FieldClassError>
{
    let n_tasks = tasks.len();
    let mut report = FanoutReport::default();
    let mut fids: HashMap<TaskHandle,String> = HashMap::with_capacity(n_tasks);

    let handles: Vec<TaskHandle> = tasks.into_iter().map( |t| {
        let fid = t.fid.clone();
        let h = queue.submit(t);
        fids.insert( h, fid);
        h
    }).collect();

    let mut outcomes = queue.collect( &handles).await;
    let mut round = 0;

    loop {
        report.classified.extend( outcomes.succeeded.into_iter().map( |(_,fc)| fc));
        let failed = outcomes.failed;

        if failed.is_empty() || round >= max_reruns {
            report.failed.extend( failed.into_iter().map( |(h,e)| failed_field( fids.get(&h), e)));
            break
        }

        round += 1;
        warn!("re-running {} failed tasks (round {round})", failed.len());

        // reruns are returned in the order of the failed handles
        let failed_handles: Vec<TaskHandle> = failed.iter().map( |(h,_)| *h).collect();
        let handles = queue.rerun_failed( &failed_handles);
        for (old,new) in failed_handles.iter().zip( handles.iter()) {
            if let Some(fid) = fids.get(old).cloned() { fids.insert( *new, fid); }
        }

        outcomes = queue.collect( &handles).await;
    }

    info!("{} of {} fields classified, {} failed", report.classified.len(), n_tasks, report.failed.len());
    report
}

fn failed_field (fid: Option<&String>, e: TaskError<FieldClassError>)->FailedField {
    let fid = fid.cloned().unwrap_or_default();
    match e {
        TaskError::Failed(e) => FailedField { fid, error: e.to_string() },
        TaskError::Panicked(msg) => FailedField { fid, error: format!("task panicked: {msg}") }
    }
}
