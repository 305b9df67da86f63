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

//! a minimal task queue abstraction to fan out many independent invocations of the same async function
//! (e.g. one field classification per input geometry) and to collect results in completion order.
//!
//! Each task goes through `Pending -> Running -> Succeeded | Failed`. There are no automatic retries - failed
//! tasks are reported to the caller, who can explicitly re-submit them with `rerun_failed(..)`.
//!
//! [`TaskPool`] is the in-process implementation, using tokio tasks that are throttled by a semaphore.
//! Completions are signalled through a kanal channel, which means there should only be one collector
//! (caller of `await_any(..)`) per pool at any time.

use std::{fmt::{self,Debug,Display}, future::Future, sync::{Arc, atomic::{AtomicU64,Ordering}}};
use async_trait::async_trait;
use dashmap::DashMap;
use futures::future::BoxFuture;
use kanal::{AsyncReceiver,AsyncSender};
use tokio::sync::Semaphore;
use tracing::{debug,warn};

mod errors;
pub use errors::*;

pub type TaskId = u64;

/// opaque reference to a submitted task
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct TaskHandle(TaskId);

impl TaskHandle {
    pub fn id (&self)->TaskId { self.0 }
}

impl Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed
}

impl TaskStatus {
    pub fn is_done (&self)->bool {
        matches!( self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

pub type TaskResult<T,E> = std::result::Result<T,TaskError<E>>;

/// the collected outcome of a number of tasks, in completion order
#[derive(Debug)]
pub struct TaskOutcomes<T,E> {
    pub succeeded: Vec<(TaskHandle,T)>,
    pub failed: Vec<(TaskHandle,TaskError<E>)>,
}

impl<T,E> TaskOutcomes<T,E> {
    pub fn new ()->Self { TaskOutcomes { succeeded: Vec::new(), failed: Vec::new() } }

    pub fn failed_handles (&self)->Vec<TaskHandle> {
        self.failed.iter().map( |(h,_)| *h).collect()
    }

    pub fn len (&self)->usize { self.succeeded.len() + self.failed.len() }
}

/// the generic task queue interface. Implementations can be in-process pools or clients of remote queues
#[async_trait]
pub trait TaskQueue<A,T,E>: Send + Sync where A: Send + 'static, T: Send + 'static, E: Send + 'static {

    /// submit a new task for the given arguments
    fn submit (&self, args: A)->TaskHandle;

    /// wait for the next of the given tasks to complete and return its result. Each result is only returned
    /// once. Returns `None` if all given tasks have already been reported
    async fn await_any (&self, handles: &[TaskHandle])->Option<(TaskHandle,TaskResult<T,E>)>;

    /// the subset of given tasks that have failed
    fn failed (&self, handles: &[TaskHandle])->Vec<TaskHandle>;

    /// re-submit the failed subset of the given tasks with their original arguments
    fn rerun_failed (&self, handles: &[TaskHandle])->Vec<TaskHandle>;

    fn status (&self, handle: &TaskHandle)->Option<TaskStatus>;

    fn map<I> (&self, args: I)->Vec<TaskHandle> where I: IntoIterator<Item=A> + Send, Self: Sized {
        args.into_iter().map( |a| self.submit(a)).collect()
    }

    /// collect all results of the given tasks as they complete
    async fn collect (&self, handles: &[TaskHandle])->TaskOutcomes<T,E> {
        let mut outcomes = TaskOutcomes::new();
        while let Some((handle,res)) = self.await_any(handles).await {
            match res {
                Ok(t) => outcomes.succeeded.push( (handle,t)),
                Err(e) => outcomes.failed.push( (handle,e))
            }
        }
        outcomes
    }
}

type TaskFn<A,T,E> = Arc<dyn Fn(A)->BoxFuture<'static,Result<T,E>> + Send + Sync>;

struct TaskEntry<A,T,E> {
    args: A,
    status: TaskStatus,
    result: Option<TaskResult<T,E>>,
    error: Option<String>,
    reported: bool,
}

/// in-process [`TaskQueue`] that runs a fixed async function as tokio tasks, with at most `max_concurrent`
/// running at the same time. Has to be used from within a tokio runtime
pub struct TaskPool<A,T,E> {
    name: String,
    func: TaskFn<A,T,E>,
    permits: Arc<Semaphore>,
    entries: Arc<DashMap<TaskId,TaskEntry<A,T,E>>>,
    next_id: AtomicU64,
    tx: AsyncSender<TaskId>,
    rx: AsyncReceiver<TaskId>,
}

impl<A,T,E> TaskPool<A,T,E>
    where A: Clone + Send + Sync + 'static, T: Send + Sync + 'static, E: Display + Send + Sync + 'static
{
    pub fn new<F,Fut> (name: impl ToString, max_concurrent: usize, func: F)->Self
        where F: Fn(A)->Fut + Send + Sync + 'static, Fut: Future<Output=Result<T,E>> + Send + 'static
    {
        let func: TaskFn<A,T,E> = Arc::new( move |args: A| -> BoxFuture<'static,Result<T,E>> { Box::pin( func(args)) });
        let (tx,rx) = kanal::unbounded_async();

        TaskPool {
            name: name.to_string(),
            func,
            permits: Arc::new( Semaphore::new( max_concurrent.max(1))),
            entries: Arc::new( DashMap::new()),
            next_id: AtomicU64::new(0),
            tx, rx
        }
    }

    pub fn name (&self)->&str { self.name.as_str() }

    /// the original arguments of a task
    pub fn args (&self, handle: &TaskHandle)->Option<A> {
        self.entries.get( &handle.0).map( |e| e.args.clone())
    }

    /// the error message of a failed task
    pub fn error (&self, handle: &TaskHandle)->Option<String> {
        self.entries.get( &handle.0).and_then( |e| e.error.clone())
    }

    /// number of submitted tasks that are not done yet
    pub fn n_active (&self)->usize {
        self.entries.iter().filter( |e| !e.status.is_done()).count()
    }

    fn spawn_task (&self, id: TaskId, args: A) {
        let func = self.func.clone();
        let permits = self.permits.clone();
        let entries = self.entries.clone();
        let tx = self.tx.clone();

        tokio::spawn( async move {
            // the semaphore is never closed so this can't fail
            let _permit = permits.acquire_owned().await;
            if let Some(mut e) = entries.get_mut(&id) { e.status = TaskStatus::Running }

            // run in its own task so that we can report panics as failures
            let res = match tokio::spawn( func(args)).await {
                Ok(Ok(t)) => Ok(t),
                Ok(Err(e)) => Err( TaskError::Failed(e)),
                Err(join_err) => Err( TaskError::Panicked( join_err.to_string()))
            };

            if let Some(mut e) = entries.get_mut(&id) {
                match &res {
                    Ok(_) => e.status = TaskStatus::Succeeded,
                    Err(err) => {
                        debug!("task {id} failed: {err}");
                        e.status = TaskStatus::Failed;
                        e.error = Some( err.to_string());
                    }
                }
                e.result = Some(res);
            }

            if tx.send(id).await.is_err() {
                warn!("completion channel closed for task {id}");
            }
        });
    }
}

#[async_trait]
impl<A,T,E> TaskQueue<A,T,E> for TaskPool<A,T,E>
    where A: Clone + Send + Sync + 'static, T: Send + Sync + 'static, E: Display + Send + Sync + 'static
{
    fn submit (&self, args: A)->TaskHandle {
        let id = self.next_id.fetch_add( 1, Ordering::Relaxed);
        self.entries.insert( id, TaskEntry { args: args.clone(), status: TaskStatus::Pending, result: None, error: None, reported: false });
        self.spawn_task( id, args);
        TaskHandle(id)
    }

    async fn await_any (&self, handles: &[TaskHandle])->Option<(TaskHandle,TaskResult<T,E>)> {
        loop {
            let mut has_unreported = false;

            for handle in handles {
                if let Some(mut e) = self.entries.get_mut( &handle.0) {
                    if let Some(res) = e.result.take() {
                        e.reported = true;
                        return Some( (*handle, res))
                    }
                    if !e.reported { has_unreported = true }
                }
            }

            if !has_unreported { return None }

            // wait for the next completion signal. Signals of tasks we have already reported are just stale wakeups
            if self.rx.recv().await.is_err() { return None }
        }
    }

    fn failed (&self, handles: &[TaskHandle])->Vec<TaskHandle> {
        handles.iter()
            .filter( |h| self.entries.get( &h.0).map( |e| e.status == TaskStatus::Failed).unwrap_or(false))
            .copied()
            .collect()
    }

    fn rerun_failed (&self, handles: &[TaskHandle])->Vec<TaskHandle> {
        self.failed(handles).iter()
            .filter_map( |h| self.args(h))
            .map( |args| self.submit(args))
            .collect()
    }

    fn status (&self, handle: &TaskHandle)->Option<TaskStatus> {
        self.entries.get( &handle.0).map( |e| e.status)
    }
}
