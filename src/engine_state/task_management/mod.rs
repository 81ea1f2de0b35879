//! # Task Management System
//!
//! This module provides the worker pool that generates and meshes chunks off the
//! owning thread.
//!
//! ## Architecture Overview
//!
//! The task management system consists of several key components:
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, which can spawn additional tasks
//! - `TaskChannel`: Communication channel between the owning thread and one worker
//! - `TaskContext`: The state results are applied to, owned by the manager
//!
//! ## Workers
//! - Uses `std::thread` for true multi-threading, one named thread per worker
//! - Each worker has a dedicated pair of `mpsc` channels for tasks and results
//! - A manager created with zero workers (or whose workers all died) runs tasks
//!   inline on the owning thread
//! - When a worker dies, the task it was processing is lost and logged; tasks
//!   already sent to it that had not started are requeued
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send back results
//! 4. Results are applied on the owning thread in `process_completed_tasks()`
//! 5. Results can spawn new tasks
//! 6. `run_until_idle()` repeats the cycle until no work is queued or in flight,
//!    which makes it usable as a barrier between pipeline stages
//!
//! ## Example Usage
//! ```rust
//! use voxel_world::core::MtResource;
//! use voxel_world::engine_state::{
//!     rendering::meshing::ChunkMesher,
//!     task_management::{task::TaskContext, TaskManager},
//!     voxels::{tasks::chunk_generation_task::ChunkGenerationTask, terrain::TerrainGenerator, world::World},
//! };
//!
//! let world = MtResource::new(World::new(TerrainGenerator::default()));
//! let context = TaskContext::new(world.clone(), ChunkMesher::new(), true);
//! let mut task_manager = TaskManager::new(2, context);
//!
//! task_manager.publish_task(Box::new(ChunkGenerationTask::new(TerrainGenerator::default(), 0, 0)));
//! task_manager.run_until_idle();
//! assert_eq!(world.get().chunk_count(), 1);
//! ```

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};
use web_time::Instant;

use task::{Task, TaskContext, TaskResult};

/// A communication channel between the owning thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from the owning thread to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `in_flight`: Tasks sent to the worker whose results have not arrived, oldest first
/// - `disconnected`: Set once the worker is known to be gone
/// - `_worker`: Handle to the worker thread
pub struct TaskChannel {
    task_sender: Sender<SharedTask>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    in_flight: VecDeque<SharedTask>,
    disconnected: bool,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Collecting results and applying them to its [`TaskContext`]
/// - Queuing tasks when all workers are busy
/// - Dropping workers that died and falling back to inline execution
///
/// Workers exit when the manager is dropped and their task channel closes.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<SharedTask>,
    current_channel: usize,
    context: TaskContext,
    /// Results handled while retiring dead channels, not yet reported
    drained_results: usize,
}

/// A task as held by the manager. The channel keeps a second handle until the
/// result arrives, so a task a dead worker never started can be sent elsewhere.
type SharedTask = Arc<dyn Task + Send>;

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Keeping this small leaves the rest of the work in the shared queue, where any
/// worker that frees up can pick it.
pub const MAX_TASKS_IN_FLIGHT: usize = 2;

/// Resolves a configured worker count, where `0` means one worker per available core.
pub fn resolve_worker_count(requested: usize) -> usize {
    if requested > 0 {
        return requested;
    }

    thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(1)
}

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create; `0` runs every task inline
    /// * `context` - State that task results are applied to
    ///
    /// A worker thread that cannot be spawned is logged and left out of the pool.
    pub fn new(num_workers: usize, context: TaskContext) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for worker_index in 0..num_workers {
            let (task_tx, task_rx) = channel::<SharedTask>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let spawned = thread::Builder::new()
                .name(format!("task-worker-{worker_index}"))
                .spawn(task_closure);

            match spawned {
                Ok(worker) => channels.push(TaskChannel {
                    task_sender: task_tx,
                    result_receiver: result_rx,
                    in_flight: VecDeque::with_capacity(MAX_TASKS_IN_FLIGHT),
                    disconnected: false,
                    _worker: worker,
                }),
                Err(error) => warn!("Failed to spawn task worker {}: {}", worker_index, error),
            }
        }

        info!(
            "Started {} task workers (available parallelism: {:?})",
            channels.len(),
            thread::available_parallelism()
        );

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
            context,
            drained_results: 0,
        }
    }

    /// The state task results are applied to.
    pub fn context(&self) -> &TaskContext {
        &self.context
    }

    /// Mutable access to the state task results are applied to.
    pub fn context_mut(&mut self) -> &mut TaskContext {
        &mut self.context
    }

    /// Number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Tasks waiting for a free worker.
    pub fn queued_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Tasks sent to workers whose results have not been handled yet.
    pub fn in_flight_count(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.in_flight.len())
            .sum()
    }

    /// `true` when no task is queued or being processed.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.in_flight_count() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the worker has disconnected, handing the task back for requeueing
    fn try_send_task(&mut self, task: SharedTask, channel_idx: usize) -> Result<(), SharedTask> {
        let channel = &mut self.channels[channel_idx];
        match channel.task_sender.send(task.clone()) {
            Ok(_) => {
                channel.in_flight.push_back(task);
                Ok(())
            }
            Err(_) => {
                warn!("Task worker {} disconnected; requeueing task", channel_idx);
                self.drain_dead_channel(channel_idx);
                Err(task)
            }
        }
    }

    /// Collects the results a dead worker delivered before it died, then retires
    /// its channel.
    fn drain_dead_channel(&mut self, channel_idx: usize) {
        let mut follow_ups = Vec::new();
        let channel = &mut self.channels[channel_idx];

        while let Ok(result) = channel.result_receiver.recv() {
            channel.in_flight.pop_front();
            follow_ups.extend(result.handle_result(&mut self.context));
            self.drained_results += 1;
        }

        Self::mark_disconnected(channel, channel_idx, &mut self.queued_tasks);
        self.queued_tasks
            .extend(follow_ups.into_iter().map(SharedTask::from));
    }

    /// Finds an available worker channel that can accept a new task.
    ///
    /// This implements a round-robin scheduling strategy starting from the last
    /// used channel to ensure even distribution of tasks across all workers.
    /// Channels that have reached their maximum number of in-flight tasks, or whose
    /// worker is gone, are skipped.
    fn find_available_channel(&self) -> Option<usize> {
        let channel_count = self.channels.len();
        (0..channel_count)
            .map(|offset| (self.current_channel + offset) % channel_count)
            .find(|&index| {
                let channel = &self.channels[index];
                !channel.disconnected && channel.in_flight.len() < MAX_TASKS_IN_FLIGHT
            })
    }

    /// Publishes a new task for execution.
    ///
    /// The task is sent to an available worker right away, or queued if all
    /// workers are busy.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on a worker
    /// - `false` if the task was queued
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        let task = SharedTask::from(task);
        let Some(channel_idx) = self.find_available_channel() else {
            self.queued_tasks.push_back(task);
            return false;
        };

        match self.try_send_task(task, channel_idx) {
            Ok(_) => {
                self.current_channel = (channel_idx + 1) % self.channels.len();
                true
            }
            Err(task) => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Sends queued tasks to workers while any worker has room.
    ///
    /// Tasks are dispatched in FIFO order (oldest first). A task whose worker
    /// turns out to be disconnected goes back to the front of the queue.
    pub fn process_queued_tasks(&mut self) {
        self.prune_disconnected_channels();

        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };

            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    self.queued_tasks.push_front(task);
                    self.prune_disconnected_channels();
                }
            }
        }
    }

    /// Applies every result the workers have finished so far, without blocking.
    ///
    /// Follow-up tasks returned by the results are published afterwards.
    ///
    /// # Returns
    /// The number of results handled.
    pub fn process_completed_tasks(&mut self) -> usize {
        let mut handled = std::mem::take(&mut self.drained_results);
        let mut tasks_to_queue = Vec::new();

        for (channel_idx, channel) in self.channels.iter_mut().enumerate() {
            loop {
                match channel.result_receiver.try_recv() {
                    Ok(result) => {
                        channel.in_flight.pop_front();
                        tasks_to_queue.extend(result.handle_result(&mut self.context));
                        handled += 1;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        Self::mark_disconnected(channel, channel_idx, &mut self.queued_tasks);
                        break;
                    }
                }
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }

        handled
    }

    /// Runs tasks until nothing is queued or in flight.
    ///
    /// Blocks the calling thread while workers are busy. Follow-up tasks spawned
    /// by results are run too, so when this returns every consequence of the work
    /// published so far has been applied to the context.
    ///
    /// # Returns
    /// The number of results handled.
    pub fn run_until_idle(&mut self) -> usize {
        let start = Instant::now();
        let mut handled = 0;

        loop {
            self.process_queued_tasks();
            handled += self.process_completed_tasks();

            if self.channels.is_empty() {
                if self.queued_tasks.is_empty() {
                    break;
                }
                handled += self.run_queued_inline();
                continue;
            }

            if self.is_idle() {
                break;
            }
            handled += self.wait_for_result();
        }

        debug!(
            "Task manager idle after handling {} results in {:?}",
            handled,
            start.elapsed()
        );
        handled
    }

    /// Blocks on the first busy worker until it delivers a result or disconnects.
    fn wait_for_result(&mut self) -> usize {
        let Some(channel_idx) = self
            .channels
            .iter()
            .position(|channel| !channel.in_flight.is_empty())
        else {
            return 0;
        };

        let channel = &mut self.channels[channel_idx];
        match channel.result_receiver.recv() {
            Ok(result) => {
                channel.in_flight.pop_front();
                let follow_ups = result.handle_result(&mut self.context);
                for task in follow_ups {
                    self.publish_task(task);
                }
                1
            }
            Err(_) => {
                Self::mark_disconnected(channel, channel_idx, &mut self.queued_tasks);
                self.prune_disconnected_channels();
                0
            }
        }
    }

    /// Processes every queued task on the calling thread.
    fn run_queued_inline(&mut self) -> usize {
        debug!("Running {} queued tasks inline", self.queued_tasks.len());

        let mut handled = 0;
        while let Some(task) = self.queued_tasks.pop_front() {
            let result = task.process();
            let follow_ups = result.handle_result(&mut self.context);
            self.queued_tasks
                .extend(follow_ups.into_iter().map(SharedTask::from));
            handled += 1;
        }
        handled
    }

    /// Retires a channel whose worker is gone.
    ///
    /// Results arrive in dispatch order and every delivered result has been
    /// received before the disconnect is observed, so the oldest task still in
    /// flight is the one the worker died on. It is dropped; the tasks behind it
    /// never started and go back to the front of the queue in their original order.
    fn mark_disconnected(
        channel: &mut TaskChannel,
        channel_idx: usize,
        queued_tasks: &mut VecDeque<SharedTask>,
    ) {
        channel.disconnected = true;

        if channel.in_flight.pop_front().is_some() {
            warn!("Task worker {} died while processing a task; the task is lost", channel_idx);
        }
        if !channel.in_flight.is_empty() {
            warn!(
                "Requeueing {} unstarted tasks from task worker {}",
                channel.in_flight.len(),
                channel_idx
            );
        }
        while let Some(task) = channel.in_flight.pop_back() {
            queued_tasks.push_front(task);
        }
    }

    fn prune_disconnected_channels(&mut self) {
        let before = self.channels.len();
        self.channels.retain(|channel| !channel.disconnected);

        if self.channels.len() != before {
            warn!(
                "Dropped {} disconnected task workers, {} remaining",
                before - self.channels.len(),
                self.channels.len()
            );
            self.current_channel = 0;
        }
    }
}
