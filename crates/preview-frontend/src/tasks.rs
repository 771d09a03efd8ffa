//! Runs the app's local futures
//!
//! Native drains a `LocalPool` once per frame; the browser drives futures
//! itself through `spawn_local`. Either way a settled task asks for a repaint.

use std::future::Future;

#[cfg(not(target_arch = "wasm32"))]
use futures::executor::LocalPool;
#[cfg(not(target_arch = "wasm32"))]
use futures::task::LocalSpawnExt;

pub struct TaskRunner {
    ctx: egui::Context,
    #[cfg(not(target_arch = "wasm32"))]
    pool: LocalPool,
}

impl TaskRunner {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            #[cfg(not(target_arch = "wasm32"))]
            pool: LocalPool::new(),
        }
    }

    /// Start `task`; the UI is repainted once it finishes
    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        let ctx = self.ctx.clone();
        let task = async move {
            task.await;
            ctx.request_repaint();
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Err(e) = self.pool.spawner().spawn_local(task) {
                tracing::error!("Failed to spawn task: {}", e);
            }
            self.ctx.request_repaint();
        }

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(task);
    }

    /// Advance every task that can make progress without blocking
    pub fn poll(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        self.pool.run_until_stalled();
    }
}
