//! Owned handles for spawned background tasks

use tokio::task::JoinHandle;

/// Join handle that aborts its task when dropped
///
/// Tick sources and demo drivers are owned through this so that dropping the
/// owner can never leave a periodic callback running behind it.
#[derive(Debug)]
pub struct TaskHandle(JoinHandle<()>);

impl TaskHandle {
    pub fn spawn<F>(future: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        Self(tokio::spawn(future))
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}
