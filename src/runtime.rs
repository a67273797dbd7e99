// ============================================================================
// RUNTIME - spawn / sleep / fecha actual
// ============================================================================
// Todo corre en un único hilo (event loop del navegador), por eso las tareas
// son `LocalBoxFuture` sin `Send`.
// ============================================================================

use std::time::Duration;

use chrono::NaiveDate;
use futures::future::LocalBoxFuture;

pub trait Runtime {
    /// Lanza una tarea en el event loop actual
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);

    /// Future que se resuelve tras `duration`
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;

    /// Fecha local de hoy
    fn today(&self) -> NaiveDate;
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserRuntime;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::*;
    use futures::FutureExt;

    #[derive(Clone, Copy, Default)]
    pub struct BrowserRuntime;

    impl Runtime for BrowserRuntime {
        fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
            wasm_bindgen_futures::spawn_local(task);
        }

        fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
            gloo_timers::future::sleep(duration).boxed_local()
        }

        fn today(&self) -> NaiveDate {
            chrono::Local::now().date_naive()
        }
    }
}
