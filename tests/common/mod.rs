#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{ready, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use futures::FutureExt;
use serde_json::Value;

use fleet_dashboard::config::AppConfig;
use fleet_dashboard::runtime::Runtime;
use fleet_dashboard::services::{ApiError, HttpRequest, HttpResponse, HttpTransport, Method};
use fleet_dashboard::App;

pub const BASE_URL: &str = "http://api.test/api/v1";

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ----------------------------------------------------------------------------
// Transport con respuestas programadas por (método, ruta)
// ----------------------------------------------------------------------------

enum Reply {
    Respond(HttpResponse),
    Fail(ApiError),
    Held(oneshot::Receiver<HttpResponse>),
}

#[derive(Default)]
struct Slot {
    replies: VecDeque<Reply>,
    /// La única respuesta restante ya se sirvió al menos una vez
    last_served: bool,
}

#[derive(Default)]
pub struct MockTransport {
    script: RefCell<HashMap<(Method, String), Slot>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// La última respuesta programada para una ruta se repite
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, Reply::Respond(HttpResponse::new(status, body.to_string())));
    }

    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(method, path, Reply::Respond(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, method: Method, path: &str, error: ApiError) {
        self.push(method, path, Reply::Fail(error));
    }

    /// Respuesta que queda pendiente hasta que el test la libera
    pub fn hold(&self, method: Method, path: &str) -> oneshot::Sender<HttpResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Reply::Held(rx));
        tx
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<HttpRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && path_of(&r.url) == path)
            .cloned()
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    /// Una respuesta nueva reemplaza a la fija que ya se haya servido
    fn push(&self, method: Method, path: &str, reply: Reply) {
        let mut script = self.script.borrow_mut();
        let slot = script.entry((method, path.to_string())).or_default();
        if slot.last_served {
            slot.replies.clear();
            slot.last_served = false;
        }
        slot.replies.push_back(reply);
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Reply> {
        let mut script = self.script.borrow_mut();
        let slot = script.get_mut(&(method, path.to_string()))?;
        if slot.replies.len() > 1 {
            return slot.replies.pop_front();
        }
        let reply = match slot.replies.front()? {
            Reply::Respond(response) => Reply::Respond(response.clone()),
            Reply::Fail(error) => Reply::Fail(error.clone()),
            Reply::Held(_) => return slot.replies.pop_front(),
        };
        slot.last_served = true;
        Some(reply)
    }
}

/// Ruta relativa a la base, query incluida ("/jobs?status=draft")
fn path_of(url: &str) -> String {
    url.trim_start_matches(BASE_URL).to_string()
}

impl HttpTransport for MockTransport {
    fn execute(&self, request: HttpRequest) -> LocalBoxFuture<'_, Result<HttpResponse, ApiError>> {
        let path = path_of(&request.url);
        let method = request.method;
        self.requests.borrow_mut().push(request);

        match self.next_reply(method, &path) {
            Some(Reply::Respond(response)) => ready(Ok(response)).boxed_local(),
            Some(Reply::Fail(error)) => ready(Err(error)).boxed_local(),
            Some(Reply::Held(rx)) => async move {
                rx.await
                    .map_err(|_| ApiError::Network("request dropped".to_string()))
            }
            .boxed_local(),
            None => ready(Ok(HttpResponse::new(
                404,
                format!(r#"{{"detail":"no reply for {} {}"}}"#, method.as_str(), path),
            )))
            .boxed_local(),
        }
    }
}

// ----------------------------------------------------------------------------
// Runtime sobre LocalPool con timers manuales o instantáneos
// ----------------------------------------------------------------------------

pub struct TestRuntime {
    spawner: LocalSpawner,
    today: NaiveDate,
    manual_timers: bool,
    timers: RefCell<Vec<oneshot::Sender<()>>>,
    sleeps: Cell<usize>,
}

impl TestRuntime {
    pub fn new(spawner: LocalSpawner, today: NaiveDate, manual_timers: bool) -> Rc<Self> {
        Rc::new(Self {
            spawner,
            today,
            manual_timers,
            timers: RefCell::new(Vec::new()),
            sleeps: Cell::new(0),
        })
    }

    /// Dispara todos los timers vivos; devuelve cuántos
    pub fn fire_timers(&self) -> usize {
        let timers: Vec<_> = self.timers.borrow_mut().drain(..).collect();
        timers
            .into_iter()
            .filter(|tx| !tx.is_canceled())
            .map(|tx| tx.send(()))
            .filter(Result::is_ok)
            .count()
    }

    /// Timers cuya tarea sigue viva
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().iter().filter(|tx| !tx.is_canceled()).count()
    }

    pub fn total_sleeps(&self) -> usize {
        self.sleeps.get()
    }
}

impl Runtime for TestRuntime {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).unwrap();
    }

    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        self.sleeps.set(self.sleeps.get() + 1);
        if !self.manual_timers {
            return ready(()).boxed_local();
        }
        let (tx, rx) = oneshot::channel();
        self.timers.borrow_mut().push(tx);
        async move {
            let _ = rx.await;
        }
        .boxed_local()
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

// ----------------------------------------------------------------------------
// App completa sobre los dobles
// ----------------------------------------------------------------------------

pub struct Harness {
    pub pool: LocalPool,
    pub transport: Rc<MockTransport>,
    pub runtime: Rc<TestRuntime>,
    pub app: App,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.backend_url_development = BASE_URL.to_string();
    config.environment = "development".to_string();
    config
}

pub fn harness(today: &str, manual_timers: bool) -> Harness {
    harness_with_config(today, manual_timers, test_config())
}

pub fn harness_with_config(today: &str, manual_timers: bool, config: AppConfig) -> Harness {
    let pool = LocalPool::new();
    let transport = MockTransport::new();
    let runtime = TestRuntime::new(pool.spawner(), date(today), manual_timers);
    let app = App::new(config, transport.clone(), runtime.clone());
    app.auth.sign_in("test-token", Some("tenant-1".to_string()), Some("Ana".to_string()));
    Harness {
        pool,
        transport,
        runtime,
        app,
    }
}

impl Harness {
    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }
}

pub fn job_json(id: &str, status: &str, scheduled_date: Option<&str>) -> Value {
    serde_json::json!({
        "id": id,
        "status": status,
        "scheduled_date": scheduled_date,
        "address": format!("{} Main St", id),
        "location": { "lat": 48.85, "lng": 2.35 },
    })
}
