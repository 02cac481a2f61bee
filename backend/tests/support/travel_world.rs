//! Server harness and shared world for travel API behaviour tests.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The `WorldFixture` stops the server
//! even if a step panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::Method;
use actix_web::{App, HttpServer, web};
use argon2::Params;
use awc::Client;
use chrono::Duration;
use mockable::DefaultClock;
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use travel_backend::Trace;
use travel_backend::inbound::http::configure;
use travel_backend::inbound::http::state::HttpState;
use travel_backend::outbound::memory::InMemoryStore;
use travel_backend::outbound::security::{Argon2Hasher, JwtTokenService};

pub(crate) const PASSWORD: &str = "correct horse";

pub(crate) struct TravelWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) traveller: Option<String>,
    pub(crate) stranger: Option<String>,
    pub(crate) trip_id: Option<String>,
    pub(crate) second_trip_id: Option<String>,
    pub(crate) activity_id: Option<String>,
    pub(crate) reminder_id: Option<String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
}

pub(crate) type SharedWorld = Rc<RefCell<TravelWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

pub(crate) fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it; the future must
    // not borrow the world again.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

/// Send a JSON request and return the status with the decoded envelope.
pub(crate) fn send(
    world: &SharedWorld,
    method: Method,
    path: &str,
    bearer: Option<String>,
    payload: Option<Value>,
) -> (u16, Value) {
    let label = format!("{method} {path}");
    let path = path.to_owned();
    with_world_async(world, |base_url| async move {
        let mut request = Client::default().request(method, format!("{base_url}{path}"));
        if let Some(bearer) = bearer {
            request = request.insert_header(("Authorization", bearer));
        }
        let mut response = match payload {
            Some(payload) => request.send_json(&payload).await.expect(&label),
            None => request.send().await.expect(&label),
        };
        let status = response.status().as_u16();
        let body = response.body().await.expect(&label);
        let json: Value = serde_json::from_slice(&body).expect(&label);
        (status, json)
    })
}

/// Send a request and keep the outcome for `then` steps.
pub(crate) fn record(
    world: &SharedWorld,
    method: Method,
    path: &str,
    bearer: Option<String>,
    payload: Option<Value>,
) {
    let (status, body) = send(world, method, path, bearer, payload);
    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.last_body = Some(body);
}

/// Register an account, log in and return the bearer header value.
pub(crate) fn sign_up(world: &SharedWorld, email: &str) -> String {
    let (status, body) = send(
        world,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "name": "Traveller",
            "email": email,
            "password": PASSWORD,
            "confirmPassword": PASSWORD,
        })),
    );
    assert_eq!(status, 201, "{body}");
    let (status, body) = send(
        world,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    );
    assert_eq!(status, 200, "{body}");
    let token = body["data"]["token"].as_str().expect("token");
    format!("Bearer {token}")
}

/// Create a record and return its id.
pub(crate) fn create(world: &SharedWorld, path: &str, bearer: &str, payload: Value) -> String {
    let (status, body) = send(
        world,
        Method::POST,
        path,
        Some(bearer.to_owned()),
        Some(payload),
    );
    assert_eq!(status, 201, "{body}");
    body["data"]["id"].as_str().expect("created id").to_owned()
}

fn http_state() -> HttpState {
    let clock = Arc::new(DefaultClock);
    let params = Params::new(1024, 1, 1, None).expect("cheap argon2 params");
    let tokens = Arc::new(JwtTokenService::new(
        b"behaviour-secret",
        Duration::hours(1),
        clock.clone(),
    ));
    HttpState::new(
        InMemoryStore::new().repository_ports(),
        Arc::new(Argon2Hasher::with_params(params)),
        tokens,
        clock,
    )
}

async fn spawn_server(http_state: HttpState) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let http_data = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .wrap(Trace)
            .configure(configure)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

fn create_runtime_and_local() -> (Runtime, LocalSet) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    (runtime, LocalSet::new())
}

pub(crate) fn world() -> WorldFixture {
    let (runtime, local) = create_runtime_and_local();
    let (base_url, server) = local
        .block_on(&runtime, spawn_server(http_state()))
        .expect("server should start");
    WorldFixture {
        world: Rc::new(RefCell::new(TravelWorld {
            runtime,
            local,
            base_url,
            server,
            traveller: None,
            stranger: None,
            trip_id: None,
            second_trip_id: None,
            activity_id: None,
            reminder_id: None,
            last_status: None,
            last_body: None,
        })),
    }
}
