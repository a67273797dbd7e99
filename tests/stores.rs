mod common;

use std::cell::Cell;
use std::rc::Rc;

use futures::task::LocalSpawnExt;
use serde_json::json;

use common::{date, harness, job_json};
use fleet_dashboard::models::{DepotPayload, GeoPoint, JobPayload, JobStatus, VehiclePayload, VehicleType};
use fleet_dashboard::services::{ApiError, HttpResponse, Method};
use fleet_dashboard::state::NotificationLevel;
use fleet_dashboard::state::CollectionState;
use fleet_dashboard::stores::JobsState;

const DRAFTS: &str = "/jobs?status=draft";

fn drafts_body() -> serde_json::Value {
    json!([
        job_json("d1", "draft", Some("2024-01-20")),
        job_json("d2", "draft", Some("2024-01-10")),
        job_json("d3", "draft", Some("2024-01-10T09:00:00")),
    ])
}

#[test]
fn initialize_jobs_twice_issues_one_request() {
    let mut h = harness("2024-01-14", false);
    let release = h.transport.hold(Method::Get, "/jobs");

    let spawner = h.pool.spawner();
    for _ in 0..2 {
        let jobs = h.app.jobs.clone();
        spawner
            .spawn_local(async move { jobs.initialize_jobs().await })
            .unwrap();
    }
    h.run_until_stalled();

    assert_eq!(h.transport.count(Method::Get, "/jobs"), 1);
    assert!(h.app.jobs.snapshot().jobs.is_loading);

    release
        .send(HttpResponse::new(200, json!([job_json("j1", "assigned", None)]).to_string()))
        .unwrap();
    h.run_until_stalled();

    let state = h.app.jobs.snapshot();
    assert!(state.jobs.has_fetched);
    assert!(!state.jobs.is_loading);
    assert_eq!(state.jobs.items.len(), 1);

    h.pool.run_until(h.app.jobs.initialize_jobs());
    assert_eq!(h.transport.count(Method::Get, "/jobs"), 1);
}

#[test]
fn failed_fetch_clears_loading_and_keeps_detail() {
    let mut h = harness("2024-01-14", false);
    h.transport
        .respond(Method::Get, "/jobs", 500, json!({ "detail": "Database unavailable" }));

    h.pool.run_until(h.app.jobs.initialize_jobs());

    let state = h.app.jobs.snapshot();
    assert!(!state.jobs.is_loading);
    assert!(!state.jobs.has_fetched);
    assert_eq!(state.jobs.error.as_deref(), Some("Database unavailable"));

    // Sin reintento automático; un nuevo initialize vuelve a intentarlo
    assert_eq!(h.transport.count(Method::Get, "/jobs"), 1);
    h.pool.run_until(h.app.jobs.initialize_jobs());
    assert_eq!(h.transport.count(Method::Get, "/jobs"), 2);
}

#[test]
fn draft_view_selects_closest_date_and_filters_locally() {
    let mut h = harness("2024-01-14", false);
    h.transport.respond(Method::Get, DRAFTS, 200, drafts_body());

    h.pool.run_until(h.app.jobs.initialize_draft_jobs());

    let jobs = &h.app.jobs;
    assert_eq!(jobs.draft_dates(), vec![date("2024-01-10"), date("2024-01-20")]);
    assert_eq!(jobs.selected_date(), Some(date("2024-01-10")));
    let ids: Vec<String> = jobs.filtered_draft_jobs().into_iter().map(|j| j.id).collect();
    assert_eq!(ids, vec!["d2", "d3"]);

    jobs.set_selected_date(Some(date("2024-01-20")));
    let ids: Vec<String> = jobs.filtered_draft_jobs().into_iter().map(|j| j.id).collect();
    assert_eq!(ids, vec!["d1"]);
    assert_eq!(h.transport.count(Method::Get, DRAFTS), 1);
}

#[test]
fn saving_a_draft_refetches_drafts_but_other_statuses_reconcile_in_place() {
    let mut h = harness("2024-01-14", false);
    h.transport.respond(Method::Get, DRAFTS, 200, drafts_body());
    h.pool.run_until(h.app.jobs.initialize_draft_jobs());

    h.transport
        .respond(Method::Post, "/jobs", 201, job_json("d4", "draft", Some("2024-01-25")));
    let mut with_new_draft = drafts_body();
    if let Some(items) = with_new_draft.as_array_mut() {
        items.push(job_json("d4", "draft", Some("2024-01-25")));
    }
    h.transport.respond(Method::Get, DRAFTS, 200, with_new_draft);

    let payload = JobPayload {
        scheduled_date: Some(date("2024-01-25")),
        address: Some("4 Main St".into()),
        location: Some(GeoPoint::new(48.85, 2.35)),
        service_duration: Some(15),
        ..JobPayload::default()
    };
    let created = h.pool.run_until(h.app.jobs.create_job(&payload)).unwrap();
    assert_eq!(created.id, "d4");
    assert_eq!(h.transport.count(Method::Get, DRAFTS), 2);
    assert_eq!(
        h.app.jobs.draft_dates(),
        vec![date("2024-01-10"), date("2024-01-20"), date("2024-01-25")]
    );
    assert_eq!(h.app.jobs.selected_date(), Some(date("2024-01-10")));

    h.transport
        .respond(Method::Put, "/jobs/d2", 200, job_json("d2", "assigned", Some("2024-01-10")));
    h.pool
        .run_until(h.app.jobs.update_job("d2", &JobPayload::status_only(JobStatus::Assigned)))
        .unwrap();

    assert_eq!(h.transport.count(Method::Get, DRAFTS), 2);
    let state = h.app.jobs.snapshot();
    assert!(state.drafts.find(|j| j.id == "d2").is_none());
    assert_eq!(
        state.jobs.find(|j| j.id == "d2").map(|j| j.status),
        Some(JobStatus::Assigned)
    );
}

#[test]
fn invalid_payload_never_reaches_the_network() {
    let mut h = harness("2024-01-14", false);
    let payload = JobPayload {
        service_duration: Some(0),
        ..JobPayload::default()
    };

    let result = h.pool.run_until(h.app.jobs.create_job(&payload));

    assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    assert!(h.transport.requests().is_empty());
}

#[test]
fn bulk_delete_sends_one_request_per_id_and_reports_failures() {
    let mut h = harness("2024-01-14", false);
    h.transport.respond(
        Method::Get,
        "/jobs",
        200,
        json!([
            job_json("j1", "draft", Some("2024-01-10")),
            job_json("j2", "draft", Some("2024-01-10")),
            job_json("j3", "assigned", None),
        ]),
    );
    h.pool.run_until(h.app.jobs.fetch_jobs());

    h.transport.respond_raw(Method::Delete, "/jobs/j1", 204, "");
    h.transport
        .respond(Method::Delete, "/jobs/j2", 404, json!({ "detail": "Job not found" }));
    h.transport.respond_raw(Method::Delete, "/jobs/j3", 204, "");

    let ids = vec!["j1".to_string(), "j2".to_string(), "j3".to_string()];
    let outcome = h.pool.run_until(h.app.jobs.delete_jobs(&ids));

    assert_eq!(outcome.deleted, vec!["j1", "j3"]);
    assert_eq!(outcome.failed, vec![("j2".to_string(), "Job not found".to_string())]);
    let deletes = h
        .transport
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::Delete)
        .count();
    assert_eq!(deletes, 3);

    let remaining: Vec<String> = h.app.jobs.snapshot().jobs.items.into_iter().map(|j| j.id).collect();
    assert_eq!(remaining, vec!["j2"]);
    assert_eq!(
        h.app.notifications.last().map(|n| n.level),
        Some(NotificationLevel::Warning)
    );
}

#[test]
fn mark_completed_updates_status_in_place() {
    let mut h = harness("2024-01-14", false);
    h.transport
        .respond(Method::Get, "/jobs", 200, json!([job_json("j1", "assigned", Some("2024-01-14"))]));
    h.pool.run_until(h.app.jobs.fetch_jobs());

    h.transport
        .respond(Method::Put, "/jobs/j1", 200, job_json("j1", "completed", Some("2024-01-14")));
    let job = h.pool.run_until(h.app.jobs.mark_completed("j1")).unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    let sent = &h.transport.requests_to(Method::Put, "/jobs/j1")[0];
    assert_eq!(
        sent.body,
        fleet_dashboard::services::RequestBody::Json(r#"{"status":"completed"}"#.to_string())
    );
}

#[test]
fn unauthorized_cascade_runs_once_and_clears_every_store() {
    let mut h = harness("2024-01-14", false);
    h.transport
        .respond(Method::Get, "/jobs", 200, json!([job_json("j1", "assigned", None)]));
    h.pool.run_until(h.app.jobs.fetch_jobs());
    assert_eq!(h.app.jobs.snapshot().jobs.items.len(), 1);

    let sign_outs = Rc::new(Cell::new(0));
    let counter = sign_outs.clone();
    h.app.auth.on_sign_out(move || counter.set(counter.get() + 1));

    h.transport.respond_raw(Method::Get, "/team-members", 401, "");
    h.transport.respond_raw(Method::Get, "/vehicles", 401, "");

    let team = h.app.team.clone();
    let vehicles = h.app.vehicles.clone();
    h.pool.run_until(async move {
        futures::join!(team.fetch_team_members(), vehicles.fetch_vehicles());
    });

    assert_eq!(sign_outs.get(), 1);
    assert!(h.app.auth.is_signing_out());
    assert_eq!(h.app.auth.get_token(), None);
    assert_eq!(h.app.jobs.snapshot(), JobsState::default());

    // Las peticiones posteriores ya no llevan token
    h.pool.run_until(h.app.jobs.fetch_jobs());
    let last = h.transport.requests().pop().unwrap();
    assert_eq!(last.bearer_token, None);
}

#[test]
fn team_store_exposes_drivers() {
    let mut h = harness("2024-01-14", false);
    h.transport.respond(
        Method::Get,
        "/team-members",
        200,
        json!({ "items": [
            { "id": "t1", "name": "Ana", "role_type": "driver", "skills": ["fragile", "cold_chain"] },
            { "id": "t2", "name": "Luis", "role_type": "admin" },
        ]}),
    );

    h.pool.run_until(h.app.team.initialize_team_members());

    let drivers = h.app.team.drivers();
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].id, "t1");
    assert!(drivers[0].skills.contains("cold_chain"));
    assert_eq!(h.app.team.members().len(), 2);
}

#[test]
fn depot_store_reads_first_depot_and_updates_it() {
    let mut h = harness("2024-01-14", false);
    h.transport.respond(
        Method::Get,
        "/depots",
        200,
        json!([
            { "id": "dep-1", "name": "Main", "lat": 48.8, "lng": 2.3 },
            { "id": "dep-2", "name": "Overflow" },
        ]),
    );
    h.pool.run_until(h.app.depots.initialize_depots());
    assert_eq!(h.app.depots.primary_depot().map(|d| d.id), Some("dep-1".to_string()));

    h.transport.respond(
        Method::Put,
        "/depots/dep-1",
        200,
        json!({ "id": "dep-1", "name": "Main Hub", "lat": 48.8, "lng": 2.3 }),
    );
    let payload = DepotPayload {
        name: Some("Main Hub".into()),
        ..DepotPayload::default()
    };
    h.pool.run_until(h.app.depots.update_depot("dep-1", &payload)).unwrap();

    assert_eq!(
        h.app.depots.primary_depot().map(|d| d.name),
        Some("Main Hub".to_string())
    );
}

#[test]
fn routes_can_be_filtered_by_date() {
    let mut h = harness("2024-01-14", false);
    h.transport.respond(
        Method::Get,
        "/optimization/routes?scheduled_date=2024-01-10",
        200,
        json!([{ "id": "r1", "team_member_id": "t1", "stops": [] }]),
    );

    h.pool.run_until(h.app.routes.fetch_routes(Some(date("2024-01-10"))));

    assert_eq!(h.app.routes.routes_for_member("t1").len(), 1);
    assert_eq!(h.app.routes.snapshot().date, Some(date("2024-01-10")));
}

#[test]
fn sign_out_drops_a_fetch_that_was_still_in_flight() {
    let mut h = harness("2024-01-14", false);
    let late = h.transport.hold(Method::Get, "/jobs");

    let jobs = h.app.jobs.clone();
    h.pool
        .spawner()
        .spawn_local(async move { jobs.fetch_jobs().await })
        .unwrap();
    h.run_until_stalled();
    assert!(h.app.jobs.snapshot().jobs.is_loading);

    h.app.sign_out();
    assert!(h.app.jobs.snapshot().jobs.needs_initial_fetch());

    // La nueva sesión carga de cero
    h.transport.respond(Method::Get, "/jobs", 200, json!([]));
    h.pool.run_until(h.app.jobs.initialize_jobs());
    assert_eq!(h.transport.count(Method::Get, "/jobs"), 2);

    late.send(HttpResponse::new(200, json!([job_json("j1", "draft", Some("2024-01-10"))]).to_string()))
        .unwrap();
    h.run_until_stalled();

    let state = h.app.jobs.snapshot();
    assert!(state.jobs.items.is_empty());
    assert!(state.jobs.has_fetched);
    assert!(!state.jobs.is_loading);
}

#[test]
fn unauthorized_cascade_discards_pending_team_and_vehicle_replies() {
    let mut h = harness("2024-01-14", false);
    let team_reply = h.transport.hold(Method::Get, "/team-members");
    let vehicle_reply = h.transport.hold(Method::Post, "/vehicles");

    let spawner = h.pool.spawner();
    let team = h.app.team.clone();
    spawner
        .spawn_local(async move { team.fetch_team_members().await })
        .unwrap();
    let vehicles = h.app.vehicles.clone();
    let created = Rc::new(std::cell::RefCell::new(None));
    let sink = created.clone();
    spawner
        .spawn_local(async move {
            let payload = VehiclePayload {
                license_plate: Some("AB-123-CD".into()),
                ..VehiclePayload::default()
            };
            *sink.borrow_mut() = Some(vehicles.create_vehicle(&payload).await);
        })
        .unwrap();
    h.run_until_stalled();

    h.transport.respond_raw(Method::Get, "/depots", 401, "");
    h.pool.run_until(h.app.depots.fetch_depots());
    assert!(h.app.auth.is_signing_out());

    team_reply
        .send(HttpResponse::new(
            200,
            json!([{ "id": "t1", "name": "Ana", "role_type": "driver" }]).to_string(),
        ))
        .unwrap();
    vehicle_reply
        .send(HttpResponse::new(
            201,
            json!({ "id": "v1", "license_plate": "AB-123-CD" }).to_string(),
        ))
        .unwrap();
    h.run_until_stalled();

    assert_eq!(h.app.team.snapshot(), CollectionState::default());
    assert_eq!(h.app.vehicles.snapshot(), CollectionState::default());
    assert_eq!(h.app.depots.snapshot(), CollectionState::default());
    // El llamador recibe igualmente la respuesta del servidor
    assert!(matches!(&*created.borrow(), Some(Ok(v)) if v.id == "v1"));
}

#[test]
fn vehicle_crud_reconciles_the_local_list() {
    let mut h = harness("2024-01-14", false);
    h.transport.respond(
        Method::Get,
        "/vehicles",
        200,
        json!([{ "id": "v1", "license_plate": "AA-111-AA", "vehicle_type": "van" }]),
    );
    h.pool.run_until(h.app.vehicles.initialize_vehicles());
    assert_eq!(h.app.vehicles.vehicles().len(), 1);

    h.transport.respond(
        Method::Post,
        "/vehicles",
        201,
        json!({ "id": "v2", "license_plate": "BB-222-BB", "vehicle_type": "truck", "capacity_weight": 3500.0 }),
    );
    let payload = VehiclePayload {
        license_plate: Some("BB-222-BB".into()),
        vehicle_type: Some(VehicleType::Truck),
        capacity_weight: Some(3500.0),
        ..VehiclePayload::default()
    };
    let created = h.pool.run_until(h.app.vehicles.create_vehicle(&payload)).unwrap();
    assert_eq!(created.vehicle_type, VehicleType::Truck);

    let sent = &h.transport.requests_to(Method::Post, "/vehicles")[0];
    let fleet_dashboard::services::RequestBody::Json(body) = &sent.body else {
        panic!("vehicle create must be JSON");
    };
    let body: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(body["vehicle_type"], "truck");
    assert!(body.get("make").is_none());

    h.transport.respond(
        Method::Put,
        "/vehicles/v1",
        200,
        json!({ "id": "v1", "name": "Van 1", "license_plate": "AA-111-AA" }),
    );
    let rename = VehiclePayload {
        name: Some("Van 1".into()),
        ..VehiclePayload::default()
    };
    h.pool.run_until(h.app.vehicles.update_vehicle("v1", &rename)).unwrap();

    h.transport.respond_raw(Method::Delete, "/vehicles/v2", 204, "");
    h.pool.run_until(h.app.vehicles.delete_vehicle("v2")).unwrap();

    let vehicles = h.app.vehicles.vehicles();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].display_name(), "Van 1");

    h.transport
        .respond(Method::Delete, "/vehicles/v1", 409, json!({ "detail": "Vehicle is assigned to a route" }));
    let result = h.pool.run_until(h.app.vehicles.delete_vehicle("v1"));
    assert_eq!(result.unwrap_err().to_string(), "Vehicle is assigned to a route");
    assert_eq!(h.app.vehicles.vehicles().len(), 1);
    assert_eq!(
        h.app.vehicles.snapshot().error.as_deref(),
        Some("Vehicle is assigned to a route")
    );
}
