pub mod dto;
pub mod routes;

use std::sync::Arc;

use rocket::{routes, Build, Rocket};

use crate::bootstrap::AppState;

/// Rocket instance with every route mounted and `state` managed.
pub fn build_rocket(port: u16, state: AppState) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .manage(Arc::new(state))
        .mount("/", routes![routes::health, routes::simulate_swap, routes::position_size, routes::fees_earned])
}
