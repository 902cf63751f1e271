//! Console REST API

pub mod attributes;
pub mod catalog;
pub mod envelope;
pub mod params;
pub mod system;
pub mod telemetry;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use iotc_store::{Asset, AssetProfile, Device, DeviceProfile};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the router with every API route
pub fn create_router(state: AppState) -> Router {
    let cors_enabled = state.config.cors_enabled;

    let mut router = Router::new()
        // Health & stats
        .route("/api/health", get(system::health))
        .route("/api/stats", get(system::stats))
        // Asset profiles
        .route(
            "/api/asset-profiles",
            get(catalog::list::<AssetProfile>).post(catalog::create::<AssetProfile>),
        )
        .route(
            "/api/asset-profiles/{id}",
            get(catalog::get_one::<AssetProfile>)
                .put(catalog::update::<AssetProfile>)
                .delete(catalog::remove::<AssetProfile>),
        )
        // Device profiles
        .route(
            "/api/device-profiles",
            get(catalog::list::<DeviceProfile>).post(catalog::create::<DeviceProfile>),
        )
        .route(
            "/api/device-profiles/{id}",
            get(catalog::get_one::<DeviceProfile>)
                .put(catalog::update::<DeviceProfile>)
                .delete(catalog::remove::<DeviceProfile>),
        )
        // Assets
        .route(
            "/api/assets",
            get(catalog::list::<Asset>).post(catalog::create::<Asset>),
        )
        .route(
            "/api/assets/{id}",
            get(catalog::get_one::<Asset>)
                .put(catalog::update::<Asset>)
                .delete(catalog::remove::<Asset>),
        )
        // Devices
        .route(
            "/api/devices",
            get(catalog::list::<Device>).post(catalog::create::<Device>),
        )
        .route(
            "/api/devices/{id}",
            get(catalog::get_one::<Device>)
                .put(catalog::update::<Device>)
                .delete(catalog::remove::<Device>),
        )
        // Attributes
        .route("/api/attributes", get(attributes::query))
        .route(
            "/api/attributes/{entity_type}/{entity_id}/{scope}",
            post(attributes::save),
        )
        .route(
            "/api/attributes/{entity_type}/{entity_id}/{scope}/{key}",
            delete(attributes::remove),
        )
        // Telemetry
        .route(
            "/api/telemetry/{entity_type}/{entity_id}",
            post(telemetry::save),
        )
        .route(
            "/api/telemetry/{entity_type}/{entity_id}/values/timeseries",
            get(telemetry::query),
        )
        .route(
            "/api/telemetry/{entity_type}/{entity_id}/timeseries/delete",
            delete(telemetry::delete_range),
        )
        .fallback(system::not_found)
        .layer(middleware::map_response_with_state(
            state.clone(),
            system::finalize_response,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_enabled {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}
