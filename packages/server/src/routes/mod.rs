use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(signup_routes(config))
        .merge(login_routes())
        .routes(routes!(handlers::protected::protected))
        .merge(admin_routes())
}

fn signup_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let participant =
        OpenApiRouter::new().routes(routes!(handlers::signup::signup_participant));

    let organizer = OpenApiRouter::new()
        .routes(routes!(handlers::signup::signup_organizer))
        .layer(handlers::signup::organizer_body_limit(&config.upload));

    participant.merge(organizer)
}

fn login_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::login::login_participant))
        .routes(routes!(handlers::login::login_organizer))
        .routes(routes!(handlers::login::login_admin))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::admin::list_organizers))
        .routes(routes!(handlers::admin::update_organizer_status))
}
