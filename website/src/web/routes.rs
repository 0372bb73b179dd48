use axum::routing::{get, patch, post};
use axum::{Router, middleware};

use crate::run::AppState;

use super::middleware::{
    ctx_middleware, require_admin_middleware, require_client_middleware,
    require_doctor_middleware, response_mapper,
};
use super::{admin, auth, client, doctor, not_found_handler, schedule};

pub fn all_routes(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .nest("/client", client_routes())
        .nest("/admin", admin_routes())
        .nest("/doctor", doctor_routes())
        .fallback(not_found_handler)
        .layer(middleware::map_response(response_mapper))
        .layer(middleware::from_fn(ctx_middleware))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login_handler))
        .route("/logout", post(auth::logout_handler))
        .route("/session", get(auth::session_handler))
        .route("/register", post(auth::register_handler))
        .route("/auth/check-username", get(auth::check_username_handler))
        .route("/auth/check-dni", get(auth::check_dni_handler))
        .route("/auth/check-email", get(auth::check_email_handler))
        .route("/auth/check-phone", get(auth::check_phone_handler))
        .route("/auth/forgot-password", post(auth::forgot_password_handler))
        .route("/auth/reset-password", post(auth::reset_password_handler))
        .route("/auth/verify-email", get(auth::verify_email_handler))
        .route(
            "/auth/change-email-unverified",
            post(auth::change_email_handler),
        )
}

fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(client::home_handler))
        .route(
            "/profile",
            get(client::profile_handler)
                .patch(client::update_profile_handler)
                .delete(client::unsubscribe_handler),
        )
        .route(
            "/pets",
            get(client::pets_handler).post(client::create_pet_handler),
        )
        .route(
            "/pets/{pet_id}",
            patch(client::update_pet_handler).delete(client::delete_pet_handler),
        )
        .route(
            "/pets/{pet_id}/appointments",
            get(client::pet_appointments_handler),
        )
        .route(
            "/pets/{pet_id}/scheduled",
            get(client::pet_scheduled_handler),
        )
        .route(
            "/pets/{pet_id}/diagnoses",
            get(client::pet_diagnoses_handler),
        )
        .nest("/pets/{pet_id}/schedule", schedule_routes())
        .route("/appointments", get(client::appointments_handler))
        .route(
            "/appointments/{appointment_id}",
            axum::routing::delete(client::cancel_appointment_handler),
        )
        .route("/history", get(client::history_handler))
        .route("/diagnoses", get(client::diagnoses_handler))
        .route("/diagnoses/{diagnose_id}", get(client::diagnose_handler))
        .route_layer(middleware::from_fn(require_client_middleware))
}

fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(schedule::view_handler)
                .post(schedule::start_handler)
                .delete(schedule::cancel_handler),
        )
        .route("/reason", post(schedule::reason_handler))
        .route("/day", post(schedule::day_handler))
        .route("/slot", post(schedule::slot_handler))
        .route("/confirm", post(schedule::confirm_handler))
        .route("/back", post(schedule::back_handler))
        .route("/month/previous", post(schedule::previous_month_handler))
        .route("/month/next", post(schedule::next_month_handler))
        .route("/notice/dismiss", post(schedule::dismiss_notice_handler))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(admin::home_handler))
        .route(
            "/profile",
            get(admin::profile_handler).patch(admin::update_profile_handler),
        )
        .route(
            "/appointments",
            get(admin::appointments_handler).post(admin::create_appointment_handler),
        )
        .route(
            "/appointments/available",
            get(admin::available_appointments_handler),
        )
        .route(
            "/appointments/{appointment_id}",
            get(admin::appointment_handler)
                .put(admin::update_appointment_handler)
                .delete(admin::cancel_appointment_handler),
        )
        .route(
            "/appointments/{appointment_id}/approve",
            patch(admin::approve_handler),
        )
        .route(
            "/appointments/{appointment_id}/disapprove",
            patch(admin::disapprove_handler),
        )
        .route(
            "/doctors",
            get(admin::active_doctors_handler).post(admin::register_doctor_handler),
        )
        .route("/doctors/inactive", get(admin::inactive_doctors_handler))
        .route(
            "/doctors/{doctor_id}",
            get(admin::doctor_handler)
                .patch(admin::update_doctor_handler)
                .delete(admin::deactivate_doctor_handler),
        )
        .route(
            "/doctors/{doctor_id}/reactivate",
            patch(admin::reactivate_doctor_handler),
        )
        .route(
            "/doctors/{doctor_id}/available",
            get(admin::doctor_available_handler),
        )
        .route(
            "/admins",
            get(admin::active_admins_handler).post(admin::register_admin_handler),
        )
        .route("/admins/inactive", get(admin::inactive_admins_handler))
        .route(
            "/admins/{admin_id}",
            get(admin::admin_handler)
                .patch(admin::update_admin_handler)
                .delete(admin::deactivate_admin_handler),
        )
        .route(
            "/admins/{admin_id}/reactivate",
            patch(admin::reactivate_admin_handler),
        )
        .route(
            "/clients/{client_id}",
            get(admin::client_handler).delete(admin::unsubscribe_client_handler),
        )
        .route("/clients/{client_id}/pets", get(admin::client_pets_handler))
        .route(
            "/pets/{pet_id}/appointments",
            get(admin::pet_appointments_handler),
        )
        .route_layer(middleware::from_fn(require_admin_middleware))
}

fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(doctor::home_handler))
        .route(
            "/profile",
            get(doctor::profile_handler).patch(doctor::update_profile_handler),
        )
        .route("/appointments", get(doctor::appointments_handler))
        .route(
            "/appointments/past",
            get(doctor::past_appointments_handler),
        )
        .route(
            "/diagnoses",
            get(doctor::diagnoses_handler).post(doctor::create_diagnose_handler),
        )
        .route("/diagnoses/{diagnose_id}", get(doctor::diagnose_handler))
        .route("/availability", post(doctor::availability_handler))
        .route(
            "/pets/{pet_id}/diagnoses",
            get(doctor::pet_diagnoses_handler),
        )
        .route_layer(middleware::from_fn(require_doctor_middleware))
}
