use actix_web::HttpResponse;

use crate::models::HealthResponse;

/// Health check endpoint
pub async fn health() -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        message: "Strapi auth bridge is running".to_string(),
    };
    HttpResponse::Ok().json(response)
}
