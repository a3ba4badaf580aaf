use actix_web::{web, HttpResponse};

/// Body of every `/health` response, rendered once at startup.
#[derive(Debug, Clone)]
pub struct HealthBody(String);

impl HealthBody {
    pub fn new() -> Self {
        let mut body = serde_json::json!({ "health": "OK" }).to_string();
        body.push('\n');
        Self(body)
    }
}

impl Default for HealthBody {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn show(body: web::Data<HealthBody>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(body.0.clone())
}
