use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::signup,
        api::auth::login,
        api::auth::me,
        api::auth::request_reset,
        api::auth::reset_password,
        api::intelligence::generate_intelligence,
        api::crm::save_record,
        api::crm::list_records,
    ),
    tags(
        (name = "veris", description = "Veris listing intelligence API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_routed_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/auth/signup",
            "/api/auth/login",
            "/api/auth/me",
            "/api/auth/request-reset",
            "/api/auth/reset-password",
            "/api/generate-intelligence",
            "/api/crm/save",
            "/api/crm/records",
        ] {
            assert!(doc.paths.paths.contains_key(path), "undocumented {}", path);
        }
    }
}
