use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct OkDoc { pub ok: bool }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct MeDoc { pub role: String }

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct ScenarioMetaDoc {
    pub id: String,
    pub version: String,
    pub updatedAt: String,
    /// Falls back to `id` when the stored document has no name.
    pub name: String,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct ProfileMetaDoc {
    pub id: String,
    pub updatedAt: String,
}

/// Registers the `bearer` scheme referenced by the guarded paths.
pub struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme("bearer", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "scenario sync server", description = "JSON-file store for scenario and profile synchronisation."),
    paths(
        crate::routes::ping,
        crate::routes::auth::me,
        crate::routes::scenarios::list,
        crate::routes::scenarios::get,
        crate::routes::scenarios::upsert,
        crate::routes::scenarios::delete,
        crate::routes::profiles::list,
        crate::routes::profiles::get,
        crate::routes::profiles::upsert,
        crate::routes::profiles::delete,
    ),
    components(
        schemas(
            OkDoc,
            MessageDoc,
            MeDoc,
            ScenarioMetaDoc,
            ProfileMetaDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "scenarios"),
        (name = "profiles")
    )
)]
pub struct ApiDoc;
