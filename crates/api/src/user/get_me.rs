use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::get_me::APIResponse;
use klubb_infra::KlubbContext;

/// The route guard already resolved the caller, there is no further
/// logic to run.
pub async fn get_me_controller(
    http_req: HttpRequest,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;
    Ok(HttpResponse::Ok().json(APIResponse::new(user)))
}
