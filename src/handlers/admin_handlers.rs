use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::AdminUserView;
use crate::errors::ApiError;
use crate::repo;

/// Handler for `GET /api/admin/list-users`
///
/// Any authenticated user may call it; the demo has no admin role.
#[instrument(skip(pool, caller), fields(user_id = %caller.user_id))]
pub async fn list_users_handler(
    State(pool): State<Arc<DbPool>>,
    caller: AuthUser,
) -> Result<Json<Vec<AdminUserView>>, ApiError> {
    let rows = repo::list_users_with_wallets(&pool)?;
    debug!("Listing {} users", rows.len());
    Ok(Json(
        rows.iter()
            .map(|(user, wallet)| AdminUserView::new(user, wallet.as_ref()))
            .collect(),
    ))
}
