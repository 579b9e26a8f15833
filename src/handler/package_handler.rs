use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::dto::package_dto::{CreatePackageRequest, PackageMessageResponse, PackageResponse, UpdatePackageRequest};
use crate::dto::MessageResponse;
use crate::handler::parse_object_id;
use crate::model::user::AuthenticatedUser;
use crate::service::package_service::{PackageService, PackageServiceImpl};
use crate::util::error::HandlerError;

pub async fn list_packages_handler(
    State(service): State<Arc<PackageServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let packages = service.list_packages().await?;
    let body: Vec<PackageResponse> = packages.into_iter().map(PackageResponse::from).collect();
    Ok(Json(body))
}

pub async fn get_package_handler(
    State(service): State<Arc<PackageServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "package")?;
    let package = service.get_package(&id).await?;
    Ok(Json(PackageResponse::from(package)))
}

pub async fn create_package_handler(
    State(service): State<Arc<PackageServiceImpl>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreatePackageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let package = service.create_package(payload.into(), &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(PackageMessageResponse {
            message: "Package created successfully".to_string(),
            package: package.into(),
        }),
    ))
}

pub async fn update_package_handler(
    State(service): State<Arc<PackageServiceImpl>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePackageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "package")?;
    payload.validate().map_err(HandlerError::validation)?;
    let package = service.update_package(&id, payload.into(), &user).await?;
    Ok(Json(PackageMessageResponse {
        message: "Package updated successfully".to_string(),
        package: package.into(),
    }))
}

pub async fn delete_package_handler(
    State(service): State<Arc<PackageServiceImpl>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "package")?;
    service.delete_package(&id, &user).await?;
    Ok(Json(MessageResponse::new("Package deleted successfully")))
}
