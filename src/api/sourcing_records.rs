//! Sourcing record API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entity::sourcing_record;
use crate::error::{AppError, AppResult};
use crate::models::{
    ListSourcingRecordsQuery, SourcingRecordListResponse, SourcingRecordResponse,
    UpdateSourcingRecordRequest, clamp_pagination,
};

fn record_to_response(model: sourcing_record::Model) -> SourcingRecordResponse {
    SourcingRecordResponse {
        id: model.id,
        sourcing_location_id: model.sourcing_location_id,
        year: model.year,
        tonnage: model.tonnage,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// List sourcing records with pagination and an optional year filter.
#[utoipa::path(
    get,
    path = "/api/v1/sourcing-records",
    tag = "Sourcing Records",
    params(ListSourcingRecordsQuery),
    responses(
        (status = 200, description = "List of sourcing records", body = SourcingRecordListResponse),
    )
)]
pub async fn list_sourcing_records(
    pool: web::Data<DbPool>,
    query: web::Query<ListSourcingRecordsQuery>,
) -> AppResult<HttpResponse> {
    let (limit, offset) = clamp_pagination(query.limit, query.offset);
    let (records, total) = pool.list_sourcing_records(query.year, limit, offset).await?;

    Ok(HttpResponse::Ok().json(SourcingRecordListResponse {
        records: records.into_iter().map(record_to_response).collect(),
        total,
        limit,
        offset,
    }))
}

/// Get a single sourcing record.
#[utoipa::path(
    get,
    path = "/api/v1/sourcing-records/{record_id}",
    tag = "Sourcing Records",
    params(("record_id" = Uuid, Path, description = "Sourcing record ID")),
    responses(
        (status = 200, description = "Sourcing record", body = SourcingRecordResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_sourcing_record(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let record_id = path.into_inner();
    let record = pool
        .get_sourcing_record(record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sourcing record {}", record_id)))?;

    Ok(HttpResponse::Ok().json(record_to_response(record)))
}

/// Update the year or tonnage of a sourcing record.
#[utoipa::path(
    patch,
    path = "/api/v1/sourcing-records/{record_id}",
    tag = "Sourcing Records",
    params(("record_id" = Uuid, Path, description = "Sourcing record ID")),
    request_body = UpdateSourcingRecordRequest,
    responses(
        (status = 200, description = "Updated sourcing record", body = SourcingRecordResponse),
        (status = 400, description = "Invalid update", body = crate::error::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_sourcing_record(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateSourcingRecordRequest>,
) -> AppResult<HttpResponse> {
    let record_id = path.into_inner();
    let updated = pool
        .update_sourcing_record(record_id, &body.into_inner())
        .await?;

    info!(record_id = %record_id, "Sourcing record updated");
    Ok(HttpResponse::Ok().json(record_to_response(updated)))
}

/// Delete a sourcing record.
#[utoipa::path(
    delete,
    path = "/api/v1/sourcing-records/{record_id}",
    tag = "Sourcing Records",
    params(("record_id" = Uuid, Path, description = "Sourcing record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_sourcing_record(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let record_id = path.into_inner();
    if !pool.delete_sourcing_record(record_id).await? {
        return Err(AppError::NotFound(format!(
            "Sourcing record {}",
            record_id
        )));
    }

    info!(record_id = %record_id, "Sourcing record deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure sourcing record routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/sourcing-records").route(web::get().to(list_sourcing_records)),
    )
    .service(
        web::resource("/sourcing-records/{record_id}")
            .route(web::get().to(get_sourcing_record))
            .route(web::patch().to(update_sourcing_record))
            .route(web::delete().to(delete_sourcing_record)),
    );
}
