//! Integration tests for sourcing record endpoints.

use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use sourcing_import_lib::api;
use sourcing_import_lib::db::DbPool;
use sourcing_import_lib::models::{LocationType, SourcingData, SourcingRecordYear};

use crate::common;

fn sample_data() -> Vec<SourcingData> {
    vec![
        SourcingData {
            material_hs_code: "1005".to_string(),
            business_unit_path: Some("Food/Grain".to_string()),
            t1_supplier_name: Some("Acme".to_string()),
            producer_name: None,
            location_type: LocationType::CountryOfProduction,
            location_country_input: Some("Spain".to_string()),
            location_address_input: None,
            latitude: None,
            longitude: None,
            location_warning: None,
            sourcing_records: vec![
                SourcingRecordYear {
                    year: 2019,
                    tonnage: 500.5,
                },
                SourcingRecordYear {
                    year: 2020,
                    tonnage: 410.0,
                },
            ],
        },
        SourcingData {
            material_hs_code: "4107".to_string(),
            business_unit_path: None,
            t1_supplier_name: None,
            producer_name: Some("Tannery Ltd".to_string()),
            location_type: LocationType::CountryOfProduction,
            location_country_input: Some("Kenya".to_string()),
            location_address_input: None,
            latitude: None,
            longitude: None,
            location_warning: None,
            sourcing_records: vec![SourcingRecordYear {
                year: 2019,
                tonnage: 20.0,
            }],
        },
    ]
}

async fn records_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .service(web::scope("/api/v1").configure(api::configure_sourcing_record_routes)),
    )
    .await
}

#[actix_web::test]
async fn test_list_records_with_year_filter() {
    let pool = common::test_pool().await;
    let (locations, records) = pool.replace_sourcing_data(&sample_data()).await.unwrap();
    assert_eq!(locations, 2);
    assert_eq!(records, 3);

    let app = records_app(&pool).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/sourcing-records")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 3);

    let req = test::TestRequest::get()
        .uri("/api/v1/sourcing-records?year=2020")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["records"][0]["year"], 2020);
}

#[actix_web::test]
async fn test_patch_record_updates_tonnage() {
    let pool = common::test_pool().await;
    pool.replace_sourcing_data(&sample_data()).await.unwrap();
    let (records, _) = pool.list_sourcing_records(Some(2020), 50, 0).await.unwrap();
    let record_id = records[0].id;

    let app = records_app(&pool).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/sourcing-records/{}", record_id))
        .set_json(json!({ "tonnage": 999.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["tonnage"], 999.0);

    let stored = pool.get_sourcing_record(record_id).await.unwrap().unwrap();
    assert_eq!(stored.tonnage, 999.0);
}

#[actix_web::test]
async fn test_patch_negative_tonnage_rejected() {
    let pool = common::test_pool().await;
    pool.replace_sourcing_data(&sample_data()).await.unwrap();
    let (records, _) = pool.list_sourcing_records(None, 1, 0).await.unwrap();
    let record_id = records[0].id;

    let app = records_app(&pool).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/sourcing-records/{}", record_id))
        .set_json(json!({ "tonnage": -1.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_delete_record_then_404() {
    let pool = common::test_pool().await;
    pool.replace_sourcing_data(&sample_data()).await.unwrap();
    let (records, _) = pool.list_sourcing_records(None, 1, 0).await.unwrap();
    let record_id = records[0].id;

    let app = records_app(&pool).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/sourcing-records/{}", record_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/sourcing-records/{}", record_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_get_unknown_record_is_404() {
    let pool = common::test_pool().await;
    let app = records_app(&pool).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/sourcing-records/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
