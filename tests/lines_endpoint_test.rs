use axum::http::StatusCode;
use fieldbill::api;
use fieldbill::config::Config;
use fieldbill::db::init_db;
use fieldbill::domain::{
    CutSettings, EntryMethod, FacilityKind, Invoice, InvoiceId, Money, PricingContext,
    ProductNumber, ServiceType, ThresholdKind, TicketId, TicketSnapshot,
};
use fieldbill::orchestration::BillingEngine;
use fieldbill::pricing::MockPriceSource;
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    repo: Arc<fieldbill::Repository>,
    _temp: TempDir,
}

fn m(s: &str) -> Money {
    Money::from_str(s).unwrap()
}

fn settings(product: &str) -> CutSettings {
    CutSettings {
        product_number: ProductNumber::new(product),
        product_name: format!("Product {}", product),
        unit_of_measure: "t".to_string(),
        threshold_kind: ThresholdKind::Percentage,
        threshold_min: None,
        threshold_max: Some(m("100")),
        reverse: false,
    }
}

fn service_type() -> ServiceType {
    ServiceType {
        id: "st-landfill".to_string(),
        name: "Landfill Solids".to_string(),
        includes_oil: false,
        includes_water: false,
        includes_solids: true,
        oil: None,
        water: None,
        solid: Some(settings("40300")),
        total: settings("40000"),
        oil_credit_min_volume: None,
        water_min_pricing_percent: None,
        solid_min_pricing_percent: Some(m("5")),
    }
}

fn ticket() -> TicketSnapshot {
    TicketSnapshot {
        ticket_id: TicketId::new("TT-1001"),
        facility_id: "FAC-LF".to_string(),
        facility_kind: FacilityKind::Landfill,
        service_type_id: "st-landfill".to_string(),
        well_classification: "Drilling".to_string(),
        source_location_id: "SL-1".to_string(),
        facility_service_substance_id: "FSS-1".to_string(),
        material_approval_id: None,
        entry_method: EntryMethod::Percent,
        oil_volume: Money::zero(),
        oil_volume_percent: Money::zero(),
        water_volume: Money::zero(),
        water_volume_percent: Money::zero(),
        solid_volume: m("8"),
        solid_volume_percent: m("10"),
        load_volume: m("80"),
        net_weight: m("100"),
        tare_weight: m("20"),
        gross_weight: m("120"),
        pricing: PricingContext {
            site_id: "SITE-LF".to_string(),
            customer_id: "CUST-1".to_string(),
            source_location_id: "SL-1".to_string(),
        },
    }
}

async fn setup_test_app(pricing: MockPriceSource) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(fieldbill::Repository::new(pool));
    repo.insert_service_type(&service_type())
        .await
        .expect("seed service type");

    let config = Config {
        port: 0,
        database_path: db_path,
        pricing_api_url: "http://example.invalid".to_string(),
    };

    let billing = Arc::new(BillingEngine::new(repo.clone(), Arc::new(pricing)));
    let state = api::AppState::new(repo.clone(), config, billing);
    let app = api::create_router(state);

    TestApp {
        app,
        repo,
        _temp: temp_dir,
    }
}

fn priced() -> MockPriceSource {
    MockPriceSource::new()
        .with_rate(ProductNumber::new("40300"), m("12.00"))
        .with_rate(ProductNumber::new("40000"), m("0"))
}

async fn request(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let test_app = setup_test_app(priced()).await;
    let (status, body) = request(test_app.app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_generate_and_list_lines() {
    let test_app = setup_test_app(priced()).await;
    let body = serde_json::json!({ "ticket": serde_json::to_value(ticket()).unwrap() });

    let (status, generated) = request(
        test_app.app.clone(),
        "POST",
        "/v1/lines/generate",
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let lines = generated["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    let solid = lines
        .iter()
        .find(|l| l["cutType"] == "solid")
        .expect("solid line");
    assert_eq!(solid["status"], "preview");
    assert_eq!(solid["rate"], "12");
    assert_eq!(solid["totalValue"], "96");

    let (status, listed) = request(
        test_app.app,
        "GET",
        "/v1/lines?ticketId=TT-1001",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["lines"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_lines_requires_ticket_id() {
    let test_app = setup_test_app(priced()).await;
    let (status, _) = request(test_app.app, "GET", "/v1/lines?ticketId=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_unknown_service_type_is_bad_request() {
    let test_app = setup_test_app(priced()).await;
    let mut t = ticket();
    t.service_type_id = "st-missing".to_string();
    let body = serde_json::json!({ "ticket": serde_json::to_value(t).unwrap() });

    let (status, error) = request(test_app.app, "POST", "/v1/lines/generate", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("st-missing"));
}

#[tokio::test]
async fn test_update_line_and_invoice_totals() {
    let test_app = setup_test_app(priced()).await;
    test_app
        .repo
        .insert_invoice(&Invoice {
            id: InvoiceId::new("INV-1"),
            customer_id: "CUST-1".to_string(),
            sales_line_count: 0,
            invoice_amount: Money::zero(),
        })
        .await
        .unwrap();

    let body = serde_json::json!({ "ticket": serde_json::to_value(ticket()).unwrap() });
    let (_, _) = request(
        test_app.app.clone(),
        "POST",
        "/v1/lines/generate",
        Some(body),
    )
    .await;

    let mut line = test_app
        .repo
        .query_lines_by_ticket(&TicketId::new("TT-1001"))
        .await
        .unwrap()
        .into_iter()
        .find(|l| l.product_number == ProductNumber::new("40300"))
        .unwrap();
    line.invoice_id = Some(InvoiceId::new("INV-1"));

    let body = serde_json::json!({
        "ticket": serde_json::to_value(ticket()).unwrap(),
        "line": serde_json::to_value(&line).unwrap(),
    });
    let (status, updated) = request(test_app.app.clone(), "PUT", "/v1/lines", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["invoiceId"], "INV-1");

    let (status, invoice) = request(test_app.app, "GET", "/v1/invoices/INV-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoice["salesLineCount"], 1);
    assert_eq!(invoice["invoiceAmount"], "96");
}

#[tokio::test]
async fn test_void_line() {
    let test_app = setup_test_app(priced()).await;
    let body = serde_json::json!({ "ticket": serde_json::to_value(ticket()).unwrap() });
    let (_, generated) = request(
        test_app.app.clone(),
        "POST",
        "/v1/lines/generate",
        Some(body),
    )
    .await;
    let id = generated["lines"][0]["id"].as_str().unwrap().to_string();

    let (status, voided) = request(
        test_app.app.clone(),
        "POST",
        &format!("/v1/lines/{}/void", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voided["status"], "void");

    let (status, _) = request(
        test_app.app,
        "POST",
        "/v1/lines/nonexistent/void",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_containers_return_not_found() {
    let test_app = setup_test_app(priced()).await;
    let (status, _) = request(
        test_app.app.clone(),
        "GET",
        "/v1/invoices/INV-NOPE",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        test_app.app,
        "GET",
        "/v1/load-confirmations/LC-NOPE",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
