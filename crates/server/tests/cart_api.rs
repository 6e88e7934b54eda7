use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{extract::Path, extract::State, http::StatusCode, routing::get, Json, Router};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use configs::AppConfig;
use server::{routes, startup};

type StockTable = Arc<Mutex<Vec<(u32, u32)>>>;

struct TestApp {
    base_url: String,
    config: AppConfig,
    stock: StockTable,
}

async fn stock(State(table): State<StockTable>, Path(id): Path<u32>) -> Result<Json<Value>, StatusCode> {
    let table = table.lock().unwrap();
    table
        .iter()
        .find(|(pid, _)| *pid == id)
        .map(|(pid, amount)| Json(json!({ "id": pid, "amount": amount })))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn product(Path(id): Path<u32>) -> Result<Json<Value>, StatusCode> {
    if id > 3 {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "id": id,
        "title": format!("Tênis {id}"),
        "price": 139.9,
        "image": format!("https://cdn.example/{id}.jpg")
    })))
}

async fn serve(router: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await { eprintln!("server error: {}", e); }
    });
    Ok(format!("http://{}:{}", addr.ip(), addr.port()))
}

async fn start_inventory(stock_table: StockTable) -> anyhow::Result<String> {
    let router = Router::new()
        .route("/stock/:id", get(stock))
        .route("/products/:id", get(product))
        .with_state(stock_table);
    serve(router).await
}

async fn start_app(config: AppConfig) -> anyhow::Result<String> {
    let state = startup::build_state(&config).await?;
    serve(routes::build_router(state, CorsLayer::very_permissive())).await
}

async fn start_server() -> anyhow::Result<TestApp> {
    let stock: StockTable = Arc::new(Mutex::new(vec![(1, 2), (2, 5), (3, 0)]));
    let inventory_url = start_inventory(stock.clone()).await?;

    // Isolated storage file per test run
    let mut config = AppConfig::default();
    config.inventory.base_url = inventory_url;
    config.storage.path = format!("target/test-data/{}/local_storage.json", Uuid::new_v4());
    config.normalize_and_validate()?;

    let base_url = start_app(config.clone()).await?;
    Ok(TestApp { base_url, config, stock })
}

async fn cart_amounts(res: reqwest::Response) -> anyhow::Result<Vec<(u64, u64)>> {
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    Ok(body
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .map(|p| (p["id"].as_u64().unwrap(), p["amount"].as_u64().unwrap()))
        .collect())
}

async fn notification_kinds(client: &reqwest::Client, app: &TestApp) -> anyhow::Result<Vec<String>> {
    let body: Value = client.get(format!("{}/api/notifications", app.base_url)).send().await?.json().await?;
    Ok(body
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .map(|n| n["kind"].as_str().unwrap_or_default().to_string())
        .collect())
}

#[tokio::test]
async fn add_update_remove_flow() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();
    let item = |id: u32| format!("{}/api/cart/items/{}", app.base_url, id);

    let cart = cart_amounts(client.post(item(1)).send().await?).await?;
    assert_eq!(cart, vec![(1, 1)]);
    let cart = cart_amounts(client.post(item(1)).send().await?).await?;
    assert_eq!(cart, vec![(1, 2)]);

    // stock of product 1 is 2
    let cart = cart_amounts(client.post(item(1)).send().await?).await?;
    assert_eq!(cart, vec![(1, 2)]);
    assert_eq!(notification_kinds(&client, &app).await?, vec!["stock_exceeded"]);

    let cart = cart_amounts(client.post(item(2)).send().await?).await?;
    assert_eq!(cart, vec![(1, 2), (2, 1)]);
    let cart = cart_amounts(client.put(item(2)).json(&json!({ "amount": 4 })).send().await?).await?;
    assert_eq!(cart, vec![(1, 2), (2, 4)]);
    let cart = cart_amounts(client.put(item(2)).json(&json!({ "amount": 0 })).send().await?).await?;
    assert_eq!(cart, vec![(1, 2), (2, 4)]);
    assert!(notification_kinds(&client, &app).await?.is_empty());

    let cart = cart_amounts(client.delete(item(1)).send().await?).await?;
    assert_eq!(cart, vec![(2, 4)]);
    let cart = cart_amounts(client.delete(item(1)).send().await?).await?;
    assert_eq!(cart, vec![(2, 4)]);
    assert_eq!(notification_kinds(&client, &app).await?, vec!["remove_failed"]);
    Ok(())
}

#[tokio::test]
async fn rejected_operations_report_their_kind() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();
    let item = |id: u32| format!("{}/api/cart/items/{}", app.base_url, id);

    // out of stock, unknown to inventory, not in cart
    assert!(cart_amounts(client.post(item(3)).send().await?).await?.is_empty());
    assert!(cart_amounts(client.post(item(9)).send().await?).await?.is_empty());
    assert!(cart_amounts(client.put(item(2)).json(&json!({ "amount": 1 })).send().await?).await?.is_empty());

    assert_eq!(
        notification_kinds(&client, &app).await?,
        vec!["stock_exceeded", "add_failed", "update_failed"]
    );
    Ok(())
}

#[tokio::test]
async fn cart_survives_restart() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    client.post(format!("{}/api/cart/items/2", app.base_url)).send().await?;
    client
        .put(format!("{}/api/cart/items/2", app.base_url))
        .json(&json!({ "amount": 3 }))
        .send()
        .await?;

    let raw = tokio::fs::read_to_string(&app.config.storage.path).await?;
    let stored: Value = serde_json::from_str(&raw)?;
    let snapshot: Value = serde_json::from_str(stored["@RocketShoes:cart"].as_str().unwrap())?;
    assert_eq!(snapshot[0]["id"], 2);
    assert_eq!(snapshot[0]["amount"], 3);

    // stock changes do not touch a restored cart
    app.stock.lock().unwrap().retain(|(id, _)| *id != 2);
    let restarted = start_app(app.config.clone()).await?;
    let res = client.get(format!("{}/api/cart", restarted)).send().await?;
    assert_eq!(cart_amounts(res).await?, vec![(2, 3)]);

    let _ = tokio::fs::remove_file(&app.config.storage.path).await;
    Ok(())
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}
