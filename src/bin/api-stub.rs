//! Development upstream API.
//!
//! Serves the endpoints the starter pages load, so `web` has something
//! to talk to locally. Point `APIPORT` at it or accept the defaults.

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

#[tokio::main]
async fn main() {
    let port: u16 = std::env::var("APIPORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3030);

    let app = Router::new()
        .route(
            "/info",
            get(|| async { Json(json!({ "message": "This came from the api server" })) }),
        )
        .route(
            "/widgets",
            get(|| async {
                Json(json!([
                    { "id": 1, "name": "sprocket" },
                    { "id": 2, "name": "flange" },
                    { "id": 3, "name": "gimbal" },
                ]))
            }),
        )
        .route(
            "/users/{id}",
            get(|Path(id): Path<String>| async move {
                let name = format!("User {id}");
                Json(json!({ "id": id, "name": name }))
            }),
        );

    let addr = format!("127.0.0.1:{port}");
    println!("API stub listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
