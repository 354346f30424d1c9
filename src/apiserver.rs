// apiserver.rs

use askama::Template;
use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Response, StatusCode},
    response::{Html, IntoResponse},
    routing::*,
};

use crate::*;

#[derive(Template)]
#[template(path = "index.html.ask", escape = "html")]
struct IndexPage<'a> {
    ssid: &'a str,
    fw_version: &'a str,
}

pub fn api_router(state: Arc<Pin<Box<MyState>>>) -> Router {
    Router::new()
        .route("/", get(get_index))
        .route("/data", get(get_data))
        .with_state(state)
}

pub async fn run_api_server(state: Arc<Pin<Box<MyState>>>) -> anyhow::Result<()> {
    loop {
        if *state.ap_up.read().await {
            break;
        }
        sleep(Duration::from_secs(1)).await;
    }

    let listen = format!("0.0.0.0:{}", state.config.port);
    let addr = listen.parse::<net::SocketAddr>()?;

    let app = api_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server started, listening to {listen}");
    Ok(axum::serve(listener, app.into_make_service()).await?)
}

pub async fn get_index(State(state): State<Arc<Pin<Box<MyState>>>>) -> Response<Body> {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_index()");

    let page = IndexPage {
        ssid: &state.config.ap_ssid,
        fw_version: FW_VERSION,
    };
    let index = match page.render() {
        Err(e) => {
            let err_msg = format!("Index template error: {e:?}\n");
            error!("{err_msg}");
            return (StatusCode::INTERNAL_SERVER_ERROR, err_msg).into_response();
        }
        Ok(s) => s,
    };
    (StatusCode::OK, Html(index)).into_response()
}

pub async fn get_data(
    State(state): State<Arc<Pin<Box<MyState>>>>,
) -> (StatusCode, Json<SensorReport>) {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_data()");

    let data = *state.data.borrow();
    (StatusCode::OK, Json(data))
}

#[cfg(test)]
mod tests {
    use axum::http::header;

    use super::*;

    fn shared(report: SensorReport) -> (watch::Sender<SensorReport>, Arc<Pin<Box<MyState>>>) {
        let (tx, rx) = watch::channel(report);
        let state = Arc::new(Box::pin(MyState::new(MyConfig::default(), rx)));
        (tx, state)
    }

    async fn body_text(resp: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn data_serves_latest_snapshot() {
        let (tx, state) = shared(SensorReport::default());

        let (status, Json(first)) = get_data(State(state.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, SensorReport::default());

        tx.send_replace(SensorReport {
            temp: 21.5,
            tank: 50,
            watering: 1,
            ..Default::default()
        });
        let resp = get_data(State(state.clone())).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let v: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(v["temp"], 21.5);
        assert_eq!(v["tank"], 50);
        assert_eq!(v["watering"], 1);
        assert_eq!(state.api_cnt.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn index_is_the_dashboard() {
        let (_tx, state) = shared(SensorReport::default());
        let resp = get_index(State(state)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let page = body_text(resp).await;
        assert!(page.contains("Smart House Dashboard"));
        assert!(page.contains("\"/data\""));
        assert!(page.contains(FW_VERSION));
        for id in ["temp", "fire", "light", "motion", "intruder", "tank", "watering", "pump", "esp32_temp"] {
            assert!(page.contains(&format!("id='{id}'")), "{id}");
        }
    }
}

// EOF
