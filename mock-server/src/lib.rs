//! In-memory stand-in for the bit.ly 2.0.1 REST API.
//!
//! Serves `/shorten`, `/expand`, `/info`, `/stats` and `/errors` with the
//! service's envelope in JSON or XML, depending on the `format` query
//! parameter. Requests must carry `LOGIN` / `API_KEY`.

pub mod xml;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const LOGIN: &str = "testLogin";
pub const API_KEY: &str = "testApiKey";
pub const SHORT_DOMAIN: &str = "http://bit.ly/";

/// A shortened link and how often it was expanded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Link {
    pub hash: String,
    pub long_url: String,
    pub clicks: u64,
}

pub type Db = Arc<RwLock<HashMap<String, Link>>>;

type Params = Query<HashMap<String, String>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/shorten", get(shorten))
        .route("/expand", get(expand))
        .route("/info", get(info))
        .route("/stats", get(stats))
        .route("/errors", get(errors))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A service-level failure, reported inside a 200 response.
#[derive(Debug)]
struct Failure {
    code: i64,
    message: String,
}

impl Failure {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Shape of the `results` payload; `info` records are sent as `doc`
/// elements in XML.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Layout {
    Keyed,
    Docs,
}

fn respond(params: &HashMap<String, String>, layout: Layout, outcome: Result<Value, Failure>) -> Response {
    let (code, message, status, results) = match outcome {
        Ok(results) => (0, String::new(), "OK", results),
        Err(failure) => {
            tracing::info!(code = failure.code, message = %failure.message, "rejecting request");
            (failure.code, failure.message, "ERROR", Value::Null)
        }
    };

    if params.get("format").map(String::as_str) == Some("xml") {
        let body = xml::envelope(code, &message, status, &results, layout == Layout::Docs);
        ([(header::CONTENT_TYPE, "text/xml; charset=utf-8")], body).into_response()
    } else {
        let mut envelope = json!({
            "errorCode": code,
            "errorMessage": message,
            "statusCode": status,
        });
        if status == "OK" {
            envelope["results"] = results;
        }
        Json(envelope).into_response()
    }
}

fn authorize(params: &HashMap<String, String>, operation: &str) -> Result<(), Failure> {
    let login = params.get("login").map(String::as_str);
    let api_key = params.get("apiKey").map(String::as_str);
    if login == Some(LOGIN) && api_key == Some(API_KEY) {
        Ok(())
    } else {
        Err(Failure::new(
            203,
            format!("You must be authenticated to access {operation}"),
        ))
    }
}

/// Hash addressed by `hash` or `shortUrl`.
fn target_hash(params: &HashMap<String, String>) -> Result<String, Failure> {
    if let Some(hash) = params.get("hash") {
        return Ok(hash.clone());
    }
    params
        .get("shortUrl")
        .and_then(|url| url.rsplit('/').next())
        .filter(|hash| !hash.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Failure::new(201, "Missing parameter shortUrl or hash"))
}

fn unknown(hash: &str) -> Failure {
    Failure::new(1203, format!("No info available for requested document {hash}."))
}

async fn shorten(State(db): State<Db>, Query(params): Params) -> Response {
    let outcome = async {
        authorize(&params, "shorten")?;
        let long_url = params
            .get("longUrl")
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Failure::new(201, "Missing parameter longUrl"))?;

        let mut links = db.write().await;
        let existing = links.values().find(|l| &l.long_url == long_url).cloned();
        let link = match existing {
            Some(link) => link,
            None => {
                let hash = Uuid::new_v4().simple().to_string()[..6].to_string();
                let link = Link {
                    hash: hash.clone(),
                    long_url: long_url.clone(),
                    clicks: 0,
                };
                links.insert(hash, link.clone());
                link
            }
        };

        let short_url = format!("{SHORT_DOMAIN}{}", link.hash);
        Ok::<_, Failure>(json!({
            long_url.as_str(): {
                "hash": link.hash,
                "shortCNAMEUrl": short_url,
                "shortKeywordUrl": "",
                "shortUrl": short_url,
                "userHash": link.hash,
            }
        }))
    }
    .await;
    respond(&params, Layout::Keyed, outcome)
}

async fn expand(State(db): State<Db>, Query(params): Params) -> Response {
    let outcome = async {
        authorize(&params, "expand")?;
        let hash = target_hash(&params)?;
        let mut links = db.write().await;
        let link = links.get_mut(&hash).ok_or_else(|| unknown(&hash))?;
        link.clicks += 1;
        Ok::<_, Failure>(json!({ hash.as_str(): { "longUrl": link.long_url } }))
    }
    .await;
    respond(&params, Layout::Keyed, outcome)
}

async fn info(State(db): State<Db>, Query(params): Params) -> Response {
    let outcome = async {
        authorize(&params, "info")?;
        let hash = target_hash(&params)?;
        let links = db.read().await;
        let link = links.get(&hash).ok_or_else(|| unknown(&hash))?;

        let mut record = json!({
            "calais": [],
            "calaisId": "",
            "contentType": "text/html; charset=utf-8",
            "globalHash": link.hash,
            "hash": link.hash,
            "htmlTitle": "",
            "keywords": [],
            "longUrl": link.long_url,
            "shortenedByUser": LOGIN,
            "thumbnail": {
                "large": format!("http://s.bit.ly/bitly/{}/thumbnail_large.png", link.hash),
                "small": format!("http://s.bit.ly/bitly/{}/thumbnail_small.png", link.hash),
            },
            "userHash": link.hash,
            "users": [],
        });
        if let (Some(keys), Value::Object(fields)) = (params.get("keys"), &mut record) {
            let wanted: Vec<&str> = keys.split(',').map(str::trim).collect();
            fields.retain(|name, _| wanted.contains(&name.as_str()));
        }
        Ok::<_, Failure>(json!({ hash.as_str(): record }))
    }
    .await;
    respond(&params, Layout::Docs, outcome)
}

async fn stats(State(db): State<Db>, Query(params): Params) -> Response {
    let outcome = async {
        authorize(&params, "stats")?;
        let hash = target_hash(&params)?;
        let links = db.read().await;
        let link = links.get(&hash).ok_or_else(|| unknown(&hash))?;
        let referrers = if link.clicks > 0 {
            json!({ "": { "direct": link.clicks } })
        } else {
            json!({})
        };
        Ok::<_, Failure>(json!({
            "clicks": link.clicks,
            "hash": link.hash,
            "referrers": referrers,
        }))
    }
    .await;
    respond(&params, Layout::Keyed, outcome)
}

async fn errors(Query(params): Params) -> Response {
    let outcome = authorize(&params, "errors").map(|()| {
        json!([
            {"errorCode": 201, "errorMessage": "Missing parameter", "statusCode": "ERROR"},
            {"errorCode": 203, "errorMessage": "You must be authenticated to access this method", "statusCode": "ERROR"},
            {"errorCode": 1203, "errorMessage": "No info available for requested document", "statusCode": "ERROR"},
        ])
    });
    respond(&params, Layout::Keyed, outcome)
}
