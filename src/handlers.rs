// src/handlers.rs
use crate::{
    AppState,
    catalog::currency_for_country,
    config::Config,
    errors::StyleSeerError,
    flows::{self, ComplementaryRequest, FlowLog, RecommendationRequest},
    models::*,
    services::image_processor::DataUri,
    session::{SessionEvent, SessionState},
};
use actix_multipart::Multipart;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, ResponseError, dev, web};
use bytes::BytesMut;
use futures_util::TryStreamExt;
use futures_util::future::{Ready, ready};
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// Longest edge of an uploaded photo before it is sent to the vision model.
pub const MAX_IMAGE_EDGE: u32 = 2048;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api/v1")
            .route("/analyze", web::post().to(analyze))
            .route("/upload", web::post().to(upload_images))
            .route("/closet/analyze", web::post().to(analyze_closet))
            .route("/recommendations", web::post().to(recommendations))
            .route("/complementary", web::post().to(complementary))
            .route("/brands/from-tags", web::post().to(brands_from_tags))
            .route("/history/{mode}", web::get().to(get_history))
            .route(
                "/history/{mode}/preference",
                web::put().to(set_history_preference),
            )
            .route("/currency", web::get().to(currency)),
    );
}

pub const SESSION_HEADER: &str = "x-session-id";

/// Who a history belongs to, taken from the `X-Session-Id` request header.
/// Requests without one get a fresh id, echoed back so the client can reuse it.
#[derive(Debug, Clone)]
pub struct ClientId(String);

impl ClientId {
    pub fn parse(raw: &str) -> Result<Self, StyleSeerError> {
        let valid = !raw.is_empty()
            && raw.len() <= 64
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(StyleSeerError::Validation(format!(
                "{} must be 1-64 letters, digits, '-' or '_'",
                SESSION_HEADER
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn tag(&self, mut resp: HttpResponse) -> HttpResponse {
        if let Ok(value) = HeaderValue::from_str(&self.0) {
            resp.headers_mut()
                .insert(HeaderName::from_static(SESSION_HEADER), value);
        }
        resp
    }
}

impl FromRequest for ClientId {
    type Error = StyleSeerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let client = match req.headers().get(SESSION_HEADER) {
            Some(value) => value
                .to_str()
                .map_err(|_| StyleSeerError::Validation(format!("{} is not text", SESSION_HEADER)))
                .and_then(ClientId::parse),
            None => Ok(ClientId(Uuid::new_v4().to_string())),
        };
        ready(client)
    }
}

/// JSON bodies carry base64 photos, so the limit follows the upload limits.
pub fn json_config(config: &Config) -> web::JsonConfig {
    let limit = config.max_upload_bytes() * config.max_closet_images.max(1) * 2;
    web::JsonConfig::default().limit(limit)
}

/// Downgrades a top-level failure to a user-visible message.
fn failed(mut session: SessionState, err: StyleSeerError) -> HttpResponse {
    error!("{}: {}", err.label(), err);
    session.apply(SessionEvent::Failed {
        message: err.to_string(),
    });
    HttpResponse::build(err.status_code()).json(json!({
        "error": err.label(),
        "message": err.to_string(),
        "session": session
    }))
}

fn started(message: &str) -> SessionState {
    let mut session = SessionState::new();
    session.apply(SessionEvent::Started {
        message: message.to_string(),
    });
    session
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "styleseer",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn analyze(
    client: ClientId,
    data: web::Data<AppState>,
    body: web::Json<AnalyzeRequest>,
) -> HttpResponse {
    let AnalyzeRequest {
        photo_data_uri,
        config,
    } = body.into_inner();
    let mut session = started("Analyzing your image...");

    if let Err(e) = DataUri::parse(&photo_data_uri) {
        return client.tag(failed(session, e));
    }

    let mut log = FlowLog::new();
    let result =
        flows::analyze_image(data.llm_service.as_ref(), &photo_data_uri, &config, &mut log)
            .await;
    session.apply(SessionEvent::Logged(log.into_entries()));

    let Some(result) = result else {
        return client.tag(failed(
            session,
            StyleSeerError::EmptyResult("The analysis returned no result.".to_string()),
        ));
    };

    let history = data
        .history_service
        .record(
            client.as_str(),
            HistoryMode::Single,
            HistoryEntry::new(vec![photo_data_uri], HistoryRecord::Single(result.clone())),
        )
        .await;

    session.apply(SessionEvent::Succeeded);
    client.tag(HttpResponse::Ok().json(json!({
        "analysisResult": result,
        "history": history,
        "session": session
    })))
}

/// Turns multipart photos into data URIs after checking type, size and count.
pub async fn upload_images(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let max_bytes = data.config.max_upload_bytes();
    let mut photo_data_uris = Vec::new();

    while let Some(mut field) = payload.try_next().await? {
        if photo_data_uris.len() >= data.config.max_closet_images {
            return Err(StyleSeerError::Validation(format!(
                "At most {} images can be uploaded at once",
                data.config.max_closet_images
            ))
            .into());
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("unnamed")
            .to_string();

        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        if !content_type.starts_with("image/") {
            return Err(StyleSeerError::Validation(format!(
                "{} is not an image ({})",
                filename, content_type
            ))
            .into());
        }

        let mut image_data = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            if image_data.len() + chunk.len() > max_bytes {
                return Err(StyleSeerError::Validation(format!(
                    "{} is larger than {} MB",
                    filename, data.config.max_upload_mb
                ))
                .into());
            }
            image_data.extend_from_slice(&chunk);
        }

        let decoded = data.image_processor.validate_image(&image_data)?;

        let (processed, mime_type) = data.image_processor.resize_if_needed(
            &decoded,
            &image_data,
            &content_type,
            MAX_IMAGE_EDGE,
        )?;

        info!("Accepted upload {} ({} bytes)", filename, processed.len());
        photo_data_uris.push(data.image_processor.to_data_uri(&processed, &mime_type));
    }

    Ok(HttpResponse::Ok().json(json!({
        "photoDataUris": photo_data_uris,
        "count": photo_data_uris.len()
    })))
}

pub async fn analyze_closet(
    client: ClientId,
    data: web::Data<AppState>,
    body: web::Json<ClosetAnalyzeRequest>,
) -> HttpResponse {
    let ClosetAnalyzeRequest {
        photo_data_uris,
        config,
    } = body.into_inner();
    let mut session = started("Analyzing your closet...");

    if photo_data_uris.len() > data.config.max_closet_images {
        return client.tag(failed(
            session,
            StyleSeerError::Validation(format!(
                "At most {} closet images can be analyzed at once",
                data.config.max_closet_images
            )),
        ));
    }

    let mut log = FlowLog::new();
    let outcome =
        flows::analyze_closet(data.llm_service.as_ref(), &photo_data_uris, &config, &mut log)
            .await;
    session.apply(SessionEvent::Logged(log.into_entries()));

    let resp = match outcome {
        Ok(closet) => {
            let history = data
                .history_service
                .record(
                    client.as_str(),
                    HistoryMode::Closet,
                    HistoryEntry::new(photo_data_uris, HistoryRecord::Closet(closet.clone())),
                )
                .await;

            session.apply(SessionEvent::Succeeded);
            HttpResponse::Ok().json(json!({
                "closetAnalysis": closet,
                "history": history,
                "session": session
            }))
        }
        Err(e) => failed(session, e),
    };
    client.tag(resp)
}

pub async fn recommendations(
    data: web::Data<AppState>,
    body: web::Json<RecommendRequest>,
) -> HttpResponse {
    let request = RecommendationRequest::from_api(body.into_inner());
    let mut session = started("Finding similar items...");

    match flows::recommend(data.affiliate_service.as_ref(), &request).await {
        Ok(found) => {
            if found.recommended_items.is_empty() {
                warn!("No recommendations for brands {:?}", request.brands);
            }
            session.apply(SessionEvent::Logged(found.logs));
            session.apply(SessionEvent::Succeeded);
            HttpResponse::Ok().json(json!({
                "recommendedItems": found.recommended_items,
                "session": session
            }))
        }
        Err(e) => failed(session, e),
    }
}

pub async fn complementary(
    data: web::Data<AppState>,
    body: web::Json<crate::models::ComplementaryRequest>,
) -> HttpResponse {
    let request = ComplementaryRequest::from(body.into_inner());
    let mut session = started("Finding items that go with your closet...");
    let mut rng = StdRng::from_entropy();

    match flows::find_complementary(data.affiliate_service.as_ref(), &request, &mut rng).await {
        Ok(found) => {
            session.apply(SessionEvent::Logged(found.logs));
            session.apply(SessionEvent::Succeeded);
            HttpResponse::Ok().json(json!({
                "complementaryItems": found.complementary_items,
                "session": session
            }))
        }
        Err(e) => failed(session, e),
    }
}

/// Brand picks for free-form tags. A failed model call yields `null` brands.
pub async fn brands_from_tags(
    data: web::Data<AppState>,
    body: web::Json<BrandsFromTagsRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    let mut session = started("Recommending brands...");

    let brands = match data
        .llm_service
        .recommend_brands(&request.tags, request.include_lingerie)
        .await
    {
        Ok(brands) => {
            session.apply(SessionEvent::Succeeded);
            Some(brands)
        }
        Err(e) => {
            error!("Error recommending brands from tags: {}", e);
            session.apply(SessionEvent::Failed {
                message: "Could not recommend brands for these tags.".to_string(),
            });
            None
        }
    };

    HttpResponse::Ok().json(json!({
        "recommendedBrands": brands,
        "session": session
    }))
}

async fn history_view(data: &AppState, client: &ClientId, mode: HistoryMode) -> HttpResponse {
    let history = &data.history_service;
    client.tag(HttpResponse::Ok().json(json!({
        "mode": mode,
        "saveHistory": history.save_enabled(client.as_str(), mode).await,
        "entries": history.entries(client.as_str(), mode).await
    })))
}

pub async fn get_history(
    client: ClientId,
    path: web::Path<HistoryMode>,
    data: web::Data<AppState>,
) -> HttpResponse {
    history_view(&data, &client, path.into_inner()).await
}

pub async fn set_history_preference(
    client: ClientId,
    path: web::Path<HistoryMode>,
    data: web::Data<AppState>,
    body: web::Json<HistoryPreferenceRequest>,
) -> Result<HttpResponse, StyleSeerError> {
    let mode = path.into_inner();
    data.history_service
        .set_save_enabled(client.as_str(), mode, body.enabled)
        .await?;
    info!("{} history saving set to {}", mode.as_str(), body.enabled);

    Ok(history_view(&data, &client, mode).await)
}

#[derive(Debug, Deserialize)]
pub struct CurrencyQuery {
    #[serde(default)]
    pub country: Option<String>,
}

pub async fn currency(query: web::Query<CurrencyQuery>) -> HttpResponse {
    let country = query
        .country
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| flows::recommend::DEFAULT_COUNTRY.to_string());

    HttpResponse::Ok().json(json!({
        "currency": currency_for_country(&country),
        "country": country
    }))
}
