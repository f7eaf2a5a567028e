use crate::AppState;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use rgs_dto::SpinRequest;
use rgs_errors::ErrorCode;
use rgs_errors::GameError;
use rgs_rng::ProductionRng;

/// Liveness endpoint. Unauthenticated, no `X-Player-Id` requirement —
/// present in the original service's `app/main.py` and dropped by the
/// distilled spec, restored here per SUPPLEMENTED FEATURES.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

fn player_id(req: &HttpRequest) -> Result<String, GameError> {
    req.headers()
        .get("X-Player-Id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GameError::new(ErrorCode::InvalidRequest, "X-Player-Id header is required"))
}

fn error_response(err: &GameError, protocol_version: &str) -> HttpResponse {
    HttpResponse::build(
        actix_web::http::StatusCode::from_u16(err.status())
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
    )
    .json(err.to_body(protocol_version))
}

pub async fn init(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let player_id = match player_id(&req) {
        Ok(id) => id,
        Err(err) => return error_response(&err, &state.config.protocol_version),
    };
    let response = state.init_orchestrator.init(&player_id);
    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn missing_player_id_header_is_invalid_request() {
        let req = TestRequest::default().to_http_request();
        let err = player_id(&req).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn blank_player_id_header_is_invalid_request() {
        let req = TestRequest::default()
            .insert_header(("X-Player-Id", "   "))
            .to_http_request();
        assert!(player_id(&req).is_err());
    }

    #[test]
    fn present_player_id_header_is_trimmed() {
        let req = TestRequest::default()
            .insert_header(("X-Player-Id", "  player-42  "))
            .to_http_request();
        assert_eq!(player_id(&req).unwrap(), "player-42");
    }

    #[test]
    fn error_response_status_matches_error_code() {
        let err = GameError::new(ErrorCode::InvalidBet, "nope");
        let resp = error_response(&err, "1.0");
        assert_eq!(resp.status().as_u16(), 400);
    }
}

pub async fn spin(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SpinRequest>,
) -> impl Responder {
    let player_id = match player_id(&req) {
        Ok(id) => id,
        Err(err) => return error_response(&err, &state.config.protocol_version),
    };
    let mut rng = ProductionRng;
    match state
        .spin_orchestrator
        .process_spin(&player_id, &body, &mut rng)
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(&err, &state.config.protocol_version),
    }
}
