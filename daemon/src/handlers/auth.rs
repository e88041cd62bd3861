use crate::protocol::*;
use crate::state::DaemonState;

/// Check the token in an `auth` request.
pub fn check(request: &Request, state: &DaemonState) -> Result<AuthResult, ErrorResponse> {
    let params: AuthParams = parse_params(&request.params)
        .map_err(|e| ErrorResponse::new(request.id, INVALID_PARAMS, e))?;

    match &state.token {
        Some(expected) if params.token == *expected => Ok(AuthResult { ok: true }),
        Some(_) => Err(ErrorResponse::new(request.id, AUTH_FAILED, "Invalid token")),
        // Auth not required, always succeed
        None => Ok(AuthResult { ok: true }),
    }
}

pub fn handle(request: &Request, state: &DaemonState) -> Reply {
    match check(request, state) {
        Ok(result) => Reply::success(request.id, result),
        Err(e) => e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::state;
    use kale_rok_client::mock::MockRokClient;
    use serde_json::json;

    fn auth_request(params: serde_json::Value) -> Request {
        Request {
            id: 1,
            method: METHOD_AUTH.to_string(),
            params,
            trans_id: None,
        }
    }

    #[test]
    fn accepts_matching_token() {
        let state = state(Some("secret"), MockRokClient::new());
        let result = check(&auth_request(json!({"token": "secret"})), &state).expect("auth ok");
        assert!(result.ok);
    }

    #[test]
    fn rejects_wrong_token() {
        let state = state(Some("secret"), MockRokClient::new());
        let err = check(&auth_request(json!({"token": "guess"})), &state).unwrap_err();
        assert_eq!(err.error.code, AUTH_FAILED);
    }

    #[test]
    fn missing_token_is_invalid_params() {
        let state = state(Some("secret"), MockRokClient::new());
        let reply = handle(&auth_request(json!(null)), &state);
        assert!(reply.is_error());
        let value = serde_json::to_value(&reply).expect("serialize");
        assert_eq!(value["error"]["code"], json!(INVALID_PARAMS));
    }

    #[test]
    fn anything_goes_without_configured_token() {
        let state = state(None, MockRokClient::new());
        assert!(check(&auth_request(json!({"token": "x"})), &state).is_ok());
    }
}
