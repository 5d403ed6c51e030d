//! Conversion of dispatch results into IPC responses.

use resolar_auth::AuthError;
use resolar_dispatch::{DispatchError, DispatchResult, Outcome};
use resolar_ipc::{error_codes, Request, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Deserialize request params, or produce the INVALID_PARAMS response.
pub fn parse_params<T: DeserializeOwned>(req: &Request) -> Result<T, Response> {
    req.params_as().map_err(|e| {
        Response::error(
            &req.id,
            error_codes::INVALID_PARAMS,
            &format!("Invalid parameters: {}", e),
        )
    })
}

/// Map a dispatch result onto a response.
///
/// Success carries the whole [`Outcome`], so `data: null` and a missing
/// `data` stay distinct for the client. Errors that require a new login
/// carry `data.shouldRelogin = true`.
pub fn respond(id: &str, result: DispatchResult) -> Response {
    match result {
        Ok(data) => match serde_json::to_value(Outcome::success(data)) {
            Ok(outcome) => Response::success(id, outcome),
            Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, &e.to_string()),
        },
        Err(e) => error_response(id, &e),
    }
}

fn error_response(id: &str, err: &DispatchError) -> Response {
    let message = err.to_string();
    if err.should_relogin() {
        return Response::error_with_data(
            id,
            error_codes::NOT_AUTHENTICATED,
            &message,
            json!({ "shouldRelogin": true }),
        );
    }
    match err {
        DispatchError::Http { status, .. } => Response::error_with_data(
            id,
            error_codes::HTTP_ERROR,
            &message,
            json!({ "status": status }),
        ),
        DispatchError::Auth(AuthError::Storage(_) | AuthError::Transport(_)) => {
            Response::error(id, error_codes::INTERNAL_ERROR, &message)
        }
        DispatchError::Auth(_) => Response::error(id, error_codes::NOT_AUTHENTICATED, &message),
        DispatchError::ContentUnavailable(_) => {
            Response::error(id, error_codes::CONTENT_UNAVAILABLE, &message)
        }
        DispatchError::InvalidParams(_) => {
            Response::error(id, error_codes::INVALID_PARAMS, &message)
        }
        _ => Response::error(id, error_codes::INTERNAL_ERROR, &message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resolar_auth::TransportError;
    use resolar_ipc::Method;
    use serde_json::Value;

    #[test]
    fn test_success_carries_outcome() {
        let response = respond("1", Ok(None));
        assert!(response.is_success());
        assert_eq!(response.result, Some(json!({"success": true})));

        let response = respond("1", Ok(Some(Value::Null)));
        assert_eq!(response.result, Some(json!({"success": true, "data": null})));

        let response = respond("1", Ok(Some(json!([{"id": 1, "name": "Math"}]))));
        assert_eq!(response.result.unwrap()["data"][0]["name"], "Math");
    }

    #[test]
    fn test_null_data_survives_the_wire() {
        let wire = respond("7", Ok(Some(Value::Null))).to_json().unwrap();
        let response = Response::from_json(&wire).unwrap();

        let outcome: Outcome = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(outcome, Outcome::success(Some(Value::Null)));
    }

    #[test]
    fn test_relogin_errors() {
        for err in [
            DispatchError::NoToken,
            DispatchError::NoCredentials,
            DispatchError::SessionExpired,
        ] {
            let response = respond("1", Err(err));
            let error = response.error.unwrap();
            assert_eq!(error.code, error_codes::NOT_AUTHENTICATED);
            assert!(error.should_relogin());
        }
    }

    #[test]
    fn test_error_codes() {
        let http = respond(
            "1",
            Err(DispatchError::Http {
                status: 404,
                message: "HTTP 404".into(),
            }),
        )
        .error
        .unwrap();
        assert_eq!(http.code, error_codes::HTTP_ERROR);
        assert_eq!(http.data, Some(json!({"status": 404})));
        assert!(!http.should_relogin());

        let login = respond("1", Err(DispatchError::Auth(AuthError::Rejected("nope".into()))))
            .error
            .unwrap();
        assert_eq!(login.code, error_codes::NOT_AUTHENTICATED);
        assert_eq!(login.message, "nope");
        assert!(!login.should_relogin());

        let content = respond("1", Err(DispatchError::ContentUnavailable("empty".into())))
            .error
            .unwrap();
        assert_eq!(content.code, error_codes::CONTENT_UNAVAILABLE);

        let transport = respond(
            "1",
            Err(DispatchError::Transport(TransportError::Unavailable(
                "offline".into(),
            ))),
        )
        .error
        .unwrap();
        assert_eq!(transport.code, error_codes::INTERNAL_ERROR);
    }

    #[test]
    fn test_parse_params_error() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Needs {
            name: String,
        }

        let req = Request::with_params(Method::SubjectsAdd, json!({"title": "x"}));
        let response = parse_params::<Needs>(&req).unwrap_err();
        assert_eq!(response.id, req.id);
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }
}
