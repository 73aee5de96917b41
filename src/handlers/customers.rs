use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info, instrument};

use super::response::{respond_error, respond_validation_failed, MSG_UNKNOWN};
use crate::models::{
    CreateCustomerRequest, RepositoryError, Rule, RuleError, ServiceError, ValidationErrors,
    Validator,
};
use crate::services::CustomerService;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Longest password accepted at sign-up. Bounded so the bcrypt work stays
/// bounded too.
pub const MAX_PASSWORD_LENGTH: usize = 256;

const MSG_USERNAME_TAKEN: &str = "customers already exists with the given username";

/// Shared state for the customer handlers.
#[derive(Clone)]
pub struct ApiState {
    pub customer_service: CustomerService,
}

pub fn routes(state: ApiState) -> Router {
    Router::new()
        .route("/customers", post(create_customer))
        .with_state(state)
}

/// `POST /customers` registers a new customer.
///
/// Responds 201 with an empty body on success, 400 with per-field messages
/// on validation failure, and 500 when a collaborator fails. The uniqueness
/// check only runs once the username passes its format rules, so "cannot be
/// blank" is never shadowed by "already exists".
#[instrument(skip(state, request))]
pub async fn create_customer(
    State(state): State<ApiState>,
    request: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(json) => json,
        Err(rejection) => {
            return respond_error(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let validation = Validator::new()
        .field(
            "username",
            &request.username,
            vec![Rule::Required, Rule::Email],
        )
        .field(
            "password",
            &request.password,
            vec![
                Rule::Required,
                Rule::length(MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH),
            ],
        );

    let mut errors = match validation.finish() {
        Ok(errors) => errors,
        Err(internal) => {
            error!(error = %internal, "Validation could not be evaluated");
            return respond_error(StatusCode::INTERNAL_SERVER_ERROR, MSG_UNKNOWN);
        }
    };

    if !errors.contains_key("username") {
        let taken = match state.customer_service.username_taken(&request.username).await {
            Ok(taken) => taken,
            Err(service_error) => {
                error!(error = %service_error, "Username lookup failed");
                return respond_error(StatusCode::INTERNAL_SERVER_ERROR, MSG_UNKNOWN);
            }
        };

        let uniqueness = Validator::new()
            .field(
                "username",
                &request.username,
                vec![Rule::custom(move |_value| {
                    if taken {
                        Err(RuleError::Invalid(MSG_USERNAME_TAKEN.to_string()))
                    } else {
                        Ok(())
                    }
                })],
            )
            .finish();

        match uniqueness {
            Ok(uniqueness_errors) => errors.extend(uniqueness_errors),
            Err(internal) => {
                error!(error = %internal, "Validation could not be evaluated");
                return respond_error(StatusCode::INTERNAL_SERVER_ERROR, MSG_UNKNOWN);
            }
        }
    }

    if !errors.is_empty() {
        return respond_validation_failed(errors);
    }

    match state
        .customer_service
        .create(&request.username, &request.password)
        .await
    {
        Ok(customer) => {
            info!(customer_id = %customer.id(), "Customer registered");
            respond_created()
        }
        // Lost a race with a concurrent sign-up for the same username: the
        // uniqueness check passed but the insert hit the constraint.
        Err(ServiceError::Repository {
            source: RepositoryError::ConstraintViolation { .. },
        }) => {
            let mut errors = ValidationErrors::new();
            errors.insert("username".to_string(), MSG_USERNAME_TAKEN.to_string());
            respond_validation_failed(errors)
        }
        Err(service_error) => {
            error!(error = %service_error, "Customer creation failed");
            respond_error(StatusCode::INTERNAL_SERVER_ERROR, MSG_UNKNOWN)
        }
    }
}

fn respond_created() -> Response {
    (StatusCode::CREATED, Body::empty()).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::models::Customer;
    use crate::repositories::MockCustomerRepository;

    fn app_with(repository: MockCustomerRepository) -> Router {
        let state = ApiState {
            customer_service: CustomerService::new(Arc::new(repository)),
        };
        routes(state)
    }

    fn post_customers(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/customers")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_request_creates_customer() {
        let mut repository = MockCustomerRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Ok(None));
        repository.expect_add().times(1).returning(|_| Ok(()));

        let response = app_with(repository)
            .oneshot(post_customers(
                r#"{"username": "jane@example.com", "password": "super-secret"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_reports_blank_fields() {
        let response = app_with(MockCustomerRepository::new())
            .oneshot(post_customers("{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({
                "error": {
                    "message": "request contains invalid fields",
                    "validation_errors": {
                        "username": "cannot be blank",
                        "password": "cannot be blank"
                    }
                }
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_email_and_short_password() {
        let response = app_with(MockCustomerRepository::new())
            .oneshot(post_customers(
                r#"{"username": "not-an-email", "password": "short"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json["error"]["validation_errors"]["username"],
            "must be a valid email address"
        );
        assert_eq!(
            json["error"]["validation_errors"]["password"],
            "the length must be between 6 and 256"
        );
    }

    #[tokio::test]
    async fn test_taken_username_is_rejected() {
        let mut repository = MockCustomerRepository::new();
        repository.expect_find_by_username().returning(|username| {
            Ok(Some(Customer::restore(
                uuid::Uuid::new_v4(),
                username.to_string(),
                "$2b$12$hash".to_string(),
            )))
        });

        let response = app_with(repository)
            .oneshot(post_customers(
                r#"{"username": "jane@example.com", "password": "super-secret"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json["error"]["validation_errors"]["username"],
            "customers already exists with the given username"
        );
    }

    #[tokio::test]
    async fn test_blank_username_skips_uniqueness_lookup() {
        // No expectation on find_by_username: reaching it would panic.
        let response = app_with(MockCustomerRepository::new())
            .oneshot(post_customers(r#"{"password": "super-secret"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json["error"]["validation_errors"]["username"],
            "cannot be blank"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_bad_request() {
        let response = app_with(MockCustomerRepository::new())
            .oneshot(post_customers("{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"]["message"].is_string());
        assert!(json["error"].get("validation_errors").is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_is_an_internal_error() {
        let mut repository = MockCustomerRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Err(RepositoryError::Database {
                source: sqlx::Error::PoolClosed,
            }));

        let response = app_with(repository)
            .oneshot(post_customers(
                r#"{"username": "jane@example.com", "password": "super-secret"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "unknown error");
    }

    #[tokio::test]
    async fn test_insert_race_reports_taken_username() {
        let mut repository = MockCustomerRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Ok(None));
        repository.expect_add().returning(|_| {
            Err(RepositoryError::ConstraintViolation {
                message: "customers_username_key".to_string(),
            })
        });

        let response = app_with(repository)
            .oneshot(post_customers(
                r#"{"username": "jane@example.com", "password": "super-secret"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json["error"]["validation_errors"]["username"],
            "customers already exists with the given username"
        );
    }
}
