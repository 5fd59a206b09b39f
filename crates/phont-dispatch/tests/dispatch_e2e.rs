//! End-to-end dispatch scenarios: a controller running a use case against
//! in-memory collaborators, observed through recording test doubles.

use futures_util::future::join_all;
use http::StatusCode;
use phont_core::contracts::{
    FoundUser, GenerateJwtParameters, GenerateJwtTokenProvider, JwtToken, ValidateEmailParameters,
    ValidateEmailResult, ValidateEmailUsersRepository,
};
use phont_core::{
    failure, success, DomainError, EmailNotFoundError, HttpRequest, HttpResponseError,
    HttpResponseSuccess, HttpStatusMapper, InvalidPasswordLengthError, LoggingContext, Outcome,
    ProviderError, ProviderName, ResponseBuilder, ResponseHeaderValue, StatusError, StatusSuccess,
    TokenProviderMethod,
};
use phont_dispatch::{
    ControllerDispatcher, ControllerOutcome, RestController, UseCase, UseCaseExecutor,
};
use phont_test::{
    FailingIdGenerator, FixedIdGenerator, LogCall, RecordingLogger, RecordingStatusMapper,
    TestHttpRequest, TestRequest, Timeline,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// A scripted controller
// ---------------------------------------------------------------------------

/// Reacts to `body.mode`.
struct ScriptedController;

impl RestController for ScriptedController {
    type Request = TestHttpRequest;
    type Failure = HttpResponseError;
    type Success = Value;

    async fn perform_operation(
        &self,
        request: &TestHttpRequest,
        _context: &LoggingContext,
    ) -> anyhow::Result<ControllerOutcome<HttpResponseError, Value>> {
        match request.body["mode"].as_str() {
            Some("not_found") => Ok(failure(HttpResponseError::new(
                "User 42 does not exist",
                StatusError::NotFound,
            ))),
            Some("boom") => Err(anyhow::anyhow!("boom")),
            Some("panic") => panic!("handler exploded"),
            Some("panic_json") => std::panic::panic_any(json!({ "message": "from payload" })),
            Some("panic_opaque") => std::panic::panic_any(17_u64),
            _ => Ok(success(HttpResponseSuccess::ok(json!({ "id": 42, "name": "Ada" })))),
        }
    }
}

fn scripted(logger: &Arc<RecordingLogger>) -> ControllerDispatcher<ScriptedController> {
    ControllerDispatcher::new(ScriptedController, logger.clone())
}

#[tokio::test]
async fn test_success_with_inbound_request_id() {
    let logger = Arc::new(RecordingLogger::new());
    let dispatcher = scripted(&logger);
    let request = TestRequest::empty().request_id("abc-123").build();

    let response = dispatcher.handle(request).await;

    assert_eq!(response.status_code, StatusCode::OK);
    let body = serde_json::to_value(&response.data).expect("serializable");
    assert_eq!(body["success"], json!({ "id": 42, "name": "Ada" }));
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
    assert_eq!(
        response.headers.get("X-Powered-By"),
        Some(&ResponseHeaderValue::from("PHONT"))
    );

    let timings = logger.controller_timings();
    assert_eq!(timings.len(), 1);
    assert!(timings[0].is_success);
    assert_eq!(timings[0].context.correlation_id.as_str(), "abc-123");
    assert_eq!(timings[0].context.operation_name, "ScriptedController");
    assert_eq!(timings[0].context.method_name, "handle");
    assert!(logger.errors().is_empty());
}

#[tokio::test]
async fn test_declared_failure_uses_generated_request_id() {
    let logger = Arc::new(RecordingLogger::new());
    let generator = Arc::new(FixedIdGenerator::new("generated-7"));
    let dispatcher = ControllerDispatcher::builder(ScriptedController, logger.clone())
        .id_generator(generator.clone())
        .build();
    let request = TestRequest::json(&json!({ "mode": "not_found" })).build();

    let response = dispatcher.handle(request).await;

    assert_eq!(response.status_code, StatusCode::NOT_FOUND);
    let body = serde_json::to_value(&response.data).expect("serializable");
    assert_eq!(body["error"], json!({ "message": "User 42 does not exist" }));
    assert_eq!(body["status"], "NOT_FOUND");
    assert_eq!(generator.call_count(), 1);

    let errors = logger.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "ScriptedController.handle() error [RequestID: generated-7]"
    );
    assert_eq!(errors[0].context.correlation_id.as_str(), "generated-7");
    let timings = logger.controller_timings();
    assert!(!timings[0].is_success);
    assert_eq!(timings[0].context.correlation_id.as_str(), "generated-7");
}

#[tokio::test]
async fn test_fault_is_logged_before_the_response_is_built() {
    let timeline = Timeline::new();
    let logger = Arc::new(RecordingLogger::with_timeline(timeline.clone()));
    let mapper = Arc::new(RecordingStatusMapper::with_timeline(timeline.clone()));
    let dispatcher = ControllerDispatcher::builder(ScriptedController, logger.clone())
        .response_builder(Arc::new(ResponseBuilder::create_default(mapper)))
        .build();
    let request = TestRequest::json(&json!({ "mode": "boom" })).request_id("r-1").build();

    let response = dispatcher.handle(request).await;

    assert_eq!(response.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    let error = response.data.error().expect("error envelope");
    assert_eq!(error.message(), "boom");
    assert_eq!(error.status, StatusError::InternalError);

    let logged = timeline.position("send_log_error").expect("error was logged");
    let built = timeline
        .position("map_to_http_status_code")
        .expect("response was built");
    assert!(logged < built, "timeline: {:?}", timeline.events());
    assert_eq!(
        timeline.events().last().map(String::as_str),
        Some("send_log_time_controller")
    );
}

#[tokio::test]
async fn test_panics_become_internal_errors() {
    let logger = Arc::new(RecordingLogger::new());
    let dispatcher = scripted(&logger);

    let cases = [
        ("panic", "handler exploded"),
        ("panic_json", "from payload"),
        ("panic_opaque", "An unexpected error occurred"),
    ];
    for (mode, message) in cases {
        let response = dispatcher
            .handle(TestRequest::json(&json!({ "mode": mode })).build())
            .await;
        assert_eq!(response.status_code, StatusCode::INTERNAL_SERVER_ERROR, "{mode}");
        assert_eq!(
            response.data.error().map(HttpResponseError::message),
            Some(message),
            "{mode}"
        );
    }

    assert_eq!(logger.errors().len(), 3);
    assert_eq!(logger.controller_timings().len(), 3);
}

#[tokio::test]
async fn test_generator_failure_still_answers() {
    let logger = Arc::new(RecordingLogger::new());
    let dispatcher = ControllerDispatcher::builder(ScriptedController, logger.clone())
        .id_generator(Arc::new(FailingIdGenerator::new()))
        .build();

    let response = dispatcher.handle(TestRequest::empty().build()).await;

    assert_eq!(response.status_code, StatusCode::OK);
    let timings = logger.controller_timings();
    assert_eq!(timings[0].context.correlation_id.as_str().len(), 36);
}

#[tokio::test]
async fn test_exactly_one_response_and_timing_per_call() {
    let logger = Arc::new(RecordingLogger::new());
    let dispatcher = scripted(&logger);

    let modes = ["ok", "not_found", "boom", "panic", "ok"];
    let responses = join_all(modes.iter().enumerate().map(|(index, mode)| {
        dispatcher.handle(
            TestRequest::json(&json!({ "mode": mode }))
                .request_id(format!("req-{index}"))
                .build(),
        )
    }))
    .await;

    assert_eq!(responses.len(), modes.len());
    let mut ids: Vec<String> = logger
        .controller_timings()
        .into_iter()
        .map(|entry| entry.context.correlation_id.into_inner())
        .collect();
    ids.sort();
    assert_eq!(ids, ["req-0", "req-1", "req-2", "req-3", "req-4"]);
}

// ---------------------------------------------------------------------------
// Sign-in: controller -> use case -> repository + token provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
struct SignInBody {
    email: String,
    password: String,
}

struct InMemoryUsers {
    users: Vec<FoundUser>,
}

impl ValidateEmailUsersRepository for InMemoryUsers {
    async fn validate_email(
        &self,
        parameters: &ValidateEmailParameters,
    ) -> Outcome<DomainError, ValidateEmailResult> {
        let found_user = self
            .users
            .iter()
            .find(|user| user.email == parameters.email)
            .cloned();
        success(ValidateEmailResult { found_user })
    }
}

struct StaticTokens {
    available: bool,
}

impl GenerateJwtTokenProvider for StaticTokens {
    fn generate_jwt(&self, parameters: &GenerateJwtParameters) -> Outcome<ProviderError, JwtToken> {
        if self.available {
            success(JwtToken {
                jwt_token: format!("jwt-for-{}", parameters.user_id),
            })
        } else {
            failure(
                ProviderError::new(
                    ProviderName::Token,
                    TokenProviderMethod::GenerateJwt,
                    "signing key missing",
                )
                .with_external_name("jsonwebtoken"),
            )
        }
    }
}

struct SignInUseCase {
    users: InMemoryUsers,
    tokens: StaticTokens,
}

impl UseCase for SignInUseCase {
    type Parameters = SignInBody;
    type Failure = DomainError;
    type Success = JwtToken;

    async fn perform_operation(
        &self,
        parameters: &SignInBody,
    ) -> anyhow::Result<Outcome<DomainError, JwtToken>> {
        let lookup = ValidateEmailParameters {
            email: parameters.email.clone(),
        };
        let found_user = match self.users.validate_email(&lookup).await {
            Outcome::Success(result) => result.found_user,
            Outcome::Failure(error) => return Ok(failure(error)),
        };
        let Some(user) = found_user else {
            return Ok(failure(EmailNotFoundError::new(&parameters.email).into()));
        };
        if parameters.password.len() < 8 {
            return Ok(failure(
                InvalidPasswordLengthError::new(parameters.password.len()).into(),
            ));
        }

        let token = self.tokens.generate_jwt(&GenerateJwtParameters { user_id: user.id });
        Ok(token.map_failure(DomainError::from))
    }
}

struct SignInController {
    executor: UseCaseExecutor<SignInUseCase>,
}

impl RestController for SignInController {
    type Request = HttpRequest<SignInBody>;
    type Failure = DomainError;
    type Success = JwtToken;

    async fn perform_operation(
        &self,
        request: &HttpRequest<SignInBody>,
        context: &LoggingContext,
    ) -> anyhow::Result<ControllerOutcome<DomainError, JwtToken>> {
        let use_case_context = self.executor.logging_context(context.correlation_id.clone());
        let outcome = self.executor.execute(&request.body, &use_case_context).await?;
        Ok(outcome.map(|token| HttpResponseSuccess::new(token, StatusSuccess::Ok)))
    }
}

fn sign_in(tokens_available: bool) -> (ControllerDispatcher<SignInController>, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::new());
    let use_case = SignInUseCase {
        users: InMemoryUsers {
            users: vec![FoundUser {
                id: "user-1".to_string(),
                email: "ada@example.com".to_string(),
            }],
        },
        tokens: StaticTokens {
            available: tokens_available,
        },
    };
    let controller = SignInController {
        executor: UseCaseExecutor::new(use_case, logger.clone()),
    };
    let dispatcher = ControllerDispatcher::builder(controller, logger.clone())
        .response_builder(Arc::new(ResponseBuilder::create_minimal(Arc::new(
            HttpStatusMapper::new(),
        ))))
        .build();
    (dispatcher, logger)
}

fn sign_in_request(email: &str, password: &str) -> HttpRequest<SignInBody> {
    HttpRequest::new(SignInBody {
        email: email.to_string(),
        password: password.to_string(),
    })
    .with_header(
        http::HeaderName::from_static("x-request-id"),
        http::HeaderValue::from_static("sign-in-1"),
    )
}

#[tokio::test]
async fn test_sign_in_success() {
    let (dispatcher, logger) = sign_in(true);

    let response = dispatcher
        .handle(sign_in_request("ada@example.com", "correct horse"))
        .await;

    assert_eq!(response.status_code, StatusCode::OK);
    let envelope = response.data.success().expect("success envelope");
    assert_eq!(envelope.success.jwt_token, "jwt-for-user-1");

    let calls = logger.calls();
    assert_eq!(calls.len(), 2);
    let LogCall::UseCaseTiming(use_case) = &calls[0] else {
        panic!("use case timing must come first: {calls:?}");
    };
    assert_eq!(use_case.use_case_name, "SignInUseCase");
    assert_eq!(use_case.context.method_name, "execute");
    assert_eq!(use_case.context.correlation_id.as_str(), "sign-in-1");
    assert!(use_case.is_success);

    let LogCall::ControllerTiming(controller) = &calls[1] else {
        panic!("controller timing must come last: {calls:?}");
    };
    assert_eq!(controller.controller_name, "SignInController");
    assert!(controller.http_request.contains("[REDACTED]"));
    assert!(!controller.http_request.contains("correct horse"));
    assert!(controller.http_request.contains("ada@example.com"));
}

#[tokio::test]
async fn test_sign_in_unknown_email() {
    let (dispatcher, logger) = sign_in(true);

    let response = dispatcher
        .handle(sign_in_request("grace@example.com", "correct horse"))
        .await;

    assert_eq!(response.status_code, StatusCode::NOT_FOUND);
    let error = response.data.error().expect("error envelope");
    assert_eq!(error.message(), "The email grace@example.com was not found.");
    assert_eq!(error.status, StatusError::NotFound);

    let errors = logger.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "SignInController.handle() error [RequestID: sign-in-1]"
    );
    let use_case = &logger.use_case_timings()[0];
    assert!(!use_case.is_success);
}

#[tokio::test]
async fn test_sign_in_short_password() {
    let (dispatcher, _) = sign_in(true);

    let response = dispatcher.handle(sign_in_request("ada@example.com", "short")).await;

    assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.data.error().map(HttpResponseError::message),
        Some("Invalid password length: 5")
    );
}

#[tokio::test]
async fn test_sign_in_provider_failure() {
    let (dispatcher, _) = sign_in(false);

    let response = dispatcher
        .handle(sign_in_request("ada@example.com", "correct horse"))
        .await;

    assert_eq!(response.status_code, StatusCode::BAD_GATEWAY);
    let error = response.data.error().expect("error envelope");
    assert_eq!(error.status, StatusError::ProviderError);
    assert!(error
        .message()
        .starts_with("Error in token provider in generate jwt method."));
    let body = serde_json::to_value(&response.data).expect("serializable");
    assert!(body.get("timestamp").is_none());
}
