use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde_json::json;
use tracing::{error, warn};

use super::domain::{CustomerId, CustomerRegistration, LoanApplication, LoanId};
use super::evaluation::{EligibilityOutcome, RejectionReason};
use super::repository::{CustomerRepository, CustomerView, LoanRepository, RepositoryError};
use super::service::{LendingService, LendingServiceError, LoanCreationOutcome};
use super::validation::ValidationError;

const CUSTOMER_NOT_FOUND: &str = "Customer not found";
const LOAN_NOT_FOUND: &str = "Loan not found";

/// Router builder exposing registration, eligibility, origination, and loan views.
pub fn lending_router<C, L>(service: Arc<LendingService<C, L>>) -> Router
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    Router::new()
        .route("/register", post(register_handler::<C, L>))
        .route("/check-eligibility", post(check_eligibility_handler::<C, L>))
        .route("/create-loan", post(create_loan_handler::<C, L>))
        .route("/view-loan/:loan_id", get(view_loan_handler::<C, L>))
        .route("/view-loans/:customer_id", get(view_loans_handler::<C, L>))
        .with_state(service)
}

pub(crate) async fn register_handler<C, L>(
    State(service): State<Arc<LendingService<C, L>>>,
    payload: Result<Json<CustomerRegistration>, JsonRejection>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    let registration = match payload {
        Ok(Json(registration)) => registration,
        Err(rejection) => return malformed(rejection),
    };

    match service.register_customer(registration) {
        Ok(customer) => {
            (StatusCode::CREATED, Json(CustomerView::from(&customer))).into_response()
        }
        Err(other) => failure_response(other, CUSTOMER_NOT_FOUND),
    }
}

pub(crate) async fn check_eligibility_handler<C, L>(
    State(service): State<Arc<LendingService<C, L>>>,
    payload: Result<Json<LoanApplication>, JsonRejection>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    let application = match payload {
        Ok(Json(application)) => application,
        Err(rejection) => return malformed(rejection),
    };
    let customer_id = application.customer_id;
    let today = Local::now().date_naive();

    match service.check_eligibility(application, today) {
        Ok(EligibilityOutcome::Approved {
            interest_rate,
            corrected_interest_rate,
            tenure,
            monthly_repayment,
        }) => {
            let payload = json!({
                "customer_id": customer_id,
                "approval": true,
                "interest_rate": interest_rate,
                "corrected_interest_rate": corrected_interest_rate,
                "tenure": tenure,
                "monthly_repayment": monthly_repayment,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Ok(EligibilityOutcome::Rejected { reason }) => rejection_response(customer_id, reason),
        Ok(EligibilityOutcome::CustomerNotFound) => not_found(CUSTOMER_NOT_FOUND),
        Err(other) => failure_response(other, CUSTOMER_NOT_FOUND),
    }
}

pub(crate) async fn create_loan_handler<C, L>(
    State(service): State<Arc<LendingService<C, L>>>,
    payload: Result<Json<LoanApplication>, JsonRejection>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    let application = match payload {
        Ok(Json(application)) => application,
        Err(rejection) => return malformed(rejection),
    };
    let customer_id = application.customer_id;
    let today = Local::now().date_naive();

    match service.create_loan(application, today) {
        Ok(LoanCreationOutcome::Created {
            loan_id,
            customer_id,
            monthly_repayment,
        }) => {
            let payload = json!({
                "loan_id": loan_id,
                "customer_id": customer_id,
                "loan_approved": true,
                "message": "Loan approved",
                "monthly_installment": monthly_repayment,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Ok(LoanCreationOutcome::Rejected { reason }) => rejection_response(customer_id, reason),
        Ok(LoanCreationOutcome::CustomerNotFound) => not_found(CUSTOMER_NOT_FOUND),
        Err(other) => failure_response(other, CUSTOMER_NOT_FOUND),
    }
}

pub(crate) async fn view_loan_handler<C, L>(
    State(service): State<Arc<LendingService<C, L>>>,
    Path(loan_id): Path<u64>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match service.view_loan(LoanId(loan_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(other) => failure_response(other, LOAN_NOT_FOUND),
    }
}

pub(crate) async fn view_loans_handler<C, L>(
    State(service): State<Arc<LendingService<C, L>>>,
    Path(customer_id): Path<u64>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match service.view_customer_loans(CustomerId(customer_id)) {
        Ok(loans) => (StatusCode::OK, Json(loans)).into_response(),
        Err(other) => failure_response(other, CUSTOMER_NOT_FOUND),
    }
}

fn rejection_response(customer_id: CustomerId, reason: RejectionReason) -> Response {
    let payload = json!({
        "customer_id": customer_id,
        "approval": false,
        "message": reason.summary(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}

fn malformed(rejection: JsonRejection) -> Response {
    let error = ValidationError::Malformed(rejection.body_text());
    warn!(%error, "rejected request body");
    let payload = json!({ "error": error.to_string() });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn failure_response(error: LendingServiceError, not_found_message: &str) -> Response {
    let status = match &error {
        LendingServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        LendingServiceError::Computation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LendingServiceError::Repository(RepositoryError::NotFound) => {
            return not_found(not_found_message)
        }
        LendingServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        LendingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            error!(%error, "record store unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
