//! Reusable OpenAPI responses for the shared [`ErrorResponse`] body.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-01-01T12:00:00Z",
        "status": 500,
        "error": "Internal Server Error",
        "message": "Internal server error"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Failed",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-01-01T12:00:00Z",
        "status": 400,
        "error": "Validation Failed",
        "details": {
            "name": "Product name is required",
            "price": "Price must be greater than 0"
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Malformed path, query or body",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-01-01T12:00:00Z",
        "status": 400,
        "error": "Bad Request",
        "message": "Invalid id: abc"
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-01-01T12:00:00Z",
        "status": 404,
        "error": "Not Found",
        "message": "Product not found: 42"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);
