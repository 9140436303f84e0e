use axum::{
    Json, Router,
    extract::{OriginalUri, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdMismatchResponse, BadRequestIdResponse, BadRequestValidationResponse,
        ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
    },
    headers,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::InventoryResult;
use crate::models::{CreateProduct, Product, StockView, UpdateProduct};
use crate::pagination::{Page, PageRequest};
use crate::repository::InventoryRepository;
use crate::service::InventoryService;

pub const TAG: &str = "products";

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        stock_view,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, StockView),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            BadRequestIdMismatchResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product and stock view endpoints")
    )
)]
pub struct ApiDoc;

/// Create the product router with all HTTP endpoints
pub fn router<R: InventoryRepository + 'static>(service: InventoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/stock", get(stock_view))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// A page renders as a JSON array, with its metadata in response headers
impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        (
            [
                (headers::TOTAL_COUNT, self.total_count.to_string()),
                (headers::PAGE_NUMBER, self.page_number.to_string()),
                (headers::PAGE_SIZE, self.page_size.to_string()),
            ],
            Json(self.items),
        )
            .into_response()
    }
}

/// List products, one page at a time
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(PageRequest),
    responses(
        (status = 200, description = "Page of products", body = Vec<Product>,
            headers(
                ("x-total-count" = u64, description = "Number of products"),
                ("x-page-number" = u64, description = "Page number served"),
                ("x-page-size" = u64, description = "Page size served")
            )
        ),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    Query(request): Query<PageRequest>,
) -> InventoryResult<Page<Product>> {
    service.list_products(&request).await
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product,
            headers(("location" = String, description = "URI of the new product"))
        ),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    OriginalUri(uri): OriginalUri,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> InventoryResult<impl IntoResponse> {
    let product = service.create_product(input).await?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), product.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    ))
}

/// Products joined with their type and stock quantity
#[utoipa::path(
    get,
    path = "/stock",
    tag = TAG,
    params(PageRequest),
    responses(
        (status = 200, description = "Page of stock view rows", body = Vec<StockView>,
            headers(
                ("x-total-count" = u64, description = "Number of rows after filtering"),
                ("x-page-number" = u64, description = "Page number served"),
                ("x-page-size" = u64, description = "Page size served")
            )
        ),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn stock_view<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    Query(request): Query<PageRequest>,
) -> InventoryResult<Page<StockView>> {
    service.stock_view(&request).await
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    IdPath(id): IdPath,
) -> InventoryResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Replace a product, guarded by its version
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, response = BadRequestIdMismatchResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> InventoryResult<StatusCode> {
    service.update_product(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    IdPath(id): IdPath,
) -> InventoryResult<StatusCode> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
