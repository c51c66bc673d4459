use crate::board::{LeadBoard, LeadStats};
use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::intake::FormState;
use crate::links;
use crate::metropole_client::MetropoleClient;
use crate::models::{Lead, LeadStatus, Product, ProductUpdate};
use crate::product_registry::ProductRegistry;
use crate::session::{SessionBoundary, SignOutDirective};
use crate::timefmt;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the remote Metropole lead service.
    pub client: MetropoleClient,
    /// File-backed product registry.
    pub registry: ProductRegistry,
    /// Configured sign-out behavior.
    pub session: SessionBoundary,
    /// Lead ids with a status update currently in flight. Guards against
    /// duplicate submission for the same row; different ids stay
    /// independent.
    updating: Mutex<HashSet<i64>>,
}

impl AppState {
    pub fn new(config: Config, client: MetropoleClient, registry: ProductRegistry) -> Self {
        let session = SessionBoundary::new(
            config.signout_redirect_url.clone(),
            config.signout_clear_keys.clone(),
        );
        Self {
            config,
            client,
            registry,
            session,
            updating: Mutex::new(HashSet::new()),
        }
    }

    /// Marks a per-lead update as in flight. Returns `None` when one is
    /// already pending for the id; the marker is released when the
    /// returned guard drops.
    fn begin_update(&self, id: i64) -> Option<UpdateGuard<'_>> {
        let mut updating = self
            .updating
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !updating.insert(id) {
            return None;
        }
        Some(UpdateGuard { state: self, id })
    }

    fn is_updating(&self, id: i64) -> bool {
        self.updating
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&id)
    }
}

struct UpdateGuard<'a> {
    state: &'a AppState,
    id: i64,
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.state
            .updating
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.id);
    }
}

// ============ Request/Response Shapes ============

#[derive(Debug, Deserialize)]
pub struct LeadListParams {
    /// Product to query; defaults to the configured product.
    pub product: Option<String>,
    /// Free-text search term.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ProductScope {
    pub product: Option<String>,
}

/// One rendered row of the lead list.
#[derive(Debug, Serialize)]
pub struct LeadRow {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub cell_phone: Option<String>,
    pub main_interest: Option<String>,
    pub status: &'static str,
    pub status_label: &'static str,
    pub created_at: String,
    pub created_label: String,
    /// Prefilled messaging link, present when the lead has a phone.
    pub whatsapp: Option<String>,
    /// Whether a status update is in flight for this row.
    pub updating: bool,
}

#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub items: Vec<LeadRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total_filtered: usize,
    pub stats: LeadStats,
}

#[derive(Debug, Serialize)]
pub struct LeadLinks {
    pub whatsapp: Option<String>,
    pub mailto: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeadDetailResponse {
    pub lead: Lead,
    pub status: &'static str,
    pub status_label: &'static str,
    pub created_label: String,
    pub updated_label: String,
    pub links: LeadLinks,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub id: i64,
    pub status: &'static str,
    pub updated: bool,
}

fn lead_row(lead: &Lead, state: &AppState) -> LeadRow {
    let status = lead.display_status();
    LeadRow {
        id: lead.id,
        name: lead.name.clone(),
        email: lead.email.clone(),
        cell_phone: lead.cell_phone.clone(),
        main_interest: lead.main_interest.clone(),
        status: status.as_str(),
        status_label: status.label(),
        created_at: lead.created_at.clone(),
        created_label: timefmt::relative_label(&lead.created_at),
        whatsapp: lead
            .cell_phone
            .as_deref()
            .map(|phone| links::whatsapp_link(phone, lead.name.as_deref().unwrap_or(""))),
        updating: state.is_updating(lead.id),
    }
}

// ============ Handlers ============

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "metropole-crm-api",
            "version": "0.1.0"
        })),
    )
}

/// GET /api/v1/leads
///
/// Fetches the full lead snapshot for the tenant/product, then derives
/// the aggregate statistics and one page of the filtered, most-recent-
/// first sequence.
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeadListParams>,
) -> Result<Json<LeadListResponse>, AppError> {
    let product = params
        .product
        .unwrap_or_else(|| state.config.default_product.clone());
    let search = params.search.unwrap_or_default();
    let page = params.page.unwrap_or(1);
    tracing::info!(
        "GET /leads - product: {}, search: {:?}, page: {}",
        product,
        search,
        page
    );

    let leads = state
        .client
        .list_leads(state.config.tenant_id, &product)
        .await?;
    let board = LeadBoard::from_snapshot(leads);
    let stats = board.stats();
    let view = board.page(&search, page);
    let items = view.items.iter().map(|lead| lead_row(lead, &state)).collect();

    Ok(Json(LeadListResponse {
        items,
        page: view.page,
        total_pages: view.total_pages,
        total_filtered: view.total_filtered,
        stats,
    }))
}

/// GET /api/v1/leads/:id
///
/// The remote service has no single-record lookup, so the whole
/// collection is fetched and searched linearly; the path parameter is
/// compared against the stringified numeric id. A missing lead is the
/// distinct not-found state, not a transport failure.
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(scope): Query<ProductScope>,
) -> Result<Json<LeadDetailResponse>, AppError> {
    let product = scope
        .product
        .unwrap_or_else(|| state.config.default_product.clone());
    tracing::info!("GET /leads/{} - product: {}", id, product);

    let leads = state
        .client
        .list_leads(state.config.tenant_id, &product)
        .await
        .context("Loading lead details")?;
    let board = LeadBoard::from_snapshot(leads);
    let lead = board
        .find(&id)
        .ok_or_else(|| AppError::NotFound(format!("Lead {} not found", id)))?
        .clone();

    let status = lead.display_status();
    let name = lead.name.as_deref().unwrap_or("");
    let response = LeadDetailResponse {
        status: status.as_str(),
        status_label: status.label(),
        created_label: timefmt::full_label(&lead.created_at),
        updated_label: timefmt::full_label(&lead.updated_at),
        links: LeadLinks {
            whatsapp: lead
                .cell_phone
                .as_deref()
                .map(|phone| links::whatsapp_link(phone, name)),
            mailto: lead
                .email
                .as_deref()
                .map(|email| links::mailto_link(email, name)),
        },
        lead,
    };

    Ok(Json(response))
}

/// PUT /api/v1/leads/:id/status
///
/// Validates the status value against the recognized stages, guards
/// against a duplicate in-flight update for the same id (409), and
/// forwards the patch to the remote service. The snapshot a caller
/// holds is theirs to patch locally on success; no re-fetch happens
/// here.
pub async fn update_lead_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, AppError> {
    let status = LeadStatus::parse(&request.status).ok_or_else(|| {
        AppError::BadRequest(format!("Unrecognized status value '{}'", request.status))
    })?;

    let _guard = state.begin_update(id).ok_or_else(|| {
        AppError::Conflict(format!("A status update for lead {} is already in flight", id))
    })?;

    tracing::info!("PUT /leads/{}/status - {}", id, status.as_str());
    state.client.update_status(id, status).await?;

    Ok(Json(StatusUpdateResponse {
        id,
        status: status.as_str(),
        updated: true,
    }))
}

/// POST /api/v1/leads
///
/// Accepts the tagged intake form, validates the layout's required
/// fields, maps it onto the flat remote record and submits it. On
/// failure nothing is cleared; the caller keeps its form state for
/// correction.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    Json(form): Json<FormState>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    form.validate().map_err(|missing| {
        AppError::BadRequest(format!("Missing required fields: {}", missing.join(", ")))
    })?;

    tracing::info!("POST /leads - product: {}", form.product);
    let record = form.to_wire(state.config.tenant_id);
    state.client.create_lead(&record).await?;

    Ok((StatusCode::CREATED, Json(json!({ "created": true }))))
}

/// GET /api/v1/stats
///
/// Independent snapshot fetch for the sibling statistics view; the list
/// and stats views deliberately do not share a cache.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(scope): Query<ProductScope>,
) -> Result<Json<LeadStats>, AppError> {
    let product = scope
        .product
        .unwrap_or_else(|| state.config.default_product.clone());
    tracing::info!("GET /stats - product: {}", product);

    let leads = state
        .client
        .list_leads(state.config.tenant_id, &product)
        .await?;
    Ok(Json(LeadBoard::from_snapshot(leads).stats()))
}

/// GET /api/v1/products
pub async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.registry.list().await)
}

/// POST /api/v1/products
pub async fn add_product(
    State(state): State<Arc<AppState>>,
    Json(product): Json<Product>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.registry.add(product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/v1/products/:id
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(changes): Json<ProductUpdate>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.registry.update(&id, changes).await?))
}

/// DELETE /api/v1/products/:id
pub async fn remove_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.registry.remove(&id).await?;
    Ok(Json(json!({ "removed": true })))
}

/// POST /api/v1/session/sign-out
pub async fn sign_out(State(state): State<Arc<AppState>>) -> Json<SignOutDirective> {
    Json(state.session.sign_out())
}
