//! Munin Atlas commands.

use crate::error::CommandError;
use crate::state::AppState;
use odin_atlas::{
    compare::HeaderCell, entity_detail, property_detail, AfterRemoval, AtlasError,
    CompareOutcome, ComparisonRow, ComparisonSummary, DisciplineData, EntityDetail, FilterMode,
    LoadOutcome, LoadState, PropertyDetail, PropertyFilter, Route, SelectionController,
};
use odin_core::{DisciplineId, EntityId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Entity filters of the discipline view.
#[derive(Debug, Clone, Default)]
pub struct EntityQuery {
    /// Free-text search over name, category and overview
    pub search: String,
    /// Exact category
    pub category: Option<String>,
    /// Property filters, all of which must match
    pub filters: Vec<PropertyFilter>,
}

/// Row of the discipline entity list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    /// Entity id
    pub id: String,
    /// Entity name
    pub name: String,
    /// Entity category
    pub category: String,
}

/// The discipline page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineView {
    /// Requested id
    pub discipline: String,
    /// `loaded`, `empty` or `not-found`
    pub state: &'static str,
    /// Dataset title
    pub display_name: String,
    /// Dataset description
    pub description: String,
    /// Categories in first-seen order
    pub categories: Vec<String>,
    /// Entities passing the filters
    pub entities: Vec<EntitySummary>,
    /// Entity count before filtering
    pub total: usize,
}

impl DisciplineView {
    fn not_found(discipline: &str) -> Self {
        Self {
            discipline: discipline.to_string(),
            state: "not-found",
            display_name: String::new(),
            description: String::new(),
            categories: Vec::new(),
            entities: Vec::new(),
            total: 0,
        }
    }
}

/// The comparison page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ComparisonResponse {
    /// Fewer than two entities resolved
    #[serde(rename_all = "camelCase")]
    Unavailable {
        /// Ids that resolved
        resolved: Vec<String>,
        /// Guidance shown instead of a table
        message: String,
    },
    /// A comparison table
    #[serde(rename_all = "camelCase")]
    Ready {
        /// Canonical route of the comparison
        route: String,
        /// Row filter applied
        mode: FilterMode,
        /// Column headers
        header: Vec<HeaderCell>,
        /// Visible overview, property and section rows, in that order
        rows: Vec<ComparisonRow>,
        /// Counts over all rows
        summary: ComparisonSummary,
    },
}

/// What an atlas URL shows.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "camelCase")]
pub enum RouteView {
    /// Discipline page
    Discipline(DisciplineView),
    /// Entity page
    Entity(EntityDetail),
    /// Comparison page
    Compare(ComparisonResponse),
    /// Property page
    Property(PropertyDetail),
}

fn discipline_id(discipline: &str) -> Result<DisciplineId, CommandError> {
    DisciplineId::new(discipline).map_err(|_| {
        AtlasError::NotFound {
            discipline: discipline.to_string(),
        }
        .into()
    })
}

async fn load(
    state: &AppState,
    discipline: &str,
) -> Result<(DisciplineId, Arc<DisciplineData>), CommandError> {
    let id = discipline_id(discipline)?;
    let data = state.loader.load(id.as_str()).await?;
    Ok((id, data))
}

/// Available discipline ids.
pub async fn list_disciplines(state: &AppState) -> Result<Vec<String>, CommandError> {
    let ids = state.loader.disciplines().await?;
    Ok(ids.into_iter().map(|id| id.to_string()).collect())
}

/// Load a discipline page and apply entity filters.
///
/// A missing dataset is a `not-found` page, not an error.
pub async fn open_discipline(
    state: &AppState,
    discipline: &str,
    query: &EntityQuery,
) -> Result<DisciplineView, CommandError> {
    let mut navigation = state.loader.navigate(discipline);
    if navigation.run(&state.loader).await == LoadOutcome::Cancelled {
        return Err(CommandError::new("CANCELLED", "Navigation was cancelled"));
    }

    let data = match navigation.state() {
        LoadState::Loaded(data) | LoadState::Empty(data) => Arc::clone(data),
        LoadState::NotFound { .. } | LoadState::Loading => {
            return Ok(DisciplineView::not_found(discipline));
        }
        LoadState::Failed { reason } => {
            return Err(CommandError::with_details(
                "DATASET_ERROR",
                "Dataset could not be read",
                serde_json::json!({ "discipline": discipline, "reason": reason }),
            ));
        }
    };
    let state_label = navigation.state().label();

    let mut controller = SelectionController::new(
        discipline_id(discipline)?,
        Arc::clone(&data),
        state.config.atlas.compare_cap,
    );
    controller.set_search(query.search.clone());
    controller.set_category(query.category.clone());
    for filter in &query.filters {
        controller.add_property_filter(filter.clone());
    }

    let entities = controller
        .visible_entities()
        .into_iter()
        .map(|entity| EntitySummary {
            id: entity.id.clone(),
            name: entity.name.clone(),
            category: entity.category.clone(),
        })
        .collect();

    Ok(DisciplineView {
        discipline: discipline.to_string(),
        state: state_label,
        display_name: data.display_name.clone(),
        description: data.description.clone(),
        categories: data.categories().into_iter().map(str::to_string).collect(),
        entities,
        total: data.entities.len(),
    })
}

fn comparison_response(controller: &SelectionController, mode: FilterMode) -> ComparisonResponse {
    match controller.comparison() {
        CompareOutcome::Ready(view) => {
            let route = controller
                .compare_route()
                .map(|route| route.to_string())
                .unwrap_or_default();
            let rows = view.visible_rows(mode).into_iter().cloned().collect();
            let summary = view.summary();

            ComparisonResponse::Ready {
                route,
                mode,
                header: view.header,
                rows,
                summary,
            }
        }
        CompareOutcome::Unavailable { resolved } => ComparisonResponse::Unavailable {
            resolved,
            message: "Select at least two entities to compare".to_string(),
        },
    }
}

fn controller_for(
    state: &AppState,
    discipline: DisciplineId,
    data: Arc<DisciplineData>,
    ids: &[String],
) -> SelectionController {
    let entities: Vec<EntityId> = ids
        .iter()
        .filter_map(|id| EntityId::new(id.as_str()).ok())
        .collect();
    let route = Route::Compare {
        discipline,
        entities,
    };
    SelectionController::from_route(&route, data, state.config.atlas.compare_cap)
}

/// Compare entities of one discipline.
///
/// Ids that do not resolve are dropped; fewer than two remaining is
/// reported as guidance rather than an error.
pub async fn compare_entities(
    state: &AppState,
    discipline: &str,
    ids: &[String],
    mode: FilterMode,
) -> Result<ComparisonResponse, CommandError> {
    let (id, data) = load(state, discipline).await?;
    let controller = controller_for(state, id, data, ids);
    debug!(
        discipline,
        requested = ids.len(),
        selected = controller.selected().len(),
        "comparing"
    );
    Ok(comparison_response(&controller, mode))
}

/// Remove one entity from a comparison. Returns where to go next.
pub async fn remove_from_comparison(
    state: &AppState,
    discipline: &str,
    ids: &[String],
    entity_id: &str,
) -> Result<String, CommandError> {
    let (id, data) = load(state, discipline).await?;
    let mut controller = controller_for(state, id, data, ids);

    let next = match controller.remove_from_comparison(entity_id) {
        AfterRemoval::StayOnComparison(route) | AfterRemoval::ExitToDiscipline(route) => route,
    };
    info!(discipline, entity_id, next = %next, "removed from comparison");
    Ok(next.to_string())
}

/// Entity page with cross references resolved.
pub async fn get_entity(
    state: &AppState,
    discipline: &str,
    entity_id: &str,
) -> Result<EntityDetail, CommandError> {
    let (id, data) = load(state, discipline).await?;
    Ok(entity_detail(&id, &data, entity_id)?)
}

/// Property page grouping entities by value.
pub async fn get_property(
    state: &AppState,
    discipline: &str,
    property_id: &str,
) -> Result<PropertyDetail, CommandError> {
    let (id, data) = load(state, discipline).await?;
    Ok(property_detail(&id, &data, property_id)?)
}

/// Resolve an atlas URL to the page it shows.
pub async fn open_route(
    state: &AppState,
    url: &str,
    mode: FilterMode,
) -> Result<RouteView, CommandError> {
    let route = Route::parse(url).ok_or_else(|| {
        CommandError::with_details(
            "ROUTE_NOT_FOUND",
            "Not an atlas page",
            serde_json::json!({ "url": url }),
        )
    })?;

    match route {
        Route::Discipline { discipline } => Ok(RouteView::Discipline(
            open_discipline(state, discipline.as_str(), &EntityQuery::default()).await?,
        )),
        Route::Entity { discipline, entity } => Ok(RouteView::Entity(
            get_entity(state, discipline.as_str(), entity.as_str()).await?,
        )),
        Route::Compare {
            discipline,
            entities,
        } => {
            let ids: Vec<String> = entities.iter().map(ToString::to_string).collect();
            Ok(RouteView::Compare(
                compare_entities(state, discipline.as_str(), &ids, mode).await?,
            ))
        }
        Route::Property {
            discipline,
            property,
        } => Ok(RouteView::Property(
            get_property(state, discipline.as_str(), &property).await?,
        )),
    }
}
