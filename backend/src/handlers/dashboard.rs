use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use fleet_shared::api::EditDatesForm;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::workbook::{self, SheetDates};

pub async fn home(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let snapshot = state.cache().snapshot();
    Ok(Html(state.views.index(&snapshot)?))
}

pub async fn manual_refresh(State(state): State<AppState>) -> ApiResult<Redirect> {
    let snapshot = state.job.refresh().await?;
    tracing::info!("Manual refresh loaded {} workbooks", snapshot.len());
    Ok(Redirect::to("/"))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Html<String>> {
    workbook::resolve(state.job.data_dir(), &filename)
        .map_err(|_| ApiError::not_found(&filename))?;

    let snapshot = state.cache().snapshot();
    Ok(Html(state.views.edit(&filename, snapshot.get(&filename))?))
}

pub async fn edit_submit(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Form(form): Form<EditDatesForm>,
) -> ApiResult<Redirect> {
    let dates = SheetDates {
        last_reserved: form.last_reserved(),
        available_again: form.available_again(),
    };

    state.job.update_dates(&filename, dates).await?;
    Ok(Redirect::to("/"))
}
