//! Listing transactions a page at a time.

use axum::{
    Extension, Json,
    extract::{OriginalUri, RawQuery, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Error,
    auth::UserId,
    extract::{parse_flag, parse_query},
    pagination::PaginationConfig,
    timestamp::normalize_timestamp,
    transaction::{
        Category, Cursor, SortOrder, Transaction, TransactionFilter, TransactionState,
        TransactionStore, TransactionSummary, TransactionType,
    },
};

/// The raw query parameters accepted when listing transactions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListParams {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    /// Comma separated categories.
    pub categories: Option<String>,
    pub is_fixed: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
    pub cursor: Option<String>,
    pub sort: Option<String>,
    pub include_summary: Option<String>,
}

/// A validated request for a page of transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionListRequest {
    pub filter: TransactionFilter,
    pub sort: SortOrder,
    pub cursor: Option<Cursor>,
    pub limit: u64,
    pub include_summary: bool,
}

impl TransactionListRequest {
    /// Validate the query parameters of a list request.
    ///
    /// Empty parameters are treated as absent, except for `sort`.
    ///
    /// # Errors
    /// Returns [Error::TypeMismatch] for an unknown transaction type or
    /// category and [Error::InvalidRequest] for any other invalid parameter.
    pub fn from_params(
        params: TransactionListParams,
        pagination_config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let transaction_type = non_empty(params.transaction_type)
            .map(|text| text.parse::<TransactionType>())
            .transpose()?;

        let category = non_empty(params.category);
        let categories = non_empty(params.categories);
        if category.is_some() && categories.is_some() {
            return Err(Error::InvalidRequest(
                "Cannot use 'category' and 'categories' together".to_owned(),
            ));
        }

        let sort = match params.sort.as_deref() {
            None | Some("createdAt:desc") => SortOrder::Descending,
            Some("createdAt:asc") => SortOrder::Ascending,
            Some(_) => return Err(Error::InvalidRequest("Invalid sort option".to_owned())),
        };

        let limit = pagination_config.page_size(non_empty(params.limit).as_deref())?;

        let categories = match (category, categories) {
            (Some(category), _) => vec![category.trim().parse::<Category>()?],
            (None, Some(categories)) => categories
                .split(',')
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::parse::<Category>)
                .collect::<Result<Vec<_>, _>>()?,
            (None, None) => Vec::new(),
        };

        let from = non_empty(params.from)
            .map(|text| parse_bound("from", &text))
            .transpose()?;
        let to = non_empty(params.to)
            .map(|text| parse_bound("to", &text))
            .transpose()?;

        let cursor = non_empty(params.cursor)
            .map(|text| Cursor::decode(&text))
            .transpose()?;

        Ok(Self {
            filter: TransactionFilter {
                transaction_type,
                is_fixed: parse_flag(params.is_fixed.as_deref()),
                categories,
                from,
                to,
            },
            sort,
            cursor,
            limit,
            include_summary: params.include_summary.as_deref() == Some("true"),
        })
    }
}

/// A page of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub page: PageInfo,
    /// Only present when the summary was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TransactionSummary>,
}

/// Where to continue from to get the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// `None` on the last page.
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// List the caller's transactions, see [TransactionListParams] for the
/// accepted query parameters.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let result = parse_query::<TransactionListParams>(raw_query.as_deref())
        .and_then(|params| TransactionListRequest::from_params(params, &state.pagination_config))
        .and_then(|request| list_transactions(&state.store, &user_id, &request));

    match result {
        Ok(page) => Json(json!({ "ok": true, "data": page })).into_response(),
        Err(error) => error.into_problem_response(uri.path()),
    }
}

/// Get one page of transactions.
///
/// One more row than the page size is fetched to find out whether there is
/// another page, the extra row is never returned.
///
/// # Errors
/// Returns any error from the store, including an error from the summary query.
pub fn list_transactions(
    store: &impl TransactionStore,
    user_id: &UserId,
    request: &TransactionListRequest,
) -> Result<TransactionPage, Error> {
    let mut items = store.query_page(
        user_id,
        &request.filter,
        request.sort,
        request.cursor.as_ref(),
        request.limit + 1,
    )?;

    let has_more = items.len() as u64 > request.limit;
    items.truncate(request.limit as usize);

    let next_cursor = if has_more {
        items.last().map(|last| Cursor::after(last).encode())
    } else {
        None
    };

    let summary = if request.include_summary {
        Some(store.summarize(user_id, &request.filter)?)
    } else {
        None
    };

    Ok(TransactionPage {
        items,
        page: PageInfo {
            next_cursor,
            has_more,
        },
        summary,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

fn parse_bound(name: &str, text: &str) -> Result<String, Error> {
    normalize_timestamp(text).map_err(|_| {
        Error::InvalidRequest(format!(
            "Invalid '{name}'. Must be an RFC 3339 timestamp"
        ))
    })
}
