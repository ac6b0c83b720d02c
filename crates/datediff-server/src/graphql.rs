//! GraphQL adapter.
//!
//! ```graphql
//! query {
//!   DiffCalculatorQuery(
//!     startDate: "2024-01-01T00:00:00+00:00"
//!     endDate: "2024-01-03T00:00:00+00:00"
//!     calculationType: days
//!   ) {
//!     result
//!   }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, Enum, ErrorExtensions, Object, Schema, SimpleObject,
};
use axum::extract::State;
use axum::Json;
use datediff_engine::{DiffCalculator, DiffError};

use crate::app::AppState;

pub type DiffSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// `extensions.category` for errors caused by the query arguments.
pub const INPUT_ERROR_CATEGORY: &str = "graphql-input";
/// `extensions.category` for everything else.
pub const INTERNAL_ERROR_CATEGORY: &str = "internal";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[graphql(name = "CalculationTypeEnum", rename_items = "lowercase")]
pub enum CalculationTypeEnum {
    Days,
    Weekdays,
    Weeks,
    Hours,
    Minutes,
    Seconds,
    Years,
}

impl fmt::Display for CalculationTypeEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(SimpleObject, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffCalculatorOutput {
    pub result: i64,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Difference between two datetimes in the requested unit.
    #[graphql(name = "DiffCalculatorQuery")]
    async fn diff_calculator_query(
        &self,
        ctx: &Context<'_>,
        start_date: String,
        end_date: String,
        calculation_type: CalculationTypeEnum,
    ) -> async_graphql::Result<DiffCalculatorOutput> {
        let calculator = ctx.data::<Arc<DiffCalculator>>()?;
        let calculation_type = calculation_type.to_string().to_lowercase();

        tracing::debug!(
            start_date = %start_date,
            end_date = %end_date,
            calculation_type = %calculation_type,
            "GraphQL DiffCalculatorQuery"
        );

        calculator
            .calculate(&start_date, &end_date, &calculation_type)
            .map(|diff| DiffCalculatorOutput {
                result: diff.result,
            })
            .map_err(into_graphql_error)
    }
}

fn into_graphql_error(e: DiffError) -> async_graphql::Error {
    if e.is_validation() {
        return async_graphql::Error::new(e.to_string())
            .extend_with(|_, ext| ext.set("category", INPUT_ERROR_CATEGORY));
    }

    tracing::error!(error = %e, "date difference calculation failed");
    async_graphql::Error::new(INTERNAL_ERROR_MESSAGE)
        .extend_with(|_, ext| ext.set("category", INTERNAL_ERROR_CATEGORY))
}

pub fn build_schema(calculator: Arc<DiffCalculator>) -> DiffSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(calculator)
        .finish()
}

/// POST /graphql
pub async fn graphql_handler(
    State(state): State<AppState>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(state.schema.execute(request).await)
}
