use std::convert::TryFrom;
use std::time::{Duration, Instant};

use log::debug;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::environment::Environment;
use crate::errors::ShipError;
use crate::filter::{FilterParameters, ShipFilter};
use crate::routes::{
    query::PageParameters,
    rejection::{Context, Rejection},
    response::SuccessResponse,
};
use crate::service;
use crate::ship::{ShipId, ShipPatch};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($body:tt)+) => {{
        let start = Instant::now();

        // TODO when `try` blocks are stabilized, we can wrap the body
        // and return the headers even on errors
        let result = { $($body)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    }};
}

pub async fn list(
    environment: Environment,
    filters: FilterParameters,
    paging: PageParameters,
) -> RouteResult {
    timed! {
        let error_handler = |e: ShipError| Rejection::new(Context::list(), e);

        let page = paging
            .into_page(environment.config.default_page_size)
            .map_err(error_handler)?;
        let filter = ShipFilter::try_from(filters).map_err(error_handler)?;
        debug!(
            environment.logger, "Listing ships...";
            "page" => page.number, "size" => page.size, "order" => ?page.order, "filter" => ?filter
        );

        let ships = service::list(environment.db.as_ref(), &filter, page)
            .await
            .map_err(error_handler)?;

        json(&ships)
    }
}

pub async fn count(environment: Environment, filters: FilterParameters) -> RouteResult {
    timed! {
        let error_handler = |e: ShipError| Rejection::new(Context::count(), e);

        let filter = ShipFilter::try_from(filters).map_err(error_handler)?;
        debug!(environment.logger, "Counting ships..."; "filter" => ?filter);

        let count = service::count(environment.db.as_ref(), &filter)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Count(count))
    }
}

pub async fn create(environment: Environment, patch: ShipPatch) -> RouteResult {
    timed! {
        debug!(environment.logger, "Creating ship..."; "name" => ?patch.name);

        let ship = service::create(environment.db.as_ref(), patch)
            .await
            .map_err(|e: ShipError| Rejection::new(Context::create(), e))?;
        debug!(environment.logger, "Created ship"; "id" => ship.id, "rating" => ship.record.rating);

        let location = environment.urls.ship(ship.id).to_string();

        with_header(
            with_status(json(&ship), StatusCode::CREATED),
            "location",
            location,
        )
    }
}

pub async fn retrieve(environment: Environment, raw_id: String) -> RouteResult {
    timed! {
        let error_handler = |e: ShipError| Rejection::new(Context::retrieve(raw_id.clone()), e);

        let id = checked_id(&environment, &raw_id).await.map_err(error_handler)?;
        debug!(environment.logger, "Retrieving ship..."; "id" => id);

        let ship = service::retrieve(environment.db.as_ref(), id)
            .await
            .map_err(error_handler)?;

        json(&ship)
    }
}

pub async fn update(environment: Environment, raw_id: String, patch: ShipPatch) -> RouteResult {
    timed! {
        let error_handler = |e: ShipError| Rejection::new(Context::update(raw_id.clone()), e);

        let id = checked_id(&environment, &raw_id).await.map_err(error_handler)?;
        debug!(environment.logger, "Updating ship..."; "id" => id);

        let ship = service::update(environment.db.as_ref(), id, patch)
            .await
            .map_err(error_handler)?;
        debug!(environment.logger, "Updated ship"; "id" => id, "rating" => ship.record.rating);

        json(&ship)
    }
}

pub async fn delete(environment: Environment, raw_id: String) -> RouteResult {
    timed! {
        let error_handler = |e: ShipError| Rejection::new(Context::delete(raw_id.clone()), e);

        let id = checked_id(&environment, &raw_id).await.map_err(error_handler)?;
        debug!(environment.logger, "Deleting ship..."; "id" => id);

        service::delete(environment.db.as_ref(), id)
            .await
            .map_err(error_handler)?;

        StatusCode::NO_CONTENT
    }
}

/// Rejects malformed IDs before asking storage whether the ship exists.
async fn checked_id(environment: &Environment, raw_id: &str) -> Result<ShipId, ShipError> {
    let id = service::parse_id(raw_id)?;

    if service::id_exists(environment.db.as_ref(), id).await? {
        Ok(id)
    } else {
        Err(ShipError::NonExistentId(id))
    }
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
