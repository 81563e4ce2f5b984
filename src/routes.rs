use std::sync::Arc;

use log::{error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, WithStatus};

use crate::errors::ShipError;

pub mod admin;
mod handlers;
mod query;
mod rejection;
mod response;

pub use internal::*;

/// The maximum request body size to accept. Ship payloads are tiny, so
/// anything larger is a mistake.
const MAX_CONTENT_LENGTH: u64 = 16 * 1024;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        error!(
            logger, "Ship error";
            "context" => ?r.context, "error" => ?r.error,
            "status" => %status_code_for(e), "message" => %r.error
        );
        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status_code_for(e)));
    }

    Err(rej)
}

fn status_code_for(e: &ShipError) -> StatusCode {
    use ShipError::*;

    match e {
        InvalidId(..) | DateOutOfRange(..) | Validation(..) | InvalidPageSize => {
            StatusCode::BAD_REQUEST
        }
        NonExistentId(..) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use warp::body::{content_length_limit, json};
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{delete, get as g, path as p, path::param as par, post, query};

    use super::{handlers, query as q, MAX_CONTENT_LENGTH};
    use crate::environment::Environment;
    use crate::filter::FilterParameters;
    use crate::ship::ShipPatch;
    use crate::urls::API_PREFIX;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
        ($route_variable:ident; $first:expr) => (
            let $route_variable = $route_variable.and($first);
        );
        ($route_variable:ident; $first:expr, $($rest:expr),+) => (
            let $route_variable = $route_variable.and($first);
            route_filter!($route_variable; $($rest),+);
        )
    }

    macro_rules! route {
        ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
            pub fn $name(environment: Environment) -> Route {
                let r = environment.urls.ships_path.clone();

                let $route_variable = warp::any()
                    .map(move || environment.clone())
                    .and(p(API_PREFIX))
                    .and(p(r));

                route_filter!($route_variable; $($filters),+);

                $route_variable.and_then(handlers::$handler).boxed()
            }
        );
    }

    route!(make_list_route => list, rt;
        end(), g(), query::<FilterParameters>(), query::<q::PageParameters>());
    route!(make_count_route => count, rt; p("count"), end(), g(), query::<FilterParameters>());
    route!(make_create_route => create, rt;
        end(), post(), content_length_limit(MAX_CONTENT_LENGTH), json::<ShipPatch>());
    route!(make_retrieve_route => retrieve, rt; par::<String>(), end(), g());
    route!(make_update_route => update, rt;
        par::<String>(), end(), post(),
        content_length_limit(MAX_CONTENT_LENGTH), json::<ShipPatch>());
    route!(make_delete_route => delete, rt; par::<String>(), end(), delete());

    /// Every ship route, with `count` ahead of the ID routes so that it
    /// isn't mistaken for an ID.
    pub fn make_ship_routes(environment: Environment) -> Route {
        make_count_route(environment.clone())
            .or(make_list_route(environment.clone()))
            .unify()
            .or(make_create_route(environment.clone()))
            .unify()
            .or(make_retrieve_route(environment.clone()))
            .unify()
            .or(make_update_route(environment.clone()))
            .unify()
            .or(make_delete_route(environment))
            .unify()
            .boxed()
    }
}
