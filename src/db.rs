use futures::future::BoxFuture;

use crate::errors::ShipError;
use crate::filter::{Page, ShipFilter};
use crate::ship::{Ship, ShipId, ShipRecord};

pub mod memory;

pub trait Db {
    /// Returns one page of the ships matching `filter`, in ascending
    /// `page.order`.
    fn find_matching(
        &self,
        filter: &ShipFilter,
        page: Page,
    ) -> BoxFuture<Result<Vec<Ship>, ShipError>>;

    /// Returns every ship matching `filter`.
    fn find_all_matching(&self, filter: &ShipFilter) -> BoxFuture<Result<Vec<Ship>, ShipError>>;

    fn find_by_id(&self, id: ShipId) -> BoxFuture<Result<Option<Ship>, ShipError>>;

    fn exists_by_id(&self, id: ShipId) -> BoxFuture<Result<bool, ShipError>>;

    /// Inserts `record` under a fresh ID when `id` is `None`, otherwise
    /// overwrites the ship with that ID.
    fn save(&self, id: Option<ShipId>, record: ShipRecord) -> BoxFuture<Result<Ship, ShipError>>;

    fn delete_by_id(&self, id: ShipId) -> BoxFuture<Result<(), ShipError>>;
}

pub use self::postgres::*;

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::{
        self,
        postgres::{PgArguments, PgPool, PgRow},
        query::Query,
        Postgres,
    };
    use time::OffsetDateTime;

    use crate::errors::ShipError;
    use crate::filter::{Bounds, Page, Predicate, ShipFilter};
    use crate::ship::{Ship, ShipId, ShipRecord, ShipType};

    const SELECT: &str = include_str!("queries/select.sql");

    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn find_matching(
            &self,
            filter: &ShipFilter,
            page: Page,
        ) -> BoxFuture<Result<Vec<Ship>, ShipError>> {
            let (sql, arguments) = page_query(filter, page);

            async move { fetch_ships(&self.pool, &sql, arguments).await }.boxed()
        }

        fn find_all_matching(
            &self,
            filter: &ShipFilter,
        ) -> BoxFuture<Result<Vec<Ship>, ShipError>> {
            let (sql, arguments) = all_query(filter);

            async move { fetch_ships(&self.pool, &sql, arguments).await }.boxed()
        }

        fn find_by_id(&self, id: ShipId) -> BoxFuture<Result<Option<Ship>, ShipError>> {
            async move {
                let query = sqlx::query(include_str!("queries/retrieve.sql"));

                let ship = query
                    .bind(id)
                    .try_map(|row: PgRow| ship_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(ship)
            }
            .boxed()
        }

        fn exists_by_id(&self, id: ShipId) -> BoxFuture<Result<bool, ShipError>> {
            async move {
                let query = sqlx::query_as::<_, (bool,)>(include_str!("queries/exists.sql"));

                let (exists,) = query
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(exists)
            }
            .boxed()
        }

        fn save(
            &self,
            id: Option<ShipId>,
            record: ShipRecord,
        ) -> BoxFuture<Result<Ship, ShipError>> {
            async move {
                match id {
                    None => insert(&self.pool, record).await,
                    Some(id) => update(&self.pool, id, record).await,
                }
            }
            .boxed()
        }

        fn delete_by_id(&self, id: ShipId) -> BoxFuture<Result<(), ShipError>> {
            async move {
                let query = sqlx::query(include_str!("queries/delete.sql"));

                let count = query
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?
                    .rows_affected();

                if count == 0 {
                    Err(ShipError::NonExistentId(id))
                } else {
                    Ok(())
                }
            }
            .boxed()
        }
    }

    async fn insert(pool: &PgPool, record: ShipRecord) -> Result<Ship, ShipError> {
        let query = sqlx::query_as::<_, (ShipId,)>(include_str!("queries/insert.sql"));

        let (id,) = bind_record(query, &record)
            .fetch_one(pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Ship::new(id, record))
    }

    async fn update(pool: &PgPool, id: ShipId, record: ShipRecord) -> Result<Ship, ShipError> {
        let query = sqlx::query_as::<_, (ShipId,)>(include_str!("queries/update.sql")).bind(id);

        let updated = bind_record(query, &record)
            .fetch_optional(pool)
            .await
            .map_err(map_sqlx_error)?;

        match updated {
            Some(_) => Ok(Ship::new(id, record)),
            None => Err(ShipError::NonExistentId(id)),
        }
    }

    fn bind_record<'q>(
        query: sqlx::query::QueryAs<'q, Postgres, (ShipId,), PgArguments>,
        record: &ShipRecord,
    ) -> sqlx::query::QueryAs<'q, Postgres, (ShipId,), PgArguments> {
        query
            .bind(record.name.clone())
            .bind(record.planet.clone())
            .bind(record.ship_type.as_str())
            .bind(record.prod_date)
            .bind(record.is_used)
            .bind(record.speed)
            .bind(record.crew_size)
            .bind(record.rating)
    }

    /// A value bound to a positional parameter.
    #[derive(Debug, PartialEq)]
    enum Argument {
        Text(String),
        Float(f64),
        Integer(i32),
        BigInt(i64),
        Bool(bool),
        Timestamp(OffsetDateTime),
    }

    /// Builds the query for one page of `filter`'s matches. The limit and
    /// offset are the last two arguments.
    fn page_query(filter: &ShipFilter, page: Page) -> (String, Vec<Argument>) {
        let mut arguments = Vec::new();
        let clause = where_clause(filter, &mut arguments);

        arguments.push(Argument::BigInt(i64::from(page.size)));
        let limit = arguments.len();
        arguments.push(Argument::BigInt(page.offset() as i64));
        let offset = arguments.len();

        let sql = format!(
            "{}{} ORDER BY {} ASC, id ASC LIMIT ${} OFFSET ${}",
            SELECT.trim_end(),
            clause,
            page.order.column(),
            limit,
            offset
        );

        (sql, arguments)
    }

    fn all_query(filter: &ShipFilter) -> (String, Vec<Argument>) {
        let mut arguments = Vec::new();
        let clause = where_clause(filter, &mut arguments);

        (format!("{}{}", SELECT.trim_end(), clause), arguments)
    }

    /// Renders `filter` as a ` WHERE ...` clause (or nothing) and appends
    /// the values it refers to.
    fn where_clause(filter: &ShipFilter, arguments: &mut Vec<Argument>) -> String {
        let conditions = filter
            .predicates()
            .iter()
            .filter_map(|p| condition(p, arguments))
            .collect::<Vec<_>>();

        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }

    fn condition(predicate: &Predicate, arguments: &mut Vec<Argument>) -> Option<String> {
        let mut push = |argument: Argument| {
            arguments.push(argument);
            format!("${}", arguments.len())
        };

        match predicate {
            Predicate::Any => None,
            Predicate::NameContains(s) => {
                Some(format!("strpos(name, {}) > 0", push(Argument::Text(s.clone()))))
            }
            Predicate::PlanetContains(s) => {
                Some(format!("strpos(planet, {}) > 0", push(Argument::Text(s.clone()))))
            }
            Predicate::ShipType(t) => {
                let value = push(Argument::Text(t.as_str().to_owned()));
                Some(format!("ship_type = {}", value))
            }
            Predicate::IsUsed(u) => Some(format!("is_used = {}", push(Argument::Bool(*u)))),
            Predicate::ProdDate(b) => range("prod_date", b, Argument::Timestamp, &mut push),
            Predicate::Speed(b) => range("speed", b, Argument::Float, &mut push),
            Predicate::CrewSize(b) => range("crew_size", b, Argument::Integer, &mut push),
            Predicate::Rating(b) => range("rating", b, Argument::Float, &mut push),
        }
    }

    fn range<T: Copy>(
        column: &str,
        bounds: &Bounds<T>,
        wrap: impl Fn(T) -> Argument,
        push: &mut impl FnMut(Argument) -> String,
    ) -> Option<String> {
        let mut parts = Vec::new();

        if let Some(min) = bounds.min {
            parts.push(format!("{} >= {}", column, push(wrap(min))));
        }

        if let Some(max) = bounds.max {
            parts.push(format!("{} <= {}", column, push(wrap(max))));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" AND "))
        }
    }

    async fn fetch_ships(
        pool: &PgPool,
        sql: &str,
        arguments: Vec<Argument>,
    ) -> Result<Vec<Ship>, ShipError> {
        let mut query: Query<Postgres, PgArguments> = sqlx::query(sql);

        for argument in arguments {
            query = match argument {
                Argument::Text(v) => query.bind(v),
                Argument::Float(v) => query.bind(v),
                Argument::Integer(v) => query.bind(v),
                Argument::BigInt(v) => query.bind(v),
                Argument::Bool(v) => query.bind(v),
                Argument::Timestamp(v) => query.bind(v),
            };
        }

        let ships = query
            .try_map(|row: PgRow| ship_from_row(&row))
            .fetch_all(pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(ships)
    }

    fn ship_from_row(row: &PgRow) -> Result<Ship, sqlx::Error> {
        let ship_type: String = try_get(row, "ship_type")?;
        let ship_type: ShipType = ship_type
            .parse()
            .map_err(|e: ShipError| sqlx::Error::Decode(Box::new(e)))?;

        let record = ShipRecord {
            name: try_get(row, "name")?,
            planet: try_get(row, "planet")?,
            ship_type,
            prod_date: try_get(row, "prod_date")?,
            is_used: try_get(row, "is_used")?,
            speed: try_get(row, "speed")?,
            crew_size: try_get(row, "crew_size")?,
            rating: try_get(row, "rating")?,
        };

        Ok(Ship::new(try_get(row, "id")?, record))
    }

    fn try_get<'a, T: sqlx::Type<Postgres> + sqlx::decode::Decode<'a, Postgres>>(
        row: &'a PgRow,
        column: &str,
    ) -> Result<T, sqlx::Error> {
        use sqlx::prelude::*;

        row.try_get(column)
    }

    fn map_sqlx_error(error: sqlx::Error) -> ShipError {
        use sqlx::Error;

        match error {
            // the CHECK constraints in schema.sql mirror the validation
            // rules, so this only fires if the two drift apart
            Error::Database(ref e) if e.constraint().is_some() => ShipError::Validation(format!(
                "Constraint {} violated. ",
                e.constraint().unwrap_or_default()
            )),
            _ => ShipError::Sqlx { source: error },
        }
    }

}
