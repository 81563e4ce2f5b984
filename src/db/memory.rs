use std::cmp::Ordering;
use std::collections::BTreeMap;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::RwLock;

use crate::errors::ShipError;
use crate::filter::{Page, ShipFilter, ShipOrder};
use crate::ship::{Ship, ShipId, ShipRecord};

/// Keeps ships in process memory. IDs start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryDb {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    ships: BTreeMap<ShipId, Ship>,
    last_id: ShipId,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

impl super::Db for MemoryDb {
    fn find_matching(
        &self,
        filter: &ShipFilter,
        page: Page,
    ) -> BoxFuture<Result<Vec<Ship>, ShipError>> {
        let filter = filter.clone();

        async move {
            let state = self.state.read().await;

            let mut ships = matching(&state, &filter);
            ships.sort_by(|a, b| compare(page.order, a, b));

            Ok(ships
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.size as usize)
                .collect())
        }
        .boxed()
    }

    fn find_all_matching(&self, filter: &ShipFilter) -> BoxFuture<Result<Vec<Ship>, ShipError>> {
        let filter = filter.clone();

        async move {
            let state = self.state.read().await;

            Ok(matching(&state, &filter))
        }
        .boxed()
    }

    fn find_by_id(&self, id: ShipId) -> BoxFuture<Result<Option<Ship>, ShipError>> {
        async move { Ok(self.state.read().await.ships.get(&id).cloned()) }.boxed()
    }

    fn exists_by_id(&self, id: ShipId) -> BoxFuture<Result<bool, ShipError>> {
        async move { Ok(self.state.read().await.ships.contains_key(&id)) }.boxed()
    }

    fn save(&self, id: Option<ShipId>, record: ShipRecord) -> BoxFuture<Result<Ship, ShipError>> {
        async move {
            let mut state = self.state.write().await;

            let id = match id {
                Some(id) if state.ships.contains_key(&id) => id,
                Some(id) => return Err(ShipError::NonExistentId(id)),
                None => {
                    state.last_id += 1;
                    state.last_id
                }
            };

            let ship = Ship::new(id, record);
            state.ships.insert(id, ship.clone());

            Ok(ship)
        }
        .boxed()
    }

    fn delete_by_id(&self, id: ShipId) -> BoxFuture<Result<(), ShipError>> {
        async move {
            match self.state.write().await.ships.remove(&id) {
                Some(_) => Ok(()),
                None => Err(ShipError::NonExistentId(id)),
            }
        }
        .boxed()
    }
}

fn matching(state: &State, filter: &ShipFilter) -> Vec<Ship> {
    state
        .ships
        .values()
        .filter(|ship| filter.matches(ship))
        .cloned()
        .collect()
}

/// Orders by the requested field, then by ID so that pages are stable.
fn compare(order: ShipOrder, a: &Ship, b: &Ship) -> Ordering {
    let (a_record, b_record) = (&a.record, &b.record);

    let primary = match order {
        ShipOrder::Id => Ordering::Equal,
        ShipOrder::Speed => a_record
            .speed
            .partial_cmp(&b_record.speed)
            .unwrap_or(Ordering::Equal),
        ShipOrder::Date => a_record.prod_date.cmp(&b_record.prod_date),
        ShipOrder::Rating => a_record
            .rating
            .partial_cmp(&b_record.rating)
            .unwrap_or(Ordering::Equal),
    };

    primary.then(a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use crate::filter::by_is_used;
    use crate::ship::tests::eagle;
    use crate::ship::ShipPatch;

    fn record(name: &str, speed: f64, is_used: bool) -> ShipRecord {
        ShipPatch {
            name: Some(name.to_owned()),
            speed: Some(speed),
            is_used: Some(is_used),
            ..eagle()
        }
        .into_record()
        .expect("build record")
    }

    async fn seeded() -> MemoryDb {
        let db = MemoryDb::new();

        let fleet = [
            ("a", 0.9, false),
            ("b", 0.1, true),
            ("c", 0.5, false),
            ("d", 0.3, true),
            ("e", 0.7, false),
        ];

        for (name, speed, is_used) in &fleet {
            db.save(None, record(name, *speed, *is_used)).await.expect("save ship");
        }

        db
    }

    fn names(ships: &[Ship]) -> Vec<&str> {
        ships.iter().map(|s| s.record.name.as_str()).collect()
    }

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let db = seeded().await;
        let all = db.find_all_matching(&ShipFilter::new()).await.unwrap();

        assert_eq!(all.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_deletion() {
        let db = seeded().await;
        db.delete_by_id(5).await.unwrap();

        let ship = db.save(None, record("f", 0.2, false)).await.unwrap();

        assert_eq!(ship.id, 6);
        assert!(!db.exists_by_id(5).await.unwrap());
    }

    #[tokio::test]
    async fn pages_follow_the_requested_order() {
        let db = seeded().await;
        let filter = ShipFilter::new();

        let page = |number| Page::new(number, 2, ShipOrder::Speed).unwrap();

        let first = db.find_matching(&filter, page(0)).await.unwrap();
        let second = db.find_matching(&filter, page(1)).await.unwrap();
        let third = db.find_matching(&filter, page(2)).await.unwrap();
        let beyond = db.find_matching(&filter, page(3)).await.unwrap();

        assert_eq!(names(&first), vec!["b", "d"]);
        assert_eq!(names(&second), vec!["c", "e"]);
        assert_eq!(names(&third), vec!["a"]);
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn paging_applies_the_filter_first() {
        let db = seeded().await;
        let filter = ShipFilter::new().and(by_is_used(Some(false)));

        let page = Page::new(0, 10, ShipOrder::Id).unwrap();
        let page = db.find_matching(&filter, page).await.unwrap();

        assert_eq!(names(&page), vec!["a", "c", "e"]);
    }

    #[tokio::test]
    async fn saving_an_unknown_id_fails() {
        let db = seeded().await;

        match db.save(Some(42), record("x", 0.5, false)).await {
            Err(ShipError::NonExistentId(42)) => {}
            other => panic!("expected missing ID, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn deleting_removes_the_ship() {
        let db = seeded().await;

        db.delete_by_id(2).await.unwrap();

        assert_eq!(db.find_by_id(2).await.unwrap(), None);
        assert!(db.delete_by_id(2).await.is_err());
    }
}
