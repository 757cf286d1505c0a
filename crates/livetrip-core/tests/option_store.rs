//! End-to-end behavior of the option store against a fake remote and a
//! real on-disk cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use livetrip_core::api::{ApiError, RemoteOptions};
use livetrip_core::cache::{FileStore, KeyValueStore, MemoryStore};
use livetrip_core::models::{labels, Category, Dimension, Schedule, SelectOption};
use livetrip_core::options::grouping::{partition, UNSET};
use livetrip_core::options::SortMode;
use livetrip_core::{OptionStore, OptionsError};

#[derive(Default)]
struct Remote {
    lists: Mutex<HashMap<Category, Vec<SelectOption>>>,
    down: AtomicBool,
}

impl Remote {
    fn down() -> Self {
        let remote = Self::default();
        remote.down.store(true, Ordering::SeqCst);
        remote
    }
}

#[async_trait]
impl RemoteOptions for Remote {
    async fn fetch_options(&self, category: Category) -> Result<Vec<SelectOption>, ApiError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("connection refused".to_string()));
        }
        Ok(self.lists.lock().unwrap().get(&category).cloned().unwrap_or_default())
    }

    async fn save_options(
        &self,
        category: Category,
        options: &[SelectOption],
        _mode: SortMode,
    ) -> Result<(), ApiError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("connection refused".to_string()));
        }
        self.lists.lock().unwrap().insert(category, options.to_vec());
        Ok(())
    }
}

fn schedule(id: i64, area: Option<&str>, lineup: Option<&str>) -> Schedule {
    Schedule {
        id,
        title: format!("Live {}", id),
        group: None,
        datetime: None,
        category: None,
        area: area.map(String::from),
        venue: None,
        target: None,
        lineup: lineup.map(String::from),
        seller: None,
        status: None,
    }
}

#[tokio::test]
async fn write_then_read_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = OptionStore::new(
        Arc::new(Remote::default()),
        Arc::new(FileStore::new(dir.path().to_path_buf()).unwrap()),
    );

    let options = vec![
        SelectOption::new("Artist A").with_order(0),
        SelectOption::new("Artist B").with_color("#DBEAFE".parse().unwrap()).with_order(1),
    ];
    store.write(Category::Targets, &options).await.unwrap();

    let read = store.read(Category::Targets).await;
    assert_eq!(labels(&read), labels(&options));
    assert_eq!(read, options);
}

#[tokio::test]
async fn legacy_statuses_are_upgraded_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let files = Arc::new(FileStore::new(dir.path().to_path_buf()).unwrap());
    files
        .set("@select_options:statuses", r#"["Canceled","Keep","Done"]"#)
        .await
        .unwrap();

    let store = OptionStore::new(Arc::new(Remote::down()), files.clone());
    let options = store.read(Category::Statuses).await;

    assert_eq!(labels(&options), vec!["Canceled", "Keep", "Done"]);
    let orders: Vec<Option<i64>> = options.iter().map(|o| o.order).collect();
    assert_eq!(orders, vec![Some(0), Some(1), Some(2)]);
    assert!(options.iter().all(|o| o.color.is_some()));

    let persisted = files.get("@select_options:statuses").await.unwrap().unwrap();
    assert_eq!(persisted, serde_json::to_string(&options).unwrap());

    // A fresh session reads the upgraded entry unchanged
    let again = OptionStore::new(Arc::new(Remote::down()), files.clone());
    assert_eq!(again.read(Category::Statuses).await, options);
}

#[tokio::test]
async fn remote_failure_returns_exactly_the_cached_entries() {
    let cached = r##"[{"label":"じゃらん","color":"#FCE7F3","order":0},{"label":"楽天トラベル","order":1},{"label":"Booking.com","order":2}]"##;
    let local = MemoryStore::new().with_entry("@stay_select_options:website", cached);
    let store = OptionStore::new(Arc::new(Remote::down()), Arc::new(local));

    let options = store.read(Category::StayWebsite).await;
    let expected: Vec<SelectOption> = serde_json::from_str(cached).unwrap();
    assert_eq!(options, expected);
    assert_eq!(labels(&options), vec!["じゃらん", "楽天トラベル", "Booking.com"]);
    assert_eq!(options[1].color, None);
    assert_eq!(options[2].order, Some(2));
}

#[tokio::test]
async fn failed_write_keeps_previous_value() {
    let remote = Arc::new(Remote::default());
    let local = Arc::new(MemoryStore::new());
    let store = OptionStore::new(remote.clone(), local.clone());

    let before = vec![SelectOption::new("Spring Tour").with_order(0)];
    store.write(Category::Groups, &before).await.unwrap();

    remote.down.store(true, Ordering::SeqCst);
    let err = store
        .write(Category::Groups, &[SelectOption::new("Summer Tour").with_order(0)])
        .await
        .unwrap_err();
    assert!(matches!(err, OptionsError::Transport(ApiError::Unavailable(_))));

    assert_eq!(store.read(Category::Groups).await, before);
    let fresh = OptionStore::new(remote.clone(), local.clone());
    assert_eq!(fresh.read(Category::Groups).await, before);
}

#[tokio::test]
async fn rank_maps_drive_grouping() {
    let remote = Remote::default();
    remote.lists.lock().unwrap().insert(
        Category::Areas,
        vec![SelectOption::new("Tokyo").with_order(1), SelectOption::new("Hokkaido").with_order(0)],
    );
    remote.lists.lock().unwrap().insert(
        Category::Targets,
        vec![SelectOption::new("B").with_order(0), SelectOption::new("A").with_order(1)],
    );
    let store = OptionStore::new(Arc::new(remote), Arc::new(MemoryStore::new()));
    let ranks = store.load_rank_maps(&HashMap::new()).await;

    let schedules = vec![
        schedule(1, Some("Tokyo"), Some("A, B")),
        schedule(2, Some("Hokkaido"), Some("C")),
        schedule(3, None, None),
    ];

    let by_area = partition(&schedules, Dimension::Area, ranks.get(Dimension::Area));
    let titles: Vec<&str> = by_area.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["Hokkaido", "Tokyo", UNSET]);

    let by_lineup = partition(&schedules, Dimension::Lineup, ranks.get(Dimension::Lineup));
    let groups: Vec<(&str, Vec<i64>)> = by_lineup
        .iter()
        .map(|g| (g.title.as_str(), g.entities.iter().map(|s| s.id).collect()))
        .collect();
    assert_eq!(
        groups,
        vec![("B", vec![1]), ("A", vec![1]), ("C", vec![2]), (UNSET, vec![3])]
    );
}
