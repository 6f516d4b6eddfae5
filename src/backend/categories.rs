use std::sync::Arc;

use super::BackendError;
use super::l10n::Translator;
use crate::calendar::{CalendarObject, StoredObject};

const DEFAULT_CATEGORY_KEYS: [&str; 15] = [
    "Birthday",
    "Business",
    "Call",
    "Clients",
    "Deliverer",
    "Holidays",
    "Ideas",
    "Journey",
    "Jubilee",
    "Meeting",
    "Other",
    "Personal",
    "Projects",
    "Questions",
    "Work",
];

/// Per-user category storage, partitioned by domain (`"event"`, ...).
#[cfg_attr(test, mockall::automock)]
pub trait CategoryStore {
    fn categories(&self, domain: &str) -> Result<Vec<String>, BackendError>;

    fn is_empty(&self, domain: &str) -> Result<bool, BackendError>;

    fn add(&self, domain: &str, names: &[String]) -> Result<(), BackendError>;

    fn delete(&self, domain: &str, names: &[String]) -> Result<(), BackendError>;

    /// Adds `categories` and, with `sync`, links them to `object_id`
    /// in place of any earlier links.
    fn load_from_object(
        &self,
        domain: &str,
        object_id: &str,
        categories: &[String],
        sync: bool,
    ) -> Result<(), BackendError>;
}

pub fn default_categories(translator: &dyn Translator) -> Vec<String> {
    DEFAULT_CATEGORY_KEYS
        .iter()
        .map(|key| translator.translate(key))
        .collect()
}

pub struct Categories {
    store: Arc<dyn CategoryStore + Send + Sync>,
    domain: String,
    defaults: Vec<String>,
}

impl Categories {
    pub fn new(
        store: Arc<dyn CategoryStore + Send + Sync>,
        domain: impl Into<String>,
        translator: &dyn Translator,
    ) -> Self {
        Self {
            store,
            domain: domain.into(),
            defaults: default_categories(translator),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    pub fn is_empty(&self) -> Result<bool, BackendError> {
        self.store.is_empty(&self.domain)
    }

    /// Returns whether the defaults were written.
    pub fn seed_defaults_if_empty(&self) -> Result<bool, BackendError> {
        if !self.store.is_empty(&self.domain)? {
            return Ok(false);
        }
        tracing::info!("Seeding {} default categories for '{}'", self.defaults.len(), self.domain);
        self.store.add(&self.domain, &self.defaults)?;
        Ok(true)
    }

    pub fn options(&self) -> Result<Vec<String>, BackendError> {
        self.store.categories(&self.domain)
    }

    pub fn load_from_object(&self, object_id: &str, object: &CalendarObject) -> Result<(), BackendError> {
        self.store
            .load_from_object(&self.domain, object_id, &object.categories, true)
    }

    /// Drops every category of the domain and rebuilds them from `objects`.
    /// Objects whose data does not parse are skipped. Returns the number of
    /// objects loaded.
    pub fn rescan(&self, objects: &[StoredObject]) -> Result<usize, BackendError> {
        if objects.is_empty() {
            return Ok(0);
        }

        let existing = self.store.categories(&self.domain)?;
        if !existing.is_empty() {
            self.store.delete(&self.domain, &existing)?;
        }

        let mut loaded = 0;
        for stored in objects {
            match stored.parse() {
                Ok(object) => {
                    self.load_from_object(&stored.id, &object)?;
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping object {} during category scan: {}", stored.id, e);
                }
            }
        }

        tracing::info!("Rescanned categories of {} objects into '{}'", loaded, self.domain);
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::l10n::Catalog;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn stored(id: &str, data: &str) -> StoredObject {
        StoredObject {
            id: id.to_string(),
            calendar_id: "cal".to_string(),
            owner: "alice".to_string(),
            data: data.to_string(),
            last_modified: None,
        }
    }

    fn event_ics(categories: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:x\r\nCATEGORIES:{categories}\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n"
        )
    }

    fn categories_with(store: MockCategoryStore) -> Categories {
        Categories::new(Arc::new(store), "event", &Catalog::new())
    }

    #[test]
    fn defaults_are_translated() {
        let catalog = Catalog::new().with_entry("Work", "Arbeit");

        let defaults = default_categories(&catalog);

        assert_eq!(defaults.len(), 15);
        assert_eq!(defaults.first().map(String::as_str), Some("Birthday"));
        assert_eq!(defaults.last().map(String::as_str), Some("Arbeit"));
    }

    #[test]
    fn seeds_defaults_into_empty_domain() {
        let mut store = MockCategoryStore::new();
        store.expect_is_empty().with(eq("event")).returning(|_| Ok(true));
        store
            .expect_add()
            .withf(|domain, names| domain == "event" && names.len() == 15)
            .times(1)
            .returning(|_, _| Ok(()));

        let categories = categories_with(store);
        let seeded = categories.seed_defaults_if_empty().unwrap();

        assert!(seeded);
        assert_eq!(categories.domain(), "event");
    }

    #[test]
    fn does_not_seed_populated_domain() {
        let mut store = MockCategoryStore::new();
        store.expect_is_empty().returning(|_| Ok(false));
        store.expect_add().never();

        let seeded = categories_with(store).seed_defaults_if_empty().unwrap();

        assert!(!seeded);
    }

    #[test]
    fn rescan_replaces_existing_categories() {
        let mut store = MockCategoryStore::new();
        store
            .expect_categories()
            .returning(|_| Ok(vec!["Stale".to_string()]));
        store
            .expect_delete()
            .withf(|domain, names| domain == "event" && names == ["Stale".to_string()])
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_load_from_object()
            .withf(|domain, id, names, sync| {
                domain == "event" && id == "1" && names == ["Call".to_string(), "Work".to_string()] && *sync
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let loaded = categories_with(store)
            .rescan(&[stored("1", &event_ics("Call,Work")), stored("2", "garbage")])
            .unwrap();

        assert_eq!(loaded, 1);
    }

    #[test]
    fn rescan_without_objects_leaves_store_alone() {
        let mut store = MockCategoryStore::new();
        store.expect_categories().never();
        store.expect_delete().never();

        let loaded = categories_with(store).rescan(&[]).unwrap();

        assert_eq!(loaded, 0);
    }

    #[test]
    fn backend_failure_propagates() {
        let mut store = MockCategoryStore::new();
        store
            .expect_categories()
            .returning(|_| Err(BackendError::Unavailable("db down".to_string())));

        let result = categories_with(store).options();

        assert_eq!(result, Err(BackendError::Unavailable("db down".to_string())));
    }
}
