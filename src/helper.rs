use std::sync::Arc;

use thiserror::Error;

use crate::backend::{
    BackendError, CalendarStore, Categories, CategoryStore, ItemType, ObjectStore, Permissions,
    ShareBackend, Translator,
};
use crate::calendar::{
    CalendarError, CalendarObject, CalendarRecord, EventSource, NewCalendar, RawCalendar,
    StoredObject,
};
use crate::storage::{Config, SourceHashCache};
use crate::sync::{StaleWrite, ensure_unmodified};
use crate::ui::color::{self, Color};

#[derive(Debug, Error)]
pub enum HelperError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("Creating a new calendar failed: {0}")]
    CalendarCreation(String),
    #[error("Object not found: {0}")]
    ObjectNotFound(String),
    #[error(transparent)]
    Modified(#[from] StaleWrite),
    #[error("Invalid calendar data: {0}")]
    InvalidCalendar(#[from] CalendarError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefaultCalendar {
    Existing,
    Created(String),
}

/// Collaborators supplied by the host application.
pub struct Services {
    pub calendars: Arc<dyn CalendarStore + Send + Sync>,
    pub objects: Arc<dyn ObjectStore + Send + Sync>,
    pub shares: Arc<dyn ShareBackend + Send + Sync>,
    pub categories: Arc<dyn CategoryStore + Send + Sync>,
    pub translator: Arc<dyn Translator + Send + Sync>,
}

pub struct CalendarHelper {
    config: Config,
    calendars: Arc<dyn CalendarStore + Send + Sync>,
    objects: Arc<dyn ObjectStore + Send + Sync>,
    shares: Arc<dyn ShareBackend + Send + Sync>,
    translator: Arc<dyn Translator + Send + Sync>,
    categories: Categories,
}

impl CalendarHelper {
    pub fn new(config: Config, services: Services) -> Self {
        let categories = Categories::new(
            services.categories,
            config.categories.domain.clone(),
            &*services.translator,
        );

        Self {
            config,
            calendars: services.calendars,
            objects: services.objects,
            shares: services.shares,
            translator: services.translator,
            categories,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn translate(&self, key: &str) -> String {
        self.translator.translate(key)
    }

    pub fn text_color(&self, background: Color) -> Color {
        color::text_color_with(background, self.config.colors.blue_channel)
    }

    pub fn border_color(&self, background: Color) -> Color {
        color::border_color_with(background, self.config.colors.blue_channel)
    }

    /// Makes sure `user` has at least one calendar they can write to.
    pub fn create_default_calendar(&self, user: &str) -> Result<DefaultCalendar, HelperError> {
        let writable = self.calendars.calendars_by_user(user, false, true)?;
        if !writable.is_empty() {
            tracing::debug!("{} already has {} writable calendars", user, writable.len());
            return Ok(DefaultCalendar::Existing);
        }

        let backend = self
            .config
            .calendar
            .default_backend
            .clone()
            .unwrap_or_else(|| self.calendars.default_backend());
        let calendar = NewCalendar {
            owner: user.to_string(),
            display_name: self.translator.translate_with("%s's calendar", &[user]),
            color: self.config.calendar.default_color,
        };

        match self.calendars.create_calendar(&backend, &calendar) {
            Ok(Some(id)) => {
                tracing::info!("Created default calendar {} for {} on {}", id, user, backend);
                Ok(DefaultCalendar::Created(id))
            }
            Ok(None) => {
                tracing::error!("Backend {} declined to create a calendar for {}", backend, user);
                Err(HelperError::CalendarCreation(format!(
                    "backend '{backend}' returned no calendar"
                )))
            }
            Err(e) => {
                tracing::error!("Creating default calendar for {} failed: {}", user, e);
                Err(HelperError::CalendarCreation(e.to_string()))
            }
        }
    }

    /// Lists every calendar of `user`, disabled ones included, as event
    /// sources. `cache` is rebuilt to map each source hash to its calendar.
    pub fn fetch_event_sources(
        &self,
        user: &str,
        cache: &mut SourceHashCache,
    ) -> Result<Vec<EventSource>, HelperError> {
        cache.clear();

        let records = self.valid_records(self.calendars.calendars_by_user(user, false, false)?);
        let sources: Vec<EventSource> = records
            .iter()
            .map(|record| {
                let source = EventSource::from_record(record, self.config.colors.blue_channel);
                cache.insert(source.hash.clone(), record.id.clone());
                source
            })
            .collect();

        tracing::debug!("Listed {} event sources for {}", sources.len(), user);
        Ok(sources)
    }

    pub fn permissions(
        &self,
        user: &str,
        item_id: &str,
        item_type: ItemType,
    ) -> Result<Permissions, HelperError> {
        match item_type {
            ItemType::Calendar => self.calendar_permissions(user, item_id),
            ItemType::Event => self.event_permissions(user, item_id),
        }
    }

    fn calendar_permissions(&self, user: &str, calendar_id: &str) -> Result<Permissions, HelperError> {
        let Some(raw) = self.calendars.find_calendar(calendar_id)? else {
            tracing::debug!("Permission lookup for unknown calendar {}", calendar_id);
            return Ok(Permissions::NONE);
        };

        if raw.owner() == Some(user) {
            return Ok(Permissions::ALL);
        }

        Ok(self
            .shares
            .shared_with(user, ItemType::Calendar, calendar_id)?
            .unwrap_or_default())
    }

    fn event_permissions(&self, user: &str, object_id: &str) -> Result<Permissions, HelperError> {
        let Some(object) = self.objects.find_object(object_id)? else {
            tracing::debug!("Permission lookup for unknown object {}", object_id);
            return Ok(Permissions::NONE);
        };

        if object.owner == user {
            return Ok(Permissions::ALL);
        }

        let calendar = self
            .shares
            .shared_with(user, ItemType::Calendar, &object.calendar_id)?
            .unwrap_or_default();
        let event = self
            .shares
            .shared_with(user, ItemType::Event, object_id)?
            .unwrap_or_default();

        Ok(calendar.max(event))
    }

    pub fn default_categories(&self) -> &[String] {
        self.categories.defaults()
    }

    /// Categories offered to `user`. An empty store is rebuilt from the
    /// user's objects first and seeded with the defaults if still empty.
    pub fn category_options(&self, user: &str) -> Result<Vec<String>, HelperError> {
        if self.categories.is_empty()? {
            self.scan_categories(user, None)?;
        }
        self.categories.seed_defaults_if_empty()?;
        Ok(self.categories.options()?)
    }

    pub fn load_categories_from_calendar(&self, object_id: &str, data: &str) -> Result<(), HelperError> {
        let object = CalendarObject::parse(data)?;
        self.categories.load_from_object(object_id, &object)?;
        Ok(())
    }

    /// Rebuilds the category store from `objects`, or from every object in
    /// the calendars `user` owns when none are given.
    pub fn scan_categories(
        &self,
        user: &str,
        objects: Option<Vec<StoredObject>>,
    ) -> Result<usize, HelperError> {
        let objects = match objects {
            Some(objects) => objects,
            None => self.owned_objects(user)?,
        };
        Ok(self.categories.rescan(&objects)?)
    }

    fn owned_objects(&self, user: &str) -> Result<Vec<StoredObject>, HelperError> {
        let records = self.valid_records(self.calendars.calendars_by_user(user, false, false)?);
        let mut objects = Vec::new();
        for record in records.iter().filter(|record| record.owner == user) {
            objects.extend(self.objects.objects_in_calendar(&record.id)?);
        }
        Ok(objects)
    }

    /// Replaces an object's data unless it changed since `submitted`
    /// (unix seconds). A stale submission touches nothing.
    pub fn update_object(&self, object_id: &str, submitted: i64, data: &str) -> Result<(), HelperError> {
        let object = self
            .objects
            .find_object(object_id)?
            .ok_or_else(|| HelperError::ObjectNotFound(object_id.to_string()))?;

        if let Err(conflict) = ensure_unmodified(&object, submitted) {
            tracing::info!("Rejecting stale write: {}", conflict);
            return Err(conflict.into());
        }

        self.objects.update_object(object_id, data)?;

        // The write has landed; a failed category reload must not report it as failed.
        match CalendarObject::parse(data) {
            Ok(parsed) => {
                if let Err(e) = self.categories.load_from_object(object_id, &parsed) {
                    tracing::warn!("Reloading categories of object {} failed: {}", object_id, e);
                }
            }
            Err(e) => tracing::warn!("Updated object {} has unreadable data: {}", object_id, e),
        }

        Ok(())
    }

    fn valid_records(&self, raw: Vec<RawCalendar>) -> Vec<CalendarRecord> {
        raw.iter()
            .filter_map(|raw| match CalendarRecord::try_from(raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping calendar with invalid properties: {}", e);
                    None
                }
            })
            .collect()
    }
}
