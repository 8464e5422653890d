//! Connector service for the shared admin collections.
//!
//! The service owns a [`JsonStore`] and an [`EventBus`]. Every successful
//! write to a shared collection is persisted first and then announced to all
//! registered listeners with the full updated collection. Writes to a store
//! that is not available are dropped and not announced.

pub mod events;
pub mod views;

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::kv::{keys, JsonStore};
use crate::model::{
    Batch, Course, Department, Faculty, Record, Schedule, Student, Ticket, TicketFilter,
    TicketResponse, TicketStatus,
};
use crate::portal::Collection;

pub use events::{ChangeEvent, EventBus, Subscription};
pub use views::{CourseView, ScheduleView};

/// Names of the shared collections, as announced to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Support tickets.
    Tickets,
    /// Departments.
    Departments,
    /// Faculty members.
    Faculty,
    /// Students.
    Students,
    /// Courses.
    Courses,
    /// Batches.
    Batches,
    /// Class schedules.
    Schedules,
}

impl DataType {
    /// Every shared collection, in display order.
    pub const ALL: [Self; 7] = [
        Self::Tickets,
        Self::Departments,
        Self::Faculty,
        Self::Students,
        Self::Courses,
        Self::Batches,
        Self::Schedules,
    ];

    /// The storage key holding this collection.
    #[must_use]
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Tickets => keys::TICKETS,
            Self::Departments => keys::DEPARTMENTS,
            Self::Faculty => keys::FACULTY,
            Self::Students => keys::STUDENTS,
            Self::Courses => keys::COURSES,
            Self::Batches => keys::BATCHES,
            Self::Schedules => keys::SCHEDULES,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// A record type managed by the connector service.
pub trait SharedEntity: Record {
    /// The collection this type is stored in.
    const DATA_TYPE: DataType;
}

macro_rules! shared_entity {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl SharedEntity for $ty {
                const DATA_TYPE: DataType = DataType::$variant;
            }
        )+
    };
}

shared_entity!(
    Ticket => Tickets,
    Department => Departments,
    Faculty => Faculty,
    Student => Students,
    Course => Courses,
    Batch => Batches,
    Schedule => Schedules,
);

/// A shared collection whose writes are announced on the service's bus.
///
/// Over a store that does not retain writes nothing is announced, so
/// listeners never see records that `get_all` would not return.
pub struct SharedCollection<T> {
    collection: Collection<T>,
    bus: EventBus,
    announce: bool,
}

impl<T> fmt::Debug for SharedCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCollection")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl<T> Clone for SharedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            bus: self.bus.clone(),
            announce: self.announce,
        }
    }
}

impl<T: SharedEntity> SharedCollection<T> {
    fn new(store: JsonStore, bus: EventBus) -> Self {
        Self {
            announce: store.is_available(),
            collection: Collection::new(store, T::DATA_TYPE.storage_key()),
            bus,
        }
    }

    fn notify(&self, records: &[T]) -> Result<()> {
        if !self.announce {
            debug!("Storage disabled, '{}' change not announced", T::DATA_TYPE);
            return Ok(());
        }
        let event = ChangeEvent {
            data_type: T::DATA_TYPE,
            data: serde_json::to_value(records)?,
        };
        let delivered = self.bus.emit(&event);
        debug!(
            "Announced '{}' change ({} records) to {} listeners",
            T::DATA_TYPE,
            records.len(),
            delivered
        );
        Ok(())
    }

    /// All records.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored value is corrupt.
    pub fn get_all(&self) -> Result<Vec<T>> {
        self.collection.get_all()
    }

    /// First record with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn get_by_id(&self, id: &str) -> Result<Option<T>> {
        self.collection.get_by_id(id)
    }

    /// Append a record and announce the change. Duplicate ids are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn create(&self, record: T) -> Result<Vec<T>> {
        let records = self.collection.add(record)?;
        self.notify(&records)?;
        Ok(records)
    }

    /// Replace the record with the same id and announce the change.
    ///
    /// An unknown id writes nothing and notifies nobody.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn update(&self, record: T) -> Result<Vec<T>> {
        let (records, matched) = self.collection.try_update(record)?;
        if matched {
            self.notify(&records)?;
        }
        Ok(records)
    }

    /// Apply `change` to the record with the given id and announce the
    /// change, returning the updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn update_with(&self, id: &str, change: impl FnOnce(&mut T)) -> Result<Option<T>> {
        let Some(updated) = self.collection.update_with(id, change)? else {
            return Ok(None);
        };
        let records = self.collection.get_all()?;
        self.notify(&records)?;
        Ok(Some(updated))
    }

    /// Remove every record with the given id and announce the change.
    ///
    /// An unknown id writes nothing and notifies nobody.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn delete(&self, id: &str) -> Result<Vec<T>> {
        let (records, removed) = self.collection.try_delete(id)?;
        if removed > 0 {
            self.notify(&records)?;
        }
        Ok(records)
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn count(&self) -> Result<usize> {
        Ok(self.collection.get_all()?.len())
    }

    fn initialize_if_empty(&self) -> Result<bool> {
        self.collection.initialize_if_empty()
    }
}

/// Entry point for reading and writing the shared admin collections.
#[derive(Debug, Clone)]
pub struct ConnectorService {
    store: JsonStore,
    bus: EventBus,
}

impl ConnectorService {
    /// Create a service over `store` with no listeners.
    #[must_use]
    pub fn new(store: JsonStore) -> Self {
        Self {
            store,
            bus: EventBus::new(),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Register a listener for every subsequent write.
    pub fn add_change_listener<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(listener)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }

    /// The shared collection holding `T`.
    #[must_use]
    pub fn collection<T: SharedEntity>(&self) -> SharedCollection<T> {
        SharedCollection::new(self.store.clone(), self.bus.clone())
    }

    /// Support tickets.
    #[must_use]
    pub fn tickets(&self) -> SharedCollection<Ticket> {
        self.collection()
    }

    /// Departments.
    #[must_use]
    pub fn departments(&self) -> SharedCollection<Department> {
        self.collection()
    }

    /// Faculty members.
    #[must_use]
    pub fn faculty(&self) -> SharedCollection<Faculty> {
        self.collection()
    }

    /// Students.
    #[must_use]
    pub fn students(&self) -> SharedCollection<Student> {
        self.collection()
    }

    /// Courses.
    #[must_use]
    pub fn courses(&self) -> SharedCollection<Course> {
        self.collection()
    }

    /// Batches.
    #[must_use]
    pub fn batches(&self) -> SharedCollection<Batch> {
        self.collection()
    }

    /// Class schedules.
    #[must_use]
    pub fn schedules(&self) -> SharedCollection<Schedule> {
        self.collection()
    }

    /// Store an empty array for every shared collection that has no value
    /// yet. Existing data is never touched and no listener is notified.
    ///
    /// Returns the collections that were initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if any read or write fails.
    pub fn initialize_if_empty(&self) -> Result<Vec<DataType>> {
        let mut initialized = Vec::new();
        for data_type in DataType::ALL {
            let written = match data_type {
                DataType::Tickets => self.tickets().initialize_if_empty()?,
                DataType::Departments => self.departments().initialize_if_empty()?,
                DataType::Faculty => self.faculty().initialize_if_empty()?,
                DataType::Students => self.students().initialize_if_empty()?,
                DataType::Courses => self.courses().initialize_if_empty()?,
                DataType::Batches => self.batches().initialize_if_empty()?,
                DataType::Schedules => self.schedules().initialize_if_empty()?,
            };
            if written {
                initialized.push(data_type);
            }
        }
        if !initialized.is_empty() {
            info!("Initialized {} shared collections", initialized.len());
        }
        Ok(initialized)
    }

    /// Record counts for every shared collection, in [`DataType::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails.
    pub fn collection_counts(&self) -> Result<Vec<(DataType, usize)>> {
        DataType::ALL
            .into_iter()
            .map(|data_type| {
                let count = match data_type {
                    DataType::Tickets => self.tickets().count()?,
                    DataType::Departments => self.departments().count()?,
                    DataType::Faculty => self.faculty().count()?,
                    DataType::Students => self.students().count()?,
                    DataType::Courses => self.courses().count()?,
                    DataType::Batches => self.batches().count()?,
                    DataType::Schedules => self.schedules().count()?,
                };
                Ok((data_type, count))
            })
            .collect()
    }

    /// Move a ticket to any status.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn set_ticket_status(&self, id: &str, status: TicketStatus) -> Result<Option<Ticket>> {
        self.tickets().update_with(id, |t| t.status = status)
    }

    /// Hand a ticket to someone.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn assign_ticket(&self, id: &str, assignee: impl Into<String>) -> Result<Option<Ticket>> {
        let assignee = assignee.into();
        self.tickets()
            .update_with(id, |t| t.assigned_to = Some(assignee))
    }

    /// Append a reply to a ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn add_ticket_response(
        &self,
        id: &str,
        response: TicketResponse,
    ) -> Result<Option<Ticket>> {
        self.tickets().update_with(id, |t| t.responses.push(response))
    }

    /// Tickets matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn search_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        let mut tickets: Vec<_> = self
            .tickets()
            .get_all()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    /// Number of tickets still open or in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn active_ticket_count(&self) -> Result<usize> {
        Ok(self
            .tickets()
            .get_all()?
            .iter()
            .filter(|t| t.is_active())
            .count())
    }

    /// Courses with department and instructor names resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails.
    pub fn course_views(&self) -> Result<Vec<CourseView>> {
        Ok(views::join_courses(
            self.courses().get_all()?,
            &self.departments().get_all()?,
            &self.faculty().get_all()?,
        ))
    }

    /// Schedule slots with course, instructor and batch names resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails.
    pub fn schedule_views(&self) -> Result<Vec<ScheduleView>> {
        Ok(views::join_schedules(
            self.schedules().get_all()?,
            &self.courses().get_all()?,
            &self.faculty().get_all()?,
            &self.batches().get_all()?,
        ))
    }
}
