//! Saved vehicles ("My Garage").
//!
//! The garage owns the in-memory list and writes through to a
//! [`VehicleStorage`] backend before changing it. Every successful write is
//! announced on a broadcast channel so that any view holding a receiver can
//! refresh without polling.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::sync::broadcast;
use treadline_core::VehicleSelection;

use crate::error::GarageError;

/// Logical storage key for the saved-vehicle list.
pub const STORAGE_KEY: &str = "userVehicles";

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GarageEvent {
    VehiclesUpdated { count: usize },
}

/// Where the saved-vehicle list lives between runs.
pub trait VehicleStorage {
    /// Reads the stored list. Unreadable data loads as empty.
    fn load(&self) -> Vec<VehicleSelection>;

    /// Replaces the stored list.
    ///
    /// # Errors
    ///
    /// Returns [`GarageError`] when the list cannot be encoded or written.
    fn persist(&self, vehicles: &[VehicleSelection]) -> Result<(), GarageError>;
}

/// Stores the list as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> GarageError {
        GarageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl VehicleStorage for JsonFileStorage {
    fn load(&self) -> Vec<VehicleSelection> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    key = STORAGE_KEY,
                    "saved vehicles unreadable; starting empty"
                );
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(vehicles) => vehicles,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    key = STORAGE_KEY,
                    "saved vehicles corrupt; starting empty"
                );
                Vec::new()
            }
        }
    }

    fn persist(&self, vehicles: &[VehicleSelection]) -> Result<(), GarageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(vehicles)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// Process-local storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    vehicles: Mutex<Vec<VehicleSelection>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new(vehicles: Vec<VehicleSelection>) -> Self {
        Self {
            vehicles: Mutex::new(vehicles),
        }
    }
}

impl VehicleStorage for MemoryStorage {
    fn load(&self) -> Vec<VehicleSelection> {
        self.vehicles
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .to_vec()
    }

    fn persist(&self, vehicles: &[VehicleSelection]) -> Result<(), GarageError> {
        let mut guard = self
            .vehicles
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = vehicles.to_vec();
        Ok(())
    }
}

pub struct Garage<S> {
    storage: S,
    vehicles: Vec<VehicleSelection>,
    events: broadcast::Sender<GarageEvent>,
}

impl<S: VehicleStorage> Garage<S> {
    /// Loads the stored list, dropping duplicate entries.
    #[must_use]
    pub fn open(storage: S) -> Self {
        let mut vehicles: Vec<VehicleSelection> = Vec::new();
        for vehicle in storage.load() {
            if !vehicles.contains(&vehicle) {
                vehicles.push(vehicle);
            }
        }
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            vehicles,
            events,
        }
    }

    #[must_use]
    pub fn list(&self) -> &[VehicleSelection] {
        &self.vehicles
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GarageEvent> {
        self.events.subscribe()
    }

    /// Adds `vehicle` unless an identical one is already saved. Returns whether
    /// it was added.
    ///
    /// # Errors
    ///
    /// [`GarageError::IncompleteVehicle`] when any field is empty, or a
    /// storage error from the backend.
    pub fn save(&mut self, vehicle: VehicleSelection) -> Result<bool, GarageError> {
        if !vehicle.is_complete() {
            return Err(GarageError::IncompleteVehicle(vehicle.describe()));
        }
        if self.vehicles.contains(&vehicle) {
            tracing::debug!(vehicle = %vehicle.describe(), "vehicle already saved");
            return Ok(false);
        }
        let mut next = self.vehicles.clone();
        next.push(vehicle);
        self.write(next)?;
        Ok(true)
    }

    /// Removes `vehicle` if saved. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the backend.
    pub fn remove(&mut self, vehicle: &VehicleSelection) -> Result<bool, GarageError> {
        if !self.vehicles.contains(vehicle) {
            return Ok(false);
        }
        let next = self
            .vehicles
            .iter()
            .filter(|v| *v != vehicle)
            .cloned()
            .collect();
        self.write(next)?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns a storage error from the backend.
    pub fn clear(&mut self) -> Result<(), GarageError> {
        self.write(Vec::new())
    }

    fn write(&mut self, next: Vec<VehicleSelection>) -> Result<(), GarageError> {
        self.storage.persist(&next)?;
        self.vehicles = next;
        let count = self.vehicles.len();
        // Err only means nobody is subscribed.
        let _ = self.events.send(GarageEvent::VehiclesUpdated { count });
        tracing::info!(count, "saved vehicles updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civic() -> VehicleSelection {
        VehicleSelection {
            year: "2020".to_owned(),
            make: "Honda".to_owned(),
            model: "Civic".to_owned(),
            trim: "EX".to_owned(),
            tire_size: "215/55R16".to_owned(),
        }
    }

    fn camry() -> VehicleSelection {
        VehicleSelection {
            year: "2019".to_owned(),
            make: "Toyota".to_owned(),
            model: "Camry".to_owned(),
            trim: "LE".to_owned(),
            tire_size: "205/65R16".to_owned(),
        }
    }

    #[test]
    fn saving_same_vehicle_twice_keeps_one_entry() {
        let mut garage = Garage::open(MemoryStorage::default());
        assert!(garage.save(civic()).unwrap());
        assert!(!garage.save(civic()).unwrap());
        assert_eq!(garage.list(), [civic()]);
    }

    #[test]
    fn vehicles_differing_in_one_field_are_distinct() {
        let mut garage = Garage::open(MemoryStorage::default());
        garage.save(civic()).unwrap();
        let mut other_trim = civic();
        other_trim.trim = "Sport".to_owned();
        assert!(garage.save(other_trim).unwrap());
        assert_eq!(garage.list().len(), 2);
    }

    #[test]
    fn incomplete_vehicle_is_rejected() {
        let mut garage = Garage::open(MemoryStorage::default());
        let mut partial = civic();
        partial.tire_size.clear();
        let err = garage.save(partial).unwrap_err();
        assert!(matches!(err, GarageError::IncompleteVehicle(_)));
        assert!(garage.list().is_empty());
    }

    #[test]
    fn open_drops_duplicates_from_storage() {
        let garage = Garage::open(MemoryStorage::new(vec![civic(), camry(), civic()]));
        assert_eq!(garage.list(), [civic(), camry()]);
    }

    #[test]
    fn subscribers_hear_every_write() {
        let mut garage = Garage::open(MemoryStorage::default());
        let mut rx = garage.subscribe();

        garage.save(civic()).unwrap();
        garage.save(camry()).unwrap();
        garage.remove(&civic()).unwrap();
        garage.clear().unwrap();

        let counts: Vec<usize> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|GarageEvent::VehiclesUpdated { count }| count)
            .collect();
        assert_eq!(counts, vec![1, 2, 1, 0]);
    }

    #[test]
    fn duplicate_save_publishes_nothing() {
        let mut garage = Garage::open(MemoryStorage::new(vec![civic()]));
        let mut rx = garage.subscribe();
        garage.save(civic()).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn remove_of_unknown_vehicle_is_a_no_op() {
        let mut garage = Garage::open(MemoryStorage::new(vec![civic()]));
        assert!(!garage.remove(&camry()).unwrap());
        assert_eq!(garage.list().len(), 1);
    }

    #[test]
    fn file_storage_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("userVehicles.json");

        let mut garage = Garage::open(JsonFileStorage::new(&path));
        assert!(garage.list().is_empty(), "missing file loads as empty");
        garage.save(civic()).unwrap();

        let reopened = Garage::open(JsonFileStorage::new(&path));
        assert_eq!(reopened.list(), [civic()]);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"tireSize\": \"215/55R16\""));
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userVehicles.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut garage = Garage::open(JsonFileStorage::new(&path));
        assert!(garage.list().is_empty());
        garage.save(camry()).unwrap();
        assert_eq!(JsonFileStorage::new(&path).load(), vec![camry()]);
    }
}
