use std::collections::{BTreeSet, HashSet};

use super::error::{RegistryError, RegistryResult};
use super::filter::RoomFilter;
use super::room::{Room, RoomRequest};

/// Counts shown in the stats bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomStats {
    pub total: usize,
    pub allocated: usize,
    pub free: usize,
}

/// Registry of rooms and their occupancy
///
/// Rooms are kept in registration order, which is also the tie-break order
/// for allocation. The occupancy set only ever names rooms that exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomRegistry {
    /// Registered rooms in insertion order
    rooms: Vec<Room>,
    /// Room numbers currently allocated
    allocated: BTreeSet<String>,
}

impl RoomRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        RoomRegistry {
            rooms: Vec::new(),
            allocated: BTreeSet::new(),
        }
    }

    /// Rebuild a registry from persisted collections
    ///
    /// Invalid or duplicate rooms and occupancy entries naming unknown rooms
    /// are dropped so the registry invariants hold.
    pub fn from_parts(rooms: Vec<Room>, allocated: impl IntoIterator<Item = String>) -> Self {
        let mut registry = RoomRegistry::new();
        let mut seen = HashSet::new();

        for room in rooms {
            if room.room_no.trim().is_empty() || room.capacity < 1 {
                log::warn!("Dropping invalid stored room {:?}", room);
                continue;
            }
            if !seen.insert(room.room_no.clone()) {
                log::warn!("Dropping duplicate stored room {}", room.room_no);
                continue;
            }
            registry.rooms.push(room);
        }

        for room_no in allocated {
            if seen.contains(&room_no) {
                registry.allocated.insert(room_no);
            } else {
                log::warn!("Dropping allocation for unknown room {}", room_no);
            }
        }

        registry
    }

    /// Register a new room
    pub fn add_room(
        &mut self,
        room_no: &str,
        capacity: u32,
        has_ac: bool,
        has_washroom: bool,
    ) -> RegistryResult<&Room> {
        let room_no = room_no.trim();

        if room_no.is_empty() {
            return Err(RegistryError::Validation(
                "Please enter a room number".to_string(),
            ));
        }

        if capacity < 1 {
            return Err(RegistryError::Validation(
                "Capacity must be at least 1".to_string(),
            ));
        }

        if self.contains(room_no) {
            return Err(RegistryError::Validation(format!(
                "Room {} already exists!",
                room_no
            )));
        }

        self.rooms
            .push(Room::new(room_no, capacity, has_ac, has_washroom));
        log::debug!("Registered room {} (capacity {})", room_no, capacity);

        Ok(&self.rooms[self.rooms.len() - 1])
    }

    /// Remove a room, releasing it first if allocated
    /// Returns false if no such room was registered
    pub fn delete_room(&mut self, room_no: &str) -> bool {
        let room_no = room_no.trim();
        let before = self.rooms.len();
        self.rooms.retain(|room| room.room_no != room_no);
        self.allocated.remove(room_no);

        let removed = self.rooms.len() != before;
        if removed {
            log::debug!("Deleted room {}", room_no);
        }
        removed
    }

    /// Allocate the best-fit free room for a group
    ///
    /// Among free rooms that are large enough and have every requested
    /// amenity, the one with the smallest capacity wins; equal capacities
    /// go to the room registered first.
    pub fn allocate(
        &mut self,
        student_count: u32,
        needs_ac: bool,
        needs_washroom: bool,
    ) -> RegistryResult<Room> {
        self.allocate_for(&RoomRequest::new(student_count, needs_ac, needs_washroom))
    }

    /// Allocate for a prepared request (see [`RoomRegistry::allocate`])
    pub fn allocate_for(&mut self, request: &RoomRequest) -> RegistryResult<Room> {
        if request.students < 1 {
            return Err(RegistryError::Validation(
                "Enter a valid number of students".to_string(),
            ));
        }

        let best = self
            .rooms
            .iter()
            .filter(|room| !self.allocated.contains(&room.room_no))
            .filter(|room| room.satisfies(request))
            .min_by_key(|room| room.capacity)
            .cloned()
            .ok_or(RegistryError::NoRoomAvailable)?;

        self.allocated.insert(best.room_no.clone());
        log::debug!(
            "Allocated room {} for {} students",
            best.room_no,
            request.students
        );

        Ok(best)
    }

    /// Free an allocated room
    pub fn release(&mut self, room_no: &str) -> RegistryResult<()> {
        let room_no = room_no.trim();

        if room_no.is_empty() {
            return Err(RegistryError::Validation("Enter a room number".to_string()));
        }

        if !self.contains(room_no) {
            return Err(RegistryError::NotFound(room_no.to_string()));
        }

        if !self.allocated.remove(room_no) {
            return Err(RegistryError::NotAllocated(room_no.to_string()));
        }

        log::debug!("Released room {}", room_no);
        Ok(())
    }

    /// Rooms matching the filter, in registration order
    pub fn filter(&self, filter: &RoomFilter) -> Vec<&Room> {
        self.rooms.iter().filter(|room| filter.matches(room)).collect()
    }

    /// All rooms in registration order
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Look up a room by number
    pub fn room(&self, room_no: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.room_no == room_no)
    }

    /// Check if a room with this number is registered
    pub fn contains(&self, room_no: &str) -> bool {
        self.room(room_no).is_some()
    }

    /// Check if a room is currently allocated
    pub fn is_allocated(&self, room_no: &str) -> bool {
        self.allocated.contains(room_no)
    }

    /// Allocated room numbers in sorted order
    pub fn allocated_rooms(&self) -> impl Iterator<Item = &str> {
        self.allocated.iter().map(String::as_str)
    }

    pub fn stats(&self) -> RoomStats {
        let total = self.rooms.len();
        let allocated = self.allocated.len();
        RoomStats {
            total,
            allocated,
            free: total - allocated,
        }
    }

    /// Get the number of registered rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Check if no rooms are registered
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filter::{CapacityFilter, TriState};

    fn registry_with(rooms: &[(&str, u32, bool, bool)]) -> RoomRegistry {
        let mut registry = RoomRegistry::new();
        for &(no, cap, ac, wr) in rooms {
            registry.add_room(no, cap, ac, wr).unwrap();
        }
        registry
    }

    #[test]
    fn test_add_room_rejects_duplicates() {
        let mut registry = registry_with(&[("101", 2, false, false)]);

        let err = registry.add_room("101", 4, true, true).unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.rooms()[0].capacity, 2);
    }

    #[test]
    fn test_add_room_validates_input() {
        let mut registry = RoomRegistry::new();

        assert!(matches!(
            registry.add_room("   ", 2, false, false),
            Err(RegistryError::Validation(_))
        ));
        assert!(matches!(
            registry.add_room("101", 0, false, false),
            Err(RegistryError::Validation(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_room_trims_room_number() {
        let mut registry = RoomRegistry::new();
        registry.add_room("  A1 ", 2, false, false).unwrap();

        assert!(registry.contains("A1"));
        assert!(registry.add_room("A1", 3, false, false).is_err());
    }

    #[test]
    fn test_allocate_picks_smallest_fit() {
        let mut registry = registry_with(&[
            ("big", 6, false, false),
            ("small", 2, false, false),
            ("mid", 3, false, false),
        ]);

        let room = registry.allocate(2, false, false).unwrap();
        assert_eq!(room.room_no, "small");

        let room = registry.allocate(2, false, false).unwrap();
        assert_eq!(room.room_no, "mid");
    }

    #[test]
    fn test_allocate_amenity_example_uses_list_order() {
        // B before C: equal capacity resolves to the first registered
        let mut registry = registry_with(&[
            ("A", 2, false, false),
            ("B", 4, true, true),
            ("C", 4, true, false),
        ]);
        assert_eq!(registry.allocate(3, true, false).unwrap().room_no, "B");

        // C before B
        let mut registry = registry_with(&[
            ("A", 2, false, false),
            ("C", 4, true, false),
            ("B", 4, true, true),
        ]);
        assert_eq!(registry.allocate(3, true, false).unwrap().room_no, "C");

        // B absent
        let mut registry = registry_with(&[("A", 2, false, false), ("C", 4, true, false)]);
        assert_eq!(registry.allocate(3, true, false).unwrap().room_no, "C");
    }

    #[test]
    fn test_allocate_never_reuses_occupied_room() {
        let mut registry = registry_with(&[("101", 2, false, false), ("102", 2, false, false)]);

        let first = registry.allocate(1, false, false).unwrap();
        assert!(registry.is_allocated(&first.room_no));

        let second = registry.allocate(1, false, false).unwrap();
        assert_ne!(first.room_no, second.room_no);
        assert!(registry.is_allocated(&second.room_no));

        assert_eq!(
            registry.allocate(1, false, false),
            Err(RegistryError::NoRoomAvailable)
        );
        assert_eq!(registry.stats().allocated, 2);
    }

    #[test]
    fn test_allocate_no_match_leaves_state() {
        let mut registry = registry_with(&[("101", 2, false, false)]);
        let before = registry.clone();

        assert_eq!(
            registry.allocate(3, false, false),
            Err(RegistryError::NoRoomAvailable)
        );
        assert_eq!(
            registry.allocate(1, true, false),
            Err(RegistryError::NoRoomAvailable)
        );
        assert!(matches!(
            registry.allocate(0, false, false),
            Err(RegistryError::Validation(_))
        ));
        assert_eq!(registry, before);
    }

    #[test]
    fn test_release_then_allocate_returns_same_room() {
        let mut registry = registry_with(&[("101", 2, false, false), ("102", 5, false, false)]);

        let room = registry.allocate(2, false, false).unwrap();
        assert_eq!(room.room_no, "101");

        registry.release("101").unwrap();
        assert!(!registry.is_allocated("101"));

        let again = registry.allocate(2, false, false).unwrap();
        assert_eq!(again.room_no, "101");
    }

    #[test]
    fn test_release_errors() {
        let mut registry = registry_with(&[("101", 2, false, false)]);

        assert_eq!(
            registry.release("999"),
            Err(RegistryError::NotFound("999".to_string()))
        );
        assert_eq!(
            registry.release("101"),
            Err(RegistryError::NotAllocated("101".to_string()))
        );
        assert!(matches!(
            registry.release(""),
            Err(RegistryError::Validation(_))
        ));
    }

    #[test]
    fn test_delete_cascades_to_occupancy() {
        let mut registry = registry_with(&[("101", 2, false, false)]);
        registry.allocate(1, false, false).unwrap();
        assert!(registry.is_allocated("101"));

        assert!(registry.delete_room("101"));
        assert!(!registry.is_allocated("101"));
        assert_eq!(registry.allocated_rooms().count(), 0);

        // Idempotent
        assert!(!registry.delete_room("101"));
    }

    #[test]
    fn test_delete_trims_room_number() {
        let mut registry = RoomRegistry::new();
        registry.add_room(" 101 ", 2, false, false).unwrap();
        registry.allocate(2, false, false).unwrap();

        assert!(registry.delete_room(" 101 "));
        assert!(registry.is_empty());
        assert_eq!(registry.allocated_rooms().count(), 0);
    }

    #[test]
    fn test_filter_four_or_more() {
        let registry = registry_with(&[
            ("r1", 1, false, false),
            ("r3", 3, false, false),
            ("r4", 4, false, false),
            ("r5", 5, false, false),
        ]);

        let filter = RoomFilter {
            capacity: Some(CapacityFilter::FourOrMore),
            ..Default::default()
        };
        let names: Vec<&str> = registry
            .filter(&filter)
            .iter()
            .map(|r| r.room_no.as_str())
            .collect();
        assert_eq!(names, vec!["r4", "r5"]);
    }

    #[test]
    fn test_filter_keeps_list_order() {
        let registry = registry_with(&[
            ("B2", 2, true, false),
            ("A1", 2, true, true),
            ("B1", 2, false, false),
        ]);

        let filter = RoomFilter {
            search: "b".to_string(),
            ac: TriState::Yes,
            ..Default::default()
        };
        let names: Vec<&str> = registry
            .filter(&filter)
            .iter()
            .map(|r| r.room_no.as_str())
            .collect();
        assert_eq!(names, vec!["B2"]);

        assert_eq!(registry.filter(&RoomFilter::default()).len(), 3);
    }

    #[test]
    fn test_from_parts_drops_dangling_allocations() {
        let rooms = vec![
            Room::new("101", 2, false, false),
            Room::new("101", 3, false, false),
            Room::new("102", 0, false, false),
        ];
        let registry =
            RoomRegistry::from_parts(rooms, vec!["101".to_string(), "ghost".to_string()]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.rooms()[0].capacity, 2);
        assert!(registry.is_allocated("101"));
        assert!(!registry.is_allocated("ghost"));
    }

    #[test]
    fn test_stats() {
        let mut registry = registry_with(&[("101", 2, false, false), ("102", 2, false, false)]);
        registry.allocate(1, false, false).unwrap();

        assert_eq!(
            registry.stats(),
            RoomStats {
                total: 2,
                allocated: 1,
                free: 1
            }
        );
    }
}
