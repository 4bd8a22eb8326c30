use serde::{Deserialize, Serialize};

/// A registered room
/// Field names follow the persisted JSON layout (`roomNo`, `hasAC`, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    /// Unique room identifier
    #[serde(rename = "roomNo")]
    pub room_no: String,
    /// Number of students the room can hold (at least 1)
    pub capacity: u32,
    /// Whether the room is air-conditioned
    #[serde(rename = "hasAC")]
    pub has_ac: bool,
    /// Whether the room has its own washroom
    #[serde(rename = "hasAttachedWashroom")]
    pub has_attached_washroom: bool,
}

impl Room {
    pub fn new(
        room_no: impl Into<String>,
        capacity: u32,
        has_ac: bool,
        has_attached_washroom: bool,
    ) -> Self {
        Room {
            room_no: room_no.into(),
            capacity,
            has_ac,
            has_attached_washroom,
        }
    }

    /// Capacity with a pluralized unit, e.g. "1 student" or "4 students"
    pub fn capacity_label(&self) -> String {
        if self.capacity > 1 {
            format!("{} students", self.capacity)
        } else {
            format!("{} student", self.capacity)
        }
    }

    /// Short amenity badges for list display
    pub fn amenity_badges(&self) -> Vec<&'static str> {
        let mut badges = Vec::new();
        if self.has_ac {
            badges.push("AC");
        }
        if self.has_attached_washroom {
            badges.push("Washroom");
        }
        badges
    }

    /// Check whether this room can host a group with the given needs
    /// An amenity that is not requested is not a constraint
    pub fn satisfies(&self, request: &RoomRequest) -> bool {
        self.capacity >= request.students
            && (!request.needs_ac || self.has_ac)
            && (!request.needs_washroom || self.has_attached_washroom)
    }
}

/// Requirements of a student group asking for a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomRequest {
    pub students: u32,
    pub needs_ac: bool,
    pub needs_washroom: bool,
}

impl RoomRequest {
    pub fn new(students: u32, needs_ac: bool, needs_washroom: bool) -> Self {
        RoomRequest {
            students,
            needs_ac,
            needs_washroom,
        }
    }
}
