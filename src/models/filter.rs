use std::fmt;
use std::str::FromStr;

use super::error::RegistryError;
use super::room::Room;

/// Capacity at which the capacity filter switches to "or more"
pub const CAPACITY_OPEN_ENDED_FROM: u32 = 4;

/// Capacity filter choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityFilter {
    /// Only rooms with exactly this capacity
    Exactly(u32),
    /// Rooms with capacity 4 or more
    FourOrMore,
}

impl CapacityFilter {
    pub fn matches(&self, capacity: u32) -> bool {
        match self {
            CapacityFilter::Exactly(n) => capacity == *n,
            CapacityFilter::FourOrMore => capacity >= CAPACITY_OPEN_ENDED_FROM,
        }
    }

    /// Next choice when cycling in the TUI: any -> 1 -> 2 -> 3 -> 4+ -> any
    pub fn cycle(current: Option<CapacityFilter>) -> Option<CapacityFilter> {
        match current {
            None => Some(CapacityFilter::Exactly(1)),
            Some(CapacityFilter::Exactly(n)) if n + 1 < CAPACITY_OPEN_ENDED_FROM => {
                Some(CapacityFilter::Exactly(n + 1))
            }
            Some(CapacityFilter::Exactly(_)) => Some(CapacityFilter::FourOrMore),
            Some(CapacityFilter::FourOrMore) => None,
        }
    }

    /// Parse a filter choice where "" or "any" means no capacity filter
    pub fn parse_choice(s: &str) -> Result<Option<CapacityFilter>, RegistryError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl FromStr for CapacityFilter {
    type Err = RegistryError;

    /// Accepts "1".."3", and "4", "4+" or any larger number for the open-ended choice
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('+');
        let value: u32 = trimmed
            .parse()
            .map_err(|_| RegistryError::Validation(format!("Invalid capacity filter '{}'", s)))?;

        match value {
            0 => Err(RegistryError::Validation(
                "Capacity filter must be at least 1".to_string(),
            )),
            n if n >= CAPACITY_OPEN_ENDED_FROM => Ok(CapacityFilter::FourOrMore),
            n => Ok(CapacityFilter::Exactly(n)),
        }
    }
}

impl fmt::Display for CapacityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityFilter::Exactly(n) => write!(f, "{}", n),
            CapacityFilter::FourOrMore => write!(f, "{}+", CAPACITY_OPEN_ENDED_FROM),
        }
    }
}

/// Yes/no filter that can also be left unset
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    #[default]
    Any,
    Yes,
    No,
}

impl TriState {
    pub fn matches(&self, value: bool) -> bool {
        match self {
            TriState::Any => true,
            TriState::Yes => value,
            TriState::No => !value,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            TriState::Any => TriState::Yes,
            TriState::Yes => TriState::No,
            TriState::No => TriState::Any,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, TriState::Any)
    }
}

impl FromStr for TriState {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" => Ok(TriState::Any),
            "yes" | "y" => Ok(TriState::Yes),
            "no" | "n" => Ok(TriState::No),
            other => Err(RegistryError::Validation(format!(
                "Invalid filter value '{}': expected yes, no or any",
                other
            ))),
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TriState::Any => "any",
            TriState::Yes => "yes",
            TriState::No => "no",
        };
        f.write_str(label)
    }
}

/// Combined room list filter; every set criterion must hold
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoomFilter {
    /// Case-insensitive substring of the room number
    pub search: String,
    pub capacity: Option<CapacityFilter>,
    pub ac: TriState,
    pub washroom: TriState,
}

impl RoomFilter {
    pub fn matches(&self, room: &Room) -> bool {
        if !self.search.is_empty()
            && !room
                .room_no
                .to_lowercase()
                .contains(&self.search.to_lowercase())
        {
            return false;
        }

        if let Some(capacity) = &self.capacity
            && !capacity.matches(room.capacity)
        {
            return false;
        }

        self.ac.matches(room.has_ac) && self.washroom.matches(room.has_attached_washroom)
    }

    /// True when any criterion narrows the list
    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || self.capacity.is_some()
            || self.ac.is_set()
            || self.washroom.is_set()
    }

    /// Drop the non-search criteria
    pub fn clear_criteria(&mut self) {
        self.capacity = None;
        self.ac = TriState::Any;
        self.washroom = TriState::Any;
    }

    /// Compact description of the active criteria, e.g. "cap 4+ · AC yes"
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(capacity) = &self.capacity {
            parts.push(format!("cap {}", capacity));
        }
        if self.ac.is_set() {
            parts.push(format!("AC {}", self.ac));
        }
        if self.washroom.is_set() {
            parts.push(format!("WR {}", self.washroom));
        }
        parts.join(" · ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_filter_parse() {
        assert_eq!("1".parse::<CapacityFilter>(), Ok(CapacityFilter::Exactly(1)));
        assert_eq!("3".parse::<CapacityFilter>(), Ok(CapacityFilter::Exactly(3)));
        assert_eq!("4".parse::<CapacityFilter>(), Ok(CapacityFilter::FourOrMore));
        assert_eq!("4+".parse::<CapacityFilter>(), Ok(CapacityFilter::FourOrMore));
        assert_eq!("9".parse::<CapacityFilter>(), Ok(CapacityFilter::FourOrMore));
        assert!("0".parse::<CapacityFilter>().is_err());
        assert!("big".parse::<CapacityFilter>().is_err());

        assert_eq!(CapacityFilter::parse_choice("any"), Ok(None));
        assert_eq!(CapacityFilter::parse_choice("ANY"), Ok(None));
        assert_eq!(CapacityFilter::parse_choice(""), Ok(None));
        assert_eq!(
            CapacityFilter::parse_choice(" 4+ "),
            Ok(Some(CapacityFilter::FourOrMore))
        );
        assert_eq!(
            CapacityFilter::parse_choice("2"),
            Ok(Some(CapacityFilter::Exactly(2)))
        );
        assert!(CapacityFilter::parse_choice("0").is_err());
    }

    #[test]
    fn test_four_or_more_matches_open_ended() {
        let filter = CapacityFilter::FourOrMore;
        assert!(!filter.matches(3));
        assert!(filter.matches(4));
        assert!(filter.matches(5));
    }

    #[test]
    fn test_capacity_cycle_wraps() {
        let mut current = None;
        let mut seen = Vec::new();
        for _ in 0..5 {
            current = CapacityFilter::cycle(current);
            seen.push(current);
        }
        assert_eq!(
            seen,
            vec![
                Some(CapacityFilter::Exactly(1)),
                Some(CapacityFilter::Exactly(2)),
                Some(CapacityFilter::Exactly(3)),
                Some(CapacityFilter::FourOrMore),
                None,
            ]
        );
    }

    #[test]
    fn test_tristate_parse_and_cycle() {
        assert_eq!("".parse::<TriState>(), Ok(TriState::Any));
        assert_eq!("YES".parse::<TriState>(), Ok(TriState::Yes));
        assert_eq!("no".parse::<TriState>(), Ok(TriState::No));
        assert!("maybe".parse::<TriState>().is_err());

        assert_eq!(TriState::Any.cycle(), TriState::Yes);
        assert_eq!(TriState::Yes.cycle(), TriState::No);
        assert_eq!(TriState::No.cycle(), TriState::Any);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = RoomFilter {
            search: "b1".to_string(),
            ..Default::default()
        };
        assert!(filter.matches(&Room::new("B101", 2, false, false)));
        assert!(filter.matches(&Room::new("xb1", 2, false, false)));
        assert!(!filter.matches(&Room::new("A101", 2, false, false)));
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let filter = RoomFilter {
            search: String::new(),
            capacity: Some(CapacityFilter::Exactly(2)),
            ac: TriState::Yes,
            washroom: TriState::No,
        };
        assert!(filter.matches(&Room::new("A", 2, true, false)));
        assert!(!filter.matches(&Room::new("B", 2, true, true)));
        assert!(!filter.matches(&Room::new("C", 2, false, false)));
        assert!(!filter.matches(&Room::new("D", 3, true, false)));
        assert!(filter.is_active());
        assert!(!RoomFilter::default().is_active());
    }

    #[test]
    fn test_describe() {
        let filter = RoomFilter {
            search: "x".to_string(),
            capacity: Some(CapacityFilter::FourOrMore),
            ac: TriState::Yes,
            washroom: TriState::Any,
        };
        assert_eq!(filter.describe(), "cap 4+ · AC yes");
    }
}
