//! Input forms for adding, allocating and releasing rooms

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::models::{RegistryError, RegistryResult, RoomRequest};

/// Which operation a form submits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    AddRoom,
    Allocate,
    Release,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::AddRoom => "Add Room",
            FormKind::Allocate => "Allocate Room",
            FormKind::Release => "Deallocate Room",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            FormKind::AddRoom => "add",
            FormKind::Allocate => "allocate",
            FormKind::Release => "free room",
        }
    }
}

#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(Input),
    Toggle(bool),
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: FieldValue,
}

impl FormField {
    fn text(label: &'static str) -> Self {
        FormField {
            label,
            value: FieldValue::Text(Input::default()),
        }
    }

    fn toggle(label: &'static str) -> Self {
        FormField {
            label,
            value: FieldValue::Toggle(false),
        }
    }
}

/// What the caller should do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Keep editing
    None,
    Submit,
    Cancel,
}

/// Values of a submitted add-room form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub room_no: String,
    pub capacity: u32,
    pub has_ac: bool,
    pub has_washroom: bool,
}

/// Parsed values of a submitted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    AddRoom(NewRoom),
    Allocate(RoomRequest),
    Release(String),
}

/// Form state: a list of fields with one focused
#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl Form {
    pub fn new(kind: FormKind) -> Self {
        let fields = match kind {
            FormKind::AddRoom => vec![
                FormField::text("Room number"),
                FormField::text("Capacity"),
                FormField::toggle("Has AC"),
                FormField::toggle("Attached washroom"),
            ],
            FormKind::Allocate => vec![
                FormField::text("Students"),
                FormField::toggle("Needs AC"),
                FormField::toggle("Needs washroom"),
            ],
            FormKind::Release => vec![FormField::text("Room number")],
        };

        Form {
            kind,
            fields,
            focused: 0,
        }
    }

    /// Release form prefilled with a room number
    pub fn release_for(room_no: &str) -> Self {
        let mut form = Form::new(FormKind::Release);
        form.fields[0].value = FieldValue::Text(Input::new(room_no.to_string()));
        form
    }

    /// Text of a field (empty for toggles)
    pub fn text(&self, index: usize) -> &str {
        match self.fields.get(index).map(|f| &f.value) {
            Some(FieldValue::Text(input)) => input.value(),
            _ => "",
        }
    }

    /// State of a toggle (false for text fields)
    pub fn toggle(&self, index: usize) -> bool {
        matches!(
            self.fields.get(index).map(|f| &f.value),
            Some(FieldValue::Toggle(true))
        )
    }

    pub fn focused_field(&self) -> Option<&FormField> {
        self.fields.get(self.focused)
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    /// Clear every field and focus the first one
    pub fn reset(&mut self) {
        *self = Form::new(self.kind);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            _ => {
                let Some(field) = self.fields.get_mut(self.focused) else {
                    return FormAction::None;
                };
                match &mut field.value {
                    FieldValue::Toggle(on) => {
                        if matches!(key.code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right)
                        {
                            *on = !*on;
                        }
                    }
                    FieldValue::Text(input) => {
                        input.handle_event(&Event::Key(key));
                    }
                }
            }
        }
        FormAction::None
    }

    /// Parse the form for its operation
    pub fn submission(&self) -> RegistryResult<Submission> {
        match self.kind {
            FormKind::AddRoom => self.new_room().map(Submission::AddRoom),
            FormKind::Allocate => self.room_request().map(Submission::Allocate),
            FormKind::Release => self.room_no().map(Submission::Release),
        }
    }

    /// Read an add-room form
    pub fn new_room(&self) -> RegistryResult<NewRoom> {
        let room_no = self.text(0).trim().to_string();
        if room_no.is_empty() {
            return Err(RegistryError::Validation(
                "Please enter a room number".to_string(),
            ));
        }

        let capacity = parse_positive(self.text(1))
            .ok_or_else(|| RegistryError::Validation("Capacity must be at least 1".to_string()))?;

        Ok(NewRoom {
            room_no,
            capacity,
            has_ac: self.toggle(2),
            has_washroom: self.toggle(3),
        })
    }

    /// Read an allocation form
    pub fn room_request(&self) -> RegistryResult<RoomRequest> {
        let students = parse_positive(self.text(0)).ok_or_else(|| {
            RegistryError::Validation("Enter a valid number of students".to_string())
        })?;

        Ok(RoomRequest::new(students, self.toggle(1), self.toggle(2)))
    }

    /// Read a release form
    pub fn room_no(&self) -> RegistryResult<String> {
        let room_no = self.text(0).trim();
        if room_no.is_empty() {
            return Err(RegistryError::Validation("Enter a room number".to_string()));
        }
        Ok(room_no.to_string())
    }
}

fn parse_positive(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|&n| n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_add_room_form_values() {
        let mut form = Form::new(FormKind::AddRoom);
        type_str(&mut form, "B12");
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "3");
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char(' ')));

        assert_eq!(
            form.new_room().unwrap(),
            NewRoom {
                room_no: "B12".to_string(),
                capacity: 3,
                has_ac: true,
                has_washroom: false,
            }
        );
    }

    #[test]
    fn test_add_room_form_rejects_bad_capacity() {
        let mut form = Form::new(FormKind::AddRoom);
        type_str(&mut form, "B12");
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "0");
        assert!(matches!(form.new_room(), Err(RegistryError::Validation(_))));

        form.reset();
        assert_eq!(form.focused, 0);
        assert!(matches!(form.new_room(), Err(RegistryError::Validation(_))));
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = Form::new(FormKind::Allocate);
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focused, 2);
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused, 0);
    }

    #[test]
    fn test_enter_and_esc() {
        let mut form = Form::new(FormKind::Release);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormAction::Cancel);
    }

    #[test]
    fn test_allocate_form_request() {
        let mut form = Form::new(FormKind::Allocate);
        type_str(&mut form, "4");
        form.handle_key(key(KeyCode::Down));
        form.handle_key(key(KeyCode::Down));
        form.handle_key(key(KeyCode::Char(' ')));

        assert_eq!(form.room_request().unwrap(), RoomRequest::new(4, false, true));
    }

    #[test]
    fn test_submission_matches_kind() {
        let form = Form::release_for("A1");
        assert_eq!(
            form.submission().unwrap(),
            Submission::Release("A1".to_string())
        );
        assert!(Form::new(FormKind::Allocate).submission().is_err());
    }

    #[test]
    fn test_release_prefill() {
        let form = Form::release_for("101");
        assert_eq!(form.room_no().unwrap(), "101");
        assert!(Form::new(FormKind::Release).room_no().is_err());
    }
}
