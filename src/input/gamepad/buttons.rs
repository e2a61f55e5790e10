//! Button naming for gilrs controllers
//!
//! Config files refer to buttons by short Xbox-style names. gilrs reports
//! face buttons by physical position; the mapping below follows the gilrs
//! convention that South is the Xbox A button.
//!
//! ```text
//!        [y/North]
//!   [x/West]   [b/East]
//!        [a/South]
//! ```

use gilrs::Button;

/// Every button name accepted in the config
pub const BUTTON_NAMES: &[&str] = &[
    "a", "b", "x", "y", "lb", "rb", "lt", "rt", "select", "start", "mode", "l3", "r3", "dpad_up",
    "dpad_down", "dpad_left", "dpad_right",
];

/// Map a gilrs button to its config name
///
/// Returns `None` for buttons without a name (unknown, C, Z).
pub fn button_name(button: Button) -> Option<&'static str> {
    match button {
        Button::South => Some("a"),
        Button::East => Some("b"),
        Button::West => Some("x"),
        Button::North => Some("y"),

        Button::LeftTrigger => Some("lb"),
        Button::RightTrigger => Some("rb"),
        Button::LeftTrigger2 => Some("lt"),
        Button::RightTrigger2 => Some("rt"),

        Button::Select => Some("select"),
        Button::Start => Some("start"),
        Button::Mode => Some("mode"),

        Button::LeftThumb => Some("l3"),
        Button::RightThumb => Some("r3"),

        Button::DPadUp => Some("dpad_up"),
        Button::DPadDown => Some("dpad_down"),
        Button::DPadLeft => Some("dpad_left"),
        Button::DPadRight => Some("dpad_right"),

        _ => None,
    }
}

/// True if `name` is a button name the input layer can report
pub fn is_known_button(name: &str) -> bool {
    BUTTON_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_buttons() {
        assert_eq!(button_name(Button::South), Some("a"));
        assert_eq!(button_name(Button::East), Some("b"));
        assert_eq!(button_name(Button::West), Some("x"));
        assert_eq!(button_name(Button::North), Some("y"));
    }

    #[test]
    fn test_shoulder_buttons() {
        assert_eq!(button_name(Button::LeftTrigger), Some("lb"));
        assert_eq!(button_name(Button::RightTrigger), Some("rb"));
        assert_eq!(button_name(Button::LeftTrigger2), Some("lt"));
        assert_eq!(button_name(Button::RightTrigger2), Some("rt"));
    }

    #[test]
    fn test_dpad_buttons() {
        assert_eq!(button_name(Button::DPadUp), Some("dpad_up"));
        assert_eq!(button_name(Button::DPadRight), Some("dpad_right"));
    }

    #[test]
    fn test_unnamed_buttons() {
        assert_eq!(button_name(Button::C), None);
        assert_eq!(button_name(Button::Unknown), None);
    }

    #[test]
    fn test_every_mapped_name_is_known() {
        let all = [
            Button::South, Button::East, Button::North, Button::West,
            Button::LeftTrigger, Button::RightTrigger, Button::LeftTrigger2, Button::RightTrigger2,
            Button::Select, Button::Start, Button::Mode, Button::LeftThumb, Button::RightThumb,
            Button::DPadUp, Button::DPadDown, Button::DPadLeft, Button::DPadRight,
        ];
        for button in all {
            let name = button_name(button).unwrap();
            assert!(is_known_button(name), "{} missing from BUTTON_NAMES", name);
        }
        assert_eq!(all.len(), BUTTON_NAMES.len());
        assert!(!is_known_button("turbo"));
    }
}
