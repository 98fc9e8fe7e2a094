//! Form field identifiers and input rules

use std::fmt;

/// Keystroke filter applied to a field before its value is updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRule {
    /// Any printable character
    Text,
    /// ASCII digits only, capped at the given length
    Digits(usize),
    /// Value chosen from a fixed option list (no free typing)
    Select,
}

impl InputRule {
    /// Append a typed character to `value` if the rule allows it.
    /// Returns true when the value changed.
    pub fn push_char(self, value: &mut String, c: char) -> bool {
        match self {
            InputRule::Text => {
                if c.is_control() {
                    return false;
                }
                value.push(c);
                true
            }
            InputRule::Digits(max) => {
                if !c.is_ascii_digit() || value.chars().count() >= max {
                    return false;
                }
                value.push(c);
                true
            }
            InputRule::Select => false,
        }
    }

    /// Remove the last character. Select fields are cleared instead.
    pub fn pop_char(self, value: &mut String) -> bool {
        match self {
            InputRule::Select => {
                let changed = !value.is_empty();
                value.clear();
                changed
            }
            _ => value.pop().is_some(),
        }
    }
}

/// Fields of the contact section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Phone,
    Whatsapp,
    Email,
}

impl ContactField {
    pub const ALL: [ContactField; 3] = [
        ContactField::Phone,
        ContactField::Whatsapp,
        ContactField::Email,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Whatsapp => "whatsapp",
            Self::Email => "email",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Phone => "Phone Number",
            Self::Whatsapp => "Whatsapp Number",
            Self::Email => "Email",
        }
    }

    pub fn input_rule(self) -> InputRule {
        match self {
            Self::Phone | Self::Whatsapp => InputRule::Digits(10),
            Self::Email => InputRule::Text,
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields of an address section, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Address1,
    Address2,
    City,
    Pincode,
    State,
    District,
}

impl AddressField {
    pub const ALL: [AddressField; 6] = [
        AddressField::Address1,
        AddressField::Address2,
        AddressField::City,
        AddressField::Pincode,
        AddressField::State,
        AddressField::District,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Address1 => "address1",
            Self::Address2 => "address2",
            Self::City => "city",
            Self::Pincode => "pincode",
            Self::State => "state",
            Self::District => "district",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Address1 => "Address 1",
            Self::Address2 => "Address 2 (Optional)",
            Self::City => "City",
            Self::Pincode => "Pincode",
            Self::State => "State",
            Self::District => "District",
        }
    }

    pub fn input_rule(self) -> InputRule {
        match self {
            Self::Pincode => InputRule::Digits(6),
            Self::State | Self::District => InputRule::Select,
            _ => InputRule::Text,
        }
    }

    pub fn is_select(self) -> bool {
        self.input_rule() == InputRule::Select
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_rule_rejects_letters() {
        let mut value = String::new();
        assert!(!InputRule::Digits(10).push_char(&mut value, 'a'));
        assert!(InputRule::Digits(10).push_char(&mut value, '9'));
        assert_eq!(value, "9");
    }

    #[test]
    fn test_digits_rule_caps_length() {
        let mut value = "12345".to_string();
        assert!(InputRule::Digits(6).push_char(&mut value, '6'));
        assert!(!InputRule::Digits(6).push_char(&mut value, '7'));
        assert_eq!(value, "123456");
    }

    #[test]
    fn test_text_rule_accepts_any_printable() {
        let mut value = String::new();
        assert!(InputRule::Text.push_char(&mut value, '@'));
        assert!(!InputRule::Text.push_char(&mut value, '\u{7}'));
        assert_eq!(value, "@");
    }

    #[test]
    fn test_select_rule_ignores_typing_and_clears_on_backspace() {
        let mut value = "Bihar".to_string();
        assert!(!InputRule::Select.push_char(&mut value, 'x'));
        assert!(InputRule::Select.pop_char(&mut value));
        assert!(value.is_empty());
        assert!(!InputRule::Select.pop_char(&mut value));
    }

    #[test]
    fn test_pop_char_on_text() {
        let mut value = "ab".to_string();
        assert!(InputRule::Text.pop_char(&mut value));
        assert_eq!(value, "a");
    }

    #[test]
    fn test_field_rules() {
        assert_eq!(ContactField::Phone.input_rule(), InputRule::Digits(10));
        assert_eq!(AddressField::Pincode.input_rule(), InputRule::Digits(6));
        assert!(AddressField::State.is_select());
        assert!(!AddressField::City.is_select());
    }
}
