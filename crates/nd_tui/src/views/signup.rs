use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignupField {
    #[default]
    Email,
    Password,
    Confirm,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignupAction {
    None,
    Submit { email: String, password: String },
    /// Rejected locally; the provider is never called.
    Invalid(&'static str),
    GoToLogin,
}

#[derive(Debug, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub focus: SignupField,
}

impl SignupForm {
    pub fn reset(&mut self) {
        self.email.clear();
        self.password.clear();
        self.confirm.clear();
        self.focus = SignupField::Email;
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            SignupField::Email => &mut self.email,
            SignupField::Password => &mut self.password,
            SignupField::Confirm => &mut self.confirm,
        }
    }

    /// Local validation, run before any provider call.
    fn validate(&self) -> Option<&'static str> {
        if self.email.is_empty() || self.password.is_empty() || self.confirm.is_empty() {
            return Some("All fields are required");
        }
        if self.password != self.confirm {
            return Some("Passwords do not match");
        }
        None
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SignupAction {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = match self.focus {
                    SignupField::Email => SignupField::Password,
                    SignupField::Password => SignupField::Confirm,
                    SignupField::Confirm => SignupField::Email,
                };
                SignupAction::None
            }
            KeyCode::Up => {
                self.focus = match self.focus {
                    SignupField::Email => SignupField::Confirm,
                    SignupField::Password => SignupField::Email,
                    SignupField::Confirm => SignupField::Password,
                };
                SignupAction::None
            }
            KeyCode::Char(c) => {
                self.focused_mut().push(c);
                SignupAction::None
            }
            KeyCode::Backspace => {
                self.focused_mut().pop();
                SignupAction::None
            }
            KeyCode::Enter => match self.validate() {
                Some(reason) => SignupAction::Invalid(reason),
                None => SignupAction::Submit {
                    email: self.email.clone(),
                    password: self.password.clone(),
                },
            },
            KeyCode::F(2) => SignupAction::GoToLogin,
            _ => SignupAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn filled(email: &str, password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            email: email.to_string(),
            password: password.to_string(),
            confirm: confirm.to_string(),
            focus: SignupField::Email,
        }
    }

    #[test]
    fn test_password_mismatch_rejected_locally() {
        let mut form = filled("a@b.c", "hunter2", "hunter3");
        assert_eq!(
            form.handle_key(key(KeyCode::Enter)),
            SignupAction::Invalid("Passwords do not match")
        );
    }

    #[test]
    fn test_empty_fields_rejected_locally() {
        let mut form = filled("a@b.c", "hunter2", "");
        assert_eq!(
            form.handle_key(key(KeyCode::Enter)),
            SignupAction::Invalid("All fields are required")
        );
    }

    #[test]
    fn test_matching_passwords_submit() {
        let mut form = filled("a@b.c", "hunter2", "hunter2");
        assert_eq!(
            form.handle_key(key(KeyCode::Enter)),
            SignupAction::Submit {
                email: "a@b.c".to_string(),
                password: "hunter2".to_string(),
            }
        );
    }
}
