use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginAction {
    None,
    Submit { email: String, password: String },
    /// Rejected locally before any provider call.
    Invalid(&'static str),
    GoToSignup,
}

/// Sign-in form state. Pure key handling; the app owns the provider
/// call and the navigation that follows.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
}

impl Default for LoginField {
    fn default() -> Self {
        LoginField::Email
    }
}

impl LoginForm {
    pub fn reset(&mut self) {
        self.email.clear();
        self.password.clear();
        self.focus = LoginField::Email;
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.focus = match self.focus {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
                LoginAction::None
            }
            KeyCode::Char(c) => {
                self.focused_mut().push(c);
                LoginAction::None
            }
            KeyCode::Backspace => {
                self.focused_mut().pop();
                LoginAction::None
            }
            KeyCode::Enter => {
                if self.email.is_empty() || self.password.is_empty() {
                    LoginAction::Invalid("Email and password are required")
                } else {
                    LoginAction::Submit {
                        email: self.email.clone(),
                        password: self.password.clone(),
                    }
                }
            }
            KeyCode::F(2) => LoginAction::GoToSignup,
            _ => LoginAction::None,
        }
    }
}
