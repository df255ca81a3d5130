use nd_core::types::{AVAILABLE_SOURCES, AVAILABLE_TOPICS, LANGUAGES};
use nd_core::UserPreferences;

/// When the dialog should close after submit. `Immediate` mirrors the
/// historical behavior of closing before the save resolves;
/// `OnSuccess` keeps it open until the save is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosePolicy {
    Immediate,
    OnSuccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefField {
    Topic,
    Source,
    Language,
}

/// Controlled preferences form. Edits accumulate in a draft seeded
/// from the caller's value and reach the caller only on submit.
#[derive(Debug, Clone)]
pub struct PreferencesForm {
    draft: UserPreferences,
    pub focus: PrefField,
}

impl PreferencesForm {
    pub fn seeded(current: &UserPreferences) -> Self {
        Self {
            draft: current.clone(),
            focus: PrefField::Topic,
        }
    }

    pub fn draft(&self) -> &UserPreferences {
        &self.draft
    }

    pub fn submit(&self) -> UserPreferences {
        self.draft.clone()
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            PrefField::Topic => PrefField::Source,
            PrefField::Source => PrefField::Language,
            PrefField::Language => PrefField::Topic,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            PrefField::Topic => PrefField::Language,
            PrefField::Source => PrefField::Topic,
            PrefField::Language => PrefField::Source,
        };
    }

    /// Steps the focused field through its catalog. Topic and source
    /// are single-valued, so the selector is a single-select cycler
    /// with an explicit empty ("any") entry at the front.
    pub fn cycle(&mut self, step: isize) {
        match self.focus {
            PrefField::Topic => {
                self.draft.topics = cycle_with_empty(AVAILABLE_TOPICS, &self.draft.topics, step);
            }
            PrefField::Source => {
                self.draft.sources =
                    cycle_with_empty(AVAILABLE_SOURCES, &self.draft.sources, step);
            }
            PrefField::Language => {
                let codes: Vec<&str> = LANGUAGES.iter().map(|(code, _)| *code).collect();
                self.draft.language = cycle_values(&codes, &self.draft.language, step);
            }
        }
    }

    /// Display string for a field's current draft value.
    pub fn display(&self, field: PrefField) -> String {
        match field {
            PrefField::Topic => display_or_any(&self.draft.topics),
            PrefField::Source => display_or_any(&self.draft.sources),
            PrefField::Language => LANGUAGES
                .iter()
                .find(|(code, _)| *code == self.draft.language)
                .map(|(_, name)| name.to_string())
                .unwrap_or_else(|| self.draft.language.clone()),
        }
    }
}

fn display_or_any(value: &str) -> String {
    if value.is_empty() {
        "(any)".to_string()
    } else {
        value.to_string()
    }
}

fn cycle_with_empty(catalog: &[&str], current: &str, step: isize) -> String {
    let mut values = vec![""];
    values.extend_from_slice(catalog);
    cycle_values(&values, current, step)
}

fn cycle_values(values: &[&str], current: &str, step: isize) -> String {
    let len = values.len() as isize;
    let position = values
        .iter()
        .position(|v| *v == current)
        .map(|i| i as isize)
        .unwrap_or(0);
    let next = (position + step).rem_euclid(len);
    values[next as usize].to_string()
}
