use serde::Serialize;

use super::catalog::ServiceDefinition;
use crate::error::{QuoteError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Hidden,
    Visible,
}

/// Free-text notes attached to a service, only editable while visible
#[derive(Debug, Clone, Serialize)]
pub struct DetailField {
    pub visibility: Visibility,
    pub text: String,
}

/// Form-side state of one service group: checkbox, amount input, detail
#[derive(Debug, Clone, Serialize)]
pub struct ServiceState {
    pub def: &'static ServiceDefinition,
    pub checked: bool,
    pub amount: String,
    pub detail: DetailField,
}

impl ServiceState {
    pub fn new(def: &'static ServiceDefinition) -> Self {
        Self {
            def,
            checked: false,
            amount: String::new(),
            detail: DetailField {
                visibility: Visibility::Hidden,
                text: String::new(),
            },
        }
    }

    /// Checking shows the detail field. Unchecking hides it and discards
    /// whatever was written there.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
        if checked {
            self.detail.visibility = Visibility::Visible;
        } else {
            self.detail.visibility = Visibility::Hidden;
            self.detail.text.clear();
        }
    }

    pub fn set_detail(&mut self, text: &str) -> Result<()> {
        if self.detail.visibility == Visibility::Hidden {
            return Err(QuoteError::DetailHidden(self.def.id.to_string()));
        }
        self.detail.text = text.to_string();
        Ok(())
    }
}
