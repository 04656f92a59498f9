use std::collections::BTreeSet;

use crate::report::report_model::{Form, Purpose};

/// One distinct purpose across all forms is the page type; several is mixed; none is unknown.
pub fn classify_page(forms: &[Form]) -> Purpose {
    let purposes: BTreeSet<Purpose> = forms.iter().map(Form::purpose).collect();
    let mut distinct = purposes.into_iter();

    match (distinct.next(), distinct.next()) {
        (None, _) => Purpose::Unknown,
        (Some(only), None) => only,
        (Some(_), Some(_)) => Purpose::Mixed,
    }
}
