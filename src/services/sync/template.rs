//! Description templates supplied by catalog organizers.
//!
//! Templates use `{{ .Field }}` placeholders over a closed set of fields.
//! Anything else inside braces is a template error.

use chrono::NaiveDateTime;

use super::dates::format_long_date;
use crate::error::{SyncError, SyncResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Name,
    Location,
    Country,
    StartDate,
    EndDate,
    Website,
    Slug,
}

impl Placeholder {
    fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let token = token.strip_prefix('.').unwrap_or(token);
        match token {
            "Name" => Some(Placeholder::Name),
            "Location" => Some(Placeholder::Location),
            "Country" => Some(Placeholder::Country),
            "StartDate" => Some(Placeholder::StartDate),
            "EndDate" => Some(Placeholder::EndDate),
            "Website" => Some(Placeholder::Website),
            "Slug" => Some(Placeholder::Slug),
            _ => None,
        }
    }
}

/// Values available to a description template.
#[derive(Debug, Clone)]
pub struct TemplateFields {
    pub name: String,
    pub location: String,
    pub country: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub website: String,
    pub slug: String,
}

impl TemplateFields {
    fn value(&self, placeholder: Placeholder) -> String {
        match placeholder {
            Placeholder::Name => self.name.clone(),
            Placeholder::Location => self.location.clone(),
            Placeholder::Country => self.country.clone(),
            Placeholder::StartDate => format_long_date(self.start_date),
            Placeholder::EndDate => format_long_date(self.end_date),
            Placeholder::Website => self.website.clone(),
            Placeholder::Slug => self.slug.clone(),
        }
    }
}

/// Render `template` with `fields`. An empty template renders to an empty string.
pub fn render(template: &str, fields: &TemplateFields) -> SyncResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after
            .find("}}")
            .ok_or_else(|| SyncError::Template("unclosed placeholder".to_string()))?;
        let token = &after[..close];
        let placeholder = Placeholder::parse(token)
            .ok_or_else(|| SyncError::Template(format!("unknown placeholder {{{{{}}}}}", token)))?;
        out.push_str(&fields.value(placeholder));
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    Ok(out)
}
