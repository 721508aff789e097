//! Declared shape of each resource type.
//!
//! Every resource is a flat JSON document. The field tables below are the single
//! source for required-field order, format rules and unique constraints; the
//! observer pipeline and both store backends read them.

pub mod validate;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource types managed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Client,
    Location,
    Guard,
    Zone,
}

/// How a field's value is checked and normalized
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    Email,
    Number,
    Date,
    Enum(&'static [&'static str]),
    /// Id of a single record of another type
    Reference(ResourceType),
    /// Ids of several records of another type
    ReferenceList(ResourceType),
}

/// Declaration of a single writable field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub unique: bool,
    pub trim: bool,
    pub lowercase: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            unique: false,
            trim: false,
            lowercase: false,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text { min_len: None, max_len: None })
    }

    pub const fn bounded_text(name: &'static str, min_len: usize, max_len: usize) -> Self {
        Self::new(
            name,
            FieldKind::Text {
                min_len: Some(min_len),
                max_len: Some(max_len),
            },
        )
    }

    pub const fn email(name: &'static str) -> Self {
        Self::new(name, FieldKind::Email)
    }

    pub const fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub const fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub const fn one_of(name: &'static str, values: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::Enum(values))
    }

    pub const fn reference(name: &'static str, target: ResourceType) -> Self {
        Self::new(name, FieldKind::Reference(target))
    }

    pub const fn references(name: &'static str, target: ResourceType) -> Self {
        Self::new(name, FieldKind::ReferenceList(target))
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    pub const fn unique(self) -> Self {
        Self { unique: true, ..self }
    }

    pub const fn trimmed(self) -> Self {
        Self { trim: true, ..self }
    }

    pub const fn lowercase(self) -> Self {
        Self { lowercase: true, ..self }
    }
}

pub const GENDERS: &[&str] = &["Male", "Female", "Other"];
pub const SHIFTS: &[&str] = &["Day", "Night"];

// Declaration order is validation order.
const CLIENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required().trimmed(),
    FieldSpec::bounded_text("contactPerson", 5, 60).required().unique(),
    FieldSpec::email("email").required().unique().lowercase(),
    FieldSpec::number("phone").required(),
    FieldSpec::number("rate").required(),
    FieldSpec::text("address").required().trimmed(),
    FieldSpec::date("startDate"),
];

const LOCATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::text("area").required(),
    FieldSpec::reference("client", ResourceType::Client).required(),
    FieldSpec::reference("zone", ResourceType::Zone).required(),
];

const GUARD_FIELDS: &[FieldSpec] = &[
    FieldSpec::bounded_text("name", 5, 60).required().unique().trimmed(),
    FieldSpec::date("dateOfBirth").required(),
    FieldSpec::text("address").required(),
    FieldSpec::one_of("gender", GENDERS).required(),
    FieldSpec::one_of("shift", SHIFTS).required(),
    FieldSpec::text("passportPicture").required(),
    FieldSpec::reference("zone", ResourceType::Zone),
    FieldSpec::references("locations", ResourceType::Location),
    FieldSpec::text("title"),
];

const ZONE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required().trimmed(),
    FieldSpec::text("description"),
];

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Client,
        ResourceType::Location,
        ResourceType::Guard,
        ResourceType::Zone,
    ];

    pub fn singular(&self) -> &'static str {
        match self {
            ResourceType::Client => "client",
            ResourceType::Location => "location",
            ResourceType::Guard => "guard",
            ResourceType::Zone => "zone",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceType::Client => "clients",
            ResourceType::Location => "locations",
            ResourceType::Guard => "guards",
            ResourceType::Zone => "zones",
        }
    }

    /// Storage collection (table) name
    pub fn table_name(&self) -> &'static str {
        self.plural()
    }

    /// Resolve the URL path segment (`clients`, `guards`, ...) to a resource type
    pub fn from_plural(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.plural() == segment)
    }

    /// Writable fields in declaration order
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            ResourceType::Client => CLIENT_FIELDS,
            ResourceType::Location => LOCATION_FIELDS,
            ResourceType::Guard => GUARD_FIELDS,
            ResourceType::Zone => ZONE_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields().iter().filter(|f| f.unique)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_path_segments() {
        assert_eq!(ResourceType::from_plural("clients"), Some(ResourceType::Client));
        assert_eq!(ResourceType::from_plural("guards"), Some(ResourceType::Guard));
        assert_eq!(ResourceType::from_plural("client"), None);
        assert_eq!(ResourceType::from_plural("users"), None);
    }

    #[test]
    fn required_fields_follow_declared_order() {
        let names: Vec<&str> = ResourceType::Client
            .fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["name", "contactPerson", "email", "phone", "rate", "address"]);

        let names: Vec<&str> = ResourceType::Location
            .fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["name", "area", "client", "zone"]);
    }

    #[test]
    fn unique_constraints() {
        let client: Vec<&str> = ResourceType::Client.unique_fields().map(|f| f.name).collect();
        assert_eq!(client, ["contactPerson", "email"]);

        let guard: Vec<&str> = ResourceType::Guard.unique_fields().map(|f| f.name).collect();
        assert_eq!(guard, ["name"]);

        assert_eq!(ResourceType::Location.unique_fields().count(), 0);
    }
}
