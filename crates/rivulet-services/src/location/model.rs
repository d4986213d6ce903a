/// A place that can be grouped and edited.
///
/// `id` is `None` until the location has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Location {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub id: Option<u64>,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub city: Option<String>,
}

impl Location {
    /// A persisted location without a city.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            city: None,
        }
    }

    /// Sets the city.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }
}

/// A named, ordered set of location ids.
///
/// The ids are expected to reference existing [`Location::id`] values, but
/// nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LocationGroup {
    pub name: String,
    pub location_ids: Vec<u64>,
}

impl LocationGroup {
    pub fn new(name: impl Into<String>, location_ids: Vec<u64>) -> Self {
        Self {
            name: name.into(),
            location_ids,
        }
    }
}

/// Locations paired with the groups that reference them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationsAndGroups {
    pub locations: Vec<Location>,
    pub groups: Vec<LocationGroup>,
}

impl LocationsAndGroups {
    /// The locations referenced by `group`, in the group's order. Ids with no
    /// matching location are skipped.
    pub fn members<'a>(&'a self, group: &'a LocationGroup) -> impl Iterator<Item = &'a Location> {
        group
            .location_ids
            .iter()
            .filter_map(move |id| self.locations.iter().find(|l| l.id == Some(*id)))
    }
}

/// The locations every fresh [`LocationService`](crate::LocationService)
/// starts with.
pub fn default_locations() -> Vec<Location> {
    vec![
        Location::new(1, "Downtown"),
        Location::new(2, "Westside"),
        Location::new(3, "Eastside"),
    ]
}

/// The groups every [`LocationService`](crate::LocationService) serves.
pub fn default_location_groups() -> Vec<LocationGroup> {
    vec![
        LocationGroup::new("Bern", vec![1, 2]),
        LocationGroup::new("Matte", vec![2, 3]),
    ]
}
