use rivulet::{Observable, Scheduler};

use crate::{
    Error, FieldName, Result,
    location::{Location, LocationService},
};

/// The edit form for one [`Location`].
///
/// Both fields start from the location being edited and are required. The
/// form holds only the edited values; [`LocationForm::save`] writes them
/// back into the location it is given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationForm {
    name: String,
    city: String,
}

impl LocationForm {
    /// A form pre-filled from `location`. A missing city starts empty.
    pub fn new(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            city: location.city.clone().unwrap_or_default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    /// Checks the required fields in display order, reporting the first
    /// empty one.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [(FieldName::Name, &self.name), (FieldName::City, &self.city)] {
            if value.is_empty() {
                return Err(Error::Required { field });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validates, writes the edited fields into `location`, and returns the
    /// pending update of the stored copy.
    ///
    /// On a validation error `location` is left untouched. The returned
    /// stream is cold: nothing is stored until it is subscribed.
    pub fn save<S>(
        &self,
        location: &mut Location,
        service: &LocationService<S>,
    ) -> Result<Observable<()>>
    where
        S: Scheduler + Clone + 'static,
    {
        self.validate()?;
        location.name.clone_from(&self.name);
        location.city = Some(self.city.clone());
        Ok(service.update_location(location.clone()))
    }
}
