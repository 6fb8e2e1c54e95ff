//! HTML form payloads and their validation.
//!
//! Every form field arrives as a string. Converting a form into a draft parses
//! the numeric and date fields, then runs the draft's `validator` rules. Both
//! kinds of failure end up in one [`ValidationErrors`].

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{borrow::Cow, collections::BTreeMap, collections::HashMap, fmt::Debug};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    structs::{NewCar, NewRental, NewUser},
    utils::parse_day,
};

/// First validation message per field, ready for a template.
pub type FieldErrors = BTreeMap<String, String>;

pub trait EntityForm:
    Default + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Draft;

    fn from_draft(draft: &Self::Draft) -> Self;

    fn into_draft(self) -> Result<Self::Draft, ValidationErrors>;

    /// Builds a form out of submitted `name=value` pairs. Unknown names are ignored.
    fn from_params(params: &HashMap<String, String>) -> Self {
        serde_json::to_value(params)
            .and_then(serde_json::from_value)
            .unwrap_or_default()
    }

    /// Overwrites the fields named in `params`, leaving the rest untouched.
    fn prefill(self, params: &HashMap<String, String>) -> Self {
        let mut value = match serde_json::to_value(&self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => return self,
        };
        for (key, slot) in value.iter_mut() {
            if let Some(given) = params.get(key) {
                *slot = serde_json::Value::String(given.clone());
            }
        }
        serde_json::from_value(serde_json::Value::Object(value)).unwrap_or(self)
    }
}

pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect()
}

/// Collects parse failures for fields that are not plain strings.
#[derive(Default)]
struct Parsed {
    failures: Vec<(&'static str, &'static str)>,
}

impl Parsed {
    fn number(&mut self, field: &'static str, raw: &str, message: &'static str) -> f64 {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                self.failures.push((field, message));
                0.0
            }
        }
    }

    fn integer(&mut self, field: &'static str, raw: &str, message: &'static str) -> i64 {
        raw.trim().parse::<i64>().unwrap_or_else(|_| {
            self.failures.push((field, message));
            0
        })
    }

    fn date(&mut self, field: &'static str, raw: &str, message: &'static str) -> String {
        let raw = raw.trim();
        if !raw.is_empty() && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_err() {
            self.failures.push((field, message));
        }
        raw.to_owned()
    }

    fn finish<D: Validate>(self, draft: D) -> Result<D, ValidationErrors> {
        let mut errors = match draft.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        for (field, message) in self.failures {
            let mut err = ValidationError::new("parse");
            err.message = Some(Cow::Borrowed(message));
            errors.add(field, err);
        }
        if errors.errors().is_empty() {
            Ok(draft)
        } else {
            Err(errors)
        }
    }
}

fn optional(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_owned())
}

/// Date inputs only accept `YYYY-MM-DD`, so timestamps are cut down to the day.
fn date_input(raw: &str) -> String {
    parse_day(raw).map_or_else(|| raw.to_owned(), |day| day.to_string())
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CarForm {
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub price: String,
    pub image: String,
}

impl EntityForm for CarForm {
    type Draft = NewCar;

    fn from_draft(draft: &NewCar) -> Self {
        CarForm {
            brand: draft.brand.clone(),
            model: draft.model.clone(),
            plate: draft.plate.clone(),
            price: draft.price.to_string(),
            image: draft.image.clone().unwrap_or_default(),
        }
    }

    fn into_draft(self) -> Result<NewCar, ValidationErrors> {
        let mut parsed = Parsed::default();
        let price = parsed.number("price", &self.price, "Price is required");
        parsed.finish(NewCar {
            brand: self.brand.trim().to_owned(),
            model: self.model.trim().to_owned(),
            plate: self.plate.trim().to_owned(),
            price,
            image: optional(&self.image),
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RentalForm {
    pub car_id: String,
    pub user_id: String,
    pub start_date: String,
    pub end_date: String,
    pub total_price: String,
}

impl EntityForm for RentalForm {
    type Draft = NewRental;

    fn from_draft(draft: &NewRental) -> Self {
        RentalForm {
            car_id: draft.car_id.to_string(),
            user_id: draft.user_id.to_string(),
            start_date: date_input(&draft.start_date),
            end_date: date_input(&draft.end_date),
            total_price: draft.total_price.to_string(),
        }
    }

    fn into_draft(self) -> Result<NewRental, ValidationErrors> {
        let mut parsed = Parsed::default();
        let car_id = parsed.integer("car_id", &self.car_id, "Car ID must be a number");
        let user_id = parsed.integer("user_id", &self.user_id, "User ID must be a number");
        let start_date = parsed.date("start_date", &self.start_date, "Start date must be YYYY-MM-DD");
        let end_date = parsed.date("end_date", &self.end_date, "End date must be YYYY-MM-DD");
        let total_price = parsed.number("total_price", &self.total_price, "Total price is required");
        parsed.finish(NewRental {
            car_id,
            user_id,
            start_date,
            end_date,
            total_price,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct UserForm {
    pub name: String,
    pub surname: String,
    pub email: String,
}

impl EntityForm for UserForm {
    type Draft = NewUser;

    fn from_draft(draft: &NewUser) -> Self {
        UserForm {
            name: draft.name.clone(),
            surname: draft.surname.clone(),
            email: draft.email.clone(),
        }
    }

    fn into_draft(self) -> Result<NewUser, ValidationErrors> {
        Parsed::default().finish(NewUser {
            name: self.name.trim().to_owned(),
            surname: self.surname.trim().to_owned(),
            email: self.email.trim().to_owned(),
        })
    }
}
