use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    forms::{CarForm, RentalForm, UserForm},
    resource::{FilterField, Filterable, Resource},
};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub plate: String,
    /// Daily price.
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(length(min = 1, message = "Plate is required"))]
    pub plate: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(url(message = "Image must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarField {
    Brand,
    Model,
    Plate,
}

impl FilterField for CarField {
    const ALL: &'static [Self] = &[CarField::Brand, CarField::Model, CarField::Plate];

    fn name(self) -> &'static str {
        match self {
            CarField::Brand => "brand",
            CarField::Model => "model",
            CarField::Plate => "plate",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CarField::Brand => "Brand",
            CarField::Model => "Model",
            CarField::Plate => "Plate",
        }
    }
}

impl Filterable for Car {
    type Field = CarField;

    fn field_text(&self, field: CarField) -> String {
        match field {
            CarField::Brand => self.brand.clone(),
            CarField::Model => self.model.clone(),
            CarField::Plate => self.plate.clone(),
        }
    }
}

impl Resource for Car {
    type Draft = NewCar;
    type Form = CarForm;

    const PATH: &'static str = "cars";
    const SINGULAR: &'static str = "car";
    const PLURAL: &'static str = "cars";

    fn id(&self) -> i64 {
        self.id
    }

    fn to_draft(&self) -> NewCar {
        NewCar {
            brand: self.brand.clone(),
            model: self.model.clone(),
            plate: self.plate.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }

    fn from_draft(id: i64, draft: NewCar) -> Self {
        Car {
            id,
            brand: draft.brand,
            model: draft.model,
            plate: draft.plate,
            price: draft.price,
            image: draft.image,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: i64,
    pub car_id: i64,
    pub user_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub total_price: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRental {
    pub car_id: i64,
    pub user_id: i64,
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    #[validate(length(min = 1, message = "End date is required"))]
    pub end_date: String,
    #[validate(range(min = 0.0, message = "Total price cannot be negative"))]
    pub total_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalField {
    UserId,
    CarId,
    StartDate,
    EndDate,
    TotalPrice,
}

impl FilterField for RentalField {
    const ALL: &'static [Self] = &[
        RentalField::UserId,
        RentalField::CarId,
        RentalField::StartDate,
        RentalField::EndDate,
        RentalField::TotalPrice,
    ];

    fn name(self) -> &'static str {
        match self {
            RentalField::UserId => "userId",
            RentalField::CarId => "carId",
            RentalField::StartDate => "startDate",
            RentalField::EndDate => "endDate",
            RentalField::TotalPrice => "totalPrice",
        }
    }

    fn label(self) -> &'static str {
        match self {
            RentalField::UserId => "User ID",
            RentalField::CarId => "Car ID",
            RentalField::StartDate => "Start date",
            RentalField::EndDate => "End date",
            RentalField::TotalPrice => "Total price",
        }
    }
}

impl Filterable for Rental {
    type Field = RentalField;

    fn field_text(&self, field: RentalField) -> String {
        match field {
            RentalField::UserId => self.user_id.to_string(),
            RentalField::CarId => self.car_id.to_string(),
            RentalField::StartDate => self.start_date.clone(),
            RentalField::EndDate => self.end_date.clone(),
            RentalField::TotalPrice => self.total_price.to_string(),
        }
    }
}

impl Resource for Rental {
    type Draft = NewRental;
    type Form = RentalForm;

    const PATH: &'static str = "rentals";
    const SINGULAR: &'static str = "rental";
    const PLURAL: &'static str = "rentals";

    fn id(&self) -> i64 {
        self.id
    }

    fn to_draft(&self) -> NewRental {
        NewRental {
            car_id: self.car_id,
            user_id: self.user_id,
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            total_price: self.total_price,
        }
    }

    fn from_draft(id: i64, draft: NewRental) -> Self {
        Rental {
            id,
            car_id: draft.car_id,
            user_id: draft.user_id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            total_price: draft.total_price,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Surname is required"))]
    pub surname: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Surname,
    Email,
}

impl FilterField for UserField {
    const ALL: &'static [Self] = &[UserField::Name, UserField::Surname, UserField::Email];

    fn name(self) -> &'static str {
        match self {
            UserField::Name => "name",
            UserField::Surname => "surname",
            UserField::Email => "email",
        }
    }

    fn label(self) -> &'static str {
        match self {
            UserField::Name => "Name",
            UserField::Surname => "Surname",
            UserField::Email => "Email",
        }
    }
}

impl Filterable for User {
    type Field = UserField;

    fn field_text(&self, field: UserField) -> String {
        match field {
            UserField::Name => self.name.clone(),
            UserField::Surname => self.surname.clone(),
            UserField::Email => self.email.clone(),
        }
    }
}

impl Resource for User {
    type Draft = NewUser;
    type Form = UserForm;

    const PATH: &'static str = "users";
    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";

    fn id(&self) -> i64 {
        self.id
    }

    fn to_draft(&self) -> NewUser {
        NewUser {
            name: self.name.clone(),
            surname: self.surname.clone(),
            email: self.email.clone(),
        }
    }

    fn from_draft(id: i64, draft: NewUser) -> Self {
        User {
            id,
            name: draft.name,
            surname: draft.surname,
            email: draft.email,
        }
    }
}
