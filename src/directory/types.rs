use crate::exams::types::exam::AuthorizedPerson;

use serde::{Serialize, Deserialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String
}

#[derive(Deserialize)]
pub struct PersonList {
    #[serde(default)]
    pub persons: Vec<Person>
}

/// Course as published by the course catalogue
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogueCourse {
    #[serde(rename = "coursNomFr")]
    pub title: String,
    #[serde(rename = "coursCode")]
    pub code: String,
    #[serde(rename = "enseignantPrenom")]
    pub teacher_firstname: String,
    #[serde(rename = "enseignantNom")]
    pub teacher_name: String,
    #[serde(rename = "enseignantSciper", default)]
    pub teacher_sciper: Option<String>
}

/// Course option offered by the registration form
#[derive(Clone, Debug, Serialize)]
pub struct CourseOption {
    pub value: String,
    pub label: String,
    pub code: String,
    pub title: String,
    pub teacher_sciper: Option<String>
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname).trim().to_string()
    }

    /// How the contact of an exam is stored: `First Last (email)`
    pub fn contact_label(&self) -> String {
        format!("{} ({})", self.full_name(), self.email)
    }

    pub fn authorized_person(&self) -> AuthorizedPerson {
        AuthorizedPerson {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.full_name()
        }
    }
}

impl From<CatalogueCourse> for CourseOption {
    fn from(c: CatalogueCourse) -> Self {
        let value = format!("{} ({} {})", c.title, c.teacher_firstname, c.teacher_name);
        CourseOption {
            label: format!("{} - {}", c.code, value),
            value,
            code: c.code,
            title: c.title,
            teacher_sciper: c.teacher_sciper
        }
    }
}
