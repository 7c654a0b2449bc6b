//! Lookups against the institution's person directory and course catalogue

use crate::directory::types::{CatalogueCourse, CourseOption, Person, PersonList};
use crate::shared::util::config::DirectoryConfig;

use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Directory lookups are disabled")]
    Disabled,
    #[error("Invalid sciper `{0}`")]
    InvalidSciper(String),
    #[error("Directory request failed: {0}")]
    Request(#[from] reqwest::Error)
}

#[derive(Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    config: DirectoryConfig
}

static SCIPER: OnceLock<Option<Regex>> = OnceLock::new();

pub fn is_valid_sciper(sciper: &str) -> bool {
    SCIPER.get_or_init(|| Regex::new(r"^[0-9]{1,10}$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(sciper))
}

impl DirectoryClient {
    pub fn new(config: DirectoryConfig) -> Result<DirectoryClient, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(DirectoryClient { client, config })
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn persons_request(&self, url: String) -> Result<reqwest::RequestBuilder, DirectoryError> {
        if !self.config.enabled { return Err(DirectoryError::Disabled); }
        Ok(self.client.get(url).basic_auth(&self.config.username, Some(&self.config.password)))
    }

    pub async fn search_persons(&self, query: &str) -> Result<Vec<Person>, DirectoryError> {
        let list: PersonList = self.persons_request(self.config.persons_url.clone())?
            .query(&[("query", query)])
            .send().await?
            .error_for_status()?
            .json().await?;

        // Persons without an email cannot be contacted
        Ok(list.persons.into_iter().filter(|p| !p.id.is_empty() && !p.email.is_empty()).collect())
    }

    pub async fn person_by_sciper(&self, sciper: &str) -> Result<Person, DirectoryError> {
        if !is_valid_sciper(sciper) {
            return Err(DirectoryError::InvalidSciper(sciper.to_string()));
        }
        Ok(self.persons_request(format!("{}/{}", self.config.persons_url, sciper))?
            .send().await?
            .error_for_status()?
            .json().await?)
    }

    pub async fn persons_by_scipers(&self, scipers: &[String]) -> Result<Vec<Person>, DirectoryError> {
        if scipers.is_empty() { return Ok(Vec::new()); }
        if let Some(bad) = scipers.iter().find(|s| !is_valid_sciper(s)) {
            return Err(DirectoryError::InvalidSciper(bad.clone()));
        }

        let list: PersonList = self.persons_request(self.config.persons_url.clone())?
            .query(&[("ids", scipers.join(","))])
            .send().await?
            .error_for_status()?
            .json().await?;
        Ok(list.persons)
    }

    pub async fn courses(&self) -> Result<Vec<CourseOption>, DirectoryError> {
        if !self.config.enabled { return Err(DirectoryError::Disabled); }

        let mut request = self.client.get(format!("{}/{}", self.config.courses_url, self.config.academic_year));
        if !self.config.courses_bearer.is_empty() {
            request = request.bearer_auth(&self.config.courses_bearer);
        }
        let courses: Vec<CatalogueCourse> = request.send().await?
            .error_for_status()?
            .json().await?;
        Ok(courses.into_iter().map(CourseOption::from).collect())
    }
}
