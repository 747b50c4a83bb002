//! Store tours in a Supabase project through its PostgREST interface
use super::TourStorage;
use crate::services::{http_client, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::tour::Tour;
use crate::Error;
use log::{debug, info};
use moto_track_derive::FromServiceConfig;
use reqwest::blocking::{RequestBuilder, Response};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Defines the connection parameters of a Supabase project
#[derive(Clone, Debug, FromServiceConfig)]
pub struct Supabase {
    base_url: String,
    api_key: String,
    table: String,
    user_agent: String,
    timeout_secs: u64,
}

impl Supabase {
    pub fn new(base_url: String, api_key: String) -> Self {
        Supabase {
            base_url,
            api_key,
            ..Default::default()
        }
    }

    /// Both the project url and the api key must be configured
    pub fn validate(&self) -> Result<(), Error> {
        if self.base_url.is_empty() {
            return Err(Error::InvalidConfigurationValue(
                "supabase.base_url must be set".to_string(),
            ));
        }
        if self.api_key.is_empty() {
            return Err(Error::InvalidConfigurationValue(
                "supabase.api_key must be set".to_string(),
            ));
        }
        Ok(())
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let resp = self.authorize(request).send()?;
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let code = resp.status();
            let body = resp.text()?;
            Err(Error::RequestError(code, error_message(&body)))
        }
    }
}

impl Default for Supabase {
    fn default() -> Self {
        Supabase {
            base_url: String::new(),
            api_key: String::new(),
            table: "tours".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TourStorage for Supabase {
    fn insert_tour(&self, tour: &Tour) -> Result<Tour, Error> {
        let client = http_client(&self.user_agent, self.timeout_secs)?;
        debug!("Inserting tour into {}", self.table_url());
        let resp = self.send(
            client
                .post(&self.table_url())
                .header("Prefer", "return=representation")
                .json(tour),
        )?;
        let rows: Vec<Tour> = resp.json()?;
        let stored = first_row(rows)
            .ok_or_else(|| Error::Other("insert returned no rows".to_string()))?;
        info!("Stored tour {}", stored.id.as_deref().unwrap_or("<no id>"));
        Ok(stored)
    }

    fn list_tours(&self) -> Result<Vec<Tour>, Error> {
        let client = http_client(&self.user_agent, self.timeout_secs)?;
        let resp = self.send(
            client
                .get(&self.table_url())
                .query(&[("select", "*"), ("order", "created_at.desc")]),
        )?;
        let tours: Vec<Tour> = resp.json()?;
        debug!("Fetched {} tours", tours.len());
        Ok(tours)
    }

    fn get_tour(&self, id: &str) -> Result<Option<Tour>, Error> {
        let client = http_client(&self.user_agent, self.timeout_secs)?;
        let filter = format!("eq.{}", id);
        let resp = self.send(
            client
                .get(&self.table_url())
                .query(&[("select", "*"), ("id", filter.as_str())]),
        )?;
        let rows: Vec<Tour> = resp.json()?;
        Ok(first_row(rows))
    }

    fn delete_tour(&self, id: &str) -> Result<(), Error> {
        let client = http_client(&self.user_agent, self.timeout_secs)?;
        let filter = format!("eq.{}", id);
        self.send(
            client
                .delete(&self.table_url())
                .query(&[("id", filter.as_str())]),
        )?;
        info!("Deleted tour {}", id);
        Ok(())
    }
}

fn first_row(rows: Vec<Tour>) -> Option<Tour> {
    rows.into_iter().next()
}

/// PostgREST errors carry a json body with a message field
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) if body.is_empty() => "request failed without a response body".to_string(),
        Err(_) => body.to_string(),
    }
}
