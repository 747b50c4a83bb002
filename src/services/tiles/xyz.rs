//! Fetch raster tiles from any server following the {z}/{x}/{y} url scheme
use super::{Tile, TileService};
use crate::services::{http_client, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::Error;
use log::debug;
use moto_track_derive::FromServiceConfig;

/// Defines the url templates and options of a raster tile provider
#[derive(Clone, Debug, FromServiceConfig)]
pub struct Xyz {
    url_template: String,
    dark_url_template: String,
    subdomains: String,
    max_zoom: u8,
    retina: bool,
    user_agent: String,
    timeout_secs: u64,
    #[service_config(skip)]
    dark_mode: bool,
}

impl Xyz {
    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }

    fn template(&self) -> &str {
        if self.dark_mode {
            &self.dark_url_template
        } else {
            &self.url_template
        }
    }

    fn subdomain(&self, tile: &Tile) -> Option<char> {
        let count = self.subdomains.chars().count();
        if count == 0 {
            return None;
        }
        let index = (tile.x as usize + tile.y as usize) % count;
        self.subdomains.chars().nth(index)
    }
}

impl Default for Xyz {
    fn default() -> Self {
        Xyz {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            dark_url_template: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png"
                .to_string(),
            subdomains: "abc".to_string(),
            max_zoom: 19,
            retina: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dark_mode: false,
        }
    }
}

impl TileService for Xyz {
    fn tile_url(&self, tile: &Tile) -> String {
        let subdomain = self.subdomain(tile).map(String::from).unwrap_or_default();
        self.template()
            .replace("{s}", &subdomain)
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
            .replace("{r}", if self.retina { "@2x" } else { "" })
    }

    fn fetch_tile(&self, tile: &Tile) -> Result<Vec<u8>, Error> {
        let client = http_client(&self.user_agent, self.timeout_secs)?;
        let request_url = self.tile_url(tile);
        debug!("Fetching tile {}", request_url);
        let resp = client.get(&request_url).send()?;
        if resp.status().is_success() {
            Ok(resp.bytes()?.to_vec())
        } else {
            let code = resp.status();
            Err(Error::RequestError(
                code,
                format!("tile request failed: {}", request_url),
            ))
        }
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}
