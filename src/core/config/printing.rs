use crate::core::config::data::{Config, Settings};

impl Config {
    pub fn print_all(&self, settings: &Settings) {
        println!("Current configuration:");
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset, using {})", settings.base_url),
        }
        match &self.user_id {
            Some(user) => println!("  user-id: {user}"),
            None => println!("  user-id: (unset, using {})", settings.user_id),
        }
        match self.provider_refresh_secs {
            Some(secs) => println!("  provider-refresh-secs: {secs}"),
            None => println!(
                "  provider-refresh-secs: (unset, using {})",
                settings.provider_refresh.as_secs()
            ),
        }
        match self.markup.unwrap_or(true) {
            true => println!("  markup: on"),
            false => println!("  markup: off"),
        }
    }
}
