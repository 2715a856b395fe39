use std::time::Duration;

use anyhow::{ensure, Context};
use serde::Deserialize;
use toml::{map::Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    pub gateway: Gateway,
    pub openai: OpenAi,
    pub generate: Generate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    /// Upper bound for a job body; reference images travel inline.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Gateway {
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OpenAi {
    pub base_url: String,
    pub image_model: String,
    pub image_count: u32,
    pub image_size: Option<String>,
    pub image_quality: Option<String>,
    pub image_style: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Prompt decoration for both image paths.
///
/// Templates substitute `{brand}`, `{prompt}` and `{modifier}`; any other
/// braces are copied through untouched.
#[derive(Clone, Debug, Deserialize)]
pub struct Generate {
    pub styles: Vec<Style>,
    pub external_labels: Vec<String>,
    pub brand_template: String,
    pub with_image_template: String,
    pub text_only_template: String,
    pub external_template: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Style {
    pub name: String,
    pub modifier: String,
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_body_bytes() -> usize {
    25 * 1024 * 1024
}

impl Gateway {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl OpenAi {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn from_table(table: &Map<String, Value>) -> anyhow::Result<Self> {
        let config: Config = Value::Table(table.clone())
            .try_into()
            .context("failed to deserialize config")?;

        ensure!(
            !config.generate.styles.is_empty(),
            "generate.styles must name at least one style"
        );
        ensure!(
            !config.generate.external_labels.is_empty(),
            "generate.external_labels must not be empty"
        );
        ensure!(config.openai.image_count > 0, "openai.image_count must be > 0");
        ensure!(
            config.server.max_body_bytes > 0,
            "server.max_body_bytes must be > 0"
        );

        Ok(config)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let table = util::parse_table(text).context("failed to parse config")?;
        Self::from_table(&table)
    }
}

impl Generate {
    pub fn brand_context(&self, app_role: Option<&str>) -> String {
        match app_role {
            Some(brand) => render(&self.brand_template, &[("brand", brand)]),
            None => String::new(),
        }
    }

    pub fn managed_prompt(
        &self,
        style: &Style,
        prompt: &str,
        app_role: Option<&str>,
        has_reference_image: bool,
    ) -> String {
        let template = if has_reference_image {
            &self.with_image_template
        } else {
            &self.text_only_template
        };
        let brand = self.brand_context(app_role);

        render(
            template,
            &[
                ("brand", brand.as_str()),
                ("prompt", prompt),
                ("modifier", style.modifier.as_str()),
            ],
        )
    }

    pub fn external_prompt(&self, prompt: &str) -> String {
        render(&self.external_template, &[("prompt", prompt)])
    }

    /// Labels are positional; everything past the list reuses the last one.
    pub fn external_label(&self, index: usize) -> &str {
        let last = self.external_labels.len().saturating_sub(1);
        self.external_labels
            .get(index.min(last))
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Single pass, so placeholders inside substituted values stay literal.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let substitution = after.find('}').and_then(|end| {
            values
                .iter()
                .find(|(key, _)| *key == &after[..end])
                .map(|(_, value)| (end, *value))
        });

        match substitution {
            Some((end, value)) => {
                rendered.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                rendered.push('{');
                rest = after;
            }
        }
    }
    rendered.push_str(rest);

    rendered
}
