use action_primitives::{ActionError, PageDom};
use consign_core_types::EntityId;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::label::{identifier_line, parse_entity_label};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityResolverConfig {
    pub label_selector: String,
    pub prefix: String,
}

impl Default for EntityResolverConfig {
    fn default() -> Self {
        Self {
            label_selector: ".MuiTypography-root.MuiTypography-body2".to_string(),
            prefix: "ID:".to_string(),
        }
    }
}

/// Reads the identifier of the listing currently on screen.
///
/// Stateless: every call re-reads the label from the live page.
#[derive(Clone, Debug, Default)]
pub struct EntityResolver {
    config: EntityResolverConfig,
}

impl EntityResolver {
    pub fn new(config: EntityResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EntityResolverConfig {
        &self.config
    }

    /// `Ok(None)` when the label is absent or malformed. Errors are host failures only.
    pub async fn resolve<P>(&self, page: &P) -> Result<Option<EntityId>, ActionError>
    where
        P: PageDom + ?Sized,
    {
        let Some(label) = page.query_selector(&self.config.label_selector).await? else {
            trace!(selector = %self.config.label_selector, "Entity label not present");
            return Ok(None);
        };

        let html = page.inner_html(&label).await?;
        let text = page.text_content(&label).await?;

        let resolved = identifier_line(&html, &text)
            .and_then(|line| parse_entity_label(&line, &self.config.prefix));
        trace!(entity = ?resolved, "Resolved current entity");
        Ok(resolved)
    }
}
