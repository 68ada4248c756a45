//! Device module management: status + metadata merge, card rendering and
//! enable/disable toggling.

use std::collections::BTreeMap;
use tracing::{error, info};

use crate::client::ApiClient;
use crate::error::Result;
use crate::format::escape_html;
use crate::types::ModuleMetadata;

/// One module as shown on the modules page.
#[derive(Debug, Clone)]
pub struct ModuleCard {
    pub metadata: ModuleMetadata,
    pub enabled: bool,
}

impl ModuleCard {
    /// Display name, falling back to the device type.
    pub fn title(&self) -> &str {
        if self.metadata.device_name.is_empty() {
            &self.metadata.device_type
        } else {
            &self.metadata.device_name
        }
    }

    fn to_html(&self) -> String {
        let title = escape_html(self.title());
        let description = if self.metadata.description.is_empty() {
            "No description".to_string()
        } else {
            escape_html(&self.metadata.description)
        };
        let (card_class, badge_class, badge_icon, badge_text) = if self.enabled {
            ("module-enabled", "status-enabled", "fa-check-circle", "Enabled")
        } else {
            ("module-disabled", "status-disabled", "fa-times-circle", "Disabled")
        };

        let image = match self.metadata.image_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => format!(
                r#"<img src="{}" alt="{}" class="module-image" />"#,
                escape_html(url),
                title
            ),
            None => r#"<div class="module-image-fallback"><i class="fas fa-puzzle-piece"></i></div>"#
                .to_string(),
        };

        format!(
            r#"<div class="module-card {card_class}" data-device-type="{device_type}">
<div class="module-card-header">
<div class="module-image-container">{image}</div>
<div class="module-card-content">
<h3 class="module-card-title">{title}</h3>
<input type="checkbox" class="module-toggle"{checked} />
<p class="module-description">{description}</p>
<div class="module-stats">
<span>{events} Event Types</span>
<span>{fields} Common Fields</span>
</div>
</div>
</div>
<div class="module-card-footer">
<span class="module-status-label">Status:</span>
<span class="module-status-badge {badge_class}"><i class="fas {badge_icon}"></i> {badge_text}</span>
</div>
</div>"#,
            device_type = escape_html(&self.metadata.device_type),
            checked = if self.enabled { " checked" } else { "" },
            events = self.metadata.event_types.len(),
            fields = self.metadata.common_fields.len(),
        )
    }
}

/// Merges metadata with enablement. Modules missing from `status` count as
/// enabled; the result is ordered by device type.
pub fn merge_modules(
    status: &BTreeMap<String, bool>,
    metadata: BTreeMap<String, ModuleMetadata>,
) -> Vec<ModuleCard> {
    metadata
        .into_iter()
        .map(|(device_type, mut metadata)| {
            let enabled = status.get(&device_type) != Some(&false);
            if metadata.device_type.is_empty() {
                metadata.device_type = device_type;
            }
            ModuleCard { metadata, enabled }
        })
        .collect()
}

/// Renders the module list, or the empty-state block.
pub fn render_modules(modules: &[ModuleCard]) -> String {
    if modules.is_empty() {
        return r#"<div class="empty-state">No modules available</div>"#.to_string();
    }
    modules
        .iter()
        .map(ModuleCard::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct ModuleManager {
    client: ApiClient,
}

impl ModuleManager {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Status first, then metadata.
    pub async fn fetch_modules(&self) -> Result<Vec<ModuleCard>> {
        let status = self.client.module_status().await?;
        let metadata = self.client.module_metadata().await?;
        Ok(merge_modules(&status, metadata))
    }

    /// Read-modify-write of the enabled map, then a fresh module list.
    ///
    /// On failure the list is still re-fetched (so a UI can show the real
    /// state) and the toggle error is returned.
    pub async fn toggle_module(&self, device_type: &str, enabled: bool) -> Result<Vec<ModuleCard>> {
        match self.write_enabled(device_type, enabled).await {
            Ok(()) => {
                info!(device_type, enabled, "module updated");
                self.fetch_modules().await
            }
            Err(e) => {
                error!(device_type, enabled, "error toggling module: {}", e);
                if let Err(refetch) = self.fetch_modules().await {
                    error!("error fetching modules: {}", refetch);
                }
                Err(e)
            }
        }
    }

    async fn write_enabled(&self, device_type: &str, enabled: bool) -> Result<()> {
        let mut enabled_modules = self.client.module_status().await?;
        enabled_modules.insert(device_type.to_string(), enabled);
        self.client.put_enabled_modules(enabled_modules).await?;
        Ok(())
    }
}
