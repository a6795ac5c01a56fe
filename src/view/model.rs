use std::fmt;

use crate::{
    service::{CreditsState, PrecedenceStep, Product, SubscriptionRow, UploadItem, CONSUMPTION_ORDER},
    utils::format_timestamp,
};

pub const FEATURED_BADGE: &str = "Top pick";

#[derive(Debug, Clone, PartialEq)]
pub struct CreditsPanel {
    pub one_time: Option<i64>,
    pub monthly_quota: Option<i64>,
    pub free_generation: Option<&'static str>,
    pub precedence: [PrecedenceStep; 2],
    pub error: Option<String>,
}

impl From<&CreditsState> for CreditsPanel {
    fn from(state: &CreditsState) -> Self {
        Self {
            one_time: state.status.as_ref().map(|s| s.credits),
            monthly_quota: state.status.as_ref().map(|s| s.monthly_quota),
            free_generation: state.status.as_ref().map(|s| s.free_generation_label()),
            precedence: CONSUMPTION_ORDER,
            error: state.error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub badge: Option<&'static str>,
}

impl ProductCard {
    pub fn new(product: &Product, featured: bool, default_description: &str) -> Self {
        Self {
            slug: product.slug.clone(),
            name: product.name.clone(),
            description: product
                .description
                .clone()
                .unwrap_or_else(|| default_description.to_string()),
            price: format!("{} {}", product.price, product.currency),
            badge: featured.then_some(FEATURED_BADGE),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardModel {
    pub credits: CreditsPanel,
    pub packs: Vec<ProductCard>,
    pub catalog_loading: bool,
    /// `None` when subscriptions are switched off.
    pub plans: Option<Vec<ProductCard>>,
    pub subscriptions: Option<Vec<SubscriptionRow>>,
    pub payment_message: Option<String>,
    pub errors: Vec<String>,
    /// Last message any dashboard component surfaced.
    pub notice: Option<String>,
}

/// Subscription rows on their own, for callers that only touched subscriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionList(pub Vec<SubscriptionRow>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadAction {
    Download(String),
    Processing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadRow {
    pub filename: String,
    pub status: String,
    pub created: String,
    pub action: UploadAction,
}

impl From<&UploadItem> for UploadRow {
    fn from(item: &UploadItem) -> Self {
        Self {
            filename: item.original_filename.clone(),
            status: item.status.to_string(),
            created: format_timestamp(item.created_at),
            action: match item.download_url() {
                Some(url) => UploadAction::Download(url.to_string()),
                None => UploadAction::Processing,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateModel {
    pub precedence: [PrecedenceStep; 2],
    pub status: Option<String>,
    pub uploads: Vec<UploadRow>,
    pub can_load_more: bool,
    pub errors: Vec<String>,
    pub notice: Option<String>,
}

fn write_errors(f: &mut fmt::Formatter<'_>, errors: &[String]) -> fmt::Result {
    for error in errors {
        writeln!(f, "! {}", error)?;
    }
    Ok(())
}

fn write_precedence(f: &mut fmt::Formatter<'_>, precedence: &[PrecedenceStep]) -> fmt::Result {
    for step in precedence {
        writeln!(f, "  {:<18}{}", step.pool, step.role)?;
    }
    Ok(())
}

fn write_notice(f: &mut fmt::Formatter<'_>, notice: &Option<String>) -> fmt::Result {
    match notice {
        Some(notice) => writeln!(f, "\nLast update: {}", notice),
        None => Ok(()),
    }
}

fn or_dash(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for DashboardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Credits")?;
        writeln!(f, "  One-time credits: {}", or_dash(self.credits.one_time))?;
        writeln!(f, "  Monthly quota:    {}", or_dash(self.credits.monthly_quota))?;
        writeln!(f, "  Free generation:  {}", self.credits.free_generation.unwrap_or("-"))?;
        write_precedence(f, &self.credits.precedence)?;

        writeln!(f, "\nOne-time packs")?;
        if self.catalog_loading {
            writeln!(f, "  Loading packs...")?;
        } else if self.packs.is_empty() {
            writeln!(f, "  No packs available.")?;
        }
        for card in &self.packs {
            let badge = card.badge.map(|b| format!(" [{}]", b)).unwrap_or_default();
            writeln!(f, "  {} ({}) {}{}", card.name, card.slug, card.price, badge)?;
            writeln!(f, "    {}", card.description)?;
        }

        if let Some(plans) = &self.plans {
            writeln!(f, "\nSubscriptions")?;
            if plans.is_empty() && !self.catalog_loading {
                writeln!(f, "  No subscriptions available.")?;
            }
            for card in plans {
                writeln!(f, "  {} ({}) Subscribe {}", card.name, card.slug, card.price)?;
            }
        }

        if let Some(rows) = &self.subscriptions {
            writeln!(f, "\nActive subscriptions")?;
            write!(f, "{}", SubscriptionList(rows.clone()))?;
        }

        if let Some(message) = &self.payment_message {
            writeln!(f, "\n{}", message)?;
        }
        write_errors(f, &self.errors)?;
        write_notice(f, &self.notice)
    }
}

impl fmt::Display for SubscriptionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "  No subscriptions on this account.")?;
        }
        for row in &self.0 {
            let marker = if row.action.disabled { " (disabled)" } else { "" };
            writeln!(
                f,
                "  Subscription #{}  status: {}  period end: {}  [{}]{}",
                row.id, row.status, row.period_end, row.action.label, marker
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for GenerateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "How credits work")?;
        write_precedence(f, &self.precedence)?;

        if let Some(status) = &self.status {
            writeln!(f, "\n{}", status)?;
        }

        writeln!(f, "\nRecent uploads")?;
        if self.uploads.is_empty() {
            writeln!(f, "  No uploads yet.")?;
        }
        for row in &self.uploads {
            match &row.action {
                UploadAction::Download(url) => {
                    writeln!(f, "  {}  {}  status: {}  Download: {}", row.created, row.filename, row.status, url)?
                }
                UploadAction::Processing => writeln!(
                    f,
                    "  {}  {}  status: {}  [Processing]",
                    row.created, row.filename, row.status
                )?,
            }
        }
        if self.can_load_more {
            writeln!(f, "  (more available)")?;
        }
        write_errors(f, &self.errors)?;
        write_notice(f, &self.notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::UploadStatus;

    #[test]
    fn test_upload_row_action() {
        let mut item = UploadItem {
            id: 1,
            status: UploadStatus::Processing,
            original_filename: "clip.mp4".into(),
            cleaned_url: None,
            created_at: None,
        };
        assert_eq!(UploadRow::from(&item).action, UploadAction::Processing);

        item.status = UploadStatus::Complete;
        item.cleaned_url = Some("https://cdn.example/clip.mp4".into());
        assert_eq!(
            UploadRow::from(&item).action,
            UploadAction::Download("https://cdn.example/clip.mp4".into())
        );
    }

    #[test]
    fn test_disabled_surfaces_are_not_printed() {
        let model = DashboardModel {
            credits: CreditsPanel::from(&CreditsState::default()),
            packs: Vec::new(),
            catalog_loading: false,
            plans: None,
            subscriptions: None,
            payment_message: None,
            errors: vec!["Failed to load credits".into()],
            notice: Some("credits: Failed to load credits".into()),
        };

        let text = model.to_string();

        assert!(!text.contains("Subscriptions"));
        assert!(!text.contains("Active subscriptions"));
        assert!(text.contains("No packs available."));
        assert!(text.contains("! Failed to load credits"));
        assert!(text.contains("Last update: credits: Failed to load credits"));
    }

    #[test]
    fn test_subscription_list_prints_rows_only() {
        let rows = SubscriptionList(vec![SubscriptionRow {
            id: 4,
            status: "canceled".into(),
            period_end: "N/A".into(),
            action: crate::service::ActionControl {
                label: "Canceled",
                disabled: true,
            },
        }]);

        let text = rows.to_string();

        assert_eq!(
            text,
            "  Subscription #4  status: canceled  period end: N/A  [Canceled] (disabled)\n"
        );
        assert!(!text.contains("Credits"));
        assert_eq!(SubscriptionList(Vec::new()).to_string(), "  No subscriptions on this account.\n");
    }
}
